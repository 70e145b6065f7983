//! Fixed weapon slots, armour slots and body locations.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponSlot {
    Primary,
    Secondary,
    Melee,
    Temporary,
}

impl WeaponSlot {
    /// Iteration order used by attacker priority ties and defender weight walks.
    pub const ALL: [WeaponSlot; 4] = [
        WeaponSlot::Primary,
        WeaponSlot::Secondary,
        WeaponSlot::Melee,
        WeaponSlot::Temporary,
    ];

    /// Slots that fire ammunition and may carry mods.
    pub const fn is_ranged(self) -> bool {
        matches!(self, Self::Primary | Self::Secondary)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Melee => "melee",
            Self::Temporary => "temporary",
        }
    }
}

/// One value per weapon slot, indexed by [WeaponSlot].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotTable<T> {
    pub primary: T,
    pub secondary: T,
    pub melee: T,
    pub temporary: T,
}

impl<T> SlotTable<T> {
    pub fn from_fn(mut f: impl FnMut(WeaponSlot) -> T) -> Self {
        Self {
            primary: f(WeaponSlot::Primary),
            secondary: f(WeaponSlot::Secondary),
            melee: f(WeaponSlot::Melee),
            temporary: f(WeaponSlot::Temporary),
        }
    }

    pub fn get(&self, slot: WeaponSlot) -> &T {
        match slot {
            WeaponSlot::Primary => &self.primary,
            WeaponSlot::Secondary => &self.secondary,
            WeaponSlot::Melee => &self.melee,
            WeaponSlot::Temporary => &self.temporary,
        }
    }

    pub fn get_mut(&mut self, slot: WeaponSlot) -> &mut T {
        match slot {
            WeaponSlot::Primary => &mut self.primary,
            WeaponSlot::Secondary => &mut self.secondary,
            WeaponSlot::Melee => &mut self.melee,
            WeaponSlot::Temporary => &mut self.temporary,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (WeaponSlot, &T)> {
        WeaponSlot::ALL.into_iter().map(move |slot| (slot, self.get(slot)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmourSlot {
    Head,
    Body,
    Hands,
    Legs,
    Feet,
}

impl ArmourSlot {
    pub const ALL: [ArmourSlot; 5] = [
        ArmourSlot::Head,
        ArmourSlot::Body,
        ArmourSlot::Hands,
        ArmourSlot::Legs,
        ArmourSlot::Feet,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Body => "body",
            Self::Hands => "hands",
            Self::Legs => "legs",
            Self::Feet => "feet",
        }
    }
}

/// One value per armour slot, indexed by [ArmourSlot].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmourTable<T> {
    pub head: T,
    pub body: T,
    pub hands: T,
    pub legs: T,
    pub feet: T,
}

impl<T> ArmourTable<T> {
    pub fn from_fn(mut f: impl FnMut(ArmourSlot) -> T) -> Self {
        Self {
            head: f(ArmourSlot::Head),
            body: f(ArmourSlot::Body),
            hands: f(ArmourSlot::Hands),
            legs: f(ArmourSlot::Legs),
            feet: f(ArmourSlot::Feet),
        }
    }

    pub fn get(&self, slot: ArmourSlot) -> &T {
        match slot {
            ArmourSlot::Head => &self.head,
            ArmourSlot::Body => &self.body,
            ArmourSlot::Hands => &self.hands,
            ArmourSlot::Legs => &self.legs,
            ArmourSlot::Feet => &self.feet,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ArmourSlot, &T)> {
        ArmourSlot::ALL.into_iter().map(move |slot| (slot, self.get(slot)))
    }
}

/// Struck location. The first three are critical locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyPart {
    Heart,
    Throat,
    Head,
    Chest,
    Stomach,
    Groin,
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
    LeftHand,
    RightHand,
    LeftFoot,
    RightFoot,
}

/// Crit roll bands in [1, 100]: (upper bound inclusive, part).
const CRIT_BANDS: [(u32, BodyPart); 3] = [
    (11, BodyPart::Heart),
    (21, BodyPart::Throat),
    (100, BodyPart::Head),
];

/// Non-crit roll bands in [1, 1000]: (width, part).
const NON_CRIT_BANDS: [(u32, BodyPart); 11] = [
    (170, BodyPart::Chest),
    (170, BodyPart::Stomach),
    (60, BodyPart::Groin),
    (100, BodyPart::LeftArm),
    (100, BodyPart::RightArm),
    (100, BodyPart::LeftLeg),
    (100, BodyPart::RightLeg),
    (50, BodyPart::LeftHand),
    (50, BodyPart::RightHand),
    (50, BodyPart::LeftFoot),
    (50, BodyPart::RightFoot),
];

impl BodyPart {
    pub const COUNT: usize = 14;

    pub const ALL: [BodyPart; Self::COUNT] = [
        BodyPart::Heart,
        BodyPart::Throat,
        BodyPart::Head,
        BodyPart::Chest,
        BodyPart::Stomach,
        BodyPart::Groin,
        BodyPart::LeftArm,
        BodyPart::RightArm,
        BodyPart::LeftLeg,
        BodyPart::RightLeg,
        BodyPart::LeftHand,
        BodyPart::RightHand,
        BodyPart::LeftFoot,
        BodyPart::RightFoot,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn is_critical(self) -> bool {
        matches!(self, Self::Heart | Self::Throat | Self::Head)
    }

    pub const fn is_foot(self) -> bool {
        matches!(self, Self::LeftFoot | Self::RightFoot)
    }

    /// Damage multiplier before perks.
    pub fn multiplier(self) -> f64 {
        match self {
            Self::Heart | Self::Throat | Self::Head => 1.0,
            Self::Chest | Self::Stomach | Self::Groin => 1.0 / 1.75,
            Self::LeftArm | Self::RightArm | Self::LeftLeg | Self::RightLeg => 1.0 / 3.5,
            Self::LeftHand | Self::RightHand | Self::LeftFoot | Self::RightFoot => 1.0 / 5.0,
        }
    }

    /// Maps a draw in [1, 100] onto a critical location.
    pub fn from_crit_roll(draw: u32) -> BodyPart {
        CRIT_BANDS
            .iter()
            .find(|(upper, _)| draw <= *upper)
            .map_or(BodyPart::Head, |(_, part)| *part)
    }

    /// Maps a draw in [1, 1000] onto a non-critical location.
    pub fn from_non_crit_roll(draw: u32) -> BodyPart {
        let mut upper = 0;
        for (width, part) in NON_CRIT_BANDS {
            upper += width;
            if draw <= upper {
                return part;
            }
        }
        BodyPart::RightFoot
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Heart => "heart",
            Self::Throat => "throat",
            Self::Head => "head",
            Self::Chest => "chest",
            Self::Stomach => "stomach",
            Self::Groin => "groin",
            Self::LeftArm => "left arm",
            Self::RightArm => "right arm",
            Self::LeftLeg => "left leg",
            Self::RightLeg => "right leg",
            Self::LeftHand => "left hand",
            Self::RightHand => "right hand",
            Self::LeftFoot => "left foot",
            Self::RightFoot => "right foot",
        }
    }
}
