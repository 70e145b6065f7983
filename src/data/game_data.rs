//! Static game tables the engine consults while preparing fighters: default weapons and armour,
//! weapon mod effects, armour coverage per body part, and which head armour blocks which
//! temporary items. Every lookup has a conservative fallback so the engine never fails on a
//! missing entry.

use std::collections::BTreeMap;
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use crate::combat::combatant::{Armour, Weapon};
use crate::combat::slots::{ArmourSlot, ArmourTable, BodyPart, SlotTable, WeaponSlot};

/// Effect bundle of a single weapon mod. Mods on one weapon are summed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModData {
    pub accuracy: f64,
    /// Accuracy removed from opponents attacking the carrier.
    pub enemy_accuracy: f64,
    pub crit_chance: f64,
    pub damage: f64,
    /// Dexterity percentage applied to the carrier while the weapon is equipped.
    pub dexterity_passive: f64,
    /// Accuracy that only applies in the first round.
    pub first_turn_accuracy: f64,
}

impl ModData {
    pub fn with_accuracy(value: f64) -> Self {
        Self {
            accuracy: value,
            ..Self::default()
        }
    }

    pub fn with_enemy_accuracy(value: f64) -> Self {
        Self {
            enemy_accuracy: value,
            ..Self::default()
        }
    }

    pub fn with_crit_chance(value: f64) -> Self {
        Self {
            crit_chance: value,
            ..Self::default()
        }
    }

    pub fn with_damage(value: f64) -> Self {
        Self {
            damage: value,
            ..Self::default()
        }
    }

    pub fn with_first_turn_accuracy(value: f64) -> Self {
        Self {
            first_turn_accuracy: value,
            ..Self::default()
        }
    }
}

impl AddAssign for ModData {
    fn add_assign(&mut self, other: Self) {
        self.accuracy += other.accuracy;
        self.enemy_accuracy += other.enemy_accuracy;
        self.crit_chance += other.crit_chance;
        self.damage += other.damage;
        self.dexterity_passive += other.dexterity_passive;
        self.first_turn_accuracy += other.first_turn_accuracy;
    }
}

/// Lookups the engine needs from the game-data collaborator.
pub trait GameDataSource {
    fn default_weapon(&self, slot: WeaponSlot) -> Weapon;
    fn default_armour(&self, slot: ArmourSlot) -> Option<Armour>;
    fn mod_effects(&self, name: &str) -> Option<ModData>;
    /// Coverage percentage of `part` by the armour item `armour_name`; 0 when unknown.
    fn armour_coverage(&self, part: BodyPart, armour_name: &str) -> f64;
    /// Whether head armour `head_armour` stops the temporary item `item`.
    fn can_armour_block(&self, item: &str, head_armour: &str) -> bool;
}

/// Lowercase, collapse whitespace, dashes and underscores into a single `_`.
pub fn normalize_lookup(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() || c == '_' || c == '-' { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameData {
    pub default_weapons: SlotTable<Weapon>,
    pub default_armour: ArmourTable<Option<Armour>>,
    pub mods: BTreeMap<String, ModData>,
    /// Armour item → body part → coverage percent.
    pub coverage: BTreeMap<String, BTreeMap<BodyPart, f64>>,
    /// Head armour item → temporary items it blocks.
    pub blockers: BTreeMap<String, Vec<String>>,
}

impl Default for GameData {
    fn default() -> Self {
        Self::builtin()
    }
}

const ARMOUR_SETS: [&str; 9] = [
    "Combat", "Riot", "Assault", "Dune", "Delta", "Marauder", "EOD", "Sentinel", "Vanguard",
];

/// Coverage shape shared by every full armour set, per slot.
fn coverage_template(slot: ArmourSlot) -> Vec<(BodyPart, f64)> {
    use BodyPart::*;
    match slot {
        ArmourSlot::Head => vec![(Head, 100.0), (Throat, 40.0)],
        ArmourSlot::Body => vec![
            (Heart, 100.0),
            (Chest, 100.0),
            (Stomach, 100.0),
            (Throat, 60.0),
            (Groin, 40.0),
            (LeftArm, 60.0),
            (RightArm, 60.0),
        ],
        ArmourSlot::Hands => vec![
            (LeftHand, 100.0),
            (RightHand, 100.0),
            (LeftArm, 40.0),
            (RightArm, 40.0),
        ],
        ArmourSlot::Legs => vec![
            (Groin, 60.0),
            (LeftLeg, 100.0),
            (RightLeg, 100.0),
        ],
        ArmourSlot::Feet => vec![(LeftFoot, 100.0), (RightFoot, 100.0)],
    }
}

const fn piece_name(slot: ArmourSlot) -> &'static str {
    match slot {
        ArmourSlot::Head => "Helmet",
        ArmourSlot::Body => "Vest",
        ArmourSlot::Hands => "Gloves",
        ArmourSlot::Legs => "Pants",
        ArmourSlot::Feet => "Boots",
    }
}

const OBSCURING_ITEMS: [&str; 6] = [
    "Flash Grenade",
    "Sand",
    "Smoke Grenade",
    "Concussion Grenade",
    "Pepper Spray",
    "Tear Gas",
];

impl GameData {
    /// Tables compiled into the binary.
    pub fn builtin() -> Self {
        let mut coverage = BTreeMap::new();
        for set in ARMOUR_SETS {
            for slot in ArmourSlot::ALL {
                let name = normalize_lookup(&format!("{set} {}", piece_name(slot)));
                coverage.insert(name, coverage_template(slot).into_iter().collect());
            }
        }
        coverage.insert(
            normalize_lookup("Gas Mask"),
            [(BodyPart::Throat, 100.0), (BodyPart::Head, 30.0)].into_iter().collect(),
        );

        let mods: BTreeMap<String, ModData> = [
            ("Reflex Sight", ModData::with_accuracy(1.0)),
            ("Holographic Sight", ModData::with_accuracy(1.25)),
            ("ACOG Sight", ModData::with_accuracy(1.5)),
            ("Thermal Sight", ModData::with_accuracy(1.75)),
            ("Laser 1mW", ModData::with_crit_chance(0.25)),
            ("Laser 5mW", ModData::with_crit_chance(0.5)),
            ("Laser 30mW", ModData::with_crit_chance(0.75)),
            ("Laser 100mW", ModData::with_crit_chance(1.0)),
            ("Small Light", ModData::with_enemy_accuracy(3.0)),
            ("Precision Light", ModData::with_enemy_accuracy(4.0)),
            ("Tactical Illuminator", ModData::with_enemy_accuracy(5.0)),
            ("Adjustable Trigger", ModData::with_first_turn_accuracy(5.0)),
            ("Hair Trigger", ModData::with_first_turn_accuracy(7.5)),
            ("Custom Grip", ModData::with_accuracy(0.75)),
            ("Skeet Choke", ModData::with_damage(6.0)),
            ("Improved Choke", ModData::with_damage(7.0)),
            ("Full Choke", ModData::with_damage(8.0)),
            ("Standard Brake", ModData::with_accuracy(1.0)),
            ("Heavy Duty Brake", ModData::with_accuracy(1.25)),
            ("Tactical Brake", ModData::with_accuracy(1.5)),
            (
                "Bipod",
                ModData {
                    dexterity_passive: -30.0,
                    ..ModData::with_accuracy(1.75)
                },
            ),
            (
                "Tripod",
                ModData {
                    dexterity_passive: -30.0,
                    ..ModData::with_accuracy(2.0)
                },
            ),
        ]
        .into_iter()
        .map(|(name, data)| (normalize_lookup(name), data))
        .collect();

        let blockers = [
            ("Gas Mask", vec!["Smoke Grenade", "Tear Gas", "Pepper Spray"]),
            ("EOD Helmet", OBSCURING_ITEMS.to_vec()),
            ("Sentinel Helmet", vec!["Flash Grenade", "Sand"]),
        ]
        .into_iter()
        .map(|(head, items)| {
            (
                normalize_lookup(head),
                items.into_iter().map(normalize_lookup).collect(),
            )
        })
        .collect();

        Self {
            default_weapons: SlotTable {
                primary: Weapon::fists(),
                secondary: Weapon::fists(),
                melee: Weapon::fists(),
                temporary: Weapon::kick(),
            },
            default_armour: ArmourTable::default(),
            mods,
            coverage,
            blockers,
        }
    }

    /// Folds `overlay` onto these tables. Overlay entries replace built-ins with the same key.
    pub fn merge(&mut self, overlay: GameDataOverlay) {
        if let Some(weapons) = overlay.default_weapons {
            self.default_weapons = weapons;
        }
        if let Some(armour) = overlay.default_armour {
            self.default_armour = armour;
        }
        for (name, data) in overlay.mods {
            self.mods.insert(normalize_lookup(&name), data);
        }
        for (name, parts) in overlay.coverage {
            self.coverage.insert(normalize_lookup(&name), parts);
        }
        for (name, items) in overlay.blockers {
            let items = items.iter().map(|item| normalize_lookup(item)).collect();
            self.blockers.insert(normalize_lookup(&name), items);
        }
    }
}

/// Partial tables read from a JSON file; anything omitted keeps its built-in value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameDataOverlay {
    pub default_weapons: Option<SlotTable<Weapon>>,
    pub default_armour: Option<ArmourTable<Option<Armour>>>,
    pub mods: BTreeMap<String, ModData>,
    pub coverage: BTreeMap<String, BTreeMap<BodyPart, f64>>,
    pub blockers: BTreeMap<String, Vec<String>>,
}

impl GameDataSource for GameData {
    fn default_weapon(&self, slot: WeaponSlot) -> Weapon {
        self.default_weapons.get(slot).clone()
    }

    fn default_armour(&self, slot: ArmourSlot) -> Option<Armour> {
        self.default_armour.get(slot).clone()
    }

    fn mod_effects(&self, name: &str) -> Option<ModData> {
        self.mods.get(&normalize_lookup(name)).copied()
    }

    fn armour_coverage(&self, part: BodyPart, armour_name: &str) -> f64 {
        self.coverage
            .get(&normalize_lookup(armour_name))
            .and_then(|parts| parts.get(&part))
            .copied()
            .filter(|value| value.is_finite())
            .map_or(0.0, |value| value.clamp(0.0, 100.0))
    }

    fn can_armour_block(&self, item: &str, head_armour: &str) -> bool {
        let item = normalize_lookup(item);
        self.blockers
            .get(&normalize_lookup(head_armour))
            .is_some_and(|items| items.contains(&item))
    }
}
