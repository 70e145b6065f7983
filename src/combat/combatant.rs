//! Static combatant configuration. Built once per simulation request and shared read-only
//! across every trial; nothing in here is mutated during a fight.
//!
//! Every field carries a serde default so sparse request bodies still produce a usable
//! combatant. Unset weapons and armour are resolved against the game-data tables when the
//! fighter template is prepared.

use serde::{Deserialize, Serialize};

use crate::combat::armour::ArmourEffectKind;
use crate::combat::bonuses::BonusKind;
use crate::combat::slots::{ArmourTable, SlotTable, WeaponSlot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Strength,
    Speed,
    Defense,
    Dexterity,
}

impl Stat {
    pub const ALL: [Stat; 4] = [Stat::Strength, Stat::Speed, Stat::Defense, Stat::Dexterity];
}

/// Strength / speed / defense / dexterity. Also used for percentage passives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleStats {
    pub strength: f64,
    pub speed: f64,
    pub defense: f64,
    pub dexterity: f64,
}

impl BattleStats {
    pub const fn uniform(value: f64) -> Self {
        Self {
            strength: value,
            speed: value,
            defense: value,
            dexterity: value,
        }
    }

    pub fn get(&self, stat: Stat) -> f64 {
        match stat {
            Stat::Strength => self.strength,
            Stat::Speed => self.speed,
            Stat::Defense => self.defense,
            Stat::Dexterity => self.dexterity,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponCategory {
    Clubbing,
    HeavyArtillery,
    MachineGun,
    Mechanical,
    Piercing,
    Pistol,
    Rifle,
    Shotgun,
    Slashing,
    Smg,
    Temporary,
    #[default]
    Unarmed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmmoType {
    #[default]
    Standard,
    Tracer,
    Piercing,
    HollowPoint,
    Incendiary,
}

impl AmmoType {
    pub fn accuracy_bonus(self) -> f64 {
        match self {
            Self::Tracer => 10.0,
            _ => 0.0,
        }
    }

    /// Factor applied to the armour penetration divisor.
    pub fn penetration_factor(self) -> f64 {
        match self {
            Self::Piercing => 2.0,
            Self::HollowPoint => 1.0 / 1.5,
            _ => 1.0,
        }
    }

    pub fn damage_multiplier(self) -> f64 {
        match self {
            Self::HollowPoint => 1.5,
            Self::Incendiary => 1.4,
            _ => 1.0,
        }
    }
}

/// Rounds fired per action, drawn between `min` and `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateOfFire {
    pub min: u32,
    pub max: u32,
}

impl Default for RateOfFire {
    fn default() -> Self {
        Self { min: 1, max: 1 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponBonus {
    pub kind: BonusKind,
    #[serde(default)]
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weapon {
    pub name: String,
    pub category: WeaponCategory,
    /// Display damage; divided by 10 in the damage formula.
    pub damage: f64,
    /// Display accuracy, 50 is neutral.
    pub accuracy: f64,
    /// Weapon experience, 0 to 100.
    pub experience: f64,
    /// Rounds per clip. Zero means the weapon never uses ammunition.
    pub clip_size: u32,
    /// Spare clips carried into the fight.
    pub clips: u32,
    pub rate_of_fire: RateOfFire,
    pub ammo: AmmoType,
    pub bonuses: Vec<WeaponBonus>,
    pub mods: Vec<String>,
}

impl Default for Weapon {
    fn default() -> Self {
        Self::fists()
    }
}

impl Weapon {
    pub fn fists() -> Self {
        Self {
            name: "Fists".to_string(),
            category: WeaponCategory::Unarmed,
            damage: 10.0,
            accuracy: 50.0,
            experience: 0.0,
            clip_size: 0,
            clips: 0,
            rate_of_fire: RateOfFire::default(),
            ammo: AmmoType::Standard,
            bonuses: Vec::new(),
            mods: Vec::new(),
        }
    }

    pub fn kick() -> Self {
        Self {
            name: "Kick".to_string(),
            damage: 30.0,
            accuracy: 40.0,
            ..Self::fists()
        }
    }

    pub fn uses_ammo(&self) -> bool {
        self.clip_size > 0
    }

    pub fn is_unarmed(&self) -> bool {
        self.category == WeaponCategory::Unarmed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmourEffect {
    pub kind: ArmourEffectKind,
    #[serde(default)]
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Armour {
    /// Item name; also the key into the coverage table.
    pub name: String,
    pub value: f64,
    pub effect: Option<ArmourEffect>,
}

/// Lower non-zero priority wins; zero means never chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackSettings {
    pub priority: SlotTable<u32>,
    pub reload: SlotTable<bool>,
}

impl Default for AttackSettings {
    fn default() -> Self {
        Self {
            priority: SlotTable {
                primary: 1,
                secondary: 2,
                melee: 3,
                temporary: 0,
            },
            reload: SlotTable {
                primary: true,
                secondary: true,
                melee: false,
                temporary: false,
            },
        }
    }
}

/// Relative weights for the defender's random slot choice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefendSettings {
    pub weight: SlotTable<u32>,
    pub reload: SlotTable<bool>,
}

impl Default for DefendSettings {
    fn default() -> Self {
        Self {
            weight: SlotTable {
                primary: 25,
                secondary: 25,
                melee: 25,
                temporary: 25,
            },
            reload: SlotTable {
                primary: true,
                secondary: true,
                melee: false,
                temporary: false,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationPerks {
    /// +1% damage.
    pub damage: bool,
    /// +2% melee damage.
    pub melee_damage: bool,
    /// +5% temporary damage.
    pub temporary_damage: bool,
    /// +1 temporary accuracy.
    pub temporary_accuracy: bool,
    /// +3% critical hit chance.
    pub critical_hit_rate: bool,
    /// +10% throat damage.
    pub neck_damage: bool,
    /// Injections are 50% stronger.
    pub needle_effect: bool,
}

/// Faction perk percentages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactionPerks {
    pub accuracy: f64,
    pub damage: f64,
    pub strength: f64,
    pub speed: f64,
    pub defense: f64,
    pub dexterity: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyPerks {
    pub name: String,
    pub stars: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Masteries {
    pub clubbing: u32,
    pub heavy_artillery: u32,
    pub machine_gun: u32,
    pub mechanical: u32,
    pub piercing: u32,
    pub pistol: u32,
    pub rifle: u32,
    pub shotgun: u32,
    pub slashing: u32,
    pub smg: u32,
}

impl Masteries {
    pub fn rank(&self, category: WeaponCategory) -> u32 {
        match category {
            WeaponCategory::Clubbing => self.clubbing,
            WeaponCategory::HeavyArtillery => self.heavy_artillery,
            WeaponCategory::MachineGun => self.machine_gun,
            WeaponCategory::Mechanical => self.mechanical,
            WeaponCategory::Piercing => self.piercing,
            WeaponCategory::Pistol => self.pistol,
            WeaponCategory::Rifle => self.rifle,
            WeaponCategory::Shotgun => self.shotgun,
            WeaponCategory::Slashing => self.slashing,
            WeaponCategory::Smg => self.smg,
            WeaponCategory::Temporary | WeaponCategory::Unarmed => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Merits {
    pub brawn: u32,
    pub sharpness: u32,
    pub protection: u32,
    pub evasion: u32,
    pub critical_hit_rate: u32,
    pub masteries: Masteries,
    pub temporary_mastery: u32,
}

impl Merits {
    /// Stat merit rank for the given stat.
    pub fn stat_rank(&self, stat: Stat) -> u32 {
        match stat {
            Stat::Strength => self.brawn,
            Stat::Speed => self.sharpness,
            Stat::Defense => self.protection,
            Stat::Dexterity => self.evasion,
        }
    }

    /// Mastery rank applying to a weapon of `category` used from `slot`.
    pub fn mastery_for(&self, slot: WeaponSlot, category: WeaponCategory) -> u32 {
        if slot == WeaponSlot::Temporary {
            self.temporary_mastery
        } else {
            self.masteries.rank(category)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Perks {
    pub education: EducationPerks,
    pub faction: FactionPerks,
    pub company: CompanyPerks,
    /// +2% damage from a property upgrade.
    pub property: bool,
    pub merits: Merits,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Combatant {
    pub name: String,
    /// Starting life; defaults to `max_life`.
    pub life: Option<u32>,
    pub max_life: u32,
    pub stats: BattleStats,
    /// Percentage passives per stat.
    pub passives: BattleStats,
    pub weapons: SlotTable<Option<Weapon>>,
    pub armour: ArmourTable<Option<Armour>>,
    pub attack_settings: AttackSettings,
    pub defend_settings: DefendSettings,
    pub perks: Perks,
}

impl Default for Combatant {
    fn default() -> Self {
        Self {
            name: "Player".to_string(),
            life: None,
            max_life: 7_500,
            stats: BattleStats::uniform(10_000.0),
            passives: BattleStats::default(),
            weapons: SlotTable::default(),
            armour: ArmourTable::default(),
            attack_settings: AttackSettings::default(),
            defend_settings: DefendSettings::default(),
            perks: Perks::default(),
        }
    }
}

impl Combatant {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn starting_life(&self) -> u32 {
        self.life.unwrap_or(self.max_life).min(self.max_life.max(1))
    }
}
