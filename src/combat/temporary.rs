//! Timed effects from temporary items: injections on the user, obscuring items on the target.

use serde::{Deserialize, Serialize};

use crate::combat::combatant::Stat;

pub const INJECTION_DURATION: u32 = 3;
pub const OBSCURE_DURATION: u32 = 3;
/// Same-category obscuring effects count at most this many stages.
pub const MAX_OBSCURE_STAGES: usize = 2;
/// Injection amplification from the needle-effect perk.
pub const NEEDLE_EFFECT_FACTOR: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TempEffectKind {
    Epinephrine,
    Melatonin,
    Serotonin,
    Tyrosine,
    FlashGrenade,
    Sand,
    SmokeGrenade,
    ConcussionGrenade,
    PepperSpray,
    TearGas,
}

/// Which stat an obscuring item clouds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObscureCategory {
    Vision,
    Balance,
}

impl TempEffectKind {
    /// Maps a temporary item name onto its effect, if it has one.
    pub fn from_item_name(name: &str) -> Option<Self> {
        let key: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "epinephrine" => Some(Self::Epinephrine),
            "melatonin" => Some(Self::Melatonin),
            "serotonin" => Some(Self::Serotonin),
            "tyrosine" => Some(Self::Tyrosine),
            "flashgrenade" => Some(Self::FlashGrenade),
            "sand" => Some(Self::Sand),
            "smokegrenade" => Some(Self::SmokeGrenade),
            "concussiongrenade" => Some(Self::ConcussionGrenade),
            "pepperspray" => Some(Self::PepperSpray),
            "teargas" => Some(Self::TearGas),
            _ => None,
        }
    }

    pub const ALL: [TempEffectKind; 10] = [
        Self::Epinephrine,
        Self::Melatonin,
        Self::Serotonin,
        Self::Tyrosine,
        Self::FlashGrenade,
        Self::Sand,
        Self::SmokeGrenade,
        Self::ConcussionGrenade,
        Self::PepperSpray,
        Self::TearGas,
    ];

    pub const fn item_name(self) -> &'static str {
        match self {
            Self::Epinephrine => "Epinephrine",
            Self::Melatonin => "Melatonin",
            Self::Serotonin => "Serotonin",
            Self::Tyrosine => "Tyrosine",
            Self::FlashGrenade => "Flash Grenade",
            Self::Sand => "Sand",
            Self::SmokeGrenade => "Smoke Grenade",
            Self::ConcussionGrenade => "Concussion Grenade",
            Self::PepperSpray => "Pepper Spray",
            Self::TearGas => "Tear Gas",
        }
    }

    /// Stat boosted by an injection, with its percentage.
    pub const fn injection(self) -> Option<(Stat, f64)> {
        match self {
            Self::Epinephrine => Some((Stat::Strength, 500.0)),
            Self::Melatonin => Some((Stat::Speed, 500.0)),
            Self::Serotonin => Some((Stat::Defense, 300.0)),
            Self::Tyrosine => Some((Stat::Dexterity, 500.0)),
            _ => None,
        }
    }

    pub const fn is_injection(self) -> bool {
        self.injection().is_some()
    }

    pub const fn obscure_category(self) -> Option<ObscureCategory> {
        match self {
            Self::FlashGrenade | Self::Sand | Self::SmokeGrenade => Some(ObscureCategory::Vision),
            Self::ConcussionGrenade | Self::PepperSpray | Self::TearGas => {
                Some(ObscureCategory::Balance)
            }
            _ => None,
        }
    }

    /// Stat factor at one and two stages.
    pub fn stage_factors(self) -> (f64, f64) {
        match self {
            Self::SmokeGrenade | Self::TearGas => (1.0 / 3.0, 2.0 / 9.0),
            Self::FlashGrenade | Self::Sand | Self::ConcussionGrenade | Self::PepperSpray => {
                (1.0 / 5.0, 3.0 / 25.0)
            }
            _ => (1.0, 1.0),
        }
    }

    pub fn duration(self) -> u32 {
        if self.is_injection() {
            INJECTION_DURATION
        } else {
            OBSCURE_DURATION
        }
    }
}

impl ObscureCategory {
    pub const fn stat(self) -> Stat {
        match self {
            Self::Vision => Stat::Speed,
            Self::Balance => Stat::Dexterity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TempEffect {
    pub kind: TempEffectKind,
    pub remaining_turns: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemporaryEffects {
    entries: Vec<TempEffect>,
}

impl TemporaryEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[TempEffect] {
        &self.entries
    }

    /// Injections refresh an active entry of the same kind. Obscuring effects stack up to two
    /// entries per category; a further application refreshes the entry closest to expiry.
    pub fn add(&mut self, kind: TempEffectKind) {
        let turns = kind.duration();
        if let Some(category) = kind.obscure_category() {
            let same_category: Vec<usize> = self
                .entries
                .iter()
                .enumerate()
                .filter(|(_, e)| e.kind.obscure_category() == Some(category))
                .map(|(i, _)| i)
                .collect();
            if same_category.len() < MAX_OBSCURE_STAGES {
                self.entries.push(TempEffect {
                    kind,
                    remaining_turns: turns,
                });
            } else if let Some(&oldest) = same_category
                .iter()
                .min_by_key(|&&i| self.entries[i].remaining_turns)
            {
                self.entries[oldest] = TempEffect {
                    kind,
                    remaining_turns: turns,
                };
            }
            return;
        }
        match self.entries.iter_mut().find(|e| e.kind == kind) {
            Some(entry) => entry.remaining_turns = turns,
            None => self.entries.push(TempEffect {
                kind,
                remaining_turns: turns,
            }),
        }
    }

    pub fn tick(&mut self) {
        self.entries.retain_mut(|entry| {
            entry.remaining_turns = entry.remaining_turns.saturating_sub(1);
            entry.remaining_turns > 0
        });
    }

    /// Percentage points granted to `stat` by active injections.
    pub fn injection_bonus(&self, stat: Stat, amplified: bool) -> f64 {
        let amp = if amplified { NEEDLE_EFFECT_FACTOR } else { 1.0 };
        self.entries
            .iter()
            .filter_map(|e| e.kind.injection())
            .filter(|(boosted, _)| *boosted == stat)
            .map(|(_, percent)| percent * amp)
            .sum()
    }

    /// Multiplier on `stat` from active obscuring effects.
    pub fn obscure_factor(&self, stat: Stat) -> f64 {
        let mut factor = 1.0;
        for category in [ObscureCategory::Vision, ObscureCategory::Balance] {
            if category.stat() != stat {
                continue;
            }
            let mut kinds: Vec<TempEffectKind> = self
                .entries
                .iter()
                .map(|e| e.kind)
                .filter(|k| k.obscure_category() == Some(category))
                .collect();
            if kinds.is_empty() {
                continue;
            }
            // Strongest effect sets the stage factors.
            kinds.sort_by(|a, b| a.stage_factors().0.total_cmp(&b.stage_factors().0));
            let (one, two) = kinds[0].stage_factors();
            factor *= if kinds.len() >= MAX_OBSCURE_STAGES { two } else { one };
        }
        factor
    }
}

/// How a temporary-slot item behaves when used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporaryItem {
    /// Unarmed fallback; strikes the chest like other damaging items and is never used up.
    Kick,
    /// Buffs the user, no damage.
    Injection(TempEffectKind),
    /// Debuffs the target unless its head armour blocks it, no damage.
    Obscuring(TempEffectKind),
    /// Thrown weapon that rolls body parts like a regular attack.
    Thrown,
    /// Anything else: one attack that always strikes the chest, then used up.
    Damaging,
}

impl TemporaryItem {
    pub fn classify(name: &str) -> Self {
        let key: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "kick" => return Self::Kick,
            "throwingknife" | "ninjastars" | "ninjastar" => return Self::Thrown,
            _ => {}
        }
        match TempEffectKind::from_item_name(name) {
            Some(kind) if kind.is_injection() => Self::Injection(kind),
            Some(kind) => Self::Obscuring(kind),
            None => Self::Damaging,
        }
    }

    pub const fn is_consumed(self) -> bool {
        !matches!(self, Self::Kick)
    }

    /// Chest-only strike at 1/1.75. Thrown items roll body parts instead.
    pub const fn forces_chest(self) -> bool {
        matches!(self, Self::Kick | Self::Damaging)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_names_map_to_effects() {
        assert_eq!(TempEffectKind::from_item_name("Tear Gas"), Some(TempEffectKind::TearGas));
        assert_eq!(
            TempEffectKind::from_item_name("flash-grenade"),
            Some(TempEffectKind::FlashGrenade)
        );
        assert_eq!(TempEffectKind::from_item_name("HEG"), None);
    }

    #[test]
    fn reapplying_an_injection_refreshes_instead_of_stacking() {
        let mut temps = TemporaryEffects::new();
        temps.add(TempEffectKind::Epinephrine);
        temps.tick();
        temps.add(TempEffectKind::Epinephrine);
        assert_eq!(temps.entries().len(), 1);
        assert_eq!(temps.entries()[0].remaining_turns, INJECTION_DURATION);
        assert_eq!(temps.injection_bonus(Stat::Strength, false), 500.0);
        assert_eq!(temps.injection_bonus(Stat::Strength, true), 750.0);
        assert_eq!(temps.injection_bonus(Stat::Speed, false), 0.0);
    }

    #[test]
    fn flash_stages_cap_at_two() {
        let mut temps = TemporaryEffects::new();
        temps.add(TempEffectKind::FlashGrenade);
        assert!((temps.obscure_factor(Stat::Speed) - 0.2).abs() < 1e-12);
        temps.add(TempEffectKind::FlashGrenade);
        assert!((temps.obscure_factor(Stat::Speed) - 0.12).abs() < 1e-12);
        temps.add(TempEffectKind::Sand);
        assert_eq!(temps.entries().len(), 2);
        assert!((temps.obscure_factor(Stat::Speed) - 0.12).abs() < 1e-12);
        assert_eq!(temps.obscure_factor(Stat::Dexterity), 1.0);
    }

    #[test]
    fn smoke_and_tear_gas_use_third_stages() {
        let mut temps = TemporaryEffects::new();
        temps.add(TempEffectKind::SmokeGrenade);
        temps.add(TempEffectKind::TearGas);
        temps.add(TempEffectKind::TearGas);
        assert!((temps.obscure_factor(Stat::Speed) - 1.0 / 3.0).abs() < 1e-12);
        assert!((temps.obscure_factor(Stat::Dexterity) - 2.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn items_classify_by_behaviour() {
        assert_eq!(TemporaryItem::classify("Kick"), TemporaryItem::Kick);
        assert_eq!(TemporaryItem::classify("Ninja Stars"), TemporaryItem::Thrown);
        assert_eq!(TemporaryItem::classify("Throwing Knife"), TemporaryItem::Thrown);
        assert_eq!(
            TemporaryItem::classify("Melatonin"),
            TemporaryItem::Injection(TempEffectKind::Melatonin)
        );
        assert_eq!(
            TemporaryItem::classify("Smoke Grenade"),
            TemporaryItem::Obscuring(TempEffectKind::SmokeGrenade)
        );
        let heg = TemporaryItem::classify("HEG");
        assert_eq!(heg, TemporaryItem::Damaging);
        assert!(heg.forces_chest() && heg.is_consumed());
        assert!(TemporaryItem::Kick.forces_chest() && !TemporaryItem::Kick.is_consumed());
        assert!(!TemporaryItem::Thrown.forces_chest());
    }

    #[test]
    fn effects_expire() {
        let mut temps = TemporaryEffects::new();
        temps.add(TempEffectKind::PepperSpray);
        for _ in 0..OBSCURE_DURATION {
            temps.tick();
        }
        assert!(temps.entries().is_empty());
        assert_eq!(temps.obscure_factor(Stat::Dexterity), 1.0);
    }
}
