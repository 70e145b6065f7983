//! Stacking status effects carried by one fighter for the length of a fight.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::combat::combatant::Stat;
use crate::combat::rng::Rng;

/// Per-stack multiplicative penalty for the single-stat debuffs.
pub const DEBUFF_FACTOR: f64 = 0.75;
/// Per-stack multiplicative bonus for motivation.
pub const BUFF_FACTOR: f64 = 1.1;
/// Percentage points removed from every stat per demoralize stack.
pub const DEMORALIZE_PENALTY: f64 = 10.0;
/// Percentage points removed from speed and dexterity while frozen.
pub const FREEZE_PENALTY: f64 = 50.0;
pub const SUPPRESS_SKIP_CHANCE: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Slow,
    Cripple,
    Weaken,
    Wither,
    Motivation,
    Demoralize,
    Freeze,
    Stun,
    Suppress,
}

impl StatusKind {
    /// Actions the effect lasts after its latest application.
    pub const fn duration(self) -> u32 {
        match self {
            Self::Stun => 1,
            _ => 3,
        }
    }

    pub const fn max_stacks(self) -> u32 {
        match self {
            Self::Slow | Self::Cripple | Self::Weaken | Self::Wither => 3,
            Self::Motivation | Self::Demoralize => 5,
            Self::Freeze | Self::Stun | Self::Suppress => 1,
        }
    }

    /// Stat hit by a single-stat debuff.
    pub const fn debuffed_stat(self) -> Option<Stat> {
        match self {
            Self::Slow => Some(Stat::Speed),
            Self::Cripple => Some(Stat::Dexterity),
            Self::Weaken => Some(Stat::Defense),
            Self::Wither => Some(Stat::Strength),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Slow => "slowed",
            Self::Cripple => "crippled",
            Self::Weaken => "weakened",
            Self::Wither => "withered",
            Self::Motivation => "motivated",
            Self::Demoralize => "demoralized",
            Self::Freeze => "frozen",
            Self::Stun => "stunned",
            Self::Suppress => "suppressed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub remaining_turns: u32,
    pub stacks: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusEffects {
    active: BTreeMap<StatusKind, StatusEffect>,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refreshes the turn counter and adds one stack up to the cap.
    pub fn add(&mut self, kind: StatusKind) {
        self.add_for(kind, kind.duration());
    }

    /// Like [StatusEffects::add] with an explicit duration.
    pub fn add_for(&mut self, kind: StatusKind, turns: u32) {
        if turns == 0 {
            return;
        }
        let effect = self.active.entry(kind).or_insert(StatusEffect {
            remaining_turns: 0,
            stacks: 0,
        });
        effect.remaining_turns = effect.remaining_turns.max(turns);
        effect.stacks = (effect.stacks + 1).min(kind.max_stacks());
    }

    pub fn stacks(&self, kind: StatusKind) -> u32 {
        self.active.get(&kind).map_or(0, |effect| effect.stacks)
    }

    pub fn get(&self, kind: StatusKind) -> Option<StatusEffect> {
        self.active.get(&kind).copied()
    }

    pub fn is_active(&self, kind: StatusKind) -> bool {
        self.active.contains_key(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// One action elapses for every effect; effects at zero are removed.
    pub fn tick(&mut self) {
        self.active.retain(|_, effect| {
            effect.remaining_turns = effect.remaining_turns.saturating_sub(1);
            effect.remaining_turns > 0
        });
    }

    /// Whether this action is lost. Stun always skips; suppress skips a quarter of the time.
    pub fn skips_action(&self, rng: &mut Rng) -> bool {
        if self.is_active(StatusKind::Stun) {
            return true;
        }
        self.is_active(StatusKind::Suppress) && rng.chance(SUPPRESS_SKIP_CHANCE)
    }

    /// Multiplicative factor on `stat` from debuff and buff stacks.
    pub fn stat_multiplier(&self, stat: Stat) -> f64 {
        let mut factor = BUFF_FACTOR.powi(self.stacks(StatusKind::Motivation) as i32);
        for kind in [
            StatusKind::Slow,
            StatusKind::Cripple,
            StatusKind::Weaken,
            StatusKind::Wither,
        ] {
            if kind.debuffed_stat() == Some(stat) {
                factor *= DEBUFF_FACTOR.powi(self.stacks(kind) as i32);
            }
        }
        factor
    }

    /// Percentage points subtracted from `stat` by global debuffs.
    pub fn stat_penalty(&self, stat: Stat) -> f64 {
        let demoralize = DEMORALIZE_PENALTY * f64::from(self.stacks(StatusKind::Demoralize));
        let freeze = match stat {
            Stat::Speed | Stat::Dexterity => {
                FREEZE_PENALTY * f64::from(self.stacks(StatusKind::Freeze))
            }
            _ => 0.0,
        };
        demoralize + freeze
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_refreshes_and_caps_stacks() {
        let mut effects = StatusEffects::new();
        for _ in 0..5 {
            effects.add(StatusKind::Slow);
        }
        assert_eq!(effects.stacks(StatusKind::Slow), 3);
        effects.tick();
        assert_eq!(effects.get(StatusKind::Slow).map(|e| e.remaining_turns), Some(2));
        effects.add(StatusKind::Slow);
        assert_eq!(effects.get(StatusKind::Slow).map(|e| e.remaining_turns), Some(3));

        for _ in 0..10 {
            effects.add(StatusKind::Motivation);
        }
        assert_eq!(effects.stacks(StatusKind::Motivation), 5);
    }

    #[test]
    fn effects_are_removed_when_turns_run_out() {
        let mut effects = StatusEffects::new();
        effects.add(StatusKind::Stun);
        assert!(effects.is_active(StatusKind::Stun));
        effects.tick();
        assert!(!effects.is_active(StatusKind::Stun));
        assert!(effects.is_empty());
    }

    #[test]
    fn multipliers_compound_per_stack() {
        let mut effects = StatusEffects::new();
        effects.add(StatusKind::Slow);
        effects.add(StatusKind::Slow);
        effects.add(StatusKind::Motivation);
        let speed = effects.stat_multiplier(Stat::Speed);
        assert!((speed - 0.75 * 0.75 * 1.1).abs() < 1e-12);
        assert!((effects.stat_multiplier(Stat::Strength) - 1.1).abs() < 1e-12);
    }

    #[test]
    fn global_penalties_scale_with_stacks() {
        let mut effects = StatusEffects::new();
        effects.add(StatusKind::Demoralize);
        effects.add(StatusKind::Demoralize);
        effects.add(StatusKind::Freeze);
        assert_eq!(effects.stat_penalty(Stat::Strength), 20.0);
        assert_eq!(effects.stat_penalty(Stat::Speed), 70.0);
    }

    #[test]
    fn stun_always_skips_and_suppress_sometimes_skips() {
        let mut rng = Rng::new(17);
        let mut stunned = StatusEffects::new();
        stunned.add(StatusKind::Stun);
        assert!((0..100).all(|_| stunned.skips_action(&mut rng)));

        let mut suppressed = StatusEffects::new();
        suppressed.add(StatusKind::Suppress);
        let skips = (0..10_000).filter(|_| suppressed.skips_action(&mut rng)).count();
        assert!((2_200..2_800).contains(&skips), "skips={skips}");

        let clear = StatusEffects::new();
        assert!(!(0..100).any(|_| clear.skips_action(&mut rng)));
    }
}
