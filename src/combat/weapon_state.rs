//! Per-fight ammunition and temporary-item bookkeeping.

use crate::combat::combatant::{RateOfFire, Weapon};
use crate::combat::rng::Rng;
use crate::combat::slots::{SlotTable, WeaponSlot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmmoStatus {
    Loaded,
    /// Out of rounds with a spare clip and reloading enabled.
    EmptyAutoReload,
    /// Out of rounds for good; the slot is withdrawn.
    EmptyDisabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmmoState {
    pub ammo_left: u32,
    pub max_ammo: u32,
    /// Spare clips still carried.
    pub clips_left: u32,
    pub rate_of_fire: RateOfFire,
}

impl AmmoState {
    pub fn new(clip_size: u32, clips: u32, min_rounds: u32, max_rounds: u32) -> Self {
        Self {
            ammo_left: clip_size,
            max_ammo: clip_size,
            clips_left: clips,
            rate_of_fire: RateOfFire {
                min: min_rounds.min(max_rounds),
                max: max_rounds.max(min_rounds),
            },
        }
    }

    /// `None` for weapons that never use ammunition.
    pub fn for_weapon(weapon: &Weapon) -> Option<Self> {
        weapon.uses_ammo().then(|| {
            Self::new(
                weapon.clip_size,
                weapon.clips,
                weapon.rate_of_fire.min,
                weapon.rate_of_fire.max,
            )
        })
    }

    pub fn status(&self, auto_reload: bool) -> AmmoStatus {
        if self.ammo_left > 0 {
            AmmoStatus::Loaded
        } else if auto_reload && self.clips_left > 0 {
            AmmoStatus::EmptyAutoReload
        } else {
            AmmoStatus::EmptyDisabled
        }
    }

    /// Rounds fired this action: a stochastic rounding of a draw in the rate-of-fire range,
    /// at least one and never more than the rounds loaded.
    pub fn rounds_for_action(&self, rng: &mut Rng) -> u32 {
        rounds_for_action(self.rate_of_fire, rng).min(self.ammo_left.max(1))
    }

    pub fn fire(&mut self, rounds_spent: u32, auto_reload: bool) -> AmmoStatus {
        self.ammo_left = self.ammo_left.saturating_sub(rounds_spent);
        self.status(auto_reload)
    }

    /// Swaps in a spare clip. Returns false when none is left.
    pub fn reload(&mut self) -> bool {
        if self.clips_left == 0 {
            return false;
        }
        self.clips_left -= 1;
        self.ammo_left = self.max_ammo;
        true
    }
}

/// Rate-of-fire draw shared by ammo and ammo-less weapons.
pub fn rounds_for_action(rate: RateOfFire, rng: &mut Rng) -> u32 {
    let lo = f64::from(rate.min.min(rate.max));
    let hi = f64::from(rate.max.max(rate.min));
    let drawn = rng.uniform(lo, hi);
    rng.stochastic_round(drawn).max(1)
}

/// Set once a consumable temporary has been used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TemporaryState {
    pub used: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeaponStates {
    pub ammo: SlotTable<Option<AmmoState>>,
    pub temporary: TemporaryState,
}

impl WeaponStates {
    pub fn new(weapons: &SlotTable<Weapon>) -> Self {
        Self {
            ammo: SlotTable::from_fn(|slot| {
                if slot.is_ranged() {
                    AmmoState::for_weapon(weapons.get(slot))
                } else {
                    None
                }
            }),
            temporary: TemporaryState::default(),
        }
    }

    pub fn ammo(&self, slot: WeaponSlot) -> Option<&AmmoState> {
        self.ammo.get(slot).as_ref()
    }

    pub fn ammo_mut(&mut self, slot: WeaponSlot) -> Option<&mut AmmoState> {
        self.ammo.get_mut(slot).as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn firing_walks_loaded_to_reload_to_disabled() {
        let mut ammo = AmmoState::new(3, 1, 1, 1);
        assert_eq!(ammo.fire(2, true), AmmoStatus::Loaded);
        assert_eq!(ammo.fire(2, true), AmmoStatus::EmptyAutoReload);
        assert_eq!(ammo.ammo_left, 0);
        assert!(ammo.reload());
        assert_eq!((ammo.ammo_left, ammo.clips_left), (3, 0));
        assert_eq!(ammo.fire(3, true), AmmoStatus::EmptyDisabled);
        assert!(!ammo.reload());
    }

    #[test]
    fn empty_without_auto_reload_is_disabled() {
        let mut ammo = AmmoState::new(1, 5, 1, 1);
        assert_eq!(ammo.fire(1, false), AmmoStatus::EmptyDisabled);
    }

    #[test]
    fn rounds_stay_in_range_and_are_capped_by_ammo() {
        let mut rng = Rng::new(11);
        let mut ammo = AmmoState::new(30, 0, 3, 6);
        for _ in 0..1000 {
            let rounds = ammo.rounds_for_action(&mut rng);
            assert!((3..=6).contains(&rounds), "rounds={rounds}");
        }
        ammo.ammo_left = 2;
        for _ in 0..100 {
            assert!(ammo.rounds_for_action(&mut rng) <= 2);
        }
    }

    #[test]
    fn ammo_less_weapons_get_no_ammo_state() {
        let fists = Weapon::fists();
        assert!(AmmoState::for_weapon(&fists).is_none());
        let weapons = SlotTable::from_fn(|_| Weapon::fists());
        let states = WeaponStates::new(&weapons);
        assert!(WeaponSlot::ALL.iter().all(|slot| states.ammo(*slot).is_none()));
        assert_eq!(rounds_for_action(RateOfFire { min: 0, max: 0 }, &mut Rng::new(1)), 1);
    }
}
