pub mod action;
pub mod armour;
pub mod attributes;
pub mod bonuses;
pub mod combatant;
pub mod damage;
pub mod dot;
pub mod engine;
pub mod rng;
pub mod slots;
pub mod stacking;
pub mod status;
pub mod temporary;
pub mod weapon_state;

pub use action::{choose_attacker_slot, choose_defender_slot, resolve_action, Turn};
pub use armour::{
    apply_armour_effects, armour_for_hit, coverage_bands, rank_candidates, select_armour,
    ArmourBand, ArmourCandidate, ArmourEffectKind, ARMOUR_DRAW_MAX,
};
pub use attributes::{
    company_bonus, resolve_attributes, resolve_stats, CompanyBonus, EffectiveAttributes,
};
pub use bonuses::{bonus_hooks, BonusKind};
pub use combatant::{
    AmmoType, Armour, ArmourEffect, AttackSettings, BattleStats, Combatant, CompanyPerks,
    DefendSettings, EducationPerks, FactionPerks, Masteries, Merits, Perks, RateOfFire, Stat,
    Weapon, WeaponBonus, WeaponCategory,
};
pub use engine::{
    run_fight, simulate_fight, BattleEvent, BattleLog, FightOutcome, FightState, FighterState,
    FighterTemplate, Side, TraceMode, MAX_ROUNDS,
};
pub use rng::Rng;
pub use slots::{ArmourSlot, ArmourTable, BodyPart, SlotTable, WeaponSlot};
pub use stacking::{CategoryTotals, StackCategory, StackContribution, StatStacking};
pub use status::{StatusEffects, StatusKind};
pub use temporary::{TempEffectKind, TemporaryEffects, TemporaryItem};
