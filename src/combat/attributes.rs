//! Folds base stats, passives, perks, mods, injections, statuses and obscuring effects into the
//! effective numbers one action is resolved with.

use serde::Serialize;

use crate::combat::bonuses::bonus_hooks;
use crate::combat::combatant::{BattleStats, CompanyPerks, FactionPerks, Stat};
use crate::combat::engine::{FighterState, FighterTemplate};
use crate::combat::slots::WeaponSlot;
use crate::combat::stacking::{StackContribution, StatStacking};

pub const BASE_CRIT_CHANCE: f64 = 12.0;
/// Stat percentage per stat-merit rank.
pub const STAT_MERIT_PERCENT: f64 = 3.0;
pub const CRIT_MERIT_STEP: f64 = 0.5;
pub const MASTERY_ACCURACY_STEP: f64 = 0.2;
pub const MASTERY_DAMAGE_STEP: f64 = 1.0;
pub const EXPERIENCE_ACCURACY_STEP: f64 = 0.02;
pub const EXPERIENCE_DAMAGE_STEP: f64 = 0.1;
pub const PROPERTY_DAMAGE: f64 = 2.0;

/// Company perks that matter in a fight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CompanyBonus {
    /// Accuracy with primary and secondary weapons.
    pub ranged_accuracy: f64,
    /// Defense percentage.
    pub defense: f64,
    /// Damage percentage with temporary items.
    pub temporary_damage: f64,
    pub amplifies_injections: bool,
}

/// Looks up the perks a company grants at its star rating. Unknown companies grant nothing.
pub fn company_bonus(company: &CompanyPerks) -> CompanyBonus {
    let name = company.name.trim().to_lowercase();
    let stars = company.stars;
    let mut bonus = CompanyBonus::default();
    match name.as_str() {
        "gun shop" if stars >= 7 => bonus.ranged_accuracy = 1.0,
        "private security firm" if stars >= 7 => bonus.defense = 5.0,
        "fireworks stand" if stars >= 5 => bonus.temporary_damage = 25.0,
        "pharmacy" if stars >= 7 => bonus.amplifies_injections = true,
        _ => {}
    }
    bonus
}

fn faction_stat(faction: &FactionPerks, stat: Stat) -> f64 {
    match stat {
        Stat::Strength => faction.strength,
        Stat::Speed => faction.speed,
        Stat::Defense => faction.defense,
        Stat::Dexterity => faction.dexterity,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EffectiveAttributes {
    pub strength: f64,
    pub speed: f64,
    pub defense: f64,
    pub dexterity: f64,
    /// Added to the weapon's display accuracy.
    pub accuracy_bonus: f64,
    /// Damage percentage.
    pub damage_bonus: f64,
    /// Critical hit chance, percent.
    pub crit_chance: f64,
}

/// Effective battle stats of `fighter` before any weapon-specific bonus.
pub fn resolve_stats(fighter: &FighterTemplate, state: &FighterState) -> BattleStats {
    let perks = &fighter.perks;
    let amplified = perks.education.needle_effect || fighter.company.amplifies_injections;
    let mut stacking = StatStacking::new();
    for stat in Stat::ALL {
        stacking.add_many([
            StackContribution::base(stat, fighter.stats.get(stat)),
            StackContribution::modifier(stat, fighter.passives.get(stat)),
            StackContribution::modifier(stat, faction_stat(&perks.faction, stat)),
            StackContribution::modifier(
                stat,
                STAT_MERIT_PERCENT * f64::from(perks.merits.stat_rank(stat)),
            ),
            StackContribution::modifier(stat, state.temporaries.injection_bonus(stat, amplified)),
            StackContribution::modifier(stat, -state.statuses.stat_penalty(stat)),
            StackContribution::multiplier(stat, state.statuses.stat_multiplier(stat)),
            StackContribution::multiplier(stat, state.temporaries.obscure_factor(stat)),
        ]);
    }
    stacking.add(StackContribution::modifier(
        Stat::Dexterity,
        fighter.dexterity_passive,
    ));
    stacking.add(StackContribution::modifier(
        Stat::Defense,
        fighter.company.defense,
    ));

    BattleStats {
        strength: stacking.composed_for(&Stat::Strength),
        speed: stacking.composed_for(&Stat::Speed),
        defense: stacking.composed_for(&Stat::Defense),
        dexterity: stacking.composed_for(&Stat::Dexterity),
    }
}

/// Everything `fighter` attacks with from `slot` against `opponent` in `round`.
pub fn resolve_attributes(
    fighter: &FighterTemplate,
    state: &FighterState,
    slot: WeaponSlot,
    opponent: &FighterTemplate,
    round: u32,
) -> EffectiveAttributes {
    let stats = resolve_stats(fighter, state);
    let prepared = fighter.weapons.get(slot);
    let weapon = &prepared.weapon;
    let mods = &prepared.mods;
    let perks = &fighter.perks;
    let education = &perks.education;
    let mastery = f64::from(perks.merits.mastery_for(slot, weapon.category));

    let mut accuracy_bonus = EXPERIENCE_ACCURACY_STEP * weapon.experience
        + perks.faction.accuracy
        + mods.accuracy
        + MASTERY_ACCURACY_STEP * mastery
        + weapon.ammo.accuracy_bonus()
        - opponent.enemy_accuracy;
    if round == 1 {
        accuracy_bonus += mods.first_turn_accuracy;
    }

    let mut damage_bonus = EXPERIENCE_DAMAGE_STEP * weapon.experience
        + perks.faction.damage
        + mods.damage
        + MASTERY_DAMAGE_STEP * mastery;
    if education.damage {
        damage_bonus += 1.0;
    }
    if perks.property {
        damage_bonus += PROPERTY_DAMAGE;
    }

    match slot {
        WeaponSlot::Primary | WeaponSlot::Secondary => {
            accuracy_bonus += fighter.company.ranged_accuracy;
        }
        WeaponSlot::Melee => {
            if education.melee_damage {
                damage_bonus += 2.0;
            }
        }
        WeaponSlot::Temporary => {
            if education.temporary_accuracy {
                accuracy_bonus += 1.0;
            }
            if education.temporary_damage {
                damage_bonus += 5.0;
            }
            damage_bonus += fighter.company.temporary_damage;
        }
    }

    let mut crit_chance = BASE_CRIT_CHANCE
        + mods.crit_chance
        + CRIT_MERIT_STEP * f64::from(perks.merits.critical_hit_rate);
    if education.critical_hit_rate {
        crit_chance += 3.0;
    }

    let mut strength = stats.strength;
    let mut speed = stats.speed;
    for bonus in &weapon.bonuses {
        let hooks = bonus_hooks(bonus.kind);
        if let Some(hook) = hooks.stat {
            strength = hook.modify_stat(Stat::Strength, strength, bonus.value);
            speed = hook.modify_stat(Stat::Speed, speed, bonus.value);
        }
        if let Some(hook) = hooks.crit {
            crit_chance = hook.modify_crit_chance(crit_chance, bonus.value);
        }
    }

    EffectiveAttributes {
        strength,
        speed,
        defense: stats.defense,
        dexterity: stats.dexterity,
        accuracy_bonus,
        damage_bonus,
        crit_chance: crit_chance.clamp(0.0, 100.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::bonuses::BonusKind;
    use crate::combat::combatant::{Combatant, Weapon, WeaponBonus, WeaponCategory};
    use crate::combat::status::StatusKind;
    use crate::combat::temporary::TempEffectKind;
    use crate::data::game_data::GameData;

    fn prepare(combatant: &Combatant) -> (FighterTemplate, FighterState) {
        let template = FighterTemplate::prepare(combatant, &GameData::builtin());
        let state = FighterState::new(&template);
        (template, state)
    }

    fn company(name: &str, stars: u32) -> CompanyPerks {
        CompanyPerks {
            name: name.into(),
            stars,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn company_table_respects_star_thresholds() {
        let gun_shop = company("Gun Shop", 7);
        assert_eq!(company_bonus(&gun_shop).ranged_accuracy, 1.0);
        let weak = company("Gun Shop", 6);
        assert_eq!(company_bonus(&weak), CompanyBonus::default());
        let pharmacy = company("pharmacy", 10);
        assert!(company_bonus(&pharmacy).amplifies_injections);
        let fireworks = company("Fireworks Stand", 5);
        assert_eq!(company_bonus(&fireworks).temporary_damage, 25.0);
    }

    #[test]
    fn passives_merits_and_faction_stack_additively() {
        let mut combatant = Combatant::default();
        combatant.stats.strength = 1000.0;
        combatant.passives.strength = 10.0;
        combatant.perks.faction.strength = 5.0;
        combatant.perks.merits.brawn = 10;
        let (template, state) = prepare(&combatant);
        let stats = resolve_stats(&template, &state);
        assert!(close(stats.strength, 1450.0));
    }

    #[test]
    fn statuses_and_obscuring_effects_multiply() {
        let mut combatant = Combatant::default();
        combatant.stats.speed = 1000.0;
        combatant.stats.strength = 1000.0;
        let (template, mut state) = prepare(&combatant);
        state.statuses.add(StatusKind::Slow);
        state.statuses.add(StatusKind::Demoralize);
        state.temporaries.add(TempEffectKind::FlashGrenade);
        let stats = resolve_stats(&template, &state);
        assert!(close(stats.speed, 1000.0 * 0.9 * 0.75 * 0.2));
        assert!(close(stats.strength, 900.0));
    }

    #[test]
    fn needle_effect_amplifies_injections() {
        let mut combatant = Combatant::default();
        combatant.stats.strength = 100.0;
        combatant.perks.education.needle_effect = true;
        let (template, mut state) = prepare(&combatant);
        state.temporaries.add(TempEffectKind::Epinephrine);
        assert!(close(resolve_stats(&template, &state).strength, 100.0 * 8.5));
    }

    #[test]
    fn weapon_bonuses_and_perks_feed_accuracy_damage_and_crit() {
        let mut attacker = Combatant::default();
        attacker.weapons.primary = Some(Weapon {
            name: "Rifle".into(),
            category: WeaponCategory::Rifle,
            damage: 50.0,
            accuracy: 55.0,
            experience: 100.0,
            clip_size: 30,
            clips: 2,
            mods: vec!["ACOG Sight".into(), "Hair Trigger".into(), "Laser 100mW".into()],
            bonuses: vec![
                WeaponBonus {
                    kind: BonusKind::Expose,
                    value: 5.0,
                },
                WeaponBonus {
                    kind: BonusKind::Empower,
                    value: 10.0,
                },
            ],
            ..Weapon::fists()
        });
        attacker.perks.merits.masteries.rifle = 5;
        attacker.perks.property = true;
        attacker.perks.company = company("Gun Shop", 7);

        let mut defender = Combatant::default();
        defender.weapons.secondary = Some(Weapon {
            name: "Pistol".into(),
            category: WeaponCategory::Pistol,
            clip_size: 12,
            mods: vec!["Small Light".into()],
            ..Weapon::fists()
        });

        let (attacker, state) = prepare(&attacker);
        let (defender, _) = prepare(&defender);

        let first = resolve_attributes(&attacker, &state, WeaponSlot::Primary, &defender, 1);
        let later = resolve_attributes(&attacker, &state, WeaponSlot::Primary, &defender, 2);
        // 2.0 xp + 1.5 sight + 1.0 mastery + 1.0 gun shop - 3.0 light
        assert!(close(later.accuracy_bonus, 2.5));
        assert!(close(first.accuracy_bonus, 10.0));
        // 10 xp + 2 property + 5 mastery
        assert!(close(later.damage_bonus, 17.0));
        assert!(close(later.crit_chance, 12.0 + 1.0 + 5.0));
        assert!(close(later.strength, 11_000.0));
        assert!(close(later.speed, 10_000.0));

        let melee = resolve_attributes(&attacker, &state, WeaponSlot::Melee, &defender, 2);
        assert!(close(melee.accuracy_bonus, -3.0));
        assert!(close(melee.strength, 10_000.0));
    }
}
