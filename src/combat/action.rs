//! One combatant's action: slot choice, reload, temporary items and the full damage pipeline.

use crate::combat::armour::{apply_armour_effects, armour_for_hit, ArmourEffectContext};
use crate::combat::attributes::{resolve_attributes, resolve_stats};
use crate::combat::bonuses::{bonus_hooks, AmmoPlan, BonusContext, SideEffect};
use crate::combat::damage::{
    apply_accuracy, defense_mitigation, finalize_damage, hit_chance, max_damage, roll_hit,
    select_body_part, variance, DamageInputs,
};
use crate::combat::engine::{BattleLog, FighterState, FighterTemplate, Side};
use crate::combat::rng::Rng;
use crate::combat::slots::{BodyPart, SlotTable, WeaponSlot};
use crate::combat::status::StatusKind;
use crate::combat::temporary::TemporaryItem;
use crate::combat::weapon_state::{rounds_for_action, AmmoStatus};

/// Neck-damage education perk on throat hits.
pub const NECK_DAMAGE_FACTOR: f64 = 1.1;

/// Lowest non-zero priority wins; the first slot wins ties. Primary when nothing is enabled.
pub fn choose_attacker_slot(priority: &SlotTable<u32>) -> WeaponSlot {
    let mut best: Option<(WeaponSlot, u32)> = None;
    for (slot, &value) in priority.iter() {
        if value == 0 {
            continue;
        }
        if best.map_or(true, |(_, current)| value < current) {
            best = Some((slot, value));
        }
    }
    best.map_or(WeaponSlot::Primary, |(slot, _)| slot)
}

/// Weighted draw in `[1, total + 1]` over primary, secondary, melee, temporary. The draw past
/// every band lands on temporary.
pub fn choose_defender_slot(weights: &SlotTable<u32>, rng: &mut Rng) -> WeaponSlot {
    let total: u64 = weights.iter().map(|(_, &w)| u64::from(w)).sum();
    let draw = rng.roll_u64(1, total + 1);
    let mut upper = 0u64;
    for (slot, &weight) in weights.iter() {
        if weight == 0 {
            continue;
        }
        upper += u64::from(weight);
        if draw <= upper {
            return slot;
        }
    }
    WeaponSlot::Temporary
}

/// Everything one action reads and mutates.
pub struct Turn<'a> {
    pub side: Side,
    pub round: u32,
    pub actor: &'a FighterTemplate,
    pub target: &'a FighterTemplate,
    pub actor_state: &'a mut FighterState,
    pub target_state: &'a mut FighterState,
    pub log: &'a mut BattleLog,
}

impl Turn<'_> {
    fn record(&mut self, message: impl FnOnce() -> String) {
        self.log.record(self.round, self.side, message);
    }

    fn auto_reload(&self, slot: WeaponSlot) -> bool {
        match self.side {
            Side::Attacker => *self.actor.attack_settings.reload.get(slot),
            Side::Defender => *self.actor.defend_settings.reload.get(slot),
        }
    }

    fn choose_slot(&self, rng: &mut Rng) -> WeaponSlot {
        match self.side {
            Side::Attacker => choose_attacker_slot(&self.actor_state.priority),
            Side::Defender => choose_defender_slot(&self.actor_state.weight, rng),
        }
    }

    /// Ticks the actor's DOT channels against the target.
    fn tick_dots(&mut self) {
        if self.target_state.life == 0 {
            return;
        }
        for tick in self.actor_state.dots.tick(self.target_state.life) {
            self.target_state.life = self.target_state.life.saturating_sub(tick.damage);
            let (name, target) = (&self.actor.name, &self.target.name);
            let (channel, damage) = (tick.channel.label(), tick.damage);
            self.log.record(self.round, self.side, || {
                format!("{name}'s {channel} dealt {damage} damage to {target}")
            });
        }
    }

    fn end_action(&mut self) {
        self.actor_state.statuses.tick();
        self.actor_state.temporaries.tick();
    }

    fn use_up_temporary(&mut self) {
        self.actor_state.weapons.temporary.used = true;
        self.actor_state.disable_slot(WeaponSlot::Temporary);
    }
}

/// Resolves one action for `turn.actor`.
pub fn resolve_action(mut turn: Turn<'_>, rng: &mut Rng) {
    if turn.actor_state.statuses.skips_action(rng) {
        if !turn.actor_state.statuses.is_active(StatusKind::Stun) {
            let name = &turn.actor.name;
            turn.log
                .record(turn.round, turn.side, || format!("{name} is suppressed and does nothing"));
        }
        turn.end_action();
        return;
    }

    let mut slot = turn.choose_slot(rng);
    let auto_reload = turn.auto_reload(slot);
    if let Some(ammo) = turn.actor_state.weapons.ammo_mut(slot) {
        match ammo.status(auto_reload) {
            AmmoStatus::Loaded => {}
            AmmoStatus::EmptyAutoReload => {
                ammo.reload();
                let name = &turn.actor.name;
                let weapon = &turn.actor.weapon(slot).name;
                turn.log
                    .record(turn.round, turn.side, || format!("{name} reloaded their {weapon}"));
                turn.tick_dots();
                turn.end_action();
                return;
            }
            AmmoStatus::EmptyDisabled => {
                turn.actor_state.disable_slot(slot);
                slot = WeaponSlot::Melee;
            }
        }
    }
    if slot == WeaponSlot::Temporary && turn.actor_state.weapons.temporary.used {
        slot = WeaponSlot::Melee;
    }

    if slot == WeaponSlot::Temporary {
        let item = turn.actor.temporary_item;
        match item {
            TemporaryItem::Injection(kind) => {
                turn.actor_state.temporaries.add(kind);
                let name = &turn.actor.name;
                turn.log.record(turn.round, turn.side, || {
                    format!("{name} injected {}", kind.item_name())
                });
            }
            TemporaryItem::Obscuring(kind) => {
                let name = &turn.actor.name;
                let target = &turn.target.name;
                if turn.target.blocks(kind) {
                    turn.log.record(turn.round, turn.side, || {
                        format!("{name} used {} but {target}'s mask blocked it", kind.item_name())
                    });
                } else {
                    turn.target_state.temporaries.add(kind);
                    turn.log.record(turn.round, turn.side, || {
                        format!("{name} used {} on {target}", kind.item_name())
                    });
                }
            }
            TemporaryItem::Kick | TemporaryItem::Thrown | TemporaryItem::Damaging => {
                attack(&mut turn, slot, rng);
            }
        }
        if item.is_consumed() {
            turn.use_up_temporary();
        }
    } else {
        attack(&mut turn, slot, rng);
    }

    turn.tick_dots();
    turn.end_action();
}

fn attack(turn: &mut Turn<'_>, slot: WeaponSlot, rng: &mut Rng) {
    let actor = turn.actor;
    let target = turn.target;
    let weapon = actor.weapon(slot);
    let attrs = resolve_attributes(actor, turn.actor_state, slot, target, turn.round);
    let defense = resolve_stats(target, turn.target_state);

    let plan = match turn.actor_state.weapons.ammo(slot) {
        Some(ammo) => {
            let mut plan = AmmoPlan::new(ammo.rounds_for_action(rng));
            for bonus in &weapon.bonuses {
                if let Some(hook) = bonus_hooks(bonus.kind).ammo {
                    plan = hook.modify_ammo(plan, bonus.value, ammo, rng);
                }
            }
            Some(plan)
        }
        None if slot.is_ranged() => {
            Some(AmmoPlan::new(rounds_for_action(weapon.rate_of_fire, rng)))
        }
        None => None,
    };

    let verb = match plan {
        Some(plan) if !weapon.is_unarmed() => {
            let noun = if plan.rounds_fired == 1 { "round" } else { "rounds" };
            format!("fired {} {noun} of their {}", plan.rounds_fired, weapon.name)
        }
        _ => format!("used their {}", weapon.name),
    };

    let chance = apply_accuracy(
        hit_chance(attrs.speed, defense.dexterity),
        weapon.accuracy + attrs.accuracy_bonus,
    );
    if !roll_hit(chance, rng) {
        turn.record(|| format!("{} {verb} and missed {}", actor.name, target.name));
        spend_ammo(turn, slot, plan);
        return;
    }

    let part = if slot == WeaponSlot::Temporary && actor.temporary_item.forces_chest() {
        BodyPart::Chest
    } else {
        select_body_part(attrs.crit_chance, rng)
    };
    let mut body_multiplier = part.multiplier();
    if part == BodyPart::Throat && actor.perks.education.neck_damage {
        body_multiplier *= NECK_DAMAGE_FACTOR;
    }

    let mut armour_value = armour_for_hit(&target.armour_candidates(part), rng)
        .map_or(0.0, |piece| piece.value);
    for bonus in &weapon.bonuses {
        if let Some(hook) = bonus_hooks(bonus.kind).armour {
            armour_value = hook.modify_armour(armour_value, bonus.value, rng);
        }
    }

    let inputs = DamageInputs {
        body_multiplier,
        max_damage: max_damage(attrs.strength),
        mitigation: defense_mitigation(defense.defense, attrs.strength),
        weapon_damage: weapon.damage,
        armour_mitigation: armour_value,
        penetration: weapon.ammo.penetration_factor(),
        variance: variance(rng),
        damage_bonus: attrs.damage_bonus,
        ammo_multiplier: weapon.ammo.damage_multiplier()
            * plan.map_or(1.0, |plan| plan.damage_multiplier),
    };

    let ctx = BonusContext {
        slot,
        round: turn.round,
        body_part: part,
        critical: part.is_critical(),
        wielder_life: turn.actor_state.life,
        wielder_max_life: actor.max_life,
        target_life: turn.target_state.life,
        target_max_life: target.max_life,
    };
    let mut raw = inputs.raw_damage();
    for bonus in &weapon.bonuses {
        let hooks = bonus_hooks(bonus.kind);
        if let Some(hook) = hooks.damage {
            raw = hook.modify_damage(raw, bonus.value, &ctx);
        }
        if let Some(hook) = hooks.crit {
            raw = hook.modify_crit_damage(raw, bonus.value, &ctx);
        }
    }
    let armour_ctx = ArmourEffectContext {
        attacker_slot: slot,
        wearer_life: turn.target_state.life,
        wearer_max_life: target.max_life,
    };
    raw = apply_armour_effects(raw, &target.armour_effects(part), &armour_ctx, rng);

    let damage = finalize_damage(raw, turn.target_state.life);
    turn.target_state.life -= damage;
    turn.record(|| {
        let crit = if ctx.critical { " (critical)" } else { "" };
        format!(
            "{} {verb} and hit {} in the {} for {damage}{crit}",
            actor.name,
            target.name,
            part.label()
        )
    });

    for bonus in &weapon.bonuses {
        let Some(hook) = bonus_hooks(bonus.kind).post_damage else {
            continue;
        };
        if let Some(effect) = hook.after_damage(f64::from(damage), bonus.value, rng) {
            apply_side_effect(turn, effect);
        }
    }

    spend_ammo(turn, slot, plan);
}

fn spend_ammo(turn: &mut Turn<'_>, slot: WeaponSlot, plan: Option<AmmoPlan>) {
    let Some(plan) = plan else {
        return;
    };
    let auto_reload = turn.auto_reload(slot);
    let Some(ammo) = turn.actor_state.weapons.ammo_mut(slot) else {
        return;
    };
    if ammo.fire(plan.rounds_spent, auto_reload) == AmmoStatus::EmptyDisabled {
        turn.actor_state.disable_slot(slot);
    }
}

fn apply_side_effect(turn: &mut Turn<'_>, effect: SideEffect) {
    let actor = turn.actor;
    match effect {
        SideEffect::Heal(amount) => {
            let missing = actor.max_life.saturating_sub(turn.actor_state.life);
            let healed = finalize_damage(amount, missing);
            if healed > 0 {
                turn.actor_state.life += healed;
                turn.record(|| format!("{} recovered {healed} life", actor.name));
            }
        }
        SideEffect::TargetStatus(kind) => {
            turn.target_state.statuses.add(kind);
            let target = turn.target;
            turn.record(|| format!("{} left {} {}", actor.name, target.name, kind.label()));
        }
        SideEffect::WielderStatus(kind) => {
            turn.actor_state.statuses.add(kind);
            turn.record(|| format!("{} is {}", actor.name, kind.label()));
        }
        SideEffect::Dot(channel, magnitude) => {
            if turn.actor_state.dots.apply(channel, magnitude) {
                let target = turn.target;
                turn.record(|| {
                    format!("{} inflicted {} on {}", actor.name, channel.label(), target.name)
                });
            }
        }
    }
}
