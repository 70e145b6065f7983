//! Fight orchestration.
//!
//! A [FighterTemplate] is prepared once per simulation request from a [Combatant] and the
//! game-data tables, then shared read-only by every trial. Each fight builds fresh
//! [FighterState]s from the templates, so nothing mutable survives from one fight to the next.

use serde::Serialize;

use crate::combat::action::{resolve_action, Turn};
use crate::combat::armour::{ArmourCandidate, ArmourEffectKind};
use crate::combat::attributes::{company_bonus, CompanyBonus};
use crate::combat::bonuses::bonus_hooks;
use crate::combat::combatant::{
    Armour, AttackSettings, BattleStats, Combatant, DefendSettings, Perks, Weapon,
};
use crate::combat::dot::DotState;
use crate::combat::rng::Rng;
use crate::combat::slots::{ArmourSlot, ArmourTable, BodyPart, SlotTable, WeaponSlot};
use crate::combat::status::StatusEffects;
use crate::combat::temporary::{TempEffectKind, TemporaryEffects, TemporaryItem};
use crate::combat::weapon_state::WeaponStates;
use crate::data::game_data::{GameDataSource, ModData};

pub const MAX_ROUNDS: u32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Attacker,
    Defender,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceMode {
    #[default]
    Off,
    Events,
}

/// One battle-log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BattleEvent {
    pub round: u32,
    pub actor: Side,
    pub message: String,
}

/// Collects battle-log lines when enabled; otherwise drops them without formatting.
#[derive(Debug, Clone, Default)]
pub struct BattleLog {
    enabled: bool,
    events: Vec<BattleEvent>,
}

impl BattleLog {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            events: Vec::new(),
        }
    }

    pub fn record(&mut self, round: u32, actor: Side, message: impl FnOnce() -> String) {
        if self.enabled {
            self.events.push(BattleEvent {
                round,
                actor,
                message: message(),
            });
        }
    }

    pub fn into_events(self) -> Vec<BattleEvent> {
        self.events
    }
}

/// A slot's weapon after defaults and mod lookups are resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedWeapon {
    pub weapon: Weapon,
    /// Summed mod effects; always empty outside primary and secondary.
    pub mods: ModData,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FighterTemplate {
    pub name: String,
    pub max_life: u32,
    pub starting_life: u32,
    pub stats: BattleStats,
    pub passives: BattleStats,
    pub weapons: SlotTable<PreparedWeapon>,
    pub temporary_item: TemporaryItem,
    pub armour: ArmourTable<Option<Armour>>,
    /// Coverage per body part (indexed by [BodyPart::index]) per armour slot.
    pub coverage: Vec<ArmourTable<f64>>,
    /// Obscuring items the head armour stops.
    pub blocked_items: Vec<TempEffectKind>,
    pub attack_settings: AttackSettings,
    pub defend_settings: DefendSettings,
    pub perks: Perks,
    pub company: CompanyBonus,
    /// Accuracy removed from opponents by mods on equipped ranged weapons.
    pub enemy_accuracy: f64,
    /// Dexterity percentage from mods on equipped ranged weapons.
    pub dexterity_passive: f64,
}

impl FighterTemplate {
    pub fn prepare(combatant: &Combatant, data: &impl GameDataSource) -> Self {
        let weapons = SlotTable::from_fn(|slot| {
            let weapon = combatant
                .weapons
                .get(slot)
                .clone()
                .unwrap_or_else(|| data.default_weapon(slot));
            let mut mods = ModData::default();
            if slot.is_ranged() {
                for name in &weapon.mods {
                    if let Some(effects) = data.mod_effects(name) {
                        mods += effects;
                    }
                }
            }
            PreparedWeapon { weapon, mods }
        });
        let armour = ArmourTable::from_fn(|slot| {
            combatant
                .armour
                .get(slot)
                .clone()
                .or_else(|| data.default_armour(slot))
        });
        let coverage = BodyPart::ALL
            .iter()
            .map(|part| {
                ArmourTable::from_fn(|slot| {
                    armour
                        .get(slot)
                        .as_ref()
                        .map_or(0.0, |piece| data.armour_coverage(*part, &piece.name))
                })
            })
            .collect();
        let blocked_items = match armour.get(ArmourSlot::Head) {
            Some(head) => TempEffectKind::ALL
                .into_iter()
                .filter(|kind| kind.obscure_category().is_some())
                .filter(|kind| data.can_armour_block(kind.item_name(), &head.name))
                .collect(),
            None => Vec::new(),
        };
        let ranged_mods = [WeaponSlot::Primary, WeaponSlot::Secondary].map(|s| weapons.get(s).mods);
        let temporary_item = TemporaryItem::classify(&weapons.temporary.weapon.name);

        Self {
            name: combatant.name.clone(),
            max_life: combatant.max_life.max(1),
            starting_life: combatant.starting_life(),
            stats: combatant.stats,
            passives: combatant.passives,
            temporary_item,
            weapons,
            armour,
            coverage,
            blocked_items,
            attack_settings: combatant.attack_settings,
            defend_settings: combatant.defend_settings,
            perks: combatant.perks.clone(),
            company: company_bonus(&combatant.perks.company),
            enemy_accuracy: ranged_mods.iter().map(|m| m.enemy_accuracy).sum(),
            dexterity_passive: ranged_mods.iter().map(|m| m.dexterity_passive).sum(),
        }
    }

    pub fn weapon(&self, slot: WeaponSlot) -> &Weapon {
        &self.weapons.get(slot).weapon
    }

    /// Equipped pieces covering `part`, in slot order.
    pub fn armour_candidates(&self, part: BodyPart) -> Vec<ArmourCandidate> {
        let coverage = &self.coverage[part.index()];
        self.armour
            .iter()
            .filter_map(|(slot, piece)| {
                let piece = piece.as_ref()?;
                let covered = *coverage.get(slot);
                (covered > 0.0).then_some(ArmourCandidate {
                    slot,
                    value: piece.value,
                    coverage: covered,
                })
            })
            .collect()
    }

    /// Effects of pieces covering `part`.
    pub fn armour_effects(&self, part: BodyPart) -> Vec<(ArmourEffectKind, f64)> {
        let coverage = &self.coverage[part.index()];
        self.armour
            .iter()
            .filter(|(slot, _)| *coverage.get(*slot) > 0.0)
            .filter_map(|(_, piece)| piece.as_ref()?.effect)
            .map(|effect| (effect.kind, effect.value))
            .collect()
    }

    pub fn blocks(&self, kind: TempEffectKind) -> bool {
        self.blocked_items.contains(&kind)
    }
}

/// Everything about one fighter that changes during a fight.
#[derive(Debug, Clone, PartialEq)]
pub struct FighterState {
    pub life: u32,
    pub statuses: StatusEffects,
    pub temporaries: TemporaryEffects,
    /// DOT channels this fighter has inflicted on its opponent.
    pub dots: DotState,
    pub weapons: WeaponStates,
    pub priority: SlotTable<u32>,
    pub weight: SlotTable<u32>,
}

impl FighterState {
    pub fn new(template: &FighterTemplate) -> Self {
        let priority = template.attack_settings.priority;
        let weight = template.defend_settings.weight;
        let loadout = SlotTable::from_fn(|slot| template.weapon(slot).clone());
        let mut weapons = WeaponStates::new(&loadout);
        for slot in WeaponSlot::ALL {
            let Some(ammo) = weapons.ammo_mut(slot) else {
                continue;
            };
            for bonus in &template.weapon(slot).bonuses {
                if let Some(hook) = bonus_hooks(bonus.kind).state {
                    hook.modify_state(ammo, bonus.value);
                }
            }
        }
        Self {
            life: template.starting_life,
            statuses: StatusEffects::new(),
            temporaries: TemporaryEffects::new(),
            dots: DotState::new(),
            weapons,
            priority,
            weight,
        }
    }

    /// Withdraws `slot` for the rest of the fight.
    pub fn disable_slot(&mut self, slot: WeaponSlot) {
        *self.priority.get_mut(slot) = 0;
        *self.weight.get_mut(slot) = 0;
    }
}

#[derive(Debug, Clone)]
pub struct FightState {
    pub round: u32,
    pub attacker: FighterState,
    pub defender: FighterState,
    pub log: BattleLog,
}

impl FightState {
    pub fn new(attacker: &FighterTemplate, defender: &FighterTemplate, trace: TraceMode) -> Self {
        Self {
            round: 0,
            attacker: FighterState::new(attacker),
            defender: FighterState::new(defender),
            log: BattleLog::new(trace == TraceMode::Events),
        }
    }

    pub fn is_over(&self) -> bool {
        self.attacker.life == 0 || self.defender.life == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FightOutcome {
    pub attacker_life: u32,
    pub defender_life: u32,
    pub rounds: u32,
    pub winner: Option<Side>,
    pub log: Vec<BattleEvent>,
}

/// Runs one fight from fresh state.
pub fn simulate_fight(
    attacker: &FighterTemplate,
    defender: &FighterTemplate,
    seed: u64,
    trace: TraceMode,
) -> FightOutcome {
    let mut fight = FightState::new(attacker, defender, trace);
    let mut rng = Rng::new(seed);
    run_fight(attacker, defender, &mut fight, &mut rng)
}

/// Alternates actions, attacker first, until someone reaches 0 life or the round cap passes.
pub fn run_fight(
    attacker: &FighterTemplate,
    defender: &FighterTemplate,
    fight: &mut FightState,
    rng: &mut Rng,
) -> FightOutcome {
    let mut rounds = MAX_ROUNDS;
    'rounds: for round in 1..=MAX_ROUNDS {
        fight.round = round;
        for side in [Side::Attacker, Side::Defender] {
            let (actor, target, actor_state, target_state) = match side {
                Side::Attacker => (attacker, defender, &mut fight.attacker, &mut fight.defender),
                Side::Defender => (defender, attacker, &mut fight.defender, &mut fight.attacker),
            };
            resolve_action(
                Turn {
                    side,
                    round,
                    actor,
                    target,
                    actor_state,
                    target_state,
                    log: &mut fight.log,
                },
                rng,
            );
            if fight.is_over() {
                rounds = round;
                break 'rounds;
            }
        }
    }

    let winner = if fight.defender.life == 0 {
        Some(Side::Attacker)
    } else if fight.attacker.life == 0 {
        Some(Side::Defender)
    } else {
        None
    };
    FightOutcome {
        attacker_life: fight.attacker.life,
        defender_life: fight.defender.life,
        rounds,
        winner,
        log: std::mem::take(&mut fight.log).into_events(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::combatant::ArmourEffect;
    use crate::data::game_data::GameData;

    #[test]
    fn templates_fill_defaults_and_precompute_coverage() {
        let mut combatant = Combatant::named("Tank");
        combatant.armour.head = Some(Armour {
            name: "EOD Helmet".into(),
            value: 45.0,
            effect: Some(ArmourEffect {
                kind: ArmourEffectKind::Impassable,
                value: 10.0,
            }),
        });
        let template = FighterTemplate::prepare(&combatant, &GameData::builtin());
        assert_eq!(template.weapon(WeaponSlot::Primary).name, "Fists");
        assert_eq!(template.temporary_item, TemporaryItem::Kick);

        let head = template.armour_candidates(BodyPart::Head);
        assert_eq!(head.len(), 1);
        assert_eq!(head[0].coverage, 100.0);
        assert!(template.armour_candidates(BodyPart::Chest).is_empty());
        assert_eq!(
            template.armour_effects(BodyPart::Head),
            vec![(ArmourEffectKind::Impassable, 10.0)]
        );
        assert!(template.armour_effects(BodyPart::LeftFoot).is_empty());
        assert!(template.blocks(TempEffectKind::TearGas));
        assert!(!template.blocks(TempEffectKind::Melatonin));
    }

    #[test]
    fn fresh_state_starts_from_template_settings() {
        let mut combatant = Combatant::default();
        combatant.life = Some(1234);
        let template = FighterTemplate::prepare(&combatant, &GameData::builtin());
        let state = FighterState::new(&template);
        assert_eq!(state.life, 1234);
        assert_eq!(state.priority, template.attack_settings.priority);
        assert!(state.dots.is_empty() && state.statuses.is_empty());
    }

    #[test]
    fn log_records_only_when_enabled() {
        let mut on = BattleLog::new(true);
        on.record(1, Side::Attacker, || "hit".to_string());
        assert_eq!(on.into_events().len(), 1);

        let mut off = BattleLog::new(false);
        off.record(1, Side::Attacker, || unreachable!("message is never built"));
        assert!(off.into_events().is_empty());
    }
}
