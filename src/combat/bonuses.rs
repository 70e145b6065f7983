//! Weapon bonus registry.
//!
//! Each [BonusKind] maps to a fixed set of hook implementations through [bonus_hooks]. Only the
//! bonuses attached to the weapon used for an action are consulted, in attachment order. Every
//! hook receives the running value, the bonus magnitude and the action context, and returns the
//! new value. Hooks never touch fighter state directly; side effects are returned to the caller.

use serde::{Deserialize, Serialize};

use crate::combat::combatant::Stat;
use crate::combat::dot::DotChannel;
use crate::combat::rng::Rng;
use crate::combat::slots::{BodyPart, WeaponSlot};
use crate::combat::status::StatusKind;
use crate::combat::weapon_state::AmmoState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusKind {
    Powerful,
    Specialist,
    Assassinate,
    Blindside,
    Comeback,
    Crusher,
    Cupid,
    Throttle,
    Achilles,
    Deadeye,
    Expose,
    Empower,
    Quicken,
    Penetrate,
    Puncture,
    Conserve,
    Spray,
    Bloodlust,
    Slow,
    Cripple,
    Weaken,
    Wither,
    Demoralize,
    Freeze,
    Stun,
    Suppress,
    Motivation,
    Burning,
    SevereBurning,
    #[serde(alias = "poison")]
    Toxin,
    Laceration,
    #[serde(other)]
    Unknown,
}

/// What the hooks can see about the action in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BonusContext {
    pub slot: WeaponSlot,
    pub round: u32,
    pub body_part: BodyPart,
    pub critical: bool,
    pub wielder_life: u32,
    pub wielder_max_life: u32,
    pub target_life: u32,
    pub target_max_life: u32,
}

impl BonusContext {
    pub fn wielder_low_life(&self) -> bool {
        u64::from(self.wielder_life) * 4 <= u64::from(self.wielder_max_life)
    }

    pub fn target_full_life(&self) -> bool {
        self.target_life >= self.target_max_life
    }
}

/// Rounds fired and spent by one action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmmoPlan {
    pub rounds_fired: u32,
    pub rounds_spent: u32,
    pub damage_multiplier: f64,
}

impl AmmoPlan {
    pub fn new(rounds: u32) -> Self {
        Self {
            rounds_fired: rounds,
            rounds_spent: rounds,
            damage_multiplier: 1.0,
        }
    }
}

/// Side effect of a landed hit, applied by the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SideEffect {
    /// Life returned to the wielder.
    Heal(f64),
    TargetStatus(StatusKind),
    WielderStatus(StatusKind),
    Dot(DotChannel, f64),
}

pub trait DamageModifier: Sync {
    fn modify_damage(&self, damage: f64, value: f64, ctx: &BonusContext) -> f64;
}

pub trait StatModifier: Sync {
    fn modify_stat(&self, stat: Stat, current: f64, value: f64) -> f64;
}

pub trait CritModifier: Sync {
    fn modify_crit_chance(&self, chance: f64, _value: f64) -> f64 {
        chance
    }

    fn modify_crit_damage(&self, damage: f64, _value: f64, _ctx: &BonusContext) -> f64 {
        damage
    }
}

pub trait ArmourModifier: Sync {
    /// `mitigation` is the struck piece's armour value.
    fn modify_armour(&self, mitigation: f64, value: f64, rng: &mut Rng) -> f64;
}

pub trait AmmoModifier: Sync {
    fn modify_ammo(&self, plan: AmmoPlan, value: f64, ammo: &AmmoState, rng: &mut Rng) -> AmmoPlan;
}

pub trait PostDamageEffect: Sync {
    fn after_damage(&self, damage: f64, value: f64, rng: &mut Rng) -> Option<SideEffect>;
}

pub trait StateModifier: Sync {
    /// Adjusts a slot's ammunition when a fight starts.
    fn modify_state(&self, ammo: &mut AmmoState, value: f64);
}

/// Hook set of one bonus kind. Missing hooks are no-ops.
#[derive(Clone, Copy, Default)]
pub struct BonusHooks {
    pub damage: Option<&'static dyn DamageModifier>,
    pub stat: Option<&'static dyn StatModifier>,
    pub crit: Option<&'static dyn CritModifier>,
    pub armour: Option<&'static dyn ArmourModifier>,
    pub ammo: Option<&'static dyn AmmoModifier>,
    pub post_damage: Option<&'static dyn PostDamageEffect>,
    pub state: Option<&'static dyn StateModifier>,
}

impl BonusHooks {
    fn damage(hook: &'static dyn DamageModifier) -> Self {
        Self {
            damage: Some(hook),
            ..Self::default()
        }
    }

    fn stat(hook: &'static dyn StatModifier) -> Self {
        Self {
            stat: Some(hook),
            ..Self::default()
        }
    }

    fn crit(hook: &'static dyn CritModifier) -> Self {
        Self {
            crit: Some(hook),
            ..Self::default()
        }
    }

    fn armour(hook: &'static dyn ArmourModifier) -> Self {
        Self {
            armour: Some(hook),
            ..Self::default()
        }
    }

    fn ammo(hook: &'static dyn AmmoModifier) -> Self {
        Self {
            ammo: Some(hook),
            ..Self::default()
        }
    }

    fn post_damage(hook: &'static dyn PostDamageEffect) -> Self {
        Self {
            post_damage: Some(hook),
            ..Self::default()
        }
    }
}

fn scale(current: f64, percent: f64) -> f64 {
    current * (1.0 + percent / 100.0)
}

/// Damage bonus gated by a condition on the context.
struct ConditionalDamage(fn(&BonusContext) -> bool);

impl DamageModifier for ConditionalDamage {
    fn modify_damage(&self, damage: f64, value: f64, ctx: &BonusContext) -> f64 {
        if (self.0)(ctx) {
            scale(damage, value)
        } else {
            damage
        }
    }
}

fn always(_: &BonusContext) -> bool {
    true
}

fn first_round(ctx: &BonusContext) -> bool {
    ctx.round == 1
}

fn struck_head(ctx: &BonusContext) -> bool {
    ctx.body_part == BodyPart::Head
}

fn struck_heart(ctx: &BonusContext) -> bool {
    ctx.body_part == BodyPart::Heart
}

fn struck_throat(ctx: &BonusContext) -> bool {
    ctx.body_part == BodyPart::Throat
}

fn struck_foot(ctx: &BonusContext) -> bool {
    ctx.body_part.is_foot()
}

static POWERFUL: ConditionalDamage = ConditionalDamage(always);
static ASSASSINATE: ConditionalDamage = ConditionalDamage(first_round);
static BLINDSIDE: ConditionalDamage = ConditionalDamage(BonusContext::target_full_life);
static COMEBACK: ConditionalDamage = ConditionalDamage(BonusContext::wielder_low_life);
static CRUSHER: ConditionalDamage = ConditionalDamage(struck_head);
static CUPID: ConditionalDamage = ConditionalDamage(struck_heart);
static THROTTLE: ConditionalDamage = ConditionalDamage(struck_throat);
static ACHILLES: ConditionalDamage = ConditionalDamage(struck_foot);

struct SingleClip;

impl StateModifier for SingleClip {
    fn modify_state(&self, ammo: &mut AmmoState, _value: f64) {
        ammo.clips_left = 0;
    }
}

struct StatBoost(Stat);

impl StatModifier for StatBoost {
    fn modify_stat(&self, stat: Stat, current: f64, value: f64) -> f64 {
        if stat == self.0 {
            scale(current, value)
        } else {
            current
        }
    }
}

struct Deadeye;

impl CritModifier for Deadeye {
    fn modify_crit_damage(&self, damage: f64, value: f64, ctx: &BonusContext) -> f64 {
        if ctx.critical {
            scale(damage, value)
        } else {
            damage
        }
    }
}

struct Expose;

impl CritModifier for Expose {
    fn modify_crit_chance(&self, chance: f64, value: f64) -> f64 {
        chance + value
    }
}

struct Penetrate;

impl ArmourModifier for Penetrate {
    fn modify_armour(&self, mitigation: f64, value: f64, _rng: &mut Rng) -> f64 {
        mitigation * (1.0 - value / 100.0).max(0.0)
    }
}

struct Puncture;

impl ArmourModifier for Puncture {
    fn modify_armour(&self, mitigation: f64, value: f64, rng: &mut Rng) -> f64 {
        if rng.chance(value / 100.0) {
            0.0
        } else {
            mitigation
        }
    }
}

struct Conserve;

impl AmmoModifier for Conserve {
    fn modify_ammo(
        &self,
        plan: AmmoPlan,
        value: f64,
        _ammo: &AmmoState,
        rng: &mut Rng,
    ) -> AmmoPlan {
        let kept = (1.0 - value / 100.0).clamp(0.0, 1.0);
        AmmoPlan {
            rounds_spent: rng.stochastic_round(f64::from(plan.rounds_spent) * kept),
            ..plan
        }
    }
}

struct Spray;

impl AmmoModifier for Spray {
    fn modify_ammo(
        &self,
        plan: AmmoPlan,
        value: f64,
        ammo: &AmmoState,
        rng: &mut Rng,
    ) -> AmmoPlan {
        if ammo.max_ammo == 0 || ammo.ammo_left < ammo.max_ammo || !rng.chance(value / 100.0) {
            return plan;
        }
        AmmoPlan {
            rounds_fired: ammo.max_ammo,
            rounds_spent: ammo.max_ammo,
            damage_multiplier: plan.damage_multiplier * 2.0,
        }
    }
}

struct Bloodlust;

impl PostDamageEffect for Bloodlust {
    fn after_damage(&self, damage: f64, value: f64, _rng: &mut Rng) -> Option<SideEffect> {
        let heal = damage * value / 100.0;
        (heal > 0.0).then_some(SideEffect::Heal(heal))
    }
}

/// Applies a status with `value` percent chance.
struct StatusProc {
    status: StatusKind,
    on_wielder: bool,
}

impl PostDamageEffect for StatusProc {
    fn after_damage(&self, _damage: f64, value: f64, rng: &mut Rng) -> Option<SideEffect> {
        if !rng.chance(value / 100.0) {
            return None;
        }
        Some(if self.on_wielder {
            SideEffect::WielderStatus(self.status)
        } else {
            SideEffect::TargetStatus(self.status)
        })
    }
}

/// Starts a DOT channel sized by the hit with `value` percent chance.
struct DotProc(DotChannel);

impl PostDamageEffect for DotProc {
    fn after_damage(&self, damage: f64, value: f64, rng: &mut Rng) -> Option<SideEffect> {
        rng.chance(value / 100.0).then_some(SideEffect::Dot(self.0, damage))
    }
}

macro_rules! status_proc {
    ($name:ident, $status:expr, $wielder:expr) => {
        static $name: StatusProc = StatusProc {
            status: $status,
            on_wielder: $wielder,
        };
    };
}

status_proc!(SLOW, StatusKind::Slow, false);
status_proc!(CRIPPLE, StatusKind::Cripple, false);
status_proc!(WEAKEN, StatusKind::Weaken, false);
status_proc!(WITHER, StatusKind::Wither, false);
status_proc!(DEMORALIZE, StatusKind::Demoralize, false);
status_proc!(FREEZE, StatusKind::Freeze, false);
status_proc!(STUN, StatusKind::Stun, false);
status_proc!(SUPPRESS, StatusKind::Suppress, false);
status_proc!(MOTIVATION, StatusKind::Motivation, true);

static EMPOWER: StatBoost = StatBoost(Stat::Strength);
static QUICKEN: StatBoost = StatBoost(Stat::Speed);
static BURNING: DotProc = DotProc(DotChannel::Burn);
static SEVERE_BURNING: DotProc = DotProc(DotChannel::SevereBurn);
static TOXIN: DotProc = DotProc(DotChannel::Poison);
static LACERATION: DotProc = DotProc(DotChannel::Laceration);

pub fn bonus_hooks(kind: BonusKind) -> BonusHooks {
    match kind {
        BonusKind::Powerful => BonusHooks::damage(&POWERFUL),
        BonusKind::Specialist => BonusHooks {
            state: Some(&SingleClip),
            ..BonusHooks::damage(&POWERFUL)
        },
        BonusKind::Assassinate => BonusHooks::damage(&ASSASSINATE),
        BonusKind::Blindside => BonusHooks::damage(&BLINDSIDE),
        BonusKind::Comeback => BonusHooks::damage(&COMEBACK),
        BonusKind::Crusher => BonusHooks::damage(&CRUSHER),
        BonusKind::Cupid => BonusHooks::damage(&CUPID),
        BonusKind::Throttle => BonusHooks::damage(&THROTTLE),
        BonusKind::Achilles => BonusHooks::damage(&ACHILLES),
        BonusKind::Deadeye => BonusHooks::crit(&Deadeye),
        BonusKind::Expose => BonusHooks::crit(&Expose),
        BonusKind::Empower => BonusHooks::stat(&EMPOWER),
        BonusKind::Quicken => BonusHooks::stat(&QUICKEN),
        BonusKind::Penetrate => BonusHooks::armour(&Penetrate),
        BonusKind::Puncture => BonusHooks::armour(&Puncture),
        BonusKind::Conserve => BonusHooks::ammo(&Conserve),
        BonusKind::Spray => BonusHooks::ammo(&Spray),
        BonusKind::Bloodlust => BonusHooks::post_damage(&Bloodlust),
        BonusKind::Slow => BonusHooks::post_damage(&SLOW),
        BonusKind::Cripple => BonusHooks::post_damage(&CRIPPLE),
        BonusKind::Weaken => BonusHooks::post_damage(&WEAKEN),
        BonusKind::Wither => BonusHooks::post_damage(&WITHER),
        BonusKind::Demoralize => BonusHooks::post_damage(&DEMORALIZE),
        BonusKind::Freeze => BonusHooks::post_damage(&FREEZE),
        BonusKind::Stun => BonusHooks::post_damage(&STUN),
        BonusKind::Suppress => BonusHooks::post_damage(&SUPPRESS),
        BonusKind::Motivation => BonusHooks::post_damage(&MOTIVATION),
        BonusKind::Burning => BonusHooks::post_damage(&BURNING),
        BonusKind::SevereBurning => BonusHooks::post_damage(&SEVERE_BURNING),
        BonusKind::Toxin => BonusHooks::post_damage(&TOXIN),
        BonusKind::Laceration => BonusHooks::post_damage(&LACERATION),
        BonusKind::Unknown => BonusHooks::default(),
    }
}
