//! Armour selection for a struck body part and the armour-effect registry.
//!
//! Pieces with non-zero coverage of the struck part are candidates. With at least 100% total
//! coverage the pieces are ranked by armour value (ties go to the earlier slot) and a lottery over
//! the top three decides which piece absorbs the hit; the lowest ranked piece catches any draw past
//! those bands. Below 100% total coverage each piece owns a band of its own coverage in slot
//! order and a draw past every band means the hit lands unprotected.

use serde::{Deserialize, Serialize};

use crate::combat::rng::Rng;
use crate::combat::slots::{ArmourSlot, WeaponSlot};

/// Resolution of the armour lottery draw, in hundredths of a percent.
pub const ARMOUR_DRAW_MAX: u32 = 10_000;
/// Ranked pieces that get their own band when coverage reaches 100%.
pub const RANKED_BANDS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArmourCandidate {
    pub slot: ArmourSlot,
    pub value: f64,
    /// Coverage of the struck part, percent.
    pub coverage: f64,
}

/// Draws in `[lo, hi]` select `candidate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArmourBand {
    pub lo: u32,
    pub hi: u32,
    pub candidate: ArmourCandidate,
}

fn band_width(coverage: f64) -> u32 {
    if !coverage.is_finite() || coverage <= 0.0 {
        return 0;
    }
    (coverage * 100.0).round().min(f64::from(ARMOUR_DRAW_MAX)) as u32
}

fn total_coverage(candidates: &[ArmourCandidate]) -> u32 {
    candidates.iter().map(|c| band_width(c.coverage)).sum()
}

/// Candidates ordered by armour value, highest first. Equal values go by slot order.
pub fn rank_candidates(candidates: &[ArmourCandidate]) -> Vec<ArmourCandidate> {
    let mut ranked = candidates.to_vec();
    ranked.sort_by(|a, b| b.value.total_cmp(&a.value).then(a.slot.cmp(&b.slot)));
    ranked
}

/// Lottery bands over `[1, ARMOUR_DRAW_MAX]`.
///
/// At full coverage the bands partition the whole draw space. Below full coverage they
/// cover `[1, total]` and anything above is unprotected.
pub fn coverage_bands(candidates: &[ArmourCandidate]) -> Vec<ArmourBand> {
    let candidates: Vec<ArmourCandidate> = candidates
        .iter()
        .copied()
        .filter(|c| band_width(c.coverage) > 0)
        .collect();
    let mut bands = Vec::with_capacity(candidates.len());
    let mut upper = 0;

    if total_coverage(&candidates) >= ARMOUR_DRAW_MAX {
        let ranked = rank_candidates(&candidates);
        for candidate in ranked.iter().take(RANKED_BANDS) {
            if upper >= ARMOUR_DRAW_MAX {
                break;
            }
            let hi = (upper + band_width(candidate.coverage)).min(ARMOUR_DRAW_MAX);
            bands.push(ArmourBand {
                lo: upper + 1,
                hi,
                candidate: *candidate,
            });
            upper = hi;
        }
        if let Some(lowest) = ranked.last() {
            if upper < ARMOUR_DRAW_MAX {
                bands.push(ArmourBand {
                    lo: upper + 1,
                    hi: ARMOUR_DRAW_MAX,
                    candidate: *lowest,
                });
            }
        }
    } else {
        for candidate in candidates {
            let hi = upper + band_width(candidate.coverage);
            bands.push(ArmourBand {
                lo: upper + 1,
                hi,
                candidate,
            });
            upper = hi;
        }
    }
    bands
}

/// Piece hit by `draw`, or `None` when the draw lands outside every band.
pub fn select_armour(candidates: &[ArmourCandidate], draw: u32) -> Option<ArmourCandidate> {
    coverage_bands(candidates)
        .into_iter()
        .find(|band| draw >= band.lo && draw <= band.hi)
        .map(|band| band.candidate)
}

/// Picks the piece that absorbs a hit. The best piece wins outright when it alone covers the
/// part, without drawing.
pub fn armour_for_hit(candidates: &[ArmourCandidate], rng: &mut Rng) -> Option<ArmourCandidate> {
    let best = rank_candidates(candidates).into_iter().next()?;
    if band_width(best.coverage) >= ARMOUR_DRAW_MAX {
        return Some(best);
    }
    let draw = rng.roll(1, ARMOUR_DRAW_MAX);
    select_armour(candidates, draw)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmourEffectKind {
    /// Less damage from primary and secondary weapons.
    Impenetrable,
    /// Less damage from melee weapons.
    Impregnable,
    /// Less damage while the wearer is at or below a quarter of max life.
    Insurmountable,
    /// Chance to negate the hit entirely.
    Impassable,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArmourEffectContext {
    pub attacker_slot: WeaponSlot,
    pub wearer_life: u32,
    pub wearer_max_life: u32,
}

pub trait ArmourEffectProcessor: Sync {
    /// Lower runs first.
    fn priority(&self) -> u8;
    fn apply(&self, damage: f64, value: f64, ctx: &ArmourEffectContext, rng: &mut Rng) -> f64;
}

fn reduce(damage: f64, percent: f64) -> f64 {
    damage * (1.0 - percent / 100.0).max(0.0)
}

struct SlotReduction(fn(WeaponSlot) -> bool);

impl ArmourEffectProcessor for SlotReduction {
    fn priority(&self) -> u8 {
        0
    }

    fn apply(&self, damage: f64, value: f64, ctx: &ArmourEffectContext, _rng: &mut Rng) -> f64 {
        if (self.0)(ctx.attacker_slot) {
            reduce(damage, value)
        } else {
            damage
        }
    }
}

struct LowLifeReduction;

impl ArmourEffectProcessor for LowLifeReduction {
    fn priority(&self) -> u8 {
        1
    }

    fn apply(&self, damage: f64, value: f64, ctx: &ArmourEffectContext, _rng: &mut Rng) -> f64 {
        if u64::from(ctx.wearer_life) * 4 <= u64::from(ctx.wearer_max_life) {
            reduce(damage, value)
        } else {
            damage
        }
    }
}

struct NegationChance;

impl ArmourEffectProcessor for NegationChance {
    fn priority(&self) -> u8 {
        2
    }

    fn apply(&self, damage: f64, value: f64, _ctx: &ArmourEffectContext, rng: &mut Rng) -> f64 {
        if rng.chance(value / 100.0) {
            0.0
        } else {
            damage
        }
    }
}

fn is_melee(slot: WeaponSlot) -> bool {
    slot == WeaponSlot::Melee
}

static IMPENETRABLE: SlotReduction = SlotReduction(WeaponSlot::is_ranged);
static IMPREGNABLE: SlotReduction = SlotReduction(is_melee);

pub fn armour_effect_processor(
    kind: ArmourEffectKind,
) -> Option<&'static dyn ArmourEffectProcessor> {
    match kind {
        ArmourEffectKind::Impenetrable => Some(&IMPENETRABLE),
        ArmourEffectKind::Impregnable => Some(&IMPREGNABLE),
        ArmourEffectKind::Insurmountable => Some(&LowLifeReduction),
        ArmourEffectKind::Impassable => Some(&NegationChance),
        ArmourEffectKind::Unknown => None,
    }
}

/// Runs every `(kind, value)` effect in processor priority order. The caller passes only effects
/// of pieces that cover the struck part.
pub fn apply_armour_effects(
    damage: f64,
    effects: &[(ArmourEffectKind, f64)],
    ctx: &ArmourEffectContext,
    rng: &mut Rng,
) -> f64 {
    let mut processors: Vec<(&'static dyn ArmourEffectProcessor, f64)> = effects
        .iter()
        .filter_map(|(kind, value)| armour_effect_processor(*kind).map(|p| (p, *value)))
        .collect();
    processors.sort_by_key(|(processor, _)| processor.priority());
    processors
        .into_iter()
        .fold(damage, |damage, (processor, value)| processor.apply(damage, value, ctx, rng))
}
