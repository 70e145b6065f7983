//! Hit, location and damage formulas. All functions are pure apart from the RNG they are handed.

use crate::combat::rng::Rng;
use crate::combat::slots::BodyPart;

/// Speed/dexterity ratio at or below which nothing hits.
pub const HIT_RATIO_FLOOR: f64 = 1.0 / 64.0;
/// Speed/dexterity ratio at or above which everything hits.
pub const HIT_RATIO_CEILING: f64 = 64.0;
/// Defense/strength ratio at or below which defense mitigates nothing.
pub const MITIGATION_RATIO_FLOOR: f64 = 1.0 / 32.0;
/// Defense/strength ratio at or above which defense mitigates everything.
pub const MITIGATION_RATIO_CEILING: f64 = 14.0;
pub const HIT_DRAW_MAX: u32 = 10_000;
pub const LOCATION_DRAW_MAX: u32 = 1_000;
pub const VARIANCE_SPREAD: f64 = 0.025;
pub const VARIANCE_MIN: f64 = 0.95;
pub const VARIANCE_MAX: f64 = 1.05;
/// Bounded retry count for variance resampling; the band holds ~95% of draws.
const VARIANCE_ATTEMPTS: usize = 64;

/// Ratio `num / den` with a zero denominator read as an overwhelming advantage.
fn safe_ratio(num: f64, den: f64) -> f64 {
    let num = if num.is_finite() { num.max(0.0) } else { 0.0 };
    let den = if den.is_finite() { den.max(0.0) } else { 0.0 };
    if den <= 0.0 {
        if num <= 0.0 {
            1.0
        } else {
            f64::INFINITY
        }
    } else {
        num / den
    }
}

/// Base hit chance in percent from attacker speed and defender dexterity.
pub fn hit_chance(speed: f64, dexterity: f64) -> f64 {
    let ratio = safe_ratio(speed, dexterity);
    if ratio <= HIT_RATIO_FLOOR {
        0.0
    } else if ratio >= HIT_RATIO_CEILING {
        100.0
    } else {
        50.0 + 50.0 * ratio.ln() / HIT_RATIO_CEILING.ln()
    }
}

/// Shifts `base` by accuracy. 50 accuracy is neutral; each point above or below moves the chance
/// by a fiftieth of the gap towards 100% (or 0%).
pub fn apply_accuracy(base: f64, accuracy: f64) -> f64 {
    if !base.is_finite() || !accuracy.is_finite() {
        return base.clamp(0.0, 100.0);
    }
    let gap = if base >= 50.0 { 100.0 - base } else { base };
    (base + gap * (accuracy - 50.0) / 50.0).clamp(0.0, 100.0)
}

pub fn roll_hit(chance: f64, rng: &mut Rng) -> bool {
    let draw = rng.roll(1, HIT_DRAW_MAX);
    f64::from(draw) <= 1.0 + chance * 100.0
}

/// Rolls the struck location. `crit_chance` is a percentage.
pub fn select_body_part(crit_chance: f64, rng: &mut Rng) -> BodyPart {
    let draw = rng.roll(1, LOCATION_DRAW_MAX);
    if f64::from(draw) <= crit_chance * 10.0 {
        BodyPart::from_crit_roll(rng.roll(1, 100))
    } else {
        BodyPart::from_non_crit_roll(rng.roll(1, LOCATION_DRAW_MAX))
    }
}

/// Maximum damage from effective strength.
pub fn max_damage(strength: f64) -> f64 {
    let strength = if strength.is_finite() { strength.max(10.0) } else { 10.0 };
    let x = (strength / 10.0).log10();
    7.0 * x * x + 27.0 * x + 30.0
}

/// Percentage of damage defense absorbs.
pub fn defense_mitigation(defense: f64, strength: f64) -> f64 {
    let ratio = safe_ratio(defense, strength);
    if ratio <= MITIGATION_RATIO_FLOOR {
        0.0
    } else if ratio >= MITIGATION_RATIO_CEILING {
        100.0
    } else if ratio >= 1.0 {
        50.0 + 50.0 * ratio.ln() / MITIGATION_RATIO_CEILING.ln()
    } else {
        50.0 + 50.0 * ratio.ln() / (1.0 / MITIGATION_RATIO_FLOOR).ln()
    }
}

/// Damage variance factor in `[VARIANCE_MIN, VARIANCE_MAX]`.
pub fn variance(rng: &mut Rng) -> f64 {
    for _ in 0..VARIANCE_ATTEMPTS {
        let factor = 1.0 + VARIANCE_SPREAD * rng.standard_normal();
        if (VARIANCE_MIN..=VARIANCE_MAX).contains(&factor) {
            return factor;
        }
    }
    1.0
}

/// Every factor of one hit before bonus hooks and armour effects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageInputs {
    pub body_multiplier: f64,
    pub max_damage: f64,
    /// Defense mitigation, percent.
    pub mitigation: f64,
    /// Display damage of the weapon.
    pub weapon_damage: f64,
    /// Armour value of the struck piece.
    pub armour_mitigation: f64,
    pub penetration: f64,
    pub variance: f64,
    /// Damage bonus, percent.
    pub damage_bonus: f64,
    pub ammo_multiplier: f64,
}

impl DamageInputs {
    pub fn raw_damage(&self) -> f64 {
        let penetration = if self.penetration > 0.0 { self.penetration } else { 1.0 };
        let armour = (1.0 - self.armour_mitigation / penetration / 100.0).max(0.0);
        let value = self.body_multiplier
            * self.max_damage
            * (1.0 - self.mitigation / 100.0)
            * (self.weapon_damage / 10.0)
            * armour
            * self.variance
            * (1.0 + self.damage_bonus / 100.0).max(0.0)
            * self.ammo_multiplier;
        sanitize(value)
    }
}

/// Non-finite values become zero; negatives floor at zero.
pub fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

/// Rounds to whole damage and caps at the target's remaining life.
pub fn finalize_damage(value: f64, target_life: u32) -> u32 {
    let rounded = sanitize(value).round();
    if rounded >= f64::from(target_life) {
        target_life
    } else {
        rounded as u32
    }
}
