//! Shape thresholds and comparison functions shared by all detector modules.

// ============================================================
// DEFAULT THRESHOLDS
// ============================================================

/// Doji: body / range < DOJI_TOLERANCE
pub const DOJI_TOLERANCE: f64 = 0.1;
/// Hammer / shooting star: long shadow > body * SHADOW_RATIO
pub const SHADOW_RATIO: f64 = 2.0;
/// Morning / evening star: middle body <= first body * STAR_BODY_RATIO
pub const STAR_BODY_RATIO: f64 = 0.5;

// ============================================================
// HELPER FUNCTIONS
// ============================================================

/// Body is doji-like relative to the candle's own range.
/// A zero-range candle is never a doji.
#[inline]
pub fn is_doji(body: f64, range: f64, tolerance: f64) -> bool {
    if range == 0.0 {
        return false;
    }
    body / range < tolerance
}

/// One shadow dominates the body while the opposite shadow stays under it.
///
/// Hammer passes `(lower, upper)`, shooting star `(upper, lower)`.
#[inline]
pub fn is_pin_shape(long_shadow: f64, short_shadow: f64, body: f64, shadow_ratio: f64) -> bool {
    long_shadow > body * shadow_ratio && short_shadow < body
}

/// Middle candle of a star is small relative to the first one.
#[inline]
pub fn is_star_body(star_body: f64, first_body: f64, ratio: f64) -> bool {
    star_body <= first_body * ratio
}

/// Inclusive range check that does not care about bound order.
#[inline]
pub fn within(value: f64, a: f64, b: f64) -> bool {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    (lo..=hi).contains(&value)
}
