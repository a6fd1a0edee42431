//! Numeric helpers shared by decoding and suppression.

use crate::util::{UltraFaceError, UltraFaceResult};
use std::cmp::Ordering;

/// Returns `num / den`, or zero when the denominator is not a positive finite value.
pub(crate) fn ratio_or_zero(num: f32, den: f32) -> f32 {
    if den > 0.0 && den.is_finite() {
        num / den
    } else {
        0.0
    }
}

/// Rejects thresholds outside `[0, 1]`, including NaN.
pub(crate) fn check_unit_interval(name: &'static str, value: f32) -> UltraFaceResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(UltraFaceError::InvalidThreshold { name, value })
    }
}

/// Orders scores high to low with NaN last; equal scores compare equal.
pub(crate) fn score_cmp_desc(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
