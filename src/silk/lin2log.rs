//! Base-2 logarithm approximation in Q7.

use crate::silk::fixed::clz_frac;

/// Returns approximately `128 * log2(value)`.
///
/// The integer part comes from the leading-zero count and the fractional part
/// from a second-order polynomial in the 7 bits after the leading one.
/// `lin2log(0)` yields `-128`.
#[must_use]
pub fn lin2log(value: i32) -> i32 {
    let (lz, frac_q7) = clz_frac(value);
    let curvature = (frac_q7 * (128 - frac_q7) * 179) >> 16;
    frac_q7 + curvature + ((31 - lz as i32) << 7)
}
