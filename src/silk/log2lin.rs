//! Inverse of [`lin2log`](crate::silk::lin2log::lin2log): `2^(x / 128)`.

use crate::silk::fixed::smulwb;

/// Largest Q7 input that does not saturate the output.
pub const MAX_LOG_INPUT_Q7: i32 = 3966;

/// Approximate `2^(log_q7 / 128)`.
///
/// Negative inputs give 0 and inputs past [`MAX_LOG_INPUT_Q7`] give
/// `i32::MAX`.
#[must_use]
pub fn log2lin(log_q7: i32) -> i32 {
    if log_q7 < 0 {
        return 0;
    }
    if log_q7 > MAX_LOG_INPUT_Q7 {
        return i32::MAX;
    }

    let base = 1i32 << (log_q7 >> 7);
    let frac_q7 = log_q7 & 0x7f;
    let frac_q7 = frac_q7 + smulwb(frac_q7 * (128 - frac_q7), -174);

    // below 2^16 the product fits before shifting; above it must shift first
    if log_q7 < 2048 {
        base + ((base * frac_q7) >> 7)
    } else {
        base + (base >> 7) * frac_q7
    }
}
