//! Step-up recursion: reflection coefficients to prediction coefficients.

use crate::silk::errors::{Result, SilkError};
use crate::silk::fixed::smlawb;
use crate::silk::is_supported_lpc_order;

/// Converts Q15 reflection coefficients into Q24 predictor coefficients.
///
/// Each order `k` folds the new coefficient into the pairs
/// `(a[n], a[k - n - 1])` before appending `-rc[k]`. Only the first
/// `rc_q15.len()` entries of `a_q24` are written.
pub fn k2a(a_q24: &mut [i32], rc_q15: &[i16]) -> Result<()> {
    let order = rc_q15.len();
    if !is_supported_lpc_order(order) {
        return Err(SilkError::UnsupportedOrder(order));
    }
    assert!(a_q24.len() >= order, "k2a output shorter than the order");

    step_up(&mut a_q24[..order], rc_q15);
    Ok(())
}

pub(crate) fn step_up(a_q24: &mut [i32], rc_q15: &[i16]) {
    for (k, &rc) in rc_q15.iter().enumerate() {
        let rc = i32::from(rc);
        for n in 0..k.div_ceil(2) {
            let low = a_q24[n];
            let high = a_q24[k - n - 1];
            a_q24[n] = smlawb(low, high << 1, rc);
            a_q24[k - n - 1] = smlawb(high, low << 1, rc);
        }
        a_q24[k] = -(rc << 9);
    }
}
