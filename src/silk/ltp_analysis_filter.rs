//! Long-term prediction analysis filter.
//!
//! Removes the pitch-periodic component of each subframe with a five-tap
//! predictor centred on the subframe's lag and scales the residual by the
//! inverse subframe gain.

use crate::silk::fixed::{rshift_round, sat16, smlabb, smulwb};
use crate::silk::LTP_ORDER;

const LTP_CENTER: usize = LTP_ORDER / 2;

/// Writes the LTP residual of `nb_subfr` subframes into `ltp_res`.
///
/// Subframe `k` covers `subfr_length + pre_length` samples of `x` starting
/// at `x_start + k * subfr_length`; its residual occupies the `k`-th block
/// of that length in `ltp_res`. `x` must hold `pitch_l[k] + 2` samples of
/// history before each block.
#[allow(clippy::too_many_arguments)]
pub fn ltp_analysis_filter(
    ltp_res: &mut [i16],
    x: &[i16],
    x_start: usize,
    ltp_coef_q14: &[i16],
    pitch_l: &[i32],
    inv_gains_q16: &[i32],
    subfr_length: usize,
    nb_subfr: usize,
    pre_length: usize,
) {
    let block = subfr_length + pre_length;
    debug_assert!(ltp_res.len() >= nb_subfr * block);
    debug_assert!(ltp_coef_q14.len() >= nb_subfr * LTP_ORDER);

    let subframes = ltp_res
        .chunks_exact_mut(block)
        .zip(ltp_coef_q14.chunks_exact(LTP_ORDER))
        .zip(pitch_l.iter().zip(inv_gains_q16))
        .take(nb_subfr);

    for (k, ((res, taps), (&lag, &inv_gain_q16))) in subframes.enumerate() {
        debug_assert!(lag > LTP_CENTER as i32);
        let start = x_start + k * subfr_length;
        let input = &x[start..start + block];
        // lagged[i + 2 - j] is the sample multiplied by tap j
        let lagged_start = start - lag as usize - LTP_CENTER;
        let lagged = &x[lagged_start..lagged_start + block + LTP_ORDER - 1];

        for (i, (out, &sample)) in res.iter_mut().zip(input).enumerate() {
            let window = &lagged[i..i + LTP_ORDER];
            let mut ltp_est_q14 = 0i32;
            for (&tap, &lag_sample) in taps.iter().zip(window.iter().rev()) {
                ltp_est_q14 = smlabb(ltp_est_q14, i32::from(lag_sample), i32::from(tap));
            }

            let residual = sat16(i32::from(sample) - rshift_round(ltp_est_q14, 14));
            *out = sat16(smulwb(inv_gain_q16, i32::from(residual)));
        }
    }
}
