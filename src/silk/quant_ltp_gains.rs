//! LTP gain quantiser.
//!
//! Runs the matrix-weighted VQ over all three LTP codebooks and keeps the one
//! with the lowest total rate/distortion. A running sum of log gains limits
//! how much long-term prediction gain successive subframes may accumulate:
//! rows whose gain exceeds the remaining budget are penalised.

use crate::silk::fixed::add_pos_sat32;
use crate::silk::lin2log::lin2log;
use crate::silk::log2lin::log2lin;
use crate::silk::tables_ltp::{
    LTP_GAIN_BITS_Q5, LTP_GAIN_VQ_GAIN_Q7, LTP_GAIN_VQ_Q7, NB_LTP_CBKS,
};
use crate::silk::tuning_parameters::MAX_SUM_LOG_GAIN_Q7;
use crate::silk::vq_wmat_ec::vq_wmat_ec;
use crate::silk::{LTP_ORDER, MAX_NB_SUBFR};

/// Margin for state rescaling, 0.4 in Q7.
const GAIN_SAFETY_Q7: i32 = 51;
const LOG_OFFSET_Q7: i32 = 7 << 7;
/// Average rate/distortion of the middle codebook; good enough to stop early.
const LTP_GAIN_MIDDLE_AVG_RD_Q14: i32 = 12_304;

/// Outcome of [`quant_ltp_gains`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LtpGainQuant {
    pub periodicity: i8,
    pub cbk_index: [i8; MAX_NB_SUBFR],
    /// Total rate/distortion of the chosen codebook, Q14.
    pub rate_dist_q14: i32,
}

/// Quantises `b_q14` in place.
///
/// `b_q14` holds the target taps of `nb_subfr` subframes and receives the
/// quantised taps. `w_q18` carries one 5x5 weighting matrix per subframe.
/// `sum_log_gain_q7` is the running budget; it is updated with the gains of
/// the chosen codebook. With `low_complexity` set the search stops at the
/// first codebook whose cost is already below the middle codebook's average.
pub fn quant_ltp_gains(
    b_q14: &mut [i16],
    w_q18: &[i32],
    sum_log_gain_q7: &mut i32,
    mu_q9: i32,
    low_complexity: bool,
    nb_subfr: usize,
) -> LtpGainQuant {
    debug_assert!(nb_subfr <= MAX_NB_SUBFR);
    debug_assert!(b_q14.len() >= nb_subfr * LTP_ORDER);
    debug_assert!(w_q18.len() >= nb_subfr * LTP_ORDER * LTP_ORDER);

    let mut best = LtpGainQuant {
        periodicity: 0,
        cbk_index: [0; MAX_NB_SUBFR],
        rate_dist_q14: i32::MAX,
    };
    let mut best_sum_log_gain_q7 = 0;

    for k in 0..NB_LTP_CBKS {
        let mut temp_idx = [0i8; MAX_NB_SUBFR];
        let mut rate_dist_q14 = 0i32;
        let mut sum_log_gain_tmp_q7 = *sum_log_gain_q7;

        for (j, index) in temp_idx.iter_mut().enumerate().take(nb_subfr) {
            let max_gain_q7 =
                log2lin(MAX_SUM_LOG_GAIN_Q7 - sum_log_gain_tmp_q7 + LOG_OFFSET_Q7) - GAIN_SAFETY_Q7;

            let mut target = [0i16; LTP_ORDER];
            target.copy_from_slice(&b_q14[j * LTP_ORDER..(j + 1) * LTP_ORDER]);
            let mut weights = [0i32; LTP_ORDER * LTP_ORDER];
            weights.copy_from_slice(
                &w_q18[j * LTP_ORDER * LTP_ORDER..(j + 1) * LTP_ORDER * LTP_ORDER],
            );

            let result = vq_wmat_ec(
                &target,
                &weights,
                LTP_GAIN_VQ_Q7[k],
                LTP_GAIN_VQ_GAIN_Q7[k],
                LTP_GAIN_BITS_Q5[k],
                mu_q9,
                max_gain_q7,
            );

            *index = result.index;
            rate_dist_q14 = add_pos_sat32(rate_dist_q14, result.rate_dist_q14);
            sum_log_gain_tmp_q7 =
                (sum_log_gain_tmp_q7 + lin2log(GAIN_SAFETY_Q7 + result.gain_q7) - LOG_OFFSET_Q7)
                    .max(0);
        }

        // always select some codebook
        rate_dist_q14 = rate_dist_q14.min(i32::MAX - 1);

        if rate_dist_q14 < best.rate_dist_q14 {
            best = LtpGainQuant {
                periodicity: k as i8,
                cbk_index: temp_idx,
                rate_dist_q14,
            };
            best_sum_log_gain_q7 = sum_log_gain_tmp_q7;
        }

        if low_complexity && rate_dist_q14 < LTP_GAIN_MIDDLE_AVG_RD_Q14 {
            log::debug!("quant_ltp_gains: early exit after codebook {k}, rd={rate_dist_q14}");
            break;
        }
    }

    let codebook = LTP_GAIN_VQ_Q7[best.periodicity as usize];
    for (taps, &index) in b_q14
        .chunks_exact_mut(LTP_ORDER)
        .zip(&best.cbk_index)
        .take(nb_subfr)
    {
        for (tap, &value_q7) in taps.iter_mut().zip(&codebook[index as usize]) {
            *tap = i16::from(value_q7) << 7;
        }
    }

    *sum_log_gain_q7 = best_sum_log_gain_q7;
    best
}
