//! Entropy-constrained, matrix-weighted vector quantiser for LTP taps.
//!
//! Each codebook row is scored by the weighted squared error against the
//! target taps, plus a rate term proportional to the row's code length and a
//! penalty when the row's gain exceeds the allowed maximum. The weighting
//! matrix is symmetric, so only its upper triangle is read.

use crate::silk::fixed::{smlawb, smulbb};
use crate::silk::LTP_ORDER;

/// Best codebook entry found by [`vq_wmat_ec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VqWMatEcResult {
    /// Index of the selected row.
    pub index: i8,
    /// Weighted error plus rate and gain penalties, Q14.
    pub rate_dist_q14: i32,
    /// Gain of the selected row, Q7.
    pub gain_q7: i32,
}

impl Default for VqWMatEcResult {
    fn default() -> Self {
        Self {
            index: 0,
            rate_dist_q14: i32::MAX,
            gain_q7: 0,
        }
    }
}

/// Weighted quadratic form `d' W d` in Q14 for a Q14 error and Q18 weights.
///
/// Rows are folded as `d[r] * (W[r][r] d[r] + 2 sum_{c>r} W[r][c] d[c])`, which
/// fixes the rounding of every intermediate product.
fn weighted_error_q14(acc_q14: i32, diff_q14: &[i16; LTP_ORDER], w_q18: &[i32]) -> i32 {
    let mut sum1_q14 = acc_q14;
    for row in 0..LTP_ORDER {
        let w_row = &w_q18[row * LTP_ORDER..(row + 1) * LTP_ORDER];
        let mut sum2_q16 = 0i32;
        for col in row + 1..LTP_ORDER {
            sum2_q16 = smlawb(sum2_q16, w_row[col], i32::from(diff_q14[col]));
        }
        sum2_q16 = sum2_q16.wrapping_shl(1);
        sum2_q16 = smlawb(sum2_q16, w_row[row], i32::from(diff_q14[row]));
        sum1_q14 = smlawb(sum1_q14, sum2_q16, i32::from(diff_q14[row]));
    }
    sum1_q14
}

/// Searches `cb_q7` for the row with the lowest rate/distortion score.
///
/// * `in_q14` - target taps.
/// * `w_q18` - 5x5 error weighting matrix, row major.
/// * `cb_gain_q7` / `cl_q5` - per-row gain and code length.
/// * `mu_q9` - weight of the code length in the score.
/// * `max_gain_q7` - rows with a larger gain pay `(gain - max) << 10`.
///
/// Ties keep the earlier row.
pub fn vq_wmat_ec(
    in_q14: &[i16; LTP_ORDER],
    w_q18: &[i32; LTP_ORDER * LTP_ORDER],
    cb_q7: &[[i8; LTP_ORDER]],
    cb_gain_q7: &[u8],
    cl_q5: &[u8],
    mu_q9: i32,
    max_gain_q7: i32,
) -> VqWMatEcResult {
    debug_assert_eq!(cb_q7.len(), cb_gain_q7.len());
    debug_assert_eq!(cb_q7.len(), cl_q5.len());

    let mut best = VqWMatEcResult::default();

    for (k, ((row, &gain), &cl)) in cb_q7.iter().zip(cb_gain_q7).zip(cl_q5).enumerate() {
        let gain_q7 = i32::from(gain);

        let mut diff_q14 = [0i16; LTP_ORDER];
        for ((diff, &target), &tap) in diff_q14.iter_mut().zip(in_q14).zip(row) {
            *diff = (i32::from(target) - (i32::from(tap) << 7)) as i16;
        }

        let mut sum1_q14 = smulbb(mu_q9, i32::from(cl));
        sum1_q14 = sum1_q14.wrapping_add((gain_q7 - max_gain_q7).max(0) << 10);
        sum1_q14 = weighted_error_q14(sum1_q14, &diff_q14, w_q18);

        if sum1_q14 < best.rate_dist_q14 {
            best = VqWMatEcResult {
                index: k as i8,
                rate_dist_q14: sum1_q14,
                gain_q7,
            };
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::silk::tables_ltp::{LTP_GAIN_BITS_Q5, LTP_GAIN_VQ_GAIN_Q7, LTP_GAIN_VQ_Q7};
    use proptest::prelude::*;

    const UNIT_Q18: i32 = 1 << 18;

    fn identity() -> [i32; LTP_ORDER * LTP_ORDER] {
        let mut w = [0; LTP_ORDER * LTP_ORDER];
        for i in 0..LTP_ORDER {
            w[i * LTP_ORDER + i] = UNIT_Q18;
        }
        w
    }

    fn target(row: &[i8; LTP_ORDER]) -> [i16; LTP_ORDER] {
        row.map(|tap| i16::from(tap) << 7)
    }

    #[test]
    fn exact_match_has_zero_distortion() {
        let cb = LTP_GAIN_VQ_Q7[1];
        let result = vq_wmat_ec(
            &target(&cb[5]),
            &identity(),
            cb,
            LTP_GAIN_VQ_GAIN_Q7[1],
            LTP_GAIN_BITS_Q5[1],
            0,
            1 << 14,
        );
        assert_eq!(result.index, 5);
        assert_eq!(result.rate_dist_q14, 0);
        assert_eq!(result.gain_q7, i32::from(LTP_GAIN_VQ_GAIN_Q7[1][5]));
    }

    #[test]
    fn rate_term_prefers_shorter_codes() {
        let cb = [[0i8; LTP_ORDER], [1, 0, 0, 0, 0]];
        let result = vq_wmat_ec(&[0; LTP_ORDER], &identity(), &cb, &[0, 1], &[255, 0], 100, 1 << 14);
        assert_eq!(
            result,
            VqWMatEcResult {
                index: 1,
                rate_dist_q14: 1,
                gain_q7: 1,
            }
        );
    }

    #[test]
    fn gain_above_limit_is_penalised() {
        let cb = [[0i8, 0, 64, 0, 0]];
        let result = vq_wmat_ec(&target(&cb[0]), &identity(), &cb, &[100], &[20], 10, 60);
        assert_eq!(result.rate_dist_q14, (40 << 10) + 200);
    }

    #[test]
    fn cross_terms_use_the_upper_triangle() {
        let mut w = identity();
        w[1] = UNIT_Q18;
        w[LTP_ORDER] = 0;
        let cb = [[0i8; LTP_ORDER]];
        let input = [128i16, 128, 0, 0, 0];
        let result = vq_wmat_ec(&input, &w, &cb, &[0], &[0], 0, 1 << 14);
        // d0^2 + d1^2 + 2 d0 d1 with d = 2^-7
        assert_eq!(result.rate_dist_q14, 4);
    }

    proptest! {
        #[test]
        fn codebook_rows_are_found_exactly(k in 0usize..3, pick in 0usize..32) {
            let cb = LTP_GAIN_VQ_Q7[k];
            let row = &cb[pick % cb.len()];
            let result = vq_wmat_ec(
                &target(row),
                &identity(),
                cb,
                LTP_GAIN_VQ_GAIN_Q7[k],
                LTP_GAIN_BITS_Q5[k],
                0,
                1 << 14,
            );
            prop_assert_eq!(result.rate_dist_q14, 0);
            prop_assert_eq!(&cb[result.index as usize], row);
        }
    }
}
