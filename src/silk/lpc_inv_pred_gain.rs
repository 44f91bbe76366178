//! Inverse prediction gain and stability test for LPC predictors.
//!
//! The predictor is stepped down from order `N` to 1, recovering one
//! reflection coefficient per order. The inverse gain is the running product
//! of `1 - k_i^2`. The filter is reported unstable, with zero gain, when a
//! reflection coefficient exceeds [`A_LIMIT_Q24`] or the gain drops under
//! [`MIN_INV_GAIN_Q30`]. Overflowing intermediates count as unstable too.

use crate::silk::MAX_LPC_ORDER;
use crate::silk::fixed::{clz32, inverse32_varq, mul32_frac_q, rshift_round64, smmul};

const QA: u32 = 24;

/// 0.99975 in Q24.
pub const A_LIMIT_Q24: i32 = 16_773_022;

/// 1e-4 in Q30: prediction gains above 40 dB count as unstable.
pub const MIN_INV_GAIN_Q30: i32 = 107_374;

/// Unity inverse gain in Q30.
pub const ONE_Q30: i32 = 1 << 30;

/// Inverse prediction gain of a Q12 predictor, in Q30.
///
/// Returns 0 when the filter is unstable, including the case where the DC
/// response `sum(a)` reaches unity. An empty predictor has unit gain.
#[must_use]
pub fn lpc_inverse_pred_gain(a_q12: &[i16]) -> i32 {
    let order = a_q12.len();
    assert!(order <= MAX_LPC_ORDER, "LPC order {order} exceeds {MAX_LPC_ORDER}");
    if order == 0 {
        return ONE_Q30;
    }

    let dc_response: i32 = a_q12.iter().map(|&a| i32::from(a)).sum();
    if dc_response >= 4096 {
        return 0;
    }

    let mut a_qa = [0i32; MAX_LPC_ORDER];
    for (dst, &a) in a_qa.iter_mut().zip(a_q12) {
        *dst = i32::from(a) << (QA - 12);
    }
    step_down(&mut a_qa[..order])
}

/// Inverse prediction gain of a Q24 predictor (as produced by step-up), in Q30.
#[must_use]
pub fn lpc_inverse_pred_gain_q24(a_q24: &[i32]) -> i32 {
    let order = a_q24.len();
    assert!(order <= MAX_LPC_ORDER, "LPC order {order} exceeds {MAX_LPC_ORDER}");
    if order == 0 {
        return ONE_Q30;
    }

    let mut a_qa = [0i32; MAX_LPC_ORDER];
    a_qa[..order].copy_from_slice(a_q24);
    step_down(&mut a_qa[..order])
}

/// Returns `true` when the Q12 predictor passes the stability test.
#[must_use]
pub fn is_stable(a_q12: &[i16]) -> bool {
    lpc_inverse_pred_gain(a_q12) > 0
}

fn step_down(a_qa: &mut [i32]) -> i32 {
    let mut inv_gain_q30 = ONE_Q30;

    for k in (0..a_qa.len()).rev() {
        let a_k = a_qa[k];
        if !(-A_LIMIT_Q24..=A_LIMIT_Q24).contains(&a_k) {
            return 0;
        }

        let rc_q31 = -(a_k << (31 - QA));
        let one_minus_rc2_q30 = ONE_Q30 - smmul(rc_q31, rc_q31);
        inv_gain_q30 = smmul(inv_gain_q30, one_minus_rc2_q30) << 2;
        if inv_gain_q30 < MIN_INV_GAIN_Q30 {
            return 0;
        }
        if k == 0 {
            break;
        }

        let scale_q = 32 - clz32(one_minus_rc2_q30.abs());
        let inv_scale = inverse32_varq(one_minus_rc2_q30, scale_q as i32 + 30);

        for n in 0..(k + 1) >> 1 {
            let low = a_qa[n];
            let high = a_qa[k - n - 1];
            let (Some(new_low), Some(new_high)) = (
                step_down_coefficient(low, high, rc_q31, inv_scale, scale_q),
                step_down_coefficient(high, low, rc_q31, inv_scale, scale_q),
            ) else {
                return 0;
            };
            a_qa[n] = new_low;
            a_qa[k - n - 1] = new_high;
        }
    }

    inv_gain_q30
}

/// `(a - b * rc) / (1 - rc^2)`, or `None` when the result leaves 32 bits.
fn step_down_coefficient(a: i32, b: i32, rc_q31: i32, inv_scale: i32, scale_q: u32) -> Option<i32> {
    let numerator = a.saturating_sub(mul32_frac_q(b, rc_q31, 31));
    let value = rshift_round64(i64::from(numerator) * i64::from(inv_scale), scale_q);
    i32::try_from(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::silk::k2a::k2a;
    use proptest::prelude::*;

    #[test]
    fn single_tap_gain_is_one_minus_k_squared() {
        // a = 0.5 -> 1 - 0.25 in Q30
        assert_eq!(lpc_inverse_pred_gain(&[2048]), 805_306_368);
        assert_eq!(lpc_inverse_pred_gain(&[]), ONE_Q30);
    }

    #[test]
    fn alternating_predictor() {
        assert_eq!(lpc_inverse_pred_gain(&[1024, -512, 256, -128]), 1_006_430_076);
        assert!(is_stable(&[1024, -512, 256, -128]));
    }

    #[test]
    fn unit_dc_response_is_unstable() {
        assert_eq!(lpc_inverse_pred_gain(&[4096]), 0);
        assert_eq!(lpc_inverse_pred_gain(&[2048, 2048]), 0);
        assert!(!is_stable(&[8000, -3000]));
    }

    #[test]
    fn reflection_beyond_limit_is_rejected() {
        // last coefficient at -0.9999 in Q24
        let a_q24 = [0, 0, 0, 0, 0, -16_775_538];
        assert_eq!(lpc_inverse_pred_gain_q24(&a_q24), 0);
        let a_q24 = [0, 0, 0, 0, 0, -16_000_000];
        assert!(lpc_inverse_pred_gain_q24(&a_q24) > 0);
    }

    #[test]
    fn prediction_gain_above_forty_db_is_unstable() {
        let mut a_q24 = [0i32; 6];
        k2a(&mut a_q24, &[-32650, 32650, 0, 0, 0, 0]).unwrap();
        assert_eq!(a_q24, [33_373_401, -16_716_800, 0, 0, 0, 0]);
        assert_eq!(lpc_inverse_pred_gain_q24(&a_q24), 0);
        assert_eq!(lpc_inverse_pred_gain(&[8148, -4081, 0, 0, 0, 0]), 0);
        assert!(!is_stable(&[8148, -4081, 0, 0, 0, 0]));

        k2a(&mut a_q24, &[32650, -32650, 0, 0, 0, 0]).unwrap();
        assert_eq!(lpc_inverse_pred_gain_q24(&a_q24), 0);
    }

    #[test]
    fn gains_just_above_the_floor_survive() {
        let mut a_q24 = [0i32; 6];
        k2a(&mut a_q24, &[-32400, 32400, 0, 0, 0, 0]).unwrap();
        assert_eq!(lpc_inverse_pred_gain_q24(&a_q24), 535_596);
        assert_eq!(lpc_inverse_pred_gain(&[8055, -4050, 0, 0, 0, 0]), 532_812);
    }

    fn lcg(seed: &mut u32) -> i16 {
        *seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        (*seed >> 16) as i16
    }

    #[test]
    fn inverse_gain_never_exceeds_unity() {
        let mut seed = 0x5eed_u32;
        for _ in 0..500 {
            for order in (2..=MAX_LPC_ORDER).step_by(2) {
                let mut a = [0i16; MAX_LPC_ORDER];
                for coef in a.iter_mut().take(order) {
                    *coef = lcg(&mut seed) >> 4;
                }
                let gain = lpc_inverse_pred_gain(&a[..order]);
                assert!((0..=ONE_Q30).contains(&gain), "order {order}: {gain}");
            }
        }
    }

    proptest! {
        #[test]
        fn step_up_output_passes_stability_test(
            rc in proptest::collection::vec(-8192i16..=8192, 3..=8),
        ) {
            let order = rc.len() * 2;
            let mut rc_q15 = [0i16; MAX_LPC_ORDER];
            for (i, &k) in rc.iter().cycle().take(order).enumerate() {
                rc_q15[i] = k;
            }
            let mut a_q24 = [0i32; MAX_LPC_ORDER];
            k2a(&mut a_q24, &rc_q15[..order]).unwrap();
            let gain = lpc_inverse_pred_gain_q24(&a_q24[..order]);
            prop_assert!(gain > 0, "rc {:?} gave gain {}", &rc_q15[..order], gain);
            prop_assert!(gain <= ONE_Q30);
        }
    }
}
