use proptest::collection::vec;
use proptest::prelude::*;
use silk_params::silk::MAX_LPC_ORDER;
use silk_params::silk::k2a::k2a;
use silk_params::silk::lpc_inv_pred_gain::{
    lpc_inverse_pred_gain, lpc_inverse_pred_gain_q24, ONE_Q30,
};
use silk_params::silk::nlsf2a::nlsf2a;
use test_case::test_case;

/// Feeds an impulse through `1 / A(z)` in floating point. Returns `false` as
/// soon as the output leaves +-1e4, `true` once it has died away or the
/// sample budget runs out.
fn impulse_response_settles(a_q12: &[i16]) -> bool {
    let taps: Vec<f64> = a_q12.iter().map(|&a| f64::from(a) / 4096.0).collect();
    let mut history = vec![0.0f64; taps.len()];
    let mut input = 1.0;

    for n in 0..10_000 {
        let out = input + taps.iter().zip(&history).map(|(a, y)| a * y).sum::<f64>();
        input = 0.0;
        history.rotate_right(1);
        history[0] = out;

        if !(-1e4..1e4).contains(&out) {
            return false;
        }
        if n % 8 == 7 && history.iter().map(|y| y.abs()).sum::<f64>() < 1e-5 {
            return true;
        }
    }
    true
}

/// Reflection coefficients alternating between `r` and `-r / 2`.
fn alternating_reflections(order: usize, r: i16) -> Vec<i16> {
    (0..order).map(|i| if i % 2 == 0 { r } else { -r / 2 }).collect()
}

#[test_case(6)]
#[test_case(8)]
#[test_case(10)]
#[test_case(12)]
#[test_case(14)]
#[test_case(16)]
fn gain_tracks_product_of_reflections(order: usize) {
    for r in (1000..=24_000).step_by(1000) {
        for r in [r, -r] {
            let rc_q15 = alternating_reflections(order, r);
            let expected: f64 = rc_q15
                .iter()
                .map(|&k| 1.0 - (f64::from(k) / 32_768.0).powi(2))
                .product();
            if expected < 0.01 {
                continue;
            }

            let mut a_q24 = vec![0i32; order];
            k2a(&mut a_q24, &rc_q15).unwrap();
            let gain = f64::from(lpc_inverse_pred_gain_q24(&a_q24)) / f64::from(ONE_Q30);
            assert!(
                (gain - expected).abs() <= 0.01 * expected,
                "order {order}, r {r}: {gain} vs {expected}"
            );
        }
    }
}

fn random_predictor() -> impl Strategy<Value = Vec<i16>> {
    (3..=MAX_LPC_ORDER / 2, 0u32..16).prop_flat_map(|(half_order, shift)| {
        vec(any::<i16>(), half_order * 2)
            .prop_map(move |a| a.into_iter().map(|c| c >> shift).collect())
    })
}

fn spaced_nlsf() -> impl Strategy<Value = Vec<i16>> {
    (3..=MAX_LPC_ORDER / 2).prop_flat_map(|half_order| {
        let order = half_order * 2;
        let step = 32_768 / (order as i32 + 1);
        vec(-step / 4..step / 4, order).prop_map(move |jitter| {
            jitter
                .iter()
                .enumerate()
                .map(|(i, &j)| (step * (i as i32 + 1) + j) as i16)
                .collect()
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2048))]

    #[test]
    fn accepted_predictors_settle(a_q12 in random_predictor()) {
        if lpc_inverse_pred_gain(&a_q12) != 0 {
            prop_assert!(impulse_response_settles(&a_q12), "{:?}", a_q12);
        }
    }

    #[test]
    fn nlsf2a_output_passes_the_stability_test(nlsf in spaced_nlsf()) {
        let mut a_q12 = vec![0i16; nlsf.len()];
        prop_assert_eq!(nlsf2a(&mut a_q12, &nlsf), Ok(()));
        prop_assert!(lpc_inverse_pred_gain(&a_q12) > 0, "{:?}", a_q12);
    }
}
