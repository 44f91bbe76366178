//! Minimum-spacing enforcement for NLSF vectors.
//!
//! Each pass finds the worst spacing violation (including the guard bands at
//! 0 and pi) and repairs it. The closest pair is moved apart around its centre,
//! while a violation at either end is snapped to the guard. If violations
//! survive [`MAX_LOOPS`] passes the vector is sorted and then clamped
//! forwards and backwards.

use crate::silk::fixed::sat16;

/// Repair passes before the sort-and-clamp fallback.
pub const MAX_LOOPS: usize = 20;

/// Stabilises `nlsf_q15` in place.
///
/// `delta_min_q15` holds `nlsf_q15.len() + 1` minimum spacings: the lower
/// guard, the gaps between neighbours, and the upper guard.
pub fn nlsf_stabilize(nlsf_q15: &mut [i16], delta_min_q15: &[i16]) {
    let l = nlsf_q15.len();
    if l == 0 {
        return;
    }
    debug_assert_eq!(delta_min_q15.len(), l + 1);
    debug_assert!(delta_min_q15[l] >= 1);

    for _ in 0..MAX_LOOPS {
        let mut min_diff_q15 = i32::from(nlsf_q15[0]) - i32::from(delta_min_q15[0]);
        let mut index = 0usize;

        for i in 1..l {
            let diff_q15 = i32::from(nlsf_q15[i])
                - (i32::from(nlsf_q15[i - 1]) + i32::from(delta_min_q15[i]));
            if diff_q15 < min_diff_q15 {
                min_diff_q15 = diff_q15;
                index = i;
            }
        }

        let last_diff_q15 = (1 << 15) - (i32::from(nlsf_q15[l - 1]) + i32::from(delta_min_q15[l]));
        if last_diff_q15 < min_diff_q15 {
            min_diff_q15 = last_diff_q15;
            index = l;
        }

        if min_diff_q15 >= 0 {
            return;
        }

        if index == 0 {
            nlsf_q15[0] = delta_min_q15[0];
        } else if index == l {
            nlsf_q15[l - 1] = sat16((1 << 15) - i32::from(delta_min_q15[l]));
        } else {
            let half_delta = i32::from(delta_min_q15[index]) >> 1;

            let min_center_q15: i32 = delta_min_q15[..index]
                .iter()
                .map(|&d| i32::from(d))
                .sum::<i32>()
                + half_delta;
            let max_center_q15: i32 = (1 << 15)
                - delta_min_q15[index + 1..=l]
                    .iter()
                    .map(|&d| i32::from(d))
                    .sum::<i32>()
                - half_delta;

            let sum = i32::from(nlsf_q15[index - 1]) + i32::from(nlsf_q15[index]);
            let center_freq_q15 = ((sum + 1) >> 1).clamp(min_center_q15, max_center_q15);

            nlsf_q15[index - 1] = sat16(center_freq_q15 - half_delta);
            nlsf_q15[index] =
                sat16(i32::from(nlsf_q15[index - 1]) + i32::from(delta_min_q15[index]));
        }
    }

    log::debug!("nlsf_stabilize: no convergence after {MAX_LOOPS} passes, clamping");
    insertion_sort(nlsf_q15);

    nlsf_q15[0] = nlsf_q15[0].max(delta_min_q15[0]);
    for i in 1..l {
        let floor = nlsf_q15[i - 1].saturating_add(delta_min_q15[i]);
        nlsf_q15[i] = nlsf_q15[i].max(floor);
    }

    let ceiling = sat16((1 << 15) - i32::from(delta_min_q15[l]));
    nlsf_q15[l - 1] = nlsf_q15[l - 1].min(ceiling);
    for i in (0..l - 1).rev() {
        let ceiling = sat16(i32::from(nlsf_q15[i + 1]) - i32::from(delta_min_q15[i + 1]));
        nlsf_q15[i] = nlsf_q15[i].min(ceiling);
    }
}

fn insertion_sort(values: &mut [i16]) {
    for i in 1..values.len() {
        let value = values[i];
        let mut j = i;
        while j > 0 && values[j - 1] > value {
            values[j] = values[j - 1];
            j -= 1;
        }
        values[j] = value;
    }
}

/// Returns `true` when `nlsf_q15` satisfies every spacing constraint.
pub fn is_stable_nlsf(nlsf_q15: &[i16], delta_min_q15: &[i16]) -> bool {
    let Some(&last) = nlsf_q15.last() else {
        return true;
    };
    i32::from(nlsf_q15[0]) >= i32::from(delta_min_q15[0])
        && nlsf_q15
            .windows(2)
            .zip(&delta_min_q15[1..])
            .all(|(pair, &d)| i32::from(pair[1]) - i32::from(pair[0]) >= i32::from(d))
        && i32::from(last) <= (1 << 15) - i32::from(delta_min_q15[nlsf_q15.len()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn already_stable_vector_is_untouched() {
        let mut nlsf = [3000, 6000, 9000, 12_000];
        nlsf_stabilize(&mut nlsf, &[100, 200, 200, 200, 100]);
        assert_eq!(nlsf, [3000, 6000, 9000, 12_000]);
    }

    #[test]
    fn pulls_crowded_pair_apart_around_its_centre() {
        let mut nlsf = [1000, 5000, 5010, 20_000];
        nlsf_stabilize(&mut nlsf, &[100, 200, 200, 200, 100]);
        assert_eq!(nlsf, [1000, 4905, 5105, 20_000]);
    }

    #[test]
    fn spacings_filling_the_band_pack_tightly() {
        let mut nlsf = [5000, 5001, 5002, 5003];
        let deltas = [100, 8000, 8000, 8000, 8668];
        nlsf_stabilize(&mut nlsf, &deltas);
        assert_eq!(nlsf, [100, 8100, 16_100, 24_100]);
        assert!(is_stable_nlsf(&nlsf, &deltas));
    }

    #[test]
    fn snaps_to_guard_bands() {
        let mut nlsf = [10, 8000, 16_000, 32_760];
        nlsf_stabilize(&mut nlsf, &[100, 200, 200, 200, 100]);
        assert_eq!(nlsf, [100, 8000, 16_000, 32_668]);
    }

    #[test]
    fn enforces_minimum_deltas() {
        let mut nlsf = [200, 205, 210, 215];
        let deltas = [10, 20, 20, 20, 10];
        nlsf_stabilize(&mut nlsf, &deltas);
        assert!(is_stable_nlsf(&nlsf, &deltas));
    }

    #[test]
    fn fallback_sort_produces_sorted_output() {
        let mut nlsf = [30_000, -2000, 15_000, 16_000, 17_000];
        let deltas = [5, 50, 50, 50, 50, 5];
        nlsf_stabilize(&mut nlsf, &deltas);
        assert!(is_stable_nlsf(&nlsf, &deltas));
    }

    proptest! {
        #[test]
        fn output_always_respects_spacing(
            mut nlsf in proptest::collection::vec(0i16..=i16::MAX, 10),
        ) {
            let deltas = [250, 3, 6, 3, 3, 3, 4, 3, 3, 3, 461];
            nlsf_stabilize(&mut nlsf, &deltas);
            prop_assert!(is_stable_nlsf(&nlsf, &deltas), "{:?}", nlsf);
        }
    }
}
