//! Schur recursion: autocorrelation to reflection coefficients.
//!
//! The correlations are first normalised so `c[0]` sits just below 2^30,
//! which gives the 32-bit recursion the most precision without overflow.
//! Reflection coefficients come out in Q15.

use core::cmp::Ordering;

use crate::silk::errors::{Result, SilkError};
use crate::silk::fixed::{clz32, lshift_sat32, sat16, smlawb};
use crate::silk::{MAX_LPC_ORDER, is_supported_lpc_order};

/// Magnitude written when the recursion hits the stability boundary (0.99).
pub const ALMOST_ONE_Q15: i16 = 32440;

/// Computes `rc_q15.len()` reflection coefficients from `c[0..=order]`.
///
/// Returns the prediction residual energy in the scale of `c`, never below 1.
/// If a coefficient would reach unit magnitude the recursion stops: that
/// coefficient is set to `∓0.99` and all later ones to zero.
///
/// `c[0]` must be positive. The order must be even and within 6..=16;
/// other orders return [`SilkError::UnsupportedOrder`].
pub fn schur(rc_q15: &mut [i16], c: &[i32]) -> Result<i32> {
    let order = rc_q15.len();
    if !is_supported_lpc_order(order) {
        return Err(SilkError::UnsupportedOrder(order));
    }
    assert!(c.len() > order, "schur needs order + 1 correlation values");
    debug_assert!(c[0] > 0);

    let lz = clz32(c[0]);
    let normalise = |value: i32| match lz.cmp(&2) {
        Ordering::Less => value >> 1,
        Ordering::Greater => value.wrapping_shl(lz - 2),
        Ordering::Equal => value,
    };

    // column 0 holds the forward correlations, column 1 the backward ones
    let mut table = [[0i32; 2]; MAX_LPC_ORDER + 1];
    for (row, &value) in table.iter_mut().zip(&c[..=order]) {
        let value = normalise(value);
        *row = [value, value];
    }

    rc_q15.fill(0);
    for k in 0..order {
        let forward = table[k + 1][0];
        let energy = table[0][1];
        if i64::from(forward).abs() >= i64::from(energy) {
            rc_q15[k] = if forward > 0 {
                -ALMOST_ONE_Q15
            } else {
                ALMOST_ONE_Q15
            };
            break;
        }

        let rc = i32::from(sat16(-forward / (energy >> 15).max(1)));
        rc_q15[k] = rc as i16;

        for n in 0..order - k {
            let fwd = table[n + k + 1][0];
            let bwd = table[n][1];
            table[n + k + 1][0] = smlawb(fwd, bwd << 1, rc);
            table[n][1] = smlawb(bwd, fwd << 1, rc);
        }
    }

    let residual = table[0][1].max(1);
    let residual = match lz.cmp(&2) {
        Ordering::Less => lshift_sat32(residual, 1),
        Ordering::Greater => (residual >> (lz - 2)).max(1),
        Ordering::Equal => residual,
    };
    Ok(residual)
}
