//! NLSF to LPC conversion.
//!
//! The NLSFs are mapped through the cosine table, split into the roots of the
//! symmetric (P) and antisymmetric (Q) polynomials, expanded in Q16 and
//! recombined into prediction coefficients. The result is then fitted to 16
//! bits and bandwidth-expanded until the inverse prediction gain test passes.

use crate::silk::bwexpander::bwexpander_32;
use crate::silk::errors::{Result, SilkError};
use crate::silk::fixed::{rshift_round, rshift_round64, sat16};
use crate::silk::lpc_inv_pred_gain::lpc_inverse_pred_gain;
use crate::silk::table_lsf_cos::{LSF_COS_TAB_Q12, LSF_COS_TAB_SZ};
use crate::silk::{MAX_LPC_ORDER, is_supported_lpc_order};

const QA: u32 = 16;

/// Bandwidth expansion passes driven by the stability test.
pub const MAX_LPC_STABILIZE_ITERATIONS: usize = 16;

/// Root orderings that interleave the P and Q roots for better precision.
const ORDERING16: [usize; 16] = [0, 15, 8, 7, 4, 11, 12, 3, 2, 13, 10, 5, 6, 9, 14, 1];
const ORDERING10: [usize; 10] = [0, 9, 6, 3, 4, 5, 8, 1, 2, 7];

/// Converts `nlsf_q15` into Q12 prediction coefficients.
///
/// Orders 10 and 16 use the standard root orderings. Other even orders in
/// 6..=16 use the natural order, which alternates the P and Q roots.
///
/// Returns [`SilkError::UnstableFilter`] if the filter still fails the
/// stability test after every expansion pass.
pub fn nlsf2a(a_q12: &mut [i16], nlsf_q15: &[i16]) -> Result<()> {
    assert_eq!(a_q12.len(), nlsf_q15.len(), "order mismatch");
    let order = a_q12.len();
    if !is_supported_lpc_order(order) {
        return Err(SilkError::UnsupportedOrder(order));
    }

    let mut cos_lsf_qa = [0i32; MAX_LPC_ORDER];
    for (k, &nlsf) in nlsf_q15.iter().enumerate() {
        let target = match order {
            16 => ORDERING16[k],
            10 => ORDERING10[k],
            _ => k,
        };
        cos_lsf_qa[target] = interpolate_cos(nlsf);
    }

    let dd = order / 2;
    let mut p = [0i32; MAX_LPC_ORDER / 2 + 1];
    let mut q = [0i32; MAX_LPC_ORDER / 2 + 1];
    find_poly(&mut p[..=dd], &cos_lsf_qa[..order]);
    find_poly(&mut q[..=dd], &cos_lsf_qa[1..order]);

    let mut a32_qa1 = [0i32; MAX_LPC_ORDER];
    for k in 0..dd {
        let p_tmp = p[k + 1].wrapping_add(p[k]);
        let q_tmp = q[k + 1].wrapping_sub(q[k]);
        a32_qa1[k] = q_tmp.wrapping_neg().wrapping_sub(p_tmp);
        a32_qa1[order - k - 1] = q_tmp.wrapping_sub(p_tmp);
    }

    let a32_qa1 = &mut a32_qa1[..order];
    lpc_fit(a_q12, a32_qa1);

    for iteration in 0..MAX_LPC_STABILIZE_ITERATIONS {
        if lpc_inverse_pred_gain(a_q12) != 0 {
            return Ok(());
        }
        log::debug!("nlsf2a: unstable filter, expansion pass {iteration}");
        bwexpander_32(a32_qa1, (1 << 16) - (2 << iteration));
        for (dst, &value) in a_q12.iter_mut().zip(a32_qa1.iter()) {
            *dst = rshift_round(value, QA + 1 - 12) as i16;
        }
    }

    if lpc_inverse_pred_gain(a_q12) != 0 {
        Ok(())
    } else {
        log::warn!("nlsf2a: filter unstable after {MAX_LPC_STABILIZE_ITERATIONS} passes");
        Err(SilkError::UnstableFilter)
    }
}

/// `2 * cos(pi * nlsf)` in QA by linear interpolation of the table.
fn interpolate_cos(nlsf_q15: i16) -> i32 {
    let nlsf = i32::from(nlsf_q15).max(0);
    let f_int = (nlsf >> (15 - 7)) as usize;
    let f_frac = nlsf - ((f_int as i32) << (15 - 7));
    debug_assert!(f_int < LSF_COS_TAB_SZ);

    let cos_val = i32::from(LSF_COS_TAB_Q12[f_int]);
    let delta = i32::from(LSF_COS_TAB_Q12[f_int + 1]) - cos_val;
    rshift_round((cos_val << 8) + delta * f_frac, 20 - QA)
}

/// Expands the polynomial whose roots are the even-indexed entries of `c_lsf`.
fn find_poly(out: &mut [i32], c_lsf: &[i32]) {
    let dd = out.len() - 1;
    out[0] = 1 << QA;
    out[1] = -c_lsf[0];

    for k in 1..dd {
        let f_tmp = c_lsf[2 * k];
        out[k + 1] = (out[k - 1] << 1)
            .wrapping_sub(rshift_round64(i64::from(f_tmp) * i64::from(out[k]), QA) as i32);
        for n in (2..=k).rev() {
            let product = rshift_round64(i64::from(f_tmp) * i64::from(out[n - 1]), QA) as i32;
            out[n] = out[n].wrapping_add(out[n - 2]).wrapping_sub(product);
        }
        out[1] = out[1].wrapping_sub(f_tmp);
    }
}

const FIT_MAX_ITERATIONS: usize = 10;
const MAX_ABS_CLIP: i32 = 163_838;
/// 0.999 in Q16.
const FIT_BASE_CHIRP_Q16: i32 = 65_470;

/// Fits the Q17 coefficients into 16-bit Q12, chirping and finally clipping.
/// `a32_qa1` is updated to match what was written to `a_q12`.
fn lpc_fit(a_q12: &mut [i16], a32_qa1: &mut [i32]) {
    let shift = QA + 1 - 12;

    for _ in 0..FIT_MAX_ITERATIONS {
        let (idx, maxabs) = a32_qa1
            .iter()
            .map(|v| v.wrapping_abs())
            .enumerate()
            .fold((0usize, 0i32), |best, (k, v)| if v > best.1 { (k, v) } else { best });

        let maxabs_q12 = rshift_round(maxabs, shift);
        if maxabs_q12 <= i32::from(i16::MAX) {
            for (dst, &value) in a_q12.iter_mut().zip(a32_qa1.iter()) {
                *dst = rshift_round(value, shift) as i16;
            }
            return;
        }

        let maxabs_q12 = maxabs_q12.min(MAX_ABS_CLIP);
        let numerator = (maxabs_q12 - i32::from(i16::MAX)) << 14;
        let denominator = (maxabs_q12 * (idx as i32 + 1)) >> 2;
        bwexpander_32(a32_qa1, FIT_BASE_CHIRP_Q16 - numerator / denominator);
    }

    log::debug!("lpc_fit: clipping coefficients after {FIT_MAX_ITERATIONS} passes");
    for (dst, value) in a_q12.iter_mut().zip(a32_qa1.iter_mut()) {
        *dst = sat16(rshift_round(*value, shift));
        *value = i32::from(*dst) << shift;
    }
}
