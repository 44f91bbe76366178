//! Fixed-point primitives shared by the SILK parameter routines.
//!
//! The naming follows the SILK macro vocabulary: `b`/`t` select the bottom or
//! top 16 bits of an operand and `w` a full 32-bit word, so `smulwb` multiplies
//! a 32-bit word by the bottom 16 bits of another and keeps the top 32 bits of
//! the 48-bit product. Arithmetic that the codec allows to wrap uses the
//! `wrapping_*` operations explicitly.

#![allow(clippy::cast_possible_truncation)]

#[inline]
pub(crate) fn smulbb(a: i32, b: i32) -> i32 {
    i32::from(a as i16) * i32::from(b as i16)
}

#[inline]
pub(crate) fn smlabb(acc: i32, a: i32, b: i32) -> i32 {
    acc.wrapping_add(smulbb(a, b))
}

#[inline]
pub(crate) fn smulwb(a: i32, b: i32) -> i32 {
    ((i64::from(a) * i64::from(b as i16)) >> 16) as i32
}

#[inline]
pub(crate) fn smlawb(acc: i32, a: i32, b: i32) -> i32 {
    acc.wrapping_add(smulwb(a, b))
}

#[inline]
pub(crate) fn smulww(a: i32, b: i32) -> i32 {
    ((i64::from(a) * i64::from(b)) >> 16) as i32
}

#[inline]
pub(crate) fn smlaww(acc: i32, a: i32, b: i32) -> i32 {
    acc.wrapping_add(smulww(a, b))
}

/// Top 32 bits of the 64-bit product.
#[inline]
pub(crate) fn smmul(a: i32, b: i32) -> i32 {
    ((i64::from(a) * i64::from(b)) >> 32) as i32
}

#[inline]
pub(crate) fn rshift_round(value: i32, shift: u32) -> i32 {
    debug_assert!(shift > 0);
    if shift == 1 {
        (value >> 1) + (value & 1)
    } else {
        ((value >> (shift - 1)) + 1) >> 1
    }
}

#[inline]
pub(crate) fn rshift_round64(value: i64, shift: u32) -> i64 {
    debug_assert!(shift > 0);
    if shift == 1 {
        (value >> 1) + (value & 1)
    } else {
        ((value >> (shift - 1)) + 1) >> 1
    }
}

/// `(a * b) >> q` with rounding, for Q-domain fractional multiplies.
#[inline]
pub(crate) fn mul32_frac_q(a: i32, b: i32, q: u32) -> i32 {
    rshift_round64(i64::from(a) * i64::from(b), q) as i32
}

#[inline]
pub(crate) fn lshift_sat32(value: i32, shift: u32) -> i32 {
    value.clamp(i32::MIN >> shift, i32::MAX >> shift) << shift
}

/// Saturating add for operands known to be non-negative.
#[inline]
pub(crate) fn add_pos_sat32(a: i32, b: i32) -> i32 {
    debug_assert!(a >= 0 && b >= 0);
    a.saturating_add(b)
}

#[inline]
pub(crate) fn sat16(value: i32) -> i16 {
    value.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

#[inline]
pub(crate) fn clz32(value: i32) -> u32 {
    (value as u32).leading_zeros()
}

/// Leading-zero count and the 7 bits following the leading one.
#[inline]
pub(crate) fn clz_frac(value: i32) -> (u32, i32) {
    let lz = clz32(value);
    let rotation = (24i32 - lz as i32).rem_euclid(32) as u32;
    let frac_q7 = ((value as u32).rotate_right(rotation) & 0x7f) as i32;
    (lz, frac_q7)
}

/// Approximate `1 / b` in the requested Q-domain with one Newton refinement.
pub(crate) fn inverse32_varq(b: i32, q_res: i32) -> i32 {
    debug_assert!(b != 0);
    debug_assert!(q_res > 0);

    let headroom = clz32(b.wrapping_abs()) as i32 - 1;
    let b_nrm = b.wrapping_shl(headroom as u32);
    let b_inv = (i32::MAX >> 2) / (b_nrm >> 16);

    let mut result = b_inv << 16;
    let err_q32 = ((1i32 << 29) - smulwb(b_nrm, b_inv)).wrapping_shl(3);
    result = smlaww(result, err_q32, b_inv);

    let shift = 61 - headroom - q_res;
    if shift <= 0 {
        lshift_sat32(result, (-shift) as u32)
    } else if shift < 32 {
        result >> shift
    } else {
        0
    }
}

/// Approximate integer square root with about 10 bits of accuracy.
pub(crate) fn sqrt_approx(x: i32) -> i32 {
    if x <= 0 {
        return 0;
    }

    let (lz, frac_q7) = clz_frac(x);
    let mut y: i32 = if lz & 1 != 0 { 32_768 } else { 46_214 };
    y >>= lz >> 1;
    smlawb(y, y, smulbb(213, frac_q7))
}
