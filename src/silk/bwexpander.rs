//! Bandwidth expansion ("chirping") of autoregressive filters.
//!
//! Coefficient `i` is scaled by `chirp^(i + 1)`, which pulls every pole of the
//! synthesis filter towards the origin. `chirp_q16 = 1 << 16` leaves the
//! filter untouched.

use crate::silk::fixed::{rshift_round64, smulww};

/// Chirp applied to the previous frame's LPC after a lost packet (0.97 in Q16).
pub const PLC_BWE_CHIRP_Q16: i32 = 63_570;

/// Chirps a Q12 filter in place.
pub fn bwexpander(ar: &mut [i16], chirp_q16: i32) {
    let Some((last, head)) = ar.split_last_mut() else {
        return;
    };

    let mut chirp = chirp_q16;
    let chirp_minus_one_q16 = chirp_q16 - (1 << 16);

    for value in head.iter_mut() {
        *value = scale_q16(chirp, i32::from(*value)) as i16;
        chirp += scale_q16(chirp, chirp_minus_one_q16);
    }

    *last = scale_q16(chirp, i32::from(*last)) as i16;
}

/// Chirps a 32-bit filter in place.
pub fn bwexpander_32(ar: &mut [i32], chirp_q16: i32) {
    let Some((last, head)) = ar.split_last_mut() else {
        return;
    };

    let mut chirp = chirp_q16;
    let chirp_minus_one_q16 = chirp_q16.wrapping_sub(1 << 16);

    for value in head.iter_mut() {
        *value = smulww(chirp, *value);
        chirp = chirp.wrapping_add(scale_q16(chirp, chirp_minus_one_q16));
    }

    *last = smulww(chirp, *last);
}

#[inline]
fn scale_q16(a: i32, b: i32) -> i32 {
    rshift_round64(i64::from(a) * i64::from(b), 16) as i32
}
