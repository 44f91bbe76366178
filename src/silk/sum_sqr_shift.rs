//! Energy of a 16-bit signal with adaptive down-shifting.
//!
//! The accumulator is shifted right by two whenever it would wrap into the
//! sign bit, so long or loud vectors still produce a 32-bit energy. The
//! result always keeps two bits of headroom for callers that add a few such
//! energies together.

use crate::silk::fixed::smulbb;

/// Sum of squares of `x` as `(energy, shift)` with `energy << shift` the
/// true energy (up to truncation of the discarded low bits).
///
/// `energy` is non-negative with its two top bits clear and `shift` is even.
#[must_use]
pub fn sum_sqr_shift(x: &[i16]) -> (i32, u32) {
    let pairs = x.len() / 2;
    let mut nrg: u32 = 0;
    let mut shift: u32 = 0;
    let mut pair = 0;

    // unshifted accumulation until the first wrap into the sign bit
    while pair < pairs {
        let base = 2 * pair;
        nrg = nrg.wrapping_add(square(x[base]));
        nrg = nrg.wrapping_add(square(x[base + 1]));
        pair += 1;
        if nrg & 0x8000_0000 != 0 {
            nrg >>= 2;
            shift = 2;
            break;
        }
    }

    while pair < pairs {
        let base = 2 * pair;
        let pair_nrg = square(x[base]).wrapping_add(square(x[base + 1]));
        nrg = nrg.wrapping_add(pair_nrg >> shift);
        if nrg & 0x8000_0000 != 0 {
            nrg >>= 2;
            shift += 2;
        }
        pair += 1;
    }

    if x.len() % 2 == 1 {
        nrg = nrg.wrapping_add(square(x[x.len() - 1]) >> shift);
    }

    if nrg & 0xC000_0000 != 0 {
        nrg >>= 2;
        shift += 2;
    }

    (nrg as i32, shift)
}

#[inline]
fn square(sample: i16) -> u32 {
    smulbb(i32::from(sample), i32::from(sample)) as u32
}
