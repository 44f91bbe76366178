//! Piecewise-linear logistic function on Q5 inputs.

const SLOPE_Q10: [i32; 6] = [237, 153, 73, 30, 12, 7];
const POSITIVE_Q15: [i32; 6] = [16384, 23955, 28861, 31213, 32178, 32548];
const NEGATIVE_Q15: [i32; 6] = [16384, 8812, 3906, 1554, 589, 219];

/// Inputs with magnitude at or beyond six (in Q5) saturate.
const SATURATION_Q5: i32 = 6 << 5;

/// Approximates `32768 / (1 + exp(-x))` for a Q5 argument.
#[must_use]
pub fn sigm_q15(input_q5: i32) -> i32 {
    let magnitude = input_q5.abs();
    if magnitude >= SATURATION_Q5 {
        return if input_q5 < 0 { 0 } else { i32::from(i16::MAX) };
    }

    let segment = (magnitude >> 5) as usize;
    let step = SLOPE_Q10[segment] * (magnitude & 0x1f);
    if input_q5 < 0 {
        NEGATIVE_Q15[segment] - step
    } else {
        POSITIVE_Q15[segment] + step
    }
}
