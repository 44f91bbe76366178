//! Half-sine analysis window computed with a two-pole oscillator.
//!
//! Instead of evaluating `sin`, the window is generated by the recurrence
//! `s[n+1] = 2 cos(w) s[n] - s[n-1]`, advanced two samples at a time with the
//! odd samples taken as the average of their neighbours. Both state values
//! are clamped to unity each step so rounding cannot make the oscillator grow.

use crate::silk::fixed::smulwb;

/// `pi / (length + 1)` in Q16 for lengths 16, 20, ..., 120.
const FREQ_TABLE_Q16: [i16; 27] = [
    12111, 9804, 8235, 7100, 6239, 5565, 5022, 4575, 4202, 3885, 3612, 3375, 3167, 2984, 2820,
    2674, 2542, 2422, 2313, 2214, 2123, 2038, 1961, 1889, 1822, 1760, 1702,
];

const ONE_Q16: i32 = 1 << 16;

pub const MIN_WINDOW_LENGTH: usize = 16;
pub const MAX_WINDOW_LENGTH: usize = 120;

/// Which half of the sine period to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SineWindow {
    /// From 0 to pi/2 (window type 1).
    Rising,
    /// From pi/2 to pi (window type 2).
    Falling,
}

impl SineWindow {
    /// Maps the numeric window type (1 or 2) used by the codec.
    pub const fn from_type(win_type: i32) -> Option<Self> {
        match win_type {
            1 => Some(Self::Rising),
            2 => Some(Self::Falling),
            _ => None,
        }
    }
}

/// Windows `input` into `output`.
///
/// The length must be a multiple of 4 between 16 and 120 samples.
pub fn apply_sine_window(output: &mut [i16], input: &[i16], window: SineWindow) {
    let length = input.len();
    assert_eq!(output.len(), length, "window buffers must have equal length");
    assert!(
        (MIN_WINDOW_LENGTH..=MAX_WINDOW_LENGTH).contains(&length) && length % 4 == 0,
        "window length {length} must be a multiple of 4 in 16..=120"
    );

    let freq_q16 = i32::from(FREQ_TABLE_Q16[length / 4 - 4]);
    // 2 * (cos(w) - 1), approximated as -w^2
    let c_q16 = smulwb(freq_q16, -freq_q16);
    let length = length as i32;

    let (mut s0_q16, mut s1_q16) = match window {
        SineWindow::Rising => (0, freq_q16 + (length >> 3)),
        SineWindow::Falling => (ONE_Q16, ONE_Q16 + (c_q16 >> 1) + (length >> 4)),
    };

    for (x, y) in input.chunks_exact(4).zip(output.chunks_exact_mut(4)) {
        y[0] = smulwb((s0_q16 + s1_q16) >> 1, i32::from(x[0])) as i16;
        y[1] = smulwb(s1_q16, i32::from(x[1])) as i16;
        s0_q16 = (smulwb(s1_q16, c_q16) + (s1_q16 << 1) - s0_q16 + 1).min(ONE_Q16);

        y[2] = smulwb((s0_q16 + s1_q16) >> 1, i32::from(x[2])) as i16;
        y[3] = smulwb(s0_q16, i32::from(x[3])) as i16;
        s1_q16 = (smulwb(s0_q16, c_q16) + (s0_q16 << 1) - s1_q16).min(ONE_Q16);
    }
}
