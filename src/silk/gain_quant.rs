//! Log-domain subframe gain quantiser.
//!
//! Gains map onto 64 levels spaced uniformly between 2 dB and 88 dB. The
//! first subframe of an independently coded frame carries an absolute level,
//! every other subframe a delta against the running level. Deltas above a
//! threshold that depends on the running level count double, which lets the
//! quantiser climb quickly out of near-silence.

use crate::silk::fixed::smulwb;
use crate::silk::lin2log::lin2log;
use crate::silk::log2lin::log2lin;
use crate::silk::tables_gain::{
    MAX_DELTA_GAIN_QUANT, MAX_QGAIN_DB, MIN_DELTA_GAIN_QUANT, MIN_QGAIN_DB, N_LEVELS_QGAIN,
};
use crate::silk::MAX_NB_SUBFR;

const N_LEVELS: i32 = N_LEVELS_QGAIN as i32;
const LOG_RANGE_Q7: i32 = ((MAX_QGAIN_DB - MIN_QGAIN_DB) * 128) / 6;
const OFFSET_Q7: i32 = ((MIN_QGAIN_DB * 128) / 6) + (16 * 128);
const SCALE_Q16: i32 = (65536 * (N_LEVELS - 1)) / LOG_RANGE_Q7;
const INV_SCALE_Q16: i32 = (65536 * LOG_RANGE_Q7) / (N_LEVELS - 1);
const MAX_LOG_INPUT_Q7: i32 = 3967;

/// Largest level drop allowed for an independently coded first subframe.
const MAX_INDEPENDENT_DROP: i32 = 16;

fn double_step_threshold(prev: i32) -> i32 {
    2 * MAX_DELTA_GAIN_QUANT - N_LEVELS + prev
}

fn level_to_gain(level: i32) -> i32 {
    log2lin((smulwb(INV_SCALE_Q16, level) + OFFSET_Q7).min(MAX_LOG_INPUT_Q7))
}

/// Quantises `gain_q16` in place and writes the coded indices to `ind`.
///
/// `prev_ind` carries the running level across frames and holds the level of
/// the last subframe on return. With `conditional` set the first subframe is
/// delta coded as well.
pub fn gains_quant(ind: &mut [i8], gain_q16: &mut [i32], prev_ind: &mut i8, conditional: bool) {
    debug_assert_eq!(ind.len(), gain_q16.len());
    debug_assert!(ind.len() <= MAX_NB_SUBFR);

    let mut prev = i32::from(*prev_ind);
    for (k, (index, gain)) in ind.iter_mut().zip(gain_q16.iter_mut()).enumerate() {
        let mut idx = smulwb(SCALE_Q16, lin2log(*gain) - OFFSET_Q7);

        // hysteresis
        if idx < prev {
            idx += 1;
        }
        idx = idx.clamp(0, N_LEVELS - 1);

        if k == 0 && !conditional {
            idx = idx.clamp(prev + MIN_DELTA_GAIN_QUANT, N_LEVELS - 1);
            prev = idx;
        } else {
            idx -= prev;
            let threshold = double_step_threshold(prev);
            if idx > threshold {
                idx = threshold + ((idx - threshold + 1) >> 1);
            }
            idx = idx.clamp(MIN_DELTA_GAIN_QUANT, MAX_DELTA_GAIN_QUANT);
            if idx > threshold {
                prev = (prev + (idx << 1) - threshold).min(N_LEVELS - 1);
            } else {
                prev += idx;
            }
            idx -= MIN_DELTA_GAIN_QUANT;
        }

        *index = idx as i8;
        *gain = level_to_gain(prev);
    }

    *prev_ind = prev as i8;
}

/// Reconstructs Q16 gains from coded indices.
///
/// Mirrors [`gains_quant`]: fed the indices it produced and the same starting
/// `prev_ind`, it yields the same gains and final level.
pub fn gains_dequant(gain_q16: &mut [i32], ind: &[i8], prev_ind: &mut i8, conditional: bool) {
    debug_assert_eq!(ind.len(), gain_q16.len());
    debug_assert!(ind.len() <= MAX_NB_SUBFR);

    let mut prev = i32::from(*prev_ind);
    for (k, (gain, &index)) in gain_q16.iter_mut().zip(ind).enumerate() {
        let index = i32::from(index);
        if k == 0 && !conditional {
            prev = index.max(prev - MAX_INDEPENDENT_DROP);
        } else {
            let delta = index + MIN_DELTA_GAIN_QUANT;
            let threshold = double_step_threshold(prev);
            if delta > threshold {
                prev += (delta << 1) - threshold;
            } else {
                prev += delta;
            }
        }
        prev = prev.clamp(0, N_LEVELS - 1);
        *gain = level_to_gain(prev);
    }

    *prev_ind = prev as i8;
}

/// Packs the gain indices of a frame into one comparable identifier.
pub fn gains_id(ind: &[i8]) -> i32 {
    ind.iter()
        .fold(0i32, |id, &value| id.wrapping_shl(8).wrapping_add(i32::from(value)))
}
