//! Subframe gain processing for the encoder.
//!
//! Voiced frames first shrink their gains according to the LTP coding gain.
//! Every gain is then soft-limited against the residual energy and the coding
//! SNR target before being quantised. Finally the quantisation offset and the
//! residual quantiser's rate/distortion multiplier are chosen.

use crate::silk::control::{EncoderControl, FrameAnalysis};
use crate::silk::decode_indices::{ConditionalCoding, SideInfoIndices};
use crate::silk::fixed::{
    lshift_sat32, rshift_round, smlawb, smlaww, smmul, smulbb, smulwb, smulww, sqrt_approx,
};
use crate::silk::gain_quant::gains_quant;
use crate::silk::log2lin::log2lin;
use crate::silk::sigm_q15::sigm_q15;
use crate::silk::state::ChannelState;
use crate::silk::tables_other::QUANTIZATION_OFFSETS_Q10;
use crate::silk::tuning_parameters::{
    EncoderTuning, LAMBDA_CODING_QUALITY_Q12, LAMBDA_DELAYED_DECISIONS_Q10,
    LAMBDA_INPUT_QUALITY_Q12, LAMBDA_OFFSET_Q10, LAMBDA_QUANT_OFFSET_Q16, LAMBDA_SPEECH_ACT_Q18,
};
use crate::silk::{FrameQuantizationOffsetType, FrameSignalType};

const LTP_SIGMOID_OFFSET_Q7: i32 = 12 << 7;
/// 21 + 16 / 0.33, Q7.
const INV_MAX_SQR_BASE_Q7: i32 = 8_894;
/// 0.33, Q16.
const INV_MAX_SQR_EXP_Q16: i32 = 21_627;
const ONE_Q7: i32 = 1 << 7;

/// Limits, quantises and stores the subframe gains of one frame.
///
/// `control.gains_q16` holds the noise-shaping gains on entry and the
/// quantised gains on return; `control.gains_unq_q16` receives the limited
/// gains before quantisation. `indices` receives the gain indices and, for
/// voiced frames, the quantisation offset type.
///
/// Returns the gain level after the last subframe. The channel's own level is
/// left untouched so the caller can commit it with the rest of the frame.
pub fn process_gains(
    state: &ChannelState,
    analysis: &FrameAnalysis,
    tuning: &EncoderTuning,
    indices: &mut SideInfoIndices,
    control: &mut EncoderControl,
    coding: ConditionalCoding,
) -> i8 {
    let nb_subfr = state.nb_subfr;
    let voiced = indices.signal_type == FrameSignalType::Voiced;

    if voiced {
        let reduction_q16 =
            -sigm_q15(rshift_round(control.lt_pred_cod_gain_q7 - LTP_SIGMOID_OFFSET_Q7, 4));
        for gain in control.gains_q16.iter_mut().take(nb_subfr) {
            *gain = smlawb(*gain, *gain, reduction_q16);
        }
    }

    // pow(2, 0.33 * (21 - snr_db)) / subfr_length
    let inv_max_sqr_val_q16 = log2lin(smulwb(
        INV_MAX_SQR_BASE_Q7 - analysis.snr_db_q7,
        INV_MAX_SQR_EXP_Q16,
    )) / state.subfr_length() as i32;

    for k in 0..nb_subfr {
        let mut res_nrg_part = smulww(control.res_nrg[k], inv_max_sqr_val_q16);
        let res_nrg_q = control.res_nrg_q[k];
        let shift = res_nrg_q.unsigned_abs();
        if res_nrg_q > 0 {
            res_nrg_part = if shift < 32 {
                rshift_round(res_nrg_part, shift)
            } else {
                0
            };
        } else if res_nrg_part > 0 {
            let headroom = i32::MAX.checked_shr(shift).unwrap_or(0);
            res_nrg_part = if res_nrg_part >= headroom {
                i32::MAX
            } else {
                res_nrg_part << shift
            };
        }

        let gain = control.gains_q16[k];
        let gain_squared = res_nrg_part.saturating_add(smmul(gain, gain));
        control.gains_q16[k] = if gain_squared < i32::from(i16::MAX) {
            // small gains: redo the sum in Q16
            let gain_squared_q16 = smlaww(res_nrg_part.wrapping_shl(16), gain, gain);
            debug_assert!(gain_squared_q16 > 0);
            lshift_sat32(sqrt_approx(gain_squared_q16).min(i32::MAX >> 8), 8)
        } else {
            lshift_sat32(sqrt_approx(gain_squared).min(i32::MAX >> 16), 16)
        };
    }

    control.gains_unq_q16 = control.gains_q16;
    control.last_gain_index_prev = state.last_gain_index;

    let mut last_gain_index = state.last_gain_index;
    gains_quant(
        &mut indices.gains_indices[..nb_subfr],
        &mut control.gains_q16[..nb_subfr],
        &mut last_gain_index,
        coding == ConditionalCoding::Conditional,
    );

    if voiced {
        indices.quant_offset_type =
            if control.lt_pred_cod_gain_q7 + (analysis.input_tilt_q15 >> 8) > ONE_Q7 {
                FrameQuantizationOffsetType::Low
            } else {
                FrameQuantizationOffsetType::High
            };
    }

    let quant_offset_q10 = i32::from(
        QUANTIZATION_OFFSETS_Q10[indices.signal_type.index() >> 1]
            [indices.quant_offset_type.index()],
    );
    control.lambda_q10 = LAMBDA_OFFSET_Q10
        + smulbb(LAMBDA_DELAYED_DECISIONS_Q10, tuning.n_states_delayed_decision)
        + smulwb(LAMBDA_SPEECH_ACT_Q18, analysis.speech_activity_q8)
        + smulwb(LAMBDA_INPUT_QUALITY_Q12, control.input_quality_q14)
        + smulwb(LAMBDA_CODING_QUALITY_Q12, control.coding_quality_q14)
        + smulwb(LAMBDA_QUANT_OFFSET_Q16, quant_offset_q10);
    debug_assert!(control.lambda_q10 > 0 && control.lambda_q10 < 2 << 10);

    log::trace!(
        "process_gains: indices={:?} lambda_q10={}",
        &indices.gains_indices[..nb_subfr],
        control.lambda_q10
    );
    last_gain_index
}
