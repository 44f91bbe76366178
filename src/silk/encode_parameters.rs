//! Encoder side of the parameter stage.
//!
//! Takes the analysis results of one frame, quantises the LTP taps and the
//! subframe gains, and assembles the side-information indices that
//! [`encode_indices`](crate::silk::encode_indices::encode_indices) writes to
//! the bitstream. The channel history is committed only after every index has
//! been checked, so a rejected frame leaves the encoder where it was.

use crate::silk::control::{EncoderControl, FrameAnalysis};
use crate::silk::decode_indices::{ConditionalCoding, SideInfoIndices};
use crate::silk::decode_pitch::{contour_codebook_size, decode_pitch};
use crate::silk::errors::{IndexField, Result, check_index};
use crate::silk::ltp_scale_ctrl::ltp_scale_ctrl;
use crate::silk::nlsf_decode::nlsf_decode;
use crate::silk::process_gains::process_gains;
use crate::silk::quant_ltp_gains::quant_ltp_gains;
use crate::silk::state::ChannelState;
use crate::silk::tuning_parameters::EncoderTuning;
use crate::silk::{FrameSignalType, LTP_ORDER, MAX_LPC_ORDER, MAX_NB_SUBFR};

/// Quantises the parameters of one analysed frame.
///
/// On entry `control` carries the noise-shaping gains, residual energies and
/// quality measures of the frame. On return it holds the quantised gains,
/// pitch lags, LTP taps and scale, and the residual quantiser's lambda.
///
/// Voiced frames draw on the channel's LTP gain budget; any other frame
/// resets it. On success the channel remembers the frame's signal type, lag,
/// gain level, NLSF vector and budget.
pub fn quantize_frame_parameters(
    state: &mut ChannelState,
    analysis: &FrameAnalysis,
    control: &mut EncoderControl,
    coding: ConditionalCoding,
    tuning: &EncoderTuning,
) -> Result<SideInfoIndices> {
    let nb_subfr = state.nb_subfr;
    let order = state.lpc_order;

    let mut indices = SideInfoIndices {
        signal_type: analysis.signal_type,
        quant_offset_type: analysis.quant_offset_type,
        nlsf_indices: analysis.nlsf_indices,
        nlsf_interp_coef_q2: analysis.nlsf_interp_coef_q2,
        seed: analysis.seed,
        ..SideInfoIndices::default()
    };
    if nb_subfr != MAX_NB_SUBFR || state.first_frame_after_reset {
        indices.nlsf_interp_coef_q2 = 4;
    }

    let mut sum_log_gain_q7 = state.sum_log_gain_q7;
    if analysis.signal_type == FrameSignalType::Voiced {
        check_index(
            IndexField::LagIndex,
            i32::from(analysis.lag_index),
            state.max_lag() - state.min_lag(),
        )?;
        check_index(
            IndexField::Contour,
            i32::from(analysis.contour_index),
            contour_codebook_size(state.fs_khz, nb_subfr) as i32 - 1,
        )?;
        indices.lag_index = analysis.lag_index;
        indices.contour_index = analysis.contour_index;
        decode_pitch(
            indices.lag_index,
            indices.contour_index,
            &mut control.pitch_l[..nb_subfr],
            state.fs_khz,
            nb_subfr,
        );

        control.ltp_coef_q14 = analysis.ltp_target_q14;
        let quant = quant_ltp_gains(
            &mut control.ltp_coef_q14[..nb_subfr * LTP_ORDER],
            &analysis.ltp_weights_q18[..nb_subfr * LTP_ORDER * LTP_ORDER],
            &mut sum_log_gain_q7,
            tuning.ltp_mu_q9,
            tuning.ltp_low_complexity,
            nb_subfr,
        );
        indices.per_index = quant.periodicity;
        indices.ltp_index = quant.cbk_index;
        control.ltp_scale_q14 =
            ltp_scale_ctrl(tuning, &mut indices, coding, control.lt_pred_cod_gain_q7);
    } else {
        sum_log_gain_q7 = 0;
        control.pitch_l = [0; MAX_NB_SUBFR];
        control.ltp_coef_q14 = [0; MAX_NB_SUBFR * LTP_ORDER];
        control.ltp_scale_q14 = 0;
    }

    let last_gain_index = process_gains(state, analysis, tuning, &mut indices, control, coding);

    indices.validate(state, coding)?;

    let mut nlsf_q15 = [0i16; MAX_LPC_ORDER];
    nlsf_decode(
        &mut nlsf_q15[..order],
        indices.nlsf_indices[0] as usize,
        &indices.nlsf_indices[1..=order],
        state.nlsf_codebook,
    );

    state.commit_indices(&indices);
    state.last_gain_index = last_gain_index;
    state.sum_log_gain_q7 = sum_log_gain_q7;
    state.prev_nlsf_q15 = nlsf_q15;
    state.first_frame_after_reset = false;

    log::trace!(
        "quantize_frame_parameters: type={:?} per={} gains={:?} sum_log_gain_q7={}",
        indices.signal_type,
        indices.per_index,
        &indices.gains_indices[..nb_subfr],
        sum_log_gain_q7
    );
    Ok(indices)
}
