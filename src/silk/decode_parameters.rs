//! Reconstruction of decoder control values from side-information indices.
//!
//! Gains are dequantised against the running gain level, the NLSF vector is
//! rebuilt and converted to two sets of LPC coefficients (one per half-frame),
//! and voiced frames additionally receive pitch lags and LTP taps. After a
//! packet loss both coefficient sets are bandwidth expanded so that the first
//! good frame does not ring.

use crate::silk::bwexpander::{PLC_BWE_CHIRP_Q16, bwexpander};
use crate::silk::control::DecoderControl;
use crate::silk::decode_indices::{ConditionalCoding, SideInfoIndices, decode_indices};
use crate::silk::decode_pitch::decode_pitch;
use crate::silk::entropy::SymbolDecoder;
use crate::silk::errors::Result;
use crate::silk::gain_quant::gains_dequant;
use crate::silk::nlsf2a::nlsf2a;
use crate::silk::nlsf_decode::nlsf_decode;
use crate::silk::state::ChannelState;
use crate::silk::tables_ltp::{LTP_GAIN_VQ_Q7, LTP_SCALES_TABLE_Q14};
use crate::silk::{FrameSignalType, LTP_ORDER, MAX_LPC_ORDER};

/// Parameters of one frame together with the history they imply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedParameters {
    pub control: DecoderControl,
    /// NLSF vector of this frame, Q15; becomes the channel's previous NLSF.
    pub nlsf_q15: [i16; MAX_LPC_ORDER],
    /// Gain level after the last subframe.
    pub last_gain_index: i8,
}

/// Indices and reconstructed parameters of one decoded frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedFrame {
    pub indices: SideInfoIndices,
    pub control: DecoderControl,
}

/// Reconstructs the control values of a frame from its indices.
///
/// The channel is only read. `indices` is normalised in place: the
/// interpolation factor is forced to 4 on the first frame after a reset and
/// the periodicity index is cleared for frames that are not voiced.
///
/// Fails with [`SilkError::CorruptIndex`](crate::silk::errors::SilkError::CorruptIndex) if
/// an index lies outside its table and with `UnstableFilter` if the NLSF
/// vector cannot be turned into a stable predictor.
pub fn decode_parameters(
    state: &ChannelState,
    indices: &mut SideInfoIndices,
    coding: ConditionalCoding,
) -> Result<DecodedParameters> {
    let nb_subfr = state.nb_subfr;
    let order = state.lpc_order;

    if state.first_frame_after_reset && indices.nlsf_interp_coef_q2 != 4 {
        log::debug!(
            "decode_parameters: interpolation {} ignored after reset",
            indices.nlsf_interp_coef_q2
        );
        indices.nlsf_interp_coef_q2 = 4;
    }
    if indices.signal_type != FrameSignalType::Voiced {
        indices.per_index = 0;
    }
    indices.validate(state, coding)?;

    let mut control = DecoderControl::default();

    let mut last_gain_index = state.last_gain_index;
    gains_dequant(
        &mut control.gains_q16[..nb_subfr],
        &indices.gains_indices[..nb_subfr],
        &mut last_gain_index,
        coding == ConditionalCoding::Conditional,
    );

    let mut nlsf_q15 = [0i16; MAX_LPC_ORDER];
    nlsf_decode(
        &mut nlsf_q15[..order],
        indices.nlsf_indices[0] as usize,
        &indices.nlsf_indices[1..=order],
        state.nlsf_codebook,
    );
    nlsf2a(&mut control.pred_coef_q12[1][..order], &nlsf_q15[..order])?;

    if indices.nlsf_interp_coef_q2 < 4 {
        let interp_q2 = i32::from(indices.nlsf_interp_coef_q2);
        let mut nlsf0_q15 = [0i16; MAX_LPC_ORDER];
        for ((nlsf0, &prev), &curr) in nlsf0_q15
            .iter_mut()
            .zip(&state.prev_nlsf_q15)
            .zip(&nlsf_q15)
            .take(order)
        {
            let prev = i32::from(prev);
            *nlsf0 = (prev + ((interp_q2 * (i32::from(curr) - prev)) >> 2)) as i16;
        }
        nlsf2a(&mut control.pred_coef_q12[0][..order], &nlsf0_q15[..order])?;
    } else {
        control.pred_coef_q12[0] = control.pred_coef_q12[1];
    }

    if state.loss_count > 0 {
        log::debug!(
            "decode_parameters: bandwidth expansion after {} lost frames",
            state.loss_count
        );
        for row in &mut control.pred_coef_q12 {
            bwexpander(&mut row[..order], PLC_BWE_CHIRP_Q16);
        }
    }

    if indices.signal_type == FrameSignalType::Voiced {
        decode_pitch(
            indices.lag_index,
            indices.contour_index,
            &mut control.pitch_l,
            state.fs_khz,
            nb_subfr,
        );

        let codebook = LTP_GAIN_VQ_Q7[indices.per_index as usize];
        for (taps, &ltp_index) in control
            .ltp_coef_q14
            .chunks_exact_mut(LTP_ORDER)
            .zip(&indices.ltp_index)
            .take(nb_subfr)
        {
            for (tap, &value_q7) in taps.iter_mut().zip(&codebook[ltp_index as usize]) {
                *tap = i16::from(value_q7) << 7;
            }
        }

        control.ltp_scale_q14 = i32::from(LTP_SCALES_TABLE_Q14[indices.ltp_scale_index as usize]);
    }

    Ok(DecodedParameters {
        control,
        nlsf_q15,
        last_gain_index,
    })
}

/// Decodes the indices of one frame and reconstructs its parameters.
///
/// On success the channel history is advanced: signal type and lag for
/// conditional coding, the gain level, the NLSF vector, and the reset and
/// loss markers. On failure the channel is left exactly as it was.
pub fn decode_frame_parameters(
    state: &mut ChannelState,
    decoder: &mut impl SymbolDecoder,
    frame_index: usize,
    decode_lbrr: bool,
    coding: ConditionalCoding,
) -> Result<DecodedFrame> {
    let mut indices = decode_indices(state, decoder, frame_index, decode_lbrr, coding)?;
    let decoded = decode_parameters(state, &mut indices, coding)?;

    state.commit_indices(&indices);
    state.last_gain_index = decoded.last_gain_index;
    state.prev_nlsf_q15 = decoded.nlsf_q15;
    state.first_frame_after_reset = false;
    state.loss_count = 0;

    Ok(DecodedFrame {
        indices,
        control: decoded.control,
    })
}
