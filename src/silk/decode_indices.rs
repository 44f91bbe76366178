//! Side-information index decoding.
//!
//! Extracts the signal type, gain indices, NLSF indices, pitch lag and LTP
//! metadata of one frame from the entropy decoder, in bitstream order. Every
//! symbol is checked against the alphabet of the table it was decoded with so
//! that a corrupt stream surfaces as [`SilkError::CorruptIndex`] instead of an
//! out-of-bounds table access further down the pipeline.

use crate::silk::decode_pitch::contour_codebook_size;
use crate::silk::entropy::SymbolDecoder;
use crate::silk::errors::{IndexField, Result, SilkError, check_index};
use crate::silk::state::ChannelState;
use crate::silk::tables_gain::{DELTA_GAIN_ICDF, GAIN_ICDF, GAIN_LSB_ICDF, N_LEVELS_QGAIN};
use crate::silk::tables_ltp::{
    LTP_GAIN_ICDF, LTP_PER_INDEX_ICDF, LTP_SCALE_ICDF, LTP_SCALES_TABLE_Q14, LTP_VQ_SIZES,
    NB_LTP_CBKS,
};
use crate::silk::tables_other::{
    NLSF_EXT_ICDF, NLSF_INTERPOLATION_FACTOR_ICDF, SEED_ICDF, TYPE_OFFSET_NO_VAD_ICDF,
    TYPE_OFFSET_VAD_ICDF,
};
use crate::silk::tables_pitch_lag::{PITCH_DELTA_ICDF, PITCH_LAG_ICDF};
use crate::silk::{
    FrameQuantizationOffsetType, FrameSignalType, MAX_FRAMES_PER_PACKET, MAX_LPC_ORDER,
    MAX_NB_SUBFR, NLSF_QUANT_MAX_AMPLITUDE,
};

/// Offset between the pitch delta symbol and the coded lag change.
pub(crate) const PITCH_DELTA_OFFSET: i32 = 9;

/// Largest NLSF residual magnitude reachable with one escape symbol.
pub(crate) const MAX_NLSF_RESIDUAL: i32 =
    NLSF_QUANT_MAX_AMPLITUDE + NLSF_EXT_ICDF.len() as i32 - 1;

/// How a frame depends on its predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionalCoding {
    /// First frame of a packet: absolute gains and LTP scaling.
    Independent,
    /// Absolute gains without LTP scaling (LBRR frames after a gap).
    IndependentNoLtpScaling,
    /// Gains and pitch lag coded against the previous frame.
    Conditional,
}

impl ConditionalCoding {
    pub fn is_independent(self) -> bool {
        matches!(self, Self::Independent | Self::IndependentNoLtpScaling)
    }
}

/// Quantisation indices of one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideInfoIndices {
    pub gains_indices: [i8; MAX_NB_SUBFR],
    pub ltp_index: [i8; MAX_NB_SUBFR],
    /// Stage-1 index followed by one residual index per coefficient.
    pub nlsf_indices: [i8; MAX_LPC_ORDER + 1],
    pub lag_index: i16,
    pub contour_index: i8,
    pub signal_type: FrameSignalType,
    pub quant_offset_type: FrameQuantizationOffsetType,
    /// NLSF interpolation factor in quarter steps; 4 disables interpolation.
    pub nlsf_interp_coef_q2: i8,
    pub per_index: i8,
    pub ltp_scale_index: i8,
    pub seed: i8,
}

impl Default for SideInfoIndices {
    fn default() -> Self {
        Self {
            gains_indices: [0; MAX_NB_SUBFR],
            ltp_index: [0; MAX_NB_SUBFR],
            nlsf_indices: [0; MAX_LPC_ORDER + 1],
            lag_index: 0,
            contour_index: 0,
            signal_type: FrameSignalType::Inactive,
            quant_offset_type: FrameQuantizationOffsetType::Low,
            nlsf_interp_coef_q2: 4,
            per_index: 0,
            ltp_scale_index: 0,
            seed: 0,
        }
    }
}

impl SideInfoIndices {
    /// Joint type/offset symbol value (`2 * type + offset`).
    pub fn type_offset(&self) -> usize {
        2 * self.signal_type.index() + self.quant_offset_type.index()
    }

    /// Checks every index against the domain its table can code for `state`.
    pub fn validate(&self, state: &ChannelState, coding: ConditionalCoding) -> Result<()> {
        let nb_subfr = state.nb_subfr;
        for (k, &gain) in self.gains_indices.iter().take(nb_subfr).enumerate() {
            let max = if k == 0 && coding.is_independent() {
                N_LEVELS_QGAIN as i32 - 1
            } else {
                DELTA_GAIN_ICDF.len() as i32 - 1
            };
            check_index(IndexField::Gain, i32::from(gain), max)?;
        }

        let codebook = state.nlsf_codebook;
        check_index(
            IndexField::NlsfStage1,
            i32::from(self.nlsf_indices[0]),
            codebook.n_vectors as i32 - 1,
        )?;
        for &residual in &self.nlsf_indices[1..=state.lpc_order] {
            check_index(
                IndexField::NlsfResidual,
                i32::from(residual).abs(),
                MAX_NLSF_RESIDUAL,
            )?;
        }
        check_index(
            IndexField::NlsfInterpolation,
            i32::from(self.nlsf_interp_coef_q2),
            4,
        )?;

        if self.signal_type == FrameSignalType::Voiced {
            check_index(
                IndexField::LagIndex,
                i32::from(self.lag_index),
                state.max_lag() - state.min_lag(),
            )?;
            check_index(
                IndexField::Contour,
                i32::from(self.contour_index),
                contour_codebook_size(state.fs_khz, nb_subfr) as i32 - 1,
            )?;
            check_index(
                IndexField::Periodicity,
                i32::from(self.per_index),
                NB_LTP_CBKS as i32 - 1,
            )?;
            let cbk_size = LTP_VQ_SIZES[self.per_index as usize] as i32;
            for &ltp_index in self.ltp_index.iter().take(nb_subfr) {
                check_index(IndexField::LtpIndex, i32::from(ltp_index), cbk_size - 1)?;
            }
            check_index(
                IndexField::LtpScale,
                i32::from(self.ltp_scale_index),
                LTP_SCALES_TABLE_Q14.len() as i32 - 1,
            )?;
        }

        check_index(IndexField::Seed, i32::from(self.seed), SEED_ICDF.len() as i32 - 1)
    }
}

/// Decodes one symbol and rejects values outside the table's alphabet.
fn decode_checked(
    decoder: &mut impl SymbolDecoder,
    icdf: &[u8],
    field: IndexField,
) -> Result<usize> {
    let symbol = decoder.decode_icdf(icdf, 8);
    let value = i32::try_from(symbol).unwrap_or(i32::MAX);
    check_index(field, value, icdf.len() as i32 - 1)?;
    Ok(symbol)
}

/// Decodes the side-information indices of frame `frame_index`.
///
/// `decode_lbrr` selects the VAD type table regardless of the packet's VAD
/// flags. The channel is only read; the caller commits the signal type and
/// lag with [`ChannelState::commit_indices`] once the frame is accepted.
pub fn decode_indices(
    state: &ChannelState,
    decoder: &mut impl SymbolDecoder,
    frame_index: usize,
    decode_lbrr: bool,
    coding: ConditionalCoding,
) -> Result<SideInfoIndices> {
    if frame_index >= MAX_FRAMES_PER_PACKET {
        return Err(SilkError::FrameIndexOutOfRange(frame_index));
    }

    let mut indices = SideInfoIndices::default();

    let type_offset = if decode_lbrr || state.vad_flags[frame_index] {
        decode_checked(decoder, &TYPE_OFFSET_VAD_ICDF, IndexField::SignalType)? + 2
    } else {
        decode_checked(decoder, &TYPE_OFFSET_NO_VAD_ICDF, IndexField::SignalType)?
    };
    indices.signal_type = FrameSignalType::from_index((type_offset >> 1) as i32)
        .ok_or(SilkError::corrupt(IndexField::SignalType, type_offset as i32, 5))?;
    indices.quant_offset_type = if type_offset & 1 == 0 {
        FrameQuantizationOffsetType::Low
    } else {
        FrameQuantizationOffsetType::High
    };

    decode_gains(state, decoder, coding, &mut indices)?;
    decode_nlsf(state, decoder, &mut indices)?;
    if indices.signal_type == FrameSignalType::Voiced {
        decode_pitch_and_ltp(state, decoder, coding, &mut indices)?;
    }

    indices.seed = decode_checked(decoder, &SEED_ICDF, IndexField::Seed)? as i8;

    log::trace!(
        "decode_indices: frame={frame_index} type={:?} gains={:?} lag={}",
        indices.signal_type,
        &indices.gains_indices[..state.nb_subfr],
        indices.lag_index
    );
    Ok(indices)
}

fn decode_gains(
    state: &ChannelState,
    decoder: &mut impl SymbolDecoder,
    coding: ConditionalCoding,
    indices: &mut SideInfoIndices,
) -> Result<()> {
    if coding.is_independent() {
        let msb_icdf = &GAIN_ICDF[indices.signal_type.index()];
        let msb = decode_checked(decoder, msb_icdf, IndexField::Gain)?;
        let lsb = decode_checked(decoder, &GAIN_LSB_ICDF, IndexField::Gain)?;
        indices.gains_indices[0] = ((msb << 3) | lsb) as i8;
    } else {
        indices.gains_indices[0] = decode_checked(decoder, &DELTA_GAIN_ICDF, IndexField::Gain)? as i8;
    }

    for gain in indices.gains_indices.iter_mut().take(state.nb_subfr).skip(1) {
        *gain = decode_checked(decoder, &DELTA_GAIN_ICDF, IndexField::Gain)? as i8;
    }
    Ok(())
}

fn decode_nlsf(
    state: &ChannelState,
    decoder: &mut impl SymbolDecoder,
    indices: &mut SideInfoIndices,
) -> Result<()> {
    let codebook = state.nlsf_codebook;
    let stage1 = decode_checked(
        decoder,
        codebook.stage1_icdf(indices.signal_type),
        IndexField::NlsfStage1,
    )?;
    indices.nlsf_indices[0] = stage1 as i8;

    let unpacked = codebook.unpack(stage1);
    for (i, &offset) in unpacked.ec_ix.iter().take(state.lpc_order).enumerate() {
        let mut symbol = decode_checked(
            decoder,
            codebook.residual_icdf(offset),
            IndexField::NlsfResidual,
        )? as i32;
        if symbol == 0 {
            symbol -= decode_checked(decoder, &NLSF_EXT_ICDF, IndexField::NlsfResidual)? as i32;
        } else if symbol == 2 * NLSF_QUANT_MAX_AMPLITUDE {
            symbol += decode_checked(decoder, &NLSF_EXT_ICDF, IndexField::NlsfResidual)? as i32;
        }
        indices.nlsf_indices[i + 1] = (symbol - NLSF_QUANT_MAX_AMPLITUDE) as i8;
    }

    indices.nlsf_interp_coef_q2 = if state.nb_subfr == MAX_NB_SUBFR {
        decode_checked(
            decoder,
            &NLSF_INTERPOLATION_FACTOR_ICDF,
            IndexField::NlsfInterpolation,
        )? as i8
    } else {
        4
    };
    Ok(())
}

fn decode_pitch_and_ltp(
    state: &ChannelState,
    decoder: &mut impl SymbolDecoder,
    coding: ConditionalCoding,
    indices: &mut SideInfoIndices,
) -> Result<()> {
    let max_lag_index = state.max_lag() - state.min_lag();

    let mut lag_index = None;
    if coding == ConditionalCoding::Conditional && state.prev_signal_type == FrameSignalType::Voiced
    {
        let delta = decode_checked(decoder, &PITCH_DELTA_ICDF, IndexField::LagIndex)? as i32;
        if delta > 0 {
            lag_index = Some(i32::from(state.prev_lag_index) + delta - PITCH_DELTA_OFFSET);
        }
    }
    let lag_index = match lag_index {
        Some(lag) => lag,
        None => {
            let high = decode_checked(decoder, &PITCH_LAG_ICDF, IndexField::LagIndex)? as i32;
            let low = decode_checked(
                decoder,
                state.pitch_lag_low_bits_icdf(),
                IndexField::LagIndex,
            )? as i32;
            high * state.lag_stride() + low
        }
    };
    check_index(IndexField::LagIndex, lag_index, max_lag_index)?;
    indices.lag_index = lag_index as i16;

    indices.contour_index =
        decode_checked(decoder, state.pitch_contour_icdf(), IndexField::Contour)? as i8;

    let per_index = decode_checked(decoder, &LTP_PER_INDEX_ICDF, IndexField::Periodicity)?;
    indices.per_index = per_index as i8;
    let gain_icdf = LTP_GAIN_ICDF[per_index];
    for ltp_index in indices.ltp_index.iter_mut().take(state.nb_subfr) {
        *ltp_index = decode_checked(decoder, gain_icdf, IndexField::LtpIndex)? as i8;
    }

    indices.ltp_scale_index = if coding == ConditionalCoding::Independent {
        decode_checked(decoder, &LTP_SCALE_ICDF, IndexField::LtpScale)? as i8
    } else {
        0
    };
    Ok(())
}
