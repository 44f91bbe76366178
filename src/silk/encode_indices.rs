//! Side-information index encoding.
//!
//! Writes the indices of one frame in exactly the order
//! [`decode_indices`](crate::silk::decode_indices::decode_indices) reads them
//! and with the same tables, so the two stay bit-exact. Indices are validated
//! before the first symbol is emitted; a rejected frame writes nothing.

use crate::silk::decode_indices::{ConditionalCoding, PITCH_DELTA_OFFSET, SideInfoIndices};
use crate::silk::entropy::SymbolEncoder;
use crate::silk::errors::{IndexField, Result, SilkError};
use crate::silk::state::ChannelState;
use crate::silk::tables_gain::{DELTA_GAIN_ICDF, GAIN_ICDF, GAIN_LSB_ICDF};
use crate::silk::tables_ltp::{LTP_GAIN_ICDF, LTP_PER_INDEX_ICDF, LTP_SCALE_ICDF};
use crate::silk::tables_other::{
    NLSF_EXT_ICDF, NLSF_INTERPOLATION_FACTOR_ICDF, SEED_ICDF, TYPE_OFFSET_NO_VAD_ICDF,
    TYPE_OFFSET_VAD_ICDF,
};
use crate::silk::tables_pitch_lag::{PITCH_DELTA_ICDF, PITCH_LAG_ICDF};
use crate::silk::{FrameSignalType, MAX_FRAMES_PER_PACKET, MAX_NB_SUBFR, NLSF_QUANT_MAX_AMPLITUDE};

/// Lag changes the delta code can express.
const MIN_DELTA_LAG: i32 = -8;
const MAX_DELTA_LAG: i32 = 11;

/// Encodes the side-information indices of frame `frame_index`.
///
/// `encode_lbrr` selects the VAD type table regardless of the channel's VAD
/// flags; the no-VAD table can only code inactive frames. Pitch deltas are
/// taken against the channel's previous lag. The channel is only read; the
/// caller commits the frame with [`ChannelState::commit_indices`].
pub fn encode_indices(
    encoder: &mut impl SymbolEncoder,
    state: &ChannelState,
    indices: &SideInfoIndices,
    frame_index: usize,
    encode_lbrr: bool,
    coding: ConditionalCoding,
) -> Result<()> {
    if frame_index >= MAX_FRAMES_PER_PACKET {
        return Err(SilkError::FrameIndexOutOfRange(frame_index));
    }
    indices.validate(state, coding)?;

    let type_offset = indices.type_offset();
    let uses_vad_table = encode_lbrr || state.vad_flags[frame_index];
    if uses_vad_table {
        if type_offset < 2 {
            return Err(SilkError::corrupt(
                IndexField::SignalType,
                type_offset as i32 - 2,
                TYPE_OFFSET_VAD_ICDF.len() as i32 - 1,
            ));
        }
    } else if type_offset >= TYPE_OFFSET_NO_VAD_ICDF.len() {
        return Err(SilkError::corrupt(
            IndexField::SignalType,
            type_offset as i32,
            TYPE_OFFSET_NO_VAD_ICDF.len() as i32 - 1,
        ));
    }

    if uses_vad_table {
        encoder.encode_icdf(type_offset - 2, &TYPE_OFFSET_VAD_ICDF, 8);
    } else {
        encoder.encode_icdf(type_offset, &TYPE_OFFSET_NO_VAD_ICDF, 8);
    }

    encode_gains(encoder, state, indices, coding);
    encode_nlsf(encoder, state, indices);
    if indices.signal_type == FrameSignalType::Voiced {
        encode_pitch_and_ltp(encoder, state, indices, coding);
    }
    encoder.encode_icdf(indices.seed as usize, &SEED_ICDF, 8);

    log::trace!(
        "encode_indices: frame={frame_index} type={:?} gains={:?} lag={}",
        indices.signal_type,
        &indices.gains_indices[..state.nb_subfr],
        indices.lag_index
    );
    Ok(())
}

fn encode_gains(
    encoder: &mut impl SymbolEncoder,
    state: &ChannelState,
    indices: &SideInfoIndices,
    coding: ConditionalCoding,
) {
    let first = indices.gains_indices[0] as usize;
    if coding.is_independent() {
        encoder.encode_icdf(first >> 3, &GAIN_ICDF[indices.signal_type.index()], 8);
        encoder.encode_icdf(first & 7, &GAIN_LSB_ICDF, 8);
    } else {
        encoder.encode_icdf(first, &DELTA_GAIN_ICDF, 8);
    }

    for &gain in indices.gains_indices.iter().take(state.nb_subfr).skip(1) {
        encoder.encode_icdf(gain as usize, &DELTA_GAIN_ICDF, 8);
    }
}

fn encode_nlsf(encoder: &mut impl SymbolEncoder, state: &ChannelState, indices: &SideInfoIndices) {
    let codebook = state.nlsf_codebook;
    let stage1 = indices.nlsf_indices[0] as usize;
    encoder.encode_icdf(stage1, codebook.stage1_icdf(indices.signal_type), 8);

    let unpacked = codebook.unpack(stage1);
    for (&offset, &residual) in unpacked
        .ec_ix
        .iter()
        .zip(&indices.nlsf_indices[1..])
        .take(state.lpc_order)
    {
        let icdf = codebook.residual_icdf(offset);
        let residual = i32::from(residual);
        if residual >= NLSF_QUANT_MAX_AMPLITUDE {
            encoder.encode_icdf(2 * NLSF_QUANT_MAX_AMPLITUDE as usize, icdf, 8);
            encoder.encode_icdf((residual - NLSF_QUANT_MAX_AMPLITUDE) as usize, &NLSF_EXT_ICDF, 8);
        } else if residual <= -NLSF_QUANT_MAX_AMPLITUDE {
            encoder.encode_icdf(0, icdf, 8);
            encoder.encode_icdf((-residual - NLSF_QUANT_MAX_AMPLITUDE) as usize, &NLSF_EXT_ICDF, 8);
        } else {
            encoder.encode_icdf((residual + NLSF_QUANT_MAX_AMPLITUDE) as usize, icdf, 8);
        }
    }

    if state.nb_subfr == MAX_NB_SUBFR {
        encoder.encode_icdf(
            indices.nlsf_interp_coef_q2 as usize,
            &NLSF_INTERPOLATION_FACTOR_ICDF,
            8,
        );
    }
}

fn encode_pitch_and_ltp(
    encoder: &mut impl SymbolEncoder,
    state: &ChannelState,
    indices: &SideInfoIndices,
    coding: ConditionalCoding,
) {
    let lag_index = i32::from(indices.lag_index);

    let mut absolute = true;
    if coding == ConditionalCoding::Conditional && state.prev_signal_type == FrameSignalType::Voiced
    {
        let delta = lag_index - i32::from(state.prev_lag_index);
        let symbol = if (MIN_DELTA_LAG..=MAX_DELTA_LAG).contains(&delta) {
            absolute = false;
            (delta + PITCH_DELTA_OFFSET) as usize
        } else {
            0
        };
        encoder.encode_icdf(symbol, &PITCH_DELTA_ICDF, 8);
    }

    if absolute {
        let stride = state.lag_stride();
        encoder.encode_icdf((lag_index / stride) as usize, &PITCH_LAG_ICDF, 8);
        encoder.encode_icdf(
            (lag_index % stride) as usize,
            state.pitch_lag_low_bits_icdf(),
            8,
        );
    }

    encoder.encode_icdf(indices.contour_index as usize, state.pitch_contour_icdf(), 8);

    let per_index = indices.per_index as usize;
    encoder.encode_icdf(per_index, &LTP_PER_INDEX_ICDF, 8);
    for &ltp_index in indices.ltp_index.iter().take(state.nb_subfr) {
        encoder.encode_icdf(ltp_index as usize, LTP_GAIN_ICDF[per_index], 8);
    }

    if coding == ConditionalCoding::Independent {
        encoder.encode_icdf(indices.ltp_scale_index as usize, &LTP_SCALE_ICDF, 8);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::silk::FrameQuantizationOffsetType;
    use crate::silk::codebook::fixtures::TEST_CODEBOOK;
    use crate::silk::decode_indices::decode_indices;
    use crate::silk::entropy::SymbolTape;
    use pretty_assertions::assert_eq;

    fn channel(fs_khz: i32, nb_subfr: usize) -> ChannelState {
        let mut state = ChannelState::new(fs_khz, nb_subfr, &TEST_CODEBOOK).unwrap();
        state.vad_flags[0] = true;
        state
    }

    fn round_trip(
        state: &ChannelState,
        indices: &SideInfoIndices,
        coding: ConditionalCoding,
    ) -> (SymbolTape, SideInfoIndices) {
        let mut tape = SymbolTape::new();
        encode_indices(&mut tape, state, indices, 0, false, coding).unwrap();
        let decoded = decode_indices(state, &mut tape, 0, false, coding).unwrap();
        assert_eq!(tape.remaining(), 0);
        assert!(!tape.is_overrun());
        (tape, decoded)
    }

    #[test]
    fn unvoiced_independent_frame_round_trips() {
        let state = channel(16, 4);
        let mut indices = SideInfoIndices {
            signal_type: FrameSignalType::Unvoiced,
            quant_offset_type: FrameQuantizationOffsetType::High,
            gains_indices: [21, 0, 1, 2],
            nlsf_interp_coef_q2: 2,
            seed: 2,
            ..SideInfoIndices::default()
        };
        indices.nlsf_indices[0] = 3;

        let (tape, decoded) = round_trip(&state, &indices, ConditionalCoding::Independent);

        assert_eq!(decoded, indices);
        assert_eq!(&tape.symbols()[..7], &[1, 2, 5, 0, 1, 2, 3]);
    }

    #[test]
    fn voiced_conditional_frame_uses_delta_lag() {
        let mut state = channel(16, 4);
        state.prev_signal_type = FrameSignalType::Voiced;
        state.prev_lag_index = 120;
        let mut indices = SideInfoIndices {
            signal_type: FrameSignalType::Voiced,
            gains_indices: [4, 3, 2, 1],
            lag_index: 125,
            contour_index: 10,
            per_index: 1,
            ltp_index: [3, 5, 7, 9],
            seed: 1,
            ..SideInfoIndices::default()
        };
        indices.nlsf_indices[0] = 2;
        indices.nlsf_indices[1] = 5;
        indices.nlsf_indices[2] = -5;

        let (tape, decoded) = round_trip(&state, &indices, ConditionalCoding::Conditional);

        assert_eq!(decoded, indices);
        // the lag delta directly follows the interpolation factor
        let symbols = tape.symbols();
        let interp = tape.entries().iter().position(|entry| entry.alphabet == 5).unwrap();
        assert_eq!(symbols[interp + 1], 14);
    }

    #[test]
    fn large_lag_jump_escapes_to_absolute_coding() {
        let mut state = channel(12, 2);
        state.prev_signal_type = FrameSignalType::Voiced;
        state.prev_lag_index = 10;
        let indices = SideInfoIndices {
            signal_type: FrameSignalType::Voiced,
            quant_offset_type: FrameQuantizationOffsetType::High,
            lag_index: 150,
            contour_index: 11,
            per_index: 2,
            ltp_index: [31, 0, 0, 0],
            ..SideInfoIndices::default()
        };

        let (tape, decoded) = round_trip(&state, &indices, ConditionalCoding::Conditional);

        assert_eq!(decoded, indices);
        let lag_start = 1 + 2 + 1 + 10;
        assert_eq!(&tape.symbols()[lag_start..lag_start + 3], &[0, 25, 0]);
    }

    #[test]
    fn re_encodes_a_decoded_voiced_frame() {
        let symbols = [
            2, 5, 2, 6, 3, 5, 1, 5, 3, 4, 6, 4, 4, 2, 4, 5, 4, 2, 9, 4, 5, 1, 3, 7, 0, 12, 1, 2,
        ];
        let state = channel(16, 4);
        let mut input = SymbolTape::from_symbols(symbols);
        let indices =
            decode_indices(&state, &mut input, 0, false, ConditionalCoding::Independent).unwrap();
        assert_eq!(indices.lag_index, 76);

        let mut output = SymbolTape::new();
        encode_indices(&mut output, &state, &indices, 0, false, ConditionalCoding::Independent)
            .unwrap();

        assert_eq!(output.symbols(), symbols.to_vec());
        assert_eq!(
            output
                .entries()
                .iter()
                .map(|entry| entry.alphabet)
                .collect::<alloc::vec::Vec<_>>(),
            input.requested_alphabets()
        );
    }

    #[test]
    fn nlsf_residual_escapes_round_trip() {
        let state = channel(16, 4);
        let mut indices = SideInfoIndices {
            signal_type: FrameSignalType::Unvoiced,
            ..SideInfoIndices::default()
        };
        indices.nlsf_indices[1..5].copy_from_slice(&[10, -10, 4, -4]);

        let (tape, decoded) = round_trip(&state, &indices, ConditionalCoding::Independent);

        assert_eq!(decoded, indices);
        let nlsf = &tape.symbols()[7..15];
        assert_eq!(nlsf, &[8, 6, 0, 6, 8, 0, 0, 0]);
    }

    #[test]
    fn inactive_frame_without_vad_uses_small_table() {
        let mut state = channel(8, 2);
        state.vad_flags[0] = false;
        let indices = SideInfoIndices {
            quant_offset_type: FrameQuantizationOffsetType::High,
            seed: 1,
            ..SideInfoIndices::default()
        };

        let (tape, decoded) = round_trip(&state, &indices, ConditionalCoding::Independent);

        assert_eq!(decoded, indices);
        assert_eq!(tape.entries()[0].alphabet, 2);
        assert_eq!(tape.symbols()[0], 1);
    }

    #[test]
    fn rejects_inactive_frame_on_vad_table() {
        let state = channel(16, 4);
        let mut tape = SymbolTape::new();
        let result = encode_indices(
            &mut tape,
            &state,
            &SideInfoIndices::default(),
            0,
            false,
            ConditionalCoding::Independent,
        );
        assert_eq!(result, Err(SilkError::corrupt(IndexField::SignalType, -2, 3)));
        assert!(tape.entries().is_empty());
    }

    #[test]
    fn rejects_voiced_frame_without_vad() {
        let mut state = channel(16, 4);
        state.vad_flags[0] = false;
        let indices = SideInfoIndices {
            signal_type: FrameSignalType::Voiced,
            ..SideInfoIndices::default()
        };
        let mut tape = SymbolTape::new();
        assert_eq!(
            encode_indices(&mut tape, &state, &indices, 0, false, ConditionalCoding::Independent),
            Err(SilkError::corrupt(IndexField::SignalType, 4, 1))
        );
    }

    #[test]
    fn rejects_out_of_range_indices_before_writing() {
        let state = channel(16, 4);
        let indices = SideInfoIndices {
            signal_type: FrameSignalType::Voiced,
            per_index: 0,
            ltp_index: [0, 0, 8, 0],
            ..SideInfoIndices::default()
        };
        let mut tape = SymbolTape::new();
        assert_eq!(
            encode_indices(&mut tape, &state, &indices, 0, false, ConditionalCoding::Independent),
            Err(SilkError::corrupt(IndexField::LtpIndex, 8, 7))
        );
        assert!(tape.entries().is_empty());
    }

    #[test]
    fn rejects_delta_gain_beyond_table() {
        let state = channel(16, 4);
        let indices = SideInfoIndices {
            signal_type: FrameSignalType::Unvoiced,
            gains_indices: [41, 0, 0, 0],
            ..SideInfoIndices::default()
        };
        let mut tape = SymbolTape::new();
        assert_eq!(
            encode_indices(&mut tape, &state, &indices, 0, false, ConditionalCoding::Conditional),
            Err(SilkError::corrupt(IndexField::Gain, 41, 40))
        );
    }
}
