mod common;

use common::{CODEBOOK, channel};
use proptest::prelude::*;
use silk_params::silk::control::{EncoderControl, FrameAnalysis};
use silk_params::silk::decode_parameters::decode_frame_parameters;
use silk_params::silk::encode_indices::encode_indices;
use silk_params::silk::encode_parameters::quantize_frame_parameters;
use silk_params::silk::frame_flags::{FrameFlags, decode_frame_flags, encode_frame_flags};
use silk_params::silk::gain_quant::{gains_dequant, gains_quant};
use silk_params::silk::state::ChannelState;
use silk_params::silk::tuning_parameters::EncoderTuning;
use silk_params::silk::{
    ConditionalCoding, FrameQuantizationOffsetType, FrameSignalType, LTP_ORDER, MAX_NB_SUBFR,
    SideInfoIndices, SymbolTape,
};

fn coding_for(frame_index: usize) -> ConditionalCoding {
    if frame_index == 0 {
        ConditionalCoding::Independent
    } else {
        ConditionalCoding::Conditional
    }
}

fn packet_frames() -> [SideInfoIndices; 3] {
    let mut voiced = SideInfoIndices {
        signal_type: FrameSignalType::Voiced,
        gains_indices: [40, 3, 5, 4],
        lag_index: 100,
        contour_index: 5,
        per_index: 2,
        ltp_index: [1, 2, 3, 4],
        ltp_scale_index: 1,
        ..SideInfoIndices::default()
    };
    voiced.nlsf_indices[..4].copy_from_slice(&[1, 2, -1, 6]);

    let mut follow_up = SideInfoIndices {
        signal_type: FrameSignalType::Voiced,
        quant_offset_type: FrameQuantizationOffsetType::High,
        gains_indices: [6, 4, 4, 4],
        nlsf_interp_coef_q2: 1,
        lag_index: 104,
        contour_index: 30,
        ltp_index: [7, 0, 1, 2],
        seed: 1,
        ..SideInfoIndices::default()
    };
    follow_up.nlsf_indices[..3].copy_from_slice(&[3, -8, 0]);

    let unvoiced = SideInfoIndices {
        signal_type: FrameSignalType::Unvoiced,
        quant_offset_type: FrameQuantizationOffsetType::High,
        gains_indices: [0, 10, 4, 4],
        nlsf_interp_coef_q2: 2,
        seed: 3,
        ..SideInfoIndices::default()
    };

    [voiced, follow_up, unvoiced]
}

#[test_log::test]
fn three_frame_packet_round_trips() {
    let frames = packet_frames();
    let flags = FrameFlags {
        vad: [true; 3],
        ..FrameFlags::default()
    };

    let mut encoder_state = channel(16, MAX_NB_SUBFR);
    let mut tape = SymbolTape::new();
    encode_frame_flags(&mut tape, &flags, 3).expect("three frames fit a packet");
    for (k, indices) in frames.iter().enumerate() {
        encode_indices(&mut tape, &encoder_state, indices, k, false, coding_for(k))
            .expect("indices are in range");
        encoder_state.commit_indices(indices);
    }

    let mut decoder_state = ChannelState::new(16, MAX_NB_SUBFR, &CODEBOOK).expect("valid layout");
    let decoded_flags = decode_frame_flags(&mut tape, 3).expect("flags decode");
    assert_eq!(decoded_flags, flags);
    decoder_state.apply_frame_flags(&decoded_flags);

    for (k, expected) in frames.iter().enumerate() {
        let frame = decode_frame_parameters(&mut decoder_state, &mut tape, k, false, coding_for(k))
            .expect("frame decodes");
        assert_eq!(&frame.indices, expected, "frame {k}");
    }

    assert_eq!(tape.remaining(), 0);
    assert!(!tape.is_overrun());
    assert_eq!(decoder_state.prev_lag_index, 104);
    assert_eq!(decoder_state.prev_signal_type, FrameSignalType::Unvoiced);
}

fn voiced_analysis() -> FrameAnalysis {
    let mut analysis = FrameAnalysis {
        signal_type: FrameSignalType::Voiced,
        lag_index: 150,
        contour_index: 12,
        seed: 2,
        snr_db_q7: 2_800,
        speech_activity_q8: 200,
        input_tilt_q15: 3_000,
        ..FrameAnalysis::default()
    };
    analysis.nlsf_indices[..5].copy_from_slice(&[2, 1, 0, -3, 4]);
    for (k, taps) in analysis.ltp_target_q14.chunks_exact_mut(LTP_ORDER).enumerate() {
        taps.copy_from_slice(&[200, -600, 9_000 + 500 * k as i16, 1_500, -300]);
    }
    for block in analysis.ltp_weights_q18.chunks_exact_mut(LTP_ORDER * LTP_ORDER) {
        for i in 0..LTP_ORDER {
            block[i * LTP_ORDER + i] = 1 << 18;
            if i + 1 < LTP_ORDER {
                block[i * LTP_ORDER + i + 1] = 1 << 16;
                block[(i + 1) * LTP_ORDER + i] = 1 << 16;
            }
        }
    }
    analysis
}

fn encoder_control() -> EncoderControl {
    EncoderControl {
        gains_q16: [400_000, 520_000, 610_000, 480_000],
        res_nrg: [30_000, 42_000, 51_000, 38_000],
        res_nrg_q: [2, 2, 1, 2],
        lt_pred_cod_gain_q7: 1_900,
        input_quality_q14: 9_000,
        coding_quality_q14: 7_000,
        ..EncoderControl::default()
    }
}

#[test_log::test]
fn quantised_parameters_survive_the_bitstream() {
    let tuning = EncoderTuning {
        packet_loss_percent: 5,
        ..EncoderTuning::for_sample_rate(16).expect("wideband tuning")
    };
    let mut encoder_state = channel(16, MAX_NB_SUBFR);
    let mut decoder_state = channel(16, MAX_NB_SUBFR);
    let mut tape = SymbolTape::new();

    let analyses = [
        voiced_analysis(),
        FrameAnalysis {
            lag_index: 155,
            contour_index: 0,
            ..voiced_analysis()
        },
        FrameAnalysis {
            signal_type: FrameSignalType::Unvoiced,
            quant_offset_type: FrameQuantizationOffsetType::High,
            ..voiced_analysis()
        },
    ];

    let mut encoded = Vec::new();
    for (k, analysis) in analyses.iter().enumerate() {
        let mut control = encoder_control();
        let coding = coding_for(k);
        // indices are emitted against the history before this frame
        let history = encoder_state.clone();
        let indices =
            quantize_frame_parameters(&mut encoder_state, analysis, &mut control, coding, &tuning)
                .expect("analysis is in range");
        encode_indices(&mut tape, &history, &indices, k, false, coding).expect("valid indices");
        encoded.push((indices, control));
    }
    assert_eq!(encoder_state.sum_log_gain_q7, 0);

    for (k, (indices, control)) in encoded.iter().enumerate() {
        let frame = decode_frame_parameters(&mut decoder_state, &mut tape, k, false, coding_for(k))
            .expect("frame decodes");

        assert_eq!(&frame.indices, indices, "frame {k}");
        assert_eq!(frame.control.gains_q16, control.gains_q16, "frame {k}");
        assert_eq!(frame.control.pitch_l, control.pitch_l, "frame {k}");
        assert_eq!(frame.control.ltp_coef_q14, control.ltp_coef_q14, "frame {k}");
        assert_eq!(frame.control.ltp_scale_q14, control.ltp_scale_q14, "frame {k}");
    }

    assert_eq!(tape.remaining(), 0);
    assert_eq!(decoder_state.last_gain_index, encoder_state.last_gain_index);
    assert_eq!(decoder_state.prev_nlsf_q15, encoder_state.prev_nlsf_q15);
    assert_eq!(decoder_state.prev_lag_index, encoder_state.prev_lag_index);
}

#[test]
fn truncated_stream_decodes_zero_symbols() {
    let mut state = channel(8, 2);
    let mut tape = SymbolTape::from_symbols([0, 3]);

    let frame = decode_frame_parameters(&mut state, &mut tape, 0, false, ConditionalCoding::Independent)
        .expect("zero symbols form a valid frame");

    assert!(tape.is_overrun());
    assert_eq!(frame.indices.signal_type, FrameSignalType::Unvoiced);
    assert_eq!(frame.indices.gains_indices[0], 24);
}

proptest! {
    #[test]
    fn arbitrary_symbols_never_corrupt_the_channel(
        symbols in proptest::collection::vec(0usize..48, 0..64),
        fs_khz in prop_oneof![Just(8), Just(12), Just(16)],
        nb_subfr in prop_oneof![Just(2usize), Just(4usize)],
        conditional in any::<bool>(),
    ) {
        let mut state = channel(fs_khz, nb_subfr);
        state.prev_signal_type = FrameSignalType::Voiced;
        state.prev_lag_index = 20;
        let before = state.clone();
        let coding = if conditional {
            ConditionalCoding::Conditional
        } else {
            ConditionalCoding::Independent
        };

        let mut tape = SymbolTape::from_symbols(symbols);
        match decode_frame_parameters(&mut state, &mut tape, 0, false, coding) {
            Ok(frame) => {
                prop_assert_eq!(state.prev_signal_type, frame.indices.signal_type);
                prop_assert!(frame.control.gains_q16[..nb_subfr].iter().all(|&g| g > 0));
            }
            Err(err) => {
                prop_assert!(err.is_protocol_violation(), "{err}");
                prop_assert_eq!(state.prev_nlsf_q15, before.prev_nlsf_q15);
                prop_assert_eq!(state.prev_lag_index, before.prev_lag_index);
                prop_assert_eq!(state.prev_signal_type, before.prev_signal_type);
                prop_assert_eq!(state.last_gain_index, before.last_gain_index);
                prop_assert_eq!(state.first_frame_after_reset, before.first_frame_after_reset);
            }
        }
    }

    #[test]
    fn dequantised_gains_requantise_to_the_same_indices(
        gains in proptest::array::uniform4(1i32..i32::MAX),
        prev in 0i8..64,
        conditional in any::<bool>(),
    ) {
        let mut quantised = gains;
        let mut indices = [0i8; MAX_NB_SUBFR];
        let mut prev_enc = prev;
        gains_quant(&mut indices, &mut quantised, &mut prev_enc, conditional);

        let mut dequantised = [0i32; MAX_NB_SUBFR];
        let mut prev_dec = prev;
        gains_dequant(&mut dequantised, &indices, &mut prev_dec, conditional);
        prop_assert_eq!(dequantised, quantised);
        prop_assert_eq!(prev_dec, prev_enc);
    }
}
