#![no_main]

use libfuzzer_sys::fuzz_target;
use silk_params::silk::codebook::NlsfCodebook;
use silk_params::silk::decode_parameters::decode_frame_parameters;
use silk_params::silk::frame_flags::decode_frame_flags;
use silk_params::silk::state::ChannelState;
use silk_params::silk::{ConditionalCoding, SymbolTape};

const SETUP_BYTE_COUNT: usize = 2;

static CODEBOOK: NlsfCodebook = NlsfCodebook {
    n_vectors: 4,
    order: 10,
    quant_step_size_q16: 11_796,
    inv_quant_step_size_q6: 356,
    cb1_nlsf_q8: &[
        12, 35, 60, 83, 108, 132, 157, 180, 206, 228, //
        15, 28, 48, 75, 104, 128, 150, 172, 200, 226, //
        8, 20, 47, 70, 90, 121, 145, 169, 196, 222, //
        22, 40, 58, 80, 100, 120, 142, 166, 190, 215,
    ],
    cb1_wght_q9: &[
        2897, 2314, 2314, 2314, 2287, 2287, 2314, 2300, 2327, 2287, //
        2888, 2580, 2394, 2367, 2314, 2274, 2274, 2274, 2274, 2194, //
        2487, 2340, 2286, 2261, 2274, 2261, 2274, 2274, 2261, 2161, //
        3005, 2420, 2312, 2346, 2298, 2248, 2237, 2219, 2238, 2197,
    ],
    cb1_icdf: &[180, 100, 40, 0, 200, 120, 50, 0],
    pred_q8: &[
        179, 138, 140, 148, 151, 149, 153, 151, 163, //
        116, 67, 82, 59, 92, 72, 100, 89, 92,
    ],
    ec_sel: &[
        0x00, 0x11, 0x02, 0x13, 0x20, 0x22, 0x31, 0x00, 0x12, 0x23, //
        0x10, 0x21, 0x33, 0x02, 0x01, 0x03, 0x12, 0x20, 0x31, 0x22,
    ],
    ec_icdf: &[
        254, 250, 236, 200, 60, 20, 6, 2, 0, //
        253, 245, 225, 180, 80, 35, 12, 4, 0,
    ],
    delta_min_q15: &[250, 3, 6, 3, 3, 3, 4, 3, 3, 3, 461],
};

fuzz_target!(|data: &[u8]| {
    if data.len() < SETUP_BYTE_COUNT {
        return;
    }

    // byte 0: sample rate and frame length, byte 1: frames per packet
    let fs_khz = [8, 12, 16][usize::from(data[0] % 3)];
    let nb_subfr = if data[0] & 0x80 != 0 { 2 } else { 4 };
    let frames = usize::from(data[1] % 3) + 1;

    let mut state = match ChannelState::new(fs_khz, nb_subfr, &CODEBOOK) {
        Ok(state) => state,
        Err(_) => return,
    };

    // one symbol per byte; values past an alphabet exercise the range checks
    let mut tape = SymbolTape::from_symbols(data[SETUP_BYTE_COUNT..].iter().map(|&b| usize::from(b)));
    let flags = match decode_frame_flags(&mut tape, frames) {
        Ok(flags) => flags,
        Err(_) => return,
    };
    state.apply_frame_flags(&flags);

    for frame_index in 0..frames {
        let coding = if frame_index == 0 {
            ConditionalCoding::Independent
        } else {
            ConditionalCoding::Conditional
        };
        let before = state.clone();
        match decode_frame_parameters(&mut state, &mut tape, frame_index, false, coding) {
            Ok(frame) => assert_eq!(state.prev_signal_type, frame.indices.signal_type),
            Err(err) => {
                assert!(err.is_protocol_violation(), "unexpected error: {err}");
                assert_eq!(state.last_gain_index, before.last_gain_index);
                assert_eq!(state.prev_nlsf_q15, before.prev_nlsf_q15);
                state.note_lost_frame();
            }
        }
        if tape.is_overrun() {
            break;
        }
    }
});
