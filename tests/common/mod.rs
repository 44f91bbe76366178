#![allow(dead_code)]

use silk_params::silk::codebook::NlsfCodebook;
use silk_params::silk::state::ChannelState;

/// Order-10 codebook with four stage-1 vectors, enough to drive every path of
/// the index codec without shipping a production table.
pub static CODEBOOK: NlsfCodebook = NlsfCodebook {
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
    cb1_icdf: &[
        180, 100, 40, 0, //
        200, 120, 50, 0,
    ],
    pred_q8: &[
        179, 138, 140, 148, 151, 149, 153, 151, 163, //
        116, 67, 82, 59, 92, 72, 100, 89, 92,
    ],
    ec_sel: &[
        0x00, 0x11, 0x02, 0x13, 0x20, //
        0x22, 0x31, 0x00, 0x12, 0x23, //
        0x10, 0x21, 0x33, 0x02, 0x01, //
        0x03, 0x12, 0x20, 0x31, 0x22,
    ],
    ec_icdf: &[
        254, 250, 236, 200, 60, 20, 6, 2, 0, //
        253, 245, 225, 180, 80, 35, 12, 4, 0,
    ],
    delta_min_q15: &[250, 3, 6, 3, 3, 3, 4, 3, 3, 3, 461],
};

/// A freshly reset channel with every frame flagged as active.
pub fn channel(fs_khz: i32, nb_subfr: usize) -> ChannelState {
    let mut state = ChannelState::new(fs_khz, nb_subfr, &CODEBOOK).expect("valid channel layout");
    state.vad_flags = [true; 3];
    state
}
