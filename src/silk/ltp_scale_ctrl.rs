//! LTP state scaling control.
//!
//! The first frame of a packet can be decoded without its predecessor, so a
//! strongly predicted frame is protected against loss by scaling down the LTP
//! state it inherits. The more loss is expected and the higher the LTP coding
//! gain, the stronger the scaling. Other frames always use the mildest scale.

use crate::silk::decode_indices::{ConditionalCoding, SideInfoIndices};
use crate::silk::fixed::{smulbb, smulwb};
use crate::silk::tables_ltp::LTP_SCALES_TABLE_Q14;
use crate::silk::tuning_parameters::EncoderTuning;

/// 0.1 in Q9.
const LOSS_GAIN_WEIGHT_Q9: i32 = 51;

/// Selects the LTP scale index for the frame and returns the scale in Q14.
pub fn ltp_scale_ctrl(
    tuning: &EncoderTuning,
    indices: &mut SideInfoIndices,
    coding: ConditionalCoding,
    lt_pred_cod_gain_q7: i32,
) -> i32 {
    indices.ltp_scale_index = if coding == ConditionalCoding::Independent {
        let round_loss = tuning.packet_loss_percent + tuning.frames_per_packet as i32;
        smulwb(smulbb(round_loss, lt_pred_cod_gain_q7), LOSS_GAIN_WEIGHT_Q9).clamp(0, 2) as i8
    } else {
        0
    };
    i32::from(LTP_SCALES_TABLE_Q14[indices.ltp_scale_index as usize])
}
