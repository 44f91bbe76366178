//! Per-frame control records exchanged with the synthesis and analysis stages.
//!
//! [`DecoderControl`] is what the frame decoder hands to synthesis filtering.
//! [`EncoderControl`] carries the encoder's working values through gain
//! processing and LTP quantisation, and [`FrameAnalysis`] gathers the
//! analysis results the parameter stage consumes but does not compute.

use crate::silk::{
    FrameQuantizationOffsetType, FrameSignalType, LTP_ORDER, MAX_LPC_ORDER, MAX_NB_SUBFR,
};

/// Decoded parameters for one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecoderControl {
    /// Pitch lag per subframe, in samples.
    pub pitch_l: [i32; MAX_NB_SUBFR],
    /// Gain per subframe, Q16.
    pub gains_q16: [i32; MAX_NB_SUBFR],
    /// LPC coefficients for the first and second half-frame, Q12.
    pub pred_coef_q12: [[i16; MAX_LPC_ORDER]; 2],
    /// LTP taps per subframe, Q14.
    pub ltp_coef_q14: [i16; MAX_NB_SUBFR * LTP_ORDER],
    /// LTP state scaling, Q14.
    pub ltp_scale_q14: i32,
}

impl Default for DecoderControl {
    fn default() -> Self {
        Self {
            pitch_l: [0; MAX_NB_SUBFR],
            gains_q16: [0; MAX_NB_SUBFR],
            pred_coef_q12: [[0; MAX_LPC_ORDER]; 2],
            ltp_coef_q14: [0; MAX_NB_SUBFR * LTP_ORDER],
            ltp_scale_q14: 0,
        }
    }
}

/// Encoder working values for one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncoderControl {
    /// Subframe gains, Q16. Holds the noise-shaping gains on input and the
    /// quantised gains after processing.
    pub gains_q16: [i32; MAX_NB_SUBFR],
    /// Limited gains before quantisation, Q16.
    pub gains_unq_q16: [i32; MAX_NB_SUBFR],
    /// Gain level before this frame was quantised.
    pub last_gain_index_prev: i8,
    pub pitch_l: [i32; MAX_NB_SUBFR],
    /// Quantised LTP taps, Q14.
    pub ltp_coef_q14: [i16; MAX_NB_SUBFR * LTP_ORDER],
    pub ltp_scale_q14: i32,
    /// Residual energy per subframe, scaled by `2^-res_nrg_q`.
    pub res_nrg: [i32; MAX_NB_SUBFR],
    pub res_nrg_q: [i32; MAX_NB_SUBFR],
    /// Long-term prediction coding gain, Q7.
    pub lt_pred_cod_gain_q7: i32,
    pub input_quality_q14: i32,
    pub coding_quality_q14: i32,
    /// Rate/distortion trade-off of the residual quantiser, Q10.
    pub lambda_q10: i32,
}

impl Default for EncoderControl {
    fn default() -> Self {
        Self {
            gains_q16: [0; MAX_NB_SUBFR],
            gains_unq_q16: [0; MAX_NB_SUBFR],
            last_gain_index_prev: 0,
            pitch_l: [0; MAX_NB_SUBFR],
            ltp_coef_q14: [0; MAX_NB_SUBFR * LTP_ORDER],
            ltp_scale_q14: 0,
            res_nrg: [0; MAX_NB_SUBFR],
            res_nrg_q: [0; MAX_NB_SUBFR],
            lt_pred_cod_gain_q7: 0,
            input_quality_q14: 0,
            coding_quality_q14: 0,
            lambda_q10: 0,
        }
    }
}

/// Analysis results for one frame, produced upstream of the parameter stage.
///
/// NLSF and pitch indices come from the external NLSF quantiser and pitch
/// estimator. The LTP target and weights come from the LTP correlation
/// analysis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameAnalysis {
    pub signal_type: FrameSignalType,
    /// Offset chosen by noise shaping; voiced frames override it.
    pub quant_offset_type: FrameQuantizationOffsetType,
    /// NLSF stage-1 index followed by the residual indices.
    pub nlsf_indices: [i8; MAX_LPC_ORDER + 1],
    pub nlsf_interp_coef_q2: i8,
    pub lag_index: i16,
    pub contour_index: i8,
    pub seed: i8,
    /// Unquantised LTP taps per subframe, Q14.
    pub ltp_target_q14: [i16; MAX_NB_SUBFR * LTP_ORDER],
    /// LTP error weighting matrix per subframe (5x5, row major), Q18.
    pub ltp_weights_q18: [i32; MAX_NB_SUBFR * LTP_ORDER * LTP_ORDER],
    /// Coding SNR target, Q7 dB.
    pub snr_db_q7: i32,
    pub speech_activity_q8: i32,
    pub input_tilt_q15: i32,
}

impl Default for FrameAnalysis {
    fn default() -> Self {
        Self {
            signal_type: FrameSignalType::Inactive,
            quant_offset_type: FrameQuantizationOffsetType::Low,
            nlsf_indices: [0; MAX_LPC_ORDER + 1],
            nlsf_interp_coef_q2: 4,
            lag_index: 0,
            contour_index: 0,
            seed: 0,
            ltp_target_q14: [0; MAX_NB_SUBFR * LTP_ORDER],
            ltp_weights_q18: [0; MAX_NB_SUBFR * LTP_ORDER * LTP_ORDER],
            snr_db_q7: 0,
            speech_activity_q8: 0,
            input_tilt_q15: 0,
        }
    }
}
