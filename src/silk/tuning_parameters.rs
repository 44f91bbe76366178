//! Encoder tuning parameters for the SILK parameter stage.
//!
//! Compile-time constants are stored in the fixed-point domain the routines
//! consume them in. [`EncoderTuning`] gathers the knobs an encoder adjusts at
//! run time.

use crate::silk::errors::{Result, SilkError};

/// Maximum cumulative long-term prediction gain in dB.
pub const MAX_SUM_LOG_GAIN_DB: i32 = 250;

/// Cumulative LTP gain cap divided by 6 (dB to log2), Q7.
pub const MAX_SUM_LOG_GAIN_Q7: i32 = 5_333;

/// Base offset for the residual quantiser rate/distortion trade-off (1.2), Q10.
pub const LAMBDA_OFFSET_Q10: i32 = 1_229;

/// Penalty per delayed-decision state (-0.05), Q10.
pub const LAMBDA_DELAYED_DECISIONS_Q10: i32 = -50;

/// Speech-activity component (-0.2), Q18.
pub const LAMBDA_SPEECH_ACT_Q18: i32 = -52_428;

/// Input quality component (-0.1), Q12.
pub const LAMBDA_INPUT_QUALITY_Q12: i32 = -409;

/// Coding quality component (-0.2), Q12.
pub const LAMBDA_CODING_QUALITY_Q12: i32 = -818;

/// Quantisation offset component (0.8), Q16.
pub const LAMBDA_QUANT_OFFSET_Q16: i32 = 52_429;

/// LTP quantiser rate weight for narrowband, Q9.
pub const MU_LTP_QUANT_NB_Q9: i32 = 15;

/// LTP quantiser rate weight for mediumband, Q9.
pub const MU_LTP_QUANT_MB_Q9: i32 = 13;

/// LTP quantiser rate weight for wideband, Q9.
pub const MU_LTP_QUANT_WB_Q9: i32 = 10;

/// Runtime encoder knobs consumed by the parameter quantisers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderTuning {
    /// Weight of the code length in the LTP codebook search, Q9.
    pub ltp_mu_q9: i32,
    /// Stop the LTP codebook scan once a codebook is good enough.
    pub ltp_low_complexity: bool,
    /// Expected packet loss in percent.
    pub packet_loss_percent: i32,
    /// Number of 20 ms frames per packet (1..=3).
    pub frames_per_packet: usize,
    /// Number of delayed-decision states in the residual quantiser.
    pub n_states_delayed_decision: i32,
}

impl EncoderTuning {
    /// Defaults for an internal sample rate of `fs_khz`.
    pub fn for_sample_rate(fs_khz: i32) -> Result<Self> {
        let ltp_mu_q9 = match fs_khz {
            8 => MU_LTP_QUANT_NB_Q9,
            12 => MU_LTP_QUANT_MB_Q9,
            16 => MU_LTP_QUANT_WB_Q9,
            other => return Err(SilkError::UnsupportedSampleRate(other)),
        };

        Ok(Self {
            ltp_mu_q9,
            ltp_low_complexity: false,
            packet_loss_percent: 0,
            frames_per_packet: 1,
            n_states_delayed_decision: 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(8, MU_LTP_QUANT_NB_Q9)]
    #[test_case(12, MU_LTP_QUANT_MB_Q9)]
    #[test_case(16, MU_LTP_QUANT_WB_Q9)]
    fn picks_mu_per_bandwidth(fs_khz: i32, mu: i32) {
        let tuning = EncoderTuning::for_sample_rate(fs_khz).unwrap();
        assert_eq!(tuning.ltp_mu_q9, mu);
        assert_eq!(tuning.frames_per_packet, 1);
        assert!(!tuning.ltp_low_complexity);
    }

    #[test]
    fn rejects_unknown_rate() {
        assert_eq!(
            EncoderTuning::for_sample_rate(24),
            Err(SilkError::UnsupportedSampleRate(24))
        );
    }

    #[test]
    fn sum_log_gain_cap_matches_db_value() {
        assert_eq!(MAX_SUM_LOG_GAIN_Q7, (MAX_SUM_LOG_GAIN_DB * 128 + 3) / 6);
    }
}
