//! SILK side-information coding and parameter reconstruction.
//!
//! Modules are split per codec routine. The leaf numeric helpers
//! (`fixed`, `sum_sqr_shift`, `apply_sine_window`, ...) feed the LPC
//! stability engine (`schur`, `k2a`, `lpc_inv_pred_gain`, `nlsf2a`), which in
//! turn backs the decode path (`decode_indices` → `decode_parameters`) and
//! the encode path (`process_gains`, `quant_ltp_gains` → `encode_indices`).

pub mod apply_sine_window;
pub mod bwexpander;
pub mod codebook;
pub mod control;
pub mod decode_indices;
pub mod decode_parameters;
pub mod decode_pitch;
pub mod encode_indices;
pub mod encode_parameters;
pub mod entropy;
pub mod errors;
pub(crate) mod fixed;
pub mod frame_flags;
pub mod gain_quant;
pub mod k2a;
pub mod lin2log;
pub mod log2lin;
pub mod lpc_inv_pred_gain;
pub mod ltp_analysis_filter;
pub mod ltp_scale_ctrl;
pub mod nlsf2a;
pub mod nlsf_decode;
pub mod nlsf_stabilize;
pub mod pitch_est_tables;
pub mod process_gains;
pub mod quant_ltp_gains;
pub mod regularize_correlations;
pub mod schur;
pub mod sigm_q15;
pub mod state;
pub mod sum_sqr_shift;
pub mod table_lsf_cos;
pub mod tables_gain;
pub mod tables_ltp;
pub mod tables_other;
pub mod tables_pitch_lag;
pub mod tuning_parameters;
pub mod vq_wmat_ec;

pub use codebook::NlsfCodebook;
pub use control::{DecoderControl, EncoderControl};
pub use decode_indices::{ConditionalCoding, SideInfoIndices};
pub use entropy::{SymbolDecoder, SymbolEncoder, SymbolTape};
pub use state::ChannelState;

/// Maximum number of 5 ms subframes in a frame.
pub const MAX_NB_SUBFR: usize = 4;

/// Largest supported short-term prediction order.
pub const MAX_LPC_ORDER: usize = 16;

/// Smallest prediction order accepted by the Schur/step-up recursions.
pub const MIN_LPC_ORDER: usize = 6;

/// Number of long-term prediction taps.
pub const LTP_ORDER: usize = 5;

/// Maximum number of 20 ms frames carried in one packet.
pub const MAX_FRAMES_PER_PACKET: usize = 3;

/// Subframe duration in milliseconds.
pub const SUBFR_LENGTH_MS: usize = 5;

/// Largest NLSF residual magnitude before the escape symbol kicks in.
pub const NLSF_QUANT_MAX_AMPLITUDE: i32 = 4;

/// Frame classification carried in the side information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameSignalType {
    #[default]
    Inactive,
    Unvoiced,
    Voiced,
}

impl FrameSignalType {
    /// Maps the two-bit signal type field onto the enum.
    pub const fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(Self::Inactive),
            1 => Some(Self::Unvoiced),
            2 => Some(Self::Voiced),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Inactive => 0,
            Self::Unvoiced => 1,
            Self::Voiced => 2,
        }
    }
}

/// Quantisation offset selector used by the excitation quantiser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameQuantizationOffsetType {
    #[default]
    Low,
    High,
}

impl FrameQuantizationOffsetType {
    pub const fn index(self) -> usize {
        match self {
            Self::Low => 0,
            Self::High => 1,
        }
    }
}

/// Returns `true` for the prediction orders the LPC recursions support.
pub const fn is_supported_lpc_order(order: usize) -> bool {
    order >= MIN_LPC_ORDER && order <= MAX_LPC_ORDER && order % 2 == 0
}
