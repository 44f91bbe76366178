//! Error type shared by the SILK parameter codec.
//!
//! Kernel routines never fail: they saturate or clamp. Only the frame-level
//! entry points return [`SilkError`], either because the bitstream produced an
//! index the closed tables cannot emit (stream corruption) or because the
//! caller configured the channel with an unsupported layout.

use core::fmt;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, SilkError>;

/// Numeric code for a payload with bit errors.
pub const DEC_PAYLOAD_ERROR: i32 = -202;
/// Numeric code for an unsupported internal sampling frequency.
pub const DEC_INVALID_SAMPLING_FREQUENCY: i32 = -200;
/// Numeric code for an invalid frame layout.
pub const DEC_INVALID_FRAME_SIZE: i32 = -203;

/// Side-information field that carried an impossible value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexField {
    SignalType,
    QuantOffset,
    Gain,
    NlsfStage1,
    NlsfResidual,
    NlsfInterpolation,
    LagIndex,
    Contour,
    Periodicity,
    LtpIndex,
    LtpScale,
    Seed,
    LbrrFlags,
}

impl fmt::Display for IndexField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SignalType => "signal type",
            Self::QuantOffset => "quantization offset",
            Self::Gain => "gain",
            Self::NlsfStage1 => "NLSF stage-1",
            Self::NlsfResidual => "NLSF residual",
            Self::NlsfInterpolation => "NLSF interpolation",
            Self::LagIndex => "pitch lag",
            Self::Contour => "pitch contour",
            Self::Periodicity => "LTP periodicity",
            Self::LtpIndex => "LTP codebook",
            Self::LtpScale => "LTP scale",
            Self::Seed => "seed",
            Self::LbrrFlags => "LBRR flags",
        };
        f.write_str(name)
    }
}

/// Errors produced by the frame-level decode and encode entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SilkError {
    /// A decoded (or about to be encoded) index lies outside its table.
    #[error("corrupt stream: {field} index {value} outside 0..={max}")]
    CorruptIndex {
        field: IndexField,
        value: i32,
        max: i32,
    },

    /// NLSF to LPC conversion did not converge to a stable filter.
    #[error("corrupt stream: LPC filter remained unstable after bandwidth expansion")]
    UnstableFilter,

    /// Prediction order outside the even range 6..=16.
    #[error("unsupported LPC order {0}")]
    UnsupportedOrder(usize),

    /// Frames must carry 2 or 4 subframes.
    #[error("unsupported subframe count {0}")]
    UnsupportedSubframeCount(usize),

    /// Internal sampling rate must be 8, 12 or 16 kHz.
    #[error("unsupported internal sample rate {0} kHz")]
    UnsupportedSampleRate(i32),

    /// Frame position beyond the packet capacity.
    #[error("frame index {0} exceeds the frames per packet")]
    FrameIndexOutOfRange(usize),

    /// NLSF codebook slices disagree with its declared dimensions.
    #[error("NLSF codebook {table} has {actual} entries, expected {expected}")]
    CodebookMismatch {
        table: &'static str,
        expected: usize,
        actual: usize,
    },

    /// NLSF minimum spacings that cannot fit inside `0..=pi`.
    #[error("NLSF codebook minimum spacings sum to {0}, above 32768")]
    SpacingOverflow(i32),
}

impl SilkError {
    /// Builds a [`SilkError::CorruptIndex`] for `value` against `0..=max`.
    pub const fn corrupt(field: IndexField, value: i32, max: i32) -> Self {
        Self::CorruptIndex { field, value, max }
    }

    /// Returns `true` when the error stems from bitstream corruption.
    ///
    /// The outer frame loop conceals such frames instead of aborting.
    pub const fn is_protocol_violation(&self) -> bool {
        matches!(self, Self::CorruptIndex { .. } | Self::UnstableFilter)
    }

    /// Numeric SILK decoder error code for this error.
    pub const fn code(&self) -> i32 {
        match self {
            Self::CorruptIndex { .. } | Self::UnstableFilter => DEC_PAYLOAD_ERROR,
            Self::UnsupportedSampleRate(_) => DEC_INVALID_SAMPLING_FREQUENCY,
            Self::UnsupportedOrder(_)
            | Self::UnsupportedSubframeCount(_)
            | Self::FrameIndexOutOfRange(_)
            | Self::CodebookMismatch { .. }
            | Self::SpacingOverflow(_) => DEC_INVALID_FRAME_SIZE,
        }
    }
}

/// Checks that `value` lies in `0..=max`, logging and rejecting otherwise.
pub(crate) fn check_index(field: IndexField, value: i32, max: i32) -> Result<()> {
    if (0..=max).contains(&value) {
        Ok(())
    } else {
        log::warn!("check_index: {field} index {value} outside 0..={max}");
        Err(SilkError::corrupt(field, value, max))
    }
}
