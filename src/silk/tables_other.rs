//! Small probability and scaling tables shared by the index codec.

/// Joint signal-type/offset iCDF for frames without voice activity.
pub const TYPE_OFFSET_NO_VAD_ICDF: [u8; 2] = [230, 0];

/// Joint signal-type/offset iCDF for voice-active frames. Symbols are offset by 2.
pub const TYPE_OFFSET_VAD_ICDF: [u8; 4] = [232, 158, 10, 0];

/// Escape iCDF extending NLSF residuals beyond the stage-2 alphabet.
pub const NLSF_EXT_ICDF: [u8; 7] = [100, 40, 16, 7, 3, 1, 0];

/// NLSF interpolation factor iCDF.
pub const NLSF_INTERPOLATION_FACTOR_ICDF: [u8; 5] = [243, 221, 192, 181, 0];

/// Excitation seed iCDF.
pub const SEED_ICDF: [u8; 4] = [192, 128, 64, 0];

/// Joint LBRR flags for two-frame packets. Symbol + 1 is the frame mask.
pub const LBRR_FLAGS_2_ICDF: [u8; 3] = [203, 150, 0];

/// Joint LBRR flags for three-frame packets.
pub const LBRR_FLAGS_3_ICDF: [u8; 7] = [215, 195, 166, 125, 110, 82, 0];

/// Excitation quantisation offsets in Q10, indexed by `[signal_type >> 1][offset_type]`.
pub const QUANTIZATION_OFFSETS_Q10: [[i16; 2]; 2] = [[100, 240], [32, 100]];
