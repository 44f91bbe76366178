//! Gain quantisation tables.

/// Number of log-spaced gain levels.
pub const N_LEVELS_QGAIN: usize = 64;

/// Largest delta between consecutive gain indices.
pub const MAX_DELTA_GAIN_QUANT: i32 = 36;

/// Smallest delta between consecutive gain indices.
pub const MIN_DELTA_GAIN_QUANT: i32 = -4;

/// Size of the delta gain alphabet.
pub const DELTA_GAIN_QUANT_LEVELS: usize =
    (MAX_DELTA_GAIN_QUANT - MIN_DELTA_GAIN_QUANT + 1) as usize;

/// Lowest representable gain in dB.
pub const MIN_QGAIN_DB: i32 = 2;

/// Highest representable gain in dB.
pub const MAX_QGAIN_DB: i32 = 88;

/// Absolute gain MSB iCDF, indexed by signal type.
pub const GAIN_ICDF: [[u8; N_LEVELS_QGAIN / 8]; 3] = [
    [224, 112, 44, 15, 3, 2, 1, 0],
    [254, 237, 192, 132, 70, 23, 4, 0],
    [255, 252, 226, 155, 61, 11, 2, 0],
];

/// Absolute gain LSB iCDF (three uniform bits).
pub const GAIN_LSB_ICDF: [u8; 8] = [224, 192, 160, 128, 96, 64, 32, 0];

/// Delta gain iCDF.
pub const DELTA_GAIN_ICDF: [u8; DELTA_GAIN_QUANT_LEVELS] = [
    250, 245, 234, 203, 71, 50, 42, 38, 35, 33, 31, 29, 28, 27, 26, 25, 24, 23, 22, 21, 20, 19, 18,
    17, 16, 15, 14, 13, 12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1, 0,
];
