//! Pitch lag bounds and contour codebooks.
//!
//! A contour entry holds one lag offset per subframe. Stage-2 codebooks
//! serve 8 kHz, stage-3 codebooks serve 12 and 16 kHz.

/// Shortest pitch lag in milliseconds.
pub const PE_MIN_LAG_MS: i32 = 2;

/// Longest pitch lag in milliseconds.
pub const PE_MAX_LAG_MS: i32 = 18;

/// Contour entries for 20 ms frames at 8 kHz.
pub const PE_NB_CBKS_STAGE2_EXT: usize = 11;

/// Contour entries for 10 ms frames at 8 kHz.
pub const PE_NB_CBKS_STAGE2_10_MS: usize = 3;

/// Contour entries for 20 ms frames at 12 and 16 kHz.
pub const PE_NB_CBKS_STAGE3_MAX: usize = 34;

/// Contour entries for 10 ms frames at 12 and 16 kHz.
pub const PE_NB_CBKS_STAGE3_10_MS: usize = 12;

/// Stage-2 contour codebook, 10 ms frames. Rows are subframes.
pub const CB_LAGS_STAGE2_10_MS: [[i8; PE_NB_CBKS_STAGE2_10_MS]; 2] = [[0, 1, 0], [0, 0, 1]];

/// Stage-3 contour codebook, 10 ms frames.
pub const CB_LAGS_STAGE3_10_MS: [[i8; PE_NB_CBKS_STAGE3_10_MS]; 2] = [
    [0, 0, 1, -1, 1, -1, 2, -2, 2, -2, 3, -3],
    [0, 1, 0, 1, -1, 2, -1, 2, -2, 3, -2, 3],
];

/// Stage-2 contour codebook, 20 ms frames.
pub const CB_LAGS_STAGE2: [[i8; PE_NB_CBKS_STAGE2_EXT]; 4] = [
    [0, 2, -1, -1, -1, 0, 0, 1, 1, 0, 1],
    [0, 1, 0, 0, 0, 0, 0, 1, 0, 0, 0],
    [0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 0],
    [0, -1, 2, 1, 0, 1, 1, 0, 0, -1, -1],
];

/// Stage-3 contour codebook, 20 ms frames.
pub const CB_LAGS_STAGE3: [[i8; PE_NB_CBKS_STAGE3_MAX]; 4] = [
    [
        0, 0, 1, -1, 0, 1, -1, 0, -1, 1, -2, 2, -2, -2, 2, -3, 2, 3, -3, -4, 3, -4, 4, 4, -5, 5,
        -6, -5, 6, -7, 6, 5, 8, -9,
    ],
    [
        0, 0, 1, 0, 0, 0, 0, 0, 0, 0, -1, 1, 0, 0, 1, -1, 0, 1, -1, -1, 1, -1, 2, 1, -1, 2, -2, -2,
        2, -2, 2, 2, 3, -3,
    ],
    [
        0, 1, 0, 0, 0, 0, 0, 0, 1, 0, 1, 0, 0, 1, -1, 1, 0, 0, 2, 1, -1, 2, -1, -1, 2, -1, 2, 2,
        -1, 3, -2, -2, -2, 3,
    ],
    [
        0, 1, 0, 0, 1, 0, 1, -1, 2, -1, 2, -1, 2, 3, -2, 3, -2, -2, 4, 4, -3, 5, -3, -4, 6, -4, 6,
        5, -5, 8, -6, -5, -7, 9,
    ],
];
