//! Per-subframe pitch lag reconstruction.
//!
//! The absolute lag index is biased by the minimum lag for the sample rate,
//! then every subframe adds its entry of the selected contour codebook. The
//! codebook depends on whether the channel runs at 8 kHz and on the frame
//! length.

use crate::silk::pitch_est_tables::{
    CB_LAGS_STAGE2, CB_LAGS_STAGE2_10_MS, CB_LAGS_STAGE3, CB_LAGS_STAGE3_10_MS, PE_MAX_LAG_MS,
    PE_MIN_LAG_MS, PE_NB_CBKS_STAGE2_10_MS, PE_NB_CBKS_STAGE2_EXT, PE_NB_CBKS_STAGE3_10_MS,
    PE_NB_CBKS_STAGE3_MAX,
};
use crate::silk::MAX_NB_SUBFR;

const NB_SUBFR_10_MS: usize = MAX_NB_SUBFR / 2;

/// Shortest pitch lag in samples at `fs_khz`.
pub const fn min_lag(fs_khz: i32) -> i32 {
    PE_MIN_LAG_MS * fs_khz
}

/// Longest pitch lag in samples at `fs_khz`.
pub const fn max_lag(fs_khz: i32) -> i32 {
    PE_MAX_LAG_MS * fs_khz
}

/// Number of contour codebook entries for the channel layout.
pub fn contour_codebook_size(fs_khz: i32, nb_subfr: usize) -> usize {
    match (fs_khz == 8, nb_subfr == MAX_NB_SUBFR) {
        (true, true) => PE_NB_CBKS_STAGE2_EXT,
        (true, false) => PE_NB_CBKS_STAGE2_10_MS,
        (false, true) => PE_NB_CBKS_STAGE3_MAX,
        (false, false) => PE_NB_CBKS_STAGE3_10_MS,
    }
}

fn contour_offset(fs_khz: i32, nb_subfr: usize, subframe: usize, contour: usize) -> i32 {
    let offset = match (fs_khz == 8, nb_subfr == MAX_NB_SUBFR) {
        (true, true) => CB_LAGS_STAGE2[subframe][contour],
        (true, false) => CB_LAGS_STAGE2_10_MS[subframe][contour],
        (false, true) => CB_LAGS_STAGE3[subframe][contour],
        (false, false) => CB_LAGS_STAGE3_10_MS[subframe][contour],
    };
    i32::from(offset)
}

/// Decodes the per-subframe pitch lags from the lag index and contour.
///
/// * `lag_index` - absolute lag without the minimum-lag bias.
/// * `contour_index` - entry of the contour codebook.
/// * `pitch_lags` - receives `nb_subfr` lags; remaining entries are zeroed.
/// * `fs_khz` - internal sample rate (8, 12 or 16).
/// * `nb_subfr` - 4 for 20 ms frames, 2 for 10 ms frames.
///
/// Lags are clamped to `[min_lag, max_lag]` after the contour offset.
///
/// # Panics
///
/// Panics if `contour_index` is outside the codebook. The index decoder
/// rejects such values before they get here.
pub fn decode_pitch(
    lag_index: i16,
    contour_index: i8,
    pitch_lags: &mut [i32],
    fs_khz: i32,
    nb_subfr: usize,
) {
    debug_assert!(pitch_lags.len() >= nb_subfr);
    debug_assert!(matches!(fs_khz, 8 | 12 | 16));
    debug_assert!(nb_subfr == MAX_NB_SUBFR || nb_subfr == NB_SUBFR_10_MS);

    let contour = usize::try_from(contour_index).unwrap_or(usize::MAX);
    assert!(
        contour < contour_codebook_size(fs_khz, nb_subfr),
        "contour index {contour_index} out of range"
    );

    let min_lag = min_lag(fs_khz);
    let max_lag = max_lag(fs_khz);
    let base_lag = min_lag + i32::from(lag_index);

    for (subframe, lag) in pitch_lags.iter_mut().enumerate().take(nb_subfr) {
        let offset = contour_offset(fs_khz, nb_subfr, subframe, contour);
        *lag = (base_lag + offset).clamp(min_lag, max_lag);
    }

    for lag in pitch_lags.iter_mut().skip(nb_subfr) {
        *lag = 0;
    }
}
