//! Per-channel state carried between frames.
//!
//! A [`ChannelState`] holds the layout of one audio channel (sample rate,
//! subframe count, prediction order and NLSF codebook) and the history that
//! conditional coding depends on. It is owned by a single channel pipeline
//! and only mutated once a frame has been fully decoded or quantised.

use crate::silk::codebook::NlsfCodebook;
use crate::silk::decode_indices::SideInfoIndices;
use crate::silk::decode_pitch::{max_lag, min_lag};
use crate::silk::errors::{Result, SilkError};
use crate::silk::frame_flags::FrameFlags;
use crate::silk::tables_pitch_lag::{
    PITCH_CONTOUR_10_MS_ICDF, PITCH_CONTOUR_10_MS_NB_ICDF, PITCH_CONTOUR_ICDF,
    PITCH_CONTOUR_NB_ICDF, UNIFORM4_ICDF, UNIFORM6_ICDF, UNIFORM8_ICDF,
};
use crate::silk::{
    FrameSignalType, MAX_FRAMES_PER_PACKET, MAX_LPC_ORDER, MAX_NB_SUBFR, SUBFR_LENGTH_MS,
};

/// Gain level assumed before the first frame of a stream.
pub const INITIAL_GAIN_INDEX: i8 = 10;

/// Layout and inter-frame history of one channel.
#[derive(Debug, Clone)]
pub struct ChannelState {
    /// Internal sample rate in kHz.
    pub fs_khz: i32,
    /// Subframes per frame (2 or 4).
    pub nb_subfr: usize,
    /// Short-term prediction order, taken from the codebook.
    pub lpc_order: usize,
    /// NLSF codebook for this rate and order.
    pub nlsf_codebook: &'static NlsfCodebook,
    /// NLSF vector of the previous frame, Q15.
    pub prev_nlsf_q15: [i16; MAX_LPC_ORDER],
    /// Pitch lag index of the last voiced frame.
    pub prev_lag_index: i16,
    /// Signal type of the previous frame.
    pub prev_signal_type: FrameSignalType,
    /// Gain level after the last subframe of the previous frame.
    pub last_gain_index: i8,
    /// Frames lost since the last good frame.
    pub loss_count: u32,
    /// Set until the first frame after a reset has been processed.
    pub first_frame_after_reset: bool,
    /// Voice activity flags of the current packet.
    pub vad_flags: [bool; MAX_FRAMES_PER_PACKET],
    /// Running LTP gain budget of the encoder, Q7.
    pub sum_log_gain_q7: i32,
}

fn check_layout(fs_khz: i32, nb_subfr: usize, codebook: &NlsfCodebook) -> Result<()> {
    if !matches!(fs_khz, 8 | 12 | 16) {
        return Err(SilkError::UnsupportedSampleRate(fs_khz));
    }
    if nb_subfr != MAX_NB_SUBFR && nb_subfr != MAX_NB_SUBFR / 2 {
        return Err(SilkError::UnsupportedSubframeCount(nb_subfr));
    }
    codebook.validate()
}

impl ChannelState {
    /// Creates a freshly reset channel.
    pub fn new(fs_khz: i32, nb_subfr: usize, nlsf_codebook: &'static NlsfCodebook) -> Result<Self> {
        check_layout(fs_khz, nb_subfr, nlsf_codebook)?;
        Ok(Self {
            fs_khz,
            nb_subfr,
            lpc_order: nlsf_codebook.order,
            nlsf_codebook,
            prev_nlsf_q15: [0; MAX_LPC_ORDER],
            prev_lag_index: 0,
            prev_signal_type: FrameSignalType::Inactive,
            last_gain_index: INITIAL_GAIN_INDEX,
            loss_count: 0,
            first_frame_after_reset: true,
            vad_flags: [false; MAX_FRAMES_PER_PACKET],
            sum_log_gain_q7: 0,
        })
    }

    /// Switches the channel layout.
    ///
    /// History is cleared when the sample rate or the codebook changes, since
    /// the previous NLSF and lag values no longer apply. Changing only the
    /// frame length keeps it.
    pub fn reconfigure(
        &mut self,
        fs_khz: i32,
        nb_subfr: usize,
        nlsf_codebook: &'static NlsfCodebook,
    ) -> Result<()> {
        check_layout(fs_khz, nb_subfr, nlsf_codebook)?;

        let rate_changed = fs_khz != self.fs_khz;
        let codebook_changed = !core::ptr::eq(nlsf_codebook, self.nlsf_codebook);
        self.fs_khz = fs_khz;
        self.nb_subfr = nb_subfr;
        self.lpc_order = nlsf_codebook.order;
        self.nlsf_codebook = nlsf_codebook;
        if rate_changed || codebook_changed {
            log::debug!("reconfigure: fs={fs_khz} kHz order={}, history cleared", self.lpc_order);
            self.reset();
        }
        Ok(())
    }

    /// Clears all inter-frame history, keeping the layout.
    pub fn reset(&mut self) {
        self.prev_nlsf_q15 = [0; MAX_LPC_ORDER];
        self.prev_lag_index = 0;
        self.prev_signal_type = FrameSignalType::Inactive;
        self.last_gain_index = INITIAL_GAIN_INDEX;
        self.loss_count = 0;
        self.first_frame_after_reset = true;
        self.vad_flags = [false; MAX_FRAMES_PER_PACKET];
        self.sum_log_gain_q7 = 0;
    }

    /// Records a frame lost before the next good one.
    pub fn note_lost_frame(&mut self) {
        self.loss_count = self.loss_count.saturating_add(1);
    }

    /// Stores the VAD flags of the packet being decoded.
    pub fn apply_frame_flags(&mut self, flags: &FrameFlags) {
        self.vad_flags = flags.vad;
    }

    /// Remembers the signal type and lag of a coded frame for the next one.
    pub fn commit_indices(&mut self, indices: &SideInfoIndices) {
        self.prev_signal_type = indices.signal_type;
        if indices.signal_type == FrameSignalType::Voiced {
            self.prev_lag_index = indices.lag_index;
        }
    }

    /// Samples per subframe.
    pub fn subfr_length(&self) -> usize {
        SUBFR_LENGTH_MS * self.fs_khz as usize
    }

    /// Samples per frame.
    pub fn frame_length(&self) -> usize {
        self.subfr_length() * self.nb_subfr
    }

    /// Shortest pitch lag in samples.
    pub fn min_lag(&self) -> i32 {
        min_lag(self.fs_khz)
    }

    /// Longest pitch lag in samples.
    pub fn max_lag(&self) -> i32 {
        max_lag(self.fs_khz)
    }

    /// Stride between coarse pitch lag steps.
    pub fn lag_stride(&self) -> i32 {
        self.fs_khz >> 1
    }

    /// iCDF of the fine pitch lag bits.
    pub fn pitch_lag_low_bits_icdf(&self) -> &'static [u8] {
        match self.fs_khz {
            8 => &UNIFORM4_ICDF,
            12 => &UNIFORM6_ICDF,
            _ => &UNIFORM8_ICDF,
        }
    }

    /// iCDF of the pitch contour index.
    pub fn pitch_contour_icdf(&self) -> &'static [u8] {
        match (self.fs_khz == 8, self.nb_subfr == MAX_NB_SUBFR) {
            (true, true) => &PITCH_CONTOUR_NB_ICDF,
            (true, false) => &PITCH_CONTOUR_10_MS_NB_ICDF,
            (false, true) => &PITCH_CONTOUR_ICDF,
            (false, false) => &PITCH_CONTOUR_10_MS_ICDF,
        }
    }
}
