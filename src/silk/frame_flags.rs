//! Per-packet voice activity and LBRR flags.
//!
//! A packet starts with one VAD bit per frame followed by a single LBRR bit.
//! Multi-frame packets with redundancy then carry a joint symbol whose value
//! plus one is the bitmask of frames that have an LBRR copy.

use crate::silk::MAX_FRAMES_PER_PACKET;
use crate::silk::entropy::{SymbolDecoder, SymbolEncoder};
use crate::silk::errors::{IndexField, Result, SilkError, check_index};
use crate::silk::tables_other::{LBRR_FLAGS_2_ICDF, LBRR_FLAGS_3_ICDF};

/// Flags decoded from a packet header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameFlags {
    pub vad: [bool; MAX_FRAMES_PER_PACKET],
    pub lbrr: [bool; MAX_FRAMES_PER_PACKET],
}

impl FrameFlags {
    /// Returns `true` when any frame carries redundancy.
    pub fn has_lbrr(&self) -> bool {
        self.lbrr.iter().any(|&flag| flag)
    }

    fn lbrr_mask(&self, frames: usize) -> usize {
        (0..frames)
            .filter(|&i| self.lbrr[i])
            .fold(0, |mask, i| mask | (1 << i))
    }
}

fn lbrr_icdf(frames: usize) -> &'static [u8] {
    if frames == 2 {
        &LBRR_FLAGS_2_ICDF
    } else {
        &LBRR_FLAGS_3_ICDF
    }
}

fn check_frames(frames_per_packet: usize) -> Result<()> {
    if (1..=MAX_FRAMES_PER_PACKET).contains(&frames_per_packet) {
        Ok(())
    } else {
        Err(SilkError::FrameIndexOutOfRange(frames_per_packet))
    }
}

/// Decodes the VAD and LBRR flags for a packet of `frames_per_packet` frames.
pub fn decode_frame_flags(
    decoder: &mut impl SymbolDecoder,
    frames_per_packet: usize,
) -> Result<FrameFlags> {
    check_frames(frames_per_packet)?;

    let mut flags = FrameFlags::default();
    for vad in flags.vad.iter_mut().take(frames_per_packet) {
        *vad = decoder.decode_bit_logp(1);
    }

    if decoder.decode_bit_logp(1) {
        if frames_per_packet == 1 {
            flags.lbrr[0] = true;
        } else {
            let icdf = lbrr_icdf(frames_per_packet);
            let symbol = decoder.decode_icdf(icdf, 8);
            check_index(IndexField::LbrrFlags, symbol as i32, icdf.len() as i32 - 1)?;
            let mask = symbol + 1;
            for (i, lbrr) in flags.lbrr.iter_mut().enumerate().take(frames_per_packet) {
                *lbrr = (mask >> i) & 1 == 1;
            }
        }
    }

    log::trace!("decode_frame_flags: frames={frames_per_packet} flags={flags:?}");
    Ok(flags)
}

/// Encodes the VAD and LBRR flags. Flags beyond `frames_per_packet` are ignored.
pub fn encode_frame_flags(
    encoder: &mut impl SymbolEncoder,
    flags: &FrameFlags,
    frames_per_packet: usize,
) -> Result<()> {
    check_frames(frames_per_packet)?;

    for &vad in flags.vad.iter().take(frames_per_packet) {
        encoder.encode_bit_logp(vad, 1);
    }

    let mask = flags.lbrr_mask(frames_per_packet);
    encoder.encode_bit_logp(mask != 0, 1);
    if mask != 0 && frames_per_packet > 1 {
        encoder.encode_icdf(mask - 1, lbrr_icdf(frames_per_packet), 8);
    }
    Ok(())
}
