//! Seam between the parameter codec and the caller's entropy coder.
//!
//! The index codec only needs iCDF symbol coding and single-bit coding with a
//! power-of-two probability. Any range coder exposing those primitives can
//! implement [`SymbolDecoder`] and [`SymbolEncoder`]. [`SymbolTape`] is a
//! scripted implementation that records symbols instead of producing bits.

use alloc::vec::Vec;

/// Decode side of the entropy coder.
pub trait SymbolDecoder {
    /// Decodes one symbol against an inverse CDF with `ftb` bits of precision.
    fn decode_icdf(&mut self, icdf: &[u8], ftb: u32) -> usize;

    /// Decodes one bit whose probability of being set is `2^-logp`.
    fn decode_bit_logp(&mut self, logp: u32) -> bool;
}

/// Encode side of the entropy coder.
pub trait SymbolEncoder {
    /// Encodes `symbol` against an inverse CDF with `ftb` bits of precision.
    fn encode_icdf(&mut self, symbol: usize, icdf: &[u8], ftb: u32);

    /// Encodes one bit whose probability of being set is `2^-logp`.
    fn encode_bit_logp(&mut self, bit: bool, logp: u32);
}

impl<T: SymbolDecoder + ?Sized> SymbolDecoder for &mut T {
    fn decode_icdf(&mut self, icdf: &[u8], ftb: u32) -> usize {
        (**self).decode_icdf(icdf, ftb)
    }

    fn decode_bit_logp(&mut self, logp: u32) -> bool {
        (**self).decode_bit_logp(logp)
    }
}

impl<T: SymbolEncoder + ?Sized> SymbolEncoder for &mut T {
    fn encode_icdf(&mut self, symbol: usize, icdf: &[u8], ftb: u32) {
        (**self).encode_icdf(symbol, icdf, ftb);
    }

    fn encode_bit_logp(&mut self, bit: bool, logp: u32) {
        (**self).encode_bit_logp(bit, logp);
    }
}

/// One coded symbol and the size of the alphabet it was coded against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapeEntry {
    pub symbol: usize,
    pub alphabet: usize,
}

/// Recorded symbol stream implementing both coder traits.
///
/// Encoding appends entries. Decoding replays them from a cursor and records
/// the alphabet size of every request. Decoding past the end yields symbol 0
/// and sets the overrun flag, mirroring a range decoder that ran out of input.
/// Scripted symbols are returned verbatim even when they exceed the requested
/// alphabet, which lets tests model streams the real tables could not emit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTape {
    entries: Vec<TapeEntry>,
    requested: Vec<usize>,
    cursor: usize,
    overrun: bool,
}

impl SymbolTape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tape that will decode `symbols` in order.
    pub fn from_symbols(symbols: impl IntoIterator<Item = usize>) -> Self {
        Self {
            entries: symbols
                .into_iter()
                .map(|symbol| TapeEntry {
                    symbol,
                    alphabet: 0,
                })
                .collect(),
            ..Self::default()
        }
    }

    pub fn entries(&self) -> &[TapeEntry] {
        &self.entries
    }

    /// Symbols on the tape, in coding order.
    pub fn symbols(&self) -> Vec<usize> {
        self.entries.iter().map(|entry| entry.symbol).collect()
    }

    /// Alphabet sizes requested by every decode call so far.
    pub fn requested_alphabets(&self) -> &[usize] {
        &self.requested
    }

    /// Number of symbols not yet decoded.
    pub fn remaining(&self) -> usize {
        self.entries.len().saturating_sub(self.cursor)
    }

    pub fn is_overrun(&self) -> bool {
        self.overrun
    }

    /// Restarts decoding from the first entry.
    pub fn rewind(&mut self) {
        self.cursor = 0;
        self.overrun = false;
        self.requested.clear();
    }

    fn next_symbol(&mut self, alphabet: usize) -> usize {
        self.requested.push(alphabet);
        match self.entries.get(self.cursor) {
            Some(entry) => {
                self.cursor += 1;
                entry.symbol
            }
            None => {
                self.overrun = true;
                0
            }
        }
    }
}

impl SymbolDecoder for SymbolTape {
    fn decode_icdf(&mut self, icdf: &[u8], _ftb: u32) -> usize {
        self.next_symbol(icdf.len())
    }

    fn decode_bit_logp(&mut self, _logp: u32) -> bool {
        self.next_symbol(2) != 0
    }
}

impl SymbolEncoder for SymbolTape {
    fn encode_icdf(&mut self, symbol: usize, icdf: &[u8], _ftb: u32) {
        debug_assert!(symbol < icdf.len(), "symbol {symbol} outside alphabet");
        self.entries.push(TapeEntry {
            symbol,
            alphabet: icdf.len(),
        });
    }

    fn encode_bit_logp(&mut self, bit: bool, _logp: u32) {
        self.entries.push(TapeEntry {
            symbol: usize::from(bit),
            alphabet: 2,
        });
    }
}
