//! Frequency analysis over the compression alphabet.
//!
//! Counts the occurrence of each byte value in the input and always counts
//! the end-of-stream sentinel exactly once.

use std::io::Read;

use crate::bitio::BitReader;
use crate::error::Result;
use crate::{Symbol, ALPH_SIZE, BITS_PER_WORD, PSEUDO_EOF, SYMBOL_COUNT};

/// Occurrence counts for all 257 symbols (index = symbol value).
///
/// # Invariants
/// - the count of `PSEUDO_EOF` is exactly 1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; SYMBOL_COUNT],
}

impl FrequencyTable {
    /// Count 8-bit chunks until the reader is exhausted.
    ///
    /// The reader is left at end of input; `reset` it before encoding.
    pub fn read_from<R: Read>(input: &mut BitReader<R>) -> Result<Self> {
        let mut counts = [0u64; ALPH_SIZE];
        while let Some(chunk) = input.read_bits(BITS_PER_WORD)? {
            counts[chunk as usize] += 1;
        }
        Ok(Self::from_byte_counts(&counts))
    }

    /// Count byte frequencies of an in-memory buffer.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut counts = [0u64; ALPH_SIZE];
        for &byte in data {
            counts[byte as usize] += 1;
        }
        Self::from_byte_counts(&counts)
    }

    /// Build a table from precomputed byte counts; the sentinel is set to 1.
    pub fn from_byte_counts(byte_counts: &[u64; ALPH_SIZE]) -> Self {
        let mut counts = [0u64; SYMBOL_COUNT];
        counts[..ALPH_SIZE].copy_from_slice(byte_counts);
        counts[PSEUDO_EOF as usize] = 1;
        Self { counts }
    }

    /// Get the count for a specific symbol.
    pub fn get(&self, symbol: Symbol) -> u64 {
        self.counts.get(symbol as usize).copied().unwrap_or(0)
    }

    /// Number of byte symbols counted (the sentinel is not input).
    /// Saturates at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.counts[..ALPH_SIZE]
            .iter()
            .fold(0u64, |acc, &count| acc.saturating_add(count))
    }

    /// Number of symbols with a nonzero count, sentinel included.
    pub fn used(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Symbols with a nonzero count, in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(symbol, &count)| (symbol as Symbol, count))
    }

    /// Shannon entropy of the byte distribution, in bits per byte.
    ///
    /// Returns 0.0 for empty input.
    pub fn entropy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let total = total as f64;
        self.counts[..ALPH_SIZE]
            .iter()
            .filter(|&&c| c > 0)
            .map(|&c| {
                let prob = c as f64 / total;
                -prob * prob.log2()
            })
            .sum()
    }
}
