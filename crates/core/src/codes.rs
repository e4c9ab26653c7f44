//! Per-symbol prefix codes derived from a tree.
//!
//! A code is the root-to-leaf path, 0 for left and 1 for right, held as a
//! bit length plus an unsigned value written MSB-first.

use std::fmt;
use std::io::Write;

use crate::bitio::{BitWriter, MAX_BITS_PER_CALL};
use crate::error::{FormatError, HuffmanError, Result};
use crate::tree::{HuffNode, HuffTree};
use crate::{Symbol, SYMBOL_COUNT};

/// Longest code a `Code` can hold.
///
/// A tree deeper than 92 needs a total weight beyond `u64::MAX`, so trees
/// built from counted input never get close.
pub const MAX_CODE_LEN: usize = 128;

/// A prefix code: the low `len` bits of `bits`, MSB first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Code {
    pub len: usize,
    pub bits: u128,
}

impl Code {
    /// This code extended by one more branch.
    pub fn push(self, bit: bool) -> Self {
        Self {
            len: self.len + 1,
            bits: (self.bits << 1) | bit as u128,
        }
    }

    /// Whether `self` is a prefix of `other` (every code is a prefix of itself).
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        if self.len == 0 {
            return true;
        }
        self.len <= other.len && other.bits >> (other.len - self.len) == self.bits
    }

    /// Write the code MSB-first.
    pub fn write_to<W: Write>(&self, out: &mut BitWriter<W>) -> Result<()> {
        if self.len > MAX_BITS_PER_CALL {
            out.write_bits((self.bits >> MAX_BITS_PER_CALL) as u64, self.len - MAX_BITS_PER_CALL)?;
            out.write_bits(self.bits as u64, MAX_BITS_PER_CALL)
        } else {
            out.write_bits(self.bits as u64, self.len)
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in (0..self.len).rev() {
            let bit = if (self.bits >> i) & 1 == 1 { '1' } else { '0' };
            write!(f, "{}", bit)?;
        }
        Ok(())
    }
}

/// Codes for every leaf of a tree, indexed by symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
}

impl CodeTable {
    /// Walk `tree` and record each leaf's path.
    ///
    /// # Errors
    /// - `HuffmanError::CodeLengthTooLong` if a leaf is deeper than `MAX_CODE_LEN`
    /// - `FormatError::InvalidSymbol` if a leaf holds a value outside the alphabet
    pub fn from_tree(tree: &HuffTree) -> Result<Self> {
        let mut codes = vec![None; SYMBOL_COUNT];
        walk(tree.root(), Code::default(), &mut codes)?;
        Ok(Self { codes })
    }

    /// The code for `symbol`, if it has a leaf.
    pub fn get(&self, symbol: Symbol) -> Option<Code> {
        self.codes.get(symbol as usize).copied().flatten()
    }

    /// `(symbol, code)` pairs in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.map(|c| (symbol as Symbol, c)))
    }

    /// Number of symbols with a code.
    pub fn symbol_count(&self) -> usize {
        self.codes.iter().flatten().count()
    }
}

fn walk(node: &HuffNode, code: Code, codes: &mut [Option<Code>]) -> Result<()> {
    match node {
        HuffNode::Leaf { symbol, .. } => {
            if code.len > MAX_CODE_LEN {
                return Err(HuffmanError::CodeLengthTooLong {
                    symbol: *symbol,
                    length: code.len,
                    max: MAX_CODE_LEN,
                }
                .into());
            }
            let slot = codes
                .get_mut(*symbol as usize)
                .ok_or(FormatError::InvalidSymbol(*symbol))?;
            *slot = Some(code);
            Ok(())
        }
        HuffNode::Internal { left, right, .. } => {
            walk(left, code.push(false), codes)?;
            walk(right, code.push(true), codes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::FrequencyTable;
    use crate::PSEUDO_EOF;

    fn table_for(data: &[u8]) -> CodeTable {
        let tree = HuffTree::from_frequencies(&FrequencyTable::from_bytes(data)).unwrap();
        CodeTable::from_tree(&tree).unwrap()
    }

    fn assert_prefix_free(table: &CodeTable) {
        let codes: Vec<_> = table.iter().collect();
        for (i, (a, code_a)) in codes.iter().enumerate() {
            for (b, code_b) in &codes[i + 1..] {
                assert!(
                    !code_a.is_prefix_of(code_b) && !code_b.is_prefix_of(code_a),
                    "codes for {} ({}) and {} ({}) overlap",
                    a,
                    code_a,
                    b,
                    code_b
                );
            }
        }
    }

    #[test]
    fn test_codes_follow_paths() {
        // Tree for "ab": root(EOF, (a, b))
        let table = table_for(b"ab");
        assert_eq!(table.get(PSEUDO_EOF), Some(Code { len: 1, bits: 0b0 }));
        assert_eq!(table.get(b'a' as Symbol), Some(Code { len: 2, bits: 0b10 }));
        assert_eq!(table.get(b'b' as Symbol), Some(Code { len: 2, bits: 0b11 }));
        assert_eq!(table.get(b'c' as Symbol), None);
        assert_eq!(table.symbol_count(), 3);
    }

    #[test]
    fn test_every_counted_symbol_has_code() {
        let data = b"the quick brown fox jumps over the lazy dog";
        let freqs = FrequencyTable::from_bytes(data);
        let table = table_for(data);
        for (symbol, _) in freqs.iter() {
            assert!(table.get(symbol).is_some(), "no code for {}", symbol);
        }
        assert_eq!(table.symbol_count(), freqs.used());
    }

    #[test]
    fn test_prefix_free_full_alphabet() {
        let mut data = Vec::new();
        for byte in 0..=255u8 {
            data.extend(std::iter::repeat(byte).take(byte as usize % 17 + 1));
        }
        assert_prefix_free(&table_for(&data));
    }

    #[test]
    fn test_single_leaf_tree_has_empty_code() {
        let table = table_for(b"");
        assert_eq!(table.get(PSEUDO_EOF), Some(Code::default()));
        assert_eq!(table.symbol_count(), 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(Code { len: 4, bits: 0b0101 }.to_string(), "0101");
        assert_eq!(Code::default().to_string(), "");
    }

    #[test]
    fn test_is_prefix_of() {
        let short = Code { len: 2, bits: 0b10 };
        let long = Code { len: 4, bits: 0b1011 };
        let other = Code { len: 4, bits: 0b0111 };
        assert!(short.is_prefix_of(&long));
        assert!(!long.is_prefix_of(&short));
        assert!(!short.is_prefix_of(&other));
    }

    #[test]
    fn test_write_long_code() {
        let code = Code {
            len: 70,
            bits: (0b101u128 << 67) | 1,
        };
        let mut writer = BitWriter::new(Vec::new());
        code.write_to(&mut writer).unwrap();
        assert_eq!(writer.bits_written(), 70);

        let bytes = writer.finish().unwrap();
        assert_eq!(bytes.len(), 9);
        assert_eq!(bytes[0], 0b1010_0000);
        // Bit 69 of the stream (the final 1) sits in byte 8 at position 5
        assert_eq!(bytes[8], 0b0000_0100);
    }

    #[test]
    fn test_invalid_leaf_symbol() {
        let tree = HuffTree::from_root(HuffNode::merge(
            HuffNode::leaf(300, 0),
            HuffNode::leaf(PSEUDO_EOF, 0),
        ));
        assert!(matches!(
            CodeTable::from_tree(&tree),
            Err(crate::Error::Format(FormatError::InvalidSymbol(300)))
        ));
    }
}
