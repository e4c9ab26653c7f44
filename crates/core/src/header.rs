//! Tree header serialization.
//!
//! The header is a pre-order walk of the tree:
//!
//! ```text
//! internal node:  0 <left subtree> <right subtree>
//! leaf:           1 <symbol: 9 bits>
//! ```
//!
//! The branching bits alone determine the shape, so no node count or length
//! prefix is stored. Weights are not stored; a tree read back has weight 0
//! everywhere.

use std::io::{Read, Write};

use crate::bitio::{BitReader, BitWriter};
use crate::error::{FormatError, Result, TruncatedStreamError};
use crate::tree::{HuffNode, HuffTree};
use crate::{Symbol, PSEUDO_EOF, SYMBOL_BITS, SYMBOL_COUNT};

/// Deepest internal-node nesting a valid tree can have: a 257-leaf tree is
/// at most 256 levels deep.
pub const MAX_TREE_DEPTH: usize = SYMBOL_COUNT - 1;

/// Write `tree` in header form.
pub fn write_header<W: Write>(tree: &HuffTree, out: &mut BitWriter<W>) -> Result<()> {
    write_node(tree.root(), out)
}

fn write_node<W: Write>(node: &HuffNode, out: &mut BitWriter<W>) -> Result<()> {
    match node {
        HuffNode::Internal { left, right, .. } => {
            out.write_bits(0, 1)?;
            write_node(left, out)?;
            write_node(right, out)
        }
        HuffNode::Leaf { symbol, .. } => {
            out.write_bits(1, 1)?;
            out.write_bits(*symbol as u64, SYMBOL_BITS)
        }
    }
}

/// Size of `tree`'s header in bits.
pub fn header_bits(tree: &HuffTree) -> u64 {
    let leaves = tree.leaf_count() as u64;
    // A full binary tree has leaves - 1 internal nodes
    leaves * (1 + SYMBOL_BITS as u64) + leaves.saturating_sub(1)
}

/// Read a tree written by [`write_header`].
///
/// # Errors
/// - `TruncatedStreamError::Header` / `LeafValue` if the input ends early
/// - `FormatError::InvalidSymbol` for a leaf value above `PSEUDO_EOF`
/// - `FormatError::TreeTooDeep` if nesting exceeds [`MAX_TREE_DEPTH`]
/// - `FormatError::DuplicateSymbol` if a symbol has two leaves
/// - `FormatError::MissingSentinel` if no leaf holds `PSEUDO_EOF`
pub fn read_header<R: Read>(input: &mut BitReader<R>) -> Result<HuffTree> {
    let mut seen = [false; SYMBOL_COUNT];
    let root = read_node(input, 0, &mut seen)?;
    if !seen[PSEUDO_EOF as usize] {
        return Err(FormatError::MissingSentinel.into());
    }
    Ok(HuffTree::from_root(root))
}

fn read_node<R: Read>(
    input: &mut BitReader<R>,
    depth: usize,
    seen: &mut [bool; SYMBOL_COUNT],
) -> Result<HuffNode> {
    match input.read_bit()? {
        None => Err(TruncatedStreamError::Header.into()),
        Some(false) => {
            if depth >= MAX_TREE_DEPTH {
                return Err(FormatError::TreeTooDeep {
                    max: MAX_TREE_DEPTH,
                }
                .into());
            }
            let left = read_node(input, depth + 1, seen)?;
            let right = read_node(input, depth + 1, seen)?;
            Ok(HuffNode::merge(left, right))
        }
        Some(true) => {
            let value = input
                .read_bits(SYMBOL_BITS)?
                .ok_or(TruncatedStreamError::LeafValue)? as Symbol;
            let slot = seen
                .get_mut(value as usize)
                .ok_or(FormatError::InvalidSymbol(value))?;
            if *slot {
                return Err(FormatError::DuplicateSymbol(value).into());
            }
            *slot = true;
            Ok(HuffNode::leaf(value, 0))
        }
    }
}
