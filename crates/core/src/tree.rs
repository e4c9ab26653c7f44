//! Huffman tree construction.
//!
//! The tree is built bottom-up by repeatedly merging the two lightest nodes
//! of a min-heap until a single root remains.
//!
//! # Tie-breaking
//!
//! Heap entries are ordered by `(weight, sequence)`. Leaves get sequence
//! numbers in ascending symbol order; each merged node gets the next number
//! after every node created before it. Among equal weights the older node is
//! popped first, and the first node popped becomes the left child. The same
//! frequency table therefore always produces the same tree.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::{Symbol, PSEUDO_EOF};

/// A node of the code tree. Internal nodes own both children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        symbol: Symbol,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn leaf(symbol: Symbol, weight: u64) -> Self {
        HuffNode::Leaf { symbol, weight }
    }

    /// Join two subtrees; `left` ends up on the 0 branch. The combined
    /// weight saturates at `u64::MAX`.
    pub fn merge(left: Self, right: Self) -> Self {
        HuffNode::Internal {
            weight: left.weight().saturating_add(right.weight()),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } | HuffNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }

    /// The leaf's symbol, or `None` for internal nodes.
    pub fn symbol(&self) -> Option<Symbol> {
        match self {
            HuffNode::Leaf { symbol, .. } => Some(*symbol),
            HuffNode::Internal { .. } => None,
        }
    }

    /// Compare structure and leaf symbols, ignoring weights.
    pub fn same_shape(&self, other: &HuffNode) -> bool {
        match (self, other) {
            (HuffNode::Leaf { symbol: a, .. }, HuffNode::Leaf { symbol: b, .. }) => a == b,
            (
                HuffNode::Internal { left: l1, right: r1, .. },
                HuffNode::Internal { left: l2, right: r2, .. },
            ) => l1.same_shape(l2) && r1.same_shape(r2),
            _ => false,
        }
    }

    fn collect_leaves(&self, depth: usize, out: &mut Vec<(Symbol, usize)>) {
        match self {
            HuffNode::Leaf { symbol, .. } => out.push((*symbol, depth)),
            HuffNode::Internal { left, right, .. } => {
                left.collect_leaves(depth + 1, out);
                right.collect_leaves(depth + 1, out);
            }
        }
    }
}

/// Heap entry; `BinaryHeap` is a max-heap, so the ordering is reversed.
#[derive(Debug)]
struct Pending {
    weight: u64,
    sequence: usize,
    node: HuffNode,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.sequence == other.sequence
    }
}

impl Eq for Pending {}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A complete code tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffTree {
    root: HuffNode,
}

impl HuffTree {
    /// Build the minimum weighted-path-length tree for `freqs`.
    ///
    /// Only symbols with a nonzero count get a leaf. Since the sentinel is
    /// always counted, any table with at least one byte yields two or more
    /// leaves.
    ///
    /// # Errors
    /// - `HuffmanError::EmptyFrequencyTable` if no symbol has a count
    /// - `HuffmanError::WeightOverflow` if the counts sum past `u64::MAX`
    pub fn from_frequencies(freqs: &FrequencyTable) -> Result<Self> {
        let mut heap: BinaryHeap<Pending> = freqs
            .iter()
            .enumerate()
            .map(|(sequence, (symbol, weight))| Pending {
                weight,
                sequence,
                node: HuffNode::leaf(symbol, weight),
            })
            .collect();

        let mut sequence = heap.len();

        loop {
            let first = heap.pop().ok_or(HuffmanError::EmptyFrequencyTable)?;
            let Some(second) = heap.pop() else {
                return Ok(Self { root: first.node });
            };

            let weight = first
                .weight
                .checked_add(second.weight)
                .ok_or(HuffmanError::WeightOverflow {
                    left: first.weight,
                    right: second.weight,
                })?;
            heap.push(Pending {
                weight,
                sequence,
                node: HuffNode::merge(first.node, second.node),
            });
            sequence += 1;
        }
    }

    /// Wrap an existing root, e.g. one read back from a header.
    pub fn from_root(root: HuffNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &HuffNode {
        &self.root
    }

    /// Every leaf's symbol and depth, left to right.
    pub fn leaves(&self) -> Vec<(Symbol, usize)> {
        let mut out = Vec::new();
        self.root.collect_leaves(0, &mut out);
        out
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves().len()
    }

    /// Length of the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        self.leaves()
            .into_iter()
            .map(|(_, depth)| depth)
            .max()
            .unwrap_or(0)
    }

    /// Whether the tree has a leaf for the end-of-stream sentinel.
    pub fn has_sentinel(&self) -> bool {
        self.leaves()
            .iter()
            .any(|&(symbol, _)| symbol == PSEUDO_EOF)
    }

    /// Compare structure and leaf symbols, ignoring weights.
    pub fn same_shape(&self, other: &HuffTree) -> bool {
        self.root.same_shape(&other.root)
    }

    /// Sum of weight * depth over all leaves: the body size in bits that
    /// this tree produces for the counted input.
    pub fn weighted_path_length(&self) -> u64 {
        fn walk(node: &HuffNode, depth: u64) -> u64 {
            match node {
                HuffNode::Leaf { weight, .. } => weight.saturating_mul(depth),
                HuffNode::Internal { left, right, .. } => {
                    walk(left, depth + 1).saturating_add(walk(right, depth + 1))
                }
            }
        }
        walk(&self.root, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ALPH_SIZE;

    fn tree_for(data: &[u8]) -> HuffTree {
        HuffTree::from_frequencies(&FrequencyTable::from_bytes(data)).unwrap()
    }

    #[test]
    fn test_empty_input_has_sentinel_only() {
        let tree = tree_for(b"");
        assert_eq!(tree.leaves(), vec![(PSEUDO_EOF, 0)]);
        assert!(tree.root().is_leaf());
    }

    #[test]
    fn test_single_symbol_gets_two_leaves() {
        let tree = tree_for(&[0x41; 1000]);
        assert_eq!(tree.leaf_count(), 2);
        assert!(tree.has_sentinel());
        assert_eq!(tree.root().weight(), 1001);
        // Sentinel is lighter, so it is popped first and lands on the left
        assert_eq!(tree.leaves(), vec![(PSEUDO_EOF, 1), (0x41, 1)]);
    }

    #[test]
    fn test_root_weight_is_total_plus_sentinel() {
        let data = b"hello world";
        let tree = tree_for(data);
        assert_eq!(tree.root().weight(), data.len() as u64 + 1);
    }

    #[test]
    fn test_exactly_one_sentinel_leaf() {
        let data: Vec<u8> = (0..=255).collect();
        let tree = tree_for(&data);
        let sentinels = tree
            .leaves()
            .iter()
            .filter(|&&(symbol, _)| symbol == PSEUDO_EOF)
            .count();
        assert_eq!(sentinels, 1);
        assert_eq!(tree.leaf_count(), 257);
    }

    #[test]
    fn test_known_optimal_lengths() {
        // Weights 1(eof),1,2,4,8: a skewed tree with depths 4,4,3,2,1
        let mut counts = [0u64; ALPH_SIZE];
        counts[b'a' as usize] = 8;
        counts[b'b' as usize] = 4;
        counts[b'c' as usize] = 2;
        counts[b'd' as usize] = 1;
        let freqs = FrequencyTable::from_byte_counts(&counts);
        let tree = HuffTree::from_frequencies(&freqs).unwrap();

        let mut depths = tree.leaves();
        depths.sort();
        assert_eq!(
            depths,
            vec![
                (b'a' as Symbol, 1),
                (b'b' as Symbol, 2),
                (b'c' as Symbol, 3),
                (b'd' as Symbol, 4),
                (PSEUDO_EOF, 4),
            ]
        );
        assert_eq!(tree.weighted_path_length(), 8 + 8 + 6 + 4 + 4);
    }

    #[test]
    fn test_deterministic() {
        let data = b"mississippi river banks";
        assert_eq!(tree_for(data), tree_for(data));
    }

    #[test]
    fn test_tie_break_prefers_lower_symbol() {
        // 'a', 'b' and the sentinel all weigh 1: 'a' and 'b' merge first
        let tree = tree_for(b"ab");
        assert_eq!(
            tree.leaves(),
            vec![(PSEUDO_EOF, 1), (b'a' as Symbol, 2), (b'b' as Symbol, 2)]
        );
    }

    #[test]
    fn test_same_shape_ignores_weights() {
        let pair = |l: HuffNode, r: HuffNode| HuffTree::from_root(HuffNode::merge(l, r));
        let a = pair(HuffNode::leaf(1, 10), HuffNode::leaf(PSEUDO_EOF, 1));
        let b = pair(HuffNode::leaf(1, 0), HuffNode::leaf(PSEUDO_EOF, 0));
        let c = pair(HuffNode::leaf(PSEUDO_EOF, 0), HuffNode::leaf(1, 0));
        assert!(a.same_shape(&b));
        assert!(!a.same_shape(&c));
        assert_ne!(a, b);
    }

    #[test]
    fn test_weight_overflow() {
        // Sentinel (1) and byte 1 (1) merge to 2, which cannot join u64::MAX
        let mut counts = [0u64; ALPH_SIZE];
        counts[0] = u64::MAX;
        counts[1] = 1;
        let freqs = FrequencyTable::from_byte_counts(&counts);
        assert_eq!(freqs.total(), u64::MAX);
        assert!(matches!(
            HuffTree::from_frequencies(&freqs),
            Err(crate::Error::Huffman(HuffmanError::WeightOverflow {
                left: 2,
                right: u64::MAX
            }))
        ));
    }

    #[test]
    fn test_merge_saturates() {
        let node = HuffNode::merge(HuffNode::leaf(0, u64::MAX), HuffNode::leaf(1, 5));
        assert_eq!(node.weight(), u64::MAX);
    }

    #[test]
    fn test_height() {
        let tree = tree_for(b"aaaabbc");
        assert_eq!(tree.height(), 3);
    }
}
