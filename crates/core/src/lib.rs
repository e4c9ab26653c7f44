//! huffproc-core: lossless file compression with Huffman coding
//!
//! Files are compressed in two passes over the input: the first counts how
//! often each byte occurs, the second writes every byte's prefix code. The
//! compressed stream carries the code tree itself, so decompression needs
//! nothing but the stream.
//!
//! # Architecture
//!
//! The modules follow the pipeline, in dependency order:
//! - `bitio`: bit reading/writing over byte streams
//! - `frequency`: symbol counts over the 257-symbol alphabet
//! - `tree`: greedy minimum-weight tree construction
//! - `codes`: per-symbol codes derived from the tree
//! - `header`: tree serialization and deserialization
//! - `codec`: compress/decompress over whole streams
//! - `metrics`: bit and byte accounting for a single call
//!
//! # Alphabet
//!
//! Symbols 0..=255 are byte values. Symbol 256 (`PSEUDO_EOF`) marks the end of
//! the compressed body; it is counted exactly once per stream, so every tree
//! contains it, even the tree for an empty input.
//!
//! # Example
//! ```
//! use huffproc_core::codec::{compress_bytes, decompress_bytes};
//!
//! let compressed = compress_bytes(b"abracadabra").unwrap();
//! assert_eq!(decompress_bytes(&compressed).unwrap(), b"abracadabra");
//! ```

pub mod bitio;
pub mod codec;
pub mod codes;
pub mod error;
pub mod frequency;
pub mod header;
pub mod metrics;
pub mod tree;

// Re-export commonly used types
pub use codec::{compress, compress_bytes, decompress, decompress_bytes};
pub use error::{Error, Result};

/// A symbol of the compression alphabet: a byte value or `PSEUDO_EOF`.
pub type Symbol = u16;

/// Bits in one raw input chunk.
pub const BITS_PER_WORD: usize = 8;

/// Bits in the magic number.
pub const BITS_PER_INT: usize = 32;

/// Number of byte values.
pub const ALPH_SIZE: usize = 1 << BITS_PER_WORD;

/// End-of-stream sentinel, one past the largest byte value.
pub const PSEUDO_EOF: Symbol = ALPH_SIZE as Symbol;

/// Size of the full alphabet, sentinel included.
pub const SYMBOL_COUNT: usize = ALPH_SIZE + 1;

/// Width of a leaf value in the tree header; wide enough for `PSEUDO_EOF`.
pub const SYMBOL_BITS: usize = BITS_PER_WORD + 1;

/// Format family identifier.
pub const HUFF_NUMBER: u32 = 0xface_8200;

/// Magic number of streams whose header is a serialized tree.
pub const HUFF_TREE: u32 = HUFF_NUMBER | 1;
