//! Error types for huffproc.
//!
//! All operations return structured errors rather than panicking. Every
//! error is fatal for the compress/decompress call that produced it: there
//! is no partial recovery, the caller decides whether to retry or abort.

use thiserror::Error;

use crate::Symbol;

/// Top-level error type for all operations in the system.
///
/// Each variant corresponds to a specific failure domain:
/// - Bit I/O: misuse of the bit reader/writer
/// - Format: the compressed stream is not one we wrote (bad magic, bad tree)
/// - Truncated: the compressed stream ended before it was complete
/// - Huffman: tree or code table construction failures
/// - I/O: the underlying byte stream failed
#[derive(Debug, Error)]
pub enum Error {
    /// Bit I/O operation failed (e.g., asking for more than 64 bits)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Compressed stream is structurally invalid
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// Compressed stream ended early
    #[error("truncated stream: {0}")]
    Truncated(#[from] TruncatedStreamError),

    /// Huffman codec error (e.g., symbol missing from the code table)
    #[error("huffman codec error: {0}")]
    Huffman(#[from] HuffmanError),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Bit-level I/O errors.
#[derive(Debug, Error)]
pub enum BitIoError {
    /// Invalid bit count (more than 64 bits in a single call)
    #[error("invalid bit count: {0}")]
    InvalidBitCount(usize),
}

/// The compressed stream is not a valid huffproc stream.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Leading 32 bits are not the huffproc magic number
    #[error("invalid magic number: expected {expected:#010x}, got {actual:#010x}")]
    InvalidMagic { expected: u32, actual: u32 },

    /// Stream is shorter than the 32-bit magic number
    #[error("stream too short to hold the magic number")]
    MissingMagic,

    /// Tree header contains a leaf value outside the symbol range
    #[error("leaf symbol {0} is outside the symbol range 0..=256")]
    InvalidSymbol(u16),

    /// Tree header nests deeper than any valid tree can
    #[error("tree header nests deeper than {max} levels")]
    TreeTooDeep { max: usize },

    /// The same symbol appears at more than one leaf
    #[error("symbol {0} appears at more than one leaf")]
    DuplicateSymbol(Symbol),

    /// Tree header has no end-of-stream leaf, so its body could never end
    #[error("tree header has no end-of-stream leaf")]
    MissingSentinel,
}

/// The bit source ran out before a structure was complete.
#[derive(Debug, Error)]
pub enum TruncatedStreamError {
    /// Ran out while reading a node tag bit of the tree header
    #[error("tree header ended before the tree was complete")]
    Header,

    /// Ran out inside the 9-bit value field of a leaf
    #[error("tree header ended inside a leaf value")]
    LeafValue,

    /// Ran out in the body before the end-of-stream code
    #[error("body ended after {decoded} symbols without an end-of-stream code")]
    Body { decoded: u64 },
}

/// Huffman codec errors.
#[derive(Debug, Error)]
pub enum HuffmanError {
    /// No symbols with non-zero frequency (cannot build a tree)
    #[error("empty frequency table: cannot build tree")]
    EmptyFrequencyTable,

    /// Input contained a byte that was absent during the counting pass
    #[error("symbol {0} has no code in the code table")]
    UnknownSymbol(Symbol),

    /// The encoding pass saw a different number of bytes than the counting pass
    #[error("input changed between passes: counted {counted} bytes, encoded {encoded}")]
    InputChanged { counted: u64, encoded: u64 },

    /// Merged node weight does not fit in a u64
    #[error("symbol weights overflow: cannot merge {left} and {right}")]
    WeightOverflow { left: u64, right: u64 },

    /// Code length exceeds what a code can hold
    #[error("code length {length} for symbol {symbol} exceeds maximum {max}")]
    CodeLengthTooLong {
        symbol: Symbol,
        length: usize,
        max: usize,
    },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
