//! Whole-stream compression and decompression.
//!
//! # Stream Format
//!
//! ```text
//! +--------------------+
//! | Magic (32 bits)    |  0xFACE8201, MSB first
//! +--------------------+
//! | Tree header        |  pre-order tree, see `header`
//! | (variable)         |
//! +--------------------+
//! | Body               |  one code per input byte, then the
//! | (variable)         |  end-of-stream code
//! +--------------------+
//! | Padding (0-7 bits) |  zeros up to the next byte boundary
//! +--------------------+
//! ```
//!
//! Nothing records the body length: the decoder stops at the end-of-stream
//! leaf, and running out of bits before reaching it is an error. Bytes after
//! the padded body are never read.

use std::io::{Cursor, Read, Seek, Write};

use crate::bitio::{BitReader, BitWriter};
use crate::codes::CodeTable;
use crate::error::{FormatError, HuffmanError, Result, TruncatedStreamError};
use crate::frequency::FrequencyTable;
use crate::header::{header_bits, read_header, write_header};
use crate::metrics::{Metrics, Operation};
use crate::tree::{HuffNode, HuffTree};
use crate::{Symbol, BITS_PER_INT, BITS_PER_WORD, HUFF_TREE, PSEUDO_EOF};

/// Compress `input` into `output`.
///
/// The input is read twice from its current position: once to count
/// symbols and, after seeking back, once to encode them. The output is
/// flushed before returning.
///
/// # Errors
/// - `HuffmanError::UnknownSymbol` or `InputChanged` if the input changed
///   between passes
/// - `Error::Io` if either stream fails
pub fn compress<R: Read + Seek, W: Write>(input: R, output: W) -> Result<Metrics> {
    let mut metrics = Metrics::new(Operation::Compress);
    let mut reader = BitReader::new_seekable(input)?;
    let mut writer = BitWriter::new(output);

    let freqs = FrequencyTable::read_from(&mut reader)?;
    let tree = HuffTree::from_frequencies(&freqs)?;
    let codes = CodeTable::from_tree(&tree)?;

    writer.write_bits(HUFF_TREE as u64, BITS_PER_INT)?;
    write_header(&tree, &mut writer)?;
    let header_end = writer.bits_written();

    reader.reset()?;
    let symbols = write_compressed_bits(&codes, &mut reader, &mut writer)?;
    if symbols != freqs.total() {
        return Err(HuffmanError::InputChanged {
            counted: freqs.total(),
            encoded: symbols,
        }
        .into());
    }

    metrics.raw_bytes = symbols;
    metrics.header_bits = header_bits(&tree);
    metrics.body_bits = writer.bits_written() - header_end;
    metrics.bits_read = reader.bits_read();
    metrics.bits_written = writer.bits_written();
    metrics.compressed_bytes = metrics.bits_written.div_ceil(8);
    metrics.leaf_count = tree.leaf_count();
    metrics.tree_height = tree.height();
    metrics.entropy = Some(freqs.entropy());

    writer.finish()?;
    metrics.complete();
    Ok(metrics)
}

/// Decompress `input` into `output`.
///
/// # Errors
/// - `FormatError` if the magic number or tree header is invalid; nothing
///   has been written to `output` in that case
/// - `TruncatedStreamError` if the stream ends before the end-of-stream code
/// - `Error::Io` if either stream fails
pub fn decompress<R: Read, W: Write>(input: R, output: W) -> Result<Metrics> {
    let mut metrics = Metrics::new(Operation::Decompress);
    let mut reader = BitReader::new(input);

    let magic = reader
        .read_bits(BITS_PER_INT)?
        .ok_or(FormatError::MissingMagic)? as u32;
    if magic != HUFF_TREE {
        return Err(FormatError::InvalidMagic {
            expected: HUFF_TREE,
            actual: magic,
        }
        .into());
    }

    let tree = read_header(&mut reader)?;
    let header_end = reader.bits_read();

    let mut writer = BitWriter::new(output);
    let symbols = read_compressed_bits(&tree, &mut reader, &mut writer)?;

    metrics.raw_bytes = symbols;
    metrics.header_bits = header_end - BITS_PER_INT as u64;
    metrics.body_bits = reader.bits_read() - header_end;
    metrics.bits_read = reader.bits_read();
    metrics.bits_written = writer.bits_written();
    metrics.compressed_bytes = metrics.bits_read.div_ceil(8);
    metrics.leaf_count = tree.leaf_count();
    metrics.tree_height = tree.height();

    writer.finish()?;
    metrics.complete();
    Ok(metrics)
}

/// Encode every remaining 8-bit chunk of `input`, then the end-of-stream code.
///
/// Returns the number of chunks encoded.
pub fn write_compressed_bits<R: Read, W: Write>(
    codes: &CodeTable,
    input: &mut BitReader<R>,
    out: &mut BitWriter<W>,
) -> Result<u64> {
    let mut count = 0u64;
    while let Some(chunk) = input.read_bits(BITS_PER_WORD)? {
        let symbol = chunk as Symbol;
        let code = codes
            .get(symbol)
            .ok_or(HuffmanError::UnknownSymbol(symbol))?;
        code.write_to(out)?;
        count += 1;
    }

    let eof = codes
        .get(PSEUDO_EOF)
        .ok_or(HuffmanError::UnknownSymbol(PSEUDO_EOF))?;
    eof.write_to(out)?;
    Ok(count)
}

/// Walk `tree` one input bit at a time, writing a byte per leaf reached,
/// until the end-of-stream leaf.
///
/// A tree that is only the end-of-stream leaf decodes to nothing without
/// reading any bits. Returns the number of bytes written.
///
/// # Errors
/// - `TruncatedStreamError::Body` if `input` ends first
/// - `FormatError::MissingSentinel` if the tree has no end-of-stream leaf
pub fn read_compressed_bits<R: Read, W: Write>(
    tree: &HuffTree,
    input: &mut BitReader<R>,
    out: &mut BitWriter<W>,
) -> Result<u64> {
    if !tree.has_sentinel() {
        return Err(FormatError::MissingSentinel.into());
    }

    let root = tree.root();
    let mut decoded = 0u64;
    let mut node = root;
    loop {
        match node {
            HuffNode::Leaf { symbol, .. } if *symbol == PSEUDO_EOF => return Ok(decoded),
            HuffNode::Leaf { symbol, .. } => {
                out.write_bits(*symbol as u64, BITS_PER_WORD)?;
                decoded += 1;
                node = root;
            }
            HuffNode::Internal { left, right, .. } => {
                let bit = input
                    .read_bit()?
                    .ok_or(TruncatedStreamError::Body { decoded })?;
                node = if bit { right.as_ref() } else { left.as_ref() };
            }
        }
    }
}

/// Compress an in-memory buffer.
pub fn compress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    compress(Cursor::new(data), &mut out)?;
    Ok(out)
}

/// Decompress an in-memory buffer.
pub fn decompress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    decompress(data, &mut out)?;
    Ok(out)
}
