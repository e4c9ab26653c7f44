//! Bit-level I/O over byte-oriented streams.
//!
//! This module provides BitWriter and BitReader, the primitives every other
//! stage is written against. Both operate in MSB-first (most significant bit
//! first) order.
//!
//! # End of input
//! `BitReader::read_bits` returns `Ok(None)` once fewer bits remain than were
//! requested. That out-of-band value is never a valid chunk, so callers can
//! loop on it the same way for raw input and for compressed input.
//!
//! # Padding Rules
//! - BitWriter: pads the final partial byte with trailing zeros on `finish`
//! - BitReader: cannot tell padding from data; the sentinel code tells the
//!   decoder where the body ends
//!
//! # Example
//! ```
//! use std::io::Cursor;
//! use huffproc_core::bitio::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new(Vec::new());
//! writer.write_bits(0b101, 3).unwrap();  // Write 3 bits: 1, 0, 1
//! writer.write_bits(0b11, 2).unwrap();   // Write 2 bits: 1, 1
//! // Total: 10111 -> padded to 10111000
//!
//! let bytes = writer.finish().unwrap();
//! let mut reader = BitReader::new(Cursor::new(bytes));
//! assert_eq!(reader.read_bits(3).unwrap(), Some(0b101));
//! assert_eq!(reader.read_bits(2).unwrap(), Some(0b11));
//! ```

use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};

use crate::error::{BitIoError, Result};

/// Largest bit count accepted by a single read or write.
pub const MAX_BITS_PER_CALL: usize = 64;

/// Writes bits MSB-first into a byte stream.
///
/// Accumulates bits in a one-byte buffer and forwards complete bytes to the
/// (buffered) inner writer. `finish` pads the final partial byte with zeros.
///
/// # Invariants
/// - `bit_count` is always < 8
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    inner: BufWriter<W>,
    /// Accumulator for the current partial byte (MSB-aligned)
    bit_buffer: u8,
    /// Number of bits in bit_buffer (0-7)
    bit_count: u8,
    bits_written: u64,
}

impl<W: Write> BitWriter<W> {
    /// Create a new BitWriter on top of `inner`.
    pub fn new(inner: W) -> Self {
        Self {
            inner: BufWriter::new(inner),
            bit_buffer: 0,
            bit_count: 0,
            bits_written: 0,
        }
    }

    /// Write up to 64 bits to the output.
    ///
    /// Bits are written MSB-first. For example, writing value=0b101 with count=3
    /// writes bits 1, 0, 1 in that order. Bits of `value` above `count` are
    /// ignored.
    ///
    /// # Errors
    /// - `BitIoError::InvalidBitCount` if count > 64
    /// - `Error::Io` if the inner writer fails
    pub fn write_bits(&mut self, value: u64, count: usize) -> Result<()> {
        if count > MAX_BITS_PER_CALL {
            return Err(BitIoError::InvalidBitCount(count).into());
        }

        let mut remaining = count;

        while remaining > 0 {
            // How many bits fit in the current byte?
            let bits_to_write = remaining.min(8 - self.bit_count as usize);

            // Top bits_to_write bits of what is left of value
            let shift = remaining - bits_to_write;
            let bits = ((value >> shift) & ((1u64 << bits_to_write) - 1)) as u8;

            self.bit_buffer |= bits << (8 - self.bit_count as usize - bits_to_write);
            self.bit_count += bits_to_write as u8;

            if self.bit_count == 8 {
                self.inner.write_all(&[self.bit_buffer])?;
                self.bit_buffer = 0;
                self.bit_count = 0;
            }

            remaining = shift;
        }

        self.bits_written += count as u64;
        Ok(())
    }

    /// Pad the final partial byte with zeros, flush, and return the inner writer.
    ///
    /// This consumes the writer.
    pub fn finish(mut self) -> Result<W> {
        if self.bit_count > 0 {
            self.inner.write_all(&[self.bit_buffer])?;
        }
        let mut inner = self.inner.into_inner().map_err(io::IntoInnerError::into_error)?;
        inner.flush()?;
        Ok(inner)
    }

    /// Total number of bits written, excluding padding.
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }
}

/// Reads bits MSB-first from a byte stream.
///
/// Bits left over in a partially consumed byte are kept between calls.
/// A read that cannot be satisfied returns `Ok(None)`; the bits it did
/// consume are gone, matching a stream that has simply ended.
#[derive(Debug)]
pub struct BitReader<R: Read> {
    inner: BufReader<R>,
    /// Current byte being consumed
    bit_buffer: u8,
    /// Unread bits remaining in bit_buffer (0-8)
    bits_left: u8,
    bits_read: u64,
    /// Byte offset `reset` seeks back to
    start: u64,
}

impl<R: Read> BitReader<R> {
    /// Create a new BitReader over `inner`.
    pub fn new(inner: R) -> Self {
        Self {
            inner: BufReader::new(inner),
            bit_buffer: 0,
            bits_left: 0,
            bits_read: 0,
            start: 0,
        }
    }

    /// Read up to 64 bits from the input.
    ///
    /// Bits are read MSB-first. For example, reading 3 bits from byte 0b10110000
    /// returns 0b101. Returns `Ok(None)` if the stream ends first.
    ///
    /// # Errors
    /// - `BitIoError::InvalidBitCount` if count > 64
    /// - `Error::Io` if the inner reader fails
    pub fn read_bits(&mut self, count: usize) -> Result<Option<u64>> {
        if count > MAX_BITS_PER_CALL {
            return Err(BitIoError::InvalidBitCount(count).into());
        }

        let mut result = 0u64;
        let mut remaining = count;

        while remaining > 0 {
            if self.bits_left == 0 {
                match self.next_byte()? {
                    Some(byte) => {
                        self.bit_buffer = byte;
                        self.bits_left = 8;
                    }
                    None => return Ok(None),
                }
            }

            let bits_to_read = remaining.min(self.bits_left as usize);
            let mask = ((1u16 << bits_to_read) - 1) as u8;
            let bits = (self.bit_buffer >> (self.bits_left as usize - bits_to_read)) & mask;

            result = (result << bits_to_read) | bits as u64;

            self.bits_left -= bits_to_read as u8;
            remaining -= bits_to_read;
        }

        self.bits_read += count as u64;
        Ok(Some(result))
    }

    /// Read a single bit, or `None` at end of input.
    pub fn read_bit(&mut self) -> Result<Option<bool>> {
        Ok(self.read_bits(1)?.map(|bit| bit == 1))
    }

    /// Number of bits handed out since creation or the last `reset`.
    pub fn bits_read(&self) -> u64 {
        self.bits_read
    }

    /// Return the inner reader, dropping any buffered input.
    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }

    fn next_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl<R: Read + Seek> BitReader<R> {
    /// Create a BitReader whose `reset` returns to `inner`'s current
    /// position rather than to offset 0.
    pub fn new_seekable(mut inner: R) -> Result<Self> {
        let start = inner.stream_position()?;
        let mut reader = Self::new(inner);
        reader.start = start;
        Ok(reader)
    }

    /// Seek back to where reading started, for a second pass.
    ///
    /// That is offset 0 for a reader made with `new`, and the position at
    /// construction for one made with `new_seekable`.
    pub fn reset(&mut self) -> Result<()> {
        self.inner.seek(SeekFrom::Start(self.start))?;
        self.bit_buffer = 0;
        self.bits_left = 0;
        self.bits_read = 0;
        Ok(())
    }
}
