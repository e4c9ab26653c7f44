//! Metrics collection and reporting for a single compress/decompress call.
//!
//! This module provides observable insights into one run of the codec:
//! - Byte counts on the raw and compressed side
//! - How the compressed bits split between header and body
//! - Tree shape (leaf count, height)
//! - Timing information
//!
//! The codec fills in a `Metrics` and returns it; printing or logging it is
//! left to the caller.

use std::fmt;
use std::time::{Duration, Instant};

/// Which way the data went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Compress,
    Decompress,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Compress => write!(f, "compress"),
            Operation::Decompress => write!(f, "decompress"),
        }
    }
}

/// Accounting for one call.
#[derive(Debug, Clone)]
pub struct Metrics {
    pub operation: Operation,

    // === Timing ===
    /// When the call started
    pub start_time: Instant,

    /// When the call ended (set on completion)
    pub end_time: Option<Instant>,

    // === Sizes ===
    /// Uncompressed bytes (read when compressing, written when decompressing)
    pub raw_bytes: u64,

    /// Compressed bytes, padding included
    pub compressed_bytes: u64,

    /// Bits of the serialized tree (magic number excluded)
    pub header_bits: u64,

    /// Bits of the encoded body, end-of-stream code included
    pub body_bits: u64,

    // === Tree ===
    /// Leaves in the code tree (distinct symbols, sentinel included)
    pub leaf_count: usize,

    /// Longest code length
    pub tree_height: usize,

    /// Shannon entropy of the input in bits per byte (compress only)
    pub entropy: Option<f64>,

    // === Bit I/O ===
    /// Bits pulled from the bit reader during the final pass
    pub bits_read: u64,

    /// Bits pushed to the bit writer, padding excluded
    pub bits_written: u64,
}

impl Metrics {
    /// Create new metrics with start time set to now.
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            start_time: Instant::now(),
            end_time: None,
            raw_bytes: 0,
            compressed_bytes: 0,
            header_bits: 0,
            body_bits: 0,
            leaf_count: 0,
            tree_height: 0,
            entropy: None,
            bits_read: 0,
            bits_written: 0,
        }
    }

    /// Mark the call as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Compute compression ratio (compressed / raw).
    ///
    /// Returns 0.0 if there was no raw data.
    pub fn compression_ratio(&self) -> f64 {
        if self.raw_bytes == 0 {
            0.0
        } else {
            self.compressed_bytes as f64 / self.raw_bytes as f64
        }
    }

    /// Average body bits spent per raw byte.
    pub fn bits_per_symbol(&self) -> f64 {
        if self.raw_bytes == 0 {
            0.0
        } else {
            self.body_bits as f64 / self.raw_bytes as f64
        }
    }

    /// Compute throughput in raw bytes/second.
    pub fn throughput_bps(&self) -> f64 {
        let duration_secs = self.duration().as_secs_f64();
        if duration_secs == 0.0 {
            0.0
        } else {
            self.raw_bytes as f64 / duration_secs
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== {} Summary ===", capitalize(&self.operation.to_string()));
        println!("Duration: {} ms", self.duration().as_millis());
        println!();

        println!("Raw:        {} bytes ({:.2} MiB)", self.raw_bytes, mib(self.raw_bytes));
        println!(
            "Compressed: {} bytes ({:.2} MiB)",
            self.compressed_bytes,
            mib(self.compressed_bytes)
        );
        println!("Ratio: {:.1}%", self.compression_ratio() * 100.0);
        println!();

        println!("=== Stream ===");
        println!("Header: {} bits", self.header_bits);
        println!("Body:   {} bits ({:.3} bits/byte)", self.body_bits, self.bits_per_symbol());
        if let Some(entropy) = self.entropy {
            println!("Entropy: {:.3} bits/byte", entropy);
        }
        println!("Bits read: {}", self.bits_read);
        println!("Bits written: {}", self.bits_written);
        println!();

        println!("=== Tree ===");
        println!("Leaves: {}", self.leaf_count);
        println!("Height: {}", self.tree_height);
        println!();

        println!("=== Performance ===");
        println!("Throughput: {:.2} MB/s", self.throughput_bps() / 1_000_000.0);
        println!();
    }

    /// Export metrics as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "operation={}\n\
             duration_ms={}\n\
             raw_bytes={}\n\
             compressed_bytes={}\n\
             compression_ratio={:.4}\n\
             header_bits={}\n\
             body_bits={}\n\
             leaf_count={}\n\
             tree_height={}\n\
             bits_read={}\n\
             bits_written={}\n",
            self.operation,
            self.duration().as_millis(),
            self.raw_bytes,
            self.compressed_bytes,
            self.compression_ratio(),
            self.header_bits,
            self.body_bits,
            self.leaf_count,
            self.tree_height,
            self.bits_read,
            self.bits_written,
        )
    }
}

fn mib(bytes: u64) -> f64 {
    bytes as f64 / 1024.0 / 1024.0
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new(Operation::Compress);
        assert!(metrics.end_time.is_none());
        assert!(metrics.duration().as_millis() < 100);
    }

    #[test]
    fn test_compression_ratio() {
        let mut metrics = Metrics::new(Operation::Compress);
        metrics.raw_bytes = 1000;
        metrics.compressed_bytes = 750;

        assert_eq!(metrics.compression_ratio(), 0.75);
    }

    #[test]
    fn test_empty_ratios() {
        let metrics = Metrics::new(Operation::Decompress);
        assert_eq!(metrics.compression_ratio(), 0.0);
        assert_eq!(metrics.bits_per_symbol(), 0.0);
    }

    #[test]
    fn test_bits_per_symbol() {
        let mut metrics = Metrics::new(Operation::Compress);
        metrics.raw_bytes = 100;
        metrics.body_bits = 250;
        assert_eq!(metrics.bits_per_symbol(), 2.5);
    }

    #[test]
    fn test_throughput() {
        let mut metrics = Metrics::new(Operation::Compress);
        metrics.raw_bytes = 1_000_000;

        std::thread::sleep(Duration::from_millis(10));
        metrics.complete();

        assert!(metrics.throughput_bps() > 0.0);
    }

    #[test]
    fn test_export_text() {
        let mut metrics = Metrics::new(Operation::Decompress);
        metrics.raw_bytes = 1000;
        metrics.compressed_bytes = 600;
        metrics.leaf_count = 10;

        let text = metrics.export_text();
        assert!(text.contains("operation=decompress"));
        assert!(text.contains("raw_bytes=1000"));
        assert!(text.contains("compressed_bytes=600"));
        assert!(text.contains("leaf_count=10"));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("compress"), "Compress");
        assert_eq!(capitalize(""), "");
    }
}
