//! Seeded sample data for `roundtrip` and `generate`.
//!
//! A sample is a sequence of sections with very different symbol statistics,
//! so one file exercises both tall, skewed trees and near-flat ones:
//! - runs of a single byte (a two-leaf tree per section)
//! - text drawn from a small alphabet with English-like skew
//! - a short repeating pattern
//! - uniform random bytes (close to 8 bits/byte, no gain)

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use huffproc_core::Result;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Longest single section.
const SECTION_BYTES: usize = 8192;

/// Most common English letters first; `text` draws from the front more often.
const TEXT_ALPHABET: &[u8] = b"etaoinshrdlucmfwypvbgkjqxz .,\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Run,
    Text,
    Pattern,
    Noise,
}

impl Section {
    /// Weighted draw: runs 30%, text 30%, patterns 20%, noise 20%.
    fn pick(rng: &mut ChaCha8Rng) -> Self {
        match rng.gen_range(0..10) {
            0..=2 => Section::Run,
            3..=5 => Section::Text,
            6..=7 => Section::Pattern,
            _ => Section::Noise,
        }
    }
}

/// Generate exactly `size` bytes of mixed-compressibility data.
///
/// The same `(seed, size)` always yields the same bytes.
pub fn generate_sample_data(seed: u64, size: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(size);

    while data.len() < size {
        let len = (size - data.len()).min(SECTION_BYTES);
        match Section::pick(&mut rng) {
            Section::Run => {
                let byte: u8 = rng.gen();
                data.resize(data.len() + len, byte);
            }
            Section::Text => {
                for _ in 0..len {
                    // Squared draw skews towards the front of the alphabet
                    let r: f64 = rng.gen();
                    let idx = ((r * r) * TEXT_ALPHABET.len() as f64) as usize;
                    data.push(TEXT_ALPHABET[idx.min(TEXT_ALPHABET.len() - 1)]);
                }
            }
            Section::Pattern => {
                let pattern = random_pattern(&mut rng);
                data.extend(pattern.iter().cycle().take(len));
            }
            Section::Noise => {
                data.extend((0..len).map(|_| rng.gen::<u8>()));
            }
        }
    }

    data
}

/// A short pattern of distinct bytes.
fn random_pattern(rng: &mut ChaCha8Rng) -> Vec<u8> {
    let len = rng.gen_range(4..=32);
    let mut bytes: Vec<u8> = (0..=255).collect();
    bytes.shuffle(rng);
    bytes.truncate(len);
    bytes
}

/// Write a generated sample to `path`, returning the number of bytes written.
pub fn write_sample_file(path: &Path, seed: u64, size: usize) -> Result<usize> {
    let data = generate_sample_data(seed, size);
    let mut file = BufWriter::new(File::create(path)?);
    file.write_all(&data)?;
    file.flush()?;
    Ok(data.len())
}
