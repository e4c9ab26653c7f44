// src/main.rs
mod config;
mod input_gen;
mod logger;

use std::fs::{self, File};
use std::io::{self, Cursor};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use huffproc_core::bitio::BitReader;
use huffproc_core::codes::CodeTable;
use huffproc_core::frequency::FrequencyTable;
use huffproc_core::metrics::Metrics;
use huffproc_core::tree::HuffTree;
use huffproc_core::{compress, decompress, Result};
use tracing::{debug, error, info, trace, warn, Level};

use crate::config::{Cli, Config, Source, Task};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    let args: Vec<String> = std::env::args().collect();
    let span = tracing::info_span!("command_execution", command = ?args);
    let _enter = span.enter();

    let config = match Config::from_cli(cli) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if config.print_config {
        config.print();
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<()> {
    match &config.task {
        Task::Compress { input, output } => compress_file(input, output, config),
        Task::Decompress { input, output } => decompress_file(input, output, config),
        Task::RoundTrip { source } => round_trip(source, config),
        Task::Generate { output, seed, size } => {
            let written = input_gen::write_sample_file(output, *seed, *size)?;
            info!(seed, "wrote {} sample bytes to {}", written, output.display());
            Ok(())
        }
    }
}

fn compress_file(input: &Path, output: &Path, config: &Config) -> Result<()> {
    if tracing::enabled!(Level::TRACE) {
        trace_codes(input)?;
    }

    let source = File::open(input)?;
    let sink = File::create(output)?;
    let metrics = remove_on_error(compress(source, sink), output)?;

    info!(
        "compressed {} -> {} ({} -> {} bytes)",
        input.display(),
        output.display(),
        metrics.raw_bytes,
        metrics.compressed_bytes
    );
    report(&metrics, config);
    Ok(())
}

fn decompress_file(input: &Path, output: &Path, config: &Config) -> Result<()> {
    let source = File::open(input)?;
    let sink = File::create(output)?;
    let metrics = remove_on_error(decompress(source, sink), output)?;

    info!(
        "decompressed {} -> {} ({} -> {} bytes)",
        input.display(),
        output.display(),
        metrics.compressed_bytes,
        metrics.raw_bytes
    );
    report(&metrics, config);
    Ok(())
}

fn round_trip(source: &Source, config: &Config) -> Result<()> {
    let data = match source {
        Source::File(path) => fs::read(path)?,
        Source::Sample { seed, size } => {
            info!(seed, "generating {} byte sample", size);
            input_gen::generate_sample_data(*seed, *size)
        }
    };

    let mut compressed = Vec::new();
    let forward = compress(Cursor::new(&data), &mut compressed)?;
    report(&forward, config);

    let mut restored = Vec::with_capacity(data.len());
    let backward = decompress(&compressed[..], &mut restored)?;
    report(&backward, config);

    if let Some(pos) = data.iter().zip(&restored).position(|(a, b)| a != b) {
        return Err(mismatch(format!("round trip differs at byte {}", pos)));
    }
    if data.len() != restored.len() {
        return Err(mismatch(format!(
            "round trip restored {} of {} bytes",
            restored.len(),
            data.len()
        )));
    }

    info!(
        "round trip ok: {} -> {} -> {} bytes",
        data.len(),
        compressed.len(),
        restored.len()
    );
    Ok(())
}

/// Delete the partial output file of a failed run.
fn remove_on_error(result: Result<Metrics>, output: &Path) -> Result<Metrics> {
    if result.is_err() {
        if let Err(e) = fs::remove_file(output) {
            warn!("could not remove partial output {}: {}", output.display(), e);
        }
    }
    result
}

fn report(metrics: &Metrics, config: &Config) {
    debug!(
        operation = %metrics.operation,
        header_bits = metrics.header_bits,
        body_bits = metrics.body_bits,
        leaf_count = metrics.leaf_count,
        tree_height = metrics.tree_height,
        "stream layout"
    );
    if config.print_metrics {
        metrics.print_summary();
    }
}

/// Log the count and code of every symbol in `input`.
fn trace_codes(input: &Path) -> Result<()> {
    let mut reader = BitReader::new(File::open(input)?);
    let freqs = FrequencyTable::read_from(&mut reader)?;
    let codes = CodeTable::from_tree(&HuffTree::from_frequencies(&freqs)?)?;
    trace!("{} symbols coded", codes.symbol_count());

    for (symbol, code) in codes.iter() {
        trace!(symbol, count = freqs.get(symbol), len = code.len, "code {}", code);
    }
    Ok(())
}

fn mismatch(message: String) -> huffproc_core::Error {
    io::Error::new(io::ErrorKind::InvalidData, message).into()
}
