//! Configuration for the huffproc command line.
//!
//! Arguments are parsed with clap into a [`Cli`], then resolved into a
//! [`Config`]: defaults filled in, paths checked, and the seed for sample
//! generation fixed. The resolved seed is printed with `--print-config` so a
//! generated run can be repeated exactly.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{ArgAction, Parser, Subcommand};
use huffproc_core::{Error, Result};

/// Size of a generated sample when `--size` is not given.
pub const DEFAULT_SAMPLE_SIZE: usize = 64 * 1024;

/// Largest sample `--size` accepts (1 GiB).
pub const MAX_SAMPLE_SIZE: usize = 1 << 30;

#[derive(Parser, Debug)]
#[command(name = "huffproc", version)]
#[command(about = "Lossless file compression with Huffman coding", long_about = None)]
pub struct Cli {
    /// Log more detail (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print the resolved configuration before running
    #[arg(long, global = true)]
    pub print_config: bool,

    /// Don't print the metrics summary
    #[arg(long, global = true)]
    pub no_metrics: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compress a file
    Compress { input: PathBuf, output: PathBuf },
    /// Decompress a file produced by `compress`
    Decompress { input: PathBuf, output: PathBuf },
    /// Compress and decompress in memory, then check the result matches
    Roundtrip {
        /// Input file (default: generate a sample)
        #[arg(long = "in", value_name = "PATH")]
        input: Option<PathBuf>,
        /// Seed for the generated sample
        #[arg(long, conflicts_with = "input")]
        seed: Option<u64>,
        /// Size of the generated sample in bytes
        #[arg(long, value_name = "BYTES", conflicts_with = "input")]
        size: Option<usize>,
    },
    /// Write a generated sample file
    Generate {
        output: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, value_name = "BYTES")]
        size: Option<usize>,
    },
}

/// Where the data for a round trip comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Sample { seed: u64, size: usize },
}

/// What a run does, with every default resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    Compress { input: PathBuf, output: PathBuf },
    Decompress { input: PathBuf, output: PathBuf },
    RoundTrip { source: Source },
    Generate { output: PathBuf, seed: u64, size: usize },
}

/// Complete configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub task: Task,

    // === Behavior ===
    /// `-v` occurrences
    pub verbosity: u8,

    /// Whether to print the resolved configuration
    pub print_config: bool,

    /// Whether to print the metrics summary
    pub print_metrics: bool,
}

impl Config {
    /// Resolve parsed arguments.
    ///
    /// A missing seed is derived from the current time.
    ///
    /// # Errors
    /// `Error::Config` if input and output name the same path, or a sample
    /// size is above [`MAX_SAMPLE_SIZE`].
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let task = match cli.command {
            Commands::Compress { input, output } => {
                check_distinct(&input, &output)?;
                Task::Compress { input, output }
            }
            Commands::Decompress { input, output } => {
                check_distinct(&input, &output)?;
                Task::Decompress { input, output }
            }
            Commands::Roundtrip { input: Some(path), .. } => Task::RoundTrip {
                source: Source::File(path),
            },
            Commands::Roundtrip { input: None, seed, size } => Task::RoundTrip {
                source: Source::Sample {
                    seed: seed.unwrap_or_else(time_seed),
                    size: check_size(size)?,
                },
            },
            Commands::Generate { output, seed, size } => Task::Generate {
                output,
                seed: seed.unwrap_or_else(time_seed),
                size: check_size(size)?,
            },
        };

        Ok(Config {
            task,
            verbosity: cli.verbose,
            print_config: cli.print_config,
            print_metrics: !cli.no_metrics,
        })
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        match &self.task {
            Task::Compress { input, output } => {
                println!("Mode:   compress");
                println!("Input:  {}", input.display());
                println!("Output: {}", output.display());
            }
            Task::Decompress { input, output } => {
                println!("Mode:   decompress");
                println!("Input:  {}", input.display());
                println!("Output: {}", output.display());
            }
            Task::RoundTrip { source } => {
                println!("Mode:   roundtrip");
                match source {
                    Source::File(path) => println!("Input:  {}", path.display()),
                    Source::Sample { seed, size } => {
                        println!("Input:  (generate sample)");
                        println!("Seed:   {}", seed);
                        println!("Size:   {} bytes ({} KiB)", size, size / 1024);
                    }
                }
            }
            Task::Generate { output, seed, size } => {
                println!("Mode:   generate");
                println!("Output: {}", output.display());
                println!("Seed:   {}", seed);
                println!("Size:   {} bytes ({} KiB)", size, size / 1024);
            }
        }
        println!();
        println!("Verbosity: {}", self.verbosity);
        println!("Print metrics: {}", self.print_metrics);
        println!();
    }
}

/// Reject an output that names the input file, however it is spelled.
/// Creating the output would truncate the input before it is read.
fn check_distinct(input: &Path, output: &Path) -> Result<()> {
    if resolve_path(input) == resolve_path(output) {
        return Err(Error::Config(format!(
            "input and output are the same file: {}",
            input.display()
        )));
    }
    Ok(())
}

/// Absolute, symlink-free form of `path`. A file that does not exist yet is
/// resolved through its parent directory.
fn resolve_path(path: &Path) -> PathBuf {
    if let Ok(resolved) = fs::canonicalize(path) {
        return resolved;
    }
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    match (fs::canonicalize(parent), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}

fn check_size(size: Option<usize>) -> Result<usize> {
    let size = size.unwrap_or(DEFAULT_SAMPLE_SIZE);
    if size > MAX_SAMPLE_SIZE {
        return Err(Error::Config(format!(
            "sample size {} exceeds the {} byte limit",
            size, MAX_SAMPLE_SIZE
        )));
    }
    Ok(size)
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(args: &[&str]) -> Result<Config> {
        let cli = Cli::try_parse_from(std::iter::once("huffproc").chain(args.iter().copied()))
            .expect("arguments should parse");
        Config::from_cli(cli)
    }

    #[test]
    fn test_compress_paths() {
        let config = resolve(&["compress", "in.txt", "out.hf"]).unwrap();
        assert_eq!(
            config.task,
            Task::Compress {
                input: PathBuf::from("in.txt"),
                output: PathBuf::from("out.hf"),
            }
        );
        assert!(config.print_metrics);
        assert!(!config.print_config);
        assert_eq!(config.verbosity, 0);
    }

    #[test]
    fn test_same_path_rejected() {
        assert!(matches!(
            resolve(&["decompress", "a.hf", "a.hf"]),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_same_file_spelled_differently_rejected() {
        assert!(matches!(
            resolve(&["compress", "huffproc-x.txt", "./huffproc-x.txt"]),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_existing_file_aliases_rejected() {
        let dir = std::env::temp_dir().join(format!("huffproc-cfg-{}", std::process::id()));
        fs::create_dir_all(dir.join("sub")).unwrap();
        let file = dir.join("x.txt");
        fs::write(&file, b"keep me").unwrap();

        let input = file.to_string_lossy().into_owned();
        let alias = dir.join("sub").join("..").join("x.txt");
        let alias = alias.to_string_lossy().into_owned();
        assert!(matches!(
            resolve(&["compress", &input, &alias]),
            Err(Error::Config(_))
        ));

        #[cfg(unix)]
        {
            let link = dir.join("link.txt");
            std::os::unix::fs::symlink(&file, &link).unwrap();
            let link = link.to_string_lossy().into_owned();
            assert!(matches!(
                resolve(&["decompress", &link, &input]),
                Err(Error::Config(_))
            ));
        }

        let other = dir.join("y.txt").to_string_lossy().into_owned();
        assert!(resolve(&["compress", &input, &other]).is_ok());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_global_flags() {
        let config = resolve(&["-vv", "roundtrip", "--no-metrics", "--print-config"]).unwrap();
        assert_eq!(config.verbosity, 2);
        assert!(!config.print_metrics);
        assert!(config.print_config);
    }

    #[test]
    fn test_roundtrip_defaults() {
        let config = resolve(&["roundtrip", "--seed", "42"]).unwrap();
        assert_eq!(
            config.task,
            Task::RoundTrip {
                source: Source::Sample {
                    seed: 42,
                    size: DEFAULT_SAMPLE_SIZE,
                },
            }
        );
    }

    #[test]
    fn test_roundtrip_from_file() {
        let config = resolve(&["roundtrip", "--in", "data.bin"]).unwrap();
        assert_eq!(
            config.task,
            Task::RoundTrip {
                source: Source::File(PathBuf::from("data.bin")),
            }
        );
    }

    #[test]
    fn test_roundtrip_file_conflicts_with_seed() {
        let parsed = Cli::try_parse_from(["huffproc", "roundtrip", "--in", "x", "--seed", "1"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_generate() {
        let config = resolve(&["generate", "sample.bin", "--seed", "7", "--size", "100"]).unwrap();
        assert_eq!(
            config.task,
            Task::Generate {
                output: PathBuf::from("sample.bin"),
                seed: 7,
                size: 100,
            }
        );
    }

    #[test]
    fn test_oversized_sample_rejected() {
        let too_big = (MAX_SAMPLE_SIZE + 1).to_string();
        assert!(matches!(
            resolve(&["generate", "sample.bin", "--size", &too_big]),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_missing_subcommand() {
        assert!(Cli::try_parse_from(["huffproc"]).is_err());
    }
}
