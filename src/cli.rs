use crate::constants::*;
use anyhow::{anyhow, Result};
use chrono::Datelike;
use clap::{ArgAction, Parser, Subcommand};
use env_logger::fmt::Color;
use log::{Level, LevelFilter};
use once_cell::sync::Lazy;
use rec_spill_sort::{DEFAULT_IN_MEMORY_THRESHOLD_BYTES, DEFAULT_RUN_SIZE};
use std::{
    io::Write,
    path::{Path, PathBuf},
};

/// Full version string including the crate version and git description.
///
/// This version string is used in the command-line interface to provide detailed version information.
/// It includes the crate version from Cargo.toml and additional build information such as the git commit hash.
/// # Examples
/// * `0.1.0-1ba958a-dirty` - while on a dirty branch
/// * `0.1.0-1ba958a` - with a fresh commit
pub static FULL_VERSION: Lazy<String> = Lazy::new(|| {
    let git_describe = env!("VERGEN_GIT_DESCRIBE");
    if git_describe.is_empty() {
        env!("CARGO_PKG_VERSION").to_string()
    } else {
        format!("{}-{}", env!("CARGO_PKG_VERSION"), git_describe)
    }
});

#[derive(Parser, Debug)]
#[command(name="sortx",
          version=&**FULL_VERSION,
          about="Sorts and chunks record files of any size",
          long_about = None,
          after_help = format!("Copyright (C) {}     sortx contributors.
          Distributed under the BSD 3-Clause License; see LICENSE.md.", chrono::Utc::now().year()),
          help_template = "{name} {version}{about-section}\n{usage-heading}\n    {usage}\n\n{all-args}{after-help}",
          )]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Specify multiple times to increase verbosity level (e.g., -vv for more verbosity)
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true
    )]
    pub verbosity: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sort the records of a file
    Sort(SortArgs),
    /// Split the records of a file into bounded chunk files
    Chunk(ChunkArgs),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Sort(_) => "sort",
            Command::Chunk(_) => "chunk",
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(arg_required_else_help(true))]
pub struct SortArgs {
    /// Input file to sort
    #[arg(
        short = 'i',
        long = "input",
        value_name = "FILE",
        value_parser = check_file_exists
    )]
    pub input: PathBuf,

    /// Write output to a file [default: standard output]
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        value_parser = check_prefix_path,
        conflicts_with = "in_place"
    )]
    pub output: Option<PathBuf>,

    /// Replace the input file with its sorted contents
    #[arg(long = "in-place")]
    pub in_place: bool,

    /// Drop duplicate records, keeping one representative per set of equals
    #[arg(short = 'u', long = "unique")]
    pub unique: bool,

    /// Sort in descending order
    #[arg(short = 'r', long = "reverse")]
    pub reverse: bool,

    /// Records held in memory per spilled run when sorting externally
    #[arg(
        help_heading = "Advanced",
        long = "run-size",
        value_name = "N",
        default_value_t = DEFAULT_RUN_SIZE,
        value_parser = run_size_in_range
    )]
    pub run_size: usize,

    /// Inputs at or below this many bytes are sorted entirely in memory
    #[arg(
        help_heading = "Advanced",
        long = "max-mem",
        value_name = "BYTES",
        default_value_t = DEFAULT_IN_MEMORY_THRESHOLD_BYTES
    )]
    pub max_mem: u64,

    /// Directory to hold spill runs [default: system temp directory]
    #[arg(
        help_heading = "Advanced",
        long = "tmp-dir",
        value_name = "DIR",
        value_parser = check_dir_exists
    )]
    pub tmp_dir: Option<PathBuf>,

    /// Sort externally even when the input would fit in memory
    #[arg(help_heading = "Advanced", long = "force-external")]
    pub force_external: bool,
}

#[derive(Parser, Debug, Clone)]
#[command(arg_required_else_help(true))]
pub struct ChunkArgs {
    /// Input file to chunk
    #[arg(
        short = 'i',
        long = "input",
        value_name = "FILE",
        value_parser = check_file_exists
    )]
    pub input: PathBuf,

    /// Directory to write chunk files into (created if missing)
    #[arg(short = 'O', long = "output-dir", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Maximum records per chunk
    #[arg(
        short = 'n',
        long = "max-records",
        value_name = "N",
        value_parser = max_records_in_range
    )]
    pub max_records: usize,

    /// 1-based field holding the group key; omit to split without grouping
    #[arg(
        short = 'k',
        long = "key-field",
        value_name = "FIELD",
        value_parser = key_field_in_range
    )]
    pub key_field: Option<usize>,

    /// Field delimiter used with --key-field
    #[arg(
        short = 'd',
        long = "delimiter",
        value_name = "CHAR",
        default_value_t = DEFAULT_KEY_DELIMITER,
        value_parser = delimiter_in_range
    )]
    pub delimiter: char,

    /// Keep input order and treat consecutive equal keys as the groups
    #[arg(long = "grouped", requires = "key_field")]
    pub grouped: bool,

    /// Filename prefix for chunk files
    #[arg(
        long = "prefix",
        value_name = "PREFIX",
        default_value = DEFAULT_CHUNK_PREFIX
    )]
    pub prefix: String,
}

/// Initializes the verbosity level for logging based on the command-line arguments.
///
/// Sets up the logger with a specific verbosity level that is determined
/// by the number of occurrences of the `-v` or `--verbose` flag in the command-line arguments.
///
/// # Arguments
///
/// * `args` - A reference to the parsed command-line arguments.
pub fn init_verbose(args: &Cli) {
    let filter_level: LevelFilter = match args.verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            let level = record.level();
            let mut style = buf.style();
            match record.level() {
                Level::Error => style.set_color(Color::Red),
                Level::Warn => style.set_color(Color::Yellow),
                Level::Info => style.set_color(Color::Green),
                Level::Debug => style.set_color(Color::Blue),
                Level::Trace => style.set_color(Color::Cyan),
            };

            writeln!(
                buf,
                "{} [{}] {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                style.value(level),
                record.module_path().unwrap_or("unknown_module"),
                record.args()
            )
        })
        .filter_level(filter_level)
        .init();
}

/// Checks if the provided file path exists.
///
/// Validates that the file path provided as an argument exists in the file system.
/// It is used to ensure that the file paths provided for input files are valid before attempting to process them.
///
/// # Arguments
///
/// * `s` - A string slice representing the file path to check.
///
/// # Returns
///
/// Returns a `Result<PathBuf>` which is Ok if the file exists, or an Err with a descriptive message if not.
fn check_file_exists(s: &str) -> Result<PathBuf> {
    let path = Path::new(s);
    if !path.exists() {
        return Err(anyhow!("File does not exist: {}", path.display()));
    }
    Ok(path.to_path_buf())
}

fn check_dir_exists(s: &str) -> Result<PathBuf> {
    let path = Path::new(s);
    if !path.is_dir() {
        return Err(anyhow!("Directory does not exist: {}", path.display()));
    }
    Ok(path.to_path_buf())
}

fn check_prefix_path(s: &str) -> Result<PathBuf> {
    let path = Path::new(s);
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            return Err(anyhow!("Path does not exist: {}", parent_dir.display()));
        }
    }
    Ok(path.to_path_buf())
}

fn run_size_in_range(s: &str) -> Result<usize> {
    let run_size: usize = s
        .parse::<usize>()
        .map_err(|_| anyhow!("`{}` is not a valid run size", s))?;
    if run_size == 0 {
        return Err(anyhow!("Run size must be >= 1"));
    }
    Ok(run_size)
}

fn max_records_in_range(s: &str) -> Result<usize> {
    let max_records: usize = s
        .parse::<usize>()
        .map_err(|_| anyhow!("`{}` is not a valid record count", s))?;
    if max_records == 0 {
        return Err(anyhow!("Maximum records per chunk must be >= 1"));
    }
    Ok(max_records)
}

fn key_field_in_range(s: &str) -> Result<usize> {
    let key_field: usize = s
        .parse::<usize>()
        .map_err(|_| anyhow!("`{}` is not a valid field number", s))?;
    if key_field == 0 {
        return Err(anyhow!("Key field numbering starts at 1"));
    }
    Ok(key_field)
}

fn delimiter_in_range(s: &str) -> Result<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(delimiter), None) if delimiter.is_ascii() => Ok(delimiter),
        _ => Err(anyhow!("Delimiter must be a single ASCII character")),
    }
}
