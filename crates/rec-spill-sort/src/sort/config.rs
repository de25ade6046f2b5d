use crate::{Result, SortError};
use std::path::PathBuf;

pub const DEFAULT_RUN_SIZE: usize = 100_000;
pub const DEFAULT_IN_MEMORY_THRESHOLD_BYTES: u64 = 64 * 1024 * 1024;

/// Settings for a single sort invocation.
///
/// A config is assembled once, validated, and handed to [`SortJob::new`];
/// the job never mutates it afterwards.
///
/// [`SortJob::new`]: crate::SortJob::new
#[derive(Clone, Debug)]
pub struct SortConfig {
    /// Maximum records held in memory per spilled run.
    pub run_size: usize,
    /// Inputs estimated at or below this many encoded bytes sort in memory.
    pub in_memory_threshold_bytes: u64,
    /// Collapse comparator-equal records to a single representative.
    pub remove_duplicates: bool,
    /// Parent directory for spill storage; `None` uses the system default.
    pub tmp_dir: Option<PathBuf>,
}

impl SortConfig {
    pub fn new(
        run_size: usize,
        in_memory_threshold_bytes: u64,
        remove_duplicates: bool,
        tmp_dir: Option<PathBuf>,
    ) -> Result<Self> {
        if run_size == 0 {
            return Err(SortError::invalid_config("run-size must be >= 1"));
        }
        Ok(Self {
            run_size,
            in_memory_threshold_bytes,
            remove_duplicates,
            tmp_dir,
        })
    }
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            run_size: DEFAULT_RUN_SIZE,
            in_memory_threshold_bytes: DEFAULT_IN_MEMORY_THRESHOLD_BYTES,
            remove_duplicates: false,
            tmp_dir: None,
        }
    }
}
