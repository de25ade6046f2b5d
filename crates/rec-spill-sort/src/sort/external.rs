use super::config::SortConfig;
use super::memory::sort_in_memory;
use super::merge::merge_runs_into_sink;
use super::runs::{
    create_run_writer, create_sort_temp_dir, finish_run_writer, remove_run_file, run_path, Run,
    RunCursor,
};
use super::select::{select_engine, EngineKind};
use super::traits::{RecordCodec, RecordSource};
use crate::{Result, SortError};
use std::cmp::Ordering;
use std::path::Path;

const LOG_PREFIX: &str = "rec-spill-sort";

#[cfg(feature = "logging")]
macro_rules! engine_debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}

#[cfg(not(feature = "logging"))]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        if false {
            let _ = format_args!($($arg)*);
        }
    }};
}

#[cfg(feature = "logging")]
macro_rules! engine_warn {
    ($($arg:tt)*) => {
        log::warn!($($arg)*)
    };
}

#[cfg(not(feature = "logging"))]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        if false {
            let _ = format_args!($($arg)*);
        }
    }};
}

/// Outcome summary of a completed sort.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SortReport {
    /// Path the job actually took.
    pub engine: EngineKind,
    pub records_read: u64,
    pub records_emitted: u64,
    /// Spill runs written; always 0 on the in-memory path.
    pub runs_written: usize,
}

/// One sort invocation: a validated config, a codec for spill storage, and
/// the comparator that defines the output order.
///
/// `execute` routes between the in-memory and external paths from the
/// caller's input-size estimate; both paths produce identical output for the
/// same input and comparator. The external path spills `run_size`-record
/// sorted runs into a temporary directory and merges them back, so memory
/// use is bounded by the run size regardless of input length. Run files and
/// the temporary directory are removed before `execute` returns, whether the
/// sort succeeded or not.
pub struct SortJob<C, Cmp>
where
    C: RecordCodec,
    Cmp: Fn(&C::Record, &C::Record) -> Ordering,
{
    config: SortConfig,
    codec: C,
    compare: Cmp,
}

impl<C, Cmp> SortJob<C, Cmp>
where
    C: RecordCodec,
    Cmp: Fn(&C::Record, &C::Record) -> Ordering,
{
    pub fn new(config: SortConfig, codec: C, compare: Cmp) -> Result<Self> {
        let config = SortConfig::new(
            config.run_size,
            config.in_memory_threshold_bytes,
            config.remove_duplicates,
            config.tmp_dir.clone(),
        )?;
        Ok(Self {
            config,
            codec,
            compare,
        })
    }

    pub fn execute<S, F>(
        self,
        source: &mut S,
        emit: F,
        estimated_input_bytes: u64,
    ) -> Result<SortReport>
    where
        S: RecordSource<Record = C::Record>,
        F: FnMut(&C::Record) -> Result<()>,
    {
        match select_engine(estimated_input_bytes, self.config.in_memory_threshold_bytes) {
            EngineKind::InMemory => self.execute_in_memory(source, emit),
            EngineKind::External => self.execute_external(source, emit),
        }
    }

    /// Drains the source into memory, sorts once, and emits. Touches no
    /// temporary storage.
    pub fn execute_in_memory<S, F>(self, source: &mut S, mut emit: F) -> Result<SortReport>
    where
        S: RecordSource<Record = C::Record>,
        F: FnMut(&C::Record) -> Result<()>,
    {
        let mut records = Vec::new();
        while let Some(record) = source.next_record()? {
            records.push(record);
        }
        let records_read = u64::try_from(records.len())?;
        engine_debug!(
            "{LOG_PREFIX}: sorting {} records in memory (dedup={})",
            records.len(),
            self.config.remove_duplicates
        );

        sort_in_memory(&mut records, &self.compare, self.config.remove_duplicates);
        let mut records_emitted = 0_u64;
        for record in &records {
            emit(record)?;
            records_emitted = records_emitted.saturating_add(1);
        }
        Ok(SortReport {
            engine: EngineKind::InMemory,
            records_read,
            records_emitted,
            runs_written: 0,
        })
    }

    pub fn execute_external<S, F>(self, source: &mut S, emit: F) -> Result<SortReport>
    where
        S: RecordSource<Record = C::Record>,
        F: FnMut(&C::Record) -> Result<()>,
    {
        let temp_dir = create_sort_temp_dir(self.config.tmp_dir.as_deref())?;
        engine_debug!(
            "{LOG_PREFIX}: external sort starting, run_size={} dedup={} temp_dir={}",
            self.config.run_size,
            self.config.remove_duplicates,
            temp_dir.path().display()
        );

        let mut runs: Vec<Run> = Vec::new();
        let mut cursors: Vec<RunCursor> = Vec::new();
        let mut report = SortReport {
            engine: EngineKind::External,
            records_read: 0,
            records_emitted: 0,
            runs_written: 0,
        };

        let sort_result = self.split_and_merge(
            source,
            emit,
            temp_dir.path(),
            &mut runs,
            &mut cursors,
            &mut report,
        );
        let failures = release_sort_artifacts(&mut cursors, runs.as_slice(), temp_dir);

        match sort_result {
            Err(primary) => Err(SortError::with_cleanup(primary, failures.into_all())),
            Ok(()) if !failures.close.is_empty() => Err(SortError::Cleanup {
                failures: failures.into_all(),
            }),
            Ok(()) => {
                for failure in &failures.remove {
                    engine_warn!("{LOG_PREFIX}: best-effort spill cleanup failed: {failure}");
                }
                Ok(report)
            }
        }
    }

    fn split_and_merge<S, F>(
        &self,
        source: &mut S,
        emit: F,
        temp_path: &Path,
        runs: &mut Vec<Run>,
        cursors: &mut Vec<RunCursor>,
        report: &mut SortReport,
    ) -> Result<()>
    where
        S: RecordSource<Record = C::Record>,
        F: FnMut(&C::Record) -> Result<()>,
    {
        report.records_read = self.write_runs(source, temp_path, runs)?;
        report.runs_written = runs.len();
        if runs.is_empty() {
            engine_debug!("{LOG_PREFIX}: empty input produced no spill runs, nothing to merge");
            return Ok(());
        }

        for run in runs.iter() {
            cursors.push(RunCursor::open(run)?);
        }
        engine_debug!("{LOG_PREFIX}: merging {} spill runs", cursors.len());
        report.records_emitted = merge_runs_into_sink(
            cursors.as_mut_slice(),
            &self.codec,
            &self.compare,
            self.config.remove_duplicates,
            emit,
        )?;
        Ok(())
    }

    fn write_runs<S>(&self, source: &mut S, temp_path: &Path, runs: &mut Vec<Run>) -> Result<u64>
    where
        S: RecordSource<Record = C::Record>,
    {
        let mut batch: Vec<C::Record> = Vec::with_capacity(self.config.run_size);
        let mut records_read = 0_u64;
        let mut next_run_id = 0_u64;

        while let Some(record) = source.next_record()? {
            records_read = records_read.saturating_add(1);
            batch.push(record);
            if batch.len() >= self.config.run_size {
                self.spill_batch(&mut batch, temp_path, &mut next_run_id, runs)?;
            }
        }
        if !batch.is_empty() {
            self.spill_batch(&mut batch, temp_path, &mut next_run_id, runs)?;
        }
        Ok(records_read)
    }

    // Runs spill sorted but never deduped; duplicates collapse at merge time
    // so equal records from different runs fold into one representative.
    fn spill_batch(
        &self,
        batch: &mut Vec<C::Record>,
        temp_path: &Path,
        next_run_id: &mut u64,
        runs: &mut Vec<Run>,
    ) -> Result<()> {
        let run_id = *next_run_id;
        *next_run_id = next_run_id.saturating_add(1);
        let path = run_path(temp_path, run_id);

        sort_in_memory(batch, &self.compare, false);
        engine_debug!(
            "{LOG_PREFIX}: spilling run {} with {} records to {}",
            run_id,
            batch.len(),
            path.display()
        );

        let mut writer = create_run_writer(path.as_path(), "Failed to create spill run")?;
        for record in batch.iter() {
            writer.write_record(&self.codec, record)?;
        }
        finish_run_writer(writer, path.as_path(), "Failed to finalize spill run")?;

        runs.push(Run { path, run_id });
        batch.clear();
        Ok(())
    }
}

struct CleanupFailures {
    close: Vec<SortError>,
    remove: Vec<SortError>,
}

impl CleanupFailures {
    fn into_all(self) -> Vec<SortError> {
        let mut all = self.close;
        all.extend(self.remove);
        all
    }
}

/// Releases every spill artifact a sort created, regardless of how far it
/// got. Each cursor closes and each run file unlinks independently; one
/// failure never skips the remaining artifacts.
fn release_sort_artifacts(
    cursors: &mut Vec<RunCursor>,
    runs: &[Run],
    temp_dir: tempfile::TempDir,
) -> CleanupFailures {
    let mut failures = CleanupFailures {
        close: Vec::new(),
        remove: Vec::new(),
    };

    // Cursors first: the files must not be unlinked out from under an open
    // reader.
    for cursor in cursors.iter_mut() {
        if let Err(error) = cursor.close() {
            failures.close.push(error);
        }
    }
    for run in runs {
        if let Err(error) = remove_run_file(run.path.as_path()) {
            failures.remove.push(error);
        }
    }
    if let Err(error) = temp_dir.close() {
        failures.remove.push(SortError::message(format!(
            "Failed to remove sort temp directory: {error}"
        )));
    }
    failures
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_prefix_matches_crate_identity() {
        assert_eq!(LOG_PREFIX, "rec-spill-sort");
    }

    #[test]
    fn logging_feature_enabled_by_default() {
        assert!(cfg!(feature = "logging"));
    }
}
