use super::run_reader::RunReader;
use super::run_writer::RunWriter;
use super::traits::RecordCodec;
use crate::{Result, SortError};
use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// One sorted run spilled to temporary storage.
#[derive(Clone, Debug)]
pub struct Run {
    pub path: PathBuf,
    pub run_id: u64,
}

pub fn run_path(temp_dir: &Path, run_id: u64) -> PathBuf {
    temp_dir.join(format!("run_{run_id:012}.spill"))
}

pub fn create_sort_temp_dir(tmp_root: Option<&Path>) -> Result<tempfile::TempDir> {
    match tmp_root {
        Some(root) => tempfile::Builder::new()
            .prefix("rec-sort-")
            .tempdir_in(root)
            .map_err(|error| {
                SortError::message(format!(
                    "Failed to create sort temp directory under {}: {}",
                    root.display(),
                    error
                ))
            }),
        None => tempfile::Builder::new()
            .prefix("rec-sort-")
            .tempdir()
            .map_err(|error| {
                SortError::message(format!("Failed to create sort temp directory: {error}"))
            }),
    }
}

/// Read handle over one run. `close` drops the underlying file and is safe to
/// call more than once; a closed cursor reads as exhausted.
pub struct RunCursor {
    run: Run,
    reader: Option<RunReader<BufReader<fs::File>>>,
}

impl RunCursor {
    pub fn open(run: &Run) -> Result<Self> {
        let run_file = fs::File::open(run.path.as_path()).map_err(|error| {
            SortError::message(format!(
                "Failed to open spill run {}: {}",
                run.path.display(),
                error
            ))
        })?;
        Ok(Self {
            run: run.clone(),
            reader: Some(RunReader::new(BufReader::new(run_file))),
        })
    }

    pub fn next_record<C>(&mut self, codec: &C) -> Result<Option<C::Record>>
    where
        C: RecordCodec,
    {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(None);
        };
        reader.read_next(codec).map_err(|error| {
            SortError::message(format!(
                "Failed to read spill run {}: {}",
                self.run.path.display(),
                error
            ))
        })
    }

    pub fn close(&mut self) -> Result<()> {
        self.reader = None;
        Ok(())
    }
}

pub fn remove_run_file(path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(|error| {
        SortError::message(format!(
            "Failed to remove spill run {}: {}",
            path.display(),
            error
        ))
    })
}

pub fn create_run_writer(
    path: &Path,
    create_error_message: &str,
) -> Result<RunWriter<BufWriter<fs::File>>> {
    let run_file = fs::File::create(path).map_err(|error| {
        SortError::message(format!(
            "{create_error_message} {}: {}",
            path.display(),
            error
        ))
    })?;
    Ok(RunWriter::new(BufWriter::new(run_file)))
}

pub fn finish_run_writer(
    writer: RunWriter<BufWriter<fs::File>>,
    path: &Path,
    finalize_error_message: &str,
) -> Result<()> {
    writer.finish().map_err(|error| {
        SortError::message(format!(
            "{finalize_error_message} {}: {}",
            path.display(),
            error
        ))
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_path_zero_pads_run_ids() {
        let path = run_path(Path::new("/tmp/sort"), 7);
        assert_eq!(path, Path::new("/tmp/sort/run_000000000007.spill"));
    }

    #[test]
    fn remove_run_file_error_includes_cleanup_path_context() {
        let temp_dir =
            tempfile::TempDir::new().expect("temporary directory for cleanup test should exist");
        let missing_path = temp_dir.path().join("missing.spill");
        let error = remove_run_file(missing_path.as_path())
            .expect_err("removing a missing spill path should fail");
        let message = error.to_string();
        assert!(
            message.contains("Failed to remove spill run"),
            "cleanup error should include contextual prefix: {message}"
        );
        assert!(
            message.contains(missing_path.to_string_lossy().as_ref()),
            "cleanup error should include failing path: {message}"
        );
    }

    #[test]
    fn create_sort_temp_dir_honors_requested_parent() {
        let parent = tempfile::TempDir::new().expect("parent directory should exist");
        let temp_dir = create_sort_temp_dir(Some(parent.path()))
            .expect("temp directory should be created under parent");
        assert!(temp_dir.path().starts_with(parent.path()));
        let name = temp_dir
            .path()
            .file_name()
            .expect("temp directory should have a name")
            .to_string_lossy()
            .into_owned();
        assert!(name.starts_with("rec-sort-"), "unexpected name: {name}");
    }

    #[test]
    fn create_sort_temp_dir_rejects_unusable_parent() {
        let parent = tempfile::TempDir::new().expect("parent directory should exist");
        let missing_parent = parent.path().join("does-not-exist");
        let error = create_sort_temp_dir(Some(missing_parent.as_path()))
            .expect_err("missing parent should fail");
        assert!(error.to_string().contains("Failed to create sort temp directory"));
    }

    #[test]
    fn closed_cursor_reads_as_exhausted() {
        struct NoopCodec;

        impl RecordCodec for NoopCodec {
            type Record = Vec<u8>;

            fn encode(&self, record: &Vec<u8>, payload: &mut Vec<u8>) -> Result<()> {
                payload.extend_from_slice(record);
                Ok(())
            }

            fn decode(&self, payload: &[u8]) -> Result<Vec<u8>> {
                Ok(payload.to_vec())
            }
        }

        let temp_dir = tempfile::TempDir::new().expect("temp directory should exist");
        let path = run_path(temp_dir.path(), 0);
        let mut writer =
            create_run_writer(path.as_path(), "Failed to create spill run").expect("run should be creatable");
        writer
            .write_record(&NoopCodec, &b"record".to_vec())
            .expect("record should spill");
        finish_run_writer(writer, path.as_path(), "Failed to finalize spill run")
            .expect("run should finalize");

        let run = Run { path, run_id: 0 };
        let mut cursor = RunCursor::open(&run).expect("cursor should open");
        cursor.close().expect("first close should succeed");
        cursor.close().expect("second close should also succeed");
        assert!(cursor
            .next_record(&NoopCodec)
            .expect("closed cursor should read cleanly")
            .is_none());
    }
}
