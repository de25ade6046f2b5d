use crate::utils::util::Result;
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

/// Writes records back out as newline-terminated lines, to a file or to
/// standard output.
pub struct LineWriter {
    sink: BufWriter<Box<dyn Write>>,
}

impl LineWriter {
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|error| {
            crate::sortx_error!("Failed to create output file {}: {}", path.display(), error)
        })?;
        Ok(Self::new(Box::new(file)))
    }

    pub fn from_stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    fn new(sink: Box<dyn Write>) -> Self {
        Self {
            sink: BufWriter::new(sink),
        }
    }

    pub fn write_record(&mut self, record: &[u8]) -> io::Result<()> {
        self.sink.write_all(record)?;
        self.sink.write_all(b"\n")?;
        Ok(())
    }

    pub fn finish(mut self) -> io::Result<()> {
        self.sink.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn writes_newline_terminated_records() {
        let temp_dir = tempfile::TempDir::new().expect("temp directory should exist");
        let path = temp_dir.path().join("out.txt");
        let mut writer = LineWriter::from_path(path.as_path()).expect("writer should open");
        writer.write_record(b"alpha").expect("record should write");
        writer.write_record(b"").expect("empty record should write");
        writer.write_record(b"beta").expect("record should write");
        writer.finish().expect("writer should flush");

        let written = fs::read(path.as_path()).expect("output should be readable");
        assert_eq!(written, b"alpha\n\nbeta\n");
    }

    #[test]
    fn from_path_rejects_unwritable_targets() {
        let temp_dir = tempfile::TempDir::new().expect("temp directory should exist");
        let path = temp_dir.path().join("no-such-dir").join("out.txt");
        let error = LineWriter::from_path(path.as_path())
            .map(|_| ())
            .expect_err("missing parent directory should fail");
        assert!(error.to_string().contains("Failed to create output file"));
    }
}
