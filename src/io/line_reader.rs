use crate::utils::util::Result;
use rec_spill_sort::{RecordSource, SortError};
use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

/// Streams newline-delimited records as raw bytes.
///
/// Each record is one line without its trailing `\n`; bytes are otherwise
/// untouched, so carriage returns and non-UTF-8 content pass through. A
/// final line with no newline still counts as a record.
pub struct LineReader<R: Read> {
    reader: BufReader<R>,
    line_number: usize,
}

impl LineReader<File> {
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|error| {
            crate::sortx_error!("Failed to open input file {}: {}", path.display(), error)
        })?;
        Ok(Self::new(file))
    }
}

impl<R: Read> LineReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            reader: BufReader::new(source),
            line_number: 0,
        }
    }

    fn next_line(&mut self) -> rec_spill_sort::Result<Option<Vec<u8>>> {
        let mut line = Vec::new();
        let count = self.reader.read_until(b'\n', &mut line).map_err(|error| {
            SortError::message(format!(
                "Error reading input line {}: {}",
                self.line_number + 1,
                error
            ))
        })?;
        if count == 0 {
            return Ok(None);
        }
        self.line_number += 1;
        if line.last() == Some(&b'\n') {
            line.pop();
        }
        Ok(Some(line))
    }
}

impl<R: Read> RecordSource for LineReader<R> {
    type Record = Vec<u8>;

    fn next_record(&mut self) -> rec_spill_sort::Result<Option<Vec<u8>>> {
        self.next_line()
    }
}
