use super::run_format::encode_frame_into;
use super::traits::RecordCodec;
use crate::{Result, SortError};
use std::io::Write;

/// Streams encoded records into a spill run sink, one frame per record.
///
/// Frames land in the order `write_record` is called; the sorter writes each
/// run's records in key order so readers can merge runs without seeking.
pub struct RunWriter<W: Write> {
    sink: W,
    payload_buffer: Vec<u8>,
    frame_buffer: Vec<u8>,
}

impl<W: Write> RunWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            payload_buffer: Vec::new(),
            frame_buffer: Vec::new(),
        }
    }

    pub fn write_record<C>(&mut self, codec: &C, record: &C::Record) -> Result<()>
    where
        C: RecordCodec,
    {
        self.payload_buffer.clear();
        codec.encode(record, &mut self.payload_buffer)?;
        encode_frame_into(self.payload_buffer.as_slice(), &mut self.frame_buffer)?;
        self.sink
            .write_all(self.frame_buffer.as_slice())
            .map_err(|error| {
                SortError::message(format!("failed writing encoded record to run sink: {error}"))
            })?;
        Ok(())
    }

    /// Flushes buffered frames and hands the sink back to the caller.
    pub fn finish(mut self) -> Result<W> {
        self.sink
            .flush()
            .map_err(|error| SortError::message(format!("failed flushing run sink: {error}")))?;
        Ok(self.sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::run_format::{FRAME_HEADER_LEN, RUN_MAGIC};
    use std::io;

    struct ByteCodec;

    impl RecordCodec for ByteCodec {
        type Record = Vec<u8>;

        fn encode(&self, record: &Vec<u8>, payload: &mut Vec<u8>) -> Result<()> {
            payload.extend_from_slice(record);
            Ok(())
        }

        fn decode(&self, payload: &[u8]) -> Result<Vec<u8>> {
            Ok(payload.to_vec())
        }
    }

    #[derive(Debug, Default)]
    struct AlwaysFailSink;

    impl Write for AlwaysFailSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("test sink write failure"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::other("test sink flush failure"))
        }
    }

    #[test]
    fn write_record_emits_one_frame_per_record() {
        let mut writer = RunWriter::new(Vec::new());
        writer
            .write_record(&ByteCodec, &b"alpha".to_vec())
            .expect("first write should succeed");
        writer
            .write_record(&ByteCodec, &b"be".to_vec())
            .expect("second write should succeed");

        let sink = writer.finish().expect("finish should flush");
        assert_eq!(sink.len(), 2 * FRAME_HEADER_LEN + 5 + 2);
        assert_eq!(&sink[..RUN_MAGIC.len()], &RUN_MAGIC);
        assert_eq!(&sink[FRAME_HEADER_LEN..FRAME_HEADER_LEN + 5], b"alpha");
    }

    #[test]
    fn write_record_surfaces_sink_errors() {
        let mut writer = RunWriter::new(AlwaysFailSink);
        let error = writer
            .write_record(&ByteCodec, &b"alpha".to_vec())
            .expect_err("write should fail when sink write fails");
        assert!(error.to_string().contains("test sink write failure"));
    }

    #[test]
    fn finish_surfaces_flush_errors() {
        let writer = RunWriter::new(AlwaysFailSink);
        let error = writer
            .finish()
            .expect_err("finish should fail when sink flush fails");
        assert!(error.to_string().contains("test sink flush failure"));
    }
}
