use super::run_format::{decode_frame_payload_len, FRAME_HEADER_LEN};
use super::traits::RecordCodec;
use crate::{Result, SortError};
use std::io::Read;

/// Streams records back out of a spill run, one frame at a time.
pub struct RunReader<R: Read> {
    source: R,
    frame_header: [u8; FRAME_HEADER_LEN],
    payload: Vec<u8>,
}

impl<R: Read> RunReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            frame_header: [0_u8; FRAME_HEADER_LEN],
            payload: Vec::new(),
        }
    }

    /// Decodes the next record, or `None` once the run is exhausted. A stream
    /// that ends partway through a frame is an error, not an EOF.
    pub fn read_next<C>(&mut self, codec: &C) -> Result<Option<C::Record>>
    where
        C: RecordCodec,
    {
        if !read_header_or_eof(&mut self.source, &mut self.frame_header)? {
            return Ok(None);
        }

        let payload_len = decode_frame_payload_len(self.frame_header.as_slice())?;
        self.payload.resize(payload_len, 0);
        self.source
            .read_exact(self.payload.as_mut_slice())
            .map_err(|error| {
                SortError::message(format!(
                    "failed reading encoded run bytes from source: {error}"
                ))
            })?;

        let record = codec.decode(self.payload.as_slice())?;
        Ok(Some(record))
    }
}

fn read_header_or_eof<R: Read>(source: &mut R, header: &mut [u8]) -> Result<bool> {
    let mut bytes_read = 0_usize;
    while bytes_read < header.len() {
        let count = source.read(&mut header[bytes_read..]).map_err(|error| {
            SortError::message(format!(
                "failed reading encoded run bytes from source: {error}"
            ))
        })?;
        if count == 0 {
            if bytes_read == 0 {
                return Ok(false);
            }
            return Err(SortError::message(
                "failed reading encoded run bytes from source: truncated run frame header"
                    .to_string(),
            ));
        }
        bytes_read = bytes_read.saturating_add(count);
    }
    Ok(true)
}
