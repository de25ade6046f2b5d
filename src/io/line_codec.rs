use rec_spill_sort::{RecordCodec, Result};

/// Spill codec for line records: the payload is the line's bytes, nothing
/// more.
pub struct LineCodec;

impl RecordCodec for LineCodec {
    type Record = Vec<u8>;

    fn encode(&self, record: &Vec<u8>, payload: &mut Vec<u8>) -> Result<()> {
        payload.extend_from_slice(record.as_slice());
        Ok(())
    }

    fn decode(&self, payload: &[u8]) -> Result<Vec<u8>> {
        Ok(payload.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codec_roundtrips_arbitrary_bytes() {
        let record: Vec<u8> = vec![0x00, 0xFF, b'\t', b'x'];
        let mut payload = Vec::new();
        LineCodec
            .encode(&record, &mut payload)
            .expect("encoding should succeed");
        assert_eq!(payload, record);

        let decoded = LineCodec
            .decode(payload.as_slice())
            .expect("decoding should succeed");
        assert_eq!(decoded, record);
    }

    #[test]
    fn empty_lines_roundtrip() {
        let mut payload = Vec::new();
        LineCodec
            .encode(&Vec::new(), &mut payload)
            .expect("encoding should succeed");
        assert!(payload.is_empty());
        assert!(LineCodec
            .decode(payload.as_slice())
            .expect("decoding should succeed")
            .is_empty());
    }
}
