use crate::{Result, SortError};

/// Identifies spill run frames written by this crate.
pub const RUN_MAGIC: [u8; 4] = *b"RSRT";
/// Bump when the frame layout changes.
pub const RUN_FORMAT_VERSION: u16 = 1;

pub const FRAME_HEADER_LEN: usize = RUN_MAGIC.len() + VERSION_LEN + PAYLOAD_LEN_LEN;

const VERSION_LEN: usize = std::mem::size_of::<u16>();
const PAYLOAD_LEN_LEN: usize = std::mem::size_of::<u64>();

const VERSION_OFFSET: usize = RUN_MAGIC.len();
const PAYLOAD_LEN_OFFSET: usize = VERSION_OFFSET + VERSION_LEN;

/// Encodes one record payload as a length-prefixed frame, replacing the
/// contents of `encoded`.
pub fn encode_frame_into(payload: &[u8], encoded: &mut Vec<u8>) -> Result<()> {
    let payload_len = u64::try_from(payload.len())?;

    encoded.clear();
    encoded.reserve(FRAME_HEADER_LEN.saturating_add(payload.len()));
    encoded.extend_from_slice(&RUN_MAGIC);
    encoded.extend_from_slice(&RUN_FORMAT_VERSION.to_be_bytes());
    encoded.extend_from_slice(&payload_len.to_be_bytes());
    encoded.extend_from_slice(payload);
    Ok(())
}

/// Validates one frame header and returns the payload length that follows it.
pub fn decode_frame_payload_len(frame_header: &[u8]) -> Result<usize> {
    if frame_header.len() < FRAME_HEADER_LEN {
        return Err(SortError::message(format!(
            "run frame header too short: {} bytes, expected {}",
            frame_header.len(),
            FRAME_HEADER_LEN
        )));
    }
    if frame_header[..RUN_MAGIC.len()] != RUN_MAGIC {
        return Err(SortError::message(
            "run frame magic mismatch; file is not a spill run".to_string(),
        ));
    }

    let mut version_bytes = [0_u8; VERSION_LEN];
    version_bytes.copy_from_slice(&frame_header[VERSION_OFFSET..VERSION_OFFSET + VERSION_LEN]);
    let version = u16::from_be_bytes(version_bytes);
    if version != RUN_FORMAT_VERSION {
        return Err(SortError::message(format!(
            "unsupported run format version {version}, expected {RUN_FORMAT_VERSION}"
        )));
    }

    let mut payload_len_bytes = [0_u8; PAYLOAD_LEN_LEN];
    payload_len_bytes
        .copy_from_slice(&frame_header[PAYLOAD_LEN_OFFSET..PAYLOAD_LEN_OFFSET + PAYLOAD_LEN_LEN]);
    let payload_len = usize::try_from(u64::from_be_bytes(payload_len_bytes))?;
    Ok(payload_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_then_decode_recovers_payload_len() {
        let payload = b"record bytes";
        let mut encoded = Vec::new();
        encode_frame_into(payload, &mut encoded).expect("encoding should succeed");

        assert_eq!(encoded.len(), FRAME_HEADER_LEN + payload.len());
        let payload_len = decode_frame_payload_len(&encoded[..FRAME_HEADER_LEN])
            .expect("header should decode");
        assert_eq!(payload_len, payload.len());
        assert_eq!(&encoded[FRAME_HEADER_LEN..], payload);
    }

    #[test]
    fn encode_replaces_previous_buffer_contents() {
        let mut encoded = vec![0xAB_u8; 64];
        encode_frame_into(b"x", &mut encoded).expect("encoding should succeed");
        assert_eq!(encoded.len(), FRAME_HEADER_LEN + 1);
        assert_eq!(&encoded[..RUN_MAGIC.len()], &RUN_MAGIC);
    }

    #[test]
    fn decode_rejects_short_header() {
        let error = decode_frame_payload_len(&[0_u8; FRAME_HEADER_LEN - 1])
            .expect_err("short header should fail");
        assert!(error.to_string().contains("too short"));
    }

    #[test]
    fn decode_rejects_corrupt_magic() {
        let mut encoded = Vec::new();
        encode_frame_into(b"payload", &mut encoded).expect("encoding should succeed");
        encoded[0] ^= 0xFF;
        let error = decode_frame_payload_len(&encoded[..FRAME_HEADER_LEN])
            .expect_err("corrupt magic should fail");
        assert!(error.to_string().contains("magic mismatch"));
    }

    #[test]
    fn decode_rejects_unknown_version() {
        let mut encoded = Vec::new();
        encode_frame_into(b"payload", &mut encoded).expect("encoding should succeed");
        encoded[VERSION_OFFSET] = 0xFF;
        let error = decode_frame_payload_len(&encoded[..FRAME_HEADER_LEN])
            .expect_err("unknown version should fail");
        assert!(error.to_string().contains("version"));
    }
}
