use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Frame header: big-endian payload length (4 bytes).
pub const HEADER_SIZE: usize = 4;

/// Default maximum payload size: the largest length the header can express.
pub const DEFAULT_MAX_PAYLOAD: usize = u32::MAX as usize;

/// Encode a payload into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────────┬─────────────────┐
/// │ Length       │ Payload         │
/// │ (4B BE u32)  │ (Length bytes)  │
/// └──────────────┴─────────────────┘
/// ```
pub fn encode_frame(payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    let len = u32::try_from(payload.len()).map_err(|_| FrameError::PayloadTooLarge {
        size: payload.len(),
        max: DEFAULT_MAX_PAYLOAD,
    })?;
    dst.reserve(HEADER_SIZE + payload.len());
    dst.put_u32(len);
    dst.put_slice(payload);
    Ok(())
}

/// Decode a frame from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the frame bytes from the buffer.
pub fn decode_frame(src: &mut BytesMut, max_payload: usize) -> Result<Option<Bytes>> {
    if src.len() < HEADER_SIZE {
        return Ok(None); // Need more data
    }

    let payload_len = decode_header(&src[..HEADER_SIZE]);
    check_payload_len(payload_len, max_payload)?;

    let total = frame_len(payload_len, max_payload)?;
    if src.len() < total {
        return Ok(None); // Need more data
    }

    src.advance(HEADER_SIZE);
    Ok(Some(src.split_to(payload_len).freeze()))
}

/// Header plus payload length, or `PayloadTooLarge` if it overflows `usize`.
fn frame_len(payload_len: usize, max_payload: usize) -> Result<usize> {
    HEADER_SIZE
        .checked_add(payload_len)
        .ok_or(FrameError::PayloadTooLarge {
            size: payload_len,
            max: max_payload,
        })
}

pub(crate) fn decode_header(header: &[u8]) -> usize {
    let mut header = header;
    header.get_u32() as usize
}

pub(crate) fn check_payload_len(len: usize, max_payload: usize) -> Result<()> {
    if len > max_payload {
        return Err(FrameError::PayloadTooLarge {
            size: len,
            max: max_payload,
        });
    }
    Ok(())
}

/// Configuration for the frame codec.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum payload size in bytes. Default: `u32::MAX` (uncapped).
    pub max_payload_size: usize,
}

impl FrameConfig {
    /// Cap accepted and emitted payloads at `max_payload_size` bytes.
    pub fn with_max_payload_size(mut self, max_payload_size: usize) -> Self {
        self.max_payload_size = max_payload_size;
        self
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
        }
    }
}
