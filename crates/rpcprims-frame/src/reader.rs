use std::io::{ErrorKind, Read};

use bytes::{Bytes, BytesMut};
use tracing::trace;

use crate::codec::{check_payload_len, decode_header, FrameConfig, HEADER_SIZE};
use crate::error::{FrameError, Result};

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Reads complete frames from any `Read` stream.
///
/// Handles partial reads internally; callers always get complete frames.
/// The reader pulls exactly the bytes of one frame from the stream and
/// keeps nothing buffered between calls.
pub struct FrameReader<T> {
    inner: T,
    config: FrameConfig,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self { inner, config }
    }

    /// Read the next complete frame payload (blocking).
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when EOF is reached before
    /// the whole frame arrived, including EOF before the first header byte.
    pub fn read_frame(&mut self) -> Result<Bytes> {
        let mut header = [0u8; HEADER_SIZE];
        read_full(&mut self.inner, &mut header)?;

        let len = decode_header(&header);
        check_payload_len(len, self.config.max_payload_size)?;

        // Grow with the bytes that actually arrive; the header alone never
        // decides how much memory gets committed.
        let mut payload = BytesMut::with_capacity(len.min(READ_CHUNK_SIZE));
        while payload.len() < len {
            let filled = payload.len();
            let want = (len - filled).min(READ_CHUNK_SIZE);
            payload.resize(filled + want, 0);
            read_full(&mut self.inner, &mut payload[filled..])?;
        }

        trace!(size = len, "read frame");
        Ok(payload.freeze())
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update maximum payload size for subsequent frame decoding.
    pub fn set_max_payload_size(&mut self, max_payload_size: usize) {
        self.config.max_payload_size = max_payload_size;
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

/// Read one frame payload from `conn` with default configuration.
pub fn read_frame<R: Read>(conn: &mut R) -> Result<Bytes> {
    FrameReader::new(conn).read_frame()
}

fn read_full<R: Read>(inner: &mut R, buf: &mut [u8]) -> Result<()> {
    let mut filled = 0usize;
    while filled < buf.len() {
        match inner.read(&mut buf[filled..]) {
            Ok(0) => return Err(FrameError::ConnectionClosed),
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(FrameError::Io(err)),
        }
    }
    Ok(())
}
