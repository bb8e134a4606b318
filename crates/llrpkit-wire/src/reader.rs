use std::io::{ErrorKind, Read};

use bytes::{Bytes, BytesMut};
use tracing::trace;

use crate::error::{Result, WireError};
use crate::header::{WireConfig, HEADER_SIZE};

const INITIAL_BUFFER_CAPACITY: usize = 4 * 1024;
const READ_CHUNK_SIZE: usize = 4 * 1024;

/// Split the next complete message off the front of a buffer.
///
/// Returns `Ok(None)` if the buffer does not yet hold the full declared
/// length. On success the message bytes (header + body) are consumed from
/// the buffer.
pub fn split_message(src: &mut BytesMut, max_message_size: usize) -> Result<Option<Bytes>> {
    if src.len() < HEADER_SIZE {
        return Ok(None); // Need more data
    }

    let declared = u32::from_be_bytes([src[2], src[3], src[4], src[5]]) as usize;

    if declared < HEADER_SIZE {
        return Err(WireError::LengthMismatch {
            declared,
            actual: src.len(),
        });
    }
    if declared > max_message_size {
        return Err(WireError::PayloadTooLarge {
            size: declared,
            max: max_message_size,
        });
    }

    if src.len() < declared {
        return Ok(None); // Need more data
    }

    Ok(Some(src.split_to(declared).freeze()))
}

/// Reads complete messages from any `Read` stream.
///
/// Handles partial reads internally — callers always get the exact bytes of
/// one message, ready for registry dispatch.
pub struct MessageReader<T> {
    inner: T,
    buf: BytesMut,
    config: WireConfig,
}

impl<T: Read> MessageReader<T> {
    /// Create a new message reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, WireConfig::default())
    }

    /// Create a new message reader with explicit configuration.
    pub fn with_config(inner: T, config: WireConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Read the next complete message (blocking).
    ///
    /// Returns `Err(WireError::ConnectionClosed)` when EOF is reached.
    pub fn read_message(&mut self) -> Result<Bytes> {
        loop {
            if let Some(message) = split_message(&mut self.buf, self.config.max_message_size)? {
                trace!(len = message.len(), "read complete message");
                return Ok(message);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(WireError::Io(err)),
            };

            if read == 0 {
                return Err(WireError::ConnectionClosed);
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
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

    /// Current reader configuration.
    pub fn config(&self) -> &WireConfig {
        &self.config
    }
}
