use std::any::Any;
use std::fmt;

use bytes::{Bytes, BytesMut};

use crate::error::{Result, WireError};
use crate::header::{self, Header, DEFAULT_VERSION, HEADER_SIZE};

/// Who originates a message variant.
///
/// Carried as a static classification on each variant instead of being
/// recovered by runtime type inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Constructed locally and sent to the reader.
    ClientOriginated,
    /// Produced by the reader; constructed only via registry dispatch.
    ReaderOriginated,
}

/// Header state shared by every message variant.
///
/// The type code is deliberately absent: it is fixed per variant and exposed
/// through [`Message::type_code`], not per-instance data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope {
    /// Protocol version (3 bits). Defaults to 1; overwritten from the wire
    /// on extract.
    pub version: u8,
    /// Reserved bits as received. Always encoded as zero.
    pub reserved: u8,
    /// Correlation identifier.
    pub message_id: u32,
}

impl Envelope {
    /// Create an envelope with the default protocol version.
    pub fn new(message_id: u32) -> Self {
        Self {
            version: DEFAULT_VERSION,
            reserved: 0,
            message_id,
        }
    }
}

/// The contract shared by every message variant: a fixed type code, a
/// direction, an [`Envelope`], and a body with a known wire layout.
///
/// `render` and `extract` are provided; variants supply only their body
/// encode/decode. Variants are plain data and `Send + Sync`, so shared
/// registries/trackers holding them can be wrapped in a `Mutex` by callers
/// that need concurrent access.
pub trait Message: fmt::Debug + Send + Sync + Any {
    /// This variant's fixed 10-bit type code.
    fn type_code(&self) -> u16;

    /// Whether this variant is client- or reader-originated.
    fn direction(&self) -> Direction;

    /// Shared header state.
    fn envelope(&self) -> &Envelope;

    /// Mutable header state, used by `extract` to capture wire fields.
    fn envelope_mut(&mut self) -> &mut Envelope;

    /// Encoded body size in bytes.
    fn body_len(&self) -> usize;

    /// Append the body encoding to `dst`. Must write exactly `body_len`
    /// bytes.
    fn encode_body(&self, dst: &mut BytesMut);

    /// Decode the body from exactly the bytes the header declared for it.
    fn decode_body(&mut self, body: &[u8]) -> Result<()>;

    /// Upcast for downcasting to the concrete variant.
    fn as_any(&self) -> &dyn Any;

    /// Correlation identifier from the envelope.
    fn message_id(&self) -> u32 {
        self.envelope().message_id
    }

    /// Protocol version from the envelope.
    fn version(&self) -> u8 {
        self.envelope().version
    }

    /// Total encoded size of this message (header + body).
    fn wire_size(&self) -> usize {
        HEADER_SIZE + self.body_len()
    }

    /// Encode the full message: header with computed length, then body.
    ///
    /// Produces bytes only; marking the message as sent is the transport
    /// collaborator's job via the correlation tracker.
    fn render(&self) -> Result<Bytes> {
        let total = HEADER_SIZE + self.body_len();
        if total > u32::MAX as usize {
            return Err(WireError::PayloadTooLarge {
                size: total,
                max: u32::MAX as usize,
            });
        }

        let envelope = self.envelope();
        let mut buf = BytesMut::with_capacity(total);
        header::encode_header(
            &Header {
                reserved: 0,
                version: envelope.version,
                type_code: self.type_code(),
                length: total as u32,
                message_id: envelope.message_id,
            },
            &mut buf,
        )?;
        self.encode_body(&mut buf);
        debug_assert_eq!(buf.len(), total);

        Ok(buf.freeze())
    }

    /// Decode this message from the front of `payload`, returning the bytes
    /// after its declared length.
    ///
    /// The remainder return supports pulling multiple concatenated messages
    /// out of one buffer. Fails with `LengthMismatch` if the declared length
    /// is shorter than a header or longer than the buffer, and with
    /// `TypeMismatch` if the type code on the wire is not this variant's
    /// (a self-check; dispatch to the right variant happens in the registry).
    fn extract<'a>(&mut self, payload: &'a [u8]) -> Result<&'a [u8]> {
        let (decoded, _) = header::decode_header(payload)?;

        let declared = decoded.length as usize;
        if declared < HEADER_SIZE || declared > payload.len() {
            return Err(WireError::LengthMismatch {
                declared,
                actual: payload.len(),
            });
        }

        if decoded.type_code != self.type_code() {
            return Err(WireError::TypeMismatch {
                expected: self.type_code(),
                actual: decoded.type_code,
            });
        }

        let envelope = self.envelope_mut();
        envelope.version = decoded.version;
        envelope.reserved = decoded.reserved;
        envelope.message_id = decoded.message_id;

        self.decode_body(&payload[HEADER_SIZE..declared])?;

        Ok(&payload[declared..])
    }
}

/// Check that a body slice has exactly the size a variant's layout requires.
///
/// The reported mismatch is in whole-message terms, matching what the header
/// declared against the variant's true wire size.
pub fn check_body_len(body: &[u8], expected: usize) -> Result<()> {
    if body.len() != expected {
        return Err(WireError::LengthMismatch {
            declared: HEADER_SIZE + body.len(),
            actual: HEADER_SIZE + expected,
        });
    }
    Ok(())
}
