use bytes::{BufMut, BytesMut};

use crate::error::{Result, WireError};

/// Message header: type field (2) + length (4) + message id (4) = 10 bytes.
pub const HEADER_SIZE: usize = 10;

/// Protocol version encoded by default.
pub const DEFAULT_VERSION: u8 = 1;

/// Default maximum message size accepted by the streamed reader: 64 KiB.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 64 * 1024;

const TYPE_CODE_MASK: u16 = 0x3FF;
const SUBFIELD_MASK: u16 = 0x7;
const VERSION_SHIFT: u16 = 10;
const RESERVED_SHIFT: u16 = 13;

/// Decoded message header fields.
///
/// `length` counts the full encoded message: header plus body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Reserved bits. Zero on encode; captured as received on decode.
    pub reserved: u8,
    /// Protocol version (3 bits).
    pub version: u8,
    /// Message type code (10 bits).
    pub type_code: u16,
    /// Total message length in bytes, header included.
    pub length: u32,
    /// Correlation identifier.
    pub message_id: u32,
}

/// Pack the 16-bit type field: `reserved << 13 | version << 10 | type_code`.
///
/// Sub-fields that do not fit their bit width are rejected rather than
/// allowed to corrupt adjacent bits.
pub fn pack_type_field(reserved: u8, version: u8, type_code: u16) -> Result<u16> {
    if u16::from(reserved) > SUBFIELD_MASK {
        return Err(WireError::FieldOutOfRange {
            field: "reserved",
            value: reserved.into(),
            max: SUBFIELD_MASK,
        });
    }
    if u16::from(version) > SUBFIELD_MASK {
        return Err(WireError::FieldOutOfRange {
            field: "version",
            value: version.into(),
            max: SUBFIELD_MASK,
        });
    }
    if type_code > TYPE_CODE_MASK {
        return Err(WireError::FieldOutOfRange {
            field: "type_code",
            value: type_code,
            max: TYPE_CODE_MASK,
        });
    }

    Ok(u16::from(reserved) << RESERVED_SHIFT | u16::from(version) << VERSION_SHIFT | type_code)
}

/// Unpack the 16-bit type field into `(reserved, version, type_code)`.
pub fn unpack_type_field(value: u16) -> (u8, u8, u16) {
    let reserved = (value >> RESERVED_SHIFT & SUBFIELD_MASK) as u8;
    let version = (value >> VERSION_SHIFT & SUBFIELD_MASK) as u8;
    let type_code = value & TYPE_CODE_MASK;
    (reserved, version, type_code)
}

/// Encode a header into the wire format.
///
/// Wire format (big-endian):
/// ```text
/// ┌──────────────────────────────┬─────────────┬─────────────────┐
/// │ rsvd(3) | ver(3) | type(10)  │ Length (4B) │ Message ID (4B) │
/// └──────────────────────────────┴─────────────┴─────────────────┘
/// ```
pub fn encode_header(header: &Header, dst: &mut BytesMut) -> Result<()> {
    let type_field = pack_type_field(header.reserved, header.version, header.type_code)?;
    dst.reserve(HEADER_SIZE);
    dst.put_u16(type_field);
    dst.put_u32(header.length);
    dst.put_u32(header.message_id);
    Ok(())
}

/// Decode a header from a buffer.
///
/// Returns the parsed header and the bytes following it. The declared
/// `length` is not checked against the buffer here; that is the envelope's
/// job since it knows how much of the buffer belongs to one message.
pub fn decode_header(src: &[u8]) -> Result<(Header, &[u8])> {
    if src.len() < HEADER_SIZE {
        return Err(WireError::MalformedHeader {
            available: src.len(),
        });
    }

    let type_field = u16::from_be_bytes([src[0], src[1]]);
    let (reserved, version, type_code) = unpack_type_field(type_field);
    let length = u32::from_be_bytes([src[2], src[3], src[4], src[5]]);
    let message_id = u32::from_be_bytes([src[6], src[7], src[8], src[9]]);

    Ok((
        Header {
            reserved,
            version,
            type_code,
            length,
            message_id,
        },
        &src[HEADER_SIZE..],
    ))
}

/// Peek the type code from the first two bytes without consuming anything.
///
/// Lets dispatch pick the variant before committing to a full decode.
pub fn peek_type_code(src: &[u8]) -> Result<u16> {
    if src.len() < 2 {
        return Err(WireError::MalformedHeader {
            available: src.len(),
        });
    }
    let type_field = u16::from_be_bytes([src[0], src[1]]);
    Ok(type_field & TYPE_CODE_MASK)
}

/// Configuration for the wire codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireConfig {
    /// Maximum total message size in bytes. Default: 64 KiB.
    pub max_message_size: usize,
}

impl Default for WireConfig {
    fn default() -> Self {
        Self {
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}
