//! Bit-packed header codec and message framing for LLRP-style reader
//! control protocols.
//!
//! Every message starts with a fixed 10-byte header:
//! - A 2-byte type field packing reserved bits, the protocol version, and a
//!   10-bit message type code
//! - A 4-byte big-endian total length (header + body)
//! - A 4-byte big-endian correlation identifier
//!
//! The [`Message`] trait is the envelope contract: variants supply their
//! body layout and get `render`/`extract` for free. Encode and decode are
//! pure functions over byte buffers; no transport lives here.

pub mod envelope;
pub mod error;
pub mod header;
pub mod reader;
pub mod writer;

pub use envelope::{check_body_len, Direction, Envelope, Message};
pub use error::{Result, WireError};
pub use header::{
    decode_header, encode_header, pack_type_field, peek_type_code, unpack_type_field, Header,
    WireConfig, DEFAULT_MAX_MESSAGE_SIZE, DEFAULT_VERSION, HEADER_SIZE,
};
pub use reader::{split_message, MessageReader};
pub use writer::MessageWriter;
