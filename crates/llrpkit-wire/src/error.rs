/// Errors that can occur during message encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The buffer is too short to hold a message header.
    #[error("malformed header ({available} bytes, need 10)")]
    MalformedHeader { available: usize },

    /// The declared message length does not match the bytes actually present.
    #[error("message length mismatch (declared {declared} bytes, actual {actual})")]
    LengthMismatch { declared: usize, actual: usize },

    /// The decoded type code does not match the variant asked to extract it.
    #[error("message type mismatch (expected {expected}, got {actual})")]
    TypeMismatch { expected: u16, actual: u16 },

    /// A header sub-field does not fit its bit width.
    #[error("{field} out of range ({value}, max {max})")]
    FieldOutOfRange {
        field: &'static str,
        value: u16,
        max: u16,
    },

    /// The message exceeds the configured maximum size.
    #[error("message too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing messages.
    #[error("wire I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream was closed before a complete message was received.
    #[error("connection closed (incomplete message)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, WireError>;
