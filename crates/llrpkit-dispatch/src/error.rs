use crate::tracker::DeliveryStatus;

/// Errors that can occur in registry and tracker operations.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// No variant is registered for the type code found on the wire.
    #[error("unknown message type {0}")]
    UnknownMessageType(u16),

    /// A variant is already registered for this type code.
    #[error("type code {0} already registered")]
    DuplicateTypeCode(u16),

    /// The message identifier is not tracked.
    #[error("unknown message id {0:#010x}")]
    UnknownMessageId(u32),

    /// A live tracked message already holds this identifier.
    #[error("message id {0:#010x} already tracked")]
    DuplicateMessageId(u32),

    /// The requested lifecycle transition is not allowed from the current
    /// status.
    #[error("illegal transition for message {message_id:#010x}: {from:?} -> {to:?}")]
    IllegalTransition {
        message_id: u32,
        from: DeliveryStatus,
        to: DeliveryStatus,
    },

    /// The tracker's capacity bound would be exceeded.
    #[error("correlation tracker full ({capacity} entries)")]
    TrackerFull { capacity: usize },

    /// Wire-level decode error during dispatch.
    #[error("wire error: {0}")]
    Wire(#[from] llrpkit_wire::WireError),
}

pub type Result<T> = std::result::Result<T, DispatchError>;
