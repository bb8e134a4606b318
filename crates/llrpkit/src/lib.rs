//! Message framing, dispatch, and correlation for LLRP-style RFID reader
//! control protocols.
//!
//! # Crate Structure
//!
//! - [`wire`] — bit-packed header codec, envelope contract, streamed framing
//! - [`dispatch`] — type registry and correlation tracker
//! - [`messages`] — concrete message variants

/// Re-export wire types.
pub mod wire {
    pub use llrpkit_wire::*;
}

/// Re-export dispatch types.
pub mod dispatch {
    pub use llrpkit_dispatch::*;
}

/// Re-export message variants.
pub mod messages {
    pub use llrpkit_messages::*;
}
