//! Type dispatch and correlation tracking for LLRP-style messages.
//!
//! Two process-wide tables drive the protocol's bookkeeping, both modeled as
//! explicit values owned by the application rather than hidden globals:
//!
//! - [`TypeRegistry`] — maps wire type codes to factories and is the sole
//!   entry point for reconstructing typed messages from untrusted bytes
//! - [`CorrelationTracker`] — follows each outbound message's lifecycle
//!   (`Created -> Sent -> Answered`) by its correlation identifier
//!
//! Neither takes locks; callers with concurrent senders/receivers wrap them
//! in a `Mutex` or `RwLock`.

pub mod error;
pub mod idgen;
pub mod registry;
pub mod tracker;

pub use error::{DispatchError, Result};
pub use idgen::{MessageIdSource, RandomIdSource, SequentialIdSource};
pub use registry::{MessageFactory, TypeRegistry};
pub use tracker::{CorrelationTracker, DeliveryStatus, TrackedEntry, TrackerConfig};
