use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use llrpkit_wire::Message;
use tracing::debug;

use crate::error::{DispatchError, Result};

/// Lifecycle status of a tracked outbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// Constructed locally, not yet handed to a transport.
    Created,
    /// Transmission confirmed by the transport collaborator.
    Sent,
    /// A matching response arrived. Terminal.
    Answered,
}

/// Status record owned by the tracker, keyed by message id.
pub struct TrackedEntry {
    /// Current lifecycle status.
    pub status: DeliveryStatus,
    /// The originating message. The message itself holds no back-reference
    /// into the tracker.
    pub source: Arc<dyn Message>,
    /// The correlated response, present once answered.
    pub response: Option<Box<dyn Message>>,
    created_at: Instant,
}

impl TrackedEntry {
    /// Age of this entry since `record_created`.
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }
}

impl std::fmt::Debug for TrackedEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackedEntry")
            .field("status", &self.status)
            .field("source", &self.source)
            .field("response", &self.response)
            .finish()
    }
}

/// Configuration for the correlation tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Maximum number of tracked entries. Default: 4096.
    pub max_entries: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self { max_entries: 4096 }
    }
}

/// Correlation bookkeeping for outbound messages by identifier.
///
/// Lifecycle per message: `Created -> Sent -> Answered`, driven by the
/// transport collaborator. Entries are never evicted implicitly; callers
/// bound growth with [`purge_answered`](Self::purge_answered) or
/// [`purge_older_than`](Self::purge_older_than), and the configured
/// capacity turns runaway growth into an explicit error.
///
/// The tracker is an explicit value owned by the application. Wrap it in a
/// `Mutex` when senders and receivers run concurrently.
pub struct CorrelationTracker {
    entries: HashMap<u32, TrackedEntry>,
    config: TrackerConfig,
}

impl CorrelationTracker {
    /// Create an empty tracker with default configuration.
    pub fn new() -> Self {
        Self::with_config(TrackerConfig::default())
    }

    /// Create an empty tracker with explicit configuration.
    pub fn with_config(config: TrackerConfig) -> Self {
        Self {
            entries: HashMap::new(),
            config,
        }
    }

    /// Track a freshly constructed outbound message as `Created`.
    ///
    /// Fails with `DuplicateMessageId` when a live (non-answered) entry
    /// already holds this id. An answered entry is displaced; random
    /// identifiers may recur over a long session.
    pub fn record_created(&mut self, source: Arc<dyn Message>) -> Result<()> {
        let message_id = source.message_id();

        match self.entries.get(&message_id) {
            Some(entry) if entry.status != DeliveryStatus::Answered => {
                return Err(DispatchError::DuplicateMessageId(message_id));
            }
            Some(_) => {}
            None => {
                if self.entries.len() >= self.config.max_entries {
                    return Err(DispatchError::TrackerFull {
                        capacity: self.config.max_entries,
                    });
                }
            }
        }

        debug!(message_id, type_code = source.type_code(), "tracking message");
        self.entries.insert(
            message_id,
            TrackedEntry {
                status: DeliveryStatus::Created,
                source,
                response: None,
                created_at: Instant::now(),
            },
        );
        Ok(())
    }

    /// Record confirmed transmission: `Created -> Sent`.
    pub fn mark_sent(&mut self, message_id: u32) -> Result<()> {
        let entry = self
            .entries
            .get_mut(&message_id)
            .ok_or(DispatchError::UnknownMessageId(message_id))?;

        if entry.status != DeliveryStatus::Created {
            return Err(DispatchError::IllegalTransition {
                message_id,
                from: entry.status,
                to: DeliveryStatus::Sent,
            });
        }

        entry.status = DeliveryStatus::Sent;
        debug!(message_id, "message sent");
        Ok(())
    }

    /// Record the correlated response: `Sent -> Answered`.
    pub fn mark_answered(&mut self, message_id: u32, response: Box<dyn Message>) -> Result<()> {
        let entry = self
            .entries
            .get_mut(&message_id)
            .ok_or(DispatchError::UnknownMessageId(message_id))?;

        if entry.status != DeliveryStatus::Sent {
            return Err(DispatchError::IllegalTransition {
                message_id,
                from: entry.status,
                to: DeliveryStatus::Answered,
            });
        }

        entry.status = DeliveryStatus::Answered;
        entry.response = Some(response);
        debug!(message_id, "message answered");
        Ok(())
    }

    /// Look up the status record for a message id.
    pub fn lookup(&self, message_id: u32) -> Option<&TrackedEntry> {
        self.entries.get(&message_id)
    }

    /// Drop all answered entries, returning how many were removed.
    pub fn purge_answered(&mut self) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| entry.status != DeliveryStatus::Answered);
        before - self.entries.len()
    }

    /// Drop entries older than `max_age`, regardless of status.
    pub fn purge_older_than(&mut self, max_age: Duration) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| entry.created_at.elapsed() <= max_age);
        before - self.entries.len()
    }

    /// Number of tracked entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the tracker holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tracker configuration.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }
}

impl Default for CorrelationTracker {
    fn default() -> Self {
        Self::new()
    }
}
