use rand::Rng;

/// Strategy for assigning correlation identifiers to outbound messages.
///
/// Identifier uniqueness is only probabilistic for random sources: with
/// 32-bit ids the birthday bound gives roughly a 50% chance of one collision
/// after ~77k live messages. The tracker reports collisions with live
/// entries as `DuplicateMessageId`; callers who need stronger guarantees can
/// plug in a sequential source.
pub trait MessageIdSource {
    /// Produce the next message identifier.
    fn next_id(&mut self) -> u32;
}

/// Uniform random identifiers.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdSource;

impl MessageIdSource for RandomIdSource {
    fn next_id(&mut self) -> u32 {
        rand::thread_rng().gen()
    }
}

/// Monotonically increasing identifiers, wrapping at `u32::MAX`.
///
/// Starts at 1; zero is skipped so an uninitialized id never looks assigned.
#[derive(Debug, Clone, Copy)]
pub struct SequentialIdSource {
    next: u32,
}

impl SequentialIdSource {
    /// Create a source starting at 1.
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Create a source starting at an explicit value.
    pub fn starting_at(next: u32) -> Self {
        Self { next }
    }
}

impl Default for SequentialIdSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageIdSource for SequentialIdSource {
    fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next = match self.next.wrapping_add(1) {
            0 => 1,
            n => n,
        };
        id
    }
}
