use std::any::Any;

use bytes::BytesMut;
use llrpkit_dispatch::MessageIdSource;
use llrpkit_wire::{check_body_len, Direction, Envelope, Message, Result};

/// Type code of the reader's liveness probe.
pub const KEEPALIVE: u16 = 62;
/// Type code of the client's acknowledgement.
pub const KEEPALIVE_ACK: u16 = 72;

/// Liveness probe sent by the reader. Header-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keepalive {
    envelope: Envelope,
}

impl Keepalive {
    /// Create a probe with an explicit message id.
    pub fn new(message_id: u32) -> Self {
        Self {
            envelope: Envelope::new(message_id),
        }
    }

    /// Empty instance for registry reconstruction.
    pub fn empty() -> Self {
        Self::new(0)
    }
}

impl Message for Keepalive {
    fn type_code(&self) -> u16 {
        KEEPALIVE
    }

    fn direction(&self) -> Direction {
        Direction::ReaderOriginated
    }

    fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    fn envelope_mut(&mut self) -> &mut Envelope {
        &mut self.envelope
    }

    fn body_len(&self) -> usize {
        0
    }

    fn encode_body(&self, _dst: &mut BytesMut) {}

    fn decode_body(&mut self, body: &[u8]) -> Result<()> {
        check_body_len(body, 0)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Client acknowledgement of a [`Keepalive`]. Header-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeepaliveAck {
    envelope: Envelope,
}

impl KeepaliveAck {
    /// Create an acknowledgement with an explicit message id.
    pub fn new(message_id: u32) -> Self {
        Self {
            envelope: Envelope::new(message_id),
        }
    }

    /// Create an acknowledgement with an id drawn from `source`.
    pub fn from_source(source: &mut dyn MessageIdSource) -> Self {
        Self::new(source.next_id())
    }

    /// Acknowledge a received probe, echoing its message id.
    pub fn acknowledging(probe: &Keepalive) -> Self {
        Self::new(probe.message_id())
    }
}

impl Message for KeepaliveAck {
    fn type_code(&self) -> u16 {
        KEEPALIVE_ACK
    }

    fn direction(&self) -> Direction {
        Direction::ClientOriginated
    }

    fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    fn envelope_mut(&mut self) -> &mut Envelope {
        &mut self.envelope
    }

    fn body_len(&self) -> usize {
        0
    }

    fn encode_body(&self, _dst: &mut BytesMut) {}

    fn decode_body(&mut self, body: &[u8]) -> Result<()> {
        check_body_len(body, 0)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use llrpkit_wire::{WireError, HEADER_SIZE};

    use super::*;

    #[test]
    fn probe_roundtrip() {
        let wire = Keepalive::new(31).render().unwrap();
        assert_eq!(wire.len(), HEADER_SIZE);

        let mut decoded = Keepalive::empty();
        decoded.extract(&wire).unwrap();
        assert_eq!(decoded.message_id(), 31);
    }

    #[test]
    fn ack_echoes_probe_id() {
        let probe = Keepalive::new(0xDEAD_BEEF);
        let ack = KeepaliveAck::acknowledging(&probe);

        assert_eq!(ack.message_id(), probe.message_id());
        assert_eq!(ack.direction(), Direction::ClientOriginated);
    }

    #[test]
    fn probe_rejects_trailing_body() {
        let mut wire = Keepalive::new(1).render().unwrap().to_vec();
        wire.extend_from_slice(&[0xFF]);
        wire[2..6].copy_from_slice(&((HEADER_SIZE + 1) as u32).to_be_bytes());

        let err = Keepalive::empty().extract(&wire).unwrap_err();
        assert!(matches!(err, WireError::LengthMismatch { .. }));
    }
}
