use std::any::Any;

use bytes::{BufMut, BytesMut};
use llrpkit_dispatch::MessageIdSource;
use llrpkit_wire::{check_body_len, Direction, Envelope, Message, Result};

/// Type code of the version negotiation request.
pub const GET_SUPPORTED_VERSION: u16 = 46;
/// Type code of the version negotiation response.
pub const GET_SUPPORTED_VERSION_RESPONSE: u16 = 56;

const RESPONSE_BODY_LEN: usize = 4;

/// Client request asking the reader which protocol versions it speaks.
///
/// Header-only; the reply is [`GetSupportedVersionResponse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetSupportedVersion {
    envelope: Envelope,
}

impl GetSupportedVersion {
    /// Create a request with an explicit message id.
    pub fn new(message_id: u32) -> Self {
        Self {
            envelope: Envelope::new(message_id),
        }
    }

    /// Create a request with an id drawn from `source`.
    pub fn from_source(source: &mut dyn MessageIdSource) -> Self {
        Self::new(source.next_id())
    }
}

impl Message for GetSupportedVersion {
    fn type_code(&self) -> u16 {
        GET_SUPPORTED_VERSION
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

/// Reader response carrying the current and the highest supported protocol
/// version, two big-endian `u16`s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetSupportedVersionResponse {
    envelope: Envelope,
    /// Version the reader is currently operating at.
    pub current_version: u16,
    /// Highest version the reader supports.
    pub supported_version: u16,
}

impl GetSupportedVersionResponse {
    /// Create a populated response, matching `message_id` to the request it
    /// answers.
    pub fn new(message_id: u32, current_version: u16, supported_version: u16) -> Self {
        Self {
            envelope: Envelope::new(message_id),
            current_version,
            supported_version,
        }
    }

    /// Empty instance for registry reconstruction.
    pub fn empty() -> Self {
        Self::new(0, 0, 0)
    }
}

impl Message for GetSupportedVersionResponse {
    fn type_code(&self) -> u16 {
        GET_SUPPORTED_VERSION_RESPONSE
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
        RESPONSE_BODY_LEN
    }

    fn encode_body(&self, dst: &mut BytesMut) {
        dst.put_u16(self.current_version);
        dst.put_u16(self.supported_version);
    }

    fn decode_body(&mut self, body: &[u8]) -> Result<()> {
        check_body_len(body, RESPONSE_BODY_LEN)?;
        self.current_version = u16::from_be_bytes([body[0], body[1]]);
        self.supported_version = u16::from_be_bytes([body[2], body[3]]);
        Ok(())
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
    fn request_renders_header_only() {
        let request = GetSupportedVersion::new(0x1122_3344);
        let wire = request.render().unwrap();

        assert_eq!(wire.len(), HEADER_SIZE);
        // version 1, type 46 in the packed type field; length 10; id.
        assert_eq!(
            wire.as_ref(),
            &[0x04, 0x2E, 0x00, 0x00, 0x00, 0x0A, 0x11, 0x22, 0x33, 0x44]
        );
    }

    #[test]
    fn request_roundtrip() {
        let wire = GetSupportedVersion::new(77).render().unwrap();

        let mut decoded = GetSupportedVersion::new(0);
        let rest = decoded.extract(&wire).unwrap();

        assert!(rest.is_empty());
        assert_eq!(decoded, GetSupportedVersion::new(77));
    }

    #[test]
    fn response_roundtrip() {
        let response = GetSupportedVersionResponse::new(0xAABB_CCDD, 2, 1);
        let wire = response.render().unwrap();
        assert_eq!(wire.len(), HEADER_SIZE + 4);

        let mut decoded = GetSupportedVersionResponse::empty();
        let rest = decoded.extract(&wire).unwrap();

        assert!(rest.is_empty());
        assert_eq!(decoded, response);
        assert_eq!(decoded.current_version, 2);
        assert_eq!(decoded.supported_version, 1);
    }

    #[test]
    fn response_body_is_big_endian() {
        let wire = GetSupportedVersionResponse::new(0, 0x0102, 0x0304)
            .render()
            .unwrap();
        assert_eq!(&wire[HEADER_SIZE..], &[0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn response_rejects_truncated_body() {
        let mut wire = GetSupportedVersionResponse::new(1, 2, 1)
            .render()
            .unwrap()
            .to_vec();
        wire.truncate(HEADER_SIZE + 2);
        wire[2..6].copy_from_slice(&((HEADER_SIZE + 2) as u32).to_be_bytes());

        let err = GetSupportedVersionResponse::empty()
            .extract(&wire)
            .unwrap_err();
        assert!(matches!(err, WireError::LengthMismatch { .. }));
    }

    #[test]
    fn request_rejects_response_bytes() {
        let wire = GetSupportedVersionResponse::new(1, 2, 1).render().unwrap();

        let err = GetSupportedVersion::new(0).extract(&wire).unwrap_err();
        assert!(matches!(
            err,
            WireError::TypeMismatch {
                expected: GET_SUPPORTED_VERSION,
                actual: GET_SUPPORTED_VERSION_RESPONSE,
            }
        ));
    }

    #[test]
    fn from_source_draws_ids() {
        let mut source = llrpkit_dispatch::SequentialIdSource::new();
        let first = GetSupportedVersion::from_source(&mut source);
        let second = GetSupportedVersion::from_source(&mut source);

        assert_eq!(first.message_id(), 1);
        assert_eq!(second.message_id(), 2);
    }
}
