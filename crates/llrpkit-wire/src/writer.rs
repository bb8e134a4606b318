use std::io::{ErrorKind, Write};

use tracing::trace;

use crate::envelope::Message;
use crate::error::{Result, WireError};
use crate::header::WireConfig;

/// Writes rendered messages to any `Write` stream.
pub struct MessageWriter<T> {
    inner: T,
    config: WireConfig,
}

impl<T: Write> MessageWriter<T> {
    /// Create a new message writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, WireConfig::default())
    }

    /// Create a new message writer with explicit configuration.
    pub fn with_config(inner: T, config: WireConfig) -> Self {
        Self { inner, config }
    }

    /// Render and write a complete message (blocking).
    ///
    /// The message is written in full and the stream flushed. Correlation
    /// bookkeeping is left to the caller: mark the message sent only after
    /// this returns.
    pub fn send(&mut self, message: &dyn Message) -> Result<()> {
        if message.wire_size() > self.config.max_message_size {
            return Err(WireError::PayloadTooLarge {
                size: message.wire_size(),
                max: self.config.max_message_size,
            });
        }

        let wire = message.render()?;
        trace!(
            type_code = message.type_code(),
            message_id = message.message_id(),
            len = wire.len(),
            "writing message"
        );

        let mut offset = 0usize;
        while offset < wire.len() {
            match self.inner.write(&wire[offset..]) {
                Ok(0) => return Err(WireError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(WireError::Io(err)),
            }
        }

        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(WireError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current writer configuration.
    pub fn config(&self) -> &WireConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use bytes::BytesMut;

    use super::*;
    use crate::envelope::{check_body_len, Direction, Envelope};
    use crate::reader::MessageReader;

    #[derive(Debug)]
    struct Blank {
        envelope: Envelope,
    }

    impl Blank {
        fn new(message_id: u32) -> Self {
            Self {
                envelope: Envelope::new(message_id),
            }
        }
    }

    impl Message for Blank {
        fn type_code(&self) -> u16 {
            72
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

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    #[test]
    fn written_messages_read_back() {
        let mut writer = MessageWriter::new(Cursor::new(Vec::<u8>::new()));

        writer.send(&Blank::new(1)).unwrap();
        writer.send(&Blank::new(2)).unwrap();

        let wire = writer.into_inner().into_inner();
        let mut reader = MessageReader::new(Cursor::new(wire));

        for expected in 1..=2u32 {
            let message = reader.read_message().unwrap();
            let mut sink = Blank::new(0);
            sink.extract(&message).unwrap();
            assert_eq!(sink.message_id(), expected);
        }
    }

    #[test]
    fn oversized_message_rejected() {
        let config = WireConfig {
            max_message_size: 4,
        };
        let mut writer = MessageWriter::with_config(Cursor::new(Vec::<u8>::new()), config);

        let err = writer.send(&Blank::new(1)).unwrap_err();
        assert!(matches!(err, WireError::PayloadTooLarge { size: 10, max: 4 }));
    }

    #[test]
    fn zero_length_write_is_connection_closed() {
        let mut writer = MessageWriter::new(ZeroWriter);
        let err = writer.send(&Blank::new(1)).unwrap_err();
        assert!(matches!(err, WireError::ConnectionClosed));
    }

    #[test]
    fn interrupted_write_retries() {
        let sink = InterruptedWriter {
            interrupted: false,
            data: Vec::new(),
        };
        let mut writer = MessageWriter::new(sink);

        writer.send(&Blank::new(3)).unwrap();
        assert_eq!(writer.get_ref().data.len(), 10);
    }

    #[test]
    fn accessors_and_into_inner() {
        let mut writer = MessageWriter::new(Cursor::new(Vec::<u8>::new()));

        assert_eq!(
            writer.config().max_message_size,
            WireConfig::default().max_message_size
        );
        let _ = writer.get_ref();
        let _ = writer.get_mut();
        let _inner = writer.into_inner();
    }

    struct ZeroWriter;

    impl Write for ZeroWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct InterruptedWriter {
        interrupted: bool,
        data: Vec<u8>,
    }

    impl Write for InterruptedWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
