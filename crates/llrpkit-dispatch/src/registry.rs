use std::collections::HashMap;

use llrpkit_wire::{peek_type_code, Message};
use tracing::{debug, trace};

use crate::error::{DispatchError, Result};

/// Zero-argument factory producing an empty instance of one variant.
pub type MessageFactory = Box<dyn Fn() -> Box<dyn Message> + Send + Sync>;

/// Mapping from wire type code to the factory for the matching inbound
/// variant.
///
/// The registry is an explicit value owned by the application, populated
/// once at initialization before any dispatch. [`TypeRegistry::instantiate`]
/// is the sole path for turning untrusted wire bytes into a typed message.
#[derive(Default)]
pub struct TypeRegistry {
    factories: HashMap<u16, MessageFactory>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for a type code.
    ///
    /// A collision is a programming error, not a runtime condition: the
    /// existing factory is kept and `DuplicateTypeCode` returned.
    pub fn register<F>(&mut self, type_code: u16, factory: F) -> Result<()>
    where
        F: Fn() -> Box<dyn Message> + Send + Sync + 'static,
    {
        if self.factories.contains_key(&type_code) {
            return Err(DispatchError::DuplicateTypeCode(type_code));
        }

        self.factories.insert(type_code, Box::new(factory));
        debug!(type_code, "registered message variant");
        Ok(())
    }

    /// Whether a variant is registered for this type code.
    pub fn is_registered(&self, type_code: u16) -> bool {
        self.factories.contains_key(&type_code)
    }

    /// Registered type codes, sorted.
    pub fn type_codes(&self) -> Vec<u16> {
        let mut codes: Vec<u16> = self.factories.keys().copied().collect();
        codes.sort_unstable();
        codes
    }

    /// Reconstruct the typed message at the front of `payload`.
    ///
    /// Peeks the type code, builds an empty instance from the registered
    /// factory, and extracts it from the bytes. Fails with
    /// `UnknownMessageType` for unregistered codes; decode failures leave
    /// the registry untouched.
    pub fn instantiate(&self, payload: &[u8]) -> Result<Box<dyn Message>> {
        let (message, _) = self.instantiate_next(payload)?;
        Ok(message)
    }

    /// Like [`instantiate`](Self::instantiate), additionally returning the
    /// bytes after the message's declared length for callers draining a
    /// pipelined buffer.
    pub fn instantiate_next<'a>(&self, payload: &'a [u8]) -> Result<(Box<dyn Message>, &'a [u8])> {
        let type_code = peek_type_code(payload)?;

        let factory = self
            .factories
            .get(&type_code)
            .ok_or(DispatchError::UnknownMessageType(type_code))?;

        let mut message = factory();
        let rest = message.extract(payload)?;
        trace!(
            type_code,
            message_id = message.message_id(),
            "instantiated inbound message"
        );

        Ok((message, rest))
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("type_codes", &self.type_codes())
            .finish()
    }
}
