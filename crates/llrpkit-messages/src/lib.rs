//! Concrete message variants for LLRP-style reader protocols.
//!
//! Each variant pairs a fixed type code with its body layout and implements
//! the envelope contract from `llrpkit-wire`. Variants split into two
//! disjoint kinds: client-originated requests constructed locally, and
//! reader-originated messages that only come into existence through registry
//! dispatch.

pub mod keepalive;
pub mod version;

pub use keepalive::{Keepalive, KeepaliveAck, KEEPALIVE, KEEPALIVE_ACK};
pub use version::{
    GetSupportedVersion, GetSupportedVersionResponse, GET_SUPPORTED_VERSION,
    GET_SUPPORTED_VERSION_RESPONSE,
};

use llrpkit_dispatch::{Result, TypeRegistry};

/// Register every reader-originated variant with a registry.
///
/// Call once at initialization, before dispatching any inbound bytes.
pub fn register_builtin(registry: &mut TypeRegistry) -> Result<()> {
    registry.register(GET_SUPPORTED_VERSION_RESPONSE, || {
        Box::new(GetSupportedVersionResponse::empty())
    })?;
    registry.register(KEEPALIVE, || Box::new(Keepalive::empty()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registration_covers_inbound_variants() {
        let mut registry = TypeRegistry::new();
        register_builtin(&mut registry).unwrap();

        assert_eq!(
            registry.type_codes(),
            vec![GET_SUPPORTED_VERSION_RESPONSE, KEEPALIVE]
        );
    }

    #[test]
    fn builtin_registration_is_not_repeatable() {
        let mut registry = TypeRegistry::new();
        register_builtin(&mut registry).unwrap();

        assert!(register_builtin(&mut registry).is_err());
    }
}
