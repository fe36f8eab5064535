//! Signer construction by algorithm name.
//!
//! A [`SignerRegistry`] maps names such as `ed25519-raw` to factories that turn raw
//! secret bytes into a boxed [`Signer`]. Registries are plain values; create one with
//! [`SignerRegistry::with_defaults`] and register extra algorithms as needed.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use oasis_crypto::{CryptoError, Ed25519Signer, Secp256k1Signer, Signer, Sr25519Signer};
use zeroize::Zeroizing;

use crate::error::WalletError;

pub const ED25519_RAW: &str = "ed25519-raw";
pub const SECP256K1_RAW: &str = "secp256k1-raw";
pub const SR25519_RAW: &str = "sr25519-raw";

/// Builds a signer from raw secret bytes.
pub type SignerFactory =
    Box<dyn Fn(&[u8]) -> Result<Box<dyn Signer>, CryptoError> + Send + Sync>;

fn ed25519_raw(secret: &[u8]) -> Result<Box<dyn Signer>, CryptoError> {
    Ok(Box::new(Ed25519Signer::from_bytes(secret)?))
}

fn secp256k1_raw(secret: &[u8]) -> Result<Box<dyn Signer>, CryptoError> {
    Ok(Box::new(Secp256k1Signer::from_bytes(secret)?))
}

fn sr25519_raw(secret: &[u8]) -> Result<Box<dyn Signer>, CryptoError> {
    Ok(Box::new(Sr25519Signer::from_bytes(secret)?))
}

#[derive(Default)]
pub struct SignerRegistry {
    factories: BTreeMap<String, SignerFactory>,
}

impl SignerRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the in-memory ed25519, secp256k1 and sr25519 signers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.insert(ED25519_RAW, Box::new(ed25519_raw));
        registry.insert(SECP256K1_RAW, Box::new(secp256k1_raw));
        registry.insert(SR25519_RAW, Box::new(sr25519_raw));
        registry
    }

    fn insert(&mut self, name: &str, factory: SignerFactory) {
        self.factories.insert(name.to_string(), factory);
    }

    /// Register a factory under `name`. Names cannot be re-registered.
    pub fn register(&mut self, name: &str, factory: SignerFactory) -> Result<(), WalletError> {
        if self.factories.contains_key(name) {
            return Err(WalletError::DuplicateAlgorithm(name.to_string()));
        }
        self.insert(name, factory);
        Ok(())
    }

    pub fn algorithms(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Build a signer for `algorithm` from raw secret bytes.
    pub fn signer(&self, algorithm: &str, secret: &[u8]) -> Result<Box<dyn Signer>, WalletError> {
        let factory = self
            .factories
            .get(algorithm)
            .ok_or_else(|| WalletError::UnknownAlgorithm(algorithm.to_string()))?;
        factory(secret).map_err(|e| WalletError::Key(format!("{algorithm}: {e}")))
    }

    pub fn signer_from_hex(
        &self,
        algorithm: &str,
        secret: &str,
    ) -> Result<Box<dyn Signer>, WalletError> {
        let bytes = Zeroizing::new(
            hex::decode(secret.trim()).map_err(|e| WalletError::Key(e.to_string()))?,
        );
        self.signer(algorithm, &bytes)
    }

    pub fn signer_from_base64(
        &self,
        algorithm: &str,
        secret: &str,
    ) -> Result<Box<dyn Signer>, WalletError> {
        let bytes = Zeroizing::new(
            BASE64
                .decode(secret.trim())
                .map_err(|e| WalletError::Key(e.to_string()))?,
        );
        self.signer(algorithm, &bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oasis_types::PublicKey;

    #[test]
    fn defaults_cover_all_algorithms() {
        let registry = SignerRegistry::with_defaults();
        let names: Vec<&str> = registry.algorithms().collect();
        assert_eq!(names, vec![ED25519_RAW, SECP256K1_RAW, SR25519_RAW]);
    }

    #[test]
    fn builds_each_algorithm() {
        let registry = SignerRegistry::with_defaults();
        let secret = hex::encode([5u8; 32]);
        assert!(matches!(
            registry.signer_from_hex(ED25519_RAW, &secret).unwrap().public_key(),
            PublicKey::Ed25519(_)
        ));
        assert!(matches!(
            registry.signer_from_hex(SECP256K1_RAW, &secret).unwrap().public_key(),
            PublicKey::Secp256k1(_)
        ));
        assert!(matches!(
            registry.signer_from_base64(SR25519_RAW, &BASE64.encode([5u8; 32])).unwrap().public_key(),
            PublicKey::Sr25519(_)
        ));
    }

    #[test]
    fn hex_and_base64_agree() {
        let registry = SignerRegistry::with_defaults();
        let a = registry.signer_from_hex(ED25519_RAW, &hex::encode([9u8; 32])).unwrap();
        let b = registry.signer_from_base64(ED25519_RAW, &BASE64.encode([9u8; 32])).unwrap();
        assert_eq!(a.public_key(), b.public_key());
    }

    #[test]
    fn unknown_and_duplicate_algorithms() {
        let mut registry = SignerRegistry::with_defaults();
        assert!(matches!(
            registry.signer("dilithium", &[0u8; 32]),
            Err(WalletError::UnknownAlgorithm(_))
        ));
        let err = registry
            .register(ED25519_RAW, Box::new(ed25519_raw))
            .unwrap_err();
        assert!(matches!(err, WalletError::DuplicateAlgorithm(_)));
    }

    #[test]
    fn malformed_secret_is_a_key_error() {
        let registry = SignerRegistry::with_defaults();
        assert!(matches!(
            registry.signer(ED25519_RAW, &[1u8; 7]),
            Err(WalletError::Key(_))
        ));
        assert!(matches!(
            registry.signer_from_hex(ED25519_RAW, "not hex"),
            Err(WalletError::Key(_))
        ));
    }
}
