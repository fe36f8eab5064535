//! In-memory signers for the three supported algorithms.
//!
//! Secret material is zeroized on drop by the underlying key types.

use k256::ecdsa::signature::DigestSigner;
use oasis_types::{PublicKey, Signature};
use rand::rngs::OsRng;
use rand_core::CryptoRngCore;

use crate::context::check_context;
use crate::error::CryptoError;
use crate::sign::{prehash, prehash_digest, sr25519_transcript, Signer};

/// An ed25519 signer.
pub struct Ed25519Signer {
    key: ed25519_dalek::SigningKey,
}

impl Ed25519Signer {
    /// Generate a new key from a secure random source.
    pub fn generate() -> Self {
        Self::generate_with(&mut OsRng)
    }

    pub fn generate_with<R: CryptoRngCore>(rng: &mut R) -> Self {
        Self {
            key: ed25519_dalek::SigningKey::generate(rng),
        }
    }

    /// Derive the key from a 32-byte seed (deterministic).
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            key: ed25519_dalek::SigningKey::from_bytes(seed),
        }
    }

    /// Accept a 32-byte seed or a 64-byte `seed || public key` pair.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        match bytes.len() {
            32 => {
                let seed: &[u8; 32] = bytes
                    .try_into()
                    .map_err(|_| CryptoError::MalformedPrivateKey)?;
                Ok(Self::from_seed(seed))
            }
            64 => {
                let pair: &[u8; 64] = bytes
                    .try_into()
                    .map_err(|_| CryptoError::MalformedPrivateKey)?;
                ed25519_dalek::SigningKey::from_keypair_bytes(pair)
                    .map(|key| Self { key })
                    .map_err(|_| CryptoError::MalformedPrivateKey)
            }
            _ => Err(CryptoError::MalformedPrivateKey),
        }
    }
}

impl Signer for Ed25519Signer {
    fn public_key(&self) -> PublicKey {
        PublicKey::Ed25519(self.key.verifying_key().to_bytes())
    }

    fn sign(&self, context: &[u8], message: &[u8]) -> Result<Signature, CryptoError> {
        check_context(context)?;
        let sig = ed25519_dalek::Signer::sign(&self.key, &prehash(context, message));
        Ok(Signature::new(sig.to_bytes().to_vec()))
    }
}

/// A secp256k1 ECDSA signer.
pub struct Secp256k1Signer {
    key: k256::ecdsa::SigningKey,
}

impl Secp256k1Signer {
    pub fn generate() -> Self {
        Self::generate_with(&mut OsRng)
    }

    pub fn generate_with<R: CryptoRngCore>(rng: &mut R) -> Self {
        Self {
            key: k256::ecdsa::SigningKey::random(rng),
        }
    }

    /// Load a 32-byte secret scalar. Zero and out-of-range scalars are rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        k256::ecdsa::SigningKey::from_slice(bytes)
            .map(|key| Self { key })
            .map_err(|_| CryptoError::MalformedPrivateKey)
    }
}

impl Signer for Secp256k1Signer {
    fn public_key(&self) -> PublicKey {
        let point = self.key.verifying_key().to_encoded_point(true);
        let mut pk = [0u8; 33];
        pk.copy_from_slice(point.as_bytes());
        PublicKey::Secp256k1(pk)
    }

    fn sign(&self, context: &[u8], message: &[u8]) -> Result<Signature, CryptoError> {
        check_context(context)?;
        let sig: k256::ecdsa::Signature = self
            .key
            .try_sign_digest(prehash_digest(context, message))
            .map_err(|e| CryptoError::Encoding(e.to_string()))?;
        Ok(Signature::new(sig.to_der().as_bytes().to_vec()))
    }
}

/// An sr25519 (schnorrkel) signer.
pub struct Sr25519Signer {
    keypair: schnorrkel::Keypair,
}

impl Sr25519Signer {
    pub fn generate() -> Self {
        Self::generate_with(&mut OsRng)
    }

    pub fn generate_with<R: CryptoRngCore>(rng: &mut R) -> Self {
        Self {
            keypair: schnorrkel::Keypair::generate_with(rng),
        }
    }

    /// Expand a 32-byte mini secret key.
    pub fn from_seed(seed: &[u8; 32]) -> Result<Self, CryptoError> {
        let mini = schnorrkel::MiniSecretKey::from_bytes(seed)
            .map_err(|_| CryptoError::MalformedPrivateKey)?;
        Ok(Self {
            keypair: mini.expand_to_keypair(schnorrkel::ExpansionMode::Ed25519),
        })
    }

    /// Accept a 32-byte mini secret key or a 64-byte expanded secret key.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        match bytes.len() {
            32 => {
                let seed: &[u8; 32] = bytes
                    .try_into()
                    .map_err(|_| CryptoError::MalformedPrivateKey)?;
                Self::from_seed(seed)
            }
            64 => {
                let secret = schnorrkel::SecretKey::from_bytes(bytes)
                    .map_err(|_| CryptoError::MalformedPrivateKey)?;
                Ok(Self {
                    keypair: secret.to_keypair(),
                })
            }
            _ => Err(CryptoError::MalformedPrivateKey),
        }
    }
}

impl Signer for Sr25519Signer {
    fn public_key(&self) -> PublicKey {
        PublicKey::Sr25519(self.keypair.public.to_bytes())
    }

    fn sign(&self, context: &[u8], message: &[u8]) -> Result<Signature, CryptoError> {
        check_context(context)?;
        let sig = self.keypair.sign(sr25519_transcript(context, message));
        Ok(Signature::new(sig.to_bytes().to_vec()))
    }
}
