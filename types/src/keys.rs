//! Public keys, signatures and signature address specs.
//!
//! All three are tagged unions on the wire: a single-entry CBOR map whose key names the
//! algorithm and whose value is the raw key bytes. Serde's externally tagged enums give
//! exactly that shape, and decoding fails unless exactly one alternative is present.

use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TypesError;

/// Size of an ed25519 or sr25519 public key.
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Size of a compressed secp256k1 public key.
pub const SECP256K1_PUBLIC_KEY_SIZE: usize = 33;

/// A public key of one of the supported signature algorithms.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PublicKey {
    #[serde(rename = "ed25519")]
    Ed25519(#[serde(with = "crate::bytes::fixed")] [u8; PUBLIC_KEY_SIZE]),
    /// Compressed SEC1 encoding.
    #[serde(rename = "secp256k1")]
    Secp256k1(#[serde(with = "crate::bytes::fixed")] [u8; SECP256K1_PUBLIC_KEY_SIZE]),
    #[serde(rename = "sr25519")]
    Sr25519(#[serde(with = "crate::bytes::fixed")] [u8; PUBLIC_KEY_SIZE]),
}

impl PublicKey {
    /// Parse a base64-encoded ed25519 key.
    pub fn ed25519_from_base64(s: &str) -> Result<Self, TypesError> {
        decode_base64(s).map(Self::Ed25519)
    }

    /// Parse a base64-encoded compressed secp256k1 key.
    pub fn secp256k1_from_base64(s: &str) -> Result<Self, TypesError> {
        decode_base64(s).map(Self::Secp256k1)
    }

    /// Parse a base64-encoded sr25519 key.
    pub fn sr25519_from_base64(s: &str) -> Result<Self, TypesError> {
        decode_base64(s).map(Self::Sr25519)
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Ed25519(pk) | Self::Sr25519(pk) => pk,
            Self::Secp256k1(pk) => pk,
        }
    }

    /// Algorithm name as used on the wire.
    pub fn algorithm(&self) -> &'static str {
        match self {
            Self::Ed25519(_) => "ed25519",
            Self::Secp256k1(_) => "secp256k1",
            Self::Sr25519(_) => "sr25519",
        }
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.algorithm(), self)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&base64::engine::general_purpose::STANDARD.encode(self.as_bytes()))
    }
}

/// A signature produced by one of the supported algorithms.
///
/// Length depends on the algorithm: 64 bytes for ed25519 and sr25519, a DER-encoded
/// ECDSA signature for secp256k1.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature(#[serde(with = "serde_bytes")] Vec<u8>);

impl Signature {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for Signature {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", hex::encode(&self.0))
    }
}

/// Determines how an account's address is derived and how its ownership is proven.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureAddressSpec {
    #[serde(rename = "ed25519")]
    Ed25519(#[serde(with = "crate::bytes::fixed")] [u8; PUBLIC_KEY_SIZE]),
    /// Ethereum-compatible secp256k1 account.
    #[serde(rename = "secp256k1eth")]
    Secp256k1Eth(#[serde(with = "crate::bytes::fixed")] [u8; SECP256K1_PUBLIC_KEY_SIZE]),
    #[serde(rename = "sr25519")]
    Sr25519(#[serde(with = "crate::bytes::fixed")] [u8; PUBLIC_KEY_SIZE]),
}

impl SignatureAddressSpec {
    /// The spec a signer with the given key would naturally use.
    pub fn from_public_key(pk: &PublicKey) -> Self {
        match *pk {
            PublicKey::Ed25519(pk) => Self::Ed25519(pk),
            PublicKey::Secp256k1(pk) => Self::Secp256k1Eth(pk),
            PublicKey::Sr25519(pk) => Self::Sr25519(pk),
        }
    }

    /// The public key whose signatures authenticate this spec.
    pub fn public_key(&self) -> PublicKey {
        match *self {
            Self::Ed25519(pk) => PublicKey::Ed25519(pk),
            Self::Secp256k1Eth(pk) => PublicKey::Secp256k1(pk),
            Self::Sr25519(pk) => PublicKey::Sr25519(pk),
        }
    }
}

impl From<PublicKey> for SignatureAddressSpec {
    fn from(pk: PublicKey) -> Self {
        Self::from_public_key(&pk)
    }
}

fn decode_base64<const N: usize>(s: &str) -> Result<[u8; N], TypesError> {
    let raw = base64::engine::general_purpose::STANDARD.decode(s)?;
    raw.as_slice()
        .try_into()
        .map_err(|_| TypesError::InvalidLength {
            expected: N,
            actual: raw.len(),
        })
}
