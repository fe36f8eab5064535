//! Account addresses and their bech32 form.
//!
//! An address is one version byte followed by the first 20 bytes of
//! `SHA512_256(context || version || data)`. The human-readable form is bech32 with
//! the `oasis` prefix. Derivation from keys and multisig configs lives in
//! `oasis_crypto::address`; this module only knows how to hash and encode.

use bech32::{FromBase32, ToBase32, Variant};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::bytes::ArrayVisitor;
use crate::error::TypesError;
use crate::hash::Hash;

/// Size of an address in bytes.
pub const ADDRESS_SIZE: usize = 21;

/// Version byte shared by every address kind defined so far.
pub const ADDRESS_V0_VERSION: u8 = 0;

/// Human-readable part of the bech32 encoding.
pub const ADDRESS_BECH32_HRP: &str = "oasis";

/// Context for addresses derived from ed25519 keys (shared with the consensus layer).
pub const ADDRESS_V0_ED25519_CONTEXT: &[u8] = b"oasis-core/address: staking";
/// Context for addresses derived from Ethereum-compatible secp256k1 keys.
pub const ADDRESS_V0_SECP256K1ETH_CONTEXT: &[u8] = b"oasis-runtime-sdk/address: secp256k1eth";
/// Context for addresses derived from sr25519 keys.
pub const ADDRESS_V0_SR25519_CONTEXT: &[u8] = b"oasis-runtime-sdk/address: sr25519";
/// Context for addresses derived from multisig configurations.
pub const ADDRESS_V0_MULTISIG_CONTEXT: &[u8] = b"oasis-runtime-sdk/address: multisig";
/// Context for module-owned addresses.
pub const ADDRESS_V0_MODULE_CONTEXT: &[u8] = b"oasis-runtime-sdk/address: module";

/// A 21-byte account address.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address([u8; ADDRESS_SIZE]);

impl Address {
    /// Derive an address from a domain-separation context, version and payload.
    pub fn new(context: &[u8], version: u8, data: &[u8]) -> Self {
        let digest = Hash::digest_bytes_list(&[context, &[version], data]);
        let mut out = [0u8; ADDRESS_SIZE];
        out[0] = version;
        out[1..].copy_from_slice(digest.truncated(ADDRESS_SIZE - 1));
        Self(out)
    }

    /// Wrap raw address bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, TypesError> {
        let bytes: [u8; ADDRESS_SIZE] =
            data.try_into().map_err(|_| TypesError::InvalidLength {
                expected: ADDRESS_SIZE,
                actual: data.len(),
            })?;
        Ok(Self(bytes))
    }

    /// Parse the bech32 form. The prefix must be `oasis` and the payload 21 bytes.
    pub fn from_bech32(s: &str) -> Result<Self, TypesError> {
        let (hrp, data, variant) =
            bech32::decode(s).map_err(|e| TypesError::MalformedAddress(e.to_string()))?;
        if hrp != ADDRESS_BECH32_HRP {
            return Err(TypesError::MalformedAddress(format!(
                "unexpected prefix: {hrp}"
            )));
        }
        if variant != Variant::Bech32 {
            return Err(TypesError::MalformedAddress(
                "bech32m encoding is not accepted".into(),
            ));
        }
        let raw = Vec::<u8>::from_base32(&data)
            .map_err(|e| TypesError::MalformedAddress(e.to_string()))?;
        Self::from_bytes(&raw).map_err(|_| {
            TypesError::MalformedAddress(format!("invalid payload length: {}", raw.len()))
        })
    }

    pub fn to_bech32(&self) -> String {
        self.to_string()
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_SIZE] {
        &self.0
    }

    pub fn into_bytes(self) -> [u8; ADDRESS_SIZE] {
        self.0
    }

    pub fn version(&self) -> u8 {
        self.0[0]
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        bech32::encode_to_fmt(f, ADDRESS_BECH32_HRP, self.0.to_base32(), Variant::Bech32)
            .map_err(|_| fmt::Error)?
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bech32(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Self::from_bech32(&s).map_err(D::Error::custom)
        } else {
            deserializer
                .deserialize_bytes(ArrayVisitor::<ADDRESS_SIZE>)
                .map(Self)
        }
    }
}
