//! SHA-512/256 digests.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512_256};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// Size of a [`Hash`] in bytes.
pub const HASH_SIZE: usize = 32;

/// A 32-byte SHA-512/256 digest.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Hash(#[serde(with = "crate::bytes::fixed")] [u8; HASH_SIZE]);

impl Hash {
    pub const ZERO: Self = Self([0u8; HASH_SIZE]);

    pub fn new(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }

    /// Digest a single byte string.
    pub fn digest_bytes(data: &[u8]) -> Self {
        Self(Sha512_256::digest(data).into())
    }

    /// Digest the concatenation of several byte strings without allocating.
    pub fn digest_bytes_list(parts: &[&[u8]]) -> Self {
        let mut hasher = Sha512_256::new();
        for part in parts {
            hasher.update(part);
        }
        Self(hasher.finalize().into())
    }

    /// The first `n` bytes of the digest. `n` is clamped to [`HASH_SIZE`].
    pub fn truncated(&self, n: usize) -> &[u8] {
        &self.0[..n.min(HASH_SIZE)]
    }

    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; HASH_SIZE]
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; HASH_SIZE]> for Hash {
    fn from(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for Hash {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = hex::decode(s)?;
        let bytes: [u8; HASH_SIZE] = raw.as_slice().try_into().map_err(|_| {
            TypesError::InvalidLength {
                expected: HASH_SIZE,
                actual: raw.len(),
            }
        })?;
        Ok(Self(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_digest() {
        assert_eq!(
            Hash::digest_bytes(b"").to_string(),
            "c672b8d1ef56ed28ab87c3622c5114069bdd3ad7b8f9737498d0c01ecef0967a"
        );
    }

    #[test]
    fn list_digest_matches_concatenation() {
        assert_eq!(
            Hash::digest_bytes_list(&[b"oasis", b"-", b"core"]),
            Hash::digest_bytes(b"oasis-core")
        );
    }

    #[test]
    fn hex_round_trip() {
        let h = Hash::digest_bytes(b"abc");
        assert_eq!(h.to_string().parse::<Hash>().unwrap(), h);
        assert!("abcd".parse::<Hash>().is_err());
    }

    #[test]
    fn truncated_clamps() {
        let h = Hash::digest_bytes(b"abc");
        assert_eq!(h.truncated(20).len(), 20);
        assert_eq!(h.truncated(100).len(), HASH_SIZE);
    }
}
