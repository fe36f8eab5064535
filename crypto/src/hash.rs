//! SHA-512/256 and Keccak-256.

use sha2::{Digest, Sha512_256};
use sha3::Keccak256;

/// SHA-512/256 of arbitrary data.
pub fn sha512_256(data: &[u8]) -> [u8; 32] {
    Sha512_256::digest(data).into()
}

/// SHA-512/256 over several slices in sequence (avoids concatenation allocation).
pub fn sha512_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha512_256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Keccak-256 as used by Ethereum (not NIST SHA3-256).
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keccak_is_not_sha3() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn multi_matches_single() {
        assert_eq!(sha512_256_multi(&[b"ab", b"c"]), sha512_256(b"abc"));
    }
}
