//! Sealed boxes for confidential call data.
//!
//! Uses X25519 Diffie-Hellman for key agreement, HMAC-SHA512/256 keyed with a fixed
//! label to derive the symmetric key, then Deoxys-II-256-128 for authenticated
//! encryption. Both sides derive the same key from their own secret and the peer's
//! public key.

use deoxys::aead::generic_array::GenericArray;
use deoxys::aead::{Aead, KeyInit, Payload};
use deoxys::DeoxysII256;
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand_core::CryptoRngCore;
use sha2::Sha512_256;
use x25519_dalek::{PublicKey as X25519Public, StaticSecret};
use zeroize::Zeroizing;

use crate::error::CryptoError;

/// Size of the derived symmetric key.
pub const KEY_SIZE: usize = 32;
/// Size of a Deoxys-II nonce.
pub const NONCE_SIZE: usize = 15;
/// Size of the authentication tag appended to every ciphertext.
pub const TAG_SIZE: usize = 16;

const BOX_KDF_LABEL: &[u8] = b"MRAE_Box_Deoxys-II-256-128";

/// An X25519 key pair. The secret is zeroized on drop.
#[derive(Clone)]
pub struct X25519KeyPair {
    secret: StaticSecret,
    public: X25519Public,
}

impl X25519KeyPair {
    /// Generate a new key pair from a secure random source.
    pub fn generate() -> Self {
        Self::generate_with(&mut OsRng)
    }

    pub fn generate_with<R: CryptoRngCore>(rng: &mut R) -> Self {
        Self::from_secret(StaticSecret::random_from_rng(rng))
    }

    pub fn from_secret_bytes(secret: [u8; 32]) -> Self {
        Self::from_secret(StaticSecret::from(secret))
    }

    fn from_secret(secret: StaticSecret) -> Self {
        let public = X25519Public::from(&secret);
        Self { secret, public }
    }

    pub fn public_bytes(&self) -> [u8; 32] {
        self.public.to_bytes()
    }

    pub fn secret(&self) -> &StaticSecret {
        &self.secret
    }
}

/// Derive the box key shared between `secret` and `peer_public`.
pub fn derive_symmetric_key(
    peer_public: &[u8; 32],
    secret: &StaticSecret,
) -> Result<Zeroizing<[u8; KEY_SIZE]>, CryptoError> {
    let shared = secret.diffie_hellman(&X25519Public::from(*peer_public));
    let mut kdf = <Hmac<Sha512_256> as Mac>::new_from_slice(BOX_KDF_LABEL)
        .map_err(|_| CryptoError::EncryptionFailed)?;
    kdf.update(shared.as_bytes());
    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    key.copy_from_slice(&kdf.finalize().into_bytes());
    Ok(key)
}

fn cipher(peer_public: &[u8; 32], secret: &StaticSecret) -> Result<DeoxysII256, CryptoError> {
    let key = derive_symmetric_key(peer_public, secret)?;
    DeoxysII256::new_from_slice(key.as_ref()).map_err(|_| CryptoError::EncryptionFailed)
}

/// Seal `plaintext` for `peer_public`. Returns ciphertext with the tag appended.
///
/// A nonce must never be reused with the same key pair.
pub fn box_seal(
    nonce: &[u8; NONCE_SIZE],
    plaintext: &[u8],
    additional_data: &[u8],
    peer_public: &[u8; 32],
    secret: &StaticSecret,
) -> Result<Vec<u8>, CryptoError> {
    cipher(peer_public, secret)?
        .encrypt(
            GenericArray::from_slice(nonce),
            Payload {
                msg: plaintext,
                aad: additional_data,
            },
        )
        .map_err(|_| CryptoError::EncryptionFailed)
}

/// Open a box sealed by `peer_public` for `secret`.
///
/// Fails with [`CryptoError::DecryptionFailed`] on any tag mismatch, whether from a
/// wrong key or a tampered ciphertext.
pub fn box_open(
    nonce: &[u8; NONCE_SIZE],
    ciphertext: &[u8],
    additional_data: &[u8],
    peer_public: &[u8; 32],
    secret: &StaticSecret,
) -> Result<Vec<u8>, CryptoError> {
    if ciphertext.len() < TAG_SIZE {
        return Err(CryptoError::DecryptionFailed);
    }
    cipher(peer_public, secret)?
        .decrypt(
            GenericArray::from_slice(nonce),
            Payload {
                msg: ciphertext,
                aad: additional_data,
            },
        )
        .map_err(|_| CryptoError::DecryptionFailed)
}
