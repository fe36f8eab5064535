//! Context-separated signing and verification.
//!
//! Every algorithm signs `(context, message)` rather than the raw message:
//! - ed25519 signs `SHA512_256(context || message)`
//! - secp256k1 signs the same digest with ECDSA and emits DER
//! - sr25519 signs the transcript `signing_context(context).hash256(SHA512_256(message))`

use k256::ecdsa::signature::DigestVerifier;
use oasis_types::{PublicKey, Signature};
use schnorrkel::context::SigningTranscript;
use sha2::{Digest, Sha512_256};

use crate::context::check_context;
use crate::error::CryptoError;
use crate::hash::sha512_256_multi;

/// Something that can sign messages under a domain-separation context.
///
/// Implementations may hold keys in memory or forward to a remote device. The
/// transaction signer only ever sees this trait.
pub trait Signer: Send + Sync {
    /// The public key signatures verify against.
    fn public_key(&self) -> PublicKey;

    /// Sign `message` under `context`.
    fn sign(&self, context: &[u8], message: &[u8]) -> Result<Signature, CryptoError>;
}

impl<S: Signer + ?Sized> Signer for Box<S> {
    fn public_key(&self) -> PublicKey {
        (**self).public_key()
    }

    fn sign(&self, context: &[u8], message: &[u8]) -> Result<Signature, CryptoError> {
        (**self).sign(context, message)
    }
}

impl<S: Signer + ?Sized> Signer for &S {
    fn public_key(&self) -> PublicKey {
        (**self).public_key()
    }

    fn sign(&self, context: &[u8], message: &[u8]) -> Result<Signature, CryptoError> {
        (**self).sign(context, message)
    }
}

/// The 32-byte digest ed25519 and secp256k1 sign.
pub(crate) fn prehash(context: &[u8], message: &[u8]) -> [u8; 32] {
    sha512_256_multi(&[context, message])
}

/// The digest state secp256k1 signs, left unfinalised for `DigestSigner`.
pub(crate) fn prehash_digest(context: &[u8], message: &[u8]) -> Sha512_256 {
    Sha512_256::new().chain_update(context).chain_update(message)
}

/// The schnorrkel transcript sr25519 signs.
pub(crate) fn sr25519_transcript(context: &[u8], message: &[u8]) -> impl SigningTranscript {
    schnorrkel::signing_context(context).hash256(Sha512_256::new().chain_update(message))
}

/// Verify `signature` by `public_key` over `message` under `context`.
pub fn verify(
    public_key: &PublicKey,
    context: &[u8],
    message: &[u8],
    signature: &Signature,
) -> Result<(), CryptoError> {
    check_context(context)?;
    match public_key {
        PublicKey::Ed25519(pk) => {
            let vk = ed25519_dalek::VerifyingKey::from_bytes(pk)
                .map_err(|e| CryptoError::MalformedPublicKey(e.to_string()))?;
            let sig = ed25519_dalek::Signature::from_slice(signature.as_bytes())
                .map_err(|_| CryptoError::MalformedSignature)?;
            vk.verify_strict(&prehash(context, message), &sig)
                .map_err(|_| CryptoError::VerificationFailed)
        }
        PublicKey::Secp256k1(pk) => {
            let vk = k256::ecdsa::VerifyingKey::from_sec1_bytes(pk)
                .map_err(|e| CryptoError::MalformedPublicKey(e.to_string()))?;
            let sig = k256::ecdsa::Signature::from_der(signature.as_bytes())
                .map_err(|_| CryptoError::MalformedSignature)?;
            vk.verify_digest(prehash_digest(context, message), &sig)
                .map_err(|_| CryptoError::VerificationFailed)
        }
        PublicKey::Sr25519(pk) => {
            let vk = schnorrkel::PublicKey::from_bytes(pk)
                .map_err(|e| CryptoError::MalformedPublicKey(e.to_string()))?;
            let sig = schnorrkel::Signature::from_bytes(signature.as_bytes())
                .map_err(|_| CryptoError::MalformedSignature)?;
            vk.verify(sr25519_transcript(context, message), &sig)
                .map_err(|_| CryptoError::VerificationFailed)
        }
    }
}
