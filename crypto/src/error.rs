//! Error type for the crypto crate.

use thiserror::Error;

#[derive(Debug, PartialEq, Eq, Error)]
pub enum CryptoError {
    #[error("malformed public key: {0}")]
    MalformedPublicKey(String),

    #[error("malformed private key")]
    MalformedPrivateKey,

    #[error("malformed signature")]
    MalformedSignature,

    #[error("signature verification failed")]
    VerificationFailed,

    #[error("signature context too long: {0} bytes")]
    ContextTooLong(usize),

    #[error("malformed nonce: expected {expected} bytes, got {actual}")]
    MalformedNonce { expected: usize, actual: usize },

    #[error("encryption failed")]
    EncryptionFailed,

    #[error("decryption failed")]
    DecryptionFailed,

    #[error("encoding error: {0}")]
    Encoding(String),
}
