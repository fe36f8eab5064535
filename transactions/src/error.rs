use oasis_crypto::CryptoError;
use oasis_types::{MultisigError, TypesError};
use std::fmt;
use thiserror::Error;

/// Coarse classification of a failure. None of them is worth retrying.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A malformed signer configuration the caller must fix.
    Config,
    /// Missing or mismatched proofs; more signatures or a corrected spec are needed.
    Proof,
    /// A signature or authentication tag did not verify.
    CryptoVerification,
    /// The peer speaks a different transaction version.
    Version,
    /// Malformed bytes, CBOR shape or envelope.
    Encoding,
    /// The runtime executed the call and reported a failure.
    Call,
}

/// Where a signature check came from: a signer slot and, for multisig slots, the
/// position of the signer within the config.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SignatureOrigin {
    pub slot: usize,
    pub sub_slot: Option<usize>,
}

impl fmt::Display for SignatureOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sub_slot {
            Some(sub) => write!(f, "signer slot {} (multisig signer {})", self.slot, sub),
            None => write!(f, "signer slot {}", self.slot),
        }
    }
}

#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("unsupported transaction version: expected {expected}, got {actual}")]
    UnsupportedVersion { expected: u16, actual: u16 },

    #[error("transaction has no signers")]
    NoSigners,

    #[error("unexpected number of auth proofs: expected {expected}, got {actual}")]
    ProofCountMismatch { expected: usize, actual: usize },

    #[error("auth proof does not match the address spec of signer slot {slot}")]
    ProofTypeMismatch { slot: usize },

    #[error("signer slot {slot} has no proof")]
    ProofMissing { slot: usize },

    #[error("signer slot {slot}: {source}")]
    Multisig {
        slot: usize,
        #[source]
        source: MultisigError,
    },

    #[error("signer not found in transaction")]
    SignerNotFound,

    #[error("failed to sign: {0}")]
    Signing(#[source] CryptoError),

    #[error("invalid signature #{index} from {origin}: {source}")]
    SignatureInvalid {
        index: usize,
        origin: SignatureOrigin,
        #[source]
        source: CryptoError,
    },

    #[error("malformed transaction: {0}")]
    Malformed(#[from] TypesError),

    #[error("call format: {0}")]
    CallFormat(#[from] CallFormatError),
}

impl TransactionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedVersion { .. } => ErrorKind::Version,
            Self::NoSigners | Self::Signing(_) => ErrorKind::Config,
            Self::Multisig { source, .. } => match source {
                MultisigError::InvalidConfig(_) => ErrorKind::Config,
                MultisigError::SignatureSetLength { .. }
                | MultisigError::InsufficientWeight { .. } => ErrorKind::Proof,
            },
            Self::ProofCountMismatch { .. }
            | Self::ProofTypeMismatch { .. }
            | Self::ProofMissing { .. }
            | Self::SignerNotFound => ErrorKind::Proof,
            Self::SignatureInvalid { .. } => ErrorKind::CryptoVerification,
            Self::Malformed(_) => ErrorKind::Encoding,
            Self::CallFormat(e) => e.kind(),
        }
    }
}

/// Errors from encoding calls and decoding their results.
#[derive(Debug, Error)]
pub enum CallFormatError {
    #[error("encrypted call format requires the runtime's call data public key")]
    MissingPublicKey,

    #[error("encrypted call must have an empty method")]
    NonEmptyMethod,

    #[error("call format can only be changed from plain")]
    FormatAlreadySet,

    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("malformed result: {0}")]
    MalformedResult(String),

    #[error("failed to seal: {0}")]
    Seal(#[source] CryptoError),

    #[error("failed to open envelope")]
    DecryptionFailed,

    #[error("unexpected plain result for an encrypted call")]
    UnexpectedResult,

    #[error("call failed: module={module} code={code}: {message}")]
    CallFailed {
        module: String,
        code: u32,
        message: String,
    },
}

impl CallFormatError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingPublicKey | Self::FormatAlreadySet | Self::Seal(_) => ErrorKind::Config,
            Self::DecryptionFailed => ErrorKind::CryptoVerification,
            Self::CallFailed { .. } => ErrorKind::Call,
            Self::NonEmptyMethod
            | Self::MalformedEnvelope(_)
            | Self::MalformedResult(_)
            | Self::UnexpectedResult => ErrorKind::Encoding,
        }
    }
}
