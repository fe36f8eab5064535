//! Error type for decoding and validating fundamental types.

use thiserror::Error;

/// Errors raised while parsing or decoding the types in this crate.
#[derive(Debug, Error)]
pub enum TypesError {
    #[error("malformed address: {0}")]
    MalformedAddress(String),

    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("invalid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("invalid denomination: {0}")]
    InvalidDenomination(String),

    #[error("cbor encoding error: {0}")]
    Encoding(String),

    #[error("cbor decoding error: {0}")]
    Decoding(String),
}

/// The specific rule a [`crate::MultisigConfig`] breaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigViolation {
    #[error("threshold is zero")]
    ZeroThreshold,

    #[error("duplicate signer public key")]
    DuplicateKey,

    #[error("signer weight is zero")]
    ZeroWeight,

    #[error("total signer weight overflows")]
    WeightOverflow,

    #[error("total signer weight is below the threshold")]
    UnreachableThreshold,
}

/// Errors from validating a multisig configuration or batching its proofs.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum MultisigError {
    #[error("invalid multisig config: {0}")]
    InvalidConfig(#[from] ConfigViolation),

    #[error("multisig proof has {actual} signature slots, config has {expected} signers")]
    SignatureSetLength { expected: usize, actual: usize },

    #[error("insufficient signature weight: have {have}, need {need}")]
    InsufficientWeight { have: u64, need: u64 },
}
