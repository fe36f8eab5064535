use oasis_crypto::CryptoError;
use oasis_transactions::{CallFormatError, ErrorKind, TransactionError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("key error: {0}")]
    Key(String),

    #[error("unknown signer algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("signer algorithm already registered: {0}")]
    DuplicateAlgorithm(String),

    #[error("transaction building error: {0}")]
    TransactionBuild(String),

    #[error(transparent)]
    Transaction(#[from] TransactionError),

    #[error(transparent)]
    CallFormat(#[from] CallFormatError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error("node RPC error: {0}")]
    Node(String),
}

impl WalletError {
    /// The transaction-level classification, if the failure came from one.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Transaction(e) => Some(e.kind()),
            Self::CallFormat(e) => Some(e.kind()),
            Self::Config(_) | Self::Key(_) | Self::UnknownAlgorithm(_) | Self::DuplicateAlgorithm(_) => {
                Some(ErrorKind::Config)
            }
            Self::Crypto(_) | Self::TransactionBuild(_) | Self::Node(_) => None,
        }
    }
}
