//! Runtime transactions: the envelope, multi-party signing, verification and
//! confidential call encoding.
//!
//! The flow on the client side is:
//! 1. build a [`Transaction`] around a [`Call`] and append one signer info per signer;
//! 2. [`Transaction::prepare_for_signing`] and [`TransactionSigner::append_sign`] once
//!    per key, possibly on different machines via [`TransactionSigner::from_unverified`];
//! 3. [`TransactionSigner::finalize`] into an [`UnverifiedTransaction`] and submit it.
//!
//! Nodes run [`UnverifiedTransaction::verify`] to recover the transaction.

pub mod auth;
pub mod callformat;
pub mod error;
pub mod query;
pub mod result;
pub mod signer;
pub mod transaction;
pub mod validation;

/// The only transaction version accepted.
pub const LATEST_TRANSACTION_VERSION: u16 = 1;

pub use auth::{AddressSpec, AuthProof, CallerAddress, SignatureCheck, SignerInfo};
pub use callformat::{
    decode_call, decode_result, encode_call, encode_call_with, encode_result, CallDataPublicKey,
    Metadata, RuntimeMetadata,
};
pub use error::{CallFormatError, ErrorKind, SignatureOrigin, TransactionError};
pub use query::QueryTransaction;
pub use result::CallResult;
pub use signer::TransactionSigner;
pub use transaction::{
    AuthInfo, Call, CallFormat, Fee, FeeProxy, Transaction, UnverifiedTransaction,
};
