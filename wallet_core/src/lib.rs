//! Wallet core library for runtime clients.
//!
//! Provides what a wallet application needs on top of the transaction crate:
//! - Network and paratime configuration loaded from TOML
//! - Signer construction by algorithm name
//! - The [`Connection`] capability a node client implements
//! - Transaction building, signing, submission and result decoding

pub mod config;
pub mod connection;
pub mod error;
pub mod keys;
pub mod transaction_builder;

pub use config::{DenominationInfo, Network, Networks, ParaTime, ParaTimes};
pub use connection::Connection;
pub use error::WalletError;
pub use keys::{SignerFactory, SignerRegistry};
pub use transaction_builder::TransactionBuilder;
