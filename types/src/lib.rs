//! Fundamental types for the runtime client SDK.
//!
//! This crate defines the plain data types shared across every other crate in the
//! workspace: addresses, hashes, public keys, token amounts, runtime identifiers and
//! multisig configurations. Nothing here performs signing or encryption; see
//! `oasis-crypto` for that.

pub mod address;
pub mod amount;
pub mod bytes;
pub mod cbor;
pub mod error;
pub mod hash;
pub mod keys;
pub mod multisig;
pub mod network;

pub use address::{Address, ADDRESS_SIZE, ADDRESS_V0_VERSION};
pub use amount::{BaseUnits, Denomination, Quantity};
pub use error::TypesError;
pub use hash::Hash;
pub use keys::{PublicKey, Signature, SignatureAddressSpec};
pub use multisig::{ConfigViolation, MultisigCheck, MultisigConfig, MultisigError, MultisigSigner};
pub use network::Namespace;
