//! Cryptographic primitives for the runtime client SDK.
//!
//! - **Ed25519**, **Secp256k1** (ECDSA) and **Sr25519** signing, always under a
//!   domain-separation context
//! - **SHA-512/256** and **Keccak-256** hashing
//! - Address derivation from keys, multisig configs and module names
//! - **X25519** key agreement with **Deoxys-II-256-128** for sealed call data

pub mod address;
pub mod context;
pub mod encryption;
pub mod error;
pub mod hash;
pub mod keys;
pub mod sign;

pub use context::{ChainContext, SIGNATURE_CONTEXT_BASE};
pub use encryption::{box_open, box_seal, X25519KeyPair};
pub use error::CryptoError;
pub use hash::{keccak256, sha512_256};
pub use keys::{Ed25519Signer, Secp256k1Signer, Sr25519Signer};
pub use sign::{verify, Signer};
