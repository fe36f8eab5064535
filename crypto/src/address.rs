//! Address derivation.
//!
//! Every scheme hashes `context || version || data` (see [`Address::new`]); they differ
//! in the context and in what `data` is:
//! - ed25519 and sr25519: the raw 32-byte public key
//! - secp256k1eth: the 20-byte Ethereum address of the key
//! - multisig: the canonical CBOR encoding of the config
//! - module: `module || "." || kind`

use k256::elliptic_curve::sec1::ToEncodedPoint;
use oasis_types::address::{
    ADDRESS_V0_ED25519_CONTEXT, ADDRESS_V0_MODULE_CONTEXT, ADDRESS_V0_MULTISIG_CONTEXT,
    ADDRESS_V0_SECP256K1ETH_CONTEXT, ADDRESS_V0_SR25519_CONTEXT, ADDRESS_V0_VERSION,
};
use oasis_types::{cbor, Address, MultisigConfig, PublicKey, SignatureAddressSpec};

use crate::error::CryptoError;
use crate::hash::keccak256;

/// Size of an Ethereum address.
pub const ETH_ADDRESS_SIZE: usize = 20;

/// Derive the address controlled by a signature address spec.
pub fn from_sigspec(spec: &SignatureAddressSpec) -> Result<Address, CryptoError> {
    Ok(match spec {
        SignatureAddressSpec::Ed25519(pk) => {
            Address::new(ADDRESS_V0_ED25519_CONTEXT, ADDRESS_V0_VERSION, pk)
        }
        SignatureAddressSpec::Secp256k1Eth(pk) => from_eth(&eth_address(pk)?),
        SignatureAddressSpec::Sr25519(pk) => {
            Address::new(ADDRESS_V0_SR25519_CONTEXT, ADDRESS_V0_VERSION, pk)
        }
    })
}

/// Derive the address a public key controls through its natural signature spec.
pub fn from_public_key(pk: &PublicKey) -> Result<Address, CryptoError> {
    from_sigspec(&SignatureAddressSpec::from_public_key(pk))
}

/// Derive a multisig account address from its canonical config encoding.
pub fn from_multisig(config: &MultisigConfig) -> Result<Address, CryptoError> {
    let encoded = cbor::to_vec(config).map_err(|e| CryptoError::Encoding(e.to_string()))?;
    Ok(Address::new(
        ADDRESS_V0_MULTISIG_CONTEXT,
        ADDRESS_V0_VERSION,
        &encoded,
    ))
}

/// Derive the address of a module-owned account, which has no signing key.
pub fn from_module(module: &str, kind: &[u8]) -> Address {
    let mut data = Vec::with_capacity(module.len() + 1 + kind.len());
    data.extend_from_slice(module.as_bytes());
    data.push(b'.');
    data.extend_from_slice(kind);
    Address::new(ADDRESS_V0_MODULE_CONTEXT, ADDRESS_V0_VERSION, &data)
}

/// Derive the address of an Ethereum account given its raw 20-byte address.
pub fn from_eth(eth: &[u8; ETH_ADDRESS_SIZE]) -> Address {
    Address::new(ADDRESS_V0_SECP256K1ETH_CONTEXT, ADDRESS_V0_VERSION, eth)
}

/// The Ethereum address of a compressed secp256k1 key: the low 20 bytes of the
/// Keccak-256 of the uncompressed, untagged point.
pub fn eth_address(pk: &[u8; 33]) -> Result<[u8; ETH_ADDRESS_SIZE], CryptoError> {
    let key = k256::PublicKey::from_sec1_bytes(pk)
        .map_err(|e| CryptoError::MalformedPublicKey(e.to_string()))?;
    let point = key.to_encoded_point(false);
    let digest = keccak256(&point.as_bytes()[1..]);
    let mut out = [0u8; ETH_ADDRESS_SIZE];
    out.copy_from_slice(&digest[32 - ETH_ADDRESS_SIZE..]);
    Ok(out)
}
