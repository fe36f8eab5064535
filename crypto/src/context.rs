//! Domain-separation contexts for transaction signatures.
//!
//! A transaction signature is bound to one runtime on one consensus chain: the
//! context is `base || " for chain " || hex(SHA512_256(runtime_id || chain_context))`.
//! Signing the same body under a different runtime or chain yields a signature that
//! does not verify.

use oasis_types::Namespace;

use crate::error::CryptoError;
use crate::hash::sha512_256_multi;

/// Base of every transaction signature context.
pub const SIGNATURE_CONTEXT_BASE: &[u8] = b"oasis-runtime-sdk/tx: v0";

/// Longest context any signer accepts.
pub const MAX_CONTEXT_SIZE: usize = 255;

const CHAIN_SEPARATOR: &[u8] = b" for chain ";

/// A fully derived signature context.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChainContext(Vec<u8>);

impl ChainContext {
    /// Derive the transaction signature context for a runtime on a consensus chain.
    ///
    /// `consensus_chain_context` is the consensus layer's own chain context, given in
    /// its usual hex text form.
    pub fn for_runtime(runtime_id: &Namespace, consensus_chain_context: &str) -> Self {
        Self::derive(SIGNATURE_CONTEXT_BASE, runtime_id, consensus_chain_context)
    }

    /// Derive a context from an arbitrary base.
    pub fn derive(base: &[u8], runtime_id: &Namespace, consensus_chain_context: &str) -> Self {
        let digest = sha512_256_multi(&[runtime_id.as_ref(), consensus_chain_context.as_bytes()]);
        let mut out = Vec::with_capacity(base.len() + CHAIN_SEPARATOR.len() + 64);
        out.extend_from_slice(base);
        out.extend_from_slice(CHAIN_SEPARATOR);
        out.extend_from_slice(hex::encode(digest).as_bytes());
        Self(out)
    }

    /// Use an already derived context as is.
    pub fn raw(context: impl Into<Vec<u8>>) -> Result<Self, CryptoError> {
        let context = context.into();
        check_context(&context)?;
        Ok(Self(context))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for ChainContext {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Reject contexts no signer accepts.
pub fn check_context(context: &[u8]) -> Result<(), CryptoError> {
    if context.len() > MAX_CONTEXT_SIZE {
        return Err(CryptoError::ContextTooLong(context.len()));
    }
    Ok(())
}
