//! The node-facing capability the wallet needs.
//!
//! Transport is out of scope here: a gRPC client, an in-process runtime or a test
//! double all implement [`Connection`] for one configured paratime.

use std::future::Future;

use oasis_crypto::ChainContext;
use oasis_transactions::{CallDataPublicKey, CallResult, QueryTransaction, UnverifiedTransaction};

use crate::error::WalletError;

pub trait Connection: Send + Sync {
    /// The context transactions for this paratime are signed under.
    fn chain_context(&self) -> &ChainContext;

    /// The paratime's current call data public key, for encrypted calls.
    fn call_data_public_key(
        &self,
    ) -> impl Future<Output = Result<CallDataPublicKey, WalletError>> + Send;

    /// Submit a signed transaction and wait for its execution result.
    fn submit_tx(
        &self,
        tx: UnverifiedTransaction,
    ) -> impl Future<Output = Result<CallResult, WalletError>> + Send;

    /// Simulate an unsigned transaction and return the gas it would use.
    fn estimate_gas(
        &self,
        query: QueryTransaction,
    ) -> impl Future<Output = Result<u64, WalletError>> + Send;
}
