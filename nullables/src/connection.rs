//! Nullable connection: a paratime that executes nothing.
//!
//! Submitted transactions are verified the way a node would, recorded, and answered
//! with queued results. With a call data key pair configured it also acts as a
//! confidential paratime: encrypted calls are opened and results sealed back.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use ciborium::Value;
use oasis_crypto::{ChainContext, X25519KeyPair};
use oasis_transactions::{
    decode_call, encode_result, Call, CallDataPublicKey, CallFormatError, CallResult,
    QueryTransaction, RuntimeMetadata, UnverifiedTransaction,
};
use oasis_wallet_core::{Connection, WalletError};
use tracing::debug;

pub struct NullConnection {
    chain_context: ChainContext,
    call_data: Option<(X25519KeyPair, Option<u64>)>,
    /// Transactions as submitted.
    submitted: Mutex<Vec<UnverifiedTransaction>>,
    /// Calls as executed, after opening any envelope.
    executed: Mutex<Vec<Call>>,
    /// Gas estimation queries as received.
    queries: Mutex<Vec<QueryTransaction>>,
    results: Mutex<VecDeque<CallResult>>,
    gas_estimate: AtomicU64,
    round: AtomicU64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl NullConnection {
    pub fn new(chain_context: ChainContext) -> Self {
        Self {
            chain_context,
            call_data: None,
            submitted: Mutex::new(Vec::new()),
            executed: Mutex::new(Vec::new()),
            queries: Mutex::new(Vec::new()),
            results: Mutex::new(VecDeque::new()),
            gas_estimate: AtomicU64::new(0),
            round: AtomicU64::new(1),
        }
    }

    /// Accept encrypted calls sealed for `keypair`.
    pub fn with_call_data_keypair(mut self, keypair: X25519KeyPair, epoch: Option<u64>) -> Self {
        self.call_data = Some((keypair, epoch));
        self
    }

    /// Queue the result of the next executed call. Calls with nothing queued succeed
    /// with a null value.
    pub fn enqueue_result(&self, result: CallResult) {
        lock(&self.results).push_back(result);
    }

    pub fn set_gas_estimate(&self, gas: u64) {
        self.gas_estimate.store(gas, Ordering::Relaxed);
    }

    /// Get all submitted transactions (for assertions).
    pub fn submitted(&self) -> Vec<UnverifiedTransaction> {
        lock(&self.submitted).clone()
    }

    /// Get all executed calls in plain form (for assertions).
    pub fn executed(&self) -> Vec<Call> {
        lock(&self.executed).clone()
    }

    /// Get all gas estimation queries (for assertions).
    pub fn queries(&self) -> Vec<QueryTransaction> {
        lock(&self.queries).clone()
    }

    /// Clear all state.
    pub fn reset(&self) {
        lock(&self.submitted).clear();
        lock(&self.executed).clear();
        lock(&self.queries).clear();
        lock(&self.results).clear();
    }

    fn execute(&self, tx: UnverifiedTransaction) -> Result<CallResult, WalletError> {
        let verified = tx.verify(&self.chain_context)?;
        let round = self.round.fetch_add(1, Ordering::Relaxed);
        let index = {
            let mut submitted = lock(&self.submitted);
            submitted.push(tx);
            u32::try_from(submitted.len() - 1).unwrap_or(u32::MAX)
        };

        let (call, meta) = match &self.call_data {
            Some((keypair, _)) => decode_call(verified.call, keypair, index)?,
            None if verified.call.format.is_plain() => (verified.call, RuntimeMetadata::Empty),
            None => return Err(CallFormatError::MissingPublicKey.into()),
        };
        debug!(method = %call.method, round, index, "executing call");
        lock(&self.executed).push(call);

        let result = lock(&self.results)
            .pop_front()
            .unwrap_or(CallResult::Ok(Value::Null));
        Ok(encode_result(&result, &meta, round)?)
    }
}

impl Connection for NullConnection {
    fn chain_context(&self) -> &ChainContext {
        &self.chain_context
    }

    async fn call_data_public_key(&self) -> Result<CallDataPublicKey, WalletError> {
        let (keypair, epoch) = self
            .call_data
            .as_ref()
            .ok_or_else(|| WalletError::Node("paratime does not support encrypted calls".into()))?;
        Ok(CallDataPublicKey {
            public_key: keypair.public_bytes(),
            epoch: *epoch,
        })
    }

    async fn submit_tx(&self, tx: UnverifiedTransaction) -> Result<CallResult, WalletError> {
        self.execute(tx)
    }

    async fn estimate_gas(&self, query: QueryTransaction) -> Result<u64, WalletError> {
        query.validate_for_query()?;
        lock(&self.queries).push(query);
        Ok(self.gas_estimate.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oasis_crypto::{Ed25519Signer, Signer};
    use oasis_transactions::{decode_result, encode_call_with, CallFormat, Transaction};
    use oasis_types::{Namespace, SignatureAddressSpec};

    fn context() -> ChainContext {
        ChainContext::for_runtime(&Namespace::new([1u8; 32]), "null chain")
    }

    fn signed(method: &str) -> UnverifiedTransaction {
        sign(Call::new(method, &()).unwrap())
    }

    fn sign(call: Call) -> UnverifiedTransaction {
        let key = Ed25519Signer::from_seed(&[1u8; 32]);
        let mut tx = Transaction::new(call);
        tx.append_auth_signature(SignatureAddressSpec::from_public_key(&key.public_key()), 0);
        let mut signer = tx.prepare_for_signing().unwrap();
        signer.append_sign(&context(), &key).unwrap();
        signer.finalize().unwrap()
    }

    #[tokio::test]
    async fn records_and_replays() {
        let conn = NullConnection::new(context());
        conn.enqueue_result(CallResult::Ok(Value::Integer(7.into())));

        let first = conn.submit_tx(signed("a.First")).await.unwrap();
        assert_eq!(first, CallResult::Ok(Value::Integer(7.into())));
        let second = conn.submit_tx(signed("a.Second")).await.unwrap();
        assert_eq!(second, CallResult::Ok(Value::Null));

        assert_eq!(conn.submitted().len(), 2);
        let methods: Vec<String> = conn.executed().into_iter().map(|c| c.method).collect();
        assert_eq!(methods, vec!["a.First", "a.Second"]);

        conn.reset();
        assert!(conn.submitted().is_empty());
    }

    #[tokio::test]
    async fn rejects_wrong_chain() {
        let conn = NullConnection::new(ChainContext::for_runtime(
            &Namespace::new([2u8; 32]),
            "null chain",
        ));
        let err = conn.submit_tx(signed("a.First")).await.unwrap_err();
        assert!(matches!(err, WalletError::Transaction(_)));
        assert!(conn.submitted().is_empty());
    }

    #[tokio::test]
    async fn no_call_data_key() {
        let conn = NullConnection::new(context());
        assert!(conn.call_data_public_key().await.is_err());
    }

    #[tokio::test]
    async fn opens_calls_and_seals_results() {
        let conn = NullConnection::new(context())
            .with_call_data_keypair(X25519KeyPair::from_secret_bytes([3u8; 32]), Some(4));
        conn.enqueue_result(CallResult::Ok(Value::Text("sealed".into())));
        let key = conn.call_data_public_key().await.unwrap();
        assert_eq!(key.epoch, Some(4));

        let plain = Call::new("a.Secret", &()).unwrap();
        let (encoded, meta) = encode_call_with(
            &plain,
            CallFormat::EncryptedX25519DeoxysII,
            Some(&key),
            &mut crate::NullRandom::seeded(1),
        )
        .unwrap();
        let result = conn.submit_tx(sign(encoded)).await.unwrap();

        assert!(matches!(result, CallResult::Unknown(_)));
        assert_eq!(conn.executed(), vec![plain]);
        assert_eq!(
            decode_result(result, &meta).unwrap(),
            CallResult::Ok(Value::Text("sealed".into()))
        );
    }

    #[tokio::test]
    async fn records_gas_queries() {
        let conn = NullConnection::new(context());
        conn.set_gas_estimate(10);
        let tx = Transaction::new(Call::new("a.Query", &()).unwrap());
        let query = QueryTransaction::new(tx, None);
        assert_eq!(conn.estimate_gas(query.clone()).await.unwrap(), 10);
        assert_eq!(conn.queries(), vec![query]);

        conn.reset();
        assert!(conn.queries().is_empty());
    }
}
