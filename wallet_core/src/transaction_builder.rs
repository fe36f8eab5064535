//! Transaction building, signing and submission against a [`Connection`].

use ciborium::Value;
use oasis_crypto::Signer;
use oasis_transactions::{
    decode_result, encode_call_with, CallFormat, CallFormatError, CallResult,
    CallerAddress, Metadata, QueryTransaction, Transaction, TransactionSigner,
};
use oasis_types::{BaseUnits, MultisigConfig, SignatureAddressSpec};
use rand::rngs::OsRng;
use rand_core::CryptoRngCore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::connection::Connection;
use crate::error::WalletError;

/// Builds one transaction for the paratime behind `conn`.
///
/// Typical use: set fees and signers, optionally switch to an encrypted call format,
/// [`append_sign`](Self::append_sign) with each key, then [`submit`](Self::submit).
/// The ephemeral key of an encrypted call lives in the builder and is dropped with it.
pub struct TransactionBuilder<'a, C: Connection> {
    conn: &'a C,
    tx: Transaction,
    meta: Metadata,
    signer: Option<TransactionSigner>,
}

impl<'a, C: Connection> TransactionBuilder<'a, C> {
    /// A plain call of `method` with `body`.
    pub fn new<B: Serialize>(conn: &'a C, method: &str, body: &B) -> Result<Self, WalletError> {
        let call = oasis_transactions::Call::new(method, body)?;
        Ok(Self {
            conn,
            tx: Transaction::new(call),
            meta: Metadata::Empty,
            signer: None,
        })
    }

    pub fn set_fee_amount(&mut self, amount: BaseUnits) -> &mut Self {
        self.tx.set_fee_amount(amount);
        self
    }

    pub fn set_fee_gas(&mut self, gas: u64) -> &mut Self {
        self.tx.set_fee_gas(gas);
        self
    }

    pub fn set_fee_consensus_messages(&mut self, consensus_messages: u32) -> &mut Self {
        self.tx.set_fee_consensus_messages(consensus_messages);
        self
    }

    pub fn set_fee_proxy(&mut self, module: &str, id: &[u8]) -> &mut Self {
        self.tx.set_fee_proxy(module, id);
        self
    }

    pub fn set_not_before(&mut self, round: u64) -> &mut Self {
        self.tx.auth_info.not_before = Some(round);
        self
    }

    pub fn set_not_after(&mut self, round: u64) -> &mut Self {
        self.tx.auth_info.not_after = Some(round);
        self
    }

    pub fn read_only(&mut self) -> &mut Self {
        self.tx.call.read_only = true;
        self
    }

    pub fn append_auth_signature(&mut self, spec: SignatureAddressSpec, nonce: u64) -> &mut Self {
        self.tx.append_auth_signature(spec, nonce);
        self
    }

    pub fn append_auth_multisig(&mut self, config: MultisigConfig, nonce: u64) -> &mut Self {
        self.tx.append_auth_multisig(config, nonce);
        self
    }

    /// The transaction as built so far.
    pub fn transaction(&self) -> &Transaction {
        &self.tx
    }

    /// Switch the call to `format`. Only possible while the call is still plain.
    pub async fn set_call_format(&mut self, format: CallFormat) -> Result<(), WalletError> {
        self.set_call_format_with(format, &mut OsRng).await
    }

    /// Like [`set_call_format`](Self::set_call_format) with an explicit random source
    /// for the ephemeral key pair and nonce.
    pub async fn set_call_format_with<R: CryptoRngCore + Send>(
        &mut self,
        format: CallFormat,
        rng: &mut R,
    ) -> Result<(), WalletError> {
        if !self.tx.call.format.is_plain() || !matches!(self.meta, Metadata::Empty) {
            return Err(CallFormatError::FormatAlreadySet.into());
        }
        if self.signer.is_some() {
            return Err(WalletError::TransactionBuild(
                "cannot change call format after signing started".into(),
            ));
        }
        let key = match format {
            CallFormat::Plain => return Ok(()),
            CallFormat::EncryptedX25519DeoxysII => Some(self.conn.call_data_public_key().await?),
        };
        let (call, meta) = encode_call_with(&self.tx.call, format, key.as_ref(), rng)?;
        self.tx.call = call;
        self.meta = meta;
        debug!(?format, "call format set");
        Ok(())
    }

    /// Estimate gas by simulating the transaction as `caller`, then set it as the fee gas.
    ///
    /// For encrypted calls the caller is replaced by the zero address of the same kind
    /// so the query does not reveal who is about to submit.
    pub async fn estimate_gas(&mut self, caller: Option<CallerAddress>) -> Result<u64, WalletError> {
        let caller = if self.tx.call.format.is_encrypted() {
            caller.map(|c| c.zeroized())
        } else {
            caller
        };
        let query = QueryTransaction::new(self.tx.clone(), caller);
        let gas = self.conn.estimate_gas(query).await?;
        self.tx.set_fee_gas(gas);
        Ok(gas)
    }

    /// Sign with `signer`, which must appear in one of the signer slots.
    ///
    /// The body is frozen at the first signature; later changes to fees or signers
    /// are rejected.
    pub fn append_sign<S: Signer + ?Sized>(&mut self, signer: &S) -> Result<(), WalletError> {
        let ts = match self.signer.take() {
            Some(ts) => ts,
            None => self.tx.clone().prepare_for_signing()?,
        };
        self.signer
            .insert(ts)
            .append_sign(self.conn.chain_context(), signer)?;
        Ok(())
    }

    /// Submit the signed transaction and decode its result.
    ///
    /// A failed call is reported as [`CallFormatError::CallFailed`].
    pub async fn submit(self) -> Result<Value, WalletError> {
        let signer = self.signer.ok_or_else(|| {
            WalletError::TransactionBuild("unable to submit unsigned transaction".into())
        })?;
        if signer.body() != self.tx.to_vec()?.as_slice() {
            return Err(WalletError::TransactionBuild(
                "transaction changed after signing".into(),
            ));
        }
        let ut = signer.finalize()?;
        let hash = ut.hash()?;
        info!(%hash, signers = ut.auth_proofs().len(), "submitting transaction");

        let result = self.conn.submit_tx(ut).await?;
        match decode_result(result, &self.meta)? {
            CallResult::Ok(value) => Ok(value),
            CallResult::Failed {
                module,
                code,
                message,
            } => Err(CallFormatError::CallFailed {
                module,
                code,
                message,
            }
            .into()),
            CallResult::Unknown(_) => Err(CallFormatError::MalformedResult(
                "inner result of a call cannot be unknown".into(),
            )
            .into()),
        }
    }

    /// Submit and convert the successful result into `T`.
    pub async fn submit_as<T: DeserializeOwned>(self) -> Result<T, WalletError> {
        let value = self.submit().await?;
        value
            .deserialized()
            .map_err(|e| CallFormatError::MalformedResult(e.to_string()).into())
    }

    /// Sign with every signer and submit.
    pub async fn sign_and_submit(mut self, signers: &[&dyn Signer]) -> Result<Value, WalletError> {
        for signer in signers {
            self.append_sign(*signer)?;
        }
        self.submit().await
    }
}
