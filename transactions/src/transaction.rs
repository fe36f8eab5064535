//! The transaction envelope and its canonical CBOR encoding.
//!
//! Struct fields are declared in canonical key order (shorter names first, then
//! bytewise) and default-valued optional fields are skipped, so serde + ciborium emit
//! the canonical encoding directly.

use ciborium::Value;
use oasis_types::{cbor, BaseUnits, Hash};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::auth::{AddressSpec, AuthProof, SignerInfo};
use crate::error::TransactionError;
use crate::signer::TransactionSigner;
use crate::LATEST_TRANSACTION_VERSION;
use oasis_types::{MultisigConfig, SignatureAddressSpec};

/// Format of the call body (and of its result).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CallFormat {
    /// Plain CBOR body.
    #[default]
    Plain = 0,
    /// Body sealed with X25519 key agreement and Deoxys-II.
    EncryptedX25519DeoxysII = 1,
}

impl CallFormat {
    pub fn is_plain(&self) -> bool {
        matches!(self, Self::Plain)
    }

    pub fn is_encrypted(&self) -> bool {
        !self.is_plain()
    }
}

impl Serialize for CallFormat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

impl<'de> Deserialize<'de> for CallFormat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(Self::Plain),
            1 => Ok(Self::EncryptedX25519DeoxysII),
            other => Err(D::Error::custom(format!("unknown call format: {other}"))),
        }
    }
}

fn is_false(v: &bool) -> bool {
    !*v
}

fn is_zero_u64(v: &u64) -> bool {
    *v == 0
}

fn is_zero_u32(v: &u32) -> bool {
    *v == 0
}

/// A method call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Call {
    /// A read-only call cannot change runtime state.
    #[serde(rename = "ro", default, skip_serializing_if = "is_false")]
    pub read_only: bool,
    pub body: Value,
    #[serde(default, skip_serializing_if = "CallFormat::is_plain")]
    pub format: CallFormat,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub method: String,
}

impl Call {
    /// A plain call of `method` with `body` converted to a CBOR value.
    pub fn new<B: Serialize>(method: &str, body: &B) -> Result<Self, TransactionError> {
        let body = Value::serialized(body)
            .map_err(|e| oasis_types::TypesError::Encoding(e.to_string()))?;
        Ok(Self {
            method: method.to_string(),
            body,
            ..Default::default()
        })
    }

    /// Convert the body into a concrete type.
    pub fn body_as<T: serde::de::DeserializeOwned>(&self) -> Result<T, TransactionError> {
        Ok(self
            .body
            .deserialized()
            .map_err(|e| oasis_types::TypesError::Decoding(e.to_string()))?)
    }
}

impl Default for Call {
    fn default() -> Self {
        Self {
            read_only: false,
            body: Value::Null,
            format: CallFormat::Plain,
            method: String::new(),
        }
    }
}

/// Module-specific fee payer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeProxy {
    #[serde(with = "serde_bytes")]
    pub id: Vec<u8>,
    pub module: String,
}

/// Transaction fee.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fee {
    /// Maximum amount of gas paid for.
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub gas: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<FeeProxy>,
    pub amount: BaseUnits,
    /// Maximum number of emitted consensus messages paid for. Zero means no limit
    /// beyond the per-batch maximum.
    #[serde(default, skip_serializing_if = "is_zero_u32")]
    pub consensus_messages: u32,
}

impl Fee {
    /// Fee amount per unit of gas, or zero when no gas is paid for.
    pub fn gas_price(&self) -> u128 {
        self.amount
            .amount()
            .checked_div(u128::from(self.gas))
            .map(|q| q.raw())
            .unwrap_or_default()
    }
}

/// Who signs the transaction and what it pays.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthInfo {
    #[serde(rename = "si")]
    pub signer_info: Vec<SignerInfo>,
    pub fee: Fee,
    /// Latest round in which the transaction is valid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_after: Option<u64>,
    /// Earliest round in which the transaction is valid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_before: Option<u64>,
}

/// A versioned transaction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Transaction {
    #[serde(rename = "v")]
    pub version: u16,
    #[serde(rename = "ai")]
    pub auth_info: AuthInfo,
    pub call: Call,
}

impl Transaction {
    /// An unsigned transaction at the latest version with default fee and no signers.
    pub fn new(call: Call) -> Self {
        Self {
            version: LATEST_TRANSACTION_VERSION,
            auth_info: AuthInfo::default(),
            call,
        }
    }

    pub fn fee_gas(&self) -> u64 {
        self.auth_info.fee.gas
    }

    pub fn set_fee_gas(&mut self, gas: u64) {
        self.auth_info.fee.gas = gas;
    }

    pub fn fee_amount(&self) -> &BaseUnits {
        &self.auth_info.fee.amount
    }

    pub fn set_fee_amount(&mut self, amount: BaseUnits) {
        self.auth_info.fee.amount = amount;
    }

    pub fn set_fee_consensus_messages(&mut self, consensus_messages: u32) {
        self.auth_info.fee.consensus_messages = consensus_messages;
    }

    /// Have `module` pay the fee on behalf of the signer identified by `id`.
    pub fn set_fee_proxy(&mut self, module: &str, id: &[u8]) {
        self.auth_info.fee.proxy = Some(FeeProxy {
            id: id.to_vec(),
            module: module.to_string(),
        });
    }

    pub fn set_valid_rounds(&mut self, not_before: Option<u64>, not_after: Option<u64>) {
        self.auth_info.not_before = not_before;
        self.auth_info.not_after = not_after;
    }

    pub fn append_signer_info(&mut self, address_spec: AddressSpec, nonce: u64) {
        self.auth_info.signer_info.push(SignerInfo {
            nonce,
            address_spec,
        });
    }

    pub fn append_auth_signature(&mut self, spec: SignatureAddressSpec, nonce: u64) {
        self.append_signer_info(AddressSpec::Signature(spec), nonce);
    }

    pub fn append_auth_multisig(&mut self, config: MultisigConfig, nonce: u64) {
        self.append_signer_info(AddressSpec::Multisig(config), nonce);
    }

    /// Stateless checks: supported version and at least one signer.
    pub fn validate_basic(&self) -> Result<(), TransactionError> {
        self.validate_version()?;
        if self.auth_info.signer_info.is_empty() {
            return Err(TransactionError::NoSigners);
        }
        Ok(())
    }

    pub(crate) fn validate_version(&self) -> Result<(), TransactionError> {
        if self.version != LATEST_TRANSACTION_VERSION {
            return Err(TransactionError::UnsupportedVersion {
                expected: LATEST_TRANSACTION_VERSION,
                actual: self.version,
            });
        }
        Ok(())
    }

    /// Canonical CBOR encoding.
    pub fn to_vec(&self) -> Result<Vec<u8>, TransactionError> {
        Ok(cbor::to_vec(self)?)
    }

    /// Decode a transaction. The version is not checked here; see
    /// [`Transaction::validate_basic`].
    pub fn from_slice(data: &[u8]) -> Result<Self, TransactionError> {
        Ok(cbor::from_slice(data)?)
    }

    /// Start collecting signatures for this transaction.
    pub fn prepare_for_signing(self) -> Result<TransactionSigner, TransactionError> {
        TransactionSigner::new(self)
    }
}

/// A transaction body together with its authentication proofs, one per signer slot.
///
/// Encodes as the two-element array `[body, proofs]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnverifiedTransaction(#[serde(with = "serde_bytes")] pub Vec<u8>, pub Vec<AuthProof>);

impl UnverifiedTransaction {
    pub fn body(&self) -> &[u8] {
        &self.0
    }

    pub fn auth_proofs(&self) -> &[AuthProof] {
        &self.1
    }

    pub fn to_vec(&self) -> Result<Vec<u8>, TransactionError> {
        Ok(cbor::to_vec(self)?)
    }

    pub fn from_slice(data: &[u8]) -> Result<Self, TransactionError> {
        Ok(cbor::from_slice(data)?)
    }

    /// SHA-512/256 of the canonical encoding, as used to identify submitted transactions.
    pub fn hash(&self) -> Result<Hash, TransactionError> {
        Ok(Hash::digest_bytes(&self.to_vec()?))
    }
}
