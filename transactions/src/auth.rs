//! Signer slots and the proofs that authenticate them.

use oasis_crypto::{address, CryptoError};
use oasis_types::{Address, MultisigConfig, PublicKey, Signature, SignatureAddressSpec};
use serde::{Deserialize, Serialize};

use crate::error::{SignatureOrigin, TransactionError};

/// How one signer slot derives its address and proves ownership.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressSpec {
    #[serde(rename = "signature")]
    Signature(SignatureAddressSpec),
    #[serde(rename = "multisig")]
    Multisig(MultisigConfig),
}

/// A signature check a proof requires, tagged with where it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureCheck {
    pub origin: SignatureOrigin,
    pub public_key: PublicKey,
    pub signature: Signature,
}

impl AddressSpec {
    /// The single public key of a signature spec.
    pub fn public_key(&self) -> Option<PublicKey> {
        match self {
            Self::Signature(spec) => Some(spec.public_key()),
            Self::Multisig(_) => None,
        }
    }

    pub fn address(&self) -> Result<Address, CryptoError> {
        match self {
            Self::Signature(spec) => address::from_sigspec(spec),
            Self::Multisig(config) => address::from_multisig(config),
        }
    }

    /// The caller as the runtime sees it. Ethereum-compatible keys are identified by
    /// their Ethereum address.
    pub fn caller_address(&self) -> Result<CallerAddress, CryptoError> {
        match self {
            Self::Signature(SignatureAddressSpec::Secp256k1Eth(pk)) => {
                Ok(CallerAddress::EthAddress(address::eth_address(pk)?))
            }
            _ => Ok(CallerAddress::Address(self.address()?)),
        }
    }

    /// Check that `proof` has the right shape for this spec and list the signature
    /// checks it requires. Signatures are not verified here.
    pub fn batch(
        &self,
        slot: usize,
        proof: &AuthProof,
    ) -> Result<Vec<SignatureCheck>, TransactionError> {
        match (self, proof) {
            (Self::Signature(spec), AuthProof::Signature(signature)) => Ok(vec![SignatureCheck {
                origin: SignatureOrigin {
                    slot,
                    sub_slot: None,
                },
                public_key: spec.public_key(),
                signature: signature.clone(),
            }]),
            (Self::Multisig(config), AuthProof::Multisig(signatures)) => {
                let checks = config
                    .batch(signatures)
                    .map_err(|source| TransactionError::Multisig { slot, source })?;
                Ok(checks
                    .into_iter()
                    .map(|c| SignatureCheck {
                        origin: SignatureOrigin {
                            slot,
                            sub_slot: Some(c.sub_slot),
                        },
                        public_key: c.public_key,
                        signature: c.signature,
                    })
                    .collect())
            }
            _ => Err(TransactionError::ProofTypeMismatch { slot }),
        }
    }
}

/// One signer slot: who signs and the signer account's nonce.
///
/// Fields are declared in canonical CBOR key order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignerInfo {
    pub nonce: u64,
    pub address_spec: AddressSpec,
}

impl SignerInfo {
    pub fn new_sigspec(spec: SignatureAddressSpec, nonce: u64) -> Self {
        Self {
            nonce,
            address_spec: AddressSpec::Signature(spec),
        }
    }

    pub fn new_multisig(config: MultisigConfig, nonce: u64) -> Self {
        Self {
            nonce,
            address_spec: AddressSpec::Multisig(config),
        }
    }
}

/// Authentication data for one signer slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthProof {
    #[serde(rename = "signature")]
    Signature(Signature),
    /// One entry per signer of the multisig config; `None` where that signer has not
    /// signed.
    #[serde(rename = "multisig")]
    Multisig(Vec<Option<Signature>>),
}

/// The address a call is attributed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallerAddress {
    #[serde(rename = "address")]
    Address(Address),
    #[serde(rename = "eth_address")]
    EthAddress(
        #[serde(with = "oasis_types::bytes::fixed")] [u8; address::ETH_ADDRESS_SIZE],
    ),
}

impl CallerAddress {
    pub fn address(&self) -> Address {
        match self {
            Self::Address(address) => *address,
            Self::EthAddress(eth) => address::from_eth(eth),
        }
    }

    /// The same kind of caller with an all-zero address.
    pub fn zeroized(&self) -> Self {
        match self {
            Self::Address(_) => Self::Address(Address::default()),
            Self::EthAddress(_) => Self::EthAddress([0u8; address::ETH_ADDRESS_SIZE]),
        }
    }
}
