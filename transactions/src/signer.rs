//! Incremental transaction signing.
//!
//! A [`TransactionSigner`] holds the canonical body and one proof slot per signer.
//! Signers are appended one at a time; a single signer fills every slot (solo or
//! multisig) that lists its key. Whether enough weight was collected is only checked
//! at verification time, so partially signed multisig transactions can circulate for
//! co-signing.

use oasis_crypto::{ChainContext, Signer};
use oasis_types::Signature;
use tracing::debug;

use crate::auth::{AddressSpec, AuthProof, SignerInfo};
use crate::error::TransactionError;
use crate::transaction::{Transaction, UnverifiedTransaction};

pub struct TransactionSigner {
    signer_info: Vec<SignerInfo>,
    body: Vec<u8>,
    proofs: Vec<Option<AuthProof>>,
}

impl TransactionSigner {
    /// Encode `tx` and allocate empty proofs for each of its signer slots.
    pub fn new(tx: Transaction) -> Result<Self, TransactionError> {
        let body = tx.to_vec()?;
        let proofs = tx
            .auth_info
            .signer_info
            .iter()
            .map(|si| match &si.address_spec {
                AddressSpec::Signature(_) => None,
                AddressSpec::Multisig(config) => {
                    Some(AuthProof::Multisig(vec![None; config.signers().len()]))
                }
            })
            .collect::<Vec<_>>();
        debug!(slots = proofs.len(), "allocated auth proofs");
        Ok(Self {
            signer_info: tx.auth_info.signer_info,
            body,
            proofs,
        })
    }

    /// Resume signing a transaction someone else already partially signed.
    pub fn from_unverified(ut: UnverifiedTransaction) -> Result<Self, TransactionError> {
        let tx = Transaction::from_slice(&ut.0)?;
        if ut.1.len() != tx.auth_info.signer_info.len() {
            return Err(TransactionError::ProofCountMismatch {
                expected: tx.auth_info.signer_info.len(),
                actual: ut.1.len(),
            });
        }
        Ok(Self {
            signer_info: tx.auth_info.signer_info,
            body: ut.0,
            proofs: ut.1.into_iter().map(Some).collect(),
        })
    }

    /// The canonical body every signer signs.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Sign the body under `context` and place the signature in every slot that lists
    /// the signer's public key.
    pub fn append_sign<S: Signer + ?Sized>(
        &mut self,
        context: &ChainContext,
        signer: &S,
    ) -> Result<(), TransactionError> {
        let public_key = signer.public_key();
        let mut signature: Option<Signature> = None;
        let mut sign = |body: &[u8]| -> Result<Signature, TransactionError> {
            if let Some(sig) = &signature {
                return Ok(sig.clone());
            }
            let sig = signer
                .sign(context.as_bytes(), body)
                .map_err(TransactionError::Signing)?;
            signature = Some(sig.clone());
            Ok(sig)
        };

        let mut matched = false;
        for (slot, (si, proof)) in self
            .signer_info
            .iter()
            .zip(self.proofs.iter_mut())
            .enumerate()
        {
            match (&si.address_spec, proof) {
                (AddressSpec::Signature(spec), proof) => {
                    if spec.public_key() != public_key {
                        continue;
                    }
                    *proof = Some(AuthProof::Signature(sign(&self.body)?));
                    matched = true;
                    debug!(slot, "signed");
                }
                (AddressSpec::Multisig(config), Some(AuthProof::Multisig(signatures))) => {
                    if signatures.len() != config.signers().len() {
                        return Err(TransactionError::ProofTypeMismatch { slot });
                    }
                    for (sub_slot, member) in config.signers().iter().enumerate() {
                        if member.public_key != public_key {
                            continue;
                        }
                        signatures[sub_slot] = Some(sign(&self.body)?);
                        matched = true;
                        debug!(slot, sub_slot, "signed multisig");
                    }
                }
                (AddressSpec::Multisig(_), _) => {
                    return Err(TransactionError::ProofTypeMismatch { slot });
                }
            }
        }

        if !matched {
            return Err(TransactionError::SignerNotFound);
        }
        Ok(())
    }

    /// Finish signing. Every solo slot must be signed; multisig slots may still be
    /// short of their threshold.
    pub fn finalize(self) -> Result<UnverifiedTransaction, TransactionError> {
        let proofs = self
            .proofs
            .into_iter()
            .enumerate()
            .map(|(slot, proof)| proof.ok_or(TransactionError::ProofMissing { slot }))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(UnverifiedTransaction(self.body, proofs))
    }
}
