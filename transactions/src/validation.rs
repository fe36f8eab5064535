//! Transaction verification.

use oasis_crypto::{verify, ChainContext};
use tracing::{debug, warn};

use crate::error::TransactionError;
use crate::transaction::{Transaction, UnverifiedTransaction};

impl UnverifiedTransaction {
    /// Decode the body, check its structure and verify every signature it requires
    /// under `context`.
    ///
    /// Checks run in slot order, and within a multisig slot in signer order. The first
    /// failing check aborts with its position and origin.
    pub fn verify(&self, context: &ChainContext) -> Result<Transaction, TransactionError> {
        let tx = Transaction::from_slice(&self.0)?;
        tx.validate_basic()?;

        let signer_info = &tx.auth_info.signer_info;
        if self.1.len() != signer_info.len() {
            return Err(TransactionError::ProofCountMismatch {
                expected: signer_info.len(),
                actual: self.1.len(),
            });
        }

        let mut checks = Vec::new();
        for (slot, (si, proof)) in signer_info.iter().zip(&self.1).enumerate() {
            checks.extend(si.address_spec.batch(slot, proof)?);
        }

        for (index, check) in checks.iter().enumerate() {
            verify(
                &check.public_key,
                context.as_bytes(),
                &self.0,
                &check.signature,
            )
            .map_err(|source| {
                warn!(index, origin = %check.origin, "signature verification failed");
                TransactionError::SignatureInvalid {
                    index,
                    origin: check.origin,
                    source,
                }
            })?;
        }

        debug!(
            signers = signer_info.len(),
            signatures = checks.len(),
            "transaction verified"
        );
        Ok(tx)
    }
}
