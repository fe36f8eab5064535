//! Weighted threshold signer configurations.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub use crate::error::{ConfigViolation, MultisigError};
use crate::keys::{PublicKey, Signature};

/// One member of a multisig account.
///
/// Fields are declared in canonical CBOR key order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MultisigSigner {
    pub weight: u64,
    pub public_key: PublicKey,
}

impl MultisigSigner {
    pub fn new(public_key: PublicKey, weight: u64) -> Self {
        Self { weight, public_key }
    }
}

/// A weighted signer set with an authorization threshold.
///
/// The canonical CBOR encoding of this value is what the multisig address commits to,
/// so field and signer order matter.
///
/// Neither [`MultisigConfig::new`] nor deserialization checks the config. The rules of
/// [`MultisigConfig::validate_basic`] are enforced when a proof is checked against it
/// in [`MultisigConfig::batch`], so a decoded config is not known to be valid until then.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MultisigConfig {
    signers: Vec<MultisigSigner>,
    threshold: u64,
}

/// A signature a multisig proof supplies for one signer, tagged with the signer's
/// position in the config.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultisigCheck {
    pub sub_slot: usize,
    pub public_key: PublicKey,
    pub signature: Signature,
}

impl MultisigConfig {
    /// Unchecked; see [`MultisigConfig::validate_basic`].
    pub fn new(signers: Vec<MultisigSigner>, threshold: u64) -> Self {
        Self { signers, threshold }
    }

    pub fn signers(&self) -> &[MultisigSigner] {
        &self.signers
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    /// Sum of all signer weights, or `None` on overflow.
    pub fn total_weight(&self) -> Option<u64> {
        self.signers
            .iter()
            .try_fold(0u64, |acc, s| acc.checked_add(s.weight))
    }

    /// Check the structural rules: nonzero threshold, unique keys, nonzero weights,
    /// no weight overflow, and a reachable threshold.
    pub fn validate_basic(&self) -> Result<(), MultisigError> {
        if self.threshold == 0 {
            return Err(ConfigViolation::ZeroThreshold.into());
        }
        let mut seen = HashSet::with_capacity(self.signers.len());
        let mut total: u64 = 0;
        for signer in &self.signers {
            if !seen.insert(signer.public_key) {
                return Err(ConfigViolation::DuplicateKey.into());
            }
            if signer.weight == 0 {
                return Err(ConfigViolation::ZeroWeight.into());
            }
            total = total
                .checked_add(signer.weight)
                .ok_or(ConfigViolation::WeightOverflow)?;
        }
        if total < self.threshold {
            return Err(ConfigViolation::UnreachableThreshold.into());
        }
        Ok(())
    }

    /// Determine which (key, signature) pairs a multisig proof requires checking.
    ///
    /// `signatures` must have exactly one entry per signer. Empty entries contribute no
    /// weight and are never returned. Signatures are not verified here.
    pub fn batch(
        &self,
        signatures: &[Option<Signature>],
    ) -> Result<Vec<MultisigCheck>, MultisigError> {
        self.validate_basic()?;
        if signatures.len() != self.signers.len() {
            return Err(MultisigError::SignatureSetLength {
                expected: self.signers.len(),
                actual: signatures.len(),
            });
        }

        let mut have: u64 = 0;
        let mut checks = Vec::new();
        for (sub_slot, (signer, signature)) in self.signers.iter().zip(signatures).enumerate() {
            let Some(signature) = signature else {
                continue;
            };
            // Cannot overflow: validate_basic bounded the total.
            have += signer.weight;
            checks.push(MultisigCheck {
                sub_slot,
                public_key: signer.public_key,
                signature: signature.clone(),
            });
        }
        if have < self.threshold {
            return Err(MultisigError::InsufficientWeight {
                have,
                need: self.threshold,
            });
        }
        Ok(checks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cbor;

    fn alice() -> PublicKey {
        PublicKey::ed25519_from_base64("NcPzNW3YU2T+ugNUtUWtoQnRvbOL9dYSaBfbjHLP1pE=").unwrap()
    }

    fn bob() -> PublicKey {
        PublicKey::ed25519_from_base64("YgkEiVSR4SMQdfXw+ppuFYlqH0seutnCKk8KG8PyAx0=").unwrap()
    }

    fn carol() -> PublicKey {
        PublicKey::Sr25519([7u8; 32])
    }

    fn sig(b: u8) -> Option<Signature> {
        Some(Signature::new(vec![b; 64]))
    }

    #[test]
    fn canonical_encoding() {
        let config = MultisigConfig::new(
            vec![MultisigSigner::new(alice(), 1), MultisigSigner::new(bob(), 1)],
            2,
        );
        assert_eq!(
            hex::encode(cbor::to_vec(&config).unwrap()),
            "a2677369676e65727382a266776569676874016a7075626c69635f6b6579a1676564323535313958\
             2035c3f3356dd85364feba0354b545ada109d1bdb38bf5d6126817db8c72cfd691a266776569676874\
             016a7075626c69635f6b6579a167656432353531395820620904895491e1231075f5f0fa9a6e15896a\
             1f4b1ebad9c22a4f0a1bc3f2031d697468726573686f6c6402"
        );
    }

    #[test]
    fn invalid_config_decodes_but_cannot_authorize() {
        let config = MultisigConfig::new(vec![MultisigSigner::new(alice(), 1)], 0);
        let decoded: MultisigConfig = cbor::from_slice(&cbor::to_vec(&config).unwrap()).unwrap();
        assert_eq!(decoded, config);
        assert!(matches!(
            decoded.batch(&[sig(1)]),
            Err(MultisigError::InvalidConfig(ConfigViolation::ZeroThreshold))
        ));
    }

    #[test]
    fn validate_basic_rules() {
        let ok = MultisigConfig::new(
            vec![MultisigSigner::new(alice(), 1), MultisigSigner::new(bob(), 2)],
            3,
        );
        assert!(ok.validate_basic().is_ok());

        let cases = [
            (
                MultisigConfig::new(vec![MultisigSigner::new(alice(), 1)], 0),
                ConfigViolation::ZeroThreshold,
            ),
            (
                MultisigConfig::new(
                    vec![MultisigSigner::new(alice(), 1), MultisigSigner::new(alice(), 1)],
                    1,
                ),
                ConfigViolation::DuplicateKey,
            ),
            (
                MultisigConfig::new(
                    vec![MultisigSigner::new(alice(), 1), MultisigSigner::new(bob(), 0)],
                    1,
                ),
                ConfigViolation::ZeroWeight,
            ),
            (
                MultisigConfig::new(
                    vec![
                        MultisigSigner::new(alice(), u64::MAX),
                        MultisigSigner::new(bob(), 1),
                    ],
                    1,
                ),
                ConfigViolation::WeightOverflow,
            ),
            (
                MultisigConfig::new(
                    vec![MultisigSigner::new(alice(), 1), MultisigSigner::new(bob(), 1)],
                    3,
                ),
                ConfigViolation::UnreachableThreshold,
            ),
        ];
        for (config, violation) in cases {
            assert_eq!(
                config.validate_basic(),
                Err(MultisigError::InvalidConfig(violation))
            );
        }
    }

    #[test]
    fn batch_collects_present_signatures_in_order() {
        let config = MultisigConfig::new(
            vec![
                MultisigSigner::new(alice(), 1),
                MultisigSigner::new(bob(), 1),
                MultisigSigner::new(carol(), 2),
            ],
            3,
        );

        let checks = config.batch(&[sig(1), None, sig(3)]).unwrap();
        assert_eq!(checks.len(), 2);
        assert_eq!(checks[0].sub_slot, 0);
        assert_eq!(checks[0].public_key, alice());
        assert_eq!(checks[1].sub_slot, 2);
        assert_eq!(checks[1].signature.as_bytes(), &[3u8; 64]);

        assert_eq!(
            config.batch(&[sig(1), sig(2), None]),
            Err(MultisigError::InsufficientWeight { have: 2, need: 3 })
        );
    }

    #[test]
    fn batch_requires_exact_slot_count() {
        let config = MultisigConfig::new(
            vec![MultisigSigner::new(alice(), 1), MultisigSigner::new(bob(), 1)],
            1,
        );
        assert_eq!(
            config.batch(&[sig(1)]),
            Err(MultisigError::SignatureSetLength {
                expected: 2,
                actual: 1
            })
        );
        assert!(config.batch(&[sig(1), None, None]).is_err());
    }

    #[test]
    fn batch_rejects_invalid_config() {
        let config = MultisigConfig::new(vec![MultisigSigner::new(alice(), 1)], 0);
        assert!(matches!(
            config.batch(&[sig(1)]),
            Err(MultisigError::InvalidConfig(ConfigViolation::ZeroThreshold))
        ));
    }
}
