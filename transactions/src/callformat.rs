//! Confidential call encoding.
//!
//! An encrypted call seals the canonical encoding of the plain [`Call`] for the
//! runtime's call data public key, using a fresh ephemeral X25519 key pair and a fresh
//! random nonce. The outer call keeps only the format and the envelope; its method is
//! empty. The runtime seals the result for the same ephemeral key, so the caller must
//! keep the returned [`Metadata`] until the result has been decoded.

use ciborium::Value;
use oasis_crypto::encryption::NONCE_SIZE;
use oasis_crypto::{box_open, box_seal, CryptoError, X25519KeyPair};
use oasis_types::cbor;
use rand::rngs::OsRng;
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CallFormatError;
use crate::result::CallResult;
use crate::transaction::{Call, CallFormat};

/// The body of an encrypted call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallEnvelopeX25519DeoxysII {
    /// Caller's ephemeral public key.
    #[serde(with = "oasis_types::bytes::fixed")]
    pub pk: [u8; 32],
    #[serde(with = "serde_bytes")]
    pub data: Vec<u8>,
    /// Epoch of the call data key the call was sealed for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epoch: Option<u64>,
    #[serde(with = "oasis_types::bytes::fixed")]
    pub nonce: [u8; NONCE_SIZE],
}

/// The value of an `unknown` result to an encrypted call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEnvelopeX25519DeoxysII {
    #[serde(with = "serde_bytes")]
    pub data: Vec<u8>,
    #[serde(with = "oasis_types::bytes::fixed")]
    pub nonce: [u8; NONCE_SIZE],
}

/// The runtime's current call data public key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallDataPublicKey {
    pub public_key: [u8; 32],
    pub epoch: Option<u64>,
}

/// What the caller must keep to decode the result of an encoded call.
pub enum Metadata {
    Empty,
    EncryptedX25519DeoxysII {
        /// Ephemeral key pair the call was sealed with. Zeroized on drop.
        keypair: X25519KeyPair,
        /// Runtime call data public key.
        peer_public: [u8; 32],
    },
}

/// Encode `call` in `format` using the system random source.
pub fn encode_call(
    call: &Call,
    format: CallFormat,
    key: Option<&CallDataPublicKey>,
) -> Result<(Call, Metadata), CallFormatError> {
    encode_call_with(call, format, key, &mut OsRng)
}

/// Encode `call` in `format`, drawing the ephemeral key pair and nonce from `rng`.
pub fn encode_call_with<R: CryptoRngCore>(
    call: &Call,
    format: CallFormat,
    key: Option<&CallDataPublicKey>,
    rng: &mut R,
) -> Result<(Call, Metadata), CallFormatError> {
    match format {
        CallFormat::Plain => Ok((call.clone(), Metadata::Empty)),
        CallFormat::EncryptedX25519DeoxysII => {
            let key = key.ok_or(CallFormatError::MissingPublicKey)?;
            let keypair = X25519KeyPair::generate_with(rng);
            let mut nonce = [0u8; NONCE_SIZE];
            rng.fill_bytes(&mut nonce);

            let plaintext = cbor::to_vec(call)
                .map_err(|e| CallFormatError::MalformedEnvelope(e.to_string()))?;
            let data = box_seal(&nonce, &plaintext, &[], &key.public_key, keypair.secret())
                .map_err(CallFormatError::Seal)?;
            let envelope = CallEnvelopeX25519DeoxysII {
                pk: keypair.public_bytes(),
                data,
                epoch: key.epoch,
                nonce,
            };
            debug!(epoch = ?key.epoch, "sealed call");

            let encoded = Call {
                read_only: call.read_only,
                body: to_value(&envelope)?,
                format,
                method: String::new(),
            };
            Ok((
                encoded,
                Metadata::EncryptedX25519DeoxysII {
                    keypair,
                    peer_public: key.public_key,
                },
            ))
        }
    }
}

/// Decode the result of a call encoded with [`encode_call`].
///
/// For encrypted calls, an `unknown` result is opened; a `failed` result means the
/// call failed before the runtime could seal anything and is surfaced as
/// [`CallFormatError::CallFailed`]; a plain `ok` result is rejected.
pub fn decode_result(result: CallResult, meta: &Metadata) -> Result<CallResult, CallFormatError> {
    match meta {
        Metadata::Empty => Ok(result),
        Metadata::EncryptedX25519DeoxysII {
            keypair,
            peer_public,
        } => {
            let value = match result {
                CallResult::Unknown(value) => value,
                CallResult::Failed {
                    module,
                    code,
                    message,
                } => {
                    return Err(CallFormatError::CallFailed {
                        module,
                        code,
                        message,
                    })
                }
                CallResult::Ok(_) => return Err(CallFormatError::UnexpectedResult),
            };
            let envelope: ResultEnvelopeX25519DeoxysII = value
                .deserialized()
                .map_err(|e| CallFormatError::MalformedEnvelope(e.to_string()))?;
            let plaintext = box_open(
                &envelope.nonce,
                &envelope.data,
                &[],
                peer_public,
                keypair.secret(),
            )
            .map_err(open_error)?;
            debug!("opened result envelope");
            cbor::from_slice(&plaintext).map_err(|e| CallFormatError::MalformedResult(e.to_string()))
        }
    }
}

/// Runtime-side state needed to seal the result of a decoded call.
pub enum RuntimeMetadata {
    Empty,
    EncryptedX25519DeoxysII {
        /// Caller's ephemeral public key.
        peer_public: [u8; 32],
        /// Runtime call data key pair.
        keypair: X25519KeyPair,
        /// Position of the transaction within its batch.
        index: u32,
    },
}

/// Open an encoded call with the runtime's call data key pair.
pub fn decode_call(
    call: Call,
    keypair: &X25519KeyPair,
    index: u32,
) -> Result<(Call, RuntimeMetadata), CallFormatError> {
    match call.format {
        CallFormat::Plain => Ok((call, RuntimeMetadata::Empty)),
        CallFormat::EncryptedX25519DeoxysII => {
            if !call.method.is_empty() {
                return Err(CallFormatError::NonEmptyMethod);
            }
            let envelope: CallEnvelopeX25519DeoxysII = call
                .body
                .deserialized()
                .map_err(|e| CallFormatError::MalformedEnvelope(e.to_string()))?;
            let plaintext = box_open(
                &envelope.nonce,
                &envelope.data,
                &[],
                &envelope.pk,
                keypair.secret(),
            )
            .map_err(open_error)?;
            let inner: Call = cbor::from_slice(&plaintext)
                .map_err(|e| CallFormatError::MalformedEnvelope(e.to_string()))?;
            Ok((
                inner,
                RuntimeMetadata::EncryptedX25519DeoxysII {
                    peer_public: envelope.pk,
                    keypair: keypair.clone(),
                    index,
                },
            ))
        }
    }
}

/// Seal a result for the caller of a call opened with [`decode_call`].
///
/// The nonce is `round (8 bytes BE) || index (4 bytes BE) || 00 00 00`, unique per
/// transaction as long as rounds are never re-executed with different results.
pub fn encode_result(
    result: &CallResult,
    meta: &RuntimeMetadata,
    round: u64,
) -> Result<CallResult, CallFormatError> {
    match meta {
        RuntimeMetadata::Empty => Ok(result.clone()),
        RuntimeMetadata::EncryptedX25519DeoxysII {
            peer_public,
            keypair,
            index,
        } => {
            let mut nonce = [0u8; NONCE_SIZE];
            nonce[..8].copy_from_slice(&round.to_be_bytes());
            nonce[8..12].copy_from_slice(&index.to_be_bytes());

            let plaintext = cbor::to_vec(result)
                .map_err(|e| CallFormatError::MalformedResult(e.to_string()))?;
            let data = box_seal(&nonce, &plaintext, &[], peer_public, keypair.secret())
                .map_err(CallFormatError::Seal)?;
            Ok(CallResult::Unknown(to_value(
                &ResultEnvelopeX25519DeoxysII { data, nonce },
            )?))
        }
    }
}

fn to_value<T: Serialize>(envelope: &T) -> Result<Value, CallFormatError> {
    Value::serialized(envelope).map_err(|e| CallFormatError::MalformedEnvelope(e.to_string()))
}

fn open_error(e: CryptoError) -> CallFormatError {
    match e {
        CryptoError::DecryptionFailed => CallFormatError::DecryptionFailed,
        other => CallFormatError::MalformedEnvelope(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn runtime() -> (X25519KeyPair, CallDataPublicKey) {
        let keypair = X25519KeyPair::from_secret_bytes([7u8; 32]);
        let key = CallDataPublicKey {
            public_key: keypair.public_bytes(),
            epoch: Some(3),
        };
        (keypair, key)
    }

    fn call() -> Call {
        Call::new("accounts.Transfer", &vec![1u8, 2, 3]).unwrap()
    }

    #[test]
    fn plain_is_passthrough() {
        let (encoded, meta) = encode_call(&call(), CallFormat::Plain, None).unwrap();
        assert_eq!(encoded, call());
        let result = CallResult::Ok(Value::Bool(true));
        assert_eq!(decode_result(result.clone(), &meta).unwrap(), result);
    }

    #[test]
    fn encrypted_requires_public_key() {
        assert!(matches!(
            encode_call(&call(), CallFormat::EncryptedX25519DeoxysII, None),
            Err(CallFormatError::MissingPublicKey)
        ));
    }

    #[test]
    fn encrypted_roundtrip() {
        let (runtime_keypair, key) = runtime();
        let (encoded, meta) =
            encode_call(&call(), CallFormat::EncryptedX25519DeoxysII, Some(&key)).unwrap();
        assert!(encoded.method.is_empty());
        assert_eq!(encoded.format, CallFormat::EncryptedX25519DeoxysII);
        let envelope: CallEnvelopeX25519DeoxysII = encoded.body.deserialized().unwrap();
        assert_eq!(envelope.epoch, Some(3));

        let (inner, runtime_meta) = decode_call(encoded, &runtime_keypair, 5).unwrap();
        assert_eq!(inner, call());

        let output = CallResult::Ok(Value::Text("done".into()));
        let sealed = encode_result(&output, &runtime_meta, 42).unwrap();
        let CallResult::Unknown(ref value) = sealed else {
            panic!("sealed result must be unknown");
        };
        let envelope: ResultEnvelopeX25519DeoxysII = value.deserialized().unwrap();
        assert_eq!(
            hex::encode(envelope.nonce),
            "000000000000002a00000005000000"
        );

        assert_eq!(decode_result(sealed, &meta).unwrap(), output);
    }

    #[test]
    fn seeded_rng_is_deterministic() {
        let (_, key) = runtime();
        let mut a = StdRng::seed_from_u64(1);
        let mut b = StdRng::seed_from_u64(1);
        let (x, _) =
            encode_call_with(&call(), CallFormat::EncryptedX25519DeoxysII, Some(&key), &mut a)
                .unwrap();
        let (y, _) =
            encode_call_with(&call(), CallFormat::EncryptedX25519DeoxysII, Some(&key), &mut b)
                .unwrap();
        assert_eq!(x, y);
    }

    #[test]
    fn fresh_nonce_per_call() {
        let (_, key) = runtime();
        let (x, _) = encode_call(&call(), CallFormat::EncryptedX25519DeoxysII, Some(&key)).unwrap();
        let (y, _) = encode_call(&call(), CallFormat::EncryptedX25519DeoxysII, Some(&key)).unwrap();
        let ex: CallEnvelopeX25519DeoxysII = x.body.deserialized().unwrap();
        let ey: CallEnvelopeX25519DeoxysII = y.body.deserialized().unwrap();
        assert_ne!(ex.nonce, ey.nonce);
        assert_ne!(ex.pk, ey.pk);
    }

    #[test]
    fn tampered_result_fails_decryption() {
        let (runtime_keypair, key) = runtime();
        let (encoded, meta) =
            encode_call(&call(), CallFormat::EncryptedX25519DeoxysII, Some(&key)).unwrap();
        let (_, runtime_meta) = decode_call(encoded, &runtime_keypair, 0).unwrap();
        let sealed = encode_result(&CallResult::Ok(Value::Null), &runtime_meta, 1).unwrap();

        let CallResult::Unknown(value) = sealed else {
            panic!("sealed result must be unknown");
        };
        let mut envelope: ResultEnvelopeX25519DeoxysII = value.deserialized().unwrap();
        envelope.data[0] ^= 0x01;
        let tampered = CallResult::Unknown(Value::serialized(&envelope).unwrap());

        let err = decode_result(tampered, &meta).unwrap_err();
        assert!(matches!(err, CallFormatError::DecryptionFailed));
        assert_eq!(err.kind(), crate::ErrorKind::CryptoVerification);
    }

    #[test]
    fn tampered_call_fails_decryption() {
        let (runtime_keypair, key) = runtime();
        let (encoded, _) =
            encode_call(&call(), CallFormat::EncryptedX25519DeoxysII, Some(&key)).unwrap();
        let envelope: CallEnvelopeX25519DeoxysII = encoded.body.deserialized().unwrap();

        let mut flipped_data = envelope.clone();
        flipped_data.data[0] ^= 0x01;
        let mut flipped_nonce = envelope;
        flipped_nonce.nonce[0] ^= 0x01;

        for tampered in [flipped_data, flipped_nonce] {
            let mut call = encoded.clone();
            call.body = Value::serialized(&tampered).unwrap();
            let err = decode_call(call, &runtime_keypair, 0).err().unwrap();
            assert!(matches!(err, CallFormatError::DecryptionFailed));
            assert_eq!(err.kind(), crate::ErrorKind::CryptoVerification);
        }
    }

    #[test]
    fn wrong_runtime_key_fails_decryption() {
        let (_, key) = runtime();
        let (encoded, _) =
            encode_call(&call(), CallFormat::EncryptedX25519DeoxysII, Some(&key)).unwrap();
        let other = X25519KeyPair::from_secret_bytes([8u8; 32]);
        assert!(matches!(
            decode_call(encoded, &other, 0),
            Err(CallFormatError::DecryptionFailed)
        ));
    }

    #[test]
    fn malformed_call_envelope() {
        let (runtime_keypair, key) = runtime();
        let (mut encoded, _) =
            encode_call(&call(), CallFormat::EncryptedX25519DeoxysII, Some(&key)).unwrap();
        encoded.body = Value::Text("not an envelope".into());
        let err = decode_call(encoded, &runtime_keypair, 0).err().unwrap();
        assert!(matches!(err, CallFormatError::MalformedEnvelope(_)));
        assert_eq!(err.kind(), crate::ErrorKind::Encoding);
    }

    #[test]
    fn failed_result_is_not_decrypted() {
        let (_, key) = runtime();
        let (_, meta) =
            encode_call(&call(), CallFormat::EncryptedX25519DeoxysII, Some(&key)).unwrap();
        let failed = CallResult::Failed {
            code: 9,
            module: "core".into(),
            message: "out of gas".into(),
        };
        assert!(matches!(
            decode_result(failed, &meta),
            Err(CallFormatError::CallFailed { code: 9, .. })
        ));
        assert!(matches!(
            decode_result(CallResult::Ok(Value::Null), &meta),
            Err(CallFormatError::UnexpectedResult)
        ));
    }

    #[test]
    fn runtime_rejects_method_on_encrypted_call() {
        let (runtime_keypair, key) = runtime();
        let (mut encoded, _) =
            encode_call(&call(), CallFormat::EncryptedX25519DeoxysII, Some(&key)).unwrap();
        encoded.method = "accounts.Transfer".into();
        assert!(matches!(
            decode_call(encoded, &runtime_keypair, 0),
            Err(CallFormatError::NonEmptyMethod)
        ));
    }
}
