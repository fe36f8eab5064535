//! Runtime identifiers.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::bytes::ArrayVisitor;
use crate::error::TypesError;

/// Size of a [`Namespace`] in bytes.
pub const NAMESPACE_SIZE: usize = 32;

/// Identifies one runtime (paratime) instance.
///
/// Text form is lowercase hex; CBOR form is a 32-byte string.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Namespace([u8; NAMESPACE_SIZE]);

impl Namespace {
    pub fn new(bytes: [u8; NAMESPACE_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; NAMESPACE_SIZE] {
        &self.0
    }
}

impl AsRef<[u8]> for Namespace {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Namespace({self})")
    }
}

impl FromStr for Namespace {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = hex::decode(s)?;
        let bytes: [u8; NAMESPACE_SIZE] =
            raw.as_slice()
                .try_into()
                .map_err(|_| TypesError::InvalidLength {
                    expected: NAMESPACE_SIZE,
                    actual: raw.len(),
                })?;
        Ok(Self(bytes))
    }
}

impl Serialize for Namespace {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Namespace {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            s.parse().map_err(D::Error::custom)
        } else {
            deserializer
                .deserialize_bytes(ArrayVisitor::<NAMESPACE_SIZE>)
                .map(Self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMERALD: &str = "000000000000000000000000000000000000000000000000e2eaa99fc008f87f";

    #[test]
    fn hex_round_trip() {
        let ns: Namespace = EMERALD.parse().unwrap();
        assert_eq!(ns.to_string(), EMERALD);
        assert_eq!(ns.as_bytes()[31], 0x7f);
    }

    #[test]
    fn rejects_short_hex() {
        assert!(matches!(
            "00ff".parse::<Namespace>(),
            Err(TypesError::InvalidLength { expected: 32, actual: 2 })
        ));
        assert!("zz".parse::<Namespace>().is_err());
    }

    #[test]
    fn json_is_hex_string() {
        let ns: Namespace = EMERALD.parse().unwrap();
        let json = serde_json::to_string(&ns).unwrap();
        assert_eq!(json, format!("\"{EMERALD}\""));
    }
}
