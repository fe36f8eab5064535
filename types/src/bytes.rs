//! Serde helpers for fixed-size byte arrays.
//!
//! Serde's built-in array support encodes `[u8; N]` as a sequence of integers. On the
//! wire every fixed-size key, hash and identifier is a CBOR byte string, so fields of
//! that shape use `#[serde(with = "oasis_types::bytes::fixed")]`.

use std::fmt;

use serde::de::{Error as _, SeqAccess, Visitor};

pub(crate) struct ArrayVisitor<const N: usize>;

impl<'de, const N: usize> Visitor<'de> for ArrayVisitor<N> {
    type Value = [u8; N];

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{N} bytes")
    }

    fn visit_bytes<E: serde::de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
        v.try_into().map_err(|_| E::invalid_length(v.len(), &self))
    }

    fn visit_byte_buf<E: serde::de::Error>(self, v: Vec<u8>) -> Result<Self::Value, E> {
        self.visit_bytes(&v)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut arr = [0u8; N];
        for (i, byte) in arr.iter_mut().enumerate() {
            *byte = seq
                .next_element()?
                .ok_or_else(|| A::Error::invalid_length(i, &self))?;
        }
        if seq.next_element::<u8>()?.is_some() {
            return Err(A::Error::invalid_length(N + 1, &self));
        }
        Ok(arr)
    }
}

/// `with` module for `[u8; N]` fields encoded as byte strings.
pub mod fixed {
    use serde::{Deserializer, Serializer};

    use super::ArrayVisitor;

    pub fn serialize<S: Serializer, const N: usize>(
        value: &[u8; N],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>, const N: usize>(
        deserializer: D,
    ) -> Result<[u8; N], D::Error> {
        deserializer.deserialize_bytes(ArrayVisitor::<N>)
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Wrapper(#[serde(with = "super::fixed")] [u8; 4]);

    #[test]
    fn fixed_array_is_a_byte_string() {
        let encoded = crate::cbor::to_vec(&Wrapper([1, 2, 3, 4])).unwrap();
        assert_eq!(encoded, vec![0x44, 1, 2, 3, 4]);
        let decoded: Wrapper = crate::cbor::from_slice(&encoded).unwrap();
        assert_eq!(decoded, Wrapper([1, 2, 3, 4]));
    }

    #[test]
    fn fixed_array_rejects_wrong_length() {
        let encoded = crate::cbor::to_vec(&serde_bytes::Bytes::new(&[1, 2, 3])).unwrap();
        assert!(crate::cbor::from_slice::<Wrapper>(&encoded).is_err());
    }
}
