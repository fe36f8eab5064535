//! Token amounts.
//!
//! A [`Quantity`] is an unsigned integer encoded on the wire as its minimal big-endian
//! byte string (zero is the empty string). A [`BaseUnits`] pairs a quantity with a
//! [`Denomination`] and encodes as the two-element array `[amount, denomination]`.

use serde::de::{Error as _, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// An amount of base units, stored as raw `u128`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(u128);

impl Quantity {
    pub const ZERO: Self = Self(0);

    pub fn new(raw: u128) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn checked_div(self, divisor: u128) -> Option<Self> {
        self.0.checked_div(divisor).map(Self)
    }

    /// Minimal big-endian encoding. Zero encodes as an empty slice.
    pub fn to_be_bytes_minimal(&self) -> Vec<u8> {
        let bytes = self.0.to_be_bytes();
        let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
        bytes[first..].to_vec()
    }

    /// Inverse of [`Quantity::to_be_bytes_minimal`]. Leading zero bytes are rejected.
    pub fn from_be_bytes_minimal(data: &[u8]) -> Result<Self, TypesError> {
        if data.len() > 16 {
            return Err(TypesError::InvalidLength {
                expected: 16,
                actual: data.len(),
            });
        }
        if data.first() == Some(&0) {
            return Err(TypesError::Decoding(
                "non-canonical quantity: leading zero byte".into(),
            ));
        }
        let mut buf = [0u8; 16];
        buf[16 - data.len()..].copy_from_slice(data);
        Ok(Self(u128::from_be_bytes(buf)))
    }
}

impl From<u128> for Quantity {
    fn from(raw: u128) -> Self {
        Self(raw)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.to_be_bytes_minimal())
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct QuantityVisitor;

        impl<'de> Visitor<'de> for QuantityVisitor {
            type Value = Quantity;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "big-endian quantity bytes")
            }

            fn visit_bytes<E: serde::de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
                Quantity::from_be_bytes_minimal(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_bytes(QuantityVisitor)
    }
}

/// A token denomination. The empty denomination is the native token.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Denomination(Vec<u8>);

impl Denomination {
    /// Maximum length of a denomination in bytes.
    pub const MAX_LENGTH: usize = 32;

    pub const NATIVE: Self = Self(Vec::new());

    pub fn is_native(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    fn from_bytes(data: &[u8]) -> Result<Self, TypesError> {
        if data.len() > Self::MAX_LENGTH {
            return Err(TypesError::InvalidDenomination(format!(
                "too long: {} bytes",
                data.len()
            )));
        }
        Ok(Self(data.to_vec()))
    }
}

impl FromStr for Denomination {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(s.as_bytes())
    }
}

impl fmt::Debug for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Denomination({self})")
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_native() {
            f.write_str("<native>")
        } else {
            f.write_str(&String::from_utf8_lossy(&self.0))
        }
    }
}

impl Serialize for Denomination {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.0)
    }
}

impl<'de> Deserialize<'de> for Denomination {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_bytes::ByteBuf::deserialize(deserializer)?;
        Self::from_bytes(&raw).map_err(D::Error::custom)
    }
}

/// An amount together with its denomination.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BaseUnits(pub Quantity, pub Denomination);

impl BaseUnits {
    pub fn new(amount: impl Into<Quantity>, denomination: Denomination) -> Self {
        Self(amount.into(), denomination)
    }

    /// An amount of the native token.
    pub fn native(amount: u128) -> Self {
        Self(Quantity(amount), Denomination::NATIVE)
    }

    pub fn amount(&self) -> Quantity {
        self.0
    }

    pub fn denomination(&self) -> &Denomination {
        &self.1
    }
}

impl fmt::Display for BaseUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0, self.1)
    }
}
