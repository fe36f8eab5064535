//! Thin wrappers around `ciborium` returning [`TypesError`].
//!
//! Canonical encoding relies on struct fields being declared in canonical key order
//! (shorter keys first, then bytewise) and on empty optional fields being skipped.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::TypesError;

/// Encode a value to CBOR bytes.
pub fn to_vec<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, TypesError> {
    let mut out = Vec::new();
    ciborium::ser::into_writer(value, &mut out).map_err(|e| TypesError::Encoding(e.to_string()))?;
    Ok(out)
}

/// Decode a value from CBOR bytes. Trailing bytes are rejected.
pub fn from_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, TypesError> {
    let mut reader = data;
    let value = ciborium::de::from_reader(&mut reader)
        .map_err(|e: ciborium::de::Error<std::io::Error>| TypesError::Decoding(e.to_string()))?;
    if !reader.is_empty() {
        return Err(TypesError::Decoding(format!(
            "{} trailing bytes",
            reader.len()
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut encoded = to_vec(&1u8).unwrap();
        encoded.push(0x00);
        assert!(matches!(
            from_slice::<u8>(&encoded),
            Err(TypesError::Decoding(_))
        ));
    }
}
