//! Call results as reported by the runtime.

use ciborium::Value;
use serde::{Deserialize, Serialize};

use crate::error::CallFormatError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CallResult {
    #[serde(rename = "ok")]
    Ok(Value),

    #[serde(rename = "fail")]
    Failed {
        code: u32,
        module: String,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        message: String,
    },

    /// A result the client cannot interpret directly, such as a sealed result envelope.
    #[serde(rename = "unknown")]
    Unknown(Value),
}

impl Default for CallResult {
    fn default() -> Self {
        Self::Unknown(Value::Null)
    }
}

impl CallResult {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    /// Map `Ok` and `Unknown` to their value and `Failed` to an error.
    pub fn ok(self) -> Result<Value, CallFormatError> {
        match self {
            Self::Ok(v) | Self::Unknown(v) => Ok(v),
            Self::Failed {
                module,
                code,
                message,
            } => Err(CallFormatError::CallFailed {
                module,
                code,
                message,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oasis_types::cbor;

    #[test]
    fn failed_result_shape() {
        let result = CallResult::Failed {
            code: 2,
            module: "core".into(),
            message: String::new(),
        };
        let encoded = cbor::to_vec(&result).unwrap();
        // {"fail": {"code": 2, "module": "core"}}
        let mut expected = vec![0xa1, 0x64];
        expected.extend_from_slice(b"fail");
        expected.extend_from_slice(&[0xa2, 0x64]);
        expected.extend_from_slice(b"code");
        expected.extend_from_slice(&[0x02, 0x66]);
        expected.extend_from_slice(b"module");
        expected.push(0x64);
        expected.extend_from_slice(b"core");
        assert_eq!(encoded, expected);
        assert_eq!(cbor::from_slice::<CallResult>(&encoded).unwrap(), result);
    }

    #[test]
    fn ok_maps_failure_to_error() {
        assert_eq!(CallResult::Ok(Value::Bool(true)).ok().unwrap(), Value::Bool(true));
        let err = CallResult::Failed {
            code: 1,
            module: "accounts".into(),
            message: "insufficient balance".into(),
        }
        .ok()
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "call failed: module=accounts code=1: insufficient balance"
        );
    }
}
