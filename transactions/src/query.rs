//! Simulated execution of unsigned transactions.
//!
//! A query transaction carries a full [`Transaction`] with no authentication proofs
//! plus the caller to attribute it to. Nodes use it for gas estimation, where the
//! signatures that would normally identify the caller do not exist yet.

use oasis_types::cbor;
use serde::{Deserialize, Serialize};

use crate::auth::CallerAddress;
use crate::error::TransactionError;
use crate::transaction::Transaction;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueryTransaction {
    pub tx: Transaction,
    /// Caller to simulate as. When absent, the node derives it from the first signer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller: Option<CallerAddress>,
}

impl QueryTransaction {
    pub fn new(tx: Transaction, caller: Option<CallerAddress>) -> Self {
        Self { tx, caller }
    }

    /// Only the version is checked; a query may have no signers at all.
    pub fn validate_for_query(&self) -> Result<(), TransactionError> {
        self.tx.validate_version()
    }

    pub fn to_vec(&self) -> Result<Vec<u8>, TransactionError> {
        self.validate_for_query()?;
        Ok(cbor::to_vec(self)?)
    }

    pub fn from_slice(data: &[u8]) -> Result<Self, TransactionError> {
        Ok(cbor::from_slice(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::Call;
    use oasis_types::Address;

    #[test]
    fn unsigned_query_is_valid() {
        let tx = Transaction::new(Call::new("accounts.Transfer", &()).unwrap());
        assert!(tx.validate_basic().is_err());
        let query = QueryTransaction::new(tx, Some(CallerAddress::Address(Address::default())));
        query.validate_for_query().unwrap();
        let bytes = query.to_vec().unwrap();
        assert_eq!(QueryTransaction::from_slice(&bytes).unwrap(), query);
    }

    #[test]
    fn wrong_version_rejected() {
        let mut tx = Transaction::new(Call::default());
        tx.version = 2;
        let query = QueryTransaction::new(tx, None);
        assert!(matches!(
            query.to_vec(),
            Err(TransactionError::UnsupportedVersion { expected: 1, actual: 2 })
        ));
    }

    #[test]
    fn caller_omitted_when_absent() {
        let query = QueryTransaction::new(Transaction::new(Call::default()), None);
        let value: ciborium::Value = ciborium::Value::serialized(&query).unwrap();
        let map = value.as_map().unwrap();
        assert_eq!(map.len(), 1);
    }
}
