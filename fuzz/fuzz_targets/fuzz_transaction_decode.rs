#![no_main]

use libfuzzer_sys::fuzz_target;
use oasis_transactions::{CallResult, Transaction};

fuzz_target!(|data: &[u8]| {
    if let Ok(tx) = Transaction::from_slice(data) {
        let _ = tx.validate_basic();
        let _ = tx.to_vec();
    }

    let _ = oasis_types::cbor::from_slice::<CallResult>(data);
});
