#![no_main]

use libfuzzer_sys::fuzz_target;
use oasis_crypto::ChainContext;
use oasis_transactions::UnverifiedTransaction;
use oasis_types::Namespace;

// Decoding and verifying arbitrary bytes must never panic, and nothing random
// verifies under a fixed context.
fuzz_target!(|data: &[u8]| {
    let Ok(ut) = UnverifiedTransaction::from_slice(data) else {
        return;
    };
    let ctx = ChainContext::for_runtime(&Namespace::new([0u8; 32]), "fuzz");
    assert!(ut.verify(&ctx).is_err(), "random input must not verify");

    // Whatever decodes re-encodes and decodes to the same value.
    if let Ok(encoded) = ut.to_vec() {
        let again = UnverifiedTransaction::from_slice(&encoded).expect("re-decode");
        assert_eq!(again, ut);
    }
});
