#![no_main]

use libfuzzer_sys::fuzz_target;
use oasis_types::Address;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(addr) = Address::from_bech32(s) {
            let text = addr.to_bech32();
            assert_eq!(Address::from_bech32(&text).expect("re-parse"), addr);
        }
    }

    let _ = Address::from_bytes(data);
});
