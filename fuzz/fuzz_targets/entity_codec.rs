#![no_main]
use blockxml::{escape, unescape};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        assert_eq!(unescape(&escape(s, false)), s);
        let _ = unescape(s);
    }
});
