#![no_main]
use blockxml::parse_str;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(tree) = parse_str(s) {
            let text = tree.to_string();
            let reparsed = parse_str(&text).map(|t| t.to_string());
            assert_eq!(reparsed.ok().as_deref(), Some(text.as_str()));
        }
    }
});
