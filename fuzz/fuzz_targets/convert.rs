#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // a deck that parses must either render or fail cleanly
    if let Ok(model) = lsdyna::keyword::parse_bytes(data) {
        let _ = lsdyna::jive::render(&model);
    }
});
