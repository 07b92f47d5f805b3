#![no_main]

use libfuzzer_sys::fuzz_target;

use packguard_patch::parse_patch;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);
    let _ = parse_patch(&s);
});
