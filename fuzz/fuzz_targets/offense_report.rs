#![no_main]

use libfuzzer_sys::fuzz_target;

use packguard_todo::parse_offense_report;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);
    let _ = parse_offense_report(&s);
});
