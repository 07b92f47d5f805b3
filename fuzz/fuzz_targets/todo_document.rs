//! Fuzz target for tracking document parsing.
//!
//! Any text must either parse or return an error; every record that comes
//! out must point at a line inside the document.

#![no_main]

use libfuzzer_sys::fuzz_target;

use packguard_todo::parse_tracking_document;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    if let Ok(records) = parse_tracking_document("packs/a/package_todo.yml", Some(&text)) {
        let lines = text.lines().count() as u32;
        for r in &records {
            assert!(r.location.line >= 1 && r.location.line <= lines);
        }
    }
});
