//! Fuzz target for reversing a patch against arbitrary current content.
//!
//! Structured input keeps the patch text close to something `git diff`
//! would produce so the reversal logic is reached.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use packguard_patch::{parse_patch, reverse_apply};

#[derive(Arbitrary, Debug)]
struct Input {
    current: Option<String>,
    old_start: u8,
    new_start: u8,
    lines: Vec<(u8, String)>,
}

fuzz_target!(|input: Input| {
    let mut body = String::new();
    let (mut old_len, mut new_len) = (0u32, 0u32);
    for (tag, text) in &input.lines {
        let text = text.replace('\n', "");
        match tag % 3 {
            0 => {
                body.push_str(&format!(" {text}\n"));
                old_len += 1;
                new_len += 1;
            }
            1 => {
                body.push_str(&format!("-{text}\n"));
                old_len += 1;
            }
            _ => {
                body.push_str(&format!("+{text}\n"));
                new_len += 1;
            }
        }
    }
    let patch = format!(
        "--- a/packs/a/package_todo.yml\n+++ b/packs/a/package_todo.yml\n@@ -{},{old_len} +{},{new_len} @@\n{body}",
        input.old_start, input.new_start
    );

    if let Ok(files) = parse_patch(&patch) {
        for file in &files {
            let _ = reverse_apply(input.current.as_deref(), file);
        }
    }
});
