use std::collections::HashMap;

use regex::Regex;

/// Line lookups over the raw text of a tracking document.
///
/// The YAML parser forgets where things were, so anchors are recovered from
/// the text: symbol keys by a quoted-key match, referencing files by the first
/// line after the symbol key that mentions the path.
#[derive(Debug)]
pub struct LineIndex<'a> {
    lines: Vec<&'a str>,
    /// Exact list-item value -> 0-based line numbers, ascending.
    items: HashMap<&'a str, Vec<usize>>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let lines: Vec<&str> = text.lines().collect();
        let mut items: HashMap<&str, Vec<usize>> = HashMap::new();
        for (idx, line) in lines.iter().enumerate() {
            if let Some(item) = list_item_value(line) {
                items.entry(item).or_default().push(idx);
            }
        }
        Self { lines, items }
    }

    /// 0-based line of the key for `symbol`, first match wins.
    ///
    /// Accepts `"Sym":`, `'Sym':` and the explicit-key form `? "Sym"`. The
    /// quotes anchor the match, so `Foo` never matches `"Bar::Foo":`.
    pub fn find_symbol_key(&self, symbol: &str) -> Option<usize> {
        let matcher = symbol_key_regex(symbol)?;
        self.lines.iter().position(|line| matcher.is_match(line))
    }

    /// 0-based line of the first mention of `file` strictly after `after`.
    pub fn find_file_after(&self, file: &str, after: usize) -> Option<usize> {
        if let Some(lines) = self.items.get(file) {
            if let Some(found) = lines.iter().copied().find(|&l| l > after) {
                return Some(found);
            }
        }

        // Quoted or otherwise decorated entries: fall back to a substring scan.
        self.lines
            .iter()
            .enumerate()
            .skip(after + 1)
            .find(|(_, line)| line.contains(file))
            .map(|(idx, _)| idx)
    }
}

fn symbol_key_regex(symbol: &str) -> Option<Regex> {
    let escaped = regex::escape(symbol);
    let pattern = format!(r#"["']{escaped}["']\s*:|^\s*\?\s*["']{escaped}["']\s*$"#);
    Regex::new(&pattern).ok()
}

/// `    - packs/foo/bar.rb` -> `packs/foo/bar.rb`
fn list_item_value(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix("- ")?;
    let rest = rest.trim_end();
    if rest.is_empty() { None } else { Some(rest) }
}
