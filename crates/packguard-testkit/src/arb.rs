//! Proptest strategies for generating violation records and documents.
//!
//! Strategies are constructive: symbol names and paths are always valid and
//! never substrings of one another within one generated document.
//!
//! # Bounds
//!
//! - Max packages per document: 3
//! - Max symbols per package: 4
//! - Max referencing files per symbol: 4

use packguard_types::{
    GroupingStrategy, Location, RecordOrigin, RenameMapping, ViolationKind, ViolationRecord,
};
use proptest::prelude::*;

use crate::todo_builder::{Quote, TodoDocBuilder};

pub const MAX_PACKAGES: usize = 3;
pub const MAX_SYMBOLS_PER_PACKAGE: usize = 4;
pub const MAX_FILES_PER_SYMBOL: usize = 4;

pub fn arb_kind() -> impl Strategy<Value = ViolationKind> {
    prop_oneof![
        4 => Just(ViolationKind::Dependency),
        4 => Just(ViolationKind::Privacy),
        1 => Just(ViolationKind::Other("visibility".to_string())),
    ]
}

pub fn arb_known_kind() -> impl Strategy<Value = ViolationKind> {
    prop_oneof![Just(ViolationKind::Dependency), Just(ViolationKind::Privacy)]
}

pub fn arb_grouping() -> impl Strategy<Value = GroupingStrategy> {
    prop_oneof![
        Just(GroupingStrategy::PerSymbolPerLocation),
        Just(GroupingStrategy::PerSymbolPerPackage),
    ]
}

pub fn arb_quote() -> impl Strategy<Value = Quote> {
    prop_oneof![Just(Quote::Double), Just(Quote::Single), Just(Quote::Explicit)]
}

/// `::Foo::Bar`-style names.
pub fn arb_symbol() -> impl Strategy<Value = String> {
    prop::collection::vec("[A-Z][a-z]{2,7}", 1..3).prop_map(|parts| format!("::{}", parts.join("::")))
}

pub fn arb_package() -> impl Strategy<Value = String> {
    "[a-z]{3,8}".prop_map(|p| format!("packs/{p}"))
}

pub fn arb_referencing_file() -> impl Strategy<Value = String> {
    ("[a-z]{3,8}", "[a-z]{3,8}").prop_map(|(dir, stem)| format!("packs/{dir}/app/{stem}.rb"))
}

pub fn arb_record() -> impl Strategy<Value = ViolationRecord> {
    (
        arb_symbol(),
        arb_referencing_file(),
        arb_package(),
        arb_kind(),
        1u32..500,
    )
        .prop_map(|(symbol, file, package, kind, line)| ViolationRecord {
            symbol_name: symbol,
            referencing_file: file,
            target_package_name: package,
            source_package_name: None,
            kind,
            strict: false,
            location: Location::new("packs/referencing/package_todo.yml", line),
            origin: RecordOrigin::TrackingDocument,
        })
}

pub fn arb_records(max: usize) -> impl Strategy<Value = Vec<ViolationRecord>> {
    prop::collection::vec(arb_record(), 0..max)
}

pub fn arb_rename() -> impl Strategy<Value = RenameMapping> {
    (arb_referencing_file(), arb_referencing_file()).prop_map(|(b, a)| RenameMapping::new(b, a))
}

/// Abstract content of one tracking document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocModel {
    /// `(package, [(symbol, kinds, files)])`
    pub packages: Vec<(String, Vec<(String, Vec<String>, Vec<String>)>)>,
}

impl DocModel {
    pub fn render(&self, quote: Quote) -> String {
        let mut b = TodoDocBuilder::new().with_header().quote(quote);
        for (package, symbols) in &self.packages {
            let mut p = b.package(package);
            for (symbol, kinds, files) in symbols {
                let kinds: Vec<&str> = kinds.iter().map(String::as_str).collect();
                let files: Vec<&str> = files.iter().map(String::as_str).collect();
                p = p.symbol(symbol, &kinds, &files);
            }
            b = p.done();
        }
        b.build()
    }

    pub fn record_count(&self) -> usize {
        self.packages
            .iter()
            .flat_map(|(_, symbols)| symbols)
            .map(|(_, kinds, files)| kinds.len() * files.len())
            .sum()
    }
}

/// Documents whose symbols and files are unique, so every anchor is exact.
pub fn arb_doc_model() -> impl Strategy<Value = DocModel> {
    let symbol = (
        prop::sample::subsequence(vec!["dependency", "privacy"], 1..=2),
        prop::collection::vec("[a-z]{3,8}", 1..=MAX_FILES_PER_SYMBOL),
        "[A-Z][a-z]{2,7}",
    );
    let package = ("[a-z]{3,8}", prop::collection::vec(symbol, 1..=MAX_SYMBOLS_PER_PACKAGE));
    prop::collection::vec(package, 1..=MAX_PACKAGES).prop_map(|packages| {
        let packages = packages
            .into_iter()
            .enumerate()
            .map(|(pi, (pname, symbols))| {
                let symbols = symbols
                    .into_iter()
                    .enumerate()
                    .map(|(si, (kinds, stems, sname))| {
                        let files = stems
                            .iter()
                            .enumerate()
                            .map(|(fi, stem)| format!("packs/referencing/app/{stem}_{pi}_{si}_{fi}.rb"))
                            .collect();
                        let kinds = kinds.into_iter().map(str::to_string).collect();
                        (format!("::{sname}P{pi}S{si}"), kinds, files)
                    })
                    .collect();
                (format!("packs/{pname}{pi}"), symbols)
            })
            .collect();
        DocModel { packages }
    })
}
