use std::collections::HashSet;

use packguard_types::{RenameMapping, ViolationRecord};

use crate::resolver::SymbolResolver;

/// What rename suppression removed from the added set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Suppressed {
    pub kept: Vec<ViolationRecord>,
    /// Symbols whose defining file is the target of a rename.
    pub renamed_symbols: Vec<String>,
    /// Records dropped because their symbol was renamed.
    pub dropped_for_symbol: u32,
    /// Records dropped because the referencing file itself was renamed.
    pub dropped_for_reference: u32,
}

/// Drops added records that a rename, not a new reference, explains.
///
/// A symbol counts as renamed when `resolver` places its definition in the
/// `after` side of a rename; every added record for it is dropped. Any record
/// whose referencing file is a rename target is dropped too. Without a resolver
/// only the second rule applies.
pub fn suppress_renames(
    added: Vec<ViolationRecord>,
    renames: &[RenameMapping],
    resolver: Option<&dyn SymbolResolver>,
) -> Suppressed {
    suppress(added, renames, resolver, true)
}

/// Drops only the added records whose symbol moved with a rename.
///
/// Records referenced from a renamed file are kept: the linter reports
/// offenses for the file as it stands, so a new reference inside a moved file
/// is still new.
pub fn suppress_renamed_symbols(
    added: Vec<ViolationRecord>,
    renames: &[RenameMapping],
    resolver: Option<&dyn SymbolResolver>,
) -> Suppressed {
    suppress(added, renames, resolver, false)
}

fn suppress(
    added: Vec<ViolationRecord>,
    renames: &[RenameMapping],
    resolver: Option<&dyn SymbolResolver>,
    drop_moved_references: bool,
) -> Suppressed {
    if renames.is_empty() {
        return Suppressed {
            kept: added,
            ..Suppressed::default()
        };
    }

    let targets: HashSet<&str> = renames.iter().map(|r| r.after.as_str()).collect();

    let mut renamed_symbols: Vec<String> = Vec::new();
    if let Some(resolver) = resolver {
        let mut checked: HashSet<&str> = HashSet::new();
        for r in &added {
            if !checked.insert(r.symbol_name.as_str()) {
                continue;
            }
            match resolver.resolve(&r.symbol_name) {
                Some(defined_in) if targets.contains(defined_in.as_str()) => {
                    tracing::debug!(
                        symbol = %r.symbol_name,
                        defined_in = %defined_in,
                        "symbol moved with a rename"
                    );
                    renamed_symbols.push(r.symbol_name.clone());
                }
                Some(_) => {}
                None => tracing::debug!(symbol = %r.symbol_name, "symbol not resolvable"),
            }
        }
    }

    let renamed: HashSet<&str> = renamed_symbols.iter().map(String::as_str).collect();
    let mut out = Suppressed::default();
    for r in added {
        if renamed.contains(r.symbol_name.as_str()) {
            out.dropped_for_symbol += 1;
        } else if drop_moved_references && targets.contains(r.referencing_file.as_str()) {
            out.dropped_for_reference += 1;
        } else {
            out.kept.push(r);
        }
    }
    out.renamed_symbols = renamed_symbols;
    out
}
