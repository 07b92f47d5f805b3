use std::collections::{HashMap, HashSet};

use packguard_types::{RenameMapping, ViolationDiff, ViolationRecord};

/// Records of `left` not present in `right`, in `left` order.
///
/// Uses record identity, so a record that only moved to another line is
/// considered present.
pub fn set_difference(left: &[ViolationRecord], right: &[ViolationRecord]) -> Vec<ViolationRecord> {
    let right: HashSet<&ViolationRecord> = right.iter().collect();
    let mut seen: HashSet<&ViolationRecord> = HashSet::new();
    left.iter()
        .filter(|r| !right.contains(*r) && seen.insert(*r))
        .cloned()
        .collect()
}

/// Rewrites referencing files that were renamed to their new path.
pub fn normalize_renames(records: Vec<ViolationRecord>, renames: &[RenameMapping]) -> Vec<ViolationRecord> {
    if renames.is_empty() {
        return records;
    }
    let by_before: HashMap<&str, &str> = renames
        .iter()
        .map(|r| (r.before.as_str(), r.after.as_str()))
        .collect();

    records
        .into_iter()
        .map(|mut r| {
            if let Some(after) = by_before.get(r.referencing_file.as_str()) {
                r.referencing_file = (*after).to_string();
            }
            r
        })
        .collect()
}

/// Added and removed records between two parses of the same document.
///
/// `base` is normalized through `renames` first, so a referencing file that
/// was only renamed shows up in neither set.
pub fn diff_records(
    head: &[ViolationRecord],
    base: Vec<ViolationRecord>,
    renames: &[RenameMapping],
) -> ViolationDiff {
    let base = normalize_renames(base, renames);
    ViolationDiff {
        added: set_difference(head, &base),
        removed: set_difference(&base, head),
    }
}
