use std::collections::HashMap;

use packguard_types::{GroupingStrategy, Location, ViolationKind, ViolationRecord};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum GroupKey {
    PerLocation {
        symbol: String,
        document: String,
        line: u32,
        referencing_file: String,
    },
    PerPackage {
        symbol: String,
        target_package: String,
    },
}

impl GroupKey {
    fn of(record: &ViolationRecord, strategy: GroupingStrategy) -> Self {
        match strategy {
            GroupingStrategy::PerSymbolPerLocation => GroupKey::PerLocation {
                symbol: record.symbol_name.clone(),
                document: record.location.path.clone(),
                line: record.location.line,
                referencing_file: record.referencing_file.clone(),
            },
            GroupingStrategy::PerSymbolPerPackage => GroupKey::PerPackage {
                symbol: record.symbol_name.clone(),
                target_package: record.target_package_name.clone(),
            },
        }
    }
}

/// Records that share one review comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentGroup {
    records: Vec<ViolationRecord>,
}

impl CommentGroup {
    pub fn records(&self) -> &[ViolationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The comment is placed at the first member's location.
    pub fn anchor(&self) -> &Location {
        &self.records[0].location
    }

    pub fn symbol_name(&self) -> &str {
        &self.records[0].symbol_name
    }

    pub fn target_package_name(&self) -> &str {
        &self.records[0].target_package_name
    }

    /// Distinct kinds in first-seen order.
    pub fn kinds(&self) -> Vec<ViolationKind> {
        let mut out: Vec<ViolationKind> = Vec::new();
        for r in &self.records {
            if !out.contains(&r.kind) {
                out.push(r.kind.clone());
            }
        }
        out
    }

    /// Distinct member locations in first-seen order, anchor first.
    pub fn locations(&self) -> Vec<Location> {
        let mut out: Vec<Location> = Vec::new();
        for r in &self.records {
            if !out.contains(&r.location) {
                out.push(r.location.clone());
            }
        }
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentPlan {
    pub groups: Vec<CommentGroup>,
    /// Groups dropped by the cap.
    pub truncated: u32,
}

/// Groups `records` for commenting and keeps the first `max_comments` groups.
///
/// Groups come out in the order their first member was encountered.
pub fn plan_comments(
    records: &[ViolationRecord],
    strategy: GroupingStrategy,
    max_comments: usize,
) -> CommentPlan {
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<CommentGroup> = Vec::new();

    for r in records {
        let key = GroupKey::of(r, strategy);
        match index.get(&key) {
            Some(&i) => groups[i].records.push(r.clone()),
            None => {
                index.insert(key, groups.len());
                groups.push(CommentGroup {
                    records: vec![r.clone()],
                });
            }
        }
    }

    let truncated = groups.len().saturating_sub(max_comments);
    groups.truncate(max_comments);
    if truncated > 0 {
        tracing::info!(
            emitted = groups.len(),
            truncated,
            "comment cap reached"
        );
    }

    CommentPlan {
        groups,
        truncated: u32::try_from(truncated).unwrap_or(u32::MAX),
    }
}
