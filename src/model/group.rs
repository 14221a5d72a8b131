use crate::model::{Dataset, Row};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The group name used when rows are not grouped at all.
pub const UNGROUPED: &str = "Ungrouped";

/// How rows are partitioned for display. `None` in an `Option<GroupBy>` means no grouping.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    /// Group by the row's tags joined with ", ".
    Tags,
    /// Group by the row's date.
    Date,
}

serde_plain::derive_display_from_serialize!(GroupBy);
serde_plain::derive_fromstr_from_deserialize!(GroupBy);

impl GroupBy {
    fn key(&self, row: &Row) -> String {
        match self {
            GroupBy::Tags => row.tags().join(", "),
            GroupBy::Date => row.date().to_string(),
        }
    }
}

/// Group key to the rows sharing it. Groups iterate in order of first encounter and rows keep
/// their dataset order within a group.
pub type GroupPartition<'a> = IndexMap<String, Vec<&'a Row>>;

/// Partitions `dataset` by `group_by`. With no selector, all rows go into a single
/// `"Ungrouped"` group.
///
/// Rows without tags group under the empty-string key when grouping by tags. Use [`group_label`]
/// to render it.
pub fn group_rows(dataset: &Dataset, group_by: Option<GroupBy>) -> GroupPartition<'_> {
    let mut groups = GroupPartition::new();
    match group_by {
        None => {
            groups.insert(UNGROUPED.to_string(), dataset.iter().collect());
        }
        Some(group_by) => {
            for row in dataset {
                groups.entry(group_by.key(row)).or_default().push(row);
            }
        }
    }
    groups
}

/// The display label for a group key.
pub fn group_label(key: &str) -> &str {
    if key.is_empty() {
        UNGROUPED
    } else {
        key
    }
}
