//! Types that represent the report data model, such as `Row`, `Dataset` and `ColumnDescriptor`,
//! and the pure operations the dashboard performs on them.
mod active;
mod column;
mod group;
mod page;
mod row;
mod tags;

pub use active::{file_entries, ActiveReports, FileEntry};
pub use column::{infer_columns, ColumnDescriptor};
pub use group::{group_label, group_rows, GroupBy, GroupPartition, UNGROUPED};
pub use page::{paginate, sort_rows, Page, SortOrder, DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};
pub use row::{Dataset, Fields, Row, RowId, DATE_KEY, DEFAULT_DATE, ID_KEY, TAGS_KEY};
pub use tags::TaggedRows;

#[cfg(test)]
pub(crate) use row::fields;
