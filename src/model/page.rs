use crate::model::Row;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// The page sizes the report grid offers.
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [20, 50, 100, 1000];

/// The page size used when none is chosen.
pub const DEFAULT_PAGE_SIZE: usize = PAGE_SIZE_OPTIONS[0];

#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

serde_plain::derive_display_from_serialize!(SortOrder);
serde_plain::derive_fromstr_from_deserialize!(SortOrder);

/// Stable sort of `rows` by the display value of `field`. Rows missing the field sort first in
/// ascending order.
pub fn sort_rows(rows: &mut [&Row], field: &str, order: SortOrder) {
    rows.sort_by(|a, b| {
        let ordering = compare_cells(a, b, field);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

fn compare_cells(a: &Row, b: &Row, field: &str) -> Ordering {
    // the derived id is numeric; everything else compares as text
    if field == crate::model::ID_KEY {
        return a.id().cmp(&b.id());
    }
    a.cell(field).cmp(&b.cell(field))
}

/// One page of rows.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Page<'a> {
    /// Zero-based page number.
    pub number: usize,
    pub size: usize,
    pub total_rows: usize,
    pub total_pages: usize,
    pub rows: Vec<&'a Row>,
}

/// Returns page `number` (zero-based) of `rows` with `size` rows per page. A page past the end is
/// empty; a `size` of zero is treated as the default page size.
pub fn paginate<'a>(rows: &[&'a Row], number: usize, size: usize) -> Page<'a> {
    let size = if size == 0 { DEFAULT_PAGE_SIZE } else { size };
    let total_rows = rows.len();
    let total_pages = total_rows.div_ceil(size);
    let start = number.saturating_mul(size).min(total_rows);
    let end = start.saturating_add(size).min(total_rows);
    Page {
        number,
        size,
        total_rows,
        total_pages,
        rows: rows[start..end].to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{fields, Dataset, RowId};

    fn ids(rows: &[&Row]) -> Vec<RowId> {
        rows.iter().map(|r| r.id()).collect()
    }

    #[test]
    fn test_sort_by_field_both_orders() {
        let dataset = Dataset::new(vec![
            fields([("name", "carol")]),
            fields([("name", "alice")]),
            fields([("other", "x")]),
            fields([("name", "bob")]),
        ]);
        let mut rows: Vec<&Row> = dataset.iter().collect();
        sort_rows(&mut rows, "name", SortOrder::Asc);
        assert_eq!(ids(&rows), vec![2, 1, 3, 0]);
        sort_rows(&mut rows, "name", SortOrder::Desc);
        assert_eq!(ids(&rows), vec![0, 3, 1, 2]);
    }

    #[test]
    fn test_sort_by_id_is_numeric() {
        let dataset = Dataset::new((0..12).map(|_| fields([("x", "1")])));
        let mut rows: Vec<&Row> = dataset.iter().collect();
        sort_rows(&mut rows, "id", SortOrder::Desc);
        assert_eq!(rows[0].id(), 11);
        assert_eq!(rows[11].id(), 0);
    }

    #[test]
    fn test_sort_order_text() {
        assert_eq!(SortOrder::Desc.to_string(), "desc");
        assert_eq!("asc".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert!("up".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_paginate() {
        let dataset = Dataset::new((0..45).map(|_| fields([("x", "1")])));
        let rows: Vec<&Row> = dataset.iter().collect();

        let first = paginate(&rows, 0, DEFAULT_PAGE_SIZE);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.total_rows, 45);
        assert_eq!(ids(&first.rows), (0..20).collect::<Vec<_>>());

        let last = paginate(&rows, 2, 20);
        assert_eq!(ids(&last.rows), (40..45).collect::<Vec<_>>());

        assert!(paginate(&rows, 3, 20).rows.is_empty());
        assert_eq!(paginate(&rows, 0, 0).size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_paginate_empty() {
        let page = paginate(&[], 0, 50);
        assert_eq!(page.total_pages, 0);
        assert!(page.rows.is_empty());
    }
}
