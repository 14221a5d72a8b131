use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::debug;

/// The key of the derived, per-dataset row identifier.
pub const ID_KEY: &str = "id";

/// The key of the derived tag list.
pub const TAGS_KEY: &str = "tags";

/// The key of the date field that every enhanced row carries.
pub const DATE_KEY: &str = "date";

/// The value assigned to `date` when a row has none.
pub const DEFAULT_DATE: &str = "2024-01-01";

/// One parsed CSV record: column name to cell value, in header order.
pub type Fields = IndexMap<String, String>;

/// The identifier of a row within its dataset. Assigned in source order starting at zero.
pub type RowId = usize;

/// A single materialized row of a dataset.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct Row {
    id: RowId,
    fields: Fields,
    tags: Vec<String>,
}

impl Row {
    pub fn new(id: RowId, fields: Fields) -> Self {
        Self {
            id,
            fields,
            tags: Vec::new(),
        }
    }

    pub fn id(&self) -> RowId {
        self.id
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// The raw cell value for `key`, if the source record had that column.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// The row's date, empty only if the row was never enhanced.
    pub fn date(&self) -> &str {
        self.get(DATE_KEY).unwrap_or_default()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub(crate) fn tags_mut(&mut self) -> &mut Vec<String> {
        &mut self.tags
    }

    /// The display value of `key`, including the derived `id` and `tags` keys.
    pub fn cell(&self, key: &str) -> Option<Cow<'_, str>> {
        match key {
            ID_KEY => Some(Cow::Owned(self.id.to_string())),
            TAGS_KEY => Some(Cow::Owned(self.tags.join(", "))),
            _ => self.get(key).map(Cow::Borrowed),
        }
    }

    /// Enumerates this row's keys: `id`, then the source fields in header order, then `tags`.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        std::iter::once(ID_KEY)
            .chain(self.source_keys())
            .chain(std::iter::once(TAGS_KEY))
    }

    fn source_keys(&self) -> impl Iterator<Item = &str> {
        self.fields
            .keys()
            .map(String::as_str)
            .filter(|k| *k != ID_KEY && *k != TAGS_KEY)
    }
}

impl Serialize for Row {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(ID_KEY, &self.id)?;
        for key in self.source_keys() {
            map.serialize_entry(key, &self.fields[key])?;
        }
        map.serialize_entry(TAGS_KEY, &self.tags)?;
        map.end()
    }
}

/// The ordered rows produced from one CSV file.
///
/// Ids are the contiguous range `0..len` in source order and are never reassigned.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Dataset {
    rows: Vec<Row>,
}

impl Dataset {
    /// Materializes a dataset, assigning each record its insertion index as `id`.
    ///
    /// Source columns named `id` or `tags` would be hidden by the derived keys, so they are
    /// renamed to the first free `id_{n}` / `tags_{n}` (n from 1), keeping their position.
    pub fn new(records: impl IntoIterator<Item = Fields>) -> Self {
        let records: Vec<Fields> = records.into_iter().collect();
        let renames = derived_key_renames(&records);
        let rows = records
            .into_iter()
            .enumerate()
            .map(|(id, fields)| {
                let fields = if renames.is_empty() {
                    fields
                } else {
                    fields
                        .into_iter()
                        .map(|(k, v)| match renames.get(k.as_str()) {
                            Some(renamed) => (renamed.clone(), v),
                            None => (k, v),
                        })
                        .collect()
                };
                Row::new(id, fields)
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    pub fn get(&self, id: RowId) -> Option<&Row> {
        // ids are insertion indexes, but look the row up by id rather than trusting the position
        self.rows.get(id).filter(|r| r.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: RowId) -> Option<&mut Row> {
        self.rows.get_mut(id).filter(|r| r.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }
}

/// Maps each derived key that some record also uses as a column name to a free column name.
fn derived_key_renames(records: &[Fields]) -> HashMap<&'static str, String> {
    let mut renames = HashMap::new();
    for key in [ID_KEY, TAGS_KEY] {
        if !records.iter().any(|r| r.contains_key(key)) {
            continue;
        }
        let renamed = (1..)
            .map(|n| format!("{key}_{n}"))
            .find(|candidate| !records.iter().any(|r| r.contains_key(candidate.as_str())))
            .unwrap_or_else(|| format!("{key}_source"));
        debug!("Source column '{key}' is shown as '{renamed}'");
        renames.insert(key, renamed);
    }
    renames
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
pub(crate) fn fields<const N: usize>(pairs: [(&str, &str); N]) -> Fields {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_assigns_contiguous_ids() {
        let dataset = Dataset::new(vec![
            fields([("name", "a")]),
            fields([("name", "b")]),
            fields([("name", "c")]),
        ]);
        let ids: Vec<RowId> = dataset.iter().map(Row::id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(dataset.get(1).unwrap().get("name"), Some("b"));
        assert!(dataset.get(3).is_none());
    }

    #[test]
    fn test_row_keys_order() {
        let row = Row::new(0, fields([("b", "1"), ("a", "2"), ("date", "2024-05-05")]));
        let keys: Vec<&str> = row.keys().collect();
        assert_eq!(keys, vec!["id", "b", "a", "date", "tags"]);
    }

    #[test]
    fn test_row_keys_skip_source_columns_named_like_derived_keys() {
        let row = Row::new(4, fields([("id", "x-9"), ("name", "n"), ("tags", "t")]));
        let keys: Vec<&str> = row.keys().collect();
        assert_eq!(keys, vec!["id", "name", "tags"]);
        assert_eq!(row.cell("id").unwrap(), "4");
    }

    #[test]
    fn test_dataset_keeps_source_columns_named_like_derived_keys() {
        let dataset = Dataset::new(vec![
            fields([("id", "X-9"), ("name", "Ann"), ("tags", "vip"), ("id_1", "taken")]),
            fields([("id", "Y-1"), ("name", "Bo")]),
        ]);
        let row = dataset.get(0).unwrap();
        let keys: Vec<&str> = row.keys().collect();
        assert_eq!(keys, vec!["id", "id_2", "name", "tags_1", "id_1", "tags"]);
        assert_eq!(row.cell("id").unwrap(), "0");
        assert_eq!(row.get("id_2"), Some("X-9"));
        assert_eq!(row.get("tags_1"), Some("vip"));
        assert_eq!(dataset.get(1).unwrap().get("id_2"), Some("Y-1"));

        let json = serde_json::to_string(dataset.get(1).unwrap()).unwrap();
        assert_eq!(json, r#"{"id":1,"id_2":"Y-1","name":"Bo","tags":[]}"#);
    }

    #[test]
    fn test_row_serializes_flat() {
        let mut row = Row::new(2, fields([("name", "Ann"), ("date", "2024-01-01")]));
        row.tags_mut().push("vip".to_string());
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(
            json,
            r#"{"id":2,"name":"Ann","date":"2024-01-01","tags":["vip"]}"#
        );
    }
}
