use crate::model::Dataset;
use serde::{Deserialize, Serialize};

/// Display metadata for one column of the report grid.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    pub field: String,
    pub header_name: String,
}

impl ColumnDescriptor {
    pub fn new(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            header_name: field.clone(),
            field,
        }
    }
}

/// Derives the columns of `dataset` from the keys of its first row.
///
/// The first row defines the schema; later rows with extra or missing keys are not reconciled.
pub fn infer_columns(dataset: &Dataset) -> Vec<ColumnDescriptor> {
    match dataset.first() {
        Some(row) => row.keys().map(ColumnDescriptor::new).collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fields;

    #[test]
    fn test_infer_columns_empty() {
        assert!(infer_columns(&Dataset::default()).is_empty());
    }

    #[test]
    fn test_infer_columns_from_first_row() {
        let dataset = Dataset::new(vec![
            fields([("name", "a"), ("city", "x"), ("date", "2024-01-01")]),
            fields([("other", "b"), ("extra", "y")]),
        ]);
        let fields: Vec<String> = infer_columns(&dataset)
            .into_iter()
            .map(|c| c.field)
            .collect();
        assert_eq!(fields, vec!["id", "name", "city", "date", "tags"]);
    }

    #[test]
    fn test_infer_columns_shows_source_id_and_tags() {
        let records = crate::parse::parse_csv(b"id,name,tags\nX-9,Ann,vip\n").unwrap();
        let dataset = Dataset::new(crate::parse::enhance(&records));
        let fields: Vec<String> = infer_columns(&dataset)
            .into_iter()
            .map(|c| c.field)
            .collect();
        assert_eq!(fields, vec!["id", "id_1", "name", "tags_1", "date", "tags"]);
        let row = dataset.first().unwrap();
        assert_eq!(row.cell("id_1").unwrap(), "X-9");
        assert_eq!(row.cell("tags_1").unwrap(), "vip");
        assert!(row.tags().is_empty());
    }

    #[test]
    fn test_header_name_mirrors_field() {
        let dataset = Dataset::new(vec![fields([("First Name", "a")])]);
        let columns = infer_columns(&dataset);
        assert_eq!(columns[1].field, "First Name");
        assert_eq!(columns[1].header_name, "First Name");
        let json = serde_json::to_string(&columns[1]).unwrap();
        assert_eq!(json, r#"{"field":"First Name","headerName":"First Name"}"#);
    }
}
