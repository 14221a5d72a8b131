//! Turns raw CSV bytes into ordered records and applies default-value normalization to them.

use crate::error::ParseError;
use crate::model::{Fields, DATE_KEY, DEFAULT_DATE};
use std::io::Cursor;
use tracing::trace;

const BOM: char = '\u{feff}';

/// Prefix of the keys under which cells beyond the header's width are kept.
pub const EXTRA_KEY_PREFIX: &str = "__parsed_extra_";

/// Parses CSV text using its first line as the header row.
///
/// Blank and whitespace-only lines are skipped. Rows shorter than the header omit the missing
/// keys; cells beyond the header are stored under `__parsed_extra_{n}`. Only input that is not
/// valid UTF-8 fails.
pub fn parse_csv(raw: &[u8]) -> Result<Vec<Fields>, ParseError> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| ParseError::new(format!("The CSV text is not valid UTF-8: {e}")))?;
    let text = text.strip_prefix(BOM).unwrap_or(text);

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(Cursor::new(text.as_bytes()));

    let mut records = rdr.records();
    let headers: Vec<String> = loop {
        match records.next() {
            Some(record) => {
                let record = record.map_err(|e| ParseError::new(e.to_string()))?;
                if is_blank(&record) {
                    continue;
                }
                break record.iter().map(str::to_string).collect();
            }
            None => return Ok(Vec::new()),
        }
    };
    trace!("CSV headers: {headers:?}");

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(|e| ParseError::new(e.to_string()))?;
        if is_blank(&record) {
            continue;
        }
        let mut row = Fields::with_capacity(headers.len());
        for (ix, value) in record.iter().enumerate() {
            let key = match headers.get(ix) {
                Some(header) => header.clone(),
                None => format!("{EXTRA_KEY_PREFIX}{}", ix - headers.len()),
            };
            row.insert(key, value.to_string());
        }
        rows.push(row);
    }
    Ok(rows)
}

/// A line that was empty or held only whitespace. The csv reader already drops zero-length lines.
fn is_blank(record: &csv::StringRecord) -> bool {
    record.len() <= 1 && record.iter().all(|field| field.trim().is_empty())
}

/// Returns a copy of `rows` in which every row has a non-empty `date`.
pub fn enhance(rows: &[Fields]) -> Vec<Fields> {
    rows.iter()
        .map(|row| {
            let mut row = row.clone();
            match row.get_mut(DATE_KEY) {
                Some(date) if !date.is_empty() => {}
                Some(date) => *date = DEFAULT_DATE.to_string(),
                None => {
                    row.insert(DATE_KEY.to_string(), DEFAULT_DATE.to_string());
                }
            }
            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fields;

    #[test]
    fn test_parse_header_and_two_rows() {
        let rows = parse_csv(b"a,b,c\n1,2,3\n4,5,6\n").unwrap();
        assert_eq!(rows.len(), 2);
        let keys: Vec<&str> = rows[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(rows[0], fields([("a", "1"), ("b", "2"), ("c", "3")]));
        assert_eq!(rows[1], fields([("a", "4"), ("b", "5"), ("c", "6")]));
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let rows = parse_csv(b"a,b,c\n1,2,3\n\n   \n4,5,6").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["a"], "4");
    }

    #[test]
    fn test_parse_quoted_fields() {
        let raw = "name,notes\n\"Smith, Ann\",\"line one\nline two\"\n\"Bo \"\"B\"\"\",x\n";
        let rows = parse_csv(raw.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["name"], "Smith, Ann");
        assert_eq!(rows[0]["notes"], "line one\nline two");
        assert_eq!(rows[1]["name"], "Bo \"B\"");
    }

    #[test]
    fn test_parse_is_permissive_about_row_width() {
        let rows = parse_csv(b"a,b\n1\n2,3,4,5\n").unwrap();
        assert_eq!(rows[0], fields([("a", "1")]));
        assert_eq!(
            rows[1],
            fields([
                ("a", "2"),
                ("b", "3"),
                ("__parsed_extra_0", "4"),
                ("__parsed_extra_1", "5")
            ])
        );
    }

    #[test]
    fn test_parse_duplicate_headers() {
        let rows = parse_csv(b"a,b,a\n1,2,3\n").unwrap();
        assert_eq!(rows.len(), 1);
        let keys: Vec<&str> = rows[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(rows[0], fields([("a", "3"), ("b", "2")]));
    }

    #[test]
    fn test_parse_strips_bom() {
        let rows = parse_csv("\u{feff}id,name\n1,x\n".as_bytes()).unwrap();
        assert_eq!(rows[0]["id"], "1");
    }

    #[test]
    fn test_parse_empty_and_header_only() {
        assert!(parse_csv(b"").unwrap().is_empty());
        assert!(parse_csv(b"a,b,c\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_invalid_utf8() {
        let err = parse_csv(&[b'a', b'\n', 0xff, 0xfe]).unwrap_err();
        assert!(err.message().contains("UTF-8"));
    }

    #[test]
    fn test_enhance_fills_missing_and_empty_dates() {
        let input = vec![
            fields([("name", "a")]),
            fields([("name", "b"), ("date", "")]),
            fields([("name", "c"), ("date", "2023-03-04")]),
        ];
        let out = enhance(&input);
        assert_eq!(out[0]["date"], DEFAULT_DATE);
        assert_eq!(out[1]["date"], DEFAULT_DATE);
        assert_eq!(out[2]["date"], "2023-03-04");
        // input untouched
        assert!(input[0].get("date").is_none());
        assert_eq!(input[1]["date"], "");
    }

    #[test]
    fn test_enhance_is_idempotent() {
        let once = enhance(&[fields([("x", "1")]), fields([("date", "2020-02-02")])]);
        assert_eq!(enhance(&once), once);
    }

    #[test]
    fn test_enhance_keeps_existing_date_position() {
        let out = enhance(&[fields([("date", ""), ("name", "a")])]);
        let keys: Vec<&str> = out[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["date", "name"]);
    }
}
