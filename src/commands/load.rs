use crate::api::{self, Mode};
use crate::commands::Out;
use crate::dashboard::Dashboard;
use crate::loader::LoadedData;
use crate::{Config, Result};
use anyhow::bail;
use serde::Serialize;
use std::fmt::Write;

/// How many rows one file of a folder load produced.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct FileSummary {
    pub filename: String,
    pub rows: usize,
}

/// Loads `filenames` of `folder` together, all of the folder's files when `filenames` is empty.
///
/// # Errors
/// - `folder` is not in the catalog.
/// - Any one of the files fails to load. The other files' data is discarded.
pub async fn load(
    config: Config,
    mode: Mode,
    folder: &str,
    filenames: &[String],
) -> Result<Out<Vec<FileSummary>>> {
    let fetch = api::fetcher(&config, mode)?;
    let mut dashboard = Dashboard::new(config, fetch)?;
    dashboard.select_folder(folder)?;
    let state = dashboard.load_folder(filenames).await?;
    if let Some(error) = state.error() {
        bail!("{error}");
    }

    let summaries: Vec<FileSummary> = match state.data() {
        LoadedData::Many(map) => map
            .iter()
            .map(|(filename, dataset)| FileSummary {
                filename: filename.clone(),
                rows: dataset.len(),
            })
            .collect(),
        LoadedData::Single(_) => Vec::new(),
    };

    let mut message = format!("Loaded {} file(s) from '{folder}'", summaries.len());
    for summary in &summaries {
        write!(message, "\n  {}: {} row(s)", summary.filename, summary.rows)?;
    }
    Ok(Out::new(message, summaries))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_all_files_of_folder() {
        let out = load(Config::default(), Mode::Test, "sales", &[])
            .await
            .unwrap();
        assert_eq!(
            out.structure().unwrap(),
            &vec![
                FileSummary {
                    filename: "people-1000.csv".into(),
                    rows: 5
                },
                FileSummary {
                    filename: "employees.csv".into(),
                    rows: 3
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_load_fails_when_any_file_fails() {
        let filenames = vec!["people-1000.csv".to_string(), "missing.csv".to_string()];
        let err = load(Config::default(), Mode::Test, "sales", &filenames)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("missing.csv"));
    }
}
