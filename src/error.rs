use thiserror::Error;

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Raised by the CSV parser when the raw bytes cannot be decoded or read as CSV text.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("{0}")]
pub struct ParseError(String);

impl ParseError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

/// The ways a load of one or more CSV files can fail.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum LoadError {
    /// The fetch collaborator returned a non-success status or the transport failed.
    #[error("Failed to fetch {filename}: {reason}")]
    Fetch { filename: String, reason: String },

    /// The file was retrieved but its body could not be parsed.
    #[error("Failed to parse {filename}: {message}")]
    Parse { filename: String, message: String },

    /// At least one file of a load request failed. `first` is the first failure in request order.
    #[error("{failed} of {total} file(s) failed to load: {first}")]
    Aggregate {
        failed: usize,
        total: usize,
        first: Box<LoadError>,
    },
}

impl LoadError {
    pub(crate) fn fetch(filename: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Fetch {
            filename: filename.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn parse(filename: impl Into<String>, e: ParseError) -> Self {
        Self::Parse {
            filename: filename.into(),
            message: e.0,
        }
    }

    /// The name of the file this error is about, `None` for an aggregate.
    pub fn filename(&self) -> Option<&str> {
        match self {
            LoadError::Fetch { filename, .. } | LoadError::Parse { filename, .. } => {
                Some(filename.as_str())
            }
            LoadError::Aggregate { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_message_names_file_and_reason() {
        let e = LoadError::fetch("missing.csv", "404 Not Found");
        assert_eq!(e.to_string(), "Failed to fetch missing.csv: 404 Not Found");
        assert_eq!(e.filename(), Some("missing.csv"));
    }

    #[test]
    fn test_aggregate_error_summarizes_first_failure() {
        let e = LoadError::Aggregate {
            failed: 1,
            total: 2,
            first: Box::new(LoadError::parse("a.csv", ParseError::new("bad utf-8"))),
        };
        assert_eq!(
            e.to_string(),
            "1 of 2 file(s) failed to load: Failed to parse a.csv: bad utf-8"
        );
        assert!(e.filename().is_none());
    }
}
