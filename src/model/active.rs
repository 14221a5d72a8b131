use serde::Serialize;
use std::collections::BTreeSet;

/// The filenames a user has switched to "active".
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ActiveReports(BTreeSet<String>);

impl ActiveReports {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes `filename` if it is active, otherwise adds it. Returns whether it is now active.
    pub fn toggle(&mut self, filename: &str) -> bool {
        if self.0.remove(filename) {
            false
        } else {
            self.0.insert(filename.to_string());
            true
        }
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.0.contains(filename)
    }

    pub fn clear(&mut self) {
        self.0.clear()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// A file of a folder together with its active switch.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct FileEntry {
    pub filename: String,
    pub active: bool,
}

/// Lists `filenames` in order, marking the ones in `active`.
pub fn file_entries<S: AsRef<str>>(filenames: &[S], active: &ActiveReports) -> Vec<FileEntry> {
    filenames
        .iter()
        .map(|f| FileEntry {
            filename: f.as_ref().to_string(),
            active: active.contains(f.as_ref()),
        })
        .collect()
}
