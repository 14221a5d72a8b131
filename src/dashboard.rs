//! The `Dashboard` owns all of the mutable state a presentation shell works against: the selected
//! folder and file, the active-reports set, the loader and the tagged working copy of the loaded
//! dataset.

use crate::api::Fetch;
use crate::error::LoadError;
use crate::loader::{fetch_request, CsvLoader, LoadRequest, LoadState, LoadedData, Ticket};
use crate::model::{
    file_entries, group_rows, infer_columns, ActiveReports, ColumnDescriptor, Dataset, FileEntry,
    GroupBy, GroupPartition, RowId, TaggedRows,
};
use crate::{Config, Result};
use anyhow::{bail, Context};
use std::sync::Arc;
use tracing::debug;

pub struct Dashboard {
    config: Config,
    folder: String,
    selected_file: Option<String>,
    active: ActiveReports,
    loader: CsvLoader,
    tagged: TaggedRows,
    group_by: Option<GroupBy>,
}

impl Dashboard {
    /// Creates a dashboard showing the first folder of the catalog with no file selected.
    pub fn new(config: Config, fetch: Arc<dyn Fetch>) -> Result<Self> {
        let folder = config
            .default_folder()
            .context("The folder catalog is empty")?
            .to_string();
        Ok(Self {
            config,
            folder,
            selected_file: None,
            active: ActiveReports::new(),
            loader: CsvLoader::new(fetch),
            tagged: TaggedRows::default(),
            group_by: None,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    pub fn selected_file(&self) -> Option<&str> {
        self.selected_file.as_deref()
    }

    /// The files of the current folder.
    pub fn files(&self) -> &[String] {
        self.config.files(&self.folder).unwrap_or_default()
    }

    /// The files of the current folder with their active switches.
    pub fn file_entries(&self) -> Vec<FileEntry> {
        file_entries(self.files(), &self.active)
    }

    pub fn active(&self) -> &ActiveReports {
        &self.active
    }

    pub fn state(&self) -> &LoadState {
        self.loader.state()
    }

    pub fn group_by(&self) -> Option<GroupBy> {
        self.group_by
    }

    /// The tagged working copy of the selected file's dataset.
    pub fn rows(&self) -> &Dataset {
        self.tagged.dataset()
    }

    /// Switches to `folder`. The file selection, tags and active switches are reset.
    pub fn select_folder(&mut self, folder: &str) -> Result<()> {
        if self.config.files(folder).is_none() {
            bail!("There is no folder named '{folder}'");
        }
        debug!("Selecting folder '{folder}'");
        self.folder = folder.to_string();
        self.selected_file = None;
        self.active.clear();
        self.tagged = TaggedRows::default();
        // drops any outstanding load
        let _ = self.loader.begin(LoadRequest::single::<String>(folder, None));
        Ok(())
    }

    /// Starts loading `filename` of the current folder, or clears the selection when `None`.
    /// Returns the ticket to settle with `settle`, `None` if there is nothing to fetch.
    pub fn begin_select_file(&mut self, filename: Option<&str>) -> Result<Option<Ticket>> {
        if let Some(filename) = filename {
            if !self.files().iter().any(|f| f == filename) {
                bail!(
                    "There is no file named '{filename}' in folder '{}'",
                    self.folder
                );
            }
        }
        self.selected_file = filename.map(str::to_string);
        self.tagged = TaggedRows::default();
        Ok(self
            .loader
            .begin(LoadRequest::single(self.folder.clone(), filename)))
    }

    /// Publishes a load outcome. A stale outcome is dropped and `false` returned. An accepted
    /// outcome replaces the tagged working copy, discarding every tag.
    pub fn settle(
        &mut self,
        ticket: Ticket,
        outcome: std::result::Result<LoadedData, LoadError>,
    ) -> bool {
        if !self.loader.settle(ticket, outcome) {
            return false;
        }
        self.tagged = self
            .selected_file
            .as_deref()
            .and_then(|filename| self.loader.state().data().dataset(filename))
            .map(TaggedRows::new)
            .unwrap_or_default();
        true
    }

    /// Selects `filename` and loads it.
    pub async fn select_file(&mut self, filename: Option<&str>) -> Result<&LoadState> {
        if let Some(ticket) = self.begin_select_file(filename)? {
            let outcome = fetch_request(self.loader.fetcher(), ticket.request()).await;
            self.settle(ticket, outcome);
        }
        Ok(self.loader.state())
    }

    /// Loads `filenames` of the current folder together, or all of its files when empty. The file
    /// selection is cleared.
    pub async fn load_folder(&mut self, filenames: &[String]) -> Result<&LoadState> {
        let filenames = if filenames.is_empty() {
            self.files().to_vec()
        } else {
            filenames.to_vec()
        };
        self.selected_file = None;
        self.tagged = TaggedRows::default();
        let request = LoadRequest::many(self.folder.clone(), filenames);
        Ok(self.loader.load(request).await)
    }

    /// Flips the active switch of `filename`. Returns whether it is now active.
    pub fn toggle_active(&mut self, filename: &str) -> bool {
        self.active.toggle(filename)
    }

    pub fn add_tag(&mut self, id: RowId, tag: &str) -> bool {
        self.tagged.add_tag(id, tag)
    }

    pub fn clear_tags(&mut self, id: RowId) -> bool {
        self.tagged.clear_tags(id)
    }

    pub fn set_group_by(&mut self, group_by: Option<GroupBy>) {
        self.group_by = group_by;
    }

    /// The columns of the selected file, derived from its first row.
    pub fn columns(&self) -> Vec<ColumnDescriptor> {
        infer_columns(self.tagged.dataset())
    }

    /// The working copy's rows partitioned by the current grouping.
    pub fn groups(&self) -> GroupPartition<'_> {
        group_rows(self.tagged.dataset(), self.group_by)
    }
}
