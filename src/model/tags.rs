use crate::model::{Dataset, RowId};
use tracing::{debug, trace};

/// The working copy of a loaded dataset that tag edits are applied to.
///
/// Edits never reach the loader's dataset. Reloading a file replaces the working copy and with it
/// every tag.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct TaggedRows {
    dataset: Dataset,
}

impl TaggedRows {
    /// Takes a private copy of `source`.
    pub fn new(source: &Dataset) -> Self {
        Self {
            dataset: source.clone(),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Appends `tag` to the tags of row `id`. Returns `false`, changing nothing, if `tag` is blank
    /// or no row has that id.
    pub fn add_tag(&mut self, id: RowId, tag: &str) -> bool {
        if tag.trim().is_empty() {
            trace!("Ignoring blank tag for row {id}");
            return false;
        }
        match self.dataset.get_mut(id) {
            Some(row) => {
                row.tags_mut().push(tag.to_string());
                debug!("Tagged row {id} with '{tag}'");
                true
            }
            None => {
                debug!("No row with id {id} to tag");
                false
            }
        }
    }

    /// Removes every tag from row `id`, leaving it with no tags at all. Returns `false` if no row
    /// has that id.
    pub fn clear_tags(&mut self, id: RowId) -> bool {
        match self.dataset.get_mut(id) {
            Some(row) => {
                row.tags_mut().clear();
                debug!("Cleared tags of row {id}");
                true
            }
            None => false,
        }
    }
}
