//! Fetches, parses and enhances CSV files and tracks the observable state of the latest load.
//!
//! A load is split into `CsvLoader::begin` and `CsvLoader::settle` so that a caller can start a
//! new load while an older one is still in flight. Every `begin` issues a new `Ticket`; `settle`
//! only publishes an outcome whose ticket is still the current one, so a slow, stale response can
//! never overwrite the state of a newer selection.

use crate::api::Fetch;
use crate::error::LoadError;
use crate::model::Dataset;
use crate::parse::{enhance, parse_csv};
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// What to load: one (possibly unselected) file, or several files of a folder at once.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum LoadRequest {
    Single {
        folder: String,
        filename: Option<String>,
    },
    Many {
        folder: String,
        filenames: Vec<String>,
    },
}

impl LoadRequest {
    pub fn single<S: Into<String>>(folder: impl Into<String>, filename: Option<S>) -> Self {
        Self::Single {
            folder: folder.into(),
            filename: filename.map(Into::into),
        }
    }

    pub fn many<S, I>(folder: impl Into<String>, filenames: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        Self::Many {
            folder: folder.into(),
            filenames: filenames.into_iter().map(Into::into).collect(),
        }
    }

    pub fn folder(&self) -> &str {
        match self {
            LoadRequest::Single { folder, .. } | LoadRequest::Many { folder, .. } => folder,
        }
    }

    /// The files this request fetches, in request order.
    pub fn filenames(&self) -> Vec<&str> {
        match self {
            LoadRequest::Single { filename, .. } => filename.iter().map(String::as_str).collect(),
            LoadRequest::Many { filenames, .. } => filenames.iter().map(String::as_str).collect(),
        }
    }

    /// The data a request of this shape has before anything is loaded.
    fn empty_data(&self) -> LoadedData {
        match self {
            LoadRequest::Single { .. } => LoadedData::Single(Dataset::default()),
            LoadRequest::Many { .. } => LoadedData::Many(IndexMap::new()),
        }
    }
}

/// The loaded data: one dataset, or filename to dataset in request order.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LoadedData {
    Single(Dataset),
    Many(IndexMap<String, Dataset>),
}

impl Default for LoadedData {
    fn default() -> Self {
        LoadedData::Single(Dataset::default())
    }
}

impl LoadedData {
    /// The dataset of `filename`. A single-file result answers for whatever file it holds.
    pub fn dataset(&self, filename: &str) -> Option<&Dataset> {
        match self {
            LoadedData::Single(dataset) => Some(dataset),
            LoadedData::Many(map) => map.get(filename),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            LoadedData::Single(dataset) => dataset.is_empty(),
            LoadedData::Many(map) => map.is_empty(),
        }
    }
}

/// The state a caller observes: whether a load is outstanding, the error of the last load and the
/// data of the last successful load.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
pub struct LoadState {
    loading: bool,
    error: Option<String>,
    data: LoadedData,
}

impl LoadState {
    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn data(&self) -> &LoadedData {
        &self.data
    }
}

/// Identifies one load started with `CsvLoader::begin`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Ticket {
    generation: u64,
    request: LoadRequest,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn request(&self) -> &LoadRequest {
        &self.request
    }
}

/// Loads CSV files through a `Fetch` collaborator.
pub struct CsvLoader {
    fetch: Arc<dyn Fetch>,
    generation: u64,
    current: Option<LoadRequest>,
    state: LoadState,
}

impl CsvLoader {
    pub fn new(fetch: Arc<dyn Fetch>) -> Self {
        Self {
            fetch,
            generation: 0,
            current: None,
            state: LoadState::default(),
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn fetcher(&self) -> Arc<dyn Fetch> {
        self.fetch.clone()
    }

    /// Makes `request` the current request and discards the previous data.
    ///
    /// Returns `None` when there is nothing to fetch (no filename, or an empty list). The state is
    /// then settled immediately with empty data and no network call is made.
    pub fn begin(&mut self, request: LoadRequest) -> Option<Ticket> {
        self.generation += 1;
        let data = request.empty_data();
        let nothing_to_fetch = request.filenames().is_empty();
        self.current = Some(request.clone());
        self.state = LoadState {
            loading: !nothing_to_fetch,
            error: None,
            data,
        };
        if nothing_to_fetch {
            debug!("Nothing to load in folder '{}'", request.folder());
            return None;
        }
        debug!("Load {} started: {request:?}", self.generation);
        Some(Ticket {
            generation: self.generation,
            request,
        })
    }

    /// Publishes the outcome of the load identified by `ticket`. Returns `false`, leaving the state
    /// untouched, if a newer load has begun since.
    pub fn settle(&mut self, ticket: Ticket, outcome: Result<LoadedData, LoadError>) -> bool {
        if ticket.generation != self.generation || self.current.as_ref() != Some(&ticket.request) {
            debug!(
                "Discarding stale load {} (current is {})",
                ticket.generation, self.generation
            );
            return false;
        }
        self.state.loading = false;
        match outcome {
            Ok(data) => {
                info!(
                    "Loaded {} file(s) from '{}'",
                    ticket.request.filenames().len(),
                    ticket.request.folder()
                );
                self.state.error = None;
                self.state.data = data;
            }
            Err(e) => {
                warn!("{e}");
                self.state.error = Some(e.to_string());
                self.state.data = ticket.request.empty_data();
            }
        }
        true
    }

    /// Begins `request`, fetches it and settles it.
    pub async fn load(&mut self, request: LoadRequest) -> &LoadState {
        if let Some(ticket) = self.begin(request) {
            let outcome = fetch_request(self.fetch.clone(), ticket.request()).await;
            self.settle(ticket, outcome);
        }
        &self.state
    }
}

/// Fetches every file of `request`. Files of a multi-file request are fetched concurrently and
/// the result is only returned once all of them have settled. If any file fails the whole request
/// fails with `LoadError::Aggregate`, even when other files succeeded.
pub async fn fetch_request(
    fetch: Arc<dyn Fetch>,
    request: &LoadRequest,
) -> Result<LoadedData, LoadError> {
    match request {
        LoadRequest::Single { folder, filename } => match filename {
            Some(filename) => load_file(fetch.as_ref(), folder, filename)
                .await
                .map(LoadedData::Single),
            None => Ok(request.empty_data()),
        },
        LoadRequest::Many { folder, filenames } => {
            let mut tasks = JoinSet::new();
            for (ix, filename) in filenames.iter().enumerate() {
                let fetch = fetch.clone();
                let folder = folder.clone();
                let filename = filename.clone();
                tasks.spawn(async move {
                    let result = load_file(fetch.as_ref(), &folder, &filename).await;
                    (ix, result)
                });
            }

            let mut results: Vec<Option<Result<Dataset, LoadError>>> =
                filenames.iter().map(|_| None).collect();
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((ix, result)) => results[ix] = Some(result),
                    Err(e) => warn!("A load task did not complete: {e}"),
                }
            }

            let total = filenames.len();
            let mut data = IndexMap::with_capacity(total);
            let mut errors = Vec::new();
            for (filename, result) in filenames.iter().zip(results) {
                match result {
                    Some(Ok(dataset)) => {
                        data.insert(filename.clone(), dataset);
                    }
                    Some(Err(e)) => errors.push(e),
                    None => errors.push(LoadError::fetch(
                        filename,
                        "the load task did not complete",
                    )),
                }
            }

            match errors.into_iter().next() {
                None => Ok(LoadedData::Many(data)),
                Some(first) => Err(LoadError::Aggregate {
                    failed: total - data.len(),
                    total,
                    first: Box::new(first),
                }),
            }
        }
    }
}

/// Fetches, parses and enhances one file into a dataset.
pub async fn load_file(
    fetch: &dyn Fetch,
    folder: &str,
    filename: &str,
) -> Result<Dataset, LoadError> {
    let raw = fetch.fetch(folder, filename).await?;
    let records = parse_csv(&raw).map_err(|e| LoadError::parse(filename, e))?;
    let dataset = Dataset::new(enhance(&records));
    debug!("Parsed {} row(s) from {folder}/{filename}", dataset.len());
    Ok(dataset)
}
