//! Implements the `Fetch` trait with a `reqwest::Client`.

use crate::api::Fetch;
use crate::error::LoadError;
use crate::Result;
use anyhow::{bail, Context};
use tracing::trace;
use url::Url;

/// Fetches `GET {base_url}/csv/{folder}/{filename}`.
#[derive(Debug, Clone)]
pub struct HttpFetch {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpFetch {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid base URL '{base_url}'"))?;
        if base_url.cannot_be_a_base() {
            bail!("The base URL '{base_url}' cannot have a path appended to it");
        }
        Ok(Self {
            base_url,
            client: reqwest::Client::new(),
        })
    }

    /// The URL of a file. Folder and filename are percent-encoded as single path segments.
    pub fn file_url(&self, folder: &str, filename: &str) -> Url {
        let mut url = self.base_url.clone();
        // checked in `new`
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["csv", folder, filename]);
        }
        url
    }
}

#[async_trait::async_trait]
impl Fetch for HttpFetch {
    async fn fetch(&self, folder: &str, filename: &str) -> std::result::Result<Vec<u8>, LoadError> {
        let url = self.file_url(folder, filename);
        trace!("GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LoadError::fetch(filename, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::fetch(filename, status.to_string()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| LoadError::fetch(filename, e.to_string()))?;
        trace!("Received {} bytes for {filename}", body.len());
        Ok(body.to_vec())
    }
}
