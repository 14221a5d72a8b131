//! The fetch collaborator: retrieves the raw bytes of `/csv/{folder}/{filename}`.
//!
//! `HttpFetch` talks to a real server. `TestFetch` serves in-memory data so that the whole program
//! can run, top-to-bottom, without one.

mod http;
mod test_fetch;

use crate::error::LoadError;
use crate::{Config, Result};
use std::sync::Arc;
use tracing::debug;

pub use http::HttpFetch;
pub use test_fetch::TestFetch;

/// When this environment variable is set and non-empty, `Mode::from_env` returns `Mode::Test`.
pub const TEST_MODE_ENV: &str = "REPORTS_IN_TEST_MODE";

/// Retrieves the raw contents of a CSV file within a folder.
#[async_trait::async_trait]
pub trait Fetch: Send + Sync {
    /// Returns the body of `/csv/{folder}/{filename}`. Any non-success response or transport
    /// failure is a `LoadError::Fetch` naming `filename`.
    async fn fetch(&self, folder: &str, filename: &str) -> std::result::Result<Vec<u8>, LoadError>;
}

/// Whether files are fetched over HTTP or served from memory.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum Mode {
    #[default]
    Http,
    Test,
}

impl Mode {
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Http,
        }
    }
}

/// Creates the fetch collaborator for `mode`.
pub fn fetcher(config: &Config, mode: Mode) -> Result<Arc<dyn Fetch>> {
    debug!("Using {mode:?} fetch mode");
    Ok(match mode {
        Mode::Http => Arc::new(HttpFetch::new(config.base_url())?),
        Mode::Test => Arc::new(TestFetch::default()),
    })
}
