mod api;
pub mod args;
pub mod commands;
mod config;
pub mod dashboard;
mod error;
pub mod loader;
pub mod model;
pub mod parse;
#[cfg(test)]
mod test;
mod utils;

pub use api::{Fetch, HttpFetch, Mode, TestFetch, TEST_MODE_ENV};
pub use config::{default_config_path, Catalog, Config};
pub use error::{Error, LoadError, ParseError, Result};
