//! Configuration file handling.
//!
//! The configuration file is stored at `$HOME/.reports/config.json` by default and holds the base
//! URL of the server that serves the CSV files and the folder catalog, i.e. which files exist in
//! which folder. When there is no configuration file, built-in defaults are used.

use crate::{utils, Result};
use anyhow::{bail, ensure, Context};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_NAME: &str = "reports";
const CONFIG_VERSION: u8 = 1;
const DEFAULT_BASE_URL: &str = "http://localhost:5173";
const CONFIG_DIR: &str = ".reports";
const CONFIG_JSON: &str = "config.json";

/// Folder name to the ordered list of filenames in that folder.
pub type Catalog = IndexMap<String, Vec<String>>;

/// The `Config` object represents the configuration of the app: where CSV files are fetched from
/// and the folder catalog that lists them.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct Config {
    config_path: Option<PathBuf>,
    config_file: ConfigFile,
}

impl Config {
    /// Loads `path` if it exists, otherwise returns the default configuration.
    ///
    /// # Errors
    /// - The file exists but cannot be read or parsed.
    /// - The file has the wrong `app_name` or lists no folders.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.is_file() {
            debug!(
                "No config file at '{}', using the default configuration",
                path.display()
            );
            return Ok(Self::default());
        }
        Self::open(path).await
    }

    /// Loads `path`, which must exist. Used for a path the user named explicitly.
    ///
    /// # Errors
    /// - There is no file at `path`.
    /// - The file cannot be read or parsed, has the wrong `app_name` or lists no folders.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        ensure!(
            path.is_file(),
            "There is no config file at '{}'. Run `reports init` to create one",
            path.display()
        );
        let config_file = ConfigFile::load(&path).await?;
        debug!("Loaded config from '{}'", path.display());
        Ok(Self {
            config_path: Some(path),
            config_file,
        })
    }

    /// Loads the configuration for a command line run. A path given with `--config` or
    /// `REPORTS_CONFIG` must exist; the default location may be absent.
    pub async fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::open(path).await,
            None => match default_config_path() {
                Some(path) => Self::load(path).await,
                None => Ok(Self::default()),
            },
        }
    }

    /// Writes the default configuration to `path`, refusing to overwrite an existing file.
    pub async fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.exists() {
            bail!("A config file already exists at '{}'", path.display());
        }
        if let Some(parent) = path.parent() {
            utils::make_dir(parent)
                .await
                .context("Unable to create the config directory")?;
        }
        let config_file = ConfigFile::default();
        config_file.save(&path).await?;
        Ok(Self {
            config_path: Some(path),
            config_file,
        })
    }

    /// Replaces the configured base URL, e.g. with a command line override.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config_file.base_url = base_url.into();
        self
    }

    /// Replaces the folder catalog.
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.config_file.folders = catalog;
        self
    }

    /// The file this configuration was loaded from, `None` for the built-in default.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.config_file.base_url
    }

    pub fn catalog(&self) -> &Catalog {
        &self.config_file.folders
    }

    /// The files of `folder`, `None` if the catalog has no such folder.
    pub fn files(&self, folder: &str) -> Option<&[String]> {
        self.config_file.folders.get(folder).map(Vec::as_slice)
    }

    /// The first folder of the catalog.
    pub fn default_folder(&self) -> Option<&str> {
        self.config_file.folders.keys().next().map(String::as_str)
    }
}

/// The default location of the configuration file, `$HOME/.reports/config.json`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_JSON))
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "reports",
///   "config_version": 1,
///   "base_url": "http://localhost:5173",
///   "folders": {
///     "sales": ["people-1000.csv", "employees.csv"],
///     "finance": ["organizations-1000.csv", "customers-1000.csv"]
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "reports"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Scheme, host and optional path prefix under which `/csv/{folder}/{filename}` is served
    #[serde(default = "default_base_url")]
    base_url: String,

    /// The folder catalog, in display order
    folders: Catalog,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.insert(
        "sales".to_string(),
        vec!["people-1000.csv".to_string(), "employees.csv".to_string()],
    );
    catalog.insert(
        "finance".to_string(),
        vec![
            "organizations-1000.csv".to_string(),
            "customers-1000.csv".to_string(),
        ],
    );
    catalog
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            base_url: default_base_url(),
            folders: default_catalog(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or is invalid.
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;

        ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        ensure!(
            config.config_version == CONFIG_VERSION,
            "Unsupported config_version {} in '{}'. Is a newer version of reports available?",
            config.config_version,
            path.display()
        );
        ensure!(
            !config.folders.is_empty(),
            "The config file '{}' lists no folders",
            path.display()
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}
