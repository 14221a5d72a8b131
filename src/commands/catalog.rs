//! Commands that work on the folder catalog alone and never fetch a file.

use crate::commands::Out;
use crate::config::Catalog;
use crate::model::{file_entries, ActiveReports, FileEntry};
use crate::{Config, Result};
use anyhow::Context;
use std::fmt::Write;
use std::path::Path;

/// Writes the default configuration file to `config_path`.
pub async fn init(config_path: &Path) -> Result<Out<()>> {
    let _config = Config::create(config_path)
        .await
        .context("Unable to create the config file")?;
    Ok(format!("Created the config file at {}", config_path.display()).into())
}

/// Lists every folder and its files.
pub fn folders(config: &Config) -> Result<Out<Catalog>> {
    let mut message = String::new();
    for (folder, filenames) in config.catalog() {
        writeln!(message, "{folder}")?;
        for filename in filenames {
            writeln!(message, "  {filename}")?;
        }
    }
    Ok(Out::new(message.trim_end(), config.catalog().clone()))
}

/// Lists the files of `folder`, switching on each file named in `toggles`. A file named twice is
/// switched back off.
pub fn files(config: &Config, folder: &str, toggles: &[String]) -> Result<Out<Vec<FileEntry>>> {
    let filenames = config
        .files(folder)
        .with_context(|| format!("There is no folder named '{folder}'"))?;
    let mut active = ActiveReports::new();
    for filename in toggles {
        active.toggle(filename);
    }
    let entries = file_entries(filenames, &active);

    let mut message = String::from("| Filename | Active |\n|---|---|\n");
    for entry in &entries {
        let switch = if entry.active { "on" } else { "off" };
        writeln!(message, "| {} | {switch} |", entry.filename)?;
    }
    Ok(Out::new(message.trim_end(), entries))
}
