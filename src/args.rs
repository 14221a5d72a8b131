//! These structs provide the CLI interface for the reports CLI.

use crate::model::{GroupBy, RowId, SortOrder, DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};
use clap::{Parser, Subcommand};
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_subscriber::filter::LevelFilter;

/// reports: A command-line tool for browsing CSV reports.
///
/// Reports are CSV files organized into folders. The folder catalog lives in a JSON config file
/// (see `reports init`) and the files themselves are fetched from a server at
/// `{base_url}/csv/{folder}/{filename}`.
///
/// Rows of a report can be tagged, grouped by tag or by date, sorted and paged.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Write the default configuration file.
    ///
    /// The file is written to --config, or to $HOME/.reports/config.json. An existing file is
    /// never overwritten.
    Init,
    /// List every folder of the catalog and its files.
    Folders,
    /// List the files of a folder along with their active switches.
    Files(FilesArgs),
    /// Fetch several files of a folder at once. Fails if any one of them fails.
    Load(LoadArgs),
    /// Fetch one file and print its rows, grouped, sorted and paged.
    Show(ShowArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The path to the config file. Defaults to $HOME/.reports/config.json
    #[arg(long, env = "REPORTS_CONFIG")]
    config: Option<PathBuf>,

    /// The server that CSV files are fetched from. Overrides the config file's base_url.
    #[arg(long, env = "REPORTS_BASE_URL")]
    base_url: Option<String>,
}

impl Common {
    pub fn new(log_level: LevelFilter, config: Option<PathBuf>, base_url: Option<String>) -> Self {
        Self {
            log_level,
            config,
            base_url,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn config(&self) -> Option<&Path> {
        self.config.as_deref()
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }
}

/// (Not shown): Args for the `reports files` command.
#[derive(Debug, Parser, Clone)]
pub struct FilesArgs {
    /// The folder to list.
    folder: String,

    /// Switch a file on. Naming a file twice switches it back off.
    #[arg(long = "active")]
    active: Vec<String>,
}

impl FilesArgs {
    pub fn new(folder: impl Into<String>, active: Vec<String>) -> Self {
        Self {
            folder: folder.into(),
            active,
        }
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    pub fn active(&self) -> &[String] {
        &self.active
    }
}

/// (Not shown): Args for the `reports load` command.
#[derive(Debug, Parser, Clone)]
pub struct LoadArgs {
    /// The folder to load from.
    folder: String,

    /// The files to load. All of the folder's files when none are given.
    files: Vec<String>,
}

impl LoadArgs {
    pub fn new(folder: impl Into<String>, files: Vec<String>) -> Self {
        Self {
            folder: folder.into(),
            files,
        }
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }
}

/// (Not shown): Args for the `reports show` command.
#[derive(Debug, Parser, Clone)]
pub struct ShowArgs {
    /// The folder the file belongs to.
    folder: String,

    /// The file to show.
    file: String,

    /// Partition the rows by their tags (joined with ", ") or by their date.
    #[arg(long, value_enum)]
    group_by: Option<GroupBy>,

    /// Add a tag to a row, written as ID=TAG. May be repeated.
    #[arg(long = "tag")]
    tags: Vec<TagEdit>,

    /// Remove every tag from the row with this id. Applied after --tag. May be repeated.
    #[arg(long = "clear")]
    clear: Vec<RowId>,

    /// The column to sort each group by.
    #[arg(long)]
    sort: Option<String>,

    /// The sort direction.
    #[arg(long, value_enum, default_value_t = SortOrder::Asc)]
    order: SortOrder,

    /// The page of each group to show, starting at 1.
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Rows per page. One of 20, 50, 100, 1000.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = parse_page_size)]
    page_size: usize,

    /// Print the report as JSON instead of markdown tables.
    #[arg(long)]
    json: bool,
}

impl ShowArgs {
    pub fn new(folder: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            file: file.into(),
            group_by: None,
            tags: Vec::new(),
            clear: Vec::new(),
            sort: None,
            order: SortOrder::Asc,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            json: false,
        }
    }

    pub fn with_group_by(mut self, group_by: Option<GroupBy>) -> Self {
        self.group_by = group_by;
        self
    }

    pub fn with_tags(mut self, tags: Vec<TagEdit>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_clear(mut self, clear: Vec<RowId>) -> Self {
        self.clear = clear;
        self
    }

    pub fn with_sort(mut self, sort: Option<String>, order: SortOrder) -> Self {
        self.sort = sort;
        self.order = order;
        self
    }

    pub fn with_page(mut self, page: usize, page_size: usize) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn group_by(&self) -> Option<GroupBy> {
        self.group_by
    }

    pub fn tags(&self) -> &[TagEdit] {
        &self.tags
    }

    pub fn clear(&self) -> &[RowId] {
        &self.clear
    }

    pub fn sort(&self) -> Option<&str> {
        self.sort.as_deref()
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    /// One-based page number.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn json(&self) -> bool {
        self.json
    }
}

/// A tag to add to a row, parsed from `ID=TAG`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TagEdit {
    id: RowId,
    tag: String,
}

impl TagEdit {
    pub fn new(id: RowId, tag: impl Into<String>) -> Self {
        Self {
            id,
            tag: tag.into(),
        }
    }

    pub fn id(&self) -> RowId {
        self.id
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl FromStr for TagEdit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, tag) = s
            .split_once('=')
            .ok_or_else(|| format!("Expected ID=TAG but got '{s}'"))?;
        let id = id
            .trim()
            .parse::<RowId>()
            .map_err(|e| format!("Invalid row id '{id}': {e}"))?;
        Ok(Self::new(id, tag))
    }
}

impl Display for TagEdit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.id, self.tag)
    }
}

fn parse_page_size(s: &str) -> Result<usize, String> {
    let size = s
        .parse::<usize>()
        .map_err(|e| format!("Invalid page size '{s}': {e}"))?;
    if PAGE_SIZE_OPTIONS.contains(&size) {
        Ok(size)
    } else {
        Err(format!(
            "The page size must be one of {PAGE_SIZE_OPTIONS:?}, got {size}"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_args() {
        let args = Args::try_parse_from([
            "reports",
            "--log-level",
            "debug",
            "show",
            "sales",
            "people-1000.csv",
            "--group-by",
            "tags",
            "--tag",
            "3=urgent",
            "--tag",
            "4=a=b",
            "--clear",
            "3",
            "--sort",
            "First Name",
            "--order",
            "desc",
            "--page-size",
            "50",
        ])
        .unwrap();
        assert_eq!(args.common().log_level(), LevelFilter::DEBUG);
        let Command::Show(show) = args.command() else {
            panic!("expected the show command");
        };
        assert_eq!(show.folder(), "sales");
        assert_eq!(show.file(), "people-1000.csv");
        assert_eq!(show.group_by(), Some(GroupBy::Tags));
        assert_eq!(
            show.tags(),
            [TagEdit::new(3, "urgent"), TagEdit::new(4, "a=b")]
        );
        assert_eq!(show.clear(), [3]);
        assert_eq!(show.sort(), Some("First Name"));
        assert_eq!(show.order(), SortOrder::Desc);
        assert_eq!(show.page(), 1);
        assert_eq!(show.page_size(), 50);
        assert!(!show.json());
    }

    #[test]
    fn test_show_defaults() {
        let args = Args::try_parse_from(["reports", "show", "sales", "employees.csv"]).unwrap();
        let Command::Show(show) = args.command() else {
            panic!("expected the show command");
        };
        assert_eq!(show.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(show.order(), SortOrder::Asc);
        assert!(show.group_by().is_none());
    }

    #[test]
    fn test_bad_page_size_is_rejected() {
        let result = Args::try_parse_from([
            "reports",
            "show",
            "sales",
            "employees.csv",
            "--page-size",
            "25",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_sort_order_is_rejected() {
        let result = Args::try_parse_from([
            "reports",
            "show",
            "sales",
            "employees.csv",
            "--order",
            "sideways",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_tag_edit_parse() {
        assert_eq!("7=x".parse::<TagEdit>().unwrap(), TagEdit::new(7, "x"));
        assert!("x".parse::<TagEdit>().is_err());
        assert!("a=x".parse::<TagEdit>().is_err());
        assert_eq!(TagEdit::new(2, "vip").to_string(), "2=vip");
    }

    #[test]
    fn test_files_and_load_args() {
        let args =
            Args::try_parse_from(["reports", "files", "finance", "--active", "a.csv"]).unwrap();
        let Command::Files(files) = args.command() else {
            panic!("expected the files command");
        };
        assert_eq!(files.folder(), "finance");
        assert_eq!(files.active(), ["a.csv"]);

        let args = Args::try_parse_from(["reports", "load", "sales"]).unwrap();
        let Command::Load(load) = args.command() else {
            panic!("expected the load command");
        };
        assert!(load.files().is_empty());
    }
}
