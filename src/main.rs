use anyhow::Context;
use clap::Parser;
use report_deck::args::{Args, Command, Common};
use report_deck::{commands, default_config_path, Config, Mode, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let common = args.common();

    // When REPORTS_IN_TEST_MODE is set and non-empty, files are served from memory rather than
    // fetched from the server.
    let mode = Mode::from_env();

    let _: () = match args.command() {
        Command::Init => {
            let path = common
                .config()
                .map(ToOwned::to_owned)
                .or_else(default_config_path)
                .context(
                    "Unable to determine your home directory, provide --config or REPORTS_CONFIG",
                )?;
            commands::init(&path).await?.print()
        }
        Command::Folders => commands::folders(&load_config(common).await?)?.print(),
        Command::Files(files_args) => {
            let config = load_config(common).await?;
            commands::files(&config, files_args.folder(), files_args.active())?.print()
        }
        Command::Load(load_args) => {
            let config = load_config(common).await?;
            commands::load(config, mode, load_args.folder(), load_args.files())
                .await?
                .print()
        }
        Command::Show(show_args) => {
            let config = load_config(common).await?;
            commands::show(config, mode, show_args.clone())
                .await?
                .print()
        }
    };
    Ok(())
}

/// Loads the config file and applies the `--base-url` override.
async fn load_config(common: &Common) -> Result<Config> {
    let config = Config::resolve(common.config()).await?;
    Ok(match common.base_url() {
        Some(base_url) => config.with_base_url(base_url),
        None => config,
    })
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_PKG_NAME").replace('-', "_"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
