mod platform;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use console_logging::{console_error, console_info, console_warn};
use log::LevelFilter;

use platform::admin::{ConfigCommand, RobotCommand};
use platform::logging::LogDestination;
use platform::settings::{self, ConsoleSettings, SETTINGS_FILENAME, URL_ENV};

#[derive(Parser)]
#[command(name = "registry-console", author, version, about, long_about = None)]
struct Cli {
    /// Settings file
    #[arg(short, long, default_value = SETTINGS_FILENAME)]
    config: PathBuf,
    /// Registry base URL, overrides the settings file
    #[arg(long, env = URL_ENV)]
    url: Option<String>,
    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    log: LogDestination,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a settings file with default values
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
    /// Follow a replication execution and page through its tasks
    Watch {
        execution_id: i64,
        /// Task field the search term filters on
        #[arg(long, default_value = console_core::DEFAULT_FILTER_FIELD)]
        filter_field: String,
        /// Initial search term
        #[arg(short, long)]
        search: Option<String>,
        /// Rows per page, overrides the settings file
        #[arg(long)]
        page_size: Option<u32>,
    },
    /// Pick a project by typing its name, optionally completing an image reference
    Pick {
        #[arg(long)]
        repo: Option<String>,
        #[arg(long, requires = "repo")]
        tag: Option<String>,
    },
    /// Show, change or test system configuration
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Manage project robot accounts
    #[command(subcommand)]
    Robots(RobotCommand),
    /// List the versions of a Helm chart in a project's chart repository
    Charts { project: String, chart: String },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Init { force } = cli.command {
        return settings::write_default(&cli.config, force);
    }

    let (mut settings, load_error) = match settings::load(&cli.config) {
        Ok(settings) => (settings, None),
        Err(err) => (ConsoleSettings::default(), Some(err)),
    };
    if let Some(url) = cli.url {
        settings.base_url = url;
    }
    let level = settings.log_level();
    platform::logging::initialize(cli.log, level.unwrap_or(LevelFilter::Info));
    if let Some(err) = load_error {
        console_warn!("{:#}; using default settings", err);
    }
    if level.is_none() {
        console_warn!("Unknown log level {:?}; using info", settings.log_level);
    }
    console_info!("Using registry at {}", settings.base_url);

    let result = match cli.command {
        Commands::Init { .. } => Ok(()),
        Commands::Watch {
            execution_id,
            filter_field,
            search,
            page_size,
        } => {
            let options = platform::app::WatchOptions {
                execution_id,
                filter_field,
                search,
                page_size: page_size.unwrap_or(settings.page_size),
            };
            platform::app::run_watch(&settings, options)
                .with_context(|| format!("watching execution {execution_id}"))
        }
        Commands::Pick { repo, tag } => platform::picker::run_picker(&settings, repo, tag),
        Commands::Config(command) => platform::admin::run_config(&settings, command),
        Commands::Robots(command) => platform::admin::run_robots(&settings, command),
        Commands::Charts { project, chart } => {
            platform::admin::run_charts(&settings, &project, &chart)
        }
    };
    if let Err(err) = &result {
        console_error!("{:#}", err);
    }
    result
}
