pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use closet_core::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "closet",
    about = "Closet Coordinator wardrobe CLI",
    long_about = "Browse a wardrobe catalog and rank outfit matches for any item in it.",
    after_help = "Examples:\n  closet --catalog wardrobe.toml browse\n  closet recommend T1 --limit 3\n  closet --images photos --annotations anno browse\n  closet score T1 B2\n  closet doctor --json"
)]
pub struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Config file (defaults to closet.toml or config/closet.toml)"
    )]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, value_name = "PATH", help = "Wardrobe catalog (.toml or .json)")]
    pub catalog: Option<PathBuf>,
    #[arg(long, global = true, value_name = "DIR", help = "Directory holding item photos")]
    pub images: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        value_name = "DIR",
        help = "Build the catalog from annotation tables joined onto --images"
    )]
    pub annotations: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        value_name = "N",
        help = "Matches returned when --limit is not given (recommender.default_limit)"
    )]
    pub default_limit: Option<usize>,
    #[arg(long, global = true, value_name = "LEVEL", help = "trace, debug, info, warn or error")]
    pub log_level: Option<String>,
    #[arg(long, global = true, value_name = "FORMAT", help = "compact, pretty or json")]
    pub log_format: Option<LogFormat>,
}

impl GlobalArgs {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: false,
            overrides: ConfigOverrides {
                catalog_path: self.catalog.clone(),
                image_root: self.images.clone(),
                annotations_dir: self.annotations.clone(),
                default_limit: self.default_limit,
                log_level: self.log_level.clone(),
                log_format: self.log_format,
            },
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "List catalog items grouped by category")]
    Browse {
        #[arg(long, help = "Only list this category (top, bottom, outerwear, footwear, dress)")]
        category: Option<String>,
    },
    #[command(about = "Show a single item")]
    Show { id: String },
    #[command(about = "Rank matching items for the given item")]
    Recommend {
        id: String,
        #[arg(long, help = "Maximum number of matches (defaults to recommender.default_limit)")]
        limit: Option<usize>,
        #[arg(long, help = "Category to recommend from (defaults by the item's category)")]
        target: Option<String>,
    },
    #[command(about = "Explain the compatibility score of two items")]
    Score { left: String, right: String },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config, catalog contents and image resolution")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = cli.global.load_options();

    if let Err(error) = init_logging(&options) {
        eprintln!("logging initialization failed: {error:#}");
    }

    let result = match cli.command {
        Command::Browse { category } => commands::browse::run(&options, category.as_deref()),
        Command::Show { id } => commands::show::run(&options, &id),
        Command::Recommend { id, limit, target } => {
            commands::recommend::run(&options, &id, limit, target.as_deref())
        }
        Command::Score { left, right } => commands::score::run(&options, &left, &right),
        Command::Config => commands::CommandResult {
            exit_code: commands::EXIT_OK,
            output: commands::config::run(&options),
        },
        Command::Doctor { json } => commands::doctor::run(&options, json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr so stdout carries only command output. A config that
/// fails to load is reported by the command; logging then uses the defaults.
fn init_logging(options: &LoadOptions) -> Result<()> {
    let logging = AppConfig::load(options.clone())
        .map(|config| config.logging)
        .unwrap_or_else(|_| AppConfig::default().logging);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(filter);

    let initialized = match logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    initialized.map_err(|error| anyhow!(error))
}
