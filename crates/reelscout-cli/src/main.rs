use clap::{ArgAction, Parser, Subcommand};
use commands::{browse, config, live, watchlist};
use movie_browser_config::PathManager;
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "reelscout")]
#[command(about = "ReelScout - Browse, search and bookmark movies from the ophim catalog")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Write logs to a daily rotated file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List newly updated movies
    Home {
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// List movies in a category (e.g. phim-bo, phim-le, hoat-hinh)
    Category {
        slug: String,

        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Search the catalog by keyword
    Search {
        keyword: String,

        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show details for one movie
    Detail {
        slug: String,

        /// Also list similar movies from the same category
        #[arg(long, action = ArgAction::SetTrue)]
        similar: bool,

        /// Print only the playback link of episode N (1-based) from the first server
        #[arg(long, value_name = "N")]
        episode: Option<usize>,
    },
    /// Manage the local watchlist
    Watchlist {
        #[command(subcommand)]
        cmd: Option<WatchlistCommands>,
    },
    /// Interactive search-as-you-type
    #[command(long_about = "Interactive live search. Every line read from stdin is treated as \
        the full contents of the search box. Lines starting with ':' are commands: \
        :dismiss, :focus, :select N, :add N, :submit, :quit.")]
    Live,
    /// View or initialise configuration
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum WatchlistCommands {
    /// List saved movies
    List,
    /// Look up a movie by slug and save it
    Add { slug: String },
    /// Remove a saved movie by id
    Remove { id: String },
    /// Remove every saved movie
    Clear,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let log_file = effective_log_file(&cli);
    logging::init_logging_with_file(cli.verbose, cli.quiet, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Home { page } => browse::run_home(page, &output).await,
        Commands::Category { slug, page } => browse::run_category(&slug, page, &output).await,
        Commands::Search { keyword, page } => browse::run_search(&keyword, page, &output).await,
        Commands::Detail { slug, similar, episode } => {
            browse::run_detail(&slug, similar, episode, &output).await
        }
        Commands::Watchlist { cmd } => {
            let cmd = cmd.unwrap_or(WatchlistCommands::List);
            watchlist::run_watchlist(cmd, &output).await
        }
        Commands::Live => live::run_live(&output).await,
        Commands::Config { cmd } => {
            let cmd = cmd.unwrap_or(ConfigCommands::Show);
            config::run_config(cmd, &output)
        }
    }
}

/// Live search owns the terminal, so its logs go to the data directory unless
/// `--log-file` says otherwise.
fn effective_log_file(cli: &Cli) -> Option<PathBuf> {
    match (&cli.log_file, &cli.command) {
        (Some(path), _) => Some(path.clone()),
        (None, Commands::Live) => Some(PathManager::default().log_file()),
        (None, _) => None,
    }
}
