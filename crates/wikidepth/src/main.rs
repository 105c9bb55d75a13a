//! wikidepth CLI - category depth crawling from the command line.
//!
//! Discovers every subcategory below a set of seed categories, records each
//! one's shortest distance from a seed, and lists the pages they contain.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;
use wikidepth::{Config, CrawlOptions, DepthOptions, Overrides, Strategy};

mod cli;

/// wikidepth: category depth crawler for wiki category graphs.
#[derive(Parser)]
#[command(name = "wikidepth")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (defaults to ./wikidepth.yaml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Category database (`SQLite`)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl subcategories and pages below the seed categories
    Crawl {
        /// Seed categories
        #[arg(required = true, value_name = "CATEGORY")]
        categories: Vec<String>,

        /// Rebuild the subcategory link cache from the database first
        #[arg(long)]
        refresh_cache: bool,

        /// Stop after writing the subcategories file
        #[arg(long)]
        skip_pages: bool,

        #[command(flatten)]
        depth: DepthArgs,

        /// Directory for the result files
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Worker threads for page queries
        #[arg(short, long)]
        jobs: Option<usize>,

        #[command(flatten)]
        cache: CacheArg,
    },

    /// Print discovered subcategories grouped by depth, without writing files
    Depths {
        /// Seed categories
        #[arg(required = true, value_name = "CATEGORY")]
        categories: Vec<String>,

        #[command(flatten)]
        depth: DepthArgs,

        #[command(flatten)]
        cache: CacheArg,
    },

    /// Build the subcategory link cache from the database
    Cache {
        /// Rebuild even if the cache already exists
        #[arg(long)]
        refresh: bool,

        #[command(flatten)]
        cache: CacheArg,
    },
}

#[derive(Args)]
struct DepthArgs {
    /// Only discover categories up to this depth
    #[arg(long)]
    max_depth: Option<u32>,

    /// Worklist order: worklist or depth-first
    #[arg(long, default_value_t = Strategy::Worklist)]
    strategy: Strategy,
}

impl DepthArgs {
    fn options(&self) -> DepthOptions {
        DepthOptions {
            strategy: self.strategy,
            max_depth: self.max_depth,
        }
    }
}

#[derive(Args)]
struct CacheArg {
    /// Subcategory link cache file
    #[arg(long = "cache")]
    path: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            // Show cause chain for nested errors
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  {}: {cause}", "caused by".dimmed());
                source = std::error::Error::source(cause);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), wikidepth::Error> {
    let cwd = std::env::current_dir()?;
    let base = Config::resolve(cli.config.as_deref(), &cwd)?;
    let mut overrides = Overrides {
        database: cli.database,
        ..Overrides::default()
    };

    match cli.command {
        Commands::Crawl {
            categories,
            refresh_cache,
            skip_pages,
            depth,
            output_dir,
            jobs,
            cache,
        } => {
            overrides.cache = cache.path;
            overrides.output_dir = output_dir;
            overrides.jobs = jobs;
            let config = base.with_overrides(overrides);
            let options = CrawlOptions {
                seeds: categories,
                refresh_cache,
                skip_pages,
                depth: depth.options(),
            };
            cli::crawl::run(&config, &options)
        }
        Commands::Depths {
            categories,
            depth,
            cache,
        } => {
            overrides.cache = cache.path;
            let config = base.with_overrides(overrides);
            cli::depths::run(&config, &categories, &depth.options())
        }
        Commands::Cache { refresh, cache } => {
            overrides.cache = cache.path;
            let config = base.with_overrides(overrides);
            cli::cache::run(&config, refresh)
        }
    }
}
