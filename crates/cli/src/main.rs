//! ghsearch CLI - GitHub repository search
//!
//! This binary runs the search proxy or a single search from the terminal.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use ghsearch::render_results;
use ghsearch_client::{CachedSearcher, SearchClient};
use ghsearch_core::config::Config;
use ghsearch_core::{OrderOption, SearchRequest, SortOption};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info};

#[derive(Parser)]
#[command(name = "ghsearch")]
#[command(about = "Search GitHub repositories, directly or through a caching proxy")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the search proxy
    Serve {
        /// Address to bind (overrides server.host)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (overrides server.port)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run one search and print the results
    Search(SearchArgs),
}

#[derive(Args)]
struct SearchArgs {
    /// Search text
    query: String,

    /// Page number
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Results per page (defaults to client.per_page)
    #[arg(long)]
    per_page: Option<u32>,

    /// best, stars or updated
    #[arg(long, default_value = "best")]
    sort: SortOption,

    /// asc or desc
    #[arg(long, default_value = "desc")]
    order: OrderOption,

    /// Only repositories in this language
    #[arg(long)]
    language: Option<String>,

    /// Include forked repositories
    #[arg(long)]
    include_forks: bool,

    /// Route through the proxy (overrides client.use_proxy)
    #[arg(long)]
    proxy: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose)?;

    match cli.command {
        Some(Commands::Serve { host, port }) => serve(cli.config.as_deref(), host, port).await,
        Some(Commands::Search(args)) => {
            let config = Config::load(cli.config.as_deref())?;
            if let Err(e) = search(&config, args).await {
                error!("Search failed: {e}");
                eprintln!("{}", e.user_message());
                std::process::exit(1);
            }
            Ok(())
        }
        None => {
            println!("Run 'ghsearch search <query>' to search, 'ghsearch serve' to start the proxy, or --help for more options");
            Ok(())
        }
    }
}

/// Initialize logging system
///
/// Logs go to stderr so search output stays clean.
fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(format!("ghsearch={level},tower_http={level}"))
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Start the proxy server
async fn serve(config_path: Option<&Path>, host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut config = Config::load(config_path)?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    info!("Preparing to start search proxy on {}", config.bind_address());
    ghsearch_server::run_server(config).await?;
    Ok(())
}

/// Run one search through the caching client
async fn search(config: &Config, args: SearchArgs) -> ghsearch_core::Result<()> {
    config.validate()?;

    let client = Arc::new(SearchClient::from_config(config)?);
    let searcher = CachedSearcher::from_config(client, &config.client);

    let per_page = args.per_page.unwrap_or(config.client.per_page);
    let request = SearchRequest {
        query: args.query,
        page: args.page,
        per_page,
        sort: args.sort,
        order: args.order,
        include_forks: args.include_forks,
        language: args.language,
        targets_proxy: args.proxy || config.client.use_proxy,
    };
    debug!("Search request: {request:?}");

    let result = searcher.search(&request).await?;
    print!("{}", render_results(&result, request.page, per_page));
    Ok(())
}
