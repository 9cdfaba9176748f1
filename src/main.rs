//! AFDB crawler main entry point
//!
//! This is the command-line interface for the AFDB product crawler.

use afdb_crawler::config::{load_config_with_hash, Config};
use afdb_crawler::crawler::crawl;
use anyhow::{bail, Context};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// afdb-crawler: product crawler for www.afdb.fr
///
/// Crawls the site's category and product pages, extracts one record per
/// product page, completes it with the stock-status API and writes the
/// records to a JSON Lines feed and, optionally, a SQLite database.
#[derive(Parser, Debug)]
#[command(name = "afdb-crawler")]
#[command(version = "1.0.0")]
#[command(about = "Product crawler for www.afdb.fr", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show product statistics from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,

    /// Write the JSON Lines feed to this path instead of the configured one
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if let Some(output) = &cli.output {
        config.output.jsonl_path = Some(output.display().to_string());
    }

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(config, &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("afdb_crawler=info,warn"),
            1 => EnvFilter::new("afdb_crawler=debug,info"),
            2 => EnvFilter::new("afdb_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the validated configuration
fn handle_dry_run(config: &Config) {
    println!("=== AFDB Crawler Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max concurrent requests: {}", config.crawler.max_concurrent_requests);
    println!("  Download delay: {}ms", config.crawler.download_delay_ms);
    println!(
        "  Timeouts: {}s request, {}s connect",
        config.crawler.request_timeout_secs, config.crawler.connect_timeout_secs
    );
    println!("  Max depth: {}", limit(config.crawler.max_depth));
    println!("  Max pages: {}", limit(config.crawler.max_pages));
    println!("  Obey robots.txt: {}", config.crawler.obey_robots);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nSite:");
    println!("  Allowed domains: {}", config.site.allowed_domains.join(", "));
    for url in &config.site.start_urls {
        println!("  * {}", url);
    }

    println!("\nLink Rules:");
    println!("  Follow suffixes: {}", config.rules.follow_suffixes.join(", "));
    println!("  Product marker: {}", config.rules.product_marker);
    println!("  Deny markers: {}", config.rules.deny_markers.join(", "));

    println!("\nStock API:");
    println!("  Endpoint: {}", config.stock.endpoint);
    println!(
        "  Retries: {} ({}ms apart)",
        config.stock.max_retries, config.stock.retry_delay_ms
    );

    println!("\nOutput:");
    println!(
        "  JSON Lines: {}",
        config.output.jsonl_path.as_deref().unwrap_or("(disabled)")
    );
    println!(
        "  Database: {}",
        config.output.database_path.as_deref().unwrap_or("(disabled)")
    );

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start crawling from {} URL(s)",
        config.site.start_urls.len()
    );
}

fn limit(value: u32) -> String {
    if value == 0 {
        "unlimited".to_string()
    } else {
        value.to_string()
    }
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    use afdb_crawler::output::{load_statistics, print_statistics};
    use afdb_crawler::storage::open_storage;
    use std::path::Path;

    let Some(path) = config.output.database_path.as_deref() else {
        bail!("--stats needs [output] database-path in the configuration");
    };

    println!("Database: {}\n", path);

    let storage = open_storage(Path::new(path))
        .with_context(|| format!("Failed to open database {}", path))?;
    let stats = load_statistics(&storage).context("Failed to read statistics")?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, config_hash: &str) -> anyhow::Result<()> {
    tracing::info!(
        "Start URLs: {}, allowed domains: {}",
        config.site.start_urls.len(),
        config.site.allowed_domains.join(", ")
    );

    match crawl(config, config_hash).await {
        Ok(stats) => {
            tracing::info!(
                "Crawl completed successfully: {} products",
                stats.products_emitted
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e).context("Crawl failed")
        }
    }
}
