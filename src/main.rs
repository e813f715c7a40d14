//! Job-Scout main entry point
//!
//! This is the command-line interface for the Job-Scout vacancy page discoverer.

use anyhow::Context;
use clap::Parser;
use job_scout::config::{load_config_with_hash, Config};
use job_scout::crawler::{run_session, CrawlEngine, CrawlSession};
use job_scout::fetch::ContentFetcher;
use job_scout::output::{print_statistics, CrawlStatistics, JsonLinesWriter};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Job-Scout: finds vacancy pages on a single website
///
/// Job-Scout crawls one site breadth-first from a start URL, respecting
/// robots.txt and a politeness delay, keeps the pages whose URL matches the
/// configured keywords and captures their HTML as JSON lines.
#[derive(Parser, Debug)]
#[command(name = "job-scout")]
#[command(version = "1.0.0")]
#[command(about = "A polite vacancy page discoverer", long_about = None)]
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

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,

    /// Keep every visited page, not only keyword matches
    #[arg(long)]
    untargeted: bool,

    /// Crawl only: print the result URLs without capturing their HTML
    #[arg(long)]
    skip_content: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let targeted = config.session.targeted && !cli.untargeted;
    handle_crawl(config, targeted, cli.skip_content).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("job_scout=info,warn"),
            1 => EnvFilter::new("job_scout=debug,info"),
            2 => EnvFilter::new("job_scout=trace,debug"),
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
    let session = &config.session;

    println!("=== Job-Scout Dry Run ===\n");

    println!("Session:");
    println!("  Start URL: {}", session.start_url);
    println!("  Max visits: {}", session.max_visits);
    match session.delay {
        Some(delay) => println!("  Delay: {}s", delay),
        None if session.use_robots_delay => println!("  Delay: robots.txt Crawl-delay, else 2s"),
        None => println!("  Delay: 2s"),
    }
    match session.hesitancy {
        Some(hesitancy) => println!("  Hesitancy: {}", hesitancy),
        None => println!("  Hesitancy: off"),
    }
    println!("  Targeted: {}", session.targeted);
    println!("  Sitemap merge: {}", session.add_sitemap);
    println!("  Link timeout: {}s", session.link_timeout);
    println!("  Robots failure: {:?}", session.robots_failure);

    println!("\nKeywords ({}):", session.keywords.len());
    for keyword in &session.keywords {
        println!("  - {}", keyword);
    }

    println!("\nFetcher:");
    println!("  User agent: {}", config.fetcher.user_agent);
    println!("  Timeout: {}s", config.fetcher.timeout);
    println!(
        "  Retries: {} (backoff {}-{}s)",
        config.fetcher.max_retries, config.fetcher.backoff_min, config.fetcher.backoff_max
    );

    println!("\nOutput:");
    println!(
        "  {}/{}_<timestamp>.jsonl",
        config.output.directory, config.output.file_prefix
    );

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation, followed by content capture
async fn handle_crawl(config: Config, targeted: bool, skip_content: bool) -> anyhow::Result<()> {
    let started = Instant::now();
    let session = CrawlSession::from_config(&config.session)?;

    tracing::info!(
        "Starting crawl of {} ({} keywords, targeted: {})",
        session.start_url(),
        session.keywords().len(),
        targeted
    );

    let engine = match run_session(session, targeted).await {
        Ok(engine) => engine,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    let captured = if skip_content {
        for url in engine.results().urls() {
            println!("{}", url);
        }
        None
    } else {
        Some(capture_content(&config, &engine).await?)
    };

    let stats = CrawlStatistics::collect(&engine, captured, started.elapsed());
    print_statistics(&stats);

    Ok(())
}

/// Fetches the HTML of every result and writes it as JSON lines
async fn capture_content(config: &Config, engine: &CrawlEngine) -> anyhow::Result<usize> {
    let mut fetcher =
        ContentFetcher::new(&config.fetcher).context("Failed to build content fetcher")?;

    tracing::info!("Capturing content of {} pages", engine.results().len());
    for url in engine.results().urls() {
        fetcher.fetch(url).await;
    }

    let directory = Path::new(&config.output.directory);
    let mut writer = JsonLinesWriter::create(directory, &config.output.file_prefix)
        .with_context(|| format!("Failed to create output file in {}", directory.display()))?;
    writer.write_pages(fetcher.results())?;
    let captured = writer.lines();
    let path = writer.finish()?;

    tracing::info!("Wrote {} pages to {}", captured, path.display());
    Ok(captured)
}
