//! Hermes main entry point
//!
//! This is the command-line interface for the Hermes site indexer.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hermes::app::Hermes;
use hermes::config::{load_config_with_hash, CrawlSettings};
use hermes::crawler::{progress_channel, CrawlProgress};
use hermes::output::{
    print_answer, print_crawl_summary, print_domains, print_history, print_statistics,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Hermes: index websites and ask questions about them
///
/// Hermes crawls a site breadth-first while respecting robots.txt, stores
/// the readable text of every page, and answers questions by handing the
/// most relevant pages to a language model.
#[derive(Parser, Debug)]
#[command(name = "hermes")]
#[command(version = "1.0.0")]
#[command(about = "Index websites and ask questions about them", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Index a single page
    Index {
        /// Page to fetch and store
        url: String,
    },

    /// Crawl a site starting from a URL
    Crawl {
        /// Start URL; only pages on the same origin are visited
        url: String,

        /// Stop after this many pages (capped by the saved settings)
        #[arg(long)]
        max_pages: Option<u32>,
    },

    /// Ask a question about the indexed pages
    Ask {
        /// The question
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,

        /// Only use pages from this domain
        #[arg(long)]
        domain: Option<String>,
    },

    /// Show index statistics
    Stats,

    /// List indexed domains
    Domains,

    /// Remove a domain and all of its pages
    RemoveDomain {
        domain: String,
    },

    /// Remove every indexed page and domain
    Clear,

    /// Show the question and answer history
    History {
        /// Delete the history instead of showing it
        #[arg(long)]
        clear: bool,
    },

    /// Show or change crawl settings
    Settings {
        #[arg(long)]
        max_pages: Option<u32>,

        #[arg(long)]
        crawl_delay_ms: Option<u64>,

        #[arg(long)]
        respect_robots: Option<bool>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    let mut app = Hermes::open(config).context("Failed to open the index database")?;

    if let Err(e) = run(&mut app, cli.command).await {
        tracing::error!("{:#}", e);
        return Err(e);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("hermes=info,warn"),
            1 => EnvFilter::new("hermes=debug,info"),
            2 => EnvFilter::new("hermes=trace,debug"),
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

async fn run(app: &mut Hermes, command: Command) -> Result<()> {
    match command {
        Command::Index { url } => handle_index(app, &url).await,
        Command::Crawl { url, max_pages } => handle_crawl(app, &url, max_pages).await,
        Command::Ask { question, domain } => {
            handle_ask(app, &question.join(" "), domain.as_deref()).await
        }
        Command::Stats => {
            print_statistics(&app.stats()?);
            Ok(())
        }
        Command::Domains => {
            let domains = app.domains()?;
            if domains.is_empty() {
                println!("No domains indexed.");
            } else {
                print_domains(&domains);
            }
            Ok(())
        }
        Command::RemoveDomain { domain } => {
            let removed = app
                .remove_domain(&domain)
                .with_context(|| format!("Could not remove {}", domain))?;
            println!("✓ Removed {} ({} pages)", domain, removed);
            Ok(())
        }
        Command::Clear => {
            app.clear_all()?;
            println!("✓ All indexed data cleared");
            Ok(())
        }
        Command::History { clear } => {
            if clear {
                app.clear_chat_history()?;
                println!("✓ Chat history cleared");
            } else {
                print_history(&app.chat_history()?);
            }
            Ok(())
        }
        Command::Settings {
            max_pages,
            crawl_delay_ms,
            respect_robots,
        } => handle_settings(app, max_pages, crawl_delay_ms, respect_robots),
    }
}

/// Handles the index command: fetches and stores one page
async fn handle_index(app: &mut Hermes, url: &str) -> Result<()> {
    let document = app
        .index_page(url)
        .await
        .with_context(|| format!("Failed to index {}", url))?;

    println!("✓ Indexed {}", document.url);
    if !document.title.is_empty() {
        println!("  Title: {}", document.title);
    }
    println!("  Domain: {}", document.domain);
    println!("  Content: {} characters", document.content.chars().count());
    Ok(())
}

/// Handles the crawl command, printing progress while the crawl runs
async fn handle_crawl(app: &mut Hermes, url: &str, max_pages: Option<u32>) -> Result<()> {
    let (sink, mut events) = progress_channel(64);

    let printer = tokio::spawn(async move {
        while let Some(CrawlProgress {
            current,
            total,
            current_url,
        }) = events.recv().await
        {
            println!("[{}/{}] {}", current, total, current_url);
        }
    });

    let result = app.crawl_site(url, max_pages, &sink).await;
    drop(sink);
    // The printer ends once the sink is gone
    let _ = printer.await;

    let outcome = result.with_context(|| format!("Crawl of {} failed", url))?;
    print_crawl_summary(&outcome);
    Ok(())
}

/// Handles the ask command
async fn handle_ask(app: &mut Hermes, question: &str, domain: Option<&str>) -> Result<()> {
    let answer = app.ask(question, domain).await?;
    print_answer(&answer);
    Ok(())
}

/// Handles the settings command: updates any given field, then shows the result
fn handle_settings(
    app: &mut Hermes,
    max_pages: Option<u32>,
    crawl_delay_ms: Option<u64>,
    respect_robots: Option<bool>,
) -> Result<()> {
    let current = app.settings()?;

    if max_pages.is_some() || crawl_delay_ms.is_some() || respect_robots.is_some() {
        let updated = CrawlSettings {
            max_pages_per_crawl: max_pages.unwrap_or(current.max_pages_per_crawl),
            crawl_delay_ms: crawl_delay_ms.unwrap_or(current.crawl_delay_ms),
            respect_robots_txt: respect_robots.unwrap_or(current.respect_robots_txt),
        };
        app.update_settings(updated)?;
        println!("✓ Settings saved");
    }

    let settings = app.settings()?;
    println!("Crawl settings:");
    println!("  Max pages per crawl: {}", settings.max_pages_per_crawl);
    println!("  Crawl delay: {}ms", settings.crawl_delay_ms);
    println!("  Respect robots.txt: {}", settings.respect_robots_txt);
    Ok(())
}
