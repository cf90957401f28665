//! Reads whitespace-separated domains from one stdin line and prints one
//! `domain,logo_url` CSV row per domain.

use anyhow::{Context, Result};
use clap::Parser;
use logo_crawler::{BatchRunner, CrawlerConfig, HttpFetcher, LivenessChecker};
use logo_finder::{CollectorConfig, LogoPipeline, PipelineConfig};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "logo-crawler")]
#[command(about = "Find the most likely logo URL for each domain read from stdin")]
struct Cli {
    /// Print every ranked candidate instead of the best URL
    #[arg(long)]
    debug: bool,

    /// Drop candidates whose URL does not answer 200 OK
    #[arg(long)]
    check_alive: bool,

    /// Skip images nested inside anchors
    #[arg(long)]
    no_anchors: bool,

    /// Domains processed at once (defaults to CPU count - 1)
    #[arg(long)]
    concurrency: Option<usize>,

    /// Minimum score a candidate must exceed
    #[arg(long, default_value_t = 10)]
    threshold: i32,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,logo_finder=info,logo_crawler=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(io::stderr),
        )
        .init();

    let cli = Cli::parse();

    let mut config = CrawlerConfig::from_env().context("Failed to load configuration")?;
    if let Some(concurrency) = cli.concurrency {
        config = config.with_concurrency(concurrency);
    }

    let domains = read_domains(io::stdin().lock()).context("Failed to read domains from stdin")?;
    info!(domains = domains.len(), debug = cli.debug, "Read input domains");

    let fetcher = HttpFetcher::new(&config).context("Failed to build HTTP client")?;
    let pipeline = LogoPipeline::new(
        PipelineConfig::new()
            .with_debug(cli.debug)
            .with_threshold(cli.threshold)
            .with_collector(CollectorConfig::new().with_follow_anchors(!cli.no_anchors)),
    );

    let mut runner = BatchRunner::new(Arc::new(fetcher), Arc::new(pipeline))
        .with_concurrency(config.concurrency);
    if cli.check_alive {
        let checker = LivenessChecker::new(config.alive_timeout, &config.user_agent)
            .context("Failed to build liveness client")?;
        runner = runner.with_link_checker(Arc::new(checker));
    }

    let results = runner.run(domains).await;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    logo_crawler::write_results(&mut out, &results, cli.debug).context("Failed to write CSV")?;
    out.flush().context("Failed to flush stdout")?;

    Ok(())
}

fn read_domains(mut input: impl BufRead) -> Result<Vec<String>> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.split_whitespace().map(str::to_string).collect())
}
