use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use feedscan::config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "feedscan",
    version,
    about = "Scan RSS/Atom feeds for keywords and write a consolidated report"
)]
struct Args {
    /// Config file (TOML). Missing file means built-in defaults
    #[arg(long, value_name = "FILE", default_value = "feedscan.toml")]
    config: PathBuf,

    /// Source list: one feed URL per line
    #[arg(short, long, value_name = "FILE")]
    sources: Option<PathBuf>,

    /// Keyword list: one keyword per line
    #[arg(short, long, value_name = "FILE")]
    keywords: Option<PathBuf>,

    /// Report file, overwritten on every run
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Maximum number of feeds fetched at once
    #[arg(short = 'j', long, value_name = "N")]
    concurrency: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Deadline for the whole run in seconds (0 = none)
    #[arg(long, value_name = "SECS")]
    deadline: Option<u64>,
}

impl Args {
    /// Command-line flags win over the config file.
    fn apply(self, mut config: Config) -> Config {
        if let Some(path) = self.sources {
            config.sources_path = path;
        }
        if let Some(path) = self.keywords {
            config.keywords_path = path;
        }
        if let Some(path) = self.output {
            config.report_path = path;
        }
        if let Some(n) = self.concurrency {
            config.concurrency = n;
        }
        if let Some(secs) = self.timeout {
            config.fetch_timeout_secs = secs;
        }
        if let Some(secs) = self.deadline {
            config.deadline_secs = secs;
        }
        config
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config = Config::load(&args.config)
        .with_context(|| format!("Failed to load config '{}'", args.config.display()))?;
    let config = args.apply(config);
    tracing::debug!(?config, "Effective configuration");

    feedscan::run(&config, std::io::stdout()).await?;
    Ok(())
}
