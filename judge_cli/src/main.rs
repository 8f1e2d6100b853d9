mod config;
mod report;

use clap::{error::ErrorKind, CommandFactory, Parser};
use dotenvy::dotenv;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

use std::io::{self, Write};

use judge_auth::TokenCredentials;
use judge_core::{LexiconSentiment, TimelineAcquirer, TimelineCache};
use judge_twitter::AuthorizedSource;

use crate::config::Config;

/// Summarize who and what shows up in your home timeline.
#[derive(Parser, Debug)]
#[command(name = "judge", version, about)]
struct Cli {
    /// Account whose home timeline is analyzed
    identity: String,

    /// Only analyze retweets
    #[arg(long)]
    retweets: bool,

    /// Number of entries in each section
    #[arg(long, default_value_t = 20)]
    top: usize,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // 1. Initialize logger
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env()?
        .add_directive("hyper=info".parse()?)
        .add_directive("reqwest=info".parse()?);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .compact()
        .init();

    // 2. Parse arguments
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.kind() == ErrorKind::MissingRequiredArgument => {
            println!("{}", Cli::command().render_usage());
            return Ok(());
        }
        Err(e) => e.exit(),
    };
    let config = Config::from_env()?;
    tracing::debug!("Using {:?}", config);

    // 3. Assemble the acquirer
    let credentials = TokenCredentials::new(&config.token_file, config.client_id.clone(), config.callback_port);
    let source = AuthorizedSource::new(credentials, &cli.identity, &config.api_base).with_service(&config.service);
    let cache = TimelineCache::new(&config.cache_dir, config.cache_ttl);
    let mut acquirer = TimelineAcquirer::new(&cli.identity, source, LexiconSentiment::new(), cache);

    // 4. Fetch and report
    let posts = acquirer.acquire(cli.retweets).await?;
    tracing::info!("Analyzing {} posts of {}", posts.len(), cli.identity);

    let mut out = io::stdout().lock();
    report::write_report(&mut out, &posts, cli.top)?;
    out.flush()?;
    Ok(())
}
