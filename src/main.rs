use std::io::Read;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing::info;

use tonecheck::config::Config;
use tonecheck::inference::sagemaker::SageMakerClient;
use tonecheck::pipeline::{AnnotateOptions, Annotator, Event, VectorizeInput};
use tonecheck::text::Lemmatizer;
use tonecheck::twitter::client::TwitterClient;

/// tonecheck: classify an account's recent posts and repost them with a
/// sentiment annotation.
#[derive(Parser)]
#[command(name = "tonecheck", version, about)]
struct Cli {
    /// Invocation payload, e.g. '{"number": 1}'. Read from stdin when omitted.
    event: Option<String>,

    /// Classify and log, but don't repost or annotate
    #[arg(long)]
    dry_run: bool,

    /// Vectorize the cleaned, lemmatized tokens instead of the raw text
    #[arg(long)]
    preprocessed: bool,

    /// Load the vectorizer once per run instead of once per post
    #[arg(long)]
    cache_vectorizer: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tonecheck=info")),
        )
        .init();

    let cli = Cli::parse();

    let raw_event = match cli.event {
        Some(raw) => raw,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read invocation payload from stdin")?;
            buf
        }
    };
    let event = Event::parse(&raw_event)?;
    info!(number = event.number, "Iteration of posts");

    let config = Config::load()?;
    config.require_endpoint()?;

    let twitter = TwitterClient::new(&config.twitter_api_url, config.credentials.clone())?;
    let inference = SageMakerClient::from_env().await;
    let lemmatizer = Lemmatizer::load_or_builtin(&config.corpus_dir);

    let options = AnnotateOptions {
        vectorize_input: if cli.preprocessed {
            VectorizeInput::Preprocessed
        } else {
            VectorizeInput::Raw
        },
        dry_run: cli.dry_run,
        cache_vectorizer: cli.cache_vectorizer,
    };

    let annotator = Annotator::new(&twitter, &inference, &lemmatizer, &config, options);
    let summary = annotator
        .run(event.number)
        .await
        .with_context(|| format!("Failed to fetch timeline for @{}", config.target_account))?;

    println!("\n{}", "Run complete.".bold());
    println!("  Posts examined: {}", summary.examined);
    println!("  Annotated: {}", summary.annotated.to_string().green());
    if summary.failed > 0 {
        println!("  Failed: {}", summary.failed.to_string().yellow());
    }

    Ok(())
}
