/*
sumlens - single-binary main.rs
Loads configuration, opens the JSON article store and drives the remote
summarizer from the command line.
*/

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use common::Config;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use sumlens::store::ArticleStore;
use sumlens::summarize::remote::RemoteSummarizer;
use sumlens::summarize::{self, GenerationParams, InputLimits};

#[derive(Parser, Debug)]
#[command(name = "sumlens", about = "Sumlens article store + summarization CLI")]
struct Args {
    /// Path to config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override log level (info, debug, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all stored articles
    List,
    /// Show a single article by id
    Show { id: u64 },
    /// List articles in a category (case-insensitive)
    Category { name: String },
    /// Add an article to the store
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        category: String,
        /// Article body given inline
        #[arg(long, conflicts_with = "content_file")]
        content: Option<String>,
        /// Read the article body from a file
        #[arg(long, value_name = "FILE")]
        content_file: Option<PathBuf>,
    },
    /// List the built-in model presets
    Models,
    /// Summarize a stored article, or the first two articles when no id is given
    Summarize {
        id: Option<u64>,
        /// Maximum number of tokens in the summary
        #[arg(long)]
        max_length: Option<u32>,
        /// Minimum number of tokens in the summary
        #[arg(long)]
        min_length: Option<u32>,
        /// Enable sampling for more diverse summaries
        #[arg(long)]
        sample: bool,
        /// Sampling temperature (only meaningful with --sample)
        #[arg(long)]
        temperature: Option<f32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI args
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    // Resolve config paths
    let default_path = PathBuf::from("config.default.toml");

    let override_path = if let Some(p) = args.config {
        if !p.exists() {
            error!(path = ?p, "specified config file not found");
            return Err(anyhow::anyhow!("Config file not found: {}", p.display()));
        }
        Some(p)
    } else {
        let p = PathBuf::from("config.toml");
        if p.exists() {
            Some(p)
        } else {
            None
        }
    };

    // Load configuration with defaults
    let config = match Config::load_with_defaults(
        if default_path.exists() {
            Some(&default_path)
        } else {
            None
        },
        override_path.as_deref(),
    )
    .await
    {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(%e, "failed to load configuration");
            return Err(e);
        }
    };
    info!(default = ?default_path, override_file = ?override_path, "configuration loaded");

    let mut store = ArticleStore::open(&config.store.path)
        .with_context(|| format!("failed to open article store at {}", config.store.path))?;
    info!(count = store.all().len(), "article store ready");

    match args.command {
        Command::List => {
            for article in store.all() {
                println!(
                    "{:>4}  {:<40}  {:<12}  {} chars",
                    article.id,
                    article.title,
                    article.category,
                    article.content.chars().count()
                );
            }
        }
        Command::Show { id } => match store.get(id) {
            Some(article) => {
                println!("{} (id {}, category {})", article.title, article.id, article.category);
                println!();
                println!("{}", article.content);
            }
            None => println!("article {} not found", id),
        },
        Command::Category { name } => {
            let matches = store.by_category(&name);
            if matches.is_empty() {
                println!("no articles in category '{}'", name);
            } else {
                for article in matches {
                    println!("{:>4}  {:<40}  {}", article.id, article.title, article.category);
                }
            }
        }
        Command::Add {
            title,
            category,
            content,
            content_file,
        } => {
            let body = match (content, content_file) {
                (Some(inline), _) => inline,
                (None, Some(path)) => tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("failed to read content file: {}", path.display()))?,
                (None, None) => {
                    anyhow::bail!("one of --content or --content-file is required")
                }
            };
            let id = store.add(&title, &body, &category)?;
            println!("added article {} to {}", id, store.path().display());
        }
        Command::Models => {
            for preset in common::model_presets() {
                println!(
                    "{:<16}  {:<16}  {:<34}  length {}-{}",
                    preset.key, preset.name, preset.model_id, preset.min_length, preset.max_length
                );
                println!("{:<16}  {}", "", preset.description);
            }
        }
        Command::Summarize {
            id,
            max_length,
            min_length,
            sample,
            temperature,
        } => {
            let provider = build_summarizer(&config)?;
            info!(model = provider.model(), "summarizer ready");

            let mut params = generation_params(&config);
            if let Some(v) = max_length {
                params.max_length = v;
            }
            if let Some(v) = min_length {
                params.min_length = v;
            }
            if sample {
                params.do_sample = true;
            }
            if let Some(v) = temperature {
                params.temperature = v;
            }
            let limits = InputLimits::from_config(config.limits.as_ref());

            match id {
                Some(id) => {
                    let article = store
                        .get(id)
                        .with_context(|| format!("no article with id {}", id))?;
                    let report =
                        summarize::summarize_text(&provider, &article.content, &params, &limits)
                            .await?;
                    print_report(&article.title, &report);
                }
                None => {
                    // Demo flow: summarize the first two stored articles
                    let articles: Vec<_> = store.all().iter().take(2).collect();
                    if articles.is_empty() {
                        println!("store is empty, nothing to summarize");
                        return Ok(());
                    }
                    let texts: Vec<String> =
                        articles.iter().map(|a| a.content.clone()).collect();
                    let results =
                        summarize::summarize_batch(&provider, &texts, &params, &limits).await;
                    for (article, result) in articles.iter().zip(results) {
                        match result {
                            Ok(report) => print_report(&article.title, &report),
                            Err(e) => {
                                error!(id = article.id, "summarization failed: {e:#}");
                                println!("{}: summarization failed ({e:#})", article.title);
                            }
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

/// Build the remote provider from configuration.
///
/// The model setting may be a preset key or a literal checkpoint id; the
/// API key is read from the environment variable named in the config and
/// never from the config file itself.
fn build_summarizer(config: &Config) -> Result<RemoteSummarizer> {
    let sum_cfg = config.summarizer.as_ref();

    let api_key = match sum_cfg.and_then(|c| c.api_key_env.as_deref()) {
        Some(env_name) => std::env::var(env_name)
            .with_context(|| format!("summarizer API key env var '{}' not set", env_name))?,
        None => String::new(),
    };

    let model_key = sum_cfg
        .and_then(|c| c.model.as_deref())
        .unwrap_or(common::DEFAULT_MODEL_KEY);
    let model_id = common::find_preset(model_key)
        .map(|p| p.model_id.to_string())
        .unwrap_or_else(|| model_key.to_string());

    let api_url = sum_cfg
        .and_then(|c| c.api_url.clone())
        .unwrap_or_else(|| "https://api-inference.huggingface.co".to_string());
    let timeout_secs = sum_cfg.and_then(|c| c.timeout_seconds).unwrap_or(30);

    Ok(RemoteSummarizer::new(api_url, api_key, model_id).with_timeout(timeout_secs))
}

/// Resolve generation parameters: preset recommendations fill the length
/// bounds the config leaves unset, explicit config values win.
fn generation_params(config: &Config) -> GenerationParams {
    let sum_cfg = config.summarizer.as_ref();
    let mut params = GenerationParams::from_config(sum_cfg);

    let model_key = sum_cfg
        .and_then(|c| c.model.as_deref())
        .unwrap_or(common::DEFAULT_MODEL_KEY);
    if let Some(preset) = common::find_preset(model_key) {
        if sum_cfg.and_then(|c| c.max_length).is_none() {
            params.max_length = preset.max_length;
        }
        if sum_cfg.and_then(|c| c.min_length).is_none() {
            params.min_length = preset.min_length;
        }
    }
    params
}

fn print_report(title: &str, report: &summarize::SummaryReport) {
    println!("{} [{}]", title, report.model_used);
    println!(
        "  original {} chars, summary {} chars ({:.1}% of original)",
        report.original_chars,
        report.summary_chars,
        report.compression_ratio() * 100.0
    );
    println!("  {}", report.summary);
}
