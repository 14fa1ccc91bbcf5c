mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use mien_core::reference::reference_face_sized;
use mien_core::{Analyzer, LandmarkSet};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "mien", about = "Mien facial geometry scoring CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one landmark JSON file and print the full result
    Analyze {
        /// Landmark set JSON file
        file: PathBuf,
        /// Engine configuration TOML (default: $MIEN_CONFIG, then built-in)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// Analyze several landmark files concurrently, one summary line each
    Batch {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the reference landmark set
    Sample {
        /// Image width in pixels
        #[arg(long, default_value_t = 640, value_parser = clap::value_parser!(u32).range(1..))]
        width: u32,
        /// Image height in pixels
        #[arg(long, default_value_t = 800, value_parser = clap::value_parser!(u32).range(1..))]
        height: u32,
    },
    /// Validate and print the effective configuration
    Config {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the tier table
    Tiers {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// One line of `batch` output.
#[derive(Serialize)]
struct BatchLine {
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tier: Option<mien_core::Tier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    severe_flaws: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn read_landmarks(path: &Path) -> Result<LandmarkSet> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing landmark JSON in {}", path.display()))
}

fn analyze_file(analyzer: &Analyzer, path: &Path) -> BatchLine {
    let file = path.display().to_string();
    let outcome = read_landmarks(path).and_then(|set| Ok(analyzer.analyze(&set)?));
    match outcome {
        Ok(result) => BatchLine {
            file,
            score: Some(result.overall_score.score),
            tier: Some(result.overall_score.tier),
            severe_flaws: Some(result.overall_score.severe_flaws),
            error: None,
        },
        Err(e) => BatchLine {
            file,
            score: None,
            tier: None,
            severe_flaws: None,
            error: Some(format!("{e:#}")),
        },
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            file,
            config,
            compact,
        } => {
            let analyzer = Analyzer::new(config::load(config)?)?;
            let set = read_landmarks(&file)?;
            let result = analyzer
                .analyze(&set)
                .with_context(|| format!("analyzing {}", file.display()))?;
            let json = if compact {
                serde_json::to_string(&result)?
            } else {
                serde_json::to_string_pretty(&result)?
            };
            println!("{json}");
        }
        Commands::Batch { files, config } => {
            let analyzer = Arc::new(Analyzer::new(config::load(config)?)?);
            let handles: Vec<_> = files
                .into_iter()
                .map(|path| {
                    let analyzer = Arc::clone(&analyzer);
                    tokio::task::spawn_blocking(move || analyze_file(&analyzer, &path))
                })
                .collect();

            let total = handles.len();
            let mut failed = 0;
            for handle in handles {
                let line = handle.await.context("analysis task panicked")?;
                if line.error.is_some() {
                    failed += 1;
                }
                println!("{}", serde_json::to_string(&line)?);
            }
            tracing::info!(total, failed, "Batch complete");
            if failed > 0 {
                bail!("{failed} of {total} files failed");
            }
        }
        Commands::Sample { width, height } => {
            let set = reference_face_sized(width, height);
            println!("{}", serde_json::to_string_pretty(&set)?);
        }
        Commands::Config { config } => {
            let config = config::load(config)?;
            print!("{}", config.to_toml_string()?);
        }
        Commands::Tiers { config } => {
            let config = config::load(config)?;
            for rule in &config.tiers {
                println!(
                    "{:<4} >= {:>5.1}  {}  {}: {}",
                    rule.tier.as_str(),
                    rule.min_score,
                    rule.emoji,
                    rule.level,
                    rule.description
                );
            }
        }
    }

    Ok(())
}
