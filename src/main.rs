use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

use speech_emotion::{AnalyzerConfig, EmotionAnalyzer, PredictionResult};

/// Analyze the emotional tone of speech recordings
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// WAV files to analyze
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Path to the emotion classifier (.onnx)
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Path to a JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of threads for classifier inference
    #[arg(long)]
    threads: Option<usize>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Print a human-readable summary instead of JSON
    #[arg(long, conflicts_with = "pretty")]
    summary: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => AnalyzerConfig::default_config_path()?,
    };
    let mut config = AnalyzerConfig::load(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    if let Some(model) = &args.model {
        config.model_path = Some(model.clone());
    }
    if let Some(threads) = args.threads {
        config.n_threads = threads;
    }

    let model_path = config.get_model_path()?;
    info!("Model: {:?}", model_path);

    let analyzer = match EmotionAnalyzer::from_config(&config) {
        Ok(analyzer) => analyzer,
        Err(e) => {
            error!("Failed to load classifier: {}", e);
            eprintln!("\nThe emotion classifier could not be loaded from {:?}", model_path);
            eprintln!("Place the model at the expected location or pass --model /path/to/model.onnx");
            return Err(e.into());
        }
    };

    let mut failures = 0;
    for path in &args.files {
        match analyzer.analyze_file(path) {
            Ok(result) => print_result(path, &result, &args)?,
            Err(e) => {
                error!("{}: {}", path.display(), e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} files failed", failures, args.files.len());
    }
    Ok(())
}

fn print_result(path: &std::path::Path, result: &PredictionResult, args: &Args) -> Result<()> {
    if args.summary {
        println!("{}", path.display());
        for (emotion, percent) in result.emotions.ranked().iter().take(3) {
            println!("  {:<8} {:>6.2}%", emotion.label(), percent);
        }
        println!(
            "  confidence {:.2} ({})",
            result.confidence_score(),
            result.confidence_level()
        );
        return Ok(());
    }

    let json = if args.pretty {
        serde_json::to_string_pretty(result)
    } else {
        serde_json::to_string(result)
    }
    .context("Failed to serialize result")?;
    println!("{}", json);
    Ok(())
}
