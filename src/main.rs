mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use plagiary::{build_comparator, PlagiaryConfig};

use crate::cli::{Cli, LogFormat};

fn init_tracing(verbose: u8, quiet: bool, format: LogFormat) {
    let filter = if let Ok(env) = std::env::var("PLAGIARY_LOG") {
        EnvFilter::new(env)
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.without_time().init(),
        LogFormat::Json => builder.with_target(false).json().init(),
    }
}

/// Configuration file (or defaults) with command-line overrides applied.
fn load_config(cli: &Cli) -> Result<PlagiaryConfig> {
    let mut cfg = match &cli.config {
        Some(path) => PlagiaryConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => PlagiaryConfig::default(),
    };

    if let Some(k) = cli.shingle {
        cfg.perceptual.shingle_size = usize::try_from(k).context("shingle size out of range")?;
    }
    if let Some(len) = cli.min_token_len {
        cfg.canonical.min_token_len =
            usize::try_from(len).context("minimum token length out of range")?;
    }
    if let Some(dir) = &cli.output_dir {
        cfg.report.output_dir = dir.clone();
    }
    if let Some(path) = &cli.store {
        cfg.store.backend = "redb".to_string();
        cfg.store.path = path.clone();
    }
    if cli.no_store {
        cfg.store.backend = "in_memory".to_string();
    }
    if let Some(command) = &cli.ocr_command {
        cfg.extract.ocr_command = command.clone();
    }
    if cli.no_ocr {
        cfg.extract.recognize_images = false;
    }

    cfg.validate().context("invalid configuration")?;
    Ok(cfg)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet, cli.log_format);

    let cfg = load_config(&cli)?;
    let comparator = build_comparator(&cfg).context("failed to open document repository")?;

    let report = comparator
        .compare(&cli.pdf1, &cli.pdf2)
        .with_context(|| {
            format!(
                "failed to compare {} and {}",
                cli.pdf1.display(),
                cli.pdf2.display()
            )
        })?;
    comparator
        .repository()
        .flush()
        .context("failed to flush representation store")?;

    println!("Similarity: {:.2}%", report.similarity * 100.0);
    println!(
        "Matching tokens: {} / {} ({}), {} / {} ({})",
        report.matched_a,
        report.tokens_a,
        cli.pdf1.display(),
        report.matched_b,
        report.tokens_b,
        cli.pdf2.display()
    );
    println!("Report: {}", report.output_a.display());
    println!("Report: {}", report.output_b.display());

    Ok(())
}
