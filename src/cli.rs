use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "plagiary",
    version,
    about = "Compare two documents and highlight the passages they share"
)]
pub struct Cli {
    /// First document (PDF, image or plain text)
    pub pdf1: PathBuf,

    /// Second document (PDF, image or plain text)
    pub pdf2: PathBuf,

    /// Shingle size in tokens
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub shingle: Option<u64>,

    /// Directory receiving the highlighted reports
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// YAML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the representation store path
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Keep representations in memory only
    #[arg(long, conflicts_with = "store")]
    pub no_store: bool,

    /// Minimum token length in characters
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub min_token_len: Option<u64>,

    /// OCR command; receives the image on stdin and prints text on stdout
    #[arg(long)]
    pub ocr_command: Option<String>,

    /// Skip text recognition on images
    #[arg(long, conflicts_with = "ocr_command")]
    pub no_ocr: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}
