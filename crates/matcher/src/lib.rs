//! # Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` sits on top of the document repository (`index`). Given two
//! paths it makes sure both are processed, scores them with Jaccard
//! similarity over their shingle sets, maps every shared shingle back onto
//! token positions and renders one highlighted report per document.
//!
//! ## Core Types
//!
//! - [`Comparator`]: the orchestrator. Holds an `Arc<Repository>` and a
//!   [`ReportRenderer`].
//! - [`matched_positions`] and [`segments`]: position expansion and run
//!   splitting, usable on their own.
//! - [`ComparisonResult`]: similarity plus matched token indices per side.
//! - [`ComparisonReport`]: what [`Comparator::compare`] hands back, including
//!   the two report paths.
//! - [`HtmlReportRenderer`]: the built-in renderer.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use index::{BackendConfig, Repository, RepositoryConfig};
//! use ingest::{CommandRecognizer, FileExtractor};
//! use matcher::{Comparator, MatcherConfig};
//!
//! let repo = Repository::open(
//!     RepositoryConfig::new().with_backend(BackendConfig::redb("plagiarism_cache/doc_reps.redb")),
//!     Arc::new(FileExtractor::new()),
//!     Arc::new(CommandRecognizer::default()),
//! )?;
//! let comparator = Comparator::with_html_reports(Arc::new(repo), MatcherConfig::default());
//!
//! let report = comparator.compare(Path::new("essay.pdf"), Path::new("source.pdf"))?;
//! println!("{:.2}% similar", report.similarity * 100.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod engine;
pub mod report;
pub mod segment;
pub mod types;

pub use crate::engine::{compare_representations, Comparator, MatcherConfig, DEFAULT_OUTPUT_DIR};
pub use crate::report::{
    escape_html, HtmlReportRenderer, ReportRenderer, DEFAULT_MAX_PARAGRAPH_CHARS,
    DEFAULT_PARAGRAPHS_PER_PAGE,
};
pub use crate::segment::{matched_positions, segments};
pub use crate::types::{ComparisonReport, ComparisonResult, MatchError, ReportHeader, Segment};
