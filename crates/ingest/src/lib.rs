//! # Ingest layer
//!
//! Documents enter the pipeline here. We read a file from disk, pull out its
//! text layer, run OCR over any embedded images and hand back one plain
//! string for the canonical stage.
//!
//! ## What we do here
//!
//! - **Extract** - [`Extractor`] turns a path into page text plus embedded
//!   images. [`FileExtractor`] handles PDFs, raster images and plain text.
//! - **Recognize** - [`Recognizer`] turns image bytes into text.
//!   [`CommandRecognizer`] shells out to tesseract; [`NoopRecognizer`] skips OCR.
//! - **Assemble** - Each page's text is followed by the text of its own
//!   images, all joined with `\n`. Blank OCR output is dropped.
//! - **Tolerate OCR failure** - A failed or timed out image is logged and
//!   contributes nothing. Only extraction failures are fatal.
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use ingest::{extract_text, ExtractConfig, FileExtractor, NoopRecognizer, Recognizer};
//!
//! let recognizer: Arc<dyn Recognizer> = Arc::new(NoopRecognizer);
//! let text = extract_text(
//!     Path::new("paper.pdf"),
//!     &FileExtractor::new(),
//!     &recognizer,
//!     &ExtractConfig::default(),
//! )?;
//! println!("{text}");
//! # Ok::<(), ingest::ExtractError>(())
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn, Level};

mod config;
mod error;
mod extractor;
mod recognize;
mod types;

pub use crate::config::{ExtractConfig, DEFAULT_RECOGNITION_TIMEOUT};
pub use crate::error::{ExtractError, RecognitionError};
pub use crate::extractor::{Extractor, FileExtractor};
pub use crate::recognize::{
    recognize_all, recognize_with_timeout, CommandRecognizer, NoopRecognizer, Recognizer,
};
pub use crate::types::{assemble_text, EmbeddedImage, ExtractedDocument};

/// Extract the full text of one document.
pub fn extract_text(
    path: &Path,
    extractor: &dyn Extractor,
    recognizer: &Arc<dyn Recognizer>,
    cfg: &ExtractConfig,
) -> Result<String, ExtractError> {
    let start = Instant::now();
    let span = tracing::span!(Level::INFO, "ingest.extract", path = %path.display());
    let _guard = span.enter();

    let doc = match extractor.extract(path, cfg) {
        Ok(doc) => doc,
        Err(err) => {
            let elapsed_micros = start.elapsed().as_micros();
            warn!(error = %err, elapsed_micros, "extract_failure");
            return Err(err);
        }
    };

    let recognized: Vec<String> = if cfg.recognize_images && !doc.images.is_empty() {
        recognize_all(&doc.images, recognizer, cfg)
            .into_iter()
            .zip(doc.images.iter())
            .map(|(result, image)| match result {
                Ok(text) => text,
                Err(err) => {
                    warn!(page = image.page, error = %err, "ocr_failed");
                    String::new()
                }
            })
            .collect()
    } else {
        if !doc.images.is_empty() {
            debug!(images = doc.images.len(), "ocr_skipped");
        }
        vec![String::new(); doc.images.len()]
    };

    let text = assemble_text(&doc, &recognized);
    let elapsed_micros = start.elapsed().as_micros();
    info!(
        pages = doc.pages.len(),
        images = doc.images.len(),
        text_len = text.len(),
        elapsed_micros,
        "extract_success"
    );
    Ok(text)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use lopdf::dictionary;

    use super::*;

    struct Fixed(ExtractedDocument);

    impl Extractor for Fixed {
        fn extract(&self, _: &Path, _: &ExtractConfig) -> Result<ExtractedDocument, ExtractError> {
            Ok(self.0.clone())
        }
    }

    struct Counting {
        calls: AtomicUsize,
        fail_on: Option<usize>,
    }

    impl Recognizer for Counting {
        fn recognize(&self, image: &[u8]) -> Result<String, RecognitionError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if Some(image[0] as usize) == self.fail_on {
                return Err(RecognitionError::Other(format!("call {call} failed")));
            }
            Ok(format!("ocr{}", image[0]))
        }
    }

    fn two_page_doc() -> ExtractedDocument {
        ExtractedDocument {
            pages: vec!["first page".into(), "second page".into()],
            images: vec![
                EmbeddedImage { page: 0, bytes: vec![0] },
                EmbeddedImage { page: 1, bytes: vec![1] },
            ],
        }
    }

    #[test]
    fn page_text_then_its_images() {
        let recognizer: Arc<dyn Recognizer> = Arc::new(Counting {
            calls: AtomicUsize::new(0),
            fail_on: None,
        });
        let text = extract_text(
            Path::new("doc.pdf"),
            &Fixed(two_page_doc()),
            &recognizer,
            &ExtractConfig::default(),
        )
        .unwrap();
        assert_eq!(text, "first page\nocr0\nsecond page\nocr1");
    }

    #[test]
    fn failed_image_is_skipped() {
        let counting = Arc::new(Counting {
            calls: AtomicUsize::new(0),
            fail_on: Some(0),
        });
        let recognizer: Arc<dyn Recognizer> = counting.clone();
        let text = extract_text(
            Path::new("doc.pdf"),
            &Fixed(two_page_doc()),
            &recognizer,
            &ExtractConfig::default().with_parallel(false),
        )
        .unwrap();
        assert_eq!(text, "first page\nsecond page\nocr1");
        assert_eq!(counting.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn recognition_disabled() {
        let counting = Arc::new(Counting {
            calls: AtomicUsize::new(0),
            fail_on: None,
        });
        let recognizer: Arc<dyn Recognizer> = counting.clone();
        let text = extract_text(
            Path::new("doc.pdf"),
            &Fixed(two_page_doc()),
            &recognizer,
            &ExtractConfig::default().with_recognize_images(false),
        )
        .unwrap();
        assert_eq!(text, "first page\nsecond page");
        assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn text_file_end_to_end() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "The quick brown fox.").unwrap();

        let recognizer: Arc<dyn Recognizer> = Arc::new(NoopRecognizer);
        let text = extract_text(
            file.path(),
            &FileExtractor::new(),
            &recognizer,
            &ExtractConfig::default(),
        )
        .unwrap();
        assert_eq!(text, "The quick brown fox.");
    }

    #[test]
    fn missing_file_propagates() {
        let recognizer: Arc<dyn Recognizer> = Arc::new(NoopRecognizer);
        let err = extract_text(
            &PathBuf::from("/nonexistent/dir/paper.pdf"),
            &FileExtractor::new(),
            &recognizer,
            &ExtractConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ExtractError::Io { .. }));
    }

    #[test]
    fn pdf_images_reach_the_recognizer() {
        let image = lopdf::Stream::new(
            lopdf::dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 1,
                "Height" => 1,
                "Filter" => "DCTDecode",
            },
            vec![7, 0xD8, 0xFF],
        );
        let pdf = crate::extractor::pdf_with_images("Printed words", vec![image]);
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(&pdf).unwrap();

        let counting = Arc::new(Counting {
            calls: AtomicUsize::new(0),
            fail_on: None,
        });
        let recognizer: Arc<dyn Recognizer> = counting.clone();
        let text = extract_text(
            file.path(),
            &FileExtractor::new(),
            &recognizer,
            &ExtractConfig::default(),
        )
        .unwrap();
        assert_eq!(counting.calls.load(Ordering::SeqCst), 1);
        assert!(text.ends_with("\nocr7"), "got {text:?}");
    }
}
