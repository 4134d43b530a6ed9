//! Highlighted report rendering.
//!
//! [`ReportRenderer`] is the seam; [`HtmlReportRenderer`] writes a single
//! self-contained HTML file that prints as one sheet per page section.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::types::{MatchError, ReportHeader, Segment};

pub const DEFAULT_MAX_PARAGRAPH_CHARS: usize = 3000;
pub const DEFAULT_PARAGRAPHS_PER_PAGE: usize = 12;

const REPORT_TITLE: &str = "Plagiarism Analysis Report";

/// Writes one report for one side of a comparison.
pub trait ReportRenderer: Send + Sync {
    /// File extension of produced artifacts, without the dot.
    fn extension(&self) -> &str;

    fn render(
        &self,
        segments: &[Segment],
        header: &ReportHeader,
        path: &Path,
    ) -> Result<(), MatchError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlReportRenderer {
    /// Upper bound on paragraph length in characters. Words are never split,
    /// so a single longer word becomes a paragraph of its own.
    pub max_paragraph_chars: usize,
    /// Paragraphs per printed page. Pages exist only as CSS page breaks;
    /// on screen the report scrolls as one document.
    pub paragraphs_per_page: usize,
}

impl Default for HtmlReportRenderer {
    fn default() -> Self {
        Self {
            max_paragraph_chars: DEFAULT_MAX_PARAGRAPH_CHARS,
            paragraphs_per_page: DEFAULT_PARAGRAPHS_PER_PAGE,
        }
    }
}

/// A run of words sharing one highlight state inside a paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Piece {
    text: String,
    highlighted: bool,
}

type Paragraph = Vec<Piece>;

impl HtmlReportRenderer {
    pub fn new(max_paragraph_chars: usize, paragraphs_per_page: usize) -> Result<Self, MatchError> {
        if max_paragraph_chars == 0 || paragraphs_per_page == 0 {
            return Err(MatchError::InvalidConfig(
                "paragraph size and paragraphs per page must be at least 1".into(),
            ));
        }
        Ok(Self {
            max_paragraph_chars,
            paragraphs_per_page,
        })
    }

    /// Pack words into paragraphs of at most `max_paragraph_chars`, keeping
    /// each word's highlight state.
    fn paragraphs(&self, segments: &[Segment]) -> Vec<Paragraph> {
        let mut paragraphs = Vec::new();
        let mut current: Paragraph = Vec::new();
        let mut len = 0usize;

        for segment in segments {
            for word in segment.text.split_whitespace() {
                let word_len = word.chars().count();
                if len > 0 && len + 1 + word_len > self.max_paragraph_chars {
                    paragraphs.push(std::mem::take(&mut current));
                    len = 0;
                }

                match current.last_mut() {
                    Some(piece) if piece.highlighted == segment.highlighted => {
                        piece.text.push(' ');
                        piece.text.push_str(word);
                    }
                    _ => current.push(Piece {
                        text: word.to_string(),
                        highlighted: segment.highlighted,
                    }),
                }
                len += if len == 0 { word_len } else { word_len + 1 };
            }
        }

        if !current.is_empty() {
            paragraphs.push(current);
        }
        paragraphs
    }

    /// The complete HTML document.
    pub fn to_html(&self, segments: &[Segment], header: &ReportHeader) -> String {
        let mut html = String::new();
        let _ = write!(
            html,
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>{title}: {doc}</title>\n<style>\n{STYLE}</style>\n</head>\n<body>\n\
             <h1>{title}</h1>\n<dl class=\"info\">\n\
             <dt>Document:</dt><dd>{doc}</dd>\n\
             <dt>Compared with:</dt><dd>{other}</dd>\n\
             <dt>Similarity Score:</dt><dd>{score}</dd>\n\
             <dt>Matching Tokens:</dt><dd>{matched} / {total}</dd>\n\
             </dl>\n<h2>Highlighted Text:</h2>\n",
            title = REPORT_TITLE,
            doc = escape_html(&header.document),
            other = escape_html(&header.compared_with),
            score = header.similarity_percent(),
            matched = header.matched_tokens,
            total = header.total_tokens,
        );

        let paragraphs = self.paragraphs(segments);
        for page in paragraphs.chunks(self.paragraphs_per_page.max(1)) {
            html.push_str("<section class=\"page\">\n");
            for paragraph in page {
                html.push_str("<p>");
                for (i, piece) in paragraph.iter().enumerate() {
                    if i > 0 {
                        html.push(' ');
                    }
                    if piece.highlighted {
                        let _ = write!(html, "<mark>{}</mark>", escape_html(&piece.text));
                    } else {
                        html.push_str(&escape_html(&piece.text));
                    }
                }
                html.push_str("</p>\n");
            }
            html.push_str("</section>\n");
        }

        html.push_str("</body>\n</html>\n");
        html
    }
}

const STYLE: &str = "body { font-family: Helvetica, Arial, sans-serif; max-width: 48rem; margin: 2rem auto; color: #1a1a1a; }\n\
h1 { font-size: 16pt; margin-bottom: 30px; }\n\
dl.info { display: grid; grid-template-columns: max-content 1fr; gap: 0.25rem 0.75rem; }\n\
dl.info dt { font-weight: bold; }\n\
dl.info dd { margin: 0; }\n\
p { font-size: 10pt; line-height: 14pt; text-align: justify; margin: 0 0 12px; }\n\
mark { background: yellow; font-weight: bold; }\n\
section.page + section.page { page-break-before: always; break-before: page; }\n";

impl ReportRenderer for HtmlReportRenderer {
    fn extension(&self) -> &str {
        "html"
    }

    fn render(
        &self,
        segments: &[Segment],
        header: &ReportHeader,
        path: &Path,
    ) -> Result<(), MatchError> {
        let html = self.to_html(segments, header);
        fs::write(path, html).map_err(|source| MatchError::Render {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            path = %path.display(),
            segments = segments.len(),
            "report_written"
        );
        Ok(())
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
