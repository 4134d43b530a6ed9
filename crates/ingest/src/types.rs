/// An image embedded in a document, as raw encoded bytes (PNG, JPEG, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    /// 0-based page the image appears on. Images that do not belong to a page
    /// use an index past the last page and are placed after all page text.
    pub page: usize,
    pub bytes: Vec<u8>,
}

/// Raw output of an [`Extractor`](crate::Extractor).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedDocument {
    /// Page text in page order.
    pub pages: Vec<String>,
    /// Embedded images awaiting recognition.
    pub images: Vec<EmbeddedImage>,
}

impl ExtractedDocument {
    /// A single-page document with no images.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            pages: vec![text.into()],
            images: Vec::new(),
        }
    }

    /// A document consisting of one image and no text layer.
    pub fn from_image(bytes: Vec<u8>) -> Self {
        Self {
            pages: Vec::new(),
            images: vec![EmbeddedImage { page: 0, bytes }],
        }
    }
}

/// Joins page text and recognized image text with newlines.
///
/// Each page contributes its text followed by the text recognized from its
/// own images. `recognized[i]` belongs to `doc.images[i]`; blank recognition
/// results are skipped.
pub fn assemble_text(doc: &ExtractedDocument, recognized: &[String]) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(doc.pages.len() + recognized.len());

    let image_texts = |page: usize| {
        doc.images
            .iter()
            .zip(recognized.iter())
            .filter(move |(image, text)| image.page == page && !text.trim().is_empty())
            .map(|(_, text)| text.as_str())
    };

    for (page, text) in doc.pages.iter().enumerate() {
        parts.push(text.as_str());
        parts.extend(image_texts(page));
    }

    // Images that reference no extracted page.
    parts.extend(
        doc.images
            .iter()
            .zip(recognized.iter())
            .filter(|(image, text)| image.page >= doc.pages.len() && !text.trim().is_empty())
            .map(|(_, text)| text.as_str()),
    );

    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleaves_images_after_their_page() {
        let doc = ExtractedDocument {
            pages: vec!["page one".into(), "page two".into()],
            images: vec![
                EmbeddedImage { page: 1, bytes: vec![1] },
                EmbeddedImage { page: 0, bytes: vec![2] },
            ],
        };
        let recognized = vec!["image on two".to_string(), "image on one".to_string()];
        assert_eq!(
            assemble_text(&doc, &recognized),
            "page one\nimage on one\npage two\nimage on two"
        );
    }

    #[test]
    fn blank_recognition_is_skipped() {
        let doc = ExtractedDocument {
            pages: vec!["text".into()],
            images: vec![EmbeddedImage { page: 0, bytes: vec![] }],
        };
        assert_eq!(assemble_text(&doc, &["  \n".to_string()]), "text");
        assert_eq!(assemble_text(&doc, &[String::new()]), "text");
    }

    #[test]
    fn image_only_document() {
        let doc = ExtractedDocument::from_image(vec![0xFF]);
        assert_eq!(assemble_text(&doc, &["scanned words".to_string()]), "scanned words");
    }

    #[test]
    fn empty_pages_still_separate() {
        let doc = ExtractedDocument {
            pages: vec!["a".into(), String::new(), "b".into()],
            images: Vec::new(),
        };
        assert_eq!(assemble_text(&doc, &[]), "a\n\nb");
    }
}
