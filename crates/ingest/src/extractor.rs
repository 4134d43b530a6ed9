use std::collections::HashSet;
use std::fs;
use std::path::Path;

use lopdf::{Dictionary, Document, Object, Stream};
use tracing::{debug, warn};

use crate::config::ExtractConfig;
use crate::error::ExtractError;
use crate::types::{EmbeddedImage, ExtractedDocument};

/// Pulls page text and embedded images out of a document on disk.
pub trait Extractor: Send + Sync {
    fn extract(&self, path: &Path, cfg: &ExtractConfig) -> Result<ExtractedDocument, ExtractError>;
}

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "bmp", "gif", "webp"];

/// Dispatches on file extension.
///
/// - `.pdf` goes through `pdf-extract`, one page per form feed in its output.
///   Image XObjects reachable from each page's resources are collected with
///   `lopdf` when image recognition is enabled.
/// - Raster image extensions become a single image with no text.
/// - Anything else is read as UTF-8 text, lossily.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileExtractor;

impl FileExtractor {
    pub fn new() -> Self {
        Self
    }

    fn is_image(path: &Path) -> bool {
        extension(path).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

impl Extractor for FileExtractor {
    fn extract(&self, path: &Path, cfg: &ExtractConfig) -> Result<ExtractedDocument, ExtractError> {
        if let Some(limit) = cfg.max_document_bytes {
            let size = fs::metadata(path)
                .map_err(|e| ExtractError::io(path, e))?
                .len();
            if size > limit {
                return Err(ExtractError::TooLarge {
                    path: path.to_path_buf(),
                    size,
                    limit,
                });
            }
        }

        let bytes = fs::read(path).map_err(|e| ExtractError::io(path, e))?;

        if extension(path).as_deref() == Some("pdf") {
            let text =
                pdf_extract::extract_text_from_mem(&bytes).map_err(|e| ExtractError::Pdf {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
            let images = if cfg.recognize_images {
                pdf_images(&bytes).unwrap_or_else(|e| {
                    warn!(path = %path.display(), error = %e, "pdf_images_unreadable");
                    Vec::new()
                })
            } else {
                Vec::new()
            };
            return Ok(ExtractedDocument {
                pages: split_pages(&text),
                images,
            });
        }

        if Self::is_image(path) {
            return Ok(ExtractedDocument::from_image(bytes));
        }

        Ok(ExtractedDocument::from_text(
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    }
}

/// pdf-extract separates pages with form feeds.
fn split_pages(text: &str) -> Vec<String> {
    let mut pages: Vec<String> = text.split('\x0C').map(str::to_owned).collect();
    if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
        pages.pop();
    }
    pages
}

/// Image XObjects of every page, tagged with the 0-based page index.
///
/// An image shared by several resource dictionaries of one page is emitted
/// once for that page.
fn pdf_images(bytes: &[u8]) -> Result<Vec<EmbeddedImage>, lopdf::Error> {
    let doc = Document::load_mem(bytes)?;
    let mut images = Vec::new();

    for (page, (_, page_id)) in doc.get_pages().into_iter().enumerate() {
        let (inline, inherited) = doc.get_page_resources(page_id)?;
        let resources = inline
            .into_iter()
            .chain(inherited.into_iter().filter_map(|id| doc.get_dictionary(id).ok()));

        let mut seen = HashSet::new();
        for resource in resources {
            let Ok(xobjects) = doc.get_dict_in_dict(resource, b"XObject") else {
                continue;
            };
            for (name, value) in xobjects.iter() {
                let Ok((id, object)) = doc.dereference(value) else {
                    continue;
                };
                if id.is_some_and(|id| !seen.insert(id)) {
                    continue;
                }
                let Ok(stream) = object.as_stream() else {
                    continue;
                };
                if stream.dict.get(b"Subtype").and_then(Object::as_name).ok() != Some(&b"Image"[..]) {
                    continue;
                }
                match encode_image(stream) {
                    Some(bytes) => images.push(EmbeddedImage { page, bytes }),
                    None => debug!(
                        page,
                        name = %String::from_utf8_lossy(name),
                        "pdf_image_unsupported"
                    ),
                }
            }
        }
    }
    Ok(images)
}

/// Bytes a recognizer can read: JPEG and JPEG 2000 streams as stored, raw
/// 8-bit gray or RGB samples as a binary PNM.
fn encode_image(stream: &Stream) -> Option<Vec<u8>> {
    let filters = stream.filters().unwrap_or_default();
    if let [only] = filters.as_slice() {
        if only == "DCTDecode" || only == "JPXDecode" {
            return Some(stream.content.clone());
        }
    }

    let samples = if filters.is_empty() {
        stream.content.clone()
    } else {
        // lopdf refuses to decode image streams, so decode a copy without the subtype.
        let mut plain = stream.clone();
        plain.dict.remove(b"Subtype");
        plain.decompressed_content().ok()?
    };
    pnm(&stream.dict, samples)
}

fn pnm(dict: &Dictionary, mut samples: Vec<u8>) -> Option<Vec<u8>> {
    let width = usize::try_from(dict.get(b"Width").and_then(Object::as_i64).ok()?).ok()?;
    let height = usize::try_from(dict.get(b"Height").and_then(Object::as_i64).ok()?).ok()?;
    if dict.get(b"BitsPerComponent").and_then(Object::as_i64).ok()? != 8 {
        return None;
    }
    let (magic, channels) = match dict.get(b"ColorSpace").and_then(Object::as_name).ok()? {
        b"DeviceGray" => ("P5", 1),
        b"DeviceRGB" => ("P6", 3),
        _ => return None,
    };

    let len = width.checked_mul(height)?.checked_mul(channels)?;
    if len == 0 || samples.len() < len {
        return None;
    }
    samples.truncate(len);

    let mut out = format!("{magic}\n{width} {height}\n255\n").into_bytes();
    out.extend_from_slice(&samples);
    Some(out)
}

/// One-page PDF with `text` drawn in Courier and `images` registered as page
/// XObjects.
#[cfg(test)]
pub(crate) fn pdf_with_images(text: &str, images: Vec<Stream>) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::dictionary;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let mut xobjects = Dictionary::new();
    for (i, image) in images.into_iter().enumerate() {
        let id = doc.add_object(image);
        xobjects.set(format!("Im{i}"), id);
    }
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
        "XObject" => xobjects,
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}
