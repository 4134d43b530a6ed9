//! The cached per-document representation and its on-disk schema.

use std::path::PathBuf;

use perceptual::{ShingleDigest, ShingleSet};
use serde::{Deserialize, Serialize};
use zstd::{decode_all, encode_all};

use crate::error::StoreError;
use crate::fingerprint::DocumentId;

/// Bump this value whenever the on-disk `StoredRepresentation` layout changes.
pub const STORE_SCHEMA_VERSION: u16 = 1;

/// Default length of [`DocRepresentation::text_excerpt`] in characters.
pub const DEFAULT_EXCERPT_CHARS: usize = 400;

const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// Everything the repository knows about one processed document.
///
/// Immutable once built and shared as `Arc<DocRepresentation>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocRepresentation {
    pub id: DocumentId,
    pub source_path: PathBuf,
    /// The `k` the shingles were built with.
    pub shingle_size: usize,
    pub shingles: ShingleSet,
    pub token_count: usize,
    /// Leading characters of the raw text, with `...` appended when cut.
    pub text_excerpt: String,
    /// Raw extracted text before normalization.
    pub full_text: String,
    pub normalized_text: String,
    /// Canonical tokens in order.
    pub tokens: Vec<String>,
}

/// `text` cut to `max_chars` characters, plus `...` if anything was dropped.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Versioned on-disk form of a [`DocRepresentation`].
///
/// Shingles are stored sorted so the same document always encodes to the
/// same bytes.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct StoredRepresentation {
    pub schema_version: u16,
    pub id: DocumentId,
    pub source_path: PathBuf,
    pub shingle_size: usize,
    pub shingles: Vec<ShingleDigest>,
    pub token_count: usize,
    pub text_excerpt: String,
    pub full_text: String,
    pub normalized_text: String,
    pub tokens: Vec<String>,
}

impl From<&DocRepresentation> for StoredRepresentation {
    fn from(rep: &DocRepresentation) -> Self {
        let mut shingles: Vec<ShingleDigest> = rep.shingles.iter().copied().collect();
        shingles.sort_unstable();
        Self {
            schema_version: STORE_SCHEMA_VERSION,
            id: rep.id.clone(),
            source_path: rep.source_path.clone(),
            shingle_size: rep.shingle_size,
            shingles,
            token_count: rep.token_count,
            text_excerpt: rep.text_excerpt.clone(),
            full_text: rep.full_text.clone(),
            normalized_text: rep.normalized_text.clone(),
            tokens: rep.tokens.clone(),
        }
    }
}

impl TryFrom<StoredRepresentation> for DocRepresentation {
    type Error = StoreError;

    fn try_from(stored: StoredRepresentation) -> Result<Self, Self::Error> {
        if stored.schema_version != STORE_SCHEMA_VERSION {
            return Err(StoreError::Schema {
                found: stored.schema_version,
                expected: STORE_SCHEMA_VERSION,
            });
        }
        Ok(Self {
            id: stored.id,
            source_path: stored.source_path,
            shingle_size: stored.shingle_size,
            shingles: stored.shingles.into_iter().collect(),
            token_count: stored.token_count,
            text_excerpt: stored.text_excerpt,
            full_text: stored.full_text,
            normalized_text: stored.normalized_text,
            tokens: stored.tokens,
        })
    }
}

/// Compression codec options for stored records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionCodec {
    /// Plain JSON, handy when inspecting the store by hand.
    None,
    #[default]
    Zstd,
}

/// Compression behavior configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompressionConfig {
    pub codec: CompressionCodec,
    /// Zstd level, 1-22.
    pub level: i32,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            codec: CompressionCodec::default(),
            level: 3,
        }
    }
}

impl CompressionConfig {
    pub fn new(codec: CompressionCodec, level: i32) -> Self {
        Self { codec, level }
    }

    pub fn with_codec(mut self, codec: CompressionCodec) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }

    fn compress(&self, data: Vec<u8>) -> Result<Vec<u8>, StoreError> {
        match self.codec {
            CompressionCodec::None => Ok(data),
            CompressionCodec::Zstd => Ok(encode_all(data.as_slice(), self.level)?),
        }
    }

    /// Frames are recognized by their magic number, so a store written with
    /// one codec stays readable after switching to the other.
    fn decompress<'a>(&self, data: &'a [u8]) -> Result<std::borrow::Cow<'a, [u8]>, StoreError> {
        if data.starts_with(&ZSTD_MAGIC) {
            Ok(std::borrow::Cow::Owned(decode_all(data)?))
        } else {
            Ok(std::borrow::Cow::Borrowed(data))
        }
    }

    /// Serialize and compress a representation for the backend.
    pub fn encode_record(&self, rep: &DocRepresentation) -> Result<Vec<u8>, StoreError> {
        let json = serde_json::to_vec(&StoredRepresentation::from(rep))
            .map_err(|e| StoreError::Encode(e.to_string()))?;
        self.compress(json)
    }

    /// Decompress and decode a backend value, rejecting unknown schema versions.
    pub fn decode_record(&self, data: &[u8]) -> Result<DocRepresentation, StoreError> {
        let json = self.decompress(data)?;
        let stored: StoredRepresentation =
            serde_json::from_slice(&json).map_err(|e| StoreError::Decode(e.to_string()))?;
        DocRepresentation::try_from(stored)
    }
}
