//! Configuration for document text extraction.
//!
//! ```
//! use std::time::Duration;
//! use ingest::ExtractConfig;
//!
//! let cfg = ExtractConfig::default()
//!     .with_recognition_timeout(Some(Duration::from_secs(10)))
//!     .with_max_document_bytes(Some(64 * 1024 * 1024));
//! assert!(cfg.recognize_images);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default upper bound for one image recognition call.
pub const DEFAULT_RECOGNITION_TIMEOUT: Duration = Duration::from_secs(30);

/// Runtime knobs for [`extract_text`](crate::extract_text).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Run the recognizer over embedded images. When false, images are ignored.
    pub recognize_images: bool,

    /// Bound on a single recognition call. `None` waits indefinitely.
    #[serde(with = "duration_secs")]
    pub recognition_timeout: Option<Duration>,

    /// Recognize images concurrently on the rayon pool.
    pub parallel: bool,

    /// Reject documents larger than this many bytes. `None` disables the check.
    pub max_document_bytes: Option<u64>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            recognize_images: true,
            recognition_timeout: Some(DEFAULT_RECOGNITION_TIMEOUT),
            parallel: true,
            max_document_bytes: None,
        }
    }
}

impl ExtractConfig {
    pub fn with_recognize_images(mut self, enabled: bool) -> Self {
        self.recognize_images = enabled;
        self
    }

    pub fn with_recognition_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.recognition_timeout = timeout;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_max_document_bytes(mut self, limit: Option<u64>) -> Self {
        self.max_document_bytes = limit;
        self
    }
}

/// `Option<Duration>` as whole seconds in config files.
mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&d.as_secs()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_secs))
    }
}
