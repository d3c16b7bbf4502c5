//! Codec model: what the harness needs from a serialization format
//! and from a compressor.
//!
//! ```rust
//! use codec_sizes::{encode_fn, CodecEntry, Encoded, Identity};
//!
//! let entry = CodecEntry::new(
//!     "Debug",
//!     encode_fn(|doc| Ok(Encoded::Text(format!("{:?}", doc)))),
//!     Identity,
//! );
//! assert_eq!(entry.name(), "Debug");
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::BoxError;

/// JSON-compatible document under test
pub type Document = serde_json::Value;

/// Output of an encoder. Text formats and binary formats are kept apart
/// until measurement, where text is converted to UTF-8 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoded {
    Text(String),
    Binary(Vec<u8>),
}

impl Encoded {
    /// Convert to bytes. Text is encoded as UTF-8.
    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Encoded::Text(text) => text.into_bytes(),
            Encoded::Binary(bytes) => bytes,
        }
    }

    /// Size in bytes after UTF-8 conversion
    #[inline]
    pub fn byte_len(&self) -> usize {
        match self {
            Encoded::Text(text) => text.len(),
            Encoded::Binary(bytes) => bytes.len(),
        }
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self, Encoded::Text(_))
    }
}

impl From<String> for Encoded {
    fn from(text: String) -> Self {
        Encoded::Text(text)
    }
}

impl From<Vec<u8>> for Encoded {
    fn from(bytes: Vec<u8>) -> Self {
        Encoded::Binary(bytes)
    }
}

/// Serialization format under test
pub trait Encoder: Send + Sync {
    fn encode(&self, doc: &Document) -> Result<Encoded, BoxError>;
}

impl<F> Encoder for F
where
    F: Fn(&Document) -> Result<Encoded, BoxError> + Send + Sync,
{
    #[inline]
    fn encode(&self, doc: &Document) -> Result<Encoded, BoxError> {
        self(doc)
    }
}

/// Pin a closure's signature so it can be used as an [`Encoder`]
#[inline]
pub fn encode_fn<F>(f: F) -> F
where
    F: Fn(&Document) -> Result<Encoded, BoxError> + Send + Sync,
{
    f
}

/// General-purpose byte compressor applied after encoding
pub trait Compressor: Send + Sync {
    /// Short label shown in the report, e.g. "gzip"
    fn method(&self) -> &str;

    fn compress(&self, bytes: &[u8]) -> Result<Vec<u8>, BoxError>;
}

/// A named (encoder, compressor) pair registered with the harness
#[derive(Clone)]
pub struct CodecEntry {
    name: String,
    encoder: Arc<dyn Encoder>,
    compressor: Arc<dyn Compressor>,
}

impl CodecEntry {
    pub fn new<E, C>(name: impl Into<String>, encoder: E, compressor: C) -> Self
    where
        E: Encoder + 'static,
        C: Compressor + 'static,
    {
        Self {
            name: name.into(),
            encoder: Arc::new(encoder),
            compressor: Arc::new(compressor),
        }
    }

    /// Build from already shared capabilities (one compressor reused by many entries)
    pub fn from_shared(
        name: impl Into<String>,
        encoder: Arc<dyn Encoder>,
        compressor: Arc<dyn Compressor>,
    ) -> Self {
        Self {
            name: name.into(),
            encoder,
            compressor,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn encoder(&self) -> &dyn Encoder {
        self.encoder.as_ref()
    }

    #[inline]
    pub fn compressor(&self) -> &dyn Compressor {
        self.compressor.as_ref()
    }
}

impl fmt::Debug for CodecEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecEntry")
            .field("name", &self.name)
            .field("compression", &self.compressor.method())
            .finish()
    }
}
