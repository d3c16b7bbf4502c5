//! # codec-sizes
//!
//! Encode one JSON document with several serialization formats, compress
//! each result, and compare the byte counts.
//!
//! ```rust
//! use codec_sizes::{formats::Format, run, CodecEntry, Identity};
//! use serde_json::json;
//!
//! let doc = json!([{"id": 1, "title": "Brooklyn Bridge"}, {"id": 2, "title": null}]);
//! let entries: Vec<_> = Format::ALL
//!     .iter()
//!     .map(|f| CodecEntry::from_shared(f.label(), f.encoder(), std::sync::Arc::new(Identity)))
//!     .collect();
//!
//! let report = run(&doc, &entries).unwrap();
//! assert_eq!(report.rows.len(), Format::ALL.len());
//! print!("{}", report);
//! ```

pub mod codec;
pub mod compression;
pub mod config;
pub mod dataset;
pub mod error;
pub mod formats;
pub mod harness;
pub mod report;

pub use codec::{encode_fn, CodecEntry, Compressor, Document, Encoded, Encoder};
pub use compression::{CompressionMethod, Identity};
#[cfg(feature = "gzip")]
pub use compression::Gzip;
#[cfg(feature = "zstd")]
pub use compression::Zstd;
#[cfg(feature = "lzma")]
pub use compression::Lzma;
pub use config::BenchConfig;
pub use dataset::{load_ndjson, parse_ndjson};
pub use error::{BoxError, ConfigError, FailureKind, LoadError};
pub use harness::{run, validate_entries, Harness};
pub use report::{CodecFailure, Outcome, Report, ReportRow};
