//! Benchmark configuration (TOML)
//!
//! ```toml
//! dataset = "data/pd_items.ndjson"
//! limit = 1000
//! formats = ["json", "json-pretty", "yaml", "msgpack", "cbor", "bincode"]
//! parallel = false
//! timeout_ms = 30000
//!
//! [compression]
//! method = "gzip"   # gzip | zstd | lzma | none
//! level = 6
//! ```
//!
//! Every field is optional. The default compression method is gzip, or
//! none when the `gzip` feature is disabled.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codec::{CodecEntry, Compressor};
use crate::compression::CompressionMethod;
use crate::dataset::DEFAULT_LIMIT;
use crate::error::{ConfigError, ConfigResult};
use crate::formats::Format;
use crate::harness::Harness;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchConfig {
    /// ndjson dataset path
    pub dataset: PathBuf,
    /// Records to load; 0 loads all of them
    pub limit: usize,
    /// Format keys, in registration order
    pub formats: Vec<String>,
    pub parallel: bool,
    pub timeout_ms: Option<u64>,
    pub compression: CompressionConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompressionConfig {
    pub method: CompressionMethod,
    /// Method-specific level; the method's default when absent
    pub level: Option<i32>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from("data/pd_items.ndjson"),
            limit: DEFAULT_LIMIT,
            formats: Format::ALL.iter().map(|f| f.key().to_string()).collect(),
            parallel: false,
            timeout_ms: None,
            compression: CompressionConfig::default(),
        }
    }
}

impl BenchConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        debug!(path = %path.display(), ?config, "configuration loaded");
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// `None` when every record should be loaded
    pub fn record_limit(&self) -> Option<usize> {
        (self.limit > 0).then_some(self.limit)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Parse the configured format keys, rejecting unknown keys and
    /// keys that resolve to the same format
    pub fn parse_formats(&self) -> ConfigResult<Vec<Format>> {
        let mut seen = HashSet::with_capacity(self.formats.len());
        self.formats
            .iter()
            .map(|key| {
                let format: Format = key.parse()?;
                if !seen.insert(format) {
                    return Err(ConfigError::DuplicateName(format.label().to_string()));
                }
                Ok(format)
            })
            .collect()
    }

    /// Build one entry per configured format, all sharing the configured compressor
    pub fn entries(&self) -> ConfigResult<Vec<CodecEntry>> {
        let formats = self.parse_formats()?;
        let compressor: Arc<dyn Compressor> =
            Arc::from(self.compression.method.build(self.compression.level)?);

        Ok(formats
            .into_iter()
            .map(|format| {
                CodecEntry::from_shared(format.label(), format.encoder(), Arc::clone(&compressor))
            })
            .collect())
    }

    pub fn harness(&self) -> Harness {
        let harness = Harness::new().parallel(self.parallel);
        match self.timeout() {
            Some(timeout) => harness.with_timeout(timeout),
            None => harness,
        }
    }
}
