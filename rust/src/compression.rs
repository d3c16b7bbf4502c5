//! Compressors applied to encoded output
//!
//! gzip (flate2), zstd and lzma (xz2) sit behind cargo features of the
//! same name, all enabled by default. [`Identity`] is always available.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::codec::Compressor;
use crate::error::{BoxError, ConfigError};

/// No compression: output equals input
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Compressor for Identity {
    fn method(&self) -> &str {
        "none"
    }

    #[inline]
    fn compress(&self, bytes: &[u8]) -> Result<Vec<u8>, BoxError> {
        Ok(bytes.to_vec())
    }
}

#[cfg(feature = "gzip")]
/// gzip via flate2 (level 0-9, default 6 like zlib)
#[derive(Debug, Clone, Copy)]
pub struct Gzip {
    pub level: u32,
}

#[cfg(feature = "gzip")]
impl Gzip {
    pub const DEFAULT_LEVEL: u32 = 6;

    pub fn new(level: u32) -> Self {
        Self { level }
    }
}

#[cfg(feature = "gzip")]
impl Default for Gzip {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LEVEL)
    }
}

#[cfg(feature = "gzip")]
impl Compressor for Gzip {
    fn method(&self) -> &str {
        "gzip"
    }

    fn compress(&self, bytes: &[u8]) -> Result<Vec<u8>, BoxError> {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let mut encoder = GzEncoder::new(
            Vec::with_capacity(bytes.len() / 2),
            Compression::new(self.level),
        );
        encoder.write_all(bytes)?;
        Ok(encoder.finish()?)
    }
}

#[cfg(feature = "zstd")]
/// zstd (level 1-22, default 3 - balanced speed/ratio)
#[derive(Debug, Clone, Copy)]
pub struct Zstd {
    pub level: i32,
}

#[cfg(feature = "zstd")]
impl Zstd {
    pub const DEFAULT_LEVEL: i32 = 3;

    pub fn new(level: i32) -> Self {
        Self { level }
    }
}

#[cfg(feature = "zstd")]
impl Default for Zstd {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LEVEL)
    }
}

#[cfg(feature = "zstd")]
impl Compressor for Zstd {
    fn method(&self) -> &str {
        "zstd"
    }

    fn compress(&self, bytes: &[u8]) -> Result<Vec<u8>, BoxError> {
        Ok(zstd::encode_all(bytes, self.level)?)
    }
}

#[cfg(feature = "lzma")]
/// LZMA2 in an xz container via xz2 (preset 0-9, default 6)
#[derive(Debug, Clone, Copy)]
pub struct Lzma {
    pub level: u32,
}

#[cfg(feature = "lzma")]
impl Lzma {
    pub const DEFAULT_LEVEL: u32 = 6;

    pub fn new(level: u32) -> Self {
        Self { level }
    }
}

#[cfg(feature = "lzma")]
impl Default for Lzma {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LEVEL)
    }
}

#[cfg(feature = "lzma")]
impl Compressor for Lzma {
    fn method(&self) -> &str {
        "lzma"
    }

    fn compress(&self, bytes: &[u8]) -> Result<Vec<u8>, BoxError> {
        use std::io::Write;
        use xz2::write::XzEncoder;

        let mut encoder = XzEncoder::new(Vec::with_capacity(bytes.len() / 2), self.level);
        encoder.write_all(bytes)?;
        Ok(encoder.finish()?)
    }
}

/// Config-facing selector for a compressor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionMethod {
    Gzip,
    Zstd,
    Lzma,
    None,
}

impl Default for CompressionMethod {
    /// gzip when compiled in, otherwise no compression
    fn default() -> Self {
        if cfg!(feature = "gzip") {
            CompressionMethod::Gzip
        } else {
            CompressionMethod::None
        }
    }
}

impl CompressionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompressionMethod::Gzip => "gzip",
            CompressionMethod::Zstd => "zstd",
            CompressionMethod::Lzma => "lzma",
            CompressionMethod::None => "none",
        }
    }

    /// Instantiate the compressor. `level` falls back to the method's default.
    pub fn build(&self, level: Option<i32>) -> Result<Box<dyn Compressor>, ConfigError> {
        match self {
            CompressionMethod::None => Ok(Box::new(Identity)),
            #[cfg(feature = "gzip")]
            CompressionMethod::Gzip => {
                let level = level.map_or(Gzip::DEFAULT_LEVEL, |l| l.clamp(0, 9) as u32);
                Ok(Box::new(Gzip::new(level)))
            }
            #[cfg(feature = "zstd")]
            CompressionMethod::Zstd => Ok(Box::new(Zstd::new(level.unwrap_or(Zstd::DEFAULT_LEVEL)))),
            #[cfg(feature = "lzma")]
            CompressionMethod::Lzma => {
                let level = level.map_or(Lzma::DEFAULT_LEVEL, |l| l.clamp(0, 9) as u32);
                Ok(Box::new(Lzma::new(level)))
            }
            #[allow(unreachable_patterns)]
            other => {
                let _ = level;
                Err(ConfigError::UnsupportedCompression(other.as_str().to_string()))
            }
        }
    }
}

impl fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompressionMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gzip" | "gz" => Ok(CompressionMethod::Gzip),
            "zstd" => Ok(CompressionMethod::Zstd),
            "lzma" | "xz" => Ok(CompressionMethod::Lzma),
            "none" | "identity" => Ok(CompressionMethod::None),
            other => Err(ConfigError::UnsupportedCompression(other.to_string())),
        }
    }
}
