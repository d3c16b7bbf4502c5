//! Built-in serialization formats
//!
//! Each format is a unit struct wrapping a third-party serde codec. The
//! harness only sees them as [`Encoder`]s; none of the wire formats are
//! implemented here.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::codec::{Document, Encoded, Encoder};
use crate::error::{BoxError, ConfigError};

/// Compact JSON (serde_json), no whitespace
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

impl Encoder for Json {
    fn encode(&self, doc: &Document) -> Result<Encoded, BoxError> {
        Ok(Encoded::Text(serde_json::to_string(doc)?))
    }
}

/// Pretty-printed JSON (serde_json, two-space indent)
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPretty;

impl Encoder for JsonPretty {
    fn encode(&self, doc: &Document) -> Result<Encoded, BoxError> {
        Ok(Encoded::Text(serde_json::to_string_pretty(doc)?))
    }
}

/// YAML (serde_yaml, block style)
#[derive(Debug, Clone, Copy, Default)]
pub struct Yaml;

impl Encoder for Yaml {
    fn encode(&self, doc: &Document) -> Result<Encoded, BoxError> {
        Ok(Encoded::Text(serde_yaml::to_string(doc)?))
    }
}

/// MessagePack (rmp-serde). Maps keep their string keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessagePack;

impl Encoder for MessagePack {
    fn encode(&self, doc: &Document) -> Result<Encoded, BoxError> {
        Ok(Encoded::Binary(rmp_serde::to_vec_named(doc)?))
    }
}

/// CBOR (ciborium)
#[derive(Debug, Clone, Copy, Default)]
pub struct Cbor;

impl Encoder for Cbor {
    fn encode(&self, doc: &Document) -> Result<Encoded, BoxError> {
        let mut buf = Vec::new();
        ciborium::into_writer(doc, &mut buf)
            .map_err(|e| -> BoxError { format!("CBOR encoding failed: {:?}", e).into() })?;
        Ok(Encoded::Binary(buf))
    }
}

/// BSON (bson crate). Only objects can be encoded at the top level;
/// arrays and scalars are rejected by the codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bson;

impl Encoder for Bson {
    fn encode(&self, doc: &Document) -> Result<Encoded, BoxError> {
        Ok(Encoded::Binary(bson::to_vec(doc)?))
    }
}

/// bencode (serde_bencode): length-prefixed strings, `i..e` integers,
/// `l..e` lists, `d..e` dictionaries
#[derive(Debug, Clone, Copy, Default)]
pub struct Bencode;

impl Encoder for Bencode {
    fn encode(&self, doc: &Document) -> Result<Encoded, BoxError> {
        Ok(Encoded::Binary(serde_bencode::to_bytes(doc)?))
    }
}

/// bincode 1.x: fixed-width integers, u64 length prefixes on strings,
/// sequences and maps
#[derive(Debug, Clone, Copy, Default)]
pub struct Bincode;

impl Encoder for Bincode {
    fn encode(&self, doc: &Document) -> Result<Encoded, BoxError> {
        Ok(Encoded::Binary(bincode::serialize(doc)?))
    }
}

/// Names of the built-in formats, as used in config files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    JsonPretty,
    Yaml,
    MessagePack,
    Cbor,
    Bson,
    Bencode,
    Bincode,
}

impl Format {
    /// Every built-in format, in default registration order
    pub const ALL: [Format; 8] = [
        Format::Json,
        Format::JsonPretty,
        Format::Yaml,
        Format::MessagePack,
        Format::Cbor,
        Format::Bson,
        Format::Bencode,
        Format::Bincode,
    ];

    /// Display label used in the report
    pub fn label(&self) -> &'static str {
        match self {
            Format::Json => "JSON",
            Format::JsonPretty => "JSON (pretty)",
            Format::Yaml => "YAML",
            Format::MessagePack => "MessagePack",
            Format::Cbor => "CBOR",
            Format::Bson => "BSON",
            Format::Bencode => "bencode",
            Format::Bincode => "Bincode",
        }
    }

    /// Key used in config files
    pub fn key(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::JsonPretty => "json-pretty",
            Format::Yaml => "yaml",
            Format::MessagePack => "msgpack",
            Format::Cbor => "cbor",
            Format::Bson => "bson",
            Format::Bencode => "bencode",
            Format::Bincode => "bincode",
        }
    }

    pub fn encoder(&self) -> Arc<dyn Encoder> {
        match self {
            Format::Json => Arc::new(Json),
            Format::JsonPretty => Arc::new(JsonPretty),
            Format::Yaml => Arc::new(Yaml),
            Format::MessagePack => Arc::new(MessagePack),
            Format::Cbor => Arc::new(Cbor),
            Format::Bson => Arc::new(Bson),
            Format::Bencode => Arc::new(Bencode),
            Format::Bincode => Arc::new(Bincode),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Format {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "json-pretty" | "json_pretty" => Ok(Format::JsonPretty),
            "yaml" | "yml" => Ok(Format::Yaml),
            "msgpack" | "messagepack" => Ok(Format::MessagePack),
            "cbor" => Ok(Format::Cbor),
            "bson" => Ok(Format::Bson),
            "bencode" => Ok(Format::Bencode),
            "bincode" => Ok(Format::Bincode),
            _ => Err(ConfigError::UnknownFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Document {
        json!([
            {"uuid": "510d47e2-c6e1-a3d9-e040-e00a18064a99", "title": "Map of Manhattan", "year": 1865},
            {"uuid": "510d47e2-c6e2-a3d9-e040-e00a18064a99", "title": "Ferry", "year": null, "tags": ["nyc", "boat"]}
        ])
    }

    #[test]
    fn test_json_matches_serde_json() {
        let doc = sample();
        let encoded = Json.encode(&doc).unwrap();
        assert!(encoded.is_text());
        assert_eq!(encoded.into_bytes(), serde_json::to_vec(&doc).unwrap());
    }

    #[test]
    fn test_pretty_json_is_larger() {
        let doc = sample();
        let compact = Json.encode(&doc).unwrap().byte_len();
        let pretty = JsonPretty.encode(&doc).unwrap().byte_len();
        assert!(pretty > compact);
    }

    #[test]
    fn test_msgpack_decodes_back() {
        let doc = sample();
        let bytes = MessagePack.encode(&doc).unwrap().into_bytes();
        let decoded: Document = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(decoded, doc);
    }

    #[test]
    fn test_cbor_decodes_back() {
        let doc = sample();
        let bytes = Cbor.encode(&doc).unwrap().into_bytes();
        let decoded: Document = ciborium::from_reader(&bytes[..]).unwrap();
        assert_eq!(decoded, doc);
    }

    #[test]
    fn test_bincode_length_prefixes() {
        // string: u64 length prefix + bytes
        let bytes = Bincode.encode(&json!("abc")).unwrap().into_bytes();
        assert_eq!(bytes, bincode::serialize("abc").unwrap());
        assert_eq!(bytes.len(), 8 + 3);
    }

    #[test]
    fn test_yaml_is_text() {
        let encoded = Yaml.encode(&json!({"title": "Ferry", "year": 1865})).unwrap();
        assert!(encoded.is_text());
        let Encoded::Text(text) = encoded else {
            unreachable!()
        };
        assert!(text.contains("title: Ferry"));
        assert!(text.contains("year: 1865"));
    }

    #[test]
    fn test_bson_document_length_header() {
        let bytes = Bson.encode(&json!({"title": "Ferry", "tags": ["nyc"]})).unwrap().into_bytes();
        // int32 little-endian total length, then elements, then 0x00
        let declared = i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        assert_eq!(declared as usize, bytes.len());
        assert_eq!(bytes.last(), Some(&0));
    }

    #[test]
    fn test_bson_rejects_top_level_array() {
        assert!(Bson.encode(&sample()).is_err());
        assert!(Bson.encode(&json!("scalar")).is_err());
    }

    #[test]
    fn test_bencode_dictionary() {
        // d 1:a i1e 1:b l 1:x e e
        let bytes = Bencode.encode(&json!({"a": 1, "b": ["x"]})).unwrap().into_bytes();
        assert_eq!(bytes.len(), 16);
        assert_eq!(bytes.first(), Some(&b'd'));
        assert_eq!(bytes.last(), Some(&b'e'));
    }

    #[test]
    fn test_bencode_string_is_length_prefixed() {
        let bytes = Bencode.encode(&json!("Bowery")).unwrap().into_bytes();
        assert_eq!(bytes, b"6:Bowery".to_vec());
    }

    #[test]
    fn test_binary_formats_smaller_than_json() {
        let doc = sample();
        let json = Json.encode(&doc).unwrap().byte_len();
        assert!(MessagePack.encode(&doc).unwrap().byte_len() < json);
        assert!(Cbor.encode(&doc).unwrap().byte_len() < json);
    }

    #[test]
    fn test_format_keys_parse() {
        for format in Format::ALL {
            assert_eq!(format.key().parse::<Format>().unwrap(), format);
        }
        assert_eq!("MessagePack".parse::<Format>().unwrap(), Format::MessagePack);
        assert_eq!("YML".parse::<Format>().unwrap(), Format::Yaml);
        assert!(matches!(
            "protobuf".parse::<Format>(),
            Err(ConfigError::UnknownFormat(name)) if name == "protobuf"
        ));
    }

    #[test]
    fn test_labels_unique() {
        let mut labels: Vec<_> = Format::ALL.iter().map(|f| f.label()).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), Format::ALL.len());
    }
}
