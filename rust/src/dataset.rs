//! Dataset loading: newline-delimited JSON records into one [`Document`]
//!
//! The first `limit` non-blank lines are parsed and collected into a JSON
//! array, which is the document every codec encodes.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::codec::Document;
use crate::error::LoadError;

/// Records used when the config does not say otherwise
pub const DEFAULT_LIMIT: usize = 1000;

/// Read an ndjson file and keep the first `limit` records (`None` = all)
pub fn load_ndjson<P: AsRef<Path>>(path: P, limit: Option<usize>) -> Result<Document, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let document = parse_ndjson(&text, limit)?;
    debug!(
        path = %path.display(),
        bytes = text.len(),
        records = document.as_array().map_or(0, Vec::len),
        "dataset loaded"
    );
    Ok(document)
}

/// Parse ndjson text. Blank lines are skipped, `\r\n` endings accepted.
/// Lines past `limit` are not parsed.
pub fn parse_ndjson(text: &str, limit: Option<usize>) -> Result<Document, LoadError> {
    let limit = limit.unwrap_or(usize::MAX);
    let mut records = Vec::new();

    for (index, line) in text.split('\n').enumerate() {
        if records.len() >= limit {
            break;
        }
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim().is_empty() {
            continue;
        }
        let record: Value = serde_json::from_str(line).map_err(|source| LoadError::Parse {
            line: index + 1,
            source,
        })?;
        records.push(record);
    }

    Ok(Value::Array(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_parse_records_in_order() {
        let doc = parse_ndjson("{\"id\":1}\n{\"id\":2}\n{\"id\":3}\n", None).unwrap();
        assert_eq!(doc, json!([{"id": 1}, {"id": 2}, {"id": 3}]));
    }

    #[test]
    fn test_limit() {
        let doc = parse_ndjson("1\n2\n3\n4\n", Some(2)).unwrap();
        assert_eq!(doc, json!([1, 2]));
    }

    #[test]
    fn test_lines_past_limit_not_parsed() {
        let doc = parse_ndjson("1\nnot json\n", Some(1)).unwrap();
        assert_eq!(doc, json!([1]));
    }

    #[test]
    fn test_blank_lines_and_crlf() {
        let doc = parse_ndjson("\r\n{\"a\":true}\r\n\n  \n[null]", None).unwrap();
        assert_eq!(doc, json!([{"a": true}, [null]]));
    }

    #[test]
    fn test_bad_line_number() {
        let err = parse_ndjson("{}\n\n{\"broken\":\n", None).unwrap_err();
        assert!(matches!(err, LoadError::Parse { line: 3, .. }));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_ndjson("", None).unwrap(), json!([]));
    }

    #[test]
    fn test_object_key_order_preserved() {
        let doc = parse_ndjson(r#"{"z":1,"a":2,"m":3}"#, None).unwrap();
        assert_eq!(serde_json::to_string(&doc).unwrap(), r#"[{"z":1,"a":2,"m":3}]"#);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"title":"Broadway"}}"#).unwrap();
        writeln!(file, r#"{{"title":"Bowery"}}"#).unwrap();

        let doc = load_ndjson(file.path(), Some(DEFAULT_LIMIT)).unwrap();
        assert_eq!(doc, json!([{"title": "Broadway"}, {"title": "Bowery"}]));
    }

    #[test]
    fn test_missing_file() {
        let err = load_ndjson("/nonexistent/pd_items.ndjson", None).unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
    }
}
