//! Benchmark report
//!
//! The harness produces a [`Report`]; its `Display` impl is the text
//! table printed by the binary:
//!
//! ```text
//! MessagePack: 412B; after gzip: 301B
//! JSON: 530B; after gzip: 315B
//! Broken: FAILED (encode failed): boom
//! ```

use std::fmt;

use crate::error::FailureKind;

/// Measured sizes for one codec
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub name: String,
    pub encoded_size: usize,
    pub compressed_size: usize,
    /// Compressor label, e.g. "gzip"
    pub compression: String,
}

impl ReportRow {
    /// compressed / encoded, 1.0 for empty output
    pub fn ratio(&self) -> f64 {
        if self.encoded_size == 0 {
            1.0
        } else {
            self.compressed_size as f64 / self.encoded_size as f64
        }
    }
}

impl fmt::Display for ReportRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}B; after {}: {}B",
            self.name, self.encoded_size, self.compression, self.compressed_size
        )
    }
}

/// A codec that failed during the run. Never dropped from the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecFailure {
    pub name: String,
    pub kind: FailureKind,
    pub cause: String,
}

impl fmt::Display for CodecFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: FAILED ({}): {}", self.name, self.kind, self.cause)
    }
}

/// Result of evaluating a single entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Row(ReportRow),
    Failure(CodecFailure),
}

/// Rows sorted by encoded size (stable), failures in registration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub rows: Vec<ReportRow>,
    pub failures: Vec<CodecFailure>,
}

impl Report {
    /// Split outcomes (in registration order) and sort the rows.
    ///
    /// `sort_by_key` is stable, so equal sizes keep registration order.
    pub fn from_outcomes(outcomes: impl IntoIterator<Item = Outcome>) -> Self {
        let mut report = Report::default();
        for outcome in outcomes {
            match outcome {
                Outcome::Row(row) => report.rows.push(row),
                Outcome::Failure(failure) => report.failures.push(failure),
            }
        }
        report.rows.sort_by_key(|row| row.encoded_size);
        report
    }

    /// Number of codecs evaluated, successful or not
    pub fn len(&self) -> usize {
        self.rows.len() + self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn row(&self, name: &str) -> Option<&ReportRow> {
        self.rows.iter().find(|row| row.name == name)
    }

    pub fn failure(&self, name: &str) -> Option<&CodecFailure> {
        self.failures.iter().find(|failure| failure.name == name)
    }

    /// Smallest encoding, if any codec succeeded
    pub fn smallest(&self) -> Option<&ReportRow> {
        self.rows.first()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "{}", row)?;
        }
        for failure in &self.failures {
            writeln!(f, "{}", failure)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, encoded: usize, compressed: usize) -> Outcome {
        Outcome::Row(ReportRow {
            name: name.to_string(),
            encoded_size: encoded,
            compressed_size: compressed,
            compression: "gzip".to_string(),
        })
    }

    #[test]
    fn test_row_format() {
        let Outcome::Row(r) = row("JSON", 530, 315) else {
            unreachable!()
        };
        assert_eq!(r.to_string(), "JSON: 530B; after gzip: 315B");
    }

    #[test]
    fn test_sort_is_stable() {
        let report = Report::from_outcomes(vec![
            row("C", 30, 1),
            row("A", 10, 1),
            row("B1", 20, 1),
            row("B2", 20, 1),
            row("B3", 20, 1),
        ]);
        let names: Vec<_> = report.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["A", "B1", "B2", "B3", "C"]);
    }

    #[test]
    fn test_failures_kept_and_printed() {
        let report = Report::from_outcomes(vec![
            row("JSON", 24, 24),
            Outcome::Failure(CodecFailure {
                name: "Broken".to_string(),
                kind: FailureKind::EncodeFailed,
                cause: "boom".to_string(),
            }),
        ]);
        assert_eq!(report.len(), 2);
        assert_eq!(
            report.to_string(),
            "JSON: 24B; after gzip: 24B\nBroken: FAILED (encode failed): boom\n"
        );
        assert_eq!(report.failure("Broken").map(|f| f.kind), Some(FailureKind::EncodeFailed));
    }

    #[test]
    fn test_ratio() {
        let Outcome::Row(r) = row("X", 200, 50) else {
            unreachable!()
        };
        assert!((r.ratio() - 0.25).abs() < f64::EPSILON);

        let Outcome::Row(empty) = row("Empty", 0, 20) else {
            unreachable!()
        };
        assert_eq!(empty.ratio(), 1.0);
    }

    #[test]
    fn test_empty_report() {
        let report = Report::from_outcomes(Vec::new());
        assert!(report.is_empty());
        assert!(report.smallest().is_none());
        assert_eq!(report.to_string(), "");
    }
}
