//! Benchmark harness
//!
//! For every registered [`CodecEntry`]: encode the document, convert text to
//! UTF-8, measure, compress, measure. Failures (errors, panics, timeouts)
//! are isolated per entry and land in [`Report::failures`]; only a bad
//! registration (duplicate names) aborts the run, before any codec runs.
//!
//! Panics are caught with `catch_unwind`, which does not silence the
//! process panic hook: the default hook still prints the panic message to
//! stderr. Install a hook with [`std::panic::set_hook`] to route or drop
//! those messages (the `codec-sizes` binary logs them through tracing).
//!
//! ```rust
//! use codec_sizes::{encode_fn, run, CodecEntry, Encoded, Identity};
//! use serde_json::json;
//!
//! let doc = json!({"a": 1, "b": [true, null]});
//! let entries = vec![
//!     CodecEntry::new("Double", encode_fn(|d| Ok(Encoded::Text(d.to_string().repeat(2)))), Identity),
//!     CodecEntry::new("Identity", encode_fn(|d| Ok(Encoded::Text(d.to_string()))), Identity),
//! ];
//! let report = run(&doc, &entries).unwrap();
//! assert_eq!(report.rows[0].name, "Identity");
//! assert_eq!(report.rows[0].encoded_size, 23);
//! ```

use std::any::Any;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam::channel::{self, RecvTimeoutError};
use tracing::{debug, info, warn};

use crate::codec::{CodecEntry, Document};
use crate::error::{BoxError, ConfigError, FailureKind};
use crate::report::{CodecFailure, Outcome, Report, ReportRow};

/// Run the harness with default options (sequential, no timeout)
pub fn run(document: &Document, entries: &[CodecEntry]) -> Result<Report, ConfigError> {
    Harness::new().run(document, entries)
}

/// Reject registrations with duplicate names
pub fn validate_entries(entries: &[CodecEntry]) -> Result<(), ConfigError> {
    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        if !seen.insert(entry.name()) {
            return Err(ConfigError::DuplicateName(entry.name().to_string()));
        }
    }
    Ok(())
}

/// Harness options
#[derive(Debug, Clone, Default)]
pub struct Harness {
    timeout: Option<Duration>,
    parallel: bool,
}

impl Harness {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give each codec at most `timeout` (encode + compress). A codec that
    /// overruns is reported as [`FailureKind::Timeout`]; its worker thread
    /// is detached.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Evaluate entries on the rayon pool. No-op without the `parallel` feature.
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel && cfg!(feature = "parallel")
    }

    /// Evaluate every entry against `document`.
    ///
    /// Returns one outcome per entry: rows sorted by encoded size (stable),
    /// failures in registration order.
    pub fn run(&self, document: &Document, entries: &[CodecEntry]) -> Result<Report, ConfigError> {
        validate_entries(entries)?;

        let start = Instant::now();
        let outcomes = match self.timeout {
            Some(timeout) => {
                let shared = Arc::new(document.clone());
                self.evaluate_all(entries, |entry| {
                    evaluate_with_timeout(Arc::clone(&shared), entry, timeout)
                })
            }
            None => self.evaluate_all(entries, |entry| evaluate(document, entry)),
        };
        let report = Report::from_outcomes(outcomes);

        info!(
            codecs = entries.len(),
            failed = report.failures.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "benchmark finished"
        );
        Ok(report)
    }

    /// Outcomes come back in registration order whichever path runs
    fn evaluate_all<F>(&self, entries: &[CodecEntry], eval: F) -> Vec<Outcome>
    where
        F: Fn(&CodecEntry) -> Outcome + Sync,
    {
        #[cfg(feature = "parallel")]
        if self.parallel {
            use rayon::prelude::*;
            return entries.par_iter().map(&eval).collect();
        }

        entries.iter().map(eval).collect()
    }
}

// ==================== Per-entry evaluation ====================

fn evaluate(document: &Document, entry: &CodecEntry) -> Outcome {
    let name = entry.name();

    let encoded = match guarded(|| entry.encoder().encode(document)) {
        Ok(encoded) => encoded,
        Err(cause) => return failure(name, FailureKind::EncodeFailed, cause),
    };
    let bytes = encoded.into_bytes();
    let encoded_size = bytes.len();

    let compressed = match guarded(|| entry.compressor().compress(&bytes)) {
        Ok(compressed) => compressed,
        Err(cause) => return failure(name, FailureKind::CompressFailed, cause),
    };
    let compressed_size = compressed.len();

    debug!(codec = name, encoded_size, compressed_size, "codec measured");

    Outcome::Row(ReportRow {
        name: name.to_string(),
        encoded_size,
        compressed_size,
        compression: entry.compressor().method().to_string(),
    })
}

fn evaluate_with_timeout(document: Arc<Document>, entry: &CodecEntry, timeout: Duration) -> Outcome {
    let (tx, rx) = channel::bounded(1);
    let worker_doc = Arc::clone(&document);
    let worker_entry = entry.clone();

    let spawned = thread::Builder::new()
        .name(format!("codec:{}", entry.name()))
        .spawn(move || {
            // Receiver may be gone after a timeout
            let _ = tx.send(evaluate(&worker_doc, &worker_entry));
        });

    if let Err(e) = spawned {
        warn!(codec = entry.name(), error = %e, "could not spawn worker, evaluating inline");
        return evaluate(&document, entry);
    }

    received(entry.name(), rx.recv_timeout(timeout), timeout)
}

fn received(name: &str, result: Result<Outcome, RecvTimeoutError>, timeout: Duration) -> Outcome {
    match result {
        Ok(outcome) => outcome,
        Err(RecvTimeoutError::Timeout) => failure(
            name,
            FailureKind::Timeout,
            format!("no result after {:?}", timeout),
        ),
        Err(RecvTimeoutError::Disconnected) => failure(
            name,
            FailureKind::WorkerLost,
            "worker exited without a result",
        ),
    }
}

/// Run a codec step, turning both errors and panics into a printable cause
fn guarded<T, F>(step: F) -> Result<T, String>
where
    F: FnOnce() -> Result<T, BoxError>,
{
    match panic::catch_unwind(AssertUnwindSafe(step)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(e.to_string()),
        Err(payload) => Err(format!("panicked: {}", panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}

fn failure(name: &str, kind: FailureKind, cause: impl Into<String>) -> Outcome {
    let cause = cause.into();
    warn!(codec = name, %kind, %cause, "codec failed");
    Outcome::Failure(CodecFailure {
        name: name.to_string(),
        kind,
        cause,
    })
}
