//! Per-path error collection shared by the workers, and the end-of-run verdict.

use log::{error, info, warn};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{AqError, Result};
use crate::{ErrorRecord, SkipRecord, SweepReport};

/// Append-only error list. Clone it into each worker; read it once after every worker is joined.
#[derive(Clone, Debug, Default)]
pub struct ErrorLog {
    records: Arc<Mutex<Vec<ErrorRecord>>>,
}

impl ErrorLog {
    pub fn record(&self, path: PathBuf, message: String) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ErrorRecord { path, message });
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take every record. Call after the join barrier.
    pub fn take(&self) -> Vec<ErrorRecord> {
        std::mem::take(&mut *self.records.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Take the skip list out of its shared cell.
pub fn take_skipped(skipped: &Arc<Mutex<Vec<SkipRecord>>>) -> Vec<SkipRecord> {
    std::mem::take(&mut *skipped.lock().unwrap_or_else(PoisonError::into_inner))
}

/// One `path: message` line per record.
pub fn summarize(errors: &[ErrorRecord]) -> String {
    errors
        .iter()
        .map(|r| format!("  {}: {}", r.path.display(), r.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Log skipped paths: a count at warn, each path at info when `list` is set.
pub fn log_skipped_paths(skipped: &[SkipRecord], list: bool) {
    if skipped.is_empty() {
        return;
    }
    warn!(
        "Skipped {} paths due to permission errors, access issues or unreadable devices",
        skipped.len()
    );
    if list {
        for s in skipped {
            info!("  skipped: {} ({})", s.path.display(), s.reason);
        }
    }
}

impl SweepReport {
    /// The run's verdict. A traversal error wins; per-path failures are still logged in that case.
    /// Otherwise any per-path failure becomes [`AqError::Partial`], and an interrupted walk
    /// becomes [`AqError::Cancelled`].
    pub fn into_result(mut self) -> Result<SweepReport> {
        if let Some(walk_error) = self.walk_error.take() {
            for r in &self.errors {
                error!("{}: {}", r.path.display(), r.message);
            }
            return Err(walk_error);
        }
        if !self.errors.is_empty() {
            return Err(AqError::Partial {
                failed: self.errors.len(),
                summary: summarize(&self.errors),
            });
        }
        if self.cancelled {
            return Err(AqError::Cancelled);
        }
        Ok(self)
    }
}
