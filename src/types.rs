//! Public and internal types for the aq API and pipeline.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::error::AqError;
use crate::utils::config::DEFAULT_ATTRIBUTE;

/// What a sweep does with paths that carry the attribute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Report each path that carries the attribute.
    #[default]
    List,
    /// Remove the attribute and report each removal.
    Remove,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitAction {
    Listed,
    Removed,
}

/// A path that carried the attribute, emitted by a worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hit {
    pub path: PathBuf,
    pub action: HitAction,
}

/// One failed probe or removal inside a sweep.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorRecord {
    pub path: PathBuf,
    pub message: String,
}

/// A walk entry that was not processed: unreadable, or its device could not be resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkipRecord {
    pub path: PathBuf,
    pub reason: String,
}

/// Lib options for [`sweep_dir`](crate::sweep_dir).
#[derive(Clone, Debug)]
pub struct SweepOpts {
    /// Attribute name, case-sensitive, passed to the syscalls as is.
    pub attribute: String,
    pub mode: Mode,
    /// Worker count. When None, one per available CPU (rayon's pool size).
    pub threads: Option<usize>,
    /// Work queue capacity. The walk blocks once this many paths are waiting.
    pub queue_cap: Option<usize>,
    /// Follow symbolic links while walking and when probing.
    pub follow_links: bool,
    /// Set to stop the walk early. Paths already queued are still processed.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for SweepOpts {
    fn default() -> Self {
        Self {
            attribute: DEFAULT_ATTRIBUTE.to_string(),
            mode: Mode::List,
            threads: None,
            queue_cap: None,
            follow_links: false,
            cancel: None,
        }
    }
}

/// Full options (CLI and config file). Use [`SweepOpts`] for lib.
#[derive(Clone, Debug)]
pub struct Opts {
    pub attribute: String,
    pub threads: Option<usize>,
    pub queue_cap: Option<usize>,
    pub follow_links: bool,
    /// Debug logging.
    pub verbose: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            attribute: DEFAULT_ATTRIBUTE.to_string(),
            threads: None,
            queue_cap: None,
            follow_links: false,
            verbose: false,
        }
    }
}

impl Opts {
    pub fn sweep_opts(&self, mode: Mode, cancel: Option<Arc<AtomicBool>>) -> SweepOpts {
        SweepOpts {
            attribute: self.attribute.clone(),
            mode,
            threads: self.threads,
            queue_cap: self.queue_cap,
            follow_links: self.follow_links,
            cancel,
        }
    }
}

/// Outcome of one folder sweep. Turn it into the run's verdict with
/// [`SweepReport::into_result`](crate::pipeline::aggregator).
#[derive(Debug, Default)]
pub struct SweepReport {
    /// Paths the walk put on the work queue.
    pub enqueued: usize,
    /// Probe outcomes produced by the workers (equals `enqueued` once all workers are joined).
    pub processed: usize,
    /// Paths reported through the hit stream.
    pub hits: usize,
    pub errors: Vec<ErrorRecord>,
    pub skipped: Vec<SkipRecord>,
    /// Set when the traversal itself failed; takes precedence over `errors`.
    pub walk_error: Option<AqError>,
    pub cancelled: bool,
}
