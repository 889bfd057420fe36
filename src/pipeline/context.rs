//! Pipeline context and tuning: shared data passed into the walk thread and the workers.

use crossbeam_channel::{Receiver, Sender, bounded};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;

use crate::attr::AttributeProbe;
use crate::device::{DeviceId, DeviceResolver};
use crate::utils::config::{QueueCap, WorkerThreadLimits};
use crate::{Hit, Mode, SkipRecord, SweepOpts};

use super::aggregator::ErrorLog;
use super::walk::WalkSummary;

/// Worker count and channel capacity for one run.
#[derive(Clone, Debug)]
pub struct PipelineTuning {
    pub num_threads: usize,
    pub queue_cap: usize,
}

impl PipelineTuning {
    pub fn from_opts(opts: &SweepOpts) -> Self {
        Self {
            num_threads: WorkerThreadLimits::current().resolve(opts.threads),
            queue_cap: QueueCap::resolve(opts.queue_cap),
        }
    }
}

/// Everything the walk thread needs: root, its device, and where to record skips.
pub struct PipelineContext {
    pub root: PathBuf,
    pub root_device: DeviceId,
    pub follow_links: bool,
    pub devices: Arc<dyn DeviceResolver>,
    pub skipped: Arc<Mutex<Vec<SkipRecord>>>,
    pub cancel: Option<Arc<AtomicBool>>,
}

impl PipelineContext {
    pub fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|c| c.load(Ordering::Relaxed))
    }

    pub fn record_skip(&self, path: PathBuf, reason: String) {
        self.skipped
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SkipRecord { path, reason });
    }
}

/// What each worker needs besides its channel ends.
#[derive(Clone)]
pub struct WorkerContext {
    pub probe: Arc<dyn AttributeProbe>,
    pub attribute: Arc<str>,
    pub mode: Mode,
    pub errors: ErrorLog,
}

/// Handles returned by [`run_pipeline`](super::run_pipeline): drain `hit_rx`, then join.
pub struct PipelineHandles {
    pub hit_rx: Receiver<Hit>,
    pub walk_handle: JoinHandle<WalkSummary>,
    pub worker_handles: Vec<JoinHandle<usize>>,
    pub errors: ErrorLog,
    pub skipped: Arc<Mutex<Vec<SkipRecord>>>,
}

/// Channels and shared state for one run. Walk gets path_tx + ctx; workers get path_rx, hit_tx, worker ctx.
pub struct PipelineChannels {
    pub path_tx: Sender<PathBuf>,
    pub path_rx: Receiver<PathBuf>,
    pub hit_tx: Sender<Hit>,
    pub hit_rx: Receiver<Hit>,
    pub errors: ErrorLog,
    pub skipped: Arc<Mutex<Vec<SkipRecord>>>,
    pub ctx: PipelineContext,
    pub worker_ctx: WorkerContext,
}

pub fn create_pipeline_channels(
    root: &Path,
    root_device: DeviceId,
    opts: &SweepOpts,
    tuning: &PipelineTuning,
    probe: Arc<dyn AttributeProbe>,
    devices: Arc<dyn DeviceResolver>,
) -> PipelineChannels {
    let (path_tx, path_rx) = bounded::<PathBuf>(tuning.queue_cap);
    let (hit_tx, hit_rx) = bounded::<Hit>(QueueCap::HITS);
    let errors = ErrorLog::default();
    let skipped: Arc<Mutex<Vec<SkipRecord>>> = Arc::new(Mutex::new(Vec::new()));

    let ctx = PipelineContext {
        root: root.to_path_buf(),
        root_device,
        follow_links: opts.follow_links,
        devices,
        skipped: Arc::clone(&skipped),
        cancel: opts.cancel.clone(),
    };

    let worker_ctx = WorkerContext {
        probe,
        attribute: Arc::from(opts.attribute.as_str()),
        mode: opts.mode,
        errors: errors.clone(),
    };

    PipelineChannels {
        path_tx,
        path_rx,
        hit_tx,
        hit_rx,
        errors,
        skipped,
        ctx,
        worker_ctx,
    }
}
