use log::debug;
use std::io;
use std::path::Path;
use std::sync::Arc;

use crate::attr::AttributeProbe;
use crate::device::{DeviceId, DeviceResolver};
use crate::error::{AqError, Result};
use crate::pipeline;
use crate::{Hit, SweepOpts, SweepReport};

use super::aggregator::take_skipped;

/// Resolve the root's device, through the link when the root is a symlink.
/// Missing root is `NotFound`; any other failure is fatal.
pub fn resolve_root_device(root: &Path, devices: &dyn DeviceResolver) -> Result<DeviceId> {
    devices.root_device_of(root).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => AqError::NotFound(root.to_path_buf()),
        _ => AqError::TraversalFatal {
            path: root.to_path_buf(),
            message: e.to_string(),
        },
    })
}

/// Start the walk thread and the workers. Caller drains `hit_rx` and then joins, see
/// [`collect_report`].
pub fn run_pipeline(
    root: &Path,
    opts: &SweepOpts,
    probe: Arc<dyn AttributeProbe>,
    devices: Arc<dyn DeviceResolver>,
) -> Result<pipeline::PipelineHandles> {
    let root_device = resolve_root_device(root, devices.as_ref())?;
    let tuning = pipeline::PipelineTuning::from_opts(opts);
    debug!(
        "root {} on device {}, {} workers, queue cap {}",
        root.display(),
        root_device,
        tuning.num_threads,
        tuning.queue_cap
    );

    let channels =
        pipeline::create_pipeline_channels(root, root_device, opts, &tuning, probe, devices);

    let walk_handle = pipeline::spawn_walk_thread(channels.path_tx, channels.ctx);

    let worker_handles = pipeline::spawn_workers(
        channels.path_rx,
        &channels.hit_tx,
        &channels.worker_ctx,
        tuning.num_threads,
    );

    // Dropping the last sender closes the hit stream once the workers exit.
    drop(channels.hit_tx);

    Ok(pipeline::PipelineHandles {
        hit_rx: channels.hit_rx,
        walk_handle,
        worker_handles,
        errors: channels.errors,
        skipped: channels.skipped,
    })
}

/// Drain hits into `on_hit` until every worker has exited, join all threads, and build the report.
pub fn collect_report<F>(handles: pipeline::PipelineHandles, mut on_hit: F) -> Result<SweepReport>
where
    F: FnMut(&Hit),
{
    let pipeline::PipelineHandles {
        hit_rx,
        walk_handle,
        worker_handles,
        errors,
        skipped,
    } = handles;

    let mut hits = 0_usize;
    while let Ok(hit) = hit_rx.recv() {
        hits += 1;
        on_hit(&hit);
    }
    debug!("main: hit stream closed after {} hits", hits);

    let walk = walk_handle
        .join()
        .map_err(|_| AqError::WorkerPanic("walk"))?;
    let mut processed = 0_usize;
    let mut panicked = false;
    for h in worker_handles {
        match h.join() {
            Ok(n) => processed += n,
            Err(_) => panicked = true,
        }
    }
    if panicked {
        return Err(AqError::WorkerPanic("worker"));
    }
    if !errors.is_empty() {
        debug!("main: {} of {} paths failed", errors.len(), processed);
    }

    Ok(SweepReport {
        enqueued: walk.enqueued,
        processed,
        hits,
        errors: errors.take(),
        skipped: take_skipped(&skipped),
        walk_error: walk.fatal,
        cancelled: walk.cancelled,
    })
}
