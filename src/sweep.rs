//! Folder mode: sweep a tree for one attribute, listing or removing it.

use log::debug;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::attr::AttributeProbe;
use crate::device::DeviceResolver;
use crate::error::Result;
use crate::pipeline::{collect_report, run_pipeline};
use crate::{Hit, SweepOpts, SweepReport};

/// Sweep `root` with the given probe and device resolver, calling `on_hit` on the current thread
/// for every path that carried the attribute.
///
/// Returns the raw report; per-path failures are in `report.errors` and are not an `Err` here.
/// Use [`SweepReport::into_result`] for the run's verdict.
pub fn sweep_with<F>(
    root: &Path,
    opts: &SweepOpts,
    probe: Arc<dyn AttributeProbe>,
    devices: Arc<dyn DeviceResolver>,
    on_hit: F,
) -> Result<SweepReport>
where
    F: FnMut(&Hit),
{
    let start = Instant::now();
    let handles = run_pipeline(root, opts, probe, devices)?;
    let report = collect_report(handles, on_hit)?;
    debug!(
        "sweep of {} done in {:?}: {} queued, {} probed, {} hits, {} errors, {} skipped",
        root.display(),
        start.elapsed(),
        report.enqueued,
        report.processed,
        report.hits,
        report.errors.len(),
        report.skipped.len()
    );
    Ok(report)
}
