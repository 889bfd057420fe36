//! aq: find and strip one extended attribute (by default `com.apple.quarantine`) on a path or
//! across a directory tree, in parallel, without crossing mount points.

pub mod attr;
pub mod device;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod single;
pub mod sweep;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use error::{AqError, AttrError, ExitCodes, Result};

use log::debug;
use std::path::Path;
use std::sync::Arc;

use crate::attr::SystemProbe;
use crate::device::StatDevices;

/// Sweep `root` with the host's xattr syscalls and stat device ids.
///
/// - **`on_hit: None`** → hits are only counted (`report.hits`).
/// - **`on_hit: Some(f)`** → `f` is called on the calling thread for every path that carried the
///   attribute (listed, or removed in [`Mode::Remove`]). Keep it fast; workers wait on it once the
///   hit stream is full.
///
/// The returned report still holds per-path failures; call
/// [`SweepReport::into_result`](crate::SweepReport::into_result) to turn them into an error.
pub fn sweep_dir<F>(root: &Path, opts: &SweepOpts, on_hit: Option<F>) -> Result<SweepReport>
where
    F: FnMut(&Hit),
{
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        opts
    );
    let probe = Arc::new(SystemProbe::new(opts.follow_links));
    let devices = Arc::new(StatDevices::new(opts.follow_links));
    match on_hit {
        None => sweep::sweep_with(root, opts, probe, devices, |_| {}),
        Some(f) => sweep::sweep_with(root, opts, probe, devices, f),
    }
}

/// Check one path with the host's xattr syscalls.
pub fn has_attribute(path: &Path, name: &str, follow_links: bool) -> Result<bool> {
    single::query_path(&SystemProbe::new(follow_links), path, name)
}

/// Remove one attribute from one path with the host's xattr syscalls.
pub fn remove_attribute(path: &Path, name: &str, follow_links: bool) -> Result<attr::Removal> {
    single::remove_path(&SystemProbe::new(follow_links), path, name)
}
