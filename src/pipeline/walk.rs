//! Walk loop: depth-first pre-order over the root, one thread, feeding the work queue.
//!
//! Directories on another device than the root are still sent (the mount point itself lives on
//! the parent's device) but their contents are pruned. A directory whose device cannot be read is
//! skipped together with its subtree.

use crossbeam_channel::Sender;
use log::{debug, info, warn};
use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use walkdir::WalkDir;

use crate::error::AqError;

use super::context::PipelineContext;

/// One result from the directory walk: an entry to consider or an error with optional path.
pub enum WalkOutcome {
    Ok {
        path: PathBuf,
        is_dir: bool,
        depth: usize,
    },
    Err {
        msg: String,
        path: Option<PathBuf>,
        depth: usize,
    },
}

/// Convert a walkdir result into [`WalkOutcome`].
pub fn to_outcome_walkdir(r: Result<walkdir::DirEntry, walkdir::Error>) -> WalkOutcome {
    match r {
        Ok(entry) => WalkOutcome::Ok {
            is_dir: entry.file_type().is_dir(),
            depth: entry.depth(),
            path: entry.into_path(),
        },
        Err(err) => WalkOutcome::Err {
            msg: err
                .io_error()
                .map(|e| e.to_string())
                .unwrap_or_else(|| err.to_string()),
            path: err.path().map(PathBuf::from),
            depth: err.depth(),
        },
    }
}

/// What the walk thread hands back when it finishes.
#[derive(Debug, Default)]
pub struct WalkSummary {
    /// Paths sent on the work queue.
    pub enqueued: usize,
    pub boundaries: usize,
    /// The root could not be walked.
    pub fatal: Option<AqError>,
    pub cancelled: bool,
}

pub fn spawn_walk_thread(path_tx: Sender<PathBuf>, ctx: PipelineContext) -> JoinHandle<WalkSummary> {
    thread::spawn(move || run_walk_loop(path_tx, ctx))
}

/// Walk `ctx.root`, send every kept path to `path_tx`, record skips in `ctx.skipped`.
/// Drops `path_tx` when done, which closes the queue for the workers.
pub fn run_walk_loop(path_tx: Sender<PathBuf>, ctx: PipelineContext) -> WalkSummary {
    let mut summary = WalkSummary::default();
    let mut iter = WalkDir::new(&ctx.root)
        .follow_links(ctx.follow_links)
        .into_iter();

    while let Some(r) = iter.next() {
        if ctx.cancelled() {
            info!("Interrupted; no more paths will be queued");
            summary.cancelled = true;
            break;
        }
        match to_outcome_walkdir(r) {
            WalkOutcome::Ok {
                path,
                is_dir,
                depth,
            } => {
                if is_dir && depth > 0 {
                    match ctx.devices.device_of(&path) {
                        Ok(dev) if dev != ctx.root_device => {
                            info!(
                                "Not descending into {} (different filesystem)",
                                path.display()
                            );
                            summary.boundaries += 1;
                            iter.skip_current_dir();
                        }
                        Ok(_) => {}
                        Err(source) => {
                            let err = AqError::Boundary {
                                path: path.clone(),
                                source,
                            };
                            warn!("skipping: {err}");
                            ctx.record_skip(path, err.to_string());
                            iter.skip_current_dir();
                            continue;
                        }
                    }
                }
                if path_tx.send(path).is_err() {
                    break;
                }
                summary.enqueued += 1;
            }
            WalkOutcome::Err { msg, path, depth } => {
                let path = path.unwrap_or_else(|| ctx.root.clone());
                if depth == 0 {
                    summary.fatal = Some(AqError::TraversalFatal { path, message: msg });
                    break;
                }
                warn!("skipping (access error): {} -> {}", path.display(), msg);
                ctx.record_skip(path, msg);
            }
        }
    }
    debug!(
        "walk: {} paths queued, {} mount points not crossed",
        summary.enqueued, summary.boundaries
    );
    drop(path_tx);
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DeviceId, DeviceResolver, StatDevices};
    use crossbeam_channel::unbounded;
    use std::io;
    use std::path::Path;
    use std::sync::atomic::AtomicBool;
    use std::sync::{Arc, Mutex};

    /// Everything under `foreign` reports device 2, the rest device 1.
    struct ForeignSubtree {
        foreign: PathBuf,
        broken: Option<PathBuf>,
    }

    impl DeviceResolver for ForeignSubtree {
        fn device_of(&self, path: &Path) -> io::Result<DeviceId> {
            if self.broken.as_deref() == Some(path) {
                return Err(io::Error::from(io::ErrorKind::PermissionDenied));
            }
            Ok(if path.starts_with(&self.foreign) { 2 } else { 1 })
        }
    }

    fn ctx(root: &Path, devices: Arc<dyn DeviceResolver>) -> PipelineContext {
        PipelineContext {
            root: root.to_path_buf(),
            root_device: devices.root_device_of(root).unwrap_or(1),
            follow_links: false,
            devices,
            skipped: Arc::new(Mutex::new(Vec::new())),
            cancel: None,
        }
    }

    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let r = dir.path();
        std::fs::write(r.join("a"), b"").unwrap();
        std::fs::create_dir_all(r.join("sub")).unwrap();
        std::fs::write(r.join("sub/c"), b"").unwrap();
        std::fs::create_dir_all(r.join("mnt/deep")).unwrap();
        std::fs::write(r.join("mnt/d"), b"").unwrap();
        dir
    }

    fn walk(ctx: PipelineContext) -> (WalkSummary, Vec<PathBuf>) {
        let (tx, rx) = unbounded();
        let summary = run_walk_loop(tx, ctx);
        (summary, rx.iter().collect())
    }

    #[test]
    fn every_path_once_root_first() {
        let dir = tree();
        let (summary, paths) = walk(ctx(dir.path(), Arc::new(StatDevices::default())));
        assert_eq!(paths[0], dir.path());
        assert_eq!(paths.len(), 7);
        assert_eq!(summary.enqueued, 7);
        let mut sorted = paths.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), paths.len());
    }

    #[test]
    fn mount_point_kept_contents_pruned() {
        let dir = tree();
        let devices = Arc::new(ForeignSubtree {
            foreign: dir.path().join("mnt"),
            broken: None,
        });
        let (summary, paths) = walk(ctx(dir.path(), devices));
        assert!(paths.contains(&dir.path().join("mnt")));
        assert!(!paths.contains(&dir.path().join("mnt/d")));
        assert!(!paths.contains(&dir.path().join("mnt/deep")));
        assert!(paths.contains(&dir.path().join("sub/c")));
        assert_eq!(summary.boundaries, 1);
    }

    #[test]
    fn unresolvable_device_skips_subtree() {
        let dir = tree();
        let devices = Arc::new(ForeignSubtree {
            foreign: dir.path().join("nowhere"),
            broken: Some(dir.path().join("sub")),
        });
        let context = ctx(dir.path(), devices);
        let skipped = Arc::clone(&context.skipped);
        let (summary, paths) = walk(context);
        assert!(!paths.contains(&dir.path().join("sub")));
        assert!(!paths.contains(&dir.path().join("sub/c")));
        assert!(summary.fatal.is_none());
        let skipped = skipped.lock().unwrap();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].path, dir.path().join("sub"));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_entry_below_root_is_skipped_not_fatal() {
        let dir = tree();
        let broken = dir.path().join("sub/broken");
        std::os::unix::fs::symlink(dir.path().join("nowhere"), &broken).unwrap();
        let mut context = ctx(dir.path(), Arc::new(StatDevices::new(true)));
        context.follow_links = true;
        let skipped = Arc::clone(&context.skipped);
        let (summary, paths) = walk(context);

        assert!(summary.fatal.is_none());
        assert!(!paths.contains(&broken));
        for sibling in ["a", "sub", "sub/c", "mnt", "mnt/d", "mnt/deep"] {
            assert!(paths.contains(&dir.path().join(sibling)), "{sibling} missing");
        }
        assert_eq!(summary.enqueued, 7);
        let skipped = skipped.lock().unwrap();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].path, broken);
    }

    #[test]
    fn missing_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("gone");
        let (summary, paths) = walk(ctx(&gone, Arc::new(StatDevices::default())));
        assert!(paths.is_empty());
        assert!(matches!(summary.fatal, Some(AqError::TraversalFatal { .. })));
    }

    #[test]
    fn cancelled_walk_queues_nothing_more() {
        let dir = tree();
        let mut context = ctx(dir.path(), Arc::new(StatDevices::default()));
        context.cancel = Some(Arc::new(AtomicBool::new(true)));
        let (summary, paths) = walk(context);
        assert!(summary.cancelled);
        assert!(paths.is_empty());
    }
}
