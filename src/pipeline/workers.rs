use crossbeam_channel::{Receiver, Sender};
use log::debug;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use crate::attr::{AttributeProbe, AttributeState};
use crate::{Hit, HitAction, Mode};

use super::aggregator::ErrorLog;
use super::context::WorkerContext;

/// Probe one path and, in remove mode, strip the attribute. Failures go to `errors`.
/// Returns the hit to report, if any.
pub fn process_path(
    path: PathBuf,
    probe: &dyn AttributeProbe,
    attribute: &str,
    mode: Mode,
    errors: &ErrorLog,
) -> Option<Hit> {
    match probe.exists(&path, attribute) {
        Err(e) => {
            errors.record(path, format!("checking {attribute}: {}", e.source));
            None
        }
        Ok(AttributeState::Absent) => None,
        Ok(AttributeState::Present) => match mode {
            Mode::List => Some(Hit {
                path,
                action: HitAction::Listed,
            }),
            Mode::Remove => match probe.remove(&path, attribute) {
                Ok(_) => Some(Hit {
                    path,
                    action: HitAction::Removed,
                }),
                Err(e) => {
                    errors.record(path, format!("removing {attribute}: {}", e.source));
                    None
                }
            },
        },
    }
}

/// Single worker: drain path_rx until the walk closes it. Returns how many paths it probed.
fn worker_loop(path_rx: Receiver<PathBuf>, hit_tx: Sender<Hit>, ctx: WorkerContext) -> usize {
    let mut processed = 0_usize;
    while let Ok(path) = path_rx.recv() {
        processed += 1;
        if let Some(hit) = process_path(
            path,
            ctx.probe.as_ref(),
            &ctx.attribute,
            ctx.mode,
            &ctx.errors,
        ) {
            let _ = hit_tx.send(hit);
        }
    }
    drop(hit_tx);
    processed
}

/// Spawn `num_threads` workers. Caller must drop its own `hit_tx` afterwards so the hit stream
/// closes once the last worker exits.
pub fn spawn_workers(
    path_rx: Receiver<PathBuf>,
    hit_tx: &Sender<Hit>,
    ctx: &WorkerContext,
    num_threads: usize,
) -> Vec<JoinHandle<usize>> {
    debug!("Spawning {} workers", num_threads);
    (0..num_threads)
        .map(|_| {
            let path_rx = path_rx.clone();
            let hit_tx = hit_tx.clone();
            let ctx = ctx.clone();
            thread::spawn(move || worker_loop(path_rx, hit_tx, ctx))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::MemoryProbe;
    use std::io;

    const NAME: &str = "com.apple.quarantine";

    #[test]
    fn absent_emits_nothing() {
        let probe = MemoryProbe::new();
        let errors = ErrorLog::default();
        let hit = process_path(PathBuf::from("/b"), &probe, NAME, Mode::List, &errors);
        assert!(hit.is_none());
        assert!(errors.is_empty());
    }

    #[test]
    fn list_mode_leaves_attribute() {
        let probe = MemoryProbe::new();
        probe.set("/a", NAME);
        let errors = ErrorLog::default();
        let hit = process_path(PathBuf::from("/a"), &probe, NAME, Mode::List, &errors).unwrap();
        assert_eq!(hit.action, HitAction::Listed);
        assert!(probe.has(&hit.path, NAME));
        assert_eq!(probe.removal_count(), 0);
    }

    #[test]
    fn remove_mode_strips_attribute() {
        let probe = MemoryProbe::new();
        probe.set("/a", NAME);
        let errors = ErrorLog::default();
        let hit = process_path(PathBuf::from("/a"), &probe, NAME, Mode::Remove, &errors).unwrap();
        assert_eq!(hit.action, HitAction::Removed);
        assert!(!probe.has(&hit.path, NAME));
    }

    #[test]
    fn probe_error_is_recorded_with_path() {
        let probe = MemoryProbe::new();
        probe.fail_on("/locked", io::ErrorKind::PermissionDenied);
        let errors = ErrorLog::default();
        let hit = process_path(PathBuf::from("/locked"), &probe, NAME, Mode::Remove, &errors);
        assert!(hit.is_none());
        let records = errors.take();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path, PathBuf::from("/locked"));
        assert!(records[0].message.starts_with("checking"));
    }

    #[test]
    fn pool_drains_every_item_once() {
        use crossbeam_channel::bounded;
        use std::sync::Arc;

        let probe = Arc::new(MemoryProbe::new());
        for i in (0..100).step_by(3) {
            probe.set(format!("/p/{i}"), NAME);
        }
        let ctx = WorkerContext {
            probe: probe.clone(),
            attribute: Arc::from(NAME),
            mode: Mode::List,
            errors: ErrorLog::default(),
        };
        let (path_tx, path_rx) = bounded(4);
        let (hit_tx, hit_rx) = bounded(4);
        let handles = spawn_workers(path_rx, &hit_tx, &ctx, 3);
        drop(hit_tx);
        let feeder = thread::spawn(move || {
            for i in 0..100 {
                path_tx.send(PathBuf::from(format!("/p/{i}"))).unwrap();
            }
        });
        let hits: Vec<Hit> = hit_rx.iter().collect();
        feeder.join().unwrap();
        let processed: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(processed, 100);
        assert_eq!(probe.probe_count(), 100);
        assert_eq!(hits.len(), 34);
    }
}
