//! Application configuration constants.
//! Defaults and tuning in one place.

use std::sync::OnceLock;

/// Attribute cleared by default: the Gatekeeper quarantine flag macOS sets on downloads.
pub const DEFAULT_ATTRIBUTE: &str = "com.apple.quarantine";

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    config_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                config_filename: format!(".{pkg}.toml"),
            }
        })
    }

    /// Config file looked up in the current directory when `--config` is not given.
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }
}

// ---- Worker threads ----

/// Worker count bounds. Use [`WorkerThreadLimits::current()`] to fill `all_threads` from rayon.
#[derive(Clone, Copy, Debug)]
pub struct WorkerThreadLimits {
    /// Available threads (from rayon); set by [`WorkerThreadLimits::current()`].
    pub all_threads: usize,
    pub floor: usize,
}

impl Default for WorkerThreadLimits {
    fn default() -> Self {
        Self {
            all_threads: 0,
            floor: Self::FLOOR_THREADS,
        }
    }
}

impl WorkerThreadLimits {
    pub const FLOOR_THREADS: usize = 1;

    pub fn current() -> Self {
        Self {
            all_threads: rayon::current_num_threads(),
            ..Self::default()
        }
    }

    /// Worker count for a run: the override if given, else every available thread; never below the floor.
    pub fn resolve(&self, thread_override: Option<usize>) -> usize {
        thread_override.unwrap_or(self.all_threads).max(self.floor)
    }
}

// ---- Channels ----

/// Capacities for the work queue (walk → workers) and the hit stream (workers → driver).
pub struct QueueCap;

impl QueueCap {
    /// Paths waiting for a worker before the walk blocks.
    pub const DEFAULT: usize = 1024;
    /// Hits waiting for the driver to print them.
    pub const HITS: usize = 256;

    pub fn resolve(cap_override: Option<usize>) -> usize {
        cap_override.unwrap_or(Self::DEFAULT).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_threads_clamps_to_floor() {
        let limits = WorkerThreadLimits {
            all_threads: 8,
            ..Default::default()
        };
        assert_eq!(limits.resolve(Some(0)), 1);
        assert_eq!(limits.resolve(Some(3)), 3);
        assert_eq!(limits.resolve(None), 8);
    }

    #[test]
    fn current_has_at_least_one_thread() {
        assert!(WorkerThreadLimits::current().resolve(None) >= 1);
    }

    #[test]
    fn queue_cap_never_zero() {
        assert_eq!(QueueCap::resolve(Some(0)), 1);
        assert_eq!(QueueCap::resolve(None), QueueCap::DEFAULT);
    }

    #[test]
    fn config_filename_from_package() {
        assert_eq!(PackagePaths::get().config_filename(), ".aq.toml");
    }
}
