//! In-memory [`AttributeProbe`]: path → attribute names, with optional injected failures.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use super::{AttributeProbe, AttributeState, Removal};
use crate::error::AttrError;

/// Attribute store kept in a map. Paths are compared textually, exactly as the walk emits them.
#[derive(Debug, Default)]
pub struct MemoryProbe {
    attrs: Mutex<HashMap<PathBuf, HashSet<String>>>,
    failures: Mutex<HashMap<PathBuf, io::ErrorKind>>,
    probes: AtomicUsize,
    removals: AtomicUsize,
}

impl MemoryProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, path: impl Into<PathBuf>, name: &str) {
        self.attrs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(path.into())
            .or_default()
            .insert(name.to_string());
    }

    /// Every exists/remove on `path` fails with `kind`.
    pub fn fail_on(&self, path: impl Into<PathBuf>, kind: io::ErrorKind) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.into(), kind);
    }

    pub fn has(&self, path: &Path, name: &str) -> bool {
        self.attrs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .is_some_and(|names| names.contains(name))
    }

    /// Number of `exists` calls served so far.
    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::Relaxed)
    }

    /// Number of `remove` calls served so far.
    pub fn removal_count(&self) -> usize {
        self.removals.load(Ordering::Relaxed)
    }

    fn injected(&self, path: &Path, name: &str) -> Result<(), AttrError> {
        match self
            .failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
        {
            Some(kind) => Err(AttrError::new(path, name, io::Error::from(*kind))),
            None => Ok(()),
        }
    }
}

impl AttributeProbe for MemoryProbe {
    fn exists(&self, path: &Path, name: &str) -> Result<AttributeState, AttrError> {
        self.probes.fetch_add(1, Ordering::Relaxed);
        self.injected(path, name)?;
        Ok(if self.has(path, name) {
            AttributeState::Present
        } else {
            AttributeState::Absent
        })
    }

    fn remove(&self, path: &Path, name: &str) -> Result<Removal, AttrError> {
        self.removals.fetch_add(1, Ordering::Relaxed);
        self.injected(path, name)?;
        let mut attrs = self.attrs.lock().unwrap_or_else(PoisonError::into_inner);
        let removed = attrs
            .get_mut(path)
            .is_some_and(|names| names.remove(name));
        Ok(if removed {
            Removal::Removed
        } else {
            Removal::AlreadyAbsent
        })
    }
}
