//! Single-path mode: check or remove the attribute on one path. Errors end the run immediately.

use log::debug;
use std::io;
use std::path::Path;

use crate::attr::{AttributeProbe, Removal};
use crate::error::{AqError, Result};

fn ensure_exists(path: &Path) -> Result<()> {
    match std::fs::symlink_metadata(path) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(AqError::NotFound(path.to_path_buf())),
        // Anything else (e.g. a parent without search permission) surfaces from the syscall itself.
        Err(_) => Ok(()),
    }
}

/// True when `path` carries `name`.
pub fn query_path(probe: &dyn AttributeProbe, path: &Path, name: &str) -> Result<bool> {
    ensure_exists(path)?;
    let state = probe.exists(path, name)?;
    debug!("{}: {} {:?}", path.display(), name, state);
    Ok(state.is_present())
}

/// Remove `name` from `path`. Removing an absent attribute succeeds.
pub fn remove_path(probe: &dyn AttributeProbe, path: &Path, name: &str) -> Result<Removal> {
    ensure_exists(path)?;
    let removal = probe.remove(path, name)?;
    debug!("{}: {} {:?}", path.display(), name, removal);
    Ok(removal)
}
