//! Extended attribute probe: existence check and removal of one named attribute.
//!
//! The pipeline and the single-path commands only talk to [`AttributeProbe`]. [`SystemProbe`]
//! issues the real syscalls through the platform module; [`MemoryProbe`] keeps attributes in a
//! map so the pipeline can be driven without a filesystem that supports xattrs.

use std::io;
use std::path::Path;

use crate::error::AttrError;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;

pub mod memory;

pub use memory::MemoryProbe;

/// Presence of one attribute on one path. Produced fresh by every probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeState {
    Present,
    Absent,
}

impl AttributeState {
    pub fn is_present(&self) -> bool {
        matches!(self, AttributeState::Present)
    }
}

/// Outcome of a successful removal. Callers treat both arms as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Removed,
    AlreadyAbsent,
}

/// The two attribute operations the core needs.
///
/// "No such attribute" is never an error: it is [`AttributeState::Absent`] from `exists` and
/// [`Removal::AlreadyAbsent`] from `remove`. Anything else comes back as [`AttrError`].
pub trait AttributeProbe: Send + Sync {
    fn exists(&self, path: &Path, name: &str) -> Result<AttributeState, AttrError>;
    fn remove(&self, path: &Path, name: &str) -> Result<Removal, AttrError>;
}

/// Probe backed by the host's getxattr/removexattr.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProbe {
    /// Act on the symlink target instead of the link itself.
    pub follow_links: bool,
}

impl SystemProbe {
    pub fn new(follow_links: bool) -> Self {
        Self { follow_links }
    }
}

impl AttributeProbe for SystemProbe {
    fn exists(&self, path: &Path, name: &str) -> Result<AttributeState, AttrError> {
        sys_exists(path, name, self.follow_links).map_err(|e| AttrError::new(path, name, e))
    }

    fn remove(&self, path: &Path, name: &str) -> Result<Removal, AttrError> {
        sys_remove(path, name, self.follow_links).map_err(|e| AttrError::new(path, name, e))
    }
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
fn to_cstrings(path: &Path, name: &str) -> io::Result<(std::ffi::CString, std::ffi::CString)> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "path contains a NUL byte"))?;
    let c_name = CString::new(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "attribute name contains a NUL byte",
        )
    })?;
    Ok((c_path, c_name))
}

fn sys_exists(path: &Path, name: &str, follow_links: bool) -> io::Result<AttributeState> {
    #[cfg(target_os = "linux")]
    {
        let (c_path, c_name) = to_cstrings(path, name)?;
        linux::exists(&c_path, &c_name, follow_links)
    }

    #[cfg(target_os = "macos")]
    {
        let (c_path, c_name) = to_cstrings(path, name)?;
        macos::exists(&c_path, &c_name, follow_links)
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        let _ = (path, name, follow_links);
        Err(unsupported())
    }
}

fn sys_remove(path: &Path, name: &str, follow_links: bool) -> io::Result<Removal> {
    #[cfg(target_os = "linux")]
    {
        let (c_path, c_name) = to_cstrings(path, name)?;
        linux::remove(&c_path, &c_name, follow_links)
    }

    #[cfg(target_os = "macos")]
    {
        let (c_path, c_name) = to_cstrings(path, name)?;
        macos::remove(&c_path, &c_name, follow_links)
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        let _ = (path, name, follow_links);
        Err(unsupported())
    }
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn unsupported() -> io::Error {
    io::Error::new(
        io::ErrorKind::Unsupported,
        "extended attributes are not supported on this platform",
    )
}
