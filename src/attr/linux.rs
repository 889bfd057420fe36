//! Linux xattr syscalls via libc (getxattr/lgetxattr, removexattr/lremovexattr).

use super::{AttributeState, Removal};
use std::ffi::CStr;
use std::io;
use std::ptr;

/// ENODATA: attribute not set. ENOTSUP: filesystem (or namespace) has no xattrs, so the
/// attribute cannot be present either.
fn is_absent(err: &io::Error) -> bool {
    matches!(err.raw_os_error(), Some(libc::ENODATA) | Some(libc::ENOTSUP))
}

pub fn exists(path: &CStr, name: &CStr, follow_links: bool) -> io::Result<AttributeState> {
    // Size query only: a null buffer with size 0 returns the value length.
    let rc = unsafe {
        if follow_links {
            libc::getxattr(path.as_ptr(), name.as_ptr(), ptr::null_mut(), 0)
        } else {
            libc::lgetxattr(path.as_ptr(), name.as_ptr(), ptr::null_mut(), 0)
        }
    };
    if rc >= 0 {
        return Ok(AttributeState::Present);
    }
    let err = io::Error::last_os_error();
    if is_absent(&err) {
        Ok(AttributeState::Absent)
    } else {
        Err(err)
    }
}

pub fn remove(path: &CStr, name: &CStr, follow_links: bool) -> io::Result<Removal> {
    let rc = unsafe {
        if follow_links {
            libc::removexattr(path.as_ptr(), name.as_ptr())
        } else {
            libc::lremovexattr(path.as_ptr(), name.as_ptr())
        }
    };
    if rc == 0 {
        return Ok(Removal::Removed);
    }
    let err = io::Error::last_os_error();
    if is_absent(&err) {
        Ok(Removal::AlreadyAbsent)
    } else {
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::{AttributeProbe, SystemProbe};
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;
    use std::path::Path;

    const NAME: &str = "user.aq.test";

    /// Set the attribute with setxattr; false when the backing fs refuses user xattrs.
    fn try_set(path: &Path) -> bool {
        let c_path = CString::new(path.as_os_str().as_bytes()).unwrap();
        let c_name = CString::new(NAME).unwrap();
        let value = b"1";
        let rc = unsafe {
            libc::setxattr(
                c_path.as_ptr(),
                c_name.as_ptr(),
                value.as_ptr().cast(),
                value.len(),
                0,
            )
        };
        rc == 0
    }

    #[test]
    fn probe_remove_probe_on_real_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f");
        std::fs::write(&file, b"x").unwrap();
        if !try_set(&file) {
            eprintln!("skipping: user xattrs unsupported here");
            return;
        }
        let probe = SystemProbe::default();
        assert_eq!(probe.exists(&file, NAME).unwrap(), AttributeState::Present);
        assert_eq!(probe.exists(&file, NAME).unwrap(), AttributeState::Present);
        assert_eq!(probe.remove(&file, NAME).unwrap(), Removal::Removed);
        assert_eq!(probe.exists(&file, NAME).unwrap(), AttributeState::Absent);
        assert_eq!(probe.remove(&file, NAME).unwrap(), Removal::AlreadyAbsent);
    }

    #[test]
    fn unset_attribute_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f");
        std::fs::write(&file, b"x").unwrap();
        let probe = SystemProbe::default();
        assert_eq!(probe.exists(&file, NAME).unwrap(), AttributeState::Absent);
        assert_eq!(probe.remove(&file, NAME).unwrap(), Removal::AlreadyAbsent);
    }
}
