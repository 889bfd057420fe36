//! macOS xattr syscalls via libc (getxattr/removexattr with XATTR_NOFOLLOW).

use super::{AttributeState, Removal};
use std::ffi::CStr;
use std::io;
use std::ptr;

fn options(follow_links: bool) -> libc::c_int {
    if follow_links {
        0
    } else {
        libc::XATTR_NOFOLLOW
    }
}

fn is_absent(err: &io::Error) -> bool {
    matches!(
        err.raw_os_error(),
        Some(libc::ENOATTR) | Some(libc::ENOTSUP) | Some(libc::EOPNOTSUPP)
    )
}

pub fn exists(path: &CStr, name: &CStr, follow_links: bool) -> io::Result<AttributeState> {
    let rc = unsafe {
        libc::getxattr(
            path.as_ptr(),
            name.as_ptr(),
            ptr::null_mut(),
            0,
            0,
            options(follow_links),
        )
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
    let rc = unsafe { libc::removexattr(path.as_ptr(), name.as_ptr(), options(follow_links)) };
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
