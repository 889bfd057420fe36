//! Error types for aq.
//!
//! [`AttrError`] is one failed attribute syscall. [`AqError`] is what a run returns; each
//! variant maps to a process exit code via [`AqError::exit_code`].

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Process exit codes.
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    /// Some operations failed, or an unexpected error (bad arguments, unreadable config).
    pub const FAILURE: u8 = 1;
    /// Target path does not exist.
    pub const NOT_FOUND: u8 = 2;
    /// Folder run could not run at all (root unusable, interrupted).
    pub const FATAL: u8 = 3;
}

/// A get/remove attribute call failed for a reason other than the attribute being absent.
#[derive(Error, Debug)]
#[error("{attribute} on {}: {source}", path.display())]
pub struct AttrError {
    pub path: PathBuf,
    pub attribute: String,
    #[source]
    pub source: io::Error,
}

impl AttrError {
    pub fn new(path: &Path, attribute: &str, source: io::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            attribute: attribute.to_string(),
            source,
        }
    }

    /// The path itself vanished (or never existed).
    pub fn is_not_found(&self) -> bool {
        self.source.kind() == io::ErrorKind::NotFound
    }
}

#[derive(Error, Debug)]
pub enum AqError {
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error(transparent)]
    Attribute(#[from] AttrError),

    /// Device id of a directory could not be read. Recorded as a skip, never a run failure.
    #[error("cannot resolve device of {}: {source}", path.display())]
    Boundary {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot walk {}: {message}", path.display())]
    TraversalFatal { path: PathBuf, message: String },

    #[error("{failed} path(s) failed:\n{summary}")]
    Partial { failed: usize, summary: String },

    #[error("interrupted before the walk finished")]
    Cancelled,

    #[error("{0} thread panicked")]
    WorkerPanic(&'static str),
}

impl AqError {
    pub fn exit_code(&self) -> u8 {
        match self {
            AqError::NotFound(_) => ExitCodes::NOT_FOUND,
            AqError::Attribute(e) if e.is_not_found() => ExitCodes::NOT_FOUND,
            AqError::TraversalFatal { .. } | AqError::Cancelled => ExitCodes::FATAL,
            AqError::Attribute(_)
            | AqError::Boundary { .. }
            | AqError::Partial { .. }
            | AqError::WorkerPanic(_) => ExitCodes::FAILURE,
        }
    }
}

/// Result alias used by the public aq API.
pub type Result<T> = std::result::Result<T, AqError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_distinguish_outcomes() {
        assert_eq!(
            AqError::NotFound(PathBuf::from("x")).exit_code(),
            ExitCodes::NOT_FOUND
        );
        assert_eq!(
            AqError::Partial {
                failed: 2,
                summary: String::new()
            }
            .exit_code(),
            ExitCodes::FAILURE
        );
        assert_eq!(
            AqError::TraversalFatal {
                path: PathBuf::from("/"),
                message: "gone".into()
            }
            .exit_code(),
            ExitCodes::FATAL
        );
    }

    #[test]
    fn vanished_path_maps_to_not_found() {
        let err = AttrError::new(
            Path::new("/gone"),
            "user.test",
            io::Error::from(io::ErrorKind::NotFound),
        );
        assert!(err.is_not_found());
        assert_eq!(AqError::from(err).exit_code(), ExitCodes::NOT_FOUND);
    }

    #[test]
    fn attr_error_message_names_path_and_attribute() {
        let err = AttrError::new(
            Path::new("/tmp/a"),
            "user.test",
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/a"));
        assert!(msg.contains("user.test"));
    }
}
