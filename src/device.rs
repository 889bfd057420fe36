//! Device identity of a path, used by the walk to stop at mount points.

use std::io;
use std::path::Path;

/// Opaque filesystem/device identifier. Only ever compared for equality.
pub type DeviceId = u64;

pub trait DeviceResolver: Send + Sync {
    fn device_of(&self, path: &Path) -> io::Result<DeviceId>;

    /// Device of the walk root. walkdir always descends through a symlinked root, so this
    /// must describe the tree behind the link, not the link.
    fn root_device_of(&self, path: &Path) -> io::Result<DeviceId> {
        self.device_of(path)
    }
}

/// Resolves devices with stat (`st_dev`).
#[derive(Debug, Clone, Copy, Default)]
pub struct StatDevices {
    pub follow_links: bool,
}

impl StatDevices {
    pub fn new(follow_links: bool) -> Self {
        Self { follow_links }
    }
}

impl DeviceResolver for StatDevices {
    #[cfg(unix)]
    fn device_of(&self, path: &Path) -> io::Result<DeviceId> {
        use std::os::unix::fs::MetadataExt;
        let meta = if self.follow_links {
            std::fs::metadata(path)?
        } else {
            std::fs::symlink_metadata(path)?
        };
        Ok(meta.dev())
    }

    #[cfg(unix)]
    fn root_device_of(&self, path: &Path) -> io::Result<DeviceId> {
        use std::os::unix::fs::MetadataExt;
        Ok(std::fs::metadata(path)?.dev())
    }

    /// No st_dev: treat everything as one device, but still surface a missing path.
    #[cfg(not(unix))]
    fn device_of(&self, path: &Path) -> io::Result<DeviceId> {
        std::fs::symlink_metadata(path)?;
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_tree_same_device() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        let devices = StatDevices::default();
        assert_eq!(
            devices.device_of(dir.path()).unwrap(),
            devices.device_of(&sub).unwrap()
        );
    }

    #[cfg(unix)]
    #[test]
    fn root_device_follows_symlinked_root() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("target");
        std::fs::create_dir(&target).unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();
        let devices = StatDevices::default();
        assert_eq!(
            devices.root_device_of(&link).unwrap(),
            devices.device_of(&target).unwrap()
        );

        // A dangling link has its own inode but no tree behind it.
        let dangling = dir.path().join("dangling");
        std::os::unix::fs::symlink(dir.path().join("nowhere"), &dangling).unwrap();
        assert!(devices.device_of(&dangling).is_ok());
        assert_eq!(
            devices.root_device_of(&dangling).unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
    }

    #[test]
    fn missing_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = StatDevices::default()
            .device_of(&dir.path().join("nope"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
