//! Staging of local paths into the shared mount.
//!
//! A `PathRef` is materialized under `{host_root}/.staged/{basename}` before
//! the command runs; the rendered flag value is that location as seen from
//! inside the execution environment. Copies are recursive for directories and
//! overwrite whatever a previous staging left behind, which keeps re-runs of
//! the same pipeline idempotent. Two local paths sharing a basename overwrite
//! each other; concurrent staging into the same destination is unsupported.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::executor::MountSpec;
use crate::value::PathRef;

/// Name of the staging directory under the mount root.
pub const STAGED_DIR: &str = ".staged";

/// Stages `PathRef` values into a mount's staging directory.
pub struct StagingArea<'a> {
    mount: &'a MountSpec,
}

impl<'a> StagingArea<'a> {
    pub fn new(mount: &'a MountSpec) -> Self {
        Self { mount }
    }

    /// Copy the referenced local path into the staging directory and return
    /// the sandbox-visible path to hand to the wrapped tool.
    pub fn stage(&self, reference: &PathRef) -> Result<String> {
        let local = reference.local_path();
        let staging_err = |source: std::io::Error| Error::Staging {
            path: local.to_path_buf(),
            source,
        };

        let metadata = fs::metadata(local).map_err(staging_err)?;
        let basename = local.file_name().ok_or_else(|| {
            Error::InvalidArgument(format!(
                "cannot stage `{}`: path has no basename",
                local.display()
            ))
        })?;

        let dest = self.mount.host_root.join(STAGED_DIR).join(basename);
        remove_existing(&dest).map_err(staging_err)?;

        if metadata.is_dir() {
            copy_dir(local, &dest).map_err(staging_err)?;
        } else {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent).map_err(staging_err)?;
            }
            fs::copy(local, &dest).map_err(staging_err)?;
        }

        let sandbox_path = self
            .mount
            .sandbox_join(&format!("{}/{}", STAGED_DIR, basename.to_string_lossy()));
        tracing::debug!(
            local = %local.display(),
            staged = %sandbox_path,
            "staged local path into mount"
        );
        Ok(sandbox_path)
    }
}

/// Remove a previous staging of the same basename, whichever shape it had.
fn remove_existing(dest: &Path) -> std::io::Result<()> {
    match fs::symlink_metadata(dest) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(dest),
        Ok(_) => fs::remove_file(dest),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

fn copy_dir(src: &Path, dest: &Path) -> std::io::Result<()> {
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(std::io::Error::other)?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(std::io::Error::other)?;
        let target = dest.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::path;
    use std::path::PathBuf;

    fn mount(dir: &Path) -> MountSpec {
        MountSpec {
            host_root: dir.to_path_buf(),
            sandbox_root: "/workspace".to_string(),
        }
    }

    #[test]
    fn test_stage_file() {
        let out = tempfile::tempdir().unwrap();
        let src = tempfile::tempdir().unwrap();
        fs::write(src.path().join("poses.json"), b"{}").unwrap();

        let mount = mount(out.path());
        let staged = StagingArea::new(&mount)
            .stage(&path(src.path().join("poses.json")))
            .unwrap();

        assert_eq!(staged, "/workspace/.staged/poses.json");
        assert_eq!(
            fs::read(out.path().join(".staged/poses.json")).unwrap(),
            b"{}"
        );
    }

    #[test]
    fn test_stage_directory_recursively() {
        let out = tempfile::tempdir().unwrap();
        let src = tempfile::tempdir().unwrap();
        let images = src.path().join("images");
        fs::create_dir_all(images.join("nested")).unwrap();
        fs::write(images.join("a.jpg"), b"a").unwrap();
        fs::write(images.join("nested/b.jpg"), b"b").unwrap();

        let mount = mount(out.path());
        let staged = StagingArea::new(&mount).stage(&path(&images)).unwrap();

        assert_eq!(staged, "/workspace/.staged/images");
        assert!(out.path().join(".staged/images/a.jpg").exists());
        assert!(out.path().join(".staged/images/nested/b.jpg").exists());
    }

    #[test]
    fn test_restage_overwrites() {
        let out = tempfile::tempdir().unwrap();
        let src = tempfile::tempdir().unwrap();
        let file = src.path().join("data.txt");
        let mount = mount(out.path());

        fs::write(&file, b"v1").unwrap();
        StagingArea::new(&mount).stage(&path(&file)).unwrap();
        fs::write(&file, b"v2").unwrap();
        StagingArea::new(&mount).stage(&path(&file)).unwrap();

        assert_eq!(fs::read(out.path().join(".staged/data.txt")).unwrap(), b"v2");
    }

    #[test]
    fn test_missing_path_is_staging_error() {
        let out = tempfile::tempdir().unwrap();
        let mount = mount(out.path());
        let missing = PathBuf::from("/nonexistent/frames");

        let err = StagingArea::new(&mount).stage(&path(&missing)).unwrap_err();
        match err {
            Error::Staging { path, .. } => assert_eq!(path, missing),
            other => panic!("expected Staging error, got {other:?}"),
        }
    }
}
