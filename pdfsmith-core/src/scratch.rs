//! Temporary on-disk storage for engines that only speak file paths
//!
//! Every handle removes its storage when dropped, whichever way the owning
//! operation exits. Removal failures are logged and swallowed so they never
//! replace the operation's own result.
//!
//! # Example
//!
//! ```rust
//! use pdfsmith::ScratchSpace;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let space = ScratchSpace::system();
//! let mut input = space.file(".pdf")?;
//! input.write_all(b"%PDF-1.7")?;
//! let path = input.path().to_path_buf();
//! assert!(path.exists());
//! drop(input);
//! assert!(!path.exists());
//! # Ok(())
//! # }
//! ```

use crate::error::Result;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile, TempDir};
use tracing::{debug, warn};

/// Prefix shared by every scratch entry, handy when auditing a temp dir
pub const SCRATCH_PREFIX: &str = "pdfsmith-";

/// Root directory under which scratch files and directories are allocated
#[derive(Debug, Clone)]
pub struct ScratchSpace {
    root: PathBuf,
}

impl ScratchSpace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Scratch space in the operating system's temp directory
    pub fn system() -> Self {
        Self::new(std::env::temp_dir())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Allocates a uniquely named empty file ending in `suffix`.
    pub fn file(&self, suffix: &str) -> Result<ScratchFile> {
        let file = Builder::new()
            .prefix(SCRATCH_PREFIX)
            .suffix(suffix)
            .tempfile_in(&self.root)?;
        let path = file.path().to_path_buf();
        debug!(path = %path.display(), "allocated scratch file");
        Ok(ScratchFile {
            file: Some(file),
            path,
        })
    }

    /// Allocates a uniquely named empty directory.
    pub fn dir(&self) -> Result<ScratchDir> {
        let dir = Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir_in(&self.root)?;
        let path = dir.path().to_path_buf();
        debug!(path = %path.display(), "allocated scratch dir");
        Ok(ScratchDir {
            dir: Some(dir),
            path,
        })
    }
}

impl Default for ScratchSpace {
    fn default() -> Self {
        Self::system()
    }
}

/// A single temporary file, removed on drop
#[derive(Debug)]
pub struct ScratchFile {
    file: Option<NamedTempFile>,
    path: PathBuf,
}

impl ScratchFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        if let Some(file) = self.file.as_mut() {
            let handle = file.as_file_mut();
            handle.write_all(bytes)?;
            handle.flush()?;
        }
        Ok(())
    }

    /// Reads the file back by path, picking up content written by other processes.
    pub fn read(&self) -> Result<Vec<u8>> {
        Ok(std::fs::read(&self.path)?)
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            match file.close() {
                Ok(()) => debug!(path = %self.path.display(), "removed scratch file"),
                Err(e) => warn!(
                    path = %self.path.display(),
                    error = %e,
                    "failed to remove scratch file"
                ),
            }
        }
    }
}

/// A temporary directory and everything under it, removed on drop
#[derive(Debug)]
pub struct ScratchDir {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl ScratchDir {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn join(&self, name: impl AsRef<Path>) -> PathBuf {
        self.path.join(name)
    }

    /// Writes `bytes` to `name` inside the directory and returns the full path.
    pub fn write(&self, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.join(name);
        std::fs::write(&path, bytes)?;
        Ok(path)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            match dir.close() {
                Ok(()) => debug!(path = %self.path.display(), "removed scratch dir"),
                Err(e) => warn!(
                    path = %self.path.display(),
                    error = %e,
                    "failed to remove scratch dir"
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(root: &Path) -> usize {
        std::fs::read_dir(root).unwrap().count()
    }

    #[test]
    fn test_file_removed_on_drop() {
        let root = tempfile::tempdir().unwrap();
        let space = ScratchSpace::new(root.path());

        let mut file = space.file(".pdf").unwrap();
        file.write_all(b"%PDF-1.7 scratch").unwrap();
        assert_eq!(file.read().unwrap(), b"%PDF-1.7 scratch");

        let name = file.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with(SCRATCH_PREFIX));
        assert!(name.ends_with(".pdf"));
        assert_eq!(entries(root.path()), 1);

        drop(file);
        assert_eq!(entries(root.path()), 0);
    }

    #[test]
    fn test_dir_removed_with_contents() {
        let root = tempfile::tempdir().unwrap();
        let space = ScratchSpace::new(root.path());

        let dir = space.dir().unwrap();
        let written = dir.write("page-1.png", b"png").unwrap();
        assert!(written.exists());
        std::fs::create_dir(dir.join("nested")).unwrap();
        std::fs::write(dir.join("nested/out.txt"), b"text").unwrap();

        drop(dir);
        assert_eq!(entries(root.path()), 0);
    }

    #[test]
    fn test_names_are_unique() {
        let root = tempfile::tempdir().unwrap();
        let space = ScratchSpace::new(root.path());

        let a = space.file(".pdf").unwrap();
        let b = space.file(".pdf").unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn test_externally_removed_file_does_not_panic() {
        let root = tempfile::tempdir().unwrap();
        let space = ScratchSpace::new(root.path());

        let file = space.file(".docx").unwrap();
        std::fs::remove_file(file.path()).unwrap();
        drop(file);
        assert_eq!(entries(root.path()), 0);
    }

    #[test]
    fn test_missing_root_is_io_error() {
        let space = ScratchSpace::new("/nonexistent/pdfsmith/scratch/root");
        assert!(space.file(".pdf").is_err());
        assert!(space.dir().is_err());
    }
}
