//! Output targets and atomic file writes.

use crate::error::{Result, SpdxError};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Target for output - either stdout or a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Write to stdout
    Stdout,
    /// Write to a file
    File(PathBuf),
}

impl OutputTarget {
    /// Create output target from optional path
    #[must_use]
    pub fn from_option(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Stdout, Self::File)
    }

    /// Write fully rendered content to the target
    pub fn write(&self, content: &str) -> Result<()> {
        match self {
            Self::Stdout => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(content.as_bytes())?;
                if !content.ends_with('\n') {
                    stdout.write_all(b"\n")?;
                }
                stdout.flush()?;
                Ok(())
            }
            Self::File(path) => write_atomic(path, content.as_bytes()),
        }
    }
}

/// Write `content` to `path` through a temporary file in the same
/// directory, renamed into place only once every byte is on disk.
///
/// On failure the temporary file is removed and `path` is untouched.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| SpdxError::io(dir, e))?;
    tmp.write_all(content).map_err(|e| SpdxError::io(tmp.path(), e))?;
    tmp.as_file().sync_all().map_err(|e| SpdxError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| SpdxError::io(path, e.error))?;

    tracing::info!(bytes = content.len(), "Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_output_target_from_option() {
        assert_eq!(OutputTarget::from_option(None), OutputTarget::Stdout);

        let path = PathBuf::from("/tmp/test.spdx.json");
        assert_eq!(OutputTarget::from_option(Some(path.clone())), OutputTarget::File(path));
    }

    #[test]
    fn test_write_atomic_replaces_existing() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.spdx.json");
        std::fs::write(&path, "old").unwrap();

        write_atomic(&path, b"new").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");

        let leftovers = std::fs::read_dir(tmp.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_write_atomic_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing").join("out.spdx.json");

        let err = write_atomic(&path, b"{}").unwrap_err();
        assert!(matches!(err, SpdxError::Io { .. }));
        assert!(!path.exists());
    }
}
