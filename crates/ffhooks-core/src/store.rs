//! Persistence for the config document.
//!
//! [`ConfigStore`] separates the format logic in [`crate::config_doc`] from
//! storage so the session orchestrator can run against a file or memory.

use std::cell::{Cell, RefCell};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{HookError, Result};

/// Whole-document load/save.
pub trait ConfigStore {
    /// Load the document. `Ok(None)` means it does not exist.
    fn load(&self) -> Result<Option<String>>;

    /// Replace the document with `content`.
    fn save(&self, content: &str) -> Result<()>;
}

/// File-backed store for a single config file.
#[derive(Debug, Clone)]
pub struct FsConfigStore {
    path: PathBuf,
}

impl FsConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for FsConfigStore {
    fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                debug!(path = %self.path.display(), bytes = content.len(), "loaded config");
                Ok(Some(content))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) if e.kind() == ErrorKind::InvalidData => Err(HookError::NotUtf8 {
                path: self.path.clone(),
            }),
            Err(e) => Err(HookError::io(&self.path, e)),
        }
    }

    fn save(&self, content: &str) -> Result<()> {
        // Write through symlinks: the rename must land on the real file.
        let target = match fs::canonicalize(&self.path) {
            Ok(resolved) => resolved,
            Err(e) if e.kind() == ErrorKind::NotFound => self.path.clone(),
            Err(e) => return Err(HookError::io(&self.path, e)),
        };
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        // Atomic write: temp file in the same directory, then rename over the target.
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| HookError::io(dir, e))?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| HookError::io(tmp.path(), e))?;
        if let Ok(meta) = fs::metadata(&target) {
            if let Err(e) = fs::set_permissions(tmp.path(), meta.permissions()) {
                debug!(path = %target.display(), error = %e, "could not keep file mode");
            }
        }
        tmp.persist(&target)
            .map_err(|e| HookError::io(&target, e.error))?;

        debug!(path = %target.display(), bytes = content.len(), "wrote config");
        Ok(())
    }
}

/// In-memory store. Counts saves so callers can check that nothing was written.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    content: RefCell<Option<String>>,
    saves: Cell<usize>,
}

impl MemoryConfigStore {
    /// A store with no document.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: RefCell::new(Some(content.into())),
            saves: Cell::new(0),
        }
    }

    pub fn content(&self) -> Option<String> {
        self.content.borrow().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.content.borrow().clone())
    }

    fn save(&self, content: &str) -> Result<()> {
        *self.content.borrow_mut() = Some(content.to_string());
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_store() -> (tempfile::TempDir, FsConfigStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FsConfigStore::new(dir.path().join(".feature-flow.yml"));
        (dir, store)
    }

    #[test]
    fn load_missing_file_is_none() {
        let (_dir, store) = make_store();
        assert!(store.load().unwrap().is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn save_then_load() {
        let (_dir, store) = make_store();
        store.save("plugin_version: 1.0.0\n").unwrap();
        assert_eq!(
            store.load().unwrap().as_deref(),
            Some("plugin_version: 1.0.0\n")
        );
    }

    #[test]
    fn save_overwrites_existing() {
        let (_dir, store) = make_store();
        fs::write(store.path(), "plugin_version: 1.0.0\nother: val\n").unwrap();
        store.save("plugin_version: 2.0.0\nother: val\n").unwrap();
        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            "plugin_version: 2.0.0\nother: val\n"
        );
    }

    #[test]
    fn save_leaves_no_temp_files_behind() {
        let (dir, store) = make_store();
        store.save("a: 1\n").unwrap();
        store.save("a: 2\n").unwrap();
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn save_writes_through_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("real.yml");
        let link = dir.path().join(".feature-flow.yml");
        fs::write(&real, "plugin_version: 1.0.0\n").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let store = FsConfigStore::new(&link);
        store.save("plugin_version: 2.0.0\n").unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(&real).unwrap(), "plugin_version: 2.0.0\n");
        assert_eq!(
            store.load().unwrap().as_deref(),
            Some("plugin_version: 2.0.0\n")
        );
    }

    #[cfg(unix)]
    #[test]
    fn save_keeps_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, store) = make_store();
        fs::write(store.path(), "a: 1\n").unwrap();
        fs::set_permissions(store.path(), fs::Permissions::from_mode(0o644)).unwrap();

        store.save("a: 2\n").unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn load_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsConfigStore::new(dir.path());
        let err = store.load().unwrap_err();
        assert!(matches!(err, HookError::Io { .. }), "got {err:?}");
    }

    #[test]
    fn load_invalid_utf8_is_error() {
        let (_dir, store) = make_store();
        fs::write(store.path(), [0xff, 0xfe, 0x00]).unwrap();
        let err = store.load().unwrap_err();
        assert!(matches!(err, HookError::NotUtf8 { .. }), "got {err:?}");
    }

    #[test]
    fn memory_store_counts_saves() {
        let store = MemoryConfigStore::with_content("a: 1\n");
        assert_eq!(store.load().unwrap().as_deref(), Some("a: 1\n"));
        assert_eq!(store.save_count(), 0);

        store.save("a: 2\n").unwrap();
        assert_eq!(store.content().as_deref(), Some("a: 2\n"));
        assert_eq!(store.save_count(), 1);

        assert!(MemoryConfigStore::empty().load().unwrap().is_none());
    }
}
