//! Raw document I/O behind a swappable port.
//!
//! Resolution and mutation never touch `std::fs` directly; they go through
//! [`StoreIo`], so the same logic runs against the real filesystem or an
//! in-memory map.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

/// Read/write access to whole documents addressed by path.
pub trait StoreIo {
    /// Returns `Ok(None)` when the document does not exist.
    fn read(&self, path: &Path) -> io::Result<Option<String>>;

    /// Replaces the document, creating parent directories as needed.
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
}

impl<T: StoreIo + ?Sized> StoreIo for &T {
    fn read(&self, path: &Path) -> io::Result<Option<String>> {
        (**self).read(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        (**self).write(path, contents)
    }
}

/// The local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore;

impl StoreIo for FsStore {
    fn read(&self, path: &Path) -> io::Result<Option<String>> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, contents)
    }
}

/// In-memory documents keyed by path. Single-threaded, like the tool itself.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: RefCell<BTreeMap<PathBuf, String>>,
    read_only: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document.
    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.files.borrow_mut().insert(path.into(), contents.into());
        self
    }

    /// Current contents of a document, if any.
    pub fn get(&self, path: &Path) -> Option<String> {
        self.files.borrow().get(path).cloned()
    }

    /// Parsed contents of a document; `None` if absent or not JSON.
    pub fn json(&self, path: &Path) -> Option<serde_json::Value> {
        self.get(path).and_then(|s| serde_json::from_str(&s).ok())
    }

    /// Make every subsequent write fail with `PermissionDenied`.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.set(read_only);
    }
}

impl StoreIo for MemoryStore {
    fn read(&self, path: &Path) -> io::Result<Option<String>> {
        Ok(self.get(path))
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        if self.read_only.get() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} is read-only", path.display()),
            ));
        }
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}
