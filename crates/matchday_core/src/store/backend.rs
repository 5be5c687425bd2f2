//! Storage backends behind the namespace store.
//!
//! The filesystem backend is the canonical one. The in-memory backend keeps
//! the same path layout in a map so the rest of the crate never needs to know
//! which one it is talking to.

use super::error::StoreError;

use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, rename, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Byte-level storage used by [`super::NamespaceStore`].
///
/// Paths passed in are already resolved against the store root.
pub trait StorageBackend: Send + Sync {
    /// Create a container (directory) and all of its parents. Idempotent.
    fn create_container(&self, path: &Path) -> Result<(), StoreError>;

    fn container_exists(&self, path: &Path) -> bool;

    /// Names of the direct child containers of `path`. Empty if `path` is missing.
    fn list_containers(&self, path: &Path) -> Result<Vec<String>, StoreError>;

    fn resource_exists(&self, path: &Path) -> bool;

    /// Full contents of a resource, `None` if it was never written.
    fn read_bytes(&self, path: &Path) -> Result<Option<Vec<u8>>, StoreError>;

    /// Replace the resource contents. Readers never observe a partial write.
    fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<(), StoreError>;
}

/// One directory per namespace on the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsBackend;

impl StorageBackend for FsBackend {
    fn create_container(&self, path: &Path) -> Result<(), StoreError> {
        fs::create_dir_all(path)?;
        Ok(())
    }

    fn container_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn list_containers(&self, path: &Path) -> Result<Vec<String>, StoreError> {
        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(names)
    }

    fn resource_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_bytes(&self, path: &Path) -> Result<Option<Vec<u8>>, StoreError> {
        match fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Atomic save: write to temp file, then rename
        let temp_path = path.with_extension("tmp");

        {
            let mut file = File::create(&temp_path)?;
            file.write_all(bytes)?;
            file.flush()?;
            file.sync_all()?;
        }

        rename(&temp_path, path)?;

        log::debug!("Wrote {} bytes to {:?}", bytes.len(), path);
        Ok(())
    }
}

/// Process-local backend. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    containers: Mutex<BTreeSet<PathBuf>>,
    resources: Mutex<BTreeMap<PathBuf, Vec<u8>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn create_container(&self, path: &Path) -> Result<(), StoreError> {
        let mut containers = self.containers.lock().unwrap_or_else(PoisonError::into_inner);
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            containers.insert(ancestor.to_path_buf());
        }
        Ok(())
    }

    fn container_exists(&self, path: &Path) -> bool {
        self.containers.lock().unwrap_or_else(PoisonError::into_inner).contains(path)
    }

    fn list_containers(&self, path: &Path) -> Result<Vec<String>, StoreError> {
        let containers = self.containers.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(containers
            .iter()
            .filter(|c| c.parent() == Some(path))
            .filter_map(|c| c.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect())
    }

    fn resource_exists(&self, path: &Path) -> bool {
        self.resources.lock().unwrap_or_else(PoisonError::into_inner).contains_key(path)
    }

    fn read_bytes(&self, path: &Path) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.resources.lock().unwrap_or_else(PoisonError::into_inner).get(path).cloned())
    }

    fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            self.create_container(parent)?;
        }
        self.resources
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_path_buf(), bytes.to_vec());
        Ok(())
    }
}
