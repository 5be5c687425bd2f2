use super::backend::{FsBackend, MemoryBackend, StorageBackend};
use super::error::StoreError;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use std::sync::{Condvar, Mutex, PoisonError};

/// Handle to one event's isolated storage location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespaceHandle {
    event_id: String,
    dir: PathBuf,
}

impl NamespaceHandle {
    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Maps event ids to storage locations and reads/writes whole JSON resources
/// inside them.
pub struct NamespaceStore {
    root: PathBuf,
    backend: Box<dyn StorageBackend>,
    locks: NamespaceLocks,
}

impl std::fmt::Debug for NamespaceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamespaceStore").field("root", &self.root).finish_non_exhaustive()
    }
}

impl NamespaceStore {
    /// Filesystem-backed store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_backend(root, Box::new(FsBackend))
    }

    /// Store that keeps everything in process memory.
    pub fn in_memory(root: impl Into<PathBuf>) -> Self {
        Self::with_backend(root, Box::new(MemoryBackend::new()))
    }

    pub fn with_backend(root: impl Into<PathBuf>, backend: Box<dyn StorageBackend>) -> Self {
        Self { root: root.into(), backend, locks: NamespaceLocks::default() }
    }

    /// Handle for `event_id` without touching storage.
    pub fn handle(&self, event_id: &str) -> Result<NamespaceHandle, StoreError> {
        validate_event_id(event_id)?;
        Ok(NamespaceHandle { event_id: event_id.to_string(), dir: self.root.join(event_id) })
    }

    /// Create the namespace container if needed and return its handle.
    pub fn ensure_namespace(&self, event_id: &str) -> Result<NamespaceHandle, StoreError> {
        let handle = self.handle(event_id)?;
        if !self.backend.container_exists(&handle.dir) {
            self.backend.create_container(&handle.dir)?;
            log::info!("Created namespace {}", event_id);
        }
        Ok(handle)
    }

    pub fn namespace_exists(&self, event_id: &str) -> bool {
        match self.handle(event_id) {
            Ok(handle) => self.backend.container_exists(&handle.dir),
            Err(_) => false,
        }
    }

    /// Event ids with an existing namespace. Empty when the root is missing.
    pub fn list_namespaces(&self) -> Result<Vec<String>, StoreError> {
        let mut ids = self.backend.list_containers(&self.root)?;
        ids.sort();
        Ok(ids)
    }

    /// Create a sub-container (e.g. `exports/csv`) inside the namespace.
    pub fn ensure_container(
        &self,
        handle: &NamespaceHandle,
        name: &str,
    ) -> Result<PathBuf, StoreError> {
        let path = self.resolve(handle, name)?;
        self.backend.create_container(&path)?;
        Ok(path)
    }

    pub fn exists(&self, handle: &NamespaceHandle, resource: &str) -> bool {
        match self.resolve(handle, resource) {
            Ok(path) => self.backend.resource_exists(&path),
            Err(_) => false,
        }
    }

    /// Untyped read. A resource that was never written reads as `[]`.
    pub fn read_raw(&self, handle: &NamespaceHandle, resource: &str) -> Result<Value, StoreError> {
        let path = self.resolve(handle, resource)?;
        match self.backend.read_bytes(&path)? {
            Some(bytes) => serde_json::from_slice(&bytes).map_err(|e| StoreError::Schema {
                resource: resource.to_string(),
                reason: e.to_string(),
            }),
            None => Ok(Value::Array(Vec::new())),
        }
    }

    /// Typed read. Shape mismatches surface as [`StoreError::Schema`].
    pub fn read<T: DeserializeOwned>(
        &self,
        handle: &NamespaceHandle,
        resource: &str,
    ) -> Result<T, StoreError> {
        let value = self.read_raw(handle, resource)?;
        serde_json::from_value(value).map_err(|e| StoreError::Schema {
            resource: resource.to_string(),
            reason: e.to_string(),
        })
    }

    /// Replace the resource with `value`, pretty-printed UTF-8 JSON.
    pub fn write<T: Serialize + ?Sized>(
        &self,
        handle: &NamespaceHandle,
        resource: &str,
        value: &T,
    ) -> Result<(), StoreError> {
        let path = self.resolve(handle, resource)?;
        let bytes = serde_json::to_vec_pretty(value).map_err(|source| {
            StoreError::Serialization { resource: resource.to_string(), source }
        })?;
        self.backend.write_bytes(&path, &bytes)?;

        log::debug!("Saved {} in namespace {}", resource, handle.event_id);
        Ok(())
    }

    /// Location of `name` inside the namespace. The resource may not exist.
    pub fn resource_path(&self, handle: &NamespaceHandle, name: &str) -> PathBuf {
        handle.dir.join(name)
    }

    /// Block until this caller is the only writer of the namespace.
    pub fn lock(&self, handle: &NamespaceHandle) -> NamespaceGuard<'_> {
        self.locks.acquire(&handle.event_id)
    }

    fn resolve(&self, handle: &NamespaceHandle, name: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(name);
        let is_plain = !name.is_empty()
            && relative.components().all(|c| matches!(c, Component::Normal(_)));
        if !is_plain {
            return Err(StoreError::InvalidResource { name: name.to_string() });
        }
        Ok(handle.dir.join(relative))
    }
}

fn validate_event_id(event_id: &str) -> Result<(), StoreError> {
    let mut components = Path::new(event_id).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(StoreError::InvalidNamespace { event_id: event_id.to_string() }),
    }
}

#[derive(Default)]
struct NamespaceLocks {
    held: Mutex<HashSet<String>>,
    released: Condvar,
}

impl NamespaceLocks {
    fn acquire(&self, event_id: &str) -> NamespaceGuard<'_> {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        while held.contains(event_id) {
            held = self.released.wait(held).unwrap_or_else(PoisonError::into_inner);
        }
        held.insert(event_id.to_string());
        NamespaceGuard { locks: self, event_id: event_id.to_string() }
    }
}

/// Single-writer section for one namespace, released on drop.
pub struct NamespaceGuard<'a> {
    locks: &'a NamespaceLocks,
    event_id: String,
}

impl Drop for NamespaceGuard<'_> {
    fn drop(&mut self) {
        let mut held = self.locks.held.lock().unwrap_or_else(PoisonError::into_inner);
        held.remove(&self.event_id);
        self.locks.released.notify_all();
    }
}
