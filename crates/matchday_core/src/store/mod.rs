// Namespace store: one isolated directory per event, whole-resource JSON
// rewrites with atomic replace.

pub mod backend;
pub mod error;
pub mod namespace;

pub use backend::{FsBackend, MemoryBackend, StorageBackend};
pub use error::StoreError;
pub use namespace::{NamespaceGuard, NamespaceHandle, NamespaceStore};
