//! Event registry
//!
//! Creates events (one namespace each), lists them and marks one as active.

use crate::context::SessionContext;
use crate::error::{CoreError, Result, ValidationErrors, Violation};
use crate::models::{EventMeta, Match};
use crate::store::{NamespaceHandle, NamespaceStore, StoreError};
use std::path::{Component, Path, PathBuf};

pub const EVENT_ID_LEN: usize = 7;

pub const META_FILE: &str = "meta.json";
pub const MATCHES_FILE: &str = "partidos.json";
pub const ROSTER_FILE: &str = "plantilla.json";
pub const EVENTS_LOG_FILE: &str = "events_log.json";

pub const CSV_EXPORT_DIR: &str = "exports/csv";
pub const PDF_EXPORT_DIR: &str = "exports/pdf";

pub type EventHandle = NamespaceHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Csv,
    Pdf,
}

impl ExportKind {
    fn dir(self) -> &'static str {
        match self {
            ExportKind::Csv => CSV_EXPORT_DIR,
            ExportKind::Pdf => PDF_EXPORT_DIR,
        }
    }

    fn extension(self) -> &'static str {
        match self {
            ExportKind::Csv => "csv",
            ExportKind::Pdf => "pdf",
        }
    }
}

pub struct EventRegistry<'s> {
    store: &'s NamespaceStore,
}

impl<'s> EventRegistry<'s> {
    pub fn new(store: &'s NamespaceStore) -> Self {
        Self { store }
    }

    /// Create the event namespace and its base resources.
    ///
    /// Safe to call again: an existing match list is kept, `meta` is
    /// replaced only when one is given.
    pub fn create_event(&self, event_id: &str, meta: Option<&EventMeta>) -> Result<EventHandle> {
        let mut errors = ValidationErrors::new();
        let len = event_id.chars().count();
        if len != EVENT_ID_LEN {
            errors.push(Violation::EventIdLength(len));
        }
        if !event_id.is_empty() && !is_single_name(event_id) {
            errors.push(Violation::InvalidEventId(event_id.to_string()));
        }
        errors.into_result()?;

        let handle = self.store.ensure_namespace(event_id)?;
        let _guard = self.store.lock(&handle);

        self.store.ensure_container(&handle, CSV_EXPORT_DIR)?;
        self.store.ensure_container(&handle, PDF_EXPORT_DIR)?;

        if !self.store.exists(&handle, MATCHES_FILE) {
            self.store.write(&handle, MATCHES_FILE, &Vec::<Match>::new())?;
        }

        if let Some(meta) = meta {
            self.store.write(&handle, META_FILE, meta)?;
        }

        log::info!("Event {} ready", event_id);
        Ok(handle)
    }

    pub fn list_events(&self) -> Result<Vec<String>> {
        Ok(self.store.list_namespaces()?)
    }

    /// Mark `event_id` as the active event. Does not check that it exists.
    pub fn load_event(&self, ctx: &mut SessionContext, event_id: &str) -> Result<EventHandle> {
        let handle = self.store.handle(event_id)?;
        ctx.activate_event(event_id);
        log::info!("Event {} loaded", event_id);
        Ok(handle)
    }

    /// Like [`Self::load_event`], but fails for an event that was never created.
    pub fn load_event_checked(
        &self,
        ctx: &mut SessionContext,
        event_id: &str,
    ) -> Result<EventHandle> {
        if !self.store.namespace_exists(event_id) {
            return Err(CoreError::NotFound(format!("event {}", event_id)));
        }
        self.load_event(ctx, event_id)
    }

    /// Handle of the active event.
    pub fn active(&self, ctx: &SessionContext) -> Result<EventHandle> {
        Ok(self.store.handle(ctx.active_event()?)?)
    }

    pub fn read_meta(&self, handle: &EventHandle) -> Result<Option<EventMeta>> {
        if !self.store.exists(handle, META_FILE) {
            return Ok(None);
        }
        Ok(Some(self.store.read(handle, META_FILE)?))
    }

    /// Where an exporter should write `<name>.csv` / `<name>.pdf`.
    ///
    /// `name` must be a bare file stem; anything that could leave the
    /// export folder is rejected.
    pub fn export_path(&self, handle: &EventHandle, kind: ExportKind, name: &str) -> Result<PathBuf> {
        if !is_single_name(name) {
            return Err(StoreError::InvalidResource { name: name.to_string() }.into());
        }
        let resource = format!("{}/{}.{}", kind.dir(), name, kind.extension());
        Ok(self.store.resource_path(handle, &resource))
    }
}

/// One plain path component: no separators, not `.` or `..`.
fn is_single_name(name: &str) -> bool {
    if name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!((components.next(), components.next()), (Some(Component::Normal(_)), None))
}
