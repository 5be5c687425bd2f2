use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form event metadata stored in `meta.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventMeta {
    #[serde(default)]
    pub name: Option<String>,

    /// Start date as typed by the user, usually `DD/MM/YYYY`
    #[serde(default)]
    pub start: Option<String>,

    #[serde(default)]
    pub end: Option<String>,

    /// Any other fields; kept untouched on rewrite
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EventMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), ..Self::default() }
    }

    pub fn with_dates(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self.end = Some(end.into());
        self
    }
}
