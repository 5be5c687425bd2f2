//! Caller-owned session state.
//!
//! The UI layer keeps one `SessionContext` per user session and passes it into
//! every component call. Nothing in this crate holds session state globally.

use crate::error::{CoreError, Result};
use crate::live::ClockState;
use crate::models::Match;

#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub active_event_id: Option<String>,
    /// Copy of the selected match; not refreshed when `partidos.json` changes
    pub active_match: Option<Match>,
    pub clock: ClockState,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch the active event. A different event drops the selected match and clock.
    pub fn activate_event(&mut self, event_id: &str) {
        if self.active_event_id.as_deref() != Some(event_id) {
            self.active_match = None;
            self.clock = ClockState::default();
        }
        self.active_event_id = Some(event_id.to_string());
    }

    pub fn active_event(&self) -> Result<&str> {
        self.active_event_id
            .as_deref()
            .ok_or_else(|| CoreError::NotFound("no active event".to_string()))
    }

    pub fn active_match(&self) -> Result<&Match> {
        self.active_match
            .as_ref()
            .ok_or_else(|| CoreError::NotFound("no active match".to_string()))
    }

    /// Trimmed team names of the active match; empty when none is selected.
    pub fn team_scope(&self) -> Vec<String> {
        self.active_match
            .as_ref()
            .map(|m| m.teams().iter().map(|t| t.trim().to_string()).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_match() -> Match {
        Match {
            fecha: "01/06/2025".to_string(),
            hora: "18:00".to_string(),
            local: "River".to_string(),
            visitante: "Boca".to_string(),
            competicion: "Liga".to_string(),
            cancha: "Monumental".to_string(),
        }
    }

    #[test]
    fn test_switching_event_drops_match() {
        let mut ctx = SessionContext::new();
        ctx.activate_event("EVT0001");
        ctx.active_match = Some(sample_match());

        ctx.activate_event("EVT0001");
        assert!(ctx.active_match.is_some());

        ctx.activate_event("EVT0002");
        assert!(ctx.active_match.is_none());
        assert!(ctx.team_scope().is_empty());
    }

    #[test]
    fn test_missing_context_is_not_found() {
        let ctx = SessionContext::new();
        assert!(matches!(ctx.active_event(), Err(CoreError::NotFound(_))));
        assert!(matches!(ctx.active_match(), Err(CoreError::NotFound(_))));
    }
}
