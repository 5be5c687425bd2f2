//! Match scheduler: the event's ordered fixture list.

use crate::context::SessionContext;
use crate::error::{CoreError, Result, ValidationErrors, Violation};
use crate::models::Match;
use crate::registry::{EventHandle, MATCHES_FILE};
use crate::store::NamespaceStore;
use chrono::{NaiveDate, NaiveTime};

pub const DATE_FORMAT: &str = "%d/%m/%Y";
pub const TIME_FORMAT: &str = "%H:%M";

/// Form input for a new match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchRequest {
    pub fecha: Option<NaiveDate>,
    pub hora: Option<NaiveTime>,
    pub local: String,
    pub visitante: String,
    pub competicion: String,
    pub cancha: String,
}

pub struct MatchScheduler<'s> {
    store: &'s NamespaceStore,
}

impl<'s> MatchScheduler<'s> {
    pub fn new(store: &'s NamespaceStore) -> Self {
        Self { store }
    }

    pub fn list_matches(&self, handle: &EventHandle) -> Result<Vec<Match>> {
        Ok(self.store.read(handle, MATCHES_FILE)?)
    }

    /// Validate and append a match, rewriting the whole list.
    ///
    /// `local` and `visitante` are compared as typed, before trimming: names
    /// differing only in surrounding whitespace or case count as different
    /// teams. Stored names are trimmed.
    pub fn add_match(&self, handle: &EventHandle, request: &MatchRequest) -> Result<Match> {
        let fixture = validate_match(request)?;

        let _guard = self.store.lock(handle);
        let mut matches = self.list_matches(handle)?;
        matches.push(fixture.clone());
        self.store.write(handle, MATCHES_FILE, &matches)?;

        log::info!("Scheduled {}", fixture.label());
        Ok(fixture)
    }

    /// Select the match at `index` (0-based) as the session's active match.
    pub fn select_match(
        &self,
        ctx: &mut SessionContext,
        handle: &EventHandle,
        index: usize,
    ) -> Result<Match> {
        let fixture = self
            .list_matches(handle)?
            .into_iter()
            .nth(index)
            .ok_or_else(|| CoreError::NotFound(format!("match #{}", index)))?;

        ctx.active_match = Some(fixture.clone());
        log::debug!("Selected match {}", fixture.label());
        Ok(fixture)
    }
}

fn validate_match(request: &MatchRequest) -> std::result::Result<Match, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if request.local == request.visitante {
        errors.push(Violation::SameTeams);
    }

    let kickoff = request.fecha.zip(request.hora);
    if kickoff.is_none() {
        errors.push(Violation::MissingKickoff);
    }

    if request.local.trim().is_empty() || request.visitante.trim().is_empty() {
        errors.push(Violation::MissingTeams);
    }

    errors.into_result()?;
    let (fecha, hora) = kickoff.ok_or(Violation::MissingKickoff)?;

    Ok(Match {
        fecha: fecha.format(DATE_FORMAT).to_string(),
        hora: hora.format(TIME_FORMAT).to_string(),
        local: request.local.trim().to_string(),
        visitante: request.visitante.trim().to_string(),
        competicion: request.competicion.trim().to_string(),
        cancha: request.cancha.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(local: &str, visitante: &str) -> MatchRequest {
        MatchRequest {
            fecha: NaiveDate::from_ymd_opt(2025, 6, 1),
            hora: NaiveTime::from_hms_opt(18, 0, 0),
            local: local.to_string(),
            visitante: visitante.to_string(),
            competicion: "Liga".to_string(),
            cancha: "Monumental".to_string(),
        }
    }

    fn setup() -> (NamespaceStore, EventHandle) {
        let store = NamespaceStore::in_memory("/events");
        let handle = store.ensure_namespace("EVT0001").unwrap();
        (store, handle)
    }

    #[test]
    fn test_add_formats_and_appends() {
        let (store, handle) = setup();
        let scheduler = MatchScheduler::new(&store);

        scheduler.add_match(&handle, &request("River", "Boca")).unwrap();
        let second = scheduler.add_match(&handle, &request(" Racing ", "Boca")).unwrap();

        assert_eq!(second.fecha, "01/06/2025");
        assert_eq!(second.hora, "18:00");
        assert_eq!(second.local, "Racing");

        let all = scheduler.list_matches(&handle).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].local, "River");
    }

    #[test]
    fn test_same_team_rejected_exact_only() {
        let (store, handle) = setup();
        let scheduler = MatchScheduler::new(&store);

        let err = scheduler.add_match(&handle, &request("River", "River")).unwrap_err();
        assert_eq!(err.violations(), &[Violation::SameTeams]);

        // differs by case or whitespace: accepted as different teams
        assert!(scheduler.add_match(&handle, &request("River", "river")).is_ok());
        assert!(scheduler.add_match(&handle, &request("River", "River ")).is_ok());
    }

    #[test]
    fn test_violations_accumulate() {
        let (store, handle) = setup();
        let scheduler = MatchScheduler::new(&store);
        let mut bad = request("  ", "  ");
        bad.hora = None;

        let err = scheduler.add_match(&handle, &bad).unwrap_err();
        assert_eq!(
            err.violations(),
            &[Violation::SameTeams, Violation::MissingKickoff, Violation::MissingTeams]
        );
        assert!(scheduler.list_matches(&handle).unwrap().is_empty());
    }

    #[test]
    fn test_select_match() {
        let (store, handle) = setup();
        let scheduler = MatchScheduler::new(&store);
        let mut ctx = SessionContext::new();
        scheduler.add_match(&handle, &request("River", "Boca")).unwrap();
        scheduler.add_match(&handle, &request("Racing", "Independiente")).unwrap();

        let selected = scheduler.select_match(&mut ctx, &handle, 1).unwrap();
        assert_eq!(selected.local, "Racing");
        assert_eq!(ctx.active_match, Some(selected));

        let err = scheduler.select_match(&mut ctx, &handle, 2).unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
        assert_eq!(ctx.active_match.as_ref().map(|m| m.local.as_str()), Some("Racing"));
    }
}
