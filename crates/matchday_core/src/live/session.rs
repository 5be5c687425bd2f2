use super::clock::{format_clock, ClockSnapshot, InvalidTransition, SystemTimeSource, TimeSource};
use crate::context::SessionContext;
use crate::error::Result;
use crate::models::{Action, LogEntry, Outcome, Period, Zone};
use crate::registry::{EventHandle, EVENTS_LOG_FILE};
use crate::roster::RosterManager;
use crate::store::NamespaceStore;
use std::sync::Arc;
use std::time::Duration;

/// Clock control and action logging for the session's active match.
///
/// Clock state lives in the caller's [`SessionContext`]; this type only adds
/// a time source and access to the event's storage.
pub struct LiveSession<'s> {
    store: &'s NamespaceStore,
    time: Arc<dyn TimeSource>,
}

impl<'s> LiveSession<'s> {
    pub fn new(store: &'s NamespaceStore) -> Self {
        Self::with_time_source(store, Arc::new(SystemTimeSource))
    }

    pub fn with_time_source(store: &'s NamespaceStore, time: Arc<dyn TimeSource>) -> Self {
        Self { store, time }
    }

    pub fn start(&self, ctx: &mut SessionContext) -> std::result::Result<(), InvalidTransition> {
        ctx.clock.start(self.time.now())?;
        log::debug!("Clock started");
        Ok(())
    }

    pub fn pause(&self, ctx: &mut SessionContext) -> std::result::Result<(), InvalidTransition> {
        ctx.clock.pause(self.time.now())?;
        log::debug!("Clock paused at {}", format_clock(ctx.clock.elapsed_at(self.time.now())));
        Ok(())
    }

    pub fn reset(&self, ctx: &mut SessionContext) {
        ctx.clock.reset();
        log::debug!("Clock reset");
    }

    pub fn set_period(&self, ctx: &mut SessionContext, period: Period) {
        ctx.clock.set_period(period);
    }

    pub fn current_elapsed(&self, ctx: &SessionContext) -> Duration {
        ctx.clock.elapsed_at(self.time.now())
    }

    pub fn snapshot(&self, ctx: &SessionContext) -> ClockSnapshot {
        ctx.clock.snapshot(self.time.now())
    }

    /// `"<nombre> (<equipo>)"` for every player of the active match, home side first.
    pub fn eligible_players(&self, ctx: &SessionContext) -> Result<Vec<String>> {
        let handle = self.active_handle(ctx)?;
        let fixture = ctx.active_match()?;
        let roster = RosterManager::new(self.store);

        let mut players = roster.list_by_team(&handle, &[&fixture.local])?;
        players.extend(roster.list_by_team(&handle, &[&fixture.visitante])?);
        Ok(players.iter().map(|p| p.display_name()).collect())
    }

    /// Record an action at the current clock time.
    ///
    /// The whole log is rewritten before this returns. The clock does not
    /// need to be running.
    pub fn log_action(
        &self,
        ctx: &SessionContext,
        jugador: &str,
        accion: Action,
        zona: Zone,
        resultado: Outcome,
    ) -> Result<LogEntry> {
        let handle = self.active_handle(ctx)?;
        let fixture = ctx.active_match()?;

        let entry = LogEntry {
            periodo: ctx.clock.period(),
            tiempo: format_clock(self.current_elapsed(ctx)),
            jugador: jugador.to_string(),
            accion,
            zona,
            resultado,
            timestamp: self.time.wall_clock(),
            match_ref: Some(fixture.reference()),
        };

        let _guard = self.store.lock(&handle);
        let mut entries = self.read_log(&handle)?;
        entries.push(entry.clone());
        self.store.write(&handle, EVENTS_LOG_FILE, &entries)?;

        log::info!("{} {} {} by {}", entry.tiempo, entry.accion, entry.resultado, entry.jugador);
        Ok(entry)
    }

    /// Every entry of the active event's log, all matches included.
    pub fn event_log(&self, ctx: &SessionContext) -> Result<Vec<LogEntry>> {
        let handle = self.active_handle(ctx)?;
        self.read_log(&handle)
    }

    /// Entries recorded for the active match.
    pub fn entries_for_active_match(&self, ctx: &SessionContext) -> Result<Vec<LogEntry>> {
        let fixture = ctx.active_match()?;
        Ok(self
            .event_log(ctx)?
            .into_iter()
            .filter(|e| e.match_ref.as_ref().is_some_and(|r| r.refers_to(fixture)))
            .collect())
    }

    /// Leave the match: drops the active match and clock. The log stays on disk.
    pub fn end_session(&self, ctx: &mut SessionContext) {
        ctx.active_match = None;
        ctx.clock = Default::default();
        log::info!("Match session ended");
    }

    fn active_handle(&self, ctx: &SessionContext) -> Result<EventHandle> {
        Ok(self.store.handle(ctx.active_event()?)?)
    }

    fn read_log(&self, handle: &EventHandle) -> Result<Vec<LogEntry>> {
        Ok(self.store.read(handle, EVENTS_LOG_FILE)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::live::ManualTimeSource;
    use crate::models::Match;
    use crate::roster::PlayerRequest;
    use chrono::NaiveDate;

    fn fixture(local: &str, visitante: &str) -> Match {
        Match {
            fecha: "01/06/2025".to_string(),
            hora: "18:00".to_string(),
            local: local.to_string(),
            visitante: visitante.to_string(),
            competicion: "Liga".to_string(),
            cancha: "Monumental".to_string(),
        }
    }

    fn setup() -> (NamespaceStore, Arc<ManualTimeSource>, SessionContext) {
        let store = NamespaceStore::in_memory("/events");
        store.ensure_namespace("EVT0001").unwrap();
        let wall = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap().and_hms_opt(18, 0, 0).unwrap();
        let mut ctx = SessionContext::new();
        ctx.activate_event("EVT0001");
        ctx.active_match = Some(fixture("River", "Boca"));
        (store, Arc::new(ManualTimeSource::new(wall)), ctx)
    }

    #[test]
    fn test_log_captures_clock_period_and_match() {
        let (store, time, mut ctx) = setup();
        let session = LiveSession::with_time_source(&store, time.clone());

        session.start(&mut ctx).unwrap();
        time.advance(Duration::from_secs(65));
        session.set_period(&mut ctx, Period::SecondHalf);

        let entry = session
            .log_action(&ctx, "Enzo (River)", Action::Shot, Zone::Attack, Outcome::Failure)
            .unwrap();

        assert_eq!(entry.tiempo, "01:05");
        assert_eq!(entry.periodo, Period::SecondHalf);
        assert_eq!(entry.timestamp.format("%H:%M:%S").to_string(), "18:01:05");
        assert_eq!(entry.match_ref, Some(fixture("River", "Boca").reference()));
        assert!(ctx.clock.is_running());
        assert_eq!(session.event_log(&ctx).unwrap(), vec![entry]);
    }

    #[test]
    fn test_log_without_running_clock() {
        let (store, time, ctx) = setup();
        let session = LiveSession::with_time_source(&store, time);

        let entry = session
            .log_action(&ctx, "Enzo (River)", Action::Pass, Zone::Midfield, Outcome::Success)
            .unwrap();
        assert_eq!(entry.tiempo, "00:00");
    }

    #[test]
    fn test_log_requires_active_match() {
        let (store, time, mut ctx) = setup();
        let session = LiveSession::with_time_source(&store, time);
        ctx.active_match = None;

        assert!(session
            .log_action(&ctx, "x", Action::Goal, Zone::Attack, Outcome::Success)
            .is_err());
        ctx.active_event_id = None;
        assert!(session.event_log(&ctx).is_err());
    }

    #[test]
    fn test_entries_filtered_by_match() {
        let (store, time, mut ctx) = setup();
        let session = LiveSession::with_time_source(&store, time);

        session.log_action(&ctx, "a", Action::Goal, Zone::Attack, Outcome::Success).unwrap();
        ctx.active_match = Some(fixture("Racing", "Independiente"));
        session.log_action(&ctx, "b", Action::Foul, Zone::Defense, Outcome::Failure).unwrap();

        let here = session.entries_for_active_match(&ctx).unwrap();
        assert_eq!(here.len(), 1);
        assert_eq!(here[0].jugador, "b");
        assert_eq!(session.event_log(&ctx).unwrap().len(), 2);
    }

    #[test]
    fn test_same_kickoff_other_competition_has_own_log() {
        let (store, time, mut ctx) = setup();
        let session = LiveSession::with_time_source(&store, time);

        session.log_action(&ctx, "a", Action::Goal, Zone::Attack, Outcome::Success).unwrap();

        let mut copa = fixture("River", "Boca");
        copa.competicion = "Copa".to_string();
        ctx.active_match = Some(copa);
        assert!(session.entries_for_active_match(&ctx).unwrap().is_empty());
    }

    #[test]
    fn test_eligible_players_home_first() {
        let (store, time, ctx) = setup();
        let handle = store.handle("EVT0001").unwrap();
        let roster = RosterManager::new(&store);
        let no_scope: [&str; 0] = [];
        for (nombre, equipo) in [("Chiquito", "Boca"), ("Enzo", "River"), ("Otro", "Racing")] {
            let request = PlayerRequest {
                nombre: nombre.to_string(),
                dorsal: "1".to_string(),
                posicion: "Defensa".to_string(),
                equipo: equipo.to_string(),
            };
            roster.add_player(&handle, &no_scope, &request).unwrap();
        }

        let session = LiveSession::with_time_source(&store, time);
        assert_eq!(
            session.eligible_players(&ctx).unwrap(),
            vec!["Enzo (River)".to_string(), "Chiquito (Boca)".to_string()]
        );
    }

    #[test]
    fn test_end_session_keeps_log() {
        let (store, time, mut ctx) = setup();
        let session = LiveSession::with_time_source(&store, time.clone());
        session.start(&mut ctx).unwrap();
        time.advance(Duration::from_secs(30));
        session.log_action(&ctx, "a", Action::Goal, Zone::Attack, Outcome::Success).unwrap();

        session.end_session(&mut ctx);

        assert!(ctx.active_match.is_none());
        assert!(!ctx.clock.is_running());
        assert_eq!(session.current_elapsed(&ctx), Duration::ZERO);
        assert_eq!(session.event_log(&ctx).unwrap().len(), 1);
    }
}
