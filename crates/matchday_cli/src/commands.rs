//! Subcommand handlers.

use crate::cli::{Commands, EventCommand, LogCommand, MatchCommand, PlayerCommand};
use crate::console::Console;
use crate::export::{default_export_name, export_log_csv};
use anyhow::{bail, Context, Result};
use matchday_core::{
    EventHandle, EventMeta, EventRegistry, ExportKind, LiveSession, LogEntry, MatchRequest,
    MatchScheduler, NamespaceStore, PlayerRequest, RosterManager, SessionContext,
};
use std::io::{BufRead, Write};

/// Run one subcommand against `store`. `input` feeds the live console.
pub fn run<R: BufRead, W: Write>(
    command: Commands,
    store: &NamespaceStore,
    input: R,
    out: &mut W,
) -> Result<()> {
    let app = App::new(store);

    match command {
        Commands::Event(cmd) => app.event(cmd, out),
        Commands::Match(cmd) => app.fixture(cmd, out),
        Commands::Player(cmd) => app.player(cmd, out),
        Commands::Log(cmd) => app.log(cmd, out),
        Commands::Live { event, match_no } => {
            let (_, mut ctx) = app.open(&event, Some(match_no))?;
            let session = LiveSession::new(store);
            Console::new(&app.registry, &session, &mut ctx).run(input, out)
        }
    }
}

struct App<'s> {
    store: &'s NamespaceStore,
    registry: EventRegistry<'s>,
    scheduler: MatchScheduler<'s>,
    roster: RosterManager<'s>,
}

impl<'s> App<'s> {
    fn new(store: &'s NamespaceStore) -> Self {
        Self {
            store,
            registry: EventRegistry::new(store),
            scheduler: MatchScheduler::new(store),
            roster: RosterManager::new(store),
        }
    }

    /// Load an existing event and, if given, select match `match_no` (1-based).
    fn open(&self, event: &str, match_no: Option<usize>) -> Result<(EventHandle, SessionContext)> {
        let mut ctx = SessionContext::new();
        let handle = self
            .registry
            .load_event_checked(&mut ctx, event)
            .with_context(|| format!("Cannot open event {}", event))?;

        if let Some(no) = match_no {
            if no == 0 {
                bail!("Match numbers start at 1");
            }
            self.scheduler
                .select_match(&mut ctx, &handle, no - 1)
                .with_context(|| format!("Event {} has no match {}", event, no))?;
        }

        Ok((handle, ctx))
    }

    fn event<W: Write>(&self, cmd: EventCommand, out: &mut W) -> Result<()> {
        match cmd {
            EventCommand::Create { id, name, start, end } => {
                let meta = (name.is_some() || start.is_some() || end.is_some())
                    .then(|| EventMeta { name, start, end, ..EventMeta::default() });
                self.registry.create_event(&id, meta.as_ref())?;
                writeln!(out, "Event {} ready", id)?;
            }
            EventCommand::List => {
                for id in self.registry.list_events()? {
                    writeln!(out, "{}", id)?;
                }
            }
            EventCommand::Show { id } => {
                let (handle, ctx) = self.open(&id, None)?;
                let meta = self.registry.read_meta(&handle)?.unwrap_or_default();
                writeln!(out, "Event:   {}", id)?;
                writeln!(out, "Name:    {}", meta.name.as_deref().unwrap_or("-"))?;
                writeln!(
                    out,
                    "Dates:   {} - {}",
                    meta.start.as_deref().unwrap_or("?"),
                    meta.end.as_deref().unwrap_or("?")
                )?;
                writeln!(out, "Matches: {}", self.scheduler.list_matches(&handle)?.len())?;
                writeln!(out, "Players: {}", self.roster.list_players(&handle)?.len())?;
                writeln!(out, "Teams:   {}", self.roster.team_names(&handle)?.join(", "))?;
                writeln!(out, "Actions: {}", LiveSession::new(self.store).event_log(&ctx)?.len())?;
            }
        }
        Ok(())
    }

    fn fixture<W: Write>(&self, cmd: MatchCommand, out: &mut W) -> Result<()> {
        match cmd {
            MatchCommand::Add { event, fecha, hora, local, visitante, competicion, cancha } => {
                let (handle, _) = self.open(&event, None)?;
                let request = MatchRequest { fecha, hora, local, visitante, competicion, cancha };
                let added = self.scheduler.add_match(&handle, &request)?;
                writeln!(out, "Added: {}", added.label())?;
            }
            MatchCommand::List { event } => {
                let (handle, _) = self.open(&event, None)?;
                for (i, m) in self.scheduler.list_matches(&handle)?.iter().enumerate() {
                    writeln!(out, "{:>3}  {}", i + 1, m.label())?;
                }
            }
        }
        Ok(())
    }

    fn player<W: Write>(&self, cmd: PlayerCommand, out: &mut W) -> Result<()> {
        match cmd {
            PlayerCommand::Add { event, match_no, nombre, dorsal, posicion, equipo } => {
                let (handle, ctx) = self.open(&event, match_no)?;
                let request = PlayerRequest { nombre, dorsal, posicion, equipo };
                let player = self.roster.add_player(&handle, &ctx.team_scope(), &request)?;
                writeln!(out, "Added: #{} {} ({})", player.dorsal, player.display_name(), player.posicion)?;
            }
            PlayerCommand::List { event, match_no: None } => {
                let (handle, _) = self.open(&event, None)?;
                for (i, p) in self.roster.list_players(&handle)?.iter().enumerate() {
                    writeln!(out, "{:>3}  #{:<3} {:<30} {}", i + 1, p.dorsal, p.display_name(), p.posicion)?;
                }
            }
            PlayerCommand::List { event, match_no: Some(no) } => {
                let (handle, ctx) = self.open(&event, Some(no))?;
                let fixture = ctx.active_match()?;
                let (local, visitante) = self.roster.list_for_match(&handle, fixture)?;
                for (team, players) in [(&fixture.local, local), (&fixture.visitante, visitante)] {
                    writeln!(out, "{}", team)?;
                    for p in players {
                        writeln!(out, "  #{:<3} {:<24} {}", p.dorsal, p.nombre, p.posicion)?;
                    }
                }
            }
            PlayerCommand::Remove { event, index } => {
                let (handle, _) = self.open(&event, None)?;
                let players = self.roster.list_players(&handle)?;
                let Some(player) = index.checked_sub(1).and_then(|i| players.get(i)) else {
                    bail!("No player number {} ({} in roster)", index, players.len());
                };
                if self.roster.remove_player(&handle, player)? {
                    writeln!(out, "Removed: {}", player.display_name())?;
                }
            }
        }
        Ok(())
    }

    fn log<W: Write>(&self, cmd: LogCommand, out: &mut W) -> Result<()> {
        match cmd {
            LogCommand::List { event, match_no } => {
                for entry in self.entries(&event, match_no)? {
                    writeln!(
                        out,
                        "{}  {:<10} {}  {:<28} {:<13} {:<8} {}",
                        entry.timestamp_text(),
                        entry.periodo,
                        entry.tiempo,
                        entry.jugador,
                        entry.accion,
                        entry.zona,
                        entry.resultado
                    )?;
                }
            }
            LogCommand::Export { event, name, match_no } => {
                let entries = self.entries(&event, match_no)?;
                let handle = self.store.handle(&event)?;
                let name = name.unwrap_or_else(|| {
                    default_export_name(&event, chrono::Local::now().naive_local())
                });

                let csv_path = self.registry.export_path(&handle, ExportKind::Csv, &name)?;
                let rows = export_log_csv(&csv_path, &entries)?;
                writeln!(out, "CSV saved to: {} ({} rows)", csv_path.display(), rows)?;

                let pdf_path = self.registry.export_path(&handle, ExportKind::Pdf, &name)?;
                writeln!(out, "PDF reports go to: {}", pdf_path.display())?;
            }
        }
        Ok(())
    }

    fn entries(&self, event: &str, match_no: Option<usize>) -> Result<Vec<LogEntry>> {
        let (_, ctx) = self.open(event, match_no)?;
        let session = LiveSession::new(self.store);
        let entries = match match_no {
            Some(_) => session.entries_for_active_match(&ctx)?,
            None => session.event_log(&ctx)?,
        };
        Ok(entries)
    }
}
