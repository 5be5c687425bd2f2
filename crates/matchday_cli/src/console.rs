//! Interactive live-match console.
//!
//! Reads one command per line and drives the clock and action log of the
//! session's active match.

use crate::export::{default_export_name, export_log_csv};
use anyhow::Result;
use matchday_core::models::UnknownLabel;
use matchday_core::{
    Action, EventRegistry, ExportKind, LiveSession, Outcome, Period, SessionContext, Zone,
};
use std::io::{BufRead, Write};
use thiserror::Error;

pub const HELP: &str = "\
commands:
  start | pause | reset            clock control
  period <1|2>                     switch half
  players                          list players of the active match
  log <n> <accion> <zona> <res>    record an action for player n
                                   accion: gol tiro pase robo falta recuperacion perdida
                                   zona: defensa medio ataque   res: exito fracaso
  show                             clock and actions of this match
  export [name]                    write this match's actions to CSV
  end                              finish the match and leave
  help";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Reset,
    Period(Period),
    Players,
    Log { player: usize, accion: Action, zona: Zone, resultado: Outcome },
    Show,
    Export(Option<String>),
    End,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error(transparent)]
    Label(#[from] UnknownLabel),
}

pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&name, args)) = words.split_first() else {
        return Err(ParseError::Empty);
    };

    match (name.to_lowercase().as_str(), args) {
        ("start", []) => Ok(Command::Start),
        ("pause", []) => Ok(Command::Pause),
        ("reset", []) => Ok(Command::Reset),
        ("players", []) => Ok(Command::Players),
        ("show", []) => Ok(Command::Show),
        ("end", []) => Ok(Command::End),
        ("help", _) => Ok(Command::Help),
        ("period", [half]) => Ok(Command::Period(parse_period(half)?)),
        ("period", _) => Err(ParseError::Usage("period <1|2>")),
        ("export", []) => Ok(Command::Export(None)),
        ("export", [name]) => Ok(Command::Export(Some(name.to_string()))),
        ("log", [player, accion, zona, resultado]) => Ok(Command::Log {
            player: player
                .parse()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ParseError::Usage("log <n> <accion> <zona> <resultado>, n from 'players'"))?,
            accion: accion.parse()?,
            zona: zona.parse()?,
            resultado: resultado.parse()?,
        }),
        ("log", _) => Err(ParseError::Usage("log <n> <accion> <zona> <resultado>")),
        ("start" | "pause" | "reset" | "players" | "show" | "end" | "export", _) => {
            Err(ParseError::Usage("this command takes no arguments"))
        }
        (other, _) => Err(ParseError::Unknown(other.to_string())),
    }
}

fn parse_period(raw: &str) -> Result<Period, UnknownLabel> {
    match raw {
        "1" => Ok(Period::FirstHalf),
        "2" => Ok(Period::SecondHalf),
        other => other.parse(),
    }
}

/// Drives one live match from `input` until `end` or end of input.
pub struct Console<'a, 's> {
    registry: &'a EventRegistry<'s>,
    session: &'a LiveSession<'s>,
    ctx: &'a mut SessionContext,
}

impl<'a, 's> Console<'a, 's> {
    pub fn new(
        registry: &'a EventRegistry<'s>,
        session: &'a LiveSession<'s>,
        ctx: &'a mut SessionContext,
    ) -> Self {
        Self { registry, session, ctx }
    }

    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        let fixture = self.ctx.active_match()?.label();
        writeln!(out, "Live: {}", fixture)?;
        writeln!(out, "Type 'help' for commands.")?;

        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let command = match parse_command(&line) {
                Ok(command) => command,
                Err(e) => {
                    writeln!(out, "error: {}", e)?;
                    continue;
                }
            };

            if command == Command::End {
                self.session.end_session(self.ctx);
                writeln!(out, "Match finished.")?;
                break;
            }

            if let Err(e) = self.execute(command, out) {
                writeln!(out, "error: {:#}", e)?;
            }
        }

        Ok(())
    }

    fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> Result<()> {
        match command {
            Command::Start => self.session.start(self.ctx)?,
            Command::Pause => self.session.pause(self.ctx)?,
            Command::Reset => self.session.reset(self.ctx),
            Command::Period(period) => self.session.set_period(self.ctx, period),
            Command::Help => {
                writeln!(out, "{}", HELP)?;
                return Ok(());
            }
            Command::Players => {
                for (i, name) in self.session.eligible_players(self.ctx)?.iter().enumerate() {
                    writeln!(out, "{:>3}  {}", i + 1, name)?;
                }
                return Ok(());
            }
            Command::Log { player, accion, zona, resultado } => {
                let players = self.session.eligible_players(self.ctx)?;
                let Some(jugador) = players.get(player - 1) else {
                    anyhow::bail!("no player #{} ({} available)", player, players.len());
                };
                let entry = self.session.log_action(self.ctx, jugador, accion, zona, resultado)?;
                writeln!(
                    out,
                    "logged {} {} {} {} {}",
                    entry.tiempo, entry.jugador, entry.accion, entry.zona, entry.resultado
                )?;
                return Ok(());
            }
            Command::Show => {
                for entry in self.session.entries_for_active_match(self.ctx)? {
                    writeln!(
                        out,
                        "{:<10} {}  {:<28} {:<13} {:<8} {}",
                        entry.periodo,
                        entry.tiempo,
                        entry.jugador,
                        entry.accion,
                        entry.zona,
                        entry.resultado
                    )?;
                }
            }
            Command::Export(name) => {
                let handle = self.registry.active(self.ctx)?;
                let name = name.unwrap_or_else(|| {
                    default_export_name(handle.event_id(), chrono::Local::now().naive_local())
                });
                let path = self.registry.export_path(&handle, ExportKind::Csv, &name)?;
                let rows = export_log_csv(&path, &self.session.entries_for_active_match(self.ctx)?)?;
                writeln!(out, "CSV saved to: {} ({} rows)", path.display(), rows)?;
                return Ok(());
            }
            Command::End => {}
        }

        let clock = self.session.snapshot(self.ctx);
        let state = if clock.running { "running" } else { "stopped" };
        writeln!(out, "[{} {}] {}", clock.display, clock.period, state)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use matchday_core::{MatchRequest, MatchScheduler, NamespaceStore, PlayerRequest, RosterManager};
    use std::io::Cursor;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command(" START ").unwrap(), Command::Start);
        assert_eq!(parse_command("period 2").unwrap(), Command::Period(Period::SecondHalf));
        assert_eq!(
            parse_command("log 3 recuperacion medio exito").unwrap(),
            Command::Log {
                player: 3,
                accion: Action::Recovery,
                zona: Zone::Midfield,
                resultado: Outcome::Success
            }
        );
        assert_eq!(parse_command("export final").unwrap(), Command::Export(Some("final".into())));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_command("   "), Err(ParseError::Empty));
        assert!(matches!(parse_command("kickoff"), Err(ParseError::Unknown(_))));
        assert!(matches!(parse_command("log 0 gol ataque exito"), Err(ParseError::Usage(_))));
        assert!(matches!(parse_command("log 1 penal ataque exito"), Err(ParseError::Label(_))));
        assert!(matches!(parse_command("pause now"), Err(ParseError::Usage(_))));
    }

    #[test]
    fn test_scripted_session() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let store = NamespaceStore::new(temp_dir.path());
        let registry = EventRegistry::new(&store);
        let scheduler = MatchScheduler::new(&store);
        let roster = RosterManager::new(&store);
        let mut ctx = SessionContext::new();

        registry.create_event("EVT0001", None).unwrap();
        let handle = registry.load_event(&mut ctx, "EVT0001").unwrap();
        let request = MatchRequest {
            fecha: NaiveDate::from_ymd_opt(2025, 6, 1),
            hora: NaiveTime::from_hms_opt(18, 0, 0),
            local: "River".into(),
            visitante: "Boca".into(),
            competicion: "Liga".into(),
            cancha: "Monumental".into(),
        };
        scheduler.add_match(&handle, &request).unwrap();
        scheduler.select_match(&mut ctx, &handle, 0).unwrap();
        let player = PlayerRequest {
            nombre: "Enzo".into(),
            dorsal: "10".into(),
            posicion: "Delantero".into(),
            equipo: "River".into(),
        };
        roster.add_player(&handle, &ctx.team_scope(), &player).unwrap();

        let session = LiveSession::new(&store);
        let script = "players\nstart\nlog 1 gol ataque exito\nlog 2 gol ataque exito\nbogus\nexport ../outside\nexport final\nend\nstart\n";
        let mut out = Vec::new();
        Console::new(&registry, &session, &mut ctx).run(Cursor::new(script), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("  1  Enzo (River)"));
        assert!(text.contains("logged 00:00 Enzo (River) Gol Ataque Éxito"));
        assert!(text.contains("error: no player #2"));
        assert!(text.contains("error: unknown command 'bogus'"));
        assert!(text.contains("error: Storage error: Invalid resource name: ../outside"));
        assert!(!temp_dir.path().join("EVT0001/exports/outside.csv").exists());
        assert!(text.contains("Match finished."));
        assert!(temp_dir.path().join("EVT0001/exports/csv/final.csv").is_file());
        // input after 'end' is not consumed as commands
        assert!(ctx.active_match.is_none());
        assert!(!ctx.clock.is_running());
        assert_eq!(session.event_log(&ctx).unwrap().len(), 1);
    }
}
