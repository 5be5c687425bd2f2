//! Command line definition.

use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use matchday_core::schedule::{DATE_FORMAT, TIME_FORMAT};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "matchday")]
#[command(about = "Track football events, fixtures, rosters and live match actions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory holding one folder per event (overrides MATCHDAY_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create, list and inspect events
    #[command(subcommand)]
    Event(EventCommand),

    /// Manage an event's fixture list
    #[command(subcommand)]
    Match(MatchCommand),

    /// Manage an event's roster
    #[command(subcommand)]
    Player(PlayerCommand),

    /// Read or export the action log
    #[command(subcommand)]
    Log(LogCommand),

    /// Run the live console for one match
    Live {
        #[arg(long)]
        event: String,

        /// Match number as shown by `match list`
        #[arg(long = "match")]
        match_no: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum EventCommand {
    /// Create an event (7-character id); re-running keeps existing matches
    Create {
        id: String,

        #[arg(long)]
        name: Option<String>,

        /// Start date, free text (usually DD/MM/YYYY)
        #[arg(long)]
        start: Option<String>,

        #[arg(long)]
        end: Option<String>,
    },

    /// List event ids
    List,

    /// Show one event's metadata and counts
    Show { id: String },
}

#[derive(Subcommand, Debug)]
pub enum MatchCommand {
    /// Add a match to the event
    Add {
        #[arg(long)]
        event: String,

        /// Date, DD/MM/YYYY
        #[arg(long, value_parser = parse_date)]
        fecha: Option<NaiveDate>,

        /// Kick-off, HH:MM
        #[arg(long, value_parser = parse_time)]
        hora: Option<NaiveTime>,

        #[arg(long, default_value = "")]
        local: String,

        #[arg(long, default_value = "")]
        visitante: String,

        #[arg(long, default_value = "")]
        competicion: String,

        #[arg(long, default_value = "")]
        cancha: String,
    },

    /// List matches, numbered from 1
    List {
        #[arg(long)]
        event: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum PlayerCommand {
    /// Add a player; with --match the team must be one of that match's sides
    Add {
        #[arg(long)]
        event: String,

        #[arg(long = "match")]
        match_no: Option<usize>,

        #[arg(long, default_value = "")]
        nombre: String,

        #[arg(long, default_value = "")]
        dorsal: String,

        /// Portero, Defensa, Centrocampista or Delantero
        #[arg(long, default_value = "")]
        posicion: String,

        #[arg(long, default_value = "")]
        equipo: String,
    },

    /// List the roster, or both sides of one match
    List {
        #[arg(long)]
        event: String,

        #[arg(long = "match")]
        match_no: Option<usize>,
    },

    /// Remove a player by the number shown in `player list` (without --match)
    Remove {
        #[arg(long)]
        event: String,

        #[arg(long)]
        index: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum LogCommand {
    /// Print log entries
    List {
        #[arg(long)]
        event: String,

        /// Only entries of this match
        #[arg(long = "match")]
        match_no: Option<usize>,
    },

    /// Write log entries to the event's CSV export folder
    Export {
        #[arg(long)]
        event: String,

        /// File stem; defaults to <event>_<YYYYmmdd_HHMM>
        #[arg(long)]
        name: Option<String>,

        #[arg(long = "match")]
        match_no: Option<usize>,
    },
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|e| format!("expected DD/MM/YYYY: {}", e))
}

fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw.trim(), TIME_FORMAT).map_err(|e| format!("expected HH:MM: {}", e))
}
