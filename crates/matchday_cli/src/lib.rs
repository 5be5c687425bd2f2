//! Matchday command line front end
//!
//! Subcommands for events, fixtures and rosters, plus an interactive console
//! that records actions while a match is played.

pub mod cli;
pub mod commands;
pub mod console;
pub mod export;

pub use cli::Cli;
pub use commands::run;
