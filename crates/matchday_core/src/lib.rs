//! # matchday_core - Event-scoped match logging
//!
//! Storage and state model for recording football match actions live.
//!
//! ## Components
//! - [`store`]: one isolated namespace per event, whole-resource JSON rewrites
//! - [`registry`]: event creation, listing and activation
//! - [`schedule`]: the event's ordered match list
//! - [`roster`]: players per team with scoped dorsal uniqueness
//! - [`live`]: match clock and append-only action log
//!
//! Session state (active event, match and clock) is held by the caller in a
//! [`SessionContext`] and passed into each call.

pub mod config;
pub mod context;
pub mod error;
pub mod live;
pub mod models;
pub mod registry;
pub mod roster;
pub mod schedule;
pub mod store;

pub use config::Config;
pub use context::SessionContext;
pub use error::{CoreError, Result, ValidationErrors, Violation};
pub use live::{ClockState, InvalidTransition, LiveSession, TimeSource};
pub use models::{Action, EventMeta, LogEntry, Match, MatchRef, Outcome, Period, Player, Position, Zone};
pub use registry::{EventHandle, EventRegistry, ExportKind};
pub use roster::{PlayerRequest, RosterManager};
pub use schedule::{MatchRequest, MatchScheduler};
pub use store::{NamespaceStore, StoreError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
