//! Live match session: the clock state machine and the action log.

pub mod clock;
pub mod session;

pub use clock::{
    format_clock, ClockSnapshot, ClockState, InvalidTransition, ManualTimeSource,
    SystemTimeSource, TimeSource,
};
pub use session::LiveSession;
