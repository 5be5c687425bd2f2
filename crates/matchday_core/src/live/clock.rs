//! Match clock
//!
//! No ticking thread: elapsed time is recomputed from instants whenever it is
//! read. Every transition takes `now` explicitly so the state machine itself
//! stays pure; [`TimeSource`] supplies it in the session.

use crate::models::Period;
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidTransition {
    #[error("Clock is already running")]
    AlreadyRunning,

    #[error("Clock is not running")]
    NotRunning,
}

/// Source of monotonic and wall-clock time.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> Instant;

    fn wall_clock(&self) -> NaiveDateTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn wall_clock(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Time that only moves when told to.
#[derive(Debug)]
pub struct ManualTimeSource {
    base: Instant,
    wall_base: NaiveDateTime,
    offset: Mutex<Duration>,
}

impl ManualTimeSource {
    pub fn new(wall_base: NaiveDateTime) -> Self {
        Self { base: Instant::now(), wall_base, offset: Mutex::new(Duration::ZERO) }
    }

    pub fn advance(&self, by: Duration) {
        *self.offset.lock().unwrap_or_else(PoisonError::into_inner) += by;
    }

    fn offset(&self) -> Duration {
        *self.offset.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Instant {
        self.base + self.offset()
    }

    fn wall_clock(&self) -> NaiveDateTime {
        // offsets stay far below chrono's range in practice
        let offset = chrono::Duration::from_std(self.offset()).unwrap_or_else(|_| chrono::Duration::zero());
        self.wall_base + offset
    }
}

/// Stopped/running clock plus the current half.
#[derive(Debug, Clone, Default)]
pub struct ClockState {
    started_at: Option<Instant>,
    elapsed: Duration,
    period: Period,
}

impl ClockState {
    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn start(&mut self, now: Instant) -> Result<(), InvalidTransition> {
        if self.is_running() {
            return Err(InvalidTransition::AlreadyRunning);
        }
        self.started_at = Some(now);
        Ok(())
    }

    pub fn pause(&mut self, now: Instant) -> Result<(), InvalidTransition> {
        let started_at = self.started_at.take().ok_or(InvalidTransition::NotRunning)?;
        self.elapsed += now.saturating_duration_since(started_at);
        Ok(())
    }

    /// Back to stopped at zero. The period is kept.
    pub fn reset(&mut self) {
        self.started_at = None;
        self.elapsed = Duration::ZERO;
    }

    pub fn set_period(&mut self, period: Period) {
        self.period = period;
    }

    pub fn elapsed_at(&self, now: Instant) -> Duration {
        match self.started_at {
            Some(started_at) => self.elapsed + now.saturating_duration_since(started_at),
            None => self.elapsed,
        }
    }

    pub fn snapshot(&self, now: Instant) -> ClockSnapshot {
        let elapsed = self.elapsed_at(now);
        ClockSnapshot {
            running: self.is_running(),
            elapsed_secs: elapsed.as_secs(),
            display: format_clock(elapsed),
            period: self.period,
        }
    }
}

/// Point-in-time view of the clock for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClockSnapshot {
    pub running: bool,
    pub elapsed_secs: u64,
    pub display: String,
    pub period: Period,
}

/// `MM:SS`, truncating sub-second time. Minutes keep counting past 59.
pub fn format_clock(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn test_start_pause_accumulates() {
        let t0 = Instant::now();
        let mut clock = ClockState::default();

        clock.start(t0).unwrap();
        assert_eq!(clock.elapsed_at(t0 + secs(5)), secs(5));
        clock.pause(t0 + secs(10)).unwrap();

        // time passing while stopped does not count
        assert_eq!(clock.elapsed_at(t0 + secs(100)), secs(10));

        clock.start(t0 + secs(100)).unwrap();
        clock.pause(t0 + secs(130)).unwrap();
        assert_eq!(clock.elapsed_at(t0 + secs(200)), secs(40));
    }

    #[test]
    fn test_invalid_transitions() {
        let t0 = Instant::now();
        let mut clock = ClockState::default();

        assert_eq!(clock.pause(t0), Err(InvalidTransition::NotRunning));
        clock.start(t0).unwrap();
        assert_eq!(clock.start(t0 + secs(1)), Err(InvalidTransition::AlreadyRunning));
        // the rejected start did not move the origin
        assert_eq!(clock.elapsed_at(t0 + secs(3)), secs(3));
    }

    #[test]
    fn test_reset_keeps_period() {
        let t0 = Instant::now();
        let mut clock = ClockState::default();
        clock.set_period(Period::SecondHalf);
        clock.start(t0).unwrap();

        clock.reset();

        assert!(!clock.is_running());
        assert_eq!(clock.elapsed_at(t0 + secs(60)), Duration::ZERO);
        assert_eq!(clock.period(), Period::SecondHalf);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(Duration::from_millis(5_900)), "00:05");
        assert_eq!(format_clock(secs(90)), "01:30");
        assert_eq!(format_clock(secs(95 * 60 + 7)), "95:07");
    }

    #[test]
    fn test_manual_time_source_moves_both_clocks() {
        let wall = chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap().and_hms_opt(18, 0, 0).unwrap();
        let time = ManualTimeSource::new(wall);
        let start = time.now();

        time.advance(secs(90));

        assert_eq!(time.now() - start, secs(90));
        assert_eq!(time.wall_clock(), wall + chrono::Duration::seconds(90));
    }

    proptest! {
        #[test]
        fn prop_elapsed_is_sum_of_run_segments(
            segments in proptest::collection::vec((0u64..3_600, 0u64..3_600), 0..8)
        ) {
            let mut now = Instant::now();
            let mut clock = ClockState::default();
            let mut expected = Duration::ZERO;

            for (run, idle) in segments {
                clock.start(now).unwrap();
                now += secs(run);
                clock.pause(now).unwrap();
                expected += secs(run);
                now += secs(idle);
            }

            prop_assert_eq!(clock.elapsed_at(now), expected);
        }

        #[test]
        fn prop_reset_always_zero(run in 0u64..10_000, running in any::<bool>()) {
            let t0 = Instant::now();
            let mut clock = ClockState::default();
            clock.start(t0).unwrap();
            if !running {
                clock.pause(t0 + secs(run)).unwrap();
            }

            clock.reset();
            prop_assert_eq!(clock.elapsed_at(t0 + secs(run * 2)), Duration::ZERO);
        }
    }
}
