//! Simulated calendar date
//!
//! The clock accumulates simulated days using the same capped-delta x
//! time-scale step as the integrator, so dates and physics stay in step.

use chrono::{DateTime, Datelike, TimeDelta, Utc};

const MS_PER_DAY: f64 = 86_400_000.0;

#[derive(Debug, Clone)]
pub struct SimulationClock {
    start: DateTime<Utc>,
    elapsed_days: f64,
    last_year: i32,
}

impl SimulationClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            start,
            elapsed_days: 0.0,
            last_year: start.year(),
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn elapsed_days(&self) -> f64 {
        self.elapsed_days
    }

    /// Start date plus elapsed days, at millisecond resolution
    pub fn date(&self) -> DateTime<Utc> {
        let ms = (self.elapsed_days * MS_PER_DAY).round() as i64;
        TimeDelta::try_milliseconds(ms)
            .and_then(|d| self.start.checked_add_signed(d))
            .unwrap_or(if ms < 0 { DateTime::<Utc>::MIN_UTC } else { DateTime::<Utc>::MAX_UTC })
    }

    /// Add `days` of simulated time. Returns the new year when the date
    /// crossed into a later calendar year.
    pub fn advance(&mut self, days: f64) -> Option<i32> {
        self.elapsed_days += days;

        let year = self.date().year();
        if year > self.last_year {
            self.last_year = year;
            Some(year)
        } else {
            None
        }
    }
}
