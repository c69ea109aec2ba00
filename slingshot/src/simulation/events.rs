//! Flyby and orbit-completion detection for the probe
//!
//! Two independent state machines observe the probe once per unpaused
//! frame:
//! - [`FlybyDetector`] tracks distance to one planet and confirms a closest
//!   approach one frame late, when the distance starts growing again.
//! - [`OrbitCompletionDetector`] tracks the polar angle around the primary
//!   and counts a revolution when the angle wraps from near +pi to near -pi.
//!
//! Neither detector recovers missed frames. A hitch that jumps the angle
//! past the wrap band, or skips the minimum, loses that event.
//!
//! The wrap heuristic assumes the probe keeps one direction of travel and
//! crosses the branch cut once per revolution. A strongly perturbed pass
//! could cross it zero or two times and under- or over-count samples.

use chrono::{DateTime, Utc};
use std::f64::consts::PI;

/// Direction of a perihelion change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerihelionTrend {
    Increase,
    Decrease,
}

impl PerihelionTrend {
    /// An unchanged perihelion counts as an increase
    pub fn between(previous: f64, current: f64) -> Self {
        if current >= previous {
            PerihelionTrend::Increase
        } else {
            PerihelionTrend::Decrease
        }
    }
}

/// Closest approach to the watched planet below the flyby threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlybyEvent {
    pub date: DateTime<Utc>,
    pub perihelion_au: f64,              // perihelion right after the pass
    pub trend: Option<PerihelionTrend>,  // vs. the reference perihelion, if any
    pub closest_distance: f64,           // sim units
}

/// Perihelion recorded at the end of one revolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerihelionSample {
    pub date: DateTime<Utc>,
    pub perihelion_au: f64,
}

/// Relative change between the two most recent samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerihelionChange {
    pub percent: f64,
    pub trend: PerihelionTrend,
}

impl PerihelionChange {
    /// Whether the change is larger than `threshold_percent` either way.
    /// Where to put the threshold is the consumer's call.
    pub fn exceeds(&self, threshold_percent: f64) -> bool {
        self.percent.abs() > threshold_percent
    }
}

/// Append-only sequence of perihelion samples
#[derive(Debug, Clone, Default)]
pub struct PerihelionLog {
    samples: Vec<PerihelionSample>,
}

impl PerihelionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: PerihelionSample) {
        self.samples.push(sample);
    }

    pub fn samples(&self) -> &[PerihelionSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last(&self) -> Option<&PerihelionSample> {
        self.samples.last()
    }

    pub fn latest_change(&self) -> Option<PerihelionChange> {
        let [.., previous, current] = self.samples.as_slice() else {
            return None;
        };
        if previous.perihelion_au == 0.0 {
            return None;
        }
        let percent = (current.perihelion_au - previous.perihelion_au) / previous.perihelion_au * 100.0;
        Some(PerihelionChange {
            percent,
            trend: PerihelionTrend::between(previous.perihelion_au, current.perihelion_au),
        })
    }
}

// =========================================================================================
// Close-approach detector
// =========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApproachState {
    Approaching,
    Receding,
}

#[derive(Debug, Clone)]
pub struct FlybyDetector {
    threshold: f64,      // sim units
    last_distance: f64,  // previous frame's distance
    state: ApproachState,
}

impl FlybyDetector {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            last_distance: f64::INFINITY,
            state: ApproachState::Receding,
        }
    }

    pub fn state(&self) -> ApproachState {
        self.state
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Feed this frame's distance to the watched planet.
    ///
    /// An Approaching -> Receding transition means the previous frame was a
    /// local minimum. If that minimum was under the threshold, the
    /// perihelion at the current state is asked for and a [`FlybyEvent`]
    /// is returned. `reference_au` is the perihelion the trend compares to.
    pub fn observe<F>(
        &mut self,
        distance: f64,
        date: DateTime<Utc>,
        reference_au: Option<f64>,
        perihelion_au: F,
    ) -> Option<FlybyEvent>
    where
        F: FnOnce() -> Option<f64>,
    {
        let next = if distance < self.last_distance {
            ApproachState::Approaching
        } else {
            ApproachState::Receding
        };

        let mut event = None;
        if self.state == ApproachState::Approaching
            && next == ApproachState::Receding
            && self.last_distance < self.threshold
        {
            event = perihelion_au().map(|q| FlybyEvent {
                date,
                perihelion_au: q,
                trend: reference_au.map(|r| PerihelionTrend::between(r, q)),
                closest_distance: self.last_distance,
            });
        }

        self.state = next;
        self.last_distance = distance;
        event
    }
}

// =========================================================================================
// Orbit-completion detector
// =========================================================================================

#[derive(Debug, Clone)]
pub struct OrbitCompletionDetector {
    wrap: f64,               // |angle| band around the branch cut (rad)
    last_angle: Option<f64>, // None until the first observation
}

impl OrbitCompletionDetector {
    /// `wrap_fraction` of 0.9 means "above 0.9 pi, then below -0.9 pi"
    pub fn new(wrap_fraction: f64) -> Self {
        Self {
            wrap: wrap_fraction * PI,
            last_angle: None,
        }
    }

    pub fn last_angle(&self) -> Option<f64> {
        self.last_angle
    }

    /// Feed this frame's polar angle around the primary. Returns a sample
    /// when the angle wrapped from the top band to the bottom band.
    pub fn observe<F>(&mut self, angle: f64, date: DateTime<Utc>, perihelion_au: F) -> Option<PerihelionSample>
    where
        F: FnOnce() -> Option<f64>,
    {
        let last = *self.last_angle.get_or_insert(angle);
        self.last_angle = Some(angle);

        if last > self.wrap && angle < -self.wrap {
            perihelion_au().map(|q| PerihelionSample { date, perihelion_au: q })
        } else {
            None
        }
    }
}
