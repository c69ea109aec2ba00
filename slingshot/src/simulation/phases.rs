//! Orbit phases: the probe's traveled path split at flyby boundaries.
//!
//! Each phase owns a fixed-capacity point buffer with an explicit committed
//! count, so appending is O(1) and memory per phase is bounded.
//!
//! Bounding policy:
//! - a full phase drops further points; the live point still follows the
//!   body
//! - only the `max_retained_phases` most recent phases are kept; the oldest
//!   is evicted whole when a split would exceed that

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::configuration::config::PathConfig;
use crate::error::{SimError, SimResult};
use crate::simulation::states::NVec3;
use crate::simulation::vecmath::distance_sq;

/// End of a phase; only the active (last) phase is `Open`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEnd {
    Open,
    At(DateTime<Utc>),
}

#[derive(Debug, Clone)]
pub struct OrbitPhase {
    pub start: DateTime<Utc>,
    pub end: PhaseEnd,
    points: Box<[NVec3]>, // preallocated slots
    committed: usize,     // slots in use
}

impl OrbitPhase {
    fn new(start: DateTime<Utc>, capacity: usize) -> Self {
        Self {
            start,
            end: PhaseEnd::Open,
            points: vec![NVec3::zeros(); capacity].into_boxed_slice(),
            committed: 0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.end == PhaseEnd::Open
    }

    /// Committed points in recording order
    pub fn points(&self) -> &[NVec3] {
        &self.points[..self.committed]
    }

    pub fn len(&self) -> usize {
        self.committed
    }

    pub fn is_empty(&self) -> bool {
        self.committed == 0
    }

    pub fn capacity(&self) -> usize {
        self.points.len()
    }

    pub fn is_full(&self) -> bool {
        self.committed >= self.points.len()
    }

    fn push(&mut self, p: NVec3) -> bool {
        if self.is_full() {
            return false;
        }
        self.points[self.committed] = p;
        self.committed += 1;
        true
    }
}

/// Path recording knobs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSettings {
    pub min_commit_distance_sq: f64, // squared movement needed before a new point is kept
    pub max_points_per_phase: usize, // including the live point
    pub max_retained_phases: usize,
}

impl From<&PathConfig> for PathSettings {
    fn from(cfg: &PathConfig) -> Self {
        Self {
            min_commit_distance_sq: cfg.min_commit_distance_sq,
            max_points_per_phase: cfg.max_points_per_phase,
            max_retained_phases: cfg.max_retained_phases,
        }
    }
}

/// Ordered, time-bounded phases of one body's trajectory
#[derive(Debug, Clone)]
pub struct PhaseTrack {
    settings: PathSettings,
    phases: VecDeque<OrbitPhase>,
    live: Option<NVec3>,   // body position at the last record call
    evicted: usize,        // phases dropped by the retention cap
}

impl PhaseTrack {
    /// One open phase starting at `start`
    pub fn new(start: DateTime<Utc>, settings: PathSettings) -> SimResult<Self> {
        if settings.max_points_per_phase < 2 {
            return Err(SimError::InvalidConfiguration(
                "a path phase needs room for at least one committed point and the live point".into(),
            ));
        }
        if settings.max_retained_phases == 0 {
            return Err(SimError::InvalidConfiguration(
                "at least one path phase must be retained".into(),
            ));
        }

        let mut phases = VecDeque::with_capacity(settings.max_retained_phases);
        phases.push_back(OrbitPhase::new(start, settings.max_points_per_phase - 1));

        Ok(Self {
            settings,
            phases,
            live: None,
            evicted: 0,
        })
    }

    pub fn settings(&self) -> &PathSettings {
        &self.settings
    }

    /// Retained phases, oldest first
    pub fn phases(&self) -> impl ExactSizeIterator<Item = &OrbitPhase> {
        self.phases.iter()
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn evicted(&self) -> usize {
        self.evicted
    }

    /// The open phase currently being recorded
    pub fn active(&self) -> &OrbitPhase {
        // never empty: built with one phase, split pushes before evicting
        &self.phases[self.phases.len() - 1]
    }

    pub fn live_point(&self) -> Option<NVec3> {
        self.live
    }

    /// Close the active phase at `date` and open a new one starting there
    pub fn split(&mut self, date: DateTime<Utc>) {
        let capacity = self.settings.max_points_per_phase - 1;
        let start = match self.phases.back_mut() {
            Some(active) => {
                // never let a phase end before it started
                let end = date.max(active.start);
                active.end = PhaseEnd::At(end);
                end
            }
            None => date,
        };

        self.phases.push_back(OrbitPhase::new(start, capacity));
        self.live = None;

        while self.phases.len() > self.settings.max_retained_phases {
            self.phases.pop_front();
            self.evicted += 1;
        }
    }

    /// Note the body at `x`. Commits a point when the active phase is empty
    /// or the body moved far enough since the last commit. Returns whether
    /// a point was committed.
    pub fn record(&mut self, x: NVec3) -> bool {
        self.live = Some(x);

        let min_sq = self.settings.min_commit_distance_sq;
        let Some(active) = self.phases.back_mut() else {
            return false;
        };
        if active.is_full() {
            return false;
        }

        let moved = match active.points().last() {
            None => true,
            Some(last) => distance_sq(last, &x) > min_sq,
        };
        if !moved {
            return false;
        }

        let committed = active.push(x);
        if committed && active.is_full() {
            warn!(start = %active.start, points = active.len(), "path phase is full, dropping further points");
        }
        committed
    }

    /// Committed points of the active phase followed by the live point
    pub fn rendered_path(&self) -> Vec<NVec3> {
        let active = self.active();
        let mut path = Vec::with_capacity(active.len() + 1);
        path.extend_from_slice(active.points());
        path.extend(self.live);
        path
    }
}
