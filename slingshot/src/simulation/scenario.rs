//! Build and run a star-planet-probe scenario from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle
//! [`Scenario`], containing:
//! - engine settings (`Engine`) and physical parameters (`Parameters`)
//! - system state (`System` with bodies at t = 0)
//! - the force model (`SoftenedGravity`)
//! - the simulated clock, perihelion log and the probe's detectors
//!
//! A presentation layer calls [`Scenario::tick`] once per rendered frame
//! and reads positions, events and telemetry from the result. Nothing is
//! pushed anywhere else.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::configuration::config::{PlanetConfig, ScenarioConfig};
use crate::error::{SimError, SimResult};
use crate::simulation::clock::SimulationClock;
use crate::simulation::elements::{circular_speed, vis_viva_speed, ElementExtractor};
use crate::simulation::engine::Engine;
use crate::simulation::events::{
    FlybyDetector, FlybyEvent, OrbitCompletionDetector, PerihelionLog, PerihelionSample,
};
use crate::simulation::forces::{Acceleration, Influencer, SoftenedGravity};
use crate::simulation::frame::{FrameInput, FrameOutput, Telemetry};
use crate::simulation::integrator::{advance_system, FrameStep};
use crate::simulation::params::Parameters;
use crate::simulation::phases::{PathSettings, PhaseTrack};
use crate::simulation::states::{Body, BodyRole, NVec3, Planet, System};
use crate::simulation::vecmath::{distance, polar_angle_xz};

/// Samples per period used for a precomputed planet path
const ORBIT_PATH_SAMPLES: f64 = 500.0;

/// A precomputed path covers a little more than one period so it closes
const ORBIT_PATH_OVERLAP: f64 = 1.05;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Detector state scoped to the probe
#[derive(Debug, Clone)]
struct ProbeTracker {
    probe: usize,              // index of the probe in `system.bodies`
    target: usize,             // index of the flyby planet
    flyby: FlybyDetector,
    orbit: OrbitCompletionDetector,
    baseline_au: Option<f64>,  // perihelion at build time, trend reference before any sample
}

/// Runtime bundle for one simulation run
#[derive(Debug, Clone)]
pub struct Scenario {
    pub engine: Engine,
    pub parameters: Parameters,
    pub system: System,
    pub forces: SoftenedGravity,
    pub clock: SimulationClock,
    pub perihelia: PerihelionLog,
    extractor: ElementExtractor,
    primary: usize,
    earth: Option<usize>,
    tracker: Option<ProbeTracker>,
    config: ScenarioConfig,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> SimResult<Self> {
        cfg.validate()?;

        let parameters = Parameters::from(&cfg.parameters);
        let engine = Engine::from(&cfg.engine);
        let forces = SoftenedGravity { g: parameters.g };

        // Primary sits fixed at the origin
        let primary = Body::new(
            cfg.primary.id.clone(),
            BodyRole::Primary,
            NVec3::zeros(),
            NVec3::zeros(),
            cfg.primary.mass,
        )?;
        let extractor = ElementExtractor::new(parameters.g, primary.m)?;

        let mut bodies = Vec::with_capacity(cfg.planets.len() + 2);
        for pc in &cfg.planets {
            bodies.push(build_planet(pc, &primary, &forces, &parameters)?);
        }
        bodies.insert(0, primary);

        let mut tracker = None;
        if engine.include_probe {
            let mut probe = build_probe(&cfg, &extractor, &parameters)?;
            probe.orbit_phases = Some(PhaseTrack::new(cfg.start_date, PathSettings::from(&cfg.paths))?);

            let target = bodies
                .iter()
                .position(|b| b.role == BodyRole::Secondary(engine.flyby_target))
                .ok_or_else(|| SimError::UnknownBody(format!("flyby target {:?} is not in the scenario", engine.flyby_target)))?;

            let baseline_au = extractor
                .perihelion(&(probe.x - bodies[0].x), &probe.v)
                .map(|q| parameters.units_to_au(q));

            tracker = Some(ProbeTracker {
                probe: bodies.len(),
                target,
                flyby: FlybyDetector::new(parameters.flyby_threshold_units()),
                orbit: OrbitCompletionDetector::new(parameters.wrap_fraction),
                baseline_au,
            });
            bodies.push(probe);
        }

        let system = System::new(bodies);
        let earth = system.index_of(BodyRole::Secondary(Planet::Earth));

        debug!(
            bodies = system.bodies.len(),
            probe = tracker.is_some(),
            start = %cfg.start_date,
            "built scenario"
        );

        Ok(Self {
            engine,
            parameters,
            system,
            forces,
            clock: SimulationClock::new(cfg.start_date),
            perihelia: PerihelionLog::new(),
            extractor,
            primary: 0,
            earth,
            tracker,
            config: cfg,
        })
    }

    /// Throw away all bodies and detector state and rebuild from the
    /// stored configuration
    pub fn reset(&mut self) -> SimResult<()> {
        *self = Self::build_scenario(self.config.clone())?;
        debug!("scenario reset");
        Ok(())
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    pub fn bodies(&self) -> &[Body] {
        &self.system.bodies
    }

    pub fn body(&self, id: &str) -> Option<&Body> {
        self.system.find(id)
    }

    pub fn primary(&self) -> &Body {
        &self.system.bodies[self.primary]
    }

    pub fn probe(&self) -> Option<&Body> {
        self.tracker.as_ref().map(|t| &self.system.bodies[t.probe])
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.clock.date()
    }

    pub fn extractor(&self) -> &ElementExtractor {
        &self.extractor
    }

    /// Probe perihelion from its current state, in AU
    pub fn probe_perihelion_au(&self) -> Option<f64> {
        let probe = self.probe()?;
        self.extractor
            .perihelion(&(probe.x - self.primary().x), &probe.v)
            .map(|q| self.parameters.units_to_au(q))
    }

    /// Perihelion of the probe at build time, in AU
    pub fn baseline_perihelion_au(&self) -> Option<f64> {
        self.tracker.as_ref().and_then(|t| t.baseline_au)
    }

    /// Advance one frame.
    ///
    /// Order: scale the capped delta into simulated days, advance the
    /// clock, integrate every non-primary body, run the probe's detectors,
    /// then update the probe's path. A paused frame changes nothing.
    pub fn tick(&mut self, input: FrameInput) -> FrameOutput {
        if input.paused {
            return FrameOutput::idle(self.clock.date(), self.telemetry());
        }

        let step = FrameStep::new(
            input.wall_dt,
            input.time_scale,
            self.engine.max_frame_step,
            self.engine.max_substeps,
        );

        let year_rollover = self.clock.advance(step.dt);
        let date = self.clock.date();

        advance_system(&mut self.system, step, &self.forces, &self.parameters);

        let (flybys, perihelion_samples) = self.track_probe(date);

        FrameOutput {
            date,
            step: Some(step),
            flybys,
            perihelion_samples,
            year_rollover,
            telemetry: self.telemetry(),
        }
    }

    fn track_probe(&mut self, date: DateTime<Utc>) -> (Vec<FlybyEvent>, Vec<PerihelionSample>) {
        let Some(tracker) = self.tracker.as_mut() else {
            return (Vec::new(), Vec::new());
        };

        let bodies = &mut self.system.bodies;
        let primary_x = bodies[self.primary].x;
        let target_x = bodies[tracker.target].x;
        let (x, v) = (bodies[tracker.probe].x, bodies[tracker.probe].v);

        // position relative to the primary; the primary does not move
        let rel = x - primary_x;
        let extractor = &self.extractor;
        let params = &self.parameters;
        let perihelion_au = || extractor.perihelion(&rel, &v).map(|q| params.units_to_au(q));

        let reference_au = self.perihelia.last().map(|s| s.perihelion_au).or(tracker.baseline_au);
        let flyby = tracker.flyby.observe(distance(&x, &target_x), date, reference_au, perihelion_au);
        let sample = tracker.orbit.observe(polar_angle_xz(&rel), date, perihelion_au);

        if let Some(ev) = &flyby {
            info!(
                date = %ev.date,
                perihelion_au = ev.perihelion_au,
                closest = params.units_to_km(ev.closest_distance),
                trend = ?ev.trend,
                "flyby detected"
            );
        }
        if let Some(s) = &sample {
            info!(date = %s.date, perihelion_au = s.perihelion_au, "orbit completed");
            self.perihelia.push(*s);
        }

        // split first so the new phase starts where the pass was confirmed
        if let Some(track) = bodies[tracker.probe].orbit_phases.as_mut() {
            if let Some(ev) = &flyby {
                track.split(ev.date);
            }
            track.record(x);
        }

        (flyby.into_iter().collect(), sample.into_iter().collect())
    }

    /// Distances and speeds in physical units for the current state
    pub fn telemetry(&self) -> Telemetry {
        let bodies = &self.system.bodies;
        let sun = bodies[self.primary].x;
        let p = &self.parameters;

        let earth = self.earth.map(|i| &bodies[i]);
        Telemetry {
            sun_earth_distance_km: earth.map(|b| p.units_to_km(distance(&sun, &b.x))),
            probe_sun_distance_km: self.probe().map(|b| p.units_to_km(distance(&sun, &b.x))),
            earth_speed_kms: earth.map(|b| p.units_to_km(b.speed()) / SECONDS_PER_DAY),
        }
    }
}

/// Place a planet on its orbit at `phase_deg`, tilted by `inclination_deg`
/// about the x axis, moving at `velocity_multiplier` x circular speed
fn build_planet(
    pc: &PlanetConfig,
    primary: &Body,
    forces: &SoftenedGravity,
    params: &Parameters,
) -> SimResult<Body> {
    let r = params.au_to_units(pc.distance_au);
    let theta = pc.phase_deg.to_radians();
    let incl = pc.inclination_deg.to_radians();
    let speed = circular_speed(params.g * primary.m, r) * pc.velocity_multiplier;

    let x = primary.x + NVec3::new(
        r * theta.cos(),
        r * theta.sin() * incl.sin(),
        r * theta.sin() * incl.cos(),
    );
    let v = NVec3::new(
        -speed * theta.sin(),
        speed * theta.cos() * incl.sin(),
        speed * theta.cos() * incl.cos(),
    );

    let mut planet = Body::new(pc.id.clone(), BodyRole::Secondary(pc.kind), x, v, pc.mass)?;
    planet.orbit_path = Some(precompute_orbit_path(&planet, primary, forces, params));
    Ok(planet)
}

/// Probe at aphelion of its first orbit, in the ecliptic, at the launch
/// planet's phase angle, moving at the vis-viva speed
fn build_probe(cfg: &ScenarioConfig, extractor: &ElementExtractor, params: &Parameters) -> SimResult<Body> {
    let pc = &cfg.probe;
    let launch = cfg
        .planet(pc.launch_planet)
        .ok_or_else(|| SimError::UnknownBody(format!("launch planet {:?} is not in the scenario", pc.launch_planet)))?;

    let r_a = params.au_to_units(pc.aphelion_au);
    let a = params.au_to_units((pc.aphelion_au + pc.perihelion_au) / 2.0);
    let speed = vis_viva_speed(extractor.mu(), r_a, a);
    let theta = launch.phase_deg.to_radians();

    let x = NVec3::new(r_a * theta.cos(), 0.0, r_a * theta.sin());
    let v = NVec3::new(-speed * theta.sin(), 0.0, speed * theta.cos());

    Body::new(pc.id.clone(), BodyRole::Probe, x, v, pc.mass)
}

/// Static path for a planet: a bit over one period of semi-implicit Euler
/// under the primary alone, sampled every period / 500
pub fn precompute_orbit_path(
    planet: &Body,
    primary: &Body,
    forces: &SoftenedGravity,
    params: &Parameters,
) -> Vec<NVec3> {
    let r = distance(&primary.x, &planet.x);
    if r == 0.0 {
        return Vec::new();
    }

    let mu = forces.g * primary.m;
    let period = std::f64::consts::TAU * (r.powi(3) / mu).sqrt();
    let dt = period / ORBIT_PATH_SAMPLES;
    let steps = (ORBIT_PATH_SAMPLES * ORBIT_PATH_OVERLAP).ceil() as usize;

    let sun = [Influencer {
        x: primary.x,
        m: primary.m,
        softening: params.primary_softening,
    }];

    let (mut x, mut v) = (planet.x, planet.v);
    let mut path = Vec::with_capacity(steps);
    for _ in 0..steps {
        v += forces.acceleration(&x, &sun) * dt;
        x += v * dt;
        path.push(x);
    }
    path
}
