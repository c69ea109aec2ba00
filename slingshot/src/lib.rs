pub mod error;
pub mod simulation;
pub mod configuration;
pub mod benchmark;

pub use error::{SimError, SimResult};

pub use simulation::states::{Body, BodyRole, Planet, System, NVec3};
pub use simulation::forces::{Acceleration, Influencer, SoftenedGravity, influence_set};
pub use simulation::integrator::{FrameStep, verlet_advance, advance_system, substep_count};
pub use simulation::elements::{OrbitalElements, ElementExtractor, perihelion};
pub use simulation::events::{
    FlybyDetector, FlybyEvent, OrbitCompletionDetector, PerihelionChange, PerihelionLog,
    PerihelionSample, PerihelionTrend,
};
pub use simulation::phases::{OrbitPhase, PhaseEnd, PhaseTrack, PathSettings};
pub use simulation::clock::SimulationClock;
pub use simulation::frame::{FrameInput, FrameOutput, Telemetry};
pub use simulation::scenario::Scenario;

pub use configuration::config::{
    EngineConfig, ParametersConfig, PathConfig, PlanetConfig, PrimaryConfig, ProbeConfig, ScenarioConfig,
};

pub use benchmark::benchmark::{bench_ticks, bench_ticks_curve};
