pub mod states;
pub mod vecmath;
pub mod params;
pub mod engine;
pub mod forces;
pub mod integrator;
pub mod elements;
pub mod events;
pub mod phases;
pub mod clock;
pub mod frame;
pub mod scenario;
