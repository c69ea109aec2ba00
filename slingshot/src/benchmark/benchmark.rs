use std::time::Instant;

use crate::configuration::config::ScenarioConfig;
use crate::error::SimResult;
use crate::simulation::frame::FrameInput;
use crate::simulation::scenario::Scenario;

/// Nominal 60 fps frame
const FRAME_DT: f64 = 1.0 / 60.0;

/// Time full frame ticks of `cfg` across a range of time scales.
/// Higher time scales mean more sub-steps per frame until the cap kicks in.
pub fn bench_ticks(cfg: &ScenarioConfig) -> SimResult<()> {
    // simulated days per real second
    let scales = [1.0, 10.0, 100.0, 1_000.0, 10_000.0, 100_000.0];
    let frames = 600; // ten seconds of 60 fps

    for scale in scales {
        let mut scenario = Scenario::build_scenario(cfg.clone())?;
        let input = FrameInput::running(FRAME_DT, scale);

        // Warm up, also seeds the first-frame accelerations
        let substeps = scenario.tick(input).step.map_or(0, |s| s.substeps);

        let t0 = Instant::now();
        let mut flybys = 0;
        for _ in 0..frames {
            flybys += scenario.tick(input).flybys.len();
        }
        let per_frame = t0.elapsed().as_secs_f64() / frames as f64;

        println!(
            "scale = {scale:9.1} d/s, substeps = {substeps:3}, frame = {:9.3} us, flybys = {flybys}, perihelion samples = {}",
            per_frame * 1e6,
            scenario.perihelia.len(),
        );
    }

    Ok(())
}

/// Frame cost against sub-step count, as CSV
/// Paste output directly into a spreadsheet to graph
pub fn bench_ticks_curve(cfg: &ScenarioConfig) -> SimResult<()> {
    println!("substeps,us_per_frame");

    let frames = 200;
    for substeps in (1..=cfg.engine.max_substeps).step_by(5) {
        let mut scenario = Scenario::build_scenario(cfg.clone())?;

        // time scale giving roughly `substeps` sub-steps per frame
        let input = FrameInput::running(FRAME_DT, substeps as f64 / FRAME_DT);
        scenario.tick(input);

        let t0 = Instant::now();
        for _ in 0..frames {
            scenario.tick(input);
        }
        let us = t0.elapsed().as_secs_f64() * 1e6 / frames as f64;

        println!("{},{:.3}", substeps, us);
    }

    Ok(())
}
