use slingshot::{ScenarioConfig, Scenario, FrameInput, PerihelionTrend};
use slingshot::{bench_ticks, bench_ticks_curve};

use clap::Parser;
use anyhow::{Context, Result};

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file under `scenarios/`
    #[arg(short, default_value = "parker.yaml")]
    file_name: String,

    /// Number of frames to run
    #[arg(long, default_value_t = 21_900)]
    frames: usize,

    /// Wall-clock seconds per frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    frame_dt: f64,

    /// Simulated days per real second, overrides the scenario's
    #[arg(long)]
    time_scale: Option<f64>,

    /// Time frame ticks instead of running the mission
    #[arg(long)]
    bench: bool,

    /// With --bench, print frame cost against sub-step count as CSV
    #[arg(long)]
    curve: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    let file = File::open(&config_path)
        .with_context(|| format!("failed to open scenario {}", config_path.display()))?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)?;

    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;

    if args.bench {
        if args.curve {
            bench_ticks_curve(&scenario_cfg)?;
        } else {
            bench_ticks(&scenario_cfg)?;
        }
        return Ok(());
    }

    let time_scale = args.time_scale.unwrap_or(scenario_cfg.engine.time_scale);
    let mut scenario = Scenario::build_scenario(scenario_cfg)?;
    let input = FrameInput::running(args.frame_dt, time_scale);

    println!("start {}, time scale {} d/s", scenario.date(), time_scale);

    for _ in 0..args.frames {
        let out = scenario.tick(input);

        for flyby in &out.flybys {
            let trend = match flyby.trend {
                Some(PerihelionTrend::Increase) => "+",
                Some(PerihelionTrend::Decrease) => "-",
                None => "?",
            };
            println!("{}  flyby     perihelion {:.4} AU ({trend})", flyby.date, flyby.perihelion_au);
        }
        for sample in &out.perihelion_samples {
            println!("{}  orbit     perihelion {:.4} AU", sample.date, sample.perihelion_au);
            if let Some(change) = scenario.perihelia.latest_change().filter(|c| c.exceeds(0.5)) {
                println!("{}  perihelion changed by {:+.1}%", sample.date, change.percent);
            }
        }
        if let Some(year) = out.year_rollover {
            println!("{}  year {year}", out.date);
        }
    }

    let telemetry = scenario.telemetry();
    println!("end {}", scenario.date());
    if let Some(d) = telemetry.sun_earth_distance_km {
        println!("  sun-earth distance  {:.0} km", d);
    }
    if let Some(d) = telemetry.probe_sun_distance_km {
        println!("  probe-sun distance  {:.0} km", d);
    }
    if let Some(s) = telemetry.earth_speed_kms {
        println!("  earth orbital speed {:.2} km/s", s);
    }
    if let Some(track) = scenario.probe().and_then(|p| p.orbit_phases.as_ref()) {
        println!("  path phases {} retained, {} evicted", track.len(), track.evicted());
    }

    Ok(())
}
