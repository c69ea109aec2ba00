use std::f64::consts::PI;

use chrono::{DateTime, TimeDelta, Utc};

use slingshot::simulation::elements::circular_speed;
use slingshot::simulation::events::ApproachState;
use slingshot::simulation::params::Parameters;
use slingshot::simulation::vecmath::{normalize_or_zero, polar_angle_xz};
use slingshot::{
    advance_system, influence_set, perihelion, substep_count, verlet_advance, Acceleration, Body, BodyRole,
    ElementExtractor, FlybyDetector, FrameStep, Influencer, NVec3, OrbitCompletionDetector, OrbitalElements,
    PathSettings, PerihelionLog, PerihelionSample, PerihelionTrend, PhaseEnd, PhaseTrack, Planet, SimError,
    SimulationClock, SoftenedGravity, System,
};

const G: f64 = 0.00463;
const SUN_MASS: f64 = 1000.0;

/// Fixed reference date for detector and phase tests
fn t0() -> DateTime<Utc> {
    DateTime::from_timestamp(1_534_059_060, 0).unwrap()
}

fn day(n: i64) -> DateTime<Utc> {
    t0() + TimeDelta::days(n)
}

fn sun() -> Body {
    Body::new("sun", BodyRole::Primary, NVec3::zeros(), NVec3::zeros(), SUN_MASS).unwrap()
}

fn planet(kind: Planet, x: NVec3, v: NVec3) -> Body {
    Body::new(format!("{kind:?}"), BodyRole::Secondary(kind), x, v, 0.3).unwrap()
}

/// Planet on a circular orbit of radius `r` in the x/z plane
fn circular_system(r: f64, multiplier: f64) -> System {
    let speed = circular_speed(G * SUN_MASS, r) * multiplier;
    System::new(vec![
        sun(),
        planet(Planet::Earth, NVec3::new(r, 0.0, 0.0), NVec3::new(0.0, 0.0, speed)),
    ])
}

fn sun_influencer(softening: f64) -> [Influencer; 1] {
    [Influencer {
        x: NVec3::zeros(),
        m: SUN_MASS,
        softening,
    }]
}

fn gravity() -> SoftenedGravity {
    SoftenedGravity { g: G }
}

fn path_settings(max_points: usize, max_phases: usize) -> PathSettings {
    PathSettings {
        min_commit_distance_sq: 0.05,
        max_points_per_phase: max_points,
        max_retained_phases: max_phases,
    }
}

// ==================================================================================
// Vector helpers and bodies
// ==================================================================================

#[test]
fn normalize_zero_vector_is_zero() {
    let n = normalize_or_zero(&NVec3::zeros());
    assert_eq!(n, NVec3::zeros());

    let n = normalize_or_zero(&NVec3::new(3.0, 0.0, 4.0));
    assert!((n.norm() - 1.0).abs() < 1e-15);
}

#[test]
fn polar_angle_measures_from_x_toward_z() {
    assert!((polar_angle_xz(&NVec3::new(0.0, 0.0, 1.0)) - PI / 2.0).abs() < 1e-15);
    assert!((polar_angle_xz(&NVec3::new(-1.0, 5.0, 0.0)) - PI).abs() < 1e-15);
}

#[test]
fn body_rejects_non_positive_mass() {
    for m in [0.0, -1.0, f64::NAN] {
        let err = Body::new("bad", BodyRole::Probe, NVec3::zeros(), NVec3::zeros(), m).unwrap_err();
        assert!(matches!(err, SimError::InvalidConfiguration(_)), "mass {m} gave {err:?}");
    }
}

// ==================================================================================
// Force model
// ==================================================================================

#[test]
fn gravity_points_toward_primary() {
    let x = NVec3::new(10.0, 2.0, -7.0);
    let a = gravity().acceleration(&x, &sun_influencer(5.0));

    assert!(a.dot(&(-x)) > 0.0, "Acceleration is not toward the primary");
    assert!(a.cross(&x).norm() < 1e-12, "Acceleration is not radial");
}

#[test]
fn gravity_inverse_square_law() {
    let inf = sun_influencer(5.0);
    let a_r = gravity().acceleration(&NVec3::new(10.0, 0.0, 0.0), &inf);
    let a_2r = gravity().acceleration(&NVec3::new(20.0, 0.0, 0.0), &inf);

    let ratio = a_r.norm() / a_2r.norm();
    assert!((ratio - 4.0).abs() < 1e-12, "Expected 4x, got {}", ratio);
    assert!((a_r.norm() - G * SUN_MASS / 100.0).abs() < 1e-15);
}

#[test]
fn softening_clamp_bounds_acceleration() {
    for softening in [5.0, 0.05] {
        let inf = sun_influencer(softening);
        let bound = G * SUN_MASS / (softening * softening);

        for sep in [0.0, 1e-300, 1e-12, 1e-6, 1e-3, 0.01, 0.049, 0.05, 1.0, 4.99, 5.0] {
            let a = gravity().acceleration(&NVec3::new(sep, 0.0, 0.0), &inf);
            assert!(a.norm().is_finite(), "non-finite acceleration at separation {sep}");
            assert!(
                a.norm() <= bound * (1.0 + 1e-12),
                "softening {softening}, separation {sep}: |a| = {} > {bound}",
                a.norm()
            );
        }
    }
}

#[test]
fn coincident_influencer_contributes_nothing() {
    let a = gravity().acceleration(&NVec3::zeros(), &sun_influencer(5.0));
    assert_eq!(a, NVec3::zeros());
}

#[test]
fn influence_sets_follow_roles() {
    let params = Parameters::default();
    let bodies = vec![
        sun(),
        planet(Planet::Earth, NVec3::new(25.0, 0.0, 0.0), NVec3::zeros()),
        planet(Planet::Venus, NVec3::new(18.0, 0.0, 0.0), NVec3::zeros()),
        Body::new("probe", BodyRole::Probe, NVec3::new(20.0, 0.0, 0.0), NVec3::zeros(), 1e-5).unwrap(),
    ];

    assert!(influence_set(&bodies, 0, &params).is_empty());

    let earth = influence_set(&bodies, 1, &params);
    assert_eq!(earth.len(), 1);
    assert_eq!(earth[0].m, SUN_MASS);
    assert_eq!(earth[0].softening, params.primary_softening);

    let probe = influence_set(&bodies, 3, &params);
    assert_eq!(probe.len(), 3);
    assert_eq!(probe.iter().filter(|i| i.softening == params.primary_softening).count(), 1);
    assert_eq!(probe.iter().filter(|i| i.softening == params.secondary_softening).count(), 2);
}

#[test]
fn planet_pulls_probe_hard_at_close_range() {
    // 0.1 units from Venus the planet's pull dwarfs the sun's at 18 units
    let params = Parameters::default();
    let venus_x = NVec3::new(18.0, 0.0, 0.0);
    let bodies = vec![
        sun(),
        planet(Planet::Venus, venus_x, NVec3::zeros()),
        Body::new("probe", BodyRole::Probe, venus_x + NVec3::new(0.0, 0.0, 0.1), NVec3::zeros(), 1e-5).unwrap(),
    ];

    let inf = influence_set(&bodies, 2, &params);
    let a = gravity().acceleration(&bodies[2].x, &inf);
    let to_venus = venus_x - bodies[2].x;
    assert!(a.dot(&to_venus) > 0.0);
    assert!(a.z < 0.0 && a.z.abs() > a.x.abs());
}

// ==================================================================================
// Integrator
// ==================================================================================

#[test]
fn frame_step_caps_wall_delta_before_scaling() {
    let step = FrameStep::new(1.0, 3.0, 1.0 / 30.0, 100);
    assert!((step.dt - 0.1).abs() < 1e-15);
    assert_eq!(step.substeps, 1);

    let step = FrameStep::new(0.01, 250.0, 1.0 / 30.0, 100);
    assert!((step.dt - 2.5).abs() < 1e-12);
    assert_eq!(step.substeps, 3);
    assert!((step.h() - 2.5 / 3.0).abs() < 1e-12);
}

#[test]
fn substep_count_never_exceeds_cap() {
    assert_eq!(substep_count(0.0, 100), 0);
    assert_eq!(substep_count(-2.5, 100), 3);
    assert_eq!(substep_count(99.5, 100), 100);
    assert_eq!(substep_count(1e300, 100), 100);
    assert_eq!(substep_count(f64::INFINITY, 100), 100);
    assert_eq!(substep_count(f64::NAN, 100), 0);

    for wall_dt in [0.0, 0.016, 1.0, 10.0, 1e9] {
        for scale in [-1e12, -5.0, 0.0, 1.0, 365.0, 1e6, 1e12] {
            let step = FrameStep::new(wall_dt, scale, 1.0 / 30.0, 100);
            assert!(step.substeps <= 100, "{wall_dt} s x {scale} d/s gave {} substeps", step.substeps);
        }
    }
}

#[test]
fn huge_step_completes_with_finite_state() {
    let mut sys = circular_system(25.0, 1.0);
    let step = FrameStep::new(10.0, 1e6, 1.0 / 30.0, 100);
    assert_eq!(step.substeps, 100);

    let params = Parameters::default();
    for _ in 0..5 {
        advance_system(&mut sys, step, &gravity(), &params);
    }
    let b = &sys.bodies[1];
    assert!(b.x.iter().all(|c| c.is_finite()));
    assert!(b.v.iter().all(|c| c.is_finite()));
}

#[test]
fn first_frame_seeds_acceleration() {
    // At rest 10 units out: x(h) = 10 - a h^2 / 2 only if a_old was seeded
    let mut body = planet(Planet::Earth, NVec3::new(10.0, 0.0, 0.0), NVec3::zeros());
    assert!(body.a.is_none());

    let step = FrameStep::new(0.1, 1.0, 1.0, 100);
    verlet_advance(&mut body, step, &gravity(), &sun_influencer(5.0));

    let a = G * SUN_MASS / 100.0;
    let expected = 10.0 - 0.5 * a * 0.1 * 0.1;
    assert!((body.x.x - expected).abs() < 1e-12, "x = {}, expected {}", body.x.x, expected);
    assert!(body.a.is_some());
}

#[test]
fn zero_step_moves_nothing() {
    let mut body = planet(Planet::Earth, NVec3::new(10.0, 0.0, 0.0), NVec3::new(0.0, 0.0, 0.3));
    let step = FrameStep::new(0.0, 5.0, 1.0 / 30.0, 100);
    assert_eq!(step.substeps, 0);

    verlet_advance(&mut body, step, &gravity(), &sun_influencer(5.0));
    assert_eq!(body.x, NVec3::new(10.0, 0.0, 0.0));
    assert_eq!(body.v, NVec3::new(0.0, 0.0, 0.3));
}

#[test]
fn circular_orbit_radius_stays_bounded() {
    let r = 25.0;
    let mut sys = circular_system(r, 1.0);
    let params = Parameters::default();
    let step = FrameStep::new(1.0 / 60.0, 10.0, 1.0 / 30.0, 100);

    let period = 2.0 * PI * (r.powi(3) / (G * SUN_MASS)).sqrt();
    let frames = (5.0 * period / step.dt).ceil() as usize;

    let mut max_drift: f64 = 0.0;
    for _ in 0..frames {
        advance_system(&mut sys, step, &gravity(), &params);
        max_drift = max_drift.max((sys.bodies[1].x.norm() - r).abs());
    }

    assert!(max_drift < 0.01 * r, "radius drifted by {max_drift}");
    assert!((sys.t - frames as f64 * step.dt).abs() < 1e-6);
}

#[test]
fn primary_never_moves() {
    let mut sys = circular_system(25.0, 1.0);
    let params = Parameters::default();
    let step = FrameStep::new(1.0 / 30.0, 100.0, 1.0 / 30.0, 100);

    for _ in 0..50 {
        advance_system(&mut sys, step, &gravity(), &params);
    }
    assert_eq!(sys.bodies[0].x, NVec3::zeros());
    assert_eq!(sys.bodies[0].v, NVec3::zeros());
    assert!(sys.bodies[0].a.is_none());
}

#[test]
fn spin_follows_role_rate() {
    let step = FrameStep::new(0.1, 1.0, 1.0, 100);
    let inf = sun_influencer(5.0);

    let mut earth = planet(Planet::Earth, NVec3::new(25.0, 0.0, 0.0), NVec3::zeros());
    let mut venus = planet(Planet::Venus, NVec3::new(18.0, 0.0, 0.0), NVec3::zeros());
    verlet_advance(&mut earth, step, &gravity(), &inf);
    verlet_advance(&mut venus, step, &gravity(), &inf);

    assert!((earth.spin - 2.0 * PI * 0.1).abs() < 1e-12);
    assert!(venus.spin < 0.0, "venus rotates retrograde");
    assert!((venus.spin + 2.0 * PI / 243.0 * 0.1).abs() < 1e-12);
}

// ==================================================================================
// Orbital elements
// ==================================================================================

#[test]
fn circular_orbit_perihelion_is_radius() {
    let r = 25.0;
    let mu = G * SUN_MASS;
    let x = NVec3::new(r, 0.0, 0.0);
    let v = NVec3::new(0.0, 0.0, circular_speed(mu, r));

    let el = OrbitalElements::from_state(&x, &v, mu).unwrap();
    assert!(el.eccentricity < 1e-12, "e = {}", el.eccentricity);
    assert!((el.perihelion - r).abs() < 1e-9 * r);
    assert!((el.angular_momentum - r * v.norm()).abs() < 1e-12);
}

#[test]
fn slow_start_gives_perihelion_slightly_inside() {
    // 0.98 x circular speed at r = 25 starts at aphelion of a mildly
    // eccentric orbit: e = 1 - 0.98^2, q = r (1 - e) / (1 + e)
    let sys = circular_system(25.0, 0.98);
    let body = &sys.bodies[1];

    let q = perihelion(&body.x, &body.v, SUN_MASS, G).unwrap();
    let e = 1.0 - 0.98 * 0.98;
    let expected = 25.0 * (1.0 - e) / (1.0 + e);

    assert!(q < 25.0);
    assert!((q - expected).abs() < 1e-9, "q = {q}, expected {expected}");
    assert!(q > 25.0 * 0.9, "within a few percent of the start radius");
}

#[test]
fn near_parabolic_state_stays_finite() {
    let r = 25.0;
    let mu = G * SUN_MASS;
    let escape = (2.0 * mu / r).sqrt();
    let x = NVec3::new(r, 0.0, 0.0);
    let v = NVec3::new(0.0, 0.0, escape * 0.999_999);

    let el = OrbitalElements::from_state(&x, &v, mu).unwrap();
    assert!(el.eccentricity > 0.99);
    assert!((el.perihelion - r).abs() < 1e-5 * r, "q = {}", el.perihelion);
}

#[test]
fn degenerate_states_have_no_elements() {
    let v = NVec3::new(0.0, 0.0, 0.4);
    assert!(OrbitalElements::from_state(&NVec3::zeros(), &v, 4.63).is_none());
    assert!(OrbitalElements::from_state(&NVec3::new(25.0, 0.0, 0.0), &v, 0.0).is_none());
    assert!(OrbitalElements::from_state(&NVec3::new(25.0, 0.0, 0.0), &v, -1.0).is_none());

    let inf = NVec3::new(0.0, 0.0, f64::INFINITY);
    assert!(OrbitalElements::from_state(&NVec3::new(25.0, 0.0, 0.0), &inf, 4.63).is_none());
}

#[test]
fn extractor_rejects_non_positive_primary() {
    assert!(matches!(ElementExtractor::new(G, 0.0), Err(SimError::InvalidConfiguration(_))));
    assert!(matches!(ElementExtractor::new(G, -5.0), Err(SimError::InvalidConfiguration(_))));

    let ex = ElementExtractor::new(G, SUN_MASS).unwrap();
    assert!((ex.mu() - 4.63).abs() < 1e-12);
}

// ==================================================================================
// Flyby detector
// ==================================================================================

/// Feed `distances` one per frame, return the frames that fired
fn run_flyby(distances: &[f64], threshold: f64, reference: Option<f64>, q: Option<f64>) -> Vec<(usize, slingshot::FlybyEvent)> {
    let mut det = FlybyDetector::new(threshold);
    distances
        .iter()
        .enumerate()
        .filter_map(|(i, &d)| det.observe(d, day(i as i64), reference, || q).map(|ev| (i, ev)))
        .collect()
}

#[test]
fn flyby_fires_once_the_frame_after_the_minimum() {
    let distances = [10.0, 8.0, 6.0, 4.0, 2.0, 3.0, 5.0, 7.0, 9.0];
    let events = run_flyby(&distances, 2.5, Some(0.25), Some(0.2));

    assert_eq!(events.len(), 1);
    let (frame, ev) = events[0];
    assert_eq!(frame, 5);
    assert_eq!(ev.date, day(5));
    assert_eq!(ev.closest_distance, 2.0);
    assert_eq!(ev.perihelion_au, 0.2);
    assert_eq!(ev.trend, Some(PerihelionTrend::Decrease));

    let events = run_flyby(&distances, 2.5, Some(0.25), Some(0.3));
    assert_eq!(events[0].1.trend, Some(PerihelionTrend::Increase));
}

#[test]
fn distant_minimum_is_not_a_flyby() {
    let distances = [10.0, 8.0, 6.0, 4.0, 3.0, 5.0, 7.0];
    assert!(run_flyby(&distances, 2.5, Some(0.25), Some(0.2)).is_empty());
}

#[test]
fn degenerate_elements_skip_the_event() {
    let distances = [4.0, 2.0, 1.0, 2.0, 4.0];
    assert!(run_flyby(&distances, 2.5, None, None).is_empty());
}

#[test]
fn flyby_without_reference_has_no_trend() {
    let distances = [4.0, 2.0, 1.0, 2.0];
    let events = run_flyby(&distances, 2.5, None, Some(0.2));
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].1.trend, None);
}

#[test]
fn flyby_detector_tracks_approach_state() {
    let mut det = FlybyDetector::new(1.0);
    assert_eq!(det.state(), ApproachState::Receding);
    det.observe(5.0, day(0), None, || None);
    assert_eq!(det.state(), ApproachState::Approaching);
    det.observe(5.0, day(1), None, || None);
    assert_eq!(det.state(), ApproachState::Receding);
}

#[test]
fn two_passes_fire_twice() {
    let distances = [3.0, 1.0, 0.5, 1.0, 3.0, 6.0, 3.0, 0.8, 2.0];
    let frames: Vec<usize> = run_flyby(&distances, 1.0, Some(0.25), Some(0.2)).iter().map(|(i, _)| *i).collect();
    assert_eq!(frames, vec![3, 8]);
}

// ==================================================================================
// Orbit-completion detector
// ==================================================================================

#[test]
fn three_sweeps_give_three_samples() {
    let mut det = OrbitCompletionDetector::new(0.9);
    let mut samples = Vec::new();

    // theta from just past -pi, 0.1 rad per frame, a bit over three turns
    for k in 0..=189 {
        let theta = -PI + 0.05 + 0.1 * k as f64;
        let angle = theta.sin().atan2(theta.cos());
        if let Some(s) = det.observe(angle, day(k), || Some(0.25 - 0.01 * k as f64 / 189.0)) {
            samples.push(s);
        }
    }

    assert_eq!(samples.len(), 3);
    assert!(samples.windows(2).all(|w| w[0].date < w[1].date));
}

#[test]
fn first_observation_never_completes_an_orbit() {
    let mut det = OrbitCompletionDetector::new(0.9);
    assert!(det.observe(-3.1, day(0), || Some(0.25)).is_none());
    assert_eq!(det.last_angle(), Some(-3.1));
}

#[test]
fn clockwise_sweeps_are_not_counted() {
    let mut det = OrbitCompletionDetector::new(0.9);
    let mut count = 0;
    for k in 0..=189 {
        let theta = PI - 0.05 - 0.1 * k as f64;
        let angle = theta.sin().atan2(theta.cos());
        if det.observe(angle, day(k), || Some(0.25)).is_some() {
            count += 1;
        }
    }
    assert_eq!(count, 0);
}

#[test]
fn jump_over_the_wrap_band_is_missed() {
    let mut det = OrbitCompletionDetector::new(0.9);
    det.observe(2.5, day(0), || Some(0.25));
    assert!(det.observe(-2.5, day(1), || Some(0.25)).is_none());
}

// ==================================================================================
// Perihelion log
// ==================================================================================

#[test]
fn latest_change_compares_last_two_samples() {
    let mut log = PerihelionLog::new();
    assert!(log.latest_change().is_none());

    log.push(PerihelionSample { date: day(0), perihelion_au: 0.25 });
    assert!(log.latest_change().is_none());

    log.push(PerihelionSample { date: day(150), perihelion_au: 0.2 });
    let change = log.latest_change().unwrap();
    assert!((change.percent + 20.0).abs() < 1e-9);
    assert_eq!(change.trend, PerihelionTrend::Decrease);
    assert!(change.exceeds(0.5));

    log.push(PerihelionSample { date: day(300), perihelion_au: 0.2005 });
    let change = log.latest_change().unwrap();
    assert_eq!(change.trend, PerihelionTrend::Increase);
    assert!(!change.exceeds(0.5));
    assert_eq!(log.len(), 3);
}

// ==================================================================================
// Path phases
// ==================================================================================

#[test]
fn new_track_has_one_open_phase() {
    let track = PhaseTrack::new(t0(), path_settings(100, 3)).unwrap();
    assert_eq!(track.len(), 1);
    assert_eq!(track.active().start, t0());
    assert_eq!(track.active().end, PhaseEnd::Open);
    assert!(track.active().is_empty());
}

#[test]
fn phase_settings_are_validated() {
    assert!(matches!(PhaseTrack::new(t0(), path_settings(1, 3)), Err(SimError::InvalidConfiguration(_))));
    assert!(matches!(PhaseTrack::new(t0(), path_settings(100, 0)), Err(SimError::InvalidConfiguration(_))));
}

#[test]
fn n_flybys_make_n_plus_one_phases() {
    let mut track = PhaseTrack::new(t0(), path_settings(100, 16)).unwrap();
    let flybys = [day(30), day(90), day(200), day(410)];
    for d in flybys {
        track.split(d);
    }

    assert_eq!(track.len(), flybys.len() + 1);
    assert_eq!(track.evicted(), 0);

    let phases: Vec<_> = track.phases().collect();
    assert_eq!(phases[0].start, t0());
    for (i, d) in flybys.iter().enumerate() {
        assert_eq!(phases[i].end, PhaseEnd::At(*d));
        assert_eq!(phases[i + 1].start, *d);
    }
    assert!(phases.last().unwrap().is_open());
    assert_eq!(phases.iter().filter(|p| p.is_open()).count(), 1);
}

#[test]
fn retention_cap_evicts_oldest_phases() {
    let mut track = PhaseTrack::new(t0(), path_settings(100, 3)).unwrap();
    for n in 1..=5 {
        track.split(day(n * 10));
    }

    assert_eq!(track.len(), 3);
    assert_eq!(track.evicted(), 3);

    let phases: Vec<_> = track.phases().collect();
    assert_eq!(phases[0].start, day(30));
    assert_eq!(phases[0].end, PhaseEnd::At(day(40)));
    assert_eq!(phases[1].end, PhaseEnd::At(day(50)));
    assert!(phases[2].is_open());
}

#[test]
fn points_commit_only_after_enough_movement() {
    let mut track = PhaseTrack::new(t0(), path_settings(100, 3)).unwrap();

    assert!(track.record(NVec3::new(0.0, 0.0, 0.0))); // first point always commits
    assert!(!track.record(NVec3::new(0.1, 0.0, 0.0))); // 0.01 <= 0.05
    assert!(!track.record(NVec3::new(0.2, 0.0, 0.0))); // 0.04 <= 0.05
    assert!(track.record(NVec3::new(0.3, 0.0, 0.0))); // 0.09 > 0.05

    assert_eq!(track.active().len(), 2);
    track.record(NVec3::new(0.35, 0.0, 0.0));
    assert_eq!(track.live_point(), Some(NVec3::new(0.35, 0.0, 0.0)));

    let rendered = track.rendered_path();
    assert_eq!(rendered.len(), 3);
    assert_eq!(rendered[2], NVec3::new(0.35, 0.0, 0.0));
}

#[test]
fn full_phase_drops_points_but_keeps_live_point() {
    // 4 slots: 3 committed + the live point
    let mut track = PhaseTrack::new(t0(), path_settings(4, 3)).unwrap();
    for i in 0..10 {
        track.record(NVec3::new(i as f64, 0.0, 0.0));
    }

    assert_eq!(track.active().len(), 3);
    assert!(track.active().is_full());
    assert_eq!(track.active().points()[2], NVec3::new(2.0, 0.0, 0.0));
    assert_eq!(track.live_point(), Some(NVec3::new(9.0, 0.0, 0.0)));
    assert_eq!(track.rendered_path().len(), 4);
}

#[test]
fn split_starts_recording_afresh() {
    let mut track = PhaseTrack::new(t0(), path_settings(100, 3)).unwrap();
    track.record(NVec3::new(1.0, 0.0, 0.0));
    track.split(day(5));

    assert!(track.live_point().is_none());
    assert!(track.record(NVec3::new(1.01, 0.0, 0.0)), "new phase commits its first point");
    assert_eq!(track.active().len(), 1);
    assert_eq!(track.phases().next().unwrap().len(), 1);
}

#[test]
fn split_before_phase_start_is_clamped() {
    let mut track = PhaseTrack::new(day(10), path_settings(100, 3)).unwrap();
    track.split(day(3));

    let phases: Vec<_> = track.phases().collect();
    assert_eq!(phases[0].end, PhaseEnd::At(day(10)));
    assert_eq!(phases[1].start, day(10));
}

// ==================================================================================
// Clock
// ==================================================================================

#[test]
fn clock_adds_simulated_days() {
    let mut clock = SimulationClock::new(t0());
    clock.advance(1.5);
    assert_eq!(clock.date(), t0() + TimeDelta::hours(36));
    assert!((clock.elapsed_days() - 1.5).abs() < 1e-15);
}

#[test]
fn clock_reports_year_rollover_once() {
    let start = DateTime::parse_from_rfc3339("2018-12-31T12:00:00Z").unwrap().with_timezone(&Utc);
    let mut clock = SimulationClock::new(start);

    assert_eq!(clock.advance(0.25), None);
    assert_eq!(clock.advance(0.5), Some(2019));
    assert_eq!(clock.advance(10.0), None);
}
