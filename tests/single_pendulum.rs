use std::f64::consts::FRAC_PI_2;

use approx::assert_relative_eq;
use glam::DVec2;
use pendula::config::{PendulumMode, SimConfig};
use pendula::core::state::PhaseVector;
use pendula::simulation::SinglePendulumSim;

fn config(l: f64, damping: f64, theta0: f64, dt: f64) -> SimConfig {
    let mut cfg = SimConfig::default();
    cfg.mode = PendulumMode::Single;
    cfg.dt = dt;
    cfg.single.l = l;
    cfg.single.damping = damping;
    cfg.single.theta0 = theta0;
    cfg.single.omega0 = 0.0;
    cfg
}

#[test]
fn small_angle_period_matches_theory() {
    // Undamped, theta0 = 0.01: the linearized period 2*pi*sqrt(l/g) should
    // hold to well within a percent.
    let l = 75.0;
    let g = 9.8;
    let dt = 1e-3;
    let mut sim = SinglePendulumSim::from_config(&config(l, 0.0, 0.01, dt)).unwrap();
    let expected = std::f64::consts::TAU * (l / g).sqrt();

    // Interpolated times of downward zero crossings, one per period.
    let mut crossings = Vec::new();
    let mut prev = sim.state().theta;
    let mut prev_t = sim.time();
    while crossings.len() < 6 {
        let frame = sim.advance(None);
        let theta = frame.state.theta;
        if prev > 0.0 && theta <= 0.0 {
            crossings.push(prev_t + dt * prev / (prev - theta));
        }
        prev = theta;
        prev_t = sim.time();
    }

    let periods: Vec<f64> = crossings.windows(2).map(|w| w[1] - w[0]).collect();
    let mean = periods.iter().sum::<f64>() / periods.len() as f64;
    println!("measured period {mean:.4}, expected {expected:.4}");
    assert!((mean - expected).abs() / expected < 0.01);
}

#[test]
fn trajectories_are_deterministic() {
    let run = || {
        let mut sim = SinglePendulumSim::from_config(&SimConfig::default()).unwrap();
        (0..500).map(|_| sim.advance(None).state).collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn manual_override_places_bob_under_pointer() {
    let mut sim = SinglePendulumSim::from_config(&SimConfig::default()).unwrap();

    // Build up some velocity first so the reset is observable.
    for _ in 0..50 {
        sim.advance(None);
    }
    assert!(sim.state().omega != 0.0);
    let trail_len = sim.trail().len();
    let t = sim.time();

    // Pointer 100 px right of the pivot (300, 200): bx=100, by=0, so
    // theta = atan2(100, 0) = pi/2 and the velocity dies.
    let frame = sim.advance(Some(DVec2::new(400.0, 200.0)));
    assert_relative_eq!(frame.state.theta, FRAC_PI_2, epsilon = 1e-12);
    assert_eq!(frame.state.omega, 0.0);
    assert_relative_eq!(frame.bob.x, 375.0, epsilon = 1e-9);
    assert_relative_eq!(frame.bob.y, 200.0, epsilon = 1e-9);

    // An engaged pointer means no integration step and no trail growth.
    assert_eq!(sim.trail().len(), trail_len);
    assert_eq!(sim.time(), t);
}

#[test]
fn damping_bleeds_energy() {
    let mut sim = SinglePendulumSim::from_config(&config(75.0, 0.05, 1.0, 0.01)).unwrap();

    let mut early_max: f64 = 0.0;
    for _ in 0..5_000 {
        early_max = early_max.max(sim.advance(None).state.theta.abs());
    }
    let mut late_max: f64 = 0.0;
    for _ in 0..15_000 {
        sim.advance(None);
    }
    for _ in 0..5_000 {
        late_max = late_max.max(sim.advance(None).state.theta.abs());
    }

    println!("early amplitude {early_max:.4}, late amplitude {late_max:.4}");
    assert!(late_max < 0.5 * early_max);
}

#[test]
fn absurd_dt_halts_instead_of_rendering_nan() {
    let mut sim = SinglePendulumSim::from_config(&config(75.0, 0.5, 2.0, 1e6)).unwrap();

    for _ in 0..100 {
        let frame = sim.advance(None);
        assert!(frame.state.is_finite());
        assert!(frame.bob.x.is_finite() && frame.bob.y.is_finite());
    }
    // The blow-up must have been caught, leaving the last finite state.
    assert!(sim.is_halted());
    assert!(sim.state().is_finite());
}
