use std::f64::consts::{FRAC_PI_2, PI};

use approx::assert_relative_eq;
use pendula::config::{PendulumMode, SimConfig};
use pendula::control::SimCommand;
use pendula::core::solve::{Integrator, Rk4};
use pendula::core::state::DoubleState;
use pendula::laws::double::DoublePendulum;
use pendula::simulation::DoublePendulumSim;

fn integrate(law: &DoublePendulum, mut state: DoubleState, dt: f64, steps: usize) -> DoubleState {
    for _ in 0..steps {
        state = Rk4.step(law, state, dt);
    }
    state
}

fn deviation(a: DoubleState, b: DoubleState) -> f64 {
    (a.theta1 - b.theta1).abs()
        + (a.theta2 - b.theta2).abs()
        + (a.omega1 - b.omega1).abs()
        + (a.omega2 - b.omega2).abs()
}

#[test]
fn halving_dt_cuts_error_sixteenfold() {
    // Short horizon so chaotic divergence does not yet dominate; the
    // deviation from a much finer reference trajectory should scale as dt^4.
    let law = DoublePendulum::new(9.8, 1.0, 1.0, 1.0, 1.0, 0.0).unwrap();
    let start = DoubleState::new(FRAC_PI_2, -PI / 2.1, 0.0, 0.0);

    let reference = integrate(&law, start, 1e-4, 5_000);
    let coarse = deviation(integrate(&law, start, 1e-2, 50), reference);
    let fine = deviation(integrate(&law, start, 5e-3, 100), reference);
    let ratio = coarse / fine;

    println!("coarse {coarse:e}, fine {fine:e}, ratio {ratio:.1}");
    assert!((10.0..24.0).contains(&ratio), "expected ~16, got {ratio}");
}

#[test]
fn trajectories_are_deterministic_including_pauses() {
    let run = || {
        let mut sim = DoublePendulumSim::from_config(&SimConfig::default()).unwrap();
        sim.apply(SimCommand::Resume);
        let mut states = Vec::new();
        for i in 0..300 {
            if i == 150 {
                sim.apply(SimCommand::Pause);
            }
            if i == 200 {
                sim.apply(SimCommand::Resume);
            }
            states.push(sim.advance().state);
        }
        states
    };
    assert_eq!(run(), run());
}

#[test]
fn damping_coefficient_has_no_effect_on_double_link() {
    // The double link integrates without friction; the coefficient exists
    // only for configuration parity with the single pendulum.
    let undamped = DoublePendulum::new(9.8, 1.0, 2.0, 1.5, 0.7, 0.0).unwrap();
    let damped = DoublePendulum::new(9.8, 1.0, 2.0, 1.5, 0.7, 5.0).unwrap();

    let mut a = DoubleState::new(FRAC_PI_2, -PI / 2.1, 0.3, -0.2);
    let mut b = a;
    for _ in 0..50 {
        a = Rk4.step(&undamped, a, 0.01);
        b = Rk4.step(&damped, b, 0.01);
    }
    assert_eq!(a, b);
}

#[test]
fn idle_driver_keeps_pose_and_pushes_nothing() {
    let mut sim = DoublePendulumSim::from_config(&SimConfig::default()).unwrap();
    let initial = sim.state();

    // Starts idle: positions keep being derived, state and trails untouched.
    let first = sim.advance();
    for _ in 0..9 {
        let frame = sim.advance();
        assert_eq!(frame.state, initial);
        assert_eq!(frame.bob1, first.bob1);
        assert_eq!(frame.bob2, first.bob2);
    }
    let (inner, outer) = sim.trails();
    assert!(inner.is_empty() && outer.is_empty());
    assert_eq!(sim.time(), 0.0);

    // Running: exactly one step and one push per trail per frame.
    sim.apply(SimCommand::Resume);
    for _ in 0..7 {
        sim.advance();
    }
    let (inner, outer) = sim.trails();
    assert_eq!(inner.len(), 7);
    assert_eq!(outer.len(), 7);
    assert_relative_eq!(sim.time(), 7.0 * 0.1, epsilon = 1e-12);

    // Paused again: frozen.
    sim.apply(SimCommand::Pause);
    for _ in 0..3 {
        sim.advance();
    }
    assert_eq!(sim.trails().0.len(), 7);
}

#[test]
fn bob_positions_follow_the_links() {
    let mut cfg = SimConfig::default();
    cfg.mode = PendulumMode::Double;
    cfg.double.theta1 = 0.0;
    cfg.double.theta2 = FRAC_PI_2;
    cfg.double.omega1 = 0.0;
    cfg.double.omega2 = 0.0;

    let sim = DoublePendulumSim::from_config(&cfg).unwrap();
    let (bob1, bob2) = sim.bob_positions();

    // Pivot (300, 100), both rods 100 px: the inner link hangs straight
    // down, the outer one points screen-right.
    assert_relative_eq!(bob1.x, 300.0, epsilon = 1e-9);
    assert_relative_eq!(bob1.y, 200.0, epsilon = 1e-9);
    assert_relative_eq!(bob2.x, 400.0, epsilon = 1e-9);
    assert_relative_eq!(bob2.y, 200.0, epsilon = 1e-9);
}

#[test]
fn reset_restores_initial_conditions() {
    let mut sim = DoublePendulumSim::from_config(&SimConfig::default()).unwrap();
    let initial = sim.state();

    sim.apply(SimCommand::Resume);
    for _ in 0..25 {
        sim.advance();
    }
    assert!(sim.state() != initial);

    sim.apply(SimCommand::Reset);
    assert_eq!(sim.state(), initial);
    assert_eq!(sim.time(), 0.0);
    assert!(sim.trails().0.is_empty() && sim.trails().1.is_empty());
}
