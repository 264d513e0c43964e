use approx::assert_relative_eq;
use pendula::core::solve::{Integrator, Rk2, Rk4};
use pendula::core::state::SingleState;
use pendula::laws::dynamics::Dynamics;

/// d²x/dt² = -x, exact solution x(t) = cos(t) for x(0)=1, v(0)=0.
struct Harmonic;

impl Dynamics for Harmonic {
    type State = SingleState;

    fn derivative(&self, s: &SingleState) -> SingleState {
        SingleState::new(s.omega, -s.theta)
    }
}

fn integrate<I: Integrator>(integrator: &I, mut state: SingleState, dt: f64, steps: usize) -> SingleState {
    for _ in 0..steps {
        state = integrator.step(&Harmonic, state, dt);
    }
    state
}

#[test]
fn rk4_tracks_harmonic_oscillator_over_one_period() {
    let steps = 628;
    let dt = std::f64::consts::TAU / steps as f64;
    let end = integrate(&Rk4, SingleState::new(1.0, 0.0), dt, steps);

    // One full period returns to the initial state.
    assert_relative_eq!(end.theta, 1.0, epsilon = 1e-6);
    assert_relative_eq!(end.omega, 0.0, epsilon = 1e-6);
}

#[test]
fn rk4_is_far_more_accurate_than_rk2() {
    let steps = 628;
    let dt = std::f64::consts::TAU / steps as f64;
    let start = SingleState::new(1.0, 0.0);

    let err = |s: SingleState| (s.theta - 1.0).abs() + s.omega.abs();
    let rk2_err = err(integrate(&Rk2, start, dt, steps));
    let rk4_err = err(integrate(&Rk4, start, dt, steps));

    println!("rk2 error {rk2_err:e}, rk4 error {rk4_err:e}");
    assert!(rk4_err < rk2_err / 100.0);
}

#[test]
fn rk4_error_shrinks_sixteenfold_when_step_halves() {
    let start = SingleState::new(1.0, 0.0);
    let t_final: f64 = 1.0;
    let exact = SingleState::new(t_final.cos(), -t_final.sin());

    let err = |dt: f64, steps: usize| {
        let end = integrate(&Rk4, start, dt, steps);
        (end.theta - exact.theta).abs() + (end.omega - exact.omega).abs()
    };

    let coarse = err(0.1, 10);
    let fine = err(0.05, 20);
    let ratio = coarse / fine;

    println!("coarse {coarse:e}, fine {fine:e}, ratio {ratio:.1}");
    assert!((10.0..24.0).contains(&ratio), "expected ~16, got {ratio}");
}
