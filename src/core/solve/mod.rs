use crate::laws::dynamics::Dynamics;

/// Fixed-step explicit stepper over any [`Dynamics`].
///
/// `step` advances one state by exactly `dt` of simulated time. The drivers
/// call it once per rendered frame, so simulated speed is proportional to the
/// achieved frame rate rather than to the wall clock; `dt` is a simulation
/// constant, not a measured frame delta.
pub trait Integrator {
    fn step<D: Dynamics>(&self, law: &D, state: D::State, dt: f64) -> D::State;
}

/// Two-stage stepper: evaluates the slope once more at the full-step Euler
/// prediction. Far less accurate than [`Rk4`]; kept for cheap A/B accuracy
/// comparisons.
pub struct Rk2;

impl Integrator for Rk2 {
    fn step<D: Dynamics>(&self, law: &D, state: D::State, dt: f64) -> D::State {
        let k1 = law.derivative(&state);
        let k2 = law.derivative(&(state + k1 * dt));
        state + k2 * dt
    }
}

/// Classical 4th-order Runge-Kutta: four slope evaluations per step, local
/// truncation error O(dt⁵), global error O(dt⁴) for smooth right-hand sides.
pub struct Rk4;

impl Integrator for Rk4 {
    fn step<D: Dynamics>(&self, law: &D, state: D::State, dt: f64) -> D::State {
        let k1 = law.derivative(&state);
        let k2 = law.derivative(&(state + k1 * (dt / 2.0)));
        let k3 = law.derivative(&(state + k2 * (dt / 2.0)));
        let k4 = law.derivative(&(state + k3 * dt));

        state + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0)
    }
}
