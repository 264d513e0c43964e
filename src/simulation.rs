use anyhow::Result;
use glam::DVec2;

use crate::config::SimConfig;
use crate::control::SimCommand;
use crate::core::solve::{Integrator, Rk4};
use crate::core::state::{DoubleState, PhaseVector, SingleState};
use crate::laws::double::DoublePendulum;
use crate::laws::single::SinglePendulum;
use crate::trail::Trail;

/// What a driver hands the renderer after each frame: the phase state plus
/// the Cartesian bob position(s) derived from it.
#[derive(Debug, Clone, Copy)]
pub struct SingleFrame {
    pub state: SingleState,
    pub bob: DVec2,
}

#[derive(Debug, Clone, Copy)]
pub struct DoubleFrame {
    pub state: DoubleState,
    pub bob1: DVec2,
    pub bob2: DVec2,
}

/// Frame driver for the single damped pendulum.
///
/// Two modes, selected per frame by the pointer signal: while the pointer is
/// engaged the angle is set directly from it (`θ = atan2(bx, by)` relative
/// to the pivot, `ω = 0`) and no integration happens; otherwise one RK4 step
/// is taken per frame while running.
pub struct SinglePendulumSim {
    law: SinglePendulum,
    state: SingleState,
    initial: SingleState,
    pivot: DVec2,
    dt: f64,
    running: bool,
    halted: bool,
    trail: Trail,
    t: f64,
}

impl SinglePendulumSim {
    pub fn from_config(config: &SimConfig) -> Result<Self> {
        config.validate()?;
        let law = SinglePendulum::new(config.g, config.single.l, config.single.damping)?;
        let initial = SingleState::new(config.single.theta0, config.single.omega0);
        Ok(Self {
            law,
            state: initial,
            initial,
            pivot: DVec2::from_array(config.single.pivot),
            dt: config.dt,
            running: true,
            halted: false,
            trail: Trail::new(
                config.trail.max_points,
                config.trail.fade,
                config.trail.evict,
            ),
            t: 0.0,
        })
    }

    /// Advances zero or one step and returns the resulting pose.
    pub fn advance(&mut self, pointer: Option<DVec2>) -> SingleFrame {
        if let Some(p) = pointer {
            // Manual override: place the bob under the pointer and kill the
            // velocity so releasing it restarts the swing from rest.
            let rel = p - self.pivot;
            self.state.theta = rel.x.atan2(rel.y);
            self.state.omega = 0.0;
        } else if self.running {
            self.step_once();
        }
        SingleFrame {
            state: self.state,
            bob: self.bob_position(),
        }
    }

    pub fn apply(&mut self, cmd: SimCommand) {
        match cmd {
            SimCommand::Pause => self.running = false,
            SimCommand::Resume => self.running = true,
            SimCommand::Toggle => self.running = !self.running,
            SimCommand::Step(n) => {
                for _ in 0..n {
                    self.step_once();
                }
            }
            SimCommand::Reset => self.reset(),
        }
    }

    pub fn reset(&mut self) {
        self.state = self.initial;
        self.t = 0.0;
        self.halted = false;
        self.trail.clear();
        tracing::info!(target: "sim", "single pendulum reset");
    }

    pub fn bob_position(&self) -> DVec2 {
        self.pivot + self.law.l * DVec2::new(self.state.theta.sin(), self.state.theta.cos())
    }

    pub fn pivot(&self) -> DVec2 {
        self.pivot
    }

    pub fn state(&self) -> SingleState {
        self.state
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub fn time(&self) -> f64 {
        self.t
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    fn step_once(&mut self) {
        if self.halted {
            return;
        }
        let next = Rk4.step(&self.law, self.state, self.dt);
        if next.is_finite() {
            self.state = next;
            self.t += self.dt;
            self.trail.push(self.bob_position().as_ivec2());
        } else {
            tracing::warn!(
                target: "sim",
                t = self.t,
                dt = self.dt,
                "integration produced a non-finite state, halting"
            );
            self.halted = true;
        }
    }
}

/// Frame driver for the double pendulum.
///
/// Idle or Running, toggled by command. While idle the Cartesian positions
/// are still re-derived from the unchanged state every frame (a paused
/// pendulum keeps rendering its last pose) but no step is taken and nothing
/// is pushed to the trails. While running, exactly one RK4 step and one push
/// per trail happen per frame.
pub struct DoublePendulumSim {
    law: DoublePendulum,
    state: DoubleState,
    initial: DoubleState,
    pivot: DVec2,
    dt: f64,
    running: bool,
    halted: bool,
    inner_trail: Trail,
    outer_trail: Trail,
    t: f64,
}

impl DoublePendulumSim {
    pub fn from_config(config: &SimConfig) -> Result<Self> {
        config.validate()?;
        let d = &config.double;
        let law = DoublePendulum::new(config.g, d.m1, d.m2, d.l1, d.l2, d.damping)?;
        let initial = DoubleState::new(d.theta1, d.theta2, d.omega1, d.omega2);
        let trail = Trail::new(
            config.trail.max_points,
            config.trail.fade,
            config.trail.evict,
        );
        Ok(Self {
            law,
            state: initial,
            initial,
            pivot: DVec2::from_array(d.pivot),
            dt: config.dt,
            // Starts idle; space (or a Resume command) sets it in motion.
            running: false,
            halted: false,
            inner_trail: trail.clone(),
            outer_trail: trail,
            t: 0.0,
        })
    }

    pub fn advance(&mut self) -> DoubleFrame {
        if self.running {
            self.step_once();
        }
        let (bob1, bob2) = self.bob_positions();
        DoubleFrame {
            state: self.state,
            bob1,
            bob2,
        }
    }

    pub fn apply(&mut self, cmd: SimCommand) {
        match cmd {
            SimCommand::Pause => self.running = false,
            SimCommand::Resume => self.running = true,
            SimCommand::Toggle => self.running = !self.running,
            SimCommand::Step(n) => {
                for _ in 0..n {
                    self.step_once();
                }
            }
            SimCommand::Reset => self.reset(),
        }
    }

    pub fn reset(&mut self) {
        self.state = self.initial;
        self.t = 0.0;
        self.halted = false;
        self.inner_trail.clear();
        self.outer_trail.clear();
        tracing::info!(target: "sim", "double pendulum reset");
    }

    pub fn bob_positions(&self) -> (DVec2, DVec2) {
        let bob1 = self.pivot
            + self.law.l1 * DVec2::new(self.state.theta1.sin(), self.state.theta1.cos());
        let bob2 =
            bob1 + self.law.l2 * DVec2::new(self.state.theta2.sin(), self.state.theta2.cos());
        (bob1, bob2)
    }

    pub fn pivot(&self) -> DVec2 {
        self.pivot
    }

    pub fn state(&self) -> DoubleState {
        self.state
    }

    pub fn trails(&self) -> (&Trail, &Trail) {
        (&self.inner_trail, &self.outer_trail)
    }

    pub fn time(&self) -> f64 {
        self.t
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    fn step_once(&mut self) {
        if self.halted {
            return;
        }
        let next = Rk4.step(&self.law, self.state, self.dt);
        if next.is_finite() {
            self.state = next;
            self.t += self.dt;
            let (bob1, bob2) = self.bob_positions();
            self.inner_trail.push(bob1.as_ivec2());
            self.outer_trail.push(bob2.as_ivec2());
        } else {
            tracing::warn!(
                target: "sim",
                t = self.t,
                dt = self.dt,
                "integration produced a non-finite state, halting"
            );
            self.halted = true;
        }
    }
}
