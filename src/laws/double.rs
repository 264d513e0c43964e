use anyhow::{Result, ensure};

use crate::core::state::DoubleState;
use crate::laws::dynamics::Dynamics;

/// Two coupled pendulums, integrated undamped.
///
/// The angular accelerations share the denominator
/// `2·m1 + m2 - m2·cos(2θ1 - 2θ2)`, whose range over all angles is
/// `[2·m1, 2·m1 + 2·m2]`. With positive masses it is bounded away from
/// zero, so the derivative never divides by zero.
#[derive(Debug, Clone, Copy)]
pub struct DoublePendulum {
    pub g: f64,
    pub m1: f64,
    pub m2: f64,
    pub l1: f64,
    pub l2: f64,
    /// Accepted for configuration parity with
    /// [`SinglePendulum`](crate::laws::single::SinglePendulum), but the
    /// double link is integrated without friction: this coefficient has no
    /// effect on the derivative.
    pub damping: f64,
}

impl DoublePendulum {
    pub fn new(g: f64, m1: f64, m2: f64, l1: f64, l2: f64, damping: f64) -> Result<Self> {
        ensure!(g.is_finite(), "gravity must be finite, got {g}");
        ensure!(
            m1.is_finite() && m1 > 0.0,
            "inner mass must be positive, got {m1}"
        );
        ensure!(
            m2.is_finite() && m2 > 0.0,
            "outer mass must be positive, got {m2}"
        );
        ensure!(
            l1.is_finite() && l1 > 0.0,
            "inner rod length must be positive, got {l1}"
        );
        ensure!(
            l2.is_finite() && l2 > 0.0,
            "outer rod length must be positive, got {l2}"
        );
        ensure!(
            damping.is_finite() && damping >= 0.0,
            "damping must be non-negative, got {damping}"
        );
        Ok(Self {
            g,
            m1,
            m2,
            l1,
            l2,
            damping,
        })
    }

    fn denominator(&self, theta1: f64, theta2: f64) -> f64 {
        2.0 * self.m1 + self.m2 - self.m2 * (2.0 * theta1 - 2.0 * theta2).cos()
    }
}

impl Dynamics for DoublePendulum {
    type State = DoubleState;

    fn derivative(&self, s: &DoubleState) -> DoubleState {
        let Self {
            g, m1, m2, l1, l2, ..
        } = *self;
        let delta = s.theta1 - s.theta2;
        let den = self.denominator(s.theta1, s.theta2);

        let alpha1 = (-g * (2.0 * m1 + m2) * s.theta1.sin()
            - m2 * g * (s.theta1 - 2.0 * s.theta2).sin()
            - 2.0
                * delta.sin()
                * m2
                * (s.omega2 * s.omega2 * l2 + s.omega1 * s.omega1 * l1 * delta.cos()))
            / (l1 * den);

        let alpha2 = (2.0
            * delta.sin()
            * (s.omega1 * s.omega1 * l1 * (m1 + m2)
                + g * (m1 + m2) * s.theta1.cos()
                + s.omega2 * s.omega2 * l2 * m2 * delta.cos()))
            / (l2 * den);

        DoubleState {
            theta1: s.omega1,
            theta2: s.omega2,
            omega1: alpha1,
            omega2: alpha2,
        }
    }
}
