use std::f64::consts::{FRAC_PI_2, PI};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

/// Which system the viewer runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PendulumMode {
    Single,
    Double,
}

/// Single damped pendulum setup. Defaults mirror the classic demo: a 75 px
/// rod released from 135° with light damping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SingleConfig {
    pub l: f64,
    pub damping: f64,
    pub theta0: f64,
    pub omega0: f64,
    /// Pivot position in screen pixels.
    pub pivot: [f64; 2],
}

impl Default for SingleConfig {
    fn default() -> Self {
        Self {
            l: 75.0,
            damping: 0.01,
            theta0: PI * (135.0 / 180.0),
            omega0: 0.0,
            pivot: [300.0, 200.0],
        }
    }
}

/// Double pendulum setup. The default initial condition (θ1 = π/2,
/// θ2 = −π/2.1) sits deep in the chaotic regime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DoubleConfig {
    pub m1: f64,
    pub m2: f64,
    pub l1: f64,
    pub l2: f64,
    pub damping: f64,
    pub theta1: f64,
    pub theta2: f64,
    pub omega1: f64,
    pub omega2: f64,
    pub pivot: [f64; 2],
}

impl Default for DoubleConfig {
    fn default() -> Self {
        Self {
            m1: 1.0,
            m2: 1.0,
            l1: 100.0,
            l2: 100.0,
            damping: 0.0,
            theta1: FRAC_PI_2,
            theta2: -PI / 2.1,
            omega1: 0.0,
            omega2: 0.0,
            pivot: [300.0, 100.0],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    pub max_points: usize,
    pub fade: bool,
    /// When false the trail grows without bound.
    pub evict: bool,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            max_points: 1024,
            fade: true,
            evict: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 400,
        }
    }
}

/// Everything a run needs, loadable from a RON file. All physical
/// parameters are fixed once the drivers are built from this.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub mode: PendulumMode,
    pub g: f64,
    /// Simulated time advanced per frame, independent of wall clock.
    pub dt: f64,
    pub single: SingleConfig,
    pub double: DoubleConfig,
    pub trail: TrailConfig,
    pub window: WindowConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            mode: PendulumMode::Double,
            g: 9.8,
            dt: 0.1,
            single: SingleConfig::default(),
            double: DoubleConfig::default(),
            trail: TrailConfig::default(),
            window: WindowConfig::default(),
        }
    }
}

impl SimConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = ron::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the run-level knobs. Mass/length positivity is enforced by the
    /// law constructors, so a config that passes here can still be rejected
    /// when the driver is built, but never silently as NaN mid-simulation.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.dt.is_finite() && self.dt > 0.0,
            "dt must be positive, got {}",
            self.dt
        );
        ensure!(self.trail.max_points > 0, "trail.max_points must be > 0");
        for (name, pivot) in [("single", self.single.pivot), ("double", self.double.pivot)] {
            ensure!(
                pivot[0].is_finite() && pivot[1].is_finite(),
                "{name}.pivot must be finite"
            );
        }
        ensure!(
            self.window.width > 0 && self.window.height > 0,
            "window dimensions must be non-zero"
        );
        Ok(())
    }
}
