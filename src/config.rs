//! Scenario configuration loaded from JSON.
//!
//! A scenario shares the integration settings and the drag law between
//! several projectiles, each with its own mass, launch point, speed and angle:
//!
//! ```json
//! {
//!   "dt": 0.025,
//!   "drag_a": 4e-5,
//!   "gravity": 9.80665,
//!   "method": "Classic-4th",
//!   "projectiles": [
//!     { "label": "45°", "mass": 1.0, "speed": 20.0, "angle": 45.0 },
//!     { "label": "60°", "mass": 1.0, "speed": 20.0, "angle": 60.0 }
//!   ]
//! }
//! ```
//!
//! Every field except `projectiles` is optional and falls back to the
//! constants below.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::projectile::SimulationParameters;
use crate::tableau::Method;

/// Default fixed time step [s]
pub const DEFAULT_DT: f64 = 0.025;

/// Default drag coefficient A of the drag law `-A·v·v_i`
pub const DEFAULT_DRAG_A: f64 = 4e-5;

/// Default reserved drag coefficient B
pub const DEFAULT_DRAG_B: f64 = 0.0;

/// Standard gravitational acceleration [m/s²]
pub const STANDARD_GRAVITY: f64 = 9.80665;

/// Default ceiling on integration steps before giving up on landing
pub const DEFAULT_MAX_STEPS: u64 = 1_000_000;

fn default_dt() -> f64 {
    DEFAULT_DT
}

fn default_drag_a() -> f64 {
    DEFAULT_DRAG_A
}

fn default_gravity() -> f64 {
    STANDARD_GRAVITY
}

fn default_max_steps() -> u64 {
    DEFAULT_MAX_STEPS
}

/// Per-projectile launch configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileConfig {
    /// Display label; defaults to the launch angle
    #[serde(default)]
    pub label: Option<String>,
    /// Mass [kg]
    pub mass: f64,
    /// Initial horizontal position [m]
    #[serde(default)]
    pub x0: f64,
    /// Initial vertical position [m]
    #[serde(default)]
    pub y0: f64,
    /// Initial speed [m/s]
    pub speed: f64,
    /// Launch angle [degrees above horizontal]
    pub angle: f64,
}

/// A set of projectiles sharing step size, drag law and gravity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Fixed time step [s]
    #[serde(default = "default_dt")]
    pub dt: f64,
    /// Drag coefficient A
    #[serde(default = "default_drag_a")]
    pub drag_a: f64,
    /// Reserved drag coefficient B
    #[serde(default)]
    pub drag_b: f64,
    /// Gravitational acceleration [m/s²]
    #[serde(default = "default_gravity")]
    pub gravity: f64,
    /// Integration method
    #[serde(default)]
    pub method: Method,
    /// Step ceiling per projectile
    #[serde(default = "default_max_steps")]
    pub max_steps: u64,
    /// Projectiles to simulate
    pub projectiles: Vec<ProjectileConfig>,
}

impl ScenarioConfig {
    /// Parse a scenario from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a scenario file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Simulation parameters for each projectile, in file order
    pub fn parameters(&self) -> Vec<SimulationParameters> {
        self.projectiles
            .iter()
            .map(|p| SimulationParameters {
                dt: self.dt,
                drag_a: self.drag_a,
                drag_b: self.drag_b,
                mass: p.mass,
                x0: p.x0,
                y0: p.y0,
                speed: p.speed,
                angle: p.angle,
                gravity: self.gravity,
                method: self.method,
                max_steps: self.max_steps,
            })
            .collect()
    }

    /// Display labels for each projectile, in file order
    pub fn labels(&self) -> Vec<String> {
        self.projectiles
            .iter()
            .map(|p| p.label.clone().unwrap_or_else(|| format!("{}°", p.angle)))
            .collect()
    }
}
