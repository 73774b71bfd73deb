//! # rk-projectile: Drag-Affected Projectile Motion on Explicit Runge-Kutta
//!
//! Simulates a projectile under gravity and quadratic air drag by integrating
//! the horizontal and vertical equations of motion with a fixed-step explicit
//! Runge-Kutta method until the projectile returns to ground level.
//!
//! ## Features
//!
//! - Tableau-driven stepper for any explicit RK scheme over `N` coupled ODEs
//! - Registry of five schemes: Forward Euler, Explicit Midpoint, Ralston,
//!   Kutta-3rd and Classic-4th
//! - Projectile model with drag-lagged coupling between the two axes
//! - Ground impact detection with a step ceiling instead of an unbounded loop
//! - Parallel solving of independent projectiles and display-bound aggregation
//! - JSON scenario files
//!
//! ## Basic Usage
//!
//! ```rust
//! use rk_projectile::{Projectile, SimulationParameters};
//!
//! let params = SimulationParameters {
//!     dt: 0.025,
//!     drag_a: 4e-5,
//!     speed: 20.0,
//!     angle: 45.0,
//!     gravity: 9.81,
//!     ..Default::default()
//! };
//!
//! let mut projectile = Projectile::new(params).unwrap();
//! projectile.solve().unwrap();
//!
//! let first_second = projectile.results(0.0..=1.0).unwrap();
//! assert_eq!(first_second.len(), 41);
//! assert_eq!(projectile.max_time().unwrap(), 2.9);
//! ```
//!
//! ## Using the Stepper Directly
//!
//! Any type implementing [`OdeSystem`] (including closures) can be advanced
//! one step at a time:
//!
//! ```rust
//! use rk_projectile::{Method, OdeSystem, RkStepper};
//!
//! // Harmonic oscillator: y'' + ω²y = 0, state [y, y']
//! struct HarmonicOscillator { omega: f64 }
//!
//! impl OdeSystem<2> for HarmonicOscillator {
//!     fn rhs(&self, _t: f64, y: &[f64; 2], dydt: &mut [f64; 2]) {
//!         dydt[0] = y[1];
//!         dydt[1] = -self.omega * self.omega * y[0];
//!     }
//! }
//!
//! let sys = HarmonicOscillator { omega: 1.0 };
//! let method: Method = "Classic-4th".parse().unwrap();
//! let mut stepper = RkStepper::new(method.tableau(), 0.0, [1.0, 0.0], 0.01);
//!
//! let sample = stepper.steps(&sys).take(100).last().unwrap();
//! assert_eq!(sample.t, 1.0);
//! assert!((sample.y[0] - 1f64.cos()).abs() < 1e-9);
//! ```
//!
//! ## Drag Coupling
//!
//! The speed `v` in the drag term `-A·v·v_i` is shared by both axes and is
//! updated once per completed step from the previous step's velocities. It
//! is not re-evaluated inside the RK stages. See [`projectile`] for details.
//!
//! ## References
//!
//! 1. Hairer, E., Nørsett, S.P., & Wanner, G. (1993). "Solving
//!    Ordinary Differential Equations I: Nonstiff Problems".
//!    Springer.
//!
//! 2. Butcher, J.C. (2016). "Numerical Methods for Ordinary Differential
//!    Equations", 3rd ed. Wiley.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod batch;
pub mod config;
pub mod error;
pub mod projectile;
pub mod stepper;
pub mod tableau;
pub mod trajectory;

pub use batch::{solve_batch, DisplayBounds, DEFAULT_PADDING};
pub use config::{ProjectileConfig, ScenarioConfig, STANDARD_GRAVITY};
pub use error::{Result, SimulationError};
pub use projectile::{FlightSummary, Projectile, SimulationParameters};
pub use stepper::{
    round_time, OdeSystem, RkStepper, Sample, Stats, Steps, MAX_TIME_PRECISION, TIME_PRECISION,
};
pub use tableau::{lookup, method_names, ButcherTableau, Method};
pub use trajectory::{Trajectory, TrajectorySample};
