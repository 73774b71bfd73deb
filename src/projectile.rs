//! Drag-Affected Projectile Model
//!
//! Turns launch parameters into two coupled per-axis ODE systems and drives
//! one [`RkStepper`] per axis in lockstep until the projectile reaches ground
//! level (`y <= 0`).
//!
//! # Equations of motion
//!
//! ```text
//! x' = v_x        v_x' = -A·v·v_x
//! y' = v_y        v_y' = -g - A·v·v_y
//! ```
//!
//! where `v = sqrt(v_x² + v_y²)` is shared by both axes.
//!
//! # Drag-lagged coupling
//!
//! The shared speed is recomputed once per completed joint step from the
//! velocities the previous step produced, then held fixed for every stage of
//! both axes during the next step. Stage evaluations of one axis never see the
//! in-flight velocity of the other.

use std::ops::RangeInclusive;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{
    DEFAULT_DRAG_A, DEFAULT_DRAG_B, DEFAULT_DT, DEFAULT_MAX_STEPS, STANDARD_GRAVITY,
};
use crate::error::{Result, SimulationError};
use crate::stepper::{round_time, OdeSystem, RkStepper, Stats, TIME_PRECISION};
use crate::tableau::Method;
use crate::trajectory::{Trajectory, TrajectorySample};

/// Launch and integration parameters for one projectile
///
/// Construct with struct-update syntax over [`Default`]:
///
/// ```
/// use rk_projectile::SimulationParameters;
///
/// let params = SimulationParameters {
///     speed: 30.0,
///     angle: 60.0,
///     gravity: 9.81,
///     ..Default::default()
/// };
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationParameters {
    /// Fixed time step [s], > 0
    pub dt: f64,
    /// Drag coefficient A, >= 0
    pub drag_a: f64,
    /// Reserved drag coefficient B (not used by the drag law)
    pub drag_b: f64,
    /// Mass [kg], > 0
    pub mass: f64,
    /// Initial horizontal position [m]
    pub x0: f64,
    /// Initial vertical position [m]
    pub y0: f64,
    /// Initial speed [m/s], >= 0
    pub speed: f64,
    /// Launch angle [degrees above horizontal]
    pub angle: f64,
    /// Gravitational acceleration [m/s²]
    pub gravity: f64,
    /// Runge-Kutta scheme used for both axes
    pub method: Method,
    /// Steps allowed before the solve is abandoned with [`SimulationError::DidNotLand`]
    pub max_steps: u64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            dt: DEFAULT_DT,
            drag_a: DEFAULT_DRAG_A,
            drag_b: DEFAULT_DRAG_B,
            mass: 1.0,
            x0: 0.0,
            y0: 0.0,
            speed: 20.0,
            angle: 45.0,
            gravity: STANDARD_GRAVITY,
            method: Method::Classic4,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

impl SimulationParameters {
    /// Check every field is in its domain
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("dt", self.dt),
            ("drag_a", self.drag_a),
            ("drag_b", self.drag_b),
            ("mass", self.mass),
            ("x0", self.x0),
            ("y0", self.y0),
            ("speed", self.speed),
            ("angle", self.angle),
            ("gravity", self.gravity),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(invalid(format!("{} must be finite, got {}", name, value)));
            }
        }
        if self.dt <= 0.0 {
            return Err(invalid(format!("dt must be positive, got {}", self.dt)));
        }
        // Step times are rounded keys, so dt must sit on the same grid
        if round_time(self.dt, TIME_PRECISION) != self.dt {
            return Err(invalid(format!(
                "dt must be a multiple of 1e-{}, got {}",
                TIME_PRECISION, self.dt
            )));
        }
        if self.mass <= 0.0 {
            return Err(invalid(format!("mass must be positive, got {}", self.mass)));
        }
        if self.drag_a < 0.0 {
            return Err(invalid(format!("drag_a must be non-negative, got {}", self.drag_a)));
        }
        if self.speed < 0.0 {
            return Err(invalid(format!("speed must be non-negative, got {}", self.speed)));
        }
        if self.max_steps == 0 {
            return Err(invalid("max_steps must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Initial velocity components `(v_x, v_y)`
    pub fn initial_velocity(&self) -> (f64, f64) {
        let (sin, cos) = self.angle.to_radians().sin_cos();
        (self.speed * cos, self.speed * sin)
    }
}

fn invalid(message: String) -> SimulationError {
    SimulationError::InvalidParameters(message)
}

/// Horizontal axis: state `[x, v_x]`
struct HorizontalAxis {
    drag_a: f64,
    /// Shared speed from the previous joint step
    speed: f64,
}

impl OdeSystem<2> for HorizontalAxis {
    fn rhs(&self, _t: f64, y: &[f64; 2], dydt: &mut [f64; 2]) {
        dydt[0] = y[1];
        dydt[1] = -self.drag_a * self.speed * y[1];
    }
}

/// Vertical axis: state `[y, v_y]`
struct VerticalAxis {
    drag_a: f64,
    gravity: f64,
    /// Shared speed from the previous joint step
    speed: f64,
}

impl OdeSystem<2> for VerticalAxis {
    fn rhs(&self, _t: f64, y: &[f64; 2], dydt: &mut [f64; 2]) {
        dydt[0] = y[1];
        dydt[1] = -self.gravity - self.drag_a * self.speed * y[1];
    }
}

/// Headline numbers of a solved flight
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlightSummary {
    /// Time of the landing sample [s]
    pub time_of_flight: f64,
    /// Horizontal distance from launch to the landing sample [m]
    pub range: f64,
    /// Highest recorded y [m]
    pub apex_height: f64,
    /// Time of the highest recorded sample [s]
    pub apex_time: f64,
    /// Velocity components at the landing sample [m/s]
    pub impact_velocity: (f64, f64),
    /// Speed at the landing sample [m/s]
    pub impact_speed: f64,
    /// Kinetic energy at the landing sample [J]
    pub impact_energy: f64,
    /// Joint steps taken
    pub steps: u64,
    /// Right-hand side evaluations over both axes
    pub fn_evals: u64,
}

#[derive(Debug, Clone)]
struct Solution {
    trajectory: Trajectory,
    final_velocity: (f64, f64),
    stats: Stats,
}

#[derive(Debug, Clone)]
enum SolveState {
    Unsolved,
    Solved(Solution),
}

/// One simulated body: parameters plus, once solved, its trajectory
///
/// # Example
/// ```
/// use rk_projectile::{Projectile, SimulationParameters};
///
/// let mut projectile = Projectile::new(SimulationParameters::default()).unwrap();
/// let trajectory = projectile.solve().unwrap();
/// assert!(trajectory.last().unwrap().y <= 0.0);
///
/// let (x_min, x_max) = projectile.x_extent().unwrap();
/// assert!(x_min <= 0.0 && x_max > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Projectile {
    params: SimulationParameters,
    state: SolveState,
}

impl Projectile {
    /// Validate `params` and create an unsolved projectile
    pub fn new(params: SimulationParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            state: SolveState::Unsolved,
        })
    }

    /// Parameters this projectile was built from
    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    /// Whether `solve()` has completed
    pub fn is_solved(&self) -> bool {
        matches!(self.state, SolveState::Solved(_))
    }

    /// Integrate until the first sample with `y <= 0`.
    ///
    /// Calling this on an already solved projectile does no work and
    /// returns the existing trajectory. On error the projectile stays
    /// unsolved.
    pub fn solve(&mut self) -> Result<&Trajectory> {
        if !self.is_solved() {
            let solution = self.integrate()?;
            self.state = SolveState::Solved(solution);
        }
        self.trajectory()
    }

    fn integrate(&self) -> Result<Solution> {
        let p = &self.params;
        let tableau = p.method.tableau();
        let (vx0, vy0) = p.initial_velocity();

        debug!(
            method = %p.method,
            dt = p.dt,
            max_steps = p.max_steps,
            "solving projectile"
        );

        let mut horizontal = RkStepper::new(tableau, 0.0, [p.x0, vx0], p.dt);
        let mut vertical = RkStepper::new(tableau, 0.0, [p.y0, vy0], p.dt);
        let mut trajectory = Trajectory::starting_at(p.x0, p.y0);

        let mut steps = 0u64;
        loop {
            if steps >= p.max_steps {
                warn!(steps, t = vertical.time(), "step ceiling reached before landing");
                return Err(SimulationError::DidNotLand {
                    steps,
                    t: vertical.time(),
                });
            }

            let vx = horizontal.state()[1];
            let vy = vertical.state()[1];
            let speed = (vx * vx + vy * vy).sqrt();

            let h = horizontal.advance(&HorizontalAxis {
                drag_a: p.drag_a,
                speed,
            });
            let v = vertical.advance(&VerticalAxis {
                drag_a: p.drag_a,
                gravity: p.gravity,
                speed,
            });
            steps += 1;

            if !h.y.iter().chain(v.y.iter()).all(|c| c.is_finite()) {
                return Err(SimulationError::NonFiniteState { t: h.t });
            }

            trajectory.push(h.t, h.y[0], v.y[0]);

            if v.y[0] <= 0.0 {
                debug!(steps, t = h.t, x = h.y[0], "projectile landed");
                return Ok(Solution {
                    trajectory,
                    final_velocity: (h.y[1], v.y[1]),
                    stats: Stats {
                        fn_evals: horizontal.stats.fn_evals + vertical.stats.fn_evals,
                        steps,
                    },
                });
            }
        }
    }

    fn solution(&self) -> Result<&Solution> {
        match &self.state {
            SolveState::Solved(solution) => Ok(solution),
            SolveState::Unsolved => Err(SimulationError::NotSolved),
        }
    }

    /// Full trajectory
    pub fn trajectory(&self) -> Result<&Trajectory> {
        Ok(&self.solution()?.trajectory)
    }

    /// Samples recorded within the inclusive time `range`, ordered by time
    pub fn results(&self, range: RangeInclusive<f64>) -> Result<&[TrajectorySample]> {
        Ok(self.trajectory()?.slice(range))
    }

    /// `(min, max)` of recorded x
    pub fn x_extent(&self) -> Result<(f64, f64)> {
        Ok(self.trajectory()?.x_extent())
    }

    /// `(min, max)` of recorded y
    pub fn y_extent(&self) -> Result<(f64, f64)> {
        Ok(self.trajectory()?.y_extent())
    }

    /// Time of the last recorded sample
    pub fn max_time(&self) -> Result<f64> {
        Ok(self.trajectory()?.max_time())
    }

    /// Range, apex and impact figures of the solved flight
    pub fn summary(&self) -> Result<FlightSummary> {
        let solution = self.solution()?;
        let traj = &solution.trajectory;
        let (landing, apex) = match (traj.last(), traj.apex()) {
            (Some(landing), Some(apex)) => (landing, apex),
            _ => return Err(SimulationError::NotSolved),
        };
        let (vx, vy) = solution.final_velocity;
        let impact_speed = (vx * vx + vy * vy).sqrt();

        Ok(FlightSummary {
            time_of_flight: landing.t,
            range: landing.x - self.params.x0,
            apex_height: apex.y,
            apex_time: apex.t,
            impact_velocity: solution.final_velocity,
            impact_speed,
            impact_energy: 0.5 * self.params.mass * impact_speed * impact_speed,
            steps: solution.stats.steps,
            fn_evals: solution.stats.fn_evals,
        })
    }
}
