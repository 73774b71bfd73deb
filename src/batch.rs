//! Parallel solving of independent projectiles.
//!
//! Each [`Projectile`] owns its steppers and trajectory, so a batch needs no
//! shared state while solving. Aggregating display bounds happens only once
//! every projectile in the slice has been solved.

use rayon::prelude::*;
use tracing::debug;

use crate::error::{Result, SimulationError};
use crate::projectile::{Projectile, SimulationParameters};

/// Fraction of each axis span added on both sides by [`DisplayBounds::padded`]
pub const DEFAULT_PADDING: f64 = 0.08;

/// Solve every parameter set in parallel.
///
/// Results keep the input order; a failed projectile does not affect the
/// others. `threads` limits the worker count, `None` uses rayon's default.
pub fn solve_batch(
    params: Vec<SimulationParameters>,
    threads: Option<usize>,
) -> Result<Vec<Result<Projectile>>> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    let pool = builder.build()?;

    debug!(count = params.len(), threads = pool.current_num_threads(), "solving batch");

    Ok(pool.install(|| {
        params
            .into_par_iter()
            .map(|p| {
                let mut projectile = Projectile::new(p)?;
                projectile.solve()?;
                Ok(projectile)
            })
            .collect()
    }))
}

/// Axis ranges and end time covering a set of solved trajectories
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayBounds {
    /// `(min, max)` horizontal range
    pub x: (f64, f64),
    /// `(min, max)` vertical range
    pub y: (f64, f64),
    /// Latest landing time
    pub max_time: f64,
}

impl Default for DisplayBounds {
    /// The unit box every aggregation starts from
    fn default() -> Self {
        Self {
            x: (0.0, 1.0),
            y: (0.0, 1.0),
            max_time: 0.0,
        }
    }
}

impl DisplayBounds {
    /// Union of the unit box with every projectile's extents.
    ///
    /// Fails with [`SimulationError::NotSolved`] if any projectile is unsolved.
    pub fn from_projectiles<'a>(
        projectiles: impl IntoIterator<Item = &'a Projectile>,
    ) -> Result<Self> {
        projectiles
            .into_iter()
            .try_fold(Self::default(), |bounds, projectile| {
                if !projectile.is_solved() {
                    return Err(SimulationError::NotSolved);
                }
                let (x_lo, x_hi) = projectile.x_extent()?;
                let (y_lo, y_hi) = projectile.y_extent()?;
                Ok(Self {
                    x: (bounds.x.0.min(x_lo), bounds.x.1.max(x_hi)),
                    y: (bounds.y.0.min(y_lo), bounds.y.1.max(y_hi)),
                    max_time: bounds.max_time.max(projectile.max_time()?),
                })
            })
    }

    /// Widen both axes by `fraction` of their span on each side
    pub fn padded(&self, fraction: f64) -> Self {
        let pad = |(lo, hi): (f64, f64)| {
            let d = (hi - lo) * fraction;
            (lo - d, hi + d)
        };
        Self {
            x: pad(self.x),
            y: pad(self.y),
            max_time: self.max_time,
        }
    }
}
