//! Time-indexed trajectory samples.

use std::ops::RangeInclusive;

use serde::Serialize;

use crate::stepper::{round_time, TIME_PRECISION};

/// Position of the projectile at one recorded time
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrajectorySample {
    /// Simulation time, rounded to [`TIME_PRECISION`] places
    pub t: f64,
    /// Horizontal position
    pub x: f64,
    /// Vertical position
    pub y: f64,
}

/// Samples ordered by strictly increasing time
///
/// Always holds at least the initial sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trajectory {
    samples: Vec<TrajectorySample>,
}

impl Trajectory {
    pub(crate) fn starting_at(x0: f64, y0: f64) -> Self {
        Self {
            samples: vec![TrajectorySample { t: 0.0, x: x0, y: y0 }],
        }
    }

    pub(crate) fn push(&mut self, t: f64, x: f64, y: f64) {
        debug_assert!(t > self.max_time(), "samples must be recorded in time order");
        self.samples.push(TrajectorySample { t, x, y });
    }

    /// All samples in time order
    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }

    /// Iterate over samples in time order
    pub fn iter(&self) -> std::slice::Iter<'_, TrajectorySample> {
        self.samples.iter()
    }

    /// Number of samples, including the initial one
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Never true for a trajectory built by the model
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Initial sample
    pub fn first(&self) -> Option<&TrajectorySample> {
        self.samples.first()
    }

    /// Last recorded sample (the landing sample once solved)
    pub fn last(&self) -> Option<&TrajectorySample> {
        self.samples.last()
    }

    /// Samples whose time lies in the inclusive `range`.
    ///
    /// The bounds are rounded like sample times, so `0.0..=0.075` matches
    /// a sample recorded at `0.075` regardless of how the caller computed it.
    pub fn slice(&self, range: RangeInclusive<f64>) -> &[TrajectorySample] {
        let lo = round_time(*range.start(), TIME_PRECISION);
        let hi = round_time(*range.end(), TIME_PRECISION);
        if hi < lo {
            return &[];
        }
        let start = self.samples.partition_point(|s| s.t < lo);
        let end = self.samples.partition_point(|s| s.t <= hi);
        &self.samples[start..end]
    }

    /// `(min, max)` of recorded x
    pub fn x_extent(&self) -> (f64, f64) {
        extent(self.samples.iter().map(|s| s.x))
    }

    /// `(min, max)` of recorded y
    pub fn y_extent(&self) -> (f64, f64) {
        extent(self.samples.iter().map(|s| s.y))
    }

    /// Time of the last recorded sample
    pub fn max_time(&self) -> f64 {
        self.samples.last().map_or(0.0, |s| s.t)
    }

    /// Highest recorded sample
    pub fn apex(&self) -> Option<&TrajectorySample> {
        self.samples.iter().max_by(|a, b| a.y.total_cmp(&b.y))
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a TrajectorySample;
    type IntoIter = std::slice::Iter<'a, TrajectorySample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

fn extent(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}
