//! Fixed-Step Explicit Runge-Kutta Stepper
//!
//! Advances a system of `N` coupled first-order ODEs by exactly one step of
//! size `h` per call, driven by any [`ButcherTableau`] from the registry.
//!
//! The stepper is a stateful object: each [`RkStepper::advance`] mutates the
//! retained time and state, so repeated calls produce an infinite sequence of
//! samples. [`RkStepper::steps`] exposes the same sequence as a lazy iterator.

use crate::tableau::ButcherTableau;

/// Decimal places that step times are rounded to
pub const TIME_PRECISION: u32 = 6;

/// Finest rounding that still resolves distinct `f64` times
pub const MAX_TIME_PRECISION: u32 = 15;

/// System of ordinary differential equations: dy/dt = f(t, y)
pub trait OdeSystem<const N: usize> {
    /// Evaluate the right-hand side of the ODE system
    ///
    /// # Arguments
    /// * `t` - Current time
    /// * `y` - Current state vector
    /// * `dydt` - Output: derivative dy/dt
    fn rhs(&self, t: f64, y: &[f64; N], dydt: &mut [f64; N]);
}

impl<F, const N: usize> OdeSystem<N> for F
where
    F: Fn(f64, &[f64; N], &mut [f64; N]),
{
    fn rhs(&self, t: f64, y: &[f64; N], dydt: &mut [f64; N]) {
        self(t, y, dydt)
    }
}

/// One emitted step: the new time and state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample<const N: usize> {
    /// Time after the step, rounded to the stepper's precision
    pub t: f64,
    /// State after the step
    pub y: [f64; N],
}

/// Integration statistics for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Total number of right-hand side evaluations
    pub fn_evals: u64,
    /// Number of completed steps
    pub steps: u64,
}

/// Round `t` to `places` decimal places.
///
/// Keeps step times stable across accumulation so that `0.1 + 0.1 + 0.1`
/// lands on `0.3` and can be used as an exact key. `places` is clamped to
/// [`MAX_TIME_PRECISION`].
pub fn round_time(t: f64, places: u32) -> f64 {
    let scale = 10f64.powi(places.min(MAX_TIME_PRECISION) as i32);
    (t * scale).round() / scale
}

/// Tableau-driven explicit Runge-Kutta stepper
///
/// # Type Parameters
/// * `N` - Dimension of the state vector
///
/// # Example
/// ```
/// use rk_projectile::{Method, RkStepper};
///
/// // y' = -y, y(0) = 1
/// let decay = |_t: f64, y: &[f64; 1], dydt: &mut [f64; 1]| dydt[0] = -y[0];
///
/// let mut stepper = RkStepper::new(Method::ForwardEuler.tableau(), 0.0, [1.0], 0.1);
/// let sample = stepper.advance(&decay);
///
/// assert_eq!(sample.t, 0.1);
/// assert!((sample.y[0] - 0.9).abs() < 1e-15);
/// ```
#[derive(Debug, Clone)]
pub struct RkStepper<const N: usize> {
    tableau: &'static ButcherTableau,
    /// Step size
    h: f64,
    /// Current time
    t: f64,
    /// Current state
    y: [f64; N],
    /// Decimal places for time rounding
    precision: u32,
    /// Stage derivatives scaled by h (pre-allocated workspace)
    k: Vec<[f64; N]>,
    /// Integration statistics
    pub stats: Stats,
}

impl<const N: usize> RkStepper<N> {
    /// Create a stepper starting at `(t0, y0)` with fixed step `h`.
    ///
    /// `h` is expected to be positive; the stepper does not check it.
    pub fn new(tableau: &'static ButcherTableau, t0: f64, y0: [f64; N], h: f64) -> Self {
        Self {
            tableau,
            h,
            t: t0,
            y: y0,
            precision: TIME_PRECISION,
            k: vec![[0.0; N]; tableau.stages()],
            stats: Stats::default(),
        }
    }

    /// Override the number of decimal places step times are rounded to,
    /// clamped to `0..=MAX_TIME_PRECISION`
    pub fn with_time_precision(mut self, places: u32) -> Self {
        self.precision = places.min(MAX_TIME_PRECISION);
        self
    }

    /// Tableau driving this stepper
    pub fn tableau(&self) -> &'static ButcherTableau {
        self.tableau
    }

    /// Fixed step size
    pub fn step_size(&self) -> f64 {
        self.h
    }

    /// Time of the last emitted sample (or the start time)
    pub fn time(&self) -> f64 {
        self.t
    }

    /// State of the last emitted sample (or the initial state)
    pub fn state(&self) -> &[f64; N] {
        &self.y
    }

    /// Advance by one step and return the new sample.
    ///
    /// The new time and state are retained for the next call.
    pub fn advance<S: OdeSystem<N>>(&mut self, sys: &S) -> Sample<N> {
        self.compute_stages(sys);
        self.y = self.compute_solution();
        self.t = round_time(self.t + self.h, self.precision);

        self.stats.fn_evals += self.tableau.stages() as u64;
        self.stats.steps += 1;

        Sample {
            t: self.t,
            y: self.y,
        }
    }

    /// Lazy, infinite sequence of samples produced by repeated [`advance`](Self::advance)
    pub fn steps<'a, S: OdeSystem<N>>(&'a mut self, sys: &'a S) -> Steps<'a, N, S> {
        Steps { stepper: self, sys }
    }

    /// Compute k_i = h * f(t + c_i*h, y + sum_{j<i} a_ij * k_j) for every stage
    #[allow(clippy::needless_range_loop)]
    fn compute_stages<S: OdeSystem<N>>(&mut self, sys: &S) {
        let tab = self.tableau;
        let mut y_stage = [0.0; N];
        let mut dydt = [0.0; N];

        for i in 0..tab.stages() {
            for n in 0..N {
                let mut sum = 0.0;
                for j in 0..i {
                    sum += tab.a[i][j] * self.k[j][n];
                }
                y_stage[n] = self.y[n] + sum;
            }

            sys.rhs(self.t + tab.c[i] * self.h, &y_stage, &mut dydt);
            for n in 0..N {
                self.k[i][n] = self.h * dydt[n];
            }
        }
    }

    /// y_{n+1} = y_n + sum_i b_i * k_i
    #[allow(clippy::needless_range_loop)]
    fn compute_solution(&self) -> [f64; N] {
        let mut y_new = [0.0; N];

        for n in 0..N {
            let mut sum = 0.0;
            for (i, b) in self.tableau.b.iter().enumerate() {
                sum += b * self.k[i][n];
            }
            y_new[n] = self.y[n] + sum;
        }

        y_new
    }
}

/// Iterator adapter returned by [`RkStepper::steps`]; never yields `None`
pub struct Steps<'a, const N: usize, S> {
    stepper: &'a mut RkStepper<N>,
    sys: &'a S,
}

impl<const N: usize, S: OdeSystem<N>> Iterator for Steps<'_, N, S> {
    type Item = Sample<N>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.stepper.advance(self.sys))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tableau::Method;
    use approx::assert_abs_diff_eq;

    /// Harmonic oscillator: y'' + ω²y = 0
    /// State: [y, y']
    struct HarmonicOscillator {
        omega: f64,
    }

    impl OdeSystem<2> for HarmonicOscillator {
        fn rhs(&self, _t: f64, y: &[f64; 2], dydt: &mut [f64; 2]) {
            dydt[0] = y[1];
            dydt[1] = -self.omega * self.omega * y[0];
        }
    }

    struct ExpGrowth;

    impl OdeSystem<1> for ExpGrowth {
        fn rhs(&self, _t: f64, y: &[f64; 1], dydt: &mut [f64; 1]) {
            dydt[0] = y[0];
        }
    }

    /// Global error at t = 1 for y' = y, y(0) = 1
    fn exp_growth_error(method: Method, h: f64) -> f64 {
        let mut stepper = RkStepper::new(method.tableau(), 0.0, [1.0], h);
        let n = (1.0 / h).round() as usize;
        let last = stepper.steps(&ExpGrowth).take(n).last().unwrap();
        assert_abs_diff_eq!(last.t, 1.0, epsilon = 1e-12);
        (last.y[0] - std::f64::consts::E).abs()
    }

    #[test]
    fn test_forward_euler_exponential_decay() {
        // y' = -y with Euler gives y_n = (1 - h)^n exactly
        let h = 0.1;
        let decay = |_t: f64, y: &[f64; 1], dydt: &mut [f64; 1]| dydt[0] = -y[0];
        let mut stepper = RkStepper::new(Method::ForwardEuler.tableau(), 0.0, [1.0], h);

        for n in 1..=20 {
            let sample = stepper.advance(&decay);
            let expected = (1.0 - h).powi(n);
            assert!(
                (sample.y[0] - expected).abs() < 1e-14,
                "step {}: y = {}, expected {}",
                n,
                sample.y[0],
                expected
            );
        }
    }

    #[test]
    fn test_classic_4th_order_of_convergence() {
        // Halving h should cut the global error by ~2^4 = 16
        let e1 = exp_growth_error(Method::Classic4, 0.1);
        let e2 = exp_growth_error(Method::Classic4, 0.05);
        let ratio = e1 / e2;
        println!("RK4: err(0.1) = {:.3e}, err(0.05) = {:.3e}, ratio = {:.2}", e1, e2, ratio);
        assert!(
            ratio > 14.0 && ratio < 18.0,
            "Error ratio {:.2} outside [14, 18]",
            ratio
        );
    }

    #[test]
    fn test_order_of_convergence_all_methods() {
        for method in Method::ALL {
            let h = if method.order() >= 3 { 0.1 } else { 0.01 };
            let ratio = exp_growth_error(method, h) / exp_growth_error(method, h / 2.0);
            let expected = 2f64.powi(method.order() as i32);
            println!("{}: ratio = {:.3}, expected ~{}", method, ratio, expected);
            assert!(
                ratio > 0.85 * expected && ratio < 1.15 * expected,
                "{}: error ratio {:.3} not close to {}",
                method,
                ratio,
                expected
            );
        }
    }

    #[test]
    fn test_harmonic_oscillator_one_period() {
        let omega = 1.0;
        let sys = HarmonicOscillator { omega };
        let h = 0.001;
        let period = 2.0 * std::f64::consts::PI;
        let n = (period / h).floor() as usize;

        let mut stepper = RkStepper::new(Method::Classic4.tableau(), 0.0, [1.0, 0.0], h);
        let last = stepper.steps(&sys).take(n).last().unwrap();

        assert_abs_diff_eq!(last.y[0], (omega * last.t).cos(), epsilon = 1e-10);
        assert_abs_diff_eq!(last.y[1], -(omega * last.t).sin(), epsilon = 1e-10);
        println!("  Stats: {:?}", stepper.stats);
    }

    #[test]
    fn test_time_rounding() {
        let sys = |_t: f64, _y: &[f64; 1], dydt: &mut [f64; 1]| dydt[0] = 1.0;
        let mut stepper = RkStepper::new(Method::Ralston.tableau(), 0.0, [0.0], 0.1);
        let times: Vec<f64> = stepper.steps(&sys).take(3).map(|s| s.t).collect();
        // Unrounded accumulation would give 0.30000000000000004
        assert_eq!(times, vec![0.1, 0.2, 0.3]);
        assert_eq!(round_time(1.23456789, 6), 1.234568);
        assert_eq!(round_time(2.0000004, 6), 2.0);
    }

    #[test]
    fn test_custom_time_precision() {
        let sys = |_t: f64, _y: &[f64; 1], dydt: &mut [f64; 1]| dydt[0] = 0.0;
        let mut stepper =
            RkStepper::new(Method::ForwardEuler.tableau(), 0.0, [0.0], 0.123).with_time_precision(1);
        assert_eq!(stepper.advance(&sys).t, 0.1);
        assert_eq!(stepper.advance(&sys).t, 0.2);
    }

    #[test]
    fn test_time_precision_clamped() {
        assert_eq!(round_time(0.1, u32::MAX), round_time(0.1, MAX_TIME_PRECISION));
        assert_eq!(round_time(0.25, u32::MAX), 0.25);

        let sys = |_t: f64, _y: &[f64; 1], dydt: &mut [f64; 1]| dydt[0] = 0.0;
        let mut stepper =
            RkStepper::new(Method::ForwardEuler.tableau(), 0.0, [0.0], 0.5).with_time_precision(u32::MAX);
        assert_eq!(stepper.advance(&sys).t, 0.5);
        assert_eq!(stepper.advance(&sys).t, 1.0);
    }

    #[test]
    fn test_stage_times_follow_nodes() {
        // y' = t integrates exactly with any order >= 2 method
        let ramp = |t: f64, _y: &[f64; 1], dydt: &mut [f64; 1]| dydt[0] = t;
        for method in [Method::ExplicitMidpoint, Method::Ralston, Method::Kutta3, Method::Classic4] {
            let mut stepper = RkStepper::new(method.tableau(), 0.0, [0.0], 0.25);
            let last = stepper.steps(&ramp).take(8).last().unwrap();
            assert_abs_diff_eq!(last.y[0], 0.5 * last.t * last.t, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_independent_instances() {
        let sys = HarmonicOscillator { omega: 2.0 };
        let tab = Method::Classic4.tableau();
        let mut a = RkStepper::new(tab, 0.0, [1.0, 0.0], 0.01);
        let mut b = RkStepper::new(tab, 0.0, [1.0, 0.0], 0.01);

        for _ in 0..10 {
            a.advance(&sys);
        }
        assert_eq!(b.time(), 0.0);
        assert_eq!(b.state(), &[1.0, 0.0]);

        for _ in 0..10 {
            b.advance(&sys);
        }
        assert_eq!(a.state(), b.state());
        assert_eq!(a.time(), b.time());
    }

    #[test]
    fn test_stats_count_stage_evaluations() {
        let sys = HarmonicOscillator { omega: 1.0 };
        let mut stepper = RkStepper::new(Method::Kutta3.tableau(), 0.0, [1.0, 0.0], 0.1);
        stepper.steps(&sys).take(7).for_each(drop);
        assert_eq!(stepper.stats.steps, 7);
        assert_eq!(stepper.stats.fn_evals, 21);
        assert_eq!(stepper.step_size(), 0.1);
        assert_eq!(stepper.tableau().method, Method::Kutta3);
    }
}
