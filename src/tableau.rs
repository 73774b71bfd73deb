//! Explicit Runge-Kutta Butcher Tableaus
//!
//! Coefficients for the fixed-step explicit schemes the stepper supports,
//! from first-order Forward Euler up to the classic fourth-order method.
//!
//! Every tableau has a zero first-stage row and a strictly lower-triangular
//! coupling matrix, so stage `i` only depends on stages `0..i`.
//!
//! Reference: Hairer, E., Nørsett, S.P., & Wanner, G. (1993). "Solving
//! Ordinary Differential Equations I: Nonstiff Problems". Springer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

/// Coefficient triple (nodes, coupling matrix, weights) of an explicit RK method
#[derive(Debug, PartialEq)]
pub struct ButcherTableau {
    /// Method this tableau belongs to
    pub method: Method,
    /// Order of accuracy
    pub order: u8,
    /// Node coefficients (c_i): stage `i` is evaluated at t_n + c[i]*h
    pub c: &'static [f64],
    /// Stage coupling matrix (a_ij), stored as a[i][j] with a[i][j] = 0 for j >= i
    pub a: &'static [&'static [f64]],
    /// Weights (b_i) of the stage derivatives in the update
    pub b: &'static [f64],
}

impl ButcherTableau {
    /// Number of stages
    pub fn stages(&self) -> usize {
        self.c.len()
    }

    /// Display name of the method
    pub fn name(&self) -> &'static str {
        self.method.name()
    }
}

/// Forward Euler (order 1, 1 stage)
pub static FORWARD_EULER: ButcherTableau = ButcherTableau {
    method: Method::ForwardEuler,
    order: 1,
    c: &[0.0],
    a: &[&[0.0]],
    b: &[1.0],
};

/// Explicit midpoint (order 2, 2 stages)
pub static EXPLICIT_MIDPOINT: ButcherTableau = ButcherTableau {
    method: Method::ExplicitMidpoint,
    order: 2,
    c: &[0.0, 0.5],
    a: &[
        &[0.0, 0.0],
        &[0.5, 0.0],
    ],
    b: &[0.0, 1.0],
};

/// Ralston's second-order method (minimum error bound among 2-stage methods)
pub static RALSTON: ButcherTableau = ButcherTableau {
    method: Method::Ralston,
    order: 2,
    c: &[0.0, 2.0 / 3.0],
    a: &[
        &[0.0, 0.0],
        &[2.0 / 3.0, 0.0],
    ],
    b: &[1.0 / 4.0, 3.0 / 4.0],
};

/// Kutta's third-order method (order 3, 3 stages)
pub static KUTTA_3RD: ButcherTableau = ButcherTableau {
    method: Method::Kutta3,
    order: 3,
    c: &[0.0, 0.5, 1.0],
    a: &[
        &[0.0, 0.0, 0.0],
        &[0.5, 0.0, 0.0],
        &[-1.0, 2.0, 0.0],
    ],
    b: &[1.0 / 6.0, 2.0 / 3.0, 1.0 / 6.0],
};

/// Classic fourth-order Runge-Kutta (RK4)
pub static CLASSIC_4TH: ButcherTableau = ButcherTableau {
    method: Method::Classic4,
    order: 4,
    c: &[0.0, 0.5, 0.5, 1.0],
    a: &[
        &[0.0, 0.0, 0.0, 0.0],
        &[0.5, 0.0, 0.0, 0.0],
        &[0.0, 0.5, 0.0, 0.0],
        &[0.0, 0.0, 1.0, 0.0],
    ],
    b: &[1.0 / 6.0, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 6.0],
};

/// Supported explicit Runge-Kutta schemes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Method {
    /// Forward Euler
    ForwardEuler,
    /// Explicit midpoint
    ExplicitMidpoint,
    /// Ralston
    Ralston,
    /// Kutta 3rd order
    Kutta3,
    /// Classic 4th order
    #[default]
    Classic4,
}

impl Method {
    /// All supported methods, lowest order first
    pub const ALL: [Method; 5] = [
        Method::ForwardEuler,
        Method::ExplicitMidpoint,
        Method::Ralston,
        Method::Kutta3,
        Method::Classic4,
    ];

    /// Canonical registry name
    pub fn name(self) -> &'static str {
        match self {
            Method::ForwardEuler => "Forward Euler",
            Method::ExplicitMidpoint => "Explicit Midpoint",
            Method::Ralston => "Ralston",
            Method::Kutta3 => "Kutta-3rd",
            Method::Classic4 => "Classic-4th",
        }
    }

    /// Short name accepted on the command line
    pub fn alias(self) -> &'static str {
        match self {
            Method::ForwardEuler => "euler",
            Method::ExplicitMidpoint => "midpoint",
            Method::Ralston => "ralston",
            Method::Kutta3 => "kutta3",
            Method::Classic4 => "rk4",
        }
    }

    /// Static coefficient set for this method
    pub fn tableau(self) -> &'static ButcherTableau {
        match self {
            Method::ForwardEuler => &FORWARD_EULER,
            Method::ExplicitMidpoint => &EXPLICIT_MIDPOINT,
            Method::Ralston => &RALSTON,
            Method::Kutta3 => &KUTTA_3RD,
            Method::Classic4 => &CLASSIC_4TH,
        }
    }

    /// Order of accuracy
    pub fn order(self) -> u8 {
        self.tableau().order
    }

    /// Number of stages
    pub fn stages(self) -> usize {
        self.tableau().stages()
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Method::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(wanted) || m.alias().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SimulationError::UnknownMethod(s.to_string()))
    }
}

impl TryFrom<String> for Method {
    type Error = SimulationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Method> for String {
    fn from(method: Method) -> Self {
        method.name().to_string()
    }
}

/// Look up a tableau by registry name or alias
pub fn lookup(name: &str) -> crate::Result<&'static ButcherTableau> {
    Ok(name.parse::<Method>()?.tableau())
}

/// Names of all supported methods
pub fn method_names() -> impl Iterator<Item = &'static str> {
    Method::ALL.into_iter().map(Method::name)
}
