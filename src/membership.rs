//! Closed-form membership functions.

use serde::{Deserialize, Serialize};

use crate::error::{FuzzyError, Result};

/// A membership function mapping any real to a degree in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MembershipFunction {
    /// Zero outside `[a, d]`, one on `[b, c]`, linear ramps in between.
    Trapezoid { a: f64, b: f64, c: f64, d: f64 },
    /// Zero outside `[a, c]`, peak of one exactly at `b`.
    Triangle { a: f64, b: f64, c: f64 },
    /// `exp(-(x - mean)^2 / (2 sigma^2))`. Never exactly zero.
    Gaussian { mean: f64, sigma: f64 },
}

impl MembershipFunction {
    pub fn trapezoid(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self::Trapezoid { a, b, c, d }
    }

    pub fn triangle(a: f64, b: f64, c: f64) -> Self {
        Self::Triangle { a, b, c }
    }

    pub fn gaussian(mean: f64, sigma: f64) -> Self {
        Self::Gaussian { mean, sigma }
    }

    pub fn degree(&self, x: f64) -> f64 {
        match *self {
            Self::Trapezoid { a, b, c, d } => {
                if x < a || x > d {
                    0.
                } else if b <= x && x <= c {
                    1.
                } else if x < b {
                    rising(x, a, b)
                } else {
                    falling(x, c, d)
                }
            },
            Self::Triangle { a, b, c } => {
                if x < a || x > c {
                    0.
                } else if x == b {
                    1.
                } else if x < b {
                    rising(x, a, b)
                } else {
                    falling(x, b, c)
                }
            },
            Self::Gaussian { mean, sigma } => (-(x - mean).powi(2) / (2. * sigma * sigma)).exp(),
        }
    }

    /// Checks parameter ordering, finiteness and a positive sigma.
    pub fn validate(&self, term: &str) -> Result<()> {
        let invalid = |reason: String| FuzzyError::InvalidParameter {
            term: term.to_owned(),
            reason,
        };

        let params = match *self {
            Self::Trapezoid { a, b, c, d } => vec![a, b, c, d],
            Self::Triangle { a, b, c } => vec![a, b, c],
            Self::Gaussian { mean, sigma } => vec![mean, sigma],
        };

        if params.iter().any(|p| !p.is_finite()) {
            return Err(invalid(format!("non-finite parameter in {params:?}")));
        }

        match *self {
            Self::Gaussian { sigma, .. } if sigma <= 0. => Err(invalid(format!("sigma must be positive, got {sigma}"))),
            Self::Gaussian { .. } => Ok(()),
            _ if params.windows(2).any(|w| w[0] > w[1]) => {
                Err(invalid(format!("breakpoints must be non-decreasing, got {params:?}")))
            },
            _ => Ok(()),
        }
    }
}

// A zero-length ramp is a vertical step; callers only reach these with
// `lo <= x < hi` or `lo < x <= hi`, but the guard keeps the division safe.
fn rising(x: f64, lo: f64, hi: f64) -> f64 {
    if hi == lo {
        1.
    } else {
        (x - lo) / (hi - lo)
    }
}

fn falling(x: f64, lo: f64, hi: f64) -> f64 {
    if hi == lo {
        1.
    } else {
        (hi - x) / (hi - lo)
    }
}
