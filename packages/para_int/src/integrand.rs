use std::fmt::{self, Display};
use std::str::FromStr;

use crate::{Error, Result};

const POWER_SERIES_TERMS: i32 = 60;

/// The catalogue of named integrands that a run can be configured with.
///
/// Every integrand is a pure function of `x`. The quadrature engine accepts any
/// `Fn(f64) -> f64`, so this catalogue is only a convenience for configuration.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum Integrand {
    /// `cos(x^5 * sin(atan(x)))`, rapidly oscillating for larger `x` and moderately expensive
    /// to evaluate.
    #[default]
    Oscillating,

    /// `x^0 + x^1 + ... + x^59`, deliberately expensive to evaluate.
    PowerSeries,

    /// `1`, integrating to the width of the domain.
    Constant,

    /// `x`.
    Identity,
}

impl Integrand {
    /// The integrand as a plain function pointer, cheap to copy into every worker.
    #[must_use]
    pub fn function(self) -> fn(f64) -> f64 {
        match self {
            Self::Oscillating => oscillating,
            Self::PowerSeries => power_series,
            Self::Constant => constant,
            Self::Identity => identity,
        }
    }

    /// Evaluates the integrand at `x`.
    #[must_use]
    pub fn evaluate(self, x: f64) -> f64 {
        (self.function())(x)
    }
}

fn oscillating(x: f64) -> f64 {
    (x.powi(5) * x.atan().sin()).cos()
}

fn power_series(x: f64) -> f64 {
    (0..POWER_SERIES_TERMS).map(|i| x.powi(i)).sum()
}

fn constant(_x: f64) -> f64 {
    1.0
}

fn identity(x: f64) -> f64 {
    x
}

impl Display for Integrand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Oscillating => "oscillating",
            Self::PowerSeries => "power-series",
            Self::Constant => "constant",
            Self::Identity => "identity",
        })
    }
}

impl FromStr for Integrand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "oscillating" => Ok(Self::Oscillating),
            "power-series" => Ok(Self::PowerSeries),
            "constant" => Ok(Self::Constant),
            "identity" => Ok(Self::Identity),
            _ => Err(Error::UnknownIntegrand {
                name: s.to_string(),
            }),
        }
    }
}
