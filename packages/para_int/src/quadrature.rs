use derive_more::derive::Display;

use crate::{Error, Result};

/// The fixed width of every rectangle in the rectangle rule.
///
/// Smaller steps reduce the truncation error and increase the number of integrand evaluations
/// in equal proportion. The step is the same for every slot of a run.
#[derive(Clone, Copy, Debug, Display, PartialEq, PartialOrd)]
#[display("{_0}")]
pub struct Step(f64);

impl Step {
    /// Creates a step of the given width.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStep`] unless the width is finite and positive.
    pub fn new(width: f64) -> Result<Self> {
        if width.is_finite() && width > 0.0 {
            Ok(Self(width))
        } else {
            Err(Error::InvalidStep { step: width })
        }
    }

    /// The width of one rectangle.
    #[must_use]
    #[inline]
    pub const fn get(self) -> f64 {
        self.0
    }
}

/// Approximates the integral of `f` over `[begin, end)` with the left rectangle rule.
///
/// The interval holds `n = floor((end - begin) / step)` whole rectangles. Sample points are
/// `begin + k * step` for `k` in `0..n` and each contributes `f(x) * step`. A fractional
/// remainder at the end of the interval is not sampled, so no rectangle reaches past `end` and
/// two adjacent intervals that share a boundary never both evaluate it.
///
/// Sample points are computed from `k` rather than by repeated addition so that rounding error
/// does not accumulate along the interval. Terms are added in sample order, making the result
/// reproducible for identical arguments. An interval with `end <= begin` integrates to zero.
///
/// # Example
///
/// ```
/// use para_int::{Step, integrate};
///
/// let step = Step::new(0.001).unwrap();
/// let area = integrate(|x| x, 0.0, 1.0, step);
///
/// // The left rectangle rule underestimates an increasing function by about step / 2.
/// assert!((area - 0.4995).abs() < 1e-9);
/// ```
#[must_use]
pub fn integrate(f: impl Fn(f64) -> f64, begin: f64, end: f64, step: Step) -> f64 {
    let step = step.get();
    let rectangles = rectangle_count(end - begin, step);

    (0..rectangles)
        .map(|k| {
            #[expect(
                clippy::cast_precision_loss,
                reason = "sample counts beyond 2^53 are not realistic"
            )]
            let k = k as f64;
            begin + step * k
        })
        // Guards against a product that rounds up onto `end`.
        .take_while(|&x| x < end)
        .map(|x| f(x) * step)
        .sum()
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "checked positive and the cast saturates; larger counts could never be iterated"
)]
fn rectangle_count(width: f64, step: f64) -> u64 {
    let count = (width / step).floor();

    if count.is_nan() || count <= 0.0 {
        0
    } else {
        count as u64
    }
}
