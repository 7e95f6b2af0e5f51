use derive_more::derive::Display;

use crate::{Error, Result};

/// The real interval `[start, end)` over which the integral is approximated.
///
/// A domain is always non-empty, with finite bounds and a finite width.
#[derive(Clone, Copy, Debug, Display, PartialEq)]
#[display("[{start}, {end})")]
pub struct Domain {
    start: f64,
    end: f64,
}

impl Domain {
    /// Creates a domain from its bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDomain`] unless both bounds are finite, `end > start` and
    /// `end - start` does not overflow to infinity.
    pub fn new(start: f64, end: f64) -> Result<Self> {
        if start.is_finite() && end.is_finite() && end > start && (end - start).is_finite() {
            Ok(Self { start, end })
        } else {
            Err(Error::InvalidDomain { start, end })
        }
    }

    /// The inclusive lower bound.
    #[must_use]
    #[inline]
    pub const fn start(&self) -> f64 {
        self.start
    }

    /// The exclusive upper bound.
    #[must_use]
    #[inline]
    pub const fn end(&self) -> f64 {
        self.end
    }

    /// The distance between the bounds. Always positive and finite.
    #[must_use]
    #[inline]
    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// A half-open sub-interval `[begin, end)` of a [`Domain`], integrated by one execution slot.
#[derive(Clone, Copy, Debug, Display, PartialEq)]
#[display("[{begin}, {end})")]
pub struct Interval {
    begin: f64,
    end: f64,
}

impl Interval {
    /// Creates an interval from its bounds. No validation is performed; an interval with
    /// `end <= begin` simply contains no sample points.
    #[must_use]
    pub const fn new(begin: f64, end: f64) -> Self {
        Self { begin, end }
    }

    /// The inclusive lower bound.
    #[must_use]
    #[inline]
    pub const fn begin(&self) -> f64 {
        self.begin
    }

    /// The exclusive upper bound.
    #[must_use]
    #[inline]
    pub const fn end(&self) -> f64 {
        self.end
    }

    /// The distance between the bounds.
    #[must_use]
    #[inline]
    pub fn width(&self) -> f64 {
        self.end - self.begin
    }
}
