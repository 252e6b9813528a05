use std::fmt;
use std::str::FromStr;

use crate::error::{InputError, Result};
use crate::math::linspace;

/// Smallest accepted resolution.
pub const MIN_RESOLUTION: usize = 2;

/// Largest accepted resolution.
pub const MAX_RESOLUTION: usize = 20_000;

/// A closed numeric interval with `min < max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    min: f64,
    max: f64,
}

impl Range {
    /// Creates a new range.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InvalidRange`] unless both bounds are finite and
    /// `min < max`.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(InputError::InvalidRange { min, max }.into());
        }
        Ok(Self { min, max })
    }

    /// Lower bound.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Width of the range.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Returns `true` if `v` lies within the closed range.
    #[must_use]
    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }
}

impl Default for Range {
    /// `[-10, 10]`.
    fn default() -> Self {
        Self {
            min: -10.0,
            max: 10.0,
        }
    }
}

impl FromStr for Range {
    type Err = InputError;

    /// Parses `"min,max"`, tolerating whitespace around either number.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut parts = s.split(',');
        let (Some(lo), Some(hi), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(InputError::MalformedRange(s.to_owned()));
        };
        let parse = |text: &str| {
            text.trim()
                .parse::<f64>()
                .map_err(|_| InputError::MalformedRange(s.to_owned()))
        };
        let (min, max) = (parse(lo)?, parse(hi)?);
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(InputError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.min, self.max)
    }
}

/// An interval sampled at `n` evenly spaced coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleDomain {
    range: Range,
    n: usize,
}

impl SampleDomain {
    /// Creates a new sample domain.
    ///
    /// # Errors
    ///
    /// Returns an error if the bounds are invalid or `n` lies outside
    /// [`MIN_RESOLUTION`]`..=`[`MAX_RESOLUTION`].
    pub fn new(min: f64, max: f64, n: usize) -> Result<Self> {
        Self::from_range(Range::new(min, max)?, n)
    }

    /// Creates a sample domain over an existing range.
    ///
    /// # Errors
    ///
    /// Returns an error if `n` is out of bounds.
    pub fn from_range(range: Range, n: usize) -> Result<Self> {
        validate_resolution(n)?;
        Ok(Self { range, n })
    }

    /// The sampled interval.
    #[must_use]
    pub fn range(&self) -> Range {
        self.range
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.n
    }

    /// Always `false`; a domain holds at least [`MIN_RESOLUTION`] samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The sample coordinates, first and last exactly on the bounds.
    #[must_use]
    pub fn samples(&self) -> Vec<f64> {
        linspace(self.range.min, self.range.max, self.n)
    }
}

/// Checks a resolution against the hard bounds.
///
/// # Errors
///
/// Returns [`InputError::ResolutionOutOfRange`] when out of bounds.
pub fn validate_resolution(n: usize) -> Result<()> {
    if (MIN_RESOLUTION..=MAX_RESOLUTION).contains(&n) {
        Ok(())
    } else {
        Err(InputError::ResolutionOutOfRange {
            value: n,
            min: MIN_RESOLUTION,
            max: MAX_RESOLUTION,
        }
        .into())
    }
}
