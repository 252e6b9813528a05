use std::f64::consts::TAU;

use tracing::debug;

use crate::error::Result;
use crate::expr::{Bindings, Expr, Variable};
use crate::math::Point2;

use super::domain::validate_resolution;

/// Samples a polar curve `r = f(theta)` over `theta` in `[0, 2pi)`.
#[derive(Debug, Clone)]
pub struct SamplePolar<'a> {
    source: &'a str,
    n: usize,
}

impl<'a> SamplePolar<'a> {
    /// Creates a new `SamplePolar` operation with `n` angular samples.
    #[must_use]
    pub fn new(source: &'a str, n: usize) -> Self {
        Self { source, n }
    }

    /// Executes the sampling.
    ///
    /// Sample `i` sits at `theta = 2pi * i / n`, so the full turn is covered
    /// without repeating the starting angle. Each radius is converted to
    /// Cartesian `(r cos theta, r sin theta)`; failed samples are `NaN`.
    ///
    /// # Errors
    ///
    /// Returns an error if the expression does not parse or `n` is out of
    /// bounds.
    #[allow(clippy::cast_precision_loss)]
    pub fn execute(&self) -> Result<Vec<Point2>> {
        validate_resolution(self.n)?;
        let expr = Expr::parse(self.source, &[Variable::Theta])?;

        let step = TAU / self.n as f64;
        let points: Vec<Point2> = (0..self.n)
            .map(|i| {
                let theta = step * i as f64;
                match expr.eval(&Bindings::new().with(Variable::Theta, theta)) {
                    Ok(r) => Point2::new(r * theta.cos(), r * theta.sin()),
                    Err(_) => Point2::new(f64::NAN, f64::NAN),
                }
            })
            .collect();

        debug!(expr = self.source, samples = points.len(), "sampled polar curve");
        Ok(points)
    }
}
