use tracing::debug;

use crate::error::Result;
use crate::expr::{Bindings, Expr, Variable};
use crate::math::Point2;

use super::SampleDomain;

/// Samples an explicit curve `y = f(x)`.
#[derive(Debug, Clone)]
pub struct SampleExplicit<'a> {
    source: &'a str,
    domain: SampleDomain,
}

impl<'a> SampleExplicit<'a> {
    /// Creates a new `SampleExplicit` operation over `domain` in `x`.
    #[must_use]
    pub fn new(source: &'a str, domain: SampleDomain) -> Self {
        Self { source, domain }
    }

    /// Executes the sampling.
    ///
    /// Returns exactly `domain.len()` points with evenly spaced x. A sample
    /// whose evaluation fails gets `y = NaN`; the remaining samples are
    /// unaffected.
    ///
    /// # Errors
    ///
    /// Returns an error only if the expression does not parse.
    pub fn execute(&self) -> Result<Vec<Point2>> {
        let expr = Expr::parse(self.source, &[Variable::X])?;
        let points: Vec<Point2> = self
            .domain
            .samples()
            .into_iter()
            .map(|x| {
                let y = expr
                    .eval(&Bindings::new().with(Variable::X, x))
                    .unwrap_or(f64::NAN);
                Point2::new(x, y)
            })
            .collect();

        debug!(
            expr = self.source,
            samples = points.len(),
            undefined = points.iter().filter(|p| p.y.is_nan()).count(),
            "sampled explicit curve"
        );
        Ok(points)
    }
}
