use tracing::debug;

use crate::error::Result;
use crate::expr::{Bindings, Expr, Variable};
use crate::math::linspace;

use super::contour::ScalarGrid;
use super::domain::{validate_resolution, Range};

/// Divisor applied to the plot resolution to get the implicit grid size.
///
/// Implicit curves cost `O(grid^2)` evaluations, so they sample coarser
/// than explicit curves at the same resolution setting.
pub const GRID_DIVISOR: usize = 5;

/// Smallest grid size per axis.
pub const MIN_GRID: usize = 2;

/// Samples `f(x, y)` over a grid for zero-contour extraction.
#[derive(Debug, Clone)]
pub struct SampleImplicit<'a> {
    source: &'a str,
    x_range: Range,
    y_range: Range,
    resolution: usize,
}

impl<'a> SampleImplicit<'a> {
    /// Creates a new `SampleImplicit` operation.
    ///
    /// The grid has `resolution / GRID_DIVISOR` nodes per axis, at least
    /// [`MIN_GRID`].
    #[must_use]
    pub fn new(source: &'a str, x_range: Range, y_range: Range, resolution: usize) -> Self {
        Self {
            source,
            x_range,
            y_range,
            resolution,
        }
    }

    /// Grid nodes per axis for a given plot resolution.
    #[must_use]
    pub fn grid_size(resolution: usize) -> usize {
        (resolution / GRID_DIVISOR).max(MIN_GRID)
    }

    /// Executes the sampling, returning the scalar grid.
    ///
    /// # Errors
    ///
    /// Returns an error if the expression does not parse or the resolution
    /// is out of bounds.
    pub fn execute(&self) -> Result<ScalarGrid> {
        validate_resolution(self.resolution)?;
        let expr = Expr::parse(self.source, &[Variable::X, Variable::Y])?;

        let n = Self::grid_size(self.resolution);
        let xs = linspace(self.x_range.min(), self.x_range.max(), n);
        let ys = linspace(self.y_range.min(), self.y_range.max(), n);
        let grid = ScalarGrid::sample(xs, ys, |x, y| {
            let bindings = Bindings::new().with(Variable::X, x).with(Variable::Y, y);
            expr.eval(&bindings).unwrap_or(f64::NAN)
        });

        debug!(
            expr = self.source,
            grid = n,
            undefined = grid.undefined_count(),
            "sampled implicit curve"
        );
        Ok(grid)
    }
}
