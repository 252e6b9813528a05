mod contour;
mod domain;
mod explicit;
mod implicit;
mod parametric;
mod polar;

pub use contour::{ContourSet, ScalarGrid};
pub use domain::{validate_resolution, Range, SampleDomain, MAX_RESOLUTION, MIN_RESOLUTION};
pub use explicit::SampleExplicit;
pub use implicit::{SampleImplicit, GRID_DIVISOR, MIN_GRID};
pub use parametric::{ParametricText, SampleParametric};
pub use polar::SamplePolar;

use crate::error::Result;
use crate::math::{is_defined, Point2};

/// Which curve family a [`CurveSpec`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveKind {
    Explicit,
    Implicit,
    Parametric,
    Polar,
}

/// A curve to plot, described by its defining expression(s).
///
/// Expressions are stored as text and parsed on every evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum CurveSpec {
    /// `y = f(x)`.
    Explicit { expr: String },
    /// `f(x, y) = 0`.
    Implicit { expr: String },
    /// `(x(t), y(t))` for `t` in `[t_min, t_max]`.
    Parametric {
        x_expr: String,
        y_expr: String,
        t_min: f64,
        t_max: f64,
    },
    /// `r = f(theta)` for `theta` in `[0, 2pi)`.
    Polar { expr: String },
}

impl CurveSpec {
    /// Creates an explicit curve.
    pub fn explicit(expr: impl Into<String>) -> Self {
        Self::Explicit { expr: expr.into() }
    }

    /// Creates an implicit curve.
    pub fn implicit(expr: impl Into<String>) -> Self {
        Self::Implicit { expr: expr.into() }
    }

    /// Creates a parametric curve.
    pub fn parametric(
        x_expr: impl Into<String>,
        y_expr: impl Into<String>,
        t_min: f64,
        t_max: f64,
    ) -> Self {
        Self::Parametric {
            x_expr: x_expr.into(),
            y_expr: y_expr.into(),
            t_min,
            t_max,
        }
    }

    /// Creates a polar curve.
    pub fn polar(expr: impl Into<String>) -> Self {
        Self::Polar { expr: expr.into() }
    }

    /// Builds a curve from the single line of text a user typed for `kind`.
    ///
    /// Parametric text has the form `"x(t), y(t), t_min, t_max"`; the other
    /// families take the expression as is.
    ///
    /// # Errors
    ///
    /// Returns an error if parametric text is malformed.
    pub fn from_text(kind: CurveKind, text: &str) -> Result<Self> {
        let text = text.trim();
        Ok(match kind {
            CurveKind::Explicit => Self::explicit(text),
            CurveKind::Implicit => Self::implicit(text),
            CurveKind::Polar => Self::polar(text),
            CurveKind::Parametric => {
                let parsed = ParametricText::parse(text)?;
                Self::parametric(parsed.x_expr, parsed.y_expr, parsed.t_min, parsed.t_max)
            }
        })
    }

    /// The curve family.
    #[must_use]
    pub fn kind(&self) -> CurveKind {
        match self {
            Self::Explicit { .. } => CurveKind::Explicit,
            Self::Implicit { .. } => CurveKind::Implicit,
            Self::Parametric { .. } => CurveKind::Parametric,
            Self::Polar { .. } => CurveKind::Polar,
        }
    }

    /// Legend label.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Explicit { expr } => format!("y = {expr}"),
            Self::Implicit { expr } => format!("{expr} = 0"),
            Self::Parametric { x_expr, y_expr, .. } => format!("x = {x_expr}, y = {y_expr}"),
            Self::Polar { expr } => format!("r = {expr}"),
        }
    }

    /// Evaluates the curve.
    ///
    /// Explicit curves sample `x_range`; implicit curves sample a grid over
    /// both ranges; parametric curves sample their own `t` interval; polar
    /// curves sample a full turn. All use `resolution` samples, implicit
    /// curves reduced per [`SampleImplicit::grid_size`].
    ///
    /// # Errors
    ///
    /// Returns an error if an expression does not parse, or the resolution
    /// or parameter interval is invalid.
    pub fn evaluate(&self, x_range: Range, y_range: Range, resolution: usize) -> Result<CurveData> {
        let data = match self {
            Self::Explicit { expr } => {
                let domain = SampleDomain::from_range(x_range, resolution)?;
                CurveData::Sampled(SampleExplicit::new(expr, domain).execute()?)
            }
            Self::Implicit { expr } => {
                let grid = SampleImplicit::new(expr, x_range, y_range, resolution).execute()?;
                CurveData::Contour(grid.zero_contour())
            }
            Self::Parametric {
                x_expr,
                y_expr,
                t_min,
                t_max,
            } => {
                let domain = SampleDomain::new(*t_min, *t_max, resolution)?;
                CurveData::Sampled(SampleParametric::new(x_expr, y_expr, domain).execute()?)
            }
            Self::Polar { expr } => CurveData::Sampled(SamplePolar::new(expr, resolution).execute()?),
        };
        Ok(data)
    }
}

/// Evaluated curve geometry.
#[derive(Debug, Clone)]
pub enum CurveData {
    /// Ordered samples; undefined samples have `NaN` coordinates.
    Sampled(Vec<Point2>),
    /// Zero-contour of an implicit curve.
    Contour(ContourSet),
}

impl CurveData {
    /// All finite points, in order.
    #[must_use]
    pub fn defined_points(&self) -> Vec<Point2> {
        match self {
            Self::Sampled(points) => points.iter().copied().filter(is_defined).collect(),
            Self::Contour(contour) => contour.polylines.iter().flatten().copied().collect(),
        }
    }

    /// Drawable polylines: maximal runs of defined samples, or the stitched
    /// contour.
    #[must_use]
    pub fn polylines(&self) -> Vec<&[Point2]> {
        match self {
            Self::Sampled(points) => runs(points),
            Self::Contour(contour) => contour.polylines.iter().map(Vec::as_slice).collect(),
        }
    }
}

/// Splits samples into maximal runs of consecutive defined points.
///
/// Undefined samples break the line; single isolated points are kept as
/// runs of length one.
#[must_use]
pub fn runs(points: &[Point2]) -> Vec<&[Point2]> {
    points
        .split(|p| !is_defined(p))
        .filter(|run| !run.is_empty())
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn r(min: f64, max: f64) -> Range {
        Range::new(min, max).unwrap()
    }

    #[test]
    fn runs_split_at_undefined() {
        let nan = f64::NAN;
        let pts = vec![
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 2.0),
            Point2::new(2.0, nan),
            Point2::new(3.0, 4.0),
            Point2::new(nan, nan),
            Point2::new(nan, nan),
            Point2::new(6.0, 7.0),
            Point2::new(7.0, 8.0),
        ];
        let split = runs(&pts);
        assert_eq!(split.len(), 3);
        assert_eq!(split[0].len(), 2);
        assert_eq!(split[1].len(), 1);
        assert_eq!(split[2].len(), 2);
    }

    #[test]
    fn labels() {
        assert_eq!(CurveSpec::explicit("x**2").label(), "y = x**2");
        assert_eq!(CurveSpec::implicit("x*y - 1").label(), "x*y - 1 = 0");
        assert_eq!(CurveSpec::polar("1 + cos(theta)").label(), "r = 1 + cos(theta)");
        assert_eq!(
            CurveSpec::parametric("cos(t)", "sin(t)", 0.0, 1.0).label(),
            "x = cos(t), y = sin(t)"
        );
    }

    #[test]
    fn from_text_parametric() {
        let spec = CurveSpec::from_text(CurveKind::Parametric, " cos(t), sin(t), 0, pi ").unwrap();
        assert_eq!(spec.kind(), CurveKind::Parametric);
        let CurveSpec::Parametric { t_max, .. } = spec else {
            panic!("expected parametric");
        };
        assert!((t_max - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn evaluate_each_family() {
        let (xr, yr) = (r(-10.0, 10.0), r(-10.0, 10.0));
        let explicit = CurveSpec::explicit("x").evaluate(xr, yr, 100).unwrap();
        assert!(matches!(explicit, CurveData::Sampled(ref p) if p.len() == 100));

        let implicit = CurveSpec::implicit("x**2 + y**2 - 25").evaluate(xr, yr, 500).unwrap();
        let CurveData::Contour(contour) = &implicit else {
            panic!("expected contour");
        };
        assert_eq!(contour.grid_size, (100, 100));
        assert_eq!(implicit.polylines().len(), 1);

        let parametric = CurveSpec::parametric("t", "t", 0.0, 1.0).evaluate(xr, yr, 10).unwrap();
        assert_eq!(parametric.defined_points().len(), 10);

        let polar = CurveSpec::polar("1").evaluate(xr, yr, 36).unwrap();
        assert_eq!(polar.polylines().len(), 1);
    }

    #[test]
    fn evaluate_rejects_bad_parametric_interval() {
        let spec = CurveSpec::parametric("t", "t", 1.0, 0.0);
        assert!(spec.evaluate(r(0.0, 1.0), r(0.0, 1.0), 10).is_err());
    }
}
