use tracing::debug;

use crate::error::{InputError, Result};
use crate::expr::{Bindings, Expr, Variable};
use crate::math::Point2;

use super::SampleDomain;

/// Samples a parametric curve `(x(t), y(t))` over the `t` domain.
#[derive(Debug, Clone)]
pub struct SampleParametric<'a> {
    x_source: &'a str,
    y_source: &'a str,
    domain: SampleDomain,
}

impl<'a> SampleParametric<'a> {
    /// Creates a new `SampleParametric` operation.
    #[must_use]
    pub fn new(x_source: &'a str, y_source: &'a str, domain: SampleDomain) -> Self {
        Self {
            x_source,
            y_source,
            domain,
        }
    }

    /// Executes the sampling, one point per `t`.
    ///
    /// A point is undefined (both coordinates `NaN`) if either coordinate
    /// fails to evaluate.
    ///
    /// # Errors
    ///
    /// Returns an error if either expression does not parse.
    pub fn execute(&self) -> Result<Vec<Point2>> {
        let x_expr = Expr::parse(self.x_source, &[Variable::T])?;
        let y_expr = Expr::parse(self.y_source, &[Variable::T])?;

        let points: Vec<Point2> = self
            .domain
            .samples()
            .into_iter()
            .map(|t| {
                let bindings = Bindings::new().with(Variable::T, t);
                match (x_expr.eval(&bindings), y_expr.eval(&bindings)) {
                    (Ok(x), Ok(y)) => Point2::new(x, y),
                    _ => Point2::new(f64::NAN, f64::NAN),
                }
            })
            .collect();

        debug!(
            x = self.x_source,
            y = self.y_source,
            samples = points.len(),
            "sampled parametric curve"
        );
        Ok(points)
    }
}

/// The pieces of a parametric equation typed as one line of text:
/// `"x(t), y(t), t_min, t_max"`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParametricText {
    pub x_expr: String,
    pub y_expr: String,
    pub t_min: f64,
    pub t_max: f64,
}

impl ParametricText {
    /// Parses the four comma-separated parts.
    ///
    /// Bounds may be constant expressions such as `2*pi`. Commas nested
    /// inside parentheses do not split.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::MalformedParametric`] if there are not exactly
    /// four parts, a parse error if a bound is not a valid constant
    /// expression, or [`InputError::InvalidRange`] unless `t_min < t_max`.
    pub fn parse(text: &str) -> Result<Self> {
        let parts = split_top_level(text);
        let [x_expr, y_expr, t_min, t_max] = parts.as_slice() else {
            return Err(InputError::MalformedParametric(text.to_owned()).into());
        };
        if x_expr.is_empty() || y_expr.is_empty() {
            return Err(InputError::MalformedParametric(text.to_owned()).into());
        }

        let t_min = eval_constant(t_min)?;
        let t_max = eval_constant(t_max)?;
        if t_min >= t_max {
            return Err(InputError::InvalidRange {
                min: t_min,
                max: t_max,
            }
            .into());
        }

        Ok(Self {
            x_expr: (*x_expr).to_owned(),
            y_expr: (*y_expr).to_owned(),
            t_min,
            t_max,
        })
    }
}

/// Evaluates an expression that binds no variables.
fn eval_constant(source: &str) -> Result<f64> {
    let expr = Expr::parse(source, &[])?;
    Ok(expr.eval(&Bindings::new())?)
}

/// Splits on commas outside parentheses, trimming each part.
fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0_i32;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(text[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(text[start..].trim());
    parts
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::PI;

    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::error::{CurvelabError, EvalError};

    #[test]
    fn unit_circle() {
        let domain = SampleDomain::new(0.0, 2.0 * PI, 9).unwrap();
        let pts = SampleParametric::new("cos(t)", "sin(t)", domain)
            .execute()
            .unwrap();
        assert_eq!(pts.len(), 9);
        for p in &pts {
            assert_abs_diff_eq!(p.coords.norm(), 1.0, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(pts[2].x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pts[2].y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn undefined_coordinate_voids_point() {
        let domain = SampleDomain::new(-1.0, 1.0, 3).unwrap();
        let pts = SampleParametric::new("t", "1/t", domain).execute().unwrap();
        assert!(pts[1].x.is_nan() && pts[1].y.is_nan());
        assert!(pts[0].x.is_finite() && pts[2].y.is_finite());
    }

    #[test]
    fn parse_text_with_constant_bounds() {
        let parsed = ParametricText::parse("t*cos(t), t*sin(t), 0, 2*pi").unwrap();
        assert_eq!(parsed.x_expr, "t*cos(t)");
        assert_eq!(parsed.y_expr, "t*sin(t)");
        assert!(parsed.t_min.abs() < f64::EPSILON);
        assert_abs_diff_eq!(parsed.t_max, 2.0 * PI, epsilon = 1e-12);
    }

    #[test]
    fn parse_text_respects_parentheses() {
        assert_eq!(
            split_top_level("sin((t)), cos(t) , 0,1"),
            vec!["sin((t))", "cos(t)", "0", "1"]
        );
    }

    #[test]
    fn parse_text_wrong_arity() {
        assert!(matches!(
            ParametricText::parse("cos(t), sin(t), 0"),
            Err(CurvelabError::Input(InputError::MalformedParametric(_)))
        ));
    }

    #[test]
    fn parse_text_bounds_must_be_constant() {
        assert!(matches!(
            ParametricText::parse("t, t, 0, t"),
            Err(CurvelabError::Parse(_))
        ));
        assert!(matches!(
            ParametricText::parse("t, t, 0, 1/0"),
            Err(CurvelabError::Evaluation(EvalError::DivisionByZero))
        ));
        assert!(matches!(
            ParametricText::parse("t, t, 5, 1"),
            Err(CurvelabError::Input(InputError::InvalidRange { .. }))
        ));
    }
}
