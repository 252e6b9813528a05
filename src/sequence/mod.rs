use tracing::debug;

use crate::curve::Range;
use crate::error::{EvalError, InputError, Result};
use crate::expr::{Bindings, Expr, Variable};
use crate::math::{finite_bounds, Point2};
use crate::plot::AUTO_RANGE_MARGIN;
use crate::render::{StrokeStyle, Surface, Viewport};

/// Most terms a single sequence may span.
pub const MAX_TERMS: usize = 100_000;

/// Relative size below which successive tail values count as settled.
const SETTLE_TOLERANCE: f64 = 1e-3;

/// Sample exponents for the convergence estimate, `n = 10^3 ..= 10^7`.
const SAMPLE_EXPONENTS: std::ops::RangeInclusive<i32> = 3..=7;

/// Indices tried past each sample point when the term is undefined there.
const MAX_STEPS_PAST: u32 = 8;

/// Fewest usable sample points needed to classify the tail.
const MIN_SAMPLES: usize = 3;

/// Numeric classification of a sequence's behaviour as `n` grows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Convergence {
    /// Tail values settle near the given limit.
    Converges(f64),
    /// Magnitude grows without bound or evaluation overflows.
    Diverges,
    /// Neither settles nor grows steadily.
    Oscillates,
}

/// A term expression `a(n)` over an inclusive index range.
///
/// Indices where evaluation fails are skipped. Offers partial sums and a
/// numeric estimate of the limit as `n` grows.
#[derive(Debug, Clone)]
pub struct Sequence {
    expr: Expr,
    start: i64,
    end: i64,
}

impl Sequence {
    /// Parses `source` as a term in `n` over `start..=end`.
    ///
    /// # Errors
    ///
    /// Returns an error if the expression does not parse, `end < start`, or
    /// the range spans more than [`MAX_TERMS`] indices.
    pub fn new(source: &str, start: i64, end: i64) -> Result<Self> {
        if end < start {
            return Err(InputError::InvalidParameter(format!(
                "sequence end {end} is before start {start}"
            ))
            .into());
        }
        if usize::try_from(end.abs_diff(start)).map_or(true, |span| span >= MAX_TERMS) {
            return Err(InputError::InvalidParameter(format!(
                "sequence {start}..={end} spans more than {MAX_TERMS} terms"
            ))
            .into());
        }
        let expr = Expr::parse(source, &[Variable::N])?;
        Ok(Self { expr, start, end })
    }

    /// First index.
    #[must_use]
    pub fn start(&self) -> i64 {
        self.start
    }

    /// Last index, inclusive.
    #[must_use]
    pub fn end(&self) -> i64 {
        self.end
    }

    /// Evaluates the term at a single index.
    ///
    /// # Errors
    ///
    /// Returns the evaluation error for that index.
    #[allow(clippy::cast_precision_loss)]
    pub fn term(&self, n: i64) -> std::result::Result<f64, EvalError> {
        self.expr.eval(&Bindings::new().with(Variable::N, n as f64))
    }

    /// `(n, a_n)` for every index whose term evaluates.
    #[must_use]
    pub fn terms(&self) -> Vec<(i64, f64)> {
        let terms: Vec<(i64, f64)> = (self.start..=self.end)
            .filter_map(|n| self.term(n).ok().map(|value| (n, value)))
            .collect();
        debug!(
            start = self.start,
            end = self.end,
            defined = terms.len(),
            "evaluated sequence terms"
        );
        terms
    }

    /// Sum of the defined terms.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.terms().iter().map(|(_, value)| value).sum()
    }

    /// Estimates the limit of `a(n)` from samples at `n = 10^3 ..= 10^7`.
    ///
    /// Each sample also evaluates `a(n + 1)` so alternating terms are caught.
    /// A sample that hits an isolated singularity moves forward a few indices.
    /// Overflow counts as divergence; a tail with too few defined samples has
    /// no limit to report.
    #[must_use]
    pub fn convergence(&self) -> Convergence {
        let eval = |n: f64| self.expr.eval(&Bindings::new().with(Variable::N, n));
        let mut tail = Vec::new();
        let mut jumps = Vec::new();
        for exponent in SAMPLE_EXPONENTS {
            let base = 10f64.powi(exponent);
            for nudge in 0..MAX_STEPS_PAST {
                let n = base + f64::from(nudge);
                match (eval(n), eval(n + 1.0)) {
                    (Ok(a), Ok(b)) => {
                        tail.push(a);
                        jumps.push((b - a).abs());
                        break;
                    }
                    (Err(EvalError::NonFinite), _) | (_, Err(EvalError::NonFinite)) => {
                        return Convergence::Diverges;
                    }
                    _ => {}
                }
            }
        }
        if tail.len() < MIN_SAMPLES {
            return Convergence::Oscillates;
        }
        classify(&tail, &jumps)
    }

    /// Display range: the defined indices padded by one, values by the
    /// usual margin.
    ///
    /// Returns `None` if no term is defined.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn viewport(&self) -> Option<Viewport> {
        let terms = self.terms();
        let (lo, hi) = finite_bounds(terms.iter().map(|(_, value)| *value))?;
        let span = if hi > lo { hi - lo } else { 1.0 };
        let y = Range::new(lo - AUTO_RANGE_MARGIN * span, hi + AUTO_RANGE_MARGIN * span).ok()?;
        let (first, last) = (terms.first()?.0, terms.last()?.0);
        let x = Range::new(first as f64 - 1.0, last as f64 + 1.0).ok()?;
        Some(Viewport::new(x, y))
    }

    /// Draws the defined terms as a connected polyline.
    ///
    /// Returns `false` and draws nothing if no term is defined.
    #[allow(clippy::cast_precision_loss)]
    pub fn render(&self, surface: &mut impl Surface, style: &StrokeStyle) -> bool {
        let Some(viewport) = self.viewport() else {
            return false;
        };
        let points: Vec<Point2> = self
            .terms()
            .into_iter()
            .map(|(n, value)| Point2::new(n as f64, value))
            .collect();
        surface.set_viewport(&viewport);
        surface.draw_polyline(&points, style);
        true
    }
}

fn classify(tail: &[f64], jumps: &[f64]) -> Convergence {
    let diffs: Vec<f64> = tail.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
    let (Some(&last), Some(&first_diff), Some(&last_diff), Some(&last_jump)) =
        (tail.last(), diffs.first(), diffs.last(), jumps.last())
    else {
        return Convergence::Oscillates;
    };

    let growing = tail.windows(2).all(|w| w[1].abs() > w[0].abs());
    if growing && last_diff >= 0.5 * first_diff {
        return Convergence::Diverges;
    }

    let scale = 1.0 + last.abs();
    let shrinking = diffs.windows(2).all(|w| w[1] <= w[0] + f64::EPSILON * scale);
    if shrinking && last_diff <= SETTLE_TOLERANCE * scale && last_jump <= SETTLE_TOLERANCE * scale {
        return Convergence::Converges(last);
    }
    Convergence::Oscillates
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::error::{CurvelabError, ParseError};
    use crate::render::{palette_color, RecordingSurface};

    #[test]
    fn terms_and_sum() {
        let seq = Sequence::new("2*n + 1", 1, 5).unwrap();
        assert_eq!(
            seq.terms(),
            vec![(1, 3.0), (2, 5.0), (3, 7.0), (4, 9.0), (5, 11.0)]
        );
        assert_relative_eq!(seq.sum(), 35.0);
    }

    #[test]
    fn failed_indices_are_skipped() {
        let seq = Sequence::new("1/n", -2, 2).unwrap();
        let ns: Vec<i64> = seq.terms().iter().map(|(n, _)| *n).collect();
        assert_eq!(ns, vec![-2, -1, 1, 2]);
        assert_relative_eq!(seq.sum(), 0.0);
    }

    #[test]
    fn range_validation() {
        assert!(Sequence::new("n", 5, 4).is_err());
        assert!(Sequence::new("n", 3, 3).is_ok());
        assert!(Sequence::new("n", 1, 100_000).is_ok());
        assert!(Sequence::new("n", 0, 100_000).is_err());
        assert!(Sequence::new("n", i64::MIN, i64::MAX).is_err());
    }

    #[test]
    fn only_n_is_bound() {
        assert!(matches!(
            Sequence::new("x + n", 1, 2),
            Err(CurvelabError::Parse(ParseError::UnknownIdentifier { .. }))
        ));
    }

    #[test]
    fn convergent_sequences() {
        let Convergence::Converges(limit) = Sequence::new("1/n", 1, 10).unwrap().convergence() else {
            panic!("1/n should converge");
        };
        assert!(limit.abs() < 1e-6);

        let Convergence::Converges(limit) =
            Sequence::new("(1 + 1/n)**n", 1, 10).unwrap().convergence()
        else {
            panic!("(1 + 1/n)^n should converge");
        };
        assert_relative_eq!(limit, std::f64::consts::E, max_relative = 1e-5);

        assert_eq!(
            Sequence::new("3", 1, 10).unwrap().convergence(),
            Convergence::Converges(3.0)
        );
    }

    #[test]
    fn divergent_sequences() {
        for source in ["n", "-n**2", "sqrt(n)", "log(n)", "exp(n)"] {
            assert_eq!(
                Sequence::new(source, 1, 10).unwrap().convergence(),
                Convergence::Diverges,
                "{source}"
            );
        }
    }

    #[test]
    fn singular_sample_index_is_stepped_over() {
        let Convergence::Converges(limit) =
            Sequence::new("1/(n - 1000)", 1, 10).unwrap().convergence()
        else {
            panic!("1/(n - 1000) should converge");
        };
        assert!(limit.abs() < 1e-6);
    }

    #[test]
    fn undefined_tail_has_no_limit() {
        assert_eq!(
            Sequence::new("sqrt(1000 - n)", 1, 10).unwrap().convergence(),
            Convergence::Oscillates
        );
    }

    #[test]
    fn oscillating_sequences() {
        for source in ["(-1)**n", "sin(n)"] {
            assert_eq!(
                Sequence::new(source, 1, 10).unwrap().convergence(),
                Convergence::Oscillates,
                "{source}"
            );
        }
    }

    #[test]
    fn viewport_margins() {
        let seq = Sequence::new("n", 0, 10).unwrap();
        let viewport = seq.viewport().unwrap();
        assert_relative_eq!(viewport.x.min(), -1.0);
        assert_relative_eq!(viewport.x.max(), 11.0);
        assert_relative_eq!(viewport.y.min(), -1.0);
        assert_relative_eq!(viewport.y.max(), 11.0);

        let partial = Sequence::new("sqrt(n)", -5, 5).unwrap().viewport().unwrap();
        assert_relative_eq!(partial.x.min(), -1.0);
        assert_relative_eq!(partial.x.max(), 6.0);

        let flat = Sequence::new("2", 1, 3).unwrap().viewport().unwrap();
        assert_relative_eq!(flat.y.min(), 1.9);
        assert_relative_eq!(flat.y.max(), 2.1);
    }

    #[test]
    fn render_skips_empty_sequences() {
        let style = StrokeStyle::new(1.0, palette_color(4)).unwrap();
        let mut surface = RecordingSurface::new();
        assert!(!Sequence::new("sqrt(-n)", 1, 5).unwrap().render(&mut surface, &style));
        assert!(surface.calls.is_empty());

        assert!(Sequence::new("n**2", 1, 4).unwrap().render(&mut surface, &style));
        let expected = [
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 4.0),
            Point2::new(3.0, 9.0),
            Point2::new(4.0, 16.0),
        ];
        assert_eq!(surface.polylines(), vec![&expected[..]]);
    }
}
