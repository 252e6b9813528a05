use crate::curve::Range;
use crate::math::finite_bounds;

/// Fraction of the data span added above and below the data.
pub const AUTO_RANGE_MARGIN: f64 = 0.1;

/// Smallest margin used when every value is the same. Larger magnitudes
/// get [`AUTO_RANGE_MARGIN`] of the value instead.
pub const FLAT_MARGIN: f64 = 1.0;

/// Fits a range around the finite values, padded by [`AUTO_RANGE_MARGIN`]
/// on each side.
///
/// Falls back to `fallback` when there are no finite values, or when the
/// padded range would overflow.
#[must_use]
pub fn auto_range<I>(values: I, fallback: Range) -> Range
where
    I: IntoIterator<Item = f64>,
{
    let Some((lo, hi)) = finite_bounds(values) else {
        return fallback;
    };
    let span = hi - lo;
    let margin = if span > 0.0 {
        span * AUTO_RANGE_MARGIN
    } else {
        FLAT_MARGIN.max(lo.abs() * AUTO_RANGE_MARGIN)
    };
    Range::new(lo - margin, hi + margin).unwrap_or(fallback)
}
