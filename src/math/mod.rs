/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Returns `n` evenly spaced values from `min` to `max`, both inclusive.
///
/// The last value is exactly `max`. Returns an empty vector for `n == 0`
/// and `[min]` for `n == 1`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn linspace(min: f64, max: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let step = (max - min) / (n - 1) as f64;
            let mut values: Vec<f64> = (0..n).map(|i| min + step * i as f64).collect();
            values[n - 1] = max;
            values
        }
    }
}

/// Returns `true` if both coordinates of the point are finite.
#[must_use]
pub fn is_defined(p: &Point2) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

/// Total length of an open polyline.
#[must_use]
pub fn polyline_length(points: &[Point2]) -> f64 {
    points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
}

/// Minimum and maximum over the finite values, or `None` if there are none.
#[must_use]
pub fn finite_bounds<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
