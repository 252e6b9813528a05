use std::f64::consts::FRAC_PI_3;

use nalgebra::Rotation2;
use tracing::debug;

use crate::error::Result;
use crate::math::Point2;

use super::{segment_count, validate_depth};

/// Generates the Koch curve from `p1` to `p2`.
///
/// Shorthand for [`KochCurve::new`] followed by [`KochCurve::execute`].
///
/// # Errors
///
/// Returns an error if `depth` exceeds [`super::MAX_DEPTH`].
pub fn generate(p1: Point2, p2: Point2, depth: u32) -> Result<Vec<Point2>> {
    KochCurve::new(p1, p2, depth).execute()
}

/// Koch curve subdivision of a single segment.
///
/// Each level replaces a segment by four of a third the length, with the
/// middle two forming an equilateral bump to the right of the direction of
/// travel.
#[derive(Debug, Clone, Copy)]
pub struct KochCurve {
    p1: Point2,
    p2: Point2,
    depth: u32,
}

impl KochCurve {
    /// Creates a new Koch curve operation.
    #[must_use]
    pub fn new(p1: Point2, p2: Point2, depth: u32) -> Self {
        Self { p1, p2, depth }
    }

    /// Generates the curve points.
    ///
    /// The result starts at `p1`, ends at `p2` and holds `4^depth + 1`
    /// points with no repeated joints.
    ///
    /// # Errors
    ///
    /// Returns an error if the depth exceeds [`super::MAX_DEPTH`].
    pub fn execute(&self) -> Result<Vec<Point2>> {
        validate_depth(self.depth)?;
        let mut points = Vec::with_capacity(segment_count(self.depth) + 1);
        subdivide(self.p1, self.p2, self.depth, &mut points);
        points.push(self.p2);
        debug!(depth = self.depth, points = points.len(), "koch curve generated");
        Ok(points)
    }
}

/// Pushes every point of the curve from `a` to `b` except `b` itself.
fn subdivide(a: Point2, b: Point2, depth: u32, out: &mut Vec<Point2>) {
    if depth == 0 {
        out.push(a);
        return;
    }
    let third = (b - a) / 3.0;
    let first = a + third;
    let second = a + third * 2.0;
    let apex = first + Rotation2::new(-FRAC_PI_3) * third;

    subdivide(a, first, depth - 1, out);
    subdivide(first, apex, depth - 1, out);
    subdivide(apex, second, depth - 1, out);
    subdivide(second, b, depth - 1, out);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::error::{CurvelabError, InputError};
    use crate::fractal::MAX_DEPTH;
    use crate::math::{polyline_length, TOLERANCE};

    fn unit() -> (Point2, Point2) {
        (Point2::new(0.0, 0.0), Point2::new(1.0, 0.0))
    }

    #[test]
    fn depth_zero_is_the_segment() {
        let (p1, p2) = unit();
        assert_eq!(generate(p1, p2, 0).unwrap(), vec![p1, p2]);
    }

    #[test]
    fn depth_one_bumps_right() {
        let (p1, p2) = unit();
        let pts = generate(p1, p2, 1).unwrap();
        assert_eq!(pts.len(), 5);
        assert_relative_eq!(pts[1].x, 1.0 / 3.0);
        assert_relative_eq!(pts[2].x, 0.5, epsilon = TOLERANCE);
        // travelling +x, right is -y
        assert_relative_eq!(pts[2].y, -(3f64.sqrt()) / 6.0, epsilon = TOLERANCE);
        assert_relative_eq!(pts[3].x, 2.0 / 3.0);
    }

    #[test]
    fn point_count_and_no_adjacent_duplicates() {
        let (p1, p2) = unit();
        for depth in 0..=4 {
            let pts = generate(p1, p2, depth).unwrap();
            assert_eq!(pts.len(), 4usize.pow(depth) + 1);
            assert_eq!(pts.first(), Some(&p1));
            assert_eq!(pts.last(), Some(&p2));
            assert!(pts.windows(2).all(|w| (w[1] - w[0]).norm() > TOLERANCE));
        }
    }

    #[test]
    fn length_grows_by_four_thirds() {
        let p1 = Point2::new(-2.0, 1.0);
        let p2 = Point2::new(4.0, 3.0);
        let base = (p2 - p1).norm();
        for depth in 0..=5 {
            let pts = generate(p1, p2, depth).unwrap();
            let expected = base * (4.0f64 / 3.0).powi(i32::try_from(depth).unwrap());
            assert_relative_eq!(polyline_length(&pts), expected, max_relative = 1e-9);
        }
    }

    #[test]
    fn depth_bound_enforced() {
        let (p1, p2) = unit();
        assert!(generate(p1, p2, MAX_DEPTH).is_ok());
        assert!(matches!(
            generate(p1, p2, MAX_DEPTH + 1),
            Err(CurvelabError::Input(InputError::DepthOutOfRange { value: 7, max: 6 }))
        ));
    }
}
