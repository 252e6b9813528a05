use tracing::debug;

use crate::curve::Range;
use crate::error::{InputError, Result};
use crate::math::{polyline_length, Point2};
use crate::plot::auto_range;
use crate::render::{StrokeStyle, Surface, Viewport};

use super::{segment_count, validate_depth, KochCurve};

/// Koch snowflake over an equilateral triangle centred on the origin.
#[derive(Debug, Clone, Copy)]
pub struct KochSnowflake {
    side_length: f64,
    depth: u32,
}

impl KochSnowflake {
    /// Creates a new snowflake operation.
    ///
    /// # Errors
    ///
    /// Returns an error if `side_length` is not positive and finite, or if
    /// `depth` exceeds [`super::MAX_DEPTH`].
    pub fn new(side_length: f64, depth: u32) -> Result<Self> {
        if !(side_length.is_finite() && side_length > 0.0) {
            return Err(InputError::InvalidParameter(format!(
                "side length must be positive, got {side_length}"
            ))
            .into());
        }
        validate_depth(depth)?;
        Ok(Self { side_length, depth })
    }

    /// Triangle corners in counter-clockwise order: bottom-left,
    /// bottom-right, apex.
    #[must_use]
    pub fn vertices(&self) -> [Point2; 3] {
        let s = self.side_length;
        let h = s * 3f64.sqrt() / 2.0;
        [
            Point2::new(-s / 2.0, -h / 3.0),
            Point2::new(s / 2.0, -h / 3.0),
            Point2::new(0.0, 2.0 * h / 3.0),
        ]
    }

    /// Generates the three sides.
    ///
    /// # Errors
    ///
    /// Returns an error only if side generation fails.
    pub fn execute(&self) -> Result<Snowflake> {
        let [a, b, c] = self.vertices();
        let sides = [
            KochCurve::new(a, b, self.depth).execute()?,
            KochCurve::new(b, c, self.depth).execute()?,
            KochCurve::new(c, a, self.depth).execute()?,
        ];
        debug!(
            depth = self.depth,
            segments = 3 * segment_count(self.depth),
            "snowflake generated"
        );
        Ok(Snowflake {
            sides,
            side_length: self.side_length,
            depth: self.depth,
        })
    }
}

/// A generated Koch snowflake.
#[derive(Debug, Clone)]
pub struct Snowflake {
    /// The three Koch curves, each ending where the next begins.
    pub sides: [Vec<Point2>; 3],
    side_length: f64,
    depth: u32,
}

impl Snowflake {
    /// Subdivision depth.
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Side length of the base triangle.
    #[must_use]
    pub fn side_length(&self) -> f64 {
        self.side_length
    }

    /// Closed outline: the sides joined without repeated corners, ending on
    /// the starting point.
    #[must_use]
    pub fn outline(&self) -> Vec<Point2> {
        let mut points = Vec::with_capacity(self.segment_count() + 1);
        for side in &self.sides {
            points.extend_from_slice(&side[..side.len() - 1]);
        }
        points.extend(self.sides[0].first().copied());
        points
    }

    /// Total segment count, `3 * 4^depth`.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        3 * segment_count(self.depth)
    }

    /// Measured perimeter of the outline.
    #[must_use]
    pub fn perimeter(&self) -> f64 {
        self.sides.iter().map(|side| polyline_length(side)).sum()
    }

    /// Closed-form perimeter, `3 * side * (4/3)^depth`.
    #[must_use]
    pub fn expected_perimeter(&self) -> f64 {
        3.0 * self.side_length * (4.0f64 / 3.0).powf(f64::from(self.depth))
    }

    /// Viewport around the outline with the usual margin on both axes.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        let outline = self.outline();
        Viewport::new(
            auto_range(outline.iter().map(|p| p.x), Range::default()),
            auto_range(outline.iter().map(|p| p.y), Range::default()),
        )
    }

    /// Draws the three sides onto `surface`.
    pub fn render(&self, surface: &mut impl Surface, style: &StrokeStyle) {
        surface.set_viewport(&self.viewport());
        for side in &self.sides {
            surface.draw_polyline(side, style);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::math::TOLERANCE;
    use crate::render::{palette_color, RecordingSurface};

    /// Signed area, positive for counter-clockwise outlines.
    fn signed_area(points: &[Point2]) -> f64 {
        points
            .windows(2)
            .map(|w| w[0].x * w[1].y - w[1].x * w[0].y)
            .sum::<f64>()
            / 2.0
    }

    #[test]
    fn depth_zero_is_the_triangle() {
        let flake = KochSnowflake::new(2.0, 0).unwrap();
        let [a, b, c] = flake.vertices();
        let out = flake.execute().unwrap();
        assert_eq!(out.sides[0], vec![a, b]);
        assert_eq!(out.sides[1], vec![b, c]);
        assert_eq!(out.sides[2], vec![c, a]);
        assert_relative_eq!(out.perimeter(), 6.0, epsilon = TOLERANCE);
    }

    #[test]
    fn centred_on_origin() {
        let vertices = KochSnowflake::new(3.0, 0).unwrap().vertices();
        let cx: f64 = vertices.iter().map(|p| p.x).sum::<f64>() / 3.0;
        let cy: f64 = vertices.iter().map(|p| p.y).sum::<f64>() / 3.0;
        assert_relative_eq!(cx, 0.0, epsilon = TOLERANCE);
        assert_relative_eq!(cy, 0.0, epsilon = TOLERANCE);
        for w in [vertices[0], vertices[1], vertices[2], vertices[0]].windows(2) {
            assert_relative_eq!((w[1] - w[0]).norm(), 3.0, epsilon = TOLERANCE);
        }
    }

    #[test]
    fn perimeter_and_segments() {
        for depth in 0..=4 {
            let out = KochSnowflake::new(2.0, depth).unwrap().execute().unwrap();
            assert_eq!(out.segment_count(), 3 * 4usize.pow(depth));
            assert_eq!(out.outline().len(), out.segment_count() + 1);
            assert_relative_eq!(out.perimeter(), out.expected_perimeter(), max_relative = 1e-9);
        }
    }

    #[test]
    fn bumps_point_outward() {
        let base = KochSnowflake::new(2.0, 0).unwrap().execute().unwrap();
        let flake = KochSnowflake::new(2.0, 1).unwrap().execute().unwrap();
        let base_area = signed_area(&base.outline());
        let area = signed_area(&flake.outline());
        assert!(base_area > 0.0);
        // one iteration adds a third of the triangle's area
        assert_relative_eq!(area, base_area * 4.0 / 3.0, max_relative = 1e-9);
    }

    #[test]
    fn outline_is_closed() {
        let out = KochSnowflake::new(1.0, 2).unwrap().execute().unwrap();
        let outline = out.outline();
        assert_eq!(outline.first(), outline.last());
    }

    #[test]
    fn invalid_parameters() {
        assert!(KochSnowflake::new(0.0, 1).is_err());
        assert!(KochSnowflake::new(f64::NAN, 1).is_err());
        assert!(KochSnowflake::new(1.0, 7).is_err());
    }

    #[test]
    fn render_draws_three_sides() {
        let out = KochSnowflake::new(2.0, 2).unwrap().execute().unwrap();
        let style = StrokeStyle::new(1.5, palette_color(0)).unwrap();
        let mut surface = RecordingSurface::new();
        out.render(&mut surface, &style);

        let lines = surface.polylines();
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.len() == 17));
        let viewport = surface.viewport().unwrap();
        assert!(out.outline().iter().all(|p| viewport.x.contains(p.x) && viewport.y.contains(p.y)));
    }
}
