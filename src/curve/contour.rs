use std::collections::{HashMap, VecDeque};

use crate::math::Point2;

/// Scalar field sampled on a rectilinear grid.
///
/// Values are stored row-major: `values[j * nx + i]` is the sample at
/// `(xs[i], ys[j])`. Undefined samples are `NaN`.
#[derive(Debug, Clone)]
pub struct ScalarGrid {
    xs: Vec<f64>,
    ys: Vec<f64>,
    values: Vec<f64>,
}

impl ScalarGrid {
    /// Samples `f` at every grid node.
    pub(crate) fn sample<F>(xs: Vec<f64>, ys: Vec<f64>, mut f: F) -> Self
    where
        F: FnMut(f64, f64) -> f64,
    {
        let mut values = Vec::with_capacity(xs.len() * ys.len());
        for &y in &ys {
            for &x in &xs {
                values.push(f(x, y));
            }
        }
        Self { xs, ys, values }
    }

    /// Grid size as `(nx, ny)`.
    #[must_use]
    pub fn size(&self) -> (usize, usize) {
        (self.xs.len(), self.ys.len())
    }

    /// Sample at node `(i, j)`.
    #[must_use]
    pub fn value(&self, i: usize, j: usize) -> f64 {
        self.values[j * self.xs.len() + i]
    }

    /// Number of undefined samples.
    #[must_use]
    pub fn undefined_count(&self) -> usize {
        self.values.iter().filter(|v| !v.is_finite()).count()
    }

    /// Extracts the zero level set by marching squares.
    ///
    /// Crossings are linearly interpolated along cell edges. Saddle cells
    /// are resolved with the average of the four corners. Cells with any
    /// undefined corner produce nothing.
    #[must_use]
    pub fn zero_contour(&self) -> ContourSet {
        let (nx, ny) = self.size();
        let mut points: HashMap<EdgeKey, Point2> = HashMap::new();
        let mut segments: Vec<[EdgeKey; 2]> = Vec::new();

        for j in 0..ny.saturating_sub(1) {
            for i in 0..nx.saturating_sub(1) {
                self.march_cell(i, j, &mut points, &mut segments);
            }
        }

        let polylines = stitch(&segments, &points);
        let segments = segments
            .iter()
            .map(|[a, b]| [points[a], points[b]])
            .collect();
        ContourSet {
            segments,
            polylines,
            grid_size: (nx, ny),
        }
    }

    fn march_cell(
        &self,
        i: usize,
        j: usize,
        points: &mut HashMap<EdgeKey, Point2>,
        segments: &mut Vec<[EdgeKey; 2]>,
    ) {
        let v00 = self.value(i, j);
        let v10 = self.value(i + 1, j);
        let v01 = self.value(i, j + 1);
        let v11 = self.value(i + 1, j + 1);
        if ![v00, v10, v01, v11].iter().all(|v| v.is_finite()) {
            return;
        }

        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (y0, y1) = (self.ys[j], self.ys[j + 1]);

        // Edge order: bottom, right, top, left.
        let edges = [
            (EdgeKey::Horizontal(i, j), v00, v10, (x0, y0), (x1, y0)),
            (EdgeKey::Vertical(i + 1, j), v10, v11, (x1, y0), (x1, y1)),
            (EdgeKey::Horizontal(i, j + 1), v01, v11, (x0, y1), (x1, y1)),
            (EdgeKey::Vertical(i, j), v00, v01, (x0, y0), (x0, y1)),
        ];

        let mut crossed: [Option<EdgeKey>; 4] = [None; 4];
        for (slot, &(key, va, vb, pa, pb)) in crossed.iter_mut().zip(edges.iter()) {
            if (va >= 0.0) != (vb >= 0.0) {
                let t = if (vb - va).abs() < f64::EPSILON {
                    0.5
                } else {
                    va / (va - vb)
                };
                points
                    .entry(key)
                    .or_insert_with(|| Point2::new(pa.0 + t * (pb.0 - pa.0), pa.1 + t * (pb.1 - pa.1)));
                *slot = Some(key);
            }
        }

        match crossed {
            [None, None, None, None] => {}
            [Some(bottom), Some(right), Some(top), Some(left)] => {
                let center_above = (v00 + v10 + v01 + v11) * 0.25 >= 0.0;
                if (v00 >= 0.0) == center_above {
                    segments.push([bottom, right]);
                    segments.push([left, top]);
                } else {
                    segments.push([bottom, left]);
                    segments.push([top, right]);
                }
            }
            _ => {
                let mut keys = crossed.iter().flatten();
                if let (Some(&a), Some(&b)) = (keys.next(), keys.next()) {
                    segments.push([a, b]);
                }
            }
        }
    }
}

/// Identifies a grid edge by its lower-left node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum EdgeKey {
    /// Edge from node `(i, j)` to `(i + 1, j)`.
    Horizontal(usize, usize),
    /// Edge from node `(i, j)` to `(i, j + 1)`.
    Vertical(usize, usize),
}

/// Zero-contour of an implicit curve.
#[derive(Debug, Clone, Default)]
pub struct ContourSet {
    /// Unordered contour segments, one or two per crossed cell.
    pub segments: Vec<[Point2; 2]>,
    /// Segments joined into polylines. Closed loops repeat their first point.
    pub polylines: Vec<Vec<Point2>>,
    /// Grid size `(nx, ny)` the contour was extracted from.
    pub grid_size: (usize, usize),
}

impl ContourSet {
    /// Returns `true` if no part of the curve crosses the grid.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Joins segments sharing a grid edge into maximal chains.
///
/// Every edge belongs to at most two cells, so each crossing point joins at
/// most two segments and the chains are simple.
fn stitch(segments: &[[EdgeKey; 2]], points: &HashMap<EdgeKey, Point2>) -> Vec<Vec<Point2>> {
    let mut adjacency: HashMap<EdgeKey, Vec<usize>> = HashMap::new();
    for (idx, [a, b]) in segments.iter().enumerate() {
        adjacency.entry(*a).or_default().push(idx);
        adjacency.entry(*b).or_default().push(idx);
    }

    let mut used = vec![false; segments.len()];
    let next_unused = |from: EdgeKey, used: &mut [bool]| -> Option<EdgeKey> {
        let idx = *adjacency.get(&from)?.iter().find(|&&s| !used[s])?;
        used[idx] = true;
        let [a, b] = segments[idx];
        Some(if a == from { b } else { a })
    };

    let mut polylines = Vec::new();
    for (idx, &[a, b]) in segments.iter().enumerate() {
        if used[idx] {
            continue;
        }
        used[idx] = true;
        let mut chain = VecDeque::from([a, b]);

        let mut tail = b;
        while let Some(next) = next_unused(tail, used.as_mut_slice()) {
            chain.push_back(next);
            tail = next;
        }
        let mut head = a;
        while let Some(next) = next_unused(head, used.as_mut_slice()) {
            chain.push_front(next);
            head = next;
        }

        polylines.push(chain.iter().map(|k| points[k]).collect());
    }
    polylines
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::linspace;

    fn circle_grid(n: usize, radius: f64) -> ScalarGrid {
        ScalarGrid::sample(linspace(-5.0, 5.0, n), linspace(-5.0, 5.0, n), |x, y| {
            x * x + y * y - radius * radius
        })
    }

    #[test]
    fn circle_is_one_closed_loop() {
        let contour = circle_grid(41, 3.0).zero_contour();
        assert_eq!(contour.grid_size, (41, 41));
        assert_eq!(contour.polylines.len(), 1);
        let loop_pts = &contour.polylines[0];
        assert_eq!(loop_pts.first(), loop_pts.last());
        assert_eq!(loop_pts.len(), contour.segments.len() + 1);
        for p in loop_pts {
            assert!((p.coords.norm() - 3.0).abs() < 0.1, "point {p} off circle");
        }
    }

    #[test]
    fn no_crossing_no_contour() {
        let grid = ScalarGrid::sample(linspace(0.0, 1.0, 5), linspace(0.0, 1.0, 5), |_, _| 1.0);
        let contour = grid.zero_contour();
        assert!(contour.is_empty());
        assert!(contour.polylines.is_empty());
    }

    #[test]
    fn straight_line_interpolates_exactly() {
        // x - 0.25 = 0 on a 3x3 grid over [0, 1].
        let grid = ScalarGrid::sample(linspace(0.0, 1.0, 3), linspace(0.0, 1.0, 3), |x, _| x - 0.25);
        let contour = grid.zero_contour();
        assert_eq!(contour.segments.len(), 2);
        assert_eq!(contour.polylines.len(), 1);
        for p in &contour.polylines[0] {
            assert!((p.x - 0.25).abs() < 1e-12);
        }
        assert_eq!(contour.polylines[0].len(), 3);
    }

    #[test]
    fn undefined_corners_are_skipped() {
        let grid = ScalarGrid::sample(linspace(-1.0, 1.0, 3), linspace(-1.0, 1.0, 3), |x, y| {
            if x < -0.5 && y > 0.5 {
                f64::NAN
            } else {
                x
            }
        });
        assert_eq!(grid.undefined_count(), 1);
        let contour = grid.zero_contour();
        // The upper-left cell touches the undefined node.
        assert_eq!(contour.segments.len(), 1);
    }

    #[test]
    fn saddle_produces_two_segments() {
        // xy = 0 crosses all four edges of the single cell.
        let grid = ScalarGrid::sample(vec![-1.0, 1.0], vec![-1.0, 2.0], |x, y| x * y);
        let contour = grid.zero_contour();
        assert_eq!(contour.segments.len(), 2);
        assert_eq!(contour.polylines.len(), 2);
    }
}
