use crate::math::Point2;

use super::{StrokeStyle, Surface, Viewport};

/// A single recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Viewport(Viewport),
    Grid(bool),
    Polyline {
        points: Vec<Point2>,
        style: StrokeStyle,
    },
    Legend {
        label: String,
        style: StrokeStyle,
    },
}

/// Surface that stores every call in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    /// Creates an empty recording.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently set viewport.
    #[must_use]
    pub fn viewport(&self) -> Option<Viewport> {
        self.calls.iter().rev().find_map(|call| match call {
            DrawCall::Viewport(v) => Some(*v),
            _ => None,
        })
    }

    /// The most recently set grid flag.
    #[must_use]
    pub fn grid(&self) -> Option<bool> {
        self.calls.iter().rev().find_map(|call| match call {
            DrawCall::Grid(visible) => Some(*visible),
            _ => None,
        })
    }

    /// All recorded polylines, in draw order.
    #[must_use]
    pub fn polylines(&self) -> Vec<&[Point2]> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Polyline { points, .. } => Some(points.as_slice()),
                _ => None,
            })
            .collect()
    }

    /// All recorded legend labels, in order.
    #[must_use]
    pub fn legend(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Legend { label, .. } => Some(label.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn set_viewport(&mut self, viewport: &Viewport) {
        self.calls.push(DrawCall::Viewport(*viewport));
    }

    fn set_grid(&mut self, visible: bool) {
        self.calls.push(DrawCall::Grid(visible));
    }

    fn draw_polyline(&mut self, points: &[Point2], style: &StrokeStyle) {
        self.calls.push(DrawCall::Polyline {
            points: points.to_vec(),
            style: *style,
        });
    }

    fn add_legend(&mut self, label: &str, style: &StrokeStyle) {
        self.calls.push(DrawCall::Legend {
            label: label.to_owned(),
            style: *style,
        });
    }
}
