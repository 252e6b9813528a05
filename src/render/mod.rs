mod recording;
mod stroke_style;

pub use recording::{DrawCall, RecordingSurface};
pub use stroke_style::{palette_color, Color, StrokeStyle, PALETTE};

use crate::curve::Range;
use crate::math::Point2;

/// Axis ranges a host should display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: Range,
    pub y: Range,
}

impl Viewport {
    /// Creates a viewport.
    #[must_use]
    pub fn new(x: Range, y: Range) -> Self {
        Self { x, y }
    }
}

/// Something curves can be drawn onto.
///
/// Plots, fractals and sequences describe their geometry to a surface the
/// host provides. [`RecordingSurface`] keeps the calls in memory for
/// headless use.
pub trait Surface {
    /// Sets the visible axis ranges.
    fn set_viewport(&mut self, viewport: &Viewport);

    /// Draws a connected polyline. Points are all defined.
    fn draw_polyline(&mut self, points: &[Point2], style: &StrokeStyle);

    /// Shows or hides the background grid.
    fn set_grid(&mut self, _visible: bool) {}

    /// Adds a legend entry.
    fn add_legend(&mut self, _label: &str, _style: &StrokeStyle) {}
}
