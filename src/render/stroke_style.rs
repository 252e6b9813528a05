use crate::error::{InputError, Result};

/// An sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Creates a colour from its components.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb` rendering.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Colours assigned to successive curves, cycled.
pub const PALETTE: [Color; 7] = [
    Color::rgb(0x1e, 0x88, 0xe5),
    Color::rgb(0xe5, 0x39, 0x35),
    Color::rgb(0x43, 0xa0, 0x47),
    Color::rgb(0xfd, 0xd8, 0x35),
    Color::rgb(0x5e, 0x35, 0xb1),
    Color::rgb(0x00, 0xac, 0xc1),
    Color::rgb(0xff, 0x6d, 0x00),
];

/// Palette colour for the curve at `index`.
#[must_use]
pub fn palette_color(index: usize) -> Color {
    PALETTE[index % PALETTE.len()]
}

/// Style parameters for drawing a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    width: f64,
    color: Color,
}

impl StrokeStyle {
    /// Creates a new stroke style.
    ///
    /// # Errors
    ///
    /// Returns an error if `width` is not positive and finite.
    pub fn new(width: f64, color: Color) -> Result<Self> {
        if !(width.is_finite() && width > 0.0) {
            return Err(InputError::InvalidParameter(format!(
                "line width must be positive, got {width}"
            ))
            .into());
        }
        Ok(Self { width, color })
    }

    /// Returns the stroke width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns the stroke colour.
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }
}
