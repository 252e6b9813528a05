mod auto_range;

pub use auto_range::{auto_range, AUTO_RANGE_MARGIN, FLAT_MARGIN};

use tracing::{debug, warn};

use crate::curve::{validate_resolution, CurveData, CurveSpec, Range};
use crate::error::{CurvelabError, Result};
use crate::render::{palette_color, StrokeStyle, Surface, Viewport, PALETTE};

/// Default sample count per curve.
pub const DEFAULT_RESOLUTION: usize = 500;

/// Default stroke width.
pub const DEFAULT_LINE_WIDTH: f64 = 2.0;

/// Settings shared by every curve in a plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotSettings {
    /// Sampled x interval, always displayed as is.
    pub x_range: Range,
    /// Displayed y interval when auto-scaling is off or finds no data.
    pub y_range: Range,
    /// Samples per curve.
    pub resolution: usize,
    /// Stroke width for every curve.
    pub line_width: f64,
    /// Fit the y-axis to the evaluated data.
    pub auto_scale_y: bool,
    /// Passed to [`Surface::set_grid`] on render.
    pub show_grid: bool,
    pub show_legend: bool,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            x_range: Range::default(),
            y_range: Range::default(),
            resolution: DEFAULT_RESOLUTION,
            line_width: DEFAULT_LINE_WIDTH,
            auto_scale_y: true,
            show_grid: true,
            show_legend: true,
        }
    }
}

impl PlotSettings {
    /// Checks the resolution and line width.
    ///
    /// Ranges are valid by construction.
    ///
    /// # Errors
    ///
    /// Returns an error if the resolution is out of bounds or the line width
    /// is not positive.
    pub fn validate(&self) -> Result<()> {
        validate_resolution(self.resolution)?;
        StrokeStyle::new(self.line_width, PALETTE[0])?;
        Ok(())
    }
}

/// A curve that evaluated successfully.
#[derive(Debug, Clone)]
pub struct Trace {
    /// Position of the curve in the plot.
    pub index: usize,
    pub label: String,
    pub style: StrokeStyle,
    pub data: CurveData,
}

/// A curve that was dropped.
#[derive(Debug)]
pub struct CurveFailure {
    /// Position of the curve in the plot.
    pub index: usize,
    pub label: String,
    pub error: CurvelabError,
}

/// Result of evaluating every curve in a plot.
#[derive(Debug)]
pub struct PlotOutcome {
    pub traces: Vec<Trace>,
    pub failures: Vec<CurveFailure>,
    pub viewport: Viewport,
}

impl PlotOutcome {
    /// Returns `true` if every curve evaluated.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// An ordered collection of curves plus the settings they share.
///
/// Evaluating a plot never fails because of a single bad curve: that curve
/// is reported in [`PlotOutcome::failures`] and the rest still render.
#[derive(Debug, Clone, Default)]
pub struct Plot {
    settings: PlotSettings,
    curves: Vec<CurveSpec>,
}

impl Plot {
    /// Creates an empty plot.
    ///
    /// # Errors
    ///
    /// Returns an error if `settings` does not validate.
    pub fn new(settings: PlotSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            curves: Vec::new(),
        })
    }

    /// Current settings.
    #[must_use]
    pub fn settings(&self) -> &PlotSettings {
        &self.settings
    }

    /// Replaces the settings. On error the previous settings are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if `settings` does not validate.
    pub fn set_settings(&mut self, settings: PlotSettings) -> Result<()> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    /// Parses and applies `"min,max"` range text for both axes.
    ///
    /// Nothing changes unless both parse.
    ///
    /// # Errors
    ///
    /// Returns an error if either text is malformed or inverted.
    pub fn set_ranges_text(&mut self, x_text: &str, y_text: &str) -> Result<()> {
        let x_range: Range = x_text.parse()?;
        let y_range: Range = y_text.parse()?;
        self.settings.x_range = x_range;
        self.settings.y_range = y_range;
        Ok(())
    }

    /// Curves in drawing order.
    #[must_use]
    pub fn curves(&self) -> &[CurveSpec] {
        &self.curves
    }

    /// Appends a curve and returns its index.
    pub fn add_curve(&mut self, curve: CurveSpec) -> usize {
        self.curves.push(curve);
        self.curves.len() - 1
    }

    /// Removes the curve at `index`, if any.
    pub fn remove_curve(&mut self, index: usize) -> Option<CurveSpec> {
        (index < self.curves.len()).then(|| self.curves.remove(index))
    }

    /// Removes every curve.
    pub fn clear(&mut self) {
        self.curves.clear();
    }

    /// Evaluates every curve and computes the viewport.
    ///
    /// Curves that fail to parse or validate are collected in
    /// [`PlotOutcome::failures`] and logged; they do not affect the others.
    ///
    /// # Errors
    ///
    /// Returns an error only if the plot's own settings are invalid.
    pub fn evaluate(&self) -> Result<PlotOutcome> {
        let settings = &self.settings;
        let mut traces = Vec::with_capacity(self.curves.len());
        let mut failures = Vec::new();

        for (index, curve) in self.curves.iter().enumerate() {
            let label = curve.label();
            match curve.evaluate(settings.x_range, settings.y_range, settings.resolution) {
                Ok(data) => {
                    let style = StrokeStyle::new(settings.line_width, palette_color(index))?;
                    traces.push(Trace {
                        index,
                        label,
                        style,
                        data,
                    });
                }
                Err(error) => {
                    warn!(curve = index, label = %label, error = %error, "skipping curve");
                    failures.push(CurveFailure {
                        index,
                        label,
                        error,
                    });
                }
            }
        }

        let y = if settings.auto_scale_y {
            auto_range(
                traces
                    .iter()
                    .flat_map(|trace| trace.data.defined_points())
                    .map(|p| p.y),
                settings.y_range,
            )
        } else {
            settings.y_range
        };
        let viewport = Viewport::new(settings.x_range, y);

        debug!(
            traces = traces.len(),
            failures = failures.len(),
            y_min = y.min(),
            y_max = y.max(),
            "plot evaluated"
        );
        Ok(PlotOutcome {
            traces,
            failures,
            viewport,
        })
    }

    /// Evaluates the plot and draws it onto `surface`.
    ///
    /// The viewport and grid flag are set first, then each curve's
    /// polylines in order, then legend entries if enabled.
    ///
    /// # Errors
    ///
    /// See [`Plot::evaluate`].
    pub fn render(&self, surface: &mut impl Surface) -> Result<PlotOutcome> {
        let outcome = self.evaluate()?;
        surface.set_viewport(&outcome.viewport);
        surface.set_grid(self.settings.show_grid);
        for trace in &outcome.traces {
            for line in trace.data.polylines() {
                surface.draw_polyline(line, &trace.style);
            }
        }
        if self.settings.show_legend {
            for trace in &outcome.traces {
                surface.add_legend(&trace.label, &trace.style);
            }
        }
        Ok(outcome)
    }
}
