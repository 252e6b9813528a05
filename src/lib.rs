pub mod curve;
pub mod error;
pub mod expr;
pub mod fractal;
pub mod math;
pub mod plot;
pub mod render;
pub mod sequence;
pub mod stats;

pub use error::{CurvelabError, Result};
