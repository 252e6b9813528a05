mod koch;
mod snowflake;

pub use koch::{generate, KochCurve};
pub use snowflake::{KochSnowflake, Snowflake};

use crate::error::{InputError, Result};

/// Deepest accepted subdivision. Depth 6 already yields 4097 points per side.
pub const MAX_DEPTH: u32 = 6;

/// Checks `depth` against [`MAX_DEPTH`].
///
/// # Errors
///
/// Returns [`InputError::DepthOutOfRange`] if `depth > MAX_DEPTH`.
pub fn validate_depth(depth: u32) -> Result<()> {
    if depth > MAX_DEPTH {
        return Err(InputError::DepthOutOfRange {
            value: depth,
            max: MAX_DEPTH,
        }
        .into());
    }
    Ok(())
}

/// Number of segments in a Koch curve of the given depth.
///
/// Callers validate `depth` against [`MAX_DEPTH`] first.
pub(crate) fn segment_count(depth: u32) -> usize {
    4usize.pow(depth.min(MAX_DEPTH))
}
