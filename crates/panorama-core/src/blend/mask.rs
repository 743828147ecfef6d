use ndarray::Array2;

use crate::consts::{MAX_FEATHER_WIDTH, MIN_FEATHER_WIDTH};
use crate::error::{PanoramaError, Result};

/// Seam feather width in pixels:
/// `clamp(window_percent * min(query_width, train_width), 100, 1000)`.
pub fn feather_width(query_width: usize, train_width: usize, window_percent: f32) -> f32 {
    let lowest = query_width.min(train_width) as f32;
    (window_percent * lowest).clamp(MIN_FEATHER_WIDTH, MAX_FEATHER_WIDTH)
}

/// Complementary per-pixel blend weights over the canvas.
///
/// `query + train == 1` at every pixel.
#[derive(Clone, Debug)]
pub struct SeamMasks {
    pub query: Array2<f32>,
    pub train: Array2<f32>,
}

/// Per-column weight of the unwarped query image.
///
/// 1.0 left of `query_width - window/2`, then a linear ramp from exactly 1.0
/// down to exactly 0.0 across `2 * floor(window/2)` columns centred on
/// `query_width`, then 0.0. Ramp columns beyond the canvas are dropped.
pub fn query_column_weights(
    query_width: usize,
    canvas_width: usize,
    window: f32,
) -> Result<Vec<f32>> {
    if !window.is_finite() || window <= 0.0 {
        return Err(PanoramaError::BlendFailed(format!(
            "invalid feather width {window}"
        )));
    }
    if canvas_width == 0 {
        return Err(PanoramaError::BlendFailed("canvas has zero width".into()));
    }

    let offset = (window / 2.0).floor() as isize;
    let ramp_len = 2 * offset;
    let start = query_width as isize - offset;

    let weights = (0..canvas_width as isize)
        .map(|col| {
            if col < start {
                1.0
            } else if col >= start + ramp_len {
                0.0
            } else if ramp_len < 2 {
                if col < query_width as isize {
                    1.0
                } else {
                    0.0
                }
            } else {
                1.0 - (col - start) as f32 / (ramp_len - 1) as f32
            }
        })
        .collect();
    Ok(weights)
}

/// Build the query and train masks for a `height x canvas_width` canvas.
pub fn build_seam_masks(
    query_width: usize,
    canvas_width: usize,
    height: usize,
    window: f32,
) -> Result<SeamMasks> {
    if height == 0 {
        return Err(PanoramaError::BlendFailed("canvas has zero height".into()));
    }
    let columns = query_column_weights(query_width, canvas_width, window)?;
    let query = Array2::from_shape_fn((height, canvas_width), |(_, c)| columns[c]);
    let train = query.mapv(|v| 1.0 - v);
    Ok(SeamMasks { query, train })
}
