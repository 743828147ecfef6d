//! Warp the train image into the query frame and feather the seam.

pub mod crop;
pub mod mask;
pub mod warp;

use ndarray::{s, Axis, Zip};
use tracing::debug;

use crate::align::Homography;
use crate::error::{PanoramaError, Result};
use crate::frame::ColorFrame;

pub use crop::{content_bounds, crop, ContentBounds};
pub use mask::{build_seam_masks, feather_width, SeamMasks};
pub use warp::{warp_perspective, warped_footprint};

/// Composite of one blended pair.
#[derive(Clone, Debug)]
pub struct BlendOutput {
    /// Cropped to the pixels with content.
    pub composite: ColorFrame,
    /// Seam feather width used, in pixels.
    pub feather_width: f32,
}

/// Blend `train` into `query`'s frame using `h` (train -> query coordinates).
///
/// The canvas is `query_h x (query_w + train_w)`. The query sits unwarped at
/// the origin weighted by the query mask, the warped train image is weighted
/// by the complementary mask, and the sum is cropped to its content.
pub fn blend_pair(
    query: &ColorFrame,
    train: &ColorFrame,
    h: &Homography,
    window_percent: f32,
) -> Result<BlendOutput> {
    if !h.is_usable() {
        return Err(PanoramaError::BlendFailed(
            "homography is not finite and invertible".into(),
        ));
    }

    let height = query.height();
    let width = query.width() + train.width();
    if height == 0 || width == 0 {
        return Err(PanoramaError::BlendFailed("canvas has zero area".into()));
    }

    let footprint = warped_footprint(h, train.width(), train.height())?;
    if !footprint.intersects(width, height) {
        return Err(PanoramaError::BlendFailed(format!(
            "warped train image ({:.0}..{:.0}, {:.0}..{:.0}) misses the {}x{} canvas",
            footprint.min_x, footprint.max_x, footprint.min_y, footprint.max_y, width, height
        )));
    }

    let window = feather_width(query.width(), train.width(), window_percent);
    let masks = build_seam_masks(query.width(), width, height, window)?;
    let mut canvas = warp_perspective(train, h, height, width)?;

    // Weight the warped train layer, then add the query layer over its own extent.
    Zip::from(canvas.data.lanes_mut(Axis(2)))
        .and(&masks.train)
        .for_each(|mut px, &m| px.mapv_inplace(|v| v * m));

    let qw = query.width();
    let mut region = canvas.data.slice_mut(s![.., ..qw, ..]);
    Zip::from(region.lanes_mut(Axis(2)))
        .and(query.data.lanes(Axis(2)))
        .and(masks.query.slice(s![.., ..qw]))
        .for_each(|mut dst, src, &m| dst.zip_mut_with(&src, |d, &v| *d += v * m));

    let bounds = content_bounds(&canvas).ok_or_else(|| {
        PanoramaError::BlendFailed("composite has no content pixels".into())
    })?;
    let composite = crop(&canvas, &bounds);

    debug!(
        canvas_width = width,
        canvas_height = height,
        query_width = qw,
        feather = window,
        cropped_width = composite.width(),
        cropped_height = composite.height(),
        "Pair blended"
    );

    Ok(BlendOutput {
        composite,
        feather_width: window,
    })
}
