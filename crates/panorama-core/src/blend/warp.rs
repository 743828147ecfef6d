use ndarray::{Array3, ArrayViewMut2, Axis};
use rayon::prelude::*;

use crate::align::Homography;
use crate::consts::{COLOR_CHANNEL_COUNT, PARALLEL_PIXEL_THRESHOLD};
use crate::error::{PanoramaError, Result};
use crate::frame::ColorFrame;

/// Axis-aligned bounds of a warped image in destination coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Footprint {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Footprint {
    /// Whether the footprint overlaps the `[0, width) x [0, height)` region.
    pub fn intersects(&self, width: usize, height: usize) -> bool {
        self.max_x >= 0.0
            && self.max_y >= 0.0
            && self.min_x < width as f64
            && self.min_y < height as f64
    }
}

/// Project the four corners of a `width x height` image through `h`.
///
/// Fails when any corner lands at infinity or behind the projection plane;
/// such a warp folds the image over itself.
pub fn warped_footprint(h: &Homography, width: usize, height: usize) -> Result<Footprint> {
    let corners = [
        (0.0, 0.0),
        (width as f64, 0.0),
        (width as f64, height as f64),
        (0.0, height as f64),
    ];

    let mut fp = Footprint {
        min_x: f64::INFINITY,
        min_y: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        max_y: f64::NEG_INFINITY,
    };
    for (x, y) in corners {
        if h.depth(x, y) <= 0.0 {
            return Err(PanoramaError::BlendFailed(format!(
                "corner ({x}, {y}) maps behind the projection plane"
            )));
        }
        let (px, py) = h
            .transform(x, y)
            .filter(|(px, py)| px.is_finite() && py.is_finite())
            .ok_or_else(|| {
                PanoramaError::BlendFailed(format!("corner ({x}, {y}) maps to infinity"))
            })?;
        fp.min_x = fp.min_x.min(px);
        fp.min_y = fp.min_y.min(py);
        fp.max_x = fp.max_x.max(px);
        fp.max_y = fp.max_y.max(py);
    }
    Ok(fp)
}

/// Perspective-warp `src` into a `height x width` destination.
///
/// Each destination pixel is mapped back through `h^-1` and sampled
/// bilinearly; pixels mapping outside the source stay 0.
pub fn warp_perspective(
    src: &ColorFrame,
    h: &Homography,
    height: usize,
    width: usize,
) -> Result<ColorFrame> {
    let inv = h
        .inverse()
        .ok_or_else(|| PanoramaError::BlendFailed("homography is not invertible".into()))?;

    let mut dst = Array3::<f32>::zeros((height, width, COLOR_CHANNEL_COUNT));
    let (src_h, src_w) = (src.height() as f64, src.width() as f64);

    let warp_row = |(row, mut out): (usize, ArrayViewMut2<f32>)| {
        for col in 0..width {
            let (x, y) = (col as f64, row as f64);
            if inv.depth(x, y) <= 0.0 {
                continue;
            }
            let Some((sx, sy)) = inv.transform(x, y) else {
                continue;
            };
            if sx >= 0.0 && sx < src_w && sy >= 0.0 && sy < src_h {
                let px = bilinear_sample_rgb(&src.data, sy, sx);
                for (k, v) in px.into_iter().enumerate() {
                    out[[col, k]] = v;
                }
            }
        }
    };

    if height * width >= PARALLEL_PIXEL_THRESHOLD {
        dst.axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(warp_row);
    } else {
        dst.axis_iter_mut(Axis(0)).enumerate().for_each(warp_row);
    }

    Ok(ColorFrame::new(dst))
}

/// Bilinear sample of all three channels at fractional `(y, x)`.
/// Neighbours outside the image contribute 0.
pub fn bilinear_sample_rgb(data: &Array3<f32>, y: f64, x: f64) -> [f32; COLOR_CHANNEL_COUNT] {
    let (h, w, _) = data.dim();

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let fx = (x - x0 as f64) as f32;
    let fy = (y - y0 as f64) as f32;

    let weights = [
        (y0, x0, (1.0 - fx) * (1.0 - fy)),
        (y0, x0 + 1, fx * (1.0 - fy)),
        (y0 + 1, x0, (1.0 - fx) * fy),
        (y0 + 1, x0 + 1, fx * fy),
    ];

    let mut out = [0.0f32; COLOR_CHANNEL_COUNT];
    for (r, c, wgt) in weights {
        if wgt == 0.0 || r < 0 || r >= h as i64 || c < 0 || c >= w as i64 {
            continue;
        }
        for (k, o) in out.iter_mut().enumerate() {
            *o += data[[r as usize, c as usize, k]] * wgt;
        }
    }
    out
}
