use ndarray::{Array2, Array3, Axis, Zip};
use serde::{Deserialize, Serialize};

use crate::consts::{COLOR_CHANNEL_COUNT, LUMINANCE_B, LUMINANCE_G, LUMINANCE_R};

/// An RGB raster image.
/// Pixel data is row-major with shape = (height, width, 3), channel order R, G, B.
/// Loaded images hold values in [0.0, 1.0].
#[derive(Clone, Debug, PartialEq)]
pub struct ColorFrame {
    pub data: Array3<f32>,
}

impl ColorFrame {
    /// Wrap an existing array. The last axis must have exactly three channels.
    pub fn new(data: Array3<f32>) -> Self {
        debug_assert_eq!(data.dim().2, COLOR_CHANNEL_COUNT);
        Self { data }
    }

    /// A black frame of the given size.
    pub fn zeros(height: usize, width: usize) -> Self {
        Self::new(Array3::zeros((height, width, COLOR_CHANNEL_COUNT)))
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    /// Size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.data.len() * std::mem::size_of::<f32>()
    }

    /// Luminance (ITU-R BT.601) of this frame.
    pub fn to_gray(&self) -> GrayFrame {
        let (h, w, _) = self.data.dim();
        let mut gray = Array2::<f32>::zeros((h, w));
        Zip::from(&mut gray)
            .and(self.data.lanes(Axis(2)))
            .for_each(|g, px| {
                *g = LUMINANCE_R * px[0] + LUMINANCE_G * px[1] + LUMINANCE_B * px[2];
            });
        GrayFrame::new(gray)
    }

    /// Replace non-finite samples with 0 and clamp to [0, 1].
    ///
    /// Composites fed back into another stitch round go through this so the
    /// feature extractor always sees the same numeric range as a loaded image.
    pub fn sanitized(mut self) -> Self {
        self.data.mapv_inplace(|v| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 });
        self
    }
}

/// A single-channel image, shape = (height, width).
#[derive(Clone, Debug, PartialEq)]
pub struct GrayFrame {
    pub data: Array2<f32>,
}

impl GrayFrame {
    pub fn new(data: Array2<f32>) -> Self {
        Self { data }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }
}

/// Positional role of an image within one pairwise stitch.
///
/// The query image stays unwarped at the canvas origin; the train image is
/// warped into the query's frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageRole {
    Query,
    Train,
}

impl std::fmt::Display for ImageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Query => write!(f, "query"),
            Self::Train => write!(f, "train"),
        }
    }
}
