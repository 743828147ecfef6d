use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::align::RansacConfig;
use crate::consts::{
    DEFAULT_MIN_IMAGE_SIDE, DEFAULT_MIN_MATCH_COUNT, DEFAULT_REPROJECTION_THRESHOLD,
    DEFAULT_SMOOTHING_WINDOW_PERCENT,
};
use crate::error::{PanoramaError, Result};
use crate::features::FeatureConfig;

/// A complete stitching job: where images come from, where results go, and
/// how to stitch them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PanoramaConfig {
    /// Source images, in capture order (left to right).
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    /// Where to write the match visualization of the final pair, if anywhere.
    pub diagnostic: Option<PathBuf>,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub stitching: StitchConfig,
}

/// Tunables passed explicitly into every stitching component.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StitchConfig {
    /// Minimum cross-checked matches before a homography is attempted.
    pub min_match_count: usize,
    /// RANSAC inlier distance bound, in pixels.
    pub reprojection_threshold: f64,
    /// Fraction (0, 1] of the narrower image width used as the seam feather
    /// width, before clamping to [100, 1000] pixels.
    pub smoothing_window_percent: f32,
    /// Render the match visualization for each pair. Not read from or written
    /// to config files; the CLI sets it when a diagnostic path is given.
    #[serde(skip)]
    pub render_diagnostics: bool,
    pub order: ReductionOrder,
    pub features: FeatureConfig,
    pub ransac: RansacConfig,
}

impl Default for StitchConfig {
    fn default() -> Self {
        Self {
            min_match_count: DEFAULT_MIN_MATCH_COUNT,
            reprojection_threshold: DEFAULT_REPROJECTION_THRESHOLD,
            smoothing_window_percent: DEFAULT_SMOOTHING_WINDOW_PERCENT,
            render_diagnostics: true,
            order: ReductionOrder::default(),
            features: FeatureConfig::default(),
            ransac: RansacConfig::default(),
        }
    }
}

impl StitchConfig {
    /// Reject values no stitch could succeed with.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(PanoramaError::InvalidConfig(msg)) };

        if self.min_match_count < 4 {
            return invalid(format!(
                "min_match_count must be at least 4, got {}",
                self.min_match_count
            ));
        }
        if !(self.reprojection_threshold.is_finite() && self.reprojection_threshold > 0.0) {
            return invalid(format!(
                "reprojection_threshold must be positive, got {}",
                self.reprojection_threshold
            ));
        }
        if !(self.smoothing_window_percent > 0.0 && self.smoothing_window_percent <= 1.0) {
            return invalid(format!(
                "smoothing_window_percent must be in (0, 1], got {}",
                self.smoothing_window_percent
            ));
        }
        let f = &self.features;
        if f.descriptor_radius < 4 || f.descriptor_radius % 2 != 0 {
            return invalid(format!(
                "descriptor_radius must be an even number >= 4, got {}",
                f.descriptor_radius
            ));
        }
        if f.max_keypoints == 0 {
            return invalid("max_keypoints must be positive".into());
        }
        if !(f.response_threshold >= 0.0 && f.response_threshold < 1.0) {
            return invalid(format!(
                "response_threshold must be in [0, 1), got {}",
                f.response_threshold
            ));
        }
        if !(f.detector_sigma.is_finite() && f.detector_sigma >= 0.0)
            || !(f.window_sigma.is_finite() && f.window_sigma > 0.0)
        {
            return invalid("detector_sigma must be >= 0 and window_sigma > 0".into());
        }
        if !(f.harris_k.is_finite() && f.harris_k > 0.0 && f.harris_k < 0.25) {
            return invalid(format!("harris_k must be in (0, 0.25), got {}", f.harris_k));
        }
        if self.ransac.max_iterations == 0 {
            return invalid("ransac.max_iterations must be positive".into());
        }
        if !(self.ransac.confidence > 0.0 && self.ransac.confidence < 1.0) {
            return invalid(format!(
                "ransac.confidence must be in (0, 1), got {}",
                self.ransac.confidence
            ));
        }
        Ok(())
    }
}

/// How the working sequence is folded into one image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReductionOrder {
    /// Repeatedly stitch the last two images, right to left.
    #[default]
    Sequential,
    /// Stitch adjacent pairs of each round in parallel until one image is
    /// left. Seam geometry differs from `Sequential`.
    BalancedTree,
}

impl std::fmt::Display for ReductionOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sequential => write!(f, "Sequential"),
            Self::BalancedTree => write!(f, "Balanced Tree"),
        }
    }
}

/// Checks applied to source images before any stitching work.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Require exactly this many images, if set.
    pub expected_count: Option<usize>,
    /// Reject images whose width or height is below this.
    pub min_side: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            expected_count: None,
            min_side: DEFAULT_MIN_IMAGE_SIDE,
        }
    }
}
