use thiserror::Error;

use crate::frame::ImageRole;

#[derive(Error, Debug)]
pub enum PanoramaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Need at least 2 images for stitching, got {count}")]
    InsufficientImages { count: usize },

    #[error("Invalid image at index {index}: {reason}")]
    InvalidImage { index: usize, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No usable keypoints in the {role} image")]
    FeatureDetectionFailed { role: ImageRole },

    #[error("Not enough matches: {found} < {required}")]
    InsufficientMatches { found: usize, required: usize },

    #[error("Homography computation failed: {0}")]
    HomographyComputationFailed(String),

    #[error("Blending failed: {0}")]
    BlendFailed(String),

    #[error("Stitch step {step} failed with {remaining} images remaining: {source}")]
    StitchStepFailed {
        step: usize,
        remaining: usize,
        #[source]
        source: Box<PanoramaError>,
    },
}

impl PanoramaError {
    /// The innermost cause, unwrapping `StitchStepFailed` layers.
    pub fn root_cause(&self) -> &PanoramaError {
        match self {
            Self::StitchStepFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, PanoramaError>;
