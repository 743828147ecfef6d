//! Keypoint detection, description and matching.

pub mod descriptor;
pub mod detector;
pub mod matcher;

use serde::{Deserialize, Serialize};

use crate::consts::DESCRIPTOR_LENGTH;

pub use detector::detect_and_describe;
pub use matcher::match_descriptors;

/// A localized, repeatably detectable image feature.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keypoint {
    /// Sub-pixel column coordinate.
    pub x: f32,
    /// Sub-pixel row coordinate.
    pub y: f32,
    /// Radius of the support region the descriptor was computed over.
    pub scale: f32,
    /// Dominant gradient direction in radians, [0, 2*pi).
    pub orientation: f32,
    /// Corner response at the detection peak.
    pub response: f32,
}

/// Fixed-length appearance summary attached 1:1 to a keypoint.
pub type Descriptor = [f32; DESCRIPTOR_LENGTH];

/// Keypoints and their descriptors, index-aligned.
#[derive(Clone, Debug, Default)]
pub struct FeatureSet {
    pub keypoints: Vec<Keypoint>,
    pub descriptors: Vec<Descriptor>,
}

impl FeatureSet {
    pub fn len(&self) -> usize {
        self.keypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty()
    }
}

/// A correspondence between one query and one train descriptor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Match {
    /// Index into the query feature set.
    pub query_idx: usize,
    /// Index into the train feature set.
    pub train_idx: usize,
    /// Euclidean distance between the two descriptors.
    pub distance: f32,
}

/// Corner detector and descriptor parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Gaussian pre-blur applied before computing gradients.
    pub detector_sigma: f32,
    /// Gaussian window used to accumulate the structure tensor.
    pub window_sigma: f32,
    /// Harris sensitivity constant.
    pub harris_k: f32,
    /// Corner responses below this fraction of the image maximum are ignored.
    pub response_threshold: f32,
    /// Half-size of the non-maximum suppression neighbourhood.
    pub nms_radius: usize,
    /// Keep at most this many of the strongest corners.
    pub max_keypoints: usize,
    /// Half-size of the square patch a descriptor is computed over.
    pub descriptor_radius: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            detector_sigma: 1.0,
            window_sigma: 1.5,
            harris_k: 0.04,
            response_threshold: 0.01,
            nms_radius: 4,
            max_keypoints: 2000,
            descriptor_radius: 8,
        }
    }
}
