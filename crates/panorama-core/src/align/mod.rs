//! Geometric alignment between image pairs.

pub mod homography;
pub mod ransac;

pub use homography::{estimate_homography, Homography, HomographyEstimate};
pub use ransac::RansacConfig;
