use tracing::debug;

use crate::align::estimate_homography;
use crate::blend::blend_pair;
use crate::diagnostics::render_matches;
use crate::error::{PanoramaError, Result};
use crate::features::{detect_and_describe, match_descriptors};
use crate::frame::{ColorFrame, ImageRole};

use super::config::StitchConfig;
use super::types::{PairReport, PairwiseStitch};

/// Stitch exactly two images: `train` is warped into `query`'s frame.
///
/// Grayscale conversion, feature extraction for both images, cross-checked
/// matching, RANSAC homography, and feathered blending. With
/// `render_diagnostics` set, a match visualization is rendered alongside; it
/// never affects the composite.
pub fn stitch_pair(
    query: &ColorFrame,
    train: &ColorFrame,
    config: &StitchConfig,
) -> Result<PairwiseStitch> {
    config.validate()?;

    let query_gray = query.to_gray();
    let train_gray = train.to_gray();

    let (query_features, train_features) = rayon::join(
        || detect_and_describe(&query_gray, &config.features),
        || detect_and_describe(&train_gray, &config.features),
    );
    if query_features.is_empty() {
        return Err(PanoramaError::FeatureDetectionFailed {
            role: ImageRole::Query,
        });
    }
    if train_features.is_empty() {
        return Err(PanoramaError::FeatureDetectionFailed {
            role: ImageRole::Train,
        });
    }

    let matches = match_descriptors(&train_features.descriptors, &query_features.descriptors);
    debug!(
        query_keypoints = query_features.len(),
        train_keypoints = train_features.len(),
        matches = matches.len(),
        "Matched keypoints"
    );

    let estimate = estimate_homography(
        &matches,
        &train_features.keypoints,
        &query_features.keypoints,
        config,
    )?;

    let blended = blend_pair(
        query,
        train,
        &estimate.homography,
        config.smoothing_window_percent,
    )?;

    let diagnostic = config.render_diagnostics.then(|| {
        render_matches(
            train,
            &train_features.keypoints,
            query,
            &query_features.keypoints,
            &matches,
        )
    });

    Ok(PairwiseStitch {
        composite: blended.composite,
        diagnostic,
        report: PairReport {
            query_keypoints: query_features.len(),
            train_keypoints: train_features.len(),
            matches: matches.len(),
            inliers: estimate.inlier_count,
            feather_width: blended.feather_width,
        },
    })
}
