#[allow(dead_code)]
mod common;

use approx::assert_abs_diff_eq;

use panorama_core::align::{estimate_homography, Homography};
use panorama_core::error::PanoramaError;
use panorama_core::features::{detect_and_describe, match_descriptors, FeatureConfig, Keypoint, Match};
use panorama_core::pipeline::config::StitchConfig;

fn kp(x: f32, y: f32) -> Keypoint {
    Keypoint {
        x,
        y,
        scale: 8.0,
        orientation: 0.0,
        response: 1.0,
    }
}

fn identity_matches(n: usize) -> Vec<Match> {
    (0..n)
        .map(|i| Match {
            query_idx: i,
            train_idx: i,
            distance: 0.0,
        })
        .collect()
}

#[test]
fn test_three_matches_are_insufficient() {
    let train = vec![kp(0.0, 0.0), kp(10.0, 0.0), kp(0.0, 10.0)];
    let query = train.clone();
    let err = estimate_homography(&identity_matches(3), &train, &query, &StitchConfig::default())
        .unwrap_err();
    assert!(matches!(
        err,
        PanoramaError::InsufficientMatches {
            found: 3,
            required: 4
        }
    ));
}

#[test]
fn test_translation_is_recovered() {
    let train: Vec<Keypoint> = (0..12)
        .map(|i| kp((i * 13 % 60) as f32 + 2.0, (i * 37 % 90) as f32 + 5.0))
        .collect();
    let query: Vec<Keypoint> = train.iter().map(|k| kp(k.x + 140.0, k.y - 3.0)).collect();

    let est = estimate_homography(&identity_matches(12), &train, &query, &StitchConfig::default())
        .unwrap();
    assert_eq!(est.inlier_count, 12);
    assert!(est.inliers.iter().all(|&b| b));
    let (x, y) = est.homography.transform(0.0, 0.0).unwrap();
    assert_abs_diff_eq!(x, 140.0, epsilon = 1e-6);
    assert_abs_diff_eq!(y, -3.0, epsilon = 1e-6);
}

#[test]
fn test_collinear_correspondences_fail() {
    let train: Vec<Keypoint> = (0..8).map(|i| kp(i as f32 * 10.0, 20.0)).collect();
    let query: Vec<Keypoint> = train.iter().map(|k| kp(k.x + 5.0, k.y)).collect();
    let err = estimate_homography(&identity_matches(8), &train, &query, &StitchConfig::default())
        .unwrap_err();
    assert!(matches!(err, PanoramaError::HomographyComputationFailed(_)));
}

#[test]
fn test_feature_pipeline_recovers_view_offset() {
    let (_, views) = common::overlapping_views(2, 5);
    let config = StitchConfig::default();
    let query = detect_and_describe(&views[0].to_gray(), &FeatureConfig::default());
    let train = detect_and_describe(&views[1].to_gray(), &FeatureConfig::default());
    let matches = match_descriptors(&train.descriptors, &query.descriptors);

    let est = estimate_homography(&matches, &train.keypoints, &query.keypoints, &config).unwrap();
    assert!(est.inlier_count >= 8);
    let shift = common::VIEW_STEP as f64;
    for (x, y) in [(0.0, 0.0), (50.0, 80.0), (199.0, 159.0)] {
        let (px, py) = est.homography.transform(x, y).unwrap();
        assert!((px - (x + shift)).abs() < 1.0, "x {x} -> {px}");
        assert!((py - y).abs() < 1.0, "y {y} -> {py}");
    }
}

#[test]
fn test_homography_inverse_round_trips() {
    let h = Homography::translation(12.5, -4.0);
    let inv = h.inverse().unwrap();
    let (x, y) = h.transform(3.0, 7.0).unwrap();
    let (bx, by) = inv.transform(x, y).unwrap();
    assert_abs_diff_eq!(bx, 3.0, epsilon = 1e-9);
    assert_abs_diff_eq!(by, 7.0, epsilon = 1e-9);
}
