#[allow(dead_code)]
mod common;

use panorama_core::consts::DESCRIPTOR_LENGTH;
use panorama_core::features::{detect_and_describe, match_descriptors, FeatureConfig};

#[test]
fn test_blank_image_has_no_features() {
    let gray = common::blank_frame(120, 120).to_gray();
    let features = detect_and_describe(&gray, &FeatureConfig::default());
    assert!(features.is_empty());
    assert!(features.descriptors.is_empty());
}

#[test]
fn test_textured_image_has_features() {
    let gray = common::textured_scene(160, 200, 7).to_gray();
    let config = FeatureConfig::default();
    let features = detect_and_describe(&gray, &config);

    assert!(features.len() > 50, "only {} keypoints", features.len());
    assert_eq!(features.keypoints.len(), features.descriptors.len());

    let margin = config.descriptor_radius as f32;
    for (kp, desc) in features.keypoints.iter().zip(&features.descriptors) {
        assert!(kp.x >= margin && kp.x < 200.0 - margin);
        assert!(kp.y >= margin && kp.y < 160.0 - margin);
        assert!(kp.orientation >= 0.0 && kp.orientation < std::f32::consts::TAU);
        assert_eq!(desc.len(), DESCRIPTOR_LENGTH);
        let norm: f32 = desc.iter().map(|v| v * v).sum::<f32>().sqrt();
        approx::assert_relative_eq!(norm, 1.0, epsilon = 1e-4);
    }
}

#[test]
fn test_max_keypoints_keeps_strongest() {
    let gray = common::textured_scene(160, 200, 7).to_gray();
    let all = detect_and_describe(&gray, &FeatureConfig::default());
    let capped = detect_and_describe(
        &gray,
        &FeatureConfig {
            max_keypoints: 10,
            ..FeatureConfig::default()
        },
    );
    assert!(capped.len() <= 10);
    let weakest_kept = capped
        .keypoints
        .iter()
        .map(|k| k.response)
        .fold(f32::INFINITY, f32::min);
    let stronger_in_all = all
        .keypoints
        .iter()
        .filter(|k| k.response > weakest_kept)
        .count();
    assert!(stronger_in_all < 10);
}

#[test]
fn test_detection_is_deterministic() {
    let gray = common::textured_scene(160, 200, 11).to_gray();
    let a = detect_and_describe(&gray, &FeatureConfig::default());
    let b = detect_and_describe(&gray, &FeatureConfig::default());
    assert_eq!(a.keypoints, b.keypoints);
    assert_eq!(a.descriptors, b.descriptors);
}

#[test]
fn test_shifted_view_reproduces_keypoints() {
    let (_, views) = common::overlapping_views(2, 3);
    let config = FeatureConfig::default();
    let left = detect_and_describe(&views[0].to_gray(), &config);
    let right = detect_and_describe(&views[1].to_gray(), &config);

    let matches = match_descriptors(&right.descriptors, &left.descriptors);
    let shift = common::VIEW_STEP as f32;
    let consistent = matches
        .iter()
        .filter(|m| {
            let q = left.keypoints[m.query_idx];
            let t = right.keypoints[m.train_idx];
            (t.x + shift - q.x).abs() < 0.5 && (t.y - q.y).abs() < 0.5
        })
        .count();
    assert!(consistent >= 8, "only {consistent} consistent matches");
}
