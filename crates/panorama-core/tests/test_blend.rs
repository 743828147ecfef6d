#[allow(dead_code)]
mod common;

use nalgebra::Matrix3;

use panorama_core::align::Homography;
use panorama_core::blend::{blend_pair, build_seam_masks, feather_width};
use panorama_core::error::PanoramaError;

#[test]
fn test_thousand_pixel_feather_example() {
    let window = feather_width(1000, 1000, 0.10);
    assert_eq!(window, 100.0);

    let masks = build_seam_masks(1000, 2000, 4, window).unwrap();
    let row = masks.query.row(2);
    for col in 0..950 {
        assert_eq!(row[col], 1.0, "column {col}");
    }
    for col in 1050..2000 {
        assert_eq!(row[col], 0.0, "column {col}");
    }
    // Linear in between: constant step.
    let step = row[950] - row[951];
    for col in 950..1049 {
        assert!((row[col] - row[col + 1] - step).abs() < 1e-5);
    }
    assert!(masks
        .query
        .iter()
        .zip(masks.train.iter())
        .all(|(q, t)| (q + t - 1.0).abs() < 1e-6));
}

#[test]
fn test_blend_with_known_offset() {
    let (scene, views) = common::overlapping_views(2, 9);
    let h = Homography::translation(common::VIEW_STEP as f64, 0.0);
    let out = blend_pair(&views[0], &views[1], &h, 0.10).unwrap();

    let expected_width = common::VIEW_STEP + common::VIEW_WIDTH;
    assert_eq!(out.feather_width, 100.0);
    assert_eq!(out.composite.width(), expected_width);
    assert_eq!(out.composite.height(), common::VIEW_HEIGHT);

    // Left of the ramp only the query contributes; past it only the train.
    let rows = 0..common::VIEW_HEIGHT;
    assert!(common::column_difference(&out.composite, 20, &scene, 20, rows.clone()) < 1e-6);
    assert!(common::column_difference(&out.composite, 300, &scene, 300, rows.clone()) < 1e-6);
    // Inside the overlap both views hold the same scene, so the blend is seamless.
    assert!(common::column_difference(&out.composite, 180, &scene, 180, rows) < 1e-5);
}

#[test]
fn test_footprint_outside_canvas_fails() {
    let (_, views) = common::overlapping_views(2, 9);
    let h = Homography::translation(10_000.0, 0.0);
    let err = blend_pair(&views[0], &views[1], &h, 0.10).unwrap_err();
    assert!(matches!(err, PanoramaError::BlendFailed(_)));
}

#[test]
fn test_corner_behind_projection_plane_fails() {
    let (_, views) = common::overlapping_views(2, 9);
    let m = Matrix3::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, -0.01, 0.0, 1.0);
    let h = Homography::from_matrix(m).unwrap();
    let err = blend_pair(&views[0], &views[1], &h, 0.10).unwrap_err();
    assert!(matches!(err, PanoramaError::BlendFailed(_)));
}

#[test]
fn test_black_composite_fails() {
    let black = panorama_core::frame::ColorFrame::zeros(120, 120);
    let err = blend_pair(&black, &black, &Homography::translation(60.0, 0.0), 0.10).unwrap_err();
    assert!(matches!(err, PanoramaError::BlendFailed(_)));
}
