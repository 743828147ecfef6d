use std::fs::File;
use std::time::{Duration, SystemTime};

use ndarray::Array3;

use panorama_core::frame::ColorFrame;
use panorama_core::io::cleanup::cleanup_old_artifacts;
use panorama_core::io::image_io::{load_color_image, save_color_image, save_color_png};

fn sample_frame() -> ColorFrame {
    let mut data = Array3::<f32>::zeros((4, 5, 3));
    data[[0, 1, 0]] = 0.5;
    data[[1, 0, 1]] = 1.0;
    data[[2, 3, 2]] = 0.25;
    data[[3, 4, 0]] = 1.7;
    data[[3, 4, 1]] = f32::NAN;
    ColorFrame::new(data)
}

#[test]
fn test_save_load_roundtrip_tiff() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pano.tiff");

    save_color_image(&sample_frame(), &path).unwrap();
    let loaded = load_color_image(&path).unwrap();

    assert_eq!(loaded.data.dim(), (4, 5, 3));
    assert!((loaded.data[[0, 1, 0]] - 0.5).abs() < 1e-3);
    assert!((loaded.data[[1, 0, 1]] - 1.0).abs() < 1e-4);
    assert!((loaded.data[[2, 3, 2]] - 0.25).abs() < 1e-3);
    // Out-of-range samples are clamped, non-finite ones zeroed.
    assert!((loaded.data[[3, 4, 0]] - 1.0).abs() < 1e-4);
    assert_eq!(loaded.data[[3, 4, 1]], 0.0);
}

#[test]
fn test_save_png_is_8bit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pano.png");

    save_color_png(&sample_frame(), &path).unwrap();
    let loaded = load_color_image(&path).unwrap();
    assert!((loaded.data[[0, 1, 0]] - 128.0 / 255.0).abs() < 1e-3);
}

#[test]
fn test_save_jpeg_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pano.jpeg");
    let frame = ColorFrame::new(Array3::from_elem((16, 16, 3), 0.5));

    save_color_image(&frame, &path).unwrap();
    let loaded = load_color_image(&path).unwrap();
    assert_eq!(loaded.width(), 16);
    assert!((loaded.data[[8, 8, 0]] - 0.5).abs() < 0.05);
}

#[test]
fn test_load_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_color_image(&dir.path().join("nope.png")).is_err());
}

#[test]
fn test_cleanup_removes_only_old_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let old = dir.path().join("1700000000_panorama.jpg");
    let fresh = dir.path().join("fresh.png");
    let notes = dir.path().join("notes.txt");

    let two_days_ago = SystemTime::now() - Duration::from_secs(48 * 3600);
    for path in [&old, &notes] {
        let file = File::create(path).unwrap();
        file.set_modified(two_days_ago).unwrap();
    }
    File::create(&fresh).unwrap();

    let removed = cleanup_old_artifacts(dir.path(), Duration::from_secs(24 * 3600)).unwrap();
    assert_eq!(removed, vec![old.clone()]);
    assert!(!old.exists());
    assert!(fresh.exists());
    assert!(notes.exists());
}
