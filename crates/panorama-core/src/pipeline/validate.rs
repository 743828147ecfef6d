use tracing::debug;

use crate::error::{PanoramaError, Result};
use crate::frame::ColorFrame;

use super::config::ValidationConfig;

/// Check a capture set before stitching it.
///
/// Fails with `InsufficientImages` below two images or below
/// `expected_count`. Surplus images, images smaller than `min_side` and
/// images holding samples outside [0, 1] fail with `InvalidImage`.
pub fn validate_inputs(images: &[ColorFrame], config: &ValidationConfig) -> Result<()> {
    let count = images.len();
    if count < 2 {
        return Err(PanoramaError::InsufficientImages { count });
    }
    match config.expected_count {
        Some(expected) if count < expected => {
            return Err(PanoramaError::InsufficientImages { count });
        }
        Some(expected) if count > expected => {
            return Err(PanoramaError::InvalidImage {
                index: expected,
                reason: format!("expected {expected} images, got {count}"),
            });
        }
        _ => {}
    }

    for (index, image) in images.iter().enumerate() {
        let (h, w) = (image.height(), image.width());
        if h < config.min_side || w < config.min_side {
            return Err(PanoramaError::InvalidImage {
                index,
                reason: format!(
                    "{w}x{h} is below the minimum side of {} px",
                    config.min_side
                ),
            });
        }
    }
    check_sample_range(images)?;

    debug!(images = count, "Inputs validated");
    Ok(())
}

/// Every sample must be finite and within [0, 1], the range composites are
/// clamped back to between reduction steps.
pub(super) fn check_sample_range(images: &[ColorFrame]) -> Result<()> {
    for (index, image) in images.iter().enumerate() {
        if let Some(&v) = image
            .data
            .iter()
            .find(|v| !(v.is_finite() && (0.0..=1.0).contains(*v)))
        {
            return Err(PanoramaError::InvalidImage {
                index,
                reason: format!("sample {v} is outside [0, 1]"),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(n: usize, side: usize) -> Vec<ColorFrame> {
        (0..n).map(|_| ColorFrame::zeros(side, side)).collect()
    }

    #[test]
    fn counts_are_checked() {
        let cfg = ValidationConfig {
            expected_count: Some(3),
            min_side: 10,
        };
        assert!(matches!(
            validate_inputs(&frames(1, 10), &cfg),
            Err(PanoramaError::InsufficientImages { count: 1 })
        ));
        assert!(matches!(
            validate_inputs(&frames(2, 10), &cfg),
            Err(PanoramaError::InsufficientImages { count: 2 })
        ));
        assert!(matches!(
            validate_inputs(&frames(4, 10), &cfg),
            Err(PanoramaError::InvalidImage { index: 3, .. })
        ));
        assert!(validate_inputs(&frames(3, 10), &cfg).is_ok());
    }

    #[test]
    fn small_image_is_rejected() {
        let mut images = frames(3, 120);
        images[1] = ColorFrame::zeros(120, 99);
        let err = validate_inputs(&images, &ValidationConfig::default()).unwrap_err();
        assert!(matches!(err, PanoramaError::InvalidImage { index: 1, .. }));
    }

    #[test]
    fn out_of_range_samples_are_rejected() {
        let mut images = frames(2, 10);
        images[1].data[[3, 4, 2]] = 255.0;
        assert!(matches!(
            check_sample_range(&images),
            Err(PanoramaError::InvalidImage { index: 1, .. })
        ));

        images[1].data[[3, 4, 2]] = f32::NAN;
        assert!(check_sample_range(&images).is_err());

        images[1].data[[3, 4, 2]] = 1.0;
        assert!(check_sample_range(&images).is_ok());
    }
}
