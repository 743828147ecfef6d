use ndarray::Array2;
use tracing::debug;

use crate::consts::EPSILON;
use crate::filters::gaussian_blur::gaussian_blur_array;
use crate::filters::gradient::sobel_gradients;
use crate::frame::GrayFrame;

use super::descriptor::{describe_patch, dominant_orientation};
use super::{FeatureConfig, FeatureSet, Keypoint};

/// Detect corners in a grayscale frame and compute a descriptor for each.
///
/// 1. Pre-blur and take Sobel gradients
/// 2. Accumulate the structure tensor over a Gaussian window
/// 3. Harris response, thresholded relative to the image maximum
/// 4. Non-maximum suppression, then sub-pixel peak refinement
/// 5. Keep the strongest `max_keypoints`, describe each patch
///
/// Blank or low-texture images yield an empty set. The result depends only on
/// the pixels and `config`.
pub fn detect_and_describe(frame: &GrayFrame, config: &FeatureConfig) -> FeatureSet {
    let (h, w) = frame.data.dim();
    let margin = config.descriptor_radius.max(config.nms_radius) + 1;
    if h <= 2 * margin || w <= 2 * margin {
        return FeatureSet::default();
    }

    let blurred = gaussian_blur_array(&frame.data, config.detector_sigma);
    let (gx, gy) = sobel_gradients(&blurred);
    let response = harris_response(&gx, &gy, config.window_sigma, config.harris_k);

    let mut candidates = local_maxima(&response, config, margin);
    candidates.sort_by(|a, b| {
        b.2.total_cmp(&a.2)
            .then_with(|| a.0.cmp(&b.0))
            .then_with(|| a.1.cmp(&b.1))
    });
    candidates.truncate(config.max_keypoints);

    let mut features = FeatureSet::default();
    for (row, col, strength) in candidates {
        let Some(descriptor) = describe_patch(&gx, &gy, row, col, config.descriptor_radius) else {
            continue;
        };
        let (sub_y, sub_x) = refine_peak(&response, row, col);
        features.keypoints.push(Keypoint {
            x: col as f32 + sub_x,
            y: row as f32 + sub_y,
            scale: config.descriptor_radius as f32,
            orientation: dominant_orientation(&gx, &gy, row, col, config.descriptor_radius),
            response: strength,
        });
        features.descriptors.push(descriptor);
    }

    debug!(
        keypoints = features.len(),
        width = w,
        height = h,
        "Detected features"
    );
    features
}

/// Harris corner response `det(M) - k * trace(M)^2` per pixel.
fn harris_response(gx: &Array2<f32>, gy: &Array2<f32>, window_sigma: f32, k: f32) -> Array2<f32> {
    let ixx = gaussian_blur_array(&(gx * gx), window_sigma);
    let iyy = gaussian_blur_array(&(gy * gy), window_sigma);
    let ixy = gaussian_blur_array(&(gx * gy), window_sigma);

    let mut response = Array2::<f32>::zeros(gx.dim());
    ndarray::Zip::from(&mut response)
        .and(&ixx)
        .and(&iyy)
        .and(&ixy)
        .for_each(|r, &xx, &yy, &xy| {
            let trace = xx + yy;
            *r = xx * yy - xy * xy - k * trace * trace;
        });
    response
}

/// Strict local maxima of `response` away from the border.
///
/// Plateaus are resolved in raster order: a pixel must beat earlier
/// neighbours strictly and later neighbours or ties, so exactly one pixel of
/// a flat peak survives.
fn local_maxima(
    response: &Array2<f32>,
    config: &FeatureConfig,
    margin: usize,
) -> Vec<(usize, usize, f32)> {
    let (h, w) = response.dim();
    let max_response = response.iter().copied().fold(0.0f32, f32::max);
    if max_response <= EPSILON {
        return Vec::new();
    }
    let threshold = config.response_threshold * max_response;
    let radius = config.nms_radius as isize;

    let mut peaks = Vec::new();
    for row in margin..h - margin {
        'pixel: for col in margin..w - margin {
            let value = response[[row, col]];
            if value <= threshold {
                continue;
            }
            for dr in -radius..=radius {
                for dc in -radius..=radius {
                    if dr == 0 && dc == 0 {
                        continue;
                    }
                    let other = response[[(row as isize + dr) as usize, (col as isize + dc) as usize]];
                    let earlier = dr < 0 || (dr == 0 && dc < 0);
                    if other > value || (earlier && other == value) {
                        continue 'pixel;
                    }
                }
            }
            peaks.push((row, col, value));
        }
    }
    peaks
}

/// Parabolic sub-pixel offset of a peak along each axis, each in [-0.5, 0.5].
fn refine_peak(response: &Array2<f32>, row: usize, col: usize) -> (f32, f32) {
    let fit = |prev: f32, center: f32, next: f32| -> f32 {
        let denom = prev - 2.0 * center + next;
        if denom.abs() <= EPSILON {
            0.0
        } else {
            (0.5 * (prev - next) / denom).clamp(-0.5, 0.5)
        }
    };
    let c = response[[row, col]];
    let dy = fit(response[[row - 1, col]], c, response[[row + 1, col]]);
    let dx = fit(response[[row, col - 1]], c, response[[row, col + 1]]);
    (dy, dx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_image_has_no_features() {
        let frame = GrayFrame::new(Array2::from_elem((64, 64), 0.3));
        let features = detect_and_describe(&frame, &FeatureConfig::default());
        assert!(features.is_empty());
    }

    #[test]
    fn tiny_image_has_no_features() {
        let frame = GrayFrame::new(Array2::from_elem((10, 10), 0.3));
        assert!(detect_and_describe(&frame, &FeatureConfig::default()).is_empty());
    }

    #[test]
    fn square_corners_are_detected() {
        let mut data = Array2::<f32>::from_elem((64, 64), 0.1);
        for r in 20..44 {
            for c in 20..44 {
                data[[r, c]] = 0.9;
            }
        }
        let features = detect_and_describe(&GrayFrame::new(data), &FeatureConfig::default());
        assert!(features.len() >= 4, "found {}", features.len());
        assert_eq!(features.keypoints.len(), features.descriptors.len());
        for corner in [(20.0, 20.0), (43.0, 20.0), (20.0, 43.0), (43.0, 43.0)] {
            let near = features
                .keypoints
                .iter()
                .any(|k| (k.x - corner.0).abs() < 3.0 && (k.y - corner.1).abs() < 3.0);
            assert!(near, "no keypoint near {:?}", corner);
        }
    }

    #[test]
    fn parabola_peak_is_centred() {
        let data = Array2::from_shape_fn((3, 3), |(r, c)| {
            let dr = r as f32 - 1.0;
            let dc = c as f32 - 1.0;
            1.0 - dr * dr - dc * dc
        });
        let (dy, dx) = refine_peak(&data, 1, 1);
        assert!(dy.abs() < 1e-6 && dx.abs() < 1e-6);
    }
}
