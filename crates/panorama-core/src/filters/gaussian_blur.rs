use ndarray::{Array2, ArrayViewMut1, Axis};
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// Apply a Gaussian blur using separable 1D convolution with clamped borders.
pub fn gaussian_blur_array(data: &Array2<f32>, sigma: f32) -> Array2<f32> {
    if sigma <= 0.0 {
        return data.clone();
    }
    let kernel = gaussian_kernel(sigma);
    let horizontal = convolve_axis(data, &kernel, Axis(1));
    convolve_axis(&horizontal, &kernel, Axis(0))
}

/// Normalized 1D Gaussian kernel with radius ceil(3 * sigma).
pub fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (sigma * 3.0).ceil().max(1.0) as usize;
    let s2 = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (0..=2 * radius)
        .map(|i| {
            let x = i as f32 - radius as f32;
            (-x * x / s2).exp()
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    for k in &mut kernel {
        *k /= sum;
    }
    kernel
}

/// Convolve every lane along `axis` with `kernel`, replicating edge samples.
fn convolve_axis(data: &Array2<f32>, kernel: &[f32], axis: Axis) -> Array2<f32> {
    let mut result = Array2::<f32>::zeros(data.dim());
    let radius = kernel.len() / 2;

    let filter_lane = |(src, mut dst): (ndarray::ArrayView1<f32>, ArrayViewMut1<f32>)| {
        let n = src.len() as isize;
        for i in 0..src.len() {
            let mut sum = 0.0f32;
            for (ki, &kv) in kernel.iter().enumerate() {
                let j = (i as isize + ki as isize - radius as isize).clamp(0, n - 1) as usize;
                sum += src[j] * kv;
            }
            dst[i] = sum;
        }
    };

    // Lanes along `axis` are the 1D signals being filtered.
    let lane_axis = Axis(1 - axis.index());
    if data.len() >= PARALLEL_PIXEL_THRESHOLD {
        data.axis_iter(lane_axis)
            .into_par_iter()
            .zip(result.axis_iter_mut(lane_axis).into_par_iter())
            .for_each(filter_lane);
    } else {
        data.axis_iter(lane_axis)
            .zip(result.axis_iter_mut(lane_axis))
            .for_each(filter_lane);
    }

    result
}
