use nalgebra::Point2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_RANSAC_SEED;

use super::homography::{dlt, Homography};

/// Minimal sample size for a homography.
const SAMPLE_SIZE: usize = 4;

/// Sine of the smallest angle below which three sample points count as collinear.
const COLLINEAR_TOLERANCE: f64 = 1e-3;

/// Random-sample-consensus parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RansacConfig {
    /// Hard cap on sampling iterations.
    pub max_iterations: usize,
    /// Desired probability that at least one sample was outlier-free.
    pub confidence: f64,
    /// Fixed seed for reproducible sampling; `None` draws from the OS.
    pub seed: Option<u64>,
}

impl Default for RansacConfig {
    fn default() -> Self {
        Self {
            max_iterations: 2000,
            confidence: 0.995,
            seed: Some(DEFAULT_RANSAC_SEED),
        }
    }
}

/// Best model found by [`ransac_homography`].
#[derive(Clone, Debug)]
pub struct RansacFit {
    pub model: Homography,
    pub inliers: Vec<bool>,
    pub inlier_count: usize,
}

/// Robustly fit `dst ~ H src`.
///
/// Minimal samples of four correspondences are drawn without replacement;
/// near-collinear samples are skipped. A model is scored by its inlier count
/// (reprojection error <= `threshold`), ties going to the lower summed
/// squared error. The iteration budget shrinks as the inlier ratio improves.
/// The winner is refit on all its inliers. Returns `None` when no usable model
/// gathers at least four inliers.
pub fn ransac_homography(
    src: &[Point2<f64>],
    dst: &[Point2<f64>],
    threshold: f64,
    config: &RansacConfig,
) -> Option<RansacFit> {
    let n = src.len();
    if n < SAMPLE_SIZE || dst.len() != n {
        return None;
    }

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => {
            let mut tr = rand::rng();
            StdRng::from_rng(&mut tr)
        }
    };

    let mut best: Option<(Homography, Vec<bool>, usize, f64)> = None;
    let mut required_iters = config.max_iterations;
    let mut iter = 0usize;

    while iter < required_iters {
        iter += 1;

        let sample = rand::seq::index::sample(&mut rng, n, SAMPLE_SIZE);
        let s_src: Vec<Point2<f64>> = sample.iter().map(|i| src[i]).collect();
        let s_dst: Vec<Point2<f64>> = sample.iter().map(|i| dst[i]).collect();
        if has_collinear_triple(&s_src) || has_collinear_triple(&s_dst) {
            continue;
        }
        let Some(model) = dlt(&s_src, &s_dst) else {
            continue;
        };

        let (inliers, count, sse) = score(&model, src, dst, threshold);
        let improved = match &best {
            None => count > 0,
            Some((_, _, best_count, best_sse)) => {
                count > *best_count || (count == *best_count && sse < *best_sse)
            }
        };
        if improved {
            best = Some((model, inliers, count, sse));
            required_iters = required_iters.min(adaptive_iterations(
                count,
                n,
                config.confidence,
                config.max_iterations,
            ));
        }
    }

    let (model, inliers, count, _) = best?;
    if count < SAMPLE_SIZE {
        return None;
    }

    // Refit on the consensus set; keep it only if support does not drop.
    let in_src: Vec<Point2<f64>> = select(src, &inliers);
    let in_dst: Vec<Point2<f64>> = select(dst, &inliers);
    if let Some(refit) = dlt(&in_src, &in_dst) {
        let (refit_inliers, refit_count, _) = score(&refit, src, dst, threshold);
        if refit_count >= count {
            return Some(RansacFit {
                model: refit,
                inliers: refit_inliers,
                inlier_count: refit_count,
            });
        }
    }

    Some(RansacFit {
        model,
        inliers,
        inlier_count: count,
    })
}

fn score(
    model: &Homography,
    src: &[Point2<f64>],
    dst: &[Point2<f64>],
    threshold: f64,
) -> (Vec<bool>, usize, f64) {
    let mut inliers = vec![false; src.len()];
    let mut count = 0usize;
    let mut sse = 0.0f64;
    for (i, (s, d)) in src.iter().zip(dst.iter()).enumerate() {
        let err = model.reprojection_error(s, d);
        if err <= threshold {
            inliers[i] = true;
            count += 1;
            sse += err * err;
        }
    }
    (inliers, count, sse)
}

fn select(points: &[Point2<f64>], mask: &[bool]) -> Vec<Point2<f64>> {
    points
        .iter()
        .zip(mask.iter())
        .filter(|(_, &keep)| keep)
        .map(|(p, _)| *p)
        .collect()
}

/// Iterations needed to draw one all-inlier sample with probability `confidence`.
fn adaptive_iterations(inliers: usize, total: usize, confidence: f64, cap: usize) -> usize {
    let w = inliers as f64 / total as f64;
    let ws = w.powi(SAMPLE_SIZE as i32);
    if ws >= 1.0 - 1e-12 {
        return 1;
    }
    if ws <= 1e-12 {
        return cap;
    }
    let est = ((1.0 - confidence).max(1e-12).ln() / (1.0 - ws).ln()).ceil();
    if est.is_finite() && est > 0.0 {
        (est as usize).min(cap)
    } else {
        cap
    }
}

fn has_collinear_triple(points: &[Point2<f64>]) -> bool {
    let n = points.len();
    for i in 0..n {
        for j in i + 1..n {
            for k in j + 1..n {
                let (a, b, c) = (points[i], points[j], points[k]);
                let ab = b - a;
                let ac = c - a;
                let cross = ab.x * ac.y - ab.y * ac.x;
                let scale = ab.norm() * ac.norm();
                if scale <= f64::EPSILON || cross.abs() <= COLLINEAR_TOLERANCE * scale {
                    return true;
                }
            }
        }
    }
    false
}
