//! Planar projective transforms and their robust estimation.
//!
//! A [`Homography`] maps train-image coordinates into the query image's
//! frame, which is also the canvas frame used by the blender: `x' ~ H x`.

use nalgebra::{DMatrix, Matrix3, Point2, Vector3};
use tracing::debug;

use crate::error::{PanoramaError, Result};
use crate::features::{Keypoint, Match};
use crate::pipeline::config::StitchConfig;

use super::ransac::ransac_homography;

/// Determinants smaller than this are treated as singular.
const MIN_DETERMINANT: f64 = 1e-12;

/// A 3x3 projective transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Homography(Matrix3<f64>);

impl Homography {
    /// Wrap a matrix, rejecting non-finite or singular transforms.
    pub fn from_matrix(m: Matrix3<f64>) -> Option<Self> {
        let h = Self(m);
        h.is_usable().then_some(h)
    }

    pub fn identity() -> Self {
        Self(Matrix3::identity())
    }

    /// Pure translation by `(tx, ty)`.
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self(Matrix3::new(1.0, 0.0, tx, 0.0, 1.0, ty, 0.0, 0.0, 1.0))
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.0
    }

    /// Finite entries and a non-zero determinant.
    pub fn is_usable(&self) -> bool {
        self.0.iter().all(|v| v.is_finite()) && self.0.determinant().abs() > MIN_DETERMINANT
    }

    pub fn inverse(&self) -> Option<Homography> {
        self.0.try_inverse().and_then(Homography::from_matrix)
    }

    /// Map `(x, y)`. Returns `None` for points sent to infinity.
    pub fn transform(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let p = self.0 * Vector3::new(x, y, 1.0);
        if p[2].abs() <= f64::EPSILON {
            return None;
        }
        Some((p[0] / p[2], p[1] / p[2]))
    }

    /// Homogeneous scale `w` of the mapped point; negative means behind the
    /// projection plane.
    pub fn depth(&self, x: f64, y: f64) -> f64 {
        self.0[(2, 0)] * x + self.0[(2, 1)] * y + self.0[(2, 2)]
    }

    /// Euclidean distance between `H * src` and `dst`, in pixels.
    pub fn reprojection_error(&self, src: &Point2<f64>, dst: &Point2<f64>) -> f64 {
        match self.transform(src.x, src.y) {
            Some((x, y)) => ((x - dst.x).powi(2) + (y - dst.y).powi(2)).sqrt(),
            None => f64::INFINITY,
        }
    }
}

/// Result of robust homography estimation.
#[derive(Clone, Debug)]
pub struct HomographyEstimate {
    pub homography: Homography,
    /// One flag per input match: true for RANSAC inliers.
    pub inliers: Vec<bool>,
    pub inlier_count: usize,
}

/// Estimate the transform taking train keypoints onto query keypoints.
///
/// Fails with `InsufficientMatches` below `config.min_match_count`, and with
/// `HomographyComputationFailed` when RANSAC finds no non-degenerate model
/// with enough support.
pub fn estimate_homography(
    matches: &[Match],
    train_keypoints: &[Keypoint],
    query_keypoints: &[Keypoint],
    config: &StitchConfig,
) -> Result<HomographyEstimate> {
    let required = config.min_match_count.max(4);
    if matches.len() < required {
        return Err(PanoramaError::InsufficientMatches {
            found: matches.len(),
            required,
        });
    }

    let mut train_points = Vec::with_capacity(matches.len());
    let mut query_points = Vec::with_capacity(matches.len());
    for m in matches {
        let (Some(t), Some(q)) = (
            train_keypoints.get(m.train_idx),
            query_keypoints.get(m.query_idx),
        ) else {
            return Err(PanoramaError::HomographyComputationFailed(format!(
                "match ({}, {}) references a missing keypoint",
                m.query_idx, m.train_idx
            )));
        };
        train_points.push(Point2::new(t.x as f64, t.y as f64));
        query_points.push(Point2::new(q.x as f64, q.y as f64));
    }

    let fit = ransac_homography(
        &train_points,
        &query_points,
        config.reprojection_threshold,
        &config.ransac,
    )
    .ok_or_else(|| {
        PanoramaError::HomographyComputationFailed(format!(
            "no consensus model among {} correspondences",
            matches.len()
        ))
    })?;

    debug!(
        matches = matches.len(),
        inliers = fit.inlier_count,
        "Homography estimated"
    );

    Ok(HomographyEstimate {
        homography: fit.model,
        inliers: fit.inliers,
        inlier_count: fit.inlier_count,
    })
}

/// Normalized DLT: the homography `H` with `dst ~ H src`.
///
/// Points are shifted to zero mean and scaled to an average distance of
/// sqrt(2) before solving `A h = 0` by SVD; the result is de-normalized and
/// scaled so `H[2,2] == 1` when possible. Needs at least four points.
pub fn dlt(src: &[Point2<f64>], dst: &[Point2<f64>]) -> Option<Homography> {
    let n = src.len();
    if n < 4 || dst.len() != n {
        return None;
    }

    let (src_n, t_src) = normalize_points(src)?;
    let (dst_n, t_dst) = normalize_points(dst)?;

    let rows = (2 * n).max(9);
    let mut a = DMatrix::<f64>::zeros(rows, 9);
    for (i, (p, q)) in src_n.iter().zip(dst_n.iter()).enumerate() {
        let (x, y) = (p.x, p.y);
        let (u, v) = (q.x, q.y);
        let r0 = 2 * i;
        let r1 = r0 + 1;

        a[(r0, 0)] = -x;
        a[(r0, 1)] = -y;
        a[(r0, 2)] = -1.0;
        a[(r0, 6)] = u * x;
        a[(r0, 7)] = u * y;
        a[(r0, 8)] = u;

        a[(r1, 3)] = -x;
        a[(r1, 4)] = -y;
        a[(r1, 5)] = -1.0;
        a[(r1, 6)] = v * x;
        a[(r1, 7)] = v * y;
        a[(r1, 8)] = v;
    }

    let svd = a.svd(false, true);
    let v_t = svd.v_t?;
    let smallest = svd.singular_values.imin();
    let h_vec = v_t.row(smallest);

    let mut h = Matrix3::<f64>::zeros();
    for r in 0..3 {
        for c in 0..3 {
            h[(r, c)] = h_vec[3 * r + c];
        }
    }

    let mut h = t_dst.try_inverse()? * h * t_src;
    let scale = h[(2, 2)];
    if scale.abs() > f64::EPSILON {
        h /= scale;
    }
    Homography::from_matrix(h)
}

/// Hartley normalization. Returns the normalized points and the transform
/// applied to them, or `None` when all points coincide.
fn normalize_points(points: &[Point2<f64>]) -> Option<(Vec<Point2<f64>>, Matrix3<f64>)> {
    let n = points.len() as f64;
    let cx = points.iter().map(|p| p.x).sum::<f64>() / n;
    let cy = points.iter().map(|p| p.y).sum::<f64>() / n;
    let mean_dist = points
        .iter()
        .map(|p| ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt())
        .sum::<f64>()
        / n;
    if mean_dist <= f64::EPSILON {
        return None;
    }

    let s = std::f64::consts::SQRT_2 / mean_dist;
    let t = Matrix3::new(s, 0.0, -s * cx, 0.0, s, -s * cy, 0.0, 0.0, 1.0);
    let normalized = points
        .iter()
        .map(|p| Point2::new(s * (p.x - cx), s * (p.y - cy)))
        .collect();
    Some((normalized, t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square() -> Vec<Point2<f64>> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(100.0, 0.0),
            Point2::new(100.0, 100.0),
            Point2::new(0.0, 100.0),
        ]
    }

    #[test]
    fn dlt_recovers_translation() {
        let src = square();
        let dst: Vec<_> = src.iter().map(|p| Point2::new(p.x + 30.0, p.y - 5.0)).collect();
        let h = dlt(&src, &dst).unwrap();
        assert_relative_eq!(h.matrix()[(0, 2)], 30.0, epsilon = 1e-6);
        assert_relative_eq!(h.matrix()[(1, 2)], -5.0, epsilon = 1e-6);
        assert_relative_eq!(h.matrix()[(0, 0)], 1.0, epsilon = 1e-9);
    }

    #[test]
    fn dlt_recovers_scale() {
        let src = square();
        let dst: Vec<_> = src.iter().map(|p| Point2::new(2.0 * p.x, 2.0 * p.y)).collect();
        let h = dlt(&src, &dst).unwrap();
        assert_relative_eq!(h.matrix()[(0, 0)], 2.0, epsilon = 1e-6);
        assert_relative_eq!(h.matrix()[(1, 1)], 2.0, epsilon = 1e-6);
    }

    #[test]
    fn dlt_rejects_coincident_points() {
        let src = vec![Point2::new(5.0, 5.0); 4];
        assert!(dlt(&src, &square()).is_none());
    }

    #[test]
    fn singular_matrix_is_not_usable() {
        assert!(Homography::from_matrix(Matrix3::zeros()).is_none());
        let mut m = Matrix3::identity();
        m[(0, 0)] = f64::NAN;
        assert!(Homography::from_matrix(m).is_none());
    }

    #[test]
    fn inverse_undoes_translation() {
        let h = Homography::translation(12.0, -3.0);
        let inv = h.inverse().unwrap();
        let (x, y) = h.transform(4.0, 7.0).unwrap();
        let (bx, by) = inv.transform(x, y).unwrap();
        assert_relative_eq!(bx, 4.0, epsilon = 1e-12);
        assert_relative_eq!(by, 7.0, epsilon = 1e-12);
    }
}
