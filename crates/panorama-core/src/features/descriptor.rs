use std::f32::consts::TAU;

use ndarray::Array2;

use crate::consts::{DESCRIPTOR_CLIP, DESCRIPTOR_LENGTH, EPSILON, ORIENTATION_BINS};

use super::Descriptor;

/// Spatial cells per patch side.
const CELLS_PER_SIDE: usize = 4;

/// Orientation bins per spatial cell.
const BINS_PER_CELL: usize = 8;

/// Angle of a gradient vector mapped into [0, 2*pi).
fn gradient_angle(gx: f32, gy: f32) -> f32 {
    let a = gy.atan2(gx);
    if a < 0.0 {
        a + TAU
    } else {
        a
    }
}

/// Dominant gradient direction around `(row, col)`.
///
/// Builds a magnitude-weighted histogram over the square patch of half-size
/// `radius` and returns the centre angle of the strongest bin.
pub fn dominant_orientation(
    gx: &Array2<f32>,
    gy: &Array2<f32>,
    row: usize,
    col: usize,
    radius: usize,
) -> f32 {
    let (h, w) = gx.dim();
    let mut hist = [0.0f32; ORIENTATION_BINS];
    let sigma = radius as f32 * 0.75;
    let s2 = 2.0 * sigma * sigma;

    let r0 = row.saturating_sub(radius);
    let c0 = col.saturating_sub(radius);
    let r1 = (row + radius).min(h - 1);
    let c1 = (col + radius).min(w - 1);
    for r in r0..=r1 {
        for c in c0..=c1 {
            let (dx, dy) = (gx[[r, c]], gy[[r, c]]);
            let mag = (dx * dx + dy * dy).sqrt();
            if mag <= EPSILON {
                continue;
            }
            let dr = r as f32 - row as f32;
            let dc = c as f32 - col as f32;
            let weight = (-(dr * dr + dc * dc) / s2).exp();
            let bin = ((gradient_angle(dx, dy) / TAU) * ORIENTATION_BINS as f32) as usize;
            hist[bin.min(ORIENTATION_BINS - 1)] += mag * weight;
        }
    }

    let best = hist
        .iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |acc, (i, &v)| if v > acc.1 { (i, v) } else { acc });
    (best.0 as f32 + 0.5) * TAU / ORIENTATION_BINS as f32
}

/// Gradient-histogram descriptor of the patch centred on `(row, col)`.
///
/// The patch spans `[-radius, radius)` in both directions and must lie inside
/// the image. It is split into 4x4 cells, each contributing an 8-bin
/// orientation histogram. The vector is L2-normalized, clipped and normalized
/// again so single strong edges do not dominate. Returns `None` for patches
/// with no gradient energy.
pub fn describe_patch(
    gx: &Array2<f32>,
    gy: &Array2<f32>,
    row: usize,
    col: usize,
    radius: usize,
) -> Option<Descriptor> {
    let (h, w) = gx.dim();
    if row < radius || col < radius || row + radius > h || col + radius > w {
        return None;
    }

    let side = 2 * radius;
    let sigma = radius as f32;
    let s2 = 2.0 * sigma * sigma;
    let mut desc = [0.0f32; DESCRIPTOR_LENGTH];

    for pr in 0..side {
        for pc in 0..side {
            let r = row + pr - radius;
            let c = col + pc - radius;
            let (dx, dy) = (gx[[r, c]], gy[[r, c]]);
            let mag = (dx * dx + dy * dy).sqrt();
            if mag <= EPSILON {
                continue;
            }

            let dr = pr as f32 + 0.5 - radius as f32;
            let dc = pc as f32 + 0.5 - radius as f32;
            let weight = (-(dr * dr + dc * dc) / s2).exp();

            let cell_r = pr * CELLS_PER_SIDE / side;
            let cell_c = pc * CELLS_PER_SIDE / side;
            let bin = ((gradient_angle(dx, dy) / TAU) * BINS_PER_CELL as f32) as usize;
            let idx = (cell_r * CELLS_PER_SIDE + cell_c) * BINS_PER_CELL + bin.min(BINS_PER_CELL - 1);
            desc[idx] += mag * weight;
        }
    }

    if !normalize(&mut desc) {
        return None;
    }
    for v in desc.iter_mut() {
        *v = v.min(DESCRIPTOR_CLIP);
    }
    normalize(&mut desc).then_some(desc)
}

/// Scale to unit L2 norm. Returns false when the vector is (nearly) zero.
fn normalize(v: &mut Descriptor) -> bool {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm <= EPSILON {
        return false;
    }
    for x in v.iter_mut() {
        *x /= norm;
    }
    true
}
