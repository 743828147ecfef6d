use ndarray::{s, Array3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use panorama_core::frame::ColorFrame;

/// Height of every synthetic view.
pub const VIEW_HEIGHT: usize = 160;
/// Width of every synthetic view.
pub const VIEW_WIDTH: usize = 200;
/// Horizontal step between consecutive views; overlap is `VIEW_WIDTH - VIEW_STEP`.
pub const VIEW_STEP: usize = 140;

/// Deterministic textured RGB scene with every sample in [0.1, 0.9].
///
/// A smooth sinusoidal background covered by many small rectangles of random
/// color, so corners are dense and their neighbourhoods distinct.
pub fn textured_scene(height: usize, width: usize, seed: u64) -> ColorFrame {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = Array3::<f32>::from_shape_fn((height, width, 3), |(r, c, k)| {
        let (y, x) = (r as f32, c as f32);
        0.5 + 0.12 * (x * 0.07 + k as f32).sin() * (y * 0.05 + 0.3 * k as f32).cos()
    });

    let rect_count = height * width / 190;
    for _ in 0..rect_count {
        let rh = rng.random_range(4..12usize);
        let rw = rng.random_range(4..12usize);
        let r0 = rng.random_range(0..height.saturating_sub(rh).max(1));
        let c0 = rng.random_range(0..width.saturating_sub(rw).max(1));
        let color: [f32; 3] = [
            rng.random_range(0.1..0.9),
            rng.random_range(0.1..0.9),
            rng.random_range(0.1..0.9),
        ];
        for (k, &v) in color.iter().enumerate() {
            data.slice_mut(s![r0..r0 + rh, c0..c0 + rw, k]).fill(v);
        }
    }

    data.mapv_inplace(|v| v.clamp(0.1, 0.9));
    ColorFrame::new(data)
}

/// Columns `[col, col + width)` of `scene`.
pub fn view(scene: &ColorFrame, col: usize, width: usize) -> ColorFrame {
    ColorFrame::new(scene.data.slice(s![.., col..col + width, ..]).to_owned())
}

/// `count` overlapping left-to-right views of one scene.
pub fn overlapping_views(count: usize, seed: u64) -> (ColorFrame, Vec<ColorFrame>) {
    let scene_width = VIEW_STEP * (count - 1) + VIEW_WIDTH;
    let scene = textured_scene(VIEW_HEIGHT, scene_width, seed);
    let views = (0..count)
        .map(|i| view(&scene, i * VIEW_STEP, VIEW_WIDTH))
        .collect();
    (scene, views)
}

/// A flat gray frame: no corners anywhere.
pub fn blank_frame(height: usize, width: usize) -> ColorFrame {
    ColorFrame::new(Array3::from_elem((height, width, 3), 0.5))
}

/// Mean absolute difference between column `a_col` of `a` and column
/// `b_col` of `b`, over rows `rows`.
pub fn column_difference(
    a: &ColorFrame,
    a_col: usize,
    b: &ColorFrame,
    b_col: usize,
    rows: std::ops::Range<usize>,
) -> f32 {
    let n = (rows.len() * 3) as f32;
    let mut total = 0.0;
    for r in rows {
        for k in 0..3 {
            total += (a.data[[r, a_col, k]] - b.data[[r, b_col, k]]).abs();
        }
    }
    total / n
}
