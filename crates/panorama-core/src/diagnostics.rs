//! Match visualization for one stitched pair.

use ndarray::s;

use crate::consts::MAX_DIAGNOSTIC_MATCHES;
use crate::features::{Keypoint, Match};
use crate::frame::ColorFrame;

/// Line colors, cycled per match.
const PALETTE: [[f32; 3]; 6] = [
    [1.0, 0.2, 0.2],
    [0.2, 1.0, 0.2],
    [0.3, 0.5, 1.0],
    [1.0, 1.0, 0.2],
    [1.0, 0.2, 1.0],
    [0.2, 1.0, 1.0],
];

/// Half-size of the square marker drawn on each matched keypoint.
const MARKER_RADIUS: i64 = 2;

/// Place `train` (left) and `query` (right) side by side and connect the
/// best `MAX_DIAGNOSTIC_MATCHES` correspondences.
///
/// `matches` must already be sorted best first, as returned by the matcher.
pub fn render_matches(
    train: &ColorFrame,
    train_keypoints: &[Keypoint],
    query: &ColorFrame,
    query_keypoints: &[Keypoint],
    matches: &[Match],
) -> ColorFrame {
    let height = train.height().max(query.height());
    let offset = train.width();
    let mut out = ColorFrame::zeros(height, offset + query.width());

    out.data
        .slice_mut(s![..train.height(), ..offset, ..])
        .assign(&train.data);
    out.data
        .slice_mut(s![..query.height(), offset.., ..])
        .assign(&query.data);

    for (i, m) in matches.iter().take(MAX_DIAGNOSTIC_MATCHES).enumerate() {
        let (Some(t), Some(q)) = (
            train_keypoints.get(m.train_idx),
            query_keypoints.get(m.query_idx),
        ) else {
            continue;
        };
        let color = PALETTE[i % PALETTE.len()];
        let p0 = (t.x.round() as i64, t.y.round() as i64);
        let p1 = (q.x.round() as i64 + offset as i64, q.y.round() as i64);
        draw_line(&mut out, p0, p1, color);
        draw_marker(&mut out, p0, color);
        draw_marker(&mut out, p1, color);
    }

    out
}

fn set_pixel(img: &mut ColorFrame, x: i64, y: i64, color: [f32; 3]) {
    if x < 0 || y < 0 || x >= img.width() as i64 || y >= img.height() as i64 {
        return;
    }
    for (k, &c) in color.iter().enumerate() {
        img.data[[y as usize, x as usize, k]] = c;
    }
}

/// Bresenham line, clipped to the image.
fn draw_line(img: &mut ColorFrame, p0: (i64, i64), p1: (i64, i64), color: [f32; 3]) {
    let (mut x0, mut y0) = p0;
    let (x1, y1) = p1;

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    loop {
        set_pixel(img, x0, y0, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }
}

fn draw_marker(img: &mut ColorFrame, center: (i64, i64), color: [f32; 3]) {
    for dy in -MARKER_RADIUS..=MARKER_RADIUS {
        for dx in -MARKER_RADIUS..=MARKER_RADIUS {
            if dx.abs() == MARKER_RADIUS || dy.abs() == MARKER_RADIUS {
                set_pixel(img, center.0 + dx, center.1 + dy, color);
            }
        }
    }
}
