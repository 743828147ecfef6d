use ndarray::s;

use crate::frame::ColorFrame;

/// Tight bounding box of content pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContentBounds {
    pub row: usize,
    pub col: usize,
    pub height: usize,
    pub width: usize,
}

/// Bounding box of pixels with any non-zero channel, or `None` for an
/// all-black frame.
pub fn content_bounds(frame: &ColorFrame) -> Option<ContentBounds> {
    let (h, w, _) = frame.data.dim();
    let mut min_row = usize::MAX;
    let mut min_col = usize::MAX;
    let mut max_row = 0usize;
    let mut max_col = 0usize;

    for row in 0..h {
        for col in 0..w {
            let px = frame.data.slice(s![row, col, ..]);
            if px.iter().any(|&v| v != 0.0) {
                min_row = min_row.min(row);
                min_col = min_col.min(col);
                max_row = max_row.max(row);
                max_col = max_col.max(col);
            }
        }
    }

    (min_row != usize::MAX).then(|| ContentBounds {
        row: min_row,
        col: min_col,
        height: max_row - min_row + 1,
        width: max_col - min_col + 1,
    })
}

/// Copy out the region described by `bounds`.
pub fn crop(frame: &ColorFrame, bounds: &ContentBounds) -> ColorFrame {
    let view = frame.data.slice(s![
        bounds.row..bounds.row + bounds.height,
        bounds.col..bounds.col + bounds.width,
        ..
    ]);
    ColorFrame::new(view.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_of_single_pixel() {
        let mut frame = ColorFrame::zeros(5, 7);
        frame.data[[2, 3, 2]] = 0.5;
        let b = content_bounds(&frame).unwrap();
        assert_eq!(
            b,
            ContentBounds {
                row: 2,
                col: 3,
                height: 1,
                width: 1
            }
        );
        let cropped = crop(&frame, &b);
        assert_eq!(cropped.data.dim(), (1, 1, 3));
        assert_eq!(cropped.data[[0, 0, 2]], 0.5);
    }

    #[test]
    fn black_frame_has_no_bounds() {
        assert!(content_bounds(&ColorFrame::zeros(4, 4)).is_none());
    }
}
