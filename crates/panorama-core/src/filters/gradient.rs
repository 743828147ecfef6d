use ndarray::Array2;

/// Horizontal and vertical Sobel derivatives with replicated borders.
///
/// Returns `(gx, gy)`, each the same shape as `data`.
pub fn sobel_gradients(data: &Array2<f32>) -> (Array2<f32>, Array2<f32>) {
    let (h, w) = data.dim();
    let mut gx = Array2::<f32>::zeros((h, w));
    let mut gy = Array2::<f32>::zeros((h, w));
    if h == 0 || w == 0 {
        return (gx, gy);
    }

    let at = |r: isize, c: isize| -> f32 {
        let r = r.clamp(0, h as isize - 1) as usize;
        let c = c.clamp(0, w as isize - 1) as usize;
        data[[r, c]]
    };

    for row in 0..h as isize {
        for col in 0..w as isize {
            let tl = at(row - 1, col - 1);
            let tc = at(row - 1, col);
            let tr = at(row - 1, col + 1);
            let ml = at(row, col - 1);
            let mr = at(row, col + 1);
            let bl = at(row + 1, col - 1);
            let bc = at(row + 1, col);
            let br = at(row + 1, col + 1);

            gx[[row as usize, col as usize]] = (tr + 2.0 * mr + br) - (tl + 2.0 * ml + bl);
            gy[[row as usize, col as usize]] = (bl + 2.0 * bc + br) - (tl + 2.0 * tc + tr);
        }
    }

    (gx, gy)
}
