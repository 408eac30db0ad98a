//! Centered 2D Fourier transforms and frequency-grid utilities.
//!
//! Every transform in the crate goes through [`fft2_centered`] /
//! [`ifft2_centered`] so that a single shift convention holds at all call
//! sites: the center sample of an array maps to zero frequency and back.
//! Also provides the symmetric zero-padding used by diffraction propagation,
//! the fftshifted frequency axis of the discrete transform, and bilinear
//! complex resampling between rectilinear frequency grids (used to convolve
//! PSFs with mismatched sampling without aliasing).

use ndarray::{Array1, Array2};
use rustfft::{num_complex::Complex64, FftPlanner};

/// Unnormalized forward 2D FFT (rows, then columns).
pub fn fft2(data: &Array2<Complex64>) -> Array2<Complex64> {
    fft2_inner(data, false)
}

/// Inverse 2D FFT, normalized by `1 / (rows·cols)`.
pub fn ifft2(data: &Array2<Complex64>) -> Array2<Complex64> {
    let (rows, cols) = data.dim();
    let mut out = fft2_inner(data, true);
    let scale = 1.0 / (rows * cols) as f64;
    out.mapv_inplace(|v| v * scale);
    out
}

fn fft2_inner(data: &Array2<Complex64>, inverse: bool) -> Array2<Complex64> {
    let (rows, cols) = data.dim();
    let mut planner = FftPlanner::new();
    let row_fft = if inverse {
        planner.plan_fft_inverse(cols)
    } else {
        planner.plan_fft_forward(cols)
    };
    let col_fft = if inverse {
        planner.plan_fft_inverse(rows)
    } else {
        planner.plan_fft_forward(rows)
    };

    let mut out = data.clone();

    // transform rows in place; rows of a standard-layout array are contiguous
    for mut row in out.rows_mut() {
        let slice = row
            .as_slice_mut()
            .expect("row of standard-layout array is contiguous");
        row_fft.process(slice);
    }

    // columns are strided, gather through a scratch buffer
    let mut buffer = vec![Complex64::new(0.0, 0.0); rows];
    for j in 0..cols {
        for i in 0..rows {
            buffer[i] = out[[i, j]];
        }
        col_fft.process(&mut buffer);
        for i in 0..rows {
            out[[i, j]] = buffer[i];
        }
    }

    out
}

/// Circularly shifts the zero-frequency component to the array center.
pub fn fftshift(data: &Array2<Complex64>) -> Array2<Complex64> {
    let (rows, cols) = data.dim();
    circshift(data, rows / 2, cols / 2)
}

/// Inverse of [`fftshift`]; identical to it for even-length axes.
pub fn ifftshift(data: &Array2<Complex64>) -> Array2<Complex64> {
    let (rows, cols) = data.dim();
    circshift(data, rows - rows / 2, cols - cols / 2)
}

fn circshift(data: &Array2<Complex64>, dr: usize, dc: usize) -> Array2<Complex64> {
    let (rows, cols) = data.dim();
    let mut out = Array2::zeros((rows, cols));
    for i in 0..rows {
        for j in 0..cols {
            out[[(i + dr) % rows, (j + dc) % cols]] = data[[i, j]];
        }
    }
    out
}

/// Forward 2D FFT with center-of-array ↔ zero-frequency conventions.
///
/// Computes `fftshift(fft2(ifftshift(data)))`: the input is interpreted as
/// centered spatial data and the output is a centered spectrum. Paired with
/// [`ifft2_centered`], which undoes it exactly.
pub fn fft2_centered(data: &Array2<Complex64>) -> Array2<Complex64> {
    fftshift(&fft2(&ifftshift(data)))
}

/// Inverse 2D FFT with the same centering conventions as [`fft2_centered`].
pub fn ifft2_centered(data: &Array2<Complex64>) -> Array2<Complex64> {
    fftshift(&ifft2(&ifftshift(data)))
}

/// Symmetrically zero-pads a square array by an integer multiple of its size.
///
/// The output is `N·padding·2 + N` samples on a side: one `padding`-width
/// margin of zeros on each side of the original data. `padding = 0` returns
/// a copy. Propagation relies on this exact size formula for its output
/// sample spacing to be correct.
pub fn pad2d(data: &Array2<Complex64>, padding: usize) -> Array2<Complex64> {
    let (rows, cols) = data.dim();
    let out_rows = rows * padding * 2 + rows;
    let out_cols = cols * padding * 2 + cols;
    let mut out = Array2::zeros((out_rows, out_cols));
    out.slice_mut(ndarray::s![
        rows * padding..rows * padding + rows,
        cols * padding..cols * padding + cols
    ])
    .assign(data);
    out
}

/// Frequency axis of a forward transform, fftshifted to ascending order.
///
/// For N samples with spacing Δ the bins run from roughly `-1/(2Δ)` to
/// `+1/(2Δ)` in steps of `1/(N·Δ)`, with zero frequency at index `N/2`.
/// Units are cycles per unit of `sample_spacing`.
pub fn forward_ft_unit(sample_spacing: f64, samples: usize) -> Array1<f64> {
    let n = samples as isize;
    let step = 1.0 / (sample_spacing * samples as f64);
    Array1::from_iter((0..n).map(|i| (i - n / 2) as f64 * step))
}

/// Resamples complex 2D data from one rectilinear grid onto another.
///
/// Bilinear interpolation of the real and imaginary parts independently.
/// Axes must be uniformly spaced and ascending (the fftshifted frequency
/// grids used by convolution satisfy this). Query points outside the source
/// domain yield exactly zero: content beyond the query grid's reach is
/// truncated, never folded back in.
///
/// # Arguments
/// * `data` - source values, indexed `[y, x]`
/// * `xs`, `ys` - source axes (cols, rows)
/// * `xq`, `yq` - query axes (cols, rows of the output)
pub fn resample_2d_complex(
    data: &Array2<Complex64>,
    xs: &Array1<f64>,
    ys: &Array1<f64>,
    xq: &Array1<f64>,
    yq: &Array1<f64>,
) -> Array2<Complex64> {
    let mut out = Array2::zeros((yq.len(), xq.len()));

    for (i, &y) in yq.iter().enumerate() {
        let row_pos = match axis_position(ys, y) {
            Some(pos) => pos,
            None => continue,
        };
        for (j, &x) in xq.iter().enumerate() {
            let col_pos = match axis_position(xs, x) {
                Some(pos) => pos,
                None => continue,
            };
            let (i0, ty) = row_pos;
            let (j0, tx) = col_pos;

            let v00 = data[[i0, j0]];
            let v01 = data[[i0, j0 + 1]];
            let v10 = data[[i0 + 1, j0]];
            let v11 = data[[i0 + 1, j0 + 1]];

            let top = v00 * (1.0 - tx) + v01 * tx;
            let bottom = v10 * (1.0 - tx) + v11 * tx;
            out[[i, j]] = top * (1.0 - ty) + bottom * ty;
        }
    }

    out
}

/// Locates `value` on a uniform ascending axis.
///
/// Returns the lower bracketing index and the interpolation parameter in
/// `[0, 1]`, or `None` if the value falls outside the axis.
fn axis_position(axis: &Array1<f64>, value: f64) -> Option<(usize, f64)> {
    let n = axis.len();
    if n < 2 {
        return None;
    }
    let first = axis[0];
    let last = axis[n - 1];
    if value < first || value > last {
        return None;
    }
    let step = (last - first) / (n - 1) as f64;
    let pos = (value - first) / step;
    let idx = (pos.floor() as usize).min(n - 2);
    Some((idx, pos - idx as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn impulse(n: usize, at: (usize, usize)) -> Array2<Complex64> {
        let mut data = Array2::zeros((n, n));
        data[[at.0, at.1]] = Complex64::new(1.0, 0.0);
        data
    }

    #[test]
    fn test_centered_impulse_has_flat_spectrum() {
        // an impulse at the array center transforms to a constant
        let data = impulse(8, (4, 4));
        let ft = fft2_centered(&data);
        for v in ft.iter() {
            assert_relative_eq!(v.re, 1.0, epsilon = 1e-12);
            assert_relative_eq!(v.im, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_fft2_ifft2_round_trip() {
        let mut data = Array2::zeros((16, 16));
        for (idx, v) in data.iter_mut().enumerate() {
            *v = Complex64::new(idx as f64 * 0.37, (idx % 7) as f64);
        }
        let back = ifft2_centered(&fft2_centered(&data));
        for (a, b) in data.iter().zip(back.iter()) {
            assert_relative_eq!(a.re, b.re, epsilon = 1e-9);
            assert_relative_eq!(a.im, b.im, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_shift_pair_inverse() {
        let data = impulse(7, (2, 5));
        let back = ifftshift(&fftshift(&data));
        assert_relative_eq!(back[[2, 5]].re, 1.0);
        assert_relative_eq!(back.sum().re, 1.0);
    }

    #[test]
    fn test_pad2d_size_and_placement() {
        let data = Array2::from_elem((4, 4), Complex64::new(1.0, 0.0));
        let padded = pad2d(&data, 1);
        assert_eq!(padded.dim(), (12, 12));
        assert_relative_eq!(padded.sum().re, 16.0);
        assert_relative_eq!(padded[[4, 4]].re, 1.0);
        assert_relative_eq!(padded[[3, 3]].re, 0.0);
        assert_relative_eq!(padded[[8, 8]].re, 0.0);
    }

    #[test]
    fn test_forward_ft_unit_matches_nyquist() {
        let unit = forward_ft_unit(0.5, 8);
        // zero frequency at index n/2
        assert_relative_eq!(unit[4], 0.0);
        // lowest bin at -nyquist
        assert_relative_eq!(unit[0], -1.0);
        // bin spacing 1/(n*d)
        assert_relative_eq!(unit[5] - unit[4], 0.25);
    }

    #[test]
    fn test_resample_identity_on_same_grid() {
        let xs = forward_ft_unit(1.0, 6);
        let mut data = Array2::zeros((6, 6));
        for (idx, v) in data.iter_mut().enumerate() {
            *v = Complex64::new(idx as f64, -(idx as f64));
        }
        let out = resample_2d_complex(&data, &xs, &xs, &xs, &xs);
        for (a, b) in data.iter().zip(out.iter()) {
            assert_relative_eq!(a.re, b.re, epsilon = 1e-12);
            assert_relative_eq!(a.im, b.im, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_resample_out_of_band_is_zero() {
        let xs = Array1::from_vec(vec![-1.0, 0.0, 1.0]);
        let xq = Array1::from_vec(vec![-2.0, 0.0, 2.0]);
        let data = Array2::from_elem((3, 3), Complex64::new(1.0, 0.0));
        let out = resample_2d_complex(&data, &xs, &xs, &xq, &xq);
        assert_relative_eq!(out[[0, 0]].re, 0.0);
        assert_relative_eq!(out[[1, 1]].re, 1.0);
        assert_relative_eq!(out[[2, 2]].re, 0.0);
    }
}
