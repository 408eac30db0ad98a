//! Coordinate grids and sample-spacing bookkeeping.
//!
//! Pupil-plane quantities are evaluated on a normalized polar grid where the
//! radius is 0 at the array center and 1 on the circle inscribed in the
//! square array. Image-plane quantities use a physical Cartesian axis derived
//! from a sample spacing and count. The two planes are connected by the
//! Fourier-optics scaling relation implemented in
//! [`pupil_sample_to_psf_sample`].

use ndarray::{Array1, Array2};

/// Builds the normalized polar coordinate grid for a square N×N array.
///
/// Cartesian x and y each span `[-1, 1]` inclusive, so the unit circle is
/// inscribed in the array and corner samples sit near ρ = √2. Azimuth uses
/// the two-argument arctangent, range (−π, π].
///
/// # Arguments
/// * `samples` - number of samples along each axis
///
/// # Returns
/// `(rho, phi)` arrays of shape `(samples, samples)`. A degenerate 1×1 grid
/// yields the single sample at ρ = 0, φ = 0.
pub fn polar_grid(samples: usize) -> (Array2<f64>, Array2<f64>) {
    let axis = normalized_axis(samples);
    let mut rho = Array2::zeros((samples, samples));
    let mut phi = Array2::zeros((samples, samples));

    for (i, &y) in axis.iter().enumerate() {
        for (j, &x) in axis.iter().enumerate() {
            rho[[i, j]] = x.hypot(y);
            phi[[i, j]] = y.atan2(x);
        }
    }

    (rho, phi)
}

/// Normalized Cartesian axis spanning `[-1, 1]` with `samples` points.
///
/// The `samples == 1` case returns a single point at 0 rather than dividing
/// by zero in the spacing computation.
pub fn normalized_axis(samples: usize) -> Array1<f64> {
    if samples < 2 {
        return Array1::zeros(samples);
    }
    let step = 2.0 / (samples - 1) as f64;
    Array1::from_iter((0..samples).map(|i| -1.0 + step * i as f64))
}

/// Physical sample axis for an image-plane array.
///
/// Matches the convention used for PSF ordinates: for spacing Δ and N
/// samples the axis runs from `-Δ·N/2` to `Δ·N/2 - Δ`, putting the center
/// sample of an even-length axis exactly at zero.
pub fn sample_axis(samples: usize, spacing: f64) -> Array1<f64> {
    let ext = spacing * samples as f64 / 2.0;
    Array1::from_iter((0..samples).map(|i| -ext + spacing * i as f64))
}

/// Converts pupil-plane sample spacing to image-plane (PSF) sample spacing.
///
/// Implements the Fraunhofer scaling relation `Δx_image = λ·f / (N·Δx_pupil)`
/// with the focal length converted from mm to µm so the result is in µm.
///
/// # Arguments
/// * `pupil_sample` - pupil-plane sample spacing, µm
/// * `num_samples` - number of samples across the (padded) pupil array
/// * `wavelength` - wavelength of light, µm
/// * `efl` - effective focal length, mm
///
/// # Returns
/// Image-plane sample spacing, µm.
pub fn pupil_sample_to_psf_sample(
    pupil_sample: f64,
    num_samples: usize,
    wavelength: f64,
    efl: f64,
) -> f64 {
    (wavelength * efl * 1e3) / (pupil_sample * num_samples as f64)
}

/// Inverse of [`pupil_sample_to_psf_sample`].
///
/// Recovers the pupil-plane spacing (µm) that produces a given image-plane
/// spacing, used when back-solving sampling requirements.
pub fn psf_sample_to_pupil_sample(
    psf_sample: f64,
    num_samples: usize,
    wavelength: f64,
    efl: f64,
) -> f64 {
    (wavelength * efl * 1e3) / (psf_sample * num_samples as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_polar_grid_corners_and_center() {
        let (rho, phi) = polar_grid(65);
        // odd sample count puts a sample exactly at the origin
        assert_relative_eq!(rho[[32, 32]], 0.0);
        // edge midpoints are on the unit circle
        assert_relative_eq!(rho[[32, 64]], 1.0);
        assert_relative_eq!(rho[[0, 32]], 1.0);
        // corners reach sqrt(2)
        assert_relative_eq!(rho[[0, 0]], 2f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_polar_grid_azimuth_convention() {
        let (_, phi) = polar_grid(65);
        // +x axis
        assert_relative_eq!(phi[[32, 64]], 0.0);
        // +y axis (row index grows with y)
        assert_relative_eq!(phi[[64, 32]], FRAC_PI_2);
        // -x axis lands on +pi, not -pi
        assert_relative_eq!(phi[[32, 0]], PI);
    }

    #[test]
    fn test_degenerate_single_sample_grid() {
        let (rho, phi) = polar_grid(1);
        assert_eq!(rho.dim(), (1, 1));
        assert_relative_eq!(rho[[0, 0]], 0.0);
        assert_relative_eq!(phi[[0, 0]], 0.0);
    }

    #[test]
    fn test_sample_axis_even_count_centered() {
        let unit = sample_axis(4, 0.5);
        assert_relative_eq!(unit[0], -1.0);
        assert_relative_eq!(unit[2], 0.0);
        assert_relative_eq!(unit[3], 0.5);
    }

    #[test]
    fn test_spacing_relation_round_trip() {
        let psf = pupil_sample_to_psf_sample(100.0, 256, 0.5, 50.0);
        let pupil = psf_sample_to_pupil_sample(psf, 256, 0.5, 50.0);
        assert_relative_eq!(pupil, 100.0, epsilon = 1e-12);
    }
}
