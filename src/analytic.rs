//! PSF-like values with closed-form Fourier transforms.
//!
//! Some optical responses have transforms known in closed form: the
//! diffraction-limited circular aperture (whose OTF is the "chat" function)
//! and the square detector pixel (separable sinc). Rather than dispatching
//! on a type hierarchy, anything that can supply such a transform
//! implements [`AnalyticFt`]; the convolution engine
//! ([`crate::psf::Psf::convolve_analytic`]) evaluates it directly on the
//! sampled PSF's frequency grid, which is alias-free by construction and
//! cheaper than transforming sampled data.

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use scilib::math::bessel;
use std::f64::consts::{FRAC_2_PI, PI};

use crate::coordinates::sample_axis;
use crate::psf::Psf;

/// Capability of producing an exact Fourier transform on demand.
pub trait AnalyticFt {
    /// Evaluates the closed-form transform on shifted (ascending) frequency
    /// axes in cycles/µm, indexed `[fy, fx]`. The zero-frequency value is 1.
    fn analytic_ft(&self, fx: &Array1<f64>, fy: &Array1<f64>) -> Array2<Complex64>;
}

/// Diffraction-limited PSF of a circular aperture.
#[derive(Debug, Clone, Copy)]
pub struct AiryPsf {
    /// Working f-number of the system.
    pub fno: f64,
    /// Wavelength of light, µm.
    pub wavelength: f64,
}

impl AiryPsf {
    pub fn new(fno: f64, wavelength: f64) -> Self {
        Self { fno, wavelength }
    }

    /// Incoherent cutoff frequency `1 / (λ·F#)`, cycles/µm.
    pub fn cutoff_frequency(&self) -> f64 {
        1.0 / (self.wavelength * self.fno)
    }

    /// Radius of the first dark ring, `1.22·λ·F#`, µm.
    pub fn first_zero_radius(&self) -> f64 {
        1.22 * self.wavelength * self.fno
    }

    /// Peak-normalized intensity `[2·J₁(z)/z]²` at radius `r` µm, with
    /// `z = π·r / (λ·F#)`.
    pub fn intensity(&self, radius: f64) -> f64 {
        let z = PI * radius / (self.wavelength * self.fno);
        if z.abs() < 1e-9 {
            return 1.0; // limit as z approaches 0
        }
        let j1 = bessel::j_n(1, z);
        let term = 2.0 * j1 / z;
        term * term
    }

    /// Samples the pattern onto a square grid as a regular [`Psf`].
    pub fn to_psf(&self, samples: usize, sample_spacing: f64) -> Psf {
        let axis = sample_axis(samples, sample_spacing);
        let data = Array2::from_shape_fn((samples, samples), |(i, j)| {
            self.intensity(axis[j].hypot(axis[i]))
        });
        Psf::new(data, sample_spacing)
    }
}

impl AnalyticFt for AiryPsf {
    /// The diffraction-limited OTF of a circular aperture: the chat
    /// function `(2/π)·(acos(s) − s·√(1−s²))` of the normalized frequency
    /// `s = ν / ν_cutoff`, zero beyond cutoff.
    fn analytic_ft(&self, fx: &Array1<f64>, fy: &Array1<f64>) -> Array2<Complex64> {
        let cutoff = self.cutoff_frequency();
        Array2::from_shape_fn((fy.len(), fx.len()), |(i, j)| {
            let s = fx[j].hypot(fy[i]) / cutoff;
            if s >= 1.0 {
                Complex64::new(0.0, 0.0)
            } else {
                let value = FRAC_2_PI * (s.acos() - s * (1.0 - s * s).sqrt());
                Complex64::new(value, 0.0)
            }
        })
    }
}

/// Square detector pixel acting as an averaging aperture.
#[derive(Debug, Clone, Copy)]
pub struct PixelAperture {
    /// Pixel pitch, µm.
    pub pitch: f64,
}

impl PixelAperture {
    pub fn new(pitch: f64) -> Self {
        Self { pitch }
    }
}

impl AnalyticFt for PixelAperture {
    /// Separable sinc transform of the square pixel,
    /// `sinc(π·p·fx)·sinc(π·p·fy)`.
    fn analytic_ft(&self, fx: &Array1<f64>, fy: &Array1<f64>) -> Array2<Complex64> {
        Array2::from_shape_fn((fy.len(), fx.len()), |(i, j)| {
            let value = sinc(PI * self.pitch * fx[j]) * sinc(PI * self.pitch * fy[i]);
            Complex64::new(value, 0.0)
        })
    }
}

fn sinc(x: f64) -> f64 {
    if x.abs() < 1e-9 {
        1.0
    } else {
        x.sin() / x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_airy_center_and_first_zero() {
        let airy = AiryPsf::new(10.0, 0.5);
        assert_relative_eq!(airy.intensity(0.0), 1.0);
        // intensity at the first dark ring is very nearly zero
        let first_zero = airy.first_zero_radius();
        assert_abs_diff_eq!(airy.intensity(first_zero), 0.0, epsilon = 1e-4);
        // and nonzero just inside it
        assert!(airy.intensity(first_zero * 0.8) > 1e-3);
    }

    #[test]
    fn test_airy_otf_endpoints() {
        let airy = AiryPsf::new(8.0, 0.55);
        let zero = Array1::from_vec(vec![0.0]);
        let dc = airy.analytic_ft(&zero, &zero);
        assert_relative_eq!(dc[[0, 0]].re, 1.0, epsilon = 1e-12);

        let cutoff = Array1::from_vec(vec![airy.cutoff_frequency()]);
        let edge = airy.analytic_ft(&cutoff, &zero);
        assert_relative_eq!(edge[[0, 0]].re, 0.0);
    }

    #[test]
    fn test_airy_otf_monotone_decreasing() {
        let airy = AiryPsf::new(8.0, 0.55);
        let fy = Array1::from_vec(vec![0.0]);
        let fx = Array1::from_iter((0..50).map(|i| i as f64 * airy.cutoff_frequency() / 50.0));
        let otf = airy.analytic_ft(&fx, &fy);
        for j in 1..50 {
            assert!(otf[[0, j]].re < otf[[0, j - 1]].re);
        }
    }

    #[test]
    fn test_sampled_airy_matches_analytic_profile() {
        let airy = AiryPsf::new(10.0, 0.5);
        // even sample count puts the center sample exactly at r = 0
        let psf = airy.to_psf(64, 0.5);
        let center = psf.center();
        assert_relative_eq!(psf.data()[[center, center]], 1.0);
        // off-axis sample agrees with the closed form
        let r = 3.0 * 0.5;
        assert_relative_eq!(
            psf.data()[[center, center + 3]],
            airy.intensity(r),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_pixel_aperture_transform() {
        let pixel = PixelAperture::new(5.0);
        let zero = Array1::from_vec(vec![0.0]);
        let dc = pixel.analytic_ft(&zero, &zero);
        assert_relative_eq!(dc[[0, 0]].re, 1.0);

        // first null of the sinc at f = 1/pitch
        let null = Array1::from_vec(vec![1.0 / 5.0]);
        let edge = pixel.analytic_ft(&null, &zero);
        assert_abs_diff_eq!(edge[[0, 0]].re, 0.0, epsilon = 1e-12);
    }
}
