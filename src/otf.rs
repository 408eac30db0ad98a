//! Frequency-domain descriptors of a PSF: OTF and MTF.
//!
//! The optical transfer function is the Fourier transform of the PSF
//! intensity, normalized so the zero-frequency value is exactly 1; the
//! modulation transfer function is its modulus. Both are pure, read-only
//! derivations — they are always recomputed from their source PSF and never
//! mutate it. The transform uses the same centered convention as
//! propagation, so zero frequency sits at the array center.

use log::warn;
use ndarray::{Array1, Array2};
use num_complex::Complex64;

use crate::fourier::{fft2_centered, forward_ft_unit};
use crate::psf::Psf;

/// Complex optical transfer function of a PSF.
#[derive(Debug, Clone)]
pub struct Otf {
    data: Array2<Complex64>,
    unit: Array1<f64>,
}

impl Otf {
    /// Transforms a PSF's intensity into its complex transfer function.
    ///
    /// The frequency axis is in cycles/mm, derived from the PSF's µm sample
    /// spacing through the standard DFT frequency-bin relation.
    pub fn from_psf(psf: &Psf) -> Self {
        let complex = psf.data().mapv(|v| Complex64::new(v, 0.0));
        let mut data = fft2_centered(&complex);

        let center = psf.center();
        let dc = data[[center, center]];
        if dc.norm() > 0.0 {
            data.mapv_inplace(|v| v / dc);
        } else {
            // physically unreachable for a valid PSF
            warn!("zero-frequency component is zero, skipping OTF normalization");
        }

        // spacing in mm yields cycles/mm
        let unit = forward_ft_unit(psf.sample_spacing() / 1e3, psf.samples());
        Self { data, unit }
    }

    /// Complex transfer values, zero frequency at the array center.
    pub fn data(&self) -> &Array2<Complex64> {
        &self.data
    }

    /// Frequency axis, cycles/mm.
    pub fn unit(&self) -> &Array1<f64> {
        &self.unit
    }
}

/// Modulation transfer function: contrast transfer vs. spatial frequency.
#[derive(Debug, Clone)]
pub struct Mtf {
    data: Array2<f64>,
    unit: Array1<f64>,
}

impl Mtf {
    /// Derives the MTF of a PSF; the zero-frequency value is exactly 1.0.
    pub fn from_psf(psf: &Psf) -> Self {
        Self::from_otf(&Otf::from_psf(psf))
    }

    /// Modulus of an already-computed OTF.
    pub fn from_otf(otf: &Otf) -> Self {
        Self {
            data: otf.data.mapv(|v| v.norm()),
            unit: otf.unit.clone(),
        }
    }

    /// Modulation values, zero frequency at the array center.
    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    /// Frequency axis, cycles/mm.
    pub fn unit(&self) -> &Array1<f64> {
        &self.unit
    }

    /// Tangential slice: `(frequency, modulation)` along +x from center.
    pub fn slice_x(&self) -> (Array1<f64>, Array1<f64>) {
        let center = self.data.nrows() / 2;
        let row = self.data.row(center).to_owned();
        (self.unit.clone(), row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pupil::{Pupil, PupilConfig};
    use approx::assert_relative_eq;
    use ndarray::Array2;

    fn diffraction_limited_psf() -> Psf {
        let mut pupil = Pupil::new(PupilConfig {
            samples: 64,
            wavelength: 0.5,
            epd: 10.0,
            ..Default::default()
        })
        .unwrap();
        pupil.build();
        Psf::from_pupil(&pupil, 100.0, 1).unwrap()
    }

    #[test]
    fn test_mtf_zero_frequency_is_unity() {
        let psf = diffraction_limited_psf();
        let mtf = Mtf::from_psf(&psf);
        let center = psf.center();
        assert_relative_eq!(mtf.data()[[center, center]], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_mtf_bounded_by_unity() {
        let psf = diffraction_limited_psf();
        let mtf = Mtf::from_psf(&psf);
        for &v in mtf.data().iter() {
            assert!(v <= 1.0 + 1e-9);
        }
    }

    #[test]
    fn test_otf_of_symmetric_psf_is_real() {
        // an even, real PSF has a real transform; imaginary residue is
        // numerical noise
        let psf = diffraction_limited_psf();
        let otf = Otf::from_psf(&psf);
        for v in otf.data().iter() {
            assert!(v.im.abs() < 1e-9);
        }
    }

    #[test]
    fn test_frequency_axis_spans_nyquist() {
        let psf = diffraction_limited_psf();
        let mtf = Mtf::from_psf(&psf);
        let nyquist_cy_mm = psf.nyquist() * 1e3;
        assert_relative_eq!(mtf.unit()[0], -nyquist_cy_mm, epsilon = 1e-9);
    }

    #[test]
    fn test_derivation_does_not_mutate_psf() {
        let psf = diffraction_limited_psf();
        let before = psf.data().clone();
        let _ = Mtf::from_psf(&psf);
        let after: &Array2<f64> = psf.data();
        for (a, b) in before.iter().zip(after.iter()) {
            assert_relative_eq!(a, b);
        }
    }
}
