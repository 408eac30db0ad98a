//! Point spread functions: diffraction propagation and convolution.
//!
//! [`Psf::from_pupil`] performs scalar Fraunhofer propagation: the pupil
//! wavefunction is zero-padded, transformed with the centered FFT
//! convention, and squared into an intensity map whose image-plane sample
//! spacing follows `Δx = λ·f / (N'·Δx_pupil)`. That relation is what makes
//! the sampling bookkeeping of everything downstream — MTF axes,
//! convolution resampling — physically meaningful.
//!
//! Convolution of two PSFs happens in the frequency domain. When the inputs
//! share a grid the transforms are simply multiplied. When they do not, the
//! PSF with the larger sample spacing (lower Nyquist frequency) defines the
//! output grid, and the other transform is resampled onto it; frequency
//! content beyond the coarser Nyquist is truncated rather than folded back,
//! so the operation never aliases.

use log::{debug, warn};
use ndarray::{Array1, Array2};
use num_complex::Complex64;
use thiserror::Error;

use crate::analytic::AnalyticFt;
use crate::coordinates::{pupil_sample_to_psf_sample, sample_axis};
use crate::fourier::{fft2_centered, forward_ft_unit, ifft2_centered, pad2d, resample_2d_complex};
use crate::pupil::Pupil;

/// Errors raised during pupil-to-PSF propagation.
#[derive(Debug, Error)]
pub enum PropagationError {
    #[error("pupil has no wavefunction, call build() before propagating")]
    PupilNotBuilt,
}

/// Image-plane intensity response to a point source.
///
/// Invariants: the data is real and non-negative, square, and
/// peak-normalized to 1.0 after any construction or convolution. The
/// ordinate axis is derived from the sample spacing on demand.
#[derive(Debug, Clone)]
pub struct Psf {
    data: Array2<f64>,
    samples: usize,
    sample_spacing: f64,
}

impl Psf {
    /// Wraps intensity data with its sample spacing (µm), peak-normalizing.
    ///
    /// A physically valid PSF is never identically zero; if all-zero data
    /// does arrive, normalization is skipped (dividing by the zero peak
    /// would poison the array with NaN) and a warning is logged.
    ///
    /// # Panics
    /// If `data` is not square.
    pub fn new(data: Array2<f64>, sample_spacing: f64) -> Self {
        let (rows, cols) = data.dim();
        assert_eq!(rows, cols, "PSF data must be square, got {}x{}", rows, cols);
        Self {
            data: renormalize(data),
            samples: rows,
            sample_spacing,
        }
    }

    /// Propagates a built pupil to the image plane of a focal system.
    ///
    /// # Arguments
    /// * `pupil` - pupil with a built wavefunction
    /// * `efl` - effective focal length, mm
    /// * `padding` - pupil widths of zeros added to each side before the
    ///   transform; higher values oversample the PSF
    pub fn from_pupil(pupil: &Pupil, efl: f64, padding: usize) -> Result<Self, PropagationError> {
        let wavefunction = pupil
            .wavefunction()
            .ok_or(PropagationError::PupilNotBuilt)?;

        let psf_samples = pupil.samples() * padding * 2 + pupil.samples();
        let sample_spacing = pupil_sample_to_psf_sample(
            pupil.sample_spacing() * 1e3,
            psf_samples,
            pupil.wavelength(),
            efl,
        );

        let padded = pad2d(wavefunction, padding);
        let impulse_response = fft2_centered(&padded);
        let intensity = impulse_response.mapv(|v| v.norm_sqr());

        debug!(
            "propagated {} pupil samples to {} PSF samples, {:.4} um spacing",
            pupil.samples(),
            psf_samples,
            sample_spacing
        );
        Ok(Self::new(intensity, sample_spacing))
    }

    /// Intensity data, peak-normalized.
    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    /// Samples along each axis.
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Center-to-center sample spacing, µm.
    pub fn sample_spacing(&self) -> f64 {
        self.sample_spacing
    }

    /// Highest spatial frequency representable without aliasing,
    /// `1 / (2·spacing)`, cycles/µm.
    pub fn nyquist(&self) -> f64 {
        1.0 / (2.0 * self.sample_spacing)
    }

    /// Physical ordinate axis, µm, recomputed from spacing and count.
    pub fn unit(&self) -> Array1<f64> {
        sample_axis(self.samples, self.sample_spacing)
    }

    /// Index of the center sample.
    pub fn center(&self) -> usize {
        self.samples / 2
    }

    /// Slice through the center row: `(axis, intensity)`.
    pub fn slice_x(&self) -> (Array1<f64>, Array1<f64>) {
        (self.unit(), self.data.row(self.center()).to_owned())
    }

    /// Slice through the center column: `(axis, intensity)`.
    pub fn slice_y(&self) -> (Array1<f64>, Array1<f64>) {
        (self.unit(), self.data.column(self.center()).to_owned())
    }

    /// Fraction of total energy within `radius` (µm) of the center.
    pub fn encircled_energy(&self, radius: f64) -> f64 {
        let unit = self.unit();
        let mut inside = 0.0;
        let mut total = 0.0;
        for (i, &y) in unit.iter().enumerate() {
            for (j, &x) in unit.iter().enumerate() {
                let value = self.data[[i, j]];
                total += value;
                if x.hypot(y) <= radius {
                    inside += value;
                }
            }
        }
        if total > 0.0 {
            inside / total
        } else {
            0.0
        }
    }

    /// Convolves this PSF with another.
    ///
    /// Equal sampling (exactly equal count and spacing) multiplies the two
    /// transforms directly. Unequal sampling resamples the finer-sampled
    /// PSF's transform onto the coarser grid first; the output inherits the
    /// coarser PSF's count and spacing. Commutative within floating
    /// tolerance either way, since convolution is.
    pub fn convolve(&self, other: &Psf) -> Psf {
        if self.samples == other.samples && self.sample_spacing == other.sample_spacing {
            convolve_equal_sampling(self, other)
        } else if self.sample_spacing > other.sample_spacing
            || (self.sample_spacing == other.sample_spacing && self.samples < other.samples)
        {
            convolve_resampling(self, other)
        } else {
            convolve_resampling(other, self)
        }
    }

    /// Convolves with a value carrying a closed-form Fourier transform.
    ///
    /// The analytic transform is evaluated directly on this PSF's frequency
    /// grid, so it is alias-free by construction and skips one numerical
    /// transform. Sampling is unchanged.
    pub fn convolve_analytic<T: AnalyticFt>(&self, other: &T) -> Psf {
        let ft = fft2_centered(&to_complex(&self.data));
        let unit = forward_ft_unit(self.sample_spacing, self.samples);
        let analytic = other.analytic_ft(&unit, &unit);
        let product = &ft * &analytic;
        let data = ifft2_centered(&product).mapv(|v| v.norm());
        Psf::new(data, self.sample_spacing)
    }
}

fn to_complex(data: &Array2<f64>) -> Array2<Complex64> {
    data.mapv(|v| Complex64::new(v, 0.0))
}

fn renormalize(mut data: Array2<f64>) -> Array2<f64> {
    let peak = data.iter().fold(0.0f64, |acc, &v| acc.max(v));
    if peak > 0.0 {
        data.mapv_inplace(|v| v / peak);
    } else {
        warn!("all-zero PSF data, skipping peak normalization");
    }
    data
}

/// Direct FFT convolution for PSFs sharing one frequency grid.
fn convolve_equal_sampling(a: &Psf, b: &Psf) -> Psf {
    let ft_a = fft2_centered(&to_complex(&a.data));
    let ft_b = fft2_centered(&to_complex(&b.data));
    let product = &ft_a * &ft_b;
    // the modulus guards against negligible numerical imaginary residue
    let data = ifft2_centered(&product).mapv(|v| v.norm());
    Psf::new(data, a.sample_spacing)
}

/// Frequency-domain convolution across mismatched grids.
///
/// `reference` is the coarser-sampled PSF (larger spacing, lower Nyquist)
/// and defines the output grid; `source` has its transform resampled onto
/// the reference frequency axis, discarding content beyond the reference's
/// Nyquist band.
fn convolve_resampling(reference: &Psf, source: &Psf) -> Psf {
    let ft_reference = fft2_centered(&to_complex(&reference.data));
    let unit_reference = forward_ft_unit(reference.sample_spacing, reference.samples);

    let ft_source = fft2_centered(&to_complex(&source.data));
    let unit_source = forward_ft_unit(source.sample_spacing, source.samples);

    let ft_source_on_reference = resample_2d_complex(
        &ft_source,
        &unit_source,
        &unit_source,
        &unit_reference,
        &unit_reference,
    );

    let product = &ft_reference * &ft_source_on_reference;
    let data = ifft2_centered(&product).mapv(|v| v.norm());
    Psf::new(data, reference.sample_spacing)
}
