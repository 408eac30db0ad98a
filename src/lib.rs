//! Scalar diffraction modeling of image formation through optical systems.
//!
//! This crate models the classical Fourier-optics imaging chain: a pupil
//! wavefront is synthesized from Fringe Zernike aberration coefficients,
//! propagated to an image-plane point spread function (PSF) by Fraunhofer
//! diffraction, and characterized in the frequency domain by its modulation
//! transfer function (MTF). PSFs from multiple systems compose by FFT-based
//! convolution, including the case where the two PSFs are sampled on
//! different spatial grids.
//!
//! # Physics Background
//!
//! Under the scalar, paraxial approximation the image of a point source is
//! the squared modulus of the Fourier transform of the pupil wavefunction:
//!
//! ```text
//! P(x, y) = A(x, y) * exp(i * 2π * W(x, y))     pupil wavefunction
//! PSF     = | FT{ P } |²                         Fraunhofer propagation
//! MTF     = | FT{ PSF } | / FT{ PSF }(0, 0)     contrast transfer
//! ```
//!
//! where `A` is the binary circular aperture and `W` is the wavefront error
//! in waves, expanded on the Fringe Zernike basis. Sample spacings in the
//! pupil and image planes are tied together by the scaling relation
//! `Δx_image = λ·f / (N·Δx_pupil)`, which every downstream resampling and
//! convolution decision depends on.
//!
//! # Example
//!
//! ```no_run
//! use fourier_optics::{Pupil, PupilConfig, Psf, Mtf};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Quarter wave of defocus on a 10 mm pupil at 550 nm
//! let mut pupil = Pupil::new(PupilConfig {
//!     samples: 128,
//!     wavelength: 0.55,
//!     epd: 10.0,
//!     terms: vec![(3, 0.25)],
//!     ..Default::default()
//! })?;
//! pupil.build();
//!
//! let psf = Psf::from_pupil(&pupil, 100.0, 1)?;
//! let mtf = Mtf::from_psf(&psf);
//! # Ok(())
//! # }
//! ```

pub mod analytic;
pub mod coordinates;
pub mod fourier;
pub mod otf;
pub mod psf;
pub mod pupil;
pub mod zernike;

// Re-export key functionality for easier access
pub use analytic::{AiryPsf, AnalyticFt, PixelAperture};
pub use otf::{Mtf, Otf};
pub use psf::{Psf, PropagationError};
pub use pupil::{ConfigError, OpdUnit, Pupil, PupilConfig};
pub use zernike::{fit, FitError};
