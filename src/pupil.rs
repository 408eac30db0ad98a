//! Pupil wavefront synthesis from Fringe Zernike coefficients.
//!
//! A [`Pupil`] owns a coefficient vector plus the sampling, wavelength, and
//! aperture-diameter bookkeeping needed to turn it into physical maps: the
//! phase (wavefront error, canonically in waves) and the complex
//! wavefunction `exp(i·2π·phase)` hard-masked to zero outside the unit
//! circle. Derived maps are cached behind an explicit Unbuilt → Built state
//! machine: [`Pupil::build`] populates them, and any setter that changes an
//! input invalidates them rather than leaving stale state behind.

use log::debug;
use ndarray::{Array2, Zip};
use num_complex::Complex64;
use std::f64::consts::TAU;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::coordinates::polar_grid;
use crate::zernike::{NAMES, NORMALIZATIONS, TERM_COUNT, TERM_FUNCTIONS};

/// Errors detected eagerly when configuring a pupil.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("base must be 0 or 1, got {0}")]
    InvalidBase(usize),

    #[error("term index {index} out of range, valid indexes are {base}..={max}")]
    TermOutOfRange {
        index: usize,
        base: usize,
        max: usize,
    },

    #[error("unsupported OPD unit '{0}', expected one of: waves, lambda, um, microns, micrometers, nm, nanometers")]
    UnsupportedUnit(String),
}

/// Unit in which OPD coefficients are expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpdUnit {
    /// Wavelengths of light; the canonical internal unit.
    #[default]
    Waves,
    /// Micrometers of optical path.
    Micrometers,
    /// Nanometers of optical path.
    Nanometers,
}

impl OpdUnit {
    /// Converts a value in this unit to waves at the given wavelength (µm).
    fn to_waves(self, value: f64, wavelength: f64) -> f64 {
        match self {
            OpdUnit::Waves => value,
            OpdUnit::Micrometers => value / wavelength,
            OpdUnit::Nanometers => value / (wavelength * 1e3),
        }
    }
}

impl FromStr for OpdUnit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "waves" | "lambda" => Ok(OpdUnit::Waves),
            "um" | "microns" | "micrometers" => Ok(OpdUnit::Micrometers),
            "nm" | "nanometers" => Ok(OpdUnit::Nanometers),
            other => Err(ConfigError::UnsupportedUnit(other.to_string())),
        }
    }
}

/// Typed configuration for [`Pupil::new`].
///
/// Coefficients may be given positionally, sparsely by term index, or both;
/// named `terms` entries override positional `coefficients` at the same
/// index. Positional input longer than the catalog is truncated, shorter
/// input is zero-padded. `base` selects 0- or 1-based term indexing for the
/// named entries.
#[derive(Debug, Clone)]
pub struct PupilConfig {
    /// Samples across the pupil diameter.
    pub samples: usize,
    /// Wavelength of light, µm.
    pub wavelength: f64,
    /// Entrance pupil diameter, mm.
    pub epd: f64,
    /// Unit the coefficients are expressed in.
    pub opd_unit: OpdUnit,
    /// Treat coefficients as RMS values (scale terms by their
    /// normalization constants during synthesis).
    pub rms_norm: bool,
    /// Base index of the named `terms` entries, 0 or 1.
    pub base: usize,
    /// Positional coefficients, index = catalog position + `base`.
    pub coefficients: Vec<f64>,
    /// Sparse named coefficients as `(index, value)`, respecting `base`.
    pub terms: Vec<(usize, f64)>,
}

impl Default for PupilConfig {
    fn default() -> Self {
        Self {
            samples: 128,
            wavelength: 0.55,
            epd: 1.0,
            opd_unit: OpdUnit::Waves,
            rms_norm: false,
            base: 0,
            coefficients: Vec::new(),
            terms: Vec::new(),
        }
    }
}

/// Derived state produced by [`Pupil::build`].
#[derive(Debug, Clone)]
struct WavefrontMaps {
    /// Wavefront error in waves. Values outside the unit circle carry no
    /// physical meaning; the mask lives in the wavefunction.
    phase: Array2<f64>,
    /// `exp(i·2π·phase)` inside the aperture, exactly zero outside, so the
    /// magnitude equals the binary aperture mask.
    wavefunction: Array2<Complex64>,
    /// Peak-to-valley of the phase over the aperture interior, waves.
    pv: f64,
    /// RMS of the phase over the aperture interior, waves.
    rms: f64,
}

/// Pupil-plane wavefront model of an optical system.
pub struct Pupil {
    coefficients: Vec<f64>,
    samples: usize,
    wavelength: f64,
    epd: f64,
    opd_unit: OpdUnit,
    rms_norm: bool,
    built: Option<WavefrontMaps>,
}

impl Pupil {
    /// Creates a pupil from a validated configuration.
    ///
    /// Fails eagerly on a base outside {0, 1} or a named term index outside
    /// the catalog; nothing is clamped silently.
    pub fn new(config: PupilConfig) -> Result<Self, ConfigError> {
        if config.base > 1 {
            return Err(ConfigError::InvalidBase(config.base));
        }

        let mut coefficients = vec![0.0; TERM_COUNT];
        for (slot, &value) in coefficients
            .iter_mut()
            .zip(config.coefficients.iter())
        {
            *slot = value;
        }

        // named entries override positional ones
        for &(index, value) in &config.terms {
            let max = TERM_COUNT - 1 + config.base;
            if index < config.base || index > max {
                return Err(ConfigError::TermOutOfRange {
                    index,
                    base: config.base,
                    max,
                });
            }
            coefficients[index - config.base] = value;
        }

        Ok(Self {
            coefficients,
            samples: config.samples,
            wavelength: config.wavelength,
            epd: config.epd,
            opd_unit: config.opd_unit,
            rms_norm: config.rms_norm,
            built: None,
        })
    }

    /// Number of samples across the pupil diameter.
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Wavelength of light, µm.
    pub fn wavelength(&self) -> f64 {
        self.wavelength
    }

    /// Entrance pupil diameter, mm.
    pub fn epd(&self) -> f64 {
        self.epd
    }

    /// Center-to-center pupil sample spacing, mm.
    pub fn sample_spacing(&self) -> f64 {
        if self.samples < 2 {
            self.epd
        } else {
            self.epd / (self.samples - 1) as f64
        }
    }

    /// Full coefficient vector, catalog-ordered and 0-based.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Replaces one coefficient (0-based index), invalidating derived maps.
    pub fn set_term(&mut self, index: usize, value: f64) -> Result<(), ConfigError> {
        if index >= TERM_COUNT {
            return Err(ConfigError::TermOutOfRange {
                index,
                base: 0,
                max: TERM_COUNT - 1,
            });
        }
        self.coefficients[index] = value;
        self.built = None;
        Ok(())
    }

    /// Changes the sample count, invalidating derived maps.
    pub fn set_samples(&mut self, samples: usize) {
        self.samples = samples;
        self.built = None;
    }

    /// Changes the wavelength (µm), invalidating derived maps.
    pub fn set_wavelength(&mut self, wavelength: f64) {
        self.wavelength = wavelength;
        self.built = None;
    }

    /// Changes the coefficient unit, invalidating derived maps.
    pub fn set_opd_unit(&mut self, unit: OpdUnit) {
        self.opd_unit = unit;
        self.built = None;
    }

    /// True once [`build`](Self::build) has populated the derived maps.
    pub fn is_built(&self) -> bool {
        self.built.is_some()
    }

    /// Phase map in waves, if built.
    pub fn phase(&self) -> Option<&Array2<f64>> {
        self.built.as_ref().map(|maps| &maps.phase)
    }

    /// Complex wavefunction, if built.
    pub fn wavefunction(&self) -> Option<&Array2<Complex64>> {
        self.built.as_ref().map(|maps| &maps.wavefunction)
    }

    /// Peak-to-valley wavefront error over the aperture, waves, if built.
    pub fn pv(&self) -> Option<f64> {
        self.built.as_ref().map(|maps| maps.pv)
    }

    /// RMS wavefront error over the aperture, waves, if built.
    pub fn rms(&self) -> Option<f64> {
        self.built.as_ref().map(|maps| maps.rms)
    }

    /// Computes the phase map and wavefunction from the stored coefficients.
    ///
    /// Idempotent: phase is synthesized from scratch each time the inputs
    /// change, never accumulated across calls. Repeated calls with unchanged
    /// inputs return the cached maps.
    pub fn build(&mut self) -> (&Array2<f64>, &Array2<Complex64>) {
        if self.built.is_none() {
            self.built = Some(self.synthesize());
        }
        let maps = self
            .built
            .as_ref()
            .expect("maps populated on the line above");
        (&maps.phase, &maps.wavefunction)
    }

    fn synthesize(&self) -> WavefrontMaps {
        let (rho, phi) = polar_grid(self.samples);
        let mut opd = Array2::zeros((self.samples, self.samples));

        let mut active_terms = 0usize;
        for (term, &coefficient) in self.coefficients.iter().enumerate() {
            // exact-zero coefficients contribute nothing; skip the grid pass
            if coefficient == 0.0 {
                continue;
            }
            active_terms += 1;
            let scale = if self.rms_norm {
                coefficient * NORMALIZATIONS[term]
            } else {
                coefficient
            };
            let f = TERM_FUNCTIONS[term];
            Zip::from(&mut opd)
                .and(&rho)
                .and(&phi)
                .par_for_each(|o, &r, &p| *o += scale * f(r, p));
        }

        let phase = opd.mapv(|v| self.opd_unit.to_waves(v, self.wavelength));

        let mut wavefunction = Array2::zeros(phase.dim());
        Zip::from(&mut wavefunction)
            .and(&phase)
            .and(&rho)
            .par_for_each(|w, &p, &r| {
                *w = if r <= 1.0 {
                    Complex64::from_polar(1.0, TAU * p)
                } else {
                    Complex64::new(0.0, 0.0)
                };
            });

        let (pv, rms) = aperture_statistics(&phase, &rho);
        debug!(
            "built {}x{} pupil, {} active terms, {:.4} PV / {:.4} RMS waves",
            self.samples, self.samples, active_terms, pv, rms
        );

        WavefrontMaps {
            phase,
            wavefunction,
            pv,
            rms,
        }
    }

    /// Stable human-readable description: nonzero terms plus PV/RMS stats.
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

/// Peak-to-valley and RMS of a phase map over the aperture interior.
fn aperture_statistics(phase: &Array2<f64>, rho: &Array2<f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum_sq = 0.0;
    let mut count = 0usize;
    for (&p, &r) in phase.iter().zip(rho.iter()) {
        if r <= 1.0 {
            min = min.min(p);
            max = max.max(p);
            sum_sq += p * p;
            count += 1;
        }
    }
    if count == 0 {
        return (0.0, 0.0);
    }
    ((max - min), (sum_sq / count as f64).sqrt())
}

impl fmt::Display for Pupil {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rms_norm {
            writeln!(f, "rms normalized Fringe Zernike description with:")?;
        } else {
            writeln!(f, "Fringe Zernike description with:")?;
        }
        for (index, &coefficient) in self.coefficients.iter().enumerate() {
            if coefficient == 0.0 {
                continue;
            }
            writeln!(f, "\t{:+.3} Z{} - {}", coefficient, index, NAMES[index])?;
        }
        match self.built.as_ref() {
            Some(maps) => write!(f, "\t{:.3} PV, {:.3} RMS [waves]", maps.pv, maps.rms),
            None => write!(f, "\t(not built, statistics unavailable)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn basic_config() -> PupilConfig {
        PupilConfig {
            samples: 64,
            wavelength: 0.5,
            epd: 10.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_rejects_invalid_base() {
        let config = PupilConfig {
            base: 2,
            ..basic_config()
        };
        assert!(matches!(Pupil::new(config), Err(ConfigError::InvalidBase(2))));
    }

    #[test]
    fn test_rejects_out_of_range_named_term() {
        let config = PupilConfig {
            terms: vec![(49, 1.0)],
            ..basic_config()
        };
        assert!(matches!(
            Pupil::new(config),
            Err(ConfigError::TermOutOfRange { index: 49, .. })
        ));
    }

    #[test]
    fn test_one_based_indexing_shifts_terms() {
        // Z1 under base 1 is piston; Z4 under base 1 is defocus
        let config = PupilConfig {
            base: 1,
            terms: vec![(4, 0.25)],
            ..basic_config()
        };
        let pupil = Pupil::new(config).unwrap();
        assert_relative_eq!(pupil.coefficients()[3], 0.25);
    }

    #[test]
    fn test_named_terms_override_positional() {
        let config = PupilConfig {
            coefficients: vec![0.0, 0.0, 0.0, 1.0],
            terms: vec![(3, 0.5)],
            ..basic_config()
        };
        let pupil = Pupil::new(config).unwrap();
        assert_relative_eq!(pupil.coefficients()[3], 0.5);
    }

    #[test]
    fn test_opd_unit_parsing() {
        assert_eq!("waves".parse::<OpdUnit>().unwrap(), OpdUnit::Waves);
        assert_eq!("um".parse::<OpdUnit>().unwrap(), OpdUnit::Micrometers);
        assert_eq!("NM".parse::<OpdUnit>().unwrap(), OpdUnit::Nanometers);
        assert!(matches!(
            "furlongs".parse::<OpdUnit>(),
            Err(ConfigError::UnsupportedUnit(_))
        ));
    }

    #[test]
    fn test_wavefunction_magnitude_is_aperture_mask() {
        let config = PupilConfig {
            terms: vec![(8, 0.7)],
            ..basic_config()
        };
        let mut pupil = Pupil::new(config).unwrap();
        pupil.build();

        let (rho, _) = crate::coordinates::polar_grid(64);
        let wavefunction = pupil.wavefunction().unwrap();
        for (w, &r) in wavefunction.iter().zip(rho.iter()) {
            if r <= 1.0 {
                assert_relative_eq!(w.norm(), 1.0, epsilon = 1e-12);
            } else {
                assert_relative_eq!(w.norm(), 0.0);
            }
        }
    }

    #[test]
    fn test_build_is_idempotent() {
        let config = PupilConfig {
            terms: vec![(3, 0.25)],
            ..basic_config()
        };
        let mut pupil = Pupil::new(config).unwrap();
        pupil.build();
        let first = pupil.phase().unwrap().clone();
        pupil.build();
        let second = pupil.phase().unwrap();
        for (a, b) in first.iter().zip(second.iter()) {
            assert_relative_eq!(a, b);
        }
    }

    #[test]
    fn test_setter_invalidates_cache() {
        let mut pupil = Pupil::new(basic_config()).unwrap();
        pupil.build();
        assert!(pupil.is_built());
        pupil.set_term(3, 0.5).unwrap();
        assert!(!pupil.is_built());
    }

    #[test]
    fn test_unit_conversion_to_waves() {
        // 0.25 um of defocus at 0.5 um wavelength is half a wave
        let config = PupilConfig {
            opd_unit: OpdUnit::Micrometers,
            terms: vec![(3, 0.25)],
            ..basic_config()
        };
        let mut in_microns = Pupil::new(config).unwrap();
        in_microns.build();

        let config = PupilConfig {
            terms: vec![(3, 0.5)],
            ..basic_config()
        };
        let mut in_waves = Pupil::new(config).unwrap();
        in_waves.build();

        for (a, b) in in_microns
            .phase()
            .unwrap()
            .iter()
            .zip(in_waves.phase().unwrap().iter())
        {
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_zero_coefficients_give_flat_phase() {
        let mut pupil = Pupil::new(basic_config()).unwrap();
        pupil.build();
        assert_relative_eq!(pupil.pv().unwrap(), 0.0);
        assert_relative_eq!(pupil.rms().unwrap(), 0.0);
    }

    #[test]
    fn test_describe_lists_nonzero_terms() {
        let config = PupilConfig {
            rms_norm: true,
            terms: vec![(4, 0.5), (9, -0.2)],
            ..basic_config()
        };
        let mut pupil = Pupil::new(config).unwrap();
        pupil.build();
        let text = pupil.describe();
        assert!(text.contains("rms normalized"));
        assert!(text.contains("+0.500 Z4 - Primary Astigmatism 00deg"));
        assert!(text.contains("-0.200 Z9 - Primary Trefoil X"));
        assert!(text.contains("RMS [waves]"));
    }
}
