//! Fringe Zernike basis: term catalog, grid evaluation, and coefficient
//! fitting.
//!
//! The basis is a fixed, ordered catalog of 49 polynomial terms over the
//! unit disk, each with a closed-form function of normalized polar
//! coordinates, an RMS-normalization constant from the published
//! University-of-Arizona table, and a human-readable name. Term indexes are
//! a stable contract: the catalog is append-only and never reordered.
//!
//! [`fit`] is the inverse of wavefront synthesis: it projects a measured
//! phase/OPD map onto the basis by numerical inner products over the
//! circular aperture, producing a coefficient vector directly consumable by
//! [`crate::pupil::Pupil`].

mod terms;

use ndarray::{Array2, Zip};
use once_cell::sync::Lazy;
use thiserror::Error;

use crate::coordinates::normalized_axis;
pub(crate) use terms::TERM_FUNCTIONS;

/// Number of terms in the catalog.
pub const TERM_COUNT: usize = 49;

/// Errors raised while fitting coefficients to measured data.
#[derive(Debug, Error)]
pub enum FitError {
    #[error("cannot fit {requested} terms, the catalog holds {available}")]
    TooManyTerms { requested: usize, available: usize },
}

/// Human-readable term names, indexed by Fringe term number.
pub const NAMES: [&str; TERM_COUNT] = [
    "Piston / Bias",
    "Tilt X",
    "Tilt Y",
    "Defocus / Power",
    "Primary Astigmatism 00deg",
    "Primary Astigmatism 45deg",
    "Primary Coma X",
    "Primary Coma Y",
    "Primary Spherical",
    "Primary Trefoil X",
    "Primary Trefoil Y",
    "Secondary Astigmatism 00deg",
    "Secondary Astigmatism 45deg",
    "Secondary Coma X",
    "Secondary Coma Y",
    "Secondary Spherical",
    "Primary Tetrafoil X",
    "Primary Tetrafoil Y",
    "Secondary Trefoil X",
    "Secondary Trefoil Y",
    "Tertiary Astigmatism 00deg",
    "Tertiary Astigmatism 45deg",
    "Tertiary Coma X",
    "Tertiary Coma Y",
    "Tertiary Spherical",
    "Primary Pentafoil X",
    "Primary Pentafoil Y",
    "Secondary Tetrafoil X",
    "Secondary Tetrafoil Y",
    "Tertiary Trefoil X",
    "Tertiary Trefoil Y",
    "Quarternary Astigmatism 00deg",
    "Quarternary Astigmatism 45deg",
    "Quarternary Coma X",
    "Quarternary Coma Y",
    "Quarternary Spherical",
    "Primary Hexafoil X",
    "Primary Hexafoil Y",
    "Secondary Pentafoil X",
    "Secondary Pentafoil Y",
    "Tertiary Tetrafoil X",
    "Tertiary Tetrafoil Y",
    "Quaternary Trefoil X",
    "Quaternary Trefoil Y",
    "Quinternary Astigmatism 00deg",
    "Quinternary Astigmatism 45deg",
    "Quinternary Coma X",
    "Quinternary Coma Y",
    "Quinternary Spherical",
];

/// RMS-normalization constants, indexed by Fringe term number.
///
/// Scaling a term by its constant gives it unit RMS over the unit disk, so
/// normalized coefficients read directly as RMS wavefront error.
pub static NORMALIZATIONS: Lazy<[f64; TERM_COUNT]> = Lazy::new(|| {
    [
        1.0,                // Z 0
        2.0,                // Z 1
        2.0,                // Z 2
        3f64.sqrt(),        // Z 3
        6f64.sqrt(),        // Z 4
        6f64.sqrt(),        // Z 5
        2.0 * 2f64.sqrt(),  // Z 6
        2.0 * 2f64.sqrt(),  // Z 7
        5f64.sqrt(),        // Z 8
        2.0 * 2f64.sqrt(),  // Z 9
        2.0 * 2f64.sqrt(),  // Z10
        10f64.sqrt(),       // Z11
        10f64.sqrt(),       // Z12
        2.0 * 3f64.sqrt(),  // Z13
        2.0 * 3f64.sqrt(),  // Z14
        7f64.sqrt(),        // Z15
        10f64.sqrt(),       // Z16
        10f64.sqrt(),       // Z17
        2.0 * 3f64.sqrt(),  // Z18
        2.0 * 3f64.sqrt(),  // Z19
        14f64.sqrt(),       // Z20
        14f64.sqrt(),       // Z21
        4.0,                // Z22
        4.0,                // Z23
        3.0,                // Z24
        2.0 * 3f64.sqrt(),  // Z25
        2.0 * 3f64.sqrt(),  // Z26
        14f64.sqrt(),       // Z27
        14f64.sqrt(),       // Z28
        4.0,                // Z29
        4.0,                // Z30
        3.0 * 2f64.sqrt(),  // Z31
        3.0 * 2f64.sqrt(),  // Z32
        2.0 * 5f64.sqrt(),  // Z33
        2.0 * 5f64.sqrt(),  // Z34
        11f64.sqrt(),       // Z35
        14f64.sqrt(),       // Z36
        14f64.sqrt(),       // Z37
        4.0,                // Z38
        4.0,                // Z39
        3.0 * 2f64.sqrt(),  // Z40
        3.0 * 2f64.sqrt(),  // Z41
        2.0 * 5f64.sqrt(),  // Z42
        2.0 * 5f64.sqrt(),  // Z43
        22f64.sqrt(),       // Z44
        22f64.sqrt(),       // Z45
        2.0 * 6f64.sqrt(),  // Z46
        2.0 * 6f64.sqrt(),  // Z47
        13f64.sqrt(),       // Z48
    ]
});

/// Evaluates one basis term over an entire polar grid.
///
/// A single parallel pass over the grid per term; this is the hot path when
/// building wavefronts with many terms or fitting repeatedly.
///
/// # Panics
/// If `index` is outside the catalog. Callers validate indexes at
/// configuration time, so reaching this is a programming error.
pub fn evaluate_term(index: usize, rho: &Array2<f64>, phi: &Array2<f64>) -> Array2<f64> {
    assert!(
        index < TERM_COUNT,
        "term index {} outside catalog of {} terms",
        index,
        TERM_COUNT
    );
    let f = TERM_FUNCTIONS[index];
    let mut out = Array2::zeros(rho.dim());
    Zip::from(&mut out)
        .and(rho)
        .and(phi)
        .par_for_each(|o, &r, &p| *o = f(r, p));
    out
}

/// Fits Zernike coefficients to a measured phase/OPD map.
///
/// The data is assumed uniformly sampled over a [-1, 1] × [-1, 1] Cartesian
/// grid; samples outside the unit circle are ignored in both the data and
/// the basis terms, enforcing the circular orthogonality domain. Each
/// coefficient is the discrete projection `4·Σ(data·term) / (rows·cols·π)`,
/// a numerical approximation of the continuous inner product over the unit
/// disk.
///
/// # Arguments
/// * `data` - measured phase map, any rectangular shape
/// * `num_terms` - number of leading catalog terms to fit
/// * `normalize` - scale each coefficient by its RMS-normalization constant
///
/// # Returns
/// Coefficient vector of length `num_terms`, ordered by term index and
/// directly consumable by [`crate::pupil::PupilConfig::coefficients`].
pub fn fit(data: &Array2<f64>, num_terms: usize, normalize: bool) -> Result<Vec<f64>, FitError> {
    if num_terms > TERM_COUNT {
        return Err(FitError::TooManyTerms {
            requested: num_terms,
            available: TERM_COUNT,
        });
    }

    let (rows, cols) = data.dim();
    let y_axis = normalized_axis(rows);
    let x_axis = normalized_axis(cols);

    let mut rho = Array2::zeros((rows, cols));
    let mut phi = Array2::zeros((rows, cols));
    for (i, &y) in y_axis.iter().enumerate() {
        for (j, &x) in x_axis.iter().enumerate() {
            rho[[i, j]] = x.hypot(y);
            phi[[i, j]] = y.atan2(x);
        }
    }

    let projection_scale = 4.0 / (rows as f64 * cols as f64 * std::f64::consts::PI);

    let mut coefficients = Vec::with_capacity(num_terms);
    for term in 0..num_terms {
        let f = TERM_FUNCTIONS[term];
        // inner product over the aperture interior only
        let mut acc = 0.0;
        for ((&d, &r), &p) in data.iter().zip(rho.iter()).zip(phi.iter()) {
            if r <= 1.0 {
                acc += d * f(r, p);
            }
        }
        let mut coefficient = acc * projection_scale;
        if normalize {
            coefficient *= NORMALIZATIONS[term];
        }
        coefficients.push(coefficient);
    }

    Ok(coefficients)
}
