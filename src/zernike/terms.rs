//! Closed-form Fringe Zernike polynomials, terms 0 through 48.
//!
//! Each term is a plain function of normalized radius and azimuth so the
//! catalog is a fixed table of function pointers rather than anything
//! evaluated dynamically. Ordering follows the University-of-Arizona Fringe
//! convention: groups of ascending `(n + m) / 2`, cosine harmonic before
//! sine. The table is append-only; indexes are a stable contract with
//! callers.

use super::TERM_COUNT;

/// A single basis term evaluated at one grid point.
pub type TermFn = fn(f64, f64) -> f64;

// Piston carries no measurable phase structure once the mean is removed, so
// the catalog defines it as identically zero. Callers needing a true offset
// must handle it separately.
fn z0(_rho: f64, _phi: f64) -> f64 {
    0.0
}

fn z1(rho: f64, phi: f64) -> f64 {
    rho * phi.cos()
}

fn z2(rho: f64, phi: f64) -> f64 {
    rho * phi.sin()
}

fn z3(rho: f64, _phi: f64) -> f64 {
    2.0 * rho.powi(2) - 1.0
}

fn z4(rho: f64, phi: f64) -> f64 {
    rho.powi(2) * (2.0 * phi).cos()
}

fn z5(rho: f64, phi: f64) -> f64 {
    rho.powi(2) * (2.0 * phi).sin()
}

fn z6(rho: f64, phi: f64) -> f64 {
    (3.0 * rho.powi(3) - 2.0 * rho) * phi.cos()
}

fn z7(rho: f64, phi: f64) -> f64 {
    (3.0 * rho.powi(3) - 2.0 * rho) * phi.sin()
}

fn z8(rho: f64, _phi: f64) -> f64 {
    6.0 * rho.powi(4) - 6.0 * rho.powi(2) + 1.0
}

fn z9(rho: f64, phi: f64) -> f64 {
    rho.powi(3) * (3.0 * phi).cos()
}

fn z10(rho: f64, phi: f64) -> f64 {
    rho.powi(3) * (3.0 * phi).sin()
}

fn z11(rho: f64, phi: f64) -> f64 {
    (4.0 * rho.powi(4) - 3.0 * rho.powi(2)) * (2.0 * phi).cos()
}

fn z12(rho: f64, phi: f64) -> f64 {
    (4.0 * rho.powi(4) - 3.0 * rho.powi(2)) * (2.0 * phi).sin()
}

fn z13(rho: f64, phi: f64) -> f64 {
    (10.0 * rho.powi(5) - 12.0 * rho.powi(3) + 3.0 * rho) * phi.cos()
}

fn z14(rho: f64, phi: f64) -> f64 {
    (10.0 * rho.powi(5) - 12.0 * rho.powi(3) + 3.0 * rho) * phi.sin()
}

fn z15(rho: f64, _phi: f64) -> f64 {
    20.0 * rho.powi(6) - 30.0 * rho.powi(4) + 12.0 * rho.powi(2) - 1.0
}

fn z16(rho: f64, phi: f64) -> f64 {
    rho.powi(4) * (4.0 * phi).cos()
}

fn z17(rho: f64, phi: f64) -> f64 {
    rho.powi(4) * (4.0 * phi).sin()
}

fn z18(rho: f64, phi: f64) -> f64 {
    (5.0 * rho.powi(5) - 4.0 * rho.powi(3)) * (3.0 * phi).cos()
}

fn z19(rho: f64, phi: f64) -> f64 {
    (5.0 * rho.powi(5) - 4.0 * rho.powi(3)) * (3.0 * phi).sin()
}

fn z20(rho: f64, phi: f64) -> f64 {
    (15.0 * rho.powi(6) - 20.0 * rho.powi(4) + 6.0 * rho.powi(2)) * (2.0 * phi).cos()
}

fn z21(rho: f64, phi: f64) -> f64 {
    (15.0 * rho.powi(6) - 20.0 * rho.powi(4) + 6.0 * rho.powi(2)) * (2.0 * phi).sin()
}

fn z22(rho: f64, phi: f64) -> f64 {
    (35.0 * rho.powi(7) - 60.0 * rho.powi(5) + 30.0 * rho.powi(3) - 4.0 * rho) * phi.cos()
}

fn z23(rho: f64, phi: f64) -> f64 {
    (35.0 * rho.powi(7) - 60.0 * rho.powi(5) + 30.0 * rho.powi(3) - 4.0 * rho) * phi.sin()
}

fn z24(rho: f64, _phi: f64) -> f64 {
    70.0 * rho.powi(8) - 140.0 * rho.powi(6) + 90.0 * rho.powi(4) - 20.0 * rho.powi(2) + 1.0
}

fn z25(rho: f64, phi: f64) -> f64 {
    rho.powi(5) * (5.0 * phi).cos()
}

fn z26(rho: f64, phi: f64) -> f64 {
    rho.powi(5) * (5.0 * phi).sin()
}

fn z27(rho: f64, phi: f64) -> f64 {
    (6.0 * rho.powi(6) - 5.0 * rho.powi(4)) * (4.0 * phi).cos()
}

fn z28(rho: f64, phi: f64) -> f64 {
    (6.0 * rho.powi(6) - 5.0 * rho.powi(4)) * (4.0 * phi).sin()
}

fn z29(rho: f64, phi: f64) -> f64 {
    (21.0 * rho.powi(7) - 30.0 * rho.powi(5) + 10.0 * rho.powi(3)) * (3.0 * phi).cos()
}

fn z30(rho: f64, phi: f64) -> f64 {
    (21.0 * rho.powi(7) - 30.0 * rho.powi(5) + 10.0 * rho.powi(3)) * (3.0 * phi).sin()
}

fn z31(rho: f64, phi: f64) -> f64 {
    (56.0 * rho.powi(8) - 105.0 * rho.powi(6) + 60.0 * rho.powi(4) - 10.0 * rho.powi(2))
        * (2.0 * phi).cos()
}

fn z32(rho: f64, phi: f64) -> f64 {
    (56.0 * rho.powi(8) - 105.0 * rho.powi(6) + 60.0 * rho.powi(4) - 10.0 * rho.powi(2))
        * (2.0 * phi).sin()
}

fn z33(rho: f64, phi: f64) -> f64 {
    (126.0 * rho.powi(9) - 280.0 * rho.powi(7) + 210.0 * rho.powi(5) - 60.0 * rho.powi(3)
        + 5.0 * rho)
        * phi.cos()
}

fn z34(rho: f64, phi: f64) -> f64 {
    (126.0 * rho.powi(9) - 280.0 * rho.powi(7) + 210.0 * rho.powi(5) - 60.0 * rho.powi(3)
        + 5.0 * rho)
        * phi.sin()
}

fn z35(rho: f64, _phi: f64) -> f64 {
    252.0 * rho.powi(10) - 630.0 * rho.powi(8) + 560.0 * rho.powi(6) - 210.0 * rho.powi(4)
        + 30.0 * rho.powi(2)
        - 1.0
}

fn z36(rho: f64, phi: f64) -> f64 {
    rho.powi(6) * (6.0 * phi).cos()
}

fn z37(rho: f64, phi: f64) -> f64 {
    rho.powi(6) * (6.0 * phi).sin()
}

fn z38(rho: f64, phi: f64) -> f64 {
    (7.0 * rho.powi(7) - 6.0 * rho.powi(5)) * (5.0 * phi).cos()
}

fn z39(rho: f64, phi: f64) -> f64 {
    (7.0 * rho.powi(7) - 6.0 * rho.powi(5)) * (5.0 * phi).sin()
}

fn z40(rho: f64, phi: f64) -> f64 {
    (28.0 * rho.powi(8) - 42.0 * rho.powi(6) + 15.0 * rho.powi(4)) * (4.0 * phi).cos()
}

fn z41(rho: f64, phi: f64) -> f64 {
    (28.0 * rho.powi(8) - 42.0 * rho.powi(6) + 15.0 * rho.powi(4)) * (4.0 * phi).sin()
}

fn z42(rho: f64, phi: f64) -> f64 {
    (84.0 * rho.powi(9) - 168.0 * rho.powi(7) + 105.0 * rho.powi(5) - 20.0 * rho.powi(3))
        * (3.0 * phi).cos()
}

fn z43(rho: f64, phi: f64) -> f64 {
    (84.0 * rho.powi(9) - 168.0 * rho.powi(7) + 105.0 * rho.powi(5) - 20.0 * rho.powi(3))
        * (3.0 * phi).sin()
}

fn z44(rho: f64, phi: f64) -> f64 {
    (210.0 * rho.powi(10) - 504.0 * rho.powi(8) + 420.0 * rho.powi(6) - 140.0 * rho.powi(4)
        + 15.0 * rho.powi(2))
        * (2.0 * phi).cos()
}

fn z45(rho: f64, phi: f64) -> f64 {
    (210.0 * rho.powi(10) - 504.0 * rho.powi(8) + 420.0 * rho.powi(6) - 140.0 * rho.powi(4)
        + 15.0 * rho.powi(2))
        * (2.0 * phi).sin()
}

fn z46(rho: f64, phi: f64) -> f64 {
    (462.0 * rho.powi(11) - 1260.0 * rho.powi(9) + 1260.0 * rho.powi(7) - 560.0 * rho.powi(5)
        + 105.0 * rho.powi(3)
        - 6.0 * rho)
        * phi.cos()
}

fn z47(rho: f64, phi: f64) -> f64 {
    (462.0 * rho.powi(11) - 1260.0 * rho.powi(9) + 1260.0 * rho.powi(7) - 560.0 * rho.powi(5)
        + 105.0 * rho.powi(3)
        - 6.0 * rho)
        * phi.sin()
}

fn z48(rho: f64, _phi: f64) -> f64 {
    924.0 * rho.powi(12) - 2772.0 * rho.powi(10) + 3150.0 * rho.powi(8) - 1680.0 * rho.powi(6)
        + 420.0 * rho.powi(4)
        - 42.0 * rho.powi(2)
        + 1.0
}

/// Catalog of term functions, indexed by Fringe term number.
pub(crate) const TERM_FUNCTIONS: [TermFn; TERM_COUNT] = [
    z0, z1, z2, z3, z4, z5, z6, z7, z8, z9, z10, z11, z12, z13, z14, z15, z16, z17, z18, z19,
    z20, z21, z22, z23, z24, z25, z26, z27, z28, z29, z30, z31, z32, z33, z34, z35, z36, z37,
    z38, z39, z40, z41, z42, z43, z44, z45, z46, z47, z48,
];
