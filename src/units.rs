//! Physical constants used by the field sampler.
//!
//! Units are SI throughout:
//! - Charge: coulomb (C)
//! - Length: arbitrary display units treated as meters
//! - Field: N/C (equivalently V/m)

/// Coulomb's constant k_e in N⋅m²/C², rounded to three significant figures.
pub const COULOMB_CONSTANT: f64 = 8.99e9;
/// Elementary charge in coulombs.
pub const ELEMENTARY_CHARGE: f64 = 1.602e-19;
/// Charge of a proton in coulombs.
pub const PROTON_CHARGE: f64 = ELEMENTARY_CHARGE;
/// Charge of an electron in coulombs.
pub const ELECTRON_CHARGE: f64 = -ELEMENTARY_CHARGE;

/// Distances below this are treated as coincident with the charge.
pub const DISTANCE_FLOOR: f64 = 1e-10;

/// Convert a multiple of the elementary charge into coulombs.
#[inline]
pub fn elementary_to_coulombs(multiple: f64) -> f64 {
    multiple * ELEMENTARY_CHARGE
}

/// Gauss's law flux 4π⋅k_e⋅q for an enclosed charge `q` (coulombs).
#[inline]
pub fn enclosed_flux(q: f64) -> f64 {
    4.0 * std::f64::consts::PI * COULOMB_CONSTANT * q
}
