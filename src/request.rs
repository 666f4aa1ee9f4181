// request.rs
// Parameters a caller supplies per plot: charge toggles and Gaussian-surface settings

use crate::config::{DEFAULT_GAUSS_CHARGE, DEFAULT_GAUSS_RADIUS};
use crate::error::{ConfigError, Result};
use crate::gauss::{validate_charge, validate_radius, SurfaceKind};
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// Visibility toggles for the dipole scene. Missing fields default to shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DipoleRequest {
    #[serde(default = "default_true")]
    pub proton: bool,
    #[serde(default = "default_true")]
    pub electron: bool,
}

impl Default for DipoleRequest {
    fn default() -> Self {
        Self {
            proton: true,
            electron: true,
        }
    }
}

impl DipoleRequest {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Deserialize)]
struct RawGaussianRequest {
    #[serde(default)]
    surface: Option<String>,
    #[serde(default)]
    radius: Option<f64>,
    #[serde(default)]
    charge: Option<f64>,
}

/// Validated Gaussian-surface parameters. `charge_e` is in elementary charges.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GaussianRequest {
    pub surface: SurfaceKind,
    pub radius: f64,
    pub charge_e: f64,
}

impl Default for GaussianRequest {
    fn default() -> Self {
        Self {
            surface: SurfaceKind::Sphere,
            radius: DEFAULT_GAUSS_RADIUS,
            charge_e: DEFAULT_GAUSS_CHARGE,
        }
    }
}

impl GaussianRequest {
    pub fn new(surface: SurfaceKind, radius: f64, charge_e: f64) -> Result<Self> {
        Ok(Self {
            surface,
            radius: validate_radius(radius)?,
            charge_e: validate_charge(charge_e)?,
        })
    }

    /// Parse the surface by name, then validate as [`GaussianRequest::new`].
    pub fn parse(surface: &str, radius: f64, charge_e: f64) -> Result<Self> {
        Self::new(surface.parse()?, radius, charge_e)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: RawGaussianRequest = serde_json::from_str(json)?;
        let surface = match raw.surface {
            Some(name) => name.parse()?,
            None => SurfaceKind::Sphere,
        };
        Ok(Self::new(
            surface,
            raw.radius.unwrap_or(DEFAULT_GAUSS_RADIUS),
            raw.charge.unwrap_or(DEFAULT_GAUSS_CHARGE),
        )?)
    }

    /// Enclosed charge in coulombs.
    pub fn charge_coulombs(&self) -> f64 {
        crate::units::elementary_to_coulombs(self.charge_e)
    }
}
