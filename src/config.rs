// Centralized configuration for field sampling and plot parameters

use crate::charge::{PointCharge, Species};
use crate::display::DisplayConfig;
use crate::error::{ConfigError, FieldError, Result};
use crate::field::SingularityPolicy;
use crate::grid::{AxisRange, SampleGrid};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use ultraviolet::DVec3;

// ====================
// Sampling Grid
// ====================
pub const GRID_MIN: f64 = -100.0;
pub const GRID_MAX: f64 = 100.0;
pub const GRID_COUNT: usize = 10; // Samples per axis
/// Upper bound on the total number of lattice points
pub const MAX_GRID_POINTS: usize = 1_000_000;

// ====================
// Dipole Charges
// ====================
pub const PROTON_POSITION: [f64; 3] = [25.0, 0.0, 0.0];
pub const ELECTRON_POSITION: [f64; 3] = [-25.0, 0.0, 0.0];

// ====================
// Arrow Display
// ====================
/// Length of the strongest arrow, in display units
pub const MAX_ARROW_LENGTH: f64 = 15.0;
/// Arrows with relative magnitude at or below this are hidden
pub const VISIBILITY_CUTOFF: f64 = 0.1;

// ====================
// Plot Layout
// ====================
pub const VIEW_RANGE: f64 = 75.0; // Axis range is [-VIEW_RANGE, VIEW_RANGE]
pub const PLOT_WIDTH: u32 = 1000;
pub const PLOT_HEIGHT: u32 = 1000;
pub const BACKGROUND_COLOR: &str = "rgba(222, 226, 230, 1)";
pub const ARROW_COLOR: &str = "blue";
pub const PROTON_COLOR: &str = "red";
pub const ELECTRON_COLOR: &str = "green";
pub const CHARGE_MARKER_SIZE: f64 = 10.0;

// ====================
// Gaussian Surfaces
// ====================
pub const GAUSS_RADIUS_MIN: f64 = 1.0;
pub const GAUSS_RADIUS_MAX: f64 = 50.0;
/// Charge bounds in elementary charges
pub const GAUSS_CHARGE_MIN: f64 = -10.0;
pub const GAUSS_CHARGE_MAX: f64 = 10.0;
pub const DEFAULT_GAUSS_RADIUS: f64 = 25.0;
pub const DEFAULT_GAUSS_CHARGE: f64 = 1.0;
/// Height of the cylindrical surface; the line charge spreads q over this length
pub const CYLINDER_LENGTH: f64 = 100.0;
/// Side of the square planar surface; the sheet charge spreads q over its area
pub const PLANE_SIDE: f64 = 100.0;
pub const SURFACE_MESH_RESOLUTION: usize = 50;
pub const SURFACE_OPACITY: f64 = 0.3;
/// Default quadrature points for Gauss flux integration
pub const FLUX_SAMPLES: usize = 4096;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub x: AxisRange,
    pub y: AxisRange,
    pub z: AxisRange,
}

impl Default for GridConfig {
    fn default() -> Self {
        let axis = AxisRange::new(GRID_MIN, GRID_MAX, GRID_COUNT);
        Self { x: axis, y: axis, z: axis }
    }
}

impl GridConfig {
    pub fn to_grid(&self) -> Result<SampleGrid> {
        SampleGrid::new(self.x, self.y, self.z)
    }
}

/// An additional charge placed in the dipole scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChargeConfig {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// "proton" or "electron"
    #[serde(default)]
    pub species: Option<String>,
    /// Charge as a multiple of e; used when no species is given
    #[serde(default)]
    pub elementary: Option<f64>,
    #[serde(default)]
    pub label: Option<String>,
}

impl ChargeConfig {
    pub fn position(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    pub fn display_label(&self) -> String {
        if let Some(label) = &self.label {
            return label.clone();
        }
        match &self.species {
            Some(species) => species.clone(),
            None => format!("Charge ({}, {}, {})", self.x, self.y, self.z),
        }
    }

    pub fn to_point_charge(&self) -> Result<PointCharge, ConfigError> {
        if let Some(name) = &self.species {
            return Species::from_name(name)
                .map(|species| PointCharge::new(species.charge(), self.position()))
                .ok_or_else(|| ConfigError::UnknownSpecies(name.clone()));
        }
        match self.elementary {
            Some(multiple) => Ok(PointCharge::from_elementary(multiple, self.position())),
            None => Err(ConfigError::MissingCharge(self.display_label())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    pub grid: GridConfig,
    pub display: DisplayConfig,
    pub singularity: SingularityPolicy,
    /// Half-width of the plotted axis range
    pub view_range: f64,
    pub proton_position: [f64; 3],
    pub electron_position: [f64; 3],
    /// Center of the enclosed charge for Gaussian-surface plots
    pub gaussian_center: [f64; 3],
    pub charges: Vec<ChargeConfig>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            display: DisplayConfig::default(),
            singularity: SingularityPolicy::default(),
            view_range: VIEW_RANGE,
            proton_position: PROTON_POSITION,
            electron_position: ELECTRON_POSITION,
            gaussian_center: [0.0, 0.0, 0.0],
            charges: Vec::new(),
        }
    }
}

impl SamplerConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: SamplerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section that a plot later depends on, so bad values fail at load time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.to_grid()?;
        self.display.validate()?;
        if !self.view_range.is_finite() || self.view_range <= 0.0 {
            return Err(FieldError::InvalidSetting {
                name: "view_range",
                value: self.view_range,
                expected: "a finite value > 0",
            }
            .into());
        }
        for charge in &self.charges {
            charge.to_point_charge()?;
        }
        Ok(())
    }

    pub fn proton(&self) -> PointCharge {
        PointCharge::proton(vec3(self.proton_position))
    }

    pub fn electron(&self) -> PointCharge {
        PointCharge::electron(vec3(self.electron_position))
    }
}

#[inline]
pub fn vec3(v: [f64; 3]) -> DVec3 {
    DVec3::new(v[0], v[1], v[2])
}
