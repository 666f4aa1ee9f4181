// charge.rs
// Point charges and the named particle species they can be built from

use crate::error::{FieldError, Result};
use crate::units;
use serde::{Deserialize, Serialize};
use ultraviolet::DVec3;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Species {
    Proton,
    Electron,
}

impl Species {
    pub fn charge(self) -> f64 {
        match self {
            Species::Proton => units::PROTON_CHARGE,
            Species::Electron => units::ELECTRON_CHARGE,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Species::Proton => "Proton",
            Species::Electron => "Electron",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "proton" => Some(Species::Proton),
            "electron" => Some(Species::Electron),
            _ => None,
        }
    }
}

/// A fixed point charge. `magnitude` is signed and in coulombs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointCharge {
    pub magnitude: f64,
    pub position: DVec3,
}

impl PointCharge {
    pub fn new(magnitude: f64, position: DVec3) -> Self {
        Self { magnitude, position }
    }

    pub fn proton(position: DVec3) -> Self {
        Self::new(Species::Proton.charge(), position)
    }

    pub fn electron(position: DVec3) -> Self {
        Self::new(Species::Electron.charge(), position)
    }

    /// Charge of `multiple` elementary charges placed at `position`.
    pub fn from_elementary(multiple: f64, position: DVec3) -> Self {
        Self::new(units::elementary_to_coulombs(multiple), position)
    }

    pub fn is_finite(&self) -> bool {
        self.magnitude.is_finite()
            && self.position.x.is_finite()
            && self.position.y.is_finite()
            && self.position.z.is_finite()
    }
}

/// Reject an empty charge set or any charge carrying non-finite values.
pub fn validate_charges(charges: &[PointCharge]) -> Result<()> {
    if charges.is_empty() {
        return Err(FieldError::NoCharges);
    }
    if let Some(index) = charges.iter().position(|c| !c.is_finite()) {
        return Err(FieldError::NonFiniteCharge { index });
    }
    Ok(())
}
