//! Error types for field evaluation and configuration loading.

use thiserror::Error;

/// Errors raised by validation or by degenerate field computations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    /// A grid axis was configured with zero samples.
    #[error("grid axis {axis} must have at least one sample")]
    EmptyAxis { axis: char },
    /// A grid axis has non-finite bounds or `min > max`.
    #[error("grid axis {axis} has invalid bounds [{min}, {max}]")]
    InvalidAxisBounds { axis: char, min: f64, max: f64 },
    /// The product of the axis counts overflows or exceeds the point limit.
    #[error("grid of {nx}x{ny}x{nz} samples exceeds the limit of {max} points")]
    GridTooLarge { nx: usize, ny: usize, nz: usize, max: usize },
    /// A display or layout setting is non-finite or outside its accepted range.
    #[error("{name} = {value} is invalid, expected {expected}")]
    InvalidSetting { name: &'static str, value: f64, expected: &'static str },
    /// Field evaluation was requested with no charges present.
    #[error("at least one point charge is required to evaluate a field")]
    NoCharges,
    /// A charge carries a NaN or infinite magnitude or coordinate.
    #[error("charge #{index} has a non-finite magnitude or position")]
    NonFiniteCharge { index: usize },
    /// Surface kind string did not name a known Gaussian surface.
    #[error("unrecognized surface kind '{0}', expected one of: sphere, cylinder, plane")]
    UnknownSurface(String),
    /// Gaussian surface radius outside the accepted range.
    #[error("radius {value} is outside the allowed range [{min}, {max}]")]
    RadiusOutOfRange { value: f64, min: f64, max: f64 },
    /// Gaussian charge (in elementary charges) outside the accepted range.
    #[error("charge {value} e is outside the allowed range [{min}, {max}]")]
    ChargeOutOfRange { value: f64, min: f64, max: f64 },
    /// A sample count for surface integration or meshing was too small.
    #[error("{what} needs at least {min} samples, got {got}")]
    TooFewSamples { what: &'static str, min: usize, got: usize },
    /// Positions and field vectors passed together have different lengths.
    #[error("expected {expected} field samples, got {got}")]
    LengthMismatch { expected: usize, got: usize },
    /// No finite, non-zero magnitude exists to normalize against.
    #[error("field is degenerate: no finite non-zero magnitude to normalize against")]
    DegenerateField,
}

/// Errors raised while loading configuration or parsing requests.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A configured charge names an unknown species.
    #[error("unknown charge species '{0}', expected proton or electron")]
    UnknownSpecies(String),
    /// A configured charge gives neither a species nor an elementary multiple.
    #[error("charge '{0}' needs either a species or an elementary multiple")]
    MissingCharge(String),
    #[error(transparent)]
    Field(#[from] FieldError),
}

pub type Result<T, E = FieldError> = std::result::Result<T, E>;
