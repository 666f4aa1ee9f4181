pub mod charge;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod field;
pub mod gauss;
pub mod grid;
pub mod plot;
pub mod profiler;
pub mod request;
pub mod units;

pub use charge::PointCharge;
pub use display::{scale_for_display, ScaledField};
pub use error::{ConfigError, FieldError};
pub use field::{evaluate_field, evaluate_field_with, FieldSample, SingularityPolicy};
pub use grid::{AxisRange, SampleGrid};

#[cfg(feature = "profiling")]
use once_cell::sync::Lazy;
#[cfg(feature = "profiling")]
use parking_lot::Mutex;

#[cfg(feature = "profiling")]
pub static PROFILER: Lazy<Mutex<profiler::Profiler>> =
    Lazy::new(|| Mutex::new(profiler::Profiler::new()));
