// display.rs
// Converts raw field vectors into arrows sized for a fixed visual envelope

use crate::config::{MAX_ARROW_LENGTH, VISIBILITY_CUTOFF};
use crate::error::{FieldError, Result};
use crate::field::FieldSample;
use crate::profile_scope;
use serde::{Deserialize, Serialize};
use ultraviolet::DVec3;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Arrow length given to the strongest sample, in display units.
    pub max_arrow_length: f64,
    /// Arrows with relative magnitude at or below this are not drawn.
    pub visibility_cutoff: f64,
}

impl DisplayConfig {
    /// Arrow length must be finite and positive; the cutoff must lie in [0, 1).
    pub fn validate(&self) -> Result<()> {
        if !self.max_arrow_length.is_finite() || self.max_arrow_length <= 0.0 {
            return Err(FieldError::InvalidSetting {
                name: "max_arrow_length",
                value: self.max_arrow_length,
                expected: "a finite length > 0",
            });
        }
        if !(0.0..1.0).contains(&self.visibility_cutoff) {
            return Err(FieldError::InvalidSetting {
                name: "visibility_cutoff",
                value: self.visibility_cutoff,
                expected: "a fraction in [0, 1)",
            });
        }
        Ok(())
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_arrow_length: MAX_ARROW_LENGTH,
            visibility_cutoff: VISIBILITY_CUTOFF,
        }
    }
}

/// Display-scaled field: one vector and one relative magnitude per sample.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaledField {
    pub vectors: Vec<DVec3>,
    pub relative_magnitudes: Vec<f64>,
    /// Largest finite raw magnitude used for normalization.
    pub max_magnitude: f64,
    /// Samples skipped because their raw magnitude was not finite.
    pub excluded: usize,
}

/// A single arrow ready for a renderer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    pub start: [f64; 3],
    pub end: [f64; 3],
    pub relative_magnitude: f64,
}

/// Rescale field vectors so the strongest one is `max_arrow_length` long.
///
/// Directions are preserved and lengths are proportional to |E| / max|E|. Samples with
/// a non-finite magnitude get a zero vector and relative magnitude 0 and are counted in
/// [`ScaledField::excluded`]. Fails with [`FieldError::DegenerateField`] when no finite,
/// non-zero magnitude exists.
pub fn scale_for_display(fields: &[DVec3], display: &DisplayConfig) -> Result<ScaledField> {
    profile_scope!("scale_for_display");
    display.validate()?;

    let magnitudes: Vec<f64> = fields.iter().map(|e| e.mag()).collect();
    let max_magnitude = magnitudes
        .iter()
        .copied()
        .filter(|m| m.is_finite())
        .fold(0.0f64, f64::max);
    if max_magnitude <= 0.0 {
        return Err(FieldError::DegenerateField);
    }

    let mut excluded = 0;
    let mut vectors = Vec::with_capacity(fields.len());
    let mut relative_magnitudes = Vec::with_capacity(fields.len());
    for (e, &mag) in fields.iter().zip(&magnitudes) {
        if !mag.is_finite() {
            excluded += 1;
            vectors.push(DVec3::zero());
            relative_magnitudes.push(0.0);
            continue;
        }
        let relative = mag / max_magnitude;
        let vector = if mag > 0.0 {
            *e * (relative * display.max_arrow_length / mag)
        } else {
            DVec3::zero()
        };
        vectors.push(vector);
        relative_magnitudes.push(relative);
    }

    if excluded > 0 {
        log::debug!("excluded {} non-finite samples from display scaling", excluded);
    }

    Ok(ScaledField {
        vectors,
        relative_magnitudes,
        max_magnitude,
        excluded,
    })
}

/// Convenience wrapper over [`scale_for_display`] for evaluated samples.
pub fn scale_samples(samples: &[FieldSample], display: &DisplayConfig) -> Result<ScaledField> {
    let fields: Vec<DVec3> = samples.iter().map(|s| s.field).collect();
    scale_for_display(&fields, display)
}

/// Build arrows anchored at `starts`, keeping only those above the visibility cutoff.
pub fn arrows(
    starts: &[DVec3],
    scaled: &ScaledField,
    display: &DisplayConfig,
) -> Result<Vec<Arrow>> {
    if starts.len() != scaled.vectors.len() {
        return Err(FieldError::LengthMismatch {
            expected: starts.len(),
            got: scaled.vectors.len(),
        });
    }

    Ok(starts
        .iter()
        .zip(&scaled.vectors)
        .zip(&scaled.relative_magnitudes)
        .filter(|(_, rel)| **rel > display.visibility_cutoff)
        .map(|((&start, &v), &rel)| {
            let end = start + v;
            Arrow {
                start: [start.x, start.y, start.z],
                end: [end.x, end.y, end.z],
                relative_magnitude: rel,
            }
        })
        .collect())
}
