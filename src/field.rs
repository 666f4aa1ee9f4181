// field.rs
// Superposed Coulomb field and potential sampled over a grid

use crate::charge::{validate_charges, PointCharge};
use crate::error::Result;
use crate::grid::SampleGrid;
use crate::profile_scope;
use crate::units::{COULOMB_CONSTANT, DISTANCE_FLOOR};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use ultraviolet::DVec3;

/// How a sample closer than [`DISTANCE_FLOOR`] to a charge is handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SingularityPolicy {
    /// Floor the distance at `DISTANCE_FLOOR` and keep the term.
    #[default]
    Clamp,
    /// Drop that charge's contribution at that sample.
    Exclude,
}

/// Result of sampling the superposed field at a single point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldSample {
    pub position: DVec3,
    pub field: DVec3,
    pub potential: f64,
}

impl FieldSample {
    #[inline]
    pub fn magnitude(&self) -> f64 {
        self.field.mag()
    }
}

/// Effective distance for a term, or `None` when the policy drops it.
#[inline]
pub(crate) fn floored_distance(dist: f64, policy: SingularityPolicy) -> Option<f64> {
    if dist >= DISTANCE_FLOOR {
        return Some(dist);
    }
    match policy {
        SingularityPolicy::Clamp => Some(DISTANCE_FLOOR),
        SingularityPolicy::Exclude => None,
    }
}

/// Field and potential of one charge at `pos`: E = k_e q d / r³, V = k_e q / r.
#[inline]
pub fn coulomb_term(
    charge: &PointCharge,
    pos: DVec3,
    policy: SingularityPolicy,
) -> Option<(DVec3, f64)> {
    let d = pos - charge.position;
    let r = floored_distance(d.mag(), policy)?;
    let kq = COULOMB_CONSTANT * charge.magnitude;
    Some((d * (kq / (r * r * r)), kq / r))
}

fn superpose(charges: &[PointCharge], pos: DVec3, policy: SingularityPolicy) -> FieldSample {
    let mut field = DVec3::zero();
    let mut potential = 0.0;
    for charge in charges {
        if let Some((e, v)) = coulomb_term(charge, pos, policy) {
            field += e;
            potential += v;
        }
    }
    FieldSample {
        position: pos,
        field,
        potential,
    }
}

/// Evaluate the superposed field of `charges` at a single point.
pub fn evaluate_field_at(
    charges: &[PointCharge],
    pos: DVec3,
    policy: SingularityPolicy,
) -> Result<FieldSample> {
    validate_charges(charges)?;
    Ok(superpose(charges, pos, policy))
}

/// Evaluate the field on every grid point using the default [`SingularityPolicy::Clamp`].
pub fn evaluate_field(charges: &[PointCharge], grid: &SampleGrid) -> Result<Vec<FieldSample>> {
    evaluate_field_with(charges, grid, SingularityPolicy::default())
}

/// Evaluate the field on every grid point. Output order matches [`SampleGrid::points`].
pub fn evaluate_field_with(
    charges: &[PointCharge],
    grid: &SampleGrid,
    policy: SingularityPolicy,
) -> Result<Vec<FieldSample>> {
    profile_scope!("evaluate_field");
    validate_charges(charges)?;

    let points = grid.points();
    log::debug!(
        "evaluating {} charge(s) on {} grid points ({:?})",
        charges.len(),
        points.len(),
        policy
    );

    Ok(points
        .par_iter()
        .map(|&pos| superpose(charges, pos, policy))
        .collect())
}
