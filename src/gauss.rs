//! Idealized fields for Gaussian surfaces.
//!
//! Each [`SurfaceKind`] has its own closed form for a single enclosed charge `q`:
//!
//! - **Sphere**: point charge, `E = k_e q d / r³`.
//! - **Cylinder**: line charge along z with density `λ = q / CYLINDER_LENGTH`,
//!   `E = 2 k_e λ ρ̂ / ρ` in the xy-plane only.
//! - **Plane**: sheet normal to z with density `σ = q / PLANE_SIDE²`,
//!   `E = sign(dz) 2π k_e σ ẑ`, constant magnitude flipping across the sheet.
//!
//! With these densities every surface carries the same Gauss flux `4π k_e q`,
//! which [`gauss_flux`] checks numerically.

use crate::charge::{validate_charges, PointCharge};
use crate::config::{
    CYLINDER_LENGTH, GAUSS_CHARGE_MAX, GAUSS_CHARGE_MIN, GAUSS_RADIUS_MAX, GAUSS_RADIUS_MIN,
    PLANE_SIDE,
};
use crate::error::{FieldError, Result};
use crate::field::{floored_distance, FieldSample, SingularityPolicy};
use crate::grid::SampleGrid;
use crate::profile_scope;
use crate::units::COULOMB_CONSTANT;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;
use ultraviolet::DVec3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    Sphere,
    Cylinder,
    Plane,
}

impl SurfaceKind {
    pub const ALL: [SurfaceKind; 3] =
        [SurfaceKind::Sphere, SurfaceKind::Cylinder, SurfaceKind::Plane];

    pub fn name(self) -> &'static str {
        match self {
            SurfaceKind::Sphere => "sphere",
            SurfaceKind::Cylinder => "cylinder",
            SurfaceKind::Plane => "plane",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            SurfaceKind::Sphere => "Sphere",
            SurfaceKind::Cylinder => "Cylinder",
            SurfaceKind::Plane => "Plane",
        }
    }
}

impl fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SurfaceKind {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        SurfaceKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| FieldError::UnknownSurface(s.to_string()))
    }
}

/// Reject a Gaussian radius outside `[GAUSS_RADIUS_MIN, GAUSS_RADIUS_MAX]`.
pub fn validate_radius(radius: f64) -> Result<f64> {
    if radius.is_finite() && (GAUSS_RADIUS_MIN..=GAUSS_RADIUS_MAX).contains(&radius) {
        Ok(radius)
    } else {
        Err(FieldError::RadiusOutOfRange {
            value: radius,
            min: GAUSS_RADIUS_MIN,
            max: GAUSS_RADIUS_MAX,
        })
    }
}

/// Reject a charge (in elementary charges) outside `[GAUSS_CHARGE_MIN, GAUSS_CHARGE_MAX]`.
pub fn validate_charge(charge_e: f64) -> Result<f64> {
    if charge_e.is_finite() && (GAUSS_CHARGE_MIN..=GAUSS_CHARGE_MAX).contains(&charge_e) {
        Ok(charge_e)
    } else {
        Err(FieldError::ChargeOutOfRange {
            value: charge_e,
            min: GAUSS_CHARGE_MIN,
            max: GAUSS_CHARGE_MAX,
        })
    }
}

fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Closed-form field and potential of `kind` for charge `q` (coulombs) at `center`.
///
/// Potentials use a zero reference at the charge distance 1 for the cylinder and on the
/// sheet for the plane.
pub fn gaussian_term(
    kind: SurfaceKind,
    center: DVec3,
    q: f64,
    pos: DVec3,
    policy: SingularityPolicy,
) -> (DVec3, f64) {
    let d = pos - center;
    match kind {
        SurfaceKind::Sphere => match floored_distance(d.mag(), policy) {
            Some(r) => {
                let kq = COULOMB_CONSTANT * q;
                (d * (kq / (r * r * r)), kq / r)
            }
            None => (DVec3::zero(), 0.0),
        },
        SurfaceKind::Cylinder => {
            let rho_vec = DVec3::new(d.x, d.y, 0.0);
            match floored_distance(rho_vec.mag(), policy) {
                Some(rho) => {
                    let k_lambda = 2.0 * COULOMB_CONSTANT * q / CYLINDER_LENGTH;
                    (rho_vec * (k_lambda / (rho * rho)), -k_lambda * rho.ln())
                }
                None => (DVec3::zero(), 0.0),
            }
        }
        SurfaceKind::Plane => {
            let e_sheet = 2.0 * PI * COULOMB_CONSTANT * q / (PLANE_SIDE * PLANE_SIDE);
            (DVec3::new(0.0, 0.0, sign(d.z) * e_sheet), -e_sheet * d.z.abs())
        }
    }
}

/// Evaluate the closed-form field of `kind` on every grid point.
pub fn gaussian_field(
    kind: SurfaceKind,
    center: DVec3,
    q: f64,
    grid: &SampleGrid,
    policy: SingularityPolicy,
) -> Result<Vec<FieldSample>> {
    profile_scope!("gaussian_field");
    validate_charges(&[PointCharge::new(q, center)])?;

    let points = grid.points();
    log::debug!("evaluating {} field on {} grid points", kind, points.len());

    Ok(points
        .par_iter()
        .map(|&pos| {
            let (field, potential) = gaussian_term(kind, center, q, pos, policy);
            FieldSample {
                position: pos,
                field,
                potential,
            }
        })
        .collect())
}

/// Overlay mesh for a Gaussian surface, stored row-major as `rows × cols` points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurfaceMesh {
    pub kind: SurfaceKind,
    pub radius: f64,
    pub rows: usize,
    pub cols: usize,
    pub points: Vec<[f64; 3]>,
}

impl SurfaceMesh {
    pub fn point(&self, row: usize, col: usize) -> [f64; 3] {
        self.points[row * self.cols + col]
    }
}

fn linspace(min: f64, max: f64, n: usize) -> impl Iterator<Item = f64> {
    let step = (max - min) / (n - 1) as f64;
    (0..n).map(move |i| if i + 1 == n { max } else { min + i as f64 * step })
}

/// Build the overlay mesh for `kind` around `center`.
///
/// Sphere: `(θ, φ)` parametrisation of radius `radius`. Cylinder: radius `radius`,
/// height `CYLINDER_LENGTH`. Plane: `PLANE_SIDE` square lifted to `z = radius`.
pub fn surface_mesh(
    kind: SurfaceKind,
    center: DVec3,
    radius: f64,
    resolution: usize,
) -> Result<SurfaceMesh> {
    if resolution < 2 {
        return Err(FieldError::TooFewSamples {
            what: "surface mesh",
            min: 2,
            got: resolution,
        });
    }
    let n = resolution;
    let mut points = Vec::with_capacity(n * n);
    match kind {
        SurfaceKind::Sphere => {
            for phi in linspace(0.0, PI, n) {
                for theta in linspace(0.0, 2.0 * PI, n) {
                    points.push(DVec3::new(
                        radius * phi.sin() * theta.cos(),
                        radius * phi.sin() * theta.sin(),
                        radius * phi.cos(),
                    ));
                }
            }
        }
        SurfaceKind::Cylinder => {
            let half = CYLINDER_LENGTH / 2.0;
            for h in linspace(-half, half, n) {
                for theta in linspace(0.0, 2.0 * PI, n) {
                    points.push(DVec3::new(radius * theta.cos(), radius * theta.sin(), h));
                }
            }
        }
        SurfaceKind::Plane => {
            let half = PLANE_SIDE / 2.0;
            for y in linspace(-half, half, n) {
                for x in linspace(-half, half, n) {
                    points.push(DVec3::new(x, y, radius));
                }
            }
        }
    }

    Ok(SurfaceMesh {
        kind,
        radius,
        rows: n,
        cols: n,
        points: points
            .into_iter()
            .map(|p| {
                let p = p + center;
                [p.x, p.y, p.z]
            })
            .collect(),
    })
}

/// Roughly uniform points on a sphere, each covering an equal share of its area.
pub fn fibonacci_sphere(center: DVec3, radius: f64, n: usize) -> Vec<DVec3> {
    let golden = PI * (3.0 - 5f64.sqrt());
    (0..n)
        .map(|i| {
            let y = 1.0 - 2.0 * (i as f64 + 0.5) / n as f64;
            let r = (1.0 - y * y).sqrt();
            let theta = golden * i as f64;
            center + DVec3::new(r * theta.cos(), y, r * theta.sin()) * radius
        })
        .collect()
}

/// Numerically integrate `∮ E · n̂ dA` over the closed surface matching `kind`.
///
/// `charge_e` is in elementary charges and the charge sits at the origin. The cylinder
/// integrates its lateral surface; the caps carry no flux because `E_z = 0`. The plane
/// integrates both faces of a pillbox straddling the sheet at `z = ±radius`.
pub fn gauss_flux(kind: SurfaceKind, charge_e: f64, radius: f64, samples: usize) -> Result<f64> {
    profile_scope!("gauss_flux");
    validate_charge(charge_e)?;
    validate_radius(radius)?;
    if samples < 4 {
        return Err(FieldError::TooFewSamples {
            what: "flux integration",
            min: 4,
            got: samples,
        });
    }

    let q = crate::units::elementary_to_coulombs(charge_e);
    let center = DVec3::zero();
    let field = |pos: DVec3| gaussian_term(kind, center, q, pos, SingularityPolicy::Clamp).0;

    let flux = match kind {
        SurfaceKind::Sphere => {
            let d_area = 4.0 * PI * radius * radius / samples as f64;
            fibonacci_sphere(center, radius, samples)
                .into_iter()
                .map(|p| field(p).dot(p / radius) * d_area)
                .sum()
        }
        SurfaceKind::Cylinder => {
            let n = (samples as f64).sqrt().ceil() as usize;
            let d_theta = 2.0 * PI / n as f64;
            let d_h = CYLINDER_LENGTH / n as f64;
            let d_area = radius * d_theta * d_h;
            let mut total = 0.0;
            for j in 0..n {
                let h = -CYLINDER_LENGTH / 2.0 + (j as f64 + 0.5) * d_h;
                for i in 0..n {
                    let theta = (i as f64 + 0.5) * d_theta;
                    let normal = DVec3::new(theta.cos(), theta.sin(), 0.0);
                    total += field(normal * radius + DVec3::new(0.0, 0.0, h)).dot(normal) * d_area;
                }
            }
            total
        }
        SurfaceKind::Plane => {
            let n = ((samples / 2) as f64).sqrt().ceil().max(1.0) as usize;
            let step = PLANE_SIDE / n as f64;
            let d_area = step * step;
            let mut total = 0.0;
            for face in [1.0, -1.0] {
                let normal = DVec3::new(0.0, 0.0, face);
                for j in 0..n {
                    let y = -PLANE_SIDE / 2.0 + (j as f64 + 0.5) * step;
                    for i in 0..n {
                        let x = -PLANE_SIDE / 2.0 + (i as f64 + 0.5) * step;
                        total += field(DVec3::new(x, y, face * radius)).dot(normal) * d_area;
                    }
                }
            }
            total
        }
    };

    log::debug!("{} flux for {} e at radius {}: {:e}", kind, charge_e, radius, flux);
    Ok(flux)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{elementary_to_coulombs, enclosed_flux, ELEMENTARY_CHARGE};
    use approx::assert_relative_eq;

    #[test]
    fn surface_kind_parses_case_insensitively() {
        assert_eq!("sphere".parse::<SurfaceKind>(), Ok(SurfaceKind::Sphere));
        assert_eq!(" Cylinder".parse::<SurfaceKind>(), Ok(SurfaceKind::Cylinder));
        assert_eq!("PLANE".parse::<SurfaceKind>(), Ok(SurfaceKind::Plane));
        assert_eq!(
            "torus".parse::<SurfaceKind>(),
            Err(FieldError::UnknownSurface("torus".to_string()))
        );
    }

    #[test]
    fn radius_and_charge_bounds_are_enforced() {
        assert_eq!(validate_radius(1.0), Ok(1.0));
        assert_eq!(validate_radius(50.0), Ok(50.0));
        assert!(matches!(validate_radius(0.0), Err(FieldError::RadiusOutOfRange { .. })));
        assert!(matches!(validate_radius(51.0), Err(FieldError::RadiusOutOfRange { .. })));
        assert!(matches!(validate_radius(f64::NAN), Err(FieldError::RadiusOutOfRange { .. })));

        assert_eq!(validate_charge(-10.0), Ok(-10.0));
        assert!(matches!(validate_charge(11.0), Err(FieldError::ChargeOutOfRange { .. })));
        assert!(matches!(validate_charge(-11.0), Err(FieldError::ChargeOutOfRange { .. })));
    }

    #[test]
    fn sphere_matches_point_charge_law() {
        let q = ELEMENTARY_CHARGE;
        let pos = DVec3::new(3.0, -4.0, 12.0);
        let policy = SingularityPolicy::Clamp;
        let (e, v) = gaussian_term(SurfaceKind::Sphere, DVec3::zero(), q, pos, policy);
        let charge = PointCharge::new(q, DVec3::zero());
        let point = crate::field::coulomb_term(&charge, pos, policy).unwrap();
        assert_eq!(e, point.0);
        assert_eq!(v, point.1);
    }

    #[test]
    fn cylinder_field_is_radial_in_xy_and_falls_as_one_over_rho() {
        let q = ELEMENTARY_CHARGE;
        let center = DVec3::zero();
        let policy = SingularityPolicy::Clamp;
        let at = |pos| gaussian_term(SurfaceKind::Cylinder, center, q, pos, policy).0;
        let near = at(DVec3::new(5.0, 0.0, 30.0));
        let far = at(DVec3::new(0.0, 10.0, -7.0));
        assert_eq!(near.z, 0.0);
        assert_eq!(far.z, 0.0);
        assert!(near.x > 0.0 && far.y > 0.0);
        assert_relative_eq!(near.mag() / far.mag(), 2.0, max_relative = 1e-12);
    }

    #[test]
    fn cylinder_axis_is_finite_under_both_policies() {
        let pos = DVec3::new(0.0, 0.0, 12.0);
        for policy in [SingularityPolicy::Clamp, SingularityPolicy::Exclude] {
            let (e, v) = gaussian_term(SurfaceKind::Cylinder, DVec3::zero(), 1.0, pos, policy);
            assert_eq!(e, DVec3::zero());
            assert!(v.is_finite());
        }
    }

    #[test]
    fn plane_field_is_constant_and_flips_sign() {
        let q = -3.0 * ELEMENTARY_CHARGE;
        let center = DVec3::new(0.0, 0.0, 5.0);
        let policy = SingularityPolicy::Clamp;
        let at = |pos| gaussian_term(SurfaceKind::Plane, center, q, pos, policy).0;
        let above = at(DVec3::new(1.0, 2.0, 6.0));
        let far_above = at(DVec3::new(-40.0, 9.0, 90.0));
        let below = at(DVec3::new(1.0, 2.0, -20.0));
        let on = at(DVec3::new(7.0, 7.0, 5.0));

        assert_eq!(above, far_above);
        assert_eq!(above, -below);
        // negative sheet pulls inward
        assert!(above.z < 0.0);
        assert_eq!(above.x, 0.0);
        assert_eq!(on, DVec3::zero());
    }

    #[test]
    fn sphere_flux_matches_gauss_law() {
        for (charge_e, radius) in [(1.0, 25.0), (-4.0, 1.0), (10.0, 50.0)] {
            let flux = gauss_flux(SurfaceKind::Sphere, charge_e, radius, 2000).unwrap();
            assert_relative_eq!(
                flux,
                enclosed_flux(elementary_to_coulombs(charge_e)),
                max_relative = 1e-9
            );
        }
    }

    #[test]
    fn cylinder_and_plane_flux_match_gauss_law() {
        let expected = enclosed_flux(elementary_to_coulombs(2.5));
        let cylinder = gauss_flux(SurfaceKind::Cylinder, 2.5, 10.0, 1024).unwrap();
        let plane = gauss_flux(SurfaceKind::Plane, 2.5, 10.0, 1024).unwrap();
        assert_relative_eq!(cylinder, expected, max_relative = 1e-9);
        assert_relative_eq!(plane, expected, max_relative = 1e-9);
    }

    #[test]
    fn flux_rejects_out_of_range_input() {
        assert!(matches!(
            gauss_flux(SurfaceKind::Sphere, 1.0, 0.5, 100),
            Err(FieldError::RadiusOutOfRange { .. })
        ));
        assert!(matches!(
            gauss_flux(SurfaceKind::Sphere, 12.0, 5.0, 100),
            Err(FieldError::ChargeOutOfRange { .. })
        ));
        assert!(matches!(
            gauss_flux(SurfaceKind::Plane, 1.0, 5.0, 2),
            Err(FieldError::TooFewSamples { .. })
        ));
    }

    #[test]
    fn sphere_mesh_lies_on_the_surface() {
        let center = DVec3::new(1.0, -2.0, 3.0);
        let mesh = surface_mesh(SurfaceKind::Sphere, center, 25.0, 20).unwrap();
        assert_eq!(mesh.points.len(), 400);
        for p in &mesh.points {
            let r = (DVec3::new(p[0], p[1], p[2]) - center).mag();
            assert_relative_eq!(r, 25.0, max_relative = 1e-12);
        }
    }

    #[test]
    fn cylinder_and_plane_meshes_span_their_extent() {
        let cyl = surface_mesh(SurfaceKind::Cylinder, DVec3::zero(), 10.0, 5).unwrap();
        assert_eq!(cyl.point(0, 0), [10.0, 0.0, -50.0]);
        assert_eq!(cyl.point(4, 0)[2], 50.0);

        let plane = surface_mesh(SurfaceKind::Plane, DVec3::zero(), 12.0, 3).unwrap();
        assert_eq!(plane.point(0, 0), [-50.0, -50.0, 12.0]);
        assert_eq!(plane.point(2, 2), [50.0, 50.0, 12.0]);
        assert_eq!(plane.point(1, 1), [0.0, 0.0, 12.0]);

        assert!(matches!(
            surface_mesh(SurfaceKind::Plane, DVec3::zero(), 12.0, 1),
            Err(FieldError::TooFewSamples { .. })
        ));
    }

    #[test]
    fn gaussian_field_rejects_non_finite_charge() {
        let grid = SampleGrid::cube(-1.0, 1.0, 2).unwrap();
        let policy = SingularityPolicy::Clamp;
        assert_eq!(
            gaussian_field(SurfaceKind::Sphere, DVec3::zero(), f64::NAN, &grid, policy),
            Err(FieldError::NonFiniteCharge { index: 0 })
        );
    }
}
