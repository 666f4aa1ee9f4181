// plot.rs
// Assembles field arrows, charge markers and surface overlays into a renderer-neutral document

use crate::charge::PointCharge;
use crate::config::{
    vec3, SamplerConfig, ARROW_COLOR, BACKGROUND_COLOR, CHARGE_MARKER_SIZE,
    ELECTRON_COLOR, PLOT_HEIGHT, PLOT_WIDTH, PROTON_COLOR, SURFACE_MESH_RESOLUTION,
    SURFACE_OPACITY,
};
use crate::display::{arrows, scale_samples, Arrow};
use crate::error::ConfigError;
use crate::field::{evaluate_field_with, FieldSample};
use crate::gauss::{gaussian_field, surface_mesh, SurfaceMesh};
use crate::request::{DipoleRequest, GaussianRequest};
use serde::{Deserialize, Serialize};
use ultraviolet::DVec3;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChargeMarker {
    pub label: String,
    pub position: [f64; 3],
    /// Signed charge in coulombs
    pub charge: f64,
    pub color: String,
    pub size: f64,
    /// Hidden markers are still emitted so marker indices stay stable between toggles.
    pub visible: bool,
}

impl ChargeMarker {
    fn new(label: &str, charge: &PointCharge, color: &str, visible: bool) -> Self {
        Self {
            label: label.to_string(),
            position: [charge.position.x, charge.position.y, charge.position.z],
            charge: charge.magnitude,
            color: color.to_string(),
            size: if visible { CHARGE_MARKER_SIZE } else { 0.0 },
            visible,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SurfaceOverlay {
    pub name: String,
    pub opacity: f64,
    pub mesh: SurfaceMesh,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlotLayout {
    pub axis_range: [f64; 2],
    pub width: u32,
    pub height: u32,
    pub background: String,
}

impl PlotLayout {
    fn from_config(config: &SamplerConfig) -> Self {
        Self {
            axis_range: [-config.view_range, config.view_range],
            width: PLOT_WIDTH,
            height: PLOT_HEIGHT,
            background: BACKGROUND_COLOR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldPlot {
    pub title: String,
    pub arrow_color: String,
    pub arrows: Vec<Arrow>,
    /// Raw field magnitude of a full-length arrow (N/C)
    pub max_magnitude: f64,
    pub markers: Vec<ChargeMarker>,
    pub surface: Option<SurfaceOverlay>,
    pub layout: PlotLayout,
}

/// Scale samples and keep the arrows above the visibility cutoff.
fn arrows_for(
    samples: &[FieldSample],
    config: &SamplerConfig,
) -> Result<(Vec<Arrow>, f64), ConfigError> {
    let scaled = scale_samples(samples, &config.display)?;
    let starts: Vec<DVec3> = samples.iter().map(|s| s.position).collect();
    let arrows = arrows(&starts, &scaled, &config.display)?;
    log::debug!(
        "{} of {} arrows above cutoff {}",
        arrows.len(),
        samples.len(),
        config.display.visibility_cutoff
    );
    Ok((arrows, scaled.max_magnitude))
}

/// Proton/electron scene with optional extra charges from the configuration.
///
/// Toggled-off charges contribute no field but keep a hidden marker. When nothing is
/// visible the plot has markers only.
pub fn dipole_plot(
    config: &SamplerConfig,
    request: &DipoleRequest,
) -> Result<FieldPlot, ConfigError> {
    config.validate()?;
    let grid = config.grid.to_grid()?;
    let proton = config.proton();
    let electron = config.electron();

    let mut markers = vec![
        ChargeMarker::new("Proton", &proton, PROTON_COLOR, request.proton),
        ChargeMarker::new("Electron", &electron, ELECTRON_COLOR, request.electron),
    ];
    let mut charges = Vec::new();
    if request.proton {
        charges.push(proton);
    }
    if request.electron {
        charges.push(electron);
    }
    for extra in &config.charges {
        let charge = extra.to_point_charge()?;
        let color = if charge.magnitude >= 0.0 { PROTON_COLOR } else { ELECTRON_COLOR };
        markers.push(ChargeMarker::new(&extra.display_label(), &charge, color, true));
        charges.push(charge);
    }

    let (arrows, max_magnitude) = if charges.is_empty() {
        log::info!("no visible charges, emitting markers only");
        (Vec::new(), 0.0)
    } else {
        let samples = evaluate_field_with(&charges, &grid, config.singularity)?;
        arrows_for(&samples, config)?
    };

    Ok(FieldPlot {
        title: "Electric field of a proton and an electron".to_string(),
        arrow_color: ARROW_COLOR.to_string(),
        arrows,
        max_magnitude,
        markers,
        surface: None,
        layout: PlotLayout::from_config(config),
    })
}

/// Closed-form field of a Gaussian surface with its overlay mesh.
///
/// A zero enclosed charge has no field to draw, so the plot carries the overlay and
/// marker only, matching a dipole scene with every charge hidden.
pub fn gaussian_plot(
    config: &SamplerConfig,
    request: &GaussianRequest,
) -> Result<FieldPlot, ConfigError> {
    config.validate()?;
    let grid = config.grid.to_grid()?;
    let center = vec3(config.gaussian_center);
    let q = request.charge_coulombs();

    let (arrows, max_magnitude) = if q == 0.0 {
        log::info!("neutral enclosed charge, emitting the surface without arrows");
        (Vec::new(), 0.0)
    } else {
        let samples = gaussian_field(request.surface, center, q, &grid, config.singularity)?;
        arrows_for(&samples, config)?
    };

    let enclosed = PointCharge::new(q, center);
    let color = if q >= 0.0 { PROTON_COLOR } else { ELECTRON_COLOR };
    let mesh = surface_mesh(request.surface, center, request.radius, SURFACE_MESH_RESOLUTION)?;

    Ok(FieldPlot {
        title: format!("{} Gaussian surface", request.surface.title()),
        arrow_color: ARROW_COLOR.to_string(),
        arrows,
        max_magnitude,
        markers: vec![ChargeMarker::new("Enclosed charge", &enclosed, color, true)],
        surface: Some(SurfaceOverlay {
            name: format!("{} Gaussian Surface", request.surface.title()),
            opacity: SURFACE_OPACITY,
            mesh,
        }),
        layout: PlotLayout::from_config(config),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldError;
    use crate::gauss::SurfaceKind;

    #[test]
    fn dipole_plot_has_arrows_and_both_markers() {
        let config = SamplerConfig::default();
        let plot = dipole_plot(&config, &DipoleRequest::default()).unwrap();

        assert!(!plot.arrows.is_empty());
        assert!(plot.arrows.len() < 1000);
        assert!(plot
            .arrows
            .iter()
            .all(|a| a.relative_magnitude > config.display.visibility_cutoff
                && a.relative_magnitude <= 1.0));
        assert!(plot.arrows.iter().any(|a| a.relative_magnitude == 1.0));
        assert_eq!(plot.markers.len(), 2);
        assert!(plot.markers.iter().all(|m| m.visible));
        assert_eq!(plot.layout.axis_range, [-75.0, 75.0]);
        assert!(plot.surface.is_none());
    }

    #[test]
    fn hidden_charge_keeps_an_invisible_marker() {
        let config = SamplerConfig::default();
        let request = DipoleRequest {
            proton: false,
            electron: true,
        };
        let plot = dipole_plot(&config, &request).unwrap();
        assert_eq!(plot.markers[0].label, "Proton");
        assert!(!plot.markers[0].visible);
        assert_eq!(plot.markers[0].size, 0.0);
        assert!(plot.markers[1].visible);

        // Only the electron contributes, so every arrow points toward it.
        let electron = config.electron().position;
        for arrow in &plot.arrows {
            let start = vec3(arrow.start);
            let dir = vec3(arrow.end) - start;
            assert!(dir.dot(electron - start) > 0.0);
        }
    }

    #[test]
    fn no_visible_charges_yields_markers_only() {
        let request = DipoleRequest {
            proton: false,
            electron: false,
        };
        let plot = dipole_plot(&SamplerConfig::default(), &request).unwrap();
        assert!(plot.arrows.is_empty());
        assert_eq!(plot.markers.len(), 2);
        assert!(plot.markers.iter().all(|m| !m.visible));
    }

    #[test]
    fn gaussian_plot_carries_the_surface_overlay() {
        let config = SamplerConfig::default();
        for surface in SurfaceKind::ALL {
            let request = GaussianRequest::new(surface, 20.0, -2.0).unwrap();
            let plot = gaussian_plot(&config, &request).unwrap();
            let overlay = plot.surface.expect("overlay");
            assert_eq!(overlay.mesh.kind, surface);
            assert_eq!(
                overlay.mesh.points.len(),
                SURFACE_MESH_RESOLUTION * SURFACE_MESH_RESOLUTION
            );
            assert_eq!(plot.markers.len(), 1);
            assert!(plot.markers[0].charge < 0.0);
        }
    }

    #[test]
    fn neutral_gaussian_charge_yields_overlay_without_arrows() {
        let config = SamplerConfig::default();
        for surface in SurfaceKind::ALL {
            let request = GaussianRequest::new(surface, 25.0, 0.0).unwrap();
            let plot = gaussian_plot(&config, &request).unwrap();
            assert!(plot.arrows.is_empty());
            assert_eq!(plot.max_magnitude, 0.0);
            assert_eq!(plot.markers.len(), 1);
            assert_eq!(plot.markers[0].charge, 0.0);
            assert_eq!(plot.surface.expect("overlay").mesh.kind, surface);
        }
    }

    #[test]
    fn plane_plot_has_only_vertical_arrows() {
        let config = SamplerConfig::default();
        let request = GaussianRequest::new(SurfaceKind::Plane, 10.0, 1.0).unwrap();
        let plot = gaussian_plot(&config, &request).unwrap();
        // uniform magnitude: every off-sheet sample is a full-length arrow
        assert_eq!(plot.arrows.len(), 1000);
        for arrow in &plot.arrows {
            assert_eq!(arrow.start[0], arrow.end[0]);
            assert_eq!(arrow.start[1], arrow.end[1]);
            assert_eq!(arrow.relative_magnitude, 1.0);
        }
    }

    #[test]
    fn programmatic_view_range_is_checked_before_plotting() {
        let mut config = SamplerConfig::default();
        config.view_range = -75.0;
        let err = dipole_plot(&config, &DipoleRequest::default()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Field(FieldError::InvalidSetting { name: "view_range", .. })
        ));
    }

    #[test]
    fn malformed_grid_surfaces_as_validation_error() {
        let mut config = SamplerConfig::default();
        config.grid.y.count = 0;
        let err = dipole_plot(&config, &DipoleRequest::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Field(FieldError::EmptyAxis { axis: 'y' })));
    }
}
