// export.rs
// Serializes plot documents for an external renderer

use crate::error::ConfigError;
use crate::plot::FieldPlot;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!("unknown export format '{}', expected json or csv", other)),
        }
    }
}

pub fn render_plot(plot: &FieldPlot, format: ExportFormat) -> Result<String, ConfigError> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(plot)?),
        ExportFormat::Csv => Ok(render_csv(plot)),
    }
}

/// Write `plot` to `path`, creating parent directories as needed.
pub fn write_plot(plot: &FieldPlot, format: ExportFormat, path: &Path) -> Result<(), ConfigError> {
    let content = render_plot(plot, format)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, content)?;
    log::info!("wrote {} arrows to {}", plot.arrows.len(), path.display());
    Ok(())
}

fn render_csv(plot: &FieldPlot) -> String {
    let mut content = String::new();

    // Header comments
    let _ = writeln!(content, "# Title: {}", plot.title);
    let _ = writeln!(content, "# Max magnitude (N/C): {:e}", plot.max_magnitude);
    for marker in &plot.markers {
        let _ = writeln!(
            content,
            "# Charge: {} at ({}, {}, {}) q={:e} visible={}",
            marker.label,
            marker.position[0],
            marker.position[1],
            marker.position[2],
            marker.charge,
            marker.visible
        );
    }
    if let Some(surface) = &plot.surface {
        let _ = writeln!(
            content,
            "# Surface: {} radius={}",
            surface.mesh.kind, surface.mesh.radius
        );
    }

    content.push_str("x_start,y_start,z_start,x_end,y_end,z_end,relative_magnitude\n");
    for arrow in &plot.arrows {
        let _ = writeln!(
            content,
            "{},{},{},{},{},{},{}",
            arrow.start[0],
            arrow.start[1],
            arrow.start[2],
            arrow.end[0],
            arrow.end[1],
            arrow.end[2],
            arrow.relative_magnitude
        );
    }
    content
}
