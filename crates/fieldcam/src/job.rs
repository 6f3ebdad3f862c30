//! Job settings and the end-to-end pipeline.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use fieldcam_cam::{generate_raster_surfacing, ToolDefinition, ToolpathParams, ToolpathResult};
use fieldcam_gcode::{emit_fanuc_gcode, GCodeConfig};
use fieldcam_mesh::{mesh_in_bounds, mesh_with_params, MeshParams, TriangleMesh};
use fieldcam_sdf::SdfNode;

/// Settings for one machining job. Every section and key may be omitted.
///
/// ```toml
/// [mesh]
/// resolution = { cells = 96 }
///
/// [tool]
/// diameter = 6.0
/// shape = { type = "Ball" }
///
/// [toolpath]
/// stepover = 1.5
///
/// [gcode]
/// program_number = 12
/// units = "inches"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    /// Mesher settings.
    pub mesh: MeshParams,
    /// Cutter and feeds.
    pub tool: ToolDefinition,
    /// Raster surfacing settings.
    pub toolpath: ToolpathParams,
    /// Program output settings.
    pub gcode: GCodeConfig,
}

impl JobConfig {
    /// Parse a job from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("parsing job config")
    }

    /// Load a job from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading job config {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Render the job as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).context("serializing job config")
    }

    /// Program settings with the tool number and spindle speed taken from the tool.
    pub fn program_config(&self) -> GCodeConfig {
        let mut config = self.gcode.clone();
        config.tool_number = self.tool.number;
        if config.spindle_rpm.is_none() && self.tool.spindle_rpm > 0.0 {
            config.spindle_rpm = Some(self.tool.spindle_rpm);
        }
        config
    }
}

/// Everything a job produces.
#[derive(Debug, Clone)]
pub struct JobOutput {
    /// Surface mesh for display and export.
    pub mesh: TriangleMesh,
    /// Raster surfacing toolpath.
    pub toolpath: ToolpathResult,
    /// Fanuc program text.
    pub gcode: String,
}

/// Mesh the part, surface it and post the program.
///
/// Unbounded parts are meshed inside the configured stock.
pub fn run_job(part: &SdfNode, config: &JobConfig) -> Result<JobOutput> {
    tracing::info!(nodes = part.node_count(), "running job");

    let bounds = part.bounds();
    let mesh = match config.toolpath.stock {
        Some(stock) if !bounds.is_empty() && !bounds.is_finite() => {
            mesh_in_bounds(part, &stock, &config.mesh)
        }
        _ => mesh_with_params(part, &config.mesh),
    };

    let toolpath = generate_raster_surfacing(part, &config.tool, &config.toolpath)
        .context("generating raster surfacing")?;
    let gcode = emit_fanuc_gcode(&toolpath, &config.program_config());

    tracing::info!(
        triangles = mesh.num_triangles(),
        points = toolpath.stats.point_count,
        minutes = toolpath.stats.estimated_time,
        "job complete"
    );
    Ok(JobOutput {
        mesh,
        toolpath,
        gcode,
    })
}

/// Read a part tree from JSON and check its parameters.
pub fn load_part(path: impl AsRef<Path>) -> Result<SdfNode> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading part {}", path.display()))?;
    let part: SdfNode =
        serde_json::from_str(&text).with_context(|| format!("parsing part {}", path.display()))?;
    part.validate().with_context(|| format!("invalid part {}", path.display()))?;
    Ok(part)
}

/// Write a part tree as JSON.
pub fn save_part(part: &SdfNode, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let text = serde_json::to_string_pretty(part).context("serializing part")?;
    std::fs::write(path, text).with_context(|| format!("writing part {}", path.display()))
}
