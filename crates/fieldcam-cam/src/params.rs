//! Surfacing parameters and their resolved fallbacks.

use serde::{Deserialize, Serialize};

use fieldcam_math::{BoundingBox3, Vec3};
use fieldcam_sdf::SdfNode;

use crate::error::{CamError, Result};
use crate::heightfield::drop_cutter;
use crate::tool::ToolDefinition;

/// Raster surfacing settings. Every unset option falls back to a value
/// derived from the tool or the part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolpathParams {
    /// Distance between raster lines (default 40% of the tool diameter).
    pub stepover: Option<f64>,
    /// Sample spacing along a line (default half the stepover, at least 0.01).
    pub resolution: Option<f64>,
    /// Retract plane (default 5 mm above the stock top).
    pub safe_height: Option<f64>,
    /// Material boundary (default part bounds, XY grown by the tool radius).
    pub stock: Option<BoundingBox3>,
    /// Raster direction in degrees from +X.
    pub raster_angle: f64,
    /// Height search tolerance (default 0.001).
    pub tolerance: Option<f64>,
    /// Height jump that forces a retract (default: the stepover).
    pub wall_threshold: Option<f64>,
    /// Feed used to time rapid moves in mm/min (default 5000).
    pub rapid_rate: Option<f64>,
}

impl Default for ToolpathParams {
    fn default() -> Self {
        Self {
            stepover: None,
            resolution: None,
            safe_height: None,
            stock: None,
            raster_angle: 0.0,
            tolerance: None,
            wall_threshold: None,
            rapid_rate: None,
        }
    }
}

/// Parameters with fallbacks applied and validated.
#[derive(Debug, Clone)]
pub(crate) struct Setup {
    pub stock: BoundingBox3,
    pub stepover: f64,
    pub resolution: f64,
    pub safe_height: f64,
    pub raster_angle: f64,
    pub tolerance: f64,
    pub wall_threshold: f64,
    pub rapid_rate: f64,
    pub radius: f64,
    pub feed_rate: f64,
    pub plunge_rate: f64,
}

fn positive(value: Option<f64>, fallback: f64, err: fn(f64) -> CamError) -> Result<f64> {
    match value {
        Some(v) if !(v.is_finite() && v > 0.0) => Err(err(v)),
        Some(v) => Ok(v),
        None => Ok(fallback),
    }
}

fn positive_param(name: &'static str, value: Option<f64>, fallback: f64) -> Result<f64> {
    match value {
        Some(v) if !(v.is_finite() && v > 0.0) => Err(CamError::InvalidParameter { name, value: v }),
        Some(v) => Ok(v),
        None => Ok(fallback),
    }
}

impl Setup {
    /// Apply fallbacks and validate.
    ///
    /// Returns `None` when no stock was given and the part has no material.
    pub fn resolve(
        root: &SdfNode,
        tool: &ToolDefinition,
        params: &ToolpathParams,
    ) -> Result<Option<Setup>> {
        tool.validate()?;
        let radius = tool.radius();

        let stepover = positive(params.stepover, tool.diameter * 0.4, CamError::InvalidStepover)?;
        let resolution = positive(
            params.resolution,
            (stepover / 2.0).max(0.01),
            CamError::InvalidResolution,
        )?;
        let tolerance = positive(params.tolerance, 1e-3, CamError::InvalidTolerance)?;
        let wall_threshold = positive_param("wall threshold", params.wall_threshold, stepover)?;
        let rapid_rate = positive_param("rapid rate", params.rapid_rate, 5000.0)?;
        if !params.raster_angle.is_finite() {
            return Err(CamError::InvalidParameter {
                name: "raster angle",
                value: params.raster_angle,
            });
        }

        let stock = match params.stock {
            Some(stock) => stock,
            None => {
                let bounds = root.bounds();
                if bounds.is_empty() {
                    return Ok(None);
                }
                if !bounds.is_finite() {
                    return Err(CamError::UnboundedStock);
                }
                bounds.expanded_by(&Vec3::new(radius, radius, 0.0))
            }
        };
        if stock.is_empty() {
            return Err(CamError::EmptyStock);
        }
        if !stock.is_finite() {
            return Err(CamError::UnboundedStock);
        }
        let size = stock.size();
        if size.x <= 0.0 || size.y <= 0.0 {
            return Err(CamError::EmptyStock);
        }

        let top = stock.max.z;
        let safe_height = params.safe_height.unwrap_or(top + 5.0);
        if !safe_height.is_finite() || safe_height < top {
            return Err(CamError::SafeHeightBelowStock {
                safe: safe_height,
                top,
            });
        }

        Ok(Some(Setup {
            stock,
            stepover,
            resolution,
            safe_height,
            raster_angle: params.raster_angle.to_radians(),
            tolerance,
            wall_threshold,
            rapid_rate,
            radius,
            feed_rate: tool.feed_rate,
            plunge_rate: tool.plunge_rate,
        }))
    }

    /// Tool-tip height at (x, y), resting on the stock floor where the column is clear.
    pub fn tip_height(&self, root: &SdfNode, x: f64, y: f64) -> f64 {
        let floor = self.stock.min.z;
        drop_cutter(root, self.radius, x, y, self.stock.max.z, floor, self.tolerance)
            .map_or(floor, |z| z.max(floor))
    }
}
