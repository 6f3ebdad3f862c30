//! Cutting tool definitions.

use serde::{Deserialize, Serialize};

use crate::error::{CamError, Result};

/// Tip geometry of a cutter.
///
/// The surfacing oracle treats every shape as its radius envelope; the shape
/// is kept for setup sheets and for callers that post-correct heights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolShape {
    /// Flat end mill.
    Flat,
    /// Ball end mill.
    Ball,
    /// V-bit or engraving cutter.
    Conical {
        /// Included angle in degrees.
        angle: f64,
    },
}

/// A cutter with its cutting parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolDefinition {
    /// Cutting diameter in mm.
    pub diameter: f64,
    /// Tip geometry.
    pub shape: ToolShape,
    /// Cutting feed rate in mm/min.
    pub feed_rate: f64,
    /// Feed rate for Z-only plunges in mm/min.
    pub plunge_rate: f64,
    /// Spindle speed in RPM.
    pub spindle_rpm: f64,
    /// Tool table position.
    pub number: u32,
}

impl Default for ToolDefinition {
    fn default() -> Self {
        Self {
            diameter: 6.0,
            shape: ToolShape::Ball,
            feed_rate: 1000.0,
            plunge_rate: 300.0,
            spindle_rpm: 12000.0,
            number: 1,
        }
    }
}

impl ToolDefinition {
    /// Flat end mill of the given diameter with default feeds.
    pub fn flat(diameter: f64) -> Self {
        Self {
            diameter,
            shape: ToolShape::Flat,
            ..Self::default()
        }
    }

    /// Ball end mill of the given diameter with default feeds.
    pub fn ball(diameter: f64) -> Self {
        Self {
            diameter,
            shape: ToolShape::Ball,
            ..Self::default()
        }
    }

    /// Conical cutter with the given widest diameter and included angle.
    pub fn conical(diameter: f64, angle: f64) -> Self {
        Self {
            diameter,
            shape: ToolShape::Conical { angle },
            ..Self::default()
        }
    }

    /// Set the cutting and plunge feeds.
    pub fn with_feeds(mut self, feed_rate: f64, plunge_rate: f64) -> Self {
        self.feed_rate = feed_rate;
        self.plunge_rate = plunge_rate;
        self
    }

    /// Cutting radius in mm.
    pub fn radius(&self) -> f64 {
        self.diameter / 2.0
    }

    /// Check geometry and feeds.
    pub fn validate(&self) -> Result<()> {
        if !(self.diameter.is_finite() && self.diameter > 0.0) {
            return Err(CamError::InvalidTool(format!(
                "diameter must be positive, got {}",
                self.diameter
            )));
        }
        if !(self.feed_rate.is_finite() && self.feed_rate > 0.0) {
            return Err(CamError::InvalidTool(format!(
                "feed rate must be positive, got {}",
                self.feed_rate
            )));
        }
        if !(self.plunge_rate.is_finite() && self.plunge_rate > 0.0) {
            return Err(CamError::InvalidTool(format!(
                "plunge rate must be positive, got {}",
                self.plunge_rate
            )));
        }
        if !(self.spindle_rpm.is_finite() && self.spindle_rpm >= 0.0) {
            return Err(CamError::InvalidTool(format!(
                "spindle speed must be non-negative, got {}",
                self.spindle_rpm
            )));
        }
        if let ToolShape::Conical { angle } = self.shape {
            if !(angle > 0.0 && angle < 180.0) {
                return Err(CamError::InvalidTool(format!(
                    "included angle must be in (0, 180), got {angle}"
                )));
            }
        }
        Ok(())
    }
}
