//! Error types for toolpath generation.

use thiserror::Error;

/// Configuration errors, raised before any sampling begins.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CamError {
    /// Stepover is not a positive finite distance.
    #[error("invalid stepover: {0} (must be positive)")]
    InvalidStepover(f64),

    /// Sampling resolution is not a positive finite distance.
    #[error("invalid resolution: {0} (must be positive)")]
    InvalidResolution(f64),

    /// Search tolerance is not a positive finite distance.
    #[error("invalid tolerance: {0} (must be positive)")]
    InvalidTolerance(f64),

    /// Any other numeric setting is out of range.
    #[error("invalid {name}: {value}")]
    InvalidParameter {
        /// Setting name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },

    /// Tool geometry or cutting parameters are unusable.
    #[error("invalid tool: {0}")]
    InvalidTool(String),

    /// The field has no bounded extent and no stock was given.
    #[error("field is unbounded and no stock boundary was given")]
    UnboundedStock,

    /// The stock box is empty or has no XY area.
    #[error("stock boundary is empty")]
    EmptyStock,

    /// Retract plane lies inside the stock.
    #[error("safe height {safe} is below the stock top {top}")]
    SafeHeightBelowStock {
        /// Requested safe height.
        safe: f64,
        /// Top of the stock.
        top: f64,
    },

    /// Stepover exceeds the stock extent across the raster direction.
    #[error("stepover {stepover} produces no raster lines across a stock extent of {extent}")]
    NoRasterLines {
        /// Requested stepover.
        stepover: f64,
        /// Stock extent perpendicular to the raster lines.
        extent: f64,
    },
}

/// Result type for toolpath generation.
pub type Result<T> = std::result::Result<T, CamError>;
