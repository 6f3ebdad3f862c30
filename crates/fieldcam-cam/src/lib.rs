#![warn(missing_docs)]

//! Raster-surfacing toolpaths for fieldcam SDF trees.
//!
//! Tool heights are found by dropping the tool onto the distance field
//! offset by its radius, the same field the mesher extracts, so the cut
//! surface matches the exported mesh.
//!
//! # Example
//!
//! ```
//! use fieldcam_cam::{generate_raster_surfacing, ToolDefinition, ToolpathParams};
//! use fieldcam_math::Vec3;
//! use fieldcam_sdf::SdfNode;
//!
//! let part = SdfNode::cuboid(Vec3::new(20.0, 20.0, 5.0)).unwrap();
//! let tool = ToolDefinition::ball(6.0);
//! let path = generate_raster_surfacing(&part, &tool, &ToolpathParams::default()).unwrap();
//! assert!(path.stats.path_length > 0.0);
//! ```

mod error;
mod heightfield;
mod params;
mod raster;
mod tool;
mod toolpath;

pub use error::{CamError, Result};
pub use heightfield::{drop_cutter, sample_height_field, HeightField};
pub use params::ToolpathParams;
pub use raster::{generate_raster_surfacing, simplify_pass};
pub use tool::{ToolDefinition, ToolShape};
pub use toolpath::{Motion, ToolpathPoint, ToolpathResult, ToolpathStats};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CamError::NoRasterLines {
            stepover: 30.0,
            extent: 20.0,
        };
        assert_eq!(
            err.to_string(),
            "stepover 30 produces no raster lines across a stock extent of 20"
        );
        assert_eq!(
            CamError::SafeHeightBelowStock { safe: 1.0, top: 2.5 }.to_string(),
            "safe height 1 is below the stock top 2.5"
        );
    }

    #[test]
    fn test_toolpath_serialization() {
        let result = ToolpathResult::new(vec![
            ToolpathPoint::rapid(fieldcam_math::Point3::new(0.0, 0.0, 5.0), 5000.0),
            ToolpathPoint::feed(fieldcam_math::Point3::new(0.0, 0.0, 0.0), 300.0),
        ]);
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"Rapid\""));
        let parsed: ToolpathResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }
}
