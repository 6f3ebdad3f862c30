#![warn(missing_docs)]

//! Fanuc-dialect G-code emission for fieldcam toolpaths.
//!
//! The emitter is a pure serializer: it writes the header, one motion line
//! per point that moves an axis, and the footer. It performs no geometry and
//! never fails.
//!
//! # Example
//!
//! ```
//! use fieldcam_cam::{ToolpathPoint, ToolpathResult};
//! use fieldcam_gcode::{emit_fanuc_gcode, GCodeConfig};
//! use fieldcam_math::Point3;
//!
//! let path = ToolpathResult::new(vec![
//!     ToolpathPoint::feed(Point3::new(0.0, 0.0, 0.0), 800.0),
//!     ToolpathPoint::feed(Point3::new(20.0, 0.0, 0.0), 800.0),
//! ]);
//! let program = emit_fanuc_gcode(&path, &GCodeConfig::default());
//! assert!(program.contains("G01 X0.000 Y0.000 Z0.000 F800.0\nX20.000\n"));
//! ```

mod config;
mod fanuc;

pub use config::{GCodeConfig, Units};
pub use fanuc::{emit_fanuc_gcode, format_coord};
