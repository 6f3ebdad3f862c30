#![warn(missing_docs)]

//! fieldcam: signed-distance-field parts to meshes, toolpaths and G-code.
//!
//! Build a part as an [`SdfNode`] tree, then either call the stages
//! directly ([`mesh`], [`generate_raster_surfacing`], [`emit_fanuc_gcode`])
//! or run them together with [`run_job`] and a [`JobConfig`].
//!
//! # Example
//!
//! ```
//! use fieldcam::{hole, run_job, HoleOptions, JobConfig, Point3, Resolution, SdfNode, Vec3};
//!
//! let plate = SdfNode::cuboid(Vec3::new(30.0, 20.0, 8.0)).unwrap();
//! let part = plate.subtract(
//!     hole(HoleOptions {
//!         position: Point3::new(0.0, 0.0, 4.0),
//!         diameter: 6.0,
//!         depth: 5.0,
//!         ..Default::default()
//!     })
//!     .unwrap(),
//! );
//!
//! let mut config = JobConfig::default();
//! config.mesh.resolution = Resolution::Cells(32);
//! let output = run_job(&part, &config).unwrap();
//! assert!(!output.mesh.is_empty());
//! assert!(output.gcode.ends_with("M30\n%\n"));
//! ```

mod job;

pub use job::{load_part, run_job, save_part, JobConfig, JobOutput};

pub use fieldcam_cam::{
    generate_raster_surfacing, sample_height_field, CamError, HeightField, Motion, ToolDefinition,
    ToolShape, ToolpathParams, ToolpathPoint, ToolpathResult, ToolpathStats,
};
pub use fieldcam_gcode::{emit_fanuc_gcode, GCodeConfig, Units};
pub use fieldcam_math::{BoundingBox2, BoundingBox3, Point2, Point3, Vec2, Vec3};
pub use fieldcam_mesh::{mesh, mesh_in_bounds, mesh_with_params, MeshParams, Resolution, TriangleMesh};
pub use fieldcam_sdf::{
    collect_features, hole, EdgeKind, FaceKind, Feature, FeatureId, HoleOptions, Profile2D, SdfError,
    SdfNode,
};

/// Install a `tracing` subscriber printing to stderr.
///
/// `filter` uses `RUST_LOG` syntax; without it `RUST_LOG` is read and
/// `info` is the default level.
pub fn init_logging(filter: Option<&str>) -> anyhow::Result<()> {
    use anyhow::Context;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = match filter {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid log filter {directives:?}"))?,
        None => EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .context("installing tracing subscriber")?;

    tracing::debug!("logging initialized");
    Ok(())
}
