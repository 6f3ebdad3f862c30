#![warn(missing_docs)]

//! Signed-distance-field modelling for fieldcam.
//!
//! Solids are trees of [`SdfNode`]s: primitives, booleans (hard and smooth),
//! affine transforms, modifiers, and 2D [`Profile2D`]s lifted by extrude or
//! revolve. A tree evaluates to a signed distance at any point (negative
//! inside) and reports a conservative bounding box.
//!
//! Subtrees can carry a [`Feature`] descriptor; the mesher uses
//! [`collect_features`] to label the faces each feature produced.
//!
//! # Example
//!
//! ```
//! use fieldcam_sdf::{hole, HoleOptions, SdfNode};
//! use fieldcam_math::{Point3, Vec3};
//!
//! let plate = SdfNode::cuboid(Vec3::new(40.0, 20.0, 10.0)).unwrap();
//! let drilled = plate.subtract(
//!     hole(HoleOptions {
//!         position: Point3::new(0.0, 0.0, 5.0),
//!         diameter: 6.0,
//!         depth: 10.0,
//!         ..Default::default()
//!     })
//!     .unwrap(),
//! );
//!
//! // The hole axis is empty space, the plate corner is solid
//! assert!(drilled.eval(&Point3::new(0.0, 0.0, 0.0)) > 0.0);
//! assert!(drilled.eval(&Point3::new(15.0, 5.0, 0.0)) < 0.0);
//! ```

mod construct;
mod error;
mod node;
pub mod primitives;
mod profile;
mod topology;

pub use error::{Result, SdfError};
pub use node::SdfNode;
pub use profile::Profile2D;
pub use topology::{
    collect_features, hole, EdgeKind, FaceKind, Feature, FeatureId, FeatureRegion, HoleOptions,
};
