//! Named topology: feature descriptors attached to subtrees.
//!
//! A [`Feature`] is side metadata carried by [`SdfNode::Tagged`]. It never
//! changes the distance a tree evaluates to. The mesher calls
//! [`collect_features`] to recover each tagged subtree as a world-space field
//! and labels the triangles that subtree is responsible for.

use std::fmt;

use serde::{Deserialize, Serialize};

use fieldcam_math::{Point3, Vec3};

use crate::error::{finite_vec, non_negative, positive, Result, SdfError};
use crate::SdfNode;

/// Stable caller-assigned feature identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FeatureId(pub u32);

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F{}", self.0)
    }
}

/// Surface class of a feature's faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceKind {
    /// Flat face.
    Planar,
    /// Cylindrical wall (holes, bosses).
    Cylindrical,
    /// Conical face (drill points, countersinks).
    Conical,
    /// Spherical face.
    Spherical,
    /// Toroidal face.
    Toroidal,
    /// Anything else, including smooth blends.
    Freeform,
}

/// Class of the boundary edges where a feature meets the rest of the part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Sharp crease.
    Sharp,
    /// Rounded blend.
    Fillet,
    /// Bevelled edge.
    Chamfer,
    /// Tangent-continuous transition.
    Smooth,
}

/// Descriptor attached to a tagged subtree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Feature {
    /// Identifier, unique within a part.
    pub id: FeatureId,
    /// Human-readable name.
    pub name: String,
    /// Face classification.
    pub face_kind: FaceKind,
    /// Boundary edge classification.
    pub edge_kind: EdgeKind,
}

impl Feature {
    /// Create a feature descriptor.
    pub fn new(id: u32, name: impl Into<String>, face_kind: FaceKind, edge_kind: EdgeKind) -> Self {
        Self {
            id: FeatureId(id),
            name: name.into(),
            face_kind,
            edge_kind,
        }
    }
}

/// A tagged subtree resolved into world space.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRegion {
    /// The attached descriptor.
    pub feature: Feature,
    /// Field of the tagged subtree with every enclosing transform applied.
    pub field: SdfNode,
    /// Centre of the field's bounding box, used to break tagging ties.
    pub center: Point3,
}

/// Collect every tagged subtree of `root` in depth-first, left-to-right order.
///
/// Transform and elongate nodes above a tag are re-applied to its field so the
/// region is expressed in the root's coordinates. Booleans and the remaining
/// modifiers are transparent. Nested tags are collected independently.
pub fn collect_features(root: &SdfNode) -> Vec<FeatureRegion> {
    let mut out = Vec::new();
    let mut stack = Vec::new();
    walk(root, &mut stack, &mut out);
    out
}

fn walk<'a>(node: &'a SdfNode, wrappers: &mut Vec<&'a SdfNode>, out: &mut Vec<FeatureRegion>) {
    if let SdfNode::Tagged { child, feature } = node {
        let mut field = child.as_ref().clone();
        for wrapper in wrappers.iter().rev() {
            field = wrapper.rewrap(field);
        }
        let bounds = field.bounds();
        let center = if bounds.is_finite() {
            bounds.center()
        } else {
            Point3::origin()
        };
        out.push(FeatureRegion {
            feature: feature.clone(),
            field,
            center,
        });
    }

    let pushed = node.is_positional();
    if pushed {
        wrappers.push(node);
    }
    for child in node.children() {
        walk(child, wrappers, out);
    }
    if pushed {
        wrappers.pop();
    }
}

/// Parameters of a drilled hole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoleOptions {
    /// Feature identifier for the hole.
    pub id: u32,
    /// Feature name.
    pub name: String,
    /// Centre of the hole's entry circle.
    pub position: Point3,
    /// Hole diameter.
    pub diameter: f64,
    /// Depth of the cylindrical section below `position`, along −Z.
    pub depth: f64,
    /// Included angle of a drill-point tip in degrees, or `None` for a flat bottom.
    pub tip_angle: Option<f64>,
    /// Extension above `position` so the cut clears the entry face.
    /// Defaults to half the diameter.
    pub clearance: Option<f64>,
}

impl Default for HoleOptions {
    fn default() -> Self {
        Self {
            id: 0,
            name: "hole".to_string(),
            position: Point3::origin(),
            diameter: 5.0,
            depth: 10.0,
            tip_angle: None,
            clearance: None,
        }
    }
}

/// Build a tagged hole subtree, ready to be subtracted from a body.
pub fn hole(options: HoleOptions) -> Result<SdfNode> {
    let diameter = positive("hole diameter", options.diameter)?;
    let depth = positive("hole depth", options.depth)?;
    let clearance = non_negative("hole clearance", options.clearance.unwrap_or(diameter * 0.5))?;
    let position = Point3::from(finite_vec("hole position", options.position.coords)?);
    let radius = diameter * 0.5;

    let height = depth + clearance;
    let mut body = SdfNode::cylinder(radius, height)?.translate(Vec3::new(
        position.x,
        position.y,
        position.z - depth + height * 0.5,
    ))?;

    if let Some(angle) = options.tip_angle {
        if !(angle > 0.0 && angle < 180.0) {
            return Err(SdfError::OutOfRange {
                name: "hole tip angle",
                value: angle,
                min: 0.0,
                max: 180.0,
            });
        }
        let tip_height = radius / (angle.to_radians() * 0.5).tan();
        let tip = SdfNode::cone(radius, tip_height)?
            .mirror(Vec3::z())?
            .translate(Vec3::new(position.x, position.y, position.z - depth))?;
        body = body.union(tip);
    }

    Ok(body.tagged(Feature {
        id: FeatureId(options.id),
        name: options.name,
        face_kind: FaceKind::Cylindrical,
        edge_kind: EdgeKind::Sharp,
    }))
}
