//! Indexed triangle mesh produced by the mesher.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use fieldcam_math::{BoundingBox3, Point3, Vec3};
use fieldcam_sdf::{EdgeKind, Feature, FeatureId};

/// A mesh edge on the boundary of a tagged feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeFeature {
    /// Vertex indices, smaller first.
    pub vertices: [u32; 2],
    /// Feature owning the edge.
    pub feature: FeatureId,
    /// Edge classification inherited from the feature.
    pub kind: EdgeKind,
}

/// Indexed triangle mesh with outward winding and per-vertex normals.
///
/// `face_features` is parallel to `faces` when the source tree carried tags
/// and empty otherwise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub positions: Vec<Point3>,
    /// Unit vertex normals, parallel to `positions`.
    pub normals: Vec<Vec3>,
    /// Triangles as vertex index triples, counter-clockwise seen from outside.
    pub faces: Vec<[u32; 3]>,
    /// Feature tag of each face.
    pub face_features: Vec<Option<FeatureId>>,
    /// Edges separating faces with different tags, sorted by vertex pair.
    pub edge_features: Vec<EdgeFeature>,
    /// Descriptors of every feature found in the tree.
    pub features: Vec<Feature>,
}

impl TriangleMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.faces.len()
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// True if the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Corner positions of face `i`.
    pub fn triangle(&self, i: usize) -> [Point3; 3] {
        let [a, b, c] = self.faces[i];
        [
            self.positions[a as usize],
            self.positions[b as usize],
            self.positions[c as usize],
        ]
    }

    /// Bounding box of the vertices.
    pub fn bounds(&self) -> BoundingBox3 {
        let mut b = BoundingBox3::empty();
        for p in &self.positions {
            b.include_point(p);
        }
        b
    }

    /// Enclosed volume by the divergence theorem. Positive for outward winding.
    pub fn signed_volume(&self) -> f64 {
        (0..self.faces.len())
            .map(|i| {
                let [a, b, c] = self.triangle(i);
                a.coords.dot(&b.coords.cross(&c.coords))
            })
            .sum::<f64>()
            / 6.0
    }

    /// Total triangle area.
    pub fn surface_area(&self) -> f64 {
        (0..self.faces.len())
            .map(|i| {
                let [a, b, c] = self.triangle(i);
                (b - a).cross(&(c - a)).norm() * 0.5
            })
            .sum()
    }

    /// True if the mesh is non-empty and every edge is shared by exactly two
    /// faces that traverse it in opposite directions.
    pub fn is_watertight(&self) -> bool {
        if self.faces.is_empty() {
            return false;
        }
        let mut directed: HashMap<(u32, u32), u32> = HashMap::with_capacity(self.faces.len() * 3);
        for f in &self.faces {
            for k in 0..3 {
                *directed.entry((f[k], f[(k + 1) % 3])).or_insert(0) += 1;
            }
        }
        directed
            .iter()
            .all(|(&(a, b), &count)| count == 1 && directed.get(&(b, a)) == Some(&1))
    }

    /// Feature descriptor of face `i`, if it is tagged.
    pub fn face_feature(&self, i: usize) -> Option<&Feature> {
        let id = (*self.face_features.get(i)?)?;
        self.features.iter().find(|f| f.id == id)
    }

    /// Number of faces tagged with `id`.
    pub fn feature_face_count(&self, id: FeatureId) -> usize {
        self.face_features
            .iter()
            .filter(|f| **f == Some(id))
            .count()
    }

    /// Rebuild `edge_features` from the face tags.
    pub(crate) fn compute_edge_features(&mut self) {
        self.edge_features.clear();
        if self.face_features.is_empty() {
            return;
        }
        let mut adjacency: BTreeMap<(u32, u32), Vec<usize>> = BTreeMap::new();
        for (i, f) in self.faces.iter().enumerate() {
            for k in 0..3 {
                let (a, b) = (f[k], f[(k + 1) % 3]);
                adjacency.entry((a.min(b), a.max(b))).or_default().push(i);
            }
        }
        for ((a, b), faces) in adjacency {
            let [fa, fb] = match faces.as_slice() {
                [x, y] => [self.face_features[*x], self.face_features[*y]],
                _ => continue,
            };
            let owner = match (fa, fb) {
                (Some(x), Some(y)) if x != y => Some(x.min(y)),
                (Some(x), None) | (None, Some(x)) => Some(x),
                _ => None,
            };
            let Some(owner) = owner else { continue };
            let kind = self
                .features
                .iter()
                .find(|f| f.id == owner)
                .map(|f| f.edge_kind)
                .unwrap_or(EdgeKind::Sharp);
            self.edge_features.push(EdgeFeature {
                vertices: [a, b],
                feature: owner,
                kind,
            });
        }
    }
}
