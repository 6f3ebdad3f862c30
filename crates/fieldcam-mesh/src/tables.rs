//! Marching-cubes case tables.
//!
//! Rather than embedding the classic 256-entry literal, the tables are derived
//! once from the cube's faces. For every face (corners listed counter-clockwise
//! seen from outside) each maximal run of inside corners is cut off by a
//! segment running from the edge where the run starts to the edge where it
//! ends. Segments chain into closed loops, and each loop is fan-triangulated.
//! A face's segments depend only on that face's four corners, so two cells
//! sharing a face always agree and the extracted surface has no cracks.

use std::sync::OnceLock;

/// Corner offsets of the unit cube, indexed 0..8.
pub(crate) const CORNERS: [[usize; 3]; 8] = [
    [0, 0, 0],
    [1, 0, 0],
    [1, 1, 0],
    [0, 1, 0],
    [0, 0, 1],
    [1, 0, 1],
    [1, 1, 1],
    [0, 1, 1],
];

/// Corner pairs of the twelve cube edges.
pub(crate) const EDGES: [[usize; 2]; 12] = [
    [0, 1],
    [1, 2],
    [2, 3],
    [3, 0],
    [4, 5],
    [5, 6],
    [6, 7],
    [7, 4],
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
];

/// Face corner cycles, counter-clockwise seen from outside the cube.
const FACES: [[usize; 4]; 6] = [
    [0, 3, 2, 1], // z = 0
    [4, 5, 6, 7], // z = 1
    [0, 1, 5, 4], // y = 0
    [1, 2, 6, 5], // x = 1
    [2, 3, 7, 6], // y = 1
    [3, 0, 4, 7], // x = 0
];

/// Per-case crossing masks and triangles.
pub(crate) struct CaseTable {
    /// Bit `e` is set when edge `e` joins an inside and an outside corner.
    pub edge_mask: [u16; 256],
    /// Triangles as edge-index triples, wound outward.
    pub triangles: Vec<Vec<[u8; 3]>>,
}

/// The shared case table, built on first use.
pub(crate) fn case_table() -> &'static CaseTable {
    static TABLE: OnceLock<CaseTable> = OnceLock::new();
    TABLE.get_or_init(build_table)
}

fn edge_between(a: usize, b: usize) -> usize {
    EDGES
        .iter()
        .position(|&[p, q]| (p == a && q == b) || (p == b && q == a))
        .unwrap_or(usize::MAX)
}

fn build_table() -> CaseTable {
    let mut edge_mask = [0u16; 256];
    let mut triangles = Vec::with_capacity(256);

    for case in 0..256usize {
        let inside = |c: usize| case & (1 << c) != 0;

        for (e, &[a, b]) in EDGES.iter().enumerate() {
            if inside(a) != inside(b) {
                edge_mask[case] |= 1 << e;
            }
        }

        // next_edge[e] = edge reached from e by the single segment leaving it
        let mut next_edge = [usize::MAX; 12];
        for face in &FACES {
            for start in 0..4 {
                let prev = face[(start + 3) % 4];
                if !inside(face[start]) || inside(prev) {
                    continue;
                }
                let mut end = start;
                while inside(face[(end + 1) % 4]) {
                    end = (end + 1) % 4;
                }
                let enter = edge_between(prev, face[start]);
                let leave = edge_between(face[end], face[(end + 1) % 4]);
                if enter < 12 && leave < 12 {
                    next_edge[enter] = leave;
                }
            }
        }

        let mut tris = Vec::new();
        let mut visited = [false; 12];
        for first in 0..12 {
            if visited[first] || next_edge[first] == usize::MAX {
                continue;
            }
            let mut ring = Vec::new();
            let mut e = first;
            while e < 12 && !visited[e] {
                visited[e] = true;
                ring.push(e as u8);
                e = next_edge[e];
            }
            for i in 1..ring.len().saturating_sub(1) {
                tris.push([ring[0], ring[i], ring[i + 1]]);
            }
        }
        triangles.push(tris);
    }

    CaseTable {
        edge_mask,
        triangles,
    }
}
