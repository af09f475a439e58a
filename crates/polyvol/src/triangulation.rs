//! Surface triangulations (face maps) for the supported cluster shapes.
//!
//! A face map lists triangles by vertex *position* within a cluster, not by
//! atom index. The canonical maps below fix a vertex order per shape and are
//! oriented outward (counter-clockwise seen from outside).
//!
//! Canonical vertex orders
//! - Octahedron `(a, b, c, d, e, f)`: `a`/`f` are opposite apices, `b..e`
//!   walk the equatorial ring. Each apex is joined to the four ring edges.
//! - Cube `0..8`: `0,1,2,3` walk the bottom face counter-clockwise seen from
//!   above, vertex `i + 4` sits above vertex `i`. Each of the six quad faces
//!   is split along the diagonal through its first corner.

use std::collections::HashMap;

use crate::volume::{TriangulationFault, VolumeError};
use crate::types::{Face, Topology};

/// Outward faces of a tetrahedron `0..4` with vertex 3 above triangle `0,1,2`.
pub const TETRAHEDRON_FACES: [Face; 4] = [[0, 2, 1], [0, 1, 3], [1, 2, 3], [0, 3, 2]];

/// Outward faces of the canonical octahedron order.
pub const OCTAHEDRON_FACES: [Face; 8] = [
    // upper pyramid
    [0, 1, 2],
    [0, 2, 3],
    [0, 3, 4],
    [0, 4, 1],
    // lower pyramid
    [5, 2, 1],
    [5, 3, 2],
    [5, 4, 3],
    [5, 1, 4],
];

/// Outward faces of the canonical cube order, two triangles per quad.
pub const CUBE_FACES: [Face; 12] = [
    // bottom 0-3-2-1
    [0, 3, 2],
    [0, 2, 1],
    // top 4-5-6-7
    [4, 5, 6],
    [4, 6, 7],
    // front 0-1-5-4
    [0, 1, 5],
    [0, 5, 4],
    // right 1-2-6-5
    [1, 2, 6],
    [1, 6, 5],
    // back 2-3-7-6
    [2, 3, 7],
    [2, 7, 6],
    // left 3-0-4-7
    [3, 0, 4],
    [3, 4, 7],
];

/// Canonical face map for a topology.
pub fn canonical_faces(topology: Topology) -> &'static [Face] {
    match topology {
        Topology::Tetrahedron => &TETRAHEDRON_FACES,
        Topology::Octahedron => &OCTAHEDRON_FACES,
        Topology::Cube => &CUBE_FACES,
    }
}

/// Check that every face entry is a valid position in `0..vertex_count`.
///
/// Reports the first offending face.
pub fn validate_faces(faces: &[Face], vertex_count: usize) -> Result<(), VolumeError> {
    for (face, tri) in faces.iter().enumerate() {
        if let Some(&vertex) = tri.iter().find(|&&v| v >= vertex_count) {
            return Err(VolumeError::InvalidTriangulation(
                TriangulationFault::OutOfRange {
                    face,
                    vertex,
                    vertex_count,
                },
            ));
        }
    }
    Ok(())
}

/// Owned face map.
///
/// Invariants:
/// - None on construction; `validate` checks entries against a cluster size.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Triangulation {
    faces: Vec<Face>,
}

impl Triangulation {
    #[inline]
    pub fn new(faces: Vec<Face>) -> Self {
        Self { faces }
    }

    /// Owned copy of the canonical map for `topology`.
    pub fn canonical(topology: Topology) -> Self {
        Self::new(canonical_faces(topology).to_vec())
    }

    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn validate(&self, vertex_count: usize) -> Result<(), VolumeError> {
        validate_faces(&self.faces, vertex_count)
    }

    /// Largest vertex position referenced, if any.
    pub fn max_vertex(&self) -> Option<usize> {
        self.faces.iter().flat_map(|f| f.iter().copied()).max()
    }

    /// True if every undirected edge is shared by exactly two faces.
    ///
    /// This is the watertightness condition the centroid fan relies on. It
    /// does not detect overlapping faces that happen to pair up.
    pub fn is_closed(&self) -> bool {
        if self.faces.is_empty() {
            return false;
        }
        let mut counts: HashMap<(usize, usize), usize> = HashMap::new();
        for &[i, j, k] in &self.faces {
            if i == j || j == k || i == k {
                return false;
            }
            for (u, v) in [(i, j), (j, k), (k, i)] {
                *counts.entry((u.min(v), u.max(v))).or_default() += 1;
            }
        }
        counts.values().all(|&c| c == 2)
    }

    /// True if neighbouring faces traverse their shared edge in opposite
    /// directions (each directed edge appears once).
    pub fn is_consistently_oriented(&self) -> bool {
        if !self.is_closed() {
            return false;
        }
        let mut directed: HashMap<(usize, usize), usize> = HashMap::new();
        for &[i, j, k] in &self.faces {
            for e in [(i, j), (j, k), (k, i)] {
                *directed.entry(e).or_default() += 1;
            }
        }
        directed
            .iter()
            .all(|(&(u, v), &c)| c == 1 && directed.get(&(v, u)) == Some(&1))
    }
}

impl AsRef<[Face]> for Triangulation {
    fn as_ref(&self) -> &[Face] {
        &self.faces
    }
}

impl From<Vec<Face>> for Triangulation {
    fn from(faces: Vec<Face>) -> Self {
        Self::new(faces)
    }
}
