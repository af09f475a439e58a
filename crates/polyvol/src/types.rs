//! Core value types shared by the volume math and the structure layer.

use std::fmt;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Cartesian coordinate (x, y, z).
pub type Coord = Vector3<f64>;

/// Site index into a coordinate provider. Only ever used as a lookup key.
pub type AtomIndex = usize;

/// Triangular face given by three vertex positions within a cluster.
pub type Face = [usize; 3];

/// Supported cluster shapes, keyed by vertex count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    Tetrahedron,
    Octahedron,
    Cube,
}

impl Topology {
    /// Number of vertices (sites) in a cluster of this shape.
    #[inline]
    pub fn vertex_count(self) -> usize {
        match self {
            Topology::Tetrahedron => 4,
            Topology::Octahedron => 6,
            Topology::Cube => 8,
        }
    }

    /// Number of triangles in a complete surface triangulation.
    ///
    /// For the tetrahedron this is the count of its own faces; the volume
    /// path never fans a tetrahedron through its centroid.
    #[inline]
    pub fn face_count(self) -> usize {
        match self {
            Topology::Tetrahedron => 4,
            Topology::Octahedron => 8,
            Topology::Cube => 12,
        }
    }

    pub fn from_vertex_count(n: usize) -> Option<Self> {
        match n {
            4 => Some(Topology::Tetrahedron),
            6 => Some(Topology::Octahedron),
            8 => Some(Topology::Cube),
            _ => None,
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Topology::Tetrahedron => "tetrahedron",
            Topology::Octahedron => "octahedron",
            Topology::Cube => "cube",
        };
        f.write_str(name)
    }
}
