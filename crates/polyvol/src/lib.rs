//! Volumes of small polyhedral atomic clusters.
//!
//! A cluster is an ordered group of 4, 6 or 8 sites of a crystal structure
//! (tetrahedron, octahedron, cube). Volumes are computed by fanning the
//! cluster's triangulated surface through its centroid and summing the
//! resulting tetrahedra (scalar triple product).
//!
//! Layout
//! - `volume`: coordinate-level primitives (the actual math).
//! - `triangulation`: face maps and the canonical octahedron/cube maps.
//! - `structure`: the `CoordinateProvider` seam and an in-memory `Structure`.
//! - `periodic`: pure periodic-boundary helpers (`wrap_frac`, `MinimumImage`).
//! - `calculator`: `PolyhedralVolume`, the index-based entry points.
//! - `special`: canonical clusters used by tests, benches and the CLI demo.
//!
//! Diagnostics are emitted as `tracing` events; nothing is printed unless the
//! caller installs a subscriber.

pub mod calculator;
pub mod cfg;
pub mod periodic;
pub mod special;
pub mod structure;
pub mod triangulation;
pub mod types;
pub mod volume;

#[cfg(test)]
mod tests_special;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use calculator::PolyhedralVolume;
pub use cfg::VolumeCfg;
pub use structure::{CoordinateProvider, Lattice, ProviderError, Site, Structure};
pub use triangulation::{Triangulation, CUBE_FACES, OCTAHEDRON_FACES};
pub use types::{AtomIndex, Coord, Face, Topology};
pub use volume::VolumeError;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::calculator::PolyhedralVolume;
    pub use crate::periodic::{wrap_frac, MinimumImage};
    pub use crate::structure::{CoordinateProvider, Lattice, Site, Structure};
    pub use crate::triangulation::{Triangulation, CUBE_FACES, OCTAHEDRON_FACES};
    pub use crate::types::{AtomIndex, Coord, Face, Topology};
    pub use crate::volume::{
        centroid, fan_volume, octahedron_volume_canonical, tetra_volume, tetrahedron_volume,
        VolumeError,
    };
    pub use nalgebra::Vector3;
}
