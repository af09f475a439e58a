//! Canonical clusters used in tests, benchmarks and the CLI demo.
//!
//! Vertex orders match the canonical face maps in `crate::triangulation`.
//!
//! Volume formulas
//! - Regular tetrahedron, edge s: s³ / (6√2).
//! - Regular octahedron, centre-to-vertex r: (4/3) r³.
//! - Cuboid a × b × c: abc.

use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::structure::{Lattice, Site, Structure};
use crate::types::{AtomIndex, Coord};

/// Regular tetrahedron with edge `s`: base triangle in z = 0, apex above.
pub fn regular_tetrahedron(s: f64) -> [Coord; 4] {
    let h = 3f64.sqrt();
    [
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(s, 0.0, 0.0),
        Vector3::new(0.5 * s, 0.5 * h * s, 0.0),
        Vector3::new(0.5 * s, h / 6.0 * s, (6f64.sqrt() / 3.0) * s),
    ]
}

/// Regular octahedron with vertices at distance `r` from the origin.
///
/// Canonical order: `+z`, ring `+x, +y, -x, -y`, `-z`.
pub fn regular_octahedron(r: f64) -> [Coord; 6] {
    [
        Vector3::new(0.0, 0.0, r),
        Vector3::new(r, 0.0, 0.0),
        Vector3::new(0.0, r, 0.0),
        Vector3::new(-r, 0.0, 0.0),
        Vector3::new(0.0, -r, 0.0),
        Vector3::new(0.0, 0.0, -r),
    ]
}

/// `(4/3) r³`, the volume of [`regular_octahedron`].
#[inline]
pub fn regular_octahedron_volume(r: f64) -> f64 {
    4.0 / 3.0 * r.powi(3)
}

/// Axis-aligned box `[0,a] × [0,b] × [0,c]` in canonical cube order.
pub fn cuboid(a: f64, b: f64, c: f64) -> [Coord; 8] {
    [
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(a, 0.0, 0.0),
        Vector3::new(a, b, 0.0),
        Vector3::new(0.0, b, 0.0),
        Vector3::new(0.0, 0.0, c),
        Vector3::new(a, 0.0, c),
        Vector3::new(a, b, c),
        Vector3::new(0.0, b, c),
    ]
}

/// Displace every point by a uniform offset in `[-amplitude, amplitude)³`.
///
/// Deterministic for a given `seed`.
pub fn jitter(points: &[Coord], amplitude: f64, seed: u64) -> Vec<Coord> {
    if amplitude <= 0.0 {
        return points.to_vec();
    }
    let mut rng = StdRng::seed_from_u64(seed);
    points
        .iter()
        .map(|p| {
            p + Vector3::new(
                rng.gen_range(-amplitude..amplitude),
                rng.gen_range(-amplitude..amplitude),
                rng.gen_range(-amplitude..amplitude),
            )
        })
        .collect()
}

/// Cubic cell with an XY6 molecule centred on the cell origin.
///
/// Site 0 is the centre; sites 1..=6 are the ligands at distance `bond`,
/// stored with fractional coordinates in `[0, 1)`, so the `-x`, `-y` and `-z`
/// ligands sit on the far side of the cell. Returns the structure and the
/// ligand sites in canonical octahedron order.
///
/// `None` unless `0 < bond < cell / 4`, which keeps every ligand within half
/// a cell of the others.
pub fn corner_octahedron_structure(cell: f64, bond: f64) -> Option<(Structure, [AtomIndex; 6])> {
    if !(bond > 0.0 && bond < cell / 4.0) {
        return None;
    }
    let d = bond / cell;
    let lattice = Lattice::cubic(cell)?;
    let sites = vec![
        Site::new("S", Vector3::new(0.0, 0.0, 0.0)),
        Site::new("F", Vector3::new(d, 0.0, 0.0)),
        Site::new("F", Vector3::new(0.0, d, 0.0)),
        Site::new("F", Vector3::new(0.0, 0.0, d)),
        Site::new("F", Vector3::new(1.0 - d, 0.0, 0.0)),
        Site::new("F", Vector3::new(0.0, 1.0 - d, 0.0)),
        Site::new("F", Vector3::new(0.0, 0.0, 1.0 - d)),
    ];
    // +z, ring (+x, +y, -x, -y), -z
    Some((Structure::new(lattice, sites), [3, 1, 2, 4, 5, 6]))
}
