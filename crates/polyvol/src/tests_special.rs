//! Smoke tests for the canonical cluster constructors.
//!
//! Each constructor is checked against its closed-form volume through the
//! same entry point callers use.

use crate::special;
use crate::structure::CoordinateProvider;
use crate::triangulation::{CUBE_FACES, OCTAHEDRON_FACES};
use crate::volume::{centroid, cube_volume, octahedron_volume, tetrahedron_volume};

#[test]
fn regular_tetrahedron_edges_are_equal() {
    let pts = special::regular_tetrahedron(2.0);
    for i in 0..4 {
        for j in i + 1..4 {
            assert!(((pts[i] - pts[j]).norm() - 2.0).abs() < 1e-12);
        }
    }
    let vol = tetrahedron_volume(&pts).unwrap();
    assert!((vol - 8.0 / (6.0 * 2f64.sqrt())).abs() < 1e-12);
}

#[test]
fn regular_octahedron_is_centred() {
    let pts = special::regular_octahedron(3.0);
    assert!(centroid(&pts).unwrap().norm() < 1e-15);
    let vol = octahedron_volume(&pts, &OCTAHEDRON_FACES).unwrap();
    assert!((vol - special::regular_octahedron_volume(3.0)).abs() < 1e-9);
}

#[test]
fn cuboid_volume_is_product() {
    let pts = special::cuboid(1.5, 2.0, 0.25);
    let vol = cube_volume(&pts, &CUBE_FACES).unwrap();
    assert!((vol - 0.75).abs() < 1e-12);
}

#[test]
fn jitter_is_seeded_and_bounded() {
    let base = special::cuboid(1.0, 1.0, 1.0);
    let a = special::jitter(&base, 0.1, 7);
    let b = special::jitter(&base, 0.1, 7);
    let c = special::jitter(&base, 0.1, 8);
    assert_eq!(a, b);
    assert_ne!(a, c);
    for (p, q) in base.iter().zip(&a) {
        assert!((p - q).amax() <= 0.1 + 1e-12);
    }
    assert_eq!(special::jitter(&base, 0.0, 1), base.to_vec());
}

#[test]
fn corner_octahedron_basic_props() {
    let (s, sites) = special::corner_octahedron_structure(10.0, 1.6).unwrap();
    assert_eq!(s.site_count(), 7);
    // Every stored fractional coordinate lies in [0, 1).
    for site in s.sites() {
        assert!(site.frac.iter().all(|&x| (0.0..1.0).contains(&x)));
    }
    let mut sorted = sites;
    sorted.sort_unstable();
    assert_eq!(sorted, [1, 2, 3, 4, 5, 6]);
    assert!(special::corner_octahedron_structure(10.0, 3.0).is_none());
    assert!(special::corner_octahedron_structure(10.0, 0.0).is_none());
}
