//! Cluster volumes via centroid fans over a triangulated surface.
//!
//! Every volume here reduces to one primitive: the tetrahedron volume
//! `|det([b-a, c-a, d-a])| / 6` (scalar triple product, edge vectors as rows).
//! Octahedra and cubes are cut into one tetrahedron per surface triangle, all
//! sharing the cluster centroid as apex. This is exact for clusters in convex
//! position whose face map covers the surface once; neither condition is
//! checked here.

use std::fmt;

use nalgebra::Matrix3;

use crate::cfg::VolumeCfg;
use crate::structure::ProviderError;
use crate::triangulation::validate_faces;
use crate::types::{Coord, Face, Topology};

/// Why a face map was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriangulationFault {
    /// `faces[face]` names a vertex position outside `0..vertex_count`.
    OutOfRange {
        face: usize,
        vertex: usize,
        vertex_count: usize,
    },
    /// The map has the wrong number of faces for the requested topology.
    FaceCount { expected: usize, got: usize },
}

/// Errors surfaced by the volume operations.
#[derive(Debug)]
pub enum VolumeError {
    /// Vertex / site list length does not match the topology.
    InvalidClusterSize {
        topology: Topology,
        expected: usize,
        got: usize,
    },
    /// Face map does not fit the cluster.
    InvalidTriangulation(TriangulationFault),
    /// The coordinate provider could not resolve a site.
    Provider(ProviderError),
}

impl VolumeError {
    pub(crate) fn size(topology: Topology, got: usize) -> Self {
        Self::InvalidClusterSize {
            topology,
            expected: topology.vertex_count(),
            got,
        }
    }
}

impl fmt::Display for VolumeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolumeError::InvalidClusterSize {
                topology,
                expected,
                got,
            } => write!(
                f,
                "{topology} cluster needs exactly {expected} vertices, got {got}"
            ),
            VolumeError::InvalidTriangulation(TriangulationFault::OutOfRange {
                face,
                vertex,
                vertex_count,
            }) => write!(
                f,
                "face {face} references vertex {vertex}, valid range is 0..{vertex_count}"
            ),
            VolumeError::InvalidTriangulation(TriangulationFault::FaceCount { expected, got }) => {
                write!(f, "triangulation needs {expected} faces, got {got}")
            }
            VolumeError::Provider(err) => write!(f, "coordinate lookup failed: {err}"),
        }
    }
}

impl std::error::Error for VolumeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VolumeError::Provider(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ProviderError> for VolumeError {
    fn from(err: ProviderError) -> Self {
        VolumeError::Provider(err)
    }
}

/// Signed tetrahedron volume.
///
/// Positive when `d` lies on the side of triangle `(a, b, c)` that its
/// counter-clockwise normal points to.
#[inline]
pub fn signed_tetra_volume(a: Coord, b: Coord, c: Coord, d: Coord) -> f64 {
    let m = Matrix3::from_rows(&[(b - a).transpose(), (c - a).transpose(), (d - a).transpose()]);
    m.determinant() / 6.0
}

/// Unsigned tetrahedron volume; independent of vertex order.
#[inline]
pub fn tetra_volume(a: Coord, b: Coord, c: Coord, d: Coord) -> f64 {
    signed_tetra_volume(a, b, c, d).abs()
}

/// True if the four points are (numerically) coplanar.
#[inline]
pub fn is_degenerate_tetra(a: Coord, b: Coord, c: Coord, d: Coord, eps: f64) -> bool {
    tetra_volume(a, b, c, d) <= eps
}

/// Volume of a tetrahedral cluster given as exactly four coordinates.
///
/// Coplanar or coincident points give `0.0`, which is a valid result.
pub fn tetrahedron_volume(points: &[Coord]) -> Result<f64, VolumeError> {
    match points {
        [a, b, c, d] => Ok(tetra_volume(*a, *b, *c, *d)),
        _ => Err(VolumeError::size(Topology::Tetrahedron, points.len())),
    }
}

/// Component-wise mean of `points`, `None` for an empty slice.
pub fn centroid(points: &[Coord]) -> Option<Coord> {
    if points.is_empty() {
        return None;
    }
    let mut acc = Coord::zeros();
    for &p in points {
        acc += p;
    }
    Some(acc / (points.len() as f64))
}

/// Fan volume of a closed triangulated surface through the centroid.
///
/// Returns `0.0` for an empty face map.
pub fn fan_volume(points: &[Coord], faces: &[Face]) -> Result<f64, VolumeError> {
    fan_volume_cfg(points, faces, &VolumeCfg::default())
}

/// Same as [`fan_volume`], with explicit diagnostic tolerances.
pub fn fan_volume_cfg(points: &[Coord], faces: &[Face], cfg: &VolumeCfg) -> Result<f64, VolumeError> {
    validate_faces(faces, points.len())?;
    match centroid(points) {
        Some(apex) if !faces.is_empty() => Ok(fan_sum(points, faces, apex, cfg)),
        _ => Ok(0.0),
    }
}

/// Fan volume through a caller-chosen apex.
///
/// The sum equals the enclosed volume whenever `apex` sees every face from
/// the inside, i.e. for any interior point of a convex cluster.
pub fn fan_volume_with_apex(points: &[Coord], faces: &[Face], apex: Coord) -> Result<f64, VolumeError> {
    validate_faces(faces, points.len())?;
    Ok(fan_sum(points, faces, apex, &VolumeCfg::default()))
}

fn fan_sum(points: &[Coord], faces: &[Face], apex: Coord, cfg: &VolumeCfg) -> f64 {
    let mut total = 0.0;
    for (idx, &[i, j, k]) in faces.iter().enumerate() {
        let vol = tetra_volume(apex, points[i], points[j], points[k]);
        if vol <= cfg.eps_degenerate {
            tracing::warn!(face = idx, i, j, k, vol, "fan tetrahedron collapsed onto face plane");
        }
        total += vol;
    }
    total
}

/// Octahedron volume from 6 coordinates and an 8-face map.
pub fn octahedron_volume(points: &[Coord], faces: &[Face]) -> Result<f64, VolumeError> {
    topology_fan_volume(Topology::Octahedron, points, faces, &VolumeCfg::default())
}

/// Cube volume from 8 coordinates and a 12-face map.
pub fn cube_volume(points: &[Coord], faces: &[Face]) -> Result<f64, VolumeError> {
    topology_fan_volume(Topology::Cube, points, faces, &VolumeCfg::default())
}

pub(crate) fn topology_fan_volume(
    topology: Topology,
    points: &[Coord],
    faces: &[Face],
    cfg: &VolumeCfg,
) -> Result<f64, VolumeError> {
    if points.len() != topology.vertex_count() {
        return Err(VolumeError::size(topology, points.len()));
    }
    if faces.len() != topology.face_count() {
        return Err(VolumeError::InvalidTriangulation(
            TriangulationFault::FaceCount {
                expected: topology.face_count(),
                got: faces.len(),
            },
        ));
    }
    fan_volume_cfg(points, faces, cfg)
}

/// Octahedron volume for the canonical vertex order `(a, b, c, d, e, f)`.
///
/// `a` and `f` are opposite apices; `b, c, d, e` walk the equatorial ring.
/// The two square pyramids are split along the `b–d` diagonal:
/// `{a,b,c,d} + {a,b,d,e} + {f,b,c,d} + {f,b,d,e}`. Only valid for that
/// order; use [`octahedron_volume`] with a face map otherwise.
pub fn octahedron_volume_canonical(points: &[Coord]) -> Result<f64, VolumeError> {
    let [a, b, c, d, e, f] = match points {
        [a, b, c, d, e, f] => [*a, *b, *c, *d, *e, *f],
        _ => return Err(VolumeError::size(Topology::Octahedron, points.len())),
    };
    Ok(tetra_volume(a, b, c, d)
        + tetra_volume(a, b, d, e)
        + tetra_volume(f, b, c, d)
        + tetra_volume(f, b, d, e))
}
