//! Index-based volume entry points.
//!
//! `PolyhedralVolume` borrows a coordinate provider and turns atom-index
//! clusters into coordinates before handing them to the math in
//! `crate::volume`. Sizes and face maps are validated first, so a bad call
//! never touches the provider.

use crate::cfg::VolumeCfg;
use crate::structure::CoordinateProvider;
use crate::triangulation::{canonical_faces, validate_faces};
use crate::types::{AtomIndex, Coord, Face, Topology};
use crate::volume::{
    octahedron_volume_canonical, tetrahedron_volume, topology_fan_volume, TriangulationFault,
    VolumeError,
};

/// Volume calculator over a borrowed coordinate provider.
///
/// Holds no state besides the borrow and its tolerances; `Send + Sync`
/// whenever the provider is.
#[derive(Debug)]
pub struct PolyhedralVolume<'a, P: ?Sized> {
    provider: &'a P,
    cfg: VolumeCfg,
}

// Manual impls: only the borrow is copied, `P` itself need not be `Clone`.
impl<P: ?Sized> Clone for PolyhedralVolume<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: ?Sized> Copy for PolyhedralVolume<'_, P> {}

impl<'a, P: CoordinateProvider + ?Sized> PolyhedralVolume<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self::with_cfg(provider, VolumeCfg::default())
    }

    pub fn with_cfg(provider: &'a P, cfg: VolumeCfg) -> Self {
        Self { provider, cfg }
    }

    #[inline]
    pub fn provider(&self) -> &'a P {
        self.provider
    }

    /// Volume of a 4-site tetrahedral cluster.
    pub fn tetrahedral(&self, sites: &[AtomIndex]) -> Result<f64, VolumeError> {
        check_size(Topology::Tetrahedron, sites)?;
        let points = self.resolve(sites)?;
        let vol = tetrahedron_volume(&points)?;
        tracing::debug!(topology = %Topology::Tetrahedron, ?sites, vol, "cluster volume");
        Ok(vol)
    }

    /// Volume of a 6-site octahedral cluster fanned over `faces` (8 triangles).
    pub fn octahedral(&self, sites: &[AtomIndex], faces: &[Face]) -> Result<f64, VolumeError> {
        self.fan(Topology::Octahedron, sites, faces)
    }

    /// Octahedron volume for sites given in the canonical order
    /// `(apex, ring, ring, ring, ring, apex)`; see
    /// [`octahedron_volume_canonical`].
    pub fn octahedral_canonical(&self, sites: &[AtomIndex]) -> Result<f64, VolumeError> {
        check_size(Topology::Octahedron, sites)?;
        let points = self.resolve(sites)?;
        let vol = octahedron_volume_canonical(&points)?;
        tracing::debug!(topology = %Topology::Octahedron, ?sites, vol, "cluster volume (canonical)");
        Ok(vol)
    }

    /// Volume of an 8-site cubic cluster fanned over `faces` (12 triangles).
    pub fn cubic(&self, sites: &[AtomIndex], faces: &[Face]) -> Result<f64, VolumeError> {
        self.fan(Topology::Cube, sites, faces)
    }

    /// Volume of a 4/6/8-site cluster using the canonical face map for its
    /// size. Sites must follow the canonical vertex order of that shape.
    pub fn cluster(&self, sites: &[AtomIndex]) -> Result<f64, VolumeError> {
        match Topology::from_vertex_count(sites.len()) {
            Some(Topology::Tetrahedron) => self.tetrahedral(sites),
            Some(t) => self.fan(t, sites, canonical_faces(t)),
            // Closest shape by size, for the error message.
            None => {
                let t = match sites.len() {
                    0..=4 => Topology::Tetrahedron,
                    5..=6 => Topology::Octahedron,
                    _ => Topology::Cube,
                };
                Err(VolumeError::size(t, sites.len()))
            }
        }
    }

    fn fan(&self, topology: Topology, sites: &[AtomIndex], faces: &[Face]) -> Result<f64, VolumeError> {
        check_size(topology, sites)?;
        if faces.len() != topology.face_count() {
            return Err(VolumeError::InvalidTriangulation(
                TriangulationFault::FaceCount {
                    expected: topology.face_count(),
                    got: faces.len(),
                },
            ));
        }
        validate_faces(faces, sites.len())?;
        let points = self.resolve(sites)?;
        let vol = topology_fan_volume(topology, &points, faces, &self.cfg)?;
        tracing::debug!(topology = %topology, ?sites, vol, "cluster volume");
        Ok(vol)
    }

    fn resolve(&self, sites: &[AtomIndex]) -> Result<Vec<Coord>, VolumeError> {
        sites
            .iter()
            .map(|&i| self.provider.cart_coord(i).map_err(VolumeError::from))
            .collect()
    }
}

fn check_size(topology: Topology, sites: &[AtomIndex]) -> Result<(), VolumeError> {
    if sites.len() != topology.vertex_count() {
        return Err(VolumeError::size(topology, sites.len()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::periodic::MinimumImage;
    use crate::special;
    use crate::structure::{Lattice, ProviderError, Structure};
    use crate::triangulation::{CUBE_FACES, OCTAHEDRON_FACES};
    use std::cell::Cell;

    /// Provider that counts lookups, to check validation happens first.
    struct Counting<'a> {
        inner: &'a Structure,
        calls: Cell<usize>,
    }

    impl CoordinateProvider for Counting<'_> {
        fn site_count(&self) -> usize {
            self.inner.site_count()
        }
        fn cart_coord(&self, index: AtomIndex) -> Result<Coord, ProviderError> {
            self.calls.set(self.calls.get() + 1);
            self.inner.cart_coord(index)
        }
        fn frac_coord(&self, index: AtomIndex) -> Result<Coord, ProviderError> {
            self.inner.frac_coord(index)
        }
    }

    fn structure_of(points: &[Coord]) -> Structure {
        let lattice = Lattice::cubic(100.0).unwrap();
        Structure::from_cart(lattice, points.iter().map(|&p| ("X", p)))
    }

    #[test]
    fn tetrahedral_from_indices() {
        let s = structure_of(&special::regular_tetrahedron(1.0));
        let calc = PolyhedralVolume::new(&s);
        let vol = calc.tetrahedral(&[0, 1, 2, 3]).unwrap();
        assert!((vol - 1.0 / (6.0 * 2f64.sqrt())).abs() < 1e-12);
        let permuted = calc.tetrahedral(&[2, 0, 3, 1]).unwrap();
        assert!((vol - permuted).abs() < 1e-12);
    }

    #[test]
    fn octahedral_face_and_canonical_paths_agree() {
        let s = structure_of(&special::regular_octahedron(1.0));
        let calc = PolyhedralVolume::new(&s);
        let sites = [0, 1, 2, 3, 4, 5];
        let fan = calc.octahedral(&sites, &OCTAHEDRON_FACES).unwrap();
        let fast = calc.octahedral_canonical(&sites).unwrap();
        assert!((fan - 4.0 / 3.0).abs() < 1e-9);
        assert!((fast - 4.0 / 3.0).abs() < 1e-9);
        assert!((calc.cluster(&sites).unwrap() - fan).abs() < 1e-12);
    }

    #[test]
    fn octahedral_with_custom_site_order() {
        // Sites stored in arbitrary order; the face map follows the caller's order.
        let pts = special::regular_octahedron(1.0);
        let order = [3usize, 5, 0, 2, 4, 1];
        let shuffled: Vec<Coord> = order.iter().map(|&i| pts[i]).collect();
        let s = structure_of(&shuffled);
        let calc = PolyhedralVolume::new(&s);
        // Position p in the canonical order lives at site inverse[p].
        let mut inverse = [0usize; 6];
        for (site, &p) in order.iter().enumerate() {
            inverse[p] = site;
        }
        let vol = calc.octahedral(&inverse, &OCTAHEDRON_FACES).unwrap();
        assert!((vol - 4.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn cubic_from_indices() {
        let s = structure_of(&special::cuboid(1.0, 1.0, 1.0));
        let calc = PolyhedralVolume::new(&s);
        let sites: Vec<AtomIndex> = (0..8).collect();
        let vol = calc.cubic(&sites, &CUBE_FACES).unwrap();
        assert!((vol - 1.0).abs() < 1e-9);
        assert!((calc.cluster(&sites).unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn size_errors_do_not_touch_provider() {
        let s = structure_of(&special::cuboid(1.0, 1.0, 1.0));
        let counting = Counting {
            inner: &s,
            calls: Cell::new(0),
        };
        let calc = PolyhedralVolume::new(&counting);
        assert!(matches!(
            calc.tetrahedral(&[0, 1, 2]),
            Err(VolumeError::InvalidClusterSize { expected: 4, got: 3, .. })
        ));
        assert!(matches!(
            calc.octahedral(&[0, 1, 2, 3, 4], &OCTAHEDRON_FACES),
            Err(VolumeError::InvalidClusterSize { expected: 6, got: 5, .. })
        ));
        assert!(matches!(
            calc.octahedral_canonical(&[0, 1, 2, 3, 4, 5, 6]),
            Err(VolumeError::InvalidClusterSize { expected: 6, got: 7, .. })
        ));
        assert!(matches!(
            calc.cubic(&[0, 1, 2, 3, 4, 5, 6], &CUBE_FACES),
            Err(VolumeError::InvalidClusterSize { expected: 8, got: 7, .. })
        ));
        assert!(matches!(
            calc.cluster(&[0, 1, 2, 3, 4]),
            Err(VolumeError::InvalidClusterSize {
                topology: Topology::Octahedron,
                got: 5,
                ..
            })
        ));
        let mut bad = CUBE_FACES;
        bad[11] = [3, 4, 8];
        assert!(matches!(
            calc.cubic(&[0, 1, 2, 3, 4, 5, 6, 7], &bad),
            Err(VolumeError::InvalidTriangulation(TriangulationFault::OutOfRange { face: 11, vertex: 8, .. }))
        ));
        assert!(matches!(
            calc.cubic(&[0, 1, 2, 3, 4, 5, 6, 7], &OCTAHEDRON_FACES),
            Err(VolumeError::InvalidTriangulation(TriangulationFault::FaceCount { expected: 12, got: 8 }))
        ));
        assert_eq!(counting.calls.get(), 0);
    }

    #[test]
    fn missing_site_propagates_provider_error() {
        let s = structure_of(&special::regular_tetrahedron(1.0));
        let calc = PolyhedralVolume::new(&s);
        let err = calc.tetrahedral(&[0, 1, 2, 9]).unwrap_err();
        assert!(matches!(
            err,
            VolumeError::Provider(ProviderError::NotFound { index: 9, len: 4 })
        ));
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("site 9"));
    }

    #[test]
    fn missing_site_on_face_path_after_validation() {
        let s = structure_of(&special::cuboid(1.0, 1.0, 1.0));
        let counting = Counting {
            inner: &s,
            calls: Cell::new(0),
        };
        let calc = PolyhedralVolume::new(&counting);

        // Shape and face checks win over a missing site and skip lookups.
        assert!(matches!(
            calc.octahedral(&[20, 1, 2, 3, 4], &OCTAHEDRON_FACES),
            Err(VolumeError::InvalidClusterSize { expected: 6, got: 5, .. })
        ));
        assert!(matches!(
            calc.cubic(&[0, 1, 2, 3, 4, 5, 6, 30], &OCTAHEDRON_FACES),
            Err(VolumeError::InvalidTriangulation(TriangulationFault::FaceCount { expected: 12, got: 8 }))
        ));
        let mut bad = CUBE_FACES;
        bad[0] = [0, 9, 2];
        assert!(matches!(
            calc.cubic(&[30, 1, 2, 3, 4, 5, 6, 7], &bad),
            Err(VolumeError::InvalidTriangulation(TriangulationFault::OutOfRange { face: 0, vertex: 9, .. }))
        ));
        assert_eq!(counting.calls.get(), 0);

        assert!(matches!(
            calc.octahedral(&[0, 1, 2, 3, 4, 20], &OCTAHEDRON_FACES),
            Err(VolumeError::Provider(ProviderError::NotFound { index: 20, len: 8 }))
        ));
        assert!(matches!(
            calc.octahedral_canonical(&[20, 1, 2, 3, 4, 5]),
            Err(VolumeError::Provider(ProviderError::NotFound { index: 20, len: 8 }))
        ));
        assert!(matches!(
            calc.cubic(&[0, 1, 2, 3, 4, 5, 6, 30], &CUBE_FACES),
            Err(VolumeError::Provider(ProviderError::NotFound { index: 30, len: 8 }))
        ));
        assert!(matches!(
            calc.cluster(&[0, 1, 2, 3, 4, 5, 6, 30]),
            Err(VolumeError::Provider(ProviderError::NotFound { index: 30, len: 8 }))
        ));
        assert!(counting.calls.get() > 0);
    }

    #[test]
    fn boundary_cluster_needs_minimum_image() {
        let (s, sites) = special::corner_octahedron_structure(10.0, 1.6).unwrap();
        let expected = special::regular_octahedron_volume(1.6);

        let naive = PolyhedralVolume::new(&s).octahedral(&sites, &OCTAHEDRON_FACES).unwrap();
        assert!((naive - expected).abs() > 1.0, "stored coordinates should be split by the boundary");

        let mi = MinimumImage::about_site(&s, sites[0]).unwrap();
        let vol = PolyhedralVolume::new(&mi).octahedral(&sites, &OCTAHEDRON_FACES).unwrap();
        assert!((vol - expected).abs() < 1e-9, "computed volume {vol}");

        let wrapped = s.wrapped();
        let vol = PolyhedralVolume::new(&wrapped).cluster(&sites).unwrap();
        assert!((vol - expected).abs() < 1e-9);
    }

    #[test]
    fn works_through_trait_objects() {
        let s = structure_of(&special::cuboid(2.0, 1.0, 1.0));
        let dynp: &dyn CoordinateProvider = &s;
        let calc = PolyhedralVolume::new(dynp);
        let sites: Vec<AtomIndex> = (0..8).collect();
        assert!((calc.cubic(&sites, &CUBE_FACES).unwrap() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn calculator_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PolyhedralVolume<'static, Structure>>();

        let s = structure_of(&special::cuboid(1.0, 1.0, 1.0));
        let calc = PolyhedralVolume::new(&s);
        let sites: Vec<AtomIndex> = (0..8).collect();
        let results: Vec<f64> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| calc.cubic(&sites, &CUBE_FACES).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(results.iter().all(|v| v.to_bits() == results[0].to_bits()));
    }
}
