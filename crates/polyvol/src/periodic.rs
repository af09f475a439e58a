//! Periodic-boundary helpers (pure; nothing here mutates a structure).
//!
//! Clusters in a crystal often straddle the cell boundary: the stored
//! fractional coordinates of neighbouring sites may differ by almost a full
//! lattice vector. Volumes must be taken on the images that actually touch.
//! Two ways to get there:
//! - `Structure::wrapped()` / `wrap_frac`: shift every coordinate into
//!   `(-0.5, 0.5]`. Correct for clusters centred near the cell origin.
//! - `MinimumImage`: resolve every site to its image nearest to an anchor
//!   (typically the first site of the cluster). Works anywhere in the cell.

use crate::cfg::FRAC_EPS;
use crate::structure::{CoordinateProvider, ProviderError, Structure};
use crate::types::{AtomIndex, Coord};

/// Shift a fractional component by an integer into `(-0.5, 0.5]`.
///
/// Both `-0.5` and `0.5` map to `0.5`; everything else keeps its side.
#[inline]
pub fn wrap_scalar(x: f64) -> f64 {
    x - (x - 0.5).ceil()
}

/// Component-wise [`wrap_scalar`].
#[inline]
pub fn wrap_frac(frac: Coord) -> Coord {
    frac.map(wrap_scalar)
}

/// Image of `frac` closest to `anchor` in fractional space.
#[inline]
pub fn nearest_image(anchor: Coord, frac: Coord) -> Coord {
    anchor + wrap_frac(frac - anchor)
}

/// Provider adapter that resolves sites to their image nearest an anchor.
///
/// Nearest is measured per fractional component, which matches the
/// Cartesian minimum image for cells that are not strongly skewed.
#[derive(Clone, Copy, Debug)]
pub struct MinimumImage<'a> {
    structure: &'a Structure,
    anchor: Coord,
}

impl<'a> MinimumImage<'a> {
    /// Anchor at an explicit fractional coordinate.
    pub fn new(structure: &'a Structure, anchor: Coord) -> Self {
        Self { structure, anchor }
    }

    /// Anchor at the stored position of site `index`.
    pub fn about_site(structure: &'a Structure, index: AtomIndex) -> Result<Self, ProviderError> {
        let anchor = structure.frac_coord(index)?;
        Ok(Self::new(structure, anchor))
    }

    #[inline]
    pub fn anchor(&self) -> Coord {
        self.anchor
    }
}

impl CoordinateProvider for MinimumImage<'_> {
    #[inline]
    fn site_count(&self) -> usize {
        self.structure.len()
    }

    fn cart_coord(&self, index: AtomIndex) -> Result<Coord, ProviderError> {
        let frac = self.frac_coord(index)?;
        Ok(self.structure.lattice().to_cart(frac))
    }

    fn frac_coord(&self, index: AtomIndex) -> Result<Coord, ProviderError> {
        let stored = self.structure.frac_coord(index)?;
        let image = nearest_image(self.anchor, stored);
        if (image - stored).amax() > FRAC_EPS {
            tracing::trace!(index, shift = ?(image - stored), "site moved to nearest image");
        }
        Ok(image)
    }
}
