//! Crystal structures as coordinate providers.
//!
//! The volume math only needs one capability: resolve a site index to a
//! Cartesian coordinate. `CoordinateProvider` is that seam; `Structure` is the
//! in-memory implementation (lattice + fractional sites).
//!
//! Conventions
//! - Lattice vectors are the *rows* of the lattice matrix `M`, so
//!   `cart = Mᵀ · frac`.
//! - Angles in `Lattice::from_parameters` are in degrees; `a` lies along x
//!   and `b` in the xy-plane.

use std::fmt;

use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

use crate::periodic::wrap_frac;
use crate::types::{AtomIndex, Coord};

/// Lookup failure reported by a coordinate provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProviderError {
    NotFound { index: AtomIndex, len: usize },
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::NotFound { index, len } => {
                write!(f, "site {index} not found (structure has {len} sites)")
            }
        }
    }
}

impl std::error::Error for ProviderError {}

/// Read-only access to site coordinates.
pub trait CoordinateProvider {
    /// Number of addressable sites.
    fn site_count(&self) -> usize;
    /// Cartesian coordinate of `index`.
    fn cart_coord(&self, index: AtomIndex) -> Result<Coord, ProviderError>;
    /// Fractional coordinate of `index`.
    fn frac_coord(&self, index: AtomIndex) -> Result<Coord, ProviderError>;
}

impl<P: CoordinateProvider + ?Sized> CoordinateProvider for &P {
    #[inline]
    fn site_count(&self) -> usize {
        (**self).site_count()
    }
    #[inline]
    fn cart_coord(&self, index: AtomIndex) -> Result<Coord, ProviderError> {
        (**self).cart_coord(index)
    }
    #[inline]
    fn frac_coord(&self, index: AtomIndex) -> Result<Coord, ProviderError> {
        (**self).frac_coord(index)
    }
}

/// Periodic lattice spanned by three row vectors.
///
/// Invariants:
/// - `m` is invertible; `inv` is its inverse.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LatticeRepr", into = "LatticeRepr")]
pub struct Lattice {
    m: Matrix3<f64>,
    inv: Matrix3<f64>,
}

#[derive(Serialize, Deserialize)]
struct LatticeRepr {
    matrix: [[f64; 3]; 3],
}

impl TryFrom<LatticeRepr> for Lattice {
    type Error = String;

    fn try_from(repr: LatticeRepr) -> Result<Self, Self::Error> {
        let [a, b, c] = repr.matrix;
        Lattice::from_vectors(a.into(), b.into(), c.into())
            .ok_or_else(|| "lattice matrix is singular".to_string())
    }
}

impl From<Lattice> for LatticeRepr {
    fn from(l: Lattice) -> Self {
        let row = |i: usize| [l.m[(i, 0)], l.m[(i, 1)], l.m[(i, 2)]];
        LatticeRepr {
            matrix: [row(0), row(1), row(2)],
        }
    }
}

impl Lattice {
    /// Lattice from vectors `a`, `b`, `c`; `None` if they are linearly dependent.
    pub fn from_vectors(a: Coord, b: Coord, c: Coord) -> Option<Self> {
        let m = Matrix3::from_rows(&[a.transpose(), b.transpose(), c.transpose()]);
        let inv = m.try_inverse()?;
        Some(Self { m, inv })
    }

    /// Cubic lattice with edge `a`.
    pub fn cubic(a: f64) -> Option<Self> {
        Self::from_vectors(
            Coord::new(a, 0.0, 0.0),
            Coord::new(0.0, a, 0.0),
            Coord::new(0.0, 0.0, a),
        )
    }

    /// Lattice from cell lengths and angles (degrees).
    ///
    /// Orientation: `a ∥ x`, `b` in the xy-plane, `c` completes a
    /// right-handed cell. `None` for non-physical parameters.
    pub fn from_parameters(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Option<Self> {
        let (alpha, beta, gamma) = (alpha.to_radians(), beta.to_radians(), gamma.to_radians());
        let (ca, cb, cg) = (alpha.cos(), beta.cos(), gamma.cos());
        let (sb, sg) = (beta.sin(), gamma.sin());
        if sb.abs() < f64::EPSILON || sg.abs() < f64::EPSILON {
            return None;
        }
        // cos(alpha*) of the reciprocal cell.
        let cos_alpha_star = (cb * cg - ca) / (sb * sg);
        let sin_alpha_star_sq = 1.0 - cos_alpha_star * cos_alpha_star;
        if sin_alpha_star_sq <= 0.0 {
            return None;
        }
        let sin_alpha_star = sin_alpha_star_sq.sqrt();
        Self::from_vectors(
            Coord::new(a, 0.0, 0.0),
            Coord::new(b * cg, b * sg, 0.0),
            Coord::new(c * cb, -c * sb * cos_alpha_star, c * sb * sin_alpha_star),
        )
    }

    /// Row `i` (0 = a, 1 = b, 2 = c).
    #[inline]
    pub fn vector(&self, i: usize) -> Coord {
        self.m.row(i).transpose()
    }

    #[inline]
    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.m
    }

    #[inline]
    pub fn to_cart(&self, frac: Coord) -> Coord {
        self.m.transpose() * frac
    }

    #[inline]
    pub fn to_frac(&self, cart: Coord) -> Coord {
        self.inv.transpose() * cart
    }

    /// Cell volume `|det M|`.
    #[inline]
    pub fn volume(&self) -> f64 {
        self.m.determinant().abs()
    }
}

/// A labelled site in fractional coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub species: String,
    pub frac: Coord,
}

impl Site {
    pub fn new(species: impl Into<String>, frac: Coord) -> Self {
        Self {
            species: species.into(),
            frac,
        }
    }
}

/// Periodic crystal structure: a lattice and its sites.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    lattice: Lattice,
    sites: Vec<Site>,
}

impl Structure {
    pub fn new(lattice: Lattice, sites: Vec<Site>) -> Self {
        Self { lattice, sites }
    }

    /// Build from Cartesian positions; fractional coordinates are derived.
    pub fn from_cart<S: Into<String>>(
        lattice: Lattice,
        sites: impl IntoIterator<Item = (S, Coord)>,
    ) -> Self {
        let sites = sites
            .into_iter()
            .map(|(species, cart)| Site::new(species, lattice.to_frac(cart)))
            .collect();
        Self { lattice, sites }
    }

    #[inline]
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    #[inline]
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn site(&self, index: AtomIndex) -> Result<&Site, ProviderError> {
        self.sites.get(index).ok_or(ProviderError::NotFound {
            index,
            len: self.sites.len(),
        })
    }

    /// Cartesian coordinates of all sites, in site order.
    pub fn cart_coords(&self) -> Vec<Coord> {
        self.sites
            .iter()
            .map(|s| self.lattice.to_cart(s.frac))
            .collect()
    }

    /// Copy of this structure with every fractional coordinate wrapped into
    /// `(-0.5, 0.5]`. `self` is left untouched.
    pub fn wrapped(&self) -> Self {
        let sites = self
            .sites
            .iter()
            .map(|s| Site::new(s.species.clone(), wrap_frac(s.frac)))
            .collect();
        Self {
            lattice: self.lattice,
            sites,
        }
    }
}

impl CoordinateProvider for Structure {
    #[inline]
    fn site_count(&self) -> usize {
        self.sites.len()
    }

    fn cart_coord(&self, index: AtomIndex) -> Result<Coord, ProviderError> {
        let site = self.site(index)?;
        Ok(self.lattice.to_cart(site.frac))
    }

    fn frac_coord(&self, index: AtomIndex) -> Result<Coord, ProviderError> {
        Ok(self.site(index)?.frac)
    }
}
