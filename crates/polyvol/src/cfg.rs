//! Tolerance defaults for cluster geometry.
//!
//! Policy
//! - Defaults are fixed constants. The only knob callers touch is
//!   `VolumeCfg`, which controls diagnostics, never the computed value.

/// Below this |volume| a fan tetrahedron counts as collapsed (coplanar apex).
pub(crate) const DEGENERATE_EPS: f64 = 1e-12;
/// Fractional shifts at or below this are not reported as image moves.
pub(crate) const FRAC_EPS: f64 = 1e-9;

/// Volume configuration (diagnostic tolerances).
#[derive(Clone, Copy, Debug)]
pub struct VolumeCfg {
    /// Fan tetrahedra with volume at or below this are reported as degenerate
    /// through a `tracing` warning. They still contribute to the sum.
    pub eps_degenerate: f64,
}

impl Default for VolumeCfg {
    fn default() -> Self {
        Self {
            eps_degenerate: DEGENERATE_EPS,
        }
    }
}
