//! Scalar numeric conventions shared across the workspace.

/// Floating point type for all physical quantities (plain SI).
pub type Real = f64;

/// Absolute/relative tolerance pair for float comparisons.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

impl Tolerances {
    /// Tight pair for checks expected to hold to rounding error, like
    /// conservation of a quantity split and re-summed.
    pub fn strict() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-12,
        }
    }

    pub fn nearly_equal(self, a: Real, b: Real) -> bool {
        let diff = (a - b).abs();
        diff <= self.abs || diff <= self.rel * a.abs().max(b.abs())
    }
}
