//! rf-core: stable foundation for resflow.
//!
//! Contains:
//! - phase (active-phase set + dense position mapping)
//! - numeric (Real + comparison tolerances)

pub mod numeric;
pub mod phase;

// Re-exports: nice ergonomics for downstream crates
pub use numeric::*;
pub use phase::*;
