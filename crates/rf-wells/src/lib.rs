//! rf-wells: runtime well state for a fully-implicit multiphase reservoir
//! simulator.
//!
//! Maintains the per-well state (pressures, rates, control modes,
//! connections, multi-segment networks) across Newton iterations and across
//! report steps, including:
//! - initialization policy that produces physically sane starting values
//! - name-keyed carry-over between steps, robust to reordering and
//!   structural changes
//! - segment-tree rate aggregation for multi-segment wells
//! - owner-aware cross-rank reduction so distributed partial sums are
//!   counted exactly once
//!
//! Physics (PVT, flow equations, Jacobians), schedule parsing, and output
//! serialization are external collaborators.

pub mod alq;
pub mod container;
pub mod defs;
pub mod error;
pub mod global_info;
pub mod perf;
pub mod segments;
pub mod single;
pub mod well_state;

pub use alq::AlqState;
pub use container::WellContainer;
pub use defs::{
    AMBIENT_TEMPERATURE, InjectionControls, ProductionControls, WellDefinition, WellOwnership,
    WellStateOptions, events,
};
pub use error::{WellError, WellResult};
pub use global_info::GlobalWellInfo;
pub use perf::{PerforationData, PerforationState};
pub use segments::{SegmentState, SegmentTopology, aggregate_segment_rates};
pub use single::{InjectorCMode, InjectorType, ProducerCMode, SingleWellState, WellStatus};
pub use well_state::WellState;
