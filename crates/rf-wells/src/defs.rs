//! Input definitions consumed at (re)initialization.
//!
//! These structs stand in for the parsed schedule objects the surrounding
//! system produces: per-well role, status, resolved control targets, and the
//! distributed-execution facts (ownership, global open-connection count).
//! Parsing and unit conversion happen upstream; everything here is plain SI.

use crate::segments::SegmentTopology;
use crate::single::{InjectorCMode, InjectorType, ProducerCMode, WellStatus};

/// Event flags signalling externally-triggered changes this report step.
pub mod events {
    pub const WELL_STATUS_CHANGE: u64 = 1 << 0;
    pub const PRODUCTION_UPDATE: u64 = 1 << 1;
    pub const INJECTION_UPDATE: u64 = 1 << 2;

    /// Events that invalidate the previous step's control mode during
    /// carry-over: the freshly-derived control wins when any of these fired.
    pub const CONTROL_EVENT_MASK: u64 =
        WELL_STATUS_CHANGE | PRODUCTION_UPDATE | INJECTION_UPDATE;
}

/// Resolved injection control targets for one well.
#[derive(Debug, Clone)]
pub struct InjectionControls {
    pub cmode: InjectorCMode,
    pub injector_type: InjectorType,
    /// Surface-volume rate target (positive).
    pub surface_rate: f64,
    pub bhp_limit: f64,
    /// Present only if the control set carries a THP limit.
    pub thp_limit: Option<f64>,
    /// Injection stream temperature (K).
    pub temperature: f64,
}

impl Default for InjectionControls {
    fn default() -> Self {
        Self {
            cmode: InjectorCMode::Undefined,
            injector_type: InjectorType::Water,
            surface_rate: 0.0,
            bhp_limit: 0.0,
            thp_limit: None,
            temperature: AMBIENT_TEMPERATURE,
        }
    }
}

/// Resolved production control targets for one well.
#[derive(Debug, Clone, Default)]
pub struct ProductionControls {
    pub cmode: ProducerCMode,
    /// Phase rate targets, stored positive; producing rates are negated
    /// when seeded into the state.
    pub oil_rate: f64,
    pub water_rate: f64,
    pub gas_rate: f64,
    pub bhp_limit: f64,
    /// Present only if the control set carries a THP limit.
    pub thp_limit: Option<f64>,
    /// Artificial-lift quantity default from the schedule.
    pub alq: f64,
}

/// Ambient default temperature (K) for wells without an injection stream.
pub const AMBIENT_TEMPERATURE: f64 = 273.15 + 15.56;

/// One well as defined by the schedule for the current report step.
#[derive(Debug, Clone)]
pub struct WellDefinition {
    pub name: String,
    pub producer: bool,
    pub injector: bool,
    pub status: WellStatus,
    pub injection: Option<InjectionControls>,
    pub production: Option<ProductionControls>,
    /// Event bitmask for this step (see [`events`]).
    pub events: u64,
    /// Number of open connections across all ranks. On a single rank this
    /// equals the local connection count.
    pub global_num_open_connections: usize,
    /// Segment topology for multi-segment wells.
    pub segments: Option<SegmentTopology>,
}

impl WellDefinition {
    pub fn is_multi_segment(&self) -> bool {
        self.segments.is_some()
    }

    /// Whether the active control set includes a THP limit.
    pub fn has_thp(&self) -> bool {
        if self.injector {
            self.injection.as_ref().is_some_and(|c| c.thp_limit.is_some())
        } else {
            self.production.as_ref().is_some_and(|c| c.thp_limit.is_some())
        }
    }
}

/// Distributed-execution facts for one well on this rank.
#[derive(Debug, Clone, Copy)]
pub struct WellOwnership {
    /// Exactly one rank owns each well; only the owner contributes the
    /// well's aggregate quantities to collective reductions.
    pub is_owner: bool,
    /// True when the well's connections live on more than one rank, in
    /// which case connection reporting requires a gather.
    pub spans_ranks: bool,
    /// Pressure of the well's first open connection, pre-broadcast by the
    /// driver for wells that span ranks. Wells local to one rank leave this
    /// unset and the first local connection's cell pressure is used.
    pub first_connection_pressure: Option<f64>,
}

impl Default for WellOwnership {
    fn default() -> Self {
        Self {
            is_owner: true,
            spans_ranks: false,
            first_connection_pressure: None,
        }
    }
}

/// Configuration for building a [`crate::WellState`].
#[derive(Debug, Clone, Copy, Default)]
pub struct WellStateOptions {
    /// Allocate the auxiliary solution-variable array per well (used by
    /// solver formulations that carry their primary variables in the well
    /// state).
    pub with_solution_variables: bool,
}
