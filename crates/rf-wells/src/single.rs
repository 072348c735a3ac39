//! Per-well runtime state.

use core::fmt;

use rf_core::PhaseUsage;

use crate::defs::WellOwnership;
use crate::perf::PerforationState;
use crate::segments::SegmentState;

/// Well lifecycle status. Shut wells stay in the collection with this
/// terminal status; they are never deleted in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WellStatus {
    #[default]
    Open,
    Stop,
    Shut,
}

/// Active control mode for producers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProducerCMode {
    #[default]
    Undefined,
    /// Oil surface-rate target.
    Orat,
    /// Water surface-rate target.
    Wrat,
    /// Gas surface-rate target.
    Grat,
    /// Liquid (oil + water) surface-rate target.
    Lrat,
    /// Reservoir-volume rate target.
    Resv,
    Bhp,
    Thp,
    /// Target dictated by the enclosing group.
    Grup,
}

impl fmt::Display for ProducerCMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProducerCMode::Undefined => "UNDEFINED",
            ProducerCMode::Orat => "ORAT",
            ProducerCMode::Wrat => "WRAT",
            ProducerCMode::Grat => "GRAT",
            ProducerCMode::Lrat => "LRAT",
            ProducerCMode::Resv => "RESV",
            ProducerCMode::Bhp => "BHP",
            ProducerCMode::Thp => "THP",
            ProducerCMode::Grup => "GRUP",
        };
        f.write_str(s)
    }
}

/// Active control mode for injectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InjectorCMode {
    #[default]
    Undefined,
    /// Surface-rate target.
    Rate,
    /// Reservoir-volume rate target.
    Resv,
    Bhp,
    Thp,
    /// Target dictated by the enclosing group.
    Grup,
}

impl fmt::Display for InjectorCMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InjectorCMode::Undefined => "UNDEFINED",
            InjectorCMode::Rate => "RATE",
            InjectorCMode::Resv => "RESV",
            InjectorCMode::Bhp => "BHP",
            InjectorCMode::Thp => "THP",
            InjectorCMode::Grup => "GRUP",
        };
        f.write_str(s)
    }
}

/// Injected fluid for rate-controlled injectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectorType {
    Water,
    Oil,
    Gas,
    /// Multi-phase injection; rate seeding is not attempted for this type.
    Multi,
}

/// Runtime state of one well.
///
/// Identity is the well name, stable across timesteps even when the array
/// position changes. Sign convention for all rate arrays: negative for
/// producers, positive for injectors.
#[derive(Debug, Clone)]
pub struct SingleWellState {
    pub name: String,
    pub status: WellStatus,
    /// Fixed for the well's current role; a role flip only happens through
    /// external redefinition between steps, never in place.
    pub producer: bool,
    pub bhp: f64,
    pub thp: f64,
    pub temperature: f64,
    pub dissolved_gas_rate: f64,
    pub vaporized_oil_rate: f64,
    pub surface_rates: Vec<f64>,
    pub reservoir_rates: Vec<f64>,
    pub well_potentials: Vec<f64>,
    pub productivity_index: Vec<f64>,
    /// Auxiliary solver primary variables, allocated only when the solver
    /// formulation asks for them (`WellStateOptions`).
    pub solution_variables: Option<Vec<f64>>,
    pub injection_cmode: InjectorCMode,
    pub production_cmode: ProducerCMode,
    /// Bitmask of control-changing events flagged for this step.
    pub events: u64,
    pub parallel: WellOwnership,
    pub perf_data: PerforationState,
    /// Present only for multi-segment wells.
    pub segments: Option<SegmentState>,
}

impl SingleWellState {
    pub fn new(
        name: impl Into<String>,
        producer: bool,
        pu: &PhaseUsage,
        perf_data: PerforationState,
        parallel: WellOwnership,
        temperature: f64,
        with_solution_variables: bool,
    ) -> Self {
        let np = pu.num_phases();
        Self {
            name: name.into(),
            status: WellStatus::Open,
            producer,
            bhp: 0.0,
            thp: 0.0,
            temperature,
            dissolved_gas_rate: 0.0,
            vaporized_oil_rate: 0.0,
            surface_rates: vec![0.0; np],
            reservoir_rates: vec![0.0; np],
            well_potentials: vec![0.0; np],
            productivity_index: vec![0.0; np],
            solution_variables: with_solution_variables.then(|| vec![0.0; np]),
            injection_cmode: InjectorCMode::Undefined,
            production_cmode: ProducerCMode::Undefined,
            events: 0,
            parallel,
            perf_data,
            segments: None,
        }
    }

    /// Open the well. Idempotent; rates are left for the solver to fill.
    pub fn open(&mut self) {
        self.status = WellStatus::Open;
    }

    /// Stop the well: flow through the wellbore stops but the well stays
    /// connected. Zeroes rates, keeps bhp.
    pub fn stop(&mut self) {
        self.thp = 0.0;
        self.status = WellStatus::Stop;
        self.surface_rates.fill(0.0);
        self.reservoir_rates.fill(0.0);
        self.perf_data.zero_rates();
    }

    /// Shut the well: terminal for this step. Zeroes pressures and all
    /// well-level and connection-level rates.
    pub fn shut(&mut self) {
        self.status = WellStatus::Shut;
        self.bhp = 0.0;
        self.thp = 0.0;
        self.surface_rates.fill(0.0);
        self.reservoir_rates.fill(0.0);
        self.perf_data.zero_rates();
        if let Some(seg) = self.segments.as_mut() {
            seg.rates.fill(0.0);
        }
    }

    pub fn update_status(&mut self, status: WellStatus) {
        match status {
            WellStatus::Open => self.open(),
            WellStatus::Stop => self.stop(),
            WellStatus::Shut => self.shut(),
        }
    }

    pub fn sum_polymer_rates(&self) -> f64 {
        self.perf_data
            .polymer_rates
            .as_ref()
            .map_or(0.0, |r| r.iter().sum())
    }

    pub fn sum_brine_rates(&self) -> f64 {
        self.perf_data
            .brine_rates
            .as_ref()
            .map_or(0.0, |r| r.iter().sum())
    }

    pub fn sum_solvent_rates(&self) -> f64 {
        self.perf_data
            .solvent_rates
            .as_ref()
            .map_or(0.0, |r| r.iter().sum())
    }
}
