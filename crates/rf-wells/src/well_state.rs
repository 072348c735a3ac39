//! The aggregate well-state container and its orchestration logic:
//! initialization and carry-over across report steps, multi-segment network
//! seeding, cross-rank reduction, and report assembly.

use std::collections::BTreeMap;

use rf_comms::Communicator;
use rf_core::{Phase, PhaseUsage};
use rf_report::{
    ConnectionReport, CurrentControl, SegmentReport, WellRatesReport, WellReport, WellsReport,
};
use tracing::debug;

use crate::alq::AlqState;
use crate::container::WellContainer;
use crate::defs::{
    AMBIENT_TEMPERATURE, InjectionControls, ProductionControls, WellDefinition, WellOwnership,
    WellStateOptions, events,
};
use crate::error::{WellError, WellResult};
use crate::global_info::GlobalWellInfo;
use crate::perf::{PerforationData, PerforationState};
use crate::segments::{SegmentState, aggregate_segment_rates};
use crate::single::{InjectorCMode, InjectorType, ProducerCMode, SingleWellState, WellStatus};

/// Initial-guess bias applied to bhp when it is seeded from cell pressure:
/// a little above for injectors, below for producers, so the first Newton
/// iteration does not start from exact equilibrium with zero rates.
const BHP_SAFETY_FACTOR_INJECTOR: f64 = 1.01;
const BHP_SAFETY_FACTOR_PRODUCER: f64 = 0.99;

/// Gas connection rates are scaled by this factor when seeding segment
/// rates, to keep the initial gas-fraction guess away from zero. The
/// persisted connection rates are not touched.
const SEGMENT_GAS_SEED_SCALING: f64 = 100.0;

/// Runtime state of all wells on this rank for one report step.
///
/// Constructed fresh per report step via [`WellState::init`]; mutated in
/// place by the solver during Newton iterations; consulted for reduction and
/// reporting by the driver. A new step builds a new instance and carries
/// selected values over from the previous one, matched by well name.
#[derive(Debug, Clone)]
pub struct WellState {
    phase_usage: PhaseUsage,
    options: WellStateOptions,
    wells: WellContainer<SingleWellState>,
    /// Group-control rate bookkeeping: well name -> (owned by this rank,
    /// per-phase rates). Name-sorted so the reduction buffer layout is
    /// identical on every rank.
    well_rates: BTreeMap<String, (bool, Vec<f64>)>,
    alq_state: AlqState,
    global_well_info: Option<GlobalWellInfo>,
}

impl WellState {
    pub fn new(phase_usage: PhaseUsage, options: WellStateOptions) -> Self {
        Self {
            phase_usage,
            options,
            wells: WellContainer::new(),
            well_rates: BTreeMap::new(),
            alq_state: AlqState::default(),
            global_well_info: None,
        }
    }

    pub fn phase_usage(&self) -> &PhaseUsage {
        &self.phase_usage
    }

    pub fn num_wells(&self) -> usize {
        self.wells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wells.is_empty()
    }

    pub fn name(&self, idx: usize) -> &str {
        self.wells.name(idx)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.wells.index_of(name)
    }

    pub fn well(&self, idx: usize) -> &SingleWellState {
        self.wells.get(idx).expect("well index in range")
    }

    pub fn well_mut(&mut self, idx: usize) -> &mut SingleWellState {
        self.wells.get_mut(idx).expect("well index in range")
    }

    pub fn well_by_name(&self, name: &str) -> WellResult<&SingleWellState> {
        self.wells.by_name(name).ok_or_else(|| WellError::UnknownWell {
            well: name.to_string(),
        })
    }

    pub fn well_by_name_mut(&mut self, name: &str) -> WellResult<&mut SingleWellState> {
        self.wells
            .by_name_mut(name)
            .ok_or_else(|| WellError::UnknownWell {
                well: name.to_string(),
            })
    }

    pub fn wells(&self) -> impl Iterator<Item = &SingleWellState> {
        self.wells.iter()
    }

    pub fn global_well_info(&self) -> Option<&GlobalWellInfo> {
        self.global_well_info.as_ref()
    }

    pub fn alq(&self, name: &str) -> f64 {
        self.alq_state.get(name)
    }

    pub fn set_alq(&mut self, name: &str, value: f64) {
        self.alq_state.set(name, value);
    }

    /// Most recent group-control rates for a well.
    pub fn current_well_rates(&self, name: &str) -> WellResult<&[f64]> {
        self.well_rates
            .get(name)
            .map(|(_, rates)| rates.as_slice())
            .ok_or_else(|| WellError::UnknownWell {
                well: name.to_string(),
            })
    }

    pub fn current_well_rates_mut(&mut self, name: &str) -> WellResult<&mut [f64]> {
        self.well_rates
            .get_mut(name)
            .map(|(_, rates)| rates.as_mut_slice())
            .ok_or_else(|| WellError::UnknownWell {
                well: name.to_string(),
            })
    }

    pub fn well_is_owned(&self, name: &str) -> WellResult<bool> {
        self.well_by_name(name).map(|ws| ws.parallel.is_owner)
    }

    pub fn open_well(&mut self, idx: usize) {
        self.well_mut(idx).open();
    }

    pub fn stop_well(&mut self, idx: usize) {
        self.well_mut(idx).stop();
    }

    pub fn shut_well(&mut self, idx: usize) {
        self.well_mut(idx).shut();
    }

    pub fn update_status(&mut self, idx: usize, status: WellStatus) {
        self.well_mut(idx).update_status(status);
    }

    /// Populate the state for a report step.
    ///
    /// `wells`, `well_perf_data` and `ownership` run in lockstep; the well
    /// order defines the simulation well order for the step. `prev` is the
    /// previous step's state for carry-over, absent on the first step.
    pub fn init(
        &mut self,
        cell_pressures: &[f64],
        wells: &[WellDefinition],
        well_perf_data: &[Vec<PerforationData>],
        ownership: &[WellOwnership],
        prev: Option<&WellState>,
    ) -> WellResult<()> {
        debug_assert_eq!(wells.len(), well_perf_data.len());
        debug_assert_eq!(wells.len(), ownership.len());
        debug!(num_wells = wells.len(), "initializing well state");

        self.wells.clear();
        for ((def, perfs), own) in wells.iter().zip(well_perf_data).zip(ownership) {
            self.init_single_well(cell_pressures, def, perfs, *own)?;
        }

        self.global_well_info = Some(GlobalWellInfo::new(
            wells.iter().map(|def| def.name.as_str()),
        ));

        let np = self.phase_usage.num_phases();
        self.well_rates.clear();
        for (def, own) in wells.iter().zip(ownership) {
            self.well_rates
                .insert(def.name.clone(), (own.is_owner, vec![0.0; np]));
        }

        if wells.is_empty() {
            return Ok(());
        }

        // Seed per-connection state: equal split of the well's surface rates
        // over its (global) open connection count, pressure from the cell.
        for (w, def) in wells.iter().enumerate() {
            let ws = self.well_mut(w);
            let nperf = ws.perf_data.len();
            let global_nperf = def.global_num_open_connections;
            for perf in 0..nperf {
                if def.status == WellStatus::Open && global_nperf > 0 {
                    for p in 0..np {
                        ws.perf_data.phase_rates[perf * np + p] =
                            ws.surface_rates[p] / global_nperf as f64;
                    }
                }
                ws.perf_data.pressure[perf] = cell_pressures[ws.perf_data.cell_index[perf]];
            }
        }

        // Active control modes from the step's controls.
        for (w, def) in wells.iter().enumerate() {
            let ws = self.well_mut(w);
            if def.producer {
                if let Some(prod) = def.production.as_ref() {
                    ws.production_cmode = prod.cmode;
                }
            } else if let Some(inj) = def.injection.as_ref() {
                ws.injection_cmode = inj.cmode;
            }
        }

        // Status dispatch, applying the per-status zeroing rules.
        for (w, def) in wells.iter().enumerate() {
            self.update_status(w, def.status);
        }

        if let Some(prev) = prev.filter(|p| !p.is_empty()) {
            self.carry_over(wells, prev);
        }

        self.update_wells_default_alq(wells);
        Ok(())
    }

    /// Initialize one well's state from the initialization policy: sane
    /// starting pressures and rates for the nonlinear solve, derived from
    /// the active control mode.
    fn init_single_well(
        &mut self,
        cell_pressures: &[f64],
        def: &WellDefinition,
        perfs: &[PerforationData],
        own: WellOwnership,
    ) -> WellResult<()> {
        if def.injector == def.producer {
            return Err(WellError::BothOrNeitherRole {
                well: def.name.clone(),
            });
        }

        let pu = self.phase_usage;
        let temperature = if def.injector {
            def.injection
                .as_ref()
                .map_or(AMBIENT_TEMPERATURE, |c| c.temperature)
        } else {
            AMBIENT_TEMPERATURE
        };

        let perf_state = PerforationState::new(&pu, perfs);
        let ws = self.wells.add(
            def.name.clone(),
            SingleWellState::new(
                def.name.clone(),
                def.producer,
                &pu,
                perf_state,
                own,
                temperature,
                self.options.with_solution_variables,
            ),
        );
        ws.status = def.status;
        ws.events = def.events;

        // A well without open connections stays in its zero/default state.
        if ws.perf_data.is_empty() {
            return Ok(());
        }

        let inj_defaults = InjectionControls::default();
        let prod_defaults = ProductionControls::default();
        let inj = def.injection.as_ref().unwrap_or(&inj_defaults);
        let prod = def.production.as_ref().unwrap_or(&prod_defaults);

        let is_bhp = if def.injector {
            inj.cmode == InjectorCMode::Bhp
        } else {
            prod.cmode == ProducerCMode::Bhp
        };
        let bhp_limit = if def.injector {
            inj.bhp_limit
        } else {
            prod.bhp_limit
        };
        let global_pressure = own
            .first_connection_pressure
            .unwrap_or_else(|| cell_pressures[ws.perf_data.cell_index[0]]);

        // Thp: seed from the limit when one exists, otherwise keep zero.
        let thp_limit = if def.injector {
            inj.thp_limit
        } else {
            prod.thp_limit
        };
        if let Some(thp) = thp_limit {
            ws.thp = thp;
        }

        if def.status == WellStatus::Stop {
            // Stopped well: zero rates; bhp from the control if applicable,
            // otherwise the first connection's cell pressure unmodified.
            ws.bhp = if is_bhp { bhp_limit } else { global_pressure };
            return Ok(());
        }

        let is_grup = if def.injector {
            inj.cmode == InjectorCMode::Grup
        } else {
            prod.cmode == ProducerCMode::Grup
        };
        if is_grup {
            // Group-controlled: zero rates; bias bhp off the cell pressure.
            let safety_factor = if def.injector {
                BHP_SAFETY_FACTOR_INJECTOR
            } else {
                BHP_SAFETY_FACTOR_PRODUCER
            };
            ws.bhp = safety_factor * global_pressure;
            return Ok(());
        }

        // Open well under its own control: seed rates from the target when
        // the mode directly specifies one, otherwise keep zero (BHP/THP/RESV
        // cannot be converted to a rate guess without physics).
        if def.injector {
            if inj.cmode == InjectorCMode::Rate {
                let pos = match inj.injector_type {
                    InjectorType::Water => pu.pos(Phase::Water),
                    InjectorType::Oil => pu.pos(Phase::Oil),
                    InjectorType::Gas => pu.pos(Phase::Gas),
                    // Multi-phase injection targets are not seeded.
                    InjectorType::Multi => None,
                };
                if let Some(pos) = pos {
                    ws.surface_rates[pos] = inj.surface_rate;
                }
            }
        } else {
            // Producing rates are stored negative.
            let seed = match prod.cmode {
                ProducerCMode::Orat => pu.pos(Phase::Oil).map(|pos| (pos, prod.oil_rate)),
                ProducerCMode::Wrat => pu.pos(Phase::Water).map(|pos| (pos, prod.water_rate)),
                ProducerCMode::Grat => pu.pos(Phase::Gas).map(|pos| (pos, prod.gas_rate)),
                _ => None,
            };
            if let Some((pos, rate)) = seed {
                ws.surface_rates[pos] = -rate;
            }
        }

        ws.bhp = if is_bhp {
            bhp_limit
        } else {
            let safety_factor = if def.injector {
                BHP_SAFETY_FACTOR_INJECTOR
            } else {
                BHP_SAFETY_FACTOR_PRODUCER
            };
            safety_factor * global_pressure
        };
        Ok(())
    }

    /// Carry values over from the previous step's state, matched by name.
    fn carry_over(&mut self, wells: &[WellDefinition], prev: &WellState) {
        let np = self.phase_usage.num_phases();
        for (w, def) in wells.iter().enumerate() {
            if def.status == WellStatus::Shut {
                continue;
            }
            let new_well = self.wells.get_mut(w).expect("well index in range");

            if let Some(prev_well) = prev.wells.by_name(&def.name) {
                // A previously shut well and a well that flipped role
                // contribute nothing; the fresh initialization stands.
                if prev_well.status == WellStatus::Shut
                    || new_well.producer != prev_well.producer
                {
                    continue;
                }

                // Solver-mutated scalars continue into the new step.
                new_well.bhp = prev_well.bhp;
                new_well.thp = prev_well.thp;
                new_well.temperature = prev_well.temperature;

                // A control-changing event this step means the fresh control
                // wins; otherwise continue with the previous mode.
                if new_well.events & events::CONTROL_EVENT_MASK == 0 {
                    new_well.injection_cmode = prev_well.injection_cmode;
                    new_well.production_cmode = prev_well.production_cmode;
                }

                new_well.surface_rates.clone_from(&prev_well.surface_rates);
                new_well
                    .reservoir_rates
                    .clone_from(&prev_well.reservoir_rates);
                new_well
                    .well_potentials
                    .clone_from(&prev_well.well_potentials);

                // Connection rates transfer verbatim when the connection
                // count is unchanged; otherwise re-derive by equal split of
                // the carried-over surface rates.
                if !new_well.perf_data.copy_from(&prev_well.perf_data) {
                    let global_nperf = def.global_num_open_connections;
                    if global_nperf > 0 {
                        for perf in 0..new_well.perf_data.len() {
                            for p in 0..np {
                                new_well.perf_data.phase_rates[perf * np + p] =
                                    new_well.surface_rates[p] / global_nperf as f64;
                            }
                        }
                    }
                }

                new_well
                    .productivity_index
                    .clone_from(&prev_well.productivity_index);
            }

            // No active THP limit this step: thp is zero no matter what the
            // previous step carried.
            if !def.has_thp() {
                self.well_mut(w).thp = 0.0;
            }
        }
    }

    fn update_wells_default_alq(&mut self, wells: &[WellDefinition]) {
        for def in wells {
            if def.producer {
                let alq = def.production.as_ref().map_or(0.0, |c| c.alq);
                self.alq_state.update_default(&def.name, alq);
            }
        }
    }

    /// Seed segment state for multi-segment wells, once per (re)init.
    ///
    /// Builds the inlet and perforation assignments, aggregates connection
    /// rates up the tree, and assigns segment pressures (top segment = bhp,
    /// perforated segments from their first perforation, the rest from their
    /// outlet).
    pub fn init_ms_wells(&mut self, wells: &[WellDefinition], prev: Option<&WellState>) {
        let pu = self.phase_usage;
        let np = pu.num_phases();

        for (w, def) in wells.iter().enumerate() {
            let Some(topology) = def.segments.as_ref() else {
                continue;
            };
            let ws = self.wells.get_mut(w).expect("well index in range");
            let nseg = topology.len();
            let mut seg_state = SegmentState::new(np, nseg);

            let mut segment_perforations: Vec<Vec<usize>> = vec![Vec::new(); nseg];
            for (perf, segment) in ws.perf_data.segment.iter().enumerate() {
                if let Some(seg) = segment {
                    segment_perforations[*seg].push(perf);
                }
            }
            let segment_inlets = topology.inlets();

            // Aggregation seeds only: gas rates are scaled up so the initial
            // gas-fraction guess is not degenerate. Persisted connection
            // rates keep their true values.
            let mut seed_rates = ws.perf_data.phase_rates.clone();
            if let Some(gas_pos) = pu.pos(Phase::Gas) {
                for perf in 0..ws.perf_data.len() {
                    seed_rates[perf * np + gas_pos] *= SEGMENT_GAS_SEED_SCALING;
                }
            }
            seg_state.rates =
                aggregate_segment_rates(&segment_inlets, &segment_perforations, &seed_rates, np);

            if nseg > 0 {
                seg_state.pressure[0] = ws.bhp;
            }
            for seg in 1..nseg {
                if let Some(&first_perf) = segment_perforations[seg].first() {
                    seg_state.pressure[seg] = ws.perf_data.pressure[first_perf];
                } else if let Some(outlet) = topology.outlet(seg) {
                    // Relies on outlets carrying smaller indices, so the
                    // outlet pressure is already concrete.
                    debug_assert!(outlet < seg, "outlet must be resolved before its inlets");
                    seg_state.pressure[seg] = seg_state.pressure[outlet];
                }
            }

            ws.segments = Some(seg_state);
        }

        let Some(prev) = prev else {
            return;
        };
        for (w, def) in wells.iter().enumerate() {
            if def.status == WellStatus::Shut || !def.is_multi_segment() {
                continue;
            }
            let Some(prev_well) = prev.wells.by_name(&def.name) else {
                continue;
            };
            if prev_well.status == WellStatus::Shut {
                continue;
            }
            let Some(prev_segments) = prev_well.segments.as_ref() else {
                continue;
            };
            let ws = self.wells.get_mut(w).expect("well index in range");
            let count_matches = ws
                .segments
                .as_ref()
                .is_some_and(|s| s.len() == prev_segments.len());
            // Differing segment counts between steps are an unsupported
            // structural change; the fresh initialization stands.
            if count_matches {
                ws.segments = Some(prev_segments.clone());
            }
        }
    }

    /// Reduce group-control quantities across ranks with one collective sum.
    ///
    /// Every value that feeds a group-control decision (group rates, ALQ) is
    /// packed into one flat buffer in a deterministic order; non-owning
    /// ranks contribute zero, so each quantity is counted exactly once. The
    /// buffer layout must be identical on all ranks of the round.
    pub fn communicate_group_rates<C: Communicator>(&mut self, comm: &C) -> WellResult<()> {
        let sz: usize = self
            .well_rates
            .values()
            .map(|(_, rates)| rates.len())
            .sum::<usize>()
            + self.alq_state.pack_size();
        debug!(buffer_len = sz, "reducing group rates");

        let mut data = vec![0.0; sz];
        let mut pos = 0;
        for (owner, rates) in self.well_rates.values() {
            for value in rates {
                data[pos] = if *owner { *value } else { 0.0 };
                pos += 1;
            }
        }
        let well_rates = &self.well_rates;
        pos += self.alq_state.pack_into(&mut data[pos..], |name| {
            well_rates.get(name).is_none_or(|(owner, _)| *owner)
        });
        debug_assert_eq!(pos, sz);

        comm.sum_in_place(&mut data)?;

        let mut pos = 0;
        for (_, rates) in self.well_rates.values_mut() {
            for value in rates.iter_mut() {
                *value = data[pos];
                pos += 1;
            }
        }
        pos += self.alq_state.unpack_from(&data[pos..]);
        debug_assert_eq!(pos, sz);
        Ok(())
    }

    /// Rebuild and merge the global group-control view.
    ///
    /// Must run after any local status/control-mode change and before any
    /// decision that depends on global group-control state.
    pub fn update_global_is_grup<C: Communicator>(&mut self, comm: &C) -> WellResult<()> {
        let Some(info) = self.global_well_info.as_mut() else {
            return Ok(());
        };
        info.clear();
        for ws in self.wells.iter() {
            let Some(idx) = info.well_index(&ws.name) else {
                continue;
            };
            if ws.producer {
                info.update_producer(idx, ws.status, ws.production_cmode);
            } else {
                info.update_injector(idx, ws.status, ws.injection_cmode);
            }
        }
        info.communicate(comm)?;
        Ok(())
    }

    /// Zero-valued (re)initialization used on restart, before the restart
    /// values are loaded on top.
    pub fn resize(
        &mut self,
        wells: &[WellDefinition],
        well_perf_data: &[Vec<PerforationData>],
        ownership: &[WellOwnership],
        handle_ms_wells: bool,
        num_cells: usize,
    ) -> WellResult<()> {
        let zero_pressures = vec![0.0; num_cells];
        self.init(&zero_pressures, wells, well_perf_data, ownership, None)?;
        if handle_ms_wells {
            self.init_ms_wells(wells, None);
        }
        Ok(())
    }

    /// Replace connection transmissibility factors for an existing well.
    ///
    /// The supplied connection list must agree with the existing one in
    /// count, cell indices, and saturation table ids; any disagreement is a
    /// fatal consistency error.
    pub fn reset_connection_trans_factors(
        &mut self,
        name: &str,
        new_perf_data: &[PerforationData],
    ) -> WellResult<()> {
        let well = name.to_string();
        let ws = self.well_by_name_mut(name)?;
        let perf_data = &mut ws.perf_data;
        if perf_data.len() != new_perf_data.len() {
            return Err(WellError::PerforationCountMismatch {
                well,
                expected: perf_data.len(),
                actual: new_perf_data.len(),
            });
        }
        for (conn, new_conn) in new_perf_data.iter().enumerate() {
            if perf_data.cell_index[conn] != new_conn.cell_index {
                return Err(WellError::CellIndexMismatch {
                    well,
                    connection: conn,
                });
            }
            if perf_data.satnum_id[conn] != new_conn.satnum_id {
                return Err(WellError::SatnumMismatch {
                    well,
                    connection: conn,
                });
            }
            perf_data.connection_transmissibility_factor[conn] =
                new_conn.connection_transmissibility_factor;
        }
        Ok(())
    }

    /// Produce the immutable report snapshot for output.
    ///
    /// `global_cell_index_map` maps local cell indices to the global
    /// numbering used in reports. Shut wells are omitted unless
    /// `was_dynamically_closed` marks the closure as having happened during
    /// this step. Wells whose connections span ranks gather their
    /// connection lists onto rank 0; only rank 0's report carries them.
    pub fn report<C: Communicator>(
        &self,
        global_cell_index_map: &[usize],
        was_dynamically_closed: impl Fn(usize) -> bool,
        comm: &C,
    ) -> WellResult<WellsReport> {
        let mut report = WellsReport::default();
        if self.is_empty() {
            return Ok(report);
        }

        for (w, ws) in self.wells.iter().enumerate() {
            if ws.status == WellStatus::Shut && !was_dynamically_closed(w) {
                continue;
            }

            let connections = if ws.parallel.spans_ranks {
                let local = self.connection_lanes(ws, global_cell_index_map);
                match comm.gather_varying(&local, 0)? {
                    Some(gathered) => self.connections_from_lanes(&gathered),
                    None => Vec::new(),
                }
            } else {
                let lanes = self.connection_lanes(ws, global_cell_index_map);
                self.connections_from_lanes(&lanes)
            };

            let mut segments = BTreeMap::new();
            if let Some(seg_state) = ws.segments.as_ref() {
                for seg in 0..seg_state.len() {
                    segments.insert(seg, self.report_segment(seg_state, seg));
                }
            }

            report.wells.insert(
                ws.name.clone(),
                WellReport {
                    bhp: ws.bhp,
                    thp: ws.thp,
                    temperature: ws.temperature,
                    rates: self.report_well_rates(ws),
                    control: CurrentControl {
                        is_producer: ws.producer,
                        prod: ws.production_cmode.to_string(),
                        inj: ws.injection_cmode.to_string(),
                    },
                    connections,
                    segments,
                },
            );
        }
        Ok(report)
    }

    fn report_well_rates(&self, ws: &SingleWellState) -> WellRatesReport {
        let pu = &self.phase_usage;
        let mut rates = WellRatesReport {
            alq: if ws.producer {
                self.alq_state.get(&ws.name)
            } else {
                0.0
            },
            dissolved_gas: ws.dissolved_gas_rate,
            vaporized_oil: ws.vaporized_oil_rate,
            ..Default::default()
        };
        if let Some(pos) = pu.pos(Phase::Water) {
            rates.water = Some(ws.surface_rates[pos]);
            rates.reservoir_water = Some(ws.reservoir_rates[pos]);
            rates.productivity_index_water = Some(ws.productivity_index[pos]);
            rates.well_potential_water = Some(ws.well_potentials[pos]);
        }
        if let Some(pos) = pu.pos(Phase::Oil) {
            rates.oil = Some(ws.surface_rates[pos]);
            rates.reservoir_oil = Some(ws.reservoir_rates[pos]);
            rates.productivity_index_oil = Some(ws.productivity_index[pos]);
            rates.well_potential_oil = Some(ws.well_potentials[pos]);
        }
        if let Some(pos) = pu.pos(Phase::Gas) {
            rates.gas = Some(ws.surface_rates[pos]);
            rates.reservoir_gas = Some(ws.reservoir_rates[pos]);
            rates.productivity_index_gas = Some(ws.productivity_index[pos]);
            rates.well_potential_gas = Some(ws.well_potentials[pos]);
        }
        if pu.has_solvent {
            rates.solvent = Some(ws.sum_solvent_rates());
        }
        if pu.has_polymer {
            rates.polymer = Some(ws.sum_polymer_rates());
        }
        if pu.has_brine {
            rates.brine = Some(ws.sum_brine_rates());
        }
        rates
    }

    fn report_segment(&self, seg_state: &SegmentState, seg: usize) -> SegmentReport {
        let pu = &self.phase_usage;
        let rates = seg_state.rates_of(seg);
        SegmentReport {
            segment: seg,
            pressure: seg_state.pressure[seg],
            pressure_drop: seg_state.pressure_drop(seg),
            pressure_drop_hydrostatic: seg_state.pressure_drop_hydrostatic[seg],
            pressure_drop_friction: seg_state.pressure_drop_friction[seg],
            pressure_drop_accel: seg_state.pressure_drop_accel[seg],
            water_rate: pu.pos(Phase::Water).map(|pos| rates[pos]),
            oil_rate: pu.pos(Phase::Oil).map(|pos| rates[pos]),
            gas_rate: pu.pos(Phase::Gas).map(|pos| rates[pos]),
        }
    }

    /// Number of buffer slots one connection occupies in the gather
    /// encoding: index, pressure, reservoir rate, trans factor, per-phase
    /// rates and productivity indices, then the active auxiliary rates.
    fn connection_lane_width(&self) -> usize {
        let pu = &self.phase_usage;
        let aux = usize::from(pu.has_polymer)
            + usize::from(pu.has_brine)
            + usize::from(pu.has_solvent);
        4 + 2 * pu.num_phases() + aux
    }

    /// Flatten this rank's connection records into gatherable lanes.
    fn connection_lanes(&self, ws: &SingleWellState, global_cell_index_map: &[usize]) -> Vec<f64> {
        let pu = &self.phase_usage;
        let np = pu.num_phases();
        let perf_data = &ws.perf_data;
        let mut lanes = Vec::with_capacity(self.connection_lane_width() * perf_data.len());
        for perf in 0..perf_data.len() {
            lanes.push(global_cell_index_map[perf_data.cell_index[perf]] as f64);
            lanes.push(perf_data.pressure[perf]);
            lanes.push(perf_data.rates[perf]);
            lanes.push(perf_data.connection_transmissibility_factor[perf]);
            lanes.extend_from_slice(&perf_data.phase_rates[perf * np..(perf + 1) * np]);
            lanes.extend_from_slice(&perf_data.productivity_index[perf * np..(perf + 1) * np]);
            if let Some(rates) = perf_data.polymer_rates.as_ref() {
                lanes.push(rates[perf]);
            }
            if let Some(rates) = perf_data.brine_rates.as_ref() {
                lanes.push(rates[perf]);
            }
            if let Some(rates) = perf_data.solvent_rates.as_ref() {
                lanes.push(rates[perf]);
            }
        }
        lanes
    }

    fn connections_from_lanes(&self, lanes: &[f64]) -> Vec<ConnectionReport> {
        let pu = &self.phase_usage;
        let np = pu.num_phases();
        let width = self.connection_lane_width();
        debug_assert_eq!(lanes.len() % width, 0);

        let mut connections = Vec::with_capacity(lanes.len() / width);
        for lane in lanes.chunks_exact(width) {
            let mut conn = ConnectionReport {
                index: lane[0] as usize,
                pressure: lane[1],
                reservoir_rate: lane[2],
                trans_factor: lane[3],
                ..Default::default()
            };
            let rates = &lane[4..4 + np];
            let pi = &lane[4 + np..4 + 2 * np];
            if let Some(pos) = pu.pos(Phase::Water) {
                conn.water_rate = Some(rates[pos]);
                conn.productivity_index_water = Some(pi[pos]);
            }
            if let Some(pos) = pu.pos(Phase::Oil) {
                conn.oil_rate = Some(rates[pos]);
                conn.productivity_index_oil = Some(pi[pos]);
            }
            if let Some(pos) = pu.pos(Phase::Gas) {
                conn.gas_rate = Some(rates[pos]);
                conn.productivity_index_gas = Some(pi[pos]);
            }
            let mut aux = 4 + 2 * np;
            if pu.has_polymer {
                conn.polymer_rate = Some(lane[aux]);
                aux += 1;
            }
            if pu.has_brine {
                conn.brine_rate = Some(lane[aux]);
                aux += 1;
            }
            if pu.has_solvent {
                conn.solvent_rate = Some(lane[aux]);
            }
            connections.push(conn);
        }
        connections
    }
}
