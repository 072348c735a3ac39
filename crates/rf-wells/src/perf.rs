//! Per-connection (perforation) state.
//!
//! Stored structure-of-arrays, indexed by local connection index. All value
//! arrays stay in lockstep with the number of open connections for the well;
//! `phase_rates` and `productivity_index` are flat `num_phases * len` arrays
//! so the solver can mutate contiguous sub-ranges in place.

use rf_core::PhaseUsage;

/// One open connection as supplied by the schedule/grid collaborators.
#[derive(Debug, Clone, Copy)]
pub struct PerforationData {
    /// Index of the perforated grid cell (not owned by this core).
    pub cell_index: usize,
    pub connection_transmissibility_factor: f64,
    /// Saturation function table id.
    pub satnum_id: i32,
    /// Owning segment for multi-segment wells.
    pub segment: Option<usize>,
}

/// Runtime state of all open connections of one well.
#[derive(Debug, Clone, Default)]
pub struct PerforationState {
    num_phases: usize,
    pub cell_index: Vec<usize>,
    pub connection_transmissibility_factor: Vec<f64>,
    pub satnum_id: Vec<i32>,
    /// Owning segment per connection (multi-segment wells only).
    pub segment: Vec<Option<usize>>,
    pub pressure: Vec<f64>,
    /// Total reservoir-volume rate per connection.
    pub rates: Vec<f64>,
    /// Surface-volume rate per connection and phase, flat `np * len`.
    pub phase_rates: Vec<f64>,
    /// Productivity index per connection and phase, flat `np * len`.
    pub productivity_index: Vec<f64>,
    pub polymer_rates: Option<Vec<f64>>,
    pub brine_rates: Option<Vec<f64>>,
    pub solvent_rates: Option<Vec<f64>>,
}

impl PerforationState {
    pub fn new(pu: &PhaseUsage, connections: &[PerforationData]) -> Self {
        let n = connections.len();
        let np = pu.num_phases();
        let aux = |active: bool| active.then(|| vec![0.0; n]);
        Self {
            num_phases: np,
            cell_index: connections.iter().map(|c| c.cell_index).collect(),
            connection_transmissibility_factor: connections
                .iter()
                .map(|c| c.connection_transmissibility_factor)
                .collect(),
            satnum_id: connections.iter().map(|c| c.satnum_id).collect(),
            segment: connections.iter().map(|c| c.segment).collect(),
            pressure: vec![0.0; n],
            rates: vec![0.0; n],
            phase_rates: vec![0.0; np * n],
            productivity_index: vec![0.0; np * n],
            polymer_rates: aux(pu.has_polymer),
            brine_rates: aux(pu.has_brine),
            solvent_rates: aux(pu.has_solvent),
        }
    }

    pub fn len(&self) -> usize {
        self.cell_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cell_index.is_empty()
    }

    pub fn num_phases(&self) -> usize {
        self.num_phases
    }

    /// Phase rates of one connection.
    pub fn phase_rates_of(&self, perf: usize) -> &[f64] {
        let np = self.num_phases;
        &self.phase_rates[perf * np..(perf + 1) * np]
    }

    /// Copy all value arrays from `other` when the connection counts match.
    ///
    /// Returns false (and leaves `self` untouched) on a count mismatch; the
    /// caller then falls back to re-deriving the rates.
    pub fn copy_from(&mut self, other: &PerforationState) -> bool {
        if self.len() != other.len() || self.num_phases != other.num_phases {
            return false;
        }
        self.pressure.clone_from(&other.pressure);
        self.rates.clone_from(&other.rates);
        self.phase_rates.clone_from(&other.phase_rates);
        self.productivity_index.clone_from(&other.productivity_index);
        self.connection_transmissibility_factor
            .clone_from(&other.connection_transmissibility_factor);
        if let (Some(dst), Some(src)) = (self.polymer_rates.as_mut(), other.polymer_rates.as_ref())
        {
            dst.clone_from(src);
        }
        if let (Some(dst), Some(src)) = (self.brine_rates.as_mut(), other.brine_rates.as_ref()) {
            dst.clone_from(src);
        }
        if let (Some(dst), Some(src)) = (self.solvent_rates.as_mut(), other.solvent_rates.as_ref())
        {
            dst.clone_from(src);
        }
        true
    }

    /// Zero all rate entries (well-status zeroing rules).
    pub fn zero_rates(&mut self) {
        self.rates.fill(0.0);
        self.phase_rates.fill(0.0);
        if let Some(r) = self.polymer_rates.as_mut() {
            r.fill(0.0);
        }
        if let Some(r) = self.brine_rates.as_mut() {
            r.fill(0.0);
        }
        if let Some(r) = self.solvent_rates.as_mut() {
            r.fill(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_conns() -> Vec<PerforationData> {
        (0..3)
            .map(|i| PerforationData {
                cell_index: 10 + i,
                connection_transmissibility_factor: 1.5,
                satnum_id: 1,
                segment: None,
            })
            .collect()
    }

    #[test]
    fn arrays_stay_in_lockstep() {
        let pu = PhaseUsage::water_oil_gas().with_polymer();
        let perf = PerforationState::new(&pu, &three_conns());
        assert_eq!(perf.len(), 3);
        assert_eq!(perf.pressure.len(), 3);
        assert_eq!(perf.phase_rates.len(), 9);
        assert_eq!(perf.productivity_index.len(), 9);
        assert_eq!(perf.polymer_rates.as_ref().unwrap().len(), 3);
        assert!(perf.brine_rates.is_none());
    }

    #[test]
    fn copy_from_rejects_count_mismatch() {
        let pu = PhaseUsage::water_oil_gas();
        let mut a = PerforationState::new(&pu, &three_conns());
        let b = PerforationState::new(&pu, &three_conns()[..2]);
        assert!(!a.copy_from(&b));
        // untouched
        assert_eq!(a.len(), 3);
    }

    #[test]
    fn copy_from_copies_values() {
        let pu = PhaseUsage::water_oil_gas();
        let mut a = PerforationState::new(&pu, &three_conns());
        let mut b = PerforationState::new(&pu, &three_conns());
        b.pressure[1] = 5.0e6;
        b.phase_rates[4] = -2.0;
        assert!(a.copy_from(&b));
        assert_eq!(a.pressure[1], 5.0e6);
        assert_eq!(a.phase_rates_of(1)[1], -2.0);
    }

    #[test]
    fn zero_rates_leaves_pressure_alone() {
        let pu = PhaseUsage::water_oil_gas();
        let mut a = PerforationState::new(&pu, &three_conns());
        a.pressure[0] = 1.0e7;
        a.phase_rates.fill(-3.0);
        a.rates.fill(-1.0);
        a.zero_rates();
        assert!(a.phase_rates.iter().all(|&v| v == 0.0));
        assert!(a.rates.iter().all(|&v| v == 0.0));
        assert_eq!(a.pressure[0], 1.0e7);
    }
}
