//! Active-phase bookkeeping.
//!
//! A run uses a fixed subset of {water, oil, gas}, plus optional auxiliary
//! components (polymer, brine, solvent). Every rate/index array downstream is
//! laid out densely over the active phases; `PhaseUsage` is the single source
//! of truth for that layout and is immutable for the duration of a run.

/// One of the three reservoir phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Water,
    Oil,
    Gas,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Water, Phase::Oil, Phase::Gas];
}

/// Dense mapping from active phases to array positions.
///
/// Positions are assigned in water, oil, gas order over the active subset,
/// so a water-gas run maps water to 0 and gas to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseUsage {
    positions: [Option<usize>; 3],
    num_phases: usize,
    pub has_polymer: bool,
    pub has_brine: bool,
    pub has_solvent: bool,
}

impl PhaseUsage {
    /// Build a layout from the active subset, in water/oil/gas order.
    pub fn new(water: bool, oil: bool, gas: bool) -> Self {
        let mut positions = [None; 3];
        let mut next = 0;
        for (slot, active) in positions.iter_mut().zip([water, oil, gas]) {
            if active {
                *slot = Some(next);
                next += 1;
            }
        }
        Self {
            positions,
            num_phases: next,
            has_polymer: false,
            has_brine: false,
            has_solvent: false,
        }
    }

    /// Standard three-phase (black-oil) layout.
    pub fn water_oil_gas() -> Self {
        Self::new(true, true, true)
    }

    pub fn oil_gas() -> Self {
        Self::new(false, true, true)
    }

    pub fn water_oil() -> Self {
        Self::new(true, true, false)
    }

    pub fn with_polymer(mut self) -> Self {
        self.has_polymer = true;
        self
    }

    pub fn with_brine(mut self) -> Self {
        self.has_brine = true;
        self
    }

    pub fn with_solvent(mut self) -> Self {
        self.has_solvent = true;
        self
    }

    /// Number of active phases (length of every per-phase array).
    pub fn num_phases(&self) -> usize {
        self.num_phases
    }

    /// Dense position of a phase, or None if the phase is inactive.
    pub fn pos(&self, phase: Phase) -> Option<usize> {
        self.positions[phase as usize]
    }

    pub fn used(&self, phase: Phase) -> bool {
        self.positions[phase as usize].is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_phase_positions() {
        let pu = PhaseUsage::water_oil_gas();
        assert_eq!(pu.num_phases(), 3);
        assert_eq!(pu.pos(Phase::Water), Some(0));
        assert_eq!(pu.pos(Phase::Oil), Some(1));
        assert_eq!(pu.pos(Phase::Gas), Some(2));
    }

    #[test]
    fn two_phase_positions_are_dense() {
        let pu = PhaseUsage::oil_gas();
        assert_eq!(pu.num_phases(), 2);
        assert_eq!(pu.pos(Phase::Water), None);
        assert_eq!(pu.pos(Phase::Oil), Some(0));
        assert_eq!(pu.pos(Phase::Gas), Some(1));
        assert!(!pu.used(Phase::Water));
    }

    #[test]
    fn component_flags_default_off() {
        let pu = PhaseUsage::water_oil_gas();
        assert!(!pu.has_polymer && !pu.has_brine && !pu.has_solvent);
        let pu = pu.with_polymer().with_solvent();
        assert!(pu.has_polymer && pu.has_solvent && !pu.has_brine);
    }
}
