//! Cross-rank view of which wells are under group control.
//!
//! Each rank reports its local view of (status, active control mode) per
//! well; one collective merge makes the view globally consistent. The flag
//! vectors are 0/1 and merged with the sum collective: any rank seeing group
//! control makes the merged flag nonzero.

use crate::container::WellContainer;
use crate::single::{InjectorCMode, ProducerCMode, WellStatus};
use rf_comms::{Communicator, CommsResult};

#[derive(Debug, Clone, Default)]
pub struct GlobalWellInfo {
    names: WellContainer<()>,
    injecting_under_group: Vec<u8>,
    producing_under_group: Vec<u8>,
}

impl GlobalWellInfo {
    /// Build from the full well list of the report step. The list (and its
    /// order) must be identical on all ranks.
    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut container = WellContainer::new();
        for name in names {
            container.add(name, ());
        }
        let n = container.len();
        Self {
            names: container,
            injecting_under_group: vec![0; n],
            producing_under_group: vec![0; n],
        }
    }

    pub fn clear(&mut self) {
        self.injecting_under_group.fill(0);
        self.producing_under_group.fill(0);
    }

    pub fn well_index(&self, name: &str) -> Option<usize> {
        self.names.index_of(name)
    }

    /// Record this rank's view of an injector.
    pub fn update_injector(&mut self, idx: usize, status: WellStatus, cmode: InjectorCMode) {
        if status == WellStatus::Open && cmode == InjectorCMode::Grup {
            self.injecting_under_group[idx] = 1;
        }
    }

    /// Record this rank's view of a producer.
    pub fn update_producer(&mut self, idx: usize, status: WellStatus, cmode: ProducerCMode) {
        if status == WellStatus::Open && cmode == ProducerCMode::Grup {
            self.producing_under_group[idx] = 1;
        }
    }

    pub fn in_injecting_group(&self, name: &str) -> bool {
        self.well_index(name)
            .is_some_and(|idx| self.injecting_under_group[idx] != 0)
    }

    pub fn in_producing_group(&self, name: &str) -> bool {
        self.well_index(name)
            .is_some_and(|idx| self.producing_under_group[idx] != 0)
    }

    /// Merge all ranks' views with one collective call.
    pub fn communicate<C: Communicator>(&mut self, comm: &C) -> CommsResult<()> {
        let n = self.names.len();
        let mut buf: Vec<f64> = Vec::with_capacity(2 * n);
        buf.extend(self.injecting_under_group.iter().map(|&v| f64::from(v)));
        buf.extend(self.producing_under_group.iter().map(|&v| f64::from(v)));
        comm.sum_in_place(&mut buf)?;
        for (flag, &v) in self.injecting_under_group.iter_mut().zip(&buf[..n]) {
            *flag = u8::from(v != 0.0);
        }
        for (flag, &v) in self.producing_under_group.iter_mut().zip(&buf[n..]) {
            *flag = u8::from(v != 0.0);
        }
        Ok(())
    }
}
