//! Collective-communication trait and the size-1 implementation.

use crate::error::CommsResult;

/// Collective operations over a group of SPMD ranks.
///
/// Implementations wrap whatever transport the driver uses (MPI in
/// production). All calls are collective: every rank in the group must make
/// the same call in the same relative order or the run deadlocks.
pub trait Communicator {
    /// This process's rank, in `0..size()`.
    fn rank(&self) -> usize;

    /// Number of ranks in the group.
    fn size(&self) -> usize;

    /// Element-wise sum across all ranks, result replicated everywhere.
    ///
    /// The buffer length must be identical on every rank.
    fn sum_in_place(&self, buf: &mut [f64]) -> CommsResult<()>;

    /// Gather variable-length contributions onto the root rank.
    ///
    /// Each rank contributes `local`; the root receives the concatenation in
    /// rank order (placement offsets come from a prefix sum over the
    /// per-rank counts). Non-root ranks receive `None`.
    fn gather_varying(&self, local: &[f64], root: usize) -> CommsResult<Option<Vec<f64>>>;
}

/// Trivial communicator for single-process runs and tests.
///
/// Every collective is an identity operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialComm;

impl Communicator for SerialComm {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn sum_in_place(&self, _buf: &mut [f64]) -> CommsResult<()> {
        Ok(())
    }

    fn gather_varying(&self, local: &[f64], root: usize) -> CommsResult<Option<Vec<f64>>> {
        debug_assert_eq!(root, 0, "serial communicator has a single rank");
        Ok(Some(local.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_sum_is_identity() {
        let comm = SerialComm;
        let mut buf = vec![1.0, -2.5, 0.0];
        comm.sum_in_place(&mut buf).unwrap();
        assert_eq!(buf, vec![1.0, -2.5, 0.0]);
    }

    #[test]
    fn serial_gather_returns_local_copy() {
        let comm = SerialComm;
        let local = [3.0, 4.0];
        let gathered = comm.gather_varying(&local, 0).unwrap().unwrap();
        assert_eq!(gathered, vec![3.0, 4.0]);
        assert_eq!(comm.rank(), 0);
        assert_eq!(comm.size(), 1);
    }
}
