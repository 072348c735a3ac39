//! Artificial-lift quantity bookkeeping.
//!
//! ALQ values have their own lifecycle: they persist across well-state
//! reinitialization and participate in the group-rate reduction round.
//! Per well there is a schedule default and an optional runtime override;
//! a changed default resets the override.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct AlqState {
    current: BTreeMap<String, f64>,
    default: BTreeMap<String, f64>,
}

impl AlqState {
    /// Refresh the schedule default for a well. A default that actually
    /// changed also resets the current value; an unchanged default leaves
    /// any runtime override in place.
    pub fn update_default(&mut self, name: &str, value: f64) {
        if self.default.get(name) != Some(&value) {
            self.default.insert(name.to_string(), value);
            self.current.insert(name.to_string(), value);
        }
    }

    /// Set a runtime override.
    pub fn set(&mut self, name: &str, value: f64) {
        self.current.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> f64 {
        self.current
            .get(name)
            .or_else(|| self.default.get(name))
            .copied()
            .unwrap_or(0.0)
    }

    /// Number of reduction-buffer slots this state occupies.
    pub fn pack_size(&self) -> usize {
        self.current.len()
    }

    /// Append values in deterministic (name-sorted) order; non-owned wells
    /// contribute zero so the collective sum counts each value once.
    pub fn pack_into(&self, buf: &mut [f64], owned: impl Fn(&str) -> bool) -> usize {
        let mut pos = 0;
        for (name, value) in &self.current {
            buf[pos] = if owned(name) { *value } else { 0.0 };
            pos += 1;
        }
        pos
    }

    /// Read back the reduced values in the same order as `pack_into`.
    pub fn unpack_from(&mut self, buf: &[f64]) -> usize {
        let mut pos = 0;
        for value in self.current.values_mut() {
            *value = buf[pos];
            pos += 1;
        }
        pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_and_override() {
        let mut alq = AlqState::default();
        assert_eq!(alq.get("P-1"), 0.0);
        alq.update_default("P-1", 3.0);
        assert_eq!(alq.get("P-1"), 3.0);
        alq.set("P-1", 5.0);
        assert_eq!(alq.get("P-1"), 5.0);
        // unchanged default keeps the override
        alq.update_default("P-1", 3.0);
        assert_eq!(alq.get("P-1"), 5.0);
        // changed default resets it
        alq.update_default("P-1", 4.0);
        assert_eq!(alq.get("P-1"), 4.0);
    }

    #[test]
    fn pack_unpack_round_trip() {
        let mut alq = AlqState::default();
        alq.update_default("B", 2.0);
        alq.update_default("A", 1.0);
        assert_eq!(alq.pack_size(), 2);
        let mut buf = vec![0.0; 2];
        // sorted by name: A then B
        let n = alq.pack_into(&mut buf, |_| true);
        assert_eq!(n, 2);
        assert_eq!(buf, vec![1.0, 2.0]);
        let n = alq.unpack_from(&[10.0, 20.0]);
        assert_eq!(n, 2);
        assert_eq!(alq.get("A"), 10.0);
        assert_eq!(alq.get("B"), 20.0);
    }

    #[test]
    fn non_owner_packs_zero() {
        let mut alq = AlqState::default();
        alq.update_default("A", 1.0);
        let mut buf = vec![f64::NAN];
        alq.pack_into(&mut buf, |_| false);
        assert_eq!(buf, vec![0.0]);
    }
}
