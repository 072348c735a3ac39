//! Multi-segment well network state.
//!
//! A multi-segment well models its internal flow path as a tree of segments
//! rooted at the top (wellhead) segment, index 0. Each non-top segment has
//! exactly one outlet segment; inverting the outlet links yields the inlet
//! lists used for rate aggregation. The topology is caller-supplied and
//! assumed acyclic with every segment reachable from the top.

/// Segment tree topology: per segment, the outlet it feeds into.
///
/// Index 0 is the top segment and has no outlet. The convention (inherited
/// from the segment numbering of the input decks) is that a segment's outlet
/// has a smaller index, so a single forward pass can propagate pressures
/// outlet-first.
#[derive(Debug, Clone)]
pub struct SegmentTopology {
    outlet: Vec<Option<usize>>,
}

impl SegmentTopology {
    pub fn new(outlet: Vec<Option<usize>>) -> Self {
        debug_assert!(
            outlet.first().is_none_or(|o| o.is_none()),
            "top segment must not have an outlet"
        );
        Self { outlet }
    }

    pub fn len(&self) -> usize {
        self.outlet.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outlet.is_empty()
    }

    pub fn outlet(&self, seg: usize) -> Option<usize> {
        self.outlet[seg]
    }

    /// Invert the outlet links into per-segment inlet lists.
    pub fn inlets(&self) -> Vec<Vec<usize>> {
        let mut inlets = vec![Vec::new(); self.outlet.len()];
        for (seg, outlet) in self.outlet.iter().enumerate() {
            if let Some(out) = outlet {
                inlets[*out].push(seg);
            }
        }
        inlets
    }
}

/// Runtime state of one multi-segment well's segments.
///
/// Rates are flat `num_phases * num_segments`; the pressure-drop
/// decomposition sums to the drop relative to the outlet segment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentState {
    num_phases: usize,
    pub pressure: Vec<f64>,
    pub rates: Vec<f64>,
    pub pressure_drop_hydrostatic: Vec<f64>,
    pub pressure_drop_friction: Vec<f64>,
    pub pressure_drop_accel: Vec<f64>,
}

impl SegmentState {
    pub fn new(num_phases: usize, num_segments: usize) -> Self {
        Self {
            num_phases,
            pressure: vec![0.0; num_segments],
            rates: vec![0.0; num_phases * num_segments],
            pressure_drop_hydrostatic: vec![0.0; num_segments],
            pressure_drop_friction: vec![0.0; num_segments],
            pressure_drop_accel: vec![0.0; num_segments],
        }
    }

    pub fn len(&self) -> usize {
        self.pressure.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pressure.is_empty()
    }

    pub fn num_phases(&self) -> usize {
        self.num_phases
    }

    /// Phase rates of one segment.
    pub fn rates_of(&self, seg: usize) -> &[f64] {
        let np = self.num_phases;
        &self.rates[seg * np..(seg + 1) * np]
    }

    /// Total pressure drop of a segment relative to its outlet.
    pub fn pressure_drop(&self, seg: usize) -> f64 {
        self.pressure_drop_hydrostatic[seg]
            + self.pressure_drop_friction[seg]
            + self.pressure_drop_accel[seg]
    }
}

/// Aggregate per-perforation phase rates up the segment tree.
///
/// rate(segment) = sum of its own perforations' rates plus the rates of all
/// inlet segments. Implemented as an explicit post-order traversal over the
/// precomputed inlet lists; segment chains can be long enough that recursion
/// depth would be a liability.
///
/// `perforation_rates` is flat `np` per perforation, indexed by the local
/// perforation indices stored in `segment_perforations`.
pub fn aggregate_segment_rates(
    segment_inlets: &[Vec<usize>],
    segment_perforations: &[Vec<usize>],
    perforation_rates: &[f64],
    np: usize,
) -> Vec<f64> {
    debug_assert_eq!(segment_inlets.len(), segment_perforations.len());
    let nseg = segment_inlets.len();
    let mut rates = vec![0.0; np * nseg];
    if nseg == 0 {
        return rates;
    }

    // Depth-first preorder from the top segment; reversing it visits every
    // inlet before the segment it feeds.
    let mut order = Vec::with_capacity(nseg);
    let mut stack = vec![0_usize];
    while let Some(seg) = stack.pop() {
        order.push(seg);
        stack.extend_from_slice(&segment_inlets[seg]);
    }

    for &seg in order.iter().rev() {
        for &perf in &segment_perforations[seg] {
            for p in 0..np {
                rates[seg * np + p] += perforation_rates[perf * np + p];
            }
        }
        for &inlet in &segment_inlets[seg] {
            for p in 0..np {
                let inflow = rates[inlet * np + p];
                rates[seg * np + p] += inflow;
            }
        }
    }
    rates
}
