//! Report data types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Snapshot of every reportable well, keyed by well name.
///
/// Wells that are shut are absent unless they were closed dynamically during
/// the step being reported.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WellsReport {
    pub wells: BTreeMap<String, WellReport>,
}

impl WellsReport {
    pub fn is_empty(&self) -> bool {
        self.wells.is_empty()
    }
}

/// Per-well snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WellReport {
    pub bhp: f64,
    pub thp: f64,
    pub temperature: f64,
    pub rates: WellRatesReport,
    pub control: CurrentControl,
    pub connections: Vec<ConnectionReport>,
    /// Per-segment results for multi-segment wells, keyed by segment index.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub segments: BTreeMap<usize, SegmentReport>,
}

/// Per-phase and auxiliary rate entries; a field is `None` when that phase
/// or component is not active in the run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WellRatesReport {
    pub water: Option<f64>,
    pub oil: Option<f64>,
    pub gas: Option<f64>,
    pub reservoir_water: Option<f64>,
    pub reservoir_oil: Option<f64>,
    pub reservoir_gas: Option<f64>,
    pub productivity_index_water: Option<f64>,
    pub productivity_index_oil: Option<f64>,
    pub productivity_index_gas: Option<f64>,
    pub well_potential_water: Option<f64>,
    pub well_potential_oil: Option<f64>,
    pub well_potential_gas: Option<f64>,
    pub solvent: Option<f64>,
    pub polymer: Option<f64>,
    pub brine: Option<f64>,
    /// Artificial-lift quantity; zero for injectors.
    pub alq: f64,
    pub dissolved_gas: f64,
    pub vaporized_oil: f64,
}

/// Active control mode at report time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurrentControl {
    pub is_producer: bool,
    /// Name of the active producer control mode (e.g. "ORAT", "BHP").
    pub prod: String,
    /// Name of the active injector control mode (e.g. "RATE", "GRUP").
    pub inj: String,
}

/// Per-connection snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionReport {
    /// Global cell index of the perforated cell.
    pub index: usize,
    pub pressure: f64,
    pub reservoir_rate: f64,
    pub trans_factor: f64,
    pub water_rate: Option<f64>,
    pub oil_rate: Option<f64>,
    pub gas_rate: Option<f64>,
    pub productivity_index_water: Option<f64>,
    pub productivity_index_oil: Option<f64>,
    pub productivity_index_gas: Option<f64>,
    pub solvent_rate: Option<f64>,
    pub polymer_rate: Option<f64>,
    pub brine_rate: Option<f64>,
}

/// Per-segment snapshot for multi-segment wells.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SegmentReport {
    pub segment: usize,
    pub pressure: f64,
    /// Total drop relative to the outlet segment; equals the sum of the
    /// three decomposition terms below.
    pub pressure_drop: f64,
    pub pressure_drop_hydrostatic: f64,
    pub pressure_drop_friction: f64,
    pub pressure_drop_accel: f64,
    pub water_rate: Option<f64>,
    pub oil_rate: Option<f64>,
    pub gas_rate: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_round_trips_through_json() {
        let mut report = WellsReport::default();
        report.wells.insert(
            "P-1".to_string(),
            WellReport {
                bhp: 2.5e7,
                thp: 1.0e7,
                temperature: 288.71,
                rates: WellRatesReport {
                    oil: Some(-120.0),
                    alq: 4.2,
                    ..Default::default()
                },
                control: CurrentControl {
                    is_producer: true,
                    prod: "ORAT".to_string(),
                    inj: String::new(),
                },
                connections: vec![ConnectionReport {
                    index: 17,
                    pressure: 2.6e7,
                    oil_rate: Some(-60.0),
                    ..Default::default()
                }],
                segments: BTreeMap::new(),
            },
        );

        let json = serde_json::to_string(&report).unwrap();
        let back: WellsReport = serde_json::from_str(&json).unwrap();
        let well = &back.wells["P-1"];
        assert_eq!(well.rates.oil, Some(-120.0));
        assert_eq!(well.rates.water, None);
        assert_eq!(well.connections[0].index, 17);
    }

    #[test]
    fn empty_segment_map_is_skipped_in_json() {
        let well = WellReport::default();
        let json = serde_json::to_string(&well).unwrap();
        assert!(!json.contains("segments"));
    }
}
