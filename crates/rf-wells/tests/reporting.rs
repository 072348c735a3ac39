//! Integration tests for report assembly.

use rf_comms::SerialComm;
use rf_core::PhaseUsage;
use rf_wells::{
    PerforationData, ProducerCMode, ProductionControls, SegmentTopology, WellDefinition,
    WellOwnership, WellState, WellStateOptions, WellStatus,
};

const OWN: WellOwnership = WellOwnership {
    is_owner: true,
    spans_ranks: false,
    first_connection_pressure: None,
};

fn perfs(cells: &[usize]) -> Vec<PerforationData> {
    cells
        .iter()
        .map(|&cell_index| PerforationData {
            cell_index,
            connection_transmissibility_factor: 2.0,
            satnum_id: 1,
            segment: None,
        })
        .collect()
}

fn producer(name: &str, status: WellStatus) -> WellDefinition {
    WellDefinition {
        name: name.to_string(),
        producer: true,
        injector: false,
        status,
        injection: None,
        production: Some(ProductionControls {
            cmode: ProducerCMode::Orat,
            oil_rate: 50.0,
            bhp_limit: 1.0e7,
            alq: 3.5,
            ..Default::default()
        }),
        events: 0,
        global_num_open_connections: 1,
        segments: None,
    }
}

fn cell_map(n: usize) -> Vec<usize> {
    (0..n).collect()
}

#[test]
fn shut_wells_are_omitted_unless_dynamically_closed() {
    let mut state = WellState::new(PhaseUsage::water_oil_gas(), WellStateOptions::default());
    state
        .init(
            &vec![2.0e7; 4],
            &[
                producer("OPEN-1", WellStatus::Open),
                producer("SHUT-1", WellStatus::Shut),
            ],
            &[perfs(&[0]), perfs(&[1])],
            &[OWN, OWN],
            None,
        )
        .unwrap();

    let report = state.report(&cell_map(4), |_| false, &SerialComm).unwrap();
    assert!(report.wells.contains_key("OPEN-1"));
    assert!(!report.wells.contains_key("SHUT-1"));

    // A dynamically-closed well still reports (its last values).
    let report = state
        .report(&cell_map(4), |w| state.name(w) == "SHUT-1", &SerialComm)
        .unwrap();
    assert!(report.wells.contains_key("SHUT-1"));
}

#[test]
fn report_carries_well_and_connection_values() {
    let mut state = WellState::new(PhaseUsage::water_oil_gas(), WellStateOptions::default());
    state
        .init(
            &vec![2.0e7; 4],
            &[producer("P-1", WellStatus::Open)],
            &[perfs(&[2])],
            &[OWN],
            None,
        )
        .unwrap();
    {
        let ws = state.well_mut(0);
        ws.reservoir_rates[1] = -55.0;
        ws.well_potentials[1] = -80.0;
        ws.productivity_index[1] = 0.4;
        ws.dissolved_gas_rate = 12.0;
        ws.perf_data.rates[0] = -49.0;
    }

    let global_map = vec![10, 11, 12, 13];
    let report = state.report(&global_map, |_| false, &SerialComm).unwrap();
    let well = &report.wells["P-1"];

    assert!((well.bhp - 0.99 * 2.0e7).abs() < 1e-6);
    assert_eq!(well.rates.oil, Some(-50.0));
    assert_eq!(well.rates.reservoir_oil, Some(-55.0));
    assert_eq!(well.rates.well_potential_oil, Some(-80.0));
    assert_eq!(well.rates.productivity_index_oil, Some(0.4));
    assert_eq!(well.rates.dissolved_gas, 12.0);
    assert_eq!(well.rates.alq, 3.5);
    // Inactive components are absent, not zero.
    assert_eq!(well.rates.solvent, None);
    assert_eq!(well.rates.polymer, None);
    assert_eq!(well.control.prod, "ORAT");
    assert!(well.control.is_producer);

    let conn = &well.connections[0];
    assert_eq!(conn.index, 12);
    assert_eq!(conn.pressure, 2.0e7);
    assert_eq!(conn.reservoir_rate, -49.0);
    assert_eq!(conn.trans_factor, 2.0);
    assert_eq!(conn.oil_rate, Some(-50.0));
    assert_eq!(conn.solvent_rate, None);
}

#[test]
fn two_phase_run_reports_only_active_phases() {
    let mut state = WellState::new(PhaseUsage::oil_gas(), WellStateOptions::default());
    state
        .init(
            &vec![2.0e7; 4],
            &[producer("P-1", WellStatus::Open)],
            &[perfs(&[0])],
            &[OWN],
            None,
        )
        .unwrap();

    let report = state.report(&cell_map(4), |_| false, &SerialComm).unwrap();
    let well = &report.wells["P-1"];
    assert_eq!(well.rates.water, None);
    assert!(well.rates.oil.is_some());
    assert!(well.rates.gas.is_some());
    assert_eq!(well.connections[0].water_rate, None);
}

#[test]
fn multi_segment_wells_report_segment_records() {
    let topology = SegmentTopology::new(vec![None, Some(0)]);
    let mut def = producer("MSW-1", WellStatus::Open);
    def.global_num_open_connections = 1;
    def.segments = Some(topology);
    let conns = vec![PerforationData {
        cell_index: 0,
        connection_transmissibility_factor: 1.0,
        satnum_id: 1,
        segment: Some(1),
    }];

    let mut state = WellState::new(PhaseUsage::water_oil_gas(), WellStateOptions::default());
    state
        .init(&vec![2.0e7; 2], &[def.clone()], &[conns], &[OWN], None)
        .unwrap();
    state.init_ms_wells(&[def], None);
    {
        let seg = state.well_mut(0).segments.as_mut().unwrap();
        seg.pressure_drop_hydrostatic[1] = 3.0e4;
        seg.pressure_drop_friction[1] = 1.0e4;
    }

    let report = state.report(&cell_map(2), |_| false, &SerialComm).unwrap();
    let well = &report.wells["MSW-1"];
    assert_eq!(well.segments.len(), 2);
    let seg1 = &well.segments[&1];
    assert_eq!(seg1.pressure, 2.0e7);
    assert_eq!(seg1.pressure_drop, 4.0e4);
    assert!(seg1.oil_rate.is_some());
}

#[test]
fn empty_state_reports_empty() {
    let state = WellState::new(PhaseUsage::water_oil_gas(), WellStateOptions::default());
    let report = state.report(&[], |_| false, &SerialComm).unwrap();
    assert!(report.is_empty());
}
