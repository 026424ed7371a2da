//! Evaporative condenser, basin heater, water use and schedule-driven runs.

use std::sync::Arc;

use dx_coil::speed::rated_air_density;
use dx_coil::*;
use dx_core::units::{kgps, m3ps, pa, s, w};
use dx_curves::CurveSet;
use dx_psychro::AirState;

const P0: f64 = 101_325.0;

fn air(tdb: f64, twb: f64) -> AirState {
    AirState::from_tdb_twb(tdb, twb, pa(P0)).unwrap()
}

fn evaporative_coil(reuse: f64, basin_schedule: Option<&str>) -> Coil {
    evaporative_coil_named("EvapCoil", reuse, basin_schedule)
}

fn evaporative_coil_named(name: &str, reuse: f64, basin_schedule: Option<&str>) -> Coil {
    let speed = SpeedSpec {
        condensate_reuse_fraction: reuse,
        ..SpeedSpec::new("Speed1", 3.5)
    };
    let spec = PerformanceSpec {
        name: "EvapPerformance".into(),
        crankcase_heater_capacity: w(0.0),
        max_outdoor_temp_crankcase_c: 10.0,
        min_outdoor_temp_compressor_c: -25.0,
        mode_schedule: Some("ModeSchedule".into()),
        plr_bounds: PlrBounds::default(),
        modes: vec![evaporative_mode("Normal", basin_schedule, speed)],
    };
    let curves = CurveSet::new();
    let perf = Performance::build(spec, &curves).unwrap();
    Coil::new(name, Arc::new(perf), Arc::new(curves))
}

fn evaporative_mode(name: &str, basin_schedule: Option<&str>, speed: SpeedSpec) -> OperatingModeSpec {
    OperatingModeSpec {
        name: name.into(),
        rated_total_capacity: w(12_000.0),
        rated_evap_air_flow: m3ps(1.0),
        rated_shr: 0.75,
        rated_condenser_air_flow: m3ps(2.0),
        nominal_speed_count: 1,
        speed_control: SpeedControl::Discrete,
        condenser: CondenserType::Evaporative(EvaporativeCondenser {
            pump_power: w(150.0),
            effectiveness: 0.9,
            basin_heater_capacity: w(200.0),
            basin_heater_setpoint_c: 2.0,
            basin_heater_schedule: basin_schedule.map(str::to_string),
        }),
        speeds: vec![speed],
    }
}

fn inputs(load: f64, outdoor: AirState) -> CoilInputs {
    CoilInputs {
        entering_air: air(30.0, 24.0),
        condenser_entering_air: outdoor,
        requested_sensible_load: w(load),
        requested_latent_load: Some(w(0.0)),
        supply_air_mass_flow: kgps(rated_air_density()),
        timestep: s(900.0),
    }
}

#[test]
fn basin_heater_runs_only_when_coil_is_off() {
    let mut coil = evaporative_coil(0.0, None);
    let cold = air(0.0, -2.0);

    let off = coil.simulate(&inputs(0.0, cold), ScheduleValues::default()).unwrap();
    assert_eq!(off.basin_heater_power.value, 200.0);
    assert_eq!(off.total_power.value, 0.0);

    let on = coil.simulate(&inputs(6_000.0, cold), ScheduleValues::default()).unwrap();
    assert!(on.operating_point.is_running());
    assert_eq!(on.basin_heater_power.value, 0.0);

    let warm = coil.simulate(&inputs(0.0, air(10.0, 6.0)), ScheduleValues::default()).unwrap();
    assert_eq!(warm.basin_heater_power.value, 0.0);

    let unavailable = ScheduleValues {
        basin_heater: 0.0,
        ..ScheduleValues::default()
    };
    let out = coil.simulate(&inputs(0.0, cold), unavailable).unwrap();
    assert_eq!(out.basin_heater_power.value, 0.0);

    // One step at 200 W for 900 s.
    assert!((coil.state().basin_heater_energy().value - 200.0 * 900.0).abs() < 1e-9);
}

#[test]
fn evaporative_condenser_uses_water_and_pump_power() {
    let mut coil = evaporative_coil(0.0, None);
    let out = coil
        .simulate(&inputs(6_000.0, air(35.0, 24.0)), ScheduleValues::default())
        .unwrap();

    assert!(out.water_consumption.value > 0.0);
    assert!((out.pump_power.value - 150.0 * out.runtime_fraction).abs() < 1e-9);
    assert!((out.total_power.value - out.compressor_power.value - out.pump_power.value).abs() < 1e-9);
    assert!(out.condensate_collected.value > 0.0);
    assert!(out.latent_capacity.value > 0.0);
    assert_eq!(coil.state().evaporative_water_volume(), out.water_consumption);
    assert_eq!(coil.state().condensate_volume(), out.condensate_collected);
}

#[test]
fn evaporative_precooling_lowers_power() {
    let mut curves = CurveSet::new();
    let eir_ft = curves
        .add(dx_curves::Curve::new(
            "EIRFT",
            dx_curves::CurveKind::Biquadratic { c: [0.5, 0.0, 0.0, 0.02, 0.0, 0.0] },
        ))
        .unwrap();
    let mut spec = evaporative_spec_with_curves(eir_ft);
    let perf_evap = Performance::build(spec.clone(), &curves).unwrap();
    spec.modes[0].condenser = CondenserType::AirCooled;
    let perf_air = Performance::build(spec, &curves).unwrap();
    let curves = Arc::new(curves);

    let mut evap_curve = Coil::new("evap", Arc::new(perf_evap), curves.clone());
    let mut air_curve = Coil::new("air", Arc::new(perf_air), curves);
    let inp = inputs(6_000.0, air(35.0, 24.0));
    let e = evap_curve.simulate(&inp, ScheduleValues::default()).unwrap();
    let a = air_curve.simulate(&inp, ScheduleValues::default()).unwrap();
    assert!(e.compressor_power.value < a.compressor_power.value);
}

fn evaporative_spec_with_curves(eir_ft: dx_core::CurveId) -> PerformanceSpec {
    let mut speed = SpeedSpec::new("Speed1", 3.5);
    speed.curves.eir_ft = Some(eir_ft);
    PerformanceSpec {
        name: "Curves".into(),
        crankcase_heater_capacity: w(0.0),
        max_outdoor_temp_crankcase_c: 10.0,
        min_outdoor_temp_compressor_c: -25.0,
        mode_schedule: None,
        plr_bounds: PlrBounds::default(),
        modes: vec![OperatingModeSpec {
            name: "Normal".into(),
            rated_total_capacity: w(12_000.0),
            rated_evap_air_flow: m3ps(1.0),
            rated_shr: 0.75,
            rated_condenser_air_flow: m3ps(2.0),
            nominal_speed_count: 1,
            speed_control: SpeedControl::Discrete,
            condenser: CondenserType::Evaporative(EvaporativeCondenser {
                pump_power: w(0.0),
                effectiveness: 0.9,
                basin_heater_capacity: w(0.0),
                basin_heater_setpoint_c: 2.0,
                basin_heater_schedule: None,
            }),
            speeds: vec![speed],
        }],
    }
}

#[test]
fn condensate_reuse_reduces_make_up_water() {
    let mut plain = evaporative_coil(0.0, None);
    let mut reuse = evaporative_coil(1.0, None);
    let inp = inputs(6_000.0, air(35.0, 24.0));
    let a = plain.simulate(&inp, ScheduleValues::default()).unwrap();
    let b = reuse.simulate(&inp, ScheduleValues::default()).unwrap();

    assert!(b.water_consumption.value < a.water_consumption.value);
    let reused = a.water_consumption.value - b.water_consumption.value;
    assert!((a.condensate_collected.value - b.condensate_collected.value - reused).abs() < 1e-15);
}

#[test]
fn simulate_at_reads_named_schedules() {
    let mut coil = evaporative_coil(0.0, Some("BasinSchedule"));
    let mut table = ScheduleTable::new();
    let mut modes = vec![1.0; 24];
    modes[0] = 0.0;
    table.insert("modeschedule", Schedule::Hourly { values: modes }).unwrap();
    table.insert("basinschedule", Schedule::Constant { value: 1.0 }).unwrap();

    let inp = inputs(6_000.0, air(35.0, 24.0));
    let night = coil.simulate_at(&inp, &table, s(1_800.0)).unwrap();
    assert_eq!(night.operating_point, OperatingPoint::Off);

    let day = coil.simulate_at(&inp, &table, s(10.0 * 3600.0)).unwrap();
    assert!(day.operating_point.is_running());

    let missing = ScheduleTable::new();
    let snapshot = coil.state().clone();
    assert!(matches!(
        coil.simulate_at(&inp, &missing, s(0.0)),
        Err(CoilError::UnknownSchedule { .. })
    ));
    assert_eq!(coil.state(), &snapshot);
}

#[test]
fn mode_override_picks_that_modes_basin_schedule() {
    let spec = PerformanceSpec {
        name: "TwoModes".into(),
        crankcase_heater_capacity: w(0.0),
        max_outdoor_temp_crankcase_c: 10.0,
        min_outdoor_temp_compressor_c: -25.0,
        mode_schedule: Some("ModeSchedule".into()),
        plr_bounds: PlrBounds::default(),
        modes: vec![
            evaporative_mode("Normal", Some("BasinNormal"), SpeedSpec::new("Speed1", 3.5)),
            evaporative_mode("Dehumidify", Some("BasinDehumidify"), SpeedSpec::new("Speed1", 3.0)),
        ],
    };
    let curves = CurveSet::new();
    let perf = Performance::build(spec, &curves).unwrap();
    let coil = Coil::new("TwoModeCoil", Arc::new(perf), Arc::new(curves));

    let mut table = ScheduleTable::new();
    table.insert("ModeSchedule", Schedule::Constant { value: 1.0 }).unwrap();
    table.insert("BasinNormal", Schedule::Constant { value: 0.0 }).unwrap();
    table.insert("BasinDehumidify", Schedule::Constant { value: 1.0 }).unwrap();

    let scheduled = coil.resolve_schedules(&table, s(0.0)).unwrap();
    assert_eq!(scheduled.mode, 1.0);
    assert_eq!(scheduled.basin_heater, 0.0);

    let overridden = coil.resolve_schedules_in_mode(&table, s(0.0), 2.0).unwrap();
    assert_eq!(overridden.mode, 2.0);
    assert_eq!(overridden.basin_heater, 1.0);
    assert_eq!(overridden.availability, 1.0);
}

#[test]
fn bank_steps_coils_in_parallel() {
    let mut bank = CoilBank::new();
    bank.add(evaporative_coil(0.0, None)).unwrap();
    bank.add(evaporative_coil_named("SecondCoil", 0.5, None)).unwrap();
    assert_eq!(bank.len(), 2);
    assert!(matches!(
        bank.add(evaporative_coil(0.0, None)),
        Err(CoilError::DuplicateName { .. })
    ));

    let loads = [inputs(3_000.0, air(35.0, 24.0)), inputs(9_000.0, air(35.0, 24.0))];
    let scheds = [ScheduleValues::default(); 2];
    let results = bank.simulate_all(&loads, &scheds).unwrap();
    assert_eq!(results.len(), 2);

    let mut reference = evaporative_coil(0.0, None);
    let expected = reference.simulate(&loads[0], scheds[0]).unwrap();
    assert_eq!(results[0].as_ref().unwrap(), &expected);
    assert!(results[1].as_ref().unwrap().part_load_ratio > results[0].as_ref().unwrap().part_load_ratio);

    assert_eq!(bank.get("evapcoil").unwrap().state().timesteps(), 1);
    assert!(bank.simulate_all(&loads[..1], &scheds[..1]).is_err());
    assert!(matches!(bank.get("nope"), Err(CoilError::UnknownCoil { .. })));
}
