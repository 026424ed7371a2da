//! End-to-end timestep behaviour of single coils.

use std::sync::Arc;

use dx_coil::speed::rated_air_density;
use dx_coil::*;
use dx_core::units::{kgps, m3ps, pa, s, w};
use dx_curves::{Curve, CurveKind, CurveSet};
use dx_psychro::AirState;

const P0: f64 = 101_325.0;

fn air(tdb: f64, twb: f64) -> AirState {
    AirState::from_tdb_twb(tdb, twb, pa(P0)).unwrap()
}

fn rated_mdot() -> f64 {
    rated_air_density() * 1.0
}

fn mode(name: &str, control: SpeedControl, fractions: &[f64], shr: f64) -> OperatingModeSpec {
    OperatingModeSpec {
        name: name.into(),
        rated_total_capacity: w(12_000.0),
        rated_evap_air_flow: m3ps(1.0),
        rated_shr: shr,
        rated_condenser_air_flow: m3ps(2.0),
        nominal_speed_count: fractions.len(),
        speed_control: control,
        condenser: CondenserType::AirCooled,
        speeds: fractions
            .iter()
            .enumerate()
            .map(|(i, f)| SpeedSpec {
                total_capacity_fraction: *f,
                evap_air_flow_fraction: *f,
                condenser_air_flow_fraction: *f,
                ..SpeedSpec::new(format!("Speed{}", i + 1), 3.0)
            })
            .collect(),
    }
}

fn performance(modes: Vec<OperatingModeSpec>) -> PerformanceSpec {
    PerformanceSpec {
        name: "ThisPerformance".into(),
        crankcase_heater_capacity: w(0.0),
        max_outdoor_temp_crankcase_c: 10.0,
        min_outdoor_temp_compressor_c: -25.0,
        mode_schedule: None,
        plr_bounds: PlrBounds::default(),
        modes,
    }
}

fn coil_with(spec: PerformanceSpec, curves: CurveSet) -> Coil {
    let perf = Performance::build(spec, &curves).unwrap();
    Coil::new("coolingCoil", Arc::new(perf), Arc::new(curves))
}

fn inputs(load: f64, latent: Option<f64>) -> CoilInputs {
    CoilInputs {
        entering_air: air(28.0, 19.0),
        condenser_entering_air: air(35.0, 24.0),
        requested_sensible_load: w(load),
        requested_latent_load: latent.map(w),
        supply_air_mass_flow: kgps(rated_mdot()),
        timestep: s(600.0),
    }
}

fn single_speed_coil() -> Coil {
    coil_with(
        performance(vec![mode("OperatingMode1Name", SpeedControl::Continuous, &[1.0], 0.9)]),
        CurveSet::new(),
    )
}

#[test]
fn half_load_single_speed() {
    let mut coil = single_speed_coil();
    assert_eq!(coil.name(), "COOLINGCOIL");
    assert_eq!(coil.performance().name(), "THISPERFORMANCE");

    let out = coil.simulate(&inputs(6_000.0, Some(0.0)), ScheduleValues::default()).unwrap();

    assert!((out.part_load_ratio - 0.5).abs() < 1e-12, "plr = {}", out.part_load_ratio);
    assert!(out.runtime_fraction >= out.part_load_ratio);
    assert!((out.total_capacity.value - 6_000.0).abs() < 1e-6 * 6_000.0);
    assert!(out.sensible_capacity.value <= out.total_capacity.value + 1e-9);
    assert!(out.latent_capacity.value >= 0.0);
    assert!(out.outlet_air.dry_bulb_c() < 28.0);
    // Identity curves: half the rated power at COP 3.
    assert!((out.total_power.value - 2_000.0).abs() < 1e-6);
    assert_eq!(out.mode, Some(dx_core::ModeId::from_index(0)));
    // 28 °C / 19 °C is drier than the apparatus dew point of this coil.
    assert!(out.diagnostics.dry_coil);
    assert!(out.latent_capacity.value < 1e-6);
}

#[test]
fn sensible_matching_uses_sensible_capacity() {
    let mut coil = coil_with(
        performance(vec![mode("m", SpeedControl::Discrete, &[1.0], 0.75)]),
        CurveSet::new(),
    );
    let mut hot_humid = inputs(4_000.0, None);
    hot_humid.entering_air = air(30.0, 24.0);
    let out = coil.simulate(&hot_humid, ScheduleValues::default()).unwrap();

    assert!(!out.diagnostics.dry_coil);
    assert!(out.latent_capacity.value > 0.0);
    assert!((out.sensible_capacity.value - 4_000.0).abs() < 1.0, "sensible = {}", out.sensible_capacity.value);
    assert!(out.part_load_ratio > 4_000.0 / 12_000.0);
}

#[test]
fn zero_load_passes_air_through() {
    let mut coil = single_speed_coil();
    coil.simulate(&inputs(6_000.0, Some(0.0)), ScheduleValues::default()).unwrap();
    let water_before = coil.state().evaporative_water_volume();
    let condensate_before = coil.state().condensate_volume();

    let inp = inputs(0.0, None);
    let out = coil.simulate(&inp, ScheduleValues::default()).unwrap();

    assert_eq!(out.total_power.value, 0.0);
    assert_eq!(out.total_capacity.value, 0.0);
    assert_eq!(out.sensible_capacity.value, 0.0);
    assert_eq!(out.latent_capacity.value, 0.0);
    assert_eq!(out.outlet_air, inp.entering_air);
    assert_eq!(out.operating_point, OperatingPoint::Off);
    assert!(out.diagnostics.clamped_curves.is_empty());
    assert_eq!(coil.state().evaporative_water_volume(), water_before);
    assert_eq!(coil.state().condensate_volume(), condensate_before);
    assert!(!coil.state().is_running());
}

#[test]
fn negative_load_rejected_without_state_change() {
    let mut coil = single_speed_coil();
    coil.simulate(&inputs(6_000.0, Some(0.0)), ScheduleValues::default()).unwrap();
    let snapshot = coil.state().clone();

    let err = coil
        .simulate(&inputs(-1.0, None), ScheduleValues::default())
        .unwrap_err();
    assert!(matches!(err, CoilError::InvalidLoad { .. }));
    assert_eq!(coil.state(), &snapshot);

    let err = coil
        .simulate(&inputs(1_000.0, Some(-5.0)), ScheduleValues::default())
        .unwrap_err();
    assert!(matches!(err, CoilError::InvalidLoad { .. }));
    assert_eq!(coil.state(), &snapshot);
}

#[test]
fn invalid_flow_and_timestep_rejected() {
    let mut coil = single_speed_coil();
    let snapshot = coil.state().clone();

    let mut bad_flow = inputs(1_000.0, None);
    bad_flow.supply_air_mass_flow = kgps(-0.1);
    assert!(matches!(
        coil.simulate(&bad_flow, ScheduleValues::default()),
        Err(CoilError::InvalidMassFlow { .. })
    ));

    let mut bad_dt = inputs(1_000.0, None);
    bad_dt.timestep = s(0.0);
    assert!(coil.simulate(&bad_dt, ScheduleValues::default()).is_err());
    assert_eq!(coil.state(), &snapshot);
}

#[test]
fn repeated_calls_are_bit_identical() {
    let mut coil = single_speed_coil();
    let inp = inputs(7_500.0, Some(500.0));
    let a = coil.simulate(&inp, ScheduleValues::default()).unwrap();
    let b = coil.simulate(&inp, ScheduleValues::default()).unwrap();
    assert_eq!(a, b);
    assert_eq!(coil.state().timesteps(), 2);
    assert_eq!(coil.state().on_cycles(), 1);
}

#[test]
fn continuous_boundary_matches_pure_speed() {
    let mut continuous = coil_with(
        performance(vec![mode("m", SpeedControl::Continuous, &[0.5, 1.0], 0.9)]),
        CurveSet::new(),
    );
    let mut discrete = coil_with(
        performance(vec![mode("m", SpeedControl::Discrete, &[0.5, 1.0], 0.9)]),
        CurveSet::new(),
    );

    let inp = inputs(12_000.0, Some(0.0));
    let blended = continuous.simulate(&inp, ScheduleValues::default()).unwrap();
    let pure = discrete.simulate(&inp, ScheduleValues::default()).unwrap();

    assert_eq!(blended.speed_ratio, 1.0);
    assert_eq!(blended.outlet_air, pure.outlet_air);
    assert_eq!(blended.total_power, pure.total_power);
    assert_eq!(blended.total_capacity, pure.total_capacity);
}

#[test]
fn continuous_blend_lies_between_speeds() {
    let mut coil = coil_with(
        performance(vec![mode("m", SpeedControl::Continuous, &[0.5, 1.0], 0.9)]),
        CurveSet::new(),
    );
    let low = coil.simulate(&inputs(6_000.0, Some(0.0)), ScheduleValues::default()).unwrap();
    let high = coil.simulate(&inputs(12_000.0, Some(0.0)), ScheduleValues::default()).unwrap();
    let mid = coil.simulate(&inputs(9_000.0, Some(0.0)), ScheduleValues::default()).unwrap();

    assert!(matches!(mid.operating_point, OperatingPoint::Blend { .. }));
    assert!((mid.speed_ratio - 0.5).abs() < 1e-12);
    assert_eq!(mid.runtime_fraction, 1.0);
    assert!(low.total_power.value <= mid.total_power.value && mid.total_power.value <= high.total_power.value);
    assert!(low.total_capacity.value <= mid.total_capacity.value);
    assert!(mid.total_capacity.value <= high.total_capacity.value);
    let (t_lo, t_mid, t_hi) = (
        low.outlet_air.dry_bulb_c(),
        mid.outlet_air.dry_bulb_c(),
        high.outlet_air.dry_bulb_c(),
    );
    assert!(t_hi <= t_mid && t_mid <= t_lo);
}

#[test]
fn discrete_cycling_applies_part_load_fraction() {
    let (curves, plf) = curves_with_plf();
    let mut discrete = coil_with(performance(vec![mode_with_plf(SpeedControl::Discrete, plf)]), curves);
    let out = discrete
        .simulate(&inputs(3_000.0, Some(0.0)), ScheduleValues::default())
        .unwrap();
    assert_eq!(
        out.operating_point,
        OperatingPoint::Cycling {
            speed: dx_core::SpeedId::from_index(0),
            plr: 0.5
        }
    );
    assert!((out.runtime_fraction - 0.5 / 0.925).abs() < 1e-12);
    assert!((out.compressor_power.value - 2_000.0 * out.runtime_fraction).abs() < 1e-9);
}

#[test]
fn staged_runtime_equals_part_load_ratio() {
    let (curves, plf) = curves_with_plf();
    let mut staged = coil_with(performance(vec![mode_with_plf(SpeedControl::Staged, plf)]), curves);
    let out = staged
        .simulate(&inputs(3_000.0, Some(0.0)), ScheduleValues::default())
        .unwrap();
    assert_eq!(out.part_load_ratio, 0.5);
    assert_eq!(out.runtime_fraction, out.part_load_ratio);
}

fn curves_with_plf() -> (CurveSet, dx_core::CurveId) {
    let mut curves = CurveSet::new();
    let id = curves
        .add(Curve::new("PLFCurve", CurveKind::Linear { c: [0.85, 0.15] }).with_x_limits(0.0, 1.0))
        .unwrap();
    (curves, id)
}

fn mode_with_plf(control: SpeedControl, plf: dx_core::CurveId) -> OperatingModeSpec {
    let mut spec = mode("m", control, &[0.5, 1.0], 0.9);
    for speed in &mut spec.speeds {
        speed.curves.plf = Some(plf);
    }
    spec
}

#[test]
fn unmet_load_reported() {
    let mut coil = single_speed_coil();
    let out = coil.simulate(&inputs(20_000.0, Some(0.0)), ScheduleValues::default()).unwrap();
    assert_eq!(out.runtime_fraction, 1.0);
    assert!((out.diagnostics.unmet_load.value - 8_000.0).abs() < 1e-6);
    assert!((out.total_capacity.value - 12_000.0).abs() < 1e-6 * 12_000.0);
}

#[test]
fn mode_schedule_off_and_out_of_range() {
    let mut coil = single_speed_coil();
    let inp = inputs(6_000.0, None);

    let out = coil.simulate(&inp, ScheduleValues::mode(0)).unwrap();
    assert_eq!(out.operating_point, OperatingPoint::Off);
    assert!(!out.diagnostics.mode_out_of_range);
    assert_eq!(out.mode, None);

    let out = coil.simulate(&inp, ScheduleValues::mode(4)).unwrap();
    assert_eq!(out.operating_point, OperatingPoint::Off);
    assert!(out.diagnostics.mode_out_of_range);
    assert_eq!(out.total_power.value, 0.0);
}

#[test]
fn availability_schedule_turns_coil_off() {
    let mut coil = single_speed_coil();
    let sched = ScheduleValues {
        availability: 0.0,
        ..ScheduleValues::default()
    };
    let out = coil.simulate(&inputs(6_000.0, None), sched).unwrap();
    assert_eq!(out.operating_point, OperatingPoint::Off);
}

#[test]
fn compressor_lockout_and_crankcase_heater() {
    let mut spec = performance(vec![mode("m", SpeedControl::Discrete, &[1.0], 0.9)]);
    spec.crankcase_heater_capacity = w(50.0);
    spec.min_outdoor_temp_compressor_c = 5.0;
    let mut coil = coil_with(spec, CurveSet::new());

    let mut cold = inputs(6_000.0, Some(0.0));
    cold.condenser_entering_air = air(0.0, -2.0);
    let out = coil.simulate(&cold, ScheduleValues::default()).unwrap();
    assert!(out.diagnostics.compressor_locked_out);
    assert_eq!(out.total_power.value, 0.0);
    assert_eq!(out.crankcase_heater_power.value, 50.0);

    let mut mild = inputs(6_000.0, Some(0.0));
    mild.condenser_entering_air = air(8.0, 5.0);
    let out = coil.simulate(&mild, ScheduleValues::default()).unwrap();
    assert!(!out.diagnostics.compressor_locked_out);
    assert!((out.crankcase_heater_power.value - 50.0 * (1.0 - out.runtime_fraction)).abs() < 1e-9);

    let warm = inputs(6_000.0, Some(0.0));
    let out = coil.simulate(&warm, ScheduleValues::default()).unwrap();
    assert_eq!(out.crankcase_heater_power.value, 0.0);
}

#[test]
fn clamped_curve_inputs_are_flagged() {
    let mut curves = CurveSet::new();
    let cap_ft = curves
        .add(
            Curve::new("CapFT", CurveKind::Biquadratic { c: [1.0, 0.0, 0.0, 0.0, 0.0, 0.0] })
                .with_x_limits(12.0, 18.0)
                .with_y_limits(18.0, 46.0),
        )
        .unwrap();
    let mut spec = mode("m", SpeedControl::Discrete, &[1.0], 0.9);
    spec.speeds[0].curves.cap_ft = Some(cap_ft);
    let mut coil = coil_with(performance(vec![spec]), curves);

    // Entering wet-bulb of 19 °C is above the 18 °C limit.
    let out = coil.simulate(&inputs(6_000.0, Some(0.0)), ScheduleValues::default()).unwrap();
    assert_eq!(out.diagnostics.clamped_curves, vec![CurveRole::CapFT]);
    assert!((out.part_load_ratio - 0.5).abs() < 1e-12);
    assert_eq!(coil.curves().out_of_range_count(cap_ft), 1);
}

#[test]
fn arity_mismatch_fails_build() {
    let mut curves = CurveSet::new();
    let one_d = curves
        .add(Curve::new("CapFF", CurveKind::Quadratic { c: [1.0, 0.0, 0.0] }))
        .unwrap();
    let mut spec = mode("m", SpeedControl::Discrete, &[1.0], 0.9);
    spec.speeds[0].curves.cap_ft = Some(one_d);

    let err = Performance::build(performance(vec![spec]), &curves).unwrap_err();
    match err {
        CoilError::ArityMismatch {
            role,
            expected,
            got,
            ..
        } => {
            assert_eq!(role, CurveRole::CapFT);
            assert_eq!(expected, 2);
            assert_eq!(got, 1);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn unknown_curve_fails_build() {
    let mut other = CurveSet::new();
    other.add(Curve::new("a", CurveKind::Linear { c: [1.0, 0.0] })).unwrap();
    let id = other.add(Curve::new("b", CurveKind::Linear { c: [1.0, 0.0] })).unwrap();

    let mut spec = mode("m", SpeedControl::Discrete, &[1.0], 0.9);
    spec.speeds[0].curves.plf = Some(id);
    let err = Performance::build(performance(vec![spec]), &CurveSet::new()).unwrap_err();
    assert!(matches!(err, CoilError::Curve(_)));
}

#[test]
fn discrete_small_load_cycles_lowest_speed() {
    let mut coil = coil_with(
        performance(vec![mode("m", SpeedControl::Discrete, &[0.5, 1.0], 0.9)]),
        CurveSet::new(),
    );
    let out = coil.simulate(&inputs(3_000.0, Some(0.0)), ScheduleValues::default()).unwrap();
    assert_eq!(
        out.operating_point,
        OperatingPoint::Cycling {
            speed: dx_core::SpeedId::from_index(0),
            plr: 0.5
        }
    );
}

#[test]
fn descending_speeds_fail_build_for_every_policy() {
    for control in [SpeedControl::Discrete, SpeedControl::Staged, SpeedControl::Continuous] {
        let spec = mode("m", control, &[1.0, 0.5], 0.9);
        let err = Performance::build(performance(vec![spec]), &CurveSet::new()).unwrap_err();
        assert!(matches!(err, CoilError::NonMonotonicSpeeds { .. }), "{control:?}");
    }
}

fn constant_biquadratic(set: &mut CurveSet, name: &str, value: f64) -> dx_core::CurveId {
    set.add(Curve::new(name, CurveKind::Biquadratic { c: [value, 0.0, 0.0, 0.0, 0.0, 0.0] }))
        .unwrap()
}

fn constant_quadratic(set: &mut CurveSet, name: &str, value: f64) -> dx_core::CurveId {
    set.add(Curve::new(name, CurveKind::Quadratic { c: [value, 0.0, 0.0] }))
        .unwrap()
}

#[test]
fn shr_curves_scale_rated_shr() {
    let mut curves = CurveSet::new();
    let shr_ft = constant_biquadratic(&mut curves, "SHRFT", 0.9);
    let shr_ff = constant_quadratic(&mut curves, "SHRFF", 1.1);
    let mut spec = mode("m", SpeedControl::Discrete, &[1.0], 0.75);
    spec.speeds[0].curves.shr_ft = Some(shr_ft);
    spec.speeds[0].curves.shr_ff = Some(shr_ff);
    let mut coil = coil_with(performance(vec![spec]), curves);

    let out = coil.simulate(&inputs(12_000.0, Some(0.0)), ScheduleValues::default()).unwrap();
    assert!((out.total_capacity.value - 12_000.0).abs() < 1e-6 * 12_000.0);
    let shr = out.sensible_capacity.value / out.total_capacity.value;
    assert!((shr - 0.75 * 0.9 * 1.1).abs() < 1e-6, "shr = {shr}");
    assert!(!out.diagnostics.saturated_outlet);
}

#[test]
fn waste_heat_follows_fraction_modifier_and_runtime() {
    let mut curves = CurveSet::new();
    let waste_ft = constant_biquadratic(&mut curves, "WasteHeatFT", 1.5);
    let mut spec = mode("m", SpeedControl::Discrete, &[1.0], 0.75);
    spec.speeds[0].waste_heat_fraction = 0.2;
    spec.speeds[0].curves.waste_heat_ft = Some(waste_ft);
    let mut coil = coil_with(performance(vec![spec]), curves);

    let full = coil.simulate(&inputs(12_000.0, Some(0.0)), ScheduleValues::default()).unwrap();
    assert!((full.compressor_power.value - 4_000.0).abs() < 1e-6);
    assert!((full.waste_heat.value - 0.2 * 1.5 * full.compressor_power.value).abs() < 1e-6);

    let half = coil.simulate(&inputs(6_000.0, Some(0.0)), ScheduleValues::default()).unwrap();
    assert_eq!(half.runtime_fraction, 0.5);
    assert!((half.waste_heat.value - 0.2 * 1.5 * 4_000.0 * 0.5).abs() < 1e-6);
}

#[test]
fn blended_saturated_outlets_stay_usable_downstream() {
    let mut curves = CurveSet::new();
    let shr_ff = constant_quadratic(&mut curves, "SHRFF", 1.2);
    let mut spec = mode("m", SpeedControl::Continuous, &[0.5, 1.0], 0.9);
    for speed in &mut spec.speeds {
        speed.curves.shr_ff = Some(shr_ff);
    }
    let curves = Arc::new(curves);
    let perf = Arc::new(Performance::build(performance(vec![spec]), &curves).unwrap());
    let mut first = Coil::new("first", perf.clone(), curves.clone());
    let mut second = Coil::new("second", perf, curves);

    let humid = AirState::from_tdb_rh(20.0, 0.95, pa(P0)).unwrap();
    let inp = CoilInputs {
        entering_air: humid,
        requested_sensible_load: w(9_000.0),
        ..inputs(0.0, Some(0.0))
    };
    let out = first.simulate(&inp, ScheduleValues::default()).unwrap();
    assert!(matches!(out.operating_point, OperatingPoint::Blend { .. }));
    assert!(out.diagnostics.saturated_outlet);
    assert!(out.outlet_air.relative_humidity() <= 1.0 + 1e-3);

    let next = CoilInputs {
        entering_air: out.outlet_air,
        requested_sensible_load: w(0.0),
        ..inp
    };
    assert!(second.simulate(&next, ScheduleValues::default()).is_ok());
}
