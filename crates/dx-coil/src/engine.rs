//! Per-timestep simulation of a DX cooling coil.
//!
//! `evaluate` is pure: it reads the records, curves and inputs and returns a
//! `TimestepOutput`. `simulate` evaluates and then commits the result to the
//! runtime state, so a rejected call never changes the state.

use crate::condenser;
use crate::error::{CoilError, CoilResult};
use crate::mode::SpeedControl;
use crate::performance::{ModeResolution, Performance};
use crate::schedule::ScheduleValues;
use crate::selection::{OperatingPoint, select_speed};
use crate::speed::{CurveRole, Speed};
use crate::split;
use crate::state::CoilRuntimeState;
use dx_core::units::{MassRate, Power, Time, Volume, m3, w};
use dx_core::{CurveId, ModeId, lerp};
use dx_curves::CurveSet;
use dx_psychro::{AirState, saturation_humidity_ratio};
use tracing::{debug, warn};
use uom::si::time::second;

/// Lower and upper bound applied to the part-load fraction curve output.
const PLF_MIN: f64 = 0.7;
const PLF_MAX: f64 = 1.0;

/// Relative tolerance on entering humidity above saturation.
const SUPERSATURATION_TOL: f64 = 1e-3;

/// Boundary conditions for one timestep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoilInputs {
    pub entering_air: AirState,
    /// Outdoor air entering the condenser.
    pub condenser_entering_air: AirState,
    pub requested_sensible_load: Power,
    /// `Some` matches total (sensible + latent) load against total capacity.
    pub requested_latent_load: Option<Power>,
    pub supply_air_mass_flow: MassRate,
    pub timestep: Time,
}

/// Flags describing how a timestep result was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostics {
    /// Curves whose inputs were clamped to their domain this timestep.
    pub clamped_curves: Vec<CurveRole>,
    /// Load the highest speed could not meet.
    pub unmet_load: Power,
    pub mode_out_of_range: bool,
    pub compressor_locked_out: bool,
    pub dry_coil: bool,
    /// Leaving air was moved back onto the saturation curve.
    pub saturated_outlet: bool,
    /// Capacity was cut so the apparatus dew point stays on the saturation curve.
    pub capacity_limited: bool,
}

impl Diagnostics {
    fn new() -> Self {
        Self {
            clamped_curves: Vec::new(),
            unmet_load: w(0.0),
            mode_out_of_range: false,
            compressor_locked_out: false,
            dry_coil: false,
            saturated_outlet: false,
            capacity_limited: false,
        }
    }
}

/// Result of one timestep.
#[derive(Debug, Clone, PartialEq)]
pub struct TimestepOutput {
    pub outlet_air: AirState,
    /// Compressor and condenser fan input plus evaporative pump power.
    pub total_power: Power,
    pub compressor_power: Power,
    pub pump_power: Power,
    pub crankcase_heater_power: Power,
    pub basin_heater_power: Power,
    pub total_capacity: Power,
    pub sensible_capacity: Power,
    pub latent_capacity: Power,
    /// Evaporative make-up water drawn this timestep.
    pub water_consumption: Volume,
    /// Condensate collected this timestep, net of reuse.
    pub condensate_collected: Volume,
    pub waste_heat: Power,
    pub runtime_fraction: f64,
    pub part_load_ratio: f64,
    pub speed_ratio: f64,
    /// Mode the schedule resolved to, whether or not the coil ran.
    pub mode: Option<ModeId>,
    pub operating_point: OperatingPoint,
    pub diagnostics: Diagnostics,
}

/// Evaluate one timestep and commit it to `state`.
pub fn simulate(
    curves: &CurveSet,
    perf: &Performance,
    state: &mut CoilRuntimeState,
    inputs: &CoilInputs,
    schedules: ScheduleValues,
) -> CoilResult<TimestepOutput> {
    let out = evaluate(curves, perf, inputs, schedules)?;
    state.commit(&out, inputs.timestep.get::<second>());
    Ok(out)
}

/// Evaluate one timestep without touching any runtime state.
pub fn evaluate(
    curves: &CurveSet,
    perf: &Performance,
    inputs: &CoilInputs,
    schedules: ScheduleValues,
) -> CoilResult<TimestepOutput> {
    let dt = check_inputs(inputs, &schedules)?;
    let outdoor_db = inputs.condenser_entering_air.dry_bulb_c();
    let mdot = inputs.supply_air_mass_flow.value;
    let mut diag = Diagnostics::new();

    let mode_id = match perf.resolve_mode(schedules.mode)? {
        ModeResolution::Active(id) => Some(id),
        ModeResolution::Off => None,
        ModeResolution::OutOfRange => {
            warn!(
                performance = perf.name(),
                value = schedules.mode,
                modes = perf.mode_count(),
                "mode schedule value out of range, coil off"
            );
            diag.mode_out_of_range = true;
            None
        }
    };

    let sensible_load = inputs.requested_sensible_load.value;
    let load = match inputs.requested_latent_load {
        Some(latent) => sensible_load + latent.value,
        None => sensible_load,
    };

    let Some(mode_id) = mode_id.filter(|_| schedules.availability > 0.0 && load > 0.0 && mdot > 0.0)
    else {
        return Ok(off_output(perf, mode_id, inputs, &schedules, diag));
    };
    if outdoor_db < perf.min_outdoor_temp_compressor_c() {
        diag.compressor_locked_out = true;
        return Ok(off_output(perf, Some(mode_id), inputs, &schedules, diag));
    }

    let mode = perf.mode(mode_id);
    let inlet = &inputs.entering_air;
    let outdoor = &inputs.condenser_entering_air;
    let cond = mode.condenser();
    let twb = inlet.wet_bulb_c()?;
    let t_cond = condenser::condenser_inlet_temperature(cond, outdoor)?;

    let points = mode
        .speeds()
        .map(|(_, speed)| full_load_point(curves, speed, inlet, twb, t_cond, outdoor_db, mdot, &mut diag))
        .collect::<CoilResult<Vec<_>>>()?;

    let capacities: Vec<f64> = points
        .iter()
        .map(|p| {
            if inputs.requested_latent_load.is_some() {
                p.total
            } else {
                p.sensible
            }
        })
        .collect();

    let selection = select_speed(mode.speed_control(), &capacities, load, perf.plr_bounds());
    if selection.unmet > 0.0 {
        warn!(
            performance = perf.name(),
            mode = mode.name(),
            requested_w = load,
            unmet_w = selection.unmet,
            "load exceeds full-load capacity of the highest speed"
        );
        diag.unmet_load = w(selection.unmet);
    }

    let run = match selection.point {
        OperatingPoint::Off => {
            return Ok(off_output(perf, Some(mode_id), inputs, &schedules, diag));
        }
        OperatingPoint::Cycling { speed, plr } => {
            let point = &points[speed.index()];
            let spec = mode.speed(speed).spec();
            let rtf = match mode.speed_control() {
                SpeedControl::Staged => plr,
                SpeedControl::Discrete | SpeedControl::Continuous => {
                    let plf = modifier(curves, spec.curves.plf, CurveRole::Plf, &[plr], &mut diag)?;
                    (plr / plf.clamp(PLF_MIN, PLF_MAX)).min(1.0)
                }
            };
            let mixed = split::blend_states(inlet, &point.outlet, plr)?;
            Running {
                outlet: mixed.state,
                compressor: point.power * rtf,
                waste_heat: point.waste_heat * rtf,
                runtime_fraction: rtf,
                part_load_ratio: plr,
                speed_ratio: 0.0,
                pump_fraction: spec.evap_condenser_pump_power_fraction,
                condenser_flow_fraction: spec.condenser_air_flow_fraction,
                reuse_fraction: spec.condensate_reuse_fraction,
                dry: point.dry,
                saturated: point.saturated || mixed.saturated,
            }
        }
        OperatingPoint::Blend { lower, upper, ratio } => {
            let lo = &points[lower.index()];
            let hi = &points[upper.index()];
            let lo_spec = mode.speed(lower).spec();
            let hi_spec = mode.speed(upper).spec();
            let mixed = split::blend_states(&lo.outlet, &hi.outlet, ratio)?;
            Running {
                outlet: mixed.state,
                compressor: lerp(lo.power, hi.power, ratio),
                waste_heat: lerp(lo.waste_heat, hi.waste_heat, ratio),
                runtime_fraction: 1.0,
                part_load_ratio: 1.0,
                speed_ratio: ratio,
                pump_fraction: lerp(
                    lo_spec.evap_condenser_pump_power_fraction,
                    hi_spec.evap_condenser_pump_power_fraction,
                    ratio,
                ),
                condenser_flow_fraction: lerp(
                    lo_spec.condenser_air_flow_fraction,
                    hi_spec.condenser_air_flow_fraction,
                    ratio,
                ),
                reuse_fraction: lerp(lo_spec.condensate_reuse_fraction, hi_spec.condensate_reuse_fraction, ratio),
                dry: lo.dry && hi.dry,
                saturated: lo.saturated || hi.saturated || mixed.saturated,
            }
        }
    };

    diag.dry_coil = run.dry;
    diag.saturated_outlet = run.saturated;

    let rtf = run.runtime_fraction;
    let capacity = split::split_capacity(inlet, &run.outlet, mdot);
    let pump = condenser::pump_power(cond, run.pump_fraction, rtf);
    let evaporated = condenser::evaporative_water(
        cond,
        outdoor,
        t_cond,
        mode.rated_condenser_air_flow().value * run.condenser_flow_fraction,
        rtf,
        dt,
    );
    let collected = condenser::condensate(inlet, &run.outlet, mdot, dt);
    let water = condenser::water_balance(evaporated, collected, run.reuse_fraction);

    debug!(
        performance = perf.name(),
        mode = mode.name(),
        point = ?selection.point,
        plr = run.part_load_ratio,
        rtf,
        capacity_w = capacity.total,
        power_w = run.compressor,
        "coil timestep"
    );

    Ok(TimestepOutput {
        outlet_air: run.outlet,
        total_power: w(run.compressor + pump),
        compressor_power: w(run.compressor),
        pump_power: w(pump),
        crankcase_heater_power: w(crankcase_power(perf, outdoor_db, rtf)),
        basin_heater_power: w(0.0),
        total_capacity: w(capacity.total),
        sensible_capacity: w(capacity.sensible),
        latent_capacity: w(capacity.latent),
        water_consumption: m3(water.consumption),
        condensate_collected: m3(water.condensate_collected),
        waste_heat: w(run.waste_heat),
        runtime_fraction: rtf,
        part_load_ratio: run.part_load_ratio,
        speed_ratio: run.speed_ratio,
        mode: Some(mode_id),
        operating_point: selection.point,
        diagnostics: diag,
    })
}

/// Quantities of the running coil before the capacity split.
struct Running {
    outlet: AirState,
    compressor: f64,
    waste_heat: f64,
    runtime_fraction: f64,
    part_load_ratio: f64,
    speed_ratio: f64,
    pump_fraction: f64,
    condenser_flow_fraction: f64,
    reuse_fraction: f64,
    dry: bool,
    saturated: bool,
}

/// Full-load performance of one speed at current conditions.
#[derive(Debug, Clone, Copy)]
struct SpeedPoint {
    total: f64,
    sensible: f64,
    power: f64,
    waste_heat: f64,
    outlet: AirState,
    dry: bool,
    saturated: bool,
}

#[allow(clippy::too_many_arguments)]
fn full_load_point(
    curves: &CurveSet,
    speed: &Speed,
    inlet: &AirState,
    twb: f64,
    t_cond: f64,
    outdoor_db: f64,
    mdot: f64,
    diag: &mut Diagnostics,
) -> CoilResult<SpeedPoint> {
    let c = speed.curves();
    let rating = speed.rating();
    let tdb = inlet.dry_bulb_c();
    let ff = mdot / rating.air_mass_flow.value;

    let cap_ft = modifier(curves, c.cap_ft, CurveRole::CapFT, &[twb, t_cond], diag)?;
    let cap_ff = modifier(curves, c.cap_ff, CurveRole::CapFF, &[ff], diag)?;
    let eir_ft = modifier(curves, c.eir_ft, CurveRole::EirFT, &[twb, t_cond], diag)?;
    let eir_ff = modifier(curves, c.eir_ff, CurveRole::EirFF, &[ff], diag)?;
    let capacity = (rating.total_capacity.value * cap_ft * cap_ff).max(0.0);
    let power = capacity * rating.eir * eir_ft * eir_ff;

    let (total, shr, dry) = if c.has_shr_curves() {
        let shr_ft = modifier(curves, c.shr_ft, CurveRole::ShrFT, &[twb, tdb], diag)?;
        let shr_ff = modifier(curves, c.shr_ff, CurveRole::ShrFF, &[ff], diag)?;
        let total = limit_capacity(capacity, split::capacity_limit(inlet, mdot, 0.0), diag);
        let shr = (rating.shr * shr_ft * shr_ff).clamp(0.0, 1.0);
        (total, shr, shr >= 1.0)
    } else {
        let bf = speed.bypass_factor_at(mdot);
        let total = limit_capacity(capacity, split::capacity_limit(inlet, mdot, bf), diag);
        let est = split::shr_from_bypass_factor(inlet, total, mdot, bf)?;
        (total, est.shr, est.dry)
    };

    let leaving = split::leaving_state(inlet, mdot, total, shr)?;
    let sensible = split::split_capacity(inlet, &leaving.state, mdot).sensible;
    let waste_mod = modifier(curves, c.waste_heat_ft, CurveRole::WasteHeatFT, &[outdoor_db, tdb], diag)?;

    Ok(SpeedPoint {
        total,
        sensible,
        power,
        waste_heat: speed.spec().waste_heat_fraction * waste_mod * power,
        outlet: leaving.state,
        dry,
        saturated: leaving.saturated,
    })
}

fn limit_capacity(capacity: f64, limit: f64, diag: &mut Diagnostics) -> f64 {
    if capacity > limit {
        diag.capacity_limited = true;
        limit
    } else {
        capacity
    }
}

fn modifier(
    curves: &CurveSet,
    id: Option<CurveId>,
    role: CurveRole,
    inputs: &[f64],
    diag: &mut Diagnostics,
) -> CoilResult<f64> {
    let v = curves.modifier(id, inputs)?;
    if v.clamped && !diag.clamped_curves.contains(&role) {
        diag.clamped_curves.push(role);
    }
    Ok(v.value)
}

fn crankcase_power(perf: &Performance, outdoor_db: f64, runtime_fraction: f64) -> f64 {
    if outdoor_db < perf.max_outdoor_temp_crankcase_c() {
        perf.crankcase_heater_capacity().value * (1.0 - runtime_fraction)
    } else {
        0.0
    }
}

fn off_output(
    perf: &Performance,
    mode: Option<ModeId>,
    inputs: &CoilInputs,
    schedules: &ScheduleValues,
    diag: Diagnostics,
) -> TimestepOutput {
    let outdoor_db = inputs.condenser_entering_air.dry_bulb_c();
    // Without an active mode the basin belongs to the first mode.
    let basin_mode = perf.mode(mode.unwrap_or(ModeId::from_index(0)));
    let basin = condenser::basin_heater_power(
        basin_mode.condenser(),
        outdoor_db,
        false,
        schedules.basin_heater > 0.0,
    );

    TimestepOutput {
        outlet_air: inputs.entering_air,
        total_power: w(0.0),
        compressor_power: w(0.0),
        pump_power: w(0.0),
        crankcase_heater_power: w(crankcase_power(perf, outdoor_db, 0.0)),
        basin_heater_power: w(basin),
        total_capacity: w(0.0),
        sensible_capacity: w(0.0),
        latent_capacity: w(0.0),
        water_consumption: m3(0.0),
        condensate_collected: m3(0.0),
        waste_heat: w(0.0),
        runtime_fraction: 0.0,
        part_load_ratio: 0.0,
        speed_ratio: 0.0,
        mode,
        operating_point: OperatingPoint::Off,
        diagnostics: diag,
    }
}

fn check_inputs(inputs: &CoilInputs, schedules: &ScheduleValues) -> CoilResult<f64> {
    let sensible = inputs.requested_sensible_load.value;
    if !sensible.is_finite() || sensible < 0.0 {
        return Err(CoilError::InvalidLoad {
            what: "requested sensible load must be finite and non-negative",
            value: sensible,
        });
    }
    if let Some(latent) = inputs.requested_latent_load {
        if !latent.value.is_finite() || latent.value < 0.0 {
            return Err(CoilError::InvalidLoad {
                what: "requested latent load must be finite and non-negative",
                value: latent.value,
            });
        }
    }
    let mdot = inputs.supply_air_mass_flow.value;
    if !mdot.is_finite() || mdot < 0.0 {
        return Err(CoilError::InvalidMassFlow { value: mdot });
    }
    let dt = inputs.timestep.get::<second>();
    if !dt.is_finite() || dt <= 0.0 {
        return Err(CoilError::InvalidArg {
            what: "timestep length must be positive",
        });
    }
    if !schedules.availability.is_finite() || !schedules.basin_heater.is_finite() {
        return Err(CoilError::InvalidArg {
            what: "schedule values must be finite",
        });
    }
    for air in [&inputs.entering_air, &inputs.condenser_entering_air] {
        let w_sat = saturation_humidity_ratio(air.dry_bulb_c(), air.pressure().value);
        if air.humidity_ratio() > w_sat * (1.0 + SUPERSATURATION_TOL) {
            return Err(CoilError::NonPhysical {
                what: "air state is supersaturated",
            });
        }
    }
    Ok(dt)
}
