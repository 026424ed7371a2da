//! Resolve a validated project into curve sets, records and coils.

use crate::schema::{
    BypassDef, CoilDef, CondenserDef, CurveDef, OperatingModeDef, ProjectDef, SpeedCurvesDef,
    SpeedDef,
};
use crate::validate::ValidationError;
use crate::{ProjectError, ProjectResult, validate_project};
use dx_coil::{
    BypassFactorInput, Coil, CoilBank, CondenserType, EvaporativeCondenser, OperatingModeSpec,
    Performance, PerformanceSpec, ScheduleTable, SpeedCurves, SpeedSpec,
};
use dx_core::CurveId;
use dx_core::units::{m3ps, w};
use dx_curves::{Curve, CurveSet};
use std::collections::HashMap;
use std::sync::Arc;

/// Build every curve of the project into one set.
pub fn build_curves(project: &ProjectDef) -> ProjectResult<CurveSet> {
    let mut set = CurveSet::new();
    for def in &project.curves {
        set.add(curve_from_def(def))?;
    }
    Ok(set)
}

fn curve_from_def(def: &CurveDef) -> Curve {
    let mut curve = Curve::new(def.name.clone(), def.kind.clone());
    if let Some([min, max]) = def.x_limits {
        curve = curve.with_x_limits(min, max);
    }
    if let Some([min, max]) = def.y_limits {
        curve = curve.with_y_limits(min, max);
    }
    if let Some([min, max]) = def.output_limits {
        curve = curve.with_output_limits(min, max);
    }
    curve
}

/// Build the named schedules of the project.
pub fn build_schedules(project: &ProjectDef) -> ProjectResult<ScheduleTable> {
    let mut table = ScheduleTable::new();
    for def in &project.schedules {
        table.insert(&def.name, def.schedule.clone())?;
    }
    Ok(table)
}

/// Resolve performance `name` with its modes and speeds against `curves`.
pub fn build_performance(project: &ProjectDef, name: &str, curves: &CurveSet) -> ProjectResult<Performance> {
    let perf = find(&project.performances, name, |p| &p.name, "performances")?;

    let modes = perf
        .modes
        .iter()
        .map(|mode_name| {
            let mode = find(&project.operating_modes, mode_name, |m| &m.name, "operating_modes")?;
            mode_spec(project, mode, curves)
        })
        .collect::<ProjectResult<Vec<_>>>()?;

    let spec = PerformanceSpec {
        name: perf.name.clone(),
        crankcase_heater_capacity: w(perf.crankcase_heater_capacity_w),
        max_outdoor_temp_crankcase_c: perf.max_outdoor_temp_crankcase_c,
        min_outdoor_temp_compressor_c: perf.min_outdoor_temp_compressor_c,
        mode_schedule: perf.mode_schedule.clone(),
        plr_bounds: perf.plr_bounds,
        modes,
    };
    Ok(Performance::build(spec, curves)?)
}

fn mode_spec(project: &ProjectDef, mode: &OperatingModeDef, curves: &CurveSet) -> ProjectResult<OperatingModeSpec> {
    let speeds = mode
        .speeds
        .iter()
        .map(|speed_name| {
            let speed = find(&project.speeds, speed_name, |s| &s.name, "speeds")?;
            speed_spec(speed, curves)
        })
        .collect::<ProjectResult<Vec<_>>>()?;

    let condenser = match &mode.condenser {
        CondenserDef::AirCooled => CondenserType::AirCooled,
        CondenserDef::Evaporative {
            pump_power_w,
            effectiveness,
            basin_heater_capacity_w,
            basin_heater_setpoint_c,
            basin_heater_schedule,
        } => CondenserType::Evaporative(EvaporativeCondenser {
            pump_power: w(*pump_power_w),
            effectiveness: *effectiveness,
            basin_heater_capacity: w(*basin_heater_capacity_w),
            basin_heater_setpoint_c: *basin_heater_setpoint_c,
            basin_heater_schedule: basin_heater_schedule.clone(),
        }),
    };

    Ok(OperatingModeSpec {
        name: mode.name.clone(),
        rated_total_capacity: w(mode.rated_total_capacity_w),
        rated_evap_air_flow: m3ps(mode.rated_evap_air_flow_m3s),
        rated_shr: mode.rated_shr,
        rated_condenser_air_flow: m3ps(mode.rated_condenser_air_flow_m3s),
        nominal_speed_count: mode.nominal_speed_count.unwrap_or(mode.speeds.len()),
        speed_control: mode.speed_control,
        condenser,
        speeds,
    })
}

fn speed_spec(speed: &SpeedDef, curves: &CurveSet) -> ProjectResult<SpeedSpec> {
    let bypass = match speed.bypass {
        BypassDef::FromRatedShr => BypassFactorInput::FromRatedShr,
        BypassDef::Rated { value } => BypassFactorInput::Rated(value),
        BypassDef::ApparatusDewPoint {
            temperature_c,
            humidity_ratio,
        } => BypassFactorInput::ApparatusDewPoint {
            temperature_c,
            humidity_ratio,
        },
    };

    Ok(SpeedSpec {
        name: speed.name.clone(),
        total_capacity_fraction: speed.total_capacity_fraction,
        evap_air_flow_fraction: speed.evap_air_flow_fraction,
        condenser_air_flow_fraction: speed.condenser_air_flow_fraction,
        rated_shr: speed.rated_shr,
        rated_cop: speed.rated_cop,
        evap_condenser_pump_power_fraction: speed.evap_condenser_pump_power_fraction,
        condensate_reuse_fraction: speed.condensate_reuse_fraction,
        bypass,
        curves: speed_curves(&speed.curves, curves)?,
        waste_heat_fraction: speed.waste_heat_fraction,
    })
}

fn speed_curves(def: &SpeedCurvesDef, curves: &CurveSet) -> ProjectResult<SpeedCurves> {
    let id = |name: &Option<String>| -> ProjectResult<Option<CurveId>> {
        name.as_deref().map(|n| curves.id_of(n)).transpose().map_err(ProjectError::from)
    };
    Ok(SpeedCurves {
        cap_ft: id(&def.cap_ft)?,
        cap_ff: id(&def.cap_ff)?,
        eir_ft: id(&def.eir_ft)?,
        eir_ff: id(&def.eir_ff)?,
        plf: id(&def.plf)?,
        shr_ft: id(&def.shr_ft)?,
        shr_ff: id(&def.shr_ff)?,
        waste_heat_ft: id(&def.waste_heat_ft)?,
    })
}

/// Validate `project` and build coil `name` with fresh runtime state.
pub fn build_coil(project: &ProjectDef, name: &str) -> ProjectResult<Coil> {
    validate_project(project)?;
    let curves = Arc::new(build_curves(project)?);
    let coil = find(&project.coils, name, |c| &c.name, "coils")?;
    let perf = build_performance(project, &coil.performance, &curves)?;
    Ok(assemble(coil, Arc::new(perf), curves))
}

/// Validate `project` and build all of its coils, sharing one curve set
/// and one record per performance.
pub fn build_bank(project: &ProjectDef) -> ProjectResult<CoilBank> {
    validate_project(project)?;
    let curves = Arc::new(build_curves(project)?);
    let mut performances: HashMap<String, Arc<Performance>> = HashMap::new();
    let mut bank = CoilBank::new();
    for coil in &project.coils {
        let key = coil.performance.to_uppercase();
        let perf = match performances.get(&key) {
            Some(perf) => perf.clone(),
            None => {
                let perf = Arc::new(build_performance(project, &coil.performance, &curves)?);
                performances.insert(key, perf.clone());
                perf
            }
        };
        bank.add(assemble(coil, perf, curves.clone()))?;
    }
    Ok(bank)
}

fn assemble(def: &CoilDef, perf: Arc<Performance>, curves: Arc<CurveSet>) -> Coil {
    let coil = Coil::new(def.name.clone(), perf, curves);
    match &def.availability_schedule {
        Some(sched) => coil.with_availability_schedule(sched.clone()),
        None => coil,
    }
}

fn find<'a, T>(
    items: &'a [T],
    name: &str,
    name_of: impl Fn(&T) -> &String,
    context: &str,
) -> ProjectResult<&'a T> {
    let key = name.to_uppercase();
    items
        .iter()
        .find(|item| name_of(item).to_uppercase() == key)
        .ok_or_else(|| {
            ValidationError::MissingReference {
                name: name.to_string(),
                context: context.to_string(),
            }
            .into()
        })
}
