//! Project validation logic.

use crate::schema::{CondenserDef, OperatingModeDef, PerformanceDef, ProjectDef, SpeedDef};
use std::collections::HashSet;

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate name: {name} in {context}")]
    DuplicateName { name: String, context: String },

    #[error("Missing reference: {name} in {context}")]
    MissingReference { name: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_project(project: &ProjectDef) -> Result<(), ValidationError> {
    if project.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    let curves = unique_names(project.curves.iter().map(|c| c.name.as_str()), "curves")?;
    let schedules = unique_names(project.schedules.iter().map(|s| s.name.as_str()), "schedules")?;
    let performances = unique_names(
        project.performances.iter().map(|p| p.name.as_str()),
        "performances",
    )?;
    let modes = unique_names(
        project.operating_modes.iter().map(|m| m.name.as_str()),
        "operating_modes",
    )?;
    let speeds = unique_names(project.speeds.iter().map(|s| s.name.as_str()), "speeds")?;
    unique_names(project.coils.iter().map(|c| c.name.as_str()), "coils")?;

    for curve in &project.curves {
        for (field, limits) in [
            ("x_limits", curve.x_limits),
            ("y_limits", curve.y_limits),
            ("output_limits", curve.output_limits),
        ] {
            if let Some([min, max]) = limits {
                if !(min <= max) {
                    return Err(invalid(
                        &format!("curve {}.{field}", curve.name),
                        format!("[{min}, {max}]"),
                        "min must not exceed max",
                    ));
                }
            }
        }
    }

    for schedule in &project.schedules {
        if let dx_coil::Schedule::Hourly { values } = &schedule.schedule {
            if values.len() != 24 {
                return Err(invalid(
                    &format!("schedule {}.values", schedule.name),
                    values.len().to_string(),
                    "hourly schedules need 24 values",
                ));
            }
        }
    }

    for perf in &project.performances {
        validate_performance(perf, &modes, &schedules)?;
    }
    for mode in &project.operating_modes {
        validate_mode(mode, &speeds, &schedules)?;
    }
    for speed in &project.speeds {
        validate_speed(speed, &curves)?;
    }

    for coil in &project.coils {
        require(&performances, &coil.performance, &format!("coil {} performance", coil.name))?;
        if let Some(sched) = &coil.availability_schedule {
            require(&schedules, sched, &format!("coil {} availability_schedule", coil.name))?;
        }
    }

    Ok(())
}

fn validate_performance(
    perf: &PerformanceDef,
    modes: &HashSet<String>,
    schedules: &HashSet<String>,
) -> Result<(), ValidationError> {
    let ctx = |field: &str| format!("performance {}.{field}", perf.name);

    if perf.modes.is_empty() {
        return Err(invalid(&ctx("modes"), "[]".into(), "at least one mode required"));
    }
    for mode in &perf.modes {
        require(modes, mode, &ctx("modes"))?;
    }
    if let Some(sched) = &perf.mode_schedule {
        require(schedules, sched, &ctx("mode_schedule"))?;
    }
    non_negative(perf.crankcase_heater_capacity_w, &ctx("crankcase_heater_capacity_w"))?;
    let b = perf.plr_bounds;
    if !(b.min >= 0.0 && b.max <= 1.0 && b.min < b.max) {
        return Err(invalid(
            &ctx("plr_bounds"),
            format!("[{}, {}]", b.min, b.max),
            "need 0 <= min < max <= 1",
        ));
    }
    Ok(())
}

fn validate_mode(
    mode: &OperatingModeDef,
    speeds: &HashSet<String>,
    schedules: &HashSet<String>,
) -> Result<(), ValidationError> {
    let ctx = |field: &str| format!("operating mode {}.{field}", mode.name);

    positive(mode.rated_total_capacity_w, &ctx("rated_total_capacity_w"))?;
    positive(mode.rated_evap_air_flow_m3s, &ctx("rated_evap_air_flow_m3s"))?;
    non_negative(mode.rated_condenser_air_flow_m3s, &ctx("rated_condenser_air_flow_m3s"))?;
    if !(mode.rated_shr > 0.0 && mode.rated_shr <= 1.0) {
        return Err(invalid(&ctx("rated_shr"), mode.rated_shr.to_string(), "must be in (0, 1]"));
    }
    if mode.speeds.is_empty() {
        return Err(invalid(&ctx("speeds"), "[]".into(), "at least one speed required"));
    }
    if let Some(n) = mode.nominal_speed_count {
        if n != mode.speeds.len() {
            return Err(invalid(
                &ctx("nominal_speed_count"),
                n.to_string(),
                "must equal the number of listed speeds",
            ));
        }
    }
    for speed in &mode.speeds {
        require(speeds, speed, &ctx("speeds"))?;
    }
    if let CondenserDef::Evaporative {
        pump_power_w,
        effectiveness,
        basin_heater_capacity_w,
        basin_heater_schedule,
        ..
    } = &mode.condenser
    {
        fraction(*effectiveness, &ctx("condenser.effectiveness"))?;
        non_negative(*pump_power_w, &ctx("condenser.pump_power_w"))?;
        non_negative(*basin_heater_capacity_w, &ctx("condenser.basin_heater_capacity_w"))?;
        if let Some(sched) = basin_heater_schedule {
            require(schedules, sched, &ctx("condenser.basin_heater_schedule"))?;
        }
    }
    Ok(())
}

fn validate_speed(speed: &SpeedDef, curves: &HashSet<String>) -> Result<(), ValidationError> {
    let ctx = |field: &str| format!("speed {}.{field}", speed.name);

    positive(speed.total_capacity_fraction, &ctx("total_capacity_fraction"))?;
    positive(speed.evap_air_flow_fraction, &ctx("evap_air_flow_fraction"))?;
    non_negative(speed.condenser_air_flow_fraction, &ctx("condenser_air_flow_fraction"))?;
    positive(speed.rated_cop, &ctx("rated_cop"))?;
    non_negative(speed.evap_condenser_pump_power_fraction, &ctx("evap_condenser_pump_power_fraction"))?;
    fraction(speed.condensate_reuse_fraction, &ctx("condensate_reuse_fraction"))?;
    fraction(speed.waste_heat_fraction, &ctx("waste_heat_fraction"))?;
    if let Some(shr) = speed.rated_shr {
        if !(shr > 0.0 && shr <= 1.0) {
            return Err(invalid(&ctx("rated_shr"), shr.to_string(), "must be in (0, 1]"));
        }
    }
    for (role, name) in speed.curves.references() {
        require(curves, name, &ctx(&format!("curves.{role}")))?;
    }
    Ok(())
}

fn unique_names<'a>(
    names: impl Iterator<Item = &'a str>,
    context: &str,
) -> Result<HashSet<String>, ValidationError> {
    let mut seen = HashSet::new();
    for name in names {
        let key = name.to_uppercase();
        if key.trim().is_empty() {
            return Err(invalid(context, format!("{name:?}"), "names must not be empty"));
        }
        if !seen.insert(key) {
            return Err(ValidationError::DuplicateName {
                name: name.to_string(),
                context: context.to_string(),
            });
        }
    }
    Ok(seen)
}

fn require(names: &HashSet<String>, name: &str, context: &str) -> Result<(), ValidationError> {
    if names.contains(&name.to_uppercase()) {
        Ok(())
    } else {
        Err(ValidationError::MissingReference {
            name: name.to_string(),
            context: context.to_string(),
        })
    }
}

fn positive(v: f64, field: &str) -> Result<(), ValidationError> {
    if v > 0.0 && v.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, v.to_string(), "must be positive"))
    }
}

fn non_negative(v: f64, field: &str) -> Result<(), ValidationError> {
    if v >= 0.0 && v.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, v.to_string(), "must be non-negative"))
    }
}

fn fraction(v: f64, field: &str) -> Result<(), ValidationError> {
    if (0.0..=1.0).contains(&v) {
        Ok(())
    } else {
        Err(invalid(field, v.to_string(), "must be in [0, 1]"))
    }
}

fn invalid(field: &str, value: String, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value,
        reason: reason.to_string(),
    }
}
