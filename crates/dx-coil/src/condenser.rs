//! Condenser and water model: effective condenser temperature, evaporative
//! pump and basin heater power, evaporative water use and condensate.

use crate::error::CoilResult;
use crate::mode::CondenserType;
use dx_core::units::constants::WATER_DENSITY_KG_M3;
use dx_psychro::{AirState, humidity_ratio_from_enthalpy};

/// Temperature [°C] the condenser sees, used as the second input of the
/// temperature curves.
///
/// An evaporative condenser pre-cools outdoor air towards its wet-bulb by
/// `effectiveness`.
pub fn condenser_inlet_temperature(condenser: &CondenserType, outdoor: &AirState) -> CoilResult<f64> {
    match condenser {
        CondenserType::AirCooled => Ok(outdoor.dry_bulb_c()),
        CondenserType::Evaporative(evap) => {
            let tdb = outdoor.dry_bulb_c();
            let twb = outdoor.wet_bulb_c()?;
            Ok(twb + (1.0 - evap.effectiveness) * (tdb - twb))
        }
    }
}

/// Evaporative condenser pump power [W].
pub fn pump_power(condenser: &CondenserType, pump_fraction: f64, runtime_fraction: f64) -> f64 {
    match condenser {
        CondenserType::Evaporative(evap) if runtime_fraction > 0.0 => {
            evap.pump_power.value * pump_fraction * runtime_fraction
        }
        _ => 0.0,
    }
}

/// Basin heater power [W]: full capacity while available, below setpoint and
/// the compressor is not running.
pub fn basin_heater_power(condenser: &CondenserType, outdoor_db: f64, running: bool, available: bool) -> f64 {
    match condenser {
        CondenserType::Evaporative(evap)
            if available && !running && outdoor_db < evap.basin_heater_setpoint_c =>
        {
            evap.basin_heater_capacity.value
        }
        _ => 0.0,
    }
}

/// Water evaporated [m³] in a timestep of `dt` seconds.
///
/// Condenser air is humidified at constant enthalpy up to `condenser_temp`;
/// the pickup times the condenser air mass flow is the evaporation rate.
pub fn evaporative_water(
    condenser: &CondenserType,
    outdoor: &AirState,
    condenser_temp: f64,
    condenser_air_flow_m3s: f64,
    runtime_fraction: f64,
    dt: f64,
) -> f64 {
    if condenser.evaporative().is_none() || runtime_fraction <= 0.0 {
        return 0.0;
    }
    let w_out = outdoor.humidity_ratio();
    let w_cond = humidity_ratio_from_enthalpy(condenser_temp, outdoor.enthalpy());
    let mdot_cond = condenser_air_flow_m3s * outdoor.density();
    let rate = mdot_cond * (w_cond - w_out).max(0.0) / WATER_DENSITY_KG_M3;
    rate * runtime_fraction * dt
}

/// Condensate removed from the supply air [m³] over `dt` seconds.
pub fn condensate(inlet: &AirState, outlet: &AirState, mdot: f64, dt: f64) -> f64 {
    let removed = (inlet.humidity_ratio() - outlet.humidity_ratio()).max(0.0);
    mdot * removed / WATER_DENSITY_KG_M3 * dt
}

/// Water balance of a timestep [m³].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WaterBalance {
    /// Make-up water drawn from supply, after condensate reuse.
    pub consumption: f64,
    /// Condensate collected and not reused.
    pub condensate_collected: f64,
}

/// Offset evaporative make-up by up to `reuse_fraction` of the condensate.
pub fn water_balance(evaporated: f64, condensate: f64, reuse_fraction: f64) -> WaterBalance {
    let reused = (condensate * reuse_fraction).min(evaporated);
    WaterBalance {
        consumption: evaporated - reused,
        condensate_collected: condensate - reused,
    }
}
