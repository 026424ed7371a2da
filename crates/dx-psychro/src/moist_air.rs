//! Moist-air property functions.
//!
//! Correlations follow the ASHRAE Handbook of Fundamentals (Hyland-Wexler
//! saturation pressure, ideal-gas mixture relations). Simple algebraic
//! relations return `f64` directly; inversions that need iteration return
//! `PsychroResult`.

use crate::error::{PsychroError, PsychroResult};
use crate::solve::bisect;

/// Specific heat of dry air [J/(kg·K)].
pub const CP_AIR: f64 = 1.00484e3;
/// Specific heat of water vapour [J/(kg·K)].
pub const CP_VAPOR: f64 = 1.85895e3;
/// Specific heat of liquid water [J/(kg·K)].
pub const CP_WATER: f64 = 4.18e3;
/// Latent heat of vaporization at 0 °C [J/kg].
pub const HFG_0C: f64 = 2.50094e6;
/// Gas constant of dry air [J/(kg·K)].
pub const R_DRY_AIR: f64 = 287.042;
/// Gas constant of water vapour [J/(kg·K)].
pub const R_WATER_VAPOR: f64 = 461.52;
/// Molar mass ratio water / dry air.
pub const EPSILON: f64 = 0.621945;

const KELVIN: f64 = 273.15;
const T_MIN_C: f64 = -100.0;
const T_MAX_C: f64 = 200.0;
const T_TOL: f64 = 1e-7;

/// Saturation vapour pressure [Pa] over ice (below 0 °C) or liquid water.
pub fn saturation_pressure(tdb: f64) -> f64 {
    let t = tdb + KELVIN;
    let ln_p = if tdb < 0.0 {
        -5.674_535_9e3 / t + 6.392_524_7 - 9.677_843e-3 * t + 6.221_570_1e-7 * t * t
            + 2.074_782_5e-9 * t.powi(3)
            - 9.484_024e-13 * t.powi(4)
            + 4.163_501_9 * t.ln()
    } else {
        -5.800_220_6e3 / t + 1.391_499_3 - 4.864_023_9e-2 * t + 4.176_476_8e-5 * t * t
            - 1.445_209_3e-8 * t.powi(3)
            + 6.545_967_3 * t.ln()
    };
    ln_p.exp()
}

/// Humidity ratio [kg/kg] for a partial vapour pressure at total pressure `p`.
pub fn humidity_ratio_from_vapor_pressure(pv: f64, p: f64) -> f64 {
    EPSILON * pv / (p - pv).max(1.0)
}

/// Partial vapour pressure [Pa] of air with humidity ratio `w` at total pressure `p`.
pub fn vapor_pressure(w: f64, p: f64) -> f64 {
    p * w / (EPSILON + w)
}

/// Saturation humidity ratio at dry-bulb `tdb` and pressure `p`.
pub fn saturation_humidity_ratio(tdb: f64, p: f64) -> f64 {
    humidity_ratio_from_vapor_pressure(saturation_pressure(tdb), p)
}

/// Moist-air enthalpy [J/kg dry air].
pub fn enthalpy(tdb: f64, w: f64) -> f64 {
    CP_AIR * tdb + w.max(0.0) * (HFG_0C + CP_VAPOR * tdb)
}

/// Moist-air enthalpy from dry-bulb, relative humidity and pressure.
pub fn enthalpy_from_rh(tdb: f64, rh: f64, p: f64) -> f64 {
    enthalpy(tdb, humidity_ratio_from_rh(tdb, rh, p))
}

/// Dry-bulb temperature [°C] from enthalpy and humidity ratio.
pub fn dry_bulb_from_enthalpy(h: f64, w: f64) -> f64 {
    let w = w.max(0.0);
    (h - HFG_0C * w) / (CP_AIR + CP_VAPOR * w)
}

/// Humidity ratio from dry-bulb and enthalpy.
pub fn humidity_ratio_from_enthalpy(tdb: f64, h: f64) -> f64 {
    ((h - CP_AIR * tdb) / (HFG_0C + CP_VAPOR * tdb)).max(0.0)
}

/// Humidity ratio from dry-bulb, relative humidity (fraction) and pressure.
pub fn humidity_ratio_from_rh(tdb: f64, rh: f64, p: f64) -> f64 {
    humidity_ratio_from_vapor_pressure(rh.clamp(0.0, 1.0) * saturation_pressure(tdb), p)
}

/// Humidity ratio of air whose dew point is `tdp`.
pub fn humidity_ratio_from_dew_point(tdp: f64, p: f64) -> f64 {
    saturation_humidity_ratio(tdp, p)
}

/// Humidity ratio from dry-bulb, thermodynamic wet-bulb and pressure.
pub fn humidity_ratio_from_wet_bulb(tdb: f64, twb: f64, p: f64) -> f64 {
    let ws = saturation_humidity_ratio(twb, p);
    let w = if twb >= 0.0 {
        ((2501.0 - 2.326 * twb) * ws - 1.006 * (tdb - twb)) / (2501.0 + 1.86 * tdb - 4.186 * twb)
    } else {
        ((2830.0 - 0.24 * twb) * ws - 1.006 * (tdb - twb)) / (2830.0 + 1.86 * tdb - 2.1 * twb)
    };
    w.max(0.0)
}

/// Relative humidity (fraction) from dry-bulb, humidity ratio and pressure.
pub fn relative_humidity(tdb: f64, w: f64, p: f64) -> f64 {
    (vapor_pressure(w, p) / saturation_pressure(tdb)).clamp(0.0, 1.0)
}

/// Relative humidity (fraction) from dry-bulb and vapour density [kg/m³].
pub fn relative_humidity_from_vapor_density(tdb: f64, rho_v: f64) -> f64 {
    let pv = rho_v * R_WATER_VAPOR * (tdb + KELVIN);
    (pv / saturation_pressure(tdb)).clamp(0.0, 1.0)
}

/// Water vapour density [kg/m³].
pub fn vapor_density(tdb: f64, w: f64, p: f64) -> f64 {
    vapor_pressure(w, p) / (R_WATER_VAPOR * (tdb + KELVIN))
}

/// Water vapour density [kg/m³] from dry-bulb and relative humidity.
pub fn vapor_density_from_rh(tdb: f64, rh: f64) -> f64 {
    rh.clamp(0.0, 1.0) * saturation_pressure(tdb) / (R_WATER_VAPOR * (tdb + KELVIN))
}

/// Moist-air density [kg/m³].
pub fn density(p: f64, tdb: f64, w: f64) -> f64 {
    p / (R_DRY_AIR * (tdb + KELVIN) * (1.0 + w.max(0.0) / EPSILON))
}

/// Specific volume [m³/kg dry air].
pub fn specific_volume(tdb: f64, w: f64, p: f64) -> f64 {
    R_DRY_AIR * (tdb + KELVIN) * (1.0 + w.max(0.0) / EPSILON) / p
}

/// Moist-air specific heat [J/(kg·K)] per kg dry air.
pub fn specific_heat(w: f64) -> f64 {
    CP_AIR + CP_VAPOR * w.max(0.0)
}

/// Latent heat of vaporization [J/kg] at dry-bulb `tdb`.
pub fn latent_heat_of_vaporization(tdb: f64) -> f64 {
    (HFG_0C + CP_VAPOR * tdb) - CP_WATER * tdb
}

/// Latent energy carried per kg of moisture in air at `tdb` [J/kg].
pub fn latent_energy_of_moisture(tdb: f64) -> f64 {
    HFG_0C + CP_VAPOR * tdb
}

/// Saturation temperature [°C] for enthalpy `h` at pressure `p`.
pub fn saturation_temperature(h: f64, p: f64) -> PsychroResult<f64> {
    check_pressure(p)?;
    if !h.is_finite() {
        return Err(PsychroError::NonPhysical { what: "enthalpy" });
    }
    bisect(
        |t| enthalpy(t, saturation_humidity_ratio(t, p)) - h,
        T_MIN_C,
        T_MAX_C,
        T_TOL,
        "saturation temperature",
    )
}

/// Thermodynamic wet-bulb temperature [°C].
pub fn wet_bulb(tdb: f64, w: f64, p: f64) -> PsychroResult<f64> {
    check_pressure(p)?;
    if !tdb.is_finite() || !w.is_finite() || w < 0.0 {
        return Err(PsychroError::NonPhysical {
            what: "wet-bulb inputs",
        });
    }
    // Saturated or supersaturated air: wet-bulb equals dry-bulb.
    if w >= saturation_humidity_ratio(tdb, p) {
        return Ok(tdb);
    }
    bisect(
        |twb| humidity_ratio_from_wet_bulb(tdb, twb, p) - w,
        T_MIN_C,
        tdb,
        T_TOL,
        "wet-bulb temperature",
    )
    .or_else(|e| match e {
        // Extremely dry air: the correlation floors at zero before reaching `w`.
        PsychroError::OutOfRange { .. } if w < 1e-6 => Ok(T_MIN_C),
        other => Err(other),
    })
}

/// Dew-point temperature [°C].
pub fn dew_point(w: f64, p: f64) -> PsychroResult<f64> {
    check_pressure(p)?;
    if !w.is_finite() || w <= 0.0 {
        return Err(PsychroError::NonPhysical {
            what: "humidity ratio for dew point",
        });
    }
    let pv = vapor_pressure(w, p);
    bisect(
        |t| saturation_pressure(t) - pv,
        T_MIN_C,
        T_MAX_C,
        T_TOL,
        "dew-point temperature",
    )
}

/// Dew-point temperature [°C] from dry-bulb and wet-bulb.
pub fn dew_point_from_wet_bulb(tdb: f64, twb: f64, p: f64) -> PsychroResult<f64> {
    dew_point(humidity_ratio_from_wet_bulb(tdb, twb, p), p)
}

fn check_pressure(p: f64) -> PsychroResult<()> {
    if !p.is_finite() || p <= 0.0 {
        return Err(PsychroError::NonPhysical {
            what: "barometric pressure",
        });
    }
    Ok(())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn wet_bulb_never_exceeds_dry_bulb(tdb in 0.0_f64..45.0, rh in 0.05_f64..1.0) {
            let w = humidity_ratio_from_rh(tdb, rh, 101_325.0);
            let twb = wet_bulb(tdb, w, 101_325.0).unwrap();
            prop_assert!(twb <= tdb + 1e-9);
        }

        #[test]
        fn enthalpy_increases_with_temperature(tdb in -20.0_f64..50.0, w in 0.0_f64..0.03) {
            prop_assert!(enthalpy(tdb + 1.0, w) > enthalpy(tdb, w));
        }
    }
}
