//! Sensible/latent split of coil capacity with the bypass-factor method.
//!
//! The coil leaving state lies on the straight line between the entering
//! state and the apparatus dew point (ADP) on the saturation curve. The
//! bypass factor is the share of that line the air does not travel:
//! `h_out = h_adp + BF · (h_in − h_adp)`.

use dx_core::units::Pressure;
use dx_core::units::constants::STD_PRESSURE_PA;
use dx_psychro::{
    AirState, PsychroError, PsychroResult, bisect, dry_bulb_from_enthalpy, enthalpy,
    humidity_ratio_from_enthalpy, humidity_ratio_from_wet_bulb, saturation_humidity_ratio,
    saturation_temperature,
};

/// Entering dry-bulb at rating conditions [°C].
pub const RATED_INLET_DB_C: f64 = 26.67;
/// Entering wet-bulb at rating conditions [°C].
pub const RATED_INLET_WB_C: f64 = 19.44;
/// Lowest apparatus dew point the model will place on the saturation curve [°C].
pub const MIN_ADP_C: f64 = -40.0;

const ADP_MARCH_STEP: f64 = 0.05;

/// SHR at an operating point and whether the coil surface is dry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShrEstimate {
    pub shr: f64,
    pub dry: bool,
}

/// Coil leaving air and whether it had to be pulled back onto saturation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeavingAir {
    pub state: AirState,
    pub saturated: bool,
}

/// Capacity delivered between two air states [W].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacitySplit {
    pub total: f64,
    pub sensible: f64,
    pub latent: f64,
}

impl CapacitySplit {
    pub const ZERO: CapacitySplit = CapacitySplit {
        total: 0.0,
        sensible: 0.0,
        latent: 0.0,
    };
}

/// Rated bypass factor from rated capacity [W], air mass flow [kg/s] and SHR.
///
/// The rated leaving state is found at rating conditions; the line from the
/// entering state through it is extended until it meets saturation.
pub fn rated_bypass_factor(total_capacity: f64, mdot: f64, shr: f64) -> PsychroResult<f64> {
    if !(total_capacity > 0.0 && mdot > 0.0 && shr > 0.0 && shr <= 1.0) {
        return Err(PsychroError::NonPhysical {
            what: "rated capacity, flow and SHR",
        });
    }
    let p = STD_PRESSURE_PA;
    let t_in = RATED_INLET_DB_C;
    let w_in = humidity_ratio_from_wet_bulb(t_in, RATED_INLET_WB_C, p);
    let h_in = enthalpy(t_in, w_in);

    let dh = total_capacity / mdot;
    let w_out = humidity_ratio_from_enthalpy(t_in, h_in - (1.0 - shr) * dh);
    let t_out = dry_bulb_from_enthalpy(h_in - dh, w_out);
    if w_out >= saturation_humidity_ratio(t_out, p) {
        return Err(PsychroError::OutOfRange {
            what: "rated leaving air is saturated",
        });
    }

    let dt = t_out - t_in;
    let dw = w_out - w_in;
    let mut s_max = (MIN_ADP_C - t_in) / dt;
    if dw < 0.0 {
        s_max = s_max.min(-w_in / dw);
    }
    let gap = |s: f64| saturation_humidity_ratio(t_in + s * dt, p) - (w_in + s * dw);

    // The saturation curve is convex, so the line can cross it twice. March to
    // the first crossing, then refine.
    let mut lo = 1.0;
    loop {
        let hi = (lo + ADP_MARCH_STEP).min(s_max);
        if gap(hi) <= 0.0 {
            let s = bisect(gap, lo, hi, 1e-10, "apparatus dew point")?;
            return Ok(1.0 - 1.0 / s);
        }
        if hi >= s_max {
            return Err(PsychroError::OutOfRange {
                what: "rated condition line does not reach saturation",
            });
        }
        lo = hi;
    }
}

/// Rated bypass factor from an explicit apparatus dew point pair.
pub fn bypass_factor_from_adp(
    total_capacity: f64,
    mdot: f64,
    t_adp: f64,
    w_adp: f64,
) -> PsychroResult<f64> {
    if !(total_capacity > 0.0 && mdot > 0.0) {
        return Err(PsychroError::NonPhysical {
            what: "rated capacity and flow",
        });
    }
    let p = STD_PRESSURE_PA;
    let w_in = humidity_ratio_from_wet_bulb(RATED_INLET_DB_C, RATED_INLET_WB_C, p);
    let h_in = enthalpy(RATED_INLET_DB_C, w_in);
    let h_adp = enthalpy(t_adp, w_adp);
    if h_in <= h_adp {
        return Err(PsychroError::OutOfRange {
            what: "apparatus dew point above entering enthalpy",
        });
    }
    Ok((h_in - total_capacity / mdot - h_adp) / (h_in - h_adp))
}

/// Largest total capacity [W] that keeps the apparatus dew point above `MIN_ADP_C`.
pub fn capacity_limit(inlet: &AirState, mdot: f64, bypass_factor: f64) -> f64 {
    let p = inlet.pressure().value;
    let h_floor = enthalpy(MIN_ADP_C, saturation_humidity_ratio(MIN_ADP_C, p));
    (mdot * (inlet.enthalpy() - h_floor) * (1.0 - bypass_factor)).max(0.0)
}

/// SHR of a coil delivering `total_capacity` [W] to `mdot` [kg/s] of `inlet` air.
pub fn shr_from_bypass_factor(
    inlet: &AirState,
    total_capacity: f64,
    mdot: f64,
    bypass_factor: f64,
) -> PsychroResult<ShrEstimate> {
    if total_capacity <= 0.0 || mdot <= 0.0 {
        return Ok(ShrEstimate {
            shr: 1.0,
            dry: true,
        });
    }
    let p = inlet.pressure().value;
    let t_in = inlet.dry_bulb_c();
    let h_in = inlet.enthalpy();

    let h_adp = h_in - total_capacity / mdot / (1.0 - bypass_factor);
    let t_adp = saturation_temperature(h_adp, p)?;
    let w_adp = humidity_ratio_from_enthalpy(t_adp, h_adp);

    if inlet.humidity_ratio() <= w_adp {
        return Ok(ShrEstimate {
            shr: 1.0,
            dry: true,
        });
    }
    let shr = (enthalpy(t_in, w_adp) - h_adp) / (h_in - h_adp);
    Ok(ShrEstimate {
        shr: shr.clamp(0.0, 1.0),
        dry: false,
    })
}

/// Leaving air for a coil removing `total_capacity` [W] at sensible heat ratio `shr`.
///
/// A leaving state beyond saturation is moved back onto the saturation
/// curve at the same enthalpy, so the energy balance is kept.
pub fn leaving_state(
    inlet: &AirState,
    mdot: f64,
    total_capacity: f64,
    shr: f64,
) -> PsychroResult<LeavingAir> {
    if total_capacity <= 0.0 || mdot <= 0.0 {
        return Ok(LeavingAir {
            state: *inlet,
            saturated: false,
        });
    }
    let t_in = inlet.dry_bulb_c();
    let h_in = inlet.enthalpy();
    let dh = total_capacity / mdot;
    let h_out = h_in - dh;

    let w_out = if shr >= 1.0 {
        inlet.humidity_ratio()
    } else {
        humidity_ratio_from_enthalpy(t_in, h_in - (1.0 - shr) * dh).min(inlet.humidity_ratio())
    };
    onto_saturation(h_out, w_out, inlet.pressure())
}

/// Air state a fraction `fraction` of the way from `from` to `to`, in (h, W).
///
/// Mixing along a straight (h, W) line can cross the saturation curve when
/// both ends are near it; such a result is handled as in [`leaving_state`].
pub fn blend_states(from: &AirState, to: &AirState, fraction: f64) -> PsychroResult<LeavingAir> {
    let h = dx_core::lerp(from.enthalpy(), to.enthalpy(), fraction);
    let w = dx_core::lerp(from.humidity_ratio(), to.humidity_ratio(), fraction);
    onto_saturation(h, w, from.pressure())
}

fn onto_saturation(h: f64, w: f64, p: Pressure) -> PsychroResult<LeavingAir> {
    let t = dry_bulb_from_enthalpy(h, w);
    let t_sat = saturation_temperature(h, p.value)?;
    if t < t_sat {
        return Ok(LeavingAir {
            state: AirState::new(t_sat, humidity_ratio_from_enthalpy(t_sat, h), p)?,
            saturated: true,
        });
    }
    Ok(LeavingAir {
        state: AirState::new(t, w, p)?,
        saturated: false,
    })
}

/// Split the capacity between two states into sensible and latent parts.
///
/// Latent is floored at zero; a shortfall is carried by the sensible part.
pub fn split_capacity(inlet: &AirState, outlet: &AirState, mdot: f64) -> CapacitySplit {
    if mdot <= 0.0 {
        return CapacitySplit::ZERO;
    }
    let h_in = inlet.enthalpy();
    let h_out = outlet.enthalpy();
    let total = mdot * (h_in - h_out);
    let sensible = mdot * (enthalpy(inlet.dry_bulb_c(), outlet.humidity_ratio()) - h_out);
    let latent = total - sensible;
    if latent < 0.0 {
        return CapacitySplit {
            total,
            sensible: total,
            latent: 0.0,
        };
    }
    CapacitySplit {
        total,
        sensible,
        latent,
    }
}
