//! Moist-air state definition.

use crate::error::{PsychroError, PsychroResult};
use crate::moist_air;
use dx_core::units::{Pressure, Temperature};
use uom::si::pressure::pascal;
use uom::si::thermodynamic_temperature::degree_celsius;

/// Moist-air state: dry-bulb, humidity ratio and barometric pressure.
///
/// This is the minimal set of independent properties. Derived properties
/// (enthalpy, wet-bulb, density) are computed on demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirState {
    tdb: Temperature,
    w: f64,
    p: Pressure,
}

impl AirState {
    /// Create a state from dry-bulb [°C], humidity ratio [kg/kg] and pressure.
    pub fn new(tdb_c: f64, w: f64, p: Pressure) -> PsychroResult<Self> {
        if !tdb_c.is_finite() || tdb_c < -100.0 || tdb_c > 200.0 {
            return Err(PsychroError::NonPhysical {
                what: "dry-bulb temperature must be finite and within -100..200 °C",
            });
        }
        if !w.is_finite() || w < 0.0 {
            return Err(PsychroError::NonPhysical {
                what: "humidity ratio must be non-negative and finite",
            });
        }
        let pa = p.get::<pascal>();
        if !pa.is_finite() || pa <= 0.0 {
            return Err(PsychroError::NonPhysical {
                what: "pressure must be positive and finite",
            });
        }
        Ok(Self {
            tdb: Temperature::new::<degree_celsius>(tdb_c),
            w,
            p,
        })
    }

    /// Create a state from dry-bulb and wet-bulb temperatures [°C].
    pub fn from_tdb_twb(tdb_c: f64, twb_c: f64, p: Pressure) -> PsychroResult<Self> {
        if twb_c > tdb_c {
            return Err(PsychroError::NonPhysical {
                what: "wet-bulb above dry-bulb",
            });
        }
        Self::new(
            tdb_c,
            moist_air::humidity_ratio_from_wet_bulb(tdb_c, twb_c, p.get::<pascal>()),
            p,
        )
    }

    /// Create a state from dry-bulb [°C] and relative humidity (fraction).
    pub fn from_tdb_rh(tdb_c: f64, rh: f64, p: Pressure) -> PsychroResult<Self> {
        if !(0.0..=1.0).contains(&rh) {
            return Err(PsychroError::OutOfRange {
                what: "relative humidity",
            });
        }
        Self::new(
            tdb_c,
            moist_air::humidity_ratio_from_rh(tdb_c, rh, p.get::<pascal>()),
            p,
        )
    }

    /// Create a state from enthalpy [J/kg] and humidity ratio.
    pub fn from_enthalpy_w(h: f64, w: f64, p: Pressure) -> PsychroResult<Self> {
        Self::new(moist_air::dry_bulb_from_enthalpy(h, w), w, p)
    }

    pub fn dry_bulb(&self) -> Temperature {
        self.tdb
    }

    /// Dry-bulb in °C.
    pub fn dry_bulb_c(&self) -> f64 {
        self.tdb.get::<degree_celsius>()
    }

    pub fn humidity_ratio(&self) -> f64 {
        self.w
    }

    pub fn pressure(&self) -> Pressure {
        self.p
    }

    fn pa(&self) -> f64 {
        self.p.get::<pascal>()
    }

    /// Enthalpy [J/kg dry air].
    pub fn enthalpy(&self) -> f64 {
        moist_air::enthalpy(self.dry_bulb_c(), self.w)
    }

    /// Wet-bulb in °C.
    pub fn wet_bulb_c(&self) -> PsychroResult<f64> {
        moist_air::wet_bulb(self.dry_bulb_c(), self.w, self.pa())
    }

    /// Density [kg/m³].
    pub fn density(&self) -> f64 {
        moist_air::density(self.pa(), self.dry_bulb_c(), self.w)
    }

    pub fn relative_humidity(&self) -> f64 {
        moist_air::relative_humidity(self.dry_bulb_c(), self.w, self.pa())
    }

    /// Same pressure, new dry-bulb and humidity ratio.
    pub fn with_tdb_w(&self, tdb_c: f64, w: f64) -> PsychroResult<Self> {
        Self::new(tdb_c, w, self.p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dx_core::units::pa;

    #[test]
    fn create_valid_state() {
        let air = AirState::new(24.0, 0.009, pa(101_325.0)).unwrap();
        assert!((air.dry_bulb_c() - 24.0).abs() < 1e-9);
        assert_eq!(air.humidity_ratio(), 0.009);
        assert_eq!(air.pressure().get::<pascal>(), 101_325.0);
    }

    #[test]
    fn reject_negative_humidity_ratio() {
        assert!(AirState::new(24.0, -0.001, pa(101_325.0)).is_err());
    }

    #[test]
    fn reject_zero_pressure() {
        assert!(AirState::new(24.0, 0.009, pa(0.0)).is_err());
    }

    #[test]
    fn reject_wet_bulb_above_dry_bulb() {
        assert!(AirState::from_tdb_twb(20.0, 21.0, pa(101_325.0)).is_err());
    }

    #[test]
    fn wet_bulb_recovered() {
        let air = AirState::from_tdb_twb(28.0, 19.0, pa(101_325.0)).unwrap();
        assert!((air.wet_bulb_c().unwrap() - 19.0).abs() < 1e-5);
    }

    #[test]
    fn enthalpy_state_round_trip() {
        let air = AirState::new(30.0, 0.012, pa(101_325.0)).unwrap();
        let back = AirState::from_enthalpy_w(air.enthalpy(), 0.012, air.pressure()).unwrap();
        assert!((back.dry_bulb_c() - 30.0).abs() < 1e-9);
    }
}
