// dx-core/src/units.rs

use uom::si::f64::{
    Energy as UomEnergy, MassRate as UomMassRate, Power as UomPower, Pressure as UomPressure,
    Ratio as UomRatio, ThermodynamicTemperature as UomThermodynamicTemperature, Time as UomTime,
    Volume as UomVolume, VolumeRate as UomVolumeRate,
};

// Public canonical unit types (SI, f64)
pub type Energy = UomEnergy;
pub type MassRate = UomMassRate;
pub type Power = UomPower;
pub type Pressure = UomPressure;
pub type Ratio = UomRatio;
pub type Temperature = UomThermodynamicTemperature;
pub type Time = UomTime;
pub type Volume = UomVolume;
pub type VolumeRate = UomVolumeRate;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn degc(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::degree_celsius;
    Temperature::new::<degree_celsius>(v)
}

/// Read a thermodynamic temperature back in °C.
#[inline]
pub fn to_degc(t: Temperature) -> f64 {
    use uom::si::thermodynamic_temperature::degree_celsius;
    t.get::<degree_celsius>()
}

#[inline]
pub fn kgps(v: f64) -> MassRate {
    use uom::si::mass_rate::kilogram_per_second;
    MassRate::new::<kilogram_per_second>(v)
}

#[inline]
pub fn m3ps(v: f64) -> VolumeRate {
    use uom::si::volume_rate::cubic_meter_per_second;
    VolumeRate::new::<cubic_meter_per_second>(v)
}

#[inline]
pub fn w(v: f64) -> Power {
    use uom::si::power::watt;
    Power::new::<watt>(v)
}

#[inline]
pub fn j(v: f64) -> Energy {
    use uom::si::energy::joule;
    Energy::new::<joule>(v)
}

#[inline]
pub fn m3(v: f64) -> Volume {
    use uom::si::volume::cubic_meter;
    Volume::new::<cubic_meter>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

#[inline]
pub fn unitless(v: f64) -> Ratio {
    use uom::si::ratio::ratio;
    Ratio::new::<ratio>(v)
}

pub mod constants {
    use super::*;

    /// Standard atmospheric pressure at sea level.
    pub const STD_PRESSURE_PA: f64 = 101_325.0;

    /// Liquid water density used for condensate and evaporation volumes.
    pub const WATER_DENSITY_KG_M3: f64 = 1000.0;

    #[inline]
    pub fn std_pressure() -> Pressure {
        pa(STD_PRESSURE_PA)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _p = pa(101_325.0);
        let _mdot = kgps(1.2);
        let _q = m3ps(0.5);
        let _p_w = w(12_000.0);
        let _e = j(3.6e6);
        let _v = m3(0.001);
        let _dt = s(60.0);
        let _r = unitless(0.5);
        let _p0 = constants::std_pressure();
    }

    #[test]
    fn celsius_round_trip() {
        let t = degc(26.67);
        assert!((to_degc(t) - 26.67).abs() < 1e-9);
        assert!((t.value - 299.82).abs() < 1e-9);
    }
}
