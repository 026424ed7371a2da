//! Operating mode record: an ordered group of speeds sharing a condenser.

use crate::error::{CoilError, CoilResult};
use crate::speed::{ModeRating, Speed, SpeedSpec};
use dx_core::SpeedId;
use dx_core::units::{Power, VolumeRate};
use dx_curves::CurveSet;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How the engine moves between speeds of a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpeedControl {
    /// On/off cycling at the lowest sufficient speed, with cycling losses.
    #[default]
    Discrete,
    /// Same speed choice as `Discrete`; runtime is the part-load ratio.
    Staged,
    /// Linear blend of the two speeds bracketing the load.
    Continuous,
}

/// Evaporative condenser sizing and basin heater.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaporativeCondenser {
    /// Nominal pump power.
    pub pump_power: Power,
    /// Wet-bulb effectiveness in [0, 1].
    pub effectiveness: f64,
    pub basin_heater_capacity: Power,
    /// Basin heater runs below this outdoor dry-bulb [°C].
    pub basin_heater_setpoint_c: f64,
    /// Basin heater availability schedule; absent means always available.
    pub basin_heater_schedule: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum CondenserType {
    #[default]
    AirCooled,
    Evaporative(EvaporativeCondenser),
}

impl CondenserType {
    pub fn evaporative(&self) -> Option<&EvaporativeCondenser> {
        match self {
            CondenserType::AirCooled => None,
            CondenserType::Evaporative(evap) => Some(evap),
        }
    }
}

/// Input parameters for one operating mode, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatingModeSpec {
    pub name: String,
    pub rated_total_capacity: Power,
    pub rated_evap_air_flow: VolumeRate,
    pub rated_shr: f64,
    pub rated_condenser_air_flow: VolumeRate,
    pub nominal_speed_count: usize,
    pub speed_control: SpeedControl,
    pub condenser: CondenserType,
    pub speeds: Vec<SpeedSpec>,
}

/// Validated operating mode. Speeds are addressed by `SpeedId`.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatingMode {
    name: String,
    rated_total_capacity: Power,
    rated_evap_air_flow: VolumeRate,
    rated_shr: f64,
    rated_condenser_air_flow: VolumeRate,
    speed_control: SpeedControl,
    condenser: CondenserType,
    speeds: Vec<Speed>,
}

impl OperatingMode {
    pub(crate) fn build(spec: OperatingModeSpec, curves: &CurveSet) -> CoilResult<Self> {
        let name = spec.name.to_uppercase();
        let invalid = |what| CoilError::InvalidRecord {
            name: name.clone(),
            what,
        };

        if name.trim().is_empty() {
            return Err(invalid("mode name must not be empty"));
        }
        if spec.nominal_speed_count == 0 {
            return Err(invalid("nominal speed count must be at least 1"));
        }
        if spec.speeds.len() != spec.nominal_speed_count {
            return Err(invalid("number of speeds differs from nominal speed count"));
        }
        if !(spec.rated_total_capacity.value > 0.0 && spec.rated_total_capacity.value.is_finite()) {
            return Err(invalid("rated total capacity must be positive"));
        }
        if !(spec.rated_evap_air_flow.value > 0.0 && spec.rated_evap_air_flow.value.is_finite()) {
            return Err(invalid("rated evaporator air flow must be positive"));
        }
        if !(spec.rated_shr > 0.0 && spec.rated_shr <= 1.0) {
            return Err(invalid("rated SHR must be in (0, 1]"));
        }
        if !(spec.rated_condenser_air_flow.value >= 0.0 && spec.rated_condenser_air_flow.value.is_finite()) {
            return Err(invalid("rated condenser air flow must be non-negative"));
        }
        if let CondenserType::Evaporative(evap) = &spec.condenser {
            if !(0.0..=1.0).contains(&evap.effectiveness) {
                return Err(invalid("evaporative condenser effectiveness must be in [0, 1]"));
            }
            if !(evap.pump_power.value >= 0.0) {
                return Err(invalid("evaporative condenser pump power must be non-negative"));
            }
            if !(evap.basin_heater_capacity.value >= 0.0) {
                return Err(invalid("basin heater capacity must be non-negative"));
            }
            if !evap.basin_heater_setpoint_c.is_finite() {
                return Err(invalid("basin heater setpoint must be finite"));
            }
        }

        let rating = ModeRating {
            name: &name,
            total_capacity: spec.rated_total_capacity,
            evap_air_flow: spec.rated_evap_air_flow,
            shr: spec.rated_shr,
        };

        let mut seen = HashSet::new();
        let mut speeds = Vec::with_capacity(spec.speeds.len());
        for speed_spec in spec.speeds {
            let speed = Speed::build(speed_spec, rating, curves)?;
            if !seen.insert(speed.name().to_string()) {
                return Err(CoilError::DuplicateName {
                    name: speed.name().to_string(),
                    context: format!("mode {name}"),
                });
            }
            speeds.push(speed);
        }

        // Speed 1 is the smallest; selection walks upward from it.
        for pair in speeds.windows(2) {
            if pair[1].rated_total_capacity().value < pair[0].rated_total_capacity().value {
                return Err(CoilError::NonMonotonicSpeeds {
                    mode: name.clone(),
                    speed: pair[1].name().to_string(),
                });
            }
        }

        Ok(Self {
            name,
            rated_total_capacity: spec.rated_total_capacity,
            rated_evap_air_flow: spec.rated_evap_air_flow,
            rated_shr: spec.rated_shr,
            rated_condenser_air_flow: spec.rated_condenser_air_flow,
            speed_control: spec.speed_control,
            condenser: spec.condenser,
            speeds,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rated_total_capacity(&self) -> Power {
        self.rated_total_capacity
    }

    pub fn rated_evap_air_flow(&self) -> VolumeRate {
        self.rated_evap_air_flow
    }

    pub fn rated_shr(&self) -> f64 {
        self.rated_shr
    }

    pub fn rated_condenser_air_flow(&self) -> VolumeRate {
        self.rated_condenser_air_flow
    }

    pub fn speed_control(&self) -> SpeedControl {
        self.speed_control
    }

    pub fn condenser(&self) -> &CondenserType {
        &self.condenser
    }

    pub fn speed_count(&self) -> usize {
        self.speeds.len()
    }

    pub fn speed(&self, id: SpeedId) -> &Speed {
        &self.speeds[id.index()]
    }

    pub fn speeds(&self) -> impl Iterator<Item = (SpeedId, &Speed)> {
        self.speeds
            .iter()
            .enumerate()
            .map(|(i, s)| (SpeedId::from_index(i), s))
    }
}
