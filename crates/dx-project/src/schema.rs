//! Project schema definitions.
//!
//! Quantities are plain SI numbers with the unit in the field name; objects
//! reference each other by name, compared case-insensitively.

use dx_coil::{PlrBounds, Schedule, SpeedControl};
use dx_curves::CurveKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectDef {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub curves: Vec<CurveDef>,
    #[serde(default)]
    pub schedules: Vec<ScheduleDef>,
    #[serde(default)]
    pub performances: Vec<PerformanceDef>,
    #[serde(default)]
    pub operating_modes: Vec<OperatingModeDef>,
    #[serde(default)]
    pub speeds: Vec<SpeedDef>,
    #[serde(default)]
    pub coils: Vec<CoilDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurveDef {
    pub name: String,
    pub kind: CurveKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_limits: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_limits: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_limits: Option<[f64; 2]>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleDef {
    pub name: String,
    pub schedule: Schedule,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerformanceDef {
    pub name: String,
    #[serde(default)]
    pub crankcase_heater_capacity_w: f64,
    #[serde(default = "default_max_crankcase_c")]
    pub max_outdoor_temp_crankcase_c: f64,
    #[serde(default = "default_min_compressor_c")]
    pub min_outdoor_temp_compressor_c: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode_schedule: Option<String>,
    #[serde(default)]
    pub plr_bounds: PlrBounds,
    /// Operating mode names, mode 1 first.
    pub modes: Vec<String>,
}

fn default_max_crankcase_c() -> f64 {
    10.0
}

fn default_min_compressor_c() -> f64 {
    -25.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OperatingModeDef {
    pub name: String,
    pub rated_total_capacity_w: f64,
    pub rated_evap_air_flow_m3s: f64,
    pub rated_shr: f64,
    #[serde(default)]
    pub rated_condenser_air_flow_m3s: f64,
    /// Defaults to the number of listed speeds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nominal_speed_count: Option<usize>,
    #[serde(default)]
    pub speed_control: SpeedControl,
    #[serde(default)]
    pub condenser: CondenserDef,
    /// Speed names, lowest capacity first.
    pub speeds: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "type")]
pub enum CondenserDef {
    #[default]
    AirCooled,
    Evaporative {
        #[serde(default)]
        pump_power_w: f64,
        effectiveness: f64,
        #[serde(default)]
        basin_heater_capacity_w: f64,
        #[serde(default = "default_basin_setpoint_c")]
        basin_heater_setpoint_c: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        basin_heater_schedule: Option<String>,
    },
}

fn default_basin_setpoint_c() -> f64 {
    2.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpeedDef {
    pub name: String,
    #[serde(default = "one")]
    pub total_capacity_fraction: f64,
    #[serde(default = "one")]
    pub evap_air_flow_fraction: f64,
    #[serde(default = "one")]
    pub condenser_air_flow_fraction: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rated_shr: Option<f64>,
    pub rated_cop: f64,
    #[serde(default = "one")]
    pub evap_condenser_pump_power_fraction: f64,
    #[serde(default)]
    pub condensate_reuse_fraction: f64,
    #[serde(default)]
    pub bypass: BypassDef,
    #[serde(default)]
    pub curves: SpeedCurvesDef,
    #[serde(default)]
    pub waste_heat_fraction: f64,
}

fn one() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "type")]
pub enum BypassDef {
    #[default]
    FromRatedShr,
    Rated {
        value: f64,
    },
    ApparatusDewPoint {
        temperature_c: f64,
        humidity_ratio: f64,
    },
}

/// Curve names per role; absent roles use a multiplier of 1.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SpeedCurvesDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap_ft: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap_ff: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eir_ft: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eir_ff: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plf: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shr_ft: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shr_ff: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waste_heat_ft: Option<String>,
}

impl SpeedCurvesDef {
    /// All referenced curve names with the role that uses them.
    pub fn references(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("cap_ft", &self.cap_ft),
            ("cap_ff", &self.cap_ff),
            ("eir_ft", &self.eir_ft),
            ("eir_ff", &self.eir_ff),
            ("plf", &self.plf),
            ("shr_ft", &self.shr_ft),
            ("shr_ff", &self.shr_ff),
            ("waste_heat_ft", &self.waste_heat_ft),
        ]
        .into_iter()
        .filter_map(|(role, name)| name.as_deref().map(|n| (role, n)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoilDef {
    pub name: String,
    pub performance: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_schedule: Option<String>,
}
