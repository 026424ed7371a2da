//! Performance record: the root of the mode/speed hierarchy of a coil.

use crate::error::{CoilError, CoilResult};
use crate::mode::{OperatingMode, OperatingModeSpec};
use dx_core::ModeId;
use dx_core::units::Power;
use dx_curves::CurveSet;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Allowed range of part-load ratio and speed ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlrBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for PlrBounds {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

impl PlrBounds {
    pub fn clamp(&self, v: f64) -> f64 {
        v.clamp(self.min, self.max)
    }
}

/// Input parameters for a performance record, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceSpec {
    pub name: String,
    pub crankcase_heater_capacity: Power,
    /// Crankcase heater runs below this outdoor dry-bulb [°C].
    pub max_outdoor_temp_crankcase_c: f64,
    /// Compressor is locked out below this outdoor dry-bulb [°C].
    pub min_outdoor_temp_compressor_c: f64,
    /// Schedule giving the active mode number; absent means always mode 1.
    pub mode_schedule: Option<String>,
    pub plr_bounds: PlrBounds,
    pub modes: Vec<OperatingModeSpec>,
}

/// How a mode schedule value resolved for one timestep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeResolution {
    Off,
    Active(ModeId),
    /// The value named a mode the record does not have; the coil is off.
    OutOfRange,
}

/// Validated, immutable performance record.
#[derive(Debug, Clone, PartialEq)]
pub struct Performance {
    name: String,
    crankcase_heater_capacity: Power,
    max_outdoor_temp_crankcase_c: f64,
    min_outdoor_temp_compressor_c: f64,
    mode_schedule: Option<String>,
    plr_bounds: PlrBounds,
    modes: Vec<OperatingMode>,
}

impl Performance {
    /// Validate `spec` and resolve it against `curves`.
    pub fn build(spec: PerformanceSpec, curves: &CurveSet) -> CoilResult<Self> {
        let name = spec.name.to_uppercase();
        let invalid = |what| CoilError::InvalidRecord {
            name: name.clone(),
            what,
        };

        if name.trim().is_empty() {
            return Err(invalid("performance name must not be empty"));
        }
        if spec.modes.is_empty() {
            return Err(invalid("at least one operating mode is required"));
        }
        if !(spec.crankcase_heater_capacity.value >= 0.0 && spec.crankcase_heater_capacity.value.is_finite()) {
            return Err(invalid("crankcase heater capacity must be non-negative"));
        }
        if !spec.max_outdoor_temp_crankcase_c.is_finite() || !spec.min_outdoor_temp_compressor_c.is_finite() {
            return Err(invalid("outdoor temperature limits must be finite"));
        }
        let bounds = spec.plr_bounds;
        if !(bounds.min >= 0.0 && bounds.max <= 1.0 && bounds.min < bounds.max) {
            return Err(invalid("part-load ratio bounds must satisfy 0 <= min < max <= 1"));
        }

        let mut seen = HashSet::new();
        let mut modes = Vec::with_capacity(spec.modes.len());
        for mode_spec in spec.modes {
            let mode = OperatingMode::build(mode_spec, curves)?;
            if !seen.insert(mode.name().to_string()) {
                return Err(CoilError::DuplicateName {
                    name: mode.name().to_string(),
                    context: format!("performance {name}"),
                });
            }
            modes.push(mode);
        }

        tracing::debug!(performance = %name, modes = modes.len(), "performance record built");

        Ok(Self {
            name,
            crankcase_heater_capacity: spec.crankcase_heater_capacity,
            max_outdoor_temp_crankcase_c: spec.max_outdoor_temp_crankcase_c,
            min_outdoor_temp_compressor_c: spec.min_outdoor_temp_compressor_c,
            mode_schedule: spec.mode_schedule.map(|s| s.to_uppercase()),
            plr_bounds: bounds,
            modes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn crankcase_heater_capacity(&self) -> Power {
        self.crankcase_heater_capacity
    }

    pub fn max_outdoor_temp_crankcase_c(&self) -> f64 {
        self.max_outdoor_temp_crankcase_c
    }

    pub fn min_outdoor_temp_compressor_c(&self) -> f64 {
        self.min_outdoor_temp_compressor_c
    }

    pub fn mode_schedule(&self) -> Option<&str> {
        self.mode_schedule.as_deref()
    }

    pub fn plr_bounds(&self) -> PlrBounds {
        self.plr_bounds
    }

    pub fn mode_count(&self) -> usize {
        self.modes.len()
    }

    pub fn mode(&self, id: ModeId) -> &OperatingMode {
        &self.modes[id.index()]
    }

    pub fn modes(&self) -> impl Iterator<Item = (ModeId, &OperatingMode)> {
        self.modes
            .iter()
            .enumerate()
            .map(|(i, m)| (ModeId::from_index(i), m))
    }

    /// Case-insensitive lookup of a mode by name.
    pub fn mode_id(&self, name: &str) -> Option<ModeId> {
        let key = name.to_uppercase();
        self.modes
            .iter()
            .position(|m| m.name() == key)
            .map(ModeId::from_index)
    }

    /// Resolve a mode schedule value: ≤ 0 is off, otherwise the rounded
    /// 1-based mode number.
    pub fn resolve_mode(&self, value: f64) -> CoilResult<ModeResolution> {
        if !value.is_finite() {
            return Err(CoilError::InvalidArg {
                what: "mode schedule value must be finite",
            });
        }
        let number = value.round();
        if number <= 0.0 {
            return Ok(ModeResolution::Off);
        }
        if number > self.modes.len() as f64 {
            return Ok(ModeResolution::OutOfRange);
        }
        Ok(ModeResolution::Active(ModeId::from_index(number as usize - 1)))
    }
}
