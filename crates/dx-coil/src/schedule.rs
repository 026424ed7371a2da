//! Schedule values as an injected, read-only capability.
//!
//! The coil never owns a schedule store. Callers either pass resolved values
//! per timestep (`ScheduleValues`) or hand in a `ScheduleLookup` that maps a
//! schedule name and time to a value.

use crate::error::{CoilError, CoilResult};
use dx_core::units::Time;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uom::si::time::second;

/// Resolved schedule values for one timestep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleValues {
    /// Operating mode number (1-based); ≤ 0 means off.
    pub mode: f64,
    /// Coil availability; ≤ 0 means unavailable.
    pub availability: f64,
    /// Basin heater availability; ≤ 0 means unavailable.
    pub basin_heater: f64,
}

impl Default for ScheduleValues {
    fn default() -> Self {
        Self {
            mode: 1.0,
            availability: 1.0,
            basin_heater: 1.0,
        }
    }
}

impl ScheduleValues {
    /// Run in operating mode `mode` (1-based) with everything else available.
    pub fn mode(mode: usize) -> Self {
        Self {
            mode: mode as f64,
            ..Self::default()
        }
    }
}

/// Read-only schedule capability.
pub trait ScheduleLookup: Send + Sync {
    /// Value of schedule `name` at simulation time `t`.
    fn value(&self, name: &str, t: Time) -> CoilResult<f64>;
}

/// A single schedule definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Schedule {
    /// Same value at every time.
    Constant { value: f64 },
    /// One value per hour of the day, repeated daily.
    Hourly { values: Vec<f64> },
}

impl Schedule {
    pub fn value_at(&self, t: Time) -> f64 {
        match self {
            Schedule::Constant { value } => *value,
            Schedule::Hourly { values } => {
                if values.is_empty() {
                    return 0.0;
                }
                let hour = (t.get::<second>() / 3600.0).floor().rem_euclid(24.0) as usize;
                values[hour.min(values.len() - 1)]
            }
        }
    }

    pub fn validate(&self) -> CoilResult<()> {
        match self {
            Schedule::Constant { value } if !value.is_finite() => Err(CoilError::InvalidArg {
                what: "constant schedule value must be finite",
            }),
            Schedule::Hourly { values } if values.len() != 24 => Err(CoilError::InvalidArg {
                what: "hourly schedule needs 24 values",
            }),
            Schedule::Hourly { values } if values.iter().any(|v| !v.is_finite()) => {
                Err(CoilError::InvalidArg {
                    what: "hourly schedule values must be finite",
                })
            }
            _ => Ok(()),
        }
    }
}

/// Named schedules, looked up case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct ScheduleTable {
    schedules: HashMap<String, Schedule>,
}

impl ScheduleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, schedule: Schedule) -> CoilResult<()> {
        schedule.validate()?;
        let key = name.to_uppercase();
        if self.schedules.contains_key(&key) {
            return Err(CoilError::DuplicateName {
                name: key,
                context: "schedules".to_string(),
            });
        }
        self.schedules.insert(key, schedule);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schedules.contains_key(&name.to_uppercase())
    }
}

impl ScheduleLookup for ScheduleTable {
    fn value(&self, name: &str, t: Time) -> CoilResult<f64> {
        self.schedules
            .get(&name.to_uppercase())
            .map(|s| s.value_at(t))
            .ok_or_else(|| CoilError::UnknownSchedule {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dx_core::units::s;

    #[test]
    fn hourly_profile_wraps_daily() {
        let mut values = vec![0.0; 24];
        values[13] = 2.0;
        let sched = Schedule::Hourly { values };
        assert_eq!(sched.value_at(s(13.5 * 3600.0)), 2.0);
        assert_eq!(sched.value_at(s((24.0 + 13.0) * 3600.0)), 2.0);
        assert_eq!(sched.value_at(s(12.0 * 3600.0)), 0.0);
    }

    #[test]
    fn table_lookup_is_case_insensitive() {
        let mut table = ScheduleTable::new();
        table
            .insert("OperatingModeScheduleName", Schedule::Constant { value: 1.0 })
            .unwrap();
        assert_eq!(table.value("operatingmodeschedulename", s(0.0)).unwrap(), 1.0);
        assert!(matches!(
            table.value("missing", s(0.0)),
            Err(CoilError::UnknownSchedule { .. })
        ));
    }

    #[test]
    fn short_hourly_profile_rejected() {
        let mut table = ScheduleTable::new();
        let err = table
            .insert("x", Schedule::Hourly { values: vec![1.0; 3] })
            .unwrap_err();
        assert!(matches!(err, CoilError::InvalidArg { .. }));
    }
}
