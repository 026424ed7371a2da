//! Speed selection as a pure function of policy, capacities and load.
//!
//! Nothing here touches curves, air states or runtime state: the engine
//! evaluates full-load capacities first and hands them in.

use crate::mode::SpeedControl;
use crate::performance::PlrBounds;
use dx_core::SpeedId;

/// Where in its speed range the coil runs for one timestep.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OperatingPoint {
    #[default]
    Off,
    /// On/off cycling at one speed with part-load ratio `plr`.
    Cycling { speed: SpeedId, plr: f64 },
    /// Continuous blend: `ratio` = 0 is all `lower`, 1 is all `upper`.
    Blend {
        lower: SpeedId,
        upper: SpeedId,
        ratio: f64,
    },
}

impl OperatingPoint {
    pub fn is_running(&self) -> bool {
        !matches!(self, OperatingPoint::Off)
    }
}

/// Outcome of speed selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub point: OperatingPoint,
    /// Load beyond the highest speed's full-load capacity [W], ≥ 0.
    pub unmet: f64,
}

impl Selection {
    pub const OFF: Selection = Selection {
        point: OperatingPoint::Off,
        unmet: 0.0,
    };
}

/// Choose an operating point for `load` given each speed's full-load capacity
/// at current conditions, lowest speed first.
///
/// Part-load ratio and speed ratio are clamped to `bounds`.
pub fn select_speed(policy: SpeedControl, capacities: &[f64], load: f64, bounds: PlrBounds) -> Selection {
    if !(load > 0.0) || capacities.is_empty() {
        return Selection::OFF;
    }
    let top = capacities.len() - 1;
    let sufficient = capacities.iter().position(|&cap| cap >= load);

    match policy {
        SpeedControl::Discrete | SpeedControl::Staged => match sufficient {
            Some(i) => cycling(i, load / capacities[i], bounds, 0.0),
            None => saturated_cycling(top, capacities[top], load, bounds),
        },
        SpeedControl::Continuous => match sufficient {
            Some(0) => cycling(0, load / capacities[0], bounds, 0.0),
            Some(i) => {
                let lo = capacities[i - 1];
                let hi = capacities[i];
                let ratio = if hi > lo { (load - lo) / (hi - lo) } else { 1.0 };
                Selection {
                    point: OperatingPoint::Blend {
                        lower: SpeedId::from_index(i - 1),
                        upper: SpeedId::from_index(i),
                        ratio: bounds.clamp(ratio),
                    },
                    unmet: 0.0,
                }
            }
            None if top == 0 => saturated_cycling(0, capacities[0], load, bounds),
            None => Selection {
                point: OperatingPoint::Blend {
                    lower: SpeedId::from_index(top - 1),
                    upper: SpeedId::from_index(top),
                    ratio: bounds.clamp(1.0),
                },
                unmet: (load - capacities[top].max(0.0)).max(0.0),
            },
        },
    }
}

fn cycling(index: usize, plr: f64, bounds: PlrBounds, unmet: f64) -> Selection {
    Selection {
        point: OperatingPoint::Cycling {
            speed: SpeedId::from_index(index),
            plr: bounds.clamp(plr),
        },
        unmet,
    }
}

fn saturated_cycling(index: usize, capacity: f64, load: f64, bounds: PlrBounds) -> Selection {
    if capacity <= 0.0 {
        return Selection {
            point: OperatingPoint::Off,
            unmet: load,
        };
    }
    cycling(index, 1.0, bounds, load - capacity)
}
