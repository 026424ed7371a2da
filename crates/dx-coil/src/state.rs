//! Mutable per-coil runtime state.

use crate::engine::TimestepOutput;
use crate::selection::OperatingPoint;
use dx_core::ModeId;
use dx_core::units::{Energy, Volume, j, m3};

/// Runtime state of one coil. Only the engine writes it, once per
/// successful timestep.
#[derive(Debug, Clone, PartialEq)]
pub struct CoilRuntimeState {
    active_mode: Option<ModeId>,
    operating_point: OperatingPoint,
    part_load_ratio: f64,
    runtime_fraction: f64,
    speed_ratio: f64,
    was_running: bool,
    on_cycles: u64,
    condensate: f64,
    evaporative_water: f64,
    basin_heater_energy: f64,
    crankcase_heater_energy: f64,
    electric_energy: f64,
    timesteps: u64,
}

impl CoilRuntimeState {
    /// All-off state for the start of a run.
    pub fn new() -> Self {
        Self {
            active_mode: None,
            operating_point: OperatingPoint::Off,
            part_load_ratio: 0.0,
            runtime_fraction: 0.0,
            speed_ratio: 0.0,
            was_running: false,
            on_cycles: 0,
            condensate: 0.0,
            evaporative_water: 0.0,
            basin_heater_energy: 0.0,
            crankcase_heater_energy: 0.0,
            electric_energy: 0.0,
            timesteps: 0,
        }
    }

    pub(crate) fn commit(&mut self, out: &TimestepOutput, dt: f64) {
        let running = out.operating_point.is_running();
        if running && !self.was_running {
            self.on_cycles += 1;
        }
        self.active_mode = out.mode;
        self.operating_point = out.operating_point;
        self.part_load_ratio = out.part_load_ratio;
        self.runtime_fraction = out.runtime_fraction;
        self.speed_ratio = out.speed_ratio;
        self.was_running = running;

        self.condensate += out.condensate_collected.value;
        self.evaporative_water += out.water_consumption.value;
        self.basin_heater_energy += out.basin_heater_power.value * dt;
        self.crankcase_heater_energy += out.crankcase_heater_power.value * dt;
        self.electric_energy += out.total_power.value * dt;
        self.timesteps += 1;
    }

    pub fn active_mode(&self) -> Option<ModeId> {
        self.active_mode
    }

    pub fn operating_point(&self) -> OperatingPoint {
        self.operating_point
    }

    pub fn part_load_ratio(&self) -> f64 {
        self.part_load_ratio
    }

    pub fn runtime_fraction(&self) -> f64 {
        self.runtime_fraction
    }

    pub fn speed_ratio(&self) -> f64 {
        self.speed_ratio
    }

    pub fn is_running(&self) -> bool {
        self.was_running
    }

    /// Number of off-to-on transitions since the start of the run.
    pub fn on_cycles(&self) -> u64 {
        self.on_cycles
    }

    /// Cumulative condensate collected.
    pub fn condensate_volume(&self) -> Volume {
        m3(self.condensate)
    }

    /// Cumulative evaporative condenser make-up water.
    pub fn evaporative_water_volume(&self) -> Volume {
        m3(self.evaporative_water)
    }

    pub fn basin_heater_energy(&self) -> Energy {
        j(self.basin_heater_energy)
    }

    pub fn crankcase_heater_energy(&self) -> Energy {
        j(self.crankcase_heater_energy)
    }

    /// Cumulative compressor, fan and pump electric energy.
    pub fn electric_energy(&self) -> Energy {
        j(self.electric_energy)
    }

    pub fn timesteps(&self) -> u64 {
        self.timesteps
    }
}

impl Default for CoilRuntimeState {
    fn default() -> Self {
        Self::new()
    }
}
