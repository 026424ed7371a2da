//! A coil instance: shared read-only records plus its own runtime state.

use crate::engine::{self, CoilInputs, TimestepOutput};
use crate::error::CoilResult;
use crate::performance::{ModeResolution, Performance};
use crate::schedule::{ScheduleLookup, ScheduleValues};
use crate::state::CoilRuntimeState;
use dx_core::ModeId;
use dx_core::units::Time;
use dx_curves::CurveSet;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Coil {
    name: String,
    performance: Arc<Performance>,
    curves: Arc<CurveSet>,
    availability_schedule: Option<String>,
    state: CoilRuntimeState,
}

impl Coil {
    pub fn new(name: impl Into<String>, performance: Arc<Performance>, curves: Arc<CurveSet>) -> Self {
        Self {
            name: name.into().to_uppercase(),
            performance,
            curves,
            availability_schedule: None,
            state: CoilRuntimeState::new(),
        }
    }

    /// Gate operation on a named availability schedule.
    pub fn with_availability_schedule(mut self, schedule: impl Into<String>) -> Self {
        self.availability_schedule = Some(schedule.into().to_uppercase());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn performance(&self) -> &Performance {
        &self.performance
    }

    pub fn curves(&self) -> &CurveSet {
        &self.curves
    }

    pub fn availability_schedule(&self) -> Option<&str> {
        self.availability_schedule.as_deref()
    }

    pub fn state(&self) -> &CoilRuntimeState {
        &self.state
    }

    /// Drop all accumulated runtime state.
    pub fn reset(&mut self) {
        self.state = CoilRuntimeState::new();
    }

    /// Run one timestep with resolved schedule values.
    pub fn simulate(&mut self, inputs: &CoilInputs, schedules: ScheduleValues) -> CoilResult<TimestepOutput> {
        engine::simulate(&self.curves, &self.performance, &mut self.state, inputs, schedules)
    }

    /// Run one timestep at time `t`, reading schedules through `lookup`.
    pub fn simulate_at(
        &mut self,
        inputs: &CoilInputs,
        lookup: &dyn ScheduleLookup,
        t: Time,
    ) -> CoilResult<TimestepOutput> {
        let schedules = self.resolve_schedules(lookup, t)?;
        self.simulate(inputs, schedules)
    }

    /// Resolve the mode, availability and basin heater schedules at `t`.
    pub fn resolve_schedules(&self, lookup: &dyn ScheduleLookup, t: Time) -> CoilResult<ScheduleValues> {
        let mode = match self.performance.mode_schedule() {
            Some(name) => lookup.value(name, t)?,
            None => 1.0,
        };
        self.resolve_schedules_in_mode(lookup, t, mode)
    }

    /// Resolve availability and basin heater schedules at `t` for a given
    /// mode schedule value, bypassing the performance's mode schedule.
    pub fn resolve_schedules_in_mode(
        &self,
        lookup: &dyn ScheduleLookup,
        t: Time,
        mode: f64,
    ) -> CoilResult<ScheduleValues> {
        let perf = &self.performance;
        let availability = match &self.availability_schedule {
            Some(name) => lookup.value(name, t)?,
            None => 1.0,
        };

        let basin_mode = match perf.resolve_mode(mode)? {
            ModeResolution::Active(id) => id,
            ModeResolution::Off | ModeResolution::OutOfRange => ModeId::from_index(0),
        };
        let basin_schedule = perf
            .mode(basin_mode)
            .condenser()
            .evaporative()
            .and_then(|evap| evap.basin_heater_schedule.as_deref());
        let basin_heater = match basin_schedule {
            Some(name) => lookup.value(name, t)?,
            None => 1.0,
        };

        Ok(ScheduleValues {
            mode,
            availability,
            basin_heater,
        })
    }
}
