//! Many independent coils stepped together.

use crate::coil::Coil;
use crate::engine::{CoilInputs, TimestepOutput};
use crate::error::{CoilError, CoilResult};
use crate::schedule::ScheduleValues;
use rayon::prelude::*;
use std::collections::HashMap;

/// A set of coils, each with its own runtime state.
///
/// Coils never share mutable state, so a timestep for all of them can run
/// in parallel.
#[derive(Debug, Default)]
pub struct CoilBank {
    coils: Vec<Coil>,
    by_name: HashMap<String, usize>,
}

impl CoilBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, coil: Coil) -> CoilResult<()> {
        if self.by_name.contains_key(coil.name()) {
            return Err(CoilError::DuplicateName {
                name: coil.name().to_string(),
                context: "coil bank".into(),
            });
        }
        self.by_name.insert(coil.name().to_string(), self.coils.len());
        self.coils.push(coil);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.coils.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coils.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.coils.iter().map(|c| c.name())
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> CoilResult<&Coil> {
        let idx = self.index_of(name)?;
        Ok(&self.coils[idx])
    }

    pub fn get_mut(&mut self, name: &str) -> CoilResult<&mut Coil> {
        let idx = self.index_of(name)?;
        Ok(&mut self.coils[idx])
    }

    /// Step a single coil by name.
    pub fn simulate(
        &mut self,
        name: &str,
        inputs: &CoilInputs,
        schedules: ScheduleValues,
    ) -> CoilResult<TimestepOutput> {
        self.get_mut(name)?.simulate(inputs, schedules)
    }

    /// Step every coil in insertion order, in parallel.
    ///
    /// `inputs[i]` and `schedules[i]` drive the i-th coil. A failing coil
    /// does not stop the others.
    pub fn simulate_all(
        &mut self,
        inputs: &[CoilInputs],
        schedules: &[ScheduleValues],
    ) -> CoilResult<Vec<CoilResult<TimestepOutput>>> {
        if inputs.len() != self.coils.len() || schedules.len() != self.coils.len() {
            return Err(CoilError::InvalidArg {
                what: "one input and one schedule set per coil required",
            });
        }
        Ok(self
            .coils
            .par_iter_mut()
            .zip(inputs.par_iter())
            .zip(schedules.par_iter())
            .map(|((coil, input), sched)| coil.simulate(input, *sched))
            .collect())
    }

    fn index_of(&self, name: &str) -> CoilResult<usize> {
        self.by_name
            .get(&name.to_uppercase())
            .copied()
            .ok_or_else(|| CoilError::UnknownCoil {
                name: name.to_string(),
            })
    }
}
