//! dx-psychro: moist-air psychrometrics for the DX coil model.
//!
//! Provides:
//! - Property functions of dry-bulb, humidity ratio and pressure (enthalpy,
//!   saturation pressure, wet-bulb, dew-point, density, ...)
//! - Iterative inversions (saturation temperature from enthalpy, wet-bulb,
//!   dew-point) built on a bracketed bisection
//! - `AirState`, a validated moist-air state used at every coil port
//!
//! Temperatures are in °C, humidity ratios in kg water / kg dry air,
//! pressures in Pa and enthalpies in J/kg dry air.
//!
//! # Example
//!
//! ```no_run
//! use dx_psychro::AirState;
//! use dx_core::units::pa;
//!
//! let air = AirState::from_tdb_twb(26.67, 19.44, pa(101_325.0)).unwrap();
//! println!("h = {:.0} J/kg", air.enthalpy());
//! ```

pub mod error;
pub mod moist_air;
pub mod solve;
pub mod state;

pub use error::{PsychroError, PsychroResult};
pub use solve::bisect;
pub use moist_air::*;
pub use state::AirState;
