//! dx-coil: curve-driven DX cooling coil performance model.
//!
//! Provides:
//! - Performance / OperatingMode / Speed records, validated once and read-only
//!   afterwards
//! - Speed selection for discrete, staged and continuous control
//! - Bypass-factor sensible/latent split and coil leaving air
//! - Condenser and water model (evaporative pre-cooling, pump, basin heater,
//!   make-up water, condensate)
//! - `Coil`, which owns one `CoilRuntimeState`, and `CoilBank` for stepping
//!   many coils in parallel
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use dx_coil::*;
//! use dx_core::units::{kgps, m3ps, pa, s, w};
//! use dx_curves::CurveSet;
//! use dx_psychro::AirState;
//!
//! let curves = Arc::new(CurveSet::new());
//! let perf = Performance::build(
//!     PerformanceSpec {
//!         name: "ThisPerformance".into(),
//!         crankcase_heater_capacity: w(0.0),
//!         max_outdoor_temp_crankcase_c: 10.0,
//!         min_outdoor_temp_compressor_c: -25.0,
//!         mode_schedule: None,
//!         plr_bounds: PlrBounds::default(),
//!         modes: vec![OperatingModeSpec {
//!             name: "OperatingMode1Name".into(),
//!             rated_total_capacity: w(12_000.0),
//!             rated_evap_air_flow: m3ps(1.0),
//!             rated_shr: 0.9,
//!             rated_condenser_air_flow: m3ps(2.0),
//!             nominal_speed_count: 1,
//!             speed_control: SpeedControl::Continuous,
//!             condenser: CondenserType::AirCooled,
//!             speeds: vec![SpeedSpec::new("Speed1", 3.0)],
//!         }],
//!     },
//!     &curves,
//! )
//! .unwrap();
//!
//! let mut coil = Coil::new("Cooling Coil", Arc::new(perf), curves);
//! let p = pa(101_325.0);
//! let out = coil
//!     .simulate(
//!         &CoilInputs {
//!             entering_air: AirState::from_tdb_twb(28.0, 19.0, p).unwrap(),
//!             condenser_entering_air: AirState::from_tdb_twb(35.0, 24.0, p).unwrap(),
//!             requested_sensible_load: w(6_000.0),
//!             requested_latent_load: None,
//!             supply_air_mass_flow: kgps(1.2),
//!             timestep: s(600.0),
//!         },
//!         ScheduleValues::default(),
//!     )
//!     .unwrap();
//! println!("PLR = {:.3}, power = {:.0} W", out.part_load_ratio, out.total_power.value);
//! ```

pub mod bank;
pub mod coil;
pub mod condenser;
pub mod engine;
pub mod error;
pub mod mode;
pub mod performance;
pub mod schedule;
pub mod selection;
pub mod speed;
pub mod split;
pub mod state;

pub use bank::CoilBank;
pub use coil::Coil;
pub use engine::{CoilInputs, Diagnostics, TimestepOutput, evaluate, simulate};
pub use error::{CoilError, CoilResult};
pub use mode::{CondenserType, EvaporativeCondenser, OperatingMode, OperatingModeSpec, SpeedControl};
pub use performance::{ModeResolution, Performance, PerformanceSpec, PlrBounds};
pub use schedule::{Schedule, ScheduleLookup, ScheduleTable, ScheduleValues};
pub use selection::{OperatingPoint, Selection, select_speed};
pub use speed::{BypassFactorInput, CurveRole, Speed, SpeedCurves, SpeedRating, SpeedSpec};
pub use state::CoilRuntimeState;
