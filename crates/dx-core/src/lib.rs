//! dx-core: shared foundation for the DX coil workspace.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + tolerances + float helpers)
//! - ids (typed arena indices for curves, modes and speeds)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

pub use error::{DxError, DxResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
