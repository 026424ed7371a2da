//! dx-curves: empirical performance curves for equipment models.
//!
//! A curve is a tagged variant (`CurveKind`) holding its coefficient payload,
//! plus the valid domain of each independent variable. All kinds share one
//! evaluation path through `CurveSet::evaluate`, which clamps inputs to the
//! declared domain, records that the clamp happened and never fails on
//! out-of-range input.
//!
//! # Example
//!
//! ```no_run
//! use dx_curves::{Curve, CurveKind, CurveSet};
//!
//! let mut set = CurveSet::new();
//! let id = set
//!     .add(Curve::new("PLF", CurveKind::Quadratic { c: [0.85, 0.15, 0.0] }).with_x_limits(0.0, 1.0))
//!     .unwrap();
//! let plf = set.evaluate(id, &[0.5]).unwrap();
//! assert!((plf.value - 0.925).abs() < 1e-12);
//! ```

pub mod curve;
pub mod error;
pub mod kind;
pub mod set;

pub use curve::{Curve, Domain};
pub use error::{CurveError, CurveResult};
pub use kind::CurveKind;
pub use set::{CurveSet, CurveValue};
