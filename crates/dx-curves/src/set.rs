//! Curve arena with name lookup and out-of-range bookkeeping.

use crate::curve::Curve;
use crate::error::{CurveError, CurveResult};
use dx_core::CurveId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Result of one curve evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveValue {
    pub value: f64,
    /// At least one input was outside the curve's declared domain.
    pub clamped: bool,
}

impl CurveValue {
    /// Multiplier used when a curve reference is absent.
    pub const IDENTITY: CurveValue = CurveValue {
        value: 1.0,
        clamped: false,
    };
}

/// Loaded curves, addressed by `CurveId`.
///
/// The set is read-only once built and may be shared across threads; the
/// out-of-range counters are atomics so evaluation only needs `&self`.
#[derive(Debug, Default)]
pub struct CurveSet {
    curves: Vec<Curve>,
    by_name: HashMap<String, CurveId>,
    out_of_range: Vec<AtomicU64>,
}

impl CurveSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and insert a curve.
    pub fn add(&mut self, curve: Curve) -> CurveResult<CurveId> {
        curve.validate()?;
        if self.by_name.contains_key(curve.name()) {
            return Err(CurveError::DuplicateName {
                name: curve.name().to_string(),
            });
        }
        let id = CurveId::from_index(self.curves.len());
        self.by_name.insert(curve.name().to_string(), id);
        self.curves.push(curve);
        self.out_of_range.push(AtomicU64::new(0));
        Ok(id)
    }

    /// Resolve a curve name (case-insensitive).
    pub fn id_of(&self, name: &str) -> CurveResult<CurveId> {
        self.by_name
            .get(&name.to_uppercase())
            .copied()
            .ok_or_else(|| CurveError::UnknownCurve {
                name: name.to_string(),
            })
    }

    pub fn get(&self, id: CurveId) -> CurveResult<&Curve> {
        self.curves
            .get(id.index())
            .ok_or_else(|| CurveError::UnknownCurve {
                name: format!("{id:?}"),
            })
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CurveId, &Curve)> {
        self.curves
            .iter()
            .enumerate()
            .map(|(i, c)| (CurveId::from_index(i), c))
    }

    /// Evaluate a curve at `inputs`, clamping to its domain.
    ///
    /// Fails only when the id does not resolve, the input count does not
    /// match the curve's arity, or an input is not finite.
    pub fn evaluate(&self, id: CurveId, inputs: &[f64]) -> CurveResult<CurveValue> {
        let curve = self.get(id)?;
        let (value, clamped) = curve.eval_clamped(inputs)?;
        if clamped {
            let previous = self.out_of_range[id.index()].fetch_add(1, Ordering::Relaxed);
            if previous == 0 {
                tracing::warn!(
                    curve = curve.name(),
                    ?inputs,
                    "curve input outside declared domain; clamped"
                );
            }
        }
        Ok(CurveValue { value, clamped })
    }

    /// Evaluate an optional curve reference; absence yields the identity multiplier.
    pub fn modifier(&self, id: Option<CurveId>, inputs: &[f64]) -> CurveResult<CurveValue> {
        match id {
            Some(id) => self.evaluate(id, inputs),
            None => Ok(CurveValue::IDENTITY),
        }
    }

    /// Check that a curve exists and takes `arity` independent variables.
    pub fn expect_arity(&self, id: CurveId, arity: usize) -> CurveResult<()> {
        let curve = self.get(id)?;
        if curve.arity() != arity {
            return Err(CurveError::ArityMismatch {
                name: curve.name().to_string(),
                expected: arity,
                got: curve.arity(),
            });
        }
        Ok(())
    }

    /// Number of evaluations of `id` that clamped an input.
    pub fn out_of_range_count(&self, id: CurveId) -> u64 {
        self.out_of_range
            .get(id.index())
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Curves with a non-zero out-of-range count, for end-of-run reporting.
    pub fn out_of_range_summary(&self) -> Vec<(&str, u64)> {
        self.iter()
            .filter_map(|(id, c)| {
                let n = self.out_of_range_count(id);
                (n > 0).then_some((c.name(), n))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::CurveKind;

    fn plf_set() -> (CurveSet, CurveId) {
        let mut set = CurveSet::new();
        let id = set
            .add(
                Curve::new("PLFCurveName", CurveKind::Quadratic { c: [0.85, 0.15, 0.0] })
                    .with_x_limits(0.0, 1.0),
            )
            .unwrap();
        (set, id)
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let (set, id) = plf_set();
        assert_eq!(set.id_of("plfcurvename").unwrap(), id);
        assert!(matches!(
            set.id_of("missing"),
            Err(CurveError::UnknownCurve { .. })
        ));
    }

    #[test]
    fn duplicate_names_rejected() {
        let (mut set, _) = plf_set();
        let err = set
            .add(Curve::new("plfcurvename", CurveKind::Linear { c: [1.0, 0.0] }))
            .unwrap_err();
        assert!(matches!(err, CurveError::DuplicateName { .. }));
    }

    #[test]
    fn unknown_id_is_error() {
        let (set, _) = plf_set();
        assert!(matches!(
            set.evaluate(CurveId::from_index(7), &[0.5]),
            Err(CurveError::UnknownCurve { .. })
        ));
    }

    #[test]
    fn out_of_range_counted_not_failed() {
        let (set, id) = plf_set();
        let v = set.evaluate(id, &[1.5]).unwrap();
        assert!(v.clamped);
        assert!((v.value - 1.0).abs() < 1e-12);
        set.evaluate(id, &[-3.0]).unwrap();
        set.evaluate(id, &[0.5]).unwrap();
        assert_eq!(set.out_of_range_count(id), 2);
        assert_eq!(set.out_of_range_summary(), vec![("PLFCURVENAME", 2)]);
    }

    #[test]
    fn absent_curve_is_identity() {
        let (set, _) = plf_set();
        assert_eq!(set.modifier(None, &[0.3, 0.2]).unwrap(), CurveValue::IDENTITY);
    }

    #[test]
    fn arity_check() {
        let (set, id) = plf_set();
        assert!(set.expect_arity(id, 1).is_ok());
        assert!(matches!(
            set.expect_arity(id, 2),
            Err(CurveError::ArityMismatch { .. })
        ));
    }
}
