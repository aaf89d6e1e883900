//! Truth-value evaluation for virtual clauses.
//!
//! Some clauses cannot be matched by graph shape alone: their truth is
//! computed, not looked up. The [`Evaluate`] trait is the seam to that
//! computation; [`EvaluatorRegistry`] is the concrete service, mapping
//! grounded-predicate atoms to registered closures, with built-in evaluation
//! for `GreaterThan` over `Number` nodes.

use dashmap::DashMap;

use crate::atom::{AtomId, AtomType};
use crate::error::{EvalError, EvalResult};
use crate::space::AtomSpace;

/// A continuous truth degree with a confidence, both clamped to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TruthValue {
    /// Strength of the truth degree.
    pub mean: f64,
    /// Confidence in the strength.
    pub confidence: f64,
}

impl TruthValue {
    /// Certainly true.
    pub const TRUE: TruthValue = TruthValue {
        mean: 1.0,
        confidence: 1.0,
    };

    /// Certainly false.
    pub const FALSE: TruthValue = TruthValue {
        mean: 0.0,
        confidence: 1.0,
    };

    /// Create a truth value, clamping both components to [0, 1].
    pub fn new(mean: f64, confidence: f64) -> Self {
        Self {
            mean: mean.clamp(0.0, 1.0),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// Fully confident crisp truth value.
    pub fn crisp(holds: bool) -> Self {
        if holds { Self::TRUE } else { Self::FALSE }
    }
}

/// Computes the truth degree of a dynamically evaluated relation.
///
/// `predicate` identifies the computation; `args` is the already-grounded
/// argument atom. For `GreaterThan` clauses both are the grounded clause
/// root itself.
pub trait Evaluate: Send + Sync {
    fn evaluate(&self, space: &AtomSpace, predicate: AtomId, args: AtomId)
    -> EvalResult<TruthValue>;
}

/// Signature of a registered grounded-predicate evaluator.
pub type GroundedFn = Box<dyn Fn(&AtomSpace, AtomId) -> EvalResult<TruthValue> + Send + Sync>;

/// Evaluation service keyed by grounded-predicate atom.
///
/// `GreaterThan` needs no registration: its arguments are compared as
/// numbers directly.
#[derive(Default)]
pub struct EvaluatorRegistry {
    grounded: DashMap<AtomId, GroundedFn>,
}

impl EvaluatorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            grounded: DashMap::new(),
        }
    }

    /// Register an evaluator for a grounded-predicate atom.
    ///
    /// Replaces any previous registration for the same predicate.
    pub fn register<F>(&self, predicate: AtomId, evaluator: F)
    where
        F: Fn(&AtomSpace, AtomId) -> EvalResult<TruthValue> + Send + Sync + 'static,
    {
        self.grounded.insert(predicate, Box::new(evaluator));
    }

    /// Number of registered evaluators.
    pub fn len(&self) -> usize {
        self.grounded.len()
    }

    /// Whether no evaluators are registered.
    pub fn is_empty(&self) -> bool {
        self.grounded.is_empty()
    }
}

impl Evaluate for EvaluatorRegistry {
    fn evaluate(
        &self,
        space: &AtomSpace,
        predicate: AtomId,
        args: AtomId,
    ) -> EvalResult<TruthValue> {
        if let Some(evaluator) = self.grounded.get(&predicate) {
            return evaluator.value()(space, args);
        }
        match space.atom_type(predicate) {
            Some(AtomType::GreaterThan) => greater_than(space, args),
            _ => Err(EvalError::NoEvaluator {
                predicate: predicate.to_string(),
            }),
        }
    }
}

/// Built-in numeric comparison over a two-argument link.
fn greater_than(space: &AtomSpace, args: AtomId) -> EvalResult<TruthValue> {
    let link = space.get(args).ok_or_else(|| EvalError::MalformedVirtual {
        message: format!("argument atom {args} not found"),
    })?;
    let &[left, right] = link.outgoing.as_slice() else {
        return Err(EvalError::MalformedVirtual {
            message: format!("GreaterThan needs exactly 2 arguments, got {}", link.arity()),
        });
    };
    Ok(TruthValue::crisp(
        number_value(space, left)? > number_value(space, right)?,
    ))
}

/// Parse a `Number` node's name as `f64`.
fn number_value(space: &AtomSpace, id: AtomId) -> EvalResult<f64> {
    let atom = space.get(id).ok_or_else(|| EvalError::MalformedVirtual {
        message: format!("argument atom {id} not found"),
    })?;
    let name = atom.name.unwrap_or_default();
    if atom.atom_type != AtomType::Number {
        return Err(EvalError::NotANumber { name });
    }
    name.parse::<f64>()
        .map_err(|_| EvalError::NotANumber { name })
}
