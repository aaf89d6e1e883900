//! Pattern queries over the atom space.
//!
//! A query is a [`Pattern`]: an ordered list of clause roots plus the sets
//! that change how those clauses are treated (variables, dynamically
//! evaluated roots, absence conditions). The work of answering a query is
//! split between [`select`] (where to start looking), [`policy`] (the
//! decision surface a backtracking explorer consults), and [`focus`] (the
//! salience-bounded specialization of that surface).

pub mod focus;
pub mod policy;
pub mod select;

use std::collections::HashSet;

use crate::atom::{AtomId, AtomType};
use crate::error::{PatternError, PatternResult};
use crate::space::AtomSpace;

/// A pattern: clauses to ground simultaneously, plus the variable, dynamic,
/// and absent sets supplied by the caller.
///
/// Construction validates the clause list against the space, so the search
/// core never sees an empty or dangling pattern. The dynamic and absent sets
/// are carried through for the explorer; this crate interprets them only as
/// exclusions from anchor selection.
#[derive(Debug, Clone)]
pub struct Pattern {
    clauses: Vec<AtomId>,
    variables: HashSet<AtomId>,
    dynamic: HashSet<AtomId>,
    absent: HashSet<AtomId>,
}

impl Pattern {
    /// Create a pattern from its clause roots.
    ///
    /// Fails on an empty clause list or a clause root not present in the
    /// space.
    pub fn new(space: &AtomSpace, clauses: Vec<AtomId>) -> PatternResult<Self> {
        if clauses.is_empty() {
            return Err(PatternError::Empty);
        }
        for &clause in &clauses {
            if space.get(clause).is_none() {
                return Err(PatternError::UnknownClause { id: clause.get() });
            }
        }
        Ok(Self {
            clauses,
            variables: HashSet::new(),
            dynamic: HashSet::new(),
            absent: HashSet::new(),
        })
    }

    /// Declare the free variables of the pattern.
    pub fn with_variables(mut self, variables: HashSet<AtomId>) -> Self {
        self.variables = variables;
        self
    }

    /// Declare clause roots whose truth is computed rather than looked up.
    pub fn with_dynamic(mut self, dynamic: HashSet<AtomId>) -> Self {
        self.dynamic = dynamic;
        self
    }

    /// Declare clause roots that must be absent from any grounding.
    pub fn with_absent(mut self, absent: HashSet<AtomId>) -> Self {
        self.absent = absent;
        self
    }

    /// The ordered clause roots. Never empty.
    pub fn clauses(&self) -> &[AtomId] {
        &self.clauses
    }

    /// The declared variable set.
    pub fn variables(&self) -> &HashSet<AtomId> {
        &self.variables
    }

    /// The dynamically evaluated clause roots.
    pub fn dynamic(&self) -> &HashSet<AtomId> {
        &self.dynamic
    }

    /// The absence-condition clause roots.
    pub fn absent(&self) -> &HashSet<AtomId> {
        &self.absent
    }

    /// Whether an atom stands for "any atom" in this pattern, either by
    /// being typed `Variable` or by membership in the declared variable set.
    pub fn is_variable(&self, space: &AtomSpace, id: AtomId) -> bool {
        space.atom_type(id) == Some(AtomType::Variable) || self.variables.contains(&id)
    }

    /// Whether a subtree root is registered as dynamically evaluated.
    pub fn is_dynamic(&self, id: AtomId) -> bool {
        self.dynamic.contains(&id)
    }
}
