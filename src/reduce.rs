//! One-shot expansion of redex (pattern macro) links.
//!
//! A `Redex` link stands for a pattern defined elsewhere. Before anchor
//! selection can look inside it, the body must be substituted — exactly once,
//! since a self-referential definition would otherwise recurse forever.

use dashmap::DashMap;

use crate::atom::AtomId;
use crate::space::AtomSpace;

/// Expands a redex into its defined body.
pub trait Reduce: Send + Sync {
    /// The reduced body of `redex`, or `None` if no definition is known.
    fn reduce(&self, space: &AtomSpace, redex: AtomId) -> Option<AtomId>;
}

/// Redex definitions held as a simple root → body map.
#[derive(Debug, Default)]
pub struct DefinitionRegistry {
    bodies: DashMap<AtomId, AtomId>,
}

impl DefinitionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            bodies: DashMap::new(),
        }
    }

    /// Define (or redefine) the body of a redex.
    pub fn define(&self, redex: AtomId, body: AtomId) {
        self.bodies.insert(redex, body);
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether no definitions exist.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

impl Reduce for DefinitionRegistry {
    fn reduce(&self, _space: &AtomSpace, redex: AtomId) -> Option<AtomId> {
        self.bodies.get(&redex).map(|e| *e.value())
    }
}
