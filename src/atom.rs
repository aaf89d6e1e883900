//! Core atom types for the heka query engine.
//!
//! Atoms are the elements of the hypergraph: either nodes (named leaves) or
//! links (hyperedges with an ordered outgoing set). Every atom is identified
//! by an [`AtomId`] and owned by the [`AtomSpace`](crate::space::AtomSpace);
//! everything else holds non-owning ids. Links may reference themselves
//! through nested outgoing sets, so ownership is never a tree.

use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Unique, niche-optimized identifier for an atom.
///
/// Uses `NonZeroU64` so that `Option<AtomId>` is the same size as `AtomId`
/// (the niche optimization lets the compiler use 0 as the `None`
/// discriminant). An "undefined handle" is always `None`, never a sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct AtomId(NonZeroU64);

impl AtomId {
    /// Create an `AtomId` from a raw `u64`.
    ///
    /// Returns `None` if `raw` is zero.
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(AtomId)
    }

    /// Get the underlying `u64` value.
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl std::fmt::Display for AtomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "atom:{}", self.0)
    }
}

/// Short-term importance rank, mutated by an external attention subsystem.
pub type Sti = i16;

/// Type tag of an atom, with a two-level hierarchy.
///
/// `Node` and `Link` are abstract parents used only for subtype queries
/// (e.g. `atoms_by_type(AtomType::Link, true)`); atoms are never created
/// with an abstract type. A link's type determines its matching semantics:
/// `Or` signals alternation, `Quote` shields its child from search
/// anchoring, `Redex` is a pattern macro expanded through a
/// [`Reduce`](crate::reduce::Reduce) implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AtomType {
    /// Abstract parent of all node types.
    Node,
    /// Abstract parent of all link types.
    Link,
    /// A named concept.
    Concept,
    /// A named relation usable as the head of an `Evaluation`.
    Predicate,
    /// A predicate whose truth is computed by a registered evaluator.
    GroundedPredicate,
    /// A node standing for "any atom" during matching.
    Variable,
    /// A numeric literal; its name parses as `f64`.
    Number,
    /// Application of a predicate to an argument list.
    Evaluation,
    /// Ordered argument tuple.
    List,
    /// "is-a" relation.
    Inheritance,
    /// "if-then" relation.
    Implication,
    /// Alternation over its outgoing set.
    Or,
    /// Literal wrapper: the single child is not descended through.
    Quote,
    /// Pattern macro; its body is substituted before matching.
    Redex,
    /// Numeric comparison, evaluated rather than looked up.
    GreaterThan,
}

impl AtomType {
    /// The abstract parent type, or `None` for `Node`/`Link` themselves.
    pub fn parent(self) -> Option<AtomType> {
        match self {
            AtomType::Node | AtomType::Link => None,
            t if t.is_node() => Some(AtomType::Node),
            _ => Some(AtomType::Link),
        }
    }

    /// Whether this is a node type (abstract `Node` included).
    pub fn is_node(self) -> bool {
        matches!(
            self,
            AtomType::Node
                | AtomType::Concept
                | AtomType::Predicate
                | AtomType::GroundedPredicate
                | AtomType::Variable
                | AtomType::Number
        )
    }

    /// Whether this is a link type (abstract `Link` included).
    pub fn is_link(self) -> bool {
        !self.is_node()
    }

    /// Reflexive subtype check against the two-level hierarchy.
    pub fn is_subtype_of(self, other: AtomType) -> bool {
        self == other || self.parent() == Some(other)
    }
}

impl std::fmt::Display for AtomType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// An element of the hypergraph.
///
/// Nodes carry a name and an empty outgoing set; links carry an ordered
/// outgoing set and no name. The incoming set is not stored here — it is an
/// index maintained by the space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    /// Unique identifier.
    pub id: AtomId,
    /// Type tag.
    pub atom_type: AtomType,
    /// Human-readable name (nodes only).
    pub name: Option<String>,
    /// Ordered outgoing set (links only).
    pub outgoing: Vec<AtomId>,
}

impl Atom {
    /// Whether this atom is a node.
    pub fn is_node(&self) -> bool {
        self.atom_type.is_node()
    }

    /// Whether this atom is a link.
    pub fn is_link(&self) -> bool {
        self.atom_type.is_link()
    }

    /// Number of atoms in the outgoing set.
    pub fn arity(&self) -> usize {
        self.outgoing.len()
    }
}

/// Thread-safe atom ID allocator.
#[derive(Debug)]
pub struct AtomIdAllocator {
    next: AtomicU64,
}

impl AtomIdAllocator {
    /// Create an allocator starting at ID 1 (0 is the `None` niche).
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Allocate the next ID.
    pub fn allocate(&self) -> AtomId {
        let raw = self.next.fetch_add(1, Ordering::Relaxed);
        // Starts at 1 and only increments, so the id is always nonzero.
        AtomId::new(raw).unwrap_or_else(|| unreachable!("allocator produced zero id"))
    }
}

impl Default for AtomIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
