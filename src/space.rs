//! The atom space: owner of all atoms plus the indices the query core reads.
//!
//! Backed by `DashMap` shards for concurrent reads while an external
//! attention subsystem mutates STI values. The space deduplicates atoms:
//! re-adding a node with the same type and name, or a link with the same type
//! and outgoing set, returns the existing id. The query core itself never
//! creates, mutates, or deletes atoms — it only reads.

use std::cmp::Reverse;

use dashmap::DashMap;
use serde::Deserialize;

use crate::atom::{Atom, AtomId, AtomIdAllocator, AtomType, Sti};
use crate::error::{SpaceError, SpaceResult};

/// Attentional-focus parameters.
///
/// The focus is the set of atoms with `sti >= boundary`, optionally capped to
/// the `capacity` most salient. Membership is best-effort: STI values change
/// under the reader's feet and no snapshot isolation is provided.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
    /// Minimum STI for focus membership.
    pub boundary: Sti,
    /// Cap on focus size (top-K by STI). `None` for threshold-only.
    pub capacity: Option<usize>,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            boundary: 1,
            capacity: None,
        }
    }
}

/// In-memory hypergraph store with incoming-set and type indices.
pub struct AtomSpace {
    /// Id → atom (source of truth).
    atoms: DashMap<AtomId, Atom>,
    /// Id → links that directly reference it, in insertion order.
    incoming: DashMap<AtomId, Vec<AtomId>>,
    /// Concrete type → atoms of that type, in insertion order.
    type_index: DashMap<AtomType, Vec<AtomId>>,
    /// (type, name) → node id, for deduplication.
    node_index: DashMap<(AtomType, String), AtomId>,
    /// (type, outgoing) → link id, for deduplication.
    link_index: DashMap<(AtomType, Vec<AtomId>), AtomId>,
    /// Externally mutated salience values. Absent means 0.
    sti: DashMap<AtomId, Sti>,
    focus: FocusConfig,
    allocator: AtomIdAllocator,
}

impl AtomSpace {
    /// Create an empty space with the default focus parameters.
    pub fn new() -> Self {
        Self::with_focus(FocusConfig::default())
    }

    /// Create an empty space with explicit focus parameters.
    pub fn with_focus(focus: FocusConfig) -> Self {
        Self {
            atoms: DashMap::new(),
            incoming: DashMap::new(),
            type_index: DashMap::new(),
            node_index: DashMap::new(),
            link_index: DashMap::new(),
            sti: DashMap::new(),
            focus,
            allocator: AtomIdAllocator::new(),
        }
    }

    /// Add a node, returning the existing id if an identical node exists.
    pub fn add_node(&self, atom_type: AtomType, name: impl Into<String>) -> SpaceResult<AtomId> {
        if !atom_type.is_node() || matches!(atom_type, AtomType::Node) {
            return Err(SpaceError::NotANodeType {
                atom_type: atom_type.to_string(),
            });
        }
        let name = name.into();
        if let Some(existing) = self.node_index.get(&(atom_type, name.clone())) {
            return Ok(*existing.value());
        }
        let id = self.allocator.allocate();
        self.atoms.insert(
            id,
            Atom {
                id,
                atom_type,
                name: Some(name.clone()),
                outgoing: Vec::new(),
            },
        );
        self.node_index.insert((atom_type, name), id);
        self.type_index.entry(atom_type).or_default().push(id);
        Ok(id)
    }

    /// Add a link, returning the existing id if an identical link exists.
    ///
    /// Every member of the outgoing set must already be in the space.
    pub fn add_link(&self, atom_type: AtomType, outgoing: Vec<AtomId>) -> SpaceResult<AtomId> {
        if !atom_type.is_link() || matches!(atom_type, AtomType::Link) {
            return Err(SpaceError::NotALinkType {
                atom_type: atom_type.to_string(),
            });
        }
        for &child in &outgoing {
            if !self.atoms.contains_key(&child) {
                return Err(SpaceError::DanglingOutgoing { id: child.get() });
            }
        }
        if let Some(existing) = self.link_index.get(&(atom_type, outgoing.clone())) {
            return Ok(*existing.value());
        }
        let id = self.allocator.allocate();
        self.atoms.insert(
            id,
            Atom {
                id,
                atom_type,
                name: None,
                outgoing: outgoing.clone(),
            },
        );
        for &child in &outgoing {
            self.incoming.entry(child).or_default().push(id);
        }
        self.link_index.insert((atom_type, outgoing), id);
        self.type_index.entry(atom_type).or_default().push(id);
        Ok(id)
    }

    /// Get a clone of an atom.
    pub fn get(&self, id: AtomId) -> Option<Atom> {
        self.atoms.get(&id).map(|a| a.value().clone())
    }

    /// Type of an atom, if it exists.
    pub fn atom_type(&self, id: AtomId) -> Option<AtomType> {
        self.atoms.get(&id).map(|a| a.value().atom_type)
    }

    /// Whether the atom exists and is a node.
    pub fn is_node(&self, id: AtomId) -> bool {
        self.atom_type(id).is_some_and(AtomType::is_node)
    }

    /// The links directly referencing `id`, in insertion order.
    pub fn incoming_set(&self, id: AtomId) -> Vec<AtomId> {
        self.incoming
            .get(&id)
            .map(|v| v.value().clone())
            .unwrap_or_default()
    }

    /// Size of the incoming set without cloning it.
    pub fn incoming_size(&self, id: AtomId) -> usize {
        self.incoming.get(&id).map(|v| v.value().len()).unwrap_or(0)
    }

    /// Atoms of the given type, optionally including subtypes.
    ///
    /// With `include_subtypes`, abstract `Node`/`Link` enumerate every node
    /// or link in the space.
    pub fn atoms_by_type(&self, atom_type: AtomType, include_subtypes: bool) -> Vec<AtomId> {
        let mut out = Vec::new();
        for entry in self.type_index.iter() {
            let matches = if include_subtypes {
                entry.key().is_subtype_of(atom_type)
            } else {
                *entry.key() == atom_type
            };
            if matches {
                out.extend_from_slice(entry.value());
            }
        }
        out.sort_unstable();
        out
    }

    /// Every atom in the space.
    pub fn all_atoms(&self) -> Vec<AtomId> {
        let mut out: Vec<AtomId> = self.atoms.iter().map(|e| *e.key()).collect();
        out.sort_unstable();
        out
    }

    /// Number of atoms.
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    /// Whether the space is empty.
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    // -- salience ----------------------------------------------------------

    /// Set an atom's short-term importance.
    pub fn set_sti(&self, id: AtomId, sti: Sti) {
        self.sti.insert(id, sti);
    }

    /// An atom's short-term importance (0 if never set).
    pub fn sti(&self, id: AtomId) -> Sti {
        self.sti.get(&id).map(|v| *v.value()).unwrap_or(0)
    }

    /// The configured focus boundary.
    pub fn focus_boundary(&self) -> Sti {
        self.focus.boundary
    }

    /// Whether an atom is currently inside the attentional focus.
    pub fn in_focus(&self, id: AtomId) -> bool {
        self.sti(id) >= self.focus.boundary
    }

    /// The attentional focus: atoms at or above the boundary, most salient
    /// first, truncated to the configured capacity.
    ///
    /// STI values may change between the filter and the sort; the ordering is
    /// best-effort only.
    pub fn attentional_focus(&self) -> Vec<AtomId> {
        let mut focus: Vec<AtomId> = self
            .sti
            .iter()
            .filter(|e| *e.value() >= self.focus.boundary)
            .map(|e| *e.key())
            .collect();
        focus.sort_by_key(|&id| (Reverse(self.sti(id)), id));
        if let Some(cap) = self.focus.capacity {
            focus.truncate(cap);
        }
        focus
    }
}

impl Default for AtomSpace {
    fn default() -> Self {
        Self::new()
    }
}
