//! Start-point selection: where should a backtracking search begin?
//!
//! In principle any constant in a clause would do. In practice a typical
//! clause looks like
//!
//! ```text
//! Evaluation
//!     Predicate "orbits"
//!     List
//!         Variable "$x"
//!         Concept "Sun"
//! ```
//!
//! and the incoming set of "orbits" is usually huge while the incoming set of
//! "Sun" is small. Starting at "Sun" explores far fewer dead ends, so the
//! selector walks each clause to its full depth and greedily picks the
//! constant with the smallest ("thinnest") incoming set. Incoming-set size
//! beats depth: a deep constant with a huge incoming set is still a poor
//! anchor. Depth only breaks ties, preferring the deeper, more specific
//! constant.
//!
//! Subtrees that cannot anchor a search are skipped outright: alternation
//! (`Or`) branches are usually disconnected from the rest of the pattern,
//! and dynamically evaluated subtrees may have no literal presence in the
//! space at all.

use crate::atom::{AtomId, AtomType};
use crate::reduce::Reduce;
use crate::space::AtomSpace;

use super::Pattern;

/// A candidate place to begin the search for one clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Starter {
    /// The constant atom to start from.
    pub anchor: AtomId,
    /// The link directly containing the anchor (the anchor itself for a
    /// bare-node clause).
    pub predicate: AtomId,
    /// Depth of the anchor below the clause root.
    pub depth: usize,
    /// Incoming-set size of the anchor.
    pub width: usize,
}

/// The globally best starter across a whole pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thinnest {
    /// The winning starter.
    pub starter: Starter,
    /// Index of the clause it was found in.
    pub clause_index: usize,
}

/// Tie-break rule shared by the per-clause and per-pattern selection:
/// strictly smaller width wins; at equal width the greater depth wins.
fn improves(candidate: &Starter, best: Option<&Starter>) -> bool {
    match best {
        None => true,
        Some(best) => {
            candidate.width < best.width
                || (candidate.width == best.width && candidate.depth > best.depth)
        }
    }
}

/// Find the best start point within one clause.
///
/// Returns `None` when the clause offers no usable constant: it is purely
/// variables, or its only constants sit beneath alternation or dynamically
/// evaluated subtrees.
pub fn find_starter(
    space: &AtomSpace,
    pattern: &Pattern,
    reducer: Option<&dyn Reduce>,
    clause_root: AtomId,
) -> Option<Starter> {
    descend(space, pattern, reducer, clause_root, 0)
}

fn descend(
    space: &AtomSpace,
    pattern: &Pattern,
    reducer: Option<&dyn Reduce>,
    h: AtomId,
    depth: usize,
) -> Option<Starter> {
    let atom = space.get(h)?;

    if atom.is_node() {
        if pattern.is_variable(space, h) {
            return None;
        }
        return Some(Starter {
            anchor: h,
            predicate: h,
            depth,
            width: space.incoming_size(h),
        });
    }

    // Alternation branches are usually disconnected from the rest of the
    // pattern; never anchor inside one.
    if atom.atom_type == AtomType::Or {
        return None;
    }

    // A dynamically evaluated subtree may have no literal grounding in the
    // space, so a search started there is doomed.
    if pattern.is_dynamic(h) {
        return None;
    }

    // Substitute a redex body once, and only to get started: reducing below
    // depth 0 risks infinite descent on a recursive definition.
    let link = if depth == 0 && atom.atom_type == AtomType::Redex {
        let body = reducer.and_then(|r| r.reduce(space, h))?;
        space.get(body)?
    } else {
        atom
    };

    let mut best: Option<Starter> = None;
    for &child in &link.outgoing {
        // Quoting must not hide a usable anchor.
        let child = unwrap_quote(space, child);
        let Some(mut found) = descend(space, pattern, reducer, child, depth + 1) else {
            continue;
        };
        // A constant found directly below gets this link as its predicate.
        if space.is_node(child) {
            found.predicate = h;
        }
        if improves(&found, best.as_ref()) {
            best = Some(found);
        }
    }
    best
}

/// Strip a single level of `Quote` wrapping.
fn unwrap_quote(space: &AtomSpace, h: AtomId) -> AtomId {
    if space.atom_type(h) == Some(AtomType::Quote) {
        if let Some(atom) = space.get(h) {
            if let Some(&inner) = atom.outgoing.first() {
                return inner;
            }
        }
    }
    h
}

/// Find the best start point across all clauses of a pattern.
///
/// Runs [`find_starter`] per clause (depth resets to 0 for each) and keeps
/// the global best under the same tie-break rule. Returns `None` only when
/// every clause yields no starter.
pub fn find_thinnest(
    space: &AtomSpace,
    pattern: &Pattern,
    reducer: Option<&dyn Reduce>,
) -> Option<Thinnest> {
    let mut best: Option<Thinnest> = None;
    for (clause_index, &clause) in pattern.clauses().iter().enumerate() {
        let Some(starter) = find_starter(space, pattern, reducer, clause) else {
            continue;
        };
        if improves(&starter, best.as_ref().map(|t| &t.starter)) {
            best = Some(Thinnest {
                starter,
                clause_index,
            });
        }
    }
    best
}
