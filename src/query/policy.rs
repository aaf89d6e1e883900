//! The decision surface a backtracking explorer consults.
//!
//! The explorer itself — the machinery that extends a candidate atom into a
//! full grounding — lives outside this crate, behind the [`Explorer`] trait.
//! What lives here is everything the explorer asks along the way: whether two
//! atoms are compatible ([`QueryPolicy::node_match`] /
//! [`QueryPolicy::link_match`]), which incoming set to walk
//! ([`QueryPolicy::get_incoming_set`]), whether a dynamically evaluated
//! clause holds ([`QueryPolicy::virtual_link_match`]), and where the whole
//! search should begin ([`QueryPolicy::initiate_search`]).
//!
//! The search entry points are provided methods that dispatch through
//! `self.get_incoming_set`, so a policy that filters or reorders candidate
//! sets (see [`focus`](super::focus)) changes the search without rewriting
//! the orchestration.

use std::sync::Arc;

use crate::atom::{AtomId, AtomType};
use crate::eval::Evaluate;
use crate::reduce::Reduce;
use crate::space::AtomSpace;

use super::select;
use super::Pattern;

/// External backtracking executor.
///
/// `explore_neighborhood` attempts to extend `candidate` into a full
/// grounding of `root`'s clause and, transitively, of every other clause.
/// The returned bool is an opaque halt signal: `true` stops the candidate
/// loop, and whether that means "solution accepted" or "caller cancelled" is
/// the explorer's contract, not this crate's.
pub trait Explorer {
    fn explore_neighborhood(&mut self, root: AtomId, predicate: AtomId, candidate: AtomId)
    -> bool;
}

/// Which strategy a search invocation ended up using.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStrategy {
    /// Anchored at the thinnest constant's incoming set.
    Anchored,
    /// Exhaustive enumeration by the first clause's type.
    Exhaustive,
    /// First generation restricted to the attentional focus.
    Focused,
}

/// What a search invocation did: strategy chosen, anchoring decision, and
/// how far the candidate loop ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchReport {
    /// The strategy actually used.
    pub strategy: SearchStrategy,
    /// The clause the search was rooted in.
    pub root: AtomId,
    /// The literal handed to the explorer as the starter predicate.
    pub predicate: AtomId,
    /// The chosen anchor, if the strategy had one.
    pub anchor: Option<AtomId>,
    /// Candidates handed to the explorer.
    pub candidates_tried: usize,
    /// Whether the explorer's halt signal stopped the loop.
    pub halted: bool,
}

/// Policy object consulted by the explorer at every decision point.
///
/// Implementations supply the matching predicates and the candidate-set
/// accessor; the search entry points are provided on top of those. The core
/// reads the space, delegates to the explorer, and nothing else — no atom is
/// created or mutated here.
pub trait QueryPolicy {
    /// The space being searched.
    fn space(&self) -> &AtomSpace;

    /// The redex reducer available to anchor selection, if any.
    fn reducer(&self) -> Option<&dyn Reduce> {
        None
    }

    /// Whether a candidate node is acceptable for a pattern node.
    fn node_match(&self, pattern_node: AtomId, candidate: AtomId) -> bool;

    /// Whether a candidate link is acceptable for a pattern link.
    fn link_match(&self, pattern_link: AtomId, candidate: AtomId) -> bool;

    /// The candidate links referencing `atom`, in the order the explorer
    /// should try them.
    fn get_incoming_set(&self, atom: AtomId) -> Vec<AtomId>;

    /// Whether a dynamically evaluated clause holds for a grounded argument.
    fn virtual_link_match(&self, virtual_root: AtomId, grounded: AtomId) -> bool;

    /// Begin the search for `pattern`, preferring an anchored strategy.
    ///
    /// Ranks every clause for its thinnest constant. With an anchor, the
    /// candidate loop walks `self.get_incoming_set(anchor)` and hands each
    /// candidate to the explorer, stopping on the halt signal. Without one
    /// (the pattern is all variables, or its constants hide under
    /// alternation or dynamic subtrees), falls back to [`full_search`].
    ///
    /// [`full_search`]: QueryPolicy::full_search
    fn initiate_search(&self, explorer: &mut dyn Explorer, pattern: &Pattern) -> SearchReport {
        let Some(thinnest) = select::find_thinnest(self.space(), pattern, self.reducer()) else {
            tracing::info!("no anchor found, falling back to exhaustive search");
            return self.full_search(explorer, pattern);
        };

        let root = pattern.clauses()[thinnest.clause_index];
        let starter = thinnest.starter;
        tracing::info!(
            anchor = %starter.anchor,
            predicate = %starter.predicate,
            clause = thinnest.clause_index,
            width = starter.width,
            depth = starter.depth,
            "anchored search"
        );

        let candidates = self.get_incoming_set(starter.anchor);
        let (tried, halted) = run_candidates(explorer, root, starter.predicate, &candidates);
        SearchReport {
            strategy: SearchStrategy::Anchored,
            root,
            predicate: starter.predicate,
            anchor: Some(starter.anchor),
            candidates_tried: tried,
            halted,
        }
    }

    /// Exhaustive fallback: enumerate the space by the first clause's type.
    ///
    /// When the first clause root is a bare variable the pattern literally
    /// says "search everything", and that is what happens.
    fn full_search(&self, explorer: &mut dyn Explorer, pattern: &Pattern) -> SearchReport {
        let root = pattern.clauses()[0];
        let mut report = SearchReport {
            strategy: SearchStrategy::Exhaustive,
            root,
            predicate: root,
            anchor: None,
            candidates_tried: 0,
            halted: false,
        };
        let Some(root_type) = self.space().atom_type(root) else {
            return report;
        };

        let candidates = if root_type == AtomType::Variable {
            self.space().all_atoms()
        } else {
            self.space().atoms_by_type(root_type, false)
        };
        tracing::info!(
            root = %root,
            root_type = %root_type,
            candidates = candidates.len(),
            "exhaustive search"
        );

        let (tried, halted) = run_candidates(explorer, root, root, &candidates);
        report.candidates_tried = tried;
        report.halted = halted;
        report
    }

    /// Alternate initiation strategy; the default is simply
    /// [`initiate_search`](QueryPolicy::initiate_search).
    fn perform_search(&self, explorer: &mut dyn Explorer, pattern: &Pattern) -> SearchReport {
        self.initiate_search(explorer, pattern)
    }
}

/// Hand candidates to the explorer until one raises the halt signal.
pub(super) fn run_candidates(
    explorer: &mut dyn Explorer,
    root: AtomId,
    predicate: AtomId,
    candidates: &[AtomId],
) -> (usize, bool) {
    let total = candidates.len();
    for (i, &candidate) in candidates.iter().enumerate() {
        tracing::debug!(candidate = %candidate, nth = i + 1, total, "explore candidate");
        if explorer.explore_neighborhood(root, predicate, candidate) {
            return (i + 1, true);
        }
    }
    (total, false)
}

/// The standard policy: structural matching over the whole space.
///
/// Nodes match only themselves; links match on type and arity. Incoming sets
/// are returned unfiltered in insertion order. Virtual clauses are decided by
/// the attached evaluation service with a crisp threshold: the relation holds
/// iff the evaluated mean strength exceeds one half.
pub struct DefaultPolicy {
    space: Arc<AtomSpace>,
    evaluator: Option<Arc<dyn Evaluate>>,
    reducer: Option<Arc<dyn Reduce>>,
}

impl DefaultPolicy {
    /// Create a policy over a space, with no evaluator and no reducer.
    pub fn new(space: Arc<AtomSpace>) -> Self {
        Self {
            space,
            evaluator: None,
            reducer: None,
        }
    }

    /// Attach an evaluation service for virtual clauses.
    pub fn with_evaluator(mut self, evaluator: Arc<dyn Evaluate>) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    /// Attach a redex reducer for anchor selection.
    pub fn with_reducer(mut self, reducer: Arc<dyn Reduce>) -> Self {
        self.reducer = Some(reducer);
        self
    }

    /// Split a virtual clause into (predicate, args) for evaluation.
    ///
    /// `Evaluation [pred, args]` evaluates `pred` on `args`; a `GreaterThan`
    /// clause is its own predicate and argument carrier.
    fn virtual_parts(&self, grounded: AtomId) -> Option<(AtomId, AtomId)> {
        let atom = self.space.get(grounded)?;
        match atom.atom_type {
            AtomType::Evaluation if atom.arity() == 2 => {
                Some((atom.outgoing[0], atom.outgoing[1]))
            }
            AtomType::GreaterThan => Some((grounded, grounded)),
            _ => None,
        }
    }
}

impl QueryPolicy for DefaultPolicy {
    fn space(&self) -> &AtomSpace {
        &self.space
    }

    fn reducer(&self) -> Option<&dyn Reduce> {
        self.reducer.as_deref()
    }

    fn node_match(&self, pattern_node: AtomId, candidate: AtomId) -> bool {
        pattern_node == candidate
    }

    fn link_match(&self, pattern_link: AtomId, candidate: AtomId) -> bool {
        let (Some(pat), Some(cand)) = (self.space.get(pattern_link), self.space.get(candidate))
        else {
            return false;
        };
        pat.atom_type == cand.atom_type && pat.arity() == cand.arity()
    }

    fn get_incoming_set(&self, atom: AtomId) -> Vec<AtomId> {
        self.space.incoming_set(atom)
    }

    fn virtual_link_match(&self, virtual_root: AtomId, grounded: AtomId) -> bool {
        let Some(evaluator) = self.evaluator.as_deref() else {
            tracing::warn!(clause = %virtual_root, "no evaluator attached, rejecting virtual match");
            return false;
        };
        let Some((predicate, args)) = self.virtual_parts(grounded) else {
            tracing::warn!(clause = %virtual_root, grounded = %grounded, "malformed virtual clause");
            return false;
        };
        match evaluator.evaluate(&self.space, predicate, args) {
            // Crisp go/no-go decision on the truth strength.
            Ok(tv) => tv.mean > 0.5,
            Err(err) => {
                tracing::warn!(clause = %virtual_root, error = %err, "evaluation failed, no match");
                false
            }
        }
    }
}
