//! Salience-bounded policy: match only inside the attentional focus.
//!
//! On a large, long-lived space, even an anchored search can wade through
//! enormous incoming sets. This policy narrows every decision point to the
//! attentional focus — the bounded set of atoms an external attention
//! subsystem currently ranks as important — and orders candidates most
//! salient first. The trade-off is explicit: groundings built from atoms
//! outside the focus are missed, in exchange for bounded cost and answers
//! biased toward what the surrounding system cares about right now.
//!
//! The overlay composes with [`DefaultPolicy`] rather than reimplementing
//! it: structural matching and virtual evaluation are delegated, and only
//! the candidate sets shrink.

use std::cmp::Reverse;

use crate::atom::{AtomId, AtomType};
use crate::reduce::Reduce;
use crate::space::AtomSpace;

use super::policy::{run_candidates, DefaultPolicy, Explorer, QueryPolicy, SearchReport, SearchStrategy};
use super::Pattern;

/// [`QueryPolicy`] restricted to the attentional focus.
pub struct AttentionalFocusPolicy {
    inner: DefaultPolicy,
}

impl AttentionalFocusPolicy {
    /// Wrap a default policy.
    pub fn new(inner: DefaultPolicy) -> Self {
        Self { inner }
    }
}

impl QueryPolicy for AttentionalFocusPolicy {
    fn space(&self) -> &AtomSpace {
        self.inner.space()
    }

    fn reducer(&self) -> Option<&dyn Reduce> {
        self.inner.reducer()
    }

    /// A node matches only if the wrapped policy accepts it and it is
    /// currently in focus.
    fn node_match(&self, pattern_node: AtomId, candidate: AtomId) -> bool {
        self.inner.node_match(pattern_node, candidate) && self.space().in_focus(candidate)
    }

    /// A link matches only if the wrapped policy accepts it and it is
    /// currently in focus.
    fn link_match(&self, pattern_link: AtomId, candidate: AtomId) -> bool {
        self.inner.link_match(pattern_link, candidate) && self.space().in_focus(candidate)
    }

    /// The in-focus subset of the incoming set, most salient first.
    ///
    /// STI values move under concurrent attention updates; the filter and
    /// the sort each read the live value, so the ordering is best-effort.
    fn get_incoming_set(&self, atom: AtomId) -> Vec<AtomId> {
        let space = self.space();
        let mut focused: Vec<AtomId> = self
            .inner
            .get_incoming_set(atom)
            .into_iter()
            .filter(|&link| space.in_focus(link))
            .collect();
        focused.sort_by_key(|&link| Reverse(space.sti(link)));
        focused
    }

    fn virtual_link_match(&self, virtual_root: AtomId, grounded: AtomId) -> bool {
        self.inner.virtual_link_match(virtual_root, grounded)
    }

    /// Start from focus members of the right type instead of the store.
    ///
    /// The first generation of candidates is the attentional focus filtered
    /// to the first clause root's type (everything in focus for a bare
    /// variable root), tried most salient first. Intended for spaces where
    /// both anchored and exhaustive initiation are too expensive.
    fn perform_search(&self, explorer: &mut dyn Explorer, pattern: &Pattern) -> SearchReport {
        let root = pattern.clauses()[0];
        let mut report = SearchReport {
            strategy: SearchStrategy::Focused,
            root,
            predicate: root,
            anchor: None,
            candidates_tried: 0,
            halted: false,
        };
        let Some(root_type) = self.space().atom_type(root) else {
            return report;
        };

        let mut candidates = self.space().attentional_focus();
        if root_type != AtomType::Variable {
            candidates.retain(|&id| self.space().atom_type(id) == Some(root_type));
        }
        tracing::info!(
            root = %root,
            root_type = %root_type,
            candidates = candidates.len(),
            "focused search"
        );

        let (tried, halted) = run_candidates(explorer, root, root, &candidates);
        report.candidates_tried = tried;
        report.halted = halted;
        report
    }
}
