//! Engine facade: owns the space and the evaluation collaborators.
//!
//! [`QueryEngine`] wires an [`AtomSpace`] to an [`EvaluatorRegistry`] and a
//! [`DefinitionRegistry`] and hands out ready-made policies. Library users
//! who need a custom evaluation service or reducer can skip the facade and
//! build a [`DefaultPolicy`] directly.

use std::sync::Arc;

use serde::Deserialize;

use crate::error::EngineError;
use crate::eval::EvaluatorRegistry;
use crate::query::focus::AttentionalFocusPolicy;
use crate::query::policy::{DefaultPolicy, Explorer, QueryPolicy, SearchReport};
use crate::query::Pattern;
use crate::reduce::DefinitionRegistry;
use crate::space::{AtomSpace, FocusConfig};

/// Configuration for the query engine.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Attentional-focus parameters for the owned space.
    pub focus: FocusConfig,
}

impl EngineConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, EngineError> {
        toml::from_str(text).map_err(|e| EngineError::InvalidConfig {
            message: e.to_string(),
        })
    }
}

/// The heka query engine.
///
/// Owns the atom space, the grounded-predicate evaluators, and the redex
/// definitions. Searching itself is read-only: queries never mutate the
/// space, and nothing persists between invocations.
pub struct QueryEngine {
    space: Arc<AtomSpace>,
    evaluators: Arc<EvaluatorRegistry>,
    definitions: Arc<DefinitionRegistry>,
}

impl QueryEngine {
    /// Create an engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        tracing::info!(
            focus_boundary = config.focus.boundary,
            focus_capacity = ?config.focus.capacity,
            "initializing heka query engine"
        );
        Self {
            space: Arc::new(AtomSpace::with_focus(config.focus)),
            evaluators: Arc::new(EvaluatorRegistry::new()),
            definitions: Arc::new(DefinitionRegistry::new()),
        }
    }

    /// The owned atom space.
    pub fn space(&self) -> &Arc<AtomSpace> {
        &self.space
    }

    /// The grounded-predicate evaluator registry.
    pub fn evaluators(&self) -> &Arc<EvaluatorRegistry> {
        &self.evaluators
    }

    /// The redex definition registry.
    pub fn definitions(&self) -> &Arc<DefinitionRegistry> {
        &self.definitions
    }

    /// A standard policy over the owned space.
    pub fn default_policy(&self) -> DefaultPolicy {
        let evaluators: Arc<dyn crate::eval::Evaluate> = self.evaluators.clone();
        let definitions: Arc<dyn crate::reduce::Reduce> = self.definitions.clone();
        DefaultPolicy::new(Arc::clone(&self.space))
            .with_evaluator(evaluators)
            .with_reducer(definitions)
    }

    /// A salience-bounded policy over the owned space.
    pub fn focus_policy(&self) -> AttentionalFocusPolicy {
        AttentionalFocusPolicy::new(self.default_policy())
    }

    /// Run an anchored search (exhaustive fallback) with the default policy.
    pub fn satisfy(&self, explorer: &mut dyn Explorer, pattern: &Pattern) -> SearchReport {
        self.default_policy().initiate_search(explorer, pattern)
    }

    /// Run a focus-restricted search with the salience policy.
    pub fn satisfy_focused(&self, explorer: &mut dyn Explorer, pattern: &Pattern) -> SearchReport {
        self.focus_policy().perform_search(explorer, pattern)
    }
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::{AtomId, AtomType};
    use crate::query::policy::SearchStrategy;

    struct NullExplorer;

    impl Explorer for NullExplorer {
        fn explore_neighborhood(&mut self, _: AtomId, _: AtomId, _: AtomId) -> bool {
            false
        }
    }

    #[test]
    fn config_from_toml() {
        let config = EngineConfig::from_toml("[focus]\nboundary = 25\ncapacity = 100\n").unwrap();
        assert_eq!(config.focus.boundary, 25);
        assert_eq!(config.focus.capacity, Some(100));

        let config = EngineConfig::from_toml("").unwrap();
        assert_eq!(config.focus.boundary, FocusConfig::default().boundary);
    }

    #[test]
    fn bad_toml_is_a_config_error() {
        let err = EngineConfig::from_toml("focus = \"everything\"").unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig { .. }));
    }

    #[test]
    fn satisfy_uses_registered_definitions() {
        let engine = QueryEngine::default();
        let space = engine.space();
        let sun = space.add_node(AtomType::Concept, "Sun").unwrap();
        let star = space.add_node(AtomType::Concept, "Star").unwrap();
        space.add_link(AtomType::Inheritance, vec![sun, star]).unwrap();

        let var = space.add_node(AtomType::Variable, "$x").unwrap();
        let body = space.add_link(AtomType::Inheritance, vec![var, star]).unwrap();
        let marker = space.add_node(AtomType::Concept, "is-star").unwrap();
        let redex = space.add_link(AtomType::Redex, vec![marker]).unwrap();
        engine.definitions().define(redex, body);

        let pattern = Pattern::new(space, vec![redex]).unwrap();
        let report = engine.satisfy(&mut NullExplorer, &pattern);
        assert_eq!(report.strategy, SearchStrategy::Anchored);
        assert_eq!(report.anchor, Some(star));
    }

    #[test]
    fn satisfy_focused_respects_the_boundary() {
        let engine = QueryEngine::new(EngineConfig::from_toml("[focus]\nboundary = 5\n").unwrap());
        let space = engine.space();
        let a = space.add_node(AtomType::Concept, "a").unwrap();
        let b = space.add_node(AtomType::Concept, "b").unwrap();
        let hot = space.add_link(AtomType::Inheritance, vec![a, b]).unwrap();
        space.add_link(AtomType::Inheritance, vec![b, a]).unwrap();
        space.set_sti(hot, 9);

        let var = space.add_node(AtomType::Variable, "$x").unwrap();
        let clause = space.add_link(AtomType::Inheritance, vec![var, b]).unwrap();
        let pattern = Pattern::new(space, vec![clause]).unwrap();

        let report = engine.satisfy_focused(&mut NullExplorer, &pattern);
        assert_eq!(report.strategy, SearchStrategy::Focused);
        assert_eq!(report.candidates_tried, 1);
    }
}
