//! End-to-end tests for the heka query core.
//!
//! These exercise the full decision surface the way an external backtracking
//! explorer would: anchor selection across clauses, search initiation and
//! fallback, virtual clause evaluation, and the salience-bounded overlay.

use std::collections::HashSet;
use std::sync::Arc;

use heka::atom::{AtomId, AtomType};
use heka::engine::{EngineConfig, QueryEngine};
use heka::eval::{EvaluatorRegistry, TruthValue};
use heka::query::policy::{DefaultPolicy, Explorer, QueryPolicy, SearchStrategy};
use heka::query::select::{find_starter, find_thinnest};
use heka::query::Pattern;
use heka::space::{AtomSpace, FocusConfig};

/// Explorer that records each delegation and optionally halts on a specific
/// candidate.
#[derive(Default)]
struct Probe {
    calls: Vec<(AtomId, AtomId, AtomId)>,
    halt_on: Option<AtomId>,
}

impl Explorer for Probe {
    fn explore_neighborhood(&mut self, root: AtomId, predicate: AtomId, candidate: AtomId) -> bool {
        self.calls.push((root, predicate, candidate));
        self.halt_on == Some(candidate)
    }
}

/// Facts: several planets orbit the Sun; one moon orbits a planet.
fn solar_system(space: &AtomSpace) -> (AtomId, AtomId) {
    let orbits = space.add_node(AtomType::Predicate, "orbits").unwrap();
    let sun = space.add_node(AtomType::Concept, "Sun").unwrap();
    for name in ["Mercury", "Venus", "Earth", "Mars"] {
        let planet = space.add_node(AtomType::Concept, name).unwrap();
        let args = space.add_link(AtomType::List, vec![planet, sun]).unwrap();
        space
            .add_link(AtomType::Evaluation, vec![orbits, args])
            .unwrap();
    }
    let moon = space.add_node(AtomType::Concept, "Moon").unwrap();
    let earth = space.add_node(AtomType::Concept, "Earth").unwrap();
    let args = space.add_link(AtomType::List, vec![moon, earth]).unwrap();
    space
        .add_link(AtomType::Evaluation, vec![orbits, args])
        .unwrap();
    (orbits, sun)
}

#[test]
fn starter_width_equals_incoming_set_size() {
    let space = AtomSpace::new();
    let (orbits, sun) = solar_system(&space);
    let var = space.add_node(AtomType::Variable, "$x").unwrap();
    let args = space.add_link(AtomType::List, vec![var, sun]).unwrap();
    let clause = space
        .add_link(AtomType::Evaluation, vec![orbits, args])
        .unwrap();

    let pattern = Pattern::new(&space, vec![clause]).unwrap();
    let starter = find_starter(&space, &pattern, None, clause).unwrap();
    assert_eq!(starter.width, space.incoming_size(starter.anchor));
    // "Sun" (5 references) beats "orbits" (6) on width.
    assert_eq!(starter.anchor, sun);
}

#[test]
fn thinnest_picks_the_clause_with_the_thinner_constant() {
    let space = AtomSpace::new();
    let narrow = space.add_node(AtomType::Concept, "narrow").unwrap();
    let wide = space.add_node(AtomType::Concept, "wide").unwrap();
    let var = space.add_node(AtomType::Variable, "$x").unwrap();
    // incoming sizes: narrow = 3, wide = 7 (clause links included).
    for i in 0..2 {
        let f = space.add_node(AtomType::Concept, format!("n{i}")).unwrap();
        space.add_link(AtomType::List, vec![narrow, f]).unwrap();
    }
    for i in 0..6 {
        let f = space.add_node(AtomType::Concept, format!("w{i}")).unwrap();
        space.add_link(AtomType::List, vec![wide, f]).unwrap();
    }
    let wide_clause = space.add_link(AtomType::List, vec![wide, var]).unwrap();
    let narrow_clause = space.add_link(AtomType::List, vec![narrow, var]).unwrap();
    assert_eq!(space.incoming_size(narrow), 3);
    assert_eq!(space.incoming_size(wide), 7);

    let pattern = Pattern::new(&space, vec![wide_clause, narrow_clause]).unwrap();
    let thinnest = find_thinnest(&space, &pattern, None).unwrap();
    assert_eq!(thinnest.clause_index, 1);
    assert_eq!(thinnest.starter.anchor, narrow);
}

#[test]
fn unanchorable_query_falls_back_and_halts_mid_enumeration() {
    let space = Arc::new(AtomSpace::new());
    let x = space.add_node(AtomType::Variable, "$x").unwrap();
    let y = space.add_node(AtomType::Variable, "$y").unwrap();
    let clause = space.add_link(AtomType::Inheritance, vec![x, y]).unwrap();

    let mut fact_links = vec![clause];
    let names = ["a", "b", "c", "d"];
    for (i, name) in names.iter().enumerate() {
        let this = space.add_node(AtomType::Concept, *name).unwrap();
        let next = space
            .add_node(AtomType::Concept, names[(i + 1) % names.len()])
            .unwrap();
        fact_links.push(space.add_link(AtomType::Inheritance, vec![this, next]).unwrap());
    }

    let policy = DefaultPolicy::new(Arc::clone(&space));
    let pattern = Pattern::new(&space, vec![clause]).unwrap();

    // Full enumeration: one delegation per Inheritance link.
    let mut probe = Probe::default();
    let report = policy.initiate_search(&mut probe, &pattern);
    assert_eq!(report.strategy, SearchStrategy::Exhaustive);
    assert_eq!(report.candidates_tried, fact_links.len());
    assert!(!report.halted);

    // Halt signal stops the loop immediately after the halting call.
    let halt_on = report.root; // clause sorts first (lowest id among links)
    let mut probe = Probe {
        halt_on: Some(halt_on),
        ..Default::default()
    };
    let report = policy.initiate_search(&mut probe, &pattern);
    assert!(report.halted);
    assert_eq!(report.candidates_tried, 1);
    assert_eq!(probe.calls.len(), 1);
}

#[test]
fn constants_only_under_alternation_or_dynamic_roots_force_fallback() {
    let space = Arc::new(AtomSpace::new());
    let sun = space.add_node(AtomType::Concept, "Sun").unwrap();
    let var = space.add_node(AtomType::Variable, "$x").unwrap();
    let alt = space.add_link(AtomType::Or, vec![sun]).unwrap();
    let clause_or = space.add_link(AtomType::List, vec![alt, var]).unwrap();

    let seven = space.add_node(AtomType::Number, "7").unwrap();
    let clause_dyn = space
        .add_link(AtomType::GreaterThan, vec![var, seven])
        .unwrap();

    let pattern = Pattern::new(&space, vec![clause_or, clause_dyn])
        .unwrap()
        .with_dynamic(HashSet::from([clause_dyn]));
    assert_eq!(find_thinnest(&space, &pattern, None), None);

    let policy = DefaultPolicy::new(Arc::clone(&space));
    let mut probe = Probe::default();
    let report = policy.initiate_search(&mut probe, &pattern);
    assert_eq!(report.strategy, SearchStrategy::Exhaustive);
    assert_eq!(report.root, clause_or);
}

#[test]
fn virtual_match_boundary_is_strict() {
    let engine = QueryEngine::default();
    let space = engine.space();
    let pred = space
        .add_node(AtomType::GroundedPredicate, "scm:half")
        .unwrap();
    let args = space.add_link(AtomType::List, vec![]).unwrap();
    let clause = space.add_link(AtomType::Evaluation, vec![pred, args]).unwrap();

    engine
        .evaluators()
        .register(pred, |_, _| Ok(TruthValue::new(0.5, 1.0)));
    let policy = engine.default_policy();
    assert!(!policy.virtual_link_match(clause, clause));

    let registry = EvaluatorRegistry::new();
    registry.register(pred, |_, _| Ok(TruthValue::new(0.500001, 1.0)));
    let policy = DefaultPolicy::new(Arc::clone(space)).with_evaluator(Arc::new(registry));
    assert!(policy.virtual_link_match(clause, clause));
}

#[test]
fn focused_engine_prefers_salient_candidates() {
    let engine = QueryEngine::new(EngineConfig {
        focus: FocusConfig {
            boundary: 10,
            capacity: Some(8),
        },
    });
    let space = engine.space();
    let (orbits, sun) = solar_system(space);
    let var = space.add_node(AtomType::Variable, "$p").unwrap();
    let args = space.add_link(AtomType::List, vec![var, sun]).unwrap();
    let clause = space
        .add_link(AtomType::Evaluation, vec![orbits, args])
        .unwrap();

    // Make two of the five arg-lists referencing the Sun salient.
    let incoming = space.incoming_set(sun);
    space.set_sti(incoming[0], 20);
    space.set_sti(incoming[2], 90);

    let policy = engine.focus_policy();
    let filtered = policy.get_incoming_set(sun);
    assert_eq!(filtered, vec![incoming[2], incoming[0]]);
    for link in &filtered {
        assert!(space.in_focus(*link));
    }

    let pattern = Pattern::new(space, vec![clause]).unwrap();
    let mut probe = Probe::default();
    let report = policy.initiate_search(&mut probe, &pattern);
    assert_eq!(report.strategy, SearchStrategy::Anchored);
    assert_eq!(report.candidates_tried, 2);
    assert_eq!(probe.calls[0].2, incoming[2]);
}
