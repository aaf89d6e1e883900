//! # heka
//!
//! A pattern-query core for hypergraph knowledge bases: given a set of
//! clauses (sub-graphs with free variables) over an atom space, decide where
//! an exhaustive backtracking search should begin, orchestrate the first
//! generation of candidates, and judge dynamically evaluated sub-patterns
//! against proposed groundings.
//!
//! ## Architecture
//!
//! - **Atom space** (`space`): arena-owned hypergraph with incoming-set,
//!   type, and salience indices over `DashMap` shards
//! - **Anchor selection** (`query::select`): greedy thinnest-incoming-set
//!   starter choice per clause, ranked across the whole pattern
//! - **Search policies** (`query::policy`, `query::focus`): the decision
//!   surface a backtracking explorer consults, with a salience-bounded
//!   overlay that trades completeness for relevance
//! - **Virtual clauses** (`eval`): grounded-predicate and numeric-comparison
//!   truth evaluation, collapsed to a crisp match decision
//!
//! The backtracking executor itself is an external collaborator behind the
//! [`Explorer`](query::policy::Explorer) trait.
//!
//! ## Library usage
//!
//! ```
//! use heka::atom::AtomType;
//! use heka::engine::QueryEngine;
//! use heka::query::Pattern;
//!
//! let engine = QueryEngine::default();
//! let space = engine.space();
//! let sun = space.add_node(AtomType::Concept, "Sun").unwrap();
//! let star = space.add_node(AtomType::Concept, "Star").unwrap();
//! space.add_link(AtomType::Inheritance, vec![sun, star]).unwrap();
//!
//! let var = space.add_node(AtomType::Variable, "$x").unwrap();
//! let clause = space.add_link(AtomType::Inheritance, vec![var, star]).unwrap();
//! let pattern = Pattern::new(space, vec![clause]).unwrap();
//! ```

pub mod atom;
pub mod engine;
pub mod error;
pub mod eval;
pub mod query;
pub mod reduce;
pub mod space;
