//! Rich diagnostic error types for the heka query core.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]`
//! derives, providing error codes, help text, and source chains so users know
//! exactly what went wrong and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the heka query core.
///
/// Each variant wraps a subsystem-specific error, preserving the full
/// diagnostic chain (error codes, help text) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum HekaError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Space(#[from] SpaceError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Pattern(#[from] PatternError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Eval(#[from] EvalError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Engine(#[from] EngineError),
}

/// Result type used across the crate.
pub type HekaResult<T> = std::result::Result<T, HekaError>;

// ---------------------------------------------------------------------------
// Atom space errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum SpaceError {
    #[error("atom not found: {id}")]
    #[diagnostic(
        code(heka::space::not_found),
        help(
            "The id does not name any atom in this space. Ids are only valid \
             for the space that allocated them; check that the atom was added \
             to this space and not another one."
        )
    )]
    AtomNotFound { id: u64 },

    #[error("type {atom_type} is not a node type")]
    #[diagnostic(
        code(heka::space::not_a_node_type),
        help("`add_node` requires a concrete node type such as Concept or Predicate.")
    )]
    NotANodeType { atom_type: String },

    #[error("type {atom_type} is not a link type")]
    #[diagnostic(
        code(heka::space::not_a_link_type),
        help("`add_link` requires a concrete link type such as Evaluation or List.")
    )]
    NotALinkType { atom_type: String },

    #[error("outgoing set references unknown atom {id}")]
    #[diagnostic(
        code(heka::space::dangling_outgoing),
        help(
            "Every member of a link's outgoing set must already exist in the \
             space. Add the child atoms first, then the link."
        )
    )]
    DanglingOutgoing { id: u64 },
}

/// Result type for atom space operations.
pub type SpaceResult<T> = std::result::Result<T, SpaceError>;

// ---------------------------------------------------------------------------
// Pattern errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum PatternError {
    #[error("pattern has no clauses")]
    #[diagnostic(
        code(heka::pattern::empty),
        help(
            "A pattern needs at least one clause to search for. An empty \
             clause list is a caller error, not an empty result."
        )
    )]
    Empty,

    #[error("clause root {id} is not in the atom space")]
    #[diagnostic(
        code(heka::pattern::unknown_clause),
        help(
            "Every clause root must be an atom of the space the pattern will \
             be matched against. Build the clause in the space first."
        )
    )]
    UnknownClause { id: u64 },
}

/// Result type for pattern construction.
pub type PatternResult<T> = std::result::Result<T, PatternError>;

// ---------------------------------------------------------------------------
// Evaluation errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum EvalError {
    #[error("no evaluator registered for predicate {predicate}")]
    #[diagnostic(
        code(heka::eval::no_evaluator),
        help(
            "Grounded predicates must be registered with \
             `EvaluatorRegistry::register` before a pattern using them is \
             matched. Built-in evaluation exists only for GreaterThan."
        )
    )]
    NoEvaluator { predicate: String },

    #[error("malformed virtual clause: {message}")]
    #[diagnostic(
        code(heka::eval::malformed),
        help(
            "A virtual clause must be an Evaluation link \
             [GroundedPredicate, List args] or a GreaterThan link with two \
             arguments."
        )
    )]
    MalformedVirtual { message: String },

    #[error("atom {name:?} is not a Number")]
    #[diagnostic(
        code(heka::eval::not_a_number),
        help("GreaterThan arguments must be Number nodes whose name parses as f64.")
    )]
    NotANumber { name: String },

    #[error("evaluator failed: {message}")]
    #[diagnostic(
        code(heka::eval::failed),
        help(
            "The registered evaluator reported a failure. During matching \
             this is treated as a rejected grounding, never as a fatal error."
        )
    )]
    EvaluatorFailed { message: String },
}

/// Result type for truth-value evaluation.
pub type EvalResult<T> = std::result::Result<T, EvalError>;

// ---------------------------------------------------------------------------
// Engine errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum EngineError {
    #[error("invalid configuration: {message}")]
    #[diagnostic(
        code(heka::engine::invalid_config),
        help("Check the TOML against the fields of `EngineConfig`.")
    )]
    InvalidConfig { message: String },
}
