//! Rich diagnostic error types for the senet engine.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so users know exactly what
//! went wrong and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the senet engine.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text, source spans) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum SenetError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Prop(#[from] PropError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Sentence(#[from] SentenceError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Axiom(#[from] AxiomError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Kb(#[from] KbError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Solver(#[from] SolverError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Belief(#[from] BeliefError),
}

// ---------------------------------------------------------------------------
// Proposition errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum PropError {
    #[error("unknown proposition base in identifier \"{input}\"")]
    #[diagnostic(
        code(senet::prop::unknown_base),
        help(
            "Identifiers start with one of the schema bases (P, W, S, B, \
             Stench, Breeze, Glitter, Bump, Scream, L, OK, HeadingNorth, \
             HeadingEast, HeadingSouth, HeadingWest, HaveArrow, WumpusAlive, \
             or an action name) followed by underscore-separated indices."
        )
    )]
    UnknownBase { input: String },

    #[error("malformed indices in identifier \"{input}\": expected {expected}")]
    #[diagnostic(
        code(senet::prop::malformed_indices),
        help(
            "Atemporal location propositions are indexed <x>_<y>, location \
             fluents <x>_<y>_<t>, and every other fluent by a single <t>. \
             All indices are decimal integers."
        )
    )]
    MalformedIndices { input: String, expected: &'static str },
}

// ---------------------------------------------------------------------------
// Sentence errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum SentenceError {
    #[error("unexpected character '{found}' at byte {at}")]
    #[diagnostic(
        code(senet::sentence::unexpected_char),
        help(
            "Sentences are built from proposition identifiers and the \
             connectives ~ & | >> <=> with parentheses for grouping."
        )
    )]
    UnexpectedChar { found: char, at: usize },

    #[error("unexpected token \"{found}\" at byte {at}: expected {expected}")]
    #[diagnostic(
        code(senet::sentence::unexpected_token),
        help("Check for a missing operand or an unbalanced parenthesis.")
    )]
    UnexpectedToken {
        found: String,
        at: usize,
        expected: &'static str,
    },

    #[error("sentence ended early: expected {expected}")]
    #[diagnostic(
        code(senet::sentence::unexpected_end),
        help("The sentence is truncated; a connective is missing its right operand.")
    )]
    UnexpectedEnd { expected: &'static str },

    #[error("trailing input after a complete sentence, starting at byte {at}")]
    #[diagnostic(
        code(senet::sentence::trailing_input),
        help("Join multiple sentences with a connective, or tell them separately.")
    )]
    TrailingInput { at: usize },

    #[error("invalid proposition atom: {source}")]
    #[diagnostic(transparent)]
    BadAtom {
        #[from]
        source: PropError,
    },
}

// ---------------------------------------------------------------------------
// Axiom generation errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum AxiomError {
    #[error("cell ({x}, {y}) is outside world bounds x:[{xmin}, {xmax}] y:[{ymin}, {ymax}]")]
    #[diagnostic(
        code(senet::axiom::out_of_bounds),
        help(
            "Axiom generators only accept center cells inside the episode's \
             world bounds. Out-of-grid *neighbors* are pruned automatically; \
             an out-of-grid center indicates a caller bug."
        )
    )]
    OutOfBounds {
        x: i32,
        y: i32,
        xmin: i32,
        xmax: i32,
        ymin: i32,
        ymax: i32,
    },

    #[error("degenerate world bounds: x:[{xmin}, {xmax}] y:[{ymin}, {ymax}]")]
    #[diagnostic(
        code(senet::axiom::empty_world),
        help(
            "World bounds must contain at least one cell (xmin <= xmax and \
             ymin <= ymax). A zero-size grid would silently generate no \
             axioms, so it is rejected at construction."
        )
    )]
    EmptyWorld {
        xmin: i32,
        xmax: i32,
        ymin: i32,
        ymax: i32,
    },
}

// ---------------------------------------------------------------------------
// Knowledge base errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum KbError {
    #[error("knowledge base is contradictory: both the query and its negation are unsatisfiable")]
    #[diagnostic(
        code(senet::kb::contradiction),
        help(
            "A consistent KB satisfies at least one of KB & q, KB & ~q. \
             Both failing means an earlier tell introduced a contradiction. \
             Dump the axiom log and bisect the offending axiom."
        )
    )]
    Contradiction,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Sentence(#[from] SentenceError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Solver(#[from] SolverError),
}

// ---------------------------------------------------------------------------
// Decision procedure errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum SolverError {
    #[error("solver process \"{binary}\" failed to start: {message}")]
    #[diagnostic(
        code(senet::solver::unavailable),
        help(
            "The external SAT solver could not be spawned. Check that the \
             binary is installed and on PATH, or switch to the in-process \
             backend."
        )
    )]
    Unavailable { binary: String, message: String },

    #[error("solver exceeded timeout of {timeout_secs} s and was killed")]
    #[diagnostic(
        code(senet::solver::timeout),
        help(
            "The query did not finish within the configured timeout. \
             Increase the timeout, or reduce KB growth (the scoped SSA \
             policy exists for exactly this reason)."
        )
    )]
    Timeout { timeout_secs: u64 },

    #[error("solver process crashed with {status}")]
    #[diagnostic(
        code(senet::solver::crashed),
        help("The solver terminated abnormally. Its stderr is logged at debug level.")
    )]
    Crashed { status: String },

    #[error("unparsable solver output: {message}")]
    #[diagnostic(
        code(senet::solver::bad_output),
        help(
            "The solver's result file did not follow the expected \
             SAT/UNSAT + assignment format. Verify the binary speaks the \
             MiniSat output convention."
        )
    )]
    BadOutput { message: String },

    #[error("in-process solver backend error: {message}")]
    #[diagnostic(
        code(senet::solver::backend),
        help("The embedded CDCL backend reported an internal error.")
    )]
    Backend { message: String },
}

// ---------------------------------------------------------------------------
// Belief inference errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum BeliefError {
    #[error("contradictory belief: {candidates} candidate {kind}(s) entailed at time {time}, expected exactly 1")]
    #[diagnostic(
        code(senet::belief::contradictory),
        help(
            "The exactly-one-{kind} invariant failed, which indicates an \
             axiom bug, not a recoverable state. The episode is halted \
             rather than guessing. Dump the axiom log to investigate."
        )
    )]
    ContradictoryBelief {
        /// What was being inferred: "location" or "heading".
        kind: &'static str,
        candidates: usize,
        time: u32,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Kb(#[from] KbError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Axiom(#[from] AxiomError),
}

/// Convenience alias for functions returning senet results.
pub type SenetResult<T> = std::result::Result<T, SenetError>;
