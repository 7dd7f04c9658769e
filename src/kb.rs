//! The knowledge base: append-only axiom log and clause set.
//!
//! Two parallel sequences, updated atomically by [`KnowledgeBase::tell`]:
//! the human-readable axiom log (provenance and debugging) and the CNF
//! clause set (what the decision procedure consumes). The clause set is
//! always the flattening of the conjunction of every told axiom, and
//! neither sequence is ever retracted or rewritten within an episode,
//! which is what keeps old successor-state axioms valid as constraints on
//! earlier time slices.
//!
//! Queries are three-valued: `ask` tests satisfiability of KB ∧ q and
//! KB ∧ ~q and maps the pair to [`Truth`].

use std::fmt;

use crate::cnf::{to_clauses, Clause, Literal};
use crate::error::KbError;
use crate::prop::Prop;
use crate::sentence::Sentence;
use crate::solver::{solve_with_retry, DecisionProcedure, OtterSolver};

/// Three-valued query result under the current KB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Truth {
    True,
    False,
    Unknown,
}

impl fmt::Display for Truth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Truth::True => write!(f, "True"),
            Truth::False => write!(f, "False"),
            Truth::Unknown => write!(f, "Unknown"),
        }
    }
}

/// The growing propositional knowledge base for one episode.
pub struct KnowledgeBase {
    axioms: Vec<Sentence>,
    clauses: Vec<Clause>,
    solver: Box<dyn DecisionProcedure>,
}

impl KnowledgeBase {
    /// Empty KB over the given decision procedure.
    pub fn new(solver: Box<dyn DecisionProcedure>) -> Self {
        Self {
            axioms: Vec::new(),
            clauses: Vec::new(),
            solver,
        }
    }

    /// Empty KB over the in-process backend.
    pub fn with_default_solver() -> Self {
        Self::new(Box::new(OtterSolver::new()))
    }

    /// Absorb a sentence: append its CNF clauses and the sentence itself to
    /// the two logs in one step.
    ///
    /// A valid (tautological) sentence contributes zero clauses but is still
    /// logged for provenance.
    pub fn tell(&mut self, sentence: Sentence) {
        let new_clauses = to_clauses(&sentence);
        tracing::trace!(axiom = %sentence, clauses = new_clauses.len(), "tell");
        self.clauses.extend(new_clauses);
        self.axioms.push(sentence);
    }

    /// Parse the concrete syntax, then [`tell`](Self::tell).
    ///
    /// A malformed sentence aborts before any KB mutation.
    pub fn tell_text(&mut self, text: &str) -> Result<(), KbError> {
        let sentence = Sentence::parse_text(text)?;
        self.tell(sentence);
        Ok(())
    }

    /// Tell a batch of sentences; returns how many clauses were added.
    pub fn tell_all(&mut self, sentences: impl IntoIterator<Item = Sentence>) -> usize {
        let before = self.clauses.len();
        for sentence in sentences {
            self.tell(sentence);
        }
        self.clauses.len() - before
    }

    /// Three-valued entailment query.
    ///
    /// Satisfiability of KB ∧ q and KB ∧ ~q is tested independently; only
    /// the first holding means entailed True, only the second entailed
    /// False, both holding Unknown. Neither holding means the KB itself is
    /// contradictory, which is surfaced, not absorbed.
    pub fn ask(&self, query: &Sentence) -> Result<Truth, KbError> {
        let with_query = self.satisfiable_with(&to_clauses(query), None)?;
        let negated = Sentence::not(query.clone());
        let with_negation = self.satisfiable_with(&to_clauses(&negated), None)?;
        self.classify(with_query, with_negation)
    }

    /// Three-valued query for a single proposition.
    ///
    /// Uses the decision procedure's assumed-literal channel instead of
    /// converting a one-atom sentence twice.
    pub fn ask_prop(&self, prop: Prop) -> Result<Truth, KbError> {
        let as_true = self.satisfiable_with(&[], Some(Literal::pos(prop)))?;
        let as_false = self.satisfiable_with(&[], Some(Literal::neg(prop)))?;
        self.classify(as_true, as_false)
    }

    /// Whether the KB itself is satisfiable. Sanity checks only, never
    /// action selection.
    pub fn is_consistent(&self) -> Result<bool, KbError> {
        self.satisfiable_with(&[], None)
    }

    fn classify(&self, positive: bool, negative: bool) -> Result<Truth, KbError> {
        match (positive, negative) {
            (true, false) => Ok(Truth::True),
            (false, true) => Ok(Truth::False),
            (true, true) => Ok(Truth::Unknown),
            (false, false) => Err(KbError::Contradiction),
        }
    }

    fn satisfiable_with(
        &self,
        extra: &[Clause],
        assumption: Option<Literal>,
    ) -> Result<bool, KbError> {
        let mut combined = Vec::with_capacity(self.clauses.len() + extra.len());
        combined.extend_from_slice(&self.clauses);
        combined.extend_from_slice(extra);
        let verdict = solve_with_retry(self.solver.as_ref(), &combined, assumption)?;
        Ok(verdict.satisfiable)
    }

    /// The ordered axiom log.
    pub fn axioms(&self) -> &[Sentence] {
        &self.axioms
    }

    /// The accumulated clause set.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn axiom_count(&self) -> usize {
        self.axioms.len()
    }

    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    /// Clear both logs for an episode restart.
    pub fn reset(&mut self) {
        tracing::debug!(
            axioms = self.axioms.len(),
            clauses = self.clauses.len(),
            "resetting knowledge base"
        );
        self.axioms.clear();
        self.clauses.clear();
    }
}

impl fmt::Debug for KnowledgeBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KnowledgeBase")
            .field("axioms", &self.axioms.len())
            .field("clauses", &self.clauses.len())
            .field("solver", &self.solver.name())
            .finish()
    }
}
