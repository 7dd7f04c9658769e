//! Belief-state inferencer: the per-step KB update protocol.
//!
//! One state ("awaiting next percept") looped once per external time
//! step:
//!
//! 1. [`BeliefEngine::observe`] tells the percept sentence for time t,
//!    recovers the unique believed location and heading by satisfiability
//!    sweeps, and tells the scoped temporal axiom bundle for t → t+1.
//! 2. The external action selector picks an action; [`BeliefEngine::act`]
//!    tells it back as a timestamped proposition and advances time.
//!
//! Zero or multiple location/heading candidates mean an axiom bug, not a
//! recoverable state: the episode halts with
//! [`BeliefError::ContradictoryBelief`] rather than guessing.
//!
//! The engine exclusively owns its KB for the episode; independent episodes
//! use independent engines (or [`BeliefEngine::reset`], which rebuilds the
//! KB from scratch).

use serde::Serialize;

use crate::axioms::{self, WorldBounds};
use crate::error::{BeliefError, SenetResult};
use crate::kb::{KnowledgeBase, Truth};
use crate::prop::{Action, Cell, Heading, Percept, Prop, Time};
use crate::sentence::Sentence;
use crate::solver::DecisionProcedure;

/// The agent's inferred pose at one time step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BeliefState {
    pub time: Time,
    pub location: Cell,
    pub heading: Heading,
}

/// Drives the per-step update protocol against an exclusively-owned KB.
pub struct BeliefEngine {
    kb: KnowledgeBase,
    bounds: WorldBounds,
    entrance: Cell,
    initial_heading: Heading,
    time: Time,
    belief: Option<BeliefState>,
}

impl BeliefEngine {
    /// Build an engine and tell the initial world-structure axioms.
    pub fn new(
        bounds: WorldBounds,
        entrance: Cell,
        heading: Heading,
        solver: Box<dyn DecisionProcedure>,
    ) -> SenetResult<Self> {
        bounds.check(entrance)?;
        let mut kb = KnowledgeBase::new(solver);
        let added = kb.tell_all(axioms::initial_axioms(entrance, heading, &bounds)?);
        tracing::info!(
            %bounds,
            %entrance,
            %heading,
            clauses = added,
            "belief engine initialized"
        );
        Ok(Self {
            kb,
            bounds,
            entrance,
            initial_heading: heading,
            time: 0,
            belief: None,
        })
    }

    /// Engine over the in-process solver backend.
    pub fn with_default_solver(
        bounds: WorldBounds,
        entrance: Cell,
        heading: Heading,
    ) -> SenetResult<Self> {
        Self::new(
            bounds,
            entrance,
            heading,
            Box::new(crate::solver::OtterSolver::new()),
        )
    }

    /// Step 1–4 of the protocol: percepts in, belief out, temporal axioms
    /// told for the coming transition.
    pub fn observe(&mut self, percept: &Percept) -> SenetResult<BeliefState> {
        let t = self.time;
        self.kb.tell(axioms::percept_sentence(t, percept));

        let location = self.infer_location(t)?;
        let heading = self.infer_heading(t)?;

        let bundle = axioms::temporal_bundle(t, location, heading, &self.bounds)?;
        let added = self.kb.tell_all(bundle);
        tracing::debug!(
            time = t,
            %location,
            %heading,
            clauses_added = added,
            clauses_total = self.kb.clause_count(),
            "belief update"
        );

        let belief = BeliefState {
            time: t,
            location,
            heading,
        };
        self.belief = Some(belief);
        Ok(belief)
    }

    /// Step 5–6: record the executed action and advance time.
    pub fn act(&mut self, action: Action) {
        tracing::trace!(time = self.time, %action, "action told");
        self.kb.tell(Sentence::atom(Prop::Did(action, self.time)));
        self.time += 1;
    }

    /// The unique cell entailed occupied at time `t`.
    fn infer_location(&self, t: Time) -> SenetResult<Cell> {
        let mut candidates = Vec::new();
        for cell in self.bounds.cells() {
            if self.kb.ask_prop(Prop::At(cell, t))? == Truth::True {
                candidates.push(cell);
            }
        }
        match candidates.as_slice() {
            [unique] => Ok(*unique),
            _ => Err(BeliefError::ContradictoryBelief {
                kind: "location",
                candidates: candidates.len(),
                time: t,
            }
            .into()),
        }
    }

    /// The unique direction entailed faced at time `t`.
    fn infer_heading(&self, t: Time) -> SenetResult<Heading> {
        let mut candidates = Vec::new();
        for heading in Heading::ALL {
            if self.kb.ask_prop(Prop::HeadingIs(heading, t))? == Truth::True {
                candidates.push(heading);
            }
        }
        match candidates.as_slice() {
            [unique] => Ok(*unique),
            _ => Err(BeliefError::ContradictoryBelief {
                kind: "heading",
                candidates: candidates.len(),
                time: t,
            }
            .into()),
        }
    }

    /// Safety verdict per cell at the last observed time step.
    ///
    /// Meaningful after the first [`observe`](Self::observe); before that,
    /// no safety biconditionals have been told and every cell is Unknown.
    pub fn safe_cells(&self) -> SenetResult<Vec<(Cell, Truth)>> {
        let t = self.belief.map(|b| b.time).unwrap_or(self.time);
        let mut out = Vec::with_capacity(self.bounds.cell_count());
        for cell in self.bounds.cells() {
            let verdict = self.kb.ask_prop(Prop::LocationOk(cell, t))?;
            out.push((cell, verdict));
        }
        Ok(out)
    }

    /// Three-valued query passthrough for console tooling.
    pub fn ask(&self, query: &Sentence) -> SenetResult<Truth> {
        Ok(self.kb.ask(query)?)
    }

    /// Single-proposition query passthrough.
    pub fn ask_prop(&self, prop: Prop) -> SenetResult<Truth> {
        Ok(self.kb.ask_prop(prop)?)
    }

    /// The owned knowledge base, for diagnostics export.
    pub fn kb(&self) -> &KnowledgeBase {
        &self.kb
    }

    /// Mutable KB access for console tooling that tells ad-hoc sentences.
    pub fn kb_mut(&mut self) -> &mut KnowledgeBase {
        &mut self.kb
    }

    pub fn time(&self) -> Time {
        self.time
    }

    pub fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    /// The belief from the most recent observation, if any.
    pub fn belief(&self) -> Option<BeliefState> {
        self.belief
    }

    /// Rebuild the KB for a fresh episode: clear everything, re-tell the
    /// initial axioms, reset time.
    pub fn reset(&mut self) -> SenetResult<()> {
        self.kb.reset();
        self.kb.tell_all(axioms::initial_axioms(
            self.entrance,
            self.initial_heading,
            &self.bounds,
        )?);
        self.time = 0;
        self.belief = None;
        Ok(())
    }
}

impl std::fmt::Debug for BeliefEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeliefEngine")
            .field("bounds", &self.bounds)
            .field("time", &self.time)
            .field("belief", &self.belief)
            .field("kb", &self.kb)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SenetError;

    fn engine() -> BeliefEngine {
        BeliefEngine::with_default_solver(
            WorldBounds::grid(4, 4).unwrap(),
            Cell::new(1, 1),
            Heading::North,
        )
        .unwrap()
    }

    #[test]
    fn construction_tells_initial_axioms() {
        let engine = engine();
        assert_eq!(engine.kb().axiom_count(), 38);
        assert!(engine.kb().clause_count() > 38);
        assert_eq!(engine.time(), 0);
        assert!(engine.belief().is_none());
    }

    #[test]
    fn entrance_outside_bounds_rejected() {
        let result = BeliefEngine::with_default_solver(
            WorldBounds::grid(4, 4).unwrap(),
            Cell::new(9, 9),
            Heading::North,
        );
        assert!(matches!(result, Err(SenetError::Axiom(_))));
    }

    #[test]
    fn first_observation_recovers_the_entrance_pose() {
        let mut engine = engine();
        let belief = engine.observe(&Percept::default()).unwrap();
        assert_eq!(belief.time, 0);
        assert_eq!(belief.location, Cell::new(1, 1));
        assert_eq!(belief.heading, Heading::North);
    }

    #[test]
    fn turn_then_move_tracks_the_pose() {
        let mut engine = engine();
        engine.observe(&Percept::default()).unwrap();
        engine.act(Action::TurnRight);

        let belief = engine.observe(&Percept::default()).unwrap();
        assert_eq!(belief.location, Cell::new(1, 1));
        assert_eq!(belief.heading, Heading::East);
        engine.act(Action::Forward);

        let belief = engine.observe(&Percept::default()).unwrap();
        assert_eq!(belief.location, Cell::new(2, 1));
        assert_eq!(belief.heading, Heading::East);
    }

    #[test]
    fn skipped_observation_surfaces_contradictory_belief() {
        let mut engine = engine();
        engine.observe(&Percept::default()).unwrap();
        engine.act(Action::Wait);
        // Skipping observe(1) means no SSA bundle for t=1 → t=2 was ever
        // told, so nothing pins the location at t=2.
        engine.act(Action::Wait);
        let err = engine.observe(&Percept::default()).unwrap_err();
        assert!(matches!(
            err,
            SenetError::Belief(BeliefError::ContradictoryBelief {
                kind: "location",
                candidates: 0,
                ..
            })
        ));
    }

    #[test]
    fn poisoned_kb_surfaces_instead_of_guessing() {
        let mut engine = engine();
        engine.kb_mut().tell_text("~L1_1_0").unwrap();
        assert!(engine.observe(&Percept::default()).is_err());
    }

    #[test]
    fn entrance_is_safe_after_first_observation() {
        let mut engine = engine();
        engine.observe(&Percept::default()).unwrap();
        let safety = engine.safe_cells().unwrap();
        let entrance = safety
            .iter()
            .find(|(c, _)| *c == Cell::new(1, 1))
            .unwrap();
        assert_eq!(entrance.1, Truth::True);
    }

    #[test]
    fn reset_restores_the_initial_kb() {
        let mut engine = engine();
        engine.observe(&Percept::default()).unwrap();
        engine.act(Action::Forward);
        let grown = engine.kb().clause_count();

        engine.reset().unwrap();
        assert_eq!(engine.time(), 0);
        assert!(engine.belief().is_none());
        assert!(engine.kb().clause_count() < grown);
        assert_eq!(engine.kb().axiom_count(), 38);

        // A fresh observation works again from t=0.
        let belief = engine.observe(&Percept::default()).unwrap();
        assert_eq!(belief.location, Cell::new(1, 1));
    }
}
