//! # senet
//!
//! Propositional belief tracking for agents acting under partial
//! observability in grid worlds with stochastic hazards.
//!
//! The engine maintains a temporal propositional knowledge base: world
//! structure is told once as axioms, each time step adds a percept sentence
//! and a scoped successor-state axiom bundle, and belief state (location,
//! heading, per-cell safety) is recovered by three-valued satisfiability
//! queries against a black-box decision procedure.
//!
//! ## Architecture
//!
//! - **Propositions** (`prop`): closed tagged variants per family, with
//!   canonical naming and inverse parsing at the serialization boundary
//! - **Sentences** (`sentence`): formula AST over `~ & | >> <=>`, plus a
//!   validating parser for console input
//! - **CNF** (`cnf`): naive clause flattening, the KB's durable form
//! - **Axiom generators** (`axioms`): pure functions from indices, time,
//!   and world bounds to sentences; successor-state axioms avoid the frame
//!   problem, and location SSAs are scoped to keep queries tractable
//! - **Knowledge base** (`kb`): parallel append-only axiom log and clause
//!   set; three-valued `ask` via satisfiability of KB ∧ q and KB ∧ ~q
//! - **Decision procedure** (`solver`): in-process CDCL backend plus an
//!   external MiniSat process adapter over DIMACS
//! - **Belief engine** (`belief`): the once-per-step update protocol
//! - **Simulator** (`world`): deterministic ground truth for demos/tests
//!
//! ## Library usage
//!
//! ```
//! use senet::axioms::WorldBounds;
//! use senet::belief::BeliefEngine;
//! use senet::prop::{Cell, Heading, Percept};
//!
//! let bounds = WorldBounds::grid(4, 4).unwrap();
//! let mut engine =
//!     BeliefEngine::with_default_solver(bounds, Cell::new(1, 1), Heading::North).unwrap();
//! let belief = engine.observe(&Percept::default()).unwrap();
//! assert_eq!(belief.location, Cell::new(1, 1));
//! ```

pub mod axioms;
pub mod belief;
pub mod cnf;
pub mod error;
pub mod export;
pub mod kb;
pub mod prop;
pub mod sentence;
pub mod solver;
pub mod world;
