//! End-to-end integration tests for the senet engine.
//!
//! These exercise the full pipeline (axiom generation, CNF flattening,
//! satisfiability queries, and the per-step belief protocol) against the
//! deterministic simulator, validating the hazard-inference scenarios the
//! engine exists for.

use senet::axioms::{self, WorldBounds};
use senet::belief::BeliefEngine;
use senet::kb::{KnowledgeBase, Truth};
use senet::prop::{Action, Cell, Heading, Percept, Prop};
use senet::sentence::Sentence;
use senet::world::World;

fn bounds4() -> WorldBounds {
    WorldBounds::grid(4, 4).unwrap()
}

/// Tell the full pit valuation: pits exactly at the given cells.
fn tell_pit_facts(kb: &mut KnowledgeBase, bounds: &WorldBounds, pits: &[Cell]) {
    for cell in bounds.cells() {
        let atom = Sentence::atom(Prop::Pit(cell));
        if pits.contains(&cell) {
            kb.tell(atom);
        } else {
            kb.tell(Sentence::not(atom));
        }
    }
}

#[test]
fn pit_breeze_biconditionals_propagate_both_ways() {
    let bounds = bounds4();
    let mut kb = KnowledgeBase::with_default_solver();
    kb.tell_all(axioms::all_pit_breeze(&bounds).unwrap());
    tell_pit_facts(&mut kb, &bounds, &[Cell::new(3, 1)]);

    // Cells adjacent to the pit are breezy; the far corner is not.
    assert_eq!(
        kb.ask_prop(Prop::BreezeAt(Cell::new(2, 1))).unwrap(),
        Truth::True
    );
    assert_eq!(
        kb.ask_prop(Prop::BreezeAt(Cell::new(3, 2))).unwrap(),
        Truth::True
    );
    assert_eq!(
        kb.ask_prop(Prop::BreezeAt(Cell::new(1, 1))).unwrap(),
        Truth::False
    );
}

#[test]
fn safety_queries_in_the_classic_layout() {
    let bounds = bounds4();
    let mut kb = KnowledgeBase::with_default_solver();
    kb.tell_all(axioms::initial_axioms(Cell::new(1, 1), Heading::North, &bounds).unwrap());
    kb.tell_all(axioms::all_location_ok(0, &bounds));

    // The entrance is provably safe before any hazard facts are known.
    assert_eq!(
        kb.ask_prop(Prop::LocationOk(Cell::new(1, 1), 0)).unwrap(),
        Truth::True
    );
    // A cell with an unknown pit is not yet decidable.
    assert_eq!(
        kb.ask_prop(Prop::LocationOk(Cell::new(3, 1), 0)).unwrap(),
        Truth::Unknown
    );

    // Assert the layout's hazards as known facts.
    kb.tell_text("P3_1").unwrap();
    kb.tell_text("P3_3").unwrap();
    kb.tell_text("W1_3").unwrap();

    assert_eq!(
        kb.ask_prop(Prop::LocationOk(Cell::new(3, 1), 0)).unwrap(),
        Truth::False
    );
    // The wumpus cell is unsafe while the wumpus is believed alive.
    assert_eq!(
        kb.ask_prop(Prop::LocationOk(Cell::new(1, 3), 0)).unwrap(),
        Truth::False
    );
    assert!(kb.is_consistent().unwrap());
}

#[test]
fn contradicting_a_told_fact_breaks_consistency() {
    let bounds = bounds4();
    let mut kb = KnowledgeBase::with_default_solver();
    kb.tell_all(axioms::initial_axioms(Cell::new(1, 1), Heading::North, &bounds).unwrap());
    assert!(kb.is_consistent().unwrap());

    // The entrance assertions say ~P1_1.
    kb.tell_text("P1_1").unwrap();
    assert!(!kb.is_consistent().unwrap());
}

#[test]
fn wumpus_death_is_inferred_one_step_late() {
    let mut world = World::classic();
    let mut engine = BeliefEngine::with_default_solver(
        world.bounds(),
        world.entrance(),
        world.agent_heading(),
    )
    .unwrap();

    // Facing north from (1,1), the wumpus at (1,3) is in the line of fire.
    engine.observe(&world.percept()).unwrap();
    engine.act(Action::Shoot);
    world.apply(Action::Shoot);
    assert!(!world.wumpus_alive());

    let percept = world.percept();
    assert!(percept.scream);
    engine.observe(&percept).unwrap();

    // At shot time the wumpus was still (consistently) alive; one step
    // later its death is entailed.
    assert_eq!(engine.ask_prop(Prop::WumpusAlive(0)).unwrap(), Truth::True);
    assert_eq!(engine.ask_prop(Prop::WumpusAlive(1)).unwrap(), Truth::False);
}

#[test]
fn belief_tracks_ground_truth_through_the_demo_route() {
    let script = [
        Action::TurnRight,
        Action::Forward,
        Action::TurnLeft,
        Action::Forward,
        Action::Forward,
        Action::Grab,
    ];

    let mut world = World::classic();
    let mut engine = BeliefEngine::with_default_solver(
        world.bounds(),
        world.entrance(),
        world.agent_heading(),
    )
    .unwrap();

    for &action in &script {
        let percept = world.percept();
        let belief = engine.observe(&percept).unwrap();
        assert_eq!(belief.location, world.agent_cell(), "location diverged");
        assert_eq!(belief.heading, world.agent_heading(), "heading diverged");

        engine.act(action);
        world.apply(action);
        assert!(world.agent_alive());
    }

    assert!(world.has_gold());

    // Exactly one location proposition is entailed at the final observed
    // time step.
    let t = engine.belief().unwrap().time;
    let entailed: Vec<Cell> = engine
        .bounds()
        .cells()
        .filter(|&c| engine.ask_prop(Prop::At(c, t)).unwrap() == Truth::True)
        .collect();
    assert_eq!(entailed, vec![world.agent_cell()]);
}

#[test]
fn bump_keeps_the_believed_location_in_place() {
    let mut world = World::classic();
    let mut engine = BeliefEngine::with_default_solver(
        world.bounds(),
        world.entrance(),
        world.agent_heading(),
    )
    .unwrap();

    // Turn to face the south wall, then walk into it.
    for action in [Action::TurnLeft, Action::TurnLeft, Action::Forward] {
        engine.observe(&world.percept()).unwrap();
        engine.act(action);
        world.apply(action);
    }

    let percept = world.percept();
    assert!(percept.bump);
    let belief = engine.observe(&percept).unwrap();
    assert_eq!(belief.location, Cell::new(1, 1));
    assert_eq!(belief.heading, Heading::South);
}

#[test]
fn percepts_sharpen_safety_knowledge_over_time() {
    let mut world = World::classic();
    let mut engine = BeliefEngine::with_default_solver(
        world.bounds(),
        world.entrance(),
        world.agent_heading(),
    )
    .unwrap();

    // A quiet entrance percept (no stench, no breeze) proves the
    // neighbors of (1,1) hazard-free.
    let percept = world.percept();
    assert_eq!(percept, Percept::default());
    engine.observe(&percept).unwrap();

    for cell in [Cell::new(1, 2), Cell::new(2, 1)] {
        assert_eq!(
            engine.ask_prop(Prop::LocationOk(cell, 0)).unwrap(),
            Truth::True,
            "quiet percept should prove {cell} safe"
        );
    }
    // A non-adjacent cell stays undecided.
    assert_eq!(
        engine.ask_prop(Prop::LocationOk(Cell::new(3, 3), 0)).unwrap(),
        Truth::Unknown
    );
}
