//! Minimal grid-world simulator: percept generation and action application.
//!
//! Ground truth for driving the belief engine from the CLI and the
//! integration tests. The inferencer never reads this state directly; it
//! only ever sees the percept vectors the simulator emits.
//!
//! Deterministic: hazards sit still, forward moves succeed unless they hit
//! a wall, and the transient bump/scream bits are set by one action and
//! visible in exactly the next percept.

use crate::axioms::WorldBounds;
use crate::error::AxiomError;
use crate::prop::{Action, Cell, Heading, Percept};

/// Ground-truth world state for one episode.
#[derive(Debug, Clone)]
pub struct World {
    bounds: WorldBounds,
    entrance: Cell,
    agent: Cell,
    heading: Heading,
    wumpus: Cell,
    wumpus_alive: bool,
    pits: Vec<Cell>,
    gold: Option<Cell>,
    has_arrow: bool,
    has_gold: bool,
    bump: bool,
    scream: bool,
    agent_alive: bool,
    finished: bool,
}

impl World {
    /// Build a world, rejecting any placement outside the bounds.
    pub fn new(
        bounds: WorldBounds,
        entrance: Cell,
        heading: Heading,
        wumpus: Cell,
        pits: Vec<Cell>,
        gold: Option<Cell>,
    ) -> Result<Self, AxiomError> {
        bounds.check(entrance)?;
        bounds.check(wumpus)?;
        for &pit in &pits {
            bounds.check(pit)?;
        }
        if let Some(g) = gold {
            bounds.check(g)?;
        }
        Ok(Self {
            bounds,
            entrance,
            agent: entrance,
            heading,
            wumpus,
            wumpus_alive: true,
            pits,
            gold,
            has_arrow: true,
            has_gold: false,
            bump: false,
            scream: false,
            agent_alive: true,
            finished: false,
        })
    }

    /// The classic 4×4 scenario: wumpus at (1,3), pits at (3,1) and (3,3),
    /// gold at (2,3), entrance (1,1) facing north.
    pub fn classic() -> Self {
        Self::new(
            WorldBounds::grid(4, 4).expect("static bounds"),
            Cell::new(1, 1),
            Heading::North,
            Cell::new(1, 3),
            vec![Cell::new(3, 1), Cell::new(3, 3)],
            Some(Cell::new(2, 3)),
        )
        .expect("static layout")
    }

    /// The percept vector at the agent's current cell.
    ///
    /// Stench outlives the wumpus (the carcass smells); bump and scream are
    /// transients from the previous action.
    pub fn percept(&self) -> Percept {
        Percept {
            stench: self.wumpus.touches(self.agent),
            breeze: self.pits.iter().any(|p| p.touches(self.agent)),
            glitter: self.gold == Some(self.agent),
            bump: self.bump,
            scream: self.scream,
        }
    }

    /// Apply one action to the ground truth.
    pub fn apply(&mut self, action: Action) {
        self.bump = false;
        self.scream = false;
        if self.finished || !self.agent_alive {
            return;
        }

        match action {
            Action::Forward => {
                let target = self.agent.step(self.heading);
                if self.bounds.contains(target) {
                    self.agent = target;
                    if self.is_lethal(target) {
                        self.agent_alive = false;
                        self.finished = true;
                    }
                } else {
                    self.bump = true;
                }
            }
            Action::TurnLeft => self.heading = self.heading.left(),
            Action::TurnRight => self.heading = self.heading.right(),
            Action::Grab => {
                if self.gold == Some(self.agent) {
                    self.gold = None;
                    self.has_gold = true;
                }
            }
            Action::Shoot => {
                if self.has_arrow {
                    self.has_arrow = false;
                    if self.wumpus_alive && self.in_line_of_fire() {
                        self.wumpus_alive = false;
                        self.scream = true;
                    }
                }
            }
            Action::Climb => {
                if self.agent == self.entrance {
                    self.finished = true;
                }
            }
            Action::Wait => {}
        }
    }

    fn is_lethal(&self, cell: Cell) -> bool {
        self.pits.contains(&cell) || (self.wumpus_alive && self.wumpus == cell)
    }

    fn in_line_of_fire(&self) -> bool {
        let w = self.wumpus;
        let a = self.agent;
        match self.heading {
            Heading::North => w.x == a.x && w.y > a.y,
            Heading::South => w.x == a.x && w.y < a.y,
            Heading::East => w.y == a.y && w.x > a.x,
            Heading::West => w.y == a.y && w.x < a.x,
        }
    }

    pub fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    pub fn entrance(&self) -> Cell {
        self.entrance
    }

    pub fn agent_cell(&self) -> Cell {
        self.agent
    }

    pub fn agent_heading(&self) -> Heading {
        self.heading
    }

    pub fn agent_alive(&self) -> bool {
        self.agent_alive
    }

    pub fn has_gold(&self) -> bool {
        self.has_gold
    }

    pub fn wumpus_alive(&self) -> bool {
        self.wumpus_alive
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_layout_percepts() {
        let world = World::classic();
        // Entrance (1,1): no adjacent hazard.
        assert_eq!(world.percept(), Percept::default());
    }

    #[test]
    fn breeze_and_stench_adjacency() {
        let mut world = World::classic();
        world.apply(Action::TurnRight); // face east
        world.apply(Action::Forward); // (2,1), next to pit (3,1)
        let p = world.percept();
        assert!(p.breeze);
        assert!(!p.stench);

        let mut world = World::classic();
        world.apply(Action::Forward); // (1,2), below wumpus (1,3)
        let p = world.percept();
        assert!(p.stench);
        assert!(!p.breeze);
    }

    #[test]
    fn wall_bump_is_transient() {
        let mut world = World::classic();
        world.apply(Action::TurnLeft); // face west at (1,1)
        world.apply(Action::Forward); // wall
        assert_eq!(world.agent_cell(), Cell::new(1, 1));
        assert!(world.percept().bump);
        world.apply(Action::Wait);
        assert!(!world.percept().bump);
    }

    #[test]
    fn grab_takes_the_gold_once() {
        let mut world = World::classic();
        for action in [
            Action::TurnRight,
            Action::Forward,
            Action::TurnLeft,
            Action::Forward,
            Action::Forward,
        ] {
            world.apply(action);
        }
        assert_eq!(world.agent_cell(), Cell::new(2, 3));
        assert!(world.percept().glitter);
        world.apply(Action::Grab);
        assert!(world.has_gold());
        assert!(!world.percept().glitter);
    }

    #[test]
    fn shoot_kills_only_in_line_and_screams_once() {
        let mut world = World::classic();
        // Facing north at (1,1); wumpus (1,3) is straight ahead.
        world.apply(Action::Shoot);
        assert!(!world.wumpus_alive());
        assert!(world.percept().scream);
        world.apply(Action::Wait);
        assert!(!world.percept().scream);

        let mut world = World::classic();
        world.apply(Action::TurnRight); // east: wumpus not in line
        world.apply(Action::Shoot);
        assert!(world.wumpus_alive());
        assert!(!world.percept().scream);
        // Arrow is spent either way.
        world.apply(Action::TurnLeft);
        world.apply(Action::Shoot);
        assert!(world.wumpus_alive());
    }

    #[test]
    fn stench_outlives_the_wumpus() {
        let mut world = World::classic();
        world.apply(Action::Shoot);
        world.apply(Action::Forward); // (1,2), adjacent to the carcass
        assert!(world.percept().stench);
    }

    #[test]
    fn hazards_end_the_episode() {
        let mut world = World::classic();
        world.apply(Action::Forward); // (1,2)
        world.apply(Action::Forward); // (1,3): live wumpus
        assert!(!world.agent_alive());
        assert!(world.is_finished());
    }

    #[test]
    fn climb_only_works_at_the_entrance() {
        let mut world = World::classic();
        world.apply(Action::Forward);
        world.apply(Action::Climb);
        assert!(!world.is_finished());

        let mut world = World::classic();
        world.apply(Action::Climb);
        assert!(world.is_finished());
    }

    #[test]
    fn misplaced_objects_rejected() {
        let result = World::new(
            WorldBounds::grid(2, 2).unwrap(),
            Cell::new(1, 1),
            Heading::North,
            Cell::new(5, 5),
            vec![],
            None,
        );
        assert!(matches!(result, Err(AxiomError::OutOfBounds { .. })));
    }
}
