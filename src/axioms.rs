//! Axiom generators: pure translation from world-model indices to sentences.
//!
//! Three groups, mirroring the KB update protocol:
//! - world-structure axioms, told once at episode start
//! - percept-binding axioms, told every step from the current percept
//! - successor-state and mutual-exclusion axioms, told every step for the
//!   t → t+1 transition
//!
//! Every generator is a total pure function of its explicit arguments.
//! Out-of-grid *neighbors* are pruned silently (expected at grid edges);
//! an out-of-grid *center* cell is an [`AxiomError::OutOfBounds`].
//!
//! Successor-state axioms follow the canonical pattern
//! `F(t+1) <=> causes_F(t) | (F(t) & ~causes_not_F(t))`, avoiding separate
//! effect and frame axioms. The location SSA is only generated for the
//! agent's cell and its forward-facing neighbor ([`scoped_location_ssa`]):
//! the grid-wide set converts to a prohibitively large CNF and only one
//! location is ever actually asserted true.

use serde::{Deserialize, Serialize};

use crate::error::AxiomError;
use crate::prop::{Action, Cell, Heading, Percept, PerceptChannel, Prop, Time};
use crate::sentence::Sentence;

// ---------------------------------------------------------------------------
// World bounds
// ---------------------------------------------------------------------------

/// Inclusive grid bounds, immutable for an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub xmin: i32,
    pub xmax: i32,
    pub ymin: i32,
    pub ymax: i32,
}

impl WorldBounds {
    /// Build bounds, rejecting degenerate (empty) grids.
    pub fn new(xmin: i32, xmax: i32, ymin: i32, ymax: i32) -> Result<Self, AxiomError> {
        if xmin > xmax || ymin > ymax {
            return Err(AxiomError::EmptyWorld {
                xmin,
                xmax,
                ymin,
                ymax,
            });
        }
        Ok(Self {
            xmin,
            xmax,
            ymin,
            ymax,
        })
    }

    /// 1-based bounds for a `width` × `height` grid.
    pub fn grid(width: i32, height: i32) -> Result<Self, AxiomError> {
        Self::new(1, width, 1, height)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.xmin <= cell.x && cell.x <= self.xmax && self.ymin <= cell.y && cell.y <= self.ymax
    }

    /// Fail loudly on an out-of-bounds center cell.
    pub fn check(&self, cell: Cell) -> Result<(), AxiomError> {
        if self.contains(cell) {
            Ok(())
        } else {
            Err(AxiomError::OutOfBounds {
                x: cell.x,
                y: cell.y,
                xmin: self.xmin,
                xmax: self.xmax,
                ymin: self.ymin,
                ymax: self.ymax,
            })
        }
    }

    /// All cells, x-major then y ascending.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let ys = self.ymin..=self.ymax;
        (self.xmin..=self.xmax)
            .flat_map(move |x| ys.clone().map(move |y| Cell::new(x, y)))
    }

    pub fn cell_count(&self) -> usize {
        let w = (self.xmax - self.xmin + 1) as usize;
        let h = (self.ymax - self.ymin + 1) as usize;
        w * h
    }
}

impl std::fmt::Display for WorldBounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "x:[{}, {}] y:[{}, {}]",
            self.xmin, self.xmax, self.ymin, self.ymax
        )
    }
}

// ---------------------------------------------------------------------------
// Percept sentence
// ---------------------------------------------------------------------------

/// The percept-binding sentence for time `t`: one literal per channel,
/// negated where the bit is false.
///
/// `Percept { breeze: true, scream: true, .. }` at t=0 renders as
/// `~Stench0 & Breeze0 & ~Glitter0 & ~Bump0 & Scream0`.
pub fn percept_sentence(t: Time, percept: &Percept) -> Sentence {
    Sentence::and(percept.bits().into_iter().map(|(channel, observed)| {
        let atom = Prop::Perceived(channel, t);
        if observed {
            Sentence::atom(atom)
        } else {
            Sentence::neg(atom)
        }
    }))
}

// ---------------------------------------------------------------------------
// World-structure axioms (told once)
// ---------------------------------------------------------------------------

/// No pit and no wumpus at the given cell (used for the entrance).
pub fn entrance_assertions(cell: Cell) -> Sentence {
    Sentence::and([Sentence::neg(Prop::Pit(cell)), Sentence::neg(Prop::Wumpus(cell))])
}

/// Breeze at a cell iff a pit occupies the cell or an in-bounds 4-neighbor.
pub fn pit_breeze(cell: Cell, bounds: &WorldBounds) -> Result<Sentence, AxiomError> {
    bounds.check(cell)?;
    let mut pits: Vec<Sentence> = cell
        .neighbors()
        .into_iter()
        .filter(|n| bounds.contains(*n))
        .map(|n| Sentence::atom(Prop::Pit(n)))
        .collect();
    pits.push(Sentence::atom(Prop::Pit(cell)));
    Ok(Sentence::iff(
        Sentence::atom(Prop::BreezeAt(cell)),
        Sentence::or(pits),
    ))
}

/// Stench at a cell iff the wumpus lairs there or at an in-bounds 4-neighbor.
pub fn wumpus_stench(cell: Cell, bounds: &WorldBounds) -> Result<Sentence, AxiomError> {
    bounds.check(cell)?;
    let mut lairs: Vec<Sentence> = cell
        .neighbors()
        .into_iter()
        .filter(|n| bounds.contains(*n))
        .map(|n| Sentence::atom(Prop::Wumpus(n)))
        .collect();
    lairs.push(Sentence::atom(Prop::Wumpus(cell)));
    Ok(Sentence::iff(
        Sentence::atom(Prop::StenchAt(cell)),
        Sentence::or(lairs),
    ))
}

/// One breeze biconditional per cell.
pub fn all_pit_breeze(bounds: &WorldBounds) -> Result<Vec<Sentence>, AxiomError> {
    bounds.cells().map(|c| pit_breeze(c, bounds)).collect()
}

/// One stench biconditional per cell.
pub fn all_wumpus_stench(bounds: &WorldBounds) -> Result<Vec<Sentence>, AxiomError> {
    bounds.cells().map(|c| wumpus_stench(c, bounds)).collect()
}

/// The wumpus is somewhere: disjunction over every cell.
pub fn at_least_one_wumpus(bounds: &WorldBounds) -> Sentence {
    Sentence::or(bounds.cells().map(|c| Sentence::atom(Prop::Wumpus(c))))
}

/// The wumpus is nowhere else: pairwise exclusion via implication.
///
/// Returns `None` for a single-cell grid, where the constraint is vacuous.
pub fn at_most_one_wumpus(bounds: &WorldBounds) -> Option<Sentence> {
    let cells: Vec<Cell> = bounds.cells().collect();
    if cells.len() < 2 {
        return None;
    }
    Some(Sentence::and(cells.iter().map(|&cell| {
        Sentence::implies(
            Sentence::atom(Prop::Wumpus(cell)),
            Sentence::and(
                cells
                    .iter()
                    .filter(|&&other| other != cell)
                    .map(|&other| Sentence::neg(Prop::Wumpus(other))),
            ),
        )
    })))
}

/// The agent is at exactly one location at time `t`: the given cell, and
/// nowhere else.
pub fn agent_only_at(cell: Cell, bounds: &WorldBounds, t: Time) -> Result<Sentence, AxiomError> {
    bounds.check(cell)?;
    let mut operands = vec![Sentence::atom(Prop::At(cell, t))];
    operands.extend(
        bounds
            .cells()
            .filter(|&other| other != cell)
            .map(|other| Sentence::neg(Prop::At(other, t))),
    );
    Ok(Sentence::and(operands))
}

/// The agent faces exactly the given direction at time `t`.
pub fn heading_exactly(heading: Heading, t: Time) -> Sentence {
    Sentence::and(Heading::ALL.into_iter().map(|h| {
        let atom = Prop::HeadingIs(h, t);
        if h == heading {
            Sentence::atom(atom)
        } else {
            Sentence::neg(atom)
        }
    }))
}

/// The agent holds the arrow and the wumpus lives, at time `t`.
pub fn initial_inventory(t: Time) -> Sentence {
    Sentence::and([
        Sentence::atom(Prop::HaveArrow(t)),
        Sentence::atom(Prop::WumpusAlive(t)),
    ])
}

/// The complete initial axiom bundle for an episode.
pub fn initial_axioms(
    entrance: Cell,
    heading: Heading,
    bounds: &WorldBounds,
) -> Result<Vec<Sentence>, AxiomError> {
    bounds.check(entrance)?;
    let mut axioms = vec![entrance_assertions(entrance)];
    axioms.extend(all_pit_breeze(bounds)?);
    axioms.extend(all_wumpus_stench(bounds)?);
    axioms.push(at_least_one_wumpus(bounds));
    if let Some(exclusion) = at_most_one_wumpus(bounds) {
        axioms.push(exclusion);
    }
    axioms.push(agent_only_at(entrance, bounds, 0)?);
    axioms.push(heading_exactly(heading, 0));
    axioms.push(initial_inventory(0));
    Ok(axioms)
}

// ---------------------------------------------------------------------------
// Percept / location bindings (told every step)
// ---------------------------------------------------------------------------

/// Being at a cell makes the breeze percept equivalent to the cell being
/// breezy. Outer connective is an implication: absence from the cell says
/// nothing about the cell's truth.
pub fn breeze_percept_binding(cell: Cell, t: Time) -> Sentence {
    Sentence::implies(
        Sentence::atom(Prop::At(cell, t)),
        Sentence::iff(
            Sentence::atom(Prop::Perceived(PerceptChannel::Breeze, t)),
            Sentence::atom(Prop::BreezeAt(cell)),
        ),
    )
}

/// Stench counterpart of [`breeze_percept_binding`].
pub fn stench_percept_binding(cell: Cell, t: Time) -> Sentence {
    Sentence::implies(
        Sentence::atom(Prop::At(cell, t)),
        Sentence::iff(
            Sentence::atom(Prop::Perceived(PerceptChannel::Stench, t)),
            Sentence::atom(Prop::StenchAt(cell)),
        ),
    )
}

/// Breeze and stench bindings for every cell at time `t`.
pub fn all_percept_bindings(t: Time, bounds: &WorldBounds) -> Vec<Sentence> {
    let mut axioms = Vec::with_capacity(bounds.cell_count() * 2);
    for cell in bounds.cells() {
        axioms.push(breeze_percept_binding(cell, t));
    }
    for cell in bounds.cells() {
        axioms.push(stench_percept_binding(cell, t));
    }
    axioms
}

/// A cell is safe at time `t` iff it is pit-free and, should it harbor the
/// wumpus, the wumpus is dead.
pub fn location_ok(cell: Cell, t: Time) -> Sentence {
    Sentence::iff(
        Sentence::atom(Prop::LocationOk(cell, t)),
        Sentence::and([
            Sentence::neg(Prop::Pit(cell)),
            Sentence::implies(
                Sentence::atom(Prop::Wumpus(cell)),
                Sentence::neg(Prop::WumpusAlive(t)),
            ),
        ]),
    )
}

/// Safety biconditionals for every cell at time `t`.
pub fn all_location_ok(t: Time, bounds: &WorldBounds) -> Vec<Sentence> {
    bounds.cells().map(|c| location_ok(c, t)).collect()
}

// ---------------------------------------------------------------------------
// Successor-state axioms (told every step)
// ---------------------------------------------------------------------------

/// Location SSA for one cell: occupied at t+1 iff the agent stayed put
/// (no forward move, a stationary action, or a bump) or arrived from an
/// in-bounds neighbor by moving forward while headed this way.
pub fn at_location_ssa(t: Time, cell: Cell, bounds: &WorldBounds) -> Result<Sentence, AxiomError> {
    bounds.check(cell)?;

    let stay = Sentence::and([
        Sentence::atom(Prop::At(cell, t)),
        Sentence::or([
            Sentence::neg(Prop::Did(Action::Forward, t)),
            Sentence::atom(Prop::Did(Action::Shoot, t)),
            Sentence::atom(Prop::Did(Action::Grab, t)),
            Sentence::atom(Prop::Did(Action::TurnLeft, t)),
            Sentence::atom(Prop::Did(Action::TurnRight, t)),
            Sentence::atom(Prop::Perceived(PerceptChannel::Bump, t + 1)),
        ]),
    ]);

    let mut cases = vec![stay];
    for heading in Heading::ALL {
        let (dx, dy) = heading.delta();
        let from = Cell::new(cell.x - dx, cell.y - dy);
        if bounds.contains(from) {
            cases.push(Sentence::and([
                Sentence::atom(Prop::At(from, t)),
                Sentence::atom(Prop::HeadingIs(heading, t)),
                Sentence::atom(Prop::Did(Action::Forward, t)),
            ]));
        }
    }

    Ok(Sentence::iff(
        Sentence::atom(Prop::At(cell, t + 1)),
        Sentence::or(cases),
    ))
}

/// The scoped location-SSA bundle: the current cell, plus the single cell
/// the agent would reach by moving forward. Never the whole grid.
pub fn scoped_location_ssa(
    t: Time,
    cell: Cell,
    heading: Heading,
    bounds: &WorldBounds,
) -> Result<Vec<Sentence>, AxiomError> {
    let mut axioms = vec![at_location_ssa(t, cell, bounds)?];
    let ahead = cell.step(heading);
    if bounds.contains(ahead) {
        axioms.push(at_location_ssa(t, ahead, bounds)?);
    }
    Ok(axioms)
}

/// `HaveArrow(t+1) <=> HaveArrow(t) & ~Shoot(t)`.
pub fn have_arrow_ssa(t: Time) -> Sentence {
    Sentence::iff(
        Sentence::atom(Prop::HaveArrow(t + 1)),
        Sentence::and([
            Sentence::atom(Prop::HaveArrow(t)),
            Sentence::neg(Prop::Did(Action::Shoot, t)),
        ]),
    )
}

/// `WumpusAlive(t+1) <=> WumpusAlive(t) & ~Scream(t+1)`.
///
/// Death is only inferable the step after the scream is perceived; the
/// one-step lag is part of the axiom's contract.
pub fn wumpus_alive_ssa(t: Time) -> Sentence {
    Sentence::iff(
        Sentence::atom(Prop::WumpusAlive(t + 1)),
        Sentence::and([
            Sentence::atom(Prop::WumpusAlive(t)),
            Sentence::neg(Prop::Perceived(PerceptChannel::Scream, t + 1)),
        ]),
    )
}

/// Heading SSA for one direction: keep the heading under any non-turning
/// action or a bump, or arrive at it via a single 90° turn from one of the
/// two adjacent headings.
pub fn heading_ssa(heading: Heading, t: Time) -> Sentence {
    let stay = Sentence::and([
        Sentence::atom(Prop::HeadingIs(heading, t)),
        Sentence::or([
            Sentence::atom(Prop::Did(Action::Forward, t)),
            Sentence::atom(Prop::Did(Action::Grab, t)),
            Sentence::atom(Prop::Did(Action::Wait, t)),
            Sentence::atom(Prop::Did(Action::Shoot, t)),
            Sentence::atom(Prop::Perceived(PerceptChannel::Bump, t + 1)),
        ]),
    ]);
    // A left turn lands here from the clockwise neighbor, a right turn
    // from the counterclockwise one.
    let via_left = Sentence::and([
        Sentence::atom(Prop::HeadingIs(heading.right(), t)),
        Sentence::atom(Prop::Did(Action::TurnLeft, t)),
    ]);
    let via_right = Sentence::and([
        Sentence::atom(Prop::HeadingIs(heading.left(), t)),
        Sentence::atom(Prop::Did(Action::TurnRight, t)),
    ]);

    Sentence::iff(
        Sentence::atom(Prop::HeadingIs(heading, t + 1)),
        Sentence::or([stay, via_left, via_right]),
    )
}

/// Every non-location SSA for the t → t+1 transition.
pub fn non_location_ssas(t: Time) -> Vec<Sentence> {
    let mut axioms = vec![have_arrow_ssa(t), wumpus_alive_ssa(t)];
    axioms.extend(Heading::ALL.into_iter().map(|h| heading_ssa(h, t)));
    axioms
}

// ---------------------------------------------------------------------------
// Mutual exclusion (told every step)
// ---------------------------------------------------------------------------

/// One sentence per direction: holding it excludes the other three.
pub fn heading_exclusion(t: Time) -> Vec<Sentence> {
    Heading::ALL
        .into_iter()
        .map(|heading| {
            Sentence::iff(
                Sentence::atom(Prop::HeadingIs(heading, t)),
                Sentence::and(
                    Heading::ALL
                        .into_iter()
                        .filter(|&other| other != heading)
                        .map(|other| Sentence::neg(Prop::HeadingIs(other, t))),
                ),
            )
        })
        .collect()
}

/// Exactly one action executes at time `t`.
pub fn action_exclusion(t: Time) -> Sentence {
    Sentence::and(Action::ALL.into_iter().map(|action| {
        Sentence::iff(
            Sentence::atom(Prop::Did(action, t)),
            Sentence::and(
                Action::ALL
                    .into_iter()
                    .filter(|&other| other != action)
                    .map(|other| Sentence::neg(Prop::Did(other, t))),
            ),
        )
    }))
}

/// Per-step mutual exclusion: headings constrain the *next* step, actions
/// the current one.
pub fn mutual_exclusion(t: Time) -> Vec<Sentence> {
    let mut axioms = heading_exclusion(t + 1);
    axioms.push(action_exclusion(t));
    axioms
}

// ---------------------------------------------------------------------------
// Per-step bundle
// ---------------------------------------------------------------------------

/// Everything told for the t → t+1 transition, scoped to the believed cell
/// and heading: safety biconditionals, percept/location bindings, the scoped
/// location SSA, the non-location SSAs, and mutual exclusion.
pub fn temporal_bundle(
    t: Time,
    cell: Cell,
    heading: Heading,
    bounds: &WorldBounds,
) -> Result<Vec<Sentence>, AxiomError> {
    let mut axioms = all_location_ok(t, bounds);
    axioms.extend(all_percept_bindings(t, bounds));
    axioms.extend(scoped_location_ssa(t, cell, heading, bounds)?);
    axioms.extend(non_location_ssas(t));
    axioms.extend(mutual_exclusion(t));
    Ok(axioms)
}
