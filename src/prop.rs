//! Core proposition types for the senet engine.
//!
//! Every boolean variable the knowledge base reasons over is a [`Prop`]:
//! a closed tagged variant carrying its spatial and/or temporal indices.
//! Canonical string identifiers exist only at the decision-procedure and
//! console boundaries: [`Prop`]'s `Display` produces them and `FromStr`
//! is the left inverse, so `parse(name(p)) == p` for every valid value.
//!
//! Five families, mirroring the proposition schema:
//! - atemporal location (`P`, `W`, `S`, `B`, indexed `<x>_<y>`)
//! - perceptual fluents (`Stench` .. `Scream`, indexed `<t>`)
//! - location fluents (`L`, `OK`, indexed `<x>_<y>_<t>`)
//! - state fluents (`Heading*`, `HaveArrow`, `WumpusAlive`, indexed `<t>`)
//! - actions (`Forward` .. `Wait`, indexed `<t>`)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PropError;

/// Time step index.
pub type Time = u32;

/// A grid cell, 1-based in the usual layouts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell one step in the given direction.
    pub fn step(self, heading: Heading) -> Self {
        let (dx, dy) = heading.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    /// The four orthogonal neighbors, regardless of bounds.
    pub fn neighbors(self) -> [Cell; 4] {
        [
            Cell::new(self.x - 1, self.y),
            Cell::new(self.x, self.y - 1),
            Cell::new(self.x + 1, self.y),
            Cell::new(self.x, self.y + 1),
        ]
    }

    /// Whether `other` is the same cell or an orthogonal neighbor.
    pub fn touches(self, other: Cell) -> bool {
        self == other || self.neighbors().contains(&other)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Compass heading of the agent.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Heading {
    North,
    East,
    South,
    West,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::North, Heading::East, Heading::South, Heading::West];

    /// Unit offset of one forward step.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Heading::North => (0, 1),
            Heading::East => (1, 0),
            Heading::South => (0, -1),
            Heading::West => (-1, 0),
        }
    }

    /// Heading after a 90° counterclockwise turn.
    pub fn left(self) -> Self {
        match self {
            Heading::North => Heading::West,
            Heading::West => Heading::South,
            Heading::South => Heading::East,
            Heading::East => Heading::North,
        }
    }

    /// Heading after a 90° clockwise turn.
    pub fn right(self) -> Self {
        match self {
            Heading::North => Heading::East,
            Heading::East => Heading::South,
            Heading::South => Heading::West,
            Heading::West => Heading::North,
        }
    }

    /// Proposition base name, e.g. `HeadingNorth`.
    pub fn base(self) -> &'static str {
        match self {
            Heading::North => "HeadingNorth",
            Heading::East => "HeadingEast",
            Heading::South => "HeadingSouth",
            Heading::West => "HeadingWest",
        }
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Heading::North => write!(f, "north"),
            Heading::East => write!(f, "east"),
            Heading::South => write!(f, "south"),
            Heading::West => write!(f, "west"),
        }
    }
}

impl FromStr for Heading {
    type Err = PropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "north" => Ok(Heading::North),
            "east" => Ok(Heading::East),
            "south" => Ok(Heading::South),
            "west" => Ok(Heading::West),
            _ => Err(PropError::UnknownBase { input: s.into() }),
        }
    }
}

/// An action the agent can execute.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Action {
    Forward,
    TurnLeft,
    TurnRight,
    Grab,
    Shoot,
    Climb,
    Wait,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::Forward,
        Action::Grab,
        Action::Shoot,
        Action::Climb,
        Action::TurnLeft,
        Action::TurnRight,
        Action::Wait,
    ];

    /// Proposition base name, e.g. `TurnLeft`.
    pub fn base(self) -> &'static str {
        match self {
            Action::Forward => "Forward",
            Action::TurnLeft => "TurnLeft",
            Action::TurnRight => "TurnRight",
            Action::Grab => "Grab",
            Action::Shoot => "Shoot",
            Action::Climb => "Climb",
            Action::Wait => "Wait",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base())
    }
}

impl FromStr for Action {
    type Err = PropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.base().eq_ignore_ascii_case(s))
            .ok_or_else(|| PropError::UnknownBase { input: s.into() })
    }
}

/// One of the five percept channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PerceptChannel {
    Stench,
    Breeze,
    Glitter,
    Bump,
    Scream,
}

impl PerceptChannel {
    pub const ALL: [PerceptChannel; 5] = [
        PerceptChannel::Stench,
        PerceptChannel::Breeze,
        PerceptChannel::Glitter,
        PerceptChannel::Bump,
        PerceptChannel::Scream,
    ];

    /// Proposition base name, e.g. `Stench`.
    pub fn base(self) -> &'static str {
        match self {
            PerceptChannel::Stench => "Stench",
            PerceptChannel::Breeze => "Breeze",
            PerceptChannel::Glitter => "Glitter",
            PerceptChannel::Bump => "Bump",
            PerceptChannel::Scream => "Scream",
        }
    }
}

impl fmt::Display for PerceptChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base())
    }
}

/// A full percept vector for one time step, in channel order
/// `(stench, breeze, glitter, bump, scream)`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct Percept {
    pub stench: bool,
    pub breeze: bool,
    pub glitter: bool,
    pub bump: bool,
    pub scream: bool,
}

impl Percept {
    pub fn new(stench: bool, breeze: bool, glitter: bool, bump: bool, scream: bool) -> Self {
        Self {
            stench,
            breeze,
            glitter,
            bump,
            scream,
        }
    }

    /// The channels paired with their observed values, in canonical order.
    pub fn bits(&self) -> [(PerceptChannel, bool); 5] {
        [
            (PerceptChannel::Stench, self.stench),
            (PerceptChannel::Breeze, self.breeze),
            (PerceptChannel::Glitter, self.glitter),
            (PerceptChannel::Bump, self.bump),
            (PerceptChannel::Scream, self.scream),
        ]
    }
}

impl fmt::Display for Percept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let present: Vec<&str> = self
            .bits()
            .iter()
            .filter(|(_, v)| *v)
            .map(|(c, _)| c.base())
            .collect();
        if present.is_empty() {
            write!(f, "[none]")
        } else {
            write!(f, "[{}]", present.join(", "))
        }
    }
}

// ---------------------------------------------------------------------------
// Propositions
// ---------------------------------------------------------------------------

/// The five proposition families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropFamily {
    AtemporalLocation,
    PerceptualFluent,
    LocationFluent,
    StateFluent,
    Action,
}

/// An atomic boolean variable, fully identified by family and indices.
///
/// Identity is structural: two values with identical indices render to
/// byte-identical canonical names, which the KB and the decision-procedure
/// interning rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Prop {
    /// There is a pit at the cell (atemporal).
    Pit(Cell),
    /// The wumpus lairs at the cell (atemporal).
    Wumpus(Cell),
    /// The cell smells (atemporal).
    StenchAt(Cell),
    /// The cell is breezy (atemporal).
    BreezeAt(Cell),
    /// A percept bit was perceived at time t.
    Perceived(PerceptChannel, Time),
    /// The agent occupies the cell at time t.
    At(Cell, Time),
    /// The cell is judged safe at time t.
    LocationOk(Cell, Time),
    /// The agent faces the given direction at time t.
    HeadingIs(Heading, Time),
    /// The agent still carries the arrow at time t.
    HaveArrow(Time),
    /// The wumpus is alive at time t.
    WumpusAlive(Time),
    /// The action was executed at time t.
    Did(Action, Time),
}

impl Prop {
    /// Which family this proposition belongs to.
    pub fn family(&self) -> PropFamily {
        match self {
            Prop::Pit(_) | Prop::Wumpus(_) | Prop::StenchAt(_) | Prop::BreezeAt(_) => {
                PropFamily::AtemporalLocation
            }
            Prop::Perceived(..) => PropFamily::PerceptualFluent,
            Prop::At(..) | Prop::LocationOk(..) => PropFamily::LocationFluent,
            Prop::HeadingIs(..) | Prop::HaveArrow(_) | Prop::WumpusAlive(_) => {
                PropFamily::StateFluent
            }
            Prop::Did(..) => PropFamily::Action,
        }
    }

    /// The cell index, for the spatially-indexed families.
    pub fn cell(&self) -> Option<Cell> {
        match self {
            Prop::Pit(c)
            | Prop::Wumpus(c)
            | Prop::StenchAt(c)
            | Prop::BreezeAt(c)
            | Prop::At(c, _)
            | Prop::LocationOk(c, _) => Some(*c),
            _ => None,
        }
    }

    /// The time index, for the temporal families.
    pub fn time(&self) -> Option<Time> {
        match self {
            Prop::Pit(_) | Prop::Wumpus(_) | Prop::StenchAt(_) | Prop::BreezeAt(_) => None,
            Prop::Perceived(_, t)
            | Prop::At(_, t)
            | Prop::LocationOk(_, t)
            | Prop::HeadingIs(_, t)
            | Prop::HaveArrow(t)
            | Prop::WumpusAlive(t)
            | Prop::Did(_, t) => Some(*t),
        }
    }
}

impl fmt::Display for Prop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prop::Pit(c) => write!(f, "P{}_{}", c.x, c.y),
            Prop::Wumpus(c) => write!(f, "W{}_{}", c.x, c.y),
            Prop::StenchAt(c) => write!(f, "S{}_{}", c.x, c.y),
            Prop::BreezeAt(c) => write!(f, "B{}_{}", c.x, c.y),
            Prop::Perceived(ch, t) => write!(f, "{}{}", ch.base(), t),
            Prop::At(c, t) => write!(f, "L{}_{}_{}", c.x, c.y, t),
            Prop::LocationOk(c, t) => write!(f, "OK{}_{}_{}", c.x, c.y, t),
            Prop::HeadingIs(h, t) => write!(f, "{}{}", h.base(), t),
            Prop::HaveArrow(t) => write!(f, "HaveArrow{}", t),
            Prop::WumpusAlive(t) => write!(f, "WumpusAlive{}", t),
            Prop::Did(a, t) => write!(f, "{}{}", a.base(), t),
        }
    }
}

impl FromStr for Prop {
    type Err = PropError;

    /// Parse a canonical identifier back to its proposition.
    ///
    /// Left inverse of `Display`: the base is the maximal leading run of
    /// ASCII letters, the remainder the underscore-separated indices.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let split = s
            .char_indices()
            .find(|(_, c)| !c.is_ascii_alphabetic())
            .map(|(i, _)| i)
            .unwrap_or(s.len());
        let (base, rest) = s.split_at(split);

        if base.is_empty() {
            return Err(PropError::UnknownBase { input: s.into() });
        }

        match base {
            "P" => Ok(Prop::Pit(parse_cell(s, rest)?)),
            "W" => Ok(Prop::Wumpus(parse_cell(s, rest)?)),
            "S" => Ok(Prop::StenchAt(parse_cell(s, rest)?)),
            "B" => Ok(Prop::BreezeAt(parse_cell(s, rest)?)),
            "L" => {
                let (cell, t) = parse_cell_time(s, rest)?;
                Ok(Prop::At(cell, t))
            }
            "OK" => {
                let (cell, t) = parse_cell_time(s, rest)?;
                Ok(Prop::LocationOk(cell, t))
            }
            "HaveArrow" => Ok(Prop::HaveArrow(parse_time(s, rest)?)),
            "WumpusAlive" => Ok(Prop::WumpusAlive(parse_time(s, rest)?)),
            _ => {
                if let Some(ch) = PerceptChannel::ALL.into_iter().find(|c| c.base() == base) {
                    return Ok(Prop::Perceived(ch, parse_time(s, rest)?));
                }
                if let Some(h) = Heading::ALL.into_iter().find(|h| h.base() == base) {
                    return Ok(Prop::HeadingIs(h, parse_time(s, rest)?));
                }
                if let Some(a) = Action::ALL.into_iter().find(|a| a.base() == base) {
                    return Ok(Prop::Did(a, parse_time(s, rest)?));
                }
                Err(PropError::UnknownBase { input: s.into() })
            }
        }
    }
}

fn parse_cell(input: &str, rest: &str) -> Result<Cell, PropError> {
    let parts: Vec<&str> = rest.split('_').collect();
    if parts.len() != 2 {
        return Err(PropError::MalformedIndices {
            input: input.into(),
            expected: "<x>_<y>",
        });
    }
    let x = parse_i32(input, parts[0], "<x>_<y>")?;
    let y = parse_i32(input, parts[1], "<x>_<y>")?;
    Ok(Cell::new(x, y))
}

fn parse_cell_time(input: &str, rest: &str) -> Result<(Cell, Time), PropError> {
    let parts: Vec<&str> = rest.split('_').collect();
    if parts.len() != 3 {
        return Err(PropError::MalformedIndices {
            input: input.into(),
            expected: "<x>_<y>_<t>",
        });
    }
    let x = parse_i32(input, parts[0], "<x>_<y>_<t>")?;
    let y = parse_i32(input, parts[1], "<x>_<y>_<t>")?;
    let t = parts[2]
        .parse::<Time>()
        .map_err(|_| PropError::MalformedIndices {
            input: input.into(),
            expected: "<x>_<y>_<t>",
        })?;
    Ok((Cell::new(x, y), t))
}

fn parse_time(input: &str, rest: &str) -> Result<Time, PropError> {
    rest.parse::<Time>().map_err(|_| PropError::MalformedIndices {
        input: input.into(),
        expected: "<t>",
    })
}

fn parse_i32(input: &str, part: &str, expected: &'static str) -> Result<i32, PropError> {
    part.parse::<i32>().map_err(|_| PropError::MalformedIndices {
        input: input.into(),
        expected,
    })
}

// ---------------------------------------------------------------------------
// Schema table
// ---------------------------------------------------------------------------

/// The immutable proposition schema: name bases per family.
///
/// Constructed once and shared read-only between the parser, the console
/// tooling, and the exporter, instead of per-module base lists.
#[derive(Debug)]
pub struct PropSchema {
    pub atemporal_location: &'static [&'static str],
    pub perceptual_fluents: &'static [&'static str],
    pub location_fluents: &'static [&'static str],
    pub state_fluents: &'static [&'static str],
    pub actions: &'static [&'static str],
}

/// The global proposition schema.
pub static SCHEMA: PropSchema = PropSchema {
    atemporal_location: &["P", "W", "S", "B"],
    perceptual_fluents: &["Stench", "Breeze", "Glitter", "Bump", "Scream"],
    location_fluents: &["OK", "L"],
    state_fluents: &[
        "HeadingNorth",
        "HeadingEast",
        "HeadingSouth",
        "HeadingWest",
        "HaveArrow",
        "WumpusAlive",
    ],
    actions: &[
        "Forward", "Grab", "Shoot", "Climb", "TurnLeft", "TurnRight", "Wait",
    ],
};

impl PropSchema {
    /// Every base across all families.
    pub fn all_bases(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.atemporal_location
            .iter()
            .chain(self.perceptual_fluents)
            .chain(self.location_fluents)
            .chain(self.state_fluents)
            .chain(self.actions)
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naming_is_deterministic() {
        let a = Prop::At(Cell::new(2, 3), 7);
        let b = Prop::At(Cell::new(2, 3), 7);
        assert_eq!(a.to_string(), b.to_string());
        assert_eq!(a.to_string(), "L2_3_7");
    }

    #[test]
    fn canonical_names_per_family() {
        assert_eq!(Prop::Pit(Cell::new(3, 1)).to_string(), "P3_1");
        assert_eq!(Prop::Wumpus(Cell::new(1, 3)).to_string(), "W1_3");
        assert_eq!(Prop::StenchAt(Cell::new(2, 2)).to_string(), "S2_2");
        assert_eq!(Prop::BreezeAt(Cell::new(2, 1)).to_string(), "B2_1");
        assert_eq!(
            Prop::Perceived(PerceptChannel::Scream, 5).to_string(),
            "Scream5"
        );
        assert_eq!(Prop::LocationOk(Cell::new(3, 1), 2).to_string(), "OK3_1_2");
        assert_eq!(
            Prop::HeadingIs(Heading::North, 7).to_string(),
            "HeadingNorth7"
        );
        assert_eq!(Prop::HaveArrow(0).to_string(), "HaveArrow0");
        assert_eq!(Prop::WumpusAlive(3).to_string(), "WumpusAlive3");
        assert_eq!(Prop::Did(Action::TurnLeft, 0).to_string(), "TurnLeft0");
    }

    #[test]
    fn round_trip_all_families_over_a_grid() {
        let mut props = Vec::new();
        for x in 1..=4 {
            for y in 1..=4 {
                let c = Cell::new(x, y);
                props.extend([
                    Prop::Pit(c),
                    Prop::Wumpus(c),
                    Prop::StenchAt(c),
                    Prop::BreezeAt(c),
                    Prop::At(c, 9),
                    Prop::LocationOk(c, 0),
                ]);
            }
        }
        for ch in PerceptChannel::ALL {
            props.push(Prop::Perceived(ch, 12));
        }
        for h in Heading::ALL {
            props.push(Prop::HeadingIs(h, 3));
        }
        for a in Action::ALL {
            props.push(Prop::Did(a, 1));
        }
        props.extend([Prop::HaveArrow(4), Prop::WumpusAlive(4)]);

        for p in props {
            let name = p.to_string();
            let back: Prop = name.parse().unwrap();
            assert_eq!(back, p, "round trip failed for {name}");
        }
    }

    #[test]
    fn parse_disambiguates_shared_prefixes() {
        // W (atemporal wumpus) vs Wait vs WumpusAlive all start with 'W'.
        assert_eq!("W1_3".parse::<Prop>().unwrap(), Prop::Wumpus(Cell::new(1, 3)));
        assert_eq!("Wait3".parse::<Prop>().unwrap(), Prop::Did(Action::Wait, 3));
        assert_eq!("WumpusAlive3".parse::<Prop>().unwrap(), Prop::WumpusAlive(3));
        // S (atemporal stench) vs Stench (percept) vs Shoot (action).
        assert_eq!("S2_2".parse::<Prop>().unwrap(), Prop::StenchAt(Cell::new(2, 2)));
        assert_eq!(
            "Stench4".parse::<Prop>().unwrap(),
            Prop::Perceived(PerceptChannel::Stench, 4)
        );
        assert_eq!("Shoot0".parse::<Prop>().unwrap(), Prop::Did(Action::Shoot, 0));
    }

    #[test]
    fn parse_rejects_malformed_identifiers() {
        assert!(matches!(
            "Q1_1".parse::<Prop>(),
            Err(PropError::UnknownBase { .. })
        ));
        assert!(matches!(
            "P1".parse::<Prop>(),
            Err(PropError::MalformedIndices { .. })
        ));
        assert!(matches!(
            "L1_1".parse::<Prop>(),
            Err(PropError::MalformedIndices { .. })
        ));
        assert!(matches!(
            "HaveArrow".parse::<Prop>(),
            Err(PropError::MalformedIndices { .. })
        ));
        assert!(matches!(
            "1_1".parse::<Prop>(),
            Err(PropError::UnknownBase { .. })
        ));
    }

    #[test]
    fn heading_rotation() {
        assert_eq!(Heading::North.left(), Heading::West);
        assert_eq!(Heading::North.right(), Heading::East);
        assert_eq!(Heading::East.left(), Heading::North);
        assert_eq!(Heading::West.right(), Heading::North);
        for h in Heading::ALL {
            assert_eq!(h.left().right(), h);
            assert_eq!(h.left().left().left().left(), h);
        }
    }

    #[test]
    fn cell_step_follows_heading() {
        let c = Cell::new(2, 2);
        assert_eq!(c.step(Heading::North), Cell::new(2, 3));
        assert_eq!(c.step(Heading::South), Cell::new(2, 1));
        assert_eq!(c.step(Heading::East), Cell::new(3, 2));
        assert_eq!(c.step(Heading::West), Cell::new(1, 2));
    }

    #[test]
    fn percept_display_lists_active_channels() {
        let p = Percept::new(false, true, false, false, true);
        assert_eq!(p.to_string(), "[Breeze, Scream]");
        assert_eq!(Percept::default().to_string(), "[none]");
    }

    #[test]
    fn schema_covers_every_base() {
        let bases: Vec<&str> = SCHEMA.all_bases().collect();
        assert_eq!(bases.len(), 4 + 5 + 2 + 6 + 7);
        for b in ["P", "Scream", "OK", "WumpusAlive", "TurnRight"] {
            assert!(bases.contains(&b), "missing base {b}");
        }
    }
}
