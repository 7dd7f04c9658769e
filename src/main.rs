//! senet CLI: belief-tracking reasoning engine for grid worlds.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};

use senet::axioms::{self, WorldBounds};
use senet::belief::BeliefEngine;
use senet::cnf::to_clauses;
use senet::export::{write_axioms, write_clauses, BeliefSnapshot};
use senet::prop::{Action, Cell, Heading};
use senet::sentence::Sentence;
use senet::solver::{DecisionProcedure, MiniSatProcess, OtterSolver};
use senet::world::World;

#[derive(Parser)]
#[command(name = "senet", version, about = "Belief-tracking reasoning engine for grid worlds")]
struct Cli {
    /// Use an external MiniSat-compatible binary instead of the embedded solver.
    #[arg(long, global = true)]
    minisat: Option<PathBuf>,

    /// Timeout in seconds for external solver runs.
    #[arg(long, global = true, default_value = "30")]
    solver_timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the classic 4x4 scenario, printing the belief state per step.
    Run {
        /// Comma-separated action script (e.g. "TurnRight,Forward,Grab").
        #[arg(long)]
        actions: Option<String>,

        /// Print each step's belief state as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Print the initial axiom bundle for a grid, one sentence per line.
    Axioms {
        #[arg(long, default_value = "4")]
        width: i32,

        #[arg(long, default_value = "4")]
        height: i32,

        /// Entrance cell as "x,y".
        #[arg(long, default_value = "1,1")]
        entrance: String,

        /// Initial heading: north, east, south, or west.
        #[arg(long, default_value = "north")]
        heading: String,
    },

    /// Probe the decision procedure with canned SAT/UNSAT formulas.
    Probe,

    /// Run the demo scenario, then export diagnostics.
    Export {
        /// What to export.
        #[arg(value_enum)]
        target: ExportTarget,

        /// Output file; stdout if omitted.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportTarget {
    /// The axiom log, one sentence per line.
    Axioms,
    /// The clause set, one clause per line.
    Clauses,
    /// A JSON belief snapshot with the per-cell safety sweep.
    Snapshot,
}

/// Action script that walks the classic layout to the gold and grabs it.
const DEMO_SCRIPT: &[Action] = &[
    Action::TurnRight,
    Action::Forward,
    Action::TurnLeft,
    Action::Forward,
    Action::Forward,
    Action::Grab,
];

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let solver = make_solver(&cli);

    match cli.command {
        Commands::Run { actions, json } => {
            let script = match actions {
                Some(ref list) => parse_script(list)?,
                None => DEMO_SCRIPT.to_vec(),
            };
            run_scenario(solver, &script, json)?;
        }

        Commands::Axioms {
            width,
            height,
            entrance,
            heading,
        } => {
            let bounds = WorldBounds::grid(width, height)?;
            let entrance = parse_cell(&entrance)?;
            let heading: Heading = heading.parse().map_err(senet::error::SenetError::from)?;
            for axiom in axioms::initial_axioms(entrance, heading, &bounds)? {
                println!("{axiom}");
            }
        }

        Commands::Probe => probe_solver(solver.as_ref())?,

        Commands::Export { target, out } => {
            let engine = run_demo_quietly(solver)?;
            let mut buffer: Vec<u8> = Vec::new();
            match target {
                ExportTarget::Axioms => write_axioms(engine.kb(), &mut buffer).into_diagnostic()?,
                ExportTarget::Clauses => {
                    write_clauses(engine.kb(), &mut buffer).into_diagnostic()?
                }
                ExportTarget::Snapshot => {
                    let snapshot = BeliefSnapshot::capture(&engine)?;
                    buffer = serde_json::to_vec_pretty(&snapshot).into_diagnostic()?;
                    buffer.push(b'\n');
                }
            }
            match out {
                Some(path) => {
                    std::fs::write(&path, &buffer).into_diagnostic()?;
                    println!("Exported to {}", path.display());
                }
                None => print!("{}", String::from_utf8_lossy(&buffer)),
            }
        }
    }

    Ok(())
}

fn make_solver(cli: &Cli) -> Box<dyn DecisionProcedure> {
    match &cli.minisat {
        Some(binary) => Box::new(
            MiniSatProcess::new(binary).with_timeout(Duration::from_secs(cli.solver_timeout)),
        ),
        None => Box::new(OtterSolver::new()),
    }
}

fn parse_script(list: &str) -> Result<Vec<Action>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<Action>()
                .map_err(|e| senet::error::SenetError::from(e).into())
        })
        .collect()
}

fn parse_cell(text: &str) -> Result<Cell> {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    if parts.len() == 2 {
        if let (Ok(x), Ok(y)) = (parts[0].parse(), parts[1].parse()) {
            return Ok(Cell::new(x, y));
        }
    }
    miette::bail!("entrance must be \"x,y\", got \"{text}\"");
}

fn run_scenario(solver: Box<dyn DecisionProcedure>, script: &[Action], json: bool) -> Result<()> {
    let mut world = World::classic();
    let mut engine = BeliefEngine::new(
        world.bounds(),
        world.entrance(),
        world.agent_heading(),
        solver,
    )?;

    for &action in script {
        let percept = world.percept();
        let belief = engine.observe(&percept)?;

        if json {
            println!(
                "{}",
                serde_json::to_string(&belief).into_diagnostic()?
            );
        } else {
            println!(
                "[t={}] perceive {}  believe at {} facing {}  -> {}",
                belief.time, percept, belief.location, belief.heading, action
            );
        }

        engine.act(action);
        world.apply(action);

        if world.is_finished() {
            break;
        }
    }

    if !json {
        println!(
            "Episode over: agent {} gold={} wumpus_alive={} ({} axioms, {} clauses)",
            if world.agent_alive() { "alive" } else { "dead" },
            world.has_gold(),
            world.wumpus_alive(),
            engine.kb().axiom_count(),
            engine.kb().clause_count(),
        );
    }
    Ok(())
}

/// Run the demo script without printing, returning the engine for export.
fn run_demo_quietly(solver: Box<dyn DecisionProcedure>) -> Result<BeliefEngine> {
    let mut world = World::classic();
    let mut engine = BeliefEngine::new(
        world.bounds(),
        world.entrance(),
        world.agent_heading(),
        solver,
    )?;
    for &action in DEMO_SCRIPT {
        engine.observe(&world.percept())?;
        engine.act(action);
        world.apply(action);
        if world.is_finished() {
            break;
        }
    }
    Ok(engine)
}

/// Canned connection test: decide known-SAT and known-UNSAT formulas.
fn probe_solver(solver: &dyn DecisionProcedure) -> Result<()> {
    let checks: &[(&str, bool)] = &[
        ("P1_1 | ~P1_1", true),
        ("P1_1 & ~P1_1", false),
        (
            "(P1_1 | P2_1) <=> (~(W1_1 | P2_1) & (P2_1 >> ~(S1_1 <=> B1_1)))",
            true,
        ),
    ];

    println!("Probing decision procedure \"{}\":", solver.name());
    let mut failures = 0;
    for (text, expected) in checks {
        let sentence = Sentence::parse_text(text).map_err(senet::error::SenetError::from)?;
        let clauses = to_clauses(&sentence);
        let verdict = solver
            .solve(&clauses, None)
            .map_err(senet::error::SenetError::from)?;
        let ok = verdict.satisfiable == *expected;
        if !ok {
            failures += 1;
        }
        println!(
            "  {} \"{}\" -> {} (expected {})",
            if ok { "PASS" } else { "FAIL" },
            text,
            if verdict.satisfiable { "SAT" } else { "UNSAT" },
            if *expected { "SAT" } else { "UNSAT" },
        );
        if let Some(assignment) = verdict.assignment {
            let mut vars: Vec<_> = assignment.into_iter().collect();
            vars.sort();
            let rendered: Vec<String> =
                vars.into_iter().map(|(k, v)| format!("{k}={v}")).collect();
            println!("       assignment: {}", rendered.join(" "));
        }
    }

    if failures > 0 {
        miette::bail!("{failures} probe check(s) failed");
    }
    println!("All probe checks passed.");
    Ok(())
}
