//! Diagnostics export: flat-text KB dumps and JSON snapshot types.
//!
//! The axiom-log and clause-set dumps are one entry per line, consumed by
//! offline tooling only; the engine never reads them back. The snapshot
//! types are serde-serializable summaries for JSON export from the CLI.

use std::io;

use serde::Serialize;

use crate::belief::BeliefEngine;
use crate::error::SenetResult;
use crate::kb::KnowledgeBase;

/// Write the axiom log, one sentence per line.
pub fn write_axioms(kb: &KnowledgeBase, out: &mut impl io::Write) -> io::Result<()> {
    for axiom in kb.axioms() {
        writeln!(out, "{axiom}")?;
    }
    Ok(())
}

/// Write the clause set, one clause per line.
pub fn write_clauses(kb: &KnowledgeBase, out: &mut impl io::Write) -> io::Result<()> {
    for clause in kb.clauses() {
        writeln!(out, "{clause}")?;
    }
    Ok(())
}

/// Safety verdict for one cell, label-resolved for export.
#[derive(Debug, Clone, Serialize)]
pub struct SafeCellExport {
    pub x: i32,
    pub y: i32,
    pub verdict: String,
}

/// Point-in-time summary of the belief engine, suitable for JSON export.
#[derive(Debug, Clone, Serialize)]
pub struct BeliefSnapshot {
    /// The engine's current time index.
    pub time: u32,
    /// Believed pose from the last observation, if one happened.
    pub location: Option<(i32, i32)>,
    pub heading: Option<String>,
    pub axiom_count: usize,
    pub clause_count: usize,
    pub safe_cells: Vec<SafeCellExport>,
}

impl BeliefSnapshot {
    /// Capture the engine's current belief state, including the per-cell
    /// safety sweep.
    pub fn capture(engine: &BeliefEngine) -> SenetResult<Self> {
        let safe_cells = engine
            .safe_cells()?
            .into_iter()
            .map(|(cell, verdict)| SafeCellExport {
                x: cell.x,
                y: cell.y,
                verdict: verdict.to_string(),
            })
            .collect();
        Ok(Self {
            time: engine.time(),
            location: engine.belief().map(|b| (b.location.x, b.location.y)),
            heading: engine.belief().map(|b| b.heading.to_string()),
            axiom_count: engine.kb().axiom_count(),
            clause_count: engine.kb().clause_count(),
            safe_cells,
        })
    }
}
