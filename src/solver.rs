//! Decision procedure boundary: black-box satisfiability checking.
//!
//! The KB never reasons about clauses itself; it hands a clause set (plus an
//! optional assumed literal) across [`DecisionProcedure`] and gets back a
//! [`Verdict`]: satisfiable or not, with a variable assignment on SAT.
//! Proposition names are the only stringly-typed surface, and they exist
//! solely at this serialization boundary.
//!
//! Two backends:
//! - [`OtterSolver`] embeds the `otter_sat` CDCL solver in-process; a fresh
//!   context is built per invocation, so each call is a scoped acquisition.
//! - [`MiniSatProcess`] spawns an external MiniSat-compatible binary over
//!   DIMACS files, with a poll-and-kill timeout. Temp files and the child
//!   process are released on every exit path.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use otter_sat::config::Config;
use otter_sat::context::Context;
use otter_sat::reports::Report;
use otter_sat::structures::atom::Atom;
use otter_sat::structures::literal::{CLiteral, Literal as _};

use crate::cnf::{Clause, Literal};
use crate::error::SolverError;

/// Outcome of one satisfiability query.
#[derive(Debug, Clone)]
pub struct Verdict {
    pub satisfiable: bool,
    /// Proposition name → value, present iff satisfiable.
    pub assignment: Option<HashMap<String, bool>>,
}

impl Verdict {
    fn unsat() -> Self {
        Self {
            satisfiable: false,
            assignment: None,
        }
    }
}

/// A blocking black-box satisfiability check.
pub trait DecisionProcedure {
    /// Decide `clauses` (optionally under one assumed literal).
    fn solve(
        &self,
        clauses: &[Clause],
        assumption: Option<Literal>,
    ) -> Result<Verdict, SolverError>;

    /// Short backend label for logging.
    fn name(&self) -> &'static str;
}

/// Run a query, retrying once if the backend itself failed (not the
/// formula). A second failure is fatal for the step.
pub fn solve_with_retry(
    procedure: &dyn DecisionProcedure,
    clauses: &[Clause],
    assumption: Option<Literal>,
) -> Result<Verdict, SolverError> {
    match procedure.solve(clauses, assumption) {
        Err(err @ (SolverError::Unavailable { .. } | SolverError::Crashed { .. })) => {
            tracing::warn!(backend = procedure.name(), error = %err, "solver failed, retrying once");
            procedure.solve(clauses, assumption)
        }
        other => other,
    }
}

// ---------------------------------------------------------------------------
// In-process backend
// ---------------------------------------------------------------------------

/// In-process CDCL backend over `otter_sat`.
///
/// Builds a fresh solving context per invocation: proposition names are
/// interned to fresh atoms, clauses added, and on SAT the canonical
/// valuation is read back into a name → bool map.
#[derive(Debug, Clone, Copy, Default)]
pub struct OtterSolver;

impl OtterSolver {
    pub fn new() -> Self {
        Self
    }
}

impl DecisionProcedure for OtterSolver {
    fn solve(
        &self,
        clauses: &[Clause],
        assumption: Option<Literal>,
    ) -> Result<Verdict, SolverError> {
        if clauses.iter().any(Clause::is_empty) {
            return Ok(Verdict::unsat());
        }

        let mut context: Context = Context::from_config(Config::default());
        // Atom 0 is unused in the solver's valuation; keep names aligned.
        let mut atom_of: HashMap<String, Atom> = HashMap::new();
        let mut name_of: Vec<String> = vec![String::new()];

        let intern =
            |context: &mut Context,
             atom_of: &mut HashMap<String, Atom>,
             name_of: &mut Vec<String>,
             lit: &Literal|
             -> Result<CLiteral, SolverError> {
                let name = lit.prop.to_string();
                let atom = match atom_of.get(&name) {
                    Some(atom) => *atom,
                    None => {
                        let atom = context.fresh_atom().map_err(|e| SolverError::Backend {
                            message: format!("fresh_atom failed: {e:?}"),
                        })?;
                        atom_of.insert(name.clone(), atom);
                        name_of.push(name);
                        atom
                    }
                };
                Ok(CLiteral::new(atom, !lit.negated))
            };

        for clause in clauses {
            let mut lits = Vec::with_capacity(clause.len());
            for lit in clause.literals() {
                lits.push(intern(&mut context, &mut atom_of, &mut name_of, lit)?);
            }
            if context.add_clause(lits).is_err() {
                // The context already derived a contradiction.
                return Ok(Verdict::unsat());
            }
        }

        if let Some(assumed) = assumption {
            let lit = intern(&mut context, &mut atom_of, &mut name_of, &assumed)?;
            if context.add_clause(vec![lit]).is_err() {
                return Ok(Verdict::unsat());
            }
        }

        context.solve().map_err(|e| SolverError::Backend {
            message: format!("solve failed: {e:?}"),
        })?;

        match context.report() {
            Report::Satisfiable => {
                let mut assignment = HashMap::with_capacity(name_of.len());
                for (index, value) in context
                    .atom_db
                    .valuation_canonical()
                    .iter()
                    .enumerate()
                    .skip(1)
                {
                    if let (Some(v), Some(name)) = (value, name_of.get(index)) {
                        assignment.insert(name.clone(), *v);
                    }
                }
                Ok(Verdict {
                    satisfiable: true,
                    assignment: Some(assignment),
                })
            }
            Report::Unsatisfiable => Ok(Verdict::unsat()),
            other => Err(SolverError::Backend {
                message: format!("unexpected solve report: {other:?}"),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "otter_sat"
    }
}

// ---------------------------------------------------------------------------
// External-process backend
// ---------------------------------------------------------------------------

/// Default wall-clock budget for one external solver run.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Poll interval while waiting on the child process.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// External MiniSat-compatible process over DIMACS files.
///
/// One invocation = one temp dir (problem + result file) + one child
/// process. The child is killed if it outlives the timeout; the temp dir is
/// removed when the call returns, success or not.
#[derive(Debug, Clone)]
pub struct MiniSatProcess {
    binary: PathBuf,
    timeout: Duration,
}

impl MiniSatProcess {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for MiniSatProcess {
    fn default() -> Self {
        Self::new("minisat")
    }
}

impl DecisionProcedure for MiniSatProcess {
    fn solve(
        &self,
        clauses: &[Clause],
        assumption: Option<Literal>,
    ) -> Result<Verdict, SolverError> {
        if clauses.iter().any(Clause::is_empty) {
            return Ok(Verdict::unsat());
        }

        let binary = self.binary.display().to_string();
        let interner = VarInterner::build(clauses, assumption.as_ref());
        let dimacs = encode_dimacs(clauses, assumption.as_ref(), &interner);

        let dir = tempfile::tempdir().map_err(|e| SolverError::Unavailable {
            binary: binary.clone(),
            message: format!("failed to create temp dir: {e}"),
        })?;
        let problem = dir.path().join("problem.cnf");
        let result = dir.path().join("result.out");
        std::fs::write(&problem, dimacs).map_err(|e| SolverError::Unavailable {
            binary: binary.clone(),
            message: format!("failed to write DIMACS file: {e}"),
        })?;

        let mut child = Command::new(&self.binary)
            .arg(&problem)
            .arg(&result)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| SolverError::Unavailable {
                binary: binary.clone(),
                message: e.to_string(),
            })?;

        let started = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if started.elapsed() > self.timeout {
                        child.kill().ok();
                        child.wait().ok();
                        return Err(SolverError::Timeout {
                            timeout_secs: self.timeout.as_secs(),
                        });
                    }
                    std::thread::sleep(POLL_INTERVAL);
                }
                Err(e) => {
                    return Err(SolverError::Crashed {
                        status: format!("wait failed: {e}"),
                    });
                }
            }
        };

        // MiniSat exits 10 on SAT and 20 on UNSAT; anything else is abnormal.
        match status.code() {
            Some(10) | Some(20) => {}
            _ => {
                return Err(SolverError::Crashed {
                    status: status.to_string(),
                });
            }
        }

        let output = std::fs::read_to_string(&result).map_err(|e| SolverError::BadOutput {
            message: format!("failed to read result file: {e}"),
        })?;
        parse_minisat_output(&output, &interner)
    }

    fn name(&self) -> &'static str {
        "minisat"
    }
}

/// Deterministic proposition-name ↔ DIMACS-variable mapping for one query.
#[derive(Debug)]
struct VarInterner {
    index_of: BTreeMap<String, usize>,
    name_of: Vec<String>,
}

impl VarInterner {
    fn build(clauses: &[Clause], assumption: Option<&Literal>) -> Self {
        let mut index_of = BTreeMap::new();
        for clause in clauses {
            for lit in clause.literals() {
                index_of.entry(lit.prop.to_string()).or_insert(0);
            }
        }
        if let Some(lit) = assumption {
            index_of.entry(lit.prop.to_string()).or_insert(0);
        }
        let mut name_of = vec![String::new()];
        for (i, (name, index)) in index_of.iter_mut().enumerate() {
            *index = i + 1;
            name_of.push(name.clone());
        }
        Self { index_of, name_of }
    }

    fn index(&self, lit: &Literal) -> usize {
        self.index_of[&lit.prop.to_string()]
    }

    fn var_count(&self) -> usize {
        self.name_of.len() - 1
    }
}

/// Render a clause set in DIMACS CNF format.
fn encode_dimacs(
    clauses: &[Clause],
    assumption: Option<&Literal>,
    interner: &VarInterner,
) -> String {
    let clause_count = clauses.len() + usize::from(assumption.is_some());
    let mut out = format!("p cnf {} {}\n", interner.var_count(), clause_count);
    for clause in clauses {
        for lit in clause.literals() {
            let var = interner.index(lit) as i64;
            let signed = if lit.negated { -var } else { var };
            out.push_str(&signed.to_string());
            out.push(' ');
        }
        out.push_str("0\n");
    }
    if let Some(lit) = assumption {
        let var = interner.index(lit) as i64;
        let signed = if lit.negated { -var } else { var };
        out.push_str(&format!("{signed} 0\n"));
    }
    out
}

/// Parse the MiniSat result file: `SAT` plus an assignment line, or `UNSAT`.
fn parse_minisat_output(output: &str, interner: &VarInterner) -> Result<Verdict, SolverError> {
    let mut lines = output.lines();
    match lines.next().map(str::trim) {
        Some("UNSAT") => Ok(Verdict::unsat()),
        Some("SAT") => {
            let assignment_line = lines.next().unwrap_or("");
            let mut assignment = HashMap::new();
            for token in assignment_line.split_whitespace() {
                let value: i64 = token.parse().map_err(|_| SolverError::BadOutput {
                    message: format!("bad assignment token \"{token}\""),
                })?;
                if value == 0 {
                    break;
                }
                let index = value.unsigned_abs() as usize;
                let name = interner
                    .name_of
                    .get(index)
                    .ok_or_else(|| SolverError::BadOutput {
                        message: format!("assignment references unknown variable {index}"),
                    })?;
                assignment.insert(name.clone(), value > 0);
            }
            Ok(Verdict {
                satisfiable: true,
                assignment: Some(assignment),
            })
        }
        other => Err(SolverError::BadOutput {
            message: format!("unexpected result header {other:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cnf::to_clauses;
    use crate::sentence::Sentence;

    fn clauses(text: &str) -> Vec<Clause> {
        to_clauses(&Sentence::parse_text(text).unwrap())
    }

    fn lit(text: &str) -> Literal {
        match text.strip_prefix('~') {
            Some(name) => Literal::neg(name.parse().unwrap()),
            None => Literal::pos(text.parse().unwrap()),
        }
    }

    #[test]
    fn otter_decides_satisfiable_units() {
        let verdict = OtterSolver::new()
            .solve(&clauses("P1_1 & ~P2_2"), None)
            .unwrap();
        assert!(verdict.satisfiable);
        let assignment = verdict.assignment.unwrap();
        assert_eq!(assignment.get("P1_1"), Some(&true));
        assert_eq!(assignment.get("P2_2"), Some(&false));
    }

    #[test]
    fn otter_decides_contradiction_unsat() {
        let mut cs = clauses("P1_1");
        cs.extend(clauses("~P1_1"));
        let verdict = OtterSolver::new().solve(&cs, None).unwrap();
        assert!(!verdict.satisfiable);
        assert!(verdict.assignment.is_none());
    }

    #[test]
    fn otter_respects_assumption() {
        let cs = clauses("P1_1 | P2_2");
        let verdict = OtterSolver::new().solve(&cs, Some(lit("~P1_1"))).unwrap();
        assert!(verdict.satisfiable);
        let assignment = verdict.assignment.unwrap();
        assert_eq!(assignment.get("P1_1"), Some(&false));
        assert_eq!(assignment.get("P2_2"), Some(&true));

        let mut cs = clauses("P1_1 | P2_2");
        cs.extend(clauses("~P2_2"));
        let verdict = OtterSolver::new().solve(&cs, Some(lit("~P1_1"))).unwrap();
        assert!(!verdict.satisfiable);
    }

    #[test]
    fn otter_tautology_free_formula_roundtrip() {
        // The original solver connection test, over schema propositions.
        let sat = clauses("P1_1 | ~P1_1");
        assert!(OtterSolver::new().solve(&sat, None).unwrap().satisfiable);

        let mut unsat = clauses("P1_1");
        unsat.extend(clauses("~P1_1 | P2_2"));
        unsat.extend(clauses("~P2_2"));
        assert!(!OtterSolver::new().solve(&unsat, None).unwrap().satisfiable);
    }

    #[test]
    fn empty_clause_short_circuits_unsat() {
        let cs = vec![Clause::new(Vec::new())];
        assert!(!OtterSolver::new().solve(&cs, None).unwrap().satisfiable);
        let minisat = MiniSatProcess::default();
        assert!(!minisat.solve(&cs, None).unwrap().satisfiable);
    }

    #[test]
    fn dimacs_encoding_is_deterministic() {
        let cs = clauses("(P1_1 | ~P2_2) & P1_2");
        let interner = VarInterner::build(&cs, None);
        // BTreeMap ordering: P1_1 < P1_2 < P2_2.
        assert_eq!(interner.index_of["P1_1"], 1);
        assert_eq!(interner.index_of["P1_2"], 2);
        assert_eq!(interner.index_of["P2_2"], 3);
        let dimacs = encode_dimacs(&cs, None, &interner);
        assert!(dimacs.starts_with("p cnf 3 2\n"));
        assert!(dimacs.contains("2 0\n"));
    }

    #[test]
    fn minisat_output_parsing() {
        let cs = clauses("P1_1 | ~P2_2");
        let interner = VarInterner::build(&cs, None);

        let verdict = parse_minisat_output("SAT\n1 -2 0\n", &interner).unwrap();
        assert!(verdict.satisfiable);
        let assignment = verdict.assignment.unwrap();
        assert_eq!(assignment.get("P1_1"), Some(&true));
        assert_eq!(assignment.get("P2_2"), Some(&false));

        let verdict = parse_minisat_output("UNSAT\n", &interner).unwrap();
        assert!(!verdict.satisfiable);

        assert!(matches!(
            parse_minisat_output("banana\n", &interner),
            Err(SolverError::BadOutput { .. })
        ));
        assert!(matches!(
            parse_minisat_output("SAT\n1 -9 0\n", &interner),
            Err(SolverError::BadOutput { .. })
        ));
    }

    #[test]
    fn missing_binary_reports_unavailable() {
        let solver = MiniSatProcess::new("/nonexistent/senet-minisat-test");
        let err = solver.solve(&clauses("P1_1"), None).unwrap_err();
        assert!(matches!(err, SolverError::Unavailable { .. }));
    }

    #[test]
    fn retry_helper_passes_through_success() {
        let verdict = solve_with_retry(&OtterSolver::new(), &clauses("P1_1"), None).unwrap();
        assert!(verdict.satisfiable);
    }
}
