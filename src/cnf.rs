//! Conjunctive normal form: literals, clauses, and sentence flattening.
//!
//! The KB's durable representation. Conversion is the textbook pipeline
//! (implication/biconditional elimination, negation normal form, then
//! distribution of disjunction over conjunction) with no clause-count
//! optimization beyond dropping tautologies and duplicate literals.
//! Biconditionals are split into their two implications before NNF, which
//! keeps the distribution step from squaring the operand lists.

use std::fmt;

use crate::prop::Prop;
use crate::sentence::Sentence;

/// A proposition or its negation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    pub prop: Prop,
    pub negated: bool,
}

impl Literal {
    pub fn pos(prop: Prop) -> Self {
        Self {
            prop,
            negated: false,
        }
    }

    pub fn neg(prop: Prop) -> Self {
        Self {
            prop,
            negated: true,
        }
    }

    /// The same proposition with flipped polarity.
    pub fn complement(self) -> Self {
        Self {
            prop: self.prop,
            negated: !self.negated,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "~{}", self.prop)
        } else {
            write!(f, "{}", self.prop)
        }
    }
}

/// A disjunction of literals, deduplicated and kept in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Clause {
    literals: Vec<Literal>,
}

impl Clause {
    /// Build a clause, collapsing duplicate literals.
    pub fn new(mut literals: Vec<Literal>) -> Self {
        literals.sort_unstable();
        literals.dedup();
        Self { literals }
    }

    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Whether the clause contains some proposition in both polarities.
    pub fn is_tautology(&self) -> bool {
        // Literals are sorted with polarity as the final key, so a
        // complementary pair is adjacent.
        self.literals
            .windows(2)
            .any(|w| w[0].prop == w[1].prop && w[0].negated != w[1].negated)
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, lit) in self.literals.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{lit}")?;
        }
        Ok(())
    }
}

/// Flatten a sentence into CNF clauses.
///
/// Tautological clauses are dropped; the result may therefore be empty for
/// sentences that are valid (true under every assignment).
pub fn to_clauses(sentence: &Sentence) -> Vec<Clause> {
    let nnf = nnf(sentence, false);
    let mut clauses: Vec<Clause> = distribute(&nnf)
        .into_iter()
        .map(Clause::new)
        .filter(|c| !c.is_tautology())
        .collect();
    clauses.dedup();
    clauses
}

/// Push negations to the atoms, eliminating `>>` and `<=>` on the way.
///
/// `negate` tracks whether the current subtree is under an odd number of
/// negations. Biconditionals become implication pairs, which distribute
/// far better than the disjunctive (`(a & b) | (~a & ~b)`) form.
fn nnf(sentence: &Sentence, negate: bool) -> Sentence {
    match sentence {
        Sentence::Atom(p) => {
            if negate {
                Sentence::neg(*p)
            } else {
                Sentence::atom(*p)
            }
        }
        Sentence::Not(inner) => nnf(inner, !negate),
        Sentence::And(operands) => {
            let children: Vec<Sentence> = operands.iter().map(|s| nnf(s, negate)).collect();
            if negate {
                Sentence::or(children)
            } else {
                Sentence::and(children)
            }
        }
        Sentence::Or(operands) => {
            let children: Vec<Sentence> = operands.iter().map(|s| nnf(s, negate)).collect();
            if negate {
                Sentence::and(children)
            } else {
                Sentence::or(children)
            }
        }
        Sentence::Implies(a, c) => {
            if negate {
                // ~(a >> c)  ==  a & ~c
                Sentence::and([nnf(a, false), nnf(c, true)])
            } else {
                // a >> c  ==  ~a | c
                Sentence::or([nnf(a, true), nnf(c, false)])
            }
        }
        Sentence::Iff(l, r) => {
            if negate {
                // ~(l <=> r)  ==  (l | r) & (~l | ~r)
                Sentence::and([
                    Sentence::or([nnf(l, false), nnf(r, false)]),
                    Sentence::or([nnf(l, true), nnf(r, true)]),
                ])
            } else {
                // l <=> r  ==  (~l | r) & (l | ~r)
                Sentence::and([
                    Sentence::or([nnf(l, true), nnf(r, false)]),
                    Sentence::or([nnf(l, false), nnf(r, true)]),
                ])
            }
        }
    }
}

/// Distribute disjunction over conjunction on an NNF tree.
///
/// Returns the clause matrix as raw literal lists; callers normalize.
fn distribute(sentence: &Sentence) -> Vec<Vec<Literal>> {
    match sentence {
        Sentence::Atom(p) => vec![vec![Literal::pos(*p)]],
        Sentence::Not(inner) => match inner.as_ref() {
            Sentence::Atom(p) => vec![vec![Literal::neg(*p)]],
            other => unreachable!("negation above non-atom in NNF: {other}"),
        },
        Sentence::And(operands) => operands.iter().flat_map(distribute).collect(),
        Sentence::Or(operands) => {
            let mut acc: Vec<Vec<Literal>> = vec![Vec::new()];
            for operand in operands {
                let child = distribute(operand);
                let mut next = Vec::with_capacity(acc.len() * child.len());
                for left in &acc {
                    for right in &child {
                        let mut merged = left.clone();
                        merged.extend(right.iter().copied());
                        next.push(merged);
                    }
                }
                acc = next;
            }
            acc
        }
        other => unreachable!("connective survived NNF: {other}"),
    }
}
