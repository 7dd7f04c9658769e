//! Propositional sentences: AST, concrete syntax, and parser.
//!
//! A [`Sentence`] is a transient formula over [`Prop`] atoms built from
//! negation, conjunction, disjunction, implication, and biconditional.
//! `Display` renders the concrete syntax (`~`, `&`, `|`, `>>`, `<=>`,
//! parentheses) and [`Sentence::parse_text`] validates and round-trips it.
//! Sentences live only until the KB flattens them to clauses.
//!
//! Operator precedence, loosest to tightest: `<=>`, `>>`, `|`, `&`, `~`.
//! `>>` and `<=>` associate to the right.

use std::fmt;

use crate::error::SentenceError;
use crate::prop::Prop;

/// A propositional formula over [`Prop`] atoms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sentence {
    Atom(Prop),
    Not(Box<Sentence>),
    And(Vec<Sentence>),
    Or(Vec<Sentence>),
    Implies(Box<Sentence>, Box<Sentence>),
    Iff(Box<Sentence>, Box<Sentence>),
}

impl Sentence {
    pub fn atom(prop: Prop) -> Self {
        Sentence::Atom(prop)
    }

    pub fn not(inner: Sentence) -> Self {
        Sentence::Not(Box::new(inner))
    }

    /// Negated atom shorthand.
    pub fn neg(prop: Prop) -> Self {
        Sentence::not(Sentence::atom(prop))
    }

    /// N-ary conjunction. Singleton collapses to its only operand.
    ///
    /// The operand list must be non-empty: an empty conjunction has no
    /// truth-constant representation here, and no generator produces one.
    pub fn and(operands: impl IntoIterator<Item = Sentence>) -> Self {
        let mut v: Vec<Sentence> = operands.into_iter().collect();
        debug_assert!(!v.is_empty(), "empty conjunction");
        if v.len() == 1 {
            v.remove(0)
        } else {
            Sentence::And(v)
        }
    }

    /// N-ary disjunction. Singleton collapses to its only operand.
    pub fn or(operands: impl IntoIterator<Item = Sentence>) -> Self {
        let mut v: Vec<Sentence> = operands.into_iter().collect();
        debug_assert!(!v.is_empty(), "empty disjunction");
        if v.len() == 1 {
            v.remove(0)
        } else {
            Sentence::Or(v)
        }
    }

    pub fn implies(antecedent: Sentence, consequent: Sentence) -> Self {
        Sentence::Implies(Box::new(antecedent), Box::new(consequent))
    }

    pub fn iff(lhs: Sentence, rhs: Sentence) -> Self {
        Sentence::Iff(Box::new(lhs), Box::new(rhs))
    }

    /// Parse the concrete syntax into an AST.
    pub fn parse_text(input: &str) -> Result<Sentence, SentenceError> {
        let tokens = lex(input)?;
        let mut parser = Parser { tokens, pos: 0 };
        let sentence = parser.parse_iff()?;
        if let Some((_, at)) = parser.peek() {
            return Err(SentenceError::TrailingInput { at });
        }
        Ok(sentence)
    }

    /// Binding strength used by `Display` for minimal parenthesization.
    fn precedence(&self) -> u8 {
        match self {
            Sentence::Iff(..) => 1,
            Sentence::Implies(..) => 2,
            Sentence::Or(_) => 3,
            Sentence::And(_) => 4,
            Sentence::Not(_) => 5,
            Sentence::Atom(_) => 6,
        }
    }
}

impl From<Prop> for Sentence {
    fn from(prop: Prop) -> Self {
        Sentence::Atom(prop)
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_child(
            f: &mut fmt::Formatter<'_>,
            child: &Sentence,
            min_prec: u8,
        ) -> fmt::Result {
            if child.precedence() < min_prec {
                write!(f, "({child})")
            } else {
                write!(f, "{child}")
            }
        }

        match self {
            Sentence::Atom(p) => write!(f, "{p}"),
            Sentence::Not(inner) => {
                write!(f, "~")?;
                write_child(f, inner, 5)
            }
            Sentence::And(operands) => {
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        write!(f, " & ")?;
                    }
                    write_child(f, operand, 4)?;
                }
                Ok(())
            }
            Sentence::Or(operands) => {
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write_child(f, operand, 3)?;
                }
                Ok(())
            }
            Sentence::Implies(a, c) => {
                // Left operand needs strictly tighter binding: >> is right-associative.
                write_child(f, a, 3)?;
                write!(f, " >> ")?;
                write_child(f, c, 2)
            }
            Sentence::Iff(l, r) => {
                write_child(f, l, 2)?;
                write!(f, " <=> ")?;
                write_child(f, r, 1)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Lexer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Tilde,
    Amp,
    Pipe,
    Arrow,
    Iff,
    LParen,
    RParen,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Ident(s) => s.clone(),
            Token::Tilde => "~".into(),
            Token::Amp => "&".into(),
            Token::Pipe => "|".into(),
            Token::Arrow => ">>".into(),
            Token::Iff => "<=>".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),
        }
    }
}

fn lex(input: &str) -> Result<Vec<(Token, usize)>, SentenceError> {
    let mut tokens = Vec::new();
    let bytes = input.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i] as char;
        match c {
            ' ' | '\t' | '\n' | '\r' => i += 1,
            '~' => {
                tokens.push((Token::Tilde, i));
                i += 1;
            }
            '&' => {
                tokens.push((Token::Amp, i));
                i += 1;
            }
            '|' => {
                tokens.push((Token::Pipe, i));
                i += 1;
            }
            '(' => {
                tokens.push((Token::LParen, i));
                i += 1;
            }
            ')' => {
                tokens.push((Token::RParen, i));
                i += 1;
            }
            '>' => {
                if bytes.get(i + 1) == Some(&b'>') {
                    tokens.push((Token::Arrow, i));
                    i += 2;
                } else {
                    return Err(SentenceError::UnexpectedChar { found: '>', at: i });
                }
            }
            '<' => {
                if bytes.get(i + 1) == Some(&b'=') && bytes.get(i + 2) == Some(&b'>') {
                    tokens.push((Token::Iff, i));
                    i += 3;
                } else {
                    return Err(SentenceError::UnexpectedChar { found: '<', at: i });
                }
            }
            c if c.is_ascii_alphanumeric() || c == '_' => {
                let start = i;
                while i < bytes.len() {
                    let c = bytes[i] as char;
                    if c.is_ascii_alphanumeric() || c == '_' {
                        i += 1;
                    } else {
                        break;
                    }
                }
                tokens.push((Token::Ident(input[start..i].to_string()), start));
            }
            other => return Err(SentenceError::UnexpectedChar { found: other, at: i }),
        }
    }

    Ok(tokens)
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<(&Token, usize)> {
        self.tokens.get(self.pos).map(|(t, at)| (t, *at))
    }

    fn bump(&mut self) -> Option<(Token, usize)> {
        let item = self.tokens.get(self.pos).cloned();
        if item.is_some() {
            self.pos += 1;
        }
        item
    }

    fn parse_iff(&mut self) -> Result<Sentence, SentenceError> {
        let lhs = self.parse_implies()?;
        if let Some((Token::Iff, _)) = self.peek() {
            self.bump();
            let rhs = self.parse_iff()?;
            return Ok(Sentence::iff(lhs, rhs));
        }
        Ok(lhs)
    }

    fn parse_implies(&mut self) -> Result<Sentence, SentenceError> {
        let lhs = self.parse_or()?;
        if let Some((Token::Arrow, _)) = self.peek() {
            self.bump();
            let rhs = self.parse_implies()?;
            return Ok(Sentence::implies(lhs, rhs));
        }
        Ok(lhs)
    }

    fn parse_or(&mut self) -> Result<Sentence, SentenceError> {
        let mut operands = vec![self.parse_and()?];
        while let Some((Token::Pipe, _)) = self.peek() {
            self.bump();
            operands.push(self.parse_and()?);
        }
        Ok(Sentence::or(operands))
    }

    fn parse_and(&mut self) -> Result<Sentence, SentenceError> {
        let mut operands = vec![self.parse_unary()?];
        while let Some((Token::Amp, _)) = self.peek() {
            self.bump();
            operands.push(self.parse_unary()?);
        }
        Ok(Sentence::and(operands))
    }

    fn parse_unary(&mut self) -> Result<Sentence, SentenceError> {
        match self.bump() {
            Some((Token::Tilde, _)) => Ok(Sentence::not(self.parse_unary()?)),
            Some((Token::LParen, _)) => {
                let inner = self.parse_iff()?;
                match self.bump() {
                    Some((Token::RParen, _)) => Ok(inner),
                    Some((token, at)) => Err(SentenceError::UnexpectedToken {
                        found: token.describe(),
                        at,
                        expected: "')'",
                    }),
                    None => Err(SentenceError::UnexpectedEnd { expected: "')'" }),
                }
            }
            Some((Token::Ident(name), _)) => {
                let prop: Prop = name.parse()?;
                Ok(Sentence::atom(prop))
            }
            Some((token, at)) => Err(SentenceError::UnexpectedToken {
                found: token.describe(),
                at,
                expected: "a proposition, '~', or '('",
            }),
            None => Err(SentenceError::UnexpectedEnd {
                expected: "a proposition, '~', or '('",
            }),
        }
    }
}
