use slotmap::SecondaryMap;

use crate::dsl::Premise;
use crate::error::{FuzzyError, Result};
use crate::ops::{AndOp, OrOp};
use crate::variable::{TermIndex, VariableKey};

/// Closed-form degrees of every term of every antecedent for one set of inputs.
#[derive(Clone, Debug, Default)]
pub struct Fuzzified(pub(crate) SecondaryMap<VariableKey, Vec<f64>>);

impl Fuzzified {
    pub fn degree(&self, var: VariableKey, term: TermIndex) -> f64 {
        self.0.get(var).and_then(|degrees| degrees.get(term.0)).copied().unwrap_or(0.)
    }
}

/// A premise with its names resolved against the engine's variables.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Expr {
    Is(VariableKey, TermIndex),
    And(Vec<Expr>),
    Or(Vec<Expr>),
}

impl Expr {
    pub(crate) fn resolve(
        premise: &Premise,
        lookup: &impl Fn(&str, &str) -> Result<(VariableKey, TermIndex)>,
    ) -> Result<Self> {
        match premise {
            Premise::Is { variable, term } => {
                let (var_key, term) = lookup(variable, term)?;

                Ok(Expr::Is(var_key, term))
            },
            Premise::And(exprs) | Premise::Or(exprs) => {
                if exprs.is_empty() {
                    return Err(FuzzyError::EmptyConnective);
                }

                let exprs = exprs
                    .iter()
                    .map(|expr| Self::resolve(expr, lookup))
                    .collect::<Result<Vec<_>>>()?;

                Ok(match premise {
                    Premise::And(_) => Expr::And(exprs),
                    _ => Expr::Or(exprs),
                })
            },
        }
    }

    fn eval(&self, fuzzified: &Fuzzified, and_op: AndOp, or_op: OrOp) -> f64 {
        match self {
            Expr::Is(var_key, term) => fuzzified.degree(*var_key, *term),
            Expr::And(exprs) => exprs
                .iter()
                .map(|expr| expr.eval(fuzzified, and_op, or_op))
                .reduce(|u, v| and_op.call(u, v))
                .unwrap_or(0.),
            Expr::Or(exprs) => exprs
                .iter()
                .map(|expr| expr.eval(fuzzified, and_op, or_op))
                .reduce(|u, v| or_op.call(u, v))
                .unwrap_or(0.),
        }
    }
}

pub struct Rule {
    pub(crate) premise: Expr,
    pub(crate) consequence: TermIndex,
}

impl Rule {
    /// Degree to which the premise holds, in `[0, 1]`.
    pub fn fire_strength(&self, fuzzified: &Fuzzified, and_op: AndOp, or_op: OrOp) -> f64 {
        self.premise.eval(fuzzified, and_op, or_op).clamp(0., 1.)
    }

    pub fn consequence(&self) -> TermIndex {
        self.consequence
    }
}

#[derive(Default)]
pub struct Rules(pub(crate) Vec<Rule>);

impl Rules {
    pub fn new() -> Self {
        Rules(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Rules(Vec::with_capacity(capacity))
    }

    pub(crate) fn add(&mut self, premise: Expr, consequence: TermIndex) {
        self.0.push(Rule { premise, consequence });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
