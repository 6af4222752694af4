//! Compilation of 0/1 linear constraints into CNF clauses
//!
//! Every constraint is first normalised to `sum(w_i * l_i) <= bound` with
//! positive weights over literals, then expressed with a sequential weight
//! counter. Model variable `v` is SAT variable `v + 1`; auxiliary variables
//! are numbered after the model variables.

use super::model::{LinearConstraint, LinearExpr, Relation, VarId};
use std::collections::BTreeMap;

/// Represents a SAT clause (disjunction of literals)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub literals: Vec<i32>, // Positive for variable, negative for negation
}

impl Clause {
    pub fn new(literals: Vec<i32>) -> Self {
        Self { literals }
    }

    pub fn unit(literal: i32) -> Self {
        Self { literals: vec![literal] }
    }

    pub fn binary(lit1: i32, lit2: i32) -> Self {
        Self { literals: vec![lit1, lit2] }
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }
}

/// A literal carrying a positive weight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightedLit {
    pub lit: i32,
    pub weight: u64,
}

/// SAT literal of a model variable
#[inline]
pub fn model_literal(var: VarId) -> i32 {
    var.index() as i32 + 1
}

/// Rewrite `expr` as positive weights plus a constant: `expr = offset + sum(w_i * l_i)`.
/// Repeated variables are merged and zero coefficients dropped.
pub fn normalize(expr: &LinearExpr) -> (Vec<WeightedLit>, i64) {
    let mut merged: BTreeMap<VarId, i64> = BTreeMap::new();
    for term in expr.terms() {
        *merged.entry(term.var).or_insert(0) += term.coefficient;
    }

    let mut items = Vec::with_capacity(merged.len());
    let mut offset = 0;
    for (var, coefficient) in merged {
        let lit = model_literal(var);
        if coefficient > 0 {
            items.push(WeightedLit { lit, weight: coefficient as u64 });
        } else if coefficient < 0 {
            // c*x = c + |c|*(1 - x)
            items.push(WeightedLit { lit: -lit, weight: coefficient.unsigned_abs() });
            offset += coefficient;
        }
    }

    (items, offset)
}

fn negate_all(items: &[WeightedLit]) -> Vec<WeightedLit> {
    items.iter().map(|i| WeightedLit { lit: -i.lit, weight: i.weight }).collect()
}

fn total_weight(items: &[WeightedLit]) -> i64 {
    items.iter().map(|i| i.weight as i64).sum()
}

/// Objective rewritten as a weighted sum to minimise
#[derive(Debug, Clone)]
pub struct NormalizedObjective {
    pub items: Vec<WeightedLit>,
}

impl NormalizedObjective {
    /// Normalise a minimisation objective; the constant offset does not affect the optimum
    pub fn new(objective: &LinearExpr) -> Self {
        let (items, _) = normalize(objective);
        Self { items }
    }

    /// Weighted cost under a truth function over SAT literals
    pub fn cost<F: Fn(i32) -> bool>(&self, is_true: F) -> u64 {
        self.items.iter().filter(|i| is_true(i.lit)).map(|i| i.weight).sum()
    }
}

/// Accumulates clauses and allocates auxiliary variables
#[derive(Debug)]
pub struct CnfEncoder {
    next_var: i32,
    clauses: Vec<Clause>,
    emitted: usize,
}

impl CnfEncoder {
    /// Create an encoder whose first `num_model_vars` SAT variables are reserved
    pub fn new(num_model_vars: usize) -> Self {
        Self {
            next_var: num_model_vars as i32 + 1,
            clauses: Vec::new(),
            emitted: 0,
        }
    }

    pub fn fresh(&mut self) -> i32 {
        let var = self.next_var;
        self.next_var += 1;
        var
    }

    fn push(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    /// Hand over the clauses produced since the last call
    pub fn take_clauses(&mut self) -> Vec<Clause> {
        self.emitted += self.clauses.len();
        std::mem::take(&mut self.clauses)
    }

    /// Highest SAT variable allocated so far
    pub fn variable_count(&self) -> usize {
        (self.next_var - 1) as usize
    }

    pub fn clause_count(&self) -> usize {
        self.emitted + self.clauses.len()
    }

    /// Encode one linear constraint
    pub fn encode_constraint(&mut self, constraint: &LinearConstraint) {
        let (items, offset) = normalize(&constraint.expr);
        let bound = constraint.rhs - offset;

        match constraint.relation {
            Relation::LessEqual => self.at_most(&items, bound),
            Relation::GreaterEqual => self.at_least(&items, bound),
            Relation::Equal => {
                self.at_least(&items, bound);
                self.at_most(&items, bound);
            }
        }
    }

    /// `sum(w_i * l_i) <= bound`
    pub fn at_most(&mut self, items: &[WeightedLit], bound: i64) {
        if bound < 0 {
            self.contradiction();
            return;
        }
        if total_weight(items) <= bound {
            return;
        }

        let outputs = self.counter(items, bound as usize + 1);
        self.push(Clause::unit(-outputs[bound as usize]));
    }

    /// `sum(w_i * l_i) >= bound`
    pub fn at_least(&mut self, items: &[WeightedLit], bound: i64) {
        if bound <= 0 {
            return;
        }
        let total = total_weight(items);
        if total < bound {
            self.contradiction();
            return;
        }

        if items.iter().all(|i| i.weight as i64 >= bound) {
            self.push(Clause::new(items.iter().map(|i| i.lit).collect()));
        } else {
            self.at_most(&negate_all(items), total - bound);
        }
    }

    /// Sequential weight counter over `items` with `capacity` outputs.
    ///
    /// `outputs[j]` is forced true whenever the weighted sum reaches `j + 1`.
    /// The outputs are only forced upwards, so forbidding `outputs[b]`
    /// enforces `sum <= b`.
    pub fn counter(&mut self, items: &[WeightedLit], capacity: usize) -> Vec<i32> {
        let mut previous: Option<Vec<i32>> = None;

        for item in items {
            let current: Vec<i32> = (0..capacity).map(|_| self.fresh()).collect();
            let weight = (item.weight as usize).min(capacity);

            for j in 0..weight {
                self.push(Clause::binary(-item.lit, current[j]));
            }

            if let Some(previous) = &previous {
                for j in 0..capacity {
                    self.push(Clause::binary(-previous[j], current[j]));
                    if j + weight < capacity {
                        self.push(Clause::new(vec![-item.lit, -previous[j], current[j + weight]]));
                    }
                }
            }

            previous = Some(current);
        }

        previous.unwrap_or_default()
    }

    fn contradiction(&mut self) {
        let var = self.fresh();
        self.push(Clause::unit(var));
        self.push(Clause::unit(-var));
    }
}
