//! Linear model types for 0/1 integer programs

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Index of a binary decision variable in a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VarId(pub usize);

impl VarId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Errors raised while assembling a model
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("variable x{var} is not part of a model with {num_variables} variables")]
    UnknownVariable { var: usize, num_variables: usize },
}

/// A single `coefficient * variable` term
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Term {
    pub var: VarId,
    pub coefficient: i64,
}

/// A linear expression over binary variables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinearExpr {
    terms: Vec<Term>,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of the given variables, each with coefficient 1
    pub fn sum_of<I: IntoIterator<Item = VarId>>(vars: I) -> Self {
        Self {
            terms: vars.into_iter().map(|var| Term { var, coefficient: 1 }).collect(),
        }
    }

    pub fn add_term(&mut self, var: VarId, coefficient: i64) {
        self.terms.push(Term { var, coefficient });
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Value of the expression under 0/1 variable values
    pub fn evaluate(&self, values: &[u8]) -> i64 {
        self.terms
            .iter()
            .map(|t| t.coefficient * values.get(t.var.index()).copied().unwrap_or(0) as i64)
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    LessEqual,
    Equal,
    GreaterEqual,
}

impl Relation {
    pub fn holds(self, lhs: i64, rhs: i64) -> bool {
        match self {
            Relation::LessEqual => lhs <= rhs,
            Relation::Equal => lhs == rhs,
            Relation::GreaterEqual => lhs >= rhs,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Relation::LessEqual => "<=",
            Relation::Equal => "=",
            Relation::GreaterEqual => ">=",
        };
        write!(f, "{}", symbol)
    }
}

/// Which family of the placement encoding a constraint belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintFamily {
    Row,
    Column,
    PlacementBound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearConstraint {
    pub family: ConstraintFamily,
    pub expr: LinearExpr,
    pub relation: Relation,
    pub rhs: i64,
}

impl LinearConstraint {
    pub fn is_satisfied_by(&self, values: &[u8]) -> bool {
        self.relation.holds(self.expr.evaluate(values), self.rhs)
    }
}

/// A 0/1 integer linear program; the objective is always minimised
#[derive(Debug, Clone)]
pub struct Model {
    name: String,
    num_variables: usize,
    objective: LinearExpr,
    constraints: Vec<LinearConstraint>,
}

impl Model {
    /// Create a model with `num_variables` binary variables and an empty objective
    pub fn new(name: impl Into<String>, num_variables: usize) -> Self {
        Self {
            name: name.into(),
            num_variables,
            objective: LinearExpr::new(),
            constraints: Vec::new(),
        }
    }

    pub fn set_objective(&mut self, objective: LinearExpr) -> Result<(), ModelError> {
        self.check_variables(&objective)?;
        self.objective = objective;
        Ok(())
    }

    pub fn add_constraint(&mut self, constraint: LinearConstraint) -> Result<(), ModelError> {
        self.check_variables(&constraint.expr)?;
        self.constraints.push(constraint);
        Ok(())
    }

    fn check_variables(&self, expr: &LinearExpr) -> Result<(), ModelError> {
        match expr.terms().iter().find(|t| t.var.index() >= self.num_variables) {
            Some(term) => Err(ModelError::UnknownVariable {
                var: term.var.index(),
                num_variables: self.num_variables,
            }),
            None => Ok(()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// Drop every constraint of the given family
    pub fn without_family(&self, family: ConstraintFamily) -> Model {
        let mut model = self.clone();
        model.constraints.retain(|c| c.family != family);
        model
    }

    pub fn statistics(&self) -> ModelStatistics {
        let count = |family: ConstraintFamily| self.constraints.iter().filter(|c| c.family == family).count();

        ModelStatistics {
            name: self.name.clone(),
            variables: self.num_variables,
            objective_terms: self.objective.terms().len(),
            row_constraints: count(ConstraintFamily::Row),
            column_constraints: count(ConstraintFamily::Column),
            placement_bound_constraints: count(ConstraintFamily::PlacementBound),
            total_constraints: self.constraints.len(),
        }
    }
}

/// A complete 0/1 assignment produced by a solve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    values: Vec<u8>,
    objective: i64,
}

impl Assignment {
    /// Build an assignment for `model`, computing the objective it attains
    pub fn new(model: &Model, values: Vec<u8>) -> Self {
        let objective = model.objective().evaluate(&values);
        Self { values, objective }
    }

    /// Value of a variable, 0 for variables outside the assignment
    pub fn value(&self, var: VarId) -> u8 {
        self.values.get(var.index()).copied().unwrap_or(0)
    }

    pub fn values(&self) -> &[u8] {
        &self.values
    }

    pub fn objective(&self) -> i64 {
        self.objective
    }
}

#[derive(Debug, Clone)]
pub struct ModelStatistics {
    pub name: String,
    pub variables: usize,
    pub objective_terms: usize,
    pub row_constraints: usize,
    pub column_constraints: usize,
    pub placement_bound_constraints: usize,
    pub total_constraints: usize,
}

impl fmt::Display for ModelStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Model Statistics ({}):", self.name)?;
        writeln!(f, "  Variables: {}", self.variables)?;
        writeln!(f, "  Objective terms: {}", self.objective_terms)?;
        writeln!(f, "  Row constraints: {}", self.row_constraints)?;
        writeln!(f, "  Column constraints: {}", self.column_constraints)?;
        writeln!(f, "  Placement-bound constraints: {}", self.placement_bound_constraints)?;
        writeln!(f, "  Total constraints: {}", self.total_constraints)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_most_one(vars: &[usize]) -> LinearConstraint {
        LinearConstraint {
            family: ConstraintFamily::PlacementBound,
            expr: LinearExpr::sum_of(vars.iter().map(|&v| VarId(v))),
            relation: Relation::LessEqual,
            rhs: 1,
        }
    }

    #[test]
    fn test_expression_evaluation() {
        let mut expr = LinearExpr::sum_of([VarId(0), VarId(2)]);
        expr.add_term(VarId(1), -3);

        assert_eq!(expr.evaluate(&[1, 0, 1]), 2);
        assert_eq!(expr.evaluate(&[1, 1, 1]), -1);
        assert_eq!(expr.evaluate(&[]), 0);
    }

    #[test]
    fn test_unknown_variable_rejected() {
        let mut model = Model::new("test", 2);
        assert!(model.add_constraint(at_most_one(&[0, 1])).is_ok());
        assert_eq!(
            model.add_constraint(at_most_one(&[0, 2])),
            Err(ModelError::UnknownVariable { var: 2, num_variables: 2 })
        );
        assert!(model
            .set_objective(LinearExpr::sum_of([VarId(5)]))
            .is_err());
        assert_eq!(model.constraints().len(), 1);
    }

    #[test]
    fn test_constraint_satisfaction() {
        let constraint = at_most_one(&[0, 1]);
        assert!(constraint.is_satisfied_by(&[0, 1]));
        assert!(!constraint.is_satisfied_by(&[1, 1]));

        let equality = LinearConstraint { relation: Relation::Equal, ..constraint };
        assert!(!equality.is_satisfied_by(&[0, 0]));
    }

    #[test]
    fn test_assignment_objective() {
        let mut model = Model::new("test", 3);
        model
            .set_objective(LinearExpr::sum_of([VarId(0), VarId(1), VarId(2)]))
            .unwrap();

        let assignment = Assignment::new(&model, vec![1, 0, 1]);
        assert_eq!(assignment.objective(), 2);
        assert_eq!(assignment.value(VarId(1)), 0);
        assert_eq!(assignment.value(VarId(9)), 0);
    }

    #[test]
    fn test_without_family() {
        let mut model = Model::new("test", 2);
        model.add_constraint(at_most_one(&[0, 1])).unwrap();
        model
            .add_constraint(LinearConstraint {
                family: ConstraintFamily::Row,
                ..at_most_one(&[0])
            })
            .unwrap();

        let trimmed = model.without_family(ConstraintFamily::PlacementBound);
        assert_eq!(trimmed.constraints().len(), 1);
        assert_eq!(trimmed.statistics().row_constraints, 1);
        assert_eq!(model.statistics().total_constraints, 2);
    }
}
