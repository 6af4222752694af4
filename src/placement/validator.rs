//! Checks an oracle assignment against the model it was produced for

use crate::ilp::model::{Assignment, ConstraintFamily, Model, Relation};
use std::fmt;

/// A constraint the assignment does not satisfy
#[derive(Debug, Clone)]
pub struct ConstraintViolation {
    pub index: usize,
    pub family: ConstraintFamily,
    pub lhs: i64,
    pub relation: Relation,
    pub rhs: i64,
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "constraint #{} ({:?}): {} {} {} does not hold",
               self.index, self.family, self.lhs, self.relation, self.rhs)
    }
}

#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub violations: Vec<ConstraintViolation>,
    pub objective: i64,
    pub error_message: Option<String>,
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation Result:")?;
        writeln!(f, "  Valid: {}", self.is_valid)?;
        writeln!(f, "  Objective: {}", self.objective)?;
        writeln!(f, "  Violations: {}", self.violations.len())?;
        for violation in self.violations.iter().take(5) {
            writeln!(f, "    {}", violation)?;
        }
        if let Some(ref message) = self.error_message {
            writeln!(f, "  Error: {}", message)?;
        }
        Ok(())
    }
}

pub struct AssignmentValidator;

impl AssignmentValidator {
    pub fn validate(model: &Model, assignment: &Assignment) -> ValidationResult {
        let values = assignment.values();

        if values.len() != model.num_variables() {
            return ValidationResult {
                is_valid: false,
                violations: Vec::new(),
                objective: assignment.objective(),
                error_message: Some(format!(
                    "Assignment covers {} variables, model has {}",
                    values.len(),
                    model.num_variables()
                )),
            };
        }

        if let Some(v) = values.iter().position(|&v| v > 1) {
            return ValidationResult {
                is_valid: false,
                violations: Vec::new(),
                objective: assignment.objective(),
                error_message: Some(format!("Variable x{} is not binary", v)),
            };
        }

        let violations: Vec<_> = model
            .constraints()
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_satisfied_by(values))
            .map(|(index, c)| ConstraintViolation {
                index,
                family: c.family,
                lhs: c.expr.evaluate(values),
                relation: c.relation,
                rhs: c.rhs,
            })
            .collect();

        ValidationResult {
            is_valid: violations.is_empty(),
            violations,
            objective: assignment.objective(),
            error_message: None,
        }
    }
}
