//! Constraint generation for the word placement model

use super::model::{
    ConstraintFamily, LinearConstraint, LinearExpr, Model, ModelError, Relation,
};
use super::VariableSpace;
use itertools::iproduct;

/// Builds the objective and the three constraint families over a variable space
#[derive(Debug, Clone)]
pub struct ConstraintEncoder {
    placement_bounds: bool,
}

impl ConstraintEncoder {
    pub fn new(placement_bounds: bool) -> Self {
        Self { placement_bounds }
    }

    /// Encode the complete model for `words` over `space`
    pub fn encode(&self, space: &VariableSpace, words: &[String]) -> Result<Model, ModelError> {
        let mut model = Model::new("crossword_placement", space.variable_count());

        model.set_objective(self.generate_objective(space))?;

        for constraint in self.generate_row_constraints(space) {
            model.add_constraint(constraint)?;
        }
        for constraint in self.generate_column_constraints(space) {
            model.add_constraint(constraint)?;
        }
        if self.placement_bounds {
            for constraint in self.generate_placement_bound_constraints(space, words) {
                model.add_constraint(constraint)?;
            }
        }

        Ok(model)
    }

    /// Sum of every placement indicator
    fn generate_objective(&self, space: &VariableSpace) -> LinearExpr {
        LinearExpr::sum_of(space.variables())
    }

    /// Each word picks exactly one start column in every row
    fn generate_row_constraints(&self, space: &VariableSpace) -> Vec<LinearConstraint> {
        iproduct!(0..space.num_words(), 0..space.num_rows())
            .map(|(word, row)| exactly_one(ConstraintFamily::Row, space, word, row))
            .collect()
    }

    /// Same sums read column-major: the row index doubles as the column index
    fn generate_column_constraints(&self, space: &VariableSpace) -> Vec<LinearConstraint> {
        iproduct!(0..space.num_rows(), 0..space.num_words())
            .map(|(column, word)| exactly_one(ConstraintFamily::Column, space, word, column))
            .collect()
    }

    /// For every window of `len(word)` consecutive starts: the window sum is at most `len(word)`
    fn generate_placement_bound_constraints(
        &self,
        space: &VariableSpace,
        words: &[String],
    ) -> Vec<LinearConstraint> {
        let mut constraints = Vec::new();

        for (word, row) in iproduct!(0..space.num_words(), 0..space.num_rows()) {
            let length = words.get(word).map(|w| w.chars().count()).unwrap_or(0);
            if length == 0 || length > space.start_span() {
                continue;
            }

            for start in 0..=space.start_span() - length {
                let window = (0..length).filter_map(|offset| space.variable(word, row, start + offset));
                constraints.push(LinearConstraint {
                    family: ConstraintFamily::PlacementBound,
                    expr: LinearExpr::sum_of(window),
                    relation: Relation::LessEqual,
                    rhs: length as i64,
                });
            }
        }

        constraints
    }
}

impl Default for ConstraintEncoder {
    fn default() -> Self {
        Self::new(true)
    }
}

fn exactly_one(
    family: ConstraintFamily,
    space: &VariableSpace,
    word: usize,
    line: usize,
) -> LinearConstraint {
    LinearConstraint {
        family,
        expr: LinearExpr::sum_of(space.line_variables(word, line)),
        relation: Relation::Equal,
        rhs: 1,
    }
}
