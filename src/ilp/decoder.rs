//! Decoding of solved assignments back into word placements

use super::model::Assignment;
use super::VariableSpace;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A start coordinate: the row and the start column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub row: usize,
    pub column: usize,
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Reads placements out of an assignment
pub struct SolutionDecoder;

impl SolutionDecoder {
    /// Placements per word index, each list ordered by row then start column
    pub fn decode(space: &VariableSpace, assignment: &Assignment) -> Vec<Vec<Placement>> {
        let mut placements = vec![Vec::new(); space.num_words()];

        for (key, var) in space.iter() {
            if assignment.value(var) == 1 {
                placements[key.word].push(Placement {
                    row: key.row,
                    column: key.start,
                });
            }
        }

        placements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ilp::model::Model;

    #[test]
    fn test_decode_order() {
        let space = VariableSpace::new(2, 2, 3);
        let model = Model::new("test", space.variable_count());
        let mut values = vec![0; space.variable_count()];
        for (word, row, start) in [(0, 1, 2), (0, 0, 1), (1, 1, 0), (0, 1, 0)] {
            values[space.variable(word, row, start).unwrap().index()] = 1;
        }

        let decoded = SolutionDecoder::decode(&space, &Assignment::new(&model, values));

        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0], vec![
            Placement { row: 0, column: 1 },
            Placement { row: 1, column: 0 },
            Placement { row: 1, column: 2 },
        ]);
        assert_eq!(decoded[1], vec![Placement { row: 1, column: 0 }]);
    }

    #[test]
    fn test_decode_empty_space() {
        let space = VariableSpace::new(0, 5, 10);
        let model = Model::new("empty", 0);
        let decoded = SolutionDecoder::decode(&space, &Assignment::new(&model, Vec::new()));
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_words_without_placements_keep_their_slot() {
        let space = VariableSpace::new(3, 1, 2);
        let model = Model::new("test", space.variable_count());
        let decoded = SolutionDecoder::decode(&space, &Assignment::new(&model, vec![0; 6]));
        assert_eq!(decoded, vec![Vec::new(), Vec::new(), Vec::new()]);
    }

    #[test]
    fn test_placement_display() {
        assert_eq!(Placement { row: 3, column: 7 }.to_string(), "(3, 7)");
    }
}
