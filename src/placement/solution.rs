//! Solution representation for word placement problems

use crate::ilp::Placement;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Placements decoded for one input word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPlacements {
    pub word: String,
    pub placements: Vec<Placement>,
}

/// A decoded solution: one entry per input word, in input order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    pub entries: Vec<WordPlacements>,
    /// Objective value of the assignment the solution was decoded from
    pub objective: i64,
    pub grid_rows: usize,
    pub grid_columns: usize,
    /// Time spent in the oracle
    #[serde(skip)]
    pub solve_time: Duration,
}

impl Solution {
    pub fn new(
        words: &[String],
        placements: Vec<Vec<Placement>>,
        objective: i64,
        grid_rows: usize,
        grid_columns: usize,
        solve_time: Duration,
    ) -> Self {
        let entries = words
            .iter()
            .zip(placements)
            .map(|(word, placements)| WordPlacements {
                word: word.clone(),
                placements,
            })
            .collect();

        Self {
            entries,
            objective,
            grid_rows,
            grid_columns,
            solve_time,
        }
    }

    /// Placements of the word at `index` in the input list
    pub fn placements(&self, index: usize) -> Option<&[Placement]> {
        self.entries.get(index).map(|e| e.placements.as_slice())
    }

    /// First entry for `word`; use `placements` to tell duplicates apart
    pub fn find(&self, word: &str) -> Option<&WordPlacements> {
        self.entries.iter().find(|e| e.word == word)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn total_placements(&self) -> usize {
        self.entries.iter().map(|e| e.placements.len()).sum()
    }

    /// Words whose start column lies beyond the grid width
    pub fn overflowing_words(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.placements.iter().any(|p| p.column >= self.grid_columns))
            .map(|e| e.word.as_str())
            .collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Solution {
        let words = vec!["ab".to_string(), "cd".to_string(), "ab".to_string()];
        let placements = vec![
            vec![Placement { row: 0, column: 0 }, Placement { row: 1, column: 4 }],
            vec![Placement { row: 0, column: 1 }],
            vec![],
        ];
        Solution::new(&words, placements, 3, 2, 3, Duration::from_millis(5))
    }

    #[test]
    fn test_lookup() {
        let solution = sample();
        assert_eq!(solution.len(), 3);
        assert_eq!(solution.total_placements(), 3);
        assert_eq!(solution.placements(1), Some(&[Placement { row: 0, column: 1 }][..]));
        assert_eq!(solution.placements(2), Some(&[][..]));
        assert_eq!(solution.find("ab").unwrap().placements.len(), 2);
        assert!(solution.find("zz").is_none());
    }

    #[test]
    fn test_overflowing_words() {
        assert_eq!(sample().overflowing_words(), vec!["ab"]);
    }

    #[test]
    fn test_json_skips_solve_time() {
        let solution = sample();
        let json = solution.to_json().unwrap();
        assert!(!json.contains("solve_time"));

        let loaded: Solution = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.entries, solution.entries);
        assert_eq!(loaded.objective, 3);
        assert_eq!(loaded.solve_time, Duration::ZERO);
    }
}
