//! Decision-variable space for the placement encoding

use super::model::VarId;
use itertools::iproduct;
use std::fmt;

/// Key of a placement indicator: word `word` starts at (`row`, `start`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlacementKey {
    pub word: usize,
    pub row: usize,
    pub start: usize,
}

/// Owns one binary variable per (word, row, start column) triple.
///
/// Variables live in a flat array addressed by
/// `(word * num_rows + row) * start_span + start`; the array order is the
/// iteration order used by the encoder and the decoder.
#[derive(Debug, Clone)]
pub struct VariableSpace {
    num_words: usize,
    num_rows: usize,
    start_span: usize,
    keys: Vec<PlacementKey>,
}

impl VariableSpace {
    /// Allocate the full cross product of words, rows and start columns
    pub fn new(num_words: usize, num_rows: usize, start_span: usize) -> Self {
        let keys = iproduct!(0..num_words, 0..num_rows, 0..start_span)
            .map(|(word, row, start)| PlacementKey { word, row, start })
            .collect();

        Self {
            num_words,
            num_rows,
            start_span,
            keys,
        }
    }

    /// Variable for a placement, `None` outside the space
    pub fn variable(&self, word: usize, row: usize, start: usize) -> Option<VarId> {
        if word >= self.num_words || row >= self.num_rows || start >= self.start_span {
            return None;
        }
        Some(VarId((word * self.num_rows + row) * self.start_span + start))
    }

    /// All start-column variables of one word within one line, ascending by start
    pub fn line_variables(&self, word: usize, line: usize) -> Vec<VarId> {
        (0..self.start_span)
            .filter_map(|start| self.variable(word, line, start))
            .collect()
    }

    /// Every (key, variable) pair in word, row, start order
    pub fn iter(&self) -> impl Iterator<Item = (PlacementKey, VarId)> + '_ {
        self.keys.iter().enumerate().map(|(idx, &key)| (key, VarId(idx)))
    }

    pub fn variables(&self) -> impl Iterator<Item = VarId> {
        (0..self.keys.len()).map(VarId)
    }

    pub fn variable_count(&self) -> usize {
        self.keys.len()
    }

    pub fn num_words(&self) -> usize {
        self.num_words
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn start_span(&self) -> usize {
        self.start_span
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl fmt::Display for VariableSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Variable Space:")?;
        writeln!(f, "  Words: {}", self.num_words)?;
        writeln!(f, "  Rows: {}", self.num_rows)?;
        writeln!(f, "  Start span: {}", self.start_span)?;
        writeln!(f, "  Total variables: {}", self.variable_count())?;
        Ok(())
    }
}
