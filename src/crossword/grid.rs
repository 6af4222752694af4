//! Puzzle grid representation

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A rectangular puzzle grid whose cells are empty or carry a hint marker.
///
/// Hint markers are kept for reporting only; no constraint reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub rows: usize,
    pub columns: usize,
    pub cells: Vec<Option<char>>,
}

impl Grid {
    /// Create a new grid with every cell empty
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: vec![None; rows * columns],
        }
    }

    /// Create a grid from a row-major matrix of cells
    pub fn from_cells(cells: Vec<Vec<Option<char>>>) -> Result<Self> {
        if cells.is_empty() {
            anyhow::bail!("Grid cannot be empty");
        }

        let rows = cells.len();
        let columns = cells[0].len();

        if columns == 0 {
            anyhow::bail!("Grid width cannot be zero");
        }

        for (i, row) in cells.iter().enumerate() {
            if row.len() != columns {
                anyhow::bail!("Row {} has length {}, expected {}", i, row.len(), columns);
            }
        }

        Ok(Self {
            rows,
            columns,
            cells: cells.into_iter().flatten().collect(),
        })
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.columns + col
    }

    /// Get the cell content at coordinates, `None` for empty or out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<char> {
        if row < self.rows && col < self.columns {
            self.cells[self.index(row, col)]
        } else {
            None
        }
    }

    /// Set the cell content at coordinates
    pub fn set(&mut self, row: usize, col: usize, value: Option<char>) -> Result<()> {
        if row >= self.rows || col >= self.columns {
            anyhow::bail!("Coordinates ({}, {}) out of bounds for {}x{} grid", row, col, self.rows, self.columns);
        }
        let idx = self.index(row, col);
        self.cells[idx] = value;
        Ok(())
    }

    /// All hint markers with their coordinates, in row-major order
    pub fn hints(&self) -> Vec<(usize, usize, char)> {
        let mut hints = Vec::new();
        for row in 0..self.rows {
            for col in 0..self.columns {
                if let Some(marker) = self.get(row, col) {
                    hints.push((row, col, marker));
                }
            }
        }
        hints
    }

    pub fn hint_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            for col in 0..self.columns {
                write!(f, "{}", self.get(row, col).unwrap_or('.'))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(5, 4);
        assert_eq!(grid.rows, 5);
        assert_eq!(grid.columns, 4);
        assert_eq!(grid.cells.len(), 20);
        assert_eq!(grid.hint_count(), 0);
    }

    #[test]
    fn test_grid_from_cells() {
        let cells = vec![
            vec![None, Some('h'), None],
            vec![None, None, Some('v')],
        ];
        let grid = Grid::from_cells(cells).unwrap();
        assert_eq!(grid.rows, 2);
        assert_eq!(grid.columns, 3);
        assert_eq!(grid.get(0, 1), Some('h'));
        assert_eq!(grid.get(1, 2), Some('v'));
        assert_eq!(grid.get(5, 5), None);
        assert_eq!(grid.hints(), vec![(0, 1, 'h'), (1, 2, 'v')]);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let cells = vec![vec![None, None], vec![None]];
        assert!(Grid::from_cells(cells).is_err());
        assert!(Grid::from_cells(Vec::new()).is_err());
    }

    #[test]
    fn test_set_bounds() {
        let mut grid = Grid::new(2, 2);
        assert!(grid.set(1, 1, Some('x')).is_ok());
        assert_eq!(grid.get(1, 1), Some('x'));
        assert!(grid.set(2, 0, Some('x')).is_err());
    }

    #[test]
    fn test_display() {
        let mut grid = Grid::new(2, 3);
        grid.set(0, 2, Some('h')).unwrap();
        assert_eq!(grid.to_string(), "..h\n...\n");
    }
}
