//! File I/O for puzzle grids

use super::Grid;
use anyhow::{Context, Result};
use std::path::Path;

/// Load a grid from a text file.
/// Format: one line per row, '.' or '_' for an empty cell, any other character is a hint marker
pub fn load_grid_from_file<P: AsRef<Path>>(path: P) -> Result<Grid> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read grid file: {}", path.as_ref().display()))?;

    parse_grid_from_string(&content)
        .with_context(|| format!("Failed to parse grid from file: {}", path.as_ref().display()))
}

/// Parse a grid from its text representation
pub fn parse_grid_from_string(content: &str) -> Result<Grid> {
    let lines: Vec<&str> = content.lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        anyhow::bail!("Grid file is empty or contains no valid rows");
    }

    let columns = lines[0].chars().count();
    let mut cells = Vec::with_capacity(lines.len());

    for (row_idx, line) in lines.iter().enumerate() {
        let width = line.chars().count();
        if width != columns {
            anyhow::bail!("Row {} has length {}, expected {} (all rows must have the same length)",
                         row_idx, width, columns);
        }

        let mut row = Vec::with_capacity(columns);
        for (col_idx, ch) in line.chars().enumerate() {
            match ch {
                '.' | '_' => row.push(None),
                c if c.is_whitespace() => anyhow::bail!(
                    "Whitespace inside row {} at column {}", row_idx, col_idx
                ),
                c => row.push(Some(c)),
            }
        }
        cells.push(row);
    }

    Grid::from_cells(cells)
}

/// Save a grid to a text file
pub fn save_grid_to_file<P: AsRef<Path>>(grid: &Grid, path: P) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(&path, grid.to_string())
        .with_context(|| format!("Failed to write grid to file: {}", path.as_ref().display()))?;

    Ok(())
}

/// Write the example puzzle (a 5x5 grid with an 'h' and a 'v' hint in the
/// middle column) and a blank 3x8 grid
pub fn create_example_puzzles<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let dir = output_dir.as_ref();

    let mut example = Grid::new(5, 5);
    example.set(1, 2, Some('h'))?;
    example.set(3, 2, Some('v'))?;
    save_grid_to_file(&example, dir.join("example.txt"))?;

    save_grid_to_file(&Grid::new(3, 8), dir.join("blank_3x8.txt"))?;

    Ok(())
}
