//! Puzzle input: grids and their text format

pub mod grid;
pub mod io;

pub use grid::Grid;
pub use io::{load_grid_from_file, parse_grid_from_string, save_grid_to_file, create_example_puzzles};
