//! Crossword Word Placement ILP Solver
//!
//! Encodes the placement of words on a grid as a 0/1 integer linear program,
//! solves it with an exact oracle and decodes the chosen placements.

pub mod config;
pub mod crossword;
pub mod ilp;
pub mod placement;
pub mod utils;

pub use config::Settings;
pub use placement::{CrosswordProblem, Solution};

use anyhow::Result;
use rayon::prelude::*;

/// Main entry point: load the puzzle named by `settings` and solve it
pub fn solve_puzzle(settings: Settings) -> Result<Option<Solution>> {
    let problem = CrosswordProblem::new(settings)?;
    problem.solve()
}

/// Solve independent puzzles in parallel, each with its own model and oracle
pub fn solve_batch(settings: Vec<Settings>) -> Vec<Result<Option<Solution>>> {
    settings.into_par_iter().map(solve_puzzle).collect()
}
