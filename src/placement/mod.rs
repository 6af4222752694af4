//! Word placement problem definition and solution handling

pub mod problem;
pub mod solution;
pub mod validator;

pub use problem::CrosswordProblem;
pub use solution::{Solution, WordPlacements};
pub use validator::{AssignmentValidator, ValidationResult};
