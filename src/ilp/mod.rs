//! 0/1 integer programming components for word placement

pub mod variables;
pub mod model;
pub mod constraints;
pub mod cnf;
pub mod solver;
pub mod decoder;

pub use variables::{VariableSpace, PlacementKey};
pub use model::{Assignment, Model, ModelError, ModelStatistics, VarId};
pub use constraints::ConstraintEncoder;
pub use solver::{CadicalOracle, OracleStatistics, SolveError, SolveOracle};
pub use decoder::{Placement, SolutionDecoder};
