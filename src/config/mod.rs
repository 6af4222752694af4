//! Configuration management for the crossword placement solver

pub mod settings;

pub use settings::{
    Settings, PuzzleConfig, ModelConfig, SolverConfig, OutputConfig,
    TieBreak, OutputFormat, CliOverrides, DEFAULT_START_SPAN
};
