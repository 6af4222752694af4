//! Configuration settings for the crossword placement solver

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default number of candidate start columns per row
pub const DEFAULT_START_SPAN: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub puzzle: PuzzleConfig,
    pub model: ModelConfig,
    pub solver: SolverConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleConfig {
    pub words: Vec<String>,
    pub grid_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Number of candidate start columns considered in every row
    pub start_span: usize,
    /// Emit the placement-bound constraint family
    pub placement_bounds: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    pub tie_break: TieBreak,
}

/// How the oracle chooses among several optimal assignments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Fix variables in index order, preferring 1 whenever an optimum allows it
    EarliestFirst,
    /// Return whichever optimal model the backend finds first
    FirstFound,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub output_file: Option<PathBuf>,
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            puzzle: PuzzleConfig {
                words: ["hello", "halo", "hive", "velvet", "even"]
                    .iter()
                    .map(|w| w.to_string())
                    .collect(),
                grid_file: PathBuf::from("input/puzzles/example.txt"),
            },
            model: ModelConfig {
                start_span: DEFAULT_START_SPAN,
                placement_bounds: true,
            },
            solver: SolverConfig {
                tie_break: TieBreak::EarliestFirst,
            },
            output: OutputConfig {
                format: OutputFormat::Text,
                output_file: None,
                verbose: false,
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.model.start_span == 0 {
            anyhow::bail!("Start span must be positive");
        }

        if !self.puzzle.grid_file.exists() {
            anyhow::bail!("Grid file does not exist: {}", self.puzzle.grid_file.display());
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(ref words) = cli_overrides.words {
            self.puzzle.words = words.clone();
        }
        if let Some(ref grid_file) = cli_overrides.grid_file {
            self.puzzle.grid_file = grid_file.clone();
        }
        if let Some(start_span) = cli_overrides.start_span {
            self.model.start_span = start_span;
        }
        if let Some(format) = cli_overrides.format {
            self.output.format = format;
        }
        if let Some(ref output_file) = cli_overrides.output_file {
            self.output.output_file = Some(output_file.clone());
        }
        if cli_overrides.verbose {
            self.output.verbose = true;
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub words: Option<Vec<String>>,
    pub grid_file: Option<PathBuf>,
    pub start_span: Option<usize>,
    pub format: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
    pub verbose: bool,
}
