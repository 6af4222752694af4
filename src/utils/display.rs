//! Display and output formatting utilities

use crate::config::OutputFormat;
use crate::placement::Solution;
use anyhow::{Context, Result};
use std::path::Path;

/// Printed when the oracle reports that no assignment exists
pub const NO_SOLUTION_MESSAGE: &str = "No solution found.";

/// Format solutions for display
pub struct SolutionFormatter;

impl SolutionFormatter {
    /// One `word: [(row, column), ...]` line per word, in input order
    pub fn format_solution(solution: &Solution) -> String {
        let mut output = String::new();

        for entry in &solution.entries {
            let pairs: Vec<String> = entry.placements.iter().map(|p| p.to_string()).collect();
            output.push_str(&format!("{}: [{}]\n", entry.word, pairs.join(", ")));
        }

        output
    }

    /// Render the outcome of a solve in the requested format
    pub fn format_outcome(outcome: Option<&Solution>, format: OutputFormat) -> Result<String> {
        match (outcome, format) {
            (Some(solution), OutputFormat::Text) => Ok(Self::format_solution(solution)),
            (Some(solution), OutputFormat::Json) => solution.to_json()
                .context("Failed to serialize solution"),
            (None, _) => Ok(format!("{}\n", NO_SOLUTION_MESSAGE)),
        }
    }

    /// Short summary line for batch runs
    pub fn format_summary(label: &str, outcome: Option<&Solution>) -> String {
        match outcome {
            Some(solution) => format!(
                "{:24} | words {:3} | placements {:4} | objective {:5} | {:.3}s",
                label,
                solution.len(),
                solution.total_placements(),
                solution.objective,
                solution.solve_time.as_secs_f64()
            ),
            None => format!("{:24} | {}", label, NO_SOLUTION_MESSAGE),
        }
    }

    /// Write the solution to a file in the requested format
    pub fn save_solution(solution: &Solution, path: &Path, format: OutputFormat) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content = Self::format_outcome(Some(solution), format)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write solution to {}", path.display()))?;

        Ok(())
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() &&
        (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}
