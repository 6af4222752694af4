//! Word placement problem definition and solve pipeline

use super::{AssignmentValidator, Solution};
use crate::config::Settings;
use crate::crossword::{load_grid_from_file, Grid};
use crate::ilp::{
    CadicalOracle, ConstraintEncoder, Model, SolutionDecoder, SolveError, SolveOracle,
    VariableSpace,
};
use anyhow::{Context, Result};
use std::time::Instant;

/// A word list and a grid to place the words on
pub struct CrosswordProblem {
    settings: Settings,
    words: Vec<String>,
    grid: Grid,
}

impl CrosswordProblem {
    /// Create a problem from settings, loading the grid file
    pub fn new(settings: Settings) -> Result<Self> {
        let grid = load_grid_from_file(&settings.puzzle.grid_file)
            .context("Failed to load puzzle grid")?;
        let words = settings.puzzle.words.clone();

        Ok(Self { settings, words, grid })
    }

    /// Create a problem from explicit words and grid (useful for testing)
    pub fn with_puzzle(settings: Settings, words: Vec<String>, grid: Grid) -> Self {
        Self { settings, words, grid }
    }

    /// Build the variable space and the encoded model
    pub fn build_model(&self) -> Result<(VariableSpace, Model)> {
        let space = VariableSpace::new(
            self.words.len(),
            self.grid.rows,
            self.settings.model.start_span,
        );
        let model = ConstraintEncoder::new(self.settings.model.placement_bounds)
            .encode(&space, &self.words)
            .context("Failed to encode placement model")?;

        Ok((space, model))
    }

    /// Solve with the configured CaDiCaL oracle.
    ///
    /// Returns `Ok(None)` when the model is infeasible.
    pub fn solve(&self) -> Result<Option<Solution>> {
        let mut oracle = CadicalOracle::new(self.settings.solver.tie_break);
        let solution = self.solve_with(&mut oracle)?;

        if self.settings.output.verbose {
            println!("{}", oracle.statistics());
        }

        Ok(solution)
    }

    /// Run the full pipeline with any oracle
    pub fn solve_with<O: SolveOracle>(&self, oracle: &mut O) -> Result<Option<Solution>> {
        let verbose = self.settings.output.verbose;
        let (space, model) = self.build_model()?;

        if verbose {
            println!("Placing {} words on a {}x{} grid ({} hint cells, not enforced)",
                    self.words.len(), self.grid.rows, self.grid.columns, self.grid.hint_count());
            println!("{}", model.statistics());
        }

        let start_time = Instant::now();
        let assignment = match oracle.solve(&model) {
            Ok(assignment) => assignment,
            Err(SolveError::Infeasible) => {
                if verbose {
                    println!("Model is infeasible");
                }
                return Ok(None);
            }
            Err(e) => return Err(e).context("Solve oracle failed"),
        };
        let solve_time = start_time.elapsed();

        let validation = AssignmentValidator::validate(&model, &assignment);
        if !validation.is_valid {
            return Err(SolveError::Backend(validation.to_string()))
                .context("Oracle returned an assignment that violates the model");
        }

        let placements = SolutionDecoder::decode(&space, &assignment);
        let solution = Solution::new(
            &self.words,
            placements,
            assignment.objective(),
            self.grid.rows,
            self.grid.columns,
            solve_time,
        );

        if verbose {
            println!("Objective {} reached in {:.3}s",
                    solution.objective, solve_time.as_secs_f64());
        }

        Ok(Some(solution))
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TieBreak;
    use crate::crossword::parse_grid_from_string;
    use crate::ilp::model::ConstraintFamily;
    use crate::ilp::{Assignment, Placement};
    use tempfile::tempdir;

    const EXAMPLE_GRID: &str = ".....\n..h..\n.....\n..v..\n.....\n";

    fn example_words() -> Vec<String> {
        ["hello", "halo", "hive", "velvet", "even"].iter().map(|w| w.to_string()).collect()
    }

    fn example_problem(settings: Settings) -> CrosswordProblem {
        let grid = parse_grid_from_string(EXAMPLE_GRID).unwrap();
        CrosswordProblem::with_puzzle(settings, example_words(), grid)
    }

    struct RejectingOracle(SolveError);

    impl SolveOracle for RejectingOracle {
        fn solve(&mut self, _model: &Model) -> Result<Assignment, SolveError> {
            Err(self.0.clone())
        }
    }

    struct AllZeroOracle;

    impl SolveOracle for AllZeroOracle {
        fn solve(&mut self, model: &Model) -> Result<Assignment, SolveError> {
            Ok(Assignment::new(model, vec![0; model.num_variables()]))
        }
    }

    #[test]
    fn test_example_scenario() {
        let problem = example_problem(Settings::default());
        let solution = problem.solve().unwrap().expect("example is feasible");

        assert!(solution.objective > 0);
        assert_eq!(solution.objective, 25);
        assert_eq!(solution.len(), 5);

        let hello = solution.find("hello").unwrap();
        assert!(hello.placements.iter().any(|p| p.column == 0));

        for entry in &solution.entries {
            assert_eq!(entry.placements.len(), 5, "{} should have one start per row", entry.word);
        }
    }

    #[test]
    fn test_one_start_per_row_and_column() {
        let problem = example_problem(Settings::default());
        let solution = problem.solve().unwrap().unwrap();

        for entry in &solution.entries {
            for line in 0..5 {
                let per_line = entry.placements.iter().filter(|p| p.row == line).count();
                assert_eq!(per_line, 1);
            }
        }
    }

    #[test]
    fn test_pinned_tie_break_is_deterministic() {
        let first = example_problem(Settings::default()).solve().unwrap().unwrap();
        let second = example_problem(Settings::default()).solve().unwrap().unwrap();

        assert_eq!(first.objective, second.objective);
        assert_eq!(first.entries, second.entries);
        // earliest start wins every row
        let expected: Vec<_> = (0..5).map(|row| Placement { row, column: 0 }).collect();
        assert_eq!(first.entries[0].placements, expected);
    }

    #[test]
    fn test_unpinned_tie_break_keeps_objective() {
        let mut settings = Settings::default();
        settings.solver.tie_break = TieBreak::FirstFound;
        let solution = example_problem(settings).solve().unwrap().unwrap();
        assert_eq!(solution.objective, 25);
    }

    #[test]
    fn test_placement_bounds_do_not_change_result() {
        // (words, grid, start span)
        let cases: Vec<(Vec<&str>, &str, usize)> = vec![
            (vec!["hello", "halo", "hive", "velvet", "even"], EXAMPLE_GRID, 10),
            (vec![], EXAMPLE_GRID, 10),
            (vec!["abcdefghijkl", "ab"], "...\n...\n", 10),
            (vec!["ab", "ab"], "...\n...\n", 10),
            (vec!["hello"], EXAMPLE_GRID, 4),
            (vec!["", "rust"], "....\n", 6),
            (vec!["hello", "halo"], EXAMPLE_GRID, 0),
        ];

        for (words, grid_text, span) in cases {
            let words: Vec<String> = words.iter().map(|w| w.to_string()).collect();
            let grid = parse_grid_from_string(grid_text).unwrap();

            let mut bounded = Settings::default();
            bounded.model.start_span = span;
            let mut unbounded = bounded.clone();
            unbounded.model.placement_bounds = false;

            let with_bounds = CrosswordProblem::with_puzzle(bounded, words.clone(), grid.clone());
            let without_bounds = CrosswordProblem::with_puzzle(unbounded, words.clone(), grid);

            let (_, model) = with_bounds.build_model().unwrap();
            let (_, trimmed) = without_bounds.build_model().unwrap();
            assert_eq!(
                model.without_family(ConstraintFamily::PlacementBound).constraints(),
                trimmed.constraints(),
                "{:?} with span {}", words, span
            );

            let first = with_bounds.solve().unwrap();
            let second = without_bounds.solve().unwrap();
            assert_eq!(first.is_some(), second.is_some(), "{:?} with span {}", words, span);
            assert_eq!(
                first.as_ref().map(|s| s.objective),
                second.as_ref().map(|s| s.objective),
                "{:?} with span {}", words, span
            );
            assert_eq!(first.map(|s| s.entries), second.map(|s| s.entries));
        }

        let grid = parse_grid_from_string(EXAMPLE_GRID).unwrap();
        let mut settings = Settings::default();
        settings.model.start_span = 0;
        let problem = CrosswordProblem::with_puzzle(settings.clone(), example_words(), grid.clone());
        settings.model.placement_bounds = false;
        let trimmed = CrosswordProblem::with_puzzle(settings, example_words(), grid);
        assert!(problem.solve().unwrap().is_none());
        assert!(trimmed.solve().unwrap().is_none());
    }

    #[test]
    fn test_scales_to_larger_grids() {
        let grid_text = format!("{}\n", ".".repeat(15)).repeat(15);
        let grid = parse_grid_from_string(&grid_text).unwrap();
        let words: Vec<String> = (0..20).map(|i| format!("word{:02}", i)).collect();
        let problem = CrosswordProblem::with_puzzle(Settings::default(), words, grid);

        let start = Instant::now();
        let solution = problem.solve().unwrap().unwrap();

        assert!(start.elapsed().as_secs() < 10, "took {:?}", start.elapsed());
        assert_eq!(solution.objective, 20 * 15);
        assert!(solution.entries.iter().all(|e| e.placements.len() == 15));
    }

    #[test]
    fn test_variable_space_completeness() {
        let (space, model) = example_problem(Settings::default()).build_model().unwrap();
        assert_eq!(space.variable_count(), 5 * 5 * 10);
        assert_eq!(model.num_variables(), 250);

        let mut settings = Settings::default();
        settings.model.start_span = 13;
        let (space, _) = example_problem(settings).build_model().unwrap();
        assert_eq!(space.variable_count(), 5 * 5 * 13);
    }

    #[test]
    fn test_empty_word_list() {
        let grid = parse_grid_from_string(EXAMPLE_GRID).unwrap();
        let problem = CrosswordProblem::with_puzzle(Settings::default(), Vec::new(), grid);

        let (space, model) = problem.build_model().unwrap();
        assert!(space.is_empty());
        assert_eq!(model.statistics().total_constraints, 0);

        let solution = problem.solve().unwrap().unwrap();
        assert!(solution.is_empty());
        assert_eq!(solution.objective, 0);
    }

    #[test]
    fn test_infeasible_reports_no_solution() {
        let mut settings = Settings::default();
        settings.model.start_span = 0;
        // no start columns: every "exactly one" row sum is empty
        assert!(example_problem(settings).solve().unwrap().is_none());

        let problem = example_problem(Settings::default());
        let mut oracle = RejectingOracle(SolveError::Infeasible);
        assert!(problem.solve_with(&mut oracle).unwrap().is_none());
    }

    #[test]
    fn test_backend_errors_are_fatal() {
        let problem = example_problem(Settings::default());
        let mut oracle = RejectingOracle(SolveError::Backend("out of memory".to_string()));
        assert!(problem.solve_with(&mut oracle).is_err());

        let mut unbounded = RejectingOracle(SolveError::Unbounded);
        assert!(problem.solve_with(&mut unbounded).is_err());
    }

    #[test]
    fn test_invalid_assignment_is_rejected() {
        let problem = example_problem(Settings::default());
        assert!(problem.solve_with(&mut AllZeroOracle).is_err());
    }

    #[test]
    fn test_duplicate_words_stay_separate() {
        let grid = parse_grid_from_string("...\n...\n").unwrap();
        let words = vec!["ab".to_string(), "ab".to_string()];
        let problem = CrosswordProblem::with_puzzle(Settings::default(), words, grid);

        let solution = problem.solve().unwrap().unwrap();
        assert_eq!(solution.len(), 2);
        assert_eq!(solution.placements(0).unwrap().len(), 2);
        assert_eq!(solution.placements(1).unwrap().len(), 2);
        assert_eq!(solution.objective, 4);
    }

    #[test]
    fn test_load_from_settings() {
        let temp_dir = tempdir().unwrap();
        let grid_path = temp_dir.path().join("example.txt");
        std::fs::write(&grid_path, EXAMPLE_GRID).unwrap();

        let mut settings = Settings::default();
        settings.puzzle.grid_file = grid_path;
        let problem = CrosswordProblem::new(settings).unwrap();

        assert_eq!(problem.grid().rows, 5);
        assert_eq!(problem.grid().hints(), vec![(1, 2, 'h'), (3, 2, 'v')]);
        assert_eq!(problem.words().len(), 5);

        let mut missing = Settings::default();
        missing.puzzle.grid_file = temp_dir.path().join("missing.txt");
        assert!(CrosswordProblem::new(missing).is_err());
    }
}
