//! Command line interface for the crossword placement solver

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use crossword_ilp::{
    config::{CliOverrides, OutputFormat, Settings},
    crossword::{create_example_puzzles, load_grid_from_file},
    placement::CrosswordProblem,
    solve_batch,
    utils::{ColorOutput, SolutionFormatter},
};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "crossword_ilp")]
#[command(about = "Crossword word placement as a 0/1 integer program")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Place a word list on a grid
    Solve {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Comma separated word list (overrides config)
        #[arg(short, long, value_delimiter = ',')]
        words: Option<Vec<String>>,

        /// Grid file (overrides config)
        #[arg(short, long)]
        grid: Option<PathBuf>,

        /// Number of candidate start columns (overrides config)
        #[arg(short, long)]
        span: Option<usize>,

        /// Output format (overrides config)
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// Also write the solution to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Create an example configuration and puzzle grids
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Show grid and model statistics without solving
    Analyze {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Grid file (overrides config)
        #[arg(short, long)]
        grid: Option<PathBuf>,
    },

    /// Solve every *.yaml configuration in a directory in parallel
    Batch {
        /// Directory holding configuration files
        #[arg(short, long)]
        directory: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve { config, words, grid, span, format, output, verbose } => {
            let overrides = CliOverrides {
                words,
                grid_file: grid,
                start_span: span,
                format: format.map(Into::into),
                output_file: output,
                verbose,
            };
            solve_command(config, overrides)
        }
        Commands::Setup { directory, force } => setup_command(directory, force),
        Commands::Analyze { config, grid } => analyze_command(config, grid),
        Commands::Batch { directory } => batch_command(directory),
    }
}

fn load_settings(config_path: &PathBuf) -> Result<Settings> {
    if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))
    } else {
        eprintln!("{}", ColorOutput::warning(&format!(
            "Config file {} not found, using defaults", config_path.display()
        )));
        Ok(Settings::default())
    }
}

fn solve_command(config_path: PathBuf, overrides: CliOverrides) -> Result<()> {
    let mut settings = load_settings(&config_path)?;
    settings.merge_with_cli(&overrides);
    settings.validate()
        .context("Configuration validation failed")?;

    let verbose = settings.output.verbose;
    let format = settings.output.format;
    let output_file = settings.output.output_file.clone();

    if verbose {
        println!("{}", ColorOutput::info("Encoding placement model and solving..."));
        println!("  Words: {}", settings.puzzle.words.join(", "));
        println!("  Grid: {}", settings.puzzle.grid_file.display());
        println!("  Start span: {}", settings.model.start_span);
        println!();
    }

    let start_time = Instant::now();
    let problem = CrosswordProblem::new(settings)
        .context("Failed to create placement problem")?;
    let outcome = problem.solve()
        .context("Failed to solve placement problem")?;

    print!("{}", SolutionFormatter::format_outcome(outcome.as_ref(), format)?);

    if let Some(solution) = outcome.as_ref() {
        let overflowing = solution.overflowing_words();
        if !overflowing.is_empty() {
            eprintln!("{}", ColorOutput::warning(&format!(
                "Start columns beyond the {}-column grid for: {}",
                solution.grid_columns,
                overflowing.join(", ")
            )));
        }
    }

    if verbose {
        println!("{}", ColorOutput::success(&format!(
            "Finished in {:.3}s", start_time.elapsed().as_secs_f64()
        )));
    }

    if let (Some(solution), Some(path)) = (outcome.as_ref(), output_file) {
        SolutionFormatter::save_solution(solution, &path, format)?;
        println!("{}", ColorOutput::success(&format!("Solution saved to {}", path.display())));
    }

    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up project structure..."));

    let config_dir = directory.join("config");
    let puzzle_dir = directory.join("input/puzzles");

    for dir in [&config_dir, &puzzle_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    // grid paths are written relative to the setup directory
    let mut example = Settings::default();
    example.puzzle.grid_file = puzzle_dir.join("example.txt");

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        example.to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    create_example_puzzles(&puzzle_dir)
        .context("Failed to create example puzzles")?;
    println!("Created example puzzles in: {}", puzzle_dir.display());

    let mut blank = Settings::default();
    blank.puzzle.words = vec!["crate".to_string(), "rust".to_string(), "cargo".to_string()];
    blank.puzzle.grid_file = puzzle_dir.join("blank_3x8.txt");
    blank.to_file(&config_dir.join("batch/blank.yaml"))?;
    example.to_file(&config_dir.join("batch/example.yaml"))?;

    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit {}", config_path.display());
    println!("2. Run: cargo run -- solve --config {}", config_path.display());

    Ok(())
}

fn analyze_command(config_path: PathBuf, grid: Option<PathBuf>) -> Result<()> {
    let mut settings = load_settings(&config_path)?;
    settings.merge_with_cli(&CliOverrides { grid_file: grid, ..Default::default() });

    let target = load_grid_from_file(&settings.puzzle.grid_file)
        .with_context(|| format!("Failed to load grid from {}", settings.puzzle.grid_file.display()))?;

    println!("Grid ({}x{}):", target.rows, target.columns);
    println!("{}", target);
    println!("Hint cells (not enforced): {}", target.hint_count());

    if target.columns > settings.model.start_span {
        println!("{}", ColorOutput::warning(&format!(
            "Grid is wider than the start span ({}); columns beyond it get no candidates",
            settings.model.start_span
        )));
    }

    let words = settings.puzzle.words.clone();
    let problem = CrosswordProblem::with_puzzle(settings, words, target);
    let (space, model) = problem.build_model()?;
    println!("\n{}", space);
    println!("{}", model.statistics());

    Ok(())
}

fn batch_command(directory: PathBuf) -> Result<()> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(&directory)
        .with_context(|| format!("Failed to read directory: {}", directory.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "yaml"))
        .collect();
    entries.sort();

    let mut labels = Vec::new();
    let mut configs = Vec::new();
    for path in entries {
        match Settings::from_file(&path) {
            Ok(settings) => {
                labels.push(path.file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("unknown")
                    .to_string());
                configs.push(settings);
            }
            Err(e) => eprintln!("{}", ColorOutput::warning(&format!(
                "Skipping {}: {:#}", path.display(), e
            ))),
        }
    }

    println!("{}", ColorOutput::info(&format!("Solving {} puzzle(s)...", configs.len())));

    for (label, result) in labels.iter().zip(solve_batch(configs)) {
        match result {
            Ok(outcome) => println!("{}", SolutionFormatter::format_summary(label, outcome.as_ref())),
            Err(e) => println!("{}", ColorOutput::error(&format!("{:24} | error: {:#}", label, e))),
        }
    }

    Ok(())
}
