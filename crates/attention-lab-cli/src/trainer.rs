//! Trainer CLI Subcommands
//!
//! This module provides CLI commands for the attention trainer including:
//! - Puzzle worksheet generation
//! - Step-by-step derivation walkthroughs
//! - The interactive three-level game
//! - Self-check diagnostics

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use attention_lab_trainer::{
    run_self_check, AttemptOutcome, Puzzle, PuzzleConfig, PuzzleGenerator, Stage, TrainerConfig,
    TrainerSession, TuneOutcome, Walkthrough,
};

/// Arguments for the generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Seed for reproducible generation (drawn from entropy if not specified)
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Number of key/value pairs
    #[arg(short, long, default_value = "4")]
    pub keys: usize,

    /// Dimension of the query and keys
    #[arg(long, default_value = "3")]
    pub dim_qk: usize,

    /// Dimension of the values
    #[arg(long, default_value = "3")]
    pub dim_v: usize,

    /// Inclusive integer component range: min,max
    #[arg(short, long, default_value = "-3,3", allow_hyphen_values = true)]
    pub range: String,

    /// Decimal digits shown for derived numbers
    #[arg(short, long, default_value = "3")]
    pub precision: u32,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Include the solution section
    #[arg(long)]
    pub reveal: bool,
}

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Seed for reproducible generation (drawn from entropy if not specified)
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Number of key/value pairs
    #[arg(short, long, default_value = "4")]
    pub keys: usize,

    /// Dimension of the query and keys
    #[arg(long, default_value = "3")]
    pub dim_qk: usize,

    /// Dimension of the values
    #[arg(long, default_value = "3")]
    pub dim_v: usize,

    /// Inclusive integer component range: min,max
    #[arg(short, long, default_value = "-3,3", allow_hyphen_values = true)]
    pub range: String,

    /// Decimal digits shown for derived numbers
    #[arg(short, long, default_value = "3")]
    pub precision: u32,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the play command
#[derive(Args, Debug)]
pub struct PlayArgs {
    /// Seed for a reproducible run (drawn from entropy if not specified)
    #[arg(short, long)]
    pub seed: Option<u64>,
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Seed for the diagnostic puzzle
    #[arg(short, long, default_value = "42")]
    pub seed: u64,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum OutputFormat {
    /// Pretty table output
    #[default]
    Table,
    /// JSON output
    Json,
    /// Compact tab-separated output
    Compact,
}

// ============================================================================
// Display Structs for Tables
// ============================================================================

/// Labeled vector row for tables
#[derive(Tabled)]
struct VectorRow {
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Components")]
    components: String,
}

/// Diagnostic check row for tables
#[derive(Tabled)]
struct CheckRow {
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Check")]
    name: String,
    #[tabled(rename = "Details")]
    details: String,
}

/// Serializable worksheet for JSON output
#[derive(Serialize)]
struct PuzzleSheet {
    query: Vec<f64>,
    keys: Vec<Vec<f64>>,
    values: Vec<Vec<f64>>,
    choices: Vec<Vec<f64>>,
    display_precision: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    solution: Option<PuzzleSolution>,
}

/// Solution section of a worksheet
#[derive(Serialize)]
struct PuzzleSolution {
    scores: Vec<f64>,
    probabilities: Vec<f64>,
    output: Vec<f64>,
    rounded_output: Vec<f64>,
    best_key: usize,
    correct_choice: usize,
}

impl PuzzleSheet {
    fn new(puzzle: &Puzzle, reveal: bool) -> Self {
        let solution = reveal.then(|| PuzzleSolution {
            scores: puzzle.scores().to_vec(),
            probabilities: puzzle.probabilities().to_vec(),
            output: puzzle.output().to_vec(),
            rounded_output: puzzle.rounded_output(),
            best_key: puzzle.best_key_index(),
            correct_choice: puzzle.correct_choice(),
        });
        Self {
            query: puzzle.query().to_vec(),
            keys: puzzle.keys().to_vec(),
            values: puzzle.values().to_vec(),
            choices: puzzle.choices().to_vec(),
            display_precision: puzzle.display_precision(),
            solution,
        }
    }
}

// ============================================================================
// Command Execution
// ============================================================================

/// Execute the generate command
pub fn generate(args: GenerateArgs) -> Result<()> {
    let config = build_config(args.keys, args.dim_qk, args.dim_v, &args.range, args.precision)?;
    let mut generator = build_generator(config, args.seed)?;
    let puzzle = generator.generate()?;
    tracing::debug!(seed = ?args.seed, keys = args.keys, "worksheet generated");

    match args.format {
        OutputFormat::Json => {
            let sheet = PuzzleSheet::new(&puzzle, args.reveal);
            println!("{}", serde_json::to_string_pretty(&sheet)?);
        }
        OutputFormat::Compact => {
            println!("query\t{}", format_vector(puzzle.query(), args.precision));
            for (i, key) in puzzle.keys().iter().enumerate() {
                println!("key {}\t{}", i, format_vector(key, args.precision));
            }
            for (i, value) in puzzle.values().iter().enumerate() {
                println!("value {}\t{}", i, format_vector(value, args.precision));
            }
            for (i, choice) in puzzle.choices().iter().enumerate() {
                println!(
                    "choice {}\t{}",
                    choice_label(i),
                    format_vector(choice, args.precision)
                );
            }
            if args.reveal {
                println!("scores\t{}", format_vector(puzzle.scores(), args.precision));
                println!(
                    "probabilities\t{}",
                    format_vector(puzzle.probabilities(), args.precision)
                );
                println!(
                    "output\t{}",
                    format_vector(&puzzle.rounded_output(), args.precision)
                );
                println!("best key\t{}", puzzle.best_key_index());
                println!("correct choice\t{}", choice_label(puzzle.correct_choice()));
            }
        }
        OutputFormat::Table => {
            println!("{}", "Attention Puzzle".bold().cyan());
            println!("{}", "=".repeat(50));
            render_inputs(&puzzle);
            println!();
            println!("{}", "Choices".bold());
            render_choices(&puzzle);

            if args.reveal {
                println!();
                println!("{}", "Solution".bold().cyan());
                println!("{}", "=".repeat(50));
                let rows = vec![
                    VectorRow {
                        label: "Scores s".to_string(),
                        components: format_vector(puzzle.scores(), args.precision),
                    },
                    VectorRow {
                        label: "Probabilities p".to_string(),
                        components: format_vector(puzzle.probabilities(), args.precision),
                    },
                    VectorRow {
                        label: "Output".to_string(),
                        components: format_vector(&puzzle.rounded_output(), args.precision),
                    },
                ];
                let table = Table::new(rows).with(Style::rounded()).to_string();
                println!("{}", table);
                println!(
                    "{} Best key: k{} | Correct choice: {}",
                    "[OK]".green().bold(),
                    puzzle.best_key_index(),
                    choice_label(puzzle.correct_choice())
                );
            } else {
                println!();
                println!(
                    "{} Solve by hand, or re-run with {} to see the solution.",
                    "[INFO]".blue(),
                    "--reveal".green()
                );
            }
        }
    }

    Ok(())
}

/// Execute the inspect command
pub fn inspect(args: InspectArgs) -> Result<()> {
    let config = build_config(args.keys, args.dim_qk, args.dim_v, &args.range, args.precision)?;
    let mut generator = build_generator(config, args.seed)?;
    let puzzle = generator.generate()?;
    let walkthrough = Walkthrough::new(&puzzle);
    let precision = puzzle.display_precision();

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(walkthrough.steps())?);
        }
        OutputFormat::Compact => {
            for step in walkthrough.steps() {
                for row in &step.rows {
                    println!(
                        "{}\t{}\t{}",
                        step.stage.title(),
                        row.label,
                        format_vector(&row.vector, precision)
                    );
                }
            }
        }
        OutputFormat::Table => {
            println!("{}", "Attention Walkthrough".bold().cyan());
            println!("{}", "=".repeat(60));
            for (i, step) in walkthrough.steps().iter().enumerate() {
                println!();
                println!(
                    "{} {}",
                    format!("Step {}:", i + 1).bold().cyan(),
                    step.stage.title().bold()
                );
                println!("{}", step.stage.explanation().dimmed());
                let rows: Vec<VectorRow> = step
                    .rows
                    .iter()
                    .map(|row| VectorRow {
                        label: row.label.clone(),
                        components: format_vector(&row.vector, precision),
                    })
                    .collect();
                let table = Table::new(rows).with(Style::rounded()).to_string();
                println!("{}", table);
            }
        }
    }

    Ok(())
}

/// Execute the play command
pub fn play(args: PlayArgs) -> Result<()> {
    let config = TrainerConfig::default();
    let mut session = match args.seed {
        Some(seed) => TrainerSession::with_seed(config, seed)?,
        None => TrainerSession::new(config)?,
    };
    tracing::debug!(seed = ?args.seed, "interactive session started");

    println!("{}", "Attention Lab".bold().cyan());
    println!("{}", "=".repeat(50));
    println!("Work each puzzle through three levels. Type 'q' at any prompt to quit.");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let stage = session.stage();
        match stage {
            Stage::FindKey => {
                println!();
                print_stage_header(stage);
                render_inputs(session.puzzle());
                let limit = session.puzzle().key_count() - 1;
                let Some(input) = prompt(&mut lines, &format!("Key index [0-{limit}]")) else {
                    break;
                };
                if is_quit(&input) {
                    break;
                }
                match parse_index(&input, session.puzzle().key_count()) {
                    Ok(index) => {
                        let outcome = session.attempt_find_key(index)?;
                        print_attempt_feedback(&outcome);
                        print_progress(&session);
                    }
                    Err(e) => print_input_error(&e),
                }
            }
            Stage::TuneSoftmax => {
                println!();
                print_stage_header(stage);
                let precision = session.puzzle().display_precision();
                println!(
                    "  {} {}",
                    "Scores:".dimmed(),
                    format_vector(session.puzzle().scores(), precision)
                );
                println!(
                    "  {} {}",
                    "Candidate:".dimmed(),
                    format_vector(session.candidate(), precision)
                );
                println!(
                    "  {} {:.4} (pass below {:.4})",
                    "Distance:".dimmed(),
                    session.candidate_distance()?,
                    session.rules().tune_threshold
                );
                let n = session.puzzle().key_count();
                let Some(input) = prompt(&mut lines, &format!("{n} weights, or 'auto'")) else {
                    break;
                };
                if is_quit(&input) {
                    break;
                }
                if input.eq_ignore_ascii_case("auto") {
                    let outcome = session.auto_match()?;
                    print_tune_feedback(&outcome);
                    print_progress(&session);
                    continue;
                }
                match parse_weights(&input, n) {
                    Ok(weights) => {
                        let outcome = session.submit_candidate(&weights)?;
                        print_tune_feedback(&outcome);
                        print_progress(&session);
                    }
                    Err(e) => print_input_error(&e),
                }
            }
            Stage::MixValues => {
                println!();
                print_stage_header(stage);
                let precision = session.puzzle().display_precision();
                println!(
                    "  {} {}",
                    "Probabilities:".dimmed(),
                    format_vector(session.puzzle().probabilities(), precision)
                );
                render_choices(session.puzzle());
                let count = session.puzzle().choices().len();
                let Some(input) = prompt(&mut lines, "Choice") else {
                    break;
                };
                if is_quit(&input) {
                    break;
                }
                match parse_choice(&input, count) {
                    Ok(index) => {
                        let outcome = session.attempt_mix_values(index)?;
                        print_attempt_feedback(&outcome);
                        print_progress(&session);
                    }
                    Err(e) => print_input_error(&e),
                }
            }
            Stage::Complete => {
                println!();
                println!("{} Puzzle complete!", "[DONE]".green().bold());
                print_progress(&session);
                let Some(input) = prompt(&mut lines, "Another puzzle? [y/n]") else {
                    break;
                };
                if input.eq_ignore_ascii_case("y") || input.eq_ignore_ascii_case("yes") {
                    session.new_puzzle()?;
                } else {
                    break;
                }
            }
        }
    }

    println!();
    println!(
        "{} Final score: {} | Streak: {}",
        "[DONE]".green().bold(),
        session.score().to_string().bold(),
        session.streak()
    );

    Ok(())
}

/// Execute the check command
pub fn check(args: CheckArgs) -> Result<()> {
    let reports = run_self_check(args.seed)?;
    let passed = reports.iter().filter(|r| r.passed).count();
    let total = reports.len();

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        OutputFormat::Compact => {
            for report in &reports {
                println!(
                    "{}\t{}",
                    report.name,
                    if report.passed { "pass" } else { "fail" }
                );
            }
        }
        OutputFormat::Table => {
            println!("{}", "Self-Check Diagnostics".bold().cyan());
            println!("{}", "=".repeat(60));
            let rows: Vec<CheckRow> = reports
                .iter()
                .map(|report| CheckRow {
                    status: if report.passed {
                        "[PASS]".green().bold().to_string()
                    } else {
                        "[FAIL]".red().bold().to_string()
                    },
                    name: report.name.clone(),
                    details: report.details.clone(),
                })
                .collect();
            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{}", table);
            println!();
            if passed == total {
                println!(
                    "{} {} of {} checks passed (seed {})",
                    "[OK]".green().bold(),
                    passed,
                    total,
                    args.seed
                );
            }
        }
    }

    if passed != total {
        anyhow::bail!("{} of {} checks failed", total - passed, total);
    }

    Ok(())
}

/// Build a puzzle configuration from command-line values
fn build_config(
    keys: usize,
    dim_qk: usize,
    dim_v: usize,
    range: &str,
    precision: u32,
) -> Result<PuzzleConfig> {
    let (min, max) = parse_range(range)?;
    Ok(PuzzleConfig::builder()
        .key_count(keys)
        .dim_qk(dim_qk)
        .dim_v(dim_v)
        .component_range(min, max)
        .display_precision(precision)
        .build())
}

/// Build a generator, seeded or from entropy
fn build_generator(config: PuzzleConfig, seed: Option<u64>) -> Result<PuzzleGenerator> {
    let generator = match seed {
        Some(seed) => PuzzleGenerator::with_seed(config, seed)?,
        None => PuzzleGenerator::new(config)?,
    };
    Ok(generator)
}

/// Parse a "min,max" range string
fn parse_range(range: &str) -> Result<(i64, i64)> {
    let parts: Vec<i64> = range
        .split(',')
        .map(|s| s.trim().parse::<i64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("Failed to parse range values as integers")?;

    if parts.len() != 2 {
        anyhow::bail!("Range requires 2 values: min,max (got {})", parts.len());
    }
    Ok((parts[0], parts[1]))
}

/// Parse a whitespace- or comma-separated weight list
fn parse_weights(input: &str, count: usize) -> Result<Vec<f64>> {
    let weights: Vec<f64> = input
        .split([',', ' '])
        .filter(|part| !part.is_empty())
        .map(|part| part.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("Failed to parse weights as numbers")?;

    if weights.len() != count {
        anyhow::bail!(
            "Expected {} weights separated by spaces (got {})",
            count,
            weights.len()
        );
    }
    Ok(weights)
}

/// Parse a key index
fn parse_index(input: &str, count: usize) -> Result<usize> {
    let index = input
        .trim()
        .parse::<usize>()
        .context("Failed to parse the key index as a number")?;
    if index >= count {
        anyhow::bail!("Key index {} out of range (0-{})", index, count - 1);
    }
    Ok(index)
}

/// Parse a choice given as a letter or an index
fn parse_choice(input: &str, count: usize) -> Result<usize> {
    let trimmed = input.trim();
    let index = match trimmed.to_ascii_uppercase().as_str() {
        "A" => 0,
        "B" => 1,
        "C" => 2,
        other => other
            .parse::<usize>()
            .context("Failed to parse the choice as a letter or number")?,
    };
    if index >= count {
        anyhow::bail!("Choice '{}' out of range ({} choices)", trimmed, count);
    }
    Ok(index)
}

// ============================================================================
// Formatting Helpers
// ============================================================================

/// Format a vector at the given decimal precision
fn format_vector(v: &[f64], precision: u32) -> String {
    let parts: Vec<String> = v
        .iter()
        .map(|x| format!("{:.*}", precision as usize, x))
        .collect();
    format!("[{}]", parts.join(", "))
}

/// Letter label for a choice index
fn choice_label(index: usize) -> char {
    (b'A' + index as u8) as char
}

/// Print the table of puzzle input vectors
fn render_inputs(puzzle: &Puzzle) {
    let precision = puzzle.display_precision();
    let mut rows = vec![VectorRow {
        label: "Query q".to_string(),
        components: format_vector(puzzle.query(), precision),
    }];
    for (i, key) in puzzle.keys().iter().enumerate() {
        rows.push(VectorRow {
            label: format!("Key k{i}"),
            components: format_vector(key, precision),
        });
    }
    for (i, value) in puzzle.values().iter().enumerate() {
        rows.push(VectorRow {
            label: format!("Value v{i}"),
            components: format_vector(value, precision),
        });
    }
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);
}

/// Print the lettered answer choices
fn render_choices(puzzle: &Puzzle) {
    let precision = puzzle.display_precision();
    for (i, choice) in puzzle.choices().iter().enumerate() {
        println!(
            "  {} {}",
            format!("{})", choice_label(i)).bold(),
            format_vector(choice, precision)
        );
    }
}

/// Print the level banner with its instruction
fn print_stage_header(stage: Stage) {
    if let Some(level) = stage.level_number() {
        println!(
            "{} {}",
            format!("Level {level}:").bold().cyan(),
            stage.title().bold()
        );
        println!("{}", stage.description().dimmed());
    }
}

/// Print feedback for a level-1 or level-3 attempt
fn print_attempt_feedback(outcome: &AttemptOutcome) {
    if outcome.correct {
        println!(
            "{} Correct! +{} points",
            "[OK]".green().bold(),
            outcome.points_awarded
        );
    } else {
        println!(
            "{} Not this one. Streak reset; try again.",
            "[MISS]".yellow().bold()
        );
    }
}

/// Print feedback for a level-2 evaluation
fn print_tune_feedback(outcome: &TuneOutcome) {
    if outcome.passed {
        println!(
            "{} Matched at distance {:.4}. +{} points",
            "[OK]".green().bold(),
            outcome.distance,
            outcome.points_awarded
        );
    } else {
        println!(
            "{} Distance {:.4}, keep adjusting.",
            "[INFO]".blue(),
            outcome.distance
        );
    }
}

/// Print the running score and streak
fn print_progress(session: &TrainerSession) {
    println!(
        "  {} {}  {} {}",
        "Score:".dimmed(),
        session.score().to_string().bold(),
        "Streak:".dimmed(),
        session.streak().to_string().bold()
    );
}

/// Print a rejected-input message and leave the session untouched
fn print_input_error(error: &anyhow::Error) {
    eprintln!("{} {}", "[ERROR]".red().bold(), error);
}

/// Show a prompt and read one trimmed line, `None` on end of input
fn prompt<I>(lines: &mut I, label: &str) -> Option<String>
where
    I: Iterator<Item = io::Result<String>>,
{
    print!("{} ", format!("{label}>").bold());
    let _ = io::stdout().flush();
    let line = lines.next()?.ok()?;
    Some(line.trim().to_string())
}

/// Check for a quit request
fn is_quit(input: &str) -> bool {
    input.eq_ignore_ascii_case("q") || input.eq_ignore_ascii_case("quit")
}
