//! Attention Lab CLI
//!
//! Command-line interface for the Attention Lab trainer: generate puzzle
//! worksheets, walk through the attention derivation step by step, play the
//! three-level game in the terminal, and run the built-in diagnostics.
//!
//! # Features
//!
//! - **generate**: Produce a puzzle worksheet from a seed or from entropy
//! - **inspect**: Show every stage of the attention computation
//! - **play**: Interactive three-level game with score and streak
//! - **check**: Run the self-check diagnostics
//! - **version**: Display version information
//!
//! # Usage
//!
//! ```bash
//! # Generate a reproducible puzzle worksheet
//! attention-lab generate --seed 42
//!
//! # Same puzzle with the solution section included
//! attention-lab generate --seed 42 --reveal
//!
//! # Walk through the full derivation as tables
//! attention-lab inspect --seed 42
//!
//! # Play the game
//! attention-lab play
//!
//! # Run the diagnostics and emit JSON
//! attention-lab check --format json
//! ```

use clap::{Parser, Subcommand};

pub mod trainer;

/// Attention Lab Command Line Interface
#[derive(Parser, Debug)]
#[command(name = "attention-lab")]
#[command(author, version, about = "Interactive attention mechanism trainer")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a puzzle worksheet
    Generate(trainer::GenerateArgs),

    /// Walk through the attention computation stage by stage
    Inspect(trainer::InspectArgs),

    /// Play the three-level game interactively
    Play(trainer::PlayArgs),

    /// Run the self-check diagnostics
    Check(trainer::CheckArgs),

    /// Display version information
    Version,
}
