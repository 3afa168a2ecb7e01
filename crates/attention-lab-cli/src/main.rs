//! Attention Lab CLI Entry Point
//!
//! This is the main entry point for the attention-lab command-line tool.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use attention_lab_cli::{trainer, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => trainer::generate(args)?,
        Commands::Inspect(args) => trainer::inspect(args)?,
        Commands::Play(args) => trainer::play(args)?,
        Commands::Check(args) => trainer::check(args)?,
        Commands::Version => {
            println!("attention-lab {}", env!("CARGO_PKG_VERSION"));
            println!("Trainer module version: {}", attention_lab_trainer::VERSION);
            println!("Core module version: {}", attention_lab_core::VERSION);
        }
    }

    Ok(())
}
