use clap::{Parser, Subcommand};

use chart_spec_sdk::cli::commands::{handle_codegen, handle_render, handle_validate};

#[derive(Parser, Debug)]
#[command(name = "chart-spec-cli", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a JSON chart specification and print a summary.
    Validate {
        /// Input JSON file, or `-` for stdin.
        input: String,
    },
    /// Emit builder-script source for a JSON chart specification.
    Codegen {
        /// Input JSON file, or `-` for stdin.
        input: String,
    },
    /// Evaluate a builder script and print the JSON specification.
    Render {
        /// Input script file, or `-` for stdin.
        input: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate { input } => handle_validate(&input)?,
        Command::Codegen { input } => handle_codegen(&input)?,
        Command::Render { input } => handle_render(&input)?,
    }
    Ok(())
}
