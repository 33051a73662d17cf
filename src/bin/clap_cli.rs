use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use proximity_clap::config::AppConfig;
use proximity_clap::replay::{replay, SampleTrace};

#[derive(Parser, Debug)]
#[command(
    name = "clap_cli",
    about = "Replay proximity sensor traces through the clap detector"
)]
struct Cli {
    /// JSON config overriding the built-in detector policy
    #[arg(long)]
    config: Option<PathBuf>,
    /// Log detector activity to stderr
    #[arg(long)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a timed sample trace and print the resulting host calls
    Replay {
        #[arg(long)]
        trace: PathBuf,
        /// Write the report here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the effective configuration as JSON
    DumpConfig,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    if cli.verbose {
        proximity_clap::init_logging();
        proximity_clap::log_startup();
    }

    let config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path),
        None => AppConfig::default(),
    };

    match cli.command {
        Commands::Replay { trace, output } => run_replay(&config, trace, output),
        Commands::DumpConfig => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(ExitCode::from(0))
        }
    }
}

fn run_replay(config: &AppConfig, trace_path: PathBuf, output: Option<PathBuf>) -> Result<ExitCode> {
    let trace = SampleTrace::load(&trace_path)?;
    let report = replay(&trace, config)
        .with_context(|| format!("replaying {}", trace_path.display()))?;
    let json = serde_json::to_string_pretty(&report)?;

    if let Some(path) = output {
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    } else {
        println!("{json}");
    }

    Ok(ExitCode::from(0))
}
