//! # Chunk Scenario
//!
//! Runs the ECS scenario in chunk or no-chunk mode and logs progress.
//!
//! ```bash
//! # Default settings: 100 000 chunked entities for 60 seconds
//! cargo run --release --bin chunk_scenario
//!
//! # The boxed-entity comparison run
//! cargo run --release --bin chunk_scenario -- --mode no-chunk
//!
//! # Settings from a TOML file, with engine debug logs
//! RUST_LOG=strata_core=debug cargo run --release --bin chunk_scenario -- scenario.toml
//! ```

use std::process::ExitCode;

use strata::{ScenarioConfig, ScenarioError, ScenarioMode};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage: chunk_scenario [OPTIONS] [CONFIG]

Arguments:
  [CONFIG]                 TOML scenario settings (default: built-in)

Options:
  -m, --mode <MODE>        no-chunk | chunk, overrides the config's mode
  -h, --help               Show this help";

struct Args {
    config: Option<String>,
    mode: Option<ScenarioMode>,
    help: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args, ScenarioError> {
    let mut parsed = Args {
        config: None,
        mode: None,
        help: false,
    };

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--mode" | "-m" => {
                let value = args
                    .next()
                    .ok_or_else(|| ScenarioError::Invalid("--mode needs a value".to_string()))?;
                parsed.mode = Some(value.parse()?);
            }
            "--help" | "-h" => parsed.help = true,
            _ if arg.starts_with('-') => {
                return Err(ScenarioError::Invalid(format!("unknown option {arg}")));
            }
            _ => parsed.config = Some(arg),
        }
    }
    Ok(parsed)
}

fn run() -> Result<(), ScenarioError> {
    let args = parse_args(std::env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }

    let mut config = match args.config {
        Some(path) => {
            tracing::info!("Loading config from {}", path);
            ScenarioConfig::load(path)?
        }
        None => ScenarioConfig::default(),
    };
    if let Some(mode) = args.mode {
        config.mode = mode;
    }

    tracing::info!("Scenario mode: {}", config.mode);
    strata::run(config)?;
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("Scenario failed: {}", error);
            ExitCode::FAILURE
        }
    }
}
