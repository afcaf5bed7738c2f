// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Drehwerk: Orientation bridge simulator
//
// Entry point. Loads the bridge config, initialises logging, replays a
// scenario against the orientation service on the stub host, and prints one
// JSON line per constant, event, and reply.
//
// Usage: drehwerk <scenario.json> [--config <config.json>]

mod scenario;
mod services;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use drehwerk_core::config::BridgeConfig;
use drehwerk_core::error::Result;

use scenario::Scenario;
use services::data_dir;
use services::simulator::Simulator;

/// Replay an orientation scenario against the stub host.
#[derive(Debug, Parser)]
#[command(name = "drehwerk")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Drehwerk orientation bridge simulator", long_about = None)]
struct Cli {
    /// Scenario file (JSON)
    scenario: PathBuf,

    /// Bridge config file; defaults to the user config directory
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(data_dir::config_path)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Config comes first so its log filter can seed the subscriber.
    let config_path = cli.config_path();
    let config = match BridgeConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("drehwerk: bad config {}: {e}", config_path.display());
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter)),
        )
        .init();

    tracing::info!(scenario = %cli.scenario.display(), "Drehwerk simulator starting");

    match run(&cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("simulation failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, config: BridgeConfig) -> Result<()> {
    let scenario = Scenario::load(&cli.scenario)?;
    for output in Simulator::run(&scenario, config)? {
        println!("{}", serde_json::to_string(&output)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn scenario_and_config() {
        let cli = Cli::try_parse_from(["drehwerk", "rot.json", "--config", "cfg.json"])
            .expect("valid command line");
        assert_eq!(cli.scenario, PathBuf::from("rot.json"));
        assert_eq!(cli.config_path(), PathBuf::from("cfg.json"));
    }

    #[test]
    fn config_defaults_to_data_dir() {
        let cli = Cli::try_parse_from(["drehwerk", "rot.json"]).expect("valid command line");
        assert_eq!(cli.config_path(), data_dir::config_path());
    }

    #[test]
    fn help_is_not_a_scenario() {
        let err = Cli::try_parse_from(["drehwerk", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);

        let err = Cli::try_parse_from(["drehwerk", "--version"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
    }

    #[test]
    fn missing_scenario_is_a_usage_error() {
        let err = Cli::try_parse_from(["drehwerk"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let err = Cli::try_parse_from(["drehwerk", "a.json", "b.json"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }
}
