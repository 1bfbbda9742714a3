// tethys_sim/src/cli.rs

use clap::Parser;
use std::path::PathBuf;

/// Tethys: a headless AUV simulation with a command/telemetry bridge.
///
/// Runs a scenario, replaying its command on the vehicle's command topic
/// every tick and logging the published state.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The path to the scenario TOML file to run.
    #[arg(short, long, default_value = "assets/scenarios/tethys_dive.toml")]
    pub scenario: PathBuf,

    /// Number of ticks to run. Overrides the scenario's duration.
    #[arg(long)]
    pub steps: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_override_is_optional() {
        let cli = Cli::parse_from(["tethys_sim"]);
        assert_eq!(cli.steps, None);
        assert_eq!(
            cli.scenario,
            PathBuf::from("assets/scenarios/tethys_dive.toml")
        );

        let cli = Cli::parse_from(["tethys_sim", "--scenario", "a.toml", "--steps", "5"]);
        assert_eq!(cli.steps, Some(5));
        assert_eq!(cli.scenario, PathBuf::from("a.toml"));
    }
}
