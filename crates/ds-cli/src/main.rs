//! dsclient: schedules ds-sim jobs onto servers.
//!
//! # Usage
//!
//! ```text
//! dsclient                      # fair first fit against localhost:50000
//! dsclient -s lrr               # largest round-robin
//! dsclient --config dsclient.toml --port 51000 -s bf
//! ```

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use ds_core::ClientConfig;
use ds_placement::Algorithm;
use tracing::{error, info};

mod driver;

use driver::Termination;

#[derive(Parser, Debug)]
#[command(
    name = "dsclient",
    about = "ds-sim client: places each arriving job on a server",
    version
)]
struct Cli {
    /// Placement algorithm: fff (default), ff, fc, bf, wf, lrr.
    #[arg(short, long)]
    scheduler: Option<Algorithm>,

    /// Read defaults from a TOML file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulator host [default: localhost].
    #[arg(long)]
    host: Option<String>,

    /// Simulator port [default: 50000].
    #[arg(long)]
    port: Option<u16>,

    /// Identity sent with AUTH [default: login name].
    #[arg(long)]
    user: Option<String>,
}

impl Cli {
    /// Defaults, then the config file, then explicit flags.
    fn resolve(&self) -> anyhow::Result<(ClientConfig, Algorithm)> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::from_file(path)
                .with_context(|| format!("reading config {}", path.display()))?,
            None => ClientConfig::default(),
        };
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(user) = &self.user {
            config.username = user.clone();
        }

        let algorithm = match self.scheduler {
            Some(algorithm) => algorithm,
            None => config
                .scheduler
                .parse()
                .context("invalid scheduler in config")?,
        };
        config.scheduler = algorithm.to_string();
        Ok((config, algorithm))
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let (config, algorithm) = cli.resolve()?;
    info!(addr = %config.address(), scheduler = %algorithm, "starting");

    let report = match driver::run(&config, algorithm) {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "run aborted");
            return Err(e);
        }
    };
    info!(
        scheduled = report.scheduled,
        skipped = report.skipped,
        completed = report.completed,
        unrecognized = report.unrecognized,
        ended_by = ?report.ended_by,
        "simulation finished"
    );
    match report.ended_by {
        Termination::NoMoreEvents => Ok(()),
        Termination::SimulatorError(message) => bail!("simulator error: {message}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("dsclient").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_without_flags() {
        let (config, algorithm) = parse(&[]).resolve().unwrap();
        assert_eq!(algorithm, Algorithm::FairFirstFit);
        assert_eq!(config.address(), "localhost:50000");
    }

    #[test]
    fn short_and_long_scheduler_flags() {
        assert_eq!(parse(&["-s", "lrr"]).scheduler, Some(Algorithm::LargestRoundRobin));
        assert_eq!(parse(&["--scheduler", "bf"]).scheduler, Some(Algorithm::BestFit));
    }

    #[test]
    fn unknown_scheduler_is_rejected() {
        assert!(Cli::try_parse_from(["dsclient", "-s", "random"]).is_err());
    }

    #[test]
    fn help_flag_is_recognized() {
        let err = Cli::try_parse_from(["dsclient", "-h"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "host = \"sim.local\"\nport = 51000\nscheduler = \"wf\"").unwrap();
        let path = file.path().to_str().unwrap();

        let (config, algorithm) = parse(&["--config", path, "--port", "52000"])
            .resolve()
            .unwrap();
        assert_eq!(config.address(), "sim.local:52000");
        assert_eq!(algorithm, Algorithm::WorstFit);

        let (_, algorithm) = parse(&["--config", path, "-s", "fc"]).resolve().unwrap();
        assert_eq!(algorithm, Algorithm::FirstCapable);
    }

    #[test]
    fn fit_now_comes_from_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fit_now = \"strict\"").unwrap();
        let path = file.path().to_str().unwrap();

        let (config, _) = parse(&["--config", path]).resolve().unwrap();
        assert_eq!(config.fit_now, ds_core::Dominance::Strict);

        let (config, _) = parse(&[]).resolve().unwrap();
        assert_eq!(config.fit_now, ds_core::Dominance::Weak);
    }

    #[test]
    fn bad_scheduler_in_config_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "scheduler = \"nope\"").unwrap();
        let path = file.path().to_str().unwrap();

        assert!(parse(&["--config", path]).resolve().is_err());
    }
}
