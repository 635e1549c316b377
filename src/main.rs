mod alerts;
mod check;
mod collectors;
mod config;
mod error;
mod models;
mod parser;
mod util;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use alerts::{Severity, Thresholds, UsageBasis};
use check::CheckOptions;
use config::Config;
use error::CheckError;
use util::report;

#[derive(Parser, Debug)]
#[command(
    name = "check_btrfs",
    about = "Nagios/Icinga check for btrfs space usage, missing devices and scrub errors",
    version,
    after_help = "Exit codes: 0 OK, 1 WARNING, 2 CRITICAL, 3 UNKNOWN"
)]
struct Cli {
    /// Filesystem to check (mount point or any path on it)
    #[arg(value_name = "TARGET")]
    target: Option<String>,

    /// Filesystem to check, same as TARGET
    #[arg(short = 'p', long = "path", value_name = "PATH")]
    path: Option<String>,

    /// Run btrfs through sudo
    #[arg(long, overrides_with = "no_sudo")]
    sudo: bool,

    /// Run btrfs directly
    #[arg(long, overrides_with = "sudo")]
    no_sudo: bool,

    /// Seconds to wait for each btrfs command
    #[arg(short, long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Print per-profile detail lines and debug logging to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Measure usage against the whole device, counting unallocated space as free
    #[arg(long, overrides_with = "no_unallocated")]
    unallocated: bool,

    /// Measure usage against each profile's allocated chunks
    #[arg(long, overrides_with = "unallocated")]
    no_unallocated: bool,

    /// Go critical when a device is missing
    #[arg(long, overrides_with = "no_missing")]
    missing: bool,

    /// Skip the missing-device check
    #[arg(long, overrides_with = "missing")]
    no_missing: bool,

    /// Go critical when the last scrub found errors
    #[arg(long, overrides_with = "no_error")]
    error: bool,

    /// Skip the scrub-error check
    #[arg(long, overrides_with = "error")]
    no_error: bool,

    /// Usage percent to warn at
    #[arg(short, long, value_name = "PERCENT")]
    warning: Option<f64>,

    /// Usage percent to go critical at
    #[arg(short, long, value_name = "PERCENT")]
    critical: Option<f64>,

    /// Path of the btrfs binary
    #[arg(long, value_name = "PATH")]
    btrfs: Option<PathBuf>,

    /// Path of the sudo binary
    #[arg(long, value_name = "PATH")]
    sudo_path: Option<PathBuf>,

    /// Config file (default: <config dir>/check_btrfs/check_btrfs.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the result as JSON instead of a plugin status line
    #[arg(long)]
    json: bool,

    /// Print a shell completion script and exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

impl Cli {
    fn flag(on: bool, off: bool) -> Option<bool> {
        match (on, off) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _         => None,
        }
    }

    fn target_path(&self) -> Result<String, CheckError> {
        match (&self.target, &self.path) {
            (Some(t), Some(p)) if t != p => Err(CheckError::ConfigError(format!(
                "conflicting targets {:?} and --path {:?}", t, p
            ))),
            (Some(t), _) | (None, Some(t)) => Ok(t.clone()),
            (None, None) => Ok("/".to_string()),
        }
    }

    /// Merge flags over the config file.
    fn resolve(&self, cfg: &Config) -> Result<CheckOptions, CheckError> {
        let timeout_secs = self.timeout.unwrap_or(cfg.commands.timeout_secs);
        if timeout_secs == 0 {
            return Err(CheckError::ConfigError("timeout must be at least one second".into()));
        }
        let use_sudo = Cli::flag(self.sudo, self.no_sudo).unwrap_or(cfg.commands.use_sudo);
        let unallocated = Cli::flag(self.unallocated, self.no_unallocated)
            .unwrap_or(cfg.thresholds.unallocated);
        let thresholds = Thresholds::new(
            self.warning.unwrap_or(cfg.thresholds.warning_pct),
            self.critical.unwrap_or(cfg.thresholds.critical_pct),
        )?;

        Ok(CheckOptions {
            target:        self.target_path()?,
            btrfs:         self.btrfs.clone().unwrap_or_else(|| cfg.commands.btrfs_path.clone()),
            sudo:          use_sudo.then(|| {
                self.sudo_path.clone().unwrap_or_else(|| cfg.commands.sudo_path.clone())
            }),
            timeout:       Duration::from_secs(timeout_secs),
            thresholds,
            basis:         UsageBasis::from_unallocated(unallocated),
            check_missing: Cli::flag(self.missing, self.no_missing).unwrap_or(cfg.checks.missing),
            check_scrub:   Cli::flag(self.error, self.no_error).unwrap_or(cfg.checks.error),
        })
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // clap's usage exit code 2 would read as CRITICAL
            std::process::exit(if e.use_stderr() { Severity::Unknown.exit_code() } else { 0 });
        }
    };

    env_logger::Builder::from_default_env()
        .filter_level(if cli.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Warn })
        .init();

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "check_btrfs", &mut io::stdout());
        return;
    }

    let code = run(&cli).unwrap_or_else(|e| {
        println!("BTRFS {} - {:#}", Severity::Unknown.label(), e);
        Severity::Unknown.exit_code()
    });
    std::process::exit(code);
}

/// Run the check, print the result and return the plugin exit code.
fn run(cli: &Cli) -> Result<i32> {
    let outcome = Config::load(cli.config.as_deref())
        .and_then(|cfg| cli.resolve(&cfg))
        .and_then(|opts| {
            log::debug!("options: {:?}", opts);
            check::run_check(&opts.source(), &opts)
        });

    match outcome {
        Ok(result) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result.to_json())?);
            } else {
                println!("{}", result.summary_line());
                if cli.verbose {
                    for line in result.detail_lines() {
                        println!("{}", line);
                    }
                }
            }
            Ok(result.severity().exit_code())
        }
        Err(e) => {
            log::error!("{}", e);
            if cli.json {
                let target = cli.path.as_deref().or(cli.target.as_deref()).unwrap_or("/");
                println!("{}", serde_json::to_string_pretty(&report::unknown_json(target, &e))?);
            } else {
                println!("{}", report::unknown_line(&e));
            }
            Ok(Severity::Unknown.exit_code())
        }
    }
}
