use std::path::PathBuf;
use std::time::Duration;

use crate::alerts::{evaluate_usage, Thresholds, UsageBasis};
use crate::collectors::btrfs::{collect, BtrfsCommand, ReportSource};
use crate::error::CheckError;
use crate::models::usage::{DeviceStatus, ScrubSummary, UsageSnapshot};
use crate::util::report::CheckReport;

/// Fully resolved settings for one run (CLI over config file over defaults).
#[derive(Debug, Clone)]
pub struct CheckOptions {
    pub target:        String,
    pub btrfs:         PathBuf,
    pub sudo:          Option<PathBuf>,
    pub timeout:       Duration,
    pub thresholds:    Thresholds,
    pub basis:         UsageBasis,
    pub check_missing: bool,
    pub check_scrub:   bool,
}

impl CheckOptions {
    pub fn source(&self) -> BtrfsCommand {
        BtrfsCommand {
            btrfs:   self.btrfs.clone(),
            sudo:    self.sudo.clone(),
            target:  self.target.clone(),
            timeout: self.timeout,
        }
    }
}

/// Run the usage check and every enabled flag check, one after another.
/// The first failure aborts the run.
pub fn run_check(source: &dyn ReportSource, opts: &CheckOptions) -> Result<CheckReport, CheckError> {
    let UsageSnapshot { overall_size, breakdown } = collect::<UsageSnapshot>(source)?;
    log::debug!("{} usage profiles: {:?}", breakdown.len(), breakdown.profiles());
    let usage = evaluate_usage(&breakdown, overall_size.as_deref(), opts.basis, &opts.thresholds)?;

    let missing = if opts.check_missing {
        Some(collect::<DeviceStatus>(source)?.missing)
    } else {
        None
    };

    let scrub_errors = if opts.check_scrub {
        Some(collect::<ScrubSummary>(source)?.errors)
    } else {
        None
    };

    Ok(CheckReport {
        target: opts.target.clone(),
        thresholds: opts.thresholds,
        usage,
        missing,
        scrub_errors,
    })
}
