use std::fmt::Debug;
use std::path::PathBuf;
use std::time::Duration;

use crate::collectors::runner::{self, Invocation};
use crate::error::CheckError;
use crate::models::usage::{DeviceStatus, ScrubSummary, UsageSnapshot};
use crate::parser;

/// The three btrfs reports this check knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// `btrfs filesystem usage -b`
    Usage,
    /// `btrfs filesystem show`
    DeviceList,
    /// `btrfs scrub status`
    ScrubStatus,
}

impl ReportKind {
    /// btrfs subcommand arguments for `target`.
    pub fn args(&self, target: &str) -> Vec<String> {
        let sub: &[&str] = match self {
            ReportKind::Usage       => &["filesystem", "usage", "-b"],
            ReportKind::DeviceList  => &["filesystem", "show"],
            ReportKind::ScrubStatus => &["scrub", "status"],
        };
        sub.iter().copied().chain([target]).map(String::from).collect()
    }
}

/// A parsed report type, tied to the `ReportKind` that produces it.
pub trait Report: Sized + Debug {
    const KIND: ReportKind;

    fn parse<S: AsRef<str>>(lines: &[S]) -> Self;
}

impl Report for UsageSnapshot {
    const KIND: ReportKind = ReportKind::Usage;

    fn parse<S: AsRef<str>>(lines: &[S]) -> Self {
        UsageSnapshot {
            overall_size: parser::parse_overall_size(lines),
            breakdown:    parser::parse_usage_breakdown(lines),
        }
    }
}

impl Report for DeviceStatus {
    const KIND: ReportKind = ReportKind::DeviceList;

    fn parse<S: AsRef<str>>(lines: &[S]) -> Self {
        DeviceStatus { missing: parser::parse_missing_devices(lines) }
    }
}

impl Report for ScrubSummary {
    const KIND: ReportKind = ReportKind::ScrubStatus;

    fn parse<S: AsRef<str>>(lines: &[S]) -> Self {
        ScrubSummary { errors: parser::parse_scrub_status(lines) }
    }
}

/// Anything that can produce the raw text of a btrfs report.
pub trait ReportSource {
    fn fetch(&self, kind: ReportKind) -> Result<Vec<String>, CheckError>;
}

/// Runs the real `btrfs` binary, optionally through sudo.
#[derive(Debug, Clone)]
pub struct BtrfsCommand {
    pub btrfs:   PathBuf,
    pub sudo:    Option<PathBuf>,
    pub target:  String,
    pub timeout: Duration,
}

impl BtrfsCommand {
    pub fn invocation(&self, kind: ReportKind) -> Invocation {
        Invocation::new(self.btrfs.clone(), kind.args(&self.target), self.timeout)
            .elevated(self.sudo.as_deref())
    }
}

impl ReportSource for BtrfsCommand {
    fn fetch(&self, kind: ReportKind) -> Result<Vec<String>, CheckError> {
        runner::run(&self.invocation(kind))
    }
}

/// Fetch the report `R` is parsed from and parse it.
pub fn collect<R: Report>(source: &dyn ReportSource) -> Result<R, CheckError> {
    let lines = source.fetch(R::KIND)?;
    let parsed = R::parse(&lines);
    log::debug!("{:?}: {:?}", R::KIND, parsed);
    Ok(parsed)
}
