use serde::Serialize;

use crate::error::CheckError;
use crate::models::usage::{ProfileUsage, UsageReport};
use crate::util::human::{parse_bytes, to_human_readable, HumanReadable};

/// Plugin status, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Ok       => "OK",
            Severity::Warning  => "WARNING",
            Severity::Critical => "CRITICAL",
            Severity::Unknown  => "UNKNOWN",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Severity::Ok       => 0,
            Severity::Warning  => 1,
            Severity::Critical => 2,
            Severity::Unknown  => 3,
        }
    }
}

/// What a category's used bytes are measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageBasis {
    /// Bytes allocated to that category's chunks.
    Allocated,
    /// Total raw device size, so unallocated space counts as free.
    Device,
}

impl UsageBasis {
    pub fn from_unallocated(unallocated: bool) -> Self {
        if unallocated { UsageBasis::Device } else { UsageBasis::Allocated }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            UsageBasis::Allocated => "allocated",
            UsageBasis::Device    => "device size",
        }
    }
}

/// Warning/critical percentages, both inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    pub warning_pct:  f64,
    pub critical_pct: f64,
}

impl Thresholds {
    pub fn new(warning_pct: f64, critical_pct: f64) -> Result<Self, CheckError> {
        for (name, v) in [("warning", warning_pct), ("critical", critical_pct)] {
            if !(0.0..=100.0).contains(&v) {
                return Err(CheckError::ConfigError(format!(
                    "{} threshold {} is not a percentage between 0 and 100", name, v
                )));
            }
        }
        if warning_pct > critical_pct {
            return Err(CheckError::ConfigError(format!(
                "warning threshold {}% is above critical threshold {}%", warning_pct, critical_pct
            )));
        }
        Ok(Self { warning_pct, critical_pct })
    }

    pub fn classify(&self, pct: f64) -> Severity {
        if pct >= self.critical_pct {
            Severity::Critical
        } else if pct >= self.warning_pct {
            Severity::Warning
        } else {
            Severity::Ok
        }
    }
}

/// Outcome for one `Data,single`-style profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileAlert {
    pub profile:     String,
    pub severity:    Severity,
    pub pct:         f64,
    pub used_bytes:  u64,
    /// Denominator of `pct`, per the configured basis.
    pub basis_bytes: u64,
    pub size_bytes:  u64,
    pub human:       HumanReadable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageEvaluation {
    pub basis:    UsageBasis,
    pub profiles: Vec<ProfileAlert>,
}

impl UsageEvaluation {
    /// Worst severity across all profiles.
    pub fn severity(&self) -> Severity {
        self.profiles.iter().map(|p| p.severity).max().unwrap_or(Severity::Ok)
    }
}

/// Classify every profile of a usage report against the thresholds.
pub fn evaluate_usage(
    report:       &UsageReport,
    overall_size: Option<&str>,
    basis:        UsageBasis,
    thr:          &Thresholds,
) -> Result<UsageEvaluation, CheckError> {
    if report.is_empty() {
        return Err(CheckError::ParseFailure(
            "no Data/Metadata/System lines in filesystem usage output".into(),
        ));
    }

    let device_size = match basis {
        UsageBasis::Allocated => None,
        UsageBasis::Device => {
            let raw = overall_size.ok_or_else(|| {
                CheckError::ParseFailure("`Device size:` not found in filesystem usage output".into())
            })?;
            Some(parse_bytes(raw, "device size")?)
        }
    };

    let profiles = report
        .iter()
        .map(|entry| evaluate_profile(entry, device_size, thr))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(UsageEvaluation { basis, profiles })
}

fn evaluate_profile(
    entry:       &ProfileUsage,
    device_size: Option<u64>,
    thr:         &Thresholds,
) -> Result<ProfileAlert, CheckError> {
    let size_bytes = parse_bytes(&entry.size, &format!("{} size", entry.profile))?;
    let used_bytes = parse_bytes(&entry.used, &format!("{} used", entry.profile))?;
    let basis_bytes = device_size.unwrap_or(size_bytes);
    if basis_bytes == 0 {
        return Err(CheckError::ParseFailure(format!("{} has a size of zero", entry.profile)));
    }

    let pct = used_bytes as f64 / basis_bytes as f64 * 100.0;
    let severity = thr.classify(pct);
    log::debug!(
        "{}: {} of {} bytes = {:.2}% -> {}",
        entry.profile, used_bytes, basis_bytes, pct, severity.label()
    );

    Ok(ProfileAlert {
        profile: entry.profile.clone(),
        severity,
        pct,
        used_bytes,
        basis_bytes,
        size_bytes,
        human: to_human_readable(&entry.size, &entry.used)?,
    })
}

pub fn evaluate_missing(missing: bool) -> Severity {
    if missing { Severity::Critical } else { Severity::Ok }
}

pub fn evaluate_scrub(errors: bool) -> Severity {
    if errors { Severity::Critical } else { Severity::Ok }
}
