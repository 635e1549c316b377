use serde_json::{json, Value};

use crate::alerts::{evaluate_missing, evaluate_scrub, Severity, Thresholds, UsageEvaluation};
use crate::error::CheckError;
use crate::util::human::fmt_pct;

/// Results of every enabled check for one filesystem.
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub target:       String,
    pub thresholds:   Thresholds,
    pub usage:        UsageEvaluation,
    /// `None` when the missing-device check is disabled.
    pub missing:      Option<bool>,
    /// `None` when the scrub check is disabled.
    pub scrub_errors: Option<bool>,
}

impl CheckReport {
    /// Worst severity across all enabled checks.
    pub fn severity(&self) -> Severity {
        [
            Some(self.usage.severity()),
            self.missing.map(evaluate_missing),
            self.scrub_errors.map(evaluate_scrub),
        ]
        .into_iter()
        .flatten()
        .max()
        .unwrap_or(Severity::Ok)
    }

    /// `BTRFS OK - Data,single: 0.25/8.00 MB (3.1%), ... | perfdata`
    pub fn summary_line(&self) -> String {
        let mut fragments: Vec<String> = self.usage.profiles.iter().map(|p| {
            let tag = match p.severity {
                Severity::Ok => String::new(),
                sev          => format!(" ({})", sev.label()),
            };
            format!("{}: {} ({}){}", p.profile, p.human, fmt_pct(p.pct), tag)
        }).collect();

        if let Some(missing) = self.missing {
            fragments.push(if missing { "devices missing" } else { "no missing devices" }.into());
        }
        if let Some(errors) = self.scrub_errors {
            fragments.push(if errors { "scrub errors detected" } else { "no scrub errors" }.into());
        }

        format!("BTRFS {} - {} | {}", self.severity().label(), fragments.join(", "), self.perfdata())
    }

    /// Per-profile lines printed after the summary with `--verbose`.
    pub fn detail_lines(&self) -> Vec<String> {
        self.usage.profiles.iter().map(|p| {
            format!(
                "  {}: used {} of {} bytes ({:.2}% of {}) -> {}",
                p.profile, p.used_bytes, p.basis_bytes, p.pct,
                self.usage.basis.describe(), p.severity.label()
            )
        }).collect()
    }

    /// Nagios perfdata: `'label'=value[UOM];warn;crit;min;max` per profile.
    pub fn perfdata(&self) -> String {
        self.usage.profiles.iter().map(|p| {
            format!(
                "'{}'={:.2}%;{};{};0;100",
                p.profile, p.pct, self.thresholds.warning_pct, self.thresholds.critical_pct
            )
        }).collect::<Vec<_>>().join(" ")
    }

    pub fn to_json(&self) -> Value {
        let severity = self.severity();
        json!({
            "status":          severity.label(),
            "exit_code":       severity.exit_code(),
            "target":          self.target,
            "timestamp":       chrono::Local::now().to_rfc3339(),
            "basis":           self.usage.basis,
            "thresholds":      self.thresholds,
            "usage":           self.usage.profiles,
            "missing_devices": self.missing,
            "scrub_errors":    self.scrub_errors,
            "summary":         self.summary_line(),
        })
    }
}

/// Output when a check could not complete.
pub fn unknown_line(err: &CheckError) -> String {
    format!("BTRFS {} - {}", Severity::Unknown.label(), err)
}

pub fn unknown_json(target: &str, err: &CheckError) -> Value {
    json!({
        "status":    Severity::Unknown.label(),
        "exit_code": Severity::Unknown.exit_code(),
        "target":    target,
        "timestamp": chrono::Local::now().to_rfc3339(),
        "error":     err.to_string(),
        "summary":   unknown_line(err),
    })
}
