use serde::Serialize;
use std::fmt;

use crate::error::CheckError;

const TB: f64 = 1_099_511_627_776.0;
const GB: f64 = 1_073_741_824.0;
const MB: f64 = 1_048_576.0;
const KB: f64 = 1_024.0;

/// Binary display unit; btrfs reports base-1024 byte counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Unit {
    KB,
    MB,
    GB,
    TB,
}

impl Unit {
    pub fn divisor(self) -> f64 {
        match self {
            Unit::KB => KB,
            Unit::MB => MB,
            Unit::GB => GB,
            Unit::TB => TB,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Unit::KB => "KB",
            Unit::MB => "MB",
            Unit::GB => "GB",
            Unit::TB => "TB",
        }
    }

    /// Largest unit the value reaches at least 1 of; KB below that.
    fn for_bytes(b: f64) -> Unit {
        if b >= TB      { Unit::TB }
        else if b >= GB { Unit::GB }
        else if b >= MB { Unit::MB }
        else            { Unit::KB }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A size/used pair scaled into one shared unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HumanReadable {
    pub unit: Unit,
    pub size: f64,
    pub used: f64,
}

impl fmt::Display for HumanReadable {
    /// "0.25/8.00 MB"
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.2}/{:.2} {}", self.used, self.size, self.unit)
    }
}

/// Parse a decimal byte count as printed by btrfs.
pub fn parse_bytes(raw: &str, what: &str) -> Result<u64, CheckError> {
    raw.parse().map_err(|_| {
        CheckError::ParseFailure(format!("{} is not a byte count: {:?}", what, raw))
    })
}

/// Scale a size/used pair into the unit picked by the larger of the two.
///
/// Display only; thresholds always work on the raw byte counts.
pub fn to_human_readable(size: &str, used: &str) -> Result<HumanReadable, CheckError> {
    let size = parse_bytes(size, "size")? as f64;
    let used = parse_bytes(used, "used")? as f64;
    let unit = Unit::for_bytes(size.max(used));
    Ok(HumanReadable { unit, size: size / unit.divisor(), used: used / unit.divisor() })
}

/// Format a percentage with one decimal: "84.5%"
pub fn fmt_pct(pct: f64) -> String {
    format!("{:.1}%", pct)
}
