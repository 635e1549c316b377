use std::sync::LazyLock;

use regex::Regex;

use super::{labelled_value, tokenize};
use crate::models::usage::{ProfileUsage, UsageReport};

/// `Data:`, `Metadata,DUP:`, `System,RAID1C3:` ... but never `Unallocated:`.
static CATEGORY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(Data|Metadata|System)(,\S+)?:$").expect("category pattern is valid")
});

/// Raw device size from the `Device size:` line of the Overall block.
pub fn parse_overall_size<S: AsRef<str>>(lines: &[S]) -> Option<String> {
    lines.iter().find_map(|line| match tokenize(line.as_ref()).as_slice() {
        ["Device", "size:", value, ..] => Some(value.to_string()),
        _ => None,
    })
}

/// Per-profile `Size:`/`Used:` pairs, in report order.
///
/// Device path lines under each block, the Overall block and the
/// `Unallocated:` section never match the category pattern and are skipped.
pub fn parse_usage_breakdown<S: AsRef<str>>(lines: &[S]) -> UsageReport {
    lines.iter().filter_map(|line| parse_profile_line(line.as_ref())).collect()
}

fn parse_profile_line(line: &str) -> Option<ProfileUsage> {
    let tokens = tokenize(line);
    let head = *tokens.first()?;
    if !CATEGORY.is_match(head) {
        return None;
    }
    let rest = &tokens[1..];
    let size = labelled_value(rest, "Size:")?;
    let used = labelled_value(rest, "Used:")?;
    Some(ProfileUsage::new(head.trim_end_matches(':'), size, used))
}
