//! Token-level parsers for the text that `btrfs` prints.
//!
//! btrfs-progs pads its reports with a mix of tabs and spaces that changes
//! between releases, so every parser works on whitespace-split tokens and
//! never on column offsets.

pub mod devices;
pub mod scrub;
pub mod usage;

#[cfg(test)]
pub mod fixtures;

pub use devices::parse_missing_devices;
pub use scrub::parse_scrub_status;
pub use usage::{parse_overall_size, parse_usage_breakdown};

/// Split a line on any run of spaces or tabs.
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Value for a `Label:` token, whether it is glued on (`Size:123,`) or the
/// next token (`Size: 123,`). Trailing commas are dropped.
fn labelled_value<'a>(tokens: &[&'a str], label: &str) -> Option<&'a str> {
    let idx = tokens.iter().position(|t| t.starts_with(label))?;
    let inline = &tokens[idx][label.len()..];
    let raw = if inline.is_empty() { *tokens.get(idx + 1)? } else { inline };
    let value = raw.trim_end_matches(',');
    if value.is_empty() { None } else { Some(value) }
}
