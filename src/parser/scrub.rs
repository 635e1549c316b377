use super::tokenize;

const SUMMARY_LABEL: &str = "Error summary:";
const NO_ERRORS: &str = "no errors found";
const LEGACY_LABEL: &str = "uncorrectable errors:";

/// True if `btrfs scrub status` reports errors.
///
/// Current btrfs-progs print `Error summary:`; releases before 5.x only
/// printed a `corrected errors: N, uncorrectable errors: N, ...` line, which
/// is used when no summary is found. Output matching neither shape is
/// reported as error free.
pub fn parse_scrub_status<S: AsRef<str>>(lines: &[S]) -> bool {
    if let Some(summary) = lines.iter().find_map(|l| l.as_ref().trim().strip_prefix(SUMMARY_LABEL)) {
        let summary = summary.trim();
        log::debug!("scrub error summary: {:?}", summary);
        return summary != NO_ERRORS;
    }

    if let Some(line) = lines.iter().map(|l| l.as_ref()).find(|l| l.contains(LEGACY_LABEL)) {
        return legacy_uncorrectable(line).map_or(true, |n| n != 0);
    }

    log::warn!("scrub status output not recognised, assuming no errors");
    false
}

/// The count after `uncorrectable errors:`; `None` if it is not a number.
fn legacy_uncorrectable(line: &str) -> Option<u64> {
    let tail = &line[line.find(LEGACY_LABEL)? + LEGACY_LABEL.len()..];
    tokenize(tail).first()?.trim_end_matches(',').parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::fixtures::{lines, SCRUB_LEGACY_ERRORS, SCRUB_OK};

    #[test]
    fn summary_without_errors() {
        assert!(!parse_scrub_status(&lines(SCRUB_OK)));
    }

    #[test]
    fn summary_with_errors() {
        assert!(parse_scrub_status(&[
            "Status:           finished",
            "Error summary:    csum=4",
            "  Corrected:      0",
            "  Uncorrectable:  4",
        ]));
    }

    #[test]
    fn legacy_uncorrectable_count() {
        assert!(parse_scrub_status(&lines(SCRUB_LEGACY_ERRORS)));
        assert!(!parse_scrub_status(&[
            "\tcorrected errors: 2, uncorrectable errors: 0, unverified errors: 0",
        ]));
    }

    #[test]
    fn summary_takes_precedence_over_legacy_line() {
        assert!(!parse_scrub_status(&[
            "corrected errors: 0, uncorrectable errors: 4, unverified errors: 0",
            "Error summary:    no errors found",
        ]));
    }

    #[test]
    fn unparseable_legacy_count_is_an_error() {
        assert!(parse_scrub_status(&["corrected errors: 0, uncorrectable errors: ?, x"]));
    }

    #[test]
    fn unknown_format_defaults_to_no_errors() {
        assert!(!parse_scrub_status(&["ERROR: something unexpected", ""]));
    }

    #[test]
    fn legacy_count_extraction() {
        assert_eq!(legacy_uncorrectable("uncorrectable errors: 12, unverified errors: 0"), Some(12));
        assert_eq!(legacy_uncorrectable("uncorrectable errors:"), None);
    }
}
