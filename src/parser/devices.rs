/// Marker `btrfs filesystem show` prints when a member device is gone.
pub const MISSING_MARKER: &str = "*** Some devices missing";

/// True if `btrfs filesystem show` reported a missing device.
pub fn parse_missing_devices<S: AsRef<str>>(lines: &[S]) -> bool {
    lines.iter().any(|line| line.as_ref().trim().contains(MISSING_MARKER))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::fixtures::{lines, DEVICES, DEVICES_MISSING};

    #[test]
    fn all_devices_present() {
        assert!(!parse_missing_devices(&lines(DEVICES)));
    }

    #[test]
    fn missing_marker_found() {
        assert!(parse_missing_devices(&lines(DEVICES_MISSING)));
    }

    #[test]
    fn empty_listing_is_not_missing() {
        assert!(!parse_missing_devices::<&str>(&[]));
    }
}
