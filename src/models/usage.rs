use serde::Serialize;

/// One `<Category>,<profile>:` block from `btrfs filesystem usage -b`.
///
/// Byte counts stay as the decimal strings btrfs printed; they are only
/// converted once a threshold or a display unit needs them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileUsage {
    /// Category joined with its redundancy profile, e.g. `Data,RAID1`.
    pub profile: String,
    pub size:    String,
    pub used:    String,
}

impl ProfileUsage {
    pub fn new(profile: impl Into<String>, size: impl Into<String>, used: impl Into<String>) -> Self {
        Self { profile: profile.into(), size: size.into(), used: used.into() }
    }
}

/// Per-profile allocation, in the order btrfs reported it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UsageReport {
    entries: Vec<ProfileUsage>,
}

impl UsageReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry unless the profile is already present; first one wins.
    pub fn insert(&mut self, entry: ProfileUsage) -> bool {
        if self.get(&entry.profile).is_some() {
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn get(&self, profile: &str) -> Option<&ProfileUsage> {
        self.entries.iter().find(|e| e.profile == profile)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProfileUsage> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn profiles(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.profile.as_str()).collect()
    }
}

impl FromIterator<ProfileUsage> for UsageReport {
    fn from_iter<I: IntoIterator<Item = ProfileUsage>>(iter: I) -> Self {
        let mut report = UsageReport::new();
        for entry in iter {
            report.insert(entry);
        }
        report
    }
}

/// Parsed `btrfs filesystem usage -b`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageSnapshot {
    /// `Device size:` from the Overall block, if present.
    pub overall_size: Option<String>,
    pub breakdown:    UsageReport,
}

/// Parsed `btrfs filesystem show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceStatus {
    pub missing: bool,
}

/// Parsed `btrfs scrub status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrubSummary {
    pub errors: bool,
}
