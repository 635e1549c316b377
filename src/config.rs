use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CheckError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub commands: CommandsConfig,

    #[serde(default)]
    pub thresholds: ThresholdConfig,

    #[serde(default)]
    pub checks: ChecksConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandsConfig {
    pub btrfs_path:   PathBuf,
    pub sudo_path:    PathBuf,
    /// Run btrfs through `sudo_path` unless `--no-sudo` is given.
    pub use_sudo:     bool,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub warning_pct:  f64,
    pub critical_pct: f64,
    /// Measure usage against the whole device instead of allocated chunks.
    pub unallocated:  bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChecksConfig {
    /// Go critical when `btrfs filesystem show` reports missing devices.
    pub missing: bool,
    /// Go critical when `btrfs scrub status` reports errors.
    pub error:   bool,
}

// ── Defaults ─────────────────────────────────────────────────────────

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            btrfs_path:   PathBuf::from("/usr/bin/btrfs"),
            sudo_path:    PathBuf::from("/usr/bin/sudo"),
            use_sudo:     true,
            timeout_secs: 30,
        }
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self { warning_pct: 80.0, critical_pct: 90.0, unallocated: true }
    }
}

// ── Load ──────────────────────────────────────────────────────────────

impl Config {
    /// Load `explicit` if given, else the per-user file if it exists, else
    /// defaults. Only an explicitly named file is required to exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self, CheckError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::config_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => Ok(Config::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, CheckError> {
        let text = fs::read_to_string(path).map_err(|e| {
            CheckError::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        let cfg: Config = toml::from_str(&text).map_err(|e| {
            CheckError::ConfigError(format!("invalid {}: {}", path.display(), e))
        })?;
        log::debug!("loaded config from {}", path.display());
        Ok(cfg)
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("check_btrfs").join("check_btrfs.toml"))
    }
}
