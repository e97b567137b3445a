//! Persisted settings.
//!
//! One JSON file under the platform config directory holds the user's
//! settings. Loading never fails: a missing file yields defaults, a
//! malformed file logs a warning and yields defaults, and fields absent
//! from the file are filled in individually (shallow merge).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Upper bound of the idle-timeout range.
pub const IDLE_TIMEOUT_MAX_MS: u64 = 60_000;
/// Adjustment granularity for the idle timeout.
pub const IDLE_TIMEOUT_STEP_MS: u64 = 1_000;
/// Default quiet period before auto-centering fires.
pub const DEFAULT_IDLE_TIMEOUT_MS: u64 = 3_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Quiet period in milliseconds before the cursor line is re-centered.
    /// Zero disables the idle timer entirely.
    pub idle_timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            idle_timeout_ms: DEFAULT_IDLE_TIMEOUT_MS,
        }
    }
}

impl Settings {
    /// Clamp all fields into their valid ranges.
    #[must_use]
    pub fn clamped(mut self) -> Self {
        self.idle_timeout_ms = self.idle_timeout_ms.min(IDLE_TIMEOUT_MAX_MS);
        self
    }

    /// Raise the idle timeout by one step, up to the maximum.
    pub fn idle_timeout_up(&mut self) {
        self.idle_timeout_ms = self
            .idle_timeout_ms
            .saturating_add(IDLE_TIMEOUT_STEP_MS)
            .min(IDLE_TIMEOUT_MAX_MS);
    }

    /// Lower the idle timeout by one step; bottoming out at 0 disables the
    /// timer.
    pub const fn idle_timeout_down(&mut self) {
        self.idle_timeout_ms = self.idle_timeout_ms.saturating_sub(IDLE_TIMEOUT_STEP_MS);
    }
}

pub fn settings_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata)
                .join("centerline")
                .join("settings.json");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("centerline")
                .join("settings.json");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("centerline").join("settings.json");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("centerline")
                .join("settings.json");
        }
    }

    PathBuf::from(".centerline.json")
}

/// Load settings from `path`, falling back to defaults.
///
/// Per-field fallback is handled by serde (`#[serde(default)]`), so a file
/// written by an older version merges cleanly with new defaults.
pub fn load_settings(path: &Path) -> Settings {
    if !path.exists() {
        return Settings::default();
    }
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            tracing::warn!("failed to read settings {}: {err}", path.display());
            return Settings::default();
        }
    };
    match serde_json::from_str::<Settings>(&content) {
        Ok(settings) => settings.clamped(),
        Err(err) => {
            tracing::warn!("malformed settings {}: {err}", path.display());
            Settings::default()
        }
    }
}

/// Persist settings to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot
/// be written.
pub fn save_settings(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(settings).context("Failed to encode settings")?;
    fs::write(path, format!("{json}\n"))
        .with_context(|| format!("Failed to write settings {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_timeout_is_in_range() {
        let settings = Settings::default();
        assert!(settings.idle_timeout_ms <= IDLE_TIMEOUT_MAX_MS);
        assert_eq!(settings.idle_timeout_ms % IDLE_TIMEOUT_STEP_MS, 0);
    }

    #[test]
    fn test_step_up_clamps_at_max() {
        let mut settings = Settings {
            idle_timeout_ms: IDLE_TIMEOUT_MAX_MS - 500,
        };
        settings.idle_timeout_up();
        assert_eq!(settings.idle_timeout_ms, IDLE_TIMEOUT_MAX_MS);
        settings.idle_timeout_up();
        assert_eq!(settings.idle_timeout_ms, IDLE_TIMEOUT_MAX_MS);
    }

    #[test]
    fn test_step_down_bottoms_out_at_zero() {
        let mut settings = Settings {
            idle_timeout_ms: 500,
        };
        settings.idle_timeout_down();
        assert_eq!(settings.idle_timeout_ms, 0);
        settings.idle_timeout_down();
        assert_eq!(settings.idle_timeout_ms, 0);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let settings = load_settings(&dir.path().join("nope.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_malformed_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json").unwrap();
        assert_eq!(load_settings(&path), Settings::default());
    }

    #[test]
    fn test_empty_object_merges_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{}").unwrap();
        assert_eq!(load_settings(&path), Settings::default());
    }

    #[test]
    fn test_out_of_range_timeout_is_clamped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"idle_timeout_ms": 999999}"#).unwrap();
        assert_eq!(load_settings(&path).idle_timeout_ms, IDLE_TIMEOUT_MAX_MS);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deep").join("settings.json");
        let settings = Settings {
            idle_timeout_ms: 9000,
        };
        save_settings(&path, &settings).unwrap();
        assert_eq!(load_settings(&path), settings);
    }
}
