// SPDX-License-Identifier: LGPL-3.0-only
//! Layered `iconbuf.toml` configuration.
use anyhow::Result;
use log::LevelFilter;
use serde::Deserialize;
use smol::fs;
use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use xdg::BaseDirectories;

/// File name looked up in every configuration directory.
pub const CONFIG_FILE: &str = "iconbuf.toml";

/// The main configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// General settings
    #[serde(default)]
    pub general: GeneralSettings,
    /// Icon buffer sizing and worker timing
    #[serde(default)]
    pub buffer: BufferSettings,
    /// Icon sources
    #[serde(default)]
    pub icons: IconSettings,
    /// Any other sections are captured here
    #[serde(flatten)]
    pub other: HashMap<String, toml::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneralSettings {
    /// Maximum log level: `off`, `error`, `warn`, `info`, `debug` or `trace`.
    pub log_level: Option<String>,
}

impl GeneralSettings {
    /// The configured log level, if set and valid.
    pub fn log_level_filter(&self) -> Option<LevelFilter> {
        let level = self.log_level.as_deref()?;
        match LevelFilter::from_str(level.trim()) {
            Ok(filter) => Some(filter),
            Err(_) => {
                log::warn!("Ignoring unknown log level {:?}", level);
                None
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BufferSettings {
    /// Upper bound on cached icons per buffer.
    pub max_entries: Option<usize>,
    /// How often the idle worker re-checks for work and shutdown.
    pub poll_interval_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IconSettings {
    /// XDG icon theme name.
    pub theme: Option<String>,
    /// Root of the freedesktop thumbnail cache.
    pub thumbnail_cache: Option<PathBuf>,
}

impl Config {
    /// Parse a configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Registry for managing settings.
pub struct SettingsRegistry {
    config: Config,
}

impl SettingsRegistry {
    /// Create a registry holding only defaults.
    pub fn empty() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Create a new SettingsRegistry and load configuration from standard locations.
    pub async fn new() -> Result<Self> {
        let mut registry = Self::empty();
        registry.load().await?;
        Ok(registry)
    }

    /// Load configuration from standard locations in precedence order.
    ///
    /// Order (later overrides earlier):
    /// 1. System Data: /usr/share/iconbuf/iconbuf.toml (and XDG_DATA_DIRS)
    /// 2. System Config: /etc/xdg/iconbuf/iconbuf.toml (and XDG_CONFIG_DIRS)
    /// 3. User Config: ~/.config/iconbuf/iconbuf.toml (XDG_CONFIG_HOME)
    ///
    /// Files that cannot be read or parsed are logged and skipped. A
    /// configured `[general] log_level` is applied as the maximum log level.
    pub async fn load(&mut self) -> Result<()> {
        let xdg_dirs = BaseDirectories::with_prefix("iconbuf")?;

        let mut paths: Vec<PathBuf> = xdg_dirs.find_data_files(CONFIG_FILE).rev().collect();
        // Yields the user config first, so reversing puts it last
        paths.extend(xdg_dirs.find_config_files(CONFIG_FILE).rev());

        for result in self.load_from_paths_async(paths).await {
            if let Err(e) = result {
                log::error!("{}", e);
            }
        }

        if let Some(level) = self.config.general.log_level_filter() {
            log::set_max_level(level);
        }
        Ok(())
    }

    /// Merge a loaded config into the current config.
    fn merge(&mut self, other: Config) {
        // General
        if other.general.log_level.is_some() {
            self.config.general.log_level = other.general.log_level;
        }

        // Buffer
        if other.buffer.max_entries.is_some() {
            self.config.buffer.max_entries = other.buffer.max_entries;
        }
        if other.buffer.poll_interval_ms.is_some() {
            self.config.buffer.poll_interval_ms = other.buffer.poll_interval_ms;
        }

        // Icons
        if other.icons.theme.is_some() {
            self.config.icons.theme = other.icons.theme;
        }
        if other.icons.thumbnail_cache.is_some() {
            self.config.icons.thumbnail_cache = other.icons.thumbnail_cache;
        }

        // Other
        self.config.other.extend(other.other);
    }

    /// Get the current configuration.
    pub fn get(&self) -> &Config {
        &self.config
    }

    /// Load configuration from multiple custom paths asynchronously.
    pub async fn load_from_paths_async(&mut self, paths: Vec<PathBuf>) -> Vec<Result<()>> {
        let mut results = Vec::new();

        for path in paths {
            log::info!("Loading config from: {:?}", path);
            let result = async {
                let content = fs::read_to_string(&path)
                    .await
                    .map_err(|e| anyhow::anyhow!("Failed to read config file {:?}: {}", path, e))?;

                let loaded_config = Config::from_toml(&content)
                    .map_err(|e| anyhow::anyhow!("Failed to parse config file {:?}: {}", path, e))?;

                self.merge(loaded_config);
                Ok(())
            }
            .await;

            results.push(result);
        }

        results
    }
}

impl Default for SettingsRegistry {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sections() {
        let config = Config::from_toml(
            r#"
[general]
log_level = "debug"

[buffer]
max_entries = 300
poll_interval_ms = 50

[icons]
theme = "Papirus"

[extra]
key = 1
"#,
        )
        .unwrap();

        assert_eq!(config.general.log_level.as_deref(), Some("debug"));
        assert_eq!(config.buffer.max_entries, Some(300));
        assert_eq!(config.buffer.poll_interval_ms, Some(50));
        assert_eq!(config.icons.theme.as_deref(), Some("Papirus"));
        assert!(config.other.contains_key("extra"));
    }

    #[test]
    fn test_merge_keeps_unset_values() {
        let mut registry = SettingsRegistry::empty();
        registry.merge(Config::from_toml("[buffer]\nmax_entries = 100\n[icons]\ntheme = \"A\"").unwrap());
        registry.merge(Config::from_toml("[icons]\ntheme = \"B\"").unwrap());

        assert_eq!(registry.get().buffer.max_entries, Some(100));
        assert_eq!(registry.get().icons.theme.as_deref(), Some("B"));
    }

    #[test]
    fn test_log_level_filter() {
        let level = |text: &str| Config::from_toml(text).unwrap().general.log_level_filter();
        assert_eq!(level("[general]\nlog_level = \"debug\""), Some(LevelFilter::Debug));
        assert_eq!(level("[general]\nlog_level = \"WARN\""), Some(LevelFilter::Warn));
        assert_eq!(level("[general]\nlog_level = \"loud\""), None);
        assert_eq!(level(""), None);
    }

    #[test]
    fn test_load_from_paths_reports_each_file() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.toml");
        let bad = dir.path().join("bad.toml");
        std::fs::write(&good, "[buffer]\npoll_interval_ms = 25\n").unwrap();
        std::fs::write(&bad, "[buffer\n").unwrap();
        let missing = dir.path().join("missing.toml");

        let mut registry = SettingsRegistry::empty();
        let results = smol::block_on(registry.load_from_paths_async(vec![good, bad, missing]));

        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(results[2].is_err());
        assert_eq!(registry.get().buffer.poll_interval_ms, Some(25));
    }
}
