use crate::logic::reltime::Locale;
use crate::logic::types::MapFreshness;
use anyhow::Context;
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Configuration for watcher timing thresholds and the label language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Delay between polls in seconds (default: 5)
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// Age below which the map counts as fresh, in seconds (default: 60)
    #[serde(default = "default_fresh_threshold")]
    pub fresh_threshold_seconds: u64,
    /// Age beyond which the map is stale and re-checked upstream, in seconds
    /// (default: 300)
    #[serde(default = "default_stale_threshold")]
    pub stale_threshold_seconds: u64,
    /// Label language, `fr` or `en` (default: `fr`)
    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_poll_interval() -> u64 {
    5
}

fn default_fresh_threshold() -> u64 {
    60
}

fn default_stale_threshold() -> u64 {
    300
}

fn default_locale() -> String {
    "fr".to_string()
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval_seconds: default_poll_interval(),
            fresh_threshold_seconds: default_fresh_threshold(),
            stale_threshold_seconds: default_stale_threshold(),
            locale: default_locale(),
        }
    }
}

impl WatchConfig {
    /// Load configuration from an explicit TOML file (supports `~`)
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let expanded = shellexpand::tilde(path).to_string();
        let raw = fs::read_to_string(&expanded)
            .with_context(|| format!("cannot read config file {}", expanded))?;
        toml::from_str(&raw).with_context(|| format!("invalid config file {}", expanded))
    }

    /// Location of the persisted configuration file
    pub fn saved_file() -> anyhow::Result<PathBuf> {
        let pd = ProjectDirs::from("com", "example", "velowatch")
            .context("no config directory available")?;
        let dir = pd.config_dir();
        fs::create_dir_all(dir)?;
        Ok(dir.join("config.toml"))
    }

    /// Persisted configuration, defaults if none was ever saved
    pub fn load_saved() -> Self {
        Self::saved_file()
            .ok()
            .and_then(|p| fs::read_to_string(p).ok())
            .and_then(|raw| toml::from_str(&raw).ok())
            .unwrap_or_default()
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::saved_file()?;
        let raw = toml::to_string_pretty(self).context("cannot serialize configuration")?;
        fs::write(&path, raw).with_context(|| format!("cannot write {}", path.display()))?;
        Ok(())
    }

    /// Create configuration from the saved file, environment variables, and
    /// command line arguments, in increasing priority
    pub fn from_args_and_env(
        interval: Option<u64>,
        fresh_threshold: Option<u64>,
        stale_threshold: Option<u64>,
        locale: Option<String>,
    ) -> Self {
        Self::load_saved()
            .apply_env()
            .with_overrides(interval, fresh_threshold, stale_threshold, locale)
    }

    /// Apply `VELOWATCH_*` environment overrides on top of this configuration
    pub fn apply_env(mut self) -> Self {
        if let Ok(val) = std::env::var("VELOWATCH_POLL_INTERVAL") {
            if let Ok(parsed) = val.parse() {
                self.poll_interval_seconds = parsed;
            }
        }
        if let Ok(val) = std::env::var("VELOWATCH_FRESH_THRESHOLD") {
            if let Ok(parsed) = val.parse() {
                self.fresh_threshold_seconds = parsed;
            }
        }
        if let Ok(val) = std::env::var("VELOWATCH_STALE_THRESHOLD") {
            if let Ok(parsed) = val.parse() {
                self.stale_threshold_seconds = parsed;
            }
        }
        if let Ok(val) = std::env::var("VELOWATCH_LOCALE") {
            self.locale = val;
        }
        self
    }

    /// Apply command line overrides on top of this configuration
    pub fn with_overrides(
        mut self,
        interval: Option<u64>,
        fresh_threshold: Option<u64>,
        stale_threshold: Option<u64>,
        locale: Option<String>,
    ) -> Self {
        if let Some(val) = interval {
            self.poll_interval_seconds = val;
        }
        if let Some(val) = fresh_threshold {
            self.fresh_threshold_seconds = val;
        }
        if let Some(val) = stale_threshold {
            self.stale_threshold_seconds = val;
        }
        if let Some(val) = locale {
            self.locale = val;
        }
        self
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.poll_interval_seconds == 0 {
            anyhow::bail!("poll interval must be at least 1 second");
        }
        if self.fresh_threshold_seconds >= self.stale_threshold_seconds {
            anyhow::bail!("fresh threshold must be less than stale threshold");
        }
        Ok(())
    }

    pub fn locale(&self) -> Locale {
        match self.locale.as_str() {
            "en" => Locale::En,
            _ => Locale::Fr,
        }
    }

    /// Classify the map age against the freshness thresholds
    pub fn classify_freshness(&self, last_updated: &DateTime<Utc>) -> MapFreshness {
        let now = Utc::now();
        let seconds = now.signed_duration_since(*last_updated).num_seconds();

        if seconds < self.fresh_threshold_seconds as i64 {
            MapFreshness::Fresh
        } else if seconds < self.stale_threshold_seconds as i64 {
            MapFreshness::Aging
        } else {
            MapFreshness::Stale
        }
    }

    /// True when the reference timestamp sits more than the stale threshold in
    /// the past; `elapsed_ms` is negative for past instants.
    pub fn needs_refetch(&self, elapsed_ms: i64) -> bool {
        elapsed_ms <= -(self.stale_threshold_seconds as i64 * 1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_defaults() {
        let config = WatchConfig::default();
        assert_eq!(config.poll_interval_seconds, 5);
        assert_eq!(config.fresh_threshold_seconds, 60);
        assert_eq!(config.stale_threshold_seconds, 300);
        assert_eq!(config.locale(), Locale::Fr);
    }

    #[test]
    fn test_overrides_take_priority() {
        let config = WatchConfig::default().with_overrides(
            Some(10),
            None,
            Some(600),
            Some("en".to_string()),
        );
        assert_eq!(config.poll_interval_seconds, 10);
        assert_eq!(config.fresh_threshold_seconds, 60);
        assert_eq!(config.stale_threshold_seconds, 600);
        assert_eq!(config.locale(), Locale::En);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: WatchConfig = toml::from_str("stale_threshold_seconds = 900").unwrap();
        assert_eq!(config.stale_threshold_seconds, 900);
        assert_eq!(config.poll_interval_seconds, 5);
        assert_eq!(config.locale, "fr");
    }

    #[test]
    fn test_validation() {
        assert!(WatchConfig::default().validate().is_ok());

        let zero_interval = WatchConfig::default().with_overrides(Some(0), None, None, None);
        assert!(zero_interval.validate().is_err());

        let inverted = WatchConfig::default().with_overrides(None, Some(300), Some(300), None);
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn test_needs_refetch_threshold() {
        let config = WatchConfig::default();
        assert!(config.needs_refetch(-300_000));
        assert!(config.needs_refetch(-300_001));
        assert!(!config.needs_refetch(-299_999));
        assert!(!config.needs_refetch(0));
        assert!(!config.needs_refetch(125_000));
    }

    #[test]
    fn test_classify_freshness() {
        let config = WatchConfig::default();
        let now = Utc::now();

        let fresh = now - Duration::seconds(10);
        assert_eq!(config.classify_freshness(&fresh), MapFreshness::Fresh);

        let aging = now - Duration::seconds(120);
        assert_eq!(config.classify_freshness(&aging), MapFreshness::Aging);

        let stale = now - Duration::seconds(900);
        assert_eq!(config.classify_freshness(&stale), MapFreshness::Stale);
    }

    #[test]
    fn test_unknown_locale_falls_back_to_french() {
        let config = WatchConfig::default().with_overrides(None, None, None, Some("de".to_string()));
        assert_eq!(config.locale(), Locale::Fr);
    }
}
