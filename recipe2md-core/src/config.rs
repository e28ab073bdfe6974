//! Runtime configuration from environment variables.
//!
//! Built once at startup and passed to whatever needs it.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default directory for saved recipes, relative to the working directory.
pub const DEFAULT_TARGET_DIR: &str = "./local";

/// Default cap on the rendering width.
pub const DEFAULT_MAX_WIDTH: usize = 80;

/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default delay between requests to the same host in milliseconds.
pub const DEFAULT_RATE_LIMIT_MS: u64 = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Where `save`, `list` and `browse` read and write recipes.
    pub target_dir: PathBuf,
    /// Upper bound on the terminal rendering width.
    pub max_width: usize,
    pub timeout: Duration,
    pub rate_limit_ms: u64,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_dir: PathBuf::from(DEFAULT_TARGET_DIR),
            max_width: DEFAULT_MAX_WIDTH,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            rate_limit_ms: DEFAULT_RATE_LIMIT_MS,
            user_agent: concat!("recipe2md/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `RECIPE2MD_DIR`: recipe directory (default: "./local")
    /// - `RECIPE2MD_MAX_WIDTH`: maximum rendering width (default: 80)
    /// - `RECIPE2MD_TIMEOUT_SECS`: HTTP timeout (default: 30)
    /// - `RECIPE2MD_RATE_LIMIT_MS`: delay between requests to one host (default: 200)
    /// - `RECIPE2MD_USER_AGENT`: User-Agent header (default: "recipe2md/<version>")
    ///
    /// Values that fail to parse fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let target_dir = lookup("RECIPE2MD_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.target_dir);

        let max_width = lookup("RECIPE2MD_MAX_WIDTH")
            .and_then(|v| v.parse().ok())
            .filter(|w: &usize| *w > 0)
            .unwrap_or(defaults.max_width);

        let timeout = lookup("RECIPE2MD_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        let rate_limit_ms = lookup("RECIPE2MD_RATE_LIMIT_MS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.rate_limit_ms);

        let user_agent = lookup("RECIPE2MD_USER_AGENT").unwrap_or(defaults.user_agent);

        Self {
            target_dir,
            max_width,
            timeout,
            rate_limit_ms,
            user_agent,
        }
    }

    pub fn with_target_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.target_dir = dir;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config, Config::default());
        assert_eq!(config.target_dir, PathBuf::from("./local"));
        assert_eq!(config.max_width, 80);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("RECIPE2MD_DIR", "/tmp/recipes"),
            ("RECIPE2MD_MAX_WIDTH", "60"),
            ("RECIPE2MD_TIMEOUT_SECS", "5"),
            ("RECIPE2MD_RATE_LIMIT_MS", "0"),
        ]));
        assert_eq!(config.target_dir, PathBuf::from("/tmp/recipes"));
        assert_eq!(config.max_width, 60);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.rate_limit_ms, 0);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = Config::from_lookup(lookup(&[
            ("RECIPE2MD_MAX_WIDTH", "0"),
            ("RECIPE2MD_TIMEOUT_SECS", "soon"),
        ]));
        assert_eq!(config.max_width, DEFAULT_MAX_WIDTH);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_cli_dir_wins() {
        let config = Config::default().with_target_dir(Some(PathBuf::from("elsewhere")));
        assert_eq!(config.target_dir, PathBuf::from("elsewhere"));
    }
}
