use crate::error::{NotelyError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_BASE_URL: &str = "https://notehub-public.goit.study/api";
const DEFAULT_PER_PAGE: u32 = 12;
const DEFAULT_DEBOUNCE_MS: u64 = 300;
const DEFAULT_RETRIES: u32 = 3;
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_TOAST_SECS: u64 = 3;

pub const HOME_ENV: &str = "NOTELY_HOME";
pub const TOKEN_ENV: &str = "NOTELY_TOKEN";
pub const BASE_URL_ENV: &str = "NOTELY_BASE_URL";

/// Keys accepted by `notely config`, in display order.
pub const KEYS: &[&str] = &[
    "base-url",
    "token",
    "per-page",
    "debounce-ms",
    "retries",
    "timeout-secs",
    "toast-secs",
];

/// Configuration for notely, stored as `config.json` in the config directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotelyConfig {
    /// Root of the notes API, without the trailing `/notes`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token sent with every request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Quiet period before a search edit is applied
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Retries for failed requests (client errors are never retried)
    #[serde(default = "default_retries")]
    pub retries: u32,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_toast_secs")]
    pub toast_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_retries() -> u32 {
    DEFAULT_RETRIES
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_toast_secs() -> u64 {
    DEFAULT_TOAST_SECS
}

impl Default for NotelyConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            per_page: DEFAULT_PER_PAGE,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            retries: DEFAULT_RETRIES,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            toast_secs: DEFAULT_TOAST_SECS,
        }
    }
}

/// Directory holding `config.json` and the TUI log file.
/// `NOTELY_HOME` wins over the platform config directory.
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(home) = std::env::var(HOME_ENV) {
        if !home.is_empty() {
            return Ok(PathBuf::from(home));
        }
    }
    ProjectDirs::from("com", "notely", "notely")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| NotelyError::Config("Could not determine config dir".into()))
}

impl NotelyConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: NotelyConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Like [`NotelyConfig::load`], then applies `NOTELY_TOKEN` / `NOTELY_BASE_URL`.
    pub fn load_with_env<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let mut config = Self::load(config_dir)?;
        config.apply_env(
            std::env::var(TOKEN_ENV).ok(),
            std::env::var(BASE_URL_ENV).ok(),
        );
        Ok(config)
    }

    fn apply_env(&mut self, token: Option<String>, base_url: Option<String>) {
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            self.token = Some(token);
        }
        if let Some(url) = base_url.filter(|u| !u.is_empty()) {
            self.base_url = url;
        }
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "base-url" => Some(self.base_url.clone()),
            "token" => Some(self.token.clone().unwrap_or_default()),
            "per-page" => Some(self.per_page.to_string()),
            "debounce-ms" => Some(self.debounce_ms.to_string()),
            "retries" => Some(self.retries.to_string()),
            "timeout-secs" => Some(self.timeout_secs.to_string()),
            "toast-secs" => Some(self.toast_secs.to_string()),
            _ => None,
        }
    }

    /// Like [`NotelyConfig::get`] but safe to print: the token is masked.
    pub fn display_value(&self, key: &str) -> Option<String> {
        let value = self.get(key)?;
        if key == "token" {
            Some(mask_secret(&value))
        } else {
            Some(value)
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "base-url" => {
                let trimmed = value.trim().trim_end_matches('/');
                if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
                    return Err(format!("base-url must start with http:// or https://: {}", value));
                }
                self.base_url = trimmed.to_string();
            }
            "token" => {
                self.token = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            "per-page" => self.per_page = parse_positive(key, value)? as u32,
            "debounce-ms" => {
                self.debounce_ms = value
                    .parse()
                    .map_err(|_| format!("{} must be a number: {}", key, value))?
            }
            "retries" => {
                self.retries = value
                    .parse()
                    .map_err(|_| format!("{} must be a number: {}", key, value))?
            }
            "timeout-secs" => self.timeout_secs = parse_positive(key, value)?,
            "toast-secs" => self.toast_secs = parse_positive(key, value)?,
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn toast_ttl(&self) -> Duration {
        Duration::from_secs(self.toast_secs)
    }
}

/// Hides all but the last four characters of a secret.
pub fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count == 0 {
        return String::from("(not set)");
    }
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count - 4), tail)
}

fn parse_positive(key: &str, value: &str) -> std::result::Result<u64, String> {
    match value.parse::<u64>() {
        Ok(n) if n > 0 && n <= u32::MAX as u64 => Ok(n),
        _ => Err(format!("{} must be a positive number: {}", key, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_value_masks_token() {
        let mut config = NotelyConfig::default();
        assert_eq!(config.display_value("token").as_deref(), Some("(not set)"));
        config.set("token", "secret-token").unwrap();
        assert_eq!(config.display_value("token").as_deref(), Some("********oken"));
        assert_eq!(config.display_value("per-page").as_deref(), Some("12"));
        assert_eq!(config.display_value("color"), None);
        assert_eq!(mask_secret("abc"), "***");
    }

    #[test]
    fn test_default_config() {
        let config = NotelyConfig::default();
        assert_eq!(config.per_page, 12);
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert!(config.token.is_none());
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = NotelyConfig::load(dir.path()).unwrap();
        assert_eq!(config, NotelyConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = NotelyConfig::default();
        config.set("per-page", "6").unwrap();
        config.set("token", "secret").unwrap();
        config.save(dir.path()).unwrap();

        let loaded = NotelyConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.per_page, 6);
        assert_eq!(loaded.token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), r#"{"per_page": 20}"#).unwrap();
        let loaded = NotelyConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.per_page, 20);
        assert_eq!(loaded.base_url, DEFAULT_BASE_URL);
        assert_eq!(loaded.debounce_ms, 300);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = NotelyConfig::default();
        config.apply_env(Some("tok".into()), Some("http://localhost:3000".into()));
        assert_eq!(config.token.as_deref(), Some("tok"));
        assert_eq!(config.base_url, "http://localhost:3000");

        config.apply_env(Some(String::new()), None);
        assert_eq!(config.token.as_deref(), Some("tok"));
    }

    #[test]
    fn test_set_validates() {
        let mut config = NotelyConfig::default();
        assert!(config.set("per-page", "0").is_err());
        assert!(config.set("per-page", "abc").is_err());
        assert!(config.set("base-url", "ftp://x").is_err());
        assert!(config.set("colour", "blue").is_err());

        config.set("base-url", "http://localhost:8080/api/").unwrap();
        assert_eq!(config.base_url, "http://localhost:8080/api");
        config.set("token", "").unwrap();
        assert!(config.token.is_none());
    }

    #[test]
    fn test_every_key_round_trips_through_get() {
        let config = NotelyConfig::default();
        for key in KEYS {
            assert!(config.get(key).is_some(), "missing key {}", key);
        }
        assert!(config.get("nope").is_none());
    }
}
