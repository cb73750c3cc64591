//! TOML-based application configuration.
//!
//! Stores:
//! - The default acting account for the CLI
//! - Progress display preferences
//! - Invitation mail delivery (Resend)
//! - The public base URL used in invitation links
//!
//! Configuration is stored at `data_dir()/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;

/// Account used when no `--as` is given.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountConfig {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Days shown as squares at the end of a long interval.
    #[serde(default = "default_final_week_days")]
    pub final_week_days: u32,
    #[serde(default = "default_true")]
    pub show_day_squares: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Resend API key. `RESEND_API_KEY` takes precedence.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_mail_from")]
    pub from: String,
    #[serde(default = "default_mail_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Public URL of the app; invitation links point here.
    #[serde(default = "default_app_base_url")]
    pub base_url: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `data_dir()/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub account: AccountConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub app: AppConfig,
}

/// Upper bound for `display.final_week_days`; also bounds the number of
/// day squares drawn for any chore.
pub const MAX_FINAL_WEEK_DAYS: u32 = 366;

/// Shown instead of a stored API key.
pub const REDACTED: &str = "********";

fn default_final_week_days() -> u32 {
    7
}
fn default_true() -> bool {
    true
}
fn default_mail_from() -> String {
    "Chores-IO <noreply@chores.jstr.sh>".into()
}
fn default_mail_base_url() -> String {
    "https://api.resend.com".into()
}
fn default_app_base_url() -> String {
    "http://localhost:3000".into()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            final_week_days: default_final_week_days(),
            show_day_squares: true,
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: String::new(),
            from: default_mail_from(),
            base_url: default_mail_base_url(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: default_app_base_url(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(format!("expected true or false, got '{value}'")))?,
                    ),
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Object(_) => return Err(unknown()),
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Path of the config file in the data directory.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the data directory, writing defaults on first use.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file does not exist.
    ///
    /// A hand-edited file is validated like a `set` would be.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Self = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the data directory.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default config");
            Self::default()
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key without saving.
    ///
    /// # Errors
    /// Returns an error if the key is unknown or the value has the wrong
    /// type or fails validation. `self` is unchanged on error.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a value by key and save.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.set_value(key, value)?;
        self.save()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_FINAL_WEEK_DAYS).contains(&self.display.final_week_days) {
            return Err(ConfigError::InvalidValue {
                key: "display.final_week_days".into(),
                message: format!("must be between 1 and {MAX_FINAL_WEEK_DAYS}"),
            });
        }
        let urls = [
            ("mail.base_url", &self.mail.base_url),
            ("app.base_url", &self.app.base_url),
        ];
        for (key, value) in urls {
            url::Url::parse(value).map_err(|e| ConfigError::InvalidValue {
                key: key.into(),
                message: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Resend API key, preferring `RESEND_API_KEY` over the stored value.
    pub fn resend_api_key(&self) -> Option<String> {
        std::env::var("RESEND_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| Some(self.mail.api_key.clone()).filter(|k| !k.trim().is_empty()))
    }

    /// Copy safe to print: a stored API key is replaced by [`REDACTED`].
    pub fn redacted(&self) -> Self {
        let mut cfg = self.clone();
        if !cfg.mail.api_key.is_empty() {
            cfg.mail.api_key = REDACTED.to_string();
        }
        cfg
    }

    /// Default acting account, if one is configured.
    pub fn account_email(&self) -> Option<&str> {
        Some(self.account.email.trim()).filter(|e| !e.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.display.final_week_days, 7);
        assert_eq!(parsed.mail.from, "Chores-IO <noreply@chores.jstr.sh>");
        assert!(!parsed.mail.enabled);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[account]\nemail = \"sam@example.com\"\n").unwrap();
        assert_eq!(parsed.account_email(), Some("sam@example.com"));
        assert_eq!(parsed.app.base_url, "http://localhost:3000");
        assert!(parsed.display.show_day_squares);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("display.show_day_squares").as_deref(), Some("true"));
        assert_eq!(cfg.get("display.final_week_days").as_deref(), Some("7"));
        assert_eq!(cfg.get("mail.base_url").as_deref(), Some("https://api.resend.com"));
        assert!(cfg.get("display.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_json_value_by_path_updates_nested_values() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        Config::set_json_value_by_path(&mut json, "mail.enabled", "true").unwrap();
        Config::set_json_value_by_path(&mut json, "display.final_week_days", "5").unwrap();
        Config::set_json_value_by_path(&mut json, "account.email", "sam@example.com").unwrap();
        assert_eq!(
            Config::get_json_value_by_path(&json, "mail.enabled").unwrap(),
            &serde_json::Value::Bool(true)
        );
        assert_eq!(
            Config::get_json_value_by_path(&json, "display.final_week_days").unwrap(),
            &serde_json::Value::Number(5.into())
        );
        assert_eq!(
            Config::get_json_value_by_path(&json, "account.email").unwrap(),
            &serde_json::Value::String("sam@example.com".to_string())
        );
    }

    #[test]
    fn set_rejects_unknown_keys_and_bad_types() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set_value("mail.nonexistent", "x"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.set_value("mail", "x"), Err(ConfigError::UnknownKey(_))));
        assert!(matches!(
            cfg.set_value("mail.enabled", "yes please"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.set_value("display.final_week_days", "0"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.set_value("app.base_url", "not a url"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(cfg.display.final_week_days, 7);
        assert_eq!(cfg.app.base_url, "http://localhost:3000");
    }

    #[test]
    fn load_from_writes_defaults_then_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let cfg = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.display.final_week_days, 7);

        let mut cfg = cfg;
        cfg.set_value("app.base_url", "https://chores.example.com").unwrap();
        cfg.save_to(&path).unwrap();
        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.app.base_url, "https://chores.example.com");
    }

    #[test]
    fn broken_file_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "display = 3").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }

    #[test]
    fn hand_edited_invalid_values_fail_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        std::fs::write(&path, "[display]\nfinal_week_days = 0\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::InvalidValue { .. })
        ));

        std::fs::write(&path, "[app]\nbase_url = \"nowhere\"\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn final_week_days_is_capped() {
        let mut cfg = Config::default();
        cfg.set_value("display.final_week_days", "366").unwrap();
        assert!(matches!(
            cfg.set_value("display.final_week_days", "4000000000"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(cfg.display.final_week_days, MAX_FINAL_WEEK_DAYS);
    }

    #[test]
    fn redacted_hides_stored_api_key() {
        let mut cfg = Config::default();
        assert_eq!(cfg.redacted().get("mail.api_key").as_deref(), Some(""));
        cfg.set_value("mail.api_key", "re_secret").unwrap();
        let shown = cfg.redacted();
        assert_eq!(shown.get("mail.api_key").as_deref(), Some(REDACTED));
        assert!(!serde_json::to_string(&shown).unwrap().contains("re_secret"));
        assert_eq!(cfg.mail.api_key, "re_secret");
    }
}
