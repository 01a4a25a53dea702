//! Settings store for onosdash.
//!
//! TOML profiles, password resolution (env + keyring + plaintext), and
//! translation to `onosdash_core::ControllerConfig`. The CLI layers its
//! `GlobalOpts` flag overrides on top of what this crate resolves.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use onosdash_api::endpoint::{DEFAULT_HOST, DEFAULT_PASSWORD, DEFAULT_PORT, DEFAULT_USERNAME};
use onosdash_core::{ControllerConfig, DEFAULT_REFRESH_INTERVAL, Endpoint, ThroughputUnit};

/// Service name under which passwords live in the system keyring.
pub const KEYRING_SERVICE: &str = "onosdash";

/// Overrides the config file location (mainly for tests and scripts).
pub const CONFIG_PATH_ENV: &str = "ONOSDASH_CONFIG";

/// Consulted after a profile's own `password_env`.
pub const PASSWORD_ENV: &str = "ONOSDASH_PASSWORD";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found (available: {available})")]
    ProfileNotFound { name: String, available: String },

    #[error("unknown setting '{key}' (valid keys: {valid})")]
    UnknownKey { key: String, valid: String },

    #[error("keyring error: {0}")]
    Keyring(String),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level settings file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    /// Presentation defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named controller profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use: explicit choice, else the configured
    /// default, else `"default"`.
    pub fn active_profile_name(&self, requested: Option<&str>) -> String {
        requested
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    /// Look up a profile by name.
    ///
    /// A missing profile falls back to the built-in defaults, unless it
    /// was asked for explicitly.
    pub fn profile(&self, name: &str, explicit: bool) -> Result<Profile, ConfigError> {
        if let Some(profile) = self.profiles.get(name) {
            return Ok(profile.clone());
        }
        if explicit {
            return Err(ConfigError::ProfileNotFound {
                name: name.into(),
                available: self.profile_names(),
            });
        }
        debug!(profile = name, "profile not configured, using defaults");
        Ok(Profile::default())
    }

    fn profile_names(&self) -> String {
        if self.profiles.is_empty() {
            "(none)".into()
        } else {
            self.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// One controller's connection and polling settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    #[serde(default = "default_controller_ip")]
    pub controller_ip: String,

    #[serde(default = "default_controller_port")]
    pub controller_port: u16,

    #[serde(default = "default_username")]
    pub username: String,

    /// Plaintext password (prefer keyring or `password_env`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Environment variable holding the password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,

    /// Milliseconds between refresh cycles.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,

    #[serde(default = "default_true")]
    pub auto_refresh: bool,

    #[serde(default)]
    pub throughput_unit: ThroughputUnit,

    #[serde(default = "default_true")]
    pub connectivity_check: bool,

    /// Per-profile request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            controller_ip: default_controller_ip(),
            controller_port: default_controller_port(),
            username: default_username(),
            password: None,
            password_env: None,
            refresh_interval: default_refresh_interval(),
            auto_refresh: true,
            throughput_unit: ThroughputUnit::default(),
            connectivity_check: true,
            timeout: None,
        }
    }
}

fn default_controller_ip() -> String {
    DEFAULT_HOST.into()
}
fn default_controller_port() -> u16 {
    DEFAULT_PORT
}
fn default_username() -> String {
    DEFAULT_USERNAME.into()
}
#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
fn default_refresh_interval() -> u64 {
    DEFAULT_REFRESH_INTERVAL.as_millis() as u64
}
fn default_true() -> bool {
    true
}

/// Keys accepted by [`Profile::set`].
pub const PROFILE_KEYS: &[&str] = &[
    "controller_ip",
    "controller_port",
    "username",
    "password",
    "password_env",
    "refresh_interval",
    "auto_refresh",
    "throughput_unit",
    "connectivity_check",
    "timeout",
];

impl Profile {
    /// Reject settings no controller connection could be built from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.controller_ip.trim().is_empty() {
            return Err(validation("controller_ip", "must not be empty"));
        }
        if self.controller_port == 0 {
            return Err(validation("controller_port", "must be between 1 and 65535"));
        }
        if self.username.trim().is_empty() {
            return Err(validation("username", "must not be empty"));
        }
        if self.timeout == Some(0) {
            return Err(validation("timeout", "must be at least 1 second"));
        }
        Ok(())
    }

    /// Assign one setting from its string form. Dashes and underscores
    /// are interchangeable in `key`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key.replace('-', "_").as_str() {
            "controller_ip" => self.controller_ip = value.trim().to_owned(),
            "controller_port" => {
                self.controller_port = value
                    .parse()
                    .map_err(|_| validation("controller_port", "must be a number between 1 and 65535"))?;
            }
            "username" => self.username = value.to_owned(),
            "password" => self.password = Some(value.to_owned()).filter(|v| !v.is_empty()),
            "password_env" => self.password_env = Some(value.to_owned()).filter(|v| !v.is_empty()),
            "refresh_interval" => {
                self.refresh_interval = value
                    .parse()
                    .map_err(|_| validation("refresh_interval", "must be a number (milliseconds)"))?;
            }
            "auto_refresh" => self.auto_refresh = parse_bool("auto_refresh", value)?,
            "throughput_unit" => {
                self.throughput_unit = value
                    .parse()
                    .map_err(|_| validation("throughput_unit", "must be one of Kbps, Mbps, Gbps"))?;
            }
            "connectivity_check" => {
                self.connectivity_check = parse_bool("connectivity_check", value)?;
            }
            "timeout" => {
                self.timeout = Some(
                    value
                        .parse()
                        .map_err(|_| validation("timeout", "must be a number (seconds)"))?,
                );
            }
            _ => {
                return Err(ConfigError::UnknownKey {
                    key: key.into(),
                    valid: PROFILE_KEYS.join(", "),
                });
            }
        }
        self.validate()
    }
}

fn validation(field: &str, reason: &str) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

fn parse_bool(field: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(validation(field, "must be 'true' or 'false'")),
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `ONOSDASH_CONFIG`, else the platform
/// config directory.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("org", "onosdash", "onosdash").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("onosdash");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load defaults, then `path` (if present), then `ONOSDASH_*` variables.
///
/// Nested keys use a double underscore, e.g.
/// `ONOSDASH_PROFILES__LAB__CONTROLLER_IP=10.0.0.5`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("ONOSDASH_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load the settings file alone, without `ONOSDASH_*` variables.
///
/// Use this when the result is written back to disk, so that
/// environment overrides (passwords included) stay out of the file.
pub fn load_config_file() -> Result<Config, ConfigError> {
    load_config_file_from(&config_path())
}

pub fn load_config_file_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .extract()?;
    Ok(config)
}

/// Load config, returning a default if the file is missing or unreadable.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(&path, cfg)?;
    Ok(path)
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Restore defaults by deleting the settings file. Returns whether a file
/// was removed.
pub fn reset_config() -> Result<bool, ConfigError> {
    reset_config_at(&config_path())
}

pub fn reset_config_at(path: &Path) -> Result<bool, ConfigError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

// ── Credential resolution ───────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))
        .map_err(|e| ConfigError::Keyring(e.to_string()))
}

/// Resolve the controller password.
///
/// Order: the profile's `password_env`, `ONOSDASH_PASSWORD`, the system
/// keyring, the plaintext `password`, and finally the ONOS default.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> SecretString {
    // 1. Profile's password_env → env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return SecretString::from(val);
        }
    }

    // 2. Global env var
    if let Ok(val) = std::env::var(PASSWORD_ENV) {
        return SecretString::from(val);
    }

    // 3. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return SecretString::from(secret);
        }
    }

    // 4. Plaintext in config
    if let Some(ref pw) = profile.password {
        return SecretString::from(pw.clone());
    }

    SecretString::from(DEFAULT_PASSWORD)
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?
        .set_password(password)
        .map_err(|e| ConfigError::Keyring(e.to_string()))
}

/// Build a `ControllerConfig` from a profile, with no CLI flag overrides.
pub fn profile_to_controller_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<ControllerConfig, ConfigError> {
    profile.validate()?;

    let endpoint = Endpoint::new(
        profile.controller_ip.trim(),
        profile.controller_port,
        profile.username.as_str(),
        resolve_password(profile, profile_name),
    );

    Ok(ControllerConfig {
        endpoint,
        refresh_interval: Duration::from_millis(profile.refresh_interval),
        timeout: Duration::from_secs(profile.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        throughput_unit: profile.throughput_unit,
        connectivity_check: profile.connectivity_check,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn write(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn editing_does_not_persist_env_overrides() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("ONOSDASH_PROFILES__LAB__PASSWORD", "s3cret-from-env");
            let dir = tempfile::tempdir().unwrap();
            let path = write(
                &dir,
                r#"
    [profiles.lab]
    controller_ip = "10.0.0.5"
    "#,
            );

            // The layered view still sees the override.
            let layered = load_config_from(&path).unwrap();
            assert_eq!(
                layered.profiles["lab"].password.as_deref(),
                Some("s3cret-from-env")
            );

            let mut cfg = load_config_file_from(&path).unwrap();
            let profile = cfg.profiles.get_mut("lab").unwrap();
            assert_eq!(profile.password, None);
            profile.set("refresh_interval", "3000").unwrap();
            save_config_to(&path, &cfg).unwrap();

            let written = std::fs::read_to_string(&path).unwrap();
            assert!(!written.contains("s3cret-from-env"));
            assert!(written.contains("10.0.0.5"));
            Ok(())
        });
    }

    #[test]
    fn broken_file_is_an_error_for_editing() {
        figment::Jail::expect_with(|_jail| {
            let dir = tempfile::tempdir().unwrap();
            let path = write(&dir, "[profiles.lab\ncontroller_ip = ");
            assert!(load_config_file_from(&path).is_err());

            let absent = load_config_file_from(&dir.path().join("absent.toml")).unwrap();
            assert_eq!(absent.default_profile.as_deref(), Some("default"));
            Ok(())
        });
    }

    #[test]
    fn missing_file_yields_defaults() {
        // Figment's jail serializes tests that read ONOSDASH_* variables.
        figment::Jail::expect_with(|_jail| {
            let dir = tempfile::tempdir().unwrap();
            let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
            assert_eq!(cfg.default_profile.as_deref(), Some("default"));
            assert_eq!(cfg.defaults.output, "table");

            let profile = cfg.profile("default", false).unwrap();
            assert_eq!(profile, Profile::default());
            assert_eq!(profile.controller_ip, "127.0.0.1");
            assert_eq!(profile.controller_port, 8181);
            assert_eq!(profile.username, "onos");
            assert_eq!(profile.refresh_interval, 5000);
            assert!(profile.auto_refresh);
            Ok(())
        });
    }

    #[test]
    fn partial_profile_fills_in_defaults() {
        figment::Jail::expect_with(|_jail| {
            let dir = tempfile::tempdir().unwrap();
            let path = write(
                &dir,
                r#"
    default_profile = "lab"

    [profiles.lab]
    controller_ip = "10.0.0.5"
    throughput_unit = "Gbps"
    "#,
            );

            let cfg = load_config_from(&path).unwrap();
            let name = cfg.active_profile_name(None);
            assert_eq!(name, "lab");

            let profile = cfg.profile(&name, false).unwrap();
            assert_eq!(profile.controller_ip, "10.0.0.5");
            assert_eq!(profile.controller_port, 8181);
            assert_eq!(profile.throughput_unit, ThroughputUnit::Gbps);
            assert!(profile.connectivity_check);
            Ok(())
        });
    }

    #[test]
    fn explicit_unknown_profile_is_an_error() {
        let cfg = Config::default();
        let err = cfg.profile("staging", true).unwrap_err();
        assert!(matches!(err, ConfigError::ProfileNotFound { .. }));
        assert!(err.to_string().contains("(none)"));
    }

    #[test]
    fn save_then_load_preserves_profiles() {
        figment::Jail::expect_with(|_jail| {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("nested").join("config.toml");

            let mut cfg = Config::default();
            let mut profile = Profile::default();
            profile.set("controller-ip", "192.168.1.10").unwrap();
            profile.set("refresh_interval", "2000").unwrap();
            cfg.profiles.insert("default".into(), profile.clone());
            save_config_to(&path, &cfg).unwrap();

            let loaded = load_config_from(&path).unwrap();
            assert_eq!(loaded.profiles.get("default"), Some(&profile));
            Ok(())
        });
    }

    #[test]
    fn reset_removes_file_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "default_profile = \"x\"\n");
        assert!(reset_config_at(&path).unwrap());
        assert!(!path.exists());
        assert!(!reset_config_at(&path).unwrap());
    }

    #[test]
    fn set_rejects_bad_values() {
        let mut profile = Profile::default();
        assert!(matches!(
            profile.set("controller_port", "0"),
            Err(ConfigError::Validation { .. })
        ));
        assert!(profile.set("controller_port", "http").is_err());
        assert!(profile.set("auto_refresh", "maybe").is_err());
        assert!(profile.set("throughput_unit", "bps").is_err());
        assert!(matches!(
            profile.set("site", "default"),
            Err(ConfigError::UnknownKey { .. })
        ));

        profile.set("auto_refresh", "off").unwrap();
        assert!(!profile.auto_refresh);
        profile.set("throughput_unit", "kbps").unwrap();
        assert_eq!(profile.throughput_unit, ThroughputUnit::Kbps);
    }

    #[test]
    fn validation_rejects_empty_host() {
        let profile = Profile {
            controller_ip: "  ".into(),
            ..Profile::default()
        };
        let err = profile_to_controller_config(&profile, "default").unwrap_err();
        assert!(err.to_string().contains("controller_ip"));
    }

    #[test]
    fn profile_translates_to_controller_config() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("ONOSDASH_TEST_PW_TRANSLATE", "s3cret");

            let profile = Profile {
                controller_ip: "10.1.1.1".into(),
                controller_port: 8282,
                password_env: Some("ONOSDASH_TEST_PW_TRANSLATE".into()),
                refresh_interval: 0,
                throughput_unit: ThroughputUnit::Kbps,
                connectivity_check: false,
                timeout: Some(3),
                ..Profile::default()
            };

            let cfg = profile_to_controller_config(&profile, "translate-test").unwrap();
            assert_eq!(cfg.endpoint.host, "10.1.1.1");
            assert_eq!(cfg.endpoint.port, 8282);
            assert_eq!(cfg.endpoint.username, "onos");
            assert_eq!(cfg.timeout, Duration::from_secs(3));
            assert_eq!(cfg.refresh_interval, Duration::ZERO);
            assert_eq!(
                cfg.effective_refresh_interval(),
                onosdash_core::MIN_REFRESH_INTERVAL
            );
            assert_eq!(cfg.throughput_unit, ThroughputUnit::Kbps);
            assert!(!cfg.connectivity_check);
            assert_eq!(
                resolve_password(&profile, "translate-test").expose_secret(),
                "s3cret"
            );
            Ok(())
        });
    }

    #[test]
    fn global_password_env_beats_plaintext() {
        figment::Jail::expect_with(|jail| {
            jail.set_env(PASSWORD_ENV, "from-env");
            let profile = Profile {
                password: Some("from-file".into()),
                ..Profile::default()
            };
            assert_eq!(
                resolve_password(&profile, "env-test").expose_secret(),
                "from-env"
            );
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file_values() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                "[profiles.default]\ncontroller_ip = \"10.0.0.1\"\n",
            )?;
            jail.set_env("ONOSDASH_DEFAULTS__OUTPUT", "json");
            jail.set_env("ONOSDASH_PROFILES__DEFAULT__CONTROLLER_IP", "10.0.0.2");

            let cfg = load_config_from(&jail.directory().join("config.toml")).unwrap();
            assert_eq!(cfg.defaults.output, "json");
            assert_eq!(cfg.profiles["default"].controller_ip, "10.0.0.2");
            Ok(())
        });
    }
}
