//! Shared configuration for ttn-handler tools.
//!
//! TOML profiles, access-key resolution (env + keyring + plaintext), and
//! translation to the inputs `ttn_handler_api::ApplicationClient` is built
//! from. The CLI layers its flag overrides on top of [`ClientSettings`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use ttn_handler_api::{Announcement, CredentialPolicy, TransportConfig};

/// Keyring service name; entries are stored as `<profile>/access-key`.
pub const KEYRING_SERVICE: &str = "ttn-handler";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no access key configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to read certificate {path}: {source}")]
    Certificate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

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

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Named application profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            profiles: HashMap::new(),
        }
    }
}

/// One application on one handler.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Application id.
    pub app_id: String,

    /// Handler gRPC address (`host:port`), as announced by discovery.
    pub net_address: String,

    /// Announced certificate, inline PEM.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate: Option<String>,

    /// Announced certificate, read from a PEM file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_path: Option<PathBuf>,

    /// Access key in plaintext. Prefer the keyring or `access_key_env`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,

    /// Environment variable name containing the access key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key_env: Option<String>,

    /// How the announced certificate maps to a transport credential.
    #[serde(default)]
    pub credential_policy: CredentialPolicy,
}

impl Profile {
    /// Build the announcement record, reading `certificate_path` if set.
    pub fn announcement(&self) -> Result<Announcement, ConfigError> {
        let certificate = match (&self.certificate, &self.certificate_path) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::Validation {
                    field: "certificate".into(),
                    reason: "set either certificate or certificate_path, not both".into(),
                });
            }
            (Some(pem), None) => Some(pem.clone()),
            (None, Some(path)) => Some(std::fs::read_to_string(path).map_err(|source| {
                ConfigError::Certificate {
                    path: path.clone(),
                    source,
                }
            })?),
            (None, None) => None,
        };

        Ok(Announcement::new(self.net_address.clone(), certificate))
    }
}

/// Everything needed to construct an `ApplicationClient`.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub app_id: String,
    pub access_key: SecretString,
    pub announcement: Announcement,
    pub transport: TransportConfig,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "thethingsnetwork", "ttn-handler").map_or_else(
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
    p.push("ttn-handler");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path` + environment. A missing file yields defaults.
///
/// Environment keys use `__` as the nesting separator, e.g.
/// `TTN_PROFILES__DEFAULT__APP_ID`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("TTN_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(&config_path(), cfg)
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Profiles ────────────────────────────────────────────────────────

/// The profile to use: explicit override, then `default_profile`, then `"default"`.
pub fn active_profile_name(cfg: &Config, requested: Option<&str>) -> String {
    requested
        .map(str::to_owned)
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

// ── Access key resolution ───────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/access-key"))
}

/// Resolve a profile's access key from the credential chain.
pub fn resolve_access_key(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's access_key_env → env var lookup
    if let Some(ref env_name) = profile.access_key_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref key) = profile.access_key {
        return Ok(SecretString::from(key.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a profile's access key in the system keyring.
pub fn store_access_key(profile_name: &str, key: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(key)?;
    Ok(())
}

/// Build [`ClientSettings`] from a profile alone, without CLI flag overrides.
pub fn profile_to_settings(
    profile: &Profile,
    profile_name: &str,
) -> Result<ClientSettings, ConfigError> {
    let access_key = resolve_access_key(profile, profile_name)?;
    settings_with_access_key(profile, profile_name, access_key)
}

/// Build [`ClientSettings`] with an access key the caller already resolved.
pub fn settings_with_access_key(
    profile: &Profile,
    profile_name: &str,
    access_key: SecretString,
) -> Result<ClientSettings, ConfigError> {
    if profile.app_id.is_empty() {
        return Err(ConfigError::Validation {
            field: "app_id".into(),
            reason: format!("profile '{profile_name}' has no app_id"),
        });
    }
    if profile.net_address.is_empty() {
        return Err(ConfigError::Validation {
            field: "net_address".into(),
            reason: format!("profile '{profile_name}' has no net_address"),
        });
    }

    let announcement = profile.announcement()?;
    let transport = TransportConfig::default().with_policy(profile.credential_policy);

    Ok(ClientSettings {
        app_id: profile.app_id.clone(),
        access_key,
        announcement,
        transport,
    })
}
