//! Settings for the passkey verification service
//!
//! Settings resolve in layers, lowest priority first: built-in defaults,
//! a `Passgate.toml` in the working directory, a `Passgate.toml` in
//! `PASSGATE_CONFIG_DIR`, then environment variables. Each layer only
//! replaces what it sets, so a deployment can pin the relying party in
//! TOML and still flip a policy knob from the environment.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::{AttestationPolicy, UserVerificationPolicy, VerificationPolicy};

const SETTINGS_FILE: &str = "Passgate.toml";

/// Top-level settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassgateSettings {
    /// Relying party identity
    #[serde(default)]
    pub relying_party: RelyingPartySettings,
    /// Ceremony verification policy
    #[serde(default)]
    pub policy: VerificationPolicy,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Relying party identity the engine verifies ceremonies against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelyingPartySettings {
    /// Relying party id, usually the registrable domain
    #[serde(default = "default_rp_id")]
    pub id: String,
    /// Human-readable relying party name
    #[serde(default = "default_rp_name")]
    pub name: String,
    /// Origin ceremonies must come from, e.g. <https://example.com>
    #[serde(default = "default_rp_origin")]
    pub origin: String,
}

impl Default for RelyingPartySettings {
    fn default() -> Self {
        Self {
            id: default_rp_id(),
            name: default_rp_name(),
            origin: default_rp_origin(),
        }
    }
}

fn default_rp_id() -> String {
    "localhost".to_string()
}

fn default_rp_name() -> String {
    "Passgate".to_string()
}

fn default_rp_origin() -> String {
    "https://localhost".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter ("error", "warn", "info", "debug", "trace")
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl PassgateSettings {
    /// Load settings from configuration files and environment variables
    ///
    /// # Errors
    ///
    /// Returns an error when a settings file exists but cannot be read or
    /// parsed as TOML.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings = Self::load_base_settings()?;
        Self::apply_env_overrides(&mut settings);
        Ok(settings)
    }

    fn load_base_settings() -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings = Self::default();

        let default_path = PathBuf::from(SETTINGS_FILE);
        if default_path.exists() {
            settings = Self::from_file(&default_path)?;
        }

        if let Ok(config_dir) = std::env::var("PASSGATE_CONFIG_DIR") {
            let config_path = Path::new(&config_dir).join(SETTINGS_FILE);
            if config_path.exists() {
                settings = Self::from_file(&config_path)?;
            }
        }

        Ok(settings)
    }

    fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let toml_content = fs::read_to_string(path)?;
        let settings = basic_toml::from_str(&toml_content)?;
        debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Apply environment variable overrides on top of loaded settings
    pub fn apply_env_overrides(settings: &mut Self) {
        Self::apply_relying_party_env_overrides(&mut settings.relying_party);
        Self::apply_policy_env_overrides(&mut settings.policy);
        Self::apply_logging_env_overrides(&mut settings.logging);
    }

    fn apply_relying_party_env_overrides(relying_party: &mut RelyingPartySettings) {
        if let Ok(id) = std::env::var("PASSGATE_RP_ID") {
            relying_party.id = id;
        }
        if let Ok(name) = std::env::var("PASSGATE_RP_NAME") {
            relying_party.name = name;
        }
        if let Ok(origin) = std::env::var("PASSGATE_RP_ORIGIN") {
            relying_party.origin = origin;
        }
    }

    fn apply_policy_env_overrides(policy: &mut VerificationPolicy) {
        if let Ok(value) = std::env::var("PASSGATE_USER_VERIFICATION") {
            if let Some(parsed) = parse_user_verification(&value) {
                policy.user_verification = parsed;
            }
        }
        if let Ok(value) = std::env::var("PASSGATE_ATTESTATION") {
            if let Some(parsed) = parse_attestation(&value) {
                policy.attestation = parsed;
            }
        }
    }

    fn apply_logging_env_overrides(logging: &mut LoggingSettings) {
        if let Ok(level) = std::env::var("RUST_LOG") {
            logging.level = level;
        }
    }
}

fn parse_user_verification(value: &str) -> Option<UserVerificationPolicy> {
    match value.to_ascii_lowercase().as_str() {
        "required" => Some(UserVerificationPolicy::Required),
        "preferred" => Some(UserVerificationPolicy::Preferred),
        "discouraged" => Some(UserVerificationPolicy::Discouraged),
        _ => None,
    }
}

fn parse_attestation(value: &str) -> Option<AttestationPolicy> {
    match value.to_ascii_lowercase().as_str() {
        "permissive" => Some(AttestationPolicy::Permissive),
        "strict" => Some(AttestationPolicy::Strict),
        _ => None,
    }
}
