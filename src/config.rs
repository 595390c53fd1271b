use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DietRsError;
use crate::logging::LogConfig;
use crate::models::Profile;
use crate::report::ReportFormat;
use crate::validation::ValidationPolicy;

/// Keys accepted by [`AppConfig::get_value`] and [`AppConfig::set_value`]
pub const CONFIG_KEYS: [&str; 5] = [
    "settings.validation_policy",
    "settings.output_format",
    "logging.level",
    "logging.format",
    "default_profile_id",
];

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default profile ID (currently active)
    pub default_profile_id: Option<String>,

    /// Application metadata
    pub metadata: ConfigMetadata,

    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,

    #[serde(default)]
    pub logging: LogConfig,

    /// Saved profiles keyed by ID
    #[serde(default)]
    pub profiles: HashMap<String, ProfileConfig>,
}

/// Configuration metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// General application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Whether profiles are range-checked before use
    pub validation_policy: ValidationPolicy,

    /// Default output format for `recommend`
    pub output_format: ReportFormat,
}

/// A saved profile with its bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Unique profile identifier
    pub id: String,

    /// Display name
    pub name: String,

    pub profile: Profile,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            default_profile_id: None,
            metadata: ConfigMetadata {
                version: env!("CARGO_PKG_VERSION").to_string(),
                created_at: now,
                updated_at: now,
            },
            settings: AppSettings::default(),
            logging: LogConfig::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            validation_policy: ValidationPolicy::Strict,
            output_format: ReportFormat::Table,
        }
    }
}

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".dietrs")
            .join("config.toml")
    }

    /// Load configuration, falling back to defaults if the file is missing
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if !path.as_ref().exists() {
            tracing::info!(
                path = %path.as_ref().display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        Self::load_from_file(path)
    }

    /// Add a profile, making it the default if it is the first one
    pub fn add_profile(&mut self, profile_config: ProfileConfig) -> Result<()> {
        let profile_id = profile_config.id.clone();

        if self.profiles.contains_key(&profile_id) {
            bail!("Profile '{}' already exists", profile_id);
        }

        if self.profiles.is_empty() {
            self.default_profile_id = Some(profile_id.clone());
        }

        self.profiles.insert(profile_id, profile_config);
        self.metadata.updated_at = Utc::now();

        Ok(())
    }

    /// Remove a profile from the configuration
    pub fn remove_profile(&mut self, profile_id: &str) -> Result<ProfileConfig> {
        let removed = self
            .profiles
            .remove(profile_id)
            .ok_or_else(|| anyhow!("Profile '{}' not found", profile_id))?;

        if self.default_profile_id.as_deref() == Some(profile_id) {
            self.default_profile_id = None;
        }

        self.metadata.updated_at = Utc::now();
        Ok(removed)
    }

    pub fn get_profile(&self, profile_id: &str) -> Option<&ProfileConfig> {
        self.profiles.get(profile_id)
    }

    pub fn get_profile_mut(&mut self, profile_id: &str) -> Option<&mut ProfileConfig> {
        self.profiles.get_mut(profile_id)
    }

    /// Get the currently active profile
    pub fn get_default_profile(&self) -> Option<&ProfileConfig> {
        self.default_profile_id
            .as_ref()
            .and_then(|id| self.profiles.get(id))
    }

    pub fn set_default_profile(&mut self, profile_id: &str) -> Result<()> {
        if !self.profiles.contains_key(profile_id) {
            bail!("Profile '{}' not found", profile_id);
        }

        self.default_profile_id = Some(profile_id.to_string());
        self.metadata.updated_at = Utc::now();
        Ok(())
    }

    /// All saved profiles, sorted by name
    pub fn list_profiles(&self) -> Vec<&ProfileConfig> {
        let mut profiles: Vec<_> = self.profiles.values().collect();
        profiles.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        profiles
    }

    /// Read a setting by dotted key
    pub fn get_value(&self, key: &str) -> Result<String> {
        let value = match key {
            "settings.validation_policy" => self.settings.validation_policy.to_string(),
            "settings.output_format" => self.settings.output_format.to_string(),
            "logging.level" => self.logging.level.to_filter(),
            "logging.format" => format!("{:?}", self.logging.format).to_lowercase(),
            "default_profile_id" => self.default_profile_id.clone().unwrap_or_default(),
            _ => return Err(unknown_key(key).into()),
        };
        Ok(value)
    }

    /// Update a setting by dotted key
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "settings.validation_policy" => {
                self.settings.validation_policy = value.parse().map_err(DietRsError::Configuration)?;
            }
            "settings.output_format" => {
                self.settings.output_format = value.parse().map_err(DietRsError::Configuration)?;
            }
            "logging.level" => {
                self.logging.level = value.parse().map_err(DietRsError::Configuration)?;
            }
            "logging.format" => {
                self.logging.format = value.parse().map_err(DietRsError::Configuration)?;
            }
            "default_profile_id" => self.set_default_profile(value)?,
            _ => return Err(unknown_key(key).into()),
        }

        self.metadata.updated_at = Utc::now();
        Ok(())
    }
}

fn unknown_key(key: &str) -> DietRsError {
    DietRsError::Configuration(format!(
        "unknown key '{}', expected one of: {}",
        key,
        CONFIG_KEYS.join(", ")
    ))
}

impl ProfileConfig {
    /// Create a saved profile, generating an ID if none is given
    pub fn new(name: String, profile_id: Option<String>, profile: Profile) -> Self {
        let now = Utc::now();
        Self {
            id: profile_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name,
            profile,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn update_profile(&mut self, profile: Profile) {
        self.profile = profile;
        self.updated_at = Utc::now();
    }
}
