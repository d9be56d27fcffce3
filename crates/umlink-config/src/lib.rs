//! Configuration management for umlink.
//!
//! Parses `umlink.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `diagrams.server_url`
//! - every value of the `[attributes]` table

mod expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "umlink.toml";

/// Output formats the rendering server can produce.
const SUPPORTED_FORMATS: [&str; 2] = ["png", "svg"];

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the PlantUML server URL.
    pub server_url: Option<String>,
    /// Override the default output format.
    pub default_format: Option<String>,
    /// Extra document attributes (`-a name=value`), applied after `[attributes]`.
    pub attributes: Vec<(String, String)>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Diagram configuration as written in TOML.
    diagrams: DiagramsConfigRaw,
    /// Predefined document attributes.
    pub attributes: BTreeMap<String, String>,

    /// Resolved diagrams configuration (set after loading).
    #[serde(skip)]
    pub diagrams_resolved: DiagramsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Raw diagrams configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DiagramsConfigRaw {
    server_url: Option<String>,
    default_format: Option<String>,
    config_file: Option<String>,
}

/// Resolved diagram configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramsConfig {
    /// PlantUML server base URL, the process-wide default for every document.
    pub server_url: Option<String>,
    /// Output format used when a block and its document name none.
    pub default_format: String,
    /// Absolute path of the PlantUML config file, if configured.
    pub config_file: Option<PathBuf>,
    /// Contents of `config_file`, read once at load time.
    pub config_content: Option<String>,
}

impl Default for DiagramsConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            default_format: "png".to_owned(),
            config_file: None,
            config_content: None,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The PlantUML config file could not be read.
    #[error("Cannot read PlantUML config file {}: {source}", path.display())]
    ConfigFile {
        /// Resolved path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`diagrams.server_url`").
        field: String,
        /// Error message (e.g., "${`PLANTUML_SERVER_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

/// Require an output format the rendering server supports.
fn require_supported_format(format: &str, field: &str) -> Result<(), ConfigError> {
    if !SUPPORTED_FORMATS.contains(&format) {
        return Err(ConfigError::Validation(format!(
            "{field} must be one of {}, got '{format}'",
            SUPPORTED_FORMATS.join(", ")
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `umlink.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails, or
    /// the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(server_url) = &settings.server_url {
            self.diagrams_resolved.server_url = Some(server_url.clone());
        }
        if let Some(format) = &settings.default_format {
            self.diagrams_resolved.default_format.clone_from(format);
        }
        for (name, value) in &settings.attributes {
            self.attributes.insert(name.clone(), value.clone());
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref server_url) = self.diagrams_resolved.server_url {
            require_non_empty(server_url, "diagrams.server_url")?;
            require_http_url(server_url, "diagrams.server_url")?;
        }
        require_supported_format(
            &self.diagrams_resolved.default_format,
            "diagrams.default_format",
        )?;
        if let Some(format) = self.attributes.get("plantuml-default-format") {
            require_supported_format(format, "attributes.plantuml-default-format")?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref url) = self.diagrams.server_url {
            self.diagrams.server_url = Some(expand::expand_env(url, "diagrams.server_url")?);
        }

        for (name, value) in &mut self.attributes {
            *value = expand::expand_env(value, &format!("attributes.{name}"))?;
        }

        Ok(())
    }

    /// Resolve the raw diagrams section against the config directory.
    ///
    /// Reads the PlantUML config file so that diagram processing itself never
    /// touches the filesystem.
    fn resolve(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        let config_file = self
            .diagrams
            .config_file
            .as_deref()
            .map(|file| config_dir.join(file));

        let config_content = match &config_file {
            Some(path) => Some(std::fs::read_to_string(path).map_err(|source| {
                ConfigError::ConfigFile {
                    path: path.clone(),
                    source,
                }
            })?),
            None => None,
        };

        self.diagrams_resolved = DiagramsConfig {
            server_url: self.diagrams.server_url.clone(),
            default_format: self
                .diagrams
                .default_format
                .clone()
                .unwrap_or_else(|| "png".to_owned()),
            config_file,
            config_content,
        };

        Ok(())
    }
}
