//! Application configuration for Paperform.
//!
//! User config lives at `~/.paperform/paperform.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PaperformError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "paperform.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".paperform";

// ---------------------------------------------------------------------------
// Config structs (matching paperform.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// External model (OpenAI-compatible API) settings.
    #[serde(default)]
    pub model: ModelConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default citation style identifier.
    #[serde(default = "default_style")]
    pub style: String,

    /// Default output directory for formatted artifacts.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            style: default_style(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_style() -> String {
    "mla".into()
}
fn default_output_dir() -> String {
    "~/paperform-output".into()
}

/// `[model]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model ID used for restructuring.
    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            base_url: default_base_url(),
            model_id: default_model_id(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".into()
}
fn default_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model_id() -> String {
    "gpt-4o-mini".into()
}
fn default_timeout_secs() -> u64 {
    60
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.paperform/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PaperformError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.paperform/paperform.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| PaperformError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| PaperformError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| PaperformError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| PaperformError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| PaperformError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Expand `~` or a leading `~/` to the user's home directory. Other
/// tilde forms (`~alice/...`) pass through unchanged.
pub fn expand_tilde(path: &str) -> Result<PathBuf> {
    if path == "~" || path.starts_with("~/") {
        let home = dirs::home_dir()
            .ok_or_else(|| PaperformError::config("could not determine home directory"))?;
        return Ok(home.join(path.trim_start_matches('~').trim_start_matches('/')));
    }
    Ok(PathBuf::from(path))
}

/// Check that the model API key env var is set and non-empty.
pub fn validate_api_key(config: &AppConfig) -> Result<()> {
    let var_name = &config.model.api_key_env;
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(()),
        _ => Err(PaperformError::config(format!(
            "model API key not found. Set the {var_name} environment variable, \
             or run with --offline to skip the model call."
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("output_dir"));
        assert!(toml_str.contains("OPENAI_API_KEY"));
        assert!(toml_str.contains("api.openai.com"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults.style, "mla");
        assert_eq!(parsed.model.api_key_env, "OPENAI_API_KEY");
        assert_eq!(parsed.model.timeout_secs, 60);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[model]
model_id = "gpt-4o"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.model.model_id, "gpt-4o");
        assert_eq!(config.model.base_url, "https://api.openai.com/v1");
        assert_eq!(config.defaults.style, "mla");
    }

    #[test]
    fn tilde_expands_only_for_home_prefix() {
        let home = dirs::home_dir().expect("home dir");
        assert_eq!(expand_tilde("~").unwrap(), home);
        assert_eq!(expand_tilde("~/out").unwrap(), home.join("out"));
        // A named-user tilde is not ours to resolve.
        assert_eq!(expand_tilde("~alice/out").unwrap(), PathBuf::from("~alice/out"));
        assert_eq!(expand_tilde("/abs/path").unwrap(), PathBuf::from("/abs/path"));
    }

    #[test]
    fn api_key_validation() {
        let mut config = AppConfig::default();
        // Use a unique env var name to avoid interfering with other tests
        config.model.api_key_env = "PF_TEST_NONEXISTENT_KEY_12345".into();
        let result = validate_api_key(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("API key not found"));
    }
}
