//! Application configuration for pagemark.
//!
//! User config lives at `~/.pagemark/pagemark.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PagemarkError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "pagemark.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".pagemark";

// ---------------------------------------------------------------------------
// Config structs (matching pagemark.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Local inference service settings.
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// Content proxy settings.
    #[serde(default)]
    pub proxy: ProxyConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Directory where converted Markdown artifacts are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Directory holding the activity log.
    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    /// Whether `convert` saves the artifact locally by default.
    #[serde(default = "default_true")]
    pub save_locally: bool,

    /// Default number of lines returned by the `logs` command.
    #[serde(default = "default_tail_lines")]
    pub tail_lines: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            log_dir: default_log_dir(),
            save_locally: true,
            tail_lines: default_tail_lines(),
        }
    }
}

fn default_output_dir() -> String {
    "output".into()
}
fn default_log_dir() -> String {
    "logs".into()
}
fn default_true() -> bool {
    true
}
fn default_tail_lines() -> usize {
    100
}

/// `[ollama]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Base URL of the local inference service.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model used when `--model` is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            default_model: None,
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:11434".into()
}

/// `[proxy]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Base address of the content-cleaning proxy. The target URL is appended
    /// after a single `/`, unencoded.
    #[serde(default = "default_proxy_base")]
    pub base: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            base: default_proxy_base(),
        }
    }
}

fn default_proxy_base() -> String {
    "https://r.jina.ai".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.pagemark/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PagemarkError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.pagemark/pagemark.toml`).
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
    let content = std::fs::read_to_string(path).map_err(|e| PagemarkError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| PagemarkError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| PagemarkError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| PagemarkError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| PagemarkError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("output_dir"));
        assert!(toml_str.contains("r.jina.ai"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.ollama.endpoint, "http://localhost:11434");
        assert_eq!(parsed.defaults.tail_lines, 100);
        assert!(parsed.defaults.save_locally);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[ollama]
endpoint = "http://127.0.0.1:9999"
default_model = "mistral"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.ollama.endpoint, "http://127.0.0.1:9999");
        assert_eq!(config.ollama.default_model.as_deref(), Some("mistral"));
        assert_eq!(config.defaults.output_dir, "output");
        assert_eq!(config.proxy.base, "https://r.jina.ai");
    }
}
