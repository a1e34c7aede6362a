//! Configuration file management for keto-plan.
//!
//! The only settings are for the model provider: an `[openai]` table with
//! `api_key` and optional `model`/`base_url`, written by `keto-plan init` to
//! `~/.config/keto-plan/config.toml`. Resolution chain: CLI flag > env var >
//! config file > default.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use keto_core::llm::{DEFAULT_BASE_URL, DEFAULT_MODEL, OpenAiClient};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const MODEL_ENV: &str = "OPENAI_MODEL";
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigFile {
    pub openai: OpenAiSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OpenAiSection {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Directory holding `config.toml`: `$XDG_CONFIG_HOME/keto-plan`, else
/// `~/.config/keto-plan`. macOS uses the same layout, so the path `init`
/// prints is the one `generate` reads.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("keto-plan");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("keto-plan")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Read `[openai]` settings from `path`. Errors if the file is missing, is
/// not TOML, or lacks `openai.api_key`.
fn read_config(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))
}

/// Load the config file if one exists. A file that exists but cannot be
/// used is logged and reported back so a later "key not found" error can
/// say why the file was skipped.
fn load_optional_config() -> (Option<ConfigFile>, Option<String>) {
    let path = config_path();
    if !path.exists() {
        return (None, None);
    }
    match read_config(&path) {
        Ok(cfg) => (Some(cfg), None),
        Err(err) => {
            let reason = format!("{err:#}");
            tracing::warn!(path = %path.display(), error = %reason, "ignoring config file");
            (None, Some(reason))
        }
    }
}

/// Write the `[openai]` settings from `keto-plan init`, creating the
/// directory as needed. The file holds the API key, so on Unix it is made
/// owner read/write only.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

/// Mask all but the last four characters of a secret for display.
pub fn redact(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 8 {
        return "*".repeat(count);
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("{}{tail}", "*".repeat(count - 4))
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved model settings, ready for use.
#[derive(Debug)]
pub struct PlannerConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl PlannerConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - API key: `cli_api_key` > `OPENAI_API_KEY` > `openai.api_key` > error
    /// - Model: `cli_model` > `OPENAI_MODEL` > `openai.model` > `DEFAULT_MODEL`
    /// - Base URL: `cli_base_url` > `OPENAI_BASE_URL` > `openai.base_url` > `DEFAULT_BASE_URL`
    pub fn resolve(
        cli_api_key: Option<&str>,
        cli_model: Option<&str>,
        cli_base_url: Option<&str>,
    ) -> Result<Self> {
        let (file_config, file_error) = load_optional_config();
        let section = file_config.as_ref().map(|cfg| &cfg.openai);

        let api_key = match pick(cli_api_key, API_KEY_ENV, section.map(|s| s.api_key.as_str())) {
            Some(key) if !key.trim().is_empty() => key,
            _ => match file_error {
                Some(reason) => bail!(
                    "OpenAI API key not found; set {API_KEY_ENV} or fix the config file ({reason})"
                ),
                None => bail!(
                    "OpenAI API key not found; set {API_KEY_ENV} or run `keto-plan init --api-key <KEY>`"
                ),
            },
        };

        let model = pick(cli_model, MODEL_ENV, section.and_then(|s| s.model.as_deref()))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let base_url = pick(
            cli_base_url,
            BASE_URL_ENV,
            section.and_then(|s| s.base_url.as_deref()),
        )
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            api_key,
            model,
            base_url,
        })
    }

    pub fn client(&self) -> OpenAiClient {
        OpenAiClient::new(self.api_key.clone(), self.model.clone())
            .with_base_url(self.base_url.clone())
    }
}

/// First of: CLI value, non-empty env var, config file value.
fn pick(cli: Option<&str>, env_var: &str, file: Option<&str>) -> Option<String> {
    if let Some(value) = cli {
        return Some(value.to_string());
    }
    match std::env::var(env_var) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => file.map(str::to_string),
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
