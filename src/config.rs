//! Configuration loading with env-var overrides.
//!
//! Reads `~/.my-ai-tools/.env` (written by `my-tools setup`) without touching
//! the process environment, then lets `AZURE_OPENAI_URL`,
//! `AZURE_OPENAI_API_KEY` and `MY_AI_TOOLS_LOG_LEVEL` from the real
//! environment take precedence over the file.

use std::env;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::AppError;

pub const CONFIG_DIR_NAME: &str = ".my-ai-tools";
pub const ENV_FILE_NAME: &str = ".env";

pub const URL_VAR: &str = "AZURE_OPENAI_URL";
pub const API_KEY_VAR: &str = "AZURE_OPENAI_API_KEY";
pub const LOG_LEVEL_VAR: &str = "MY_AI_TOOLS_LOG_LEVEL";

const DEFAULT_LOG_LEVEL: &str = "warn";

/// Fully-resolved configuration, read-only for the rest of the crate.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// Full chat completions endpoint URL.
    pub api_url: String,
    /// Sent as the `api-key` header.
    pub api_key: String,
    pub log_level: String,
}

// Hand-written so the key never lands in a log line.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("log_level", &self.log_level)
            .finish()
    }
}

/// Values taken from the process environment. Each one, when set, wins over
/// the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub log_level: Option<String>,
}

impl Overrides {
    pub fn from_env() -> Self {
        Self {
            api_url: env::var(URL_VAR).ok(),
            api_key: env::var(API_KEY_VAR).ok(),
            log_level: env::var(LOG_LEVEL_VAR).ok(),
        }
    }
}

/// `~/.my-ai-tools`
pub fn config_dir() -> Result<PathBuf, AppError> {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_DIR_NAME))
        .ok_or_else(|| AppError::Config("cannot determine home directory".into()))
}

/// `~/.my-ai-tools/.env`
pub fn env_file_path() -> Result<PathBuf, AppError> {
    Ok(config_dir()?.join(ENV_FILE_NAME))
}

/// Load config from `~/.my-ai-tools/.env`, then apply env-var overrides.
pub fn load() -> Result<Config, AppError> {
    load_from(&env_file_path()?, &Overrides::from_env())
}

/// Internal loader — accepts an explicit path and overrides.
/// Tests pass overrides directly instead of mutating env vars.
///
/// A missing file is not an error on its own: the environment may supply
/// everything.
pub fn load_from(path: &Path, overrides: &Overrides) -> Result<Config, AppError> {
    let mut raw = RawConfig::default();

    match dotenvy::from_path_iter(path) {
        Ok(iter) => {
            for item in iter {
                let (key, value) = item
                    .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;
                raw.set(&key, value);
            }
        }
        Err(dotenvy::Error::Io(e)) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => {
            return Err(AppError::Config(format!("cannot read {}: {e}", path.display())));
        }
    }

    let api_url = pick(overrides.api_url.as_ref(), raw.api_url)
        .ok_or_else(|| missing(URL_VAR, path))?;
    let api_key = pick(overrides.api_key.as_ref(), raw.api_key)
        .ok_or_else(|| missing(API_KEY_VAR, path))?;
    let log_level = pick(overrides.log_level.as_ref(), raw.log_level)
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

    reqwest::Url::parse(&api_url)
        .map_err(|e| AppError::Config(format!("{URL_VAR} is not a valid URL ({api_url}): {e}")))?;

    Ok(Config { api_url, api_key, log_level })
}

/// Keys recognised in the env file; everything else is ignored.
#[derive(Default)]
struct RawConfig {
    api_url: Option<String>,
    api_key: Option<String>,
    log_level: Option<String>,
}

impl RawConfig {
    fn set(&mut self, key: &str, value: String) {
        match key {
            URL_VAR => self.api_url = Some(value),
            API_KEY_VAR => self.api_key = Some(value),
            LOG_LEVEL_VAR => self.log_level = Some(value),
            _ => {}
        }
    }
}

/// First non-blank value, override first. Values are trimmed.
fn pick(over: Option<&String>, file: Option<String>) -> Option<String> {
    over.cloned()
        .into_iter()
        .chain(file)
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

fn missing(var: &str, path: &Path) -> AppError {
    AppError::Config(format!(
        "{var} is not set (looked in the environment and {}); run `my-tools setup`",
        path.display()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FULL_ENV: &str = "\
# Azure OpenAI Configuration
AZURE_OPENAI_URL=https://example.openai.azure.com/openai/deployments/gpt/chat/completions?api-version=2024-02-01
AZURE_OPENAI_API_KEY=file-key-0123456789
";

    fn write_env(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn parse_env_file() {
        let f = write_env(FULL_ENV);
        let cfg = load_from(f.path(), &Overrides::default()).unwrap();
        assert!(cfg.api_url.starts_with("https://example.openai.azure.com/"));
        assert!(cfg.api_url.ends_with("api-version=2024-02-01"));
        assert_eq!(cfg.api_key, "file-key-0123456789");
        assert_eq!(cfg.log_level, "warn");
    }

    #[test]
    fn environment_wins_over_file() {
        let f = write_env(FULL_ENV);
        let overrides = Overrides {
            api_url: Some("http://localhost:9999/chat".into()),
            api_key: Some("env-key-0123456789".into()),
            log_level: Some("debug".into()),
        };
        let cfg = load_from(f.path(), &overrides).unwrap();
        assert_eq!(cfg.api_url, "http://localhost:9999/chat");
        assert_eq!(cfg.api_key, "env-key-0123456789");
        assert_eq!(cfg.log_level, "debug");
    }

    #[test]
    fn blank_override_falls_back_to_file() {
        let f = write_env(FULL_ENV);
        let overrides = Overrides { api_key: Some("   ".into()), ..Default::default() };
        let cfg = load_from(f.path(), &overrides).unwrap();
        assert_eq!(cfg.api_key, "file-key-0123456789");
    }

    #[test]
    fn missing_file_uses_environment() {
        let overrides = Overrides {
            api_url: Some("https://example.com/chat".into()),
            api_key: Some("env-key-0123456789".into()),
            log_level: None,
        };
        let cfg = load_from(Path::new("/nonexistent/.env"), &overrides).unwrap();
        assert_eq!(cfg.api_url, "https://example.com/chat");
    }

    #[test]
    fn missing_key_errors() {
        let f = write_env("AZURE_OPENAI_URL=https://example.com/chat\n");
        let msg = load_from(f.path(), &Overrides::default()).unwrap_err().to_string();
        assert!(msg.contains("config error"));
        assert!(msg.contains(API_KEY_VAR));
        assert!(msg.contains("my-tools setup"));
    }

    #[test]
    fn missing_file_and_environment_errors() {
        let result = load_from(Path::new("/nonexistent/.env"), &Overrides::default());
        assert!(result.unwrap_err().to_string().contains(URL_VAR));
    }

    #[test]
    fn invalid_url_errors() {
        let f = write_env("AZURE_OPENAI_URL=not a url\nAZURE_OPENAI_API_KEY=k0123456789\n");
        let msg = load_from(f.path(), &Overrides::default()).unwrap_err().to_string();
        assert!(msg.contains("not a valid URL"));
    }

    #[test]
    fn debug_output_hides_key() {
        let f = write_env(FULL_ENV);
        let cfg = load_from(f.path(), &Overrides::default()).unwrap();
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("file-key-0123456789"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn config_dir_is_under_home() {
        let home = dirs::home_dir().expect("home dir must exist in test env");
        let dir = config_dir().unwrap();
        assert!(dir.starts_with(&home));
        assert!(env_file_path().unwrap().ends_with(".my-ai-tools/.env"));
    }
}
