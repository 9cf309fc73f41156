//! `my-tools setup` — interactive configuration wizard.
//!
//! Asks for the Azure OpenAI endpoint and key and writes them to
//! `~/.my-ai-tools/.env`, the file [`config::load`](crate::config::load)
//! reads. Nothing here is used by the `process` path.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, bail};
use console::{Term, style};
use dialoguer::{Confirm, Input, Password};

use crate::config::{self, API_KEY_VAR, URL_VAR};
use crate::error::AppError;

const MIN_API_KEY_LEN: usize = 10;

/// Run the wizard against the terminal.
pub fn run() -> anyhow::Result<()> {
    if !Term::stderr().is_term() {
        bail!("cannot run interactive commands in current environment");
    }

    println!("{}", style("Azure OpenAI Configuration Wizard").cyan().bold());
    println!("{}", style("This will help you configure Azure OpenAI connection settings\n").dim());

    let config_dir = config::config_dir()?;
    let env_file = config::env_file_path()?;

    if env_file.exists() {
        let overwrite = Confirm::new()
            .with_prompt("Existing configuration detected. Do you want to overwrite it?")
            .default(false)
            .interact()
            .context("reading overwrite confirmation")?;
        if !overwrite {
            println!("{}", style("Configuration cancelled, existing settings preserved").yellow());
            return Ok(());
        }
    }

    let api_url: String = Input::new()
        .with_prompt("Please enter Azure OpenAI URL")
        .validate_with(|input: &String| validate_url(input))
        .interact_text()
        .context("reading Azure OpenAI URL")?;
    let api_url = api_url.trim().to_string();

    let api_key = Password::new()
        .with_prompt("Please enter Azure OpenAI API Key")
        .validate_with(|input: &String| validate_api_key(input))
        .interact()
        .context("reading Azure OpenAI API key")?;

    let confirm = Confirm::new()
        .with_prompt("Confirm saving the above configuration?")
        .default(true)
        .interact()
        .context("reading save confirmation")?;
    if !confirm {
        println!("{}", style("Configuration save cancelled").yellow());
        return Ok(());
    }

    if ensure_config_dir(&config_dir)? {
        println!("{}", style(format!("Created configuration directory: {}", config_dir.display())).green());
    }
    write_env_file(&env_file, &api_url, &api_key)?;
    println!("{}", style(format!("Configuration saved to: {}", env_file.display())).green());

    println!("\n{}", style("Configuration completed!").green().bold());
    println!("{}", style("You can now use my-tools commands!").cyan());
    Ok(())
}

/// Non-empty and parseable as an absolute URL.
pub fn validate_url(url: &str) -> Result<(), String> {
    let url = url.trim();
    if url.is_empty() {
        return Err("URL cannot be empty".into());
    }
    reqwest::Url::parse(url)
        .map(|_| ())
        .map_err(|_| "Please enter a valid URL format".into())
}

/// Non-empty and at least ten characters long.
pub fn validate_api_key(key: &str) -> Result<(), String> {
    if key.trim().is_empty() {
        return Err("API Key cannot be empty".into());
    }
    if key.chars().count() < MIN_API_KEY_LEN {
        return Err(format!("API Key must be at least {MIN_API_KEY_LEN} characters long"));
    }
    Ok(())
}

/// The env file body understood by the config loader.
pub fn env_file_contents(api_url: &str, api_key: &str) -> String {
    format!("# Azure OpenAI Configuration\n{URL_VAR}={api_url}\n{API_KEY_VAR}={api_key}\n")
}

/// Create `dir` if missing. Returns `true` when it had to be created.
pub fn ensure_config_dir(dir: &Path) -> Result<bool, AppError> {
    if dir.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(dir)
        .map_err(|e| AppError::Setup(format!("cannot create {}: {e}", dir.display())))?;
    Ok(true)
}

/// Write (or replace) the env file. On unix it is readable by the owner only,
/// since it holds the API key.
pub fn write_env_file(path: &Path, api_url: &str, api_key: &str) -> Result<(), AppError> {
    let write_err = |e: std::io::Error| AppError::Setup(format!("cannot write {}: {e}", path.display()));

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path).map_err(write_err)?;

    // `mode` only applies on creation; tighten a file left by an older run.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600)).map_err(write_err)?;
    }

    file.write_all(env_file_contents(api_url, api_key).as_bytes()).map_err(write_err)
}
