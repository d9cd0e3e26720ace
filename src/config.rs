use crate::theme::Theme;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{env, fs, path::{Path, PathBuf}};

pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";
pub const DEFAULT_TITLE: &str = "Unbiased News";

pub const ENV_API_URL: &str = "NEWS_API_URL";
pub const ENV_TITLE: &str = "NEWS_TITLE";

/// On-disk shape; every key is optional.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub api_url: Option<String>,
    pub title: Option<String>,
    pub open_command: Option<String>,
    pub theme: Option<Theme>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RuntimeConfig {
    pub api_url: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_command: Option<String>,
    pub theme: Theme,
}

impl RuntimeConfig {
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize config")
    }
}

/// Values given on the command line; they win over everything else.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_path: Option<PathBuf>,
    pub api_url: Option<String>,
    pub title: Option<String>,
}

pub fn load(overrides: &Overrides) -> Result<RuntimeConfig> {
    let file = match &overrides.config_path {
        Some(p) => Some(read_file(p)?),
        None => match default_config_path() {
            Some(p) if p.is_file() => Some(read_file(&p)?),
            _ => None,
        },
    };
    Ok(resolve(
        file.unwrap_or_default(),
        env::var(ENV_API_URL).ok(),
        env::var(ENV_TITLE).ok(),
        overrides,
    ))
}

fn read_file(path: &Path) -> Result<AppConfig> {
    let txt = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str(&txt).with_context(|| format!("failed to parse toml: {}", path.display()))
}

/// Layering: defaults < file < environment < command line.
fn resolve(
    file: AppConfig,
    env_api_url: Option<String>,
    env_title: Option<String>,
    overrides: &Overrides,
) -> RuntimeConfig {
    let pick = |cli: &Option<String>, env: Option<String>, file: Option<String>, default: &str| {
        cli.clone()
            .or(non_empty(env))
            .or(non_empty(file))
            .unwrap_or_else(|| default.to_string())
    };
    RuntimeConfig {
        api_url: pick(&overrides.api_url, env_api_url, file.api_url, DEFAULT_API_URL),
        title: pick(&overrides.title, env_title, file.title, DEFAULT_TITLE),
        open_command: non_empty(file.open_command),
        theme: file.theme.unwrap_or_default(),
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

fn default_config_path() -> Option<PathBuf> {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        let mut p = PathBuf::from(xdg);
        p.push("unbiased-news");
        p.push("config.toml");
        return Some(p);
    }
    if let Ok(home) = env::var("HOME") {
        let mut p = PathBuf::from(home);
        p.push(".config");
        p.push("unbiased-news");
        p.push("config.toml");
        return Some(p);
    }
    None
}
