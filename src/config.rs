use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cli::Cli;
use crate::error::{Error, Result};

pub const DEFAULT_CONFIG_FILE: &str = ".rubofix.toml";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MANIFEST: &str = "Gemfile";
pub const DEFAULT_LINTER: &[&str] = &["bundle", "exec", "rubocop"];

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_MODEL: &str = "MODEL";
pub const ENV_MAX: &str = "MAX";
pub const ENV_CONTEXT: &str = "CONTEXT";
pub const ENV_DEBUG: &str = "DEBUG";

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub max: Option<usize>,
    pub context: Option<usize>,
    pub debug: Option<bool>,
    pub linter: Option<Vec<String>>,
    pub manifest: Option<String>,
    pub prompt_dir: Option<String>,
}

#[derive(Clone, PartialEq)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub max_offenses: usize,
    pub context_radius: usize,
    pub debug: bool,
    pub linter: Vec<String>,
    pub manifest: PathBuf,
    pub prompt_dir: Option<PathBuf>,
    pub paths: Vec<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("max_offenses", &self.max_offenses)
            .field("context_radius", &self.context_radius)
            .field("debug", &self.debug)
            .field("linter", &self.linter)
            .field("manifest", &self.manifest)
            .field("prompt_dir", &self.prompt_dir)
            .field("paths", &self.paths)
            .finish()
    }
}

impl Config {
    /// Build the config from CLI flags, the process environment and the
    /// config file, in that order of precedence.
    pub fn load(cli: &Cli) -> Result<Self> {
        Self::load_with(cli, |key| std::env::var(key).ok())
    }

    pub fn load_with(cli: &Cli, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let file_config = match &cli.config {
            Some(path) => {
                let path = Path::new(path);
                if !path.exists() {
                    return Err(Error::ConfigNotFound(path.to_path_buf()));
                }
                parse_config(&std::fs::read_to_string(path)?)?
            }
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    parse_config(&std::fs::read_to_string(path)?)?
                } else {
                    ConfigFile::default()
                }
            }
        };

        merge(file_config, cli, env)
    }
}

pub fn parse_config(content: &str) -> Result<ConfigFile> {
    let config: ConfigFile = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &ConfigFile) -> Result<()> {
    if let Some(max) = config.max
        && max == 0
    {
        return Err(Error::ConfigValidation("max must be > 0".to_string()));
    }
    if let Some(ref linter) = config.linter
        && linter.is_empty()
    {
        return Err(Error::ConfigValidation(
            "linter must name a command".to_string(),
        ));
    }
    Ok(())
}

fn env_number(env: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<usize>> {
    match env(key) {
        None => Ok(None),
        Some(value) => value.trim().parse().map(Some).map_err(|_| {
            Error::ConfigValidation(format!("{key} must be a non-negative integer, got {value:?}"))
        }),
    }
}

pub fn merge(file: ConfigFile, cli: &Cli, env: impl Fn(&str) -> Option<String>) -> Result<Config> {
    let api_key = env(ENV_API_KEY)
        .filter(|key| !key.is_empty())
        .ok_or_else(|| Error::ConfigValidation(format!("{ENV_API_KEY} is not set")))?;

    let max_offenses = cli
        .max
        .or(env_number(&env, ENV_MAX)?)
        .or(file.max)
        .unwrap_or(1);
    if max_offenses == 0 {
        return Err(Error::ConfigValidation("max must be > 0".to_string()));
    }

    let linter = match &cli.linter {
        Some(command) => command.split_whitespace().map(str::to_string).collect(),
        None => file
            .linter
            .unwrap_or_else(|| DEFAULT_LINTER.iter().map(|s| s.to_string()).collect()),
    };
    if linter.is_empty() {
        return Err(Error::ConfigValidation(
            "linter must name a command".to_string(),
        ));
    }

    Ok(Config {
        api_key,
        model: cli
            .model
            .clone()
            .or_else(|| env(ENV_MODEL))
            .or(file.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        base_url: cli
            .base_url
            .clone()
            .or_else(|| env(ENV_BASE_URL))
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        max_offenses,
        context_radius: cli
            .context
            .or(env_number(&env, ENV_CONTEXT)?)
            .or(file.context)
            .unwrap_or(0),
        debug: cli.debug
            || env(ENV_DEBUG).is_some_and(|v| !v.is_empty())
            || file.debug.unwrap_or(false),
        linter,
        manifest: PathBuf::from(file.manifest.unwrap_or_else(|| DEFAULT_MANIFEST.to_string())),
        prompt_dir: file.prompt_dir.map(PathBuf::from),
        paths: cli.paths.clone(),
    })
}
