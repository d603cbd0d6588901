use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::player::STARTING_STACK;

pub const CONFIG_ENV: &str = "SIXMAX_CONFIG";

/// Table stakes and engine options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TableConfig {
    pub starting_stack: u32,
    pub small_blind: u32,
    pub big_blind: u32,
    /// Deck seed; `None` draws a fresh one
    pub seed: Option<u64>,
    /// Deal the rest of the board when a hand ends by folds
    pub run_out_board_on_fold: bool,
    /// Append finished hands to this JSONL file
    pub hand_log: Option<PathBuf>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            starting_stack: STARTING_STACK,
            small_blind: 1,
            big_blind: 2,
            seed: None,
            run_out_board_on_fold: false,
            hand_log: None,
        }
    }
}

impl TableConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.small_blind == 0 || self.big_blind == 0 {
            return Err(ConfigError::Invalid("blinds must be >0".into()));
        }
        if self.small_blind > self.big_blind {
            return Err(ConfigError::Invalid(
                "small_blind must not exceed big_blind".into(),
            ));
        }
        if self.starting_stack <= self.big_blind {
            return Err(ConfigError::Invalid(
                "starting_stack must be larger than big_blind".into(),
            ));
        }
        Ok(())
    }

    /// Parses a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: TableConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigSources {
    pub starting_stack: ValueSource,
    pub small_blind: ValueSource,
    pub big_blind: ValueSource,
    pub seed: ValueSource,
    pub run_out_board_on_fold: ValueSource,
    pub hand_log: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            starting_stack: ValueSource::Default,
            small_blind: ValueSource::Default,
            big_blind: ValueSource::Default,
            seed: ValueSource::Default,
            run_out_board_on_fold: ValueSource::Default,
            hand_log: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: TableConfig,
    pub sources: ConfigSources,
}

pub fn load() -> Result<TableConfig, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

/// Resolves defaults, then the TOML file named by `SIXMAX_CONFIG`, then
/// `SIXMAX_*` environment variables, later layers winning.
pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = TableConfig::default();
    let mut sources = ConfigSources::default();

    if let Some(path) = env_value(CONFIG_ENV) {
        apply_file(Path::new(&path), &mut cfg, &mut sources)?;
    }

    if let Some(v) = parse_env::<u32>("SIXMAX_STARTING_STACK")? {
        cfg.starting_stack = v;
        sources.starting_stack = ValueSource::Env;
    }
    if let Some(v) = parse_env::<u32>("SIXMAX_SMALL_BLIND")? {
        cfg.small_blind = v;
        sources.small_blind = ValueSource::Env;
    }
    if let Some(v) = parse_env::<u32>("SIXMAX_BIG_BLIND")? {
        cfg.big_blind = v;
        sources.big_blind = ValueSource::Env;
    }
    if let Some(v) = parse_env::<u64>("SIXMAX_SEED")? {
        cfg.seed = Some(v);
        sources.seed = ValueSource::Env;
    }
    if let Some(v) = env_value("SIXMAX_RUN_OUT") {
        cfg.run_out_board_on_fold = parse_bool(&v)
            .ok_or_else(|| ConfigError::Invalid("Invalid SIXMAX_RUN_OUT".into()))?;
        sources.run_out_board_on_fold = ValueSource::Env;
    }
    if let Some(v) = env_value("SIXMAX_HAND_LOG") {
        cfg.hand_log = Some(PathBuf::from(v));
        sources.hand_log = ValueSource::Env;
    }

    cfg.validate()?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    starting_stack: Option<u32>,
    #[serde(default)]
    small_blind: Option<u32>,
    #[serde(default)]
    big_blind: Option<u32>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    run_out_board_on_fold: Option<bool>,
    #[serde(default)]
    hand_log: Option<PathBuf>,
}

fn apply_file(
    path: &Path,
    cfg: &mut TableConfig,
    sources: &mut ConfigSources,
) -> Result<(), ConfigError> {
    let s = fs::read_to_string(path)?;
    let f: FileConfig = toml::from_str(&s)?;
    if let Some(v) = f.starting_stack {
        cfg.starting_stack = v;
        sources.starting_stack = ValueSource::File;
    }
    if let Some(v) = f.small_blind {
        cfg.small_blind = v;
        sources.small_blind = ValueSource::File;
    }
    if let Some(v) = f.big_blind {
        cfg.big_blind = v;
        sources.big_blind = ValueSource::File;
    }
    if let Some(v) = f.seed {
        cfg.seed = Some(v);
        sources.seed = ValueSource::File;
    }
    if let Some(v) = f.run_out_board_on_fold {
        cfg.run_out_board_on_fold = v;
        sources.run_out_board_on_fold = ValueSource::File;
    }
    if let Some(v) = f.hand_log {
        cfg.hand_log = Some(v);
        sources.hand_log = ValueSource::File;
    }
    Ok(())
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn parse_env<T: FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    env_value(key)
        .map(|v| {
            v.parse()
                .map_err(|_| ConfigError::Invalid(format!("Invalid {}", key)))
        })
        .transpose()
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
