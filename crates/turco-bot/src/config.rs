//! Configuration management for turco-bot

#[path = "config_tests.rs"]
mod config_tests;

use anyhow::{bail, Context, Result};
use llm_gemini::GeminiConfig;
use serde::{Deserialize, Serialize};
use std::fs;

use crate::avatar::DEFAULT_AVATAR_SOURCE_USER_ID;
use crate::history::DEFAULT_MAX_HISTORY;
use crate::persona::DEFAULT_PRESENCE;

/// Environment lookup, injectable for tests.
pub trait ReadEnv {
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads the real process environment.
pub struct SystemEnv;

impl ReadEnv for SystemEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Complete bot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub discord: DiscordBotConfig,
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

/// Discord bot specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordBotConfig {
    /// Bot token from the Discord developer portal
    #[serde(default)]
    pub bot_token: String,
    /// Prefix for text commands such as `!limpar`
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
    /// User whose avatar is mirrored every 12 hours; `0` disables the sync
    #[serde(default = "default_avatar_source_user_id")]
    pub avatar_source_user_id: u64,
    /// "Listening to ..." presence text
    #[serde(default = "default_presence")]
    pub presence: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// User/model pairs kept per session
    #[serde(default = "default_max_history")]
    pub max_history: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_history: default_max_history(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env<E: ReadEnv>(env: &E) -> Result<Self> {
        let bot_token = env.var("DISCORD_TOKEN").context("DISCORD_TOKEN not set")?;
        let api_key = env.var("GEMINI_API_KEY").context("GEMINI_API_KEY not set")?;

        let defaults = GeminiConfig::default();
        let gemini = GeminiConfig {
            api_key,
            model: env.var("GEMINI_MODEL").unwrap_or(defaults.model),
            base_url: defaults.base_url,
            timeout_secs: parse_or(env, "GEMINI_TIMEOUT_SECS", defaults.timeout_secs),
            retry_attempts: parse_or(env, "GEMINI_RETRY_ATTEMPTS", defaults.retry_attempts),
        };

        Ok(Config {
            discord: DiscordBotConfig {
                bot_token,
                command_prefix: env
                    .var("COMMAND_PREFIX")
                    .filter(|p| !p.is_empty())
                    .unwrap_or_else(default_command_prefix),
                avatar_source_user_id: parse_or(
                    env,
                    "AVATAR_SOURCE_USER_ID",
                    DEFAULT_AVATAR_SOURCE_USER_ID,
                ),
                presence: env.var("BOT_PRESENCE").unwrap_or_else(default_presence),
            },
            gemini,
            history: HistoryConfig {
                max_history: parse_or(env, "MAX_HISTORY", DEFAULT_MAX_HISTORY),
            },
        })
    }

    /// Fail fast on settings the bot cannot start without.
    pub fn validate(&self) -> Result<()> {
        if self.discord.bot_token.trim().is_empty() {
            bail!("DISCORD_TOKEN not set (use the environment, a .env file or the config file)");
        }
        if self.gemini.api_key.trim().is_empty() {
            bail!("GEMINI_API_KEY not set (use the environment, a .env file or the config file)");
        }
        if self.discord.command_prefix.is_empty() {
            bail!("command_prefix must not be empty");
        }
        if self.history.max_history == 0 {
            bail!("max_history must be at least 1");
        }
        Ok(())
    }
}

fn parse_or<E: ReadEnv, T: std::str::FromStr>(env: &E, key: &str, default: T) -> T {
    env.var(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn default_command_prefix() -> String {
    "!".to_string()
}

fn default_avatar_source_user_id() -> u64 {
    DEFAULT_AVATAR_SOURCE_USER_ID
}

fn default_presence() -> String {
    DEFAULT_PRESENCE.to_string()
}

fn default_max_history() -> usize {
    DEFAULT_MAX_HISTORY
}
