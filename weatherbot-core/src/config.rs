use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{provider::openweather, slack};

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [slack]
/// bot_token = "xoxb-..."
/// mention_marker = "<@U024BE7LH>"
///
/// [openweather]
/// api_key = "..."
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub slack: SlackConfig,
    pub openweather: OpenWeatherConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the webhook server listens on.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: "0.0.0.0:3000".to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackConfig {
    pub bot_token: String,
    /// How Slack renders a mention of the bot, e.g. `<@U024BE7LH>`.
    pub mention_marker: String,
    pub api_base: String,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            mention_marker: String::new(),
            api_base: slack::DEFAULT_API_BASE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenWeatherConfig {
    pub api_key: String,
    pub base_url: String,
}

impl Default for OpenWeatherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: openweather::DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Applied to every outbound request.
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 5 }
    }
}

impl Config {
    /// Load config from the platform config directory, or defaults if the file doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load config from an explicit path; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherbot", "weatherbot")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Apply `WEATHERBOT_*` environment variables on top of the file values.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::with_env_overrides`] with an injectable lookup.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |target: &mut String, key: &str| {
            if let Some(value) = lookup(key) {
                *target = value;
            }
        };

        set(&mut self.server.bind, "WEATHERBOT_BIND");
        set(&mut self.slack.bot_token, "WEATHERBOT_SLACK_TOKEN");
        set(&mut self.slack.mention_marker, "WEATHERBOT_MENTION_MARKER");
        set(&mut self.slack.api_base, "WEATHERBOT_SLACK_API_BASE");
        set(&mut self.openweather.api_key, "WEATHERBOT_OPENWEATHER_KEY");
        set(&mut self.openweather.base_url, "WEATHERBOT_OPENWEATHER_URL");

        if let Some(raw) = lookup("WEATHERBOT_HTTP_TIMEOUT_SECS") {
            self.http.timeout_secs = raw
                .trim()
                .parse()
                .with_context(|| format!("WEATHERBOT_HTTP_TIMEOUT_SECS is not a number: {raw}"))?;
        }

        Ok(self)
    }

    /// Check that everything the webhook server needs is present.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("slack.bot_token", self.slack.bot_token.as_str()),
            ("slack.mention_marker", self.slack.mention_marker.as_str()),
            ("openweather.api_key", self.openweather.api_key.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(anyhow!(
                "Missing configuration: {}.\n\
                 Hint: run `weatherbot configure` or set the WEATHERBOT_* environment variables.",
                missing.join(", ")
            ));
        }

        if self.http.timeout_secs == 0 {
            return Err(anyhow!("http.timeout_secs must be greater than zero"));
        }

        Ok(())
    }
}
