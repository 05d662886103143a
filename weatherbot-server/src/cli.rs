use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use inquire::{CustomUserError, Password, Text, validator::Validation};
use weatherbot_core::{Config, MentionHandler, provider::provider_from_config, report};

use crate::server;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherbot", version, about = "Slack weather bot")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct ConfigArg {
    /// Config file to use instead of the platform default.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl ConfigArg {
    fn path(&self) -> anyhow::Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => Config::config_file_path(),
        }
    }

    /// File values with `WEATHERBOT_*` environment overrides applied.
    fn load(&self) -> anyhow::Result<Config> {
        Config::load_from(&self.path()?)?.with_env_overrides()
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the webhook server for Slack event deliveries.
    Serve {
        #[command(flatten)]
        config: ConfigArg,

        /// Address to listen on, overrides `server.bind`.
        #[arg(long)]
        bind: Option<String>,
    },

    /// Interactively store the Slack token, mention marker and OpenWeather key.
    Configure {
        #[command(flatten)]
        config: ConfigArg,
    },

    /// Print the weather report for a city without posting it anywhere.
    Lookup {
        /// City name, optionally with state and country code.
        city: String,

        #[command(flatten)]
        config: ConfigArg,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Serve { config, bind } => {
                let mut cfg = config.load()?;
                if let Some(bind) = bind {
                    cfg.server.bind = bind;
                }

                let handler = MentionHandler::from_config(&cfg)?;
                server::serve(&cfg.server.bind, handler).await?;
            }
            Command::Configure { config } => {
                let path = config.path()?;
                let cfg = prompt_config(Config::load_from(&path)?)?;
                cfg.save_to(&path)?;
                println!("Configuration saved to {}", path.display());
            }
            Command::Lookup { city, config } => {
                let cfg = config.load()?;
                let provider = provider_from_config(&cfg)?;
                let lookup = provider
                    .current_weather(&city)
                    .await
                    .with_context(|| format!("Weather lookup for '{city}' failed"))?;
                println!("{}", report::render(&lookup, Utc::now()));
            }
        }

        Ok(())
    }
}

fn required(input: &str) -> Result<Validation, CustomUserError> {
    if input.trim().is_empty() {
        Ok(Validation::Invalid("Value must not be empty".into()))
    } else {
        Ok(Validation::Valid)
    }
}

fn prompt_config(mut cfg: Config) -> anyhow::Result<Config> {
    cfg.slack.bot_token = Password::new("Slack bot token (xoxb-...):")
        .without_confirmation()
        .with_validator(required)
        .prompt()?;

    let current_marker = cfg.slack.mention_marker.clone();
    cfg.slack.mention_marker = Text::new("Bot mention marker:")
        .with_help_message("How Slack renders a mention of the bot, e.g. <@U024BE7LH>")
        .with_initial_value(&current_marker)
        .with_validator(required)
        .prompt()?;

    cfg.openweather.api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_validator(required)
        .prompt()?;

    let current_timeout = cfg.http.timeout_secs.to_string();
    let timeout = Text::new("Outbound HTTP timeout (seconds):")
        .with_initial_value(&current_timeout)
        .prompt()?;
    cfg.http.timeout_secs = timeout
        .trim()
        .parse()
        .with_context(|| format!("Not a number of seconds: {timeout}"))?;

    cfg.validate()?;

    Ok(cfg)
}
