//! The `app_mention` flow: decode the delivery, look up the weather, post it back.

use chrono::Utc;
use std::{sync::Arc, time::Duration};
use thiserror::Error;

use crate::{
    Config,
    mention::{MentionError, extract_location},
    model::{Envelope, MentionEvent},
    provider::{WeatherError, WeatherProvider, provider_from_config},
    report,
    slack::{Messenger, SlackClient, SlackError},
};

/// What a delivery resulted in when nothing failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Slack's endpoint verification handshake; the value must be echoed back.
    Challenge(String),
    /// A message was posted to `channel`. `found` is false for the not-found reply.
    Posted { channel: String, found: bool },
}

/// Every way a delivery can fail, named after the stage that failed.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("error unmarshalling body: {0}")]
    Envelope(#[from] serde_json::Error),

    #[error("error unmarshalling body: missing field {0}")]
    MissingField(&'static str),

    #[error("error parsing mention: {0}")]
    Mention(#[from] MentionError),

    #[error("error calling openweather API: {0}")]
    Weather(#[from] WeatherError),

    #[error("error sending message to Slack: {0}")]
    Slack(#[from] SlackError),
}

impl HandlerError {
    /// True when the inbound payload itself is at fault, as opposed to an upstream service.
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            HandlerError::Envelope(_) | HandlerError::MissingField(_) | HandlerError::Mention(_)
        )
    }
}

#[derive(Debug, Clone)]
pub struct MentionHandler {
    weather: Arc<dyn WeatherProvider>,
    messenger: Arc<dyn Messenger>,
    mention_marker: String,
}

impl MentionHandler {
    pub fn new(
        weather: Arc<dyn WeatherProvider>,
        messenger: Arc<dyn Messenger>,
        mention_marker: String,
    ) -> Self {
        Self { weather, messenger, mention_marker }
    }

    /// Wire the OpenWeather provider and Slack client described by `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        config.validate()?;

        let weather = provider_from_config(config)?;
        let messenger = SlackClient::with_api_base(
            config.slack.bot_token.clone(),
            config.slack.api_base.clone(),
            Duration::from_secs(config.http.timeout_secs),
        )?;

        Ok(Self::new(
            Arc::from(weather),
            Arc::new(messenger),
            config.slack.mention_marker.clone(),
        ))
    }

    /// Process one raw Events API delivery.
    pub async fn handle(&self, body: &[u8]) -> Result<Outcome, HandlerError> {
        let envelope: Envelope = serde_json::from_slice(body)?;

        if let Some(challenge) = envelope.verification_challenge() {
            tracing::info!("answering url_verification handshake");
            return Ok(Outcome::Challenge(challenge.to_string()));
        }

        let MentionEvent { text, channel } =
            envelope.event.ok_or(HandlerError::MissingField("event"))?;
        let text = text.ok_or(HandlerError::MissingField("event.text"))?;
        let channel = channel.ok_or(HandlerError::MissingField("event.channel"))?;

        let location = extract_location(&text, &self.mention_marker)?;
        tracing::info!(%channel, location, "weather requested");

        let lookup = self.weather.current_weather(location).await?;
        let message = report::render(&lookup, Utc::now());

        self.messenger.post_message(&channel, &message).await?;
        tracing::info!(%channel, found = lookup.is_found(), "weather posted");

        Ok(Outcome::Posted { channel, found: lookup.is_found() })
    }
}
