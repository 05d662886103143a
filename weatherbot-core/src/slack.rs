//! Posting messages through the Slack Web API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::{fmt::Debug, time::Duration};
use thiserror::Error;

use crate::truncate_body;

pub const DEFAULT_API_BASE: &str = "https://slack.com/api";

#[derive(Debug, Error)]
pub enum SlackError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Slack responded with status {status}: {body}")]
    Status { status: u16, body: String },

    /// `chat.postMessage` answered `"ok": false`, e.g. `channel_not_found`.
    #[error("Slack API error: {0}")]
    Api(String),
}

#[async_trait]
pub trait Messenger: Send + Sync + Debug {
    async fn post_message(&self, channel: &str, text: &str) -> Result<(), SlackError>;
}

#[derive(Debug, Clone)]
pub struct SlackClient {
    token: String,
    api_base: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

impl SlackClient {
    pub fn with_api_base(
        token: String,
        api_base: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            token,
            api_base: api_base.trim_end_matches('/').to_string(),
            http,
        })
    }
}

#[async_trait]
impl Messenger for SlackClient {
    async fn post_message(&self, channel: &str, text: &str) -> Result<(), SlackError> {
        let url = format!("{}/chat.postMessage", self.api_base);

        let res = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .form(&[
                ("token", self.token.as_str()),
                ("channel", channel),
                ("text", text),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(SlackError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        // Slack signals failures inside a 200 body. A body we cannot read is
        // left alone: the message may well have been posted.
        match serde_json::from_str::<PostMessageResponse>(&body) {
            Ok(reply) if !reply.ok => Err(SlackError::Api(
                reply.error.unwrap_or_else(|| "unknown_error".to_string()),
            )),
            Ok(_) => Ok(()),
            Err(e) => {
                tracing::warn!(error = %e, "could not decode chat.postMessage reply");
                Ok(())
            }
        }
    }
}
