//! Core library for the Slack weather bot.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Parsing `app_mention` deliveries and locating the requested city
//! - The weather provider abstraction (OpenWeather) and report formatting
//! - The messenger abstraction (Slack `chat.postMessage`)
//!
//! [`MentionHandler`] ties these together; `weatherbot-server` exposes it over HTTP.

pub mod config;
pub mod handler;
pub mod mention;
pub mod model;
pub mod provider;
pub mod report;
pub mod slack;

pub use config::Config;
pub use handler::{HandlerError, MentionHandler, Outcome};
pub use model::{Envelope, Lookup, WeatherReport};
pub use provider::{WeatherError, WeatherProvider};
pub use slack::{Messenger, SlackClient, SlackError};

/// Cuts an upstream response body down to something fit for an error message.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
