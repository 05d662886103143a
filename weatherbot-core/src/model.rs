use serde::Deserialize;

/// Top-level payload delivered by the Slack Events API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    /// `url_verification` on the first handshake, `event_callback` afterwards.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub challenge: Option<String>,

    #[serde(default)]
    pub event: Option<MentionEvent>,
}

impl Envelope {
    pub const URL_VERIFICATION: &'static str = "url_verification";

    /// Returns the challenge token when this envelope is a verification handshake.
    pub fn verification_challenge(&self) -> Option<&str> {
        match (self.kind.as_deref(), self.challenge.as_deref()) {
            (Some(Self::URL_VERIFICATION), Some(challenge)) => Some(challenge),
            _ => None,
        }
    }
}

/// The nested `event` object. Both fields are optional at decode time so a
/// missing one can be reported by name instead of as a generic serde error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MentionEvent {
    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub channel: Option<String>,
}

/// Current conditions for one city, in metric units.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub city: String,
    pub condition: String,
    pub temperature_c: f64,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: f64,
    pub wind_speed_mps: f64,
    /// Offset of the city's local time from UTC.
    pub timezone_offset_secs: i64,
}

/// Outcome of a weather query that reached the provider.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Found(WeatherReport),
    /// The provider did not recognise the location; `city` is the query as sent.
    NotFound { city: String },
}

impl Lookup {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }
}
