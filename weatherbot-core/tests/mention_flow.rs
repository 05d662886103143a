//! Full delivery against mocked OpenWeather and Slack endpoints.

use std::collections::HashMap;

use serde_json::json;
use weatherbot_core::{Config, HandlerError, MentionHandler, Outcome};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

const MARKER: &str = "<@U0WEATHER>";

fn config(openweather: &MockServer, slack: &MockServer) -> Config {
    let mut cfg = Config::default();
    cfg.slack.bot_token = "xoxb-e2e".into();
    cfg.slack.mention_marker = MARKER.into();
    cfg.slack.api_base = slack.uri();
    cfg.openweather.api_key = "OWKEY".into();
    cfg.openweather.base_url = openweather.uri();
    cfg
}

fn envelope(text: &str) -> Vec<u8> {
    json!({
        "token": "verification",
        "type": "event_callback",
        "event": {"type": "app_mention", "user": "U1", "text": text, "channel": "C0LISBON"}
    })
    .to_string()
    .into_bytes()
}

#[tokio::test]
async fn mention_produces_one_query_and_one_post() {
    let openweather = MockServer::start().await;
    let slack = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Lisbon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "weather": [{"main": "Clear"}],
            "main": {"temp": 21.3, "temp_min": 19.0, "temp_max": 23.0, "feels_like": 20.5, "humidity": 55},
            "wind": {"speed": 3.2},
            "timezone": 7200,
            "name": "Lisbon"
        })))
        .expect(1)
        .mount(&openweather)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat.postMessage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&slack)
        .await;

    let handler = MentionHandler::from_config(&config(&openweather, &slack)).unwrap();
    let outcome = handler.handle(&envelope("<@U0WEATHER> Lisbon")).await.unwrap();

    assert_eq!(outcome, Outcome::Posted { channel: "C0LISBON".into(), found: true });

    let posts = slack.received_requests().await.unwrap();
    let form: HashMap<String, String> =
        url::form_urlencoded::parse(&posts[0].body).into_owned().collect();
    assert_eq!(form["channel"], "C0LISBON");
    assert_eq!(form["token"], "xoxb-e2e");

    let lines: Vec<&str> = form["text"].lines().collect();
    assert_eq!(
        lines[..5],
        [
            "*Weather in Lisbon* ",
            "Condition: _Clear  :sun_with_face: :full_moon_with_face:_",
            "Current: 21°C    Low: 19°C    High: 23°C",
            "Wind speed: 3.2m/s  Feels like: 21°C",
            "Humidity: 55 % ",
        ]
    );
    assert!(lines[5].starts_with("UTC: "));
    assert!(lines[6].starts_with("Local time: "));
    assert_eq!(lines.len(), 7);
}

#[tokio::test]
async fn unknown_city_posts_not_found_line() {
    let openweather = MockServer::start().await;
    let slack = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"cod": "404", "message": "city not found"})),
        )
        .expect(1)
        .mount(&openweather)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat.postMessage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&slack)
        .await;

    let handler = MentionHandler::from_config(&config(&openweather, &slack)).unwrap();
    let outcome = handler.handle(&envelope("<@U0WEATHER>  el dorado ")).await.unwrap();

    assert_eq!(outcome, Outcome::Posted { channel: "C0LISBON".into(), found: false });

    let posts = slack.received_requests().await.unwrap();
    let form: HashMap<String, String> =
        url::form_urlencoded::parse(&posts[0].body).into_owned().collect();
    assert_eq!(form["text"], "*City El Dorado is not found*");
}

#[tokio::test]
async fn provider_outage_never_reaches_slack() {
    let openweather = MockServer::start().await;
    let slack = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "cod": 500, "message": "internal", "parameters": []
        })))
        .expect(1)
        .mount(&openweather)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&slack)
        .await;

    let handler = MentionHandler::from_config(&config(&openweather, &slack)).unwrap();
    let err = handler.handle(&envelope("<@U0WEATHER> Lisbon")).await.unwrap_err();

    assert!(matches!(err, HandlerError::Weather(_)));
    assert!(err.to_string().starts_with("error calling openweather API: "));
}
