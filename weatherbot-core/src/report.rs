//! Slack-flavoured text rendering of a weather lookup.

use chrono::{DateTime, TimeDelta, Utc};

use crate::model::{Lookup, WeatherReport};

/// `Mon Jan  2 15:04:05 2006`, the C `asctime` layout.
const ANSIC: &str = "%a %b %e %H:%M:%S %Y";

/// Emoji shown next to a condition label. Unknown labels get nothing.
pub fn condition_icons(condition: &str) -> &'static str {
    match condition {
        "Clear" => ":sun_with_face: :full_moon_with_face:",
        "Drizzle" => ":partly_sunny: :closed_umbrella:",
        "Clouds" => ":partly_sunny: :cloud:",
        "Rain" => ":umbrella:",
        "Thunderstorm" => ":zap:",
        "Snow" => ":snowflake: :snowman:",
        "Mist" | "Haze" | "Smoke" | "Squall" | "Fog" | "Sand" | "Dust" | "Ash" | "Tornado" => {
            ":foggy:"
        }
        _ => "",
    }
}

/// Lowercases the input and capitalizes the first letter of every word.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut at_word_start = true;

    for c in input.chars().flat_map(char::to_lowercase) {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = is_word_separator(c);
    }

    out
}

fn is_word_separator(c: char) -> bool {
    if c.is_ascii() {
        !(c.is_ascii_alphanumeric() || c == '_')
    } else {
        c.is_whitespace()
    }
}

pub fn not_found_text(city: &str) -> String {
    format!("*City {} is not found*", title_case(city))
}

/// Renders the full report, stamping it with `now` in UTC and in the city's local time.
/// An offset that cannot be applied leaves the local time at UTC.
pub fn format_report(report: &WeatherReport, now: DateTime<Utc>) -> String {
    let local = TimeDelta::try_seconds(report.timezone_offset_secs)
        .and_then(|offset| now.checked_add_signed(offset))
        .unwrap_or(now);

    format!(
        "*Weather in {city}* \n\
         Condition: _{condition}  {icons}_\n\
         Current: {temp}°C    Low: {low}°C    High: {high}°C\n\
         Wind speed: {wind:.1}m/s  Feels like: {feels}°C\n\
         Humidity: {humidity} % \n\
         UTC: {utc}\n\
         Local time: {local}",
        city = report.city,
        condition = report.condition,
        icons = condition_icons(&report.condition),
        temp = whole(report.temperature_c),
        low = whole(report.temp_min_c),
        high = whole(report.temp_max_c),
        wind = report.wind_speed_mps,
        feels = whole(report.feels_like_c),
        humidity = whole(report.humidity_pct),
        utc = now.format(ANSIC),
        local = local.format(ANSIC),
    )
}

/// Text posted to the channel for either lookup outcome.
pub fn render(lookup: &Lookup, now: DateTime<Utc>) -> String {
    match lookup {
        Lookup::Found(report) => format_report(report, now),
        Lookup::NotFound { city } => not_found_text(city),
    }
}

// Rounds half away from zero; `{:.0}` alone would round half to even.
fn whole(value: f64) -> String {
    // `+ 0.0` turns -0.0 into 0.0 so "-0°C" never shows up.
    format!("{:.0}", value.round() + 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn lisbon() -> WeatherReport {
        WeatherReport {
            city: "Lisbon".to_string(),
            condition: "Clear".to_string(),
            temperature_c: 21.3,
            temp_min_c: 19.0,
            temp_max_c: 23.0,
            feels_like_c: 20.5,
            humidity_pct: 55.0,
            wind_speed_mps: 3.2,
            timezone_offset_secs: 7200,
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 5).unwrap()
    }

    #[test]
    fn report_contains_every_field() {
        let text = format_report(&lisbon(), fixed_now());

        assert!(text.contains("Weather in Lisbon"));
        assert!(text.contains("Condition: _Clear  :sun_with_face: :full_moon_with_face:_"));
        assert!(text.contains("Current: 21°C"));
        assert!(text.contains("Low: 19°C"));
        assert!(text.contains("High: 23°C"));
        assert!(text.contains("Wind speed: 3.2m/s"));
        assert!(text.contains("Feels like: 21°C"));
        assert!(text.contains("Humidity: 55 %"));
    }

    #[test]
    fn report_layout_is_stable() {
        let expected = "*Weather in Lisbon* \n\
                        Condition: _Clear  :sun_with_face: :full_moon_with_face:_\n\
                        Current: 21°C    Low: 19°C    High: 23°C\n\
                        Wind speed: 3.2m/s  Feels like: 21°C\n\
                        Humidity: 55 % \n\
                        UTC: Mon Jan  2 15:04:05 2006\n\
                        Local time: Mon Jan  2 17:04:05 2006";

        assert_eq!(format_report(&lisbon(), fixed_now()), expected);
    }

    #[test]
    fn negative_offset_crosses_midnight() {
        let mut report = lisbon();
        report.timezone_offset_secs = -18000;
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 2, 30, 0).unwrap();

        let text = format_report(&report, now);
        assert!(text.contains("UTC: Sun Mar 10 02:30:00 2024"));
        assert!(text.contains("Local time: Sat Mar  9 21:30:00 2024"));
    }

    #[test]
    fn unusable_offset_falls_back_to_utc() {
        let mut report = lisbon();
        report.timezone_offset_secs = 9_000_000_000_000_000_000;

        let text = format_report(&report, fixed_now());
        assert!(text.contains("UTC: Mon Jan  2 15:04:05 2006"));
        assert!(text.ends_with("Local time: Mon Jan  2 15:04:05 2006"));
    }

    #[test]
    fn unmapped_condition_has_no_icons() {
        let mut report = lisbon();
        report.condition = "Extratropical".to_string();

        let text = format_report(&report, fixed_now());
        assert!(text.contains("Condition: _Extratropical  _\n"));
        assert_eq!(condition_icons("Extratropical"), "");
    }

    #[test]
    fn fog_family_shares_icon() {
        for label in ["Mist", "Haze", "Smoke", "Squall", "Fog", "Sand", "Dust", "Ash", "Tornado"] {
            assert_eq!(condition_icons(label), ":foggy:", "{label}");
        }
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(whole(20.5), "21");
        assert_eq!(whole(22.5), "23");
        assert_eq!(whole(-2.5), "-3");
        assert_eq!(whole(-0.4), "0");
    }

    #[test]
    fn title_cases_words() {
        assert_eq!(title_case("new YORK"), "New York");
        assert_eq!(title_case("rio de janeiro"), "Rio De Janeiro");
        assert_eq!(title_case("sao-paulo"), "Sao-Paulo");
        assert_eq!(title_case("münchen"), "München");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn not_found_uses_title_case() {
        assert_eq!(not_found_text("atlantis city"), "*City Atlantis City is not found*");
        assert_eq!(
            render(&Lookup::NotFound { city: "gotham".into() }, fixed_now()),
            "*City Gotham is not found*"
        );
    }
}
