//! Coercion utilities used by mapping rule transforms.
//!
//! All functions are pure. Several of them never fail and fall back to a
//! neutral value instead (`0`, `false`, the current time); callers relying on
//! that behaviour are covered by the tests below.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::models::{INSTAGRAM, TIKTOK, YOUTUBE};

/// Unix timestamps below this are seconds, at or above it milliseconds.
const SECONDS_THRESHOLD: f64 = 10_000_000_000.0;

static DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?$").expect("valid duration regex")
});

static HASHTAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#([\p{L}\p{N}_]+)").expect("valid hashtag regex"));

// =============================================================================
// Numbers & booleans
// =============================================================================

/// Coerce a count-like value to a non-negative integer.
///
/// Strings have every non-digit character stripped before parsing, so
/// `"1,234 views"` is `1234` and `"-5"` is `5`. Negative numbers and anything
/// unparsable become `0`; fractional numbers are truncated.
pub fn to_number(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f > 0.0)
                    .map(|f| f as u64)
            })
            .unwrap_or(0),
        Value::String(s) => {
            let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
            if digits.is_empty() {
                0
            } else {
                // only overflow can fail here
                digits.parse::<u64>().unwrap_or(u64::MAX)
            }
        }
        _ => 0,
    }
}

/// Truthiness coercion: `null`, `false`, `0` and `""` are false, anything
/// else (including empty arrays and objects) is true.
pub fn to_boolean(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// =============================================================================
// Time
// =============================================================================

/// Normalize a timestamp to ISO-8601 UTC with milliseconds.
///
/// Numbers and all-digit strings are unix timestamps (seconds below
/// 10,000,000,000, milliseconds otherwise). Other strings are parsed as
/// RFC 3339, RFC 2822 or a plain date/datetime. Unparsable input yields the
/// current time rather than an error.
pub fn parse_timestamp(value: &Value) -> String {
    format_timestamp(&timestamp_from_value(value).unwrap_or_else(Utc::now))
}

/// Current time in the same format as [`parse_timestamp`].
pub fn now_iso() -> String {
    format_timestamp(&Utc::now())
}

fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn timestamp_from_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n.as_f64().and_then(from_unix),
        Value::String(s) => {
            let s = s.trim();
            if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
                s.parse::<f64>().ok().and_then(from_unix)
            } else {
                parse_date_string(s)
            }
        }
        _ => None,
    }
}

fn from_unix(n: f64) -> Option<DateTime<Utc>> {
    if !n.is_finite() {
        return None;
    }
    let millis = if n < SECONDS_THRESHOLD { n * 1000.0 } else { n };
    DateTime::from_timestamp_millis(millis as i64)
}

fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parse an ISO-8601 duration of the form `PT#H#M#S` into seconds.
///
/// Each component is optional. Anything else, including a total that does
/// not fit in `u64`, is `0`.
pub fn parse_duration(input: &str) -> u64 {
    let Some(caps) = DURATION_RE.captures(input.trim()) else {
        return 0;
    };
    let part = |i: usize, unit: u64| match caps.get(i) {
        Some(m) => m.as_str().parse::<u64>().ok()?.checked_mul(unit),
        None => Some(0),
    };
    part(1, 3600)
        .zip(part(2, 60))
        .zip(part(3, 1))
        .and_then(|((h, m), s)| h.checked_add(m)?.checked_add(s))
        .unwrap_or(0)
}

// =============================================================================
// URLs
// =============================================================================

/// Replace every `{}` in `template` with `value`.
pub fn fill_template(template: &str, value: &str) -> String {
    template.replace("{}", value)
}

pub fn tiktok_profile_url(username: &str) -> String {
    format!("https://www.tiktok.com/@{}", username.trim_start_matches('@'))
}

pub fn tiktok_video_url(username: &str, video_id: &str) -> String {
    format!(
        "https://www.tiktok.com/@{}/video/{}",
        username.trim_start_matches('@'),
        video_id
    )
}

pub fn instagram_profile_url(username: &str) -> String {
    format!("https://www.instagram.com/{}/", username.trim_start_matches('@'))
}

pub fn instagram_post_url(shortcode: &str) -> String {
    format!("https://www.instagram.com/p/{}/", shortcode)
}

/// Channel URL from either a handle (`@name`) or a channel id.
pub fn youtube_channel_url(channel: &str) -> String {
    if channel.starts_with('@') {
        format!("https://www.youtube.com/{}", channel)
    } else {
        format!("https://www.youtube.com/channel/{}", channel)
    }
}

pub fn youtube_video_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// Canonical profile URL for a built-in platform.
pub fn profile_url_for(platform: &str, username: &str) -> Option<String> {
    match platform.to_lowercase().as_str() {
        TIKTOK => Some(tiktok_profile_url(username)),
        INSTAGRAM => Some(instagram_profile_url(username)),
        YOUTUBE => Some(youtube_channel_url(username)),
        _ => None,
    }
}

// =============================================================================
// Tags
// =============================================================================

/// Hashtags in free text, without the `#`, first occurrence order, no duplicates.
pub fn extract_hashtags(text: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for caps in HASHTAG_RE.captures_iter(text) {
        let tag = caps[1].to_string();
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

/// Non-empty strings of an array; other elements are dropped.
pub fn string_tags(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|v| v.as_str())
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Non-empty string values of `key` in an array of objects.
pub fn pluck_tags(items: &[Value], key: &str) -> Vec<String> {
    items
        .iter()
        .filter_map(|v| v.get(key))
        .filter_map(|v| v.as_str())
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_number() {
        assert_eq!(to_number(&json!("1,234 views")), 1234);
        assert_eq!(to_number(&json!(-5)), 0);
        assert_eq!(to_number(&json!("abc")), 0);
        assert_eq!(to_number(&json!(42)), 42);
        assert_eq!(to_number(&json!(12.9)), 12);
        assert_eq!(to_number(&json!(null)), 0);
    }

    #[test]
    fn test_to_number_strips_sign_from_strings() {
        // digits are kept, the minus sign is not
        assert_eq!(to_number(&json!("-5")), 5);
    }

    #[test]
    fn test_to_boolean_truthiness() {
        assert!(to_boolean(&json!(true)));
        assert!(to_boolean(&json!(1)));
        assert!(to_boolean(&json!("false")));
        assert!(to_boolean(&json!([])));
        assert!(!to_boolean(&json!(0)));
        assert!(!to_boolean(&json!("")));
        assert!(!to_boolean(&json!(null)));
    }

    #[test]
    fn test_parse_timestamp_seconds_and_millis() {
        assert_eq!(parse_timestamp(&json!(1700000000)), "2023-11-14T22:13:20.000Z");
        assert_eq!(parse_timestamp(&json!(1700000000123_u64)), "2023-11-14T22:13:20.123Z");
        assert_eq!(parse_timestamp(&json!("1700000000")), "2023-11-14T22:13:20.000Z");
    }

    #[test]
    fn test_parse_timestamp_strings() {
        assert_eq!(
            parse_timestamp(&json!("2024-03-01T12:30:00Z")),
            "2024-03-01T12:30:00.000Z"
        );
        assert_eq!(
            parse_timestamp(&json!("2024-03-01T14:30:00+02:00")),
            "2024-03-01T12:30:00.000Z"
        );
        assert_eq!(parse_timestamp(&json!("2024-03-01")), "2024-03-01T00:00:00.000Z");
    }

    #[test]
    fn test_parse_timestamp_falls_back_to_now() {
        let before = Utc::now();
        let parsed = parse_timestamp(&json!("not-a-date"));
        let dt = DateTime::parse_from_rfc3339(&parsed).unwrap().with_timezone(&Utc);
        assert!(dt >= before - chrono::Duration::seconds(1));
        assert!(dt <= Utc::now() + chrono::Duration::seconds(1));

        assert!(DateTime::parse_from_rfc3339(&parse_timestamp(&json!({"a": 1}))).is_ok());
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("PT4M13S"), 253);
        assert_eq!(parse_duration("PT1H"), 3600);
        assert_eq!(parse_duration("PT1H2M3S"), 3723);
        assert_eq!(parse_duration("PT45S"), 45);
        assert_eq!(parse_duration("garbage"), 0);
        assert_eq!(parse_duration("P1D"), 0);
    }

    #[test]
    fn test_parse_duration_overflow_is_malformed() {
        assert_eq!(parse_duration("PT9999999999999999H"), 0);
        assert_eq!(parse_duration("PT99999999999999999999S"), 0);
        assert_eq!(parse_duration(&format!("PT{}M{}S", u64::MAX / 60, 59)), 0);
    }

    #[test]
    fn test_urls() {
        assert_eq!(tiktok_profile_url("@alice"), "https://www.tiktok.com/@alice");
        assert_eq!(
            tiktok_video_url("alice", "123"),
            "https://www.tiktok.com/@alice/video/123"
        );
        assert_eq!(instagram_post_url("Cx1"), "https://www.instagram.com/p/Cx1/");
        assert_eq!(youtube_channel_url("@bob"), "https://www.youtube.com/@bob");
        assert_eq!(youtube_channel_url("UC1"), "https://www.youtube.com/channel/UC1");
        assert_eq!(youtube_video_url("dQw"), "https://www.youtube.com/watch?v=dQw");
        assert_eq!(fill_template("https://x/{}/", "id"), "https://x/id/");
    }

    #[test]
    fn test_profile_url_for() {
        assert_eq!(
            profile_url_for("Instagram", "insta").as_deref(),
            Some("https://www.instagram.com/insta/")
        );
        assert_eq!(
            profile_url_for("tiktok", "alice").as_deref(),
            Some("https://www.tiktok.com/@alice")
        );
        assert!(profile_url_for("myspace", "tom").is_none());
    }

    #[test]
    fn test_tags() {
        assert_eq!(
            extract_hashtags("new #dance video #fyp #dance"),
            vec!["dance".to_string(), "fyp".to_string()]
        );
        assert!(extract_hashtags("no tags here").is_empty());
        assert_eq!(string_tags(&[json!("a"), json!(""), json!(3), json!(" b ")]), vec!["a", "b"]);
        assert_eq!(
            pluck_tags(&[json!({"title": "fyp"}), json!({"id": 1}), json!({"title": ""})], "title"),
            vec!["fyp"]
        );
    }
}
