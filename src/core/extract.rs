// src/core/extract.rs

// Follower-count probes over raw response text. Every pattern here is a
// best-effort probe; callers log which one hit.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::FetchError;

const FOLLOWER_PATTERN: &str = r#""follower":\s*(\d+)"#;

/// Ordered patterns for the profile-page fallback. First match wins.
pub const PAGE_PATTERNS: [&str; 4] = [
    FOLLOWER_PATTERN,
    r"粉丝.*?(\d+)",
    r"关注者.*?(\d+)",
    r"<span[^>]*>(\d+)</span>\s*粉丝",
];

static FOLLOWER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(FOLLOWER_PATTERN).expect("follower pattern compiles"));

static PAGE_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    PAGE_PATTERNS
        .iter()
        .map(|p| Regex::new(p).expect("page pattern compiles"))
        .collect()
});

/// Where in a JSON response the count was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JsonHit {
    /// `data.follower`
    Field,
    /// `"follower": N` somewhere inside the serialized `data`
    Serialized,
}

/// Pull a follower count out of an API response body.
pub fn count_from_json(body: &str) -> Result<(u64, JsonHit), FetchError> {
    let v: Value = serde_json::from_str(body).map_err(|_| FetchError::NotJson)?;
    let Some(data) = v.get("data") else {
        return Err(FetchError::NoCount);
    };

    if let Some(field) = data.get("follower") {
        return as_count(field).map(|n| (n, JsonHit::Field)).ok_or(FetchError::NoCount);
    }

    let flat = data.to_string();
    if flat.contains("follower") {
        if let Some(n) = first_capture(&FOLLOWER_RE, &flat) {
            return Ok((n, JsonHit::Serialized));
        }
    }
    Err(FetchError::NoCount)
}

/// Scan raw page text with `PAGE_PATTERNS`. Returns (pattern index, count).
pub fn count_from_page(text: &str) -> Option<(usize, u64)> {
    PAGE_RES
        .iter()
        .enumerate()
        .find_map(|(i, re)| first_capture(re, text).map(|n| (i, n)))
}

fn first_capture(re: &Regex, text: &str) -> Option<u64> {
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

fn as_count(v: &Value) -> Option<u64> {
    match v {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_field() {
        let body = r#"{"code":0,"data":{"mid":1,"following":5,"follower":12345}}"#;
        assert_eq!(count_from_json(body).unwrap(), (12345, JsonHit::Field));
    }

    #[test]
    fn numeric_string_field() {
        let body = r#"{"data":{"follower":"77"}}"#;
        assert_eq!(count_from_json(body).unwrap(), (77, JsonHit::Field));
    }

    #[test]
    fn nested_follower_via_serialized_form() {
        let body = r#"{"data":{"card":{"follower": 900}}}"#;
        assert_eq!(count_from_json(body).unwrap(), (900, JsonHit::Serialized));
    }

    #[test]
    fn html_is_not_json() {
        assert!(matches!(count_from_json("<html></html>"), Err(FetchError::NotJson)));
    }

    #[test]
    fn error_payload_has_no_count() {
        let body = r#"{"code":-412,"message":"request was banned","data":null}"#;
        assert!(matches!(count_from_json(body), Err(FetchError::NoCount)));
        assert!(matches!(count_from_json(r#"{"code":0}"#), Err(FetchError::NoCount)));
    }

    #[test]
    fn page_patterns_in_order() {
        assert_eq!(count_from_page(r#"window.__x={"follower": 42}"#), Some((0, 42)));
        assert_eq!(count_from_page("<div>粉丝 1024</div>"), Some((1, 1024)));
        assert_eq!(count_from_page("关注者：88"), Some((2, 88)));
        assert_eq!(count_from_page(r#"<span class="n">31</span> 粉丝"#), Some((3, 31)));
        assert_eq!(count_from_page("nothing here"), None);
    }

    #[test]
    fn overflowing_capture_falls_through() {
        let text = r#""follower": 99999999999999999999999 粉丝 5"#;
        assert_eq!(count_from_page(text), Some((1, 5)));
    }
}
