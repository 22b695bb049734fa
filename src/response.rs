/// Raw HTTP replies from the YOURLS API and tolerant body parsing
use serde_json::Value;

/// Status, body text and the body parsed as JSON when possible
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub text: String,
    pub json: Option<Value>,
}

impl HttpReply {
    pub fn new(status: u16, text: impl Into<String>) -> HttpReply {
        let text = text.into();
        let json = parse_maybe_json(&text);
        HttpReply { status, text, json }
    }

    /// Same range as fetch's Response.ok
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// String field from the top level of the JSON body
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.json.as_ref()?.get(key)?.as_str()
    }

    /// `message` field, or "" when absent
    pub fn message(&self) -> &str {
        self.str_field("message").unwrap_or("")
    }

    /// "HTTP 500: <body prefix>" used by generic failures
    pub fn describe(&self, max_chars: usize) -> String {
        let snippet = truncate_chars(self.text.trim(), max_chars);
        if snippet.is_empty() {
            format!("HTTP {}", self.status)
        } else {
            format!("HTTP {}: {}", self.status, snippet)
        }
    }
}

/// Parse a body that is usually JSON but may carry stray text
///
/// PHP notices printed before the payload are common on misconfigured servers, so
/// after a direct parse fails the outermost `{...}` slice is tried.
pub fn parse_maybe_json(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Some(value);
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<Value>(&trimmed[start..=end]).ok()
}

/// Find the short URL in a shorturl response
///
/// Order: `shorturl`, `short_url`, `url.shorturl`, then `<base>/<keyword>` built
/// from `url.keyword` or `keyword`.
pub fn extract_short(json: Option<&Value>, base: &str) -> Option<String> {
    let json = json?;

    let direct = ["shorturl", "short_url"]
        .iter()
        .find_map(|key| non_empty_str(json.get(key)))
        .or_else(|| non_empty_str(json.get("url").and_then(|u| u.get("shorturl"))));
    if let Some(short) = direct {
        return Some(short.to_string());
    }

    if base.is_empty() {
        return None;
    }

    non_empty_str(json.get("url").and_then(|u| u.get("keyword")))
        .or_else(|| non_empty_str(json.get("keyword")))
        .map(|keyword| format!("{}/{}", base, keyword))
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// First `max_chars` characters, never splitting a code point
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
