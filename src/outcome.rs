/// Per-operation interpretation of YOURLS replies
///
/// The API's envelope differs between actions and server versions, so each
/// operation lists the response shapes it accepts.
use crate::error::{KurlError, KurlResult};
use crate::response::{HttpReply, extract_short};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::sync::LazyLock;

static ALREADY_EXISTS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)already exists").unwrap());
/// Keyword clash wording; URL clashes start with the long URL instead
static KEYWORD_EXISTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*keyword\b.*already exists").unwrap());
static SHORT_IN_MESSAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\(short URL: (https?://\S+)\)").unwrap());
static DELETED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)success.*deleted").unwrap());

/// Body excerpt lengths for generic failures
const SHORTEN_DETAIL_CHARS: usize = 200;
const STATS_DETAIL_CHARS: usize = 100;

/// Placeholder shown when the server does not report a count
pub const UNKNOWN: &str = "?";

/// Classified reply of a single API call
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    /// Recoverable alternate success: the long URL was shortened before
    AlreadyExists(T),
    NotFound,
    Failure(KurlError),
}

impl<T> Outcome<T> {
    pub fn into_result(self) -> KurlResult<T> {
        match self {
            Outcome::Success(value) | Outcome::AlreadyExists(value) => Ok(value),
            Outcome::NotFound => Err(KurlError::NotFound),
            Outcome::Failure(err) => Err(err),
        }
    }
}

/// Result of a shorturl call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResult {
    pub success: bool,
    pub short_url: Option<String>,
    pub already_existed: bool,
}

/// Result of a connection check
#[derive(Debug, Clone, PartialEq)]
pub struct HealthReport {
    pub total_links: Option<String>,
}

impl HealthReport {
    pub fn total_or_placeholder(&self) -> &str {
        self.total_links.as_deref().unwrap_or(UNKNOWN)
    }
}

/// The three fields the popup shows from a url-stats payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkSummary {
    pub short_url: Option<String>,
    pub url: Option<String>,
    pub clicks: Option<String>,
}

impl LinkSummary {
    /// Read `link` (or `url` on some versions) from a url-stats payload
    pub fn from_stats(data: &Value) -> LinkSummary {
        let link = data
            .get("link")
            .filter(|v| v.is_object())
            .or_else(|| data.get("url").filter(|v| v.is_object()));

        match link {
            Some(link) => LinkSummary {
                short_url: scalar_to_string(link.get("shorturl")),
                url: scalar_to_string(link.get("url")),
                clicks: scalar_to_string(link.get("clicks")),
            },
            None => LinkSummary::default(),
        }
    }
}

/// Strings and numbers as text; anything else is absent
fn scalar_to_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// action=shorturl
///
/// An "already exists" message is not an error: the existing short URL is taken
/// from the "(short URL: ...)" text, then from the usual fields. A custom keyword
/// clash uses the same wording and is reported as `KeywordTaken`: `code` says so,
/// or the message starts with "keyword" and names no existing short URL.
pub fn classify_shorten(reply: &HttpReply, base: &str) -> Outcome<ShortenResult> {
    if let Some(json) = reply.json.as_ref() {
        let message = reply.message();
        if ALREADY_EXISTS.is_match(message) {
            let quoted = SHORT_IN_MESSAGE
                .captures(message)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string());

            let keyword_clash = reply.str_field("code") == Some("error:keyword")
                || (quoted.is_none() && KEYWORD_EXISTS.is_match(message));
            if keyword_clash {
                return Outcome::Failure(KurlError::KeywordTaken);
            }

            let short_url = quoted.or_else(|| extract_short(Some(json), base));

            return Outcome::AlreadyExists(ShortenResult {
                success: true,
                short_url,
                already_existed: true,
            });
        }

        if let Some(short_url) = extract_short(Some(json), base).filter(|_| reply.ok()) {
            return Outcome::Success(ShortenResult {
                success: true,
                short_url: Some(short_url),
                already_existed: false,
            });
        }

        if reply.str_field("status") == Some("fail") && !message.is_empty() {
            return Outcome::Failure(KurlError::Remote(message.to_string()));
        }
    }

    Outcome::Failure(KurlError::Remote(reply.describe(SHORTEN_DETAIL_CHARS)))
}

/// action=url-stats
pub fn classify_stats(reply: &HttpReply) -> Outcome<Value> {
    let body_status = reply.json.as_ref().and_then(|j| j.get("statusCode")).and_then(Value::as_u64);
    if reply.status == 404 || body_status == Some(404) {
        return Outcome::NotFound;
    }
    if !reply.ok() {
        return Outcome::Failure(KurlError::Remote(reply.describe(STATS_DETAIL_CHARS)));
    }

    match reply.json.clone() {
        Some(json) => Outcome::Success(json),
        None => Outcome::Failure(KurlError::Remote(format!(
            "Unexpected response: {}",
            reply.describe(STATS_DETAIL_CHARS)
        ))),
    }
}

/// action=delete
///
/// Servers and plugins disagree on how to say "deleted", so any of
/// `status == "success"`, a "success ... deleted" message or `statusCode == 200`
/// counts.
pub fn classify_delete(reply: &HttpReply) -> Outcome<()> {
    let deleted = reply.json.as_ref().is_some_and(|json| {
        json.get("status").and_then(Value::as_str) == Some("success")
            || DELETED.is_match(reply.message())
            || json.get("statusCode").and_then(Value::as_u64) == Some(200)
    });

    if reply.ok() && deleted {
        return Outcome::Success(());
    }

    let details = reply
        .str_field("message")
        .filter(|s| !s.is_empty())
        .or_else(|| reply.str_field("error").filter(|s| !s.is_empty()));

    let message = match details {
        Some(details) => format!("Delete failed: HTTP {} - {}", reply.status, details),
        None => format!("Delete failed: HTTP {}", reply.status),
    };
    Outcome::Failure(KurlError::Remote(message))
}

/// action=stats used as a connection test
///
/// The total may sit at the top level or under `stats`, as a number or a string.
pub fn classify_health(reply: &HttpReply) -> Outcome<HealthReport> {
    match reply.json.as_ref() {
        Some(json) if reply.ok() => {
            let total_links = scalar_to_string(json.get("total_links"))
                .or_else(|| scalar_to_string(json.get("stats").and_then(|s| s.get("total_links"))));
            Outcome::Success(HealthReport { total_links })
        }
        _ => Outcome::Failure(KurlError::Remote(
            "Connection failed. Check the URL and API signature.".to_string(),
        )),
    }
}

/// action=stats for the database summary
pub fn classify_db_stats(reply: &HttpReply) -> Outcome<Value> {
    match reply.json.clone() {
        Some(json) if reply.ok() => Outcome::Success(json),
        _ => Outcome::Failure(KurlError::Remote("Could not fetch statistics.".to_string())),
    }
}
