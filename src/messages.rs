/// Messages exchanged between the popup/options pages and the background script
use crate::api::{ApiClient, Transport};
use crate::error::KurlError;
use crate::i18n;
use crate::settings::SettingsProvider;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;

static KEYWORD_EXISTS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)keyword.*already exists").unwrap());

/// Request sent with runtime.sendMessage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Request {
    CheckConnection,
    #[serde(rename_all = "camelCase")]
    ShortenUrl {
        long_url: String,
        #[serde(default)]
        keyword: String,
        #[serde(default)]
        title: String,
    },
    #[serde(rename_all = "camelCase")]
    GetStats { short_url: String },
    #[serde(rename = "DELETE_SHORTURL", rename_all = "camelCase")]
    DeleteShortUrl { short_url: String },
    GetDbStats,
}

/// Reply passed back through sendResponse
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Response {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub already: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<String>,
}

impl Response {
    pub fn success() -> Response {
        Response {
            ok: true,
            ..Response::default()
        }
    }

    pub fn failure(reason: impl Into<String>) -> Response {
        Response {
            ok: false,
            reason: Some(reason.into()),
            ..Response::default()
        }
    }

    pub fn with_data(data: Value) -> Response {
        Response {
            ok: true,
            data: Some(data),
            ..Response::default()
        }
    }

    /// Failure reason, or the given fallback when none was sent
    pub fn reason_or(&self, fallback: &str) -> String {
        self.reason.clone().unwrap_or_else(|| fallback.to_string())
    }
}

impl From<KurlError> for Response {
    fn from(err: KurlError) -> Self {
        Response::failure(reason_for(&err))
    }
}

/// Human-readable reason shown inline by the calling page
pub fn reason_for(err: &KurlError) -> String {
    let message = err.to_string();
    if KEYWORD_EXISTS.is_match(&message) {
        KurlError::KeywordTaken.to_string()
    } else {
        message
    }
}

/// Run one request against the API; never fails, errors become `reason`
pub async fn dispatch<S, T>(client: &ApiClient<S, T>, request: &Request) -> Response
where
    S: SettingsProvider,
    T: Transport,
{
    log::debug!("dispatching {:?}", request);
    let result = match request {
        Request::CheckConnection => client.check().await.map(|report| Response {
            ok: true,
            total: Some(report.total_or_placeholder().to_string()),
            ..Response::default()
        }),
        Request::ShortenUrl { long_url, keyword, title } => client
            .shorten(long_url.trim(), keyword.trim(), title.trim())
            .await
            .map(|result| Response {
                ok: result.success,
                short_url: result.short_url,
                already: Some(result.already_existed),
                ..Response::default()
            }),
        Request::GetStats { short_url } => client.url_stats(short_url).await.map(Response::with_data),
        Request::DeleteShortUrl { short_url } => client.delete(short_url).await.map(|_| Response::success()),
        Request::GetDbStats => client.db_stats().await.map(Response::with_data),
    };

    result.unwrap_or_else(|err| {
        log::warn!("request failed: {}", err);
        Response::from(err)
    })
}

/// Decode a raw message, dispatch it and report which notification to show
pub async fn handle_message<S, T>(client: &ApiClient<S, T>, message: Value, on_notice: impl FnOnce(&'static str)) -> Response
where
    S: SettingsProvider,
    T: Transport,
{
    let request = match serde_json::from_value::<Request>(message) {
        Ok(request) => request,
        Err(e) => {
            log::warn!("unrecognized message: {}", e);
            return Response::failure("Unknown message type");
        }
    };

    let response = dispatch(client, &request).await;
    if let Some(key) = notification_for(&request, &response) {
        on_notice(key);
    }
    response
}

/// Desktop notification to show after a request, as an i18n key
pub fn notification_for(request: &Request, response: &Response) -> Option<&'static str> {
    if !response.ok {
        return None;
    }
    match request {
        Request::ShortenUrl { .. } if response.already == Some(true) => Some(i18n::TOAST_URL_EXISTS),
        Request::ShortenUrl { .. } => Some(i18n::TOAST_URL_CREATED),
        Request::DeleteShortUrl { .. } => Some(i18n::TOAST_URL_DELETED),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::{FakeTransport, settings};
    use crate::settings::Settings;
    use serde_json::json;

    #[test]
    fn test_request_wire_names() {
        let request: Request = serde_json::from_value(json!({
            "type": "SHORTEN_URL",
            "longUrl": "https://example.com",
            "keyword": "k"
        }))
        .unwrap();
        assert_eq!(
            request,
            Request::ShortenUrl {
                long_url: "https://example.com".to_string(),
                keyword: "k".to_string(),
                title: String::new(),
            }
        );

        let request: Request = serde_json::from_value(json!({"type": "DELETE_SHORTURL", "shortUrl": "abc"})).unwrap();
        assert_eq!(request, Request::DeleteShortUrl { short_url: "abc".to_string() });

        for name in ["CHECK_CONNECTION", "GET_DB_STATS"] {
            assert!(serde_json::from_value::<Request>(json!({"type": name})).is_ok(), "{}", name);
        }

        let value = serde_json::to_value(Request::GetStats { short_url: "abc".to_string() }).unwrap();
        assert_eq!(value, json!({"type": "GET_STATS", "shortUrl": "abc"}));
    }

    #[test]
    fn test_response_serialization_skips_empty_fields() {
        let value = serde_json::to_value(Response::failure("nope")).unwrap();
        assert_eq!(value, json!({"ok": false, "reason": "nope"}));
    }

    #[test]
    fn test_dispatch_shorten() {
        let client = ApiClient::new(settings(), FakeTransport::replying(200, json!({"shorturl": "https://sho.rt/x"})));
        let request = Request::ShortenUrl {
            long_url: " https://example.com ".to_string(),
            keyword: String::new(),
            title: String::new(),
        };

        let response = pollster::block_on(dispatch(&client, &request));
        assert!(response.ok);
        assert_eq!(response.short_url.as_deref(), Some("https://sho.rt/x"));
        assert_eq!(response.already, Some(false));
        assert_eq!(notification_for(&request, &response), Some(i18n::TOAST_URL_CREATED));
    }

    #[test]
    fn test_dispatch_stats_not_found() {
        let client = ApiClient::new(settings(), FakeTransport::replying(404, json!({})));
        let response = pollster::block_on(dispatch(&client, &Request::GetStats { short_url: "abc".to_string() }));

        assert!(!response.ok);
        assert_eq!(response.reason, Some(KurlError::NotFound.to_string()));
    }

    #[test]
    fn test_dispatch_check_missing_settings() {
        let client = ApiClient::new(Settings::default(), FakeTransport::replying(200, json!({})));
        let response = pollster::block_on(dispatch(&client, &Request::CheckConnection));

        assert!(!response.ok);
        assert_eq!(response.reason, Some(KurlError::MissingSettings.to_string()));
    }

    #[test]
    fn test_dispatch_check_total() {
        let client = ApiClient::new(settings(), FakeTransport::replying(200, json!({"total_links": 5})));
        let response = pollster::block_on(dispatch(&client, &Request::CheckConnection));

        assert!(response.ok);
        assert_eq!(response.total.as_deref(), Some("5"));
    }

    #[test]
    fn test_dispatch_unknown_type() {
        let client = ApiClient::new(settings(), FakeTransport::replying(200, json!({})));
        let mut notices = Vec::new();
        let response = pollster::block_on(handle_message(&client, json!({"type": "FLY_TO_MOON"}), |key| notices.push(key)));

        assert_eq!(response, Response::failure("Unknown message type"));
        assert!(notices.is_empty());
    }

    #[test]
    fn test_handle_message_notifies_on_delete() {
        let client = ApiClient::new(settings(), FakeTransport::replying(200, json!({"status": "success"})));
        let mut notices = Vec::new();
        let response = pollster::block_on(handle_message(
            &client,
            json!({"type": "DELETE_SHORTURL", "shortUrl": "https://sho.rt/abc"}),
            |key| notices.push(key),
        ));

        assert_eq!(response, Response::success());
        assert_eq!(notices, vec![i18n::TOAST_URL_DELETED]);
    }

    #[test]
    fn test_reason_for_keyword_clash() {
        let err = KurlError::Remote("Keyword abc already exists in database".to_string());
        assert_eq!(reason_for(&err), KurlError::KeywordTaken.to_string());

        let err = KurlError::Remote("HTTP 500".to_string());
        assert_eq!(reason_for(&err), "HTTP 500");
    }

    #[test]
    fn test_notifications() {
        let shorten = Request::ShortenUrl {
            long_url: String::new(),
            keyword: String::new(),
            title: String::new(),
        };
        let existing = Response {
            ok: true,
            already: Some(true),
            ..Response::default()
        };
        assert_eq!(notification_for(&shorten, &existing), Some(i18n::TOAST_URL_EXISTS));

        let delete = Request::DeleteShortUrl { short_url: "a".to_string() };
        assert_eq!(notification_for(&delete, &Response::success()), Some(i18n::TOAST_URL_DELETED));
        assert_eq!(notification_for(&delete, &Response::failure("x")), None);
        assert_eq!(notification_for(&Request::GetDbStats, &Response::success()), None);
    }
}
