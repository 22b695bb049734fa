/// YOURLS API client
///
/// Every call is one form-encoded POST to `<base>/yourls-api.php`. The client
/// builds the request and hands the reply to the per-operation classifier; it
/// never retries.
use crate::error::{KurlError, KurlResult};
use crate::keyword::extract_keyword;
use crate::outcome::{
    HealthReport, ShortenResult, classify_db_stats, classify_delete, classify_health, classify_shorten,
    classify_stats,
};
use crate::response::HttpReply;
use crate::settings::{Settings, SettingsProvider};
use serde_json::Value;
use url::{Url, form_urlencoded};

/// Actions understood by yourls-api.php
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Shorten,
    UrlStats,
    Delete,
    DbStats,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Shorten => "shorturl",
            Action::UrlStats => "url-stats",
            Action::Delete => "delete",
            Action::DbStats => "stats",
        }
    }
}

/// Network access, provided by the browser in production
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Whether host permission for `origin_pattern` (e.g. "https://sho.rt/*") is granted
    async fn has_permission(&self, origin_pattern: &str) -> KurlResult<bool>;

    /// POST a urlencoded body and return status plus body text
    async fn post_form(&self, endpoint: &str, body: String) -> KurlResult<HttpReply>;
}

/// Host permission pattern for a base URL: "https://sho.rt/*"
pub fn origin_pattern(base: &str) -> KurlResult<String> {
    let url = Url::parse(base).map_err(|e| KurlError::InvalidUrl(format!("{}: {}", base, e)))?;
    Ok(format!("{}/*", url.origin().ascii_serialization()))
}

pub struct ApiClient<S, T> {
    settings: S,
    transport: T,
}

impl<S: SettingsProvider, T: Transport> ApiClient<S, T> {
    pub fn new(settings: S, transport: T) -> Self {
        ApiClient { settings, transport }
    }

    async fn configured_settings(&self) -> KurlResult<Settings> {
        let settings = self.settings.load().await?;
        if !settings.is_configured() {
            return Err(KurlError::MissingSettings);
        }
        Ok(settings)
    }

    async fn call(&self, settings: &Settings, action: Action, fields: &[(&str, &str)]) -> KurlResult<HttpReply> {
        let origin = origin_pattern(&settings.base_url())?;
        if !self.transport.has_permission(&origin).await? {
            return Err(KurlError::PermissionDenied(origin));
        }

        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("action", action.as_str())
            .append_pair("format", "json")
            .append_pair("signature", settings.api_signature.trim())
            .extend_pairs(fields.iter())
            .finish();

        log::debug!("POST {} action={}", settings.endpoint(), action.as_str());
        let reply = self.transport.post_form(&settings.endpoint(), body).await?;
        log::debug!("action={} -> HTTP {}", action.as_str(), reply.status);
        Ok(reply)
    }

    /// Shorten `long_url`, optionally with a custom keyword and title
    pub async fn shorten(&self, long_url: &str, keyword: &str, title: &str) -> KurlResult<ShortenResult> {
        let settings = self.configured_settings().await?;

        let mut fields = vec![("url", long_url)];
        if !keyword.is_empty() {
            fields.push(("keyword", keyword));
        }
        if !title.is_empty() {
            fields.push(("title", title));
        }

        let reply = self.call(&settings, Action::Shorten, &fields).await?;
        classify_shorten(&reply, &settings.base_url()).into_result().inspect_err(|e| {
            log::warn!("shorturl failed: {}", e);
        })
    }

    /// Stats for one link, given as a short URL or a bare keyword
    pub async fn url_stats(&self, short_or_keyword: &str) -> KurlResult<Value> {
        let settings = self.configured_settings().await?;
        let keyword = extract_keyword(&settings.base_url(), short_or_keyword);
        if keyword.is_empty() {
            return Err(KurlError::MissingKeyword);
        }

        let reply = self.call(&settings, Action::UrlStats, &[("shorturl", keyword.as_str())]).await?;
        classify_stats(&reply).into_result()
    }

    pub async fn delete(&self, short_or_keyword: &str) -> KurlResult<()> {
        let settings = self.configured_settings().await?;
        let keyword = extract_keyword(&settings.base_url(), short_or_keyword);
        if keyword.is_empty() {
            return Err(KurlError::MissingKeyword);
        }

        let reply = self.call(&settings, Action::Delete, &[("shorturl", keyword.as_str())]).await?;
        classify_delete(&reply).into_result().inspect_err(|e| {
            log::warn!("delete of {} failed: {}", keyword, e);
        })
    }

    /// Connection test: global stats with the saved signature
    pub async fn check(&self) -> KurlResult<HealthReport> {
        let settings = self.configured_settings().await?;
        let reply = self.call(&settings, Action::DbStats, &[]).await?;
        classify_health(&reply).into_result()
    }

    /// Global database stats
    pub async fn db_stats(&self) -> KurlResult<Value> {
        let settings = self.configured_settings().await?;
        let reply = self.call(&settings, Action::DbStats, &[]).await?;
        classify_db_stats(&reply).into_result()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    /// In-memory transport recording every request
    pub(crate) struct FakeTransport {
        pub granted: bool,
        pub reply: KurlResult<HttpReply>,
        pub requests: RefCell<Vec<(String, String)>>,
    }

    impl FakeTransport {
        pub(crate) fn replying(status: u16, body: Value) -> FakeTransport {
            FakeTransport {
                granted: true,
                reply: Ok(HttpReply::new(status, body.to_string())),
                requests: RefCell::new(Vec::new()),
            }
        }

        fn last_form(&self) -> Vec<(String, String)> {
            let requests = self.requests.borrow();
            let (_, body) = requests.last().expect("no request was sent");
            form_urlencoded::parse(body.as_bytes()).into_owned().collect()
        }
    }

    impl Transport for FakeTransport {
        async fn has_permission(&self, _origin_pattern: &str) -> KurlResult<bool> {
            Ok(self.granted)
        }

        async fn post_form(&self, endpoint: &str, body: String) -> KurlResult<HttpReply> {
            self.requests.borrow_mut().push((endpoint.to_string(), body));
            self.reply.clone()
        }
    }

    pub(crate) fn settings() -> Settings {
        Settings::new("https://sho.rt/", "secret", false)
    }

    fn field<'a>(form: &'a [(String, String)], name: &str) -> Option<&'a str> {
        form.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_origin_pattern() {
        assert_eq!(origin_pattern("https://sho.rt/sub").unwrap(), "https://sho.rt/*");
        assert_eq!(origin_pattern("http://localhost:8080").unwrap(), "http://localhost:8080/*");
        assert!(matches!(origin_pattern("nope"), Err(KurlError::InvalidUrl(_))));
    }

    #[test]
    fn test_shorten_request_shape() {
        let transport = FakeTransport::replying(200, json!({"shorturl": "https://sho.rt/k"}));
        let client = ApiClient::new(settings(), transport);

        let result = pollster::block_on(client.shorten("https://example.com/a b", "k", "")).unwrap();
        assert_eq!(result.short_url.as_deref(), Some("https://sho.rt/k"));
        assert!(!result.already_existed);

        let requests = client.transport.requests.borrow();
        assert_eq!(requests[0].0, "https://sho.rt/yourls-api.php");
        drop(requests);

        let form = client.transport.last_form();
        assert_eq!(field(&form, "action"), Some("shorturl"));
        assert_eq!(field(&form, "format"), Some("json"));
        assert_eq!(field(&form, "signature"), Some("secret"));
        assert_eq!(field(&form, "url"), Some("https://example.com/a b"));
        assert_eq!(field(&form, "keyword"), Some("k"));
        assert_eq!(field(&form, "title"), None);
    }

    #[test]
    fn test_shorten_already_exists() {
        let transport = FakeTransport::replying(
            200,
            json!({"status": "fail", "message": "https://example.com already exists in database (short URL: https://sho.rt/old)"}),
        );
        let client = ApiClient::new(settings(), transport);

        let result = pollster::block_on(client.shorten("https://example.com", "", "")).unwrap();
        assert!(result.already_existed);
        assert_eq!(result.short_url.as_deref(), Some("https://sho.rt/old"));
    }

    #[test]
    fn test_missing_settings() {
        let transport = FakeTransport::replying(200, json!({}));
        let client = ApiClient::new(Settings::default(), transport);

        assert_eq!(
            pollster::block_on(client.shorten("https://example.com", "", "")),
            Err(KurlError::MissingSettings)
        );
        assert_eq!(pollster::block_on(client.check()).unwrap_err(), KurlError::MissingSettings);
        assert!(client.transport.requests.borrow().is_empty());
    }

    #[test]
    fn test_permission_not_granted() {
        let mut transport = FakeTransport::replying(200, json!({}));
        transport.granted = false;
        let client = ApiClient::new(settings(), transport);

        assert_eq!(
            pollster::block_on(client.db_stats()),
            Err(KurlError::PermissionDenied("https://sho.rt/*".to_string()))
        );
        assert!(client.transport.requests.borrow().is_empty());
    }

    #[test]
    fn test_url_stats_sends_keyword() {
        let body = json!({"link": {"shorturl": "https://sho.rt/abcd", "clicks": "3"}});
        let client = ApiClient::new(settings(), FakeTransport::replying(200, body.clone()));

        let data = pollster::block_on(client.url_stats("https://sho.rt/abcd")).unwrap();
        assert_eq!(data, body);

        let form = client.transport.last_form();
        assert_eq!(field(&form, "action"), Some("url-stats"));
        assert_eq!(field(&form, "shorturl"), Some("abcd"));
    }

    #[test]
    fn test_url_stats_not_found() {
        let client = ApiClient::new(settings(), FakeTransport::replying(404, json!({"message": "not found"})));
        assert_eq!(pollster::block_on(client.url_stats("abcd")), Err(KurlError::NotFound));
    }

    #[test]
    fn test_delete_requires_keyword() {
        let client = ApiClient::new(settings(), FakeTransport::replying(200, json!({"statusCode": 200})));
        assert_eq!(pollster::block_on(client.delete("  ")), Err(KurlError::MissingKeyword));
        assert!(client.transport.requests.borrow().is_empty());
    }

    #[test]
    fn test_delete_success() {
        let client = ApiClient::new(settings(), FakeTransport::replying(200, json!({"statusCode": 200})));
        assert_eq!(pollster::block_on(client.delete("https://sho.rt/gone")), Ok(()));

        let form = client.transport.last_form();
        assert_eq!(field(&form, "action"), Some("delete"));
        assert_eq!(field(&form, "shorturl"), Some("gone"));
    }

    #[test]
    fn test_check_reports_total() {
        let client = ApiClient::new(settings(), FakeTransport::replying(200, json!({"stats": {"total_links": "12"}})));
        let report = pollster::block_on(client.check()).unwrap();
        assert_eq!(report.total_or_placeholder(), "12");

        let form = client.transport.last_form();
        assert_eq!(field(&form, "action"), Some("stats"));
    }

    #[test]
    fn test_transport_error_propagates() {
        let mut transport = FakeTransport::replying(200, json!({}));
        transport.reply = Err(KurlError::Transport("Failed to fetch".to_string()));
        let client = ApiClient::new(settings(), transport);

        assert_eq!(
            pollster::block_on(client.db_stats()),
            Err(KurlError::Transport("Failed to fetch".to_string()))
        );
    }
}
