/// Redirect unwrapping and action URL resolution for toolbar/context-menu clicks
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use url::Url;

/// A known redirector link shape (search engines wrapping outbound links)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RedirectPattern {
    pub host_prefix: &'static str,
    pub path_prefix: &'static str,
    pub param: &'static str,
    pub prefix_to_strip: Option<&'static str>,
}

/// Checked in order, first match wins
pub const REDIRECT_PATTERNS: &[RedirectPattern] = &[
    RedirectPattern { host_prefix: "www.google.", path_prefix: "/url", param: "url", prefix_to_strip: None },
    RedirectPattern { host_prefix: "www.bing.com", path_prefix: "/ck/a", param: "u", prefix_to_strip: Some("a1") },
    RedirectPattern { host_prefix: "duckduckgo.com", path_prefix: "/l/", param: "uddg", prefix_to_strip: None },
    RedirectPattern { host_prefix: "www.youtube.com", path_prefix: "/redirect", param: "q", prefix_to_strip: None },
];

static SELECTION_URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://\S+").unwrap());

impl RedirectPattern {
    /// The real destination if this pattern applies to `url`
    fn unwrap(&self, url: &Url) -> Option<String> {
        let host = url.host_str()?;
        if !host.starts_with(self.host_prefix) || !url.path().starts_with(self.path_prefix) {
            return None;
        }

        let value = url
            .query_pairs()
            .find(|(name, _)| name == self.param)
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())?;

        match self.prefix_to_strip {
            Some(prefix) if value.starts_with(prefix) => Some(value[prefix.len()..].to_string()),
            _ => Some(value),
        }
    }
}

/// Extract the real destination from a search-engine redirect link
///
/// Falls back to the input unchanged when it does not parse or no pattern matches.
pub fn unwrap_redirect(link: &str) -> String {
    let url = match Url::parse(link) {
        Ok(url) => url,
        Err(e) => {
            log::warn!("Could not parse link for cleaning, falling back: {}", e);
            return link.to_string();
        }
    };

    REDIRECT_PATTERNS
        .iter()
        .find_map(|pattern| pattern.unwrap(&url))
        .unwrap_or_else(|| link.to_string())
}

/// First http(s) URL found in a piece of selected text
pub fn url_in_selection(text: &str) -> Option<String> {
    SELECTION_URL.find(text).map(|m| m.as_str().to_string())
}

/// What the browser tells us about a context-menu click
///
/// Toolbar clicks carry no context at all.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClickContext {
    pub link_url: Option<String>,
    pub selection_text: Option<String>,
}

/// Pick the URL an action should operate on
///
/// Priority:
/// 1. Clicked link (unwrapped if it is a known redirector)
/// 2. First URL in the selected text
/// 3. Active tab URL, unless it is an about: page
pub fn resolve_action_url(context: Option<&ClickContext>, active_tab_url: Option<&str>) -> Option<String> {
    if let Some(context) = context {
        if let Some(link) = context.link_url.as_deref().filter(|l| !l.is_empty()) {
            return Some(unwrap_redirect(link));
        }
        if let Some(found) = context.selection_text.as_deref().and_then(url_in_selection) {
            return Some(found);
        }
    }

    active_tab_url
        .filter(|url| !url.is_empty() && !url.starts_with("about:"))
        .map(|url| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwrap_google() {
        assert_eq!(
            unwrap_redirect("https://www.google.com/url?q=x&url=https://example.com/page"),
            "https://example.com/page"
        );
    }

    #[test]
    fn test_unwrap_google_country_domain() {
        assert_eq!(
            unwrap_redirect("https://www.google.co.uk/url?url=https%3A%2F%2Fexample.com%2F%3Fa%3D1"),
            "https://example.com/?a=1"
        );
    }

    #[test]
    fn test_unwrap_bing_strips_prefix() {
        assert_eq!(
            unwrap_redirect("https://www.bing.com/ck/a?u=a1aHR0cHM6Ly9leGFtcGxlLmNvbQ"),
            "aHR0cHM6Ly9leGFtcGxlLmNvbQ"
        );
    }

    #[test]
    fn test_unwrap_duckduckgo() {
        assert_eq!(
            unwrap_redirect("https://duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Fddg&rut=abc"),
            "https://example.com/ddg"
        );
    }

    #[test]
    fn test_unwrap_youtube() {
        assert_eq!(
            unwrap_redirect("https://www.youtube.com/redirect?event=video&q=https%3A%2F%2Fexample.com"),
            "https://example.com"
        );
    }

    #[test]
    fn test_unwrap_unrecognized_unchanged() {
        let link = "https://example.com/article?url=https://elsewhere.com";
        assert_eq!(unwrap_redirect(link), link);
    }

    #[test]
    fn test_unwrap_matching_host_wrong_path_unchanged() {
        let link = "https://www.google.com/search?url=https://example.com";
        assert_eq!(unwrap_redirect(link), link);
    }

    #[test]
    fn test_unwrap_missing_param_unchanged() {
        let link = "https://www.google.com/url?q=https://example.com";
        assert_eq!(unwrap_redirect(link), link);
    }

    #[test]
    fn test_unwrap_unparseable_unchanged() {
        assert_eq!(unwrap_redirect("not a url"), "not a url");
    }

    #[test]
    fn test_url_in_selection() {
        assert_eq!(
            url_in_selection("read this: https://example.com/a?b=c now"),
            Some("https://example.com/a?b=c".to_string())
        );
        assert_eq!(url_in_selection("no links here"), None);
    }

    #[test]
    fn test_resolve_prefers_link() {
        let context = ClickContext {
            link_url: Some("https://www.google.com/url?url=https://example.com/page".to_string()),
            selection_text: Some("https://selected.example.com".to_string()),
        };
        assert_eq!(
            resolve_action_url(Some(&context), Some("https://tab.example.com")),
            Some("https://example.com/page".to_string())
        );
    }

    #[test]
    fn test_resolve_falls_back_to_selection() {
        let context = ClickContext {
            link_url: None,
            selection_text: Some("see http://selected.example.com".to_string()),
        };
        assert_eq!(
            resolve_action_url(Some(&context), Some("https://tab.example.com")),
            Some("http://selected.example.com".to_string())
        );
    }

    #[test]
    fn test_resolve_falls_back_to_active_tab() {
        let context = ClickContext {
            link_url: None,
            selection_text: Some("plain words".to_string()),
        };
        assert_eq!(
            resolve_action_url(Some(&context), Some("https://tab.example.com")),
            Some("https://tab.example.com".to_string())
        );
        assert_eq!(
            resolve_action_url(None, Some("https://tab.example.com")),
            Some("https://tab.example.com".to_string())
        );
    }

    #[test]
    fn test_resolve_ignores_about_pages() {
        assert_eq!(resolve_action_url(None, Some("about:newtab")), None);
        assert_eq!(resolve_action_url(None, None), None);
    }

    #[test]
    fn test_click_context_from_browser_json() {
        let json = r#"{"menuItemId":"yourls-shorten-link","linkUrl":"https://example.com","pageUrl":"https://p.example.com"}"#;
        let context: ClickContext = serde_json::from_str(json).unwrap();
        assert_eq!(context.link_url.as_deref(), Some("https://example.com"));
        assert_eq!(context.selection_text, None);
    }
}
