/// Hand-off of the clicked URL from the background script to the popup
use crate::keyword::is_short_url;
use crate::settings::sanitize_base_url;
use serde::Deserialize;

pub const PREFILL_LONG_KEY: &str = "yourls_prefill_long";
pub const PREFILL_SHORT_KEY: &str = "yourls_prefill_short";
pub const PREFILL_KEYS: [&str; 2] = [PREFILL_LONG_KEY, PREFILL_SHORT_KEY];

#[derive(Debug, Clone, PartialEq)]
pub enum Prefill {
    /// A page to shorten
    Long(String),
    /// An existing short link to inspect
    Short(String),
}

impl Prefill {
    /// Short if the URL lives under the configured server
    pub fn classify(base: &str, url: &str) -> Prefill {
        let base = sanitize_base_url(base);
        if !base.is_empty() && url.starts_with(&base) {
            Prefill::Short(url.to_string())
        } else {
            Prefill::Long(url.to_string())
        }
    }

    pub fn storage_key(&self) -> &'static str {
        match self {
            Prefill::Long(_) => PREFILL_LONG_KEY,
            Prefill::Short(_) => PREFILL_SHORT_KEY,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Prefill::Long(url) | Prefill::Short(url) => url,
        }
    }

    pub fn is_short(&self) -> bool {
        matches!(self, Prefill::Short(_))
    }
}

/// Raw prefill values as read back from storage
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoredPrefill {
    pub yourls_prefill_long: Option<String>,
    pub yourls_prefill_short: Option<String>,
}

impl StoredPrefill {
    /// Decide what the popup should show on open
    ///
    /// A stored long URL wins over a stored short one. Without any stored value the
    /// active tab URL is used. Anything under the base URL with a keyword is
    /// treated as an existing short link.
    pub fn resolve(&self, base: &str, active_tab_url: Option<&str>) -> Option<Prefill> {
        let explicit_short = self.yourls_prefill_short.as_deref().is_some_and(|s| !s.is_empty());

        let url = self
            .yourls_prefill_long
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(|| self.yourls_prefill_short.clone().filter(|s| !s.is_empty()))
            .or_else(|| {
                active_tab_url
                    .filter(|url| !url.is_empty() && !url.starts_with("about:"))
                    .map(|url| url.to_string())
            })?;

        if explicit_short || is_short_url(base, &url) {
            Some(Prefill::Short(url))
        } else {
            Some(Prefill::Long(url))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://sho.rt";

    #[test]
    fn test_classify() {
        assert_eq!(Prefill::classify(BASE, "https://sho.rt/abc"), Prefill::Short("https://sho.rt/abc".to_string()));
        assert_eq!(Prefill::classify(BASE, "https://example.com"), Prefill::Long("https://example.com".to_string()));
        assert_eq!(Prefill::classify("", "https://sho.rt/abc"), Prefill::Long("https://sho.rt/abc".to_string()));
    }

    #[test]
    fn test_storage_keys() {
        assert_eq!(Prefill::Long(String::new()).storage_key(), "yourls_prefill_long");
        assert_eq!(Prefill::Short(String::new()).storage_key(), "yourls_prefill_short");
    }

    #[test]
    fn test_resolve_long_prefill() {
        let stored = StoredPrefill {
            yourls_prefill_long: Some("https://example.com".to_string()),
            yourls_prefill_short: None,
        };
        assert_eq!(
            stored.resolve(BASE, Some("https://tab.example.com")),
            Some(Prefill::Long("https://example.com".to_string()))
        );
    }

    #[test]
    fn test_resolve_short_prefill() {
        let stored = StoredPrefill {
            yourls_prefill_long: None,
            yourls_prefill_short: Some("https://sho.rt/abc".to_string()),
        };
        let prefill = stored.resolve(BASE, None).unwrap();
        assert!(prefill.is_short());
        assert_eq!(prefill.url(), "https://sho.rt/abc");
    }

    #[test]
    fn test_resolve_active_tab_on_short_server() {
        let stored = StoredPrefill::default();
        assert_eq!(
            stored.resolve(BASE, Some("https://sho.rt/xyz")),
            Some(Prefill::Short("https://sho.rt/xyz".to_string()))
        );
        // the server's own admin page is not a short link
        assert_eq!(
            stored.resolve(BASE, Some("https://sho.rt/")),
            Some(Prefill::Long("https://sho.rt/".to_string()))
        );
    }

    #[test]
    fn test_resolve_toolbar_open_uses_active_tab() {
        assert_eq!(
            StoredPrefill::default().resolve(BASE, Some("https://example.com/article")),
            Some(Prefill::Long("https://example.com/article".to_string()))
        );
    }

    #[test]
    fn test_resolve_nothing() {
        assert_eq!(StoredPrefill::default().resolve(BASE, Some("about:blank")), None);
        assert_eq!(StoredPrefill::default().resolve(BASE, None), None);
    }
}
