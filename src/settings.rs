/// Persisted extension settings and base URL normalization

use crate::error::KurlResult;
use serde::{Deserialize, Serialize};

/// Storage keys used by browser.storage.local
pub const SETTINGS_KEYS: [&str; 3] = ["yourlsUrl", "apiSignature", "autoCopy"];

/// Path of the YOURLS API script, relative to the base URL
pub const API_ENDPOINT: &str = "/yourls-api.php";

/// Settings saved from the options page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub yourls_url: String,
    pub api_signature: String,
    pub auto_copy: bool,
}

impl Settings {
    pub fn new(yourls_url: &str, api_signature: &str, auto_copy: bool) -> Settings {
        Settings {
            yourls_url: sanitize_base_url(yourls_url),
            api_signature: api_signature.trim().to_string(),
            auto_copy,
        }
    }

    /// Normalized base URL (never ends with a slash)
    pub fn base_url(&self) -> String {
        sanitize_base_url(&self.yourls_url)
    }

    pub fn is_configured(&self) -> bool {
        !self.base_url().is_empty() && !self.api_signature.trim().is_empty()
    }

    /// Full URL of the API script
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url(), API_ENDPOINT)
    }
}

/// Normalize a user-entered YOURLS URL
///
/// Rules:
/// 1. Trim whitespace; empty stays empty
/// 2. Prepend "https://" when no http(s) scheme is given
/// 3. Drop a trailing "/yourls-api.php" if the user pasted the API URL
/// 4. Strip every trailing slash
///
/// Examples:
/// - "https://sho.rt/" → "https://sho.rt"
/// - "sho.rt" → "https://sho.rt"
/// - "https://sho.rt/yourls-api.php" → "https://sho.rt"
pub fn sanitize_base_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let lower = trimmed.to_ascii_lowercase();
    let mut url = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    loop {
        let before = url.len();
        while url.ends_with('/') {
            url.pop();
        }
        if url.to_ascii_lowercase().ends_with(API_ENDPOINT) {
            url.truncate(url.len() - API_ENDPOINT.len());
        }
        if url.len() == before {
            break;
        }
    }

    url
}

/// Source of the current settings, injected into the API client
#[allow(async_fn_in_trait)]
pub trait SettingsProvider {
    async fn load(&self) -> KurlResult<Settings>;
}

/// A settings snapshot is its own provider
impl SettingsProvider for Settings {
    async fn load(&self) -> KurlResult<Settings> {
        Ok(self.clone())
    }
}
