/// Bridge to the browser.* extension APIs (see bridge.js)

use crate::api::Transport;
use crate::error::{KurlError, KurlResult};
use crate::i18n;
use crate::messages::{Request, Response};
use crate::prefill::{PREFILL_KEYS, Prefill, StoredPrefill};
use crate::response::HttpReply;
use crate::settings::{SETTINGS_KEYS, Settings, SettingsProvider};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

// Import JS bridge functions
#[wasm_bindgen(module = "/bridge.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getStorage(keys: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(items: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn removeStorage(keys: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn containsOrigin(pattern: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn requestOrigin(pattern: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn removeOrigin(pattern: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn postForm(endpoint: &str, body: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn activeTabUrl() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn sendMessage(message: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn copyText(text: &str) -> Result<(), JsValue>;

    fn getMessage(key: &str, substitutions: JsValue) -> String;

    fn downloadFile(filename: &str, bytes: &[u8], mime: &str);

    fn notify(title: &str, message: &str);

    fn openPopup();

    fn openOptionsPage();

    fn closeWindow();

    fn createMenus(items: JsValue);
}

fn js_error(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{:?}", e))
}

/// Plain JS objects (not Maps) so values survive runtime messaging and storage
fn to_js<T: Serialize + ?Sized>(value: &T) -> KurlResult<JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| KurlError::Storage(format!("Failed to serialize: {}", e)))
}

fn from_js<T: DeserializeOwned + Default>(value: JsValue) -> KurlResult<T> {
    if value.is_null() || value.is_undefined() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| KurlError::Storage(format!("Failed to parse: {}", e)))
}

// Localization

/// Localized message, falling back to the built-in English text
pub fn t(key: &str) -> String {
    t_with(key, &[])
}

pub fn t_with(key: &str, subs: &[&str]) -> String {
    let substitutions = to_js(subs).unwrap_or(JsValue::UNDEFINED);
    let message = getMessage(key, substitutions);
    if message.is_empty() {
        i18n::english(key, subs)
    } else {
        message
    }
}

// Storage

/// Settings read from browser.storage.local
pub struct BrowserSettings;

impl SettingsProvider for BrowserSettings {
    async fn load(&self) -> KurlResult<Settings> {
        let stored = getStorage(to_js(&SETTINGS_KEYS)?)
            .await
            .map_err(|e| KurlError::Storage(js_error(e)))?;
        from_js(stored)
    }
}

pub async fn save_settings(settings: &Settings) -> KurlResult<()> {
    setStorage(to_js(settings)?)
        .await
        .map_err(|e| KurlError::Storage(js_error(e)))
}

pub async fn load_prefill() -> KurlResult<StoredPrefill> {
    let stored = getStorage(to_js(&PREFILL_KEYS)?)
        .await
        .map_err(|e| KurlError::Storage(js_error(e)))?;
    from_js(stored)
}

pub async fn store_prefill(prefill: &Prefill) -> KurlResult<()> {
    let mut items = serde_json::Map::new();
    items.insert(prefill.storage_key().to_string(), prefill.url().into());
    setStorage(to_js(&items)?)
        .await
        .map_err(|e| KurlError::Storage(js_error(e)))
}

pub async fn clear_prefill() -> KurlResult<()> {
    removeStorage(to_js(&PREFILL_KEYS)?)
        .await
        .map_err(|e| KurlError::Storage(js_error(e)))
}

// Permissions

pub async fn request_origin(pattern: &str) -> KurlResult<bool> {
    let granted = requestOrigin(pattern)
        .await
        .map_err(|e| KurlError::Transport(js_error(e)))?;
    Ok(granted.as_bool().unwrap_or(false))
}

pub async fn remove_origin(pattern: &str) -> KurlResult<bool> {
    let removed = removeOrigin(pattern)
        .await
        .map_err(|e| KurlError::Transport(js_error(e)))?;
    Ok(removed.as_bool().unwrap_or(false))
}

// Network

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FetchReply {
    status: u16,
    text: String,
}

/// fetch() from the extension context
pub struct BrowserTransport;

impl Transport for BrowserTransport {
    async fn has_permission(&self, origin_pattern: &str) -> KurlResult<bool> {
        let granted = containsOrigin(origin_pattern)
            .await
            .map_err(|e| KurlError::Transport(js_error(e)))?;
        Ok(granted.as_bool().unwrap_or(false))
    }

    async fn post_form(&self, endpoint: &str, body: String) -> KurlResult<HttpReply> {
        let raw = postForm(endpoint, &body)
            .await
            .map_err(|e| KurlError::Transport(js_error(e)))?;
        let reply: FetchReply = serde_wasm_bindgen::from_value(raw)
            .map_err(|e| KurlError::Transport(format!("Bad fetch result: {}", e)))?;
        Ok(HttpReply::new(reply.status, reply.text))
    }
}

// Tabs, windows, messaging

/// URL of the active tab in the current window
pub async fn active_tab_url() -> Option<String> {
    match activeTabUrl().await {
        Ok(url) => url.as_string().filter(|u| !u.is_empty()),
        Err(e) => {
            log::warn!("Could not query active tab: {}", js_error(e));
            None
        }
    }
}

/// Send a request to the background script and wait for its reply
pub async fn send_request(request: &Request) -> KurlResult<Response> {
    let reply = sendMessage(to_js(request)?)
        .await
        .map_err(|e| KurlError::Transport(js_error(e)))?;
    if reply.is_null() || reply.is_undefined() {
        return Err(KurlError::Transport("No response from background script".to_string()));
    }
    serde_wasm_bindgen::from_value(reply).map_err(|e| KurlError::Transport(format!("Bad response: {}", e)))
}

pub async fn copy_text(text: &str) -> KurlResult<()> {
    copyText(text).await.map_err(|e| KurlError::Transport(js_error(e)))
}

/// Save bytes through a temporary download link
pub fn download(filename: &str, bytes: &[u8], mime: &str) {
    downloadFile(filename, bytes, mime);
}

pub fn show_notification(message_key: &str) {
    notify(&t(i18n::EXTENSION_NAME), &t(message_key));
}

pub fn open_popup() {
    openPopup();
}

pub fn open_options_page() {
    openOptionsPage();
}

pub fn close_window() {
    closeWindow();
}

#[derive(Serialize)]
struct MenuItem {
    id: &'static str,
    title: String,
    contexts: [&'static str; 1],
}

/// Register the page/selection/link context menu entries
pub fn setup_menus() {
    let items = [
        MenuItem { id: "yourls-shorten-page", title: t(i18n::MENU_SHORTEN_PAGE), contexts: ["page"] },
        MenuItem { id: "yourls-shorten-selection", title: t(i18n::MENU_SHORTEN_SELECTION), contexts: ["selection"] },
        MenuItem { id: "yourls-shorten-link", title: t(i18n::MENU_SHORTEN_LINK), contexts: ["link"] },
    ];
    match to_js(&items) {
        Ok(items) => createMenus(items),
        Err(e) => log::error!("Failed to build context menus: {}", e),
    }
}
