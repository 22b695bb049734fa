/// Background script entry points: runtime messages, toolbar and context-menu clicks

use crate::api::ApiClient;
use crate::browser::{self, BrowserSettings, BrowserTransport};
use crate::messages::{Response, handle_message};
use crate::prefill::Prefill;
use crate::redirect::{ClickContext, resolve_action_url};
use crate::settings::SettingsProvider;
use js_sys::Promise;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

fn client() -> ApiClient<BrowserSettings, BrowserTransport> {
    ApiClient::new(BrowserSettings, BrowserTransport)
}

/// runtime.onMessage handler; resolves with the response object
#[wasm_bindgen(js_name = handleMessage)]
pub fn handle_runtime_message(message: JsValue) -> Promise {
    future_to_promise(async move {
        let client = client();
        let response = match serde_wasm_bindgen::from_value::<serde_json::Value>(message) {
            Ok(value) => handle_message(&client, value, browser::show_notification).await,
            Err(e) => Response::failure(format!("Malformed message: {}", e)),
        };

        response
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize response: {}", e)))
    })
}

/// Context-menu click (info with linkUrl/selectionText)
///
/// Opens the popup and leaves the chosen URL in storage for it to pick up. A null
/// `info` falls back to the active tab.
#[wasm_bindgen(js_name = handleAction)]
pub fn handle_action(info: JsValue) -> Promise {
    browser::open_popup();

    let context: Option<ClickContext> = if info.is_null() || info.is_undefined() {
        None
    } else {
        serde_wasm_bindgen::from_value(info)
            .inspect_err(|e| log::warn!("Ignoring unreadable click info: {}", e))
            .ok()
    };

    future_to_promise(async move {
        let url = match resolve_action_url(context.as_ref(), None) {
            Some(url) => Some(url),
            None => resolve_action_url(None, browser::active_tab_url().await.as_deref()),
        };

        browser::clear_prefill().await.map_err(|e| JsValue::from_str(&e.to_string()))?;

        if let Some(url) = url {
            let settings = BrowserSettings.load().await.unwrap_or_default();
            let prefill = Prefill::classify(&settings.base_url(), &url);
            log::debug!("prefill {} = {}", prefill.storage_key(), prefill.url());
            browser::store_prefill(&prefill)
                .await
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
        }

        Ok(JsValue::UNDEFINED)
    })
}

/// runtime.onInstalled / onStartup
#[wasm_bindgen(js_name = setupMenus)]
pub fn setup_menus() {
    browser::setup_menus();
}
