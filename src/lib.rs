/// kurl - Browser extension for a self-hosted YOURLS link shortener
/// Built with Rust + WASM + Yew

pub mod api;
pub mod background;
pub mod browser;
pub mod error;
pub mod i18n;
pub mod keyword;
pub mod messages;
pub mod outcome;
pub mod prefill;
pub mod qr;
pub mod redirect;
pub mod response;
pub mod settings;
pub mod ui;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export the redirect cleaner for JavaScript access
#[wasm_bindgen(js_name = unwrapRedirect)]
pub fn unwrap_redirect(url: &str) -> String {
    redirect::unwrap_redirect(url)
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}

// Start the Yew app for the options page
#[wasm_bindgen]
pub fn start_options() {
    yew::Renderer::<ui::options::OptionsPage>::new().render();
}
