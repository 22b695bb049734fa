/// Options page: server URL, API signature, auto-copy and host permission

use crate::api::origin_pattern;
use crate::browser::{self, BrowserSettings, t, t_with};
use crate::i18n;
use crate::messages::Request;
use crate::settings::{Settings, SettingsProvider, sanitize_base_url};
use crate::ui::components::{Status, StatusLine, TextField, setter};
use patternfly_yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[function_component(OptionsPage)]
pub fn options_page() -> Html {
    let yourls_url = use_state(String::new);
    let api_signature = use_state(String::new);
    let auto_copy = use_state(|| false);
    let status = use_state(Status::default);
    let busy = use_state(|| false);

    // Load saved settings on mount
    {
        let yourls_url = yourls_url.clone();
        let api_signature = api_signature.clone();
        let auto_copy = auto_copy.clone();
        let status = status.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                match BrowserSettings.load().await {
                    Ok(settings) => {
                        yourls_url.set(settings.yourls_url);
                        api_signature.set(settings.api_signature);
                        auto_copy.set(settings.auto_copy);
                        status.set(Status::info(t(i18n::OPTIONS_STATUS_LOADED)));
                    }
                    Err(e) => {
                        status.set(Status::error(e.to_string()));
                    }
                }
            });
            || ()
        });
    }

    let on_auto_copy = {
        let auto_copy = auto_copy.clone();
        Callback::from(move |e: Event| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                auto_copy.set(input.checked());
            }
        })
    };

    // Save handler
    let on_save = {
        let yourls_url = yourls_url.clone();
        let api_signature = api_signature.clone();
        let auto_copy = auto_copy.clone();
        let status = status.clone();

        Callback::from(move |_: MouseEvent| {
            let settings = Settings::new(&yourls_url, &api_signature, *auto_copy);
            yourls_url.set(settings.yourls_url.clone());
            api_signature.set(settings.api_signature.clone());

            let status = status.clone();
            spawn_local(async move {
                match browser::save_settings(&settings).await {
                    Ok(()) => status.set(Status::ok(t(i18n::OPTIONS_STATUS_SAVED))),
                    Err(e) => status.set(Status::error(e.to_string())),
                }
            });
        })
    };

    // Test connection: ask for host permission, then let the background script call the API
    let on_test = {
        let yourls_url = yourls_url.clone();
        let api_signature = api_signature.clone();
        let status = status.clone();
        let busy = busy.clone();

        Callback::from(move |_: MouseEvent| {
            let base = sanitize_base_url(&yourls_url);
            if base.is_empty() || api_signature.trim().is_empty() {
                status.set(Status::error(t(i18n::OPTIONS_STATUS_ENTER_URL_AND_TOKEN)));
                return;
            }

            let status = status.clone();
            let busy = busy.clone();
            spawn_local(async move {
                let origin = match origin_pattern(&base) {
                    Ok(origin) => origin,
                    Err(e) => {
                        status.set(Status::error(format!("{}{}", t(i18n::OPTIONS_STATUS_PERM_REQUEST_ERROR), e)));
                        return;
                    }
                };

                match browser::request_origin(&origin).await {
                    Ok(true) => {}
                    Ok(false) => {
                        status.set(Status::error(t(i18n::OPTIONS_STATUS_PERM_NOT_GRANTED)));
                        return;
                    }
                    Err(e) => {
                        status.set(Status::error(format!("{}{}", t(i18n::OPTIONS_STATUS_PERM_REQUEST_ERROR), e)));
                        return;
                    }
                }

                busy.set(true);
                let result = browser::send_request(&Request::CheckConnection).await;
                busy.set(false);

                match result {
                    Ok(response) if response.ok => {
                        let total = response.total.unwrap_or_else(|| "?".to_string());
                        status.set(Status::ok(t_with(i18n::OPTIONS_STATUS_CONN_OK, &[&total])));
                    }
                    Ok(response) => {
                        status.set(Status::error(response.reason_or(&t(i18n::OPTIONS_STATUS_CONN_FAILED))));
                    }
                    Err(e) => status.set(Status::error(e.to_string())),
                }
            });
        })
    };

    // Remove host permission handler
    let on_remove_permission = {
        let yourls_url = yourls_url.clone();
        let status = status.clone();

        Callback::from(move |_: MouseEvent| {
            let base = sanitize_base_url(&yourls_url);
            if base.is_empty() {
                status.set(Status::error(t(i18n::OPTIONS_STATUS_ENTER_URL_TO_REMOVE)));
                return;
            }

            let status = status.clone();
            spawn_local(async move {
                let removed = match origin_pattern(&base) {
                    Ok(origin) => browser::remove_origin(&origin).await,
                    Err(e) => Err(e),
                };
                match removed {
                    Ok(_) => status.set(Status::ok(t(i18n::OPTIONS_STATUS_PERM_REMOVED))),
                    Err(e) => status.set(Status::error(format!(
                        "{}{}",
                        t(i18n::OPTIONS_STATUS_PERM_REMOVE_ERROR),
                        e
                    ))),
                }
            });
        })
    };

    html! {
        <div class="container">
            <h1 class="main-title">{t_with(i18n::OPTIONS_TITLE, &[&t(i18n::EXTENSION_NAME)])}</h1>

            <div class="flex-column-gap">
                <TextField
                    label={t(i18n::OPTIONS_LABEL_URL)}
                    value={(*yourls_url).clone()}
                    on_change={setter(&yourls_url)}
                    placeholder={"https://sho.rt"}
                />
                <TextField
                    label={t(i18n::OPTIONS_LABEL_SIGNATURE)}
                    value={(*api_signature).clone()}
                    on_change={setter(&api_signature)}
                    input_type={"password"}
                />
                <label class="field checkbox-field">
                    <input type="checkbox" checked={*auto_copy} onchange={on_auto_copy} />
                    <span class="field-label">{t(i18n::OPTIONS_LABEL_AUTO_COPY)}</span>
                </label>

                <div class="button-row">
                    <Button onclick={on_save} variant={ButtonVariant::Primary}>
                        {t(i18n::OPTIONS_BTN_SAVE)}
                    </Button>
                    <Button onclick={on_test} disabled={*busy} variant={ButtonVariant::Secondary}>
                        {t(i18n::OPTIONS_BTN_TEST)}
                    </Button>
                    <Button onclick={on_remove_permission} variant={ButtonVariant::Danger}>
                        {t(i18n::OPTIONS_BTN_REMOVE_PERMISSION)}
                    </Button>
                </div>

                if *busy {
                    <Spinner />
                }
                <StatusLine status={(*status).clone()} />
            </div>
        </div>
    }
}
