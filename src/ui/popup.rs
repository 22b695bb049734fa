/// Popup UI: shorten the current page, inspect or delete an existing short link

use crate::browser::{self, BrowserSettings, t, t_with};
use crate::i18n;
use crate::keyword::is_http_url;
use crate::messages::Request;
use crate::outcome::{LinkSummary, UNKNOWN};
use crate::prefill::Prefill;
use crate::qr::{qr_filename, qr_png, qr_svg};
use crate::settings::SettingsProvider;
use crate::ui::components::{Status, StatusLine, TextField, setter};
use patternfly_yew::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

/// How long the delete button waits for the confirming second click
const CONFIRM_DELETE_MS: i32 = 4000;

#[derive(Clone, PartialEq)]
enum PopupState {
    Loading,
    SetupNeeded,
    Ready,
}

/// State handles shared by the async handlers
#[derive(Clone)]
struct PopupFields {
    long_url: UseStateHandle<String>,
    keyword: UseStateHandle<String>,
    title: UseStateHandle<String>,
    short_url: UseStateHandle<String>,
    stats_input: UseStateHandle<String>,
    locked: UseStateHandle<bool>,
    show_result: UseStateHandle<bool>,
    status: UseStateHandle<Status>,
    busy: UseStateHandle<bool>,
    details: UseStateHandle<Option<String>>,
    show_details: UseStateHandle<bool>,
    qr_svg: UseStateHandle<Option<String>>,
}

impl PopupFields {
    /// Stats input first, then the short URL field
    fn lookup_value(&self) -> String {
        let stats = self.stats_input.trim();
        if stats.is_empty() {
            self.short_url.trim().to_string()
        } else {
            stats.to_string()
        }
    }

    /// An existing short link was opened: show it and disable the shorten form
    fn show_existing(&self, url: &str) {
        self.show_result.set(true);
        self.short_url.set(url.to_string());
        self.stats_input.set(url.to_string());
        self.long_url.set("Loading...".to_string());
        self.locked.set(true);
        self.status.set(Status::ok(t(i18n::POPUP_INFO_AUTO_STATS)));
    }

    fn clear_result(&self) {
        self.short_url.set(String::new());
        self.stats_input.set(String::new());
        self.show_result.set(false);
        self.details.set(None);
        self.show_details.set(false);
        self.qr_svg.set(None);
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_state(|| PopupState::Loading);
    let auto_copy = use_state(|| false);
    let confirm_delete = use_state(|| false);
    let fields = PopupFields {
        long_url: use_state(String::new),
        keyword: use_state(String::new),
        title: use_state(String::new),
        short_url: use_state(String::new),
        stats_input: use_state(String::new),
        locked: use_state(|| false),
        show_result: use_state(|| false),
        status: use_state(Status::default),
        busy: use_state(|| false),
        details: use_state(|| None::<String>),
        show_details: use_state(|| false),
        qr_svg: use_state(|| None::<String>),
    };

    // Load settings and any prefilled URL on mount
    {
        let state = state.clone();
        let auto_copy = auto_copy.clone();
        let fields = fields.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                let settings = BrowserSettings.load().await.unwrap_or_default();
                if !settings.is_configured() {
                    state.set(PopupState::SetupNeeded);
                    return;
                }
                auto_copy.set(settings.auto_copy);

                let stored = browser::load_prefill().await.unwrap_or_default();
                let active_tab = browser::active_tab_url().await;
                let prefill = stored.resolve(&settings.base_url(), active_tab.as_deref());
                if let Err(e) = browser::clear_prefill().await {
                    log::warn!("Could not clear prefill: {}", e);
                }

                state.set(PopupState::Ready);
                fields.status.set(Status::info(t(i18n::POPUP_STATUS_READY)));

                match prefill {
                    Some(Prefill::Short(url)) => {
                        fields.show_existing(&url);
                        fetch_stats(fields, url, true).await;
                    }
                    Some(Prefill::Long(url)) => fields.long_url.set(url),
                    None => {}
                }
            });
            || ()
        });
    }

    // Shorten handler
    let on_shorten = {
        let fields = fields.clone();
        let auto_copy = auto_copy.clone();

        Callback::from(move |_: MouseEvent| {
            let url = fields.long_url.trim().to_string();
            if !is_http_url(&url) {
                fields.status.set(Status::error(t(i18n::POPUP_ERROR_INVALID_URL)));
                return;
            }

            let request = Request::ShortenUrl {
                long_url: url,
                keyword: fields.keyword.trim().to_string(),
                title: fields.title.trim().to_string(),
            };
            let fields = fields.clone();
            let auto_copy = *auto_copy;

            fields.status.set(Status::info(t(i18n::POPUP_STATUS_SHORTENING)));
            fields.show_details.set(false);
            fields.busy.set(true);

            spawn_local(async move {
                let result = browser::send_request(&request).await;
                fields.busy.set(false);

                match result {
                    Ok(response) if response.ok => {
                        let short = response.short_url.clone().unwrap_or_default();
                        fields.qr_svg.set(None);
                        fields.show_result.set(true);
                        fields.short_url.set(short.clone());
                        fields.stats_input.set(short.clone());

                        let key = if response.already == Some(true) {
                            i18n::POPUP_INFO_ALREADY_SHORTENED
                        } else {
                            i18n::POPUP_STATUS_CREATED
                        };
                        fields.status.set(Status::ok(t(key)));

                        if auto_copy && !short.is_empty() {
                            if let Err(e) = browser::copy_text(&short).await {
                                log::warn!("Auto-copy failed: {}", e);
                                fields.status.set(Status::error(t(i18n::POPUP_ERROR_COPY_FAILED)));
                            }
                        }
                    }
                    Ok(response) => {
                        fields.status.set(Status::error(response.reason_or(&t(i18n::ERROR_SHORTEN_FAILED))));
                    }
                    Err(e) => {
                        fields.status.set(Status::error(e.to_string()));
                    }
                }
            });
        })
    };

    // Copy & close handler
    let on_copy_close = {
        let fields = fields.clone();

        Callback::from(move |_: MouseEvent| {
            let value = fields.short_url.trim().to_string();
            if value.is_empty() {
                return;
            }
            let status = fields.status.clone();
            spawn_local(async move {
                match browser::copy_text(&value).await {
                    Ok(()) => browser::close_window(),
                    Err(_) => status.set(Status::error(t(i18n::POPUP_ERROR_COPY_FAILED))),
                }
            });
        })
    };

    // QR preview toggle
    let on_qr = {
        let fields = fields.clone();

        Callback::from(move |_: MouseEvent| {
            if fields.qr_svg.is_some() {
                fields.qr_svg.set(None);
                return;
            }
            let value = fields.short_url.trim().to_string();
            if value.is_empty() {
                return;
            }
            match qr_svg(&value) {
                Ok(svg) => fields.qr_svg.set(Some(svg)),
                Err(e) => {
                    log::warn!("QR preview failed: {}", e);
                    fields.status.set(Status::error(t(i18n::POPUP_ERROR_QR_FAILED)));
                }
            }
        })
    };

    // Download the QR code as PNG
    let on_download_qr = {
        let fields = fields.clone();

        Callback::from(move |_: MouseEvent| {
            let value = fields.short_url.trim().to_string();
            if value.is_empty() {
                return;
            }
            match qr_png(&value) {
                Ok(png) => browser::download(&qr_filename(&fields.keyword, &value), &png, "image/png"),
                Err(e) => {
                    log::warn!("QR download failed: {}", e);
                    fields.status.set(Status::error(t(i18n::POPUP_ERROR_QR_FAILED)));
                }
            }
        })
    };

    // Stats handler
    let on_stats = {
        let fields = fields.clone();

        Callback::from(move |_: MouseEvent| {
            let query = fields.lookup_value();
            if query.is_empty() {
                fields.status.set(Status::error(t(i18n::POPUP_ERROR_ENTER_URL_FOR_STATS)));
                return;
            }
            let fields = fields.clone();
            let fill_long = *fields.locked;
            spawn_local(async move {
                fetch_stats(fields, query, fill_long).await;
            });
        })
    };

    // Toggle raw JSON details
    let on_details = {
        let show_details = fields.show_details.clone();
        Callback::from(move |_: MouseEvent| {
            show_details.set(!*show_details);
        })
    };

    // Delete handler: first click arms, second click deletes
    let on_delete = {
        let fields = fields.clone();
        let confirm_delete = confirm_delete.clone();

        Callback::from(move |_: MouseEvent| {
            let value = fields.lookup_value();
            if value.is_empty() {
                fields.status.set(Status::error(t(i18n::POPUP_ERROR_PROVIDE_URL_TO_DELETE)));
                return;
            }

            if !*confirm_delete {
                confirm_delete.set(true);
                reset_after(confirm_delete.clone(), CONFIRM_DELETE_MS);
                return;
            }

            confirm_delete.set(false);
            fields.status.set(Status::info(t(i18n::POPUP_STATUS_DELETING)));
            fields.busy.set(true);

            let fields = fields.clone();
            spawn_local(async move {
                let result = browser::send_request(&Request::DeleteShortUrl { short_url: value }).await;
                fields.busy.set(false);

                match result {
                    Ok(response) if response.ok => {
                        fields.status.set(Status::ok(t(i18n::POPUP_STATUS_DELETED)));
                        fields.clear_result();
                    }
                    Ok(response) => {
                        fields.status.set(Status::error(response.reason_or(&t(i18n::ERROR_DELETE_FAILED))));
                    }
                    Err(e) => {
                        fields.status.set(Status::error(e.to_string()));
                    }
                }
            });
        })
    };

    let on_open_settings = Callback::from(|e: MouseEvent| {
        e.prevent_default();
        browser::open_options_page();
        browser::close_window();
    });

    let is_busy = *fields.busy;
    let locked = *fields.locked;

    let main_content = html! {
        <div class="flex-column-gap">
            <TextField
                label={t(i18n::POPUP_LABEL_LONG_URL)}
                value={(*fields.long_url).clone()}
                on_change={setter(&fields.long_url)}
                placeholder={"https://..."}
                disabled={locked}
            />
            <TextField
                label={t(i18n::POPUP_LABEL_KEYWORD)}
                value={(*fields.keyword).clone()}
                on_change={setter(&fields.keyword)}
                disabled={locked}
            />
            <TextField
                label={t(i18n::POPUP_LABEL_TITLE)}
                value={(*fields.title).clone()}
                on_change={setter(&fields.title)}
                disabled={locked}
            />
            <Button onclick={on_shorten} disabled={is_busy || locked} variant={ButtonVariant::Primary} block={true}>
                {t(i18n::POPUP_BTN_SHORTEN)}
            </Button>

            if *fields.show_result {
                <div class="result-area">
                    <TextField
                        label={t(i18n::POPUP_LABEL_SHORT_URL)}
                        value={(*fields.short_url).clone()}
                        on_change={setter(&fields.short_url)}
                    />
                    <div class="button-row">
                        <Button onclick={on_copy_close} disabled={fields.short_url.is_empty()} variant={ButtonVariant::Secondary}>
                            {t(i18n::POPUP_BTN_COPY_CLOSE)}
                        </Button>
                        <Button onclick={on_qr} disabled={fields.short_url.is_empty()} variant={ButtonVariant::Secondary}>
                            {t(if fields.qr_svg.is_some() { i18n::POPUP_BTN_HIDE_QR_CODE } else { i18n::POPUP_BTN_QR_CODE })}
                        </Button>
                        if fields.qr_svg.is_some() {
                            <Button onclick={on_download_qr} variant={ButtonVariant::Link}>
                                {t(i18n::POPUP_BTN_DOWNLOAD_QR)}
                            </Button>
                        }
                    </div>
                    if let Some(svg) = (*fields.qr_svg).clone() {
                        <div class="qrcode-display">
                            {Html::from_html_unchecked(AttrValue::from(svg))}
                        </div>
                    }
                </div>
            }

            <div class="stats-area">
                <TextField
                    label={t(i18n::POPUP_LABEL_STATS_INPUT)}
                    value={(*fields.stats_input).clone()}
                    on_change={setter(&fields.stats_input)}
                />
                <div class="button-row">
                    <Button onclick={on_stats} disabled={is_busy} variant={ButtonVariant::Secondary}>
                        {t(i18n::POPUP_BTN_STATS)}
                    </Button>
                    if fields.details.is_some() {
                        <Button onclick={on_details} variant={ButtonVariant::Link}>
                            {t(if *fields.show_details { i18n::POPUP_BTN_HIDE_DETAILS } else { i18n::POPUP_BTN_DETAILS })}
                        </Button>
                    }
                    <Button
                        onclick={on_delete}
                        disabled={is_busy || (fields.short_url.is_empty() && fields.stats_input.is_empty())}
                        variant={ButtonVariant::Danger}
                    >
                        {if *confirm_delete { t(i18n::POPUP_BTN_CONFIRM_DELETE) } else { t(i18n::POPUP_BTN_DELETE) }}
                    </Button>
                </div>
            </div>

            if is_busy {
                <Spinner />
            }
            <StatusLine status={(*fields.status).clone()} />

            if *fields.show_details {
                if let Some(json) = (*fields.details).clone() {
                    <pre class="json">{json}</pre>
                }
            }
        </div>
    };

    html! {
        <div class="padding-20">
            <div class="popup-header">
                <h1 class="popup-title">{t(i18n::EXTENSION_NAME)}</h1>
                <a href="#" class="settings-link" title={t(i18n::POPUP_LINK_SETTINGS)} onclick={on_open_settings.clone()}>{"⚙"}</a>
            </div>

            {match &*state {
                PopupState::Loading => html! {
                    <div class="loading-text-center">
                        <Spinner />
                    </div>
                },
                PopupState::SetupNeeded => html! {
                    <div class="setup-message">
                        <Alert r#type={AlertType::Info} title={t(i18n::POPUP_SETUP_NEEDED)} inline={true}>
                        </Alert>
                        <Button onclick={on_open_settings} variant={ButtonVariant::Primary} block={true}>
                            {t(i18n::POPUP_BTN_OPEN_SETTINGS)}
                        </Button>
                    </div>
                },
                PopupState::Ready => main_content,
            }}
        </div>
    }
}

// Helper functions

async fn fetch_stats(fields: PopupFields, query: String, fill_long: bool) {
    fields.status.set(Status::info(t(i18n::POPUP_STATUS_FETCHING_STATS)));
    fields.details.set(None);
    fields.show_details.set(false);
    fields.busy.set(true);

    let result = browser::send_request(&Request::GetStats { short_url: query }).await;
    fields.busy.set(false);

    match result {
        Ok(response) if response.ok => {
            let data = response.data.unwrap_or(serde_json::Value::Null);
            let summary = LinkSummary::from_stats(&data);
            let line = t_with(
                i18n::POPUP_STATUS_STATS_RESULT,
                &[
                    summary.short_url.as_deref().unwrap_or(UNKNOWN),
                    summary.url.as_deref().unwrap_or(UNKNOWN),
                    summary.clicks.as_deref().unwrap_or(UNKNOWN),
                ],
            );
            fields.status.set(Status::ok(line));

            if fill_long {
                if let Some(url) = summary.url {
                    fields.long_url.set(url);
                }
            }
            fields.details.set(serde_json::to_string_pretty(&data).ok());
        }
        Ok(response) => {
            fields.status.set(Status::error(response.reason_or(&t(i18n::ERROR_STATS_FAILED))));
        }
        Err(e) => {
            fields.status.set(Status::error(e.to_string()));
        }
    }
}

/// Clear a flag after `millis`
fn reset_after(flag: UseStateHandle<bool>, millis: i32) {
    let reset = Closure::once_into_js(move || flag.set(false));
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(reset.unchecked_ref(), millis) {
            log::warn!("setTimeout failed: {:?}", e);
        }
    }
}
