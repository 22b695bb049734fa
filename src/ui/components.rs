/// Reusable UI components

use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(PartialEq, Clone, Copy, Default)]
pub enum StatusKind {
    #[default]
    Info,
    Ok,
    Error,
}

/// One line of feedback under a form
#[derive(Clone, PartialEq, Default)]
pub struct Status {
    pub text: String,
    pub kind: StatusKind,
}

impl Status {
    pub fn info(text: impl Into<String>) -> Status {
        Status { text: text.into(), kind: StatusKind::Info }
    }

    pub fn ok(text: impl Into<String>) -> Status {
        Status { text: text.into(), kind: StatusKind::Ok }
    }

    pub fn error(text: impl Into<String>) -> Status {
        Status { text: text.into(), kind: StatusKind::Error }
    }
}

#[derive(Properties, PartialEq)]
pub struct StatusLineProps {
    pub status: Status,
}

#[function_component(StatusLine)]
pub fn status_line(props: &StatusLineProps) -> Html {
    let modifier = match props.status.kind {
        StatusKind::Info => None,
        StatusKind::Ok => Some("ok"),
        StatusKind::Error => Some("error"),
    };

    html! {
        <p class={classes!("info", modifier)} role="status">
            {props.status.text.clone()}
        </p>
    }
}

#[derive(Properties, PartialEq)]
pub struct TextFieldProps {
    pub label: String,
    pub value: String,
    pub on_change: Callback<String>,
    #[prop_or_default]
    pub placeholder: String,
    #[prop_or(false)]
    pub disabled: bool,
    #[prop_or_else(|| "text".to_string())]
    pub input_type: String,
}

/// Labelled text input reporting its value on every keystroke
#[function_component(TextField)]
pub fn text_field(props: &TextFieldProps) -> Html {
    let oninput = {
        let on_change = props.on_change.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                on_change.emit(input.value());
            }
        })
    };

    html! {
        <label class="field">
            <span class="field-label">{props.label.clone()}</span>
            <input
                type={props.input_type.clone()}
                class="field-input"
                value={props.value.clone()}
                placeholder={props.placeholder.clone()}
                disabled={props.disabled}
                {oninput}
            />
        </label>
    }
}

/// Callback that stores the emitted value in a state handle
pub fn setter<T: 'static>(handle: &UseStateHandle<T>) -> Callback<T> {
    let handle = handle.clone();
    Callback::from(move |value: T| handle.set(value))
}
