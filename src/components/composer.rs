use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ComposerProps {
    pub value: String,
    pub pending: bool,
    pub on_input: Callback<String>,
    pub on_send: Callback<()>,
}

pub fn can_send(value: &str, pending: bool) -> bool {
    !pending && !value.trim().is_empty()
}

/// Plain Enter sends. Shift+Enter and Enter that commits an IME
/// composition do not.
pub fn is_send_key(key: &str, shift: bool, composing: bool) -> bool {
    key == "Enter" && !shift && !composing
}

#[function_component(Composer)]
pub fn composer(props: &ComposerProps) -> Html {
    let enabled = can_send(&props.value, props.pending);

    let oninput = {
        let on_input = props.on_input.clone();
        Callback::from(move |event: InputEvent| {
            let target = event.target_unchecked_into::<HtmlInputElement>();
            on_input.emit(target.value());
        })
    };

    let onkeydown = {
        let on_send = props.on_send.clone();
        Callback::from(move |event: KeyboardEvent| {
            if is_send_key(&event.key(), event.shift_key(), event.is_composing()) {
                event.prevent_default();
                on_send.emit(());
            }
        })
    };

    let onclick = {
        let on_send = props.on_send.clone();
        Callback::from(move |_: MouseEvent| on_send.emit(()))
    };

    html! {
        <div style="border-top:1px solid #f1f3f4; max-width:900px; width:100%; margin:0 auto; padding:1.5em 3em; box-sizing:border-box;">
            <div style="display:flex; align-items:center; gap:0.5em;">
                <input
                    type="text"
                    placeholder="Message to Employee Self Service Bot..."
                    value={props.value.clone()}
                    disabled={props.pending}
                    {oninput}
                    {onkeydown}
                    style="flex:1; padding:0.9em 1.2em; border:none; border-radius:24px; background:#f8f9fa; font-size:1em; outline:none;"
                />
                <button
                    {onclick}
                    disabled={!enabled}
                    style={format!(
                        "width:44px; height:44px; border:none; border-radius:50%; color:white; font-size:1.1em; {}",
                        if enabled { "background:#6c5ce7; cursor:pointer;" } else { "background:#ddd; cursor:not-allowed;" }
                    )}
                >
                    { "➤" }
                </button>
            </div>
        </div>
    }
}
