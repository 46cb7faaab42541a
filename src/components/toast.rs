use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use yew::platform::spawn_local;
use yew::platform::time::sleep;
use yew::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub id: u32,
    pub message: String,
}

impl Notice {
    /// Next notice off `counter`. Every call yields a fresh id, so a timer
    /// started for an older notice never matches a newer one.
    pub fn next(counter: &mut u32, message: impl Into<String>) -> Self {
        *counter = counter.wrapping_add(1);
        Self {
            id: *counter,
            message: message.into(),
        }
    }
}

/// Whether dismissing `id` clears what is currently shown.
pub fn dismisses(current: Option<&Notice>, id: u32) -> bool {
    current.map(|n| n.id) == Some(id)
}

#[derive(Properties, PartialEq)]
pub struct ToastProps {
    pub notice: Option<Notice>,
    pub ttl: Duration,
    pub on_dismiss: Callback<u32>,
}

/// Transient error banner. Dismisses itself after `ttl`; a newer notice
/// cancels the older one's timer.
#[function_component(Toast)]
pub fn toast(props: &ToastProps) -> Html {
    {
        let on_dismiss = props.on_dismiss.clone();
        let ttl = props.ttl;
        use_effect_with(props.notice.as_ref().map(|n| n.id), move |id| {
            let cancelled = Rc::new(Cell::new(false));
            if let Some(id) = *id {
                let cancelled = cancelled.clone();
                spawn_local(async move {
                    sleep(ttl).await;
                    if !cancelled.get() {
                        on_dismiss.emit(id);
                    }
                });
            }
            move || cancelled.set(true)
        });
    }

    let Some(notice) = &props.notice else {
        return html! {};
    };

    let onclick = {
        let on_dismiss = props.on_dismiss.clone();
        let id = notice.id;
        Callback::from(move |_: MouseEvent| on_dismiss.emit(id))
    };

    html! {
        <div style="position:fixed; bottom:2em; left:50%; transform:translateX(-50%); z-index:1000; padding:0.8em 1.2em; background:#f8d7da; border:1px solid #f5c6cb; border-radius:4px; display:flex; align-items:center; gap:1em; box-shadow:0 4px 12px rgba(0,0,0,0.15);">
            <strong style="color:#721c24;">{ "✗" }</strong>
            <span style="color:#721c24; font-size:0.9em;">{ &notice.message }</span>
            <button {onclick} style="background:none; border:none; color:#721c24; cursor:pointer; font-size:1.2em;">{ "×" }</button>
        </div>
    }
}
