use std::rc::Rc;

use tracing::debug;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api::FetchTransport;
use crate::chat::TurnSequencer;
use crate::components::{dismisses, Composer, Notice, Toast, TranscriptView};
use crate::config::ClientConfig;
use crate::session::{BrowserSessionStorage, SessionIdProvider, SessionStorage};
use crate::types::AuthSession;

type BrowserSequencer = TurnSequencer<FetchTransport, Rc<dyn SessionStorage>>;

#[derive(Properties, PartialEq)]
pub struct ChatInterfaceProps {
    pub session: Rc<AuthSession>,
    pub config: Rc<ClientConfig>,
}

/// Owns the sequencer for as long as it is mounted. Unmounting (logout)
/// drops the transcript with it.
#[function_component(ChatInterface)]
pub fn chat_interface(props: &ChatInterfaceProps) -> Html {
    let update = use_force_update();
    let input = use_state(String::new);
    let notice = use_state(|| None::<Notice>);
    let notice_counter = use_mut_ref(|| 0u32);

    let sequencer: Rc<BrowserSequencer> = {
        let notice = notice.clone();
        use_memo((props.session.clone(), props.config.clone()), move |(session, config)| {
            let storage: Rc<dyn SessionStorage> = Rc::new(BrowserSessionStorage::new());
            TurnSequencer::new(
                FetchTransport::new(config.chat_url()),
                SessionIdProvider::new(storage, config.session_storage_key.clone()),
                session.credential.clone(),
            )
            .on_change(Callback::from(move |_| update.force_update()))
            .on_failure(Callback::from(move |message: String| {
                let next = Notice::next(&mut notice_counter.borrow_mut(), message);
                notice.set(Some(next));
            }))
        })
    };

    let on_input = {
        let input = input.clone();
        Callback::from(move |value: String| input.set(value))
    };

    let on_send = {
        let sequencer = sequencer.clone();
        let input = input.clone();
        Callback::from(move |_: ()| {
            if let Some(admitted) = sequencer.admit(&input) {
                input.set(String::new());
                let sequencer = sequencer.clone();
                spawn_local(async move {
                    let outcome = sequencer.complete(admitted).await;
                    debug!(?outcome, "exchange finished");
                });
            }
        })
    };

    let on_dismiss = {
        let notice = notice.clone();
        Callback::from(move |id: u32| {
            if dismisses((*notice).as_ref(), id) {
                notice.set(None);
            }
        })
    };

    let pending = sequencer.is_pending();

    html! {
        <div style="height:100%; display:flex; flex-direction:column; background:white;">
            <TranscriptView turns={sequencer.transcript()} {pending} user={props.session.user.clone()} />
            <Composer value={(*input).clone()} {pending} {on_input} {on_send} />
            <Toast notice={(*notice).clone()} ttl={props.config.notification_ttl} {on_dismiss} />
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ChatPageProps {
    pub session: Rc<AuthSession>,
    pub config: Rc<ClientConfig>,
    pub on_logout: Callback<()>,
}

#[function_component(ChatPage)]
pub fn chat_page(props: &ChatPageProps) -> Html {
    let initial = props.session.user.initial();
    let on_logout = {
        let on_logout = props.on_logout.clone();
        Callback::from(move |_: MouseEvent| on_logout.emit(()))
    };

    html! {
        <div style="display:flex; height:100vh; background:#f8f9fa; overflow:hidden; font-family:Arial,sans-serif;">
            <div style="width:70px; background:white; display:flex; flex-direction:column; align-items:center; padding:1em 0; border-right:1px solid #f1f3f4; box-shadow:2px 0 8px rgba(0,0,0,0.04);">
                <div style="width:40px; height:40px; background:#6c5ce7; border-radius:12px; display:flex; align-items:center; justify-content:center; color:white; font-weight:bold; margin-bottom:1.5em;">
                    { "E" }
                </div>
                <div style="flex-grow:1;" />
                <div title={props.session.user.email.clone()} style="width:36px; height:36px; border-radius:50%; background:#00b894; color:white; display:flex; align-items:center; justify-content:center; font-size:14px; margin-bottom:1em;">
                    { initial }
                </div>
                <button
                    onclick={on_logout}
                    title="Log out"
                    style="width:44px; height:44px; border:none; border-radius:50%; background:none; color:#e17055; cursor:pointer; font-size:1.2em;"
                >
                    { "⎋" }
                </button>
            </div>
            <div style="flex:1; display:flex; flex-direction:column; background:white;">
                <div style="padding:1.5em; border-bottom:1px solid #f1f3f4; display:flex; align-items:center; gap:1em;">
                    <div style="width:40px; height:40px; border-radius:50%; background:#6c5ce7; color:white; display:flex; align-items:center; justify-content:center; font-size:13px;">
                        { "ESS" }
                    </div>
                    <div>
                        <div style="font-weight:600; color:#2d3436; font-size:18px;">{ "Employee Self Service Bot 🤖" }</div>
                        <div style="color:#74b9ff; font-size:13px;">{ "Hello! I'm your Personal HR Assistant" }</div>
                    </div>
                </div>
                <div style="flex:1; overflow:hidden;">
                    <ChatInterface session={props.session.clone()} config={props.config.clone()} />
                </div>
            </div>
        </div>
    }
}
