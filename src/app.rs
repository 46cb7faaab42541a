use std::rc::Rc;

use tracing::info;
use yew::prelude::*;

use crate::components::{ChatPage, LoginForm};
use crate::config::ClientConfig;
use crate::session::{BrowserSessionStorage, SessionIdProvider};
use crate::types::AuthSession;

/// Auth gate: the login form until a session exists, the chat page after.
#[function_component(App)]
pub fn app(_props: &()) -> Html {
    let config = use_memo((), |_| ClientConfig::from_env());
    let session = use_state(|| None::<Rc<AuthSession>>);

    let on_login = {
        let session = session.clone();
        Callback::from(move |auth: AuthSession| {
            session.set(Some(Rc::new(auth)));
        })
    };

    let on_logout = {
        let session = session.clone();
        let config = config.clone();
        Callback::from(move |_: ()| {
            let key = config.session_storage_key.clone();
            let cleared = SessionIdProvider::new(BrowserSessionStorage::new(), key).clear();
            session.set(None);
            info!(cleared, "logged out");
        })
    };

    match &*session {
        Some(auth) => html! {
            <ChatPage session={auth.clone()} config={config.clone()} {on_logout} />
        },
        None => html! {
            <LoginForm config={config.clone()} {on_login} />
        },
    }
}
