use std::rc::Rc;

use tracing::{info, warn};
use web_sys::HtmlInputElement;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api;
use crate::config::ClientConfig;
use crate::types::AuthSession;

const LOGIN_FAILED: &str = "Login failed. Please try again.";

/// Cheap shape check before bothering the server.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && !email.contains(char::is_whitespace)
                && domain
                    .split_once('.')
                    .map(|(host, tld)| !host.is_empty() && !tld.is_empty())
                    .unwrap_or(false)
        }
        None => false,
    }
}

/// Accounts are keyed by lowercase address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Returns the message to show, or `None` when the form may be sent.
pub fn validate_login(email: &str, password: &str) -> Option<&'static str> {
    if email.trim().is_empty() || password.is_empty() {
        Some("Email and password are required")
    } else if !is_valid_email(email) {
        Some("Invalid email format")
    } else {
        None
    }
}

#[derive(Properties, PartialEq)]
pub struct LoginFormProps {
    pub config: Rc<ClientConfig>,
    pub on_login: Callback<AuthSession>,
}

#[function_component(LoginForm)]
pub fn login_form(props: &LoginFormProps) -> Html {
    let email = use_state(String::new);
    let password = use_state(String::new);
    let error = use_state(|| None::<String>);
    let submitting = use_state(|| false);

    let on_email = {
        let email = email.clone();
        Callback::from(move |event: InputEvent| {
            email.set(event.target_unchecked_into::<HtmlInputElement>().value());
        })
    };

    let on_password = {
        let password = password.clone();
        Callback::from(move |event: InputEvent| {
            password.set(event.target_unchecked_into::<HtmlInputElement>().value());
        })
    };

    let on_submit = {
        let email = email.clone();
        let password = password.clone();
        let error = error.clone();
        let submitting = submitting.clone();
        let config = props.config.clone();
        let on_login = props.on_login.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            if *submitting {
                return;
            }
            if let Some(msg) = validate_login(&email, &password) {
                error.set(Some(msg.to_string()));
                return;
            }

            let email = normalize_email(&email);
            let password = (*password).clone();
            let error = error.clone();
            let submitting = submitting.clone();
            let config = config.clone();
            let on_login = on_login.clone();
            submitting.set(true);
            error.set(None);

            spawn_local(async move {
                match api::login(&config.login_url(), &email, &password).await {
                    Ok(session) => {
                        info!("logged in");
                        submitting.set(false);
                        on_login.emit(session);
                    }
                    Err(e) => {
                        warn!(error = %e, "login failed");
                        error.set(Some(e.message_or(LOGIN_FAILED)));
                        submitting.set(false);
                    }
                }
            });
        })
    };

    html! {
        <div style="display:flex; height:100vh; align-items:center; justify-content:center; background:#f8f9fa; font-family:Arial,sans-serif;">
            <form onsubmit={on_submit} style="width:360px; padding:2em; background:white; border-radius:12px; box-shadow:0 4px 16px rgba(0,0,0,0.08); display:flex; flex-direction:column; gap:1em;">
                <h1 style="margin:0; font-size:1.4em; color:#2d3436;">{ "Employee Self Service" }</h1>
                <div style="color:#636e72; font-size:0.9em;">{ "Sign in to chat with your HR assistant" }</div>

                <div style="display:flex; flex-direction:column; gap:0.5em;">
                    <label style="font-weight:bold; color:#555;">{ "Email:" }</label>
                    <input type="email" value={(*email).clone()} oninput={on_email} style="padding:0.6em; border:1px solid #ccc; border-radius:4px;" />
                </div>
                <div style="display:flex; flex-direction:column; gap:0.5em;">
                    <label style="font-weight:bold; color:#555;">{ "Password:" }</label>
                    <input type="password" value={(*password).clone()} oninput={on_password} style="padding:0.6em; border:1px solid #ccc; border-radius:4px;" />
                </div>

                { if let Some(msg) = &*error {
                    html! {
                        <div style="padding:0.75em; background:#f8d7da; border:1px solid #f5c6cb; border-radius:4px; color:#721c24; font-size:0.9em;">
                            { msg }
                        </div>
                    }
                } else {
                    html! {}
                }}

                <button
                    type="submit"
                    disabled={*submitting}
                    style={format!(
                        "padding:0.7em 0; font-size:1em; border:none; border-radius:4px; {}",
                        if *submitting { "background:#ccc; cursor:not-allowed;" } else { "background:#6c5ce7; color:white; cursor:pointer;" }
                    )}
                >
                    { if *submitting { "Signing in..." } else { "Sign In" } }
                </button>
            </form>
        </div>
    }
}
