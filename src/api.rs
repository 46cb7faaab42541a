use async_trait::async_trait;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::chat::ChatTransport;
use crate::error::ChatError;
use crate::types::{
    AuthSession, ChatReply, ChatRequest, Credential, ErrorBody, LoginReply, LoginRequest,
};

async fn post_json(
    url: &str,
    body: &str,
    credential: Option<&Credential>,
) -> Result<(u16, String), ChatError> {
    let headers = web_sys::Headers::new()?;
    headers.set("Content-Type", "application/json")?;
    if let Some(credential) = credential {
        headers.set("Authorization", &credential.authorization_header())?;
    }

    let opts = web_sys::RequestInit::new();
    opts.set_method("POST");
    opts.set_headers(&headers);
    opts.set_body(&JsValue::from_str(body));

    let request = web_sys::Request::new_with_str_and_init(url, &opts)?;
    let window = web_sys::window()
        .ok_or_else(|| ChatError::Transport("window not available".to_string()))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
    let resp: web_sys::Response = resp_value.dyn_into()?;
    let status = resp.status();
    let text = JsFuture::from(resp.text()?).await?;
    Ok((status, text.as_string().unwrap_or_default()))
}

fn encode_body<T: Serialize>(value: &T) -> Result<String, ChatError> {
    serde_json::to_string(value).map_err(|e| ChatError::Encode(e.to_string()))
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

fn server_error(status: u16, body: &str) -> ChatError {
    let message = serde_json::from_str::<ErrorBody>(body).ok().and_then(|b| b.error);
    ChatError::Server { status, message }
}

/// Maps a `/chat` response to the assistant's reply text.
pub fn read_chat_reply(status: u16, body: &str) -> Result<String, ChatError> {
    if !is_success(status) {
        return Err(server_error(status, body));
    }
    serde_json::from_str::<ChatReply>(body)
        .map(|reply| reply.response)
        .map_err(|e| ChatError::Decode(e.to_string()))
}

pub fn read_login_reply(status: u16, body: &str) -> Result<AuthSession, ChatError> {
    if !is_success(status) {
        return Err(server_error(status, body));
    }
    let reply: LoginReply =
        serde_json::from_str(body).map_err(|e| ChatError::Decode(e.to_string()))?;
    Ok(AuthSession {
        credential: reply.access_token,
        user: reply.user,
    })
}

/// `fetch`-backed transport for `POST {base}/chat`.
pub struct FetchTransport {
    chat_url: String,
}

impl FetchTransport {
    pub fn new(chat_url: impl Into<String>) -> Self {
        Self {
            chat_url: chat_url.into(),
        }
    }
}

#[async_trait(?Send)]
impl ChatTransport for FetchTransport {
    async fn send_turn(
        &self,
        request: &ChatRequest,
        credential: &Credential,
    ) -> Result<String, ChatError> {
        let body = encode_body(request)?;
        let (status, text) = post_json(&self.chat_url, &body, Some(credential)).await?;
        read_chat_reply(status, &text)
    }
}

pub async fn login(
    login_url: &str,
    email: &str,
    password: &str,
) -> Result<AuthSession, ChatError> {
    let body = encode_body(&LoginRequest { email, password })?;
    let (status, text) = post_json(login_url, &body, None).await?;
    read_login_reply(status, &text)
}
