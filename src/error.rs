use thiserror::Error;
use wasm_bindgen::JsValue;

pub const GENERIC_CHAT_FAILURE: &str = "Error sending message";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("transport: {0}")]
    Transport(String),
    #[error("server returned {status}")]
    Server { status: u16, message: Option<String> },
    #[error("encode: {0}")]
    Encode(String),
    #[error("decode: {0}")]
    Decode(String),
}

impl ChatError {
    /// Text shown to the user for a failed chat exchange.
    pub fn display_message(&self) -> String {
        self.message_or(GENERIC_CHAT_FAILURE)
    }

    /// The server's `error` payload when there was one, `generic` otherwise.
    pub fn message_or(&self, generic: &str) -> String {
        match self {
            ChatError::Server {
                message: Some(msg), ..
            } if !msg.trim().is_empty() => msg.clone(),
            _ => generic.to_string(),
        }
    }
}

impl From<JsValue> for ChatError {
    fn from(value: JsValue) -> Self {
        let detail = value.as_string().unwrap_or_else(|| format!("{:?}", value));
        ChatError::Transport(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_payload_is_surfaced() {
        let err = ChatError::Server {
            status: 401,
            message: Some("Invalid or expired token".to_string()),
        };
        assert_eq!(err.display_message(), "Invalid or expired token");
    }

    #[test]
    fn test_generic_message_without_payload() {
        let err = ChatError::Server {
            status: 500,
            message: None,
        };
        assert_eq!(err.display_message(), GENERIC_CHAT_FAILURE);
        assert_eq!(
            ChatError::Transport("offline".to_string()).display_message(),
            GENERIC_CHAT_FAILURE
        );
        assert_eq!(
            ChatError::Decode("missing field".to_string()).message_or("Login failed"),
            "Login failed"
        );
    }

    #[test]
    fn test_encode_failure_is_not_a_decode_failure() {
        let err = ChatError::Encode("key must be a string".to_string());
        assert_eq!(err.to_string(), "encode: key must be a string");
        assert_eq!(err.display_message(), GENERIC_CHAT_FAILURE);
    }
}
