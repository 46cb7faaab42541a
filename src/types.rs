use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One message in the transcript. Never mutated after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    pub timestamp: String, // Display-formatted local time
}

impl Turn {
    pub fn user(content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: timestamp.into(),
        }
    }

    pub fn assistant(content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: timestamp.into(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

/// Opaque bearer token handed out by the login endpoint.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

// Tokens stay out of logs and panic messages.
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(..)")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct UserIdentity {
    #[serde(default)]
    pub email: String,
}

impl UserIdentity {
    /// Avatar letter: first character of the email, uppercased, or `U`.
    pub fn initial(&self) -> String {
        self.email
            .trim()
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_else(|| "U".to_string())
    }
}

/// What the auth gate hands to the chat view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthSession {
    pub credential: Credential,
    pub user: UserIdentity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Deserialize)]
pub struct LoginReply {
    pub access_token: Credential,
    pub user: UserIdentity,
}

/// Error payload the backend attaches to failed responses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}
