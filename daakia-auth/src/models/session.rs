//! Tokens produced along the login chain. All of them are secrets: their
//! `Debug` output is redacted and they are never logged.

use secrecy::{ExposeSecret, Secret};

/// Bearer token for a verified identity, issued by `verify/otp`.
#[derive(Debug, Clone)]
pub struct IdentityToken(Secret<String>);

impl IdentityToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Secret::new(token.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

/// Organization-scoped token that the messaging server trades for a session.
#[derive(Debug, Clone)]
pub struct ServerToken(Secret<String>);

impl ServerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Secret::new(token.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

/// Messaging-server session: auth token plus anti-forgery token.
#[derive(Debug, Clone)]
pub struct SessionCredentials {
    auth_token: Secret<String>,
    csrf_token: Secret<String>,
}

impl SessionCredentials {
    /// Both tokens must be present and non-empty.
    pub fn new(auth_token: &str, csrf_token: &str) -> Option<Self> {
        if auth_token.is_empty() || csrf_token.is_empty() {
            return None;
        }
        Some(Self {
            auth_token: Secret::new(auth_token.to_string()),
            csrf_token: Secret::new(csrf_token.to_string()),
        })
    }

    pub fn auth_token(&self) -> &str {
        self.auth_token.expose_secret()
    }

    pub fn csrf_token(&self) -> &str {
        self.csrf_token.expose_secret()
    }
}
