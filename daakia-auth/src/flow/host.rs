//! Capabilities the embedding application provides to the login flow.

/// Receives the messaging-server session once login completes.
pub trait SessionInstaller: Send + Sync {
    /// Called exactly once per successful login.
    fn on_session_established(&self, auth_token: &str, csrf_token: &str);
}

pub trait Navigator: Send + Sync {
    /// Leave the login screen without changing the flow.
    fn pop_screen(&self);
}
