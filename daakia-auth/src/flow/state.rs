//! Login states and the pure transition function between them.

use crate::models::{sort_admin_first, IdentityToken, Organization, OtpChannel, OtpRequest};

/// Failure taxonomy carried on every notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Input rejected before any call was made.
    Validation,
    /// The backend answered with `success: 0` or without the expected data.
    Rejected,
    /// The request did not complete or the response could not be decoded.
    Transport,
    /// An action arrived in a state that no longer holds its inputs.
    SessionExpired,
    /// The messaging server refused or garbled the session exchange.
    HostExchange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: FailureKind,
    pub message: String,
}

impl Notice {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum LoginState {
    Credentials {
        notice: Option<Notice>,
    },
    OtpEntry {
        request: OtpRequest,
        notice: Option<Notice>,
    },
    OrganizationSelect {
        identity: IdentityToken,
        organizations: Vec<Organization>,
        notice: Option<Notice>,
    },
    Success,
    Error {
        kind: FailureKind,
        message: String,
    },
}

impl Default for LoginState {
    fn default() -> Self {
        LoginState::Credentials { notice: None }
    }
}

impl LoginState {
    pub fn name(&self) -> &'static str {
        match self {
            LoginState::Credentials { .. } => "credentials",
            LoginState::OtpEntry { .. } => "otp_entry",
            LoginState::OrganizationSelect { .. } => "organization_select",
            LoginState::Success => "success",
            LoginState::Error { .. } => "error",
        }
    }

    /// Inline message shown on the current screen.
    pub fn notice(&self) -> Option<&Notice> {
        match self {
            LoginState::Credentials { notice }
            | LoginState::OtpEntry { notice, .. }
            | LoginState::OrganizationSelect { notice, .. } => notice.as_ref(),
            LoginState::Success | LoginState::Error { .. } => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LoginState::Success | LoginState::Error { .. })
    }

    pub fn organizations(&self) -> &[Organization] {
        match self {
            LoginState::OrganizationSelect { organizations, .. } => organizations,
            _ => &[],
        }
    }
}

/// Outcome of one step, applied with [`next`].
#[derive(Debug)]
pub enum Event {
    OtpSent(OtpRequest),
    OtpResent {
        request_id: String,
        channel: OtpChannel,
    },
    Verified {
        identity: IdentityToken,
        organizations: Vec<Organization>,
    },
    SessionEstablished,
    /// Stay on the current screen with an inline message.
    Notice(Notice),
    /// Leave the flow with an error screen.
    Failed(Notice),
    SessionExpired(String),
    Restart,
}

/// Apply `event` to `state`.
///
/// Step outcomes only apply to the state that produced them; anything else
/// leaves the state as it was.
pub fn next(state: LoginState, event: Event) -> LoginState {
    match (state, event) {
        (_, Event::Restart) => LoginState::default(),
        (_, Event::SessionExpired(message)) => LoginState::Credentials {
            notice: Some(Notice::new(FailureKind::SessionExpired, message)),
        },
        (_, Event::Failed(notice)) => LoginState::Error {
            kind: notice.kind,
            message: notice.message,
        },

        (LoginState::Credentials { .. }, Event::OtpSent(request)) => LoginState::OtpEntry {
            request,
            notice: None,
        },

        (LoginState::OtpEntry { request, .. }, Event::OtpResent { request_id, channel }) => {
            LoginState::OtpEntry {
                request: OtpRequest {
                    request_id,
                    channel,
                    ..request
                },
                notice: None,
            }
        }

        (
            LoginState::OtpEntry { .. },
            Event::Verified {
                identity,
                mut organizations,
            },
        ) => {
            sort_admin_first(&mut organizations);
            LoginState::OrganizationSelect {
                identity,
                organizations,
                notice: None,
            }
        }

        (LoginState::OrganizationSelect { .. }, Event::SessionEstablished) => LoginState::Success,

        (LoginState::Credentials { .. }, Event::Notice(notice)) => LoginState::Credentials {
            notice: Some(notice),
        },
        (LoginState::OtpEntry { request, .. }, Event::Notice(notice)) => LoginState::OtpEntry {
            request,
            notice: Some(notice),
        },
        (
            LoginState::OrganizationSelect {
                identity,
                organizations,
                ..
            },
            Event::Notice(notice),
        ) => LoginState::OrganizationSelect {
            identity,
            organizations,
            notice: Some(notice),
        },

        (state, _) => state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OtpTarget;

    fn otp_entry() -> LoginState {
        LoginState::OtpEntry {
            request: OtpRequest {
                request_id: "abc123".to_string(),
                target: OtpTarget::email("user@example.com"),
                channel: OtpChannel::Email,
            },
            notice: None,
        }
    }

    fn org(id: i64, name: &str, role: &str) -> Organization {
        Organization {
            id: Some(id),
            name: Some(name.to_string()),
            role: Some(role.to_string()),
            is_active: Some(true),
        }
    }

    #[test]
    fn test_otp_sent_moves_to_code_entry() {
        let request = OtpRequest {
            request_id: "abc123".to_string(),
            target: OtpTarget::email("user@example.com"),
            channel: OtpChannel::Email,
        };
        let state = next(LoginState::default(), Event::OtpSent(request.clone()));

        match state {
            LoginState::OtpEntry { request: held, notice } => {
                assert_eq!(held, request);
                assert!(notice.is_none());
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_resend_replaces_request_id_and_clears_notice() {
        let with_notice = next(
            otp_entry(),
            Event::Notice(Notice::new(FailureKind::Rejected, "Invalid OTP")),
        );
        let state = next(
            with_notice,
            Event::OtpResent {
                request_id: "def456".to_string(),
                channel: OtpChannel::Email,
            },
        );

        match state {
            LoginState::OtpEntry { request, notice } => {
                assert_eq!(request.request_id, "def456");
                assert_eq!(request.target, OtpTarget::email("user@example.com"));
                assert!(notice.is_none());
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_verified_sorts_admins_first() {
        let state = next(
            otp_entry(),
            Event::Verified {
                identity: IdentityToken::new("tok_xyz"),
                organizations: vec![
                    org(1, "Beta", "member"),
                    org(2, "Acme", "admin"),
                    org(3, "Gamma", "member"),
                    org(4, "Delta", "Admin"),
                ],
            },
        );

        let ids: Vec<_> = state.organizations().iter().filter_map(|o| o.id).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
        assert_eq!(state.name(), "organization_select");
    }

    #[test]
    fn test_notice_keeps_screen() {
        let state = next(
            LoginState::default(),
            Event::Notice(Notice::new(FailureKind::Validation, "Please enter your email")),
        );
        assert_eq!(state.name(), "credentials");
        assert_eq!(state.notice().map(|n| n.kind), Some(FailureKind::Validation));
    }

    #[test]
    fn test_failed_leaves_flow() {
        let state = next(
            otp_entry(),
            Event::Failed(Notice::new(FailureKind::Rejected, "No corporate accounts found")),
        );
        match state {
            LoginState::Error { kind, message } => {
                assert_eq!(kind, FailureKind::Rejected);
                assert_eq!(message, "No corporate accounts found");
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_session_expired_and_restart_return_to_credentials() {
        let expired = next(otp_entry(), Event::SessionExpired("Session expired".to_string()));
        assert_eq!(expired.notice().map(|n| n.kind), Some(FailureKind::SessionExpired));

        let restarted = next(LoginState::Success, Event::Restart);
        assert_eq!(restarted.name(), "credentials");
        assert!(restarted.notice().is_none());
    }

    #[test]
    fn test_outcomes_for_other_states_are_ignored() {
        let state = next(
            LoginState::default(),
            Event::Verified {
                identity: IdentityToken::new("tok_xyz"),
                organizations: vec![org(7, "Acme", "admin")],
            },
        );
        assert_eq!(state.name(), "credentials");

        let state = next(otp_entry(), Event::SessionEstablished);
        assert_eq!(state.name(), "otp_entry");

        let state = next(
            LoginState::Success,
            Event::Notice(Notice::new(FailureKind::Validation, "ignored")),
        );
        assert!(state.is_terminal());
    }
}
