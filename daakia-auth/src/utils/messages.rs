//! User-facing messages of the login flow.
//!
//! Each message has a stable translation id and an English default. Hosts
//! that localize inject their own [`MessageCatalog`].

use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageId {
    EmailRequired,
    EmailInvalid,
    MobileRequired,
    SendOtpFailed,
    OtpInvalid,
    SessionExpired,
    GenericError,
    NoCorporateAccounts,
    TokenGenerationFailed,
    ServerLoginFailed,
    InvalidServerResponse,
    OrganizationNotFound,
}

impl MessageId {
    pub fn id(&self) -> &'static str {
        match self {
            MessageId::EmailRequired => "mobile.login.email_required",
            MessageId::EmailInvalid => "mobile.login.email_invalid",
            MessageId::MobileRequired => "mobile.login.mobile_required",
            MessageId::SendOtpFailed => "mobile.login.send_otp_failed",
            MessageId::OtpInvalid => "mobile.login.otp_invalid",
            MessageId::SessionExpired => "mobile.login.session_expired",
            MessageId::GenericError => "mobile.login.generic_error",
            MessageId::NoCorporateAccounts => "mobile.login.no_corporate_accounts",
            MessageId::TokenGenerationFailed => "mobile.login.token_generation_failed",
            MessageId::ServerLoginFailed => "mobile.login.server_login_failed",
            MessageId::InvalidServerResponse => "mobile.login.invalid_server_response",
            MessageId::OrganizationNotFound => "mobile.login.organization_not_found",
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            MessageId::EmailRequired => "Please enter your email",
            MessageId::EmailInvalid => "Please enter a valid email address",
            MessageId::MobileRequired => "Please enter your country code and mobile number",
            MessageId::SendOtpFailed => "Failed to send OTP. Please try again.",
            MessageId::OtpInvalid => "Please enter a valid 6-digit code",
            MessageId::SessionExpired => "Session expired. Please request OTP again.",
            MessageId::GenericError => "Login failed. Please try again.",
            MessageId::NoCorporateAccounts => {
                "No corporate accounts found. Konnect is only available for corporate Daakia accounts."
            }
            MessageId::TokenGenerationFailed => "Failed to generate token",
            MessageId::ServerLoginFailed => "Failed to sign in to the server. Please try again.",
            MessageId::InvalidServerResponse => "Invalid response from server",
            MessageId::OrganizationNotFound => "Please choose one of the listed workspaces",
        }
    }
}

pub trait MessageCatalog: Send + Sync {
    fn message(&self, id: MessageId) -> Cow<'static, str>;
}

/// English defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCatalog;

impl MessageCatalog for DefaultCatalog {
    fn message(&self, id: MessageId) -> Cow<'static, str> {
        Cow::Borrowed(id.default_message())
    }
}
