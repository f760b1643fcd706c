//! Wire shapes of the identity backend and messaging-server endpoints.
//!
//! Backend envelopes carry `success: 0|1` plus an optional human-readable
//! `message`; [`Envelope`] exposes both uniformly.

use secrecy::Secret;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{OtpChannel, OtpTarget, Organization};

pub trait Envelope {
    fn is_success(&self) -> bool;
    fn message(&self) -> Option<&str>;
}

macro_rules! impl_envelope {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Envelope for $ty {
                fn is_success(&self) -> bool {
                    self.success == 1
                }

                fn message(&self) -> Option<&str> {
                    self.message.as_deref().filter(|m| !m.trim().is_empty())
                }
            }
        )*
    };
}

// ============================================================================
// POST /v2.0/auth/send/otp
// ============================================================================

#[derive(Debug, Clone, Serialize, Validate)]
pub struct SendOtpRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub country_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub mobile_number: Option<String>,
}

impl From<&OtpTarget> for SendOtpRequest {
    fn from(target: &OtpTarget) -> Self {
        match target {
            OtpTarget::Email(email) => Self {
                email: Some(email.clone()),
                country_code: None,
                mobile_number: None,
            },
            OtpTarget::Mobile {
                country_code,
                mobile_number,
            } => Self {
                email: None,
                country_code: Some(country_code.clone()),
                mobile_number: Some(mobile_number.clone()),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SendOtpResponse {
    #[serde(default)]
    pub success: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<SendOtpData>,
}

/// Rejections may carry a partial `data` object, so every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendOtpData {
    #[serde(default)]
    pub request_id: String,
    #[serde(rename = "type", default)]
    pub channel: Option<OtpChannel>,
}

// ============================================================================
// POST /v2.0/auth/verify/otp
// ============================================================================

#[derive(Debug, Serialize)]
pub struct VerifyOtpRequest<'a> {
    pub request_id: &'a str,
    pub otp: &'a str,
    #[serde(rename = "type")]
    pub channel: OtpChannel,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpResponse {
    #[serde(default)]
    pub success: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<VerifyOtpData>,
}

#[derive(Debug, Default, Deserialize)]
pub struct VerifyOtpData {
    #[serde(default)]
    pub token: Option<Secret<String>>,
}

// ============================================================================
// POST /v2.0/mobile-auth/list-organizations
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ListOrganizationsRequest<'a> {
    pub daakia_token: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ListOrganizationsResponse {
    #[serde(default)]
    pub success: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub organizations: Option<Vec<Organization>>,
}

// ============================================================================
// POST /v2.0/mobile-auth/generate-mattermost-token
// ============================================================================

#[derive(Debug, Serialize)]
pub struct GenerateTokenRequest<'a> {
    pub daakia_token: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_org_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateTokenResponse {
    #[serde(default)]
    pub success: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub mattermost_auth_token: Option<Secret<String>>,
}

impl_envelope!(
    SendOtpResponse,
    VerifyOtpResponse,
    ListOrganizationsResponse,
    GenerateTokenResponse,
);

// ============================================================================
// POST {server}/api/v4/daakia/mobile-login
// ============================================================================

#[derive(Debug, Serialize)]
pub struct MobileLoginRequest<'a> {
    pub mattermost_auth_token: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct MobileLoginResponse {
    #[serde(rename = "MMAUTHTOKEN", default)]
    pub auth_token: Option<Secret<String>>,
    #[serde(rename = "MMCSRF", default)]
    pub csrf_token: Option<Secret<String>>,
}

/// Error body the messaging server returns on non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ServerErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
