//! Remote clients used by the login flow.
//!
//! The flow only sees the traits below so hosts and tests can substitute
//! their own transports.

mod auth_client;
mod backend;
pub mod endpoints;
pub mod error;
mod org_client;
mod server_client;

use async_trait::async_trait;

use crate::dtos::{
    GenerateTokenResponse, ListOrganizationsResponse, SendOtpResponse, VerifyOtpResponse,
};
use crate::models::{IdentityToken, OtpChannel, OtpTarget, ServerToken, SessionCredentials};

pub use auth_client::AuthClient;
pub use backend::BackendTransport;
pub use error::{ClientError, ServerLoginError};
pub use org_client::OrganizationClient;
pub use server_client::ServerClient;

/// `send/otp` and `verify/otp` on the identity backend.
#[async_trait]
pub trait OtpApi: Send + Sync {
    async fn request_otp(&self, target: &OtpTarget) -> Result<SendOtpResponse, ClientError>;

    /// The code is sent as typed; its format is checked by the caller.
    async fn verify_otp(
        &self,
        request_id: &str,
        code: &str,
        channel: OtpChannel,
    ) -> Result<VerifyOtpResponse, ClientError>;
}

/// Organization listing and token exchange on the identity backend.
#[async_trait]
pub trait OrganizationApi: Send + Sync {
    async fn list_organizations(
        &self,
        identity: &IdentityToken,
    ) -> Result<ListOrganizationsResponse, ClientError>;

    async fn exchange_for_session_token(
        &self,
        identity: &IdentityToken,
        organization_id: Option<i64>,
    ) -> Result<GenerateTokenResponse, ClientError>;
}

/// Native mobile login on the messaging server.
#[async_trait]
pub trait ServerLogin: Send + Sync {
    async fn mobile_login(&self, token: &ServerToken)
        -> Result<SessionCredentials, ServerLoginError>;
}
