//! Identity backend client for organization listing and token exchange.

use async_trait::async_trait;
use tracing::instrument;

use super::backend::BackendTransport;
use super::endpoints::{GENERATE_SERVER_TOKEN, LIST_ORGANIZATIONS};
use super::error::ClientError;
use super::OrganizationApi;
use crate::dtos::{
    Envelope, GenerateTokenRequest, GenerateTokenResponse, ListOrganizationsRequest,
    ListOrganizationsResponse,
};
use crate::models::IdentityToken;

#[derive(Clone)]
pub struct OrganizationClient {
    transport: BackendTransport,
}

impl OrganizationClient {
    pub fn new(transport: BackendTransport) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl OrganizationApi for OrganizationClient {
    #[instrument(skip(self, identity))]
    async fn list_organizations(
        &self,
        identity: &IdentityToken,
    ) -> Result<ListOrganizationsResponse, ClientError> {
        let body = ListOrganizationsRequest {
            daakia_token: identity.expose(),
        };
        let response: ListOrganizationsResponse =
            self.transport.post(LIST_ORGANIZATIONS, &body).await?;

        tracing::info!(
            success = response.is_success(),
            count = response.organizations.as_ref().map_or(0, Vec::len),
            "Organizations listed"
        );

        Ok(response)
    }

    #[instrument(skip(self, identity))]
    async fn exchange_for_session_token(
        &self,
        identity: &IdentityToken,
        organization_id: Option<i64>,
    ) -> Result<GenerateTokenResponse, ClientError> {
        let body = GenerateTokenRequest {
            daakia_token: identity.expose(),
            active_org_id: organization_id,
        };
        let response: GenerateTokenResponse =
            self.transport.post(GENERATE_SERVER_TOKEN, &body).await?;

        if response.is_success() {
            tracing::info!("Server token generated");
        } else {
            tracing::warn!(message = ?response.message(), "Server token generation rejected");
        }

        Ok(response)
    }
}
