//! Messaging-server client: native mobile login and the unauthenticated
//! client config / license that drive the SSO options.

use async_trait::async_trait;
use client_core::observability::TracedClientExt;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::instrument;

use super::endpoints::{CLIENT_CONFIG, CLIENT_LICENSE, MOBILE_LOGIN};
use super::error::{ClientError, ServerLoginError};
use super::ServerLogin;
use crate::config::server_origin;
use crate::dtos::{MobileLoginRequest, MobileLoginResponse, ServerErrorBody};
use crate::models::{ClientConfig, ClientLicense, ServerToken, SessionCredentials};

#[derive(Clone)]
pub struct ServerClient {
    client: Client,
    origin: String,
}

impl ServerClient {
    /// Build a client for the server behind `login_url`; only the origin is kept.
    pub fn from_login_url(login_url: &str) -> Result<Self, ClientError> {
        Self::with_client(Client::new(), login_url)
    }

    pub fn with_client(client: Client, login_url: &str) -> Result<Self, ClientError> {
        let origin = server_origin(login_url)
            .ok_or_else(|| ClientError::InvalidServerUrl(login_url.to_string()))?;
        Ok(Self { client, origin })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    #[instrument(skip(self), fields(origin = %self.origin))]
    pub async fn fetch_client_config(&self) -> Result<ClientConfig, ClientError> {
        self.get_json(CLIENT_CONFIG).await
    }

    #[instrument(skip(self), fields(origin = %self.origin))]
    pub async fn fetch_client_license(&self) -> Result<ClientLicense, ClientError> {
        self.get_json(CLIENT_LICENSE).await
    }

    async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, ClientError> {
        let url = format!("{}{}", self.origin, path);

        let response = self.client.traced_get(&url).send().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "Server request failed");
            ClientError::Http(e)
        })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(url = %url, status = %status, "Server returned an error status");
        }

        serde_json::from_str(&text).map_err(|source| ClientError::Decode {
            status: status.as_u16(),
            source,
        })
    }
}

#[async_trait]
impl ServerLogin for ServerClient {
    #[instrument(skip(self, token), fields(origin = %self.origin))]
    async fn mobile_login(
        &self,
        token: &ServerToken,
    ) -> Result<SessionCredentials, ServerLoginError> {
        let url = format!("{}{}", self.origin, MOBILE_LOGIN);
        let body = MobileLoginRequest {
            mattermost_auth_token: token.expose(),
        };

        let response = self
            .client
            .traced_post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(url = %url, error = %e, "Mobile login request failed");
                ClientError::Http(e)
            })?;

        let status = response.status();
        let text = response.text().await.map_err(ClientError::Http)?;

        if !status.is_success() {
            let message = serde_json::from_str::<ServerErrorBody>(&text)
                .ok()
                .and_then(|err| err.message)
                .filter(|m| !m.trim().is_empty());
            tracing::warn!(status = %status, "Mobile login rejected");
            return Err(ServerLoginError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: MobileLoginResponse = serde_json::from_str(&text).map_err(|_| {
            tracing::warn!(status = %status, "Mobile login response is not valid JSON");
            ServerLoginError::InvalidResponse
        })?;

        let credentials = match (parsed.auth_token, parsed.csrf_token) {
            (Some(auth), Some(csrf)) => {
                SessionCredentials::new(auth.expose_secret(), csrf.expose_secret())
            }
            _ => None,
        };

        credentials.ok_or_else(|| {
            tracing::warn!("Mobile login response is missing session tokens");
            ServerLoginError::InvalidResponse
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_login_url_keeps_origin() {
        let client = ServerClient::from_login_url("https://chat.example.com/login/sso?x=1").unwrap();
        assert_eq!(client.origin(), "https://chat.example.com");
    }

    #[test]
    fn test_from_login_url_rejects_invalid() {
        let result = ServerClient::from_login_url("chat.example.com");
        assert!(matches!(result, Err(ClientError::InvalidServerUrl(_))));
    }
}
