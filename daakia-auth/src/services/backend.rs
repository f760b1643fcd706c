use client_core::observability::TracedClientExt;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};

use super::endpoints::PLATFORM_HEADER;
use super::error::ClientError;
use crate::config::{BackendSettings, Platform};

/// JSON-over-HTTP transport shared by the identity backend clients.
///
/// Every call is a `POST` carrying the `platform` header and trace context.
/// The body is decoded whatever the status code: the backend reports
/// rejections inside the envelope.
#[derive(Clone)]
pub struct BackendTransport {
    client: Client,
    base_url: String,
    platform: Platform,
}

impl BackendTransport {
    pub fn new(settings: &BackendSettings) -> Self {
        Self::with_client(Client::new(), settings)
    }

    pub fn with_client(client: Client, settings: &BackendSettings) -> Self {
        Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            platform: settings.platform,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub(crate) async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ClientError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .traced_post(&url)
            .header(PLATFORM_HEADER, self.platform.as_str())
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(url = %url, error = %e, "Backend request failed");
                ClientError::Http(e)
            })?;

        let status = response.status();
        let text = response.text().await?;

        // Bodies carry tokens; only the status is logged.
        tracing::debug!(url = %url, status = %status, "Backend response received");

        serde_json::from_str(&text).map_err(|source| {
            tracing::warn!(url = %url, status = %status, "Backend response could not be decoded");
            ClientError::Decode {
                status: status.as_u16(),
                source,
            }
        })
    }
}
