//! Identity backend client for OTP issue and verification.

use async_trait::async_trait;
use tracing::instrument;

use super::backend::BackendTransport;
use super::endpoints::{SEND_OTP, VERIFY_OTP};
use super::error::ClientError;
use super::OtpApi;
use crate::dtos::{Envelope, SendOtpRequest, SendOtpResponse, VerifyOtpRequest, VerifyOtpResponse};
use crate::models::{OtpChannel, OtpTarget};

#[derive(Clone)]
pub struct AuthClient {
    transport: BackendTransport,
}

impl AuthClient {
    pub fn new(transport: BackendTransport) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl OtpApi for AuthClient {
    #[instrument(skip(self, target), fields(channel = target.channel().as_str(), platform = %self.transport.platform()))]
    async fn request_otp(&self, target: &OtpTarget) -> Result<SendOtpResponse, ClientError> {
        let body = SendOtpRequest::from(target);
        let response: SendOtpResponse = self.transport.post(SEND_OTP, &body).await?;

        if response.is_success() {
            tracing::info!("OTP requested");
        } else {
            tracing::warn!(message = ?response.message(), "OTP request rejected");
        }

        Ok(response)
    }

    #[instrument(skip(self, request_id, code), fields(channel = channel.as_str()))]
    async fn verify_otp(
        &self,
        request_id: &str,
        code: &str,
        channel: OtpChannel,
    ) -> Result<VerifyOtpResponse, ClientError> {
        let body = VerifyOtpRequest {
            request_id,
            otp: code,
            channel,
        };
        let response: VerifyOtpResponse = self.transport.post(VERIFY_OTP, &body).await?;

        if response.is_success() {
            tracing::info!("OTP verified");
        } else {
            tracing::warn!(message = ?response.message(), "OTP verification rejected");
        }

        Ok(response)
    }
}
