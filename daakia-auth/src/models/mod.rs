//! Domain models for the OTP login flow and SSO option resolution.

mod client_config;
mod organization;
mod otp;
mod session;

pub use client_config::{ClientConfig, ClientLicense, VersionBlock};
pub use organization::{sort_admin_first, Organization};
pub use otp::{OtpChannel, OtpCode, OtpRequest, OtpTarget, OTP_LENGTH};
pub use session::{IdentityToken, ServerToken, SessionCredentials};
