//! One-time password request and code types.

use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

/// Number of digits in a verification code.
pub const OTP_LENGTH: usize = 6;

/// Delivery channel reported by the backend (`type` on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OtpChannel {
    Email,
    Mobile,
}

impl OtpChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpChannel::Email => "email",
            OtpChannel::Mobile => "mobile",
        }
    }
}

/// Where the code is sent. Exactly one channel per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtpTarget {
    Email(String),
    Mobile {
        country_code: String,
        mobile_number: String,
    },
}

impl OtpTarget {
    pub fn email(email: impl Into<String>) -> Self {
        OtpTarget::Email(email.into().trim().to_string())
    }

    pub fn mobile(country_code: impl Into<String>, mobile_number: impl Into<String>) -> Self {
        OtpTarget::Mobile {
            country_code: country_code.into().trim().to_string(),
            mobile_number: mobile_number.into().trim().to_string(),
        }
    }

    /// Channel implied by the target, used until the backend confirms one.
    pub fn channel(&self) -> OtpChannel {
        match self {
            OtpTarget::Email(_) => OtpChannel::Email,
            OtpTarget::Mobile { .. } => OtpChannel::Mobile,
        }
    }
}

/// An issued OTP request, held while the user types the code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpRequest {
    pub request_id: String,
    pub target: OtpTarget,
    pub channel: OtpChannel,
}

/// A verification code that passed the client-side format check.
#[derive(Debug, Clone)]
pub struct OtpCode(Secret<String>);

impl OtpCode {
    /// Accepts exactly [`OTP_LENGTH`] ASCII digits.
    pub fn parse(input: &str) -> Option<Self> {
        if input.len() == OTP_LENGTH && input.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self(Secret::new(input.to_string())))
        } else {
            None
        }
    }

    /// Strip everything but digits and cap the length, the way the code
    /// field filters keystrokes.
    pub fn sanitize_input(raw: &str) -> String {
        raw.chars()
            .filter(|c| c.is_ascii_digit())
            .take(OTP_LENGTH)
            .collect()
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_six_digits() {
        let code = OtpCode::parse("482913").unwrap();
        assert_eq!(code.expose(), "482913");
    }

    #[test]
    fn test_parse_rejects_wrong_shapes() {
        for input in ["", "12345", "1234567", "48291a", "48 913", " 482913", "４８２９１３"] {
            assert!(OtpCode::parse(input).is_none(), "accepted {:?}", input);
        }
    }

    #[test]
    fn test_sanitize_input() {
        assert_eq!(OtpCode::sanitize_input("48-29 13"), "482913");
        assert_eq!(OtpCode::sanitize_input("1234567890"), "123456");
        assert_eq!(OtpCode::sanitize_input("abc"), "");
    }

    #[test]
    fn test_code_debug_is_redacted() {
        let code = OtpCode::parse("482913").unwrap();
        assert!(!format!("{:?}", code).contains("482913"));
    }

    #[test]
    fn test_target_channel() {
        assert_eq!(OtpTarget::email(" a@b.co ").channel(), OtpChannel::Email);
        assert_eq!(OtpTarget::email(" a@b.co "), OtpTarget::Email("a@b.co".to_string()));
        assert_eq!(OtpTarget::mobile("+91", "98765").channel(), OtpChannel::Mobile);
    }
}
