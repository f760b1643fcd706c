//! Client-side guards that run before any network call.

use validator::Validate;

use crate::dtos::SendOtpRequest;
use crate::models::{OtpCode, OtpTarget};
use crate::utils::messages::MessageId;

/// Check that the identifier is usable for `send/otp`.
pub fn validate_target(target: &OtpTarget) -> Result<(), MessageId> {
    match target {
        OtpTarget::Email(email) if email.is_empty() => return Err(MessageId::EmailRequired),
        OtpTarget::Mobile {
            country_code,
            mobile_number,
        } if country_code.is_empty() || mobile_number.is_empty() => {
            return Err(MessageId::MobileRequired)
        }
        _ => {}
    }

    SendOtpRequest::from(target).validate().map_err(|_| match target {
        OtpTarget::Email(_) => MessageId::EmailInvalid,
        OtpTarget::Mobile { .. } => MessageId::MobileRequired,
    })?;

    if let OtpTarget::Mobile {
        country_code,
        mobile_number,
    } = target
    {
        let code_digits = country_code.strip_prefix('+').unwrap_or(country_code);
        let well_formed = !code_digits.is_empty()
            && code_digits.bytes().all(|b| b.is_ascii_digit())
            && mobile_number.bytes().all(|b| b.is_ascii_digit());
        if !well_formed {
            return Err(MessageId::MobileRequired);
        }
    }

    Ok(())
}

/// Parse a typed code, rejecting anything that is not exactly six digits.
pub fn validate_code(input: &str) -> Result<OtpCode, MessageId> {
    OtpCode::parse(input).ok_or(MessageId::OtpInvalid)
}
