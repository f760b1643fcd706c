//! Endpoint paths. Backend paths are relative to the configured base URL,
//! server paths to the messaging-server origin.

pub const API_VERSION: &str = "/v2.0";

pub const SEND_OTP: &str = "/v2.0/auth/send/otp";
pub const VERIFY_OTP: &str = "/v2.0/auth/verify/otp";

pub const LIST_ORGANIZATIONS: &str = "/v2.0/mobile-auth/list-organizations";
pub const GENERATE_SERVER_TOKEN: &str = "/v2.0/mobile-auth/generate-mattermost-token";

pub const MOBILE_LOGIN: &str = "/api/v4/daakia/mobile-login";
pub const CLIENT_CONFIG: &str = "/api/v4/config/client?format=old";
pub const CLIENT_LICENSE: &str = "/api/v4/license/client?format=old";

/// Header carrying the calling platform on every backend request.
pub const PLATFORM_HEADER: &str = "platform";
