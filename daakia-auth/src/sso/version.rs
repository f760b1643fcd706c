//! Loose `major.minor.patch` handling for server and app version strings.
//!
//! Components are read like the servers write them: leading digits only, so
//! `"9.3.0-rc1"` and `"9.3.0.12345"` both read as 9.3.0. Missing minor or
//! patch components count as zero.

/// Oldest server release the client supports.
pub const MIN_SUPPORTED_SERVER: (u64, u64, u64) = (7, 8, 0);

/// Server release from which Google, Office 365 and OpenID no longer need a
/// license on the client side.
pub const CLOUD_OAUTH_SERVER: (u64, u64, u64) = (7, 6, 0);

fn leading_number(component: &str) -> Option<u64> {
    let digits: String = component
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Parse a version string. `None` when the major component is not numeric.
pub fn parse_version(value: &str) -> Option<(u64, u64, u64)> {
    let mut split = value.split('.');
    let major = leading_number(split.next()?)?;
    let minor = split.next().and_then(leading_number).unwrap_or(0);
    let patch = split.next().and_then(leading_number).unwrap_or(0);
    Some((major, minor, patch))
}

/// Normalize to `"major.minor.patch"`.
pub fn semver_from_server_version(value: &str) -> Option<String> {
    parse_version(value).map(|(major, minor, patch)| format!("{}.{}.{}", major, minor, patch))
}

/// True when `version` is at least `major.minor.patch`. Unknown or
/// unparsable versions never qualify.
pub fn is_minimum_server_version(version: Option<&str>, major: u64, minor: u64, patch: u64) -> bool {
    version
        .and_then(parse_version)
        .is_some_and(|current| current >= (major, minor, patch))
}

pub fn is_supported_server(version: Option<&str>) -> bool {
    let (major, minor, patch) = MIN_SUPPORTED_SERVER;
    is_minimum_server_version(version, major, minor, patch)
}
