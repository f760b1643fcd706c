//! Messaging-server client configuration and license, in the legacy
//! `format=old` shape where every flag is the string `"true"` or `"false"`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// App versions for which SSO is hidden. Servers send either a comma
/// separated string or a JSON list whose entries may be strings or numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VersionBlock {
    List(Vec<Value>),
    Csv(String),
}

fn is_placeholder(entry: &str) -> bool {
    entry.is_empty() || entry == "0"
}

impl VersionBlock {
    /// Normalized entries: trimmed, with empty and `"0"` placeholders removed.
    ///
    /// A whole-string value of `""`, `"0"` or `"undefined"` yields no entries.
    pub fn entries(&self) -> Vec<String> {
        match self {
            VersionBlock::List(items) => items
                .iter()
                .filter_map(|item| match item {
                    Value::Null => None,
                    Value::String(s) => Some(s.trim().to_string()),
                    other => Some(other.to_string()),
                })
                .filter(|v| !is_placeholder(v))
                .collect(),
            VersionBlock::Csv(raw) => {
                let raw = raw.trim();
                if raw == "undefined" {
                    return Vec::new();
                }
                raw.split(',')
                    .map(str::trim)
                    .filter(|v| !is_placeholder(v))
                    .map(str::to_string)
                    .collect()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn contains(&self, version: &str) -> bool {
        let version = version.trim();
        self.entries().iter().any(|entry| entry == version)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(rename = "Version", default)]
    pub version: Option<String>,

    #[serde(rename = "EnableSaml", default)]
    pub enable_saml: Option<String>,
    #[serde(rename = "SamlLoginButtonText", default)]
    pub saml_login_button_text: Option<String>,

    #[serde(rename = "EnableSignUpWithGitLab", default)]
    pub enable_sign_up_with_gitlab: Option<String>,
    #[serde(rename = "EnableSignUpWithGoogle", default)]
    pub enable_sign_up_with_google: Option<String>,
    #[serde(rename = "EnableSignUpWithOffice365", default)]
    pub enable_sign_up_with_office365: Option<String>,
    #[serde(rename = "EnableSignUpWithOpenId", default)]
    pub enable_sign_up_with_openid: Option<String>,
    #[serde(rename = "OpenIdButtonText", default)]
    pub openid_button_text: Option<String>,

    #[serde(rename = "EnableLdap", default)]
    pub enable_ldap: Option<String>,
    #[serde(rename = "EnableSignInWithEmail", default)]
    pub enable_sign_in_with_email: Option<String>,
    #[serde(rename = "EnableSignInWithUsername", default)]
    pub enable_sign_in_with_username: Option<String>,

    #[serde(rename = "IosSsoHide", default)]
    pub ios_sso_hide: Option<String>,
    #[serde(rename = "AndroidSsoHide", default)]
    pub android_sso_hide: Option<String>,
    #[serde(rename = "IosVersionBlock", default)]
    pub ios_version_block: Option<VersionBlock>,
    #[serde(rename = "AndroidVersionBlock", default)]
    pub android_version_block: Option<VersionBlock>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientLicense {
    #[serde(rename = "IsLicensed", default)]
    pub is_licensed: Option<String>,
    #[serde(rename = "SAML", default)]
    pub saml: Option<String>,
    #[serde(rename = "Office365OAuth", default)]
    pub office365_oauth: Option<String>,
    #[serde(rename = "LDAP", default)]
    pub ldap: Option<String>,
}
