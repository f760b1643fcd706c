//! Which single sign-on providers the login screen offers.
//!
//! Provider flags come from the server's client config, gated by license
//! flags. A platform switch (`IosSsoHide` / `AndroidSsoHide`) combined with a
//! version block-list can hide every provider for specific app releases.

pub mod version;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::Platform;
use crate::models::{ClientConfig, ClientLicense};
use version::{is_minimum_server_version, semver_from_server_version, CLOUD_OAUTH_SERVER};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SsoProvider {
    Saml,
    Gitlab,
    Google,
    Office365,
    Openid,
}

impl SsoProvider {
    pub const ALL: [SsoProvider; 5] = [
        SsoProvider::Saml,
        SsoProvider::Gitlab,
        SsoProvider::Google,
        SsoProvider::Office365,
        SsoProvider::Openid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SsoProvider::Saml => "saml",
            SsoProvider::Gitlab => "gitlab",
            SsoProvider::Google => "google",
            SsoProvider::Office365 => "office365",
            SsoProvider::Openid => "openid",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SsoOption {
    pub enabled: bool,
    /// Custom button label configured on the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginOptions {
    pub sso_options: BTreeMap<SsoProvider, SsoOption>,
    pub enabled_ssos: Vec<SsoProvider>,
    pub number_ssos: usize,
    /// Email, username or LDAP sign-in is available.
    pub has_login_form: bool,
    /// Every provider was suppressed by the platform version block-list.
    pub sso_hidden: bool,
}

impl LoginOptions {
    /// The provider to open directly, skipping the login screen: only when
    /// it is the sole option and there is no form.
    pub fn redirect_target(&self) -> Option<SsoProvider> {
        if !self.has_login_form && self.number_ssos == 1 {
            self.enabled_ssos.first().copied()
        } else {
            None
        }
    }
}

/// Resolves login options for one running app.
#[derive(Debug, Clone)]
pub struct SsoResolver {
    platform: Platform,
    app_version: String,
}

fn flag(value: &Option<String>) -> bool {
    value.as_deref() == Some("true")
}

impl SsoResolver {
    pub fn new(platform: Platform, app_version: impl Into<String>) -> Self {
        Self {
            platform,
            app_version: app_version.into(),
        }
    }

    pub fn resolve(&self, config: &ClientConfig, license: &ClientLicense) -> LoginOptions {
        tracing::debug!(platform = %self.platform, version = %self.app_version, "Resolving login options");

        let licensed = flag(&license.is_licensed);
        let saml = flag(&config.enable_saml) && licensed && flag(&license.saml);
        let gitlab = flag(&config.enable_sign_up_with_gitlab);

        let (major, minor, patch) = CLOUD_OAUTH_SERVER;
        let (google, office365, openid) =
            if is_minimum_server_version(config.version.as_deref(), major, minor, patch) {
                (
                    flag(&config.enable_sign_up_with_google),
                    flag(&config.enable_sign_up_with_office365),
                    flag(&config.enable_sign_up_with_openid),
                )
            } else {
                (
                    flag(&config.enable_sign_up_with_google) && licensed,
                    flag(&config.enable_sign_up_with_office365)
                        && licensed
                        && flag(&license.office365_oauth),
                    flag(&config.enable_sign_up_with_openid) && licensed,
                )
            };

        let ldap = licensed && flag(&config.enable_ldap) && flag(&license.ldap);
        let has_login_form = flag(&config.enable_sign_in_with_email)
            || flag(&config.enable_sign_in_with_username)
            || ldap;

        let sso_hidden = self.should_hide_sso(config);

        let option = |enabled: bool, text: Option<String>| SsoOption {
            enabled: enabled && !sso_hidden,
            text,
        };

        let mut sso_options = BTreeMap::new();
        sso_options.insert(
            SsoProvider::Saml,
            option(saml, config.saml_login_button_text.clone()),
        );
        sso_options.insert(SsoProvider::Gitlab, option(gitlab, None));
        sso_options.insert(SsoProvider::Google, option(google, None));
        sso_options.insert(SsoProvider::Office365, option(office365, None));
        sso_options.insert(
            SsoProvider::Openid,
            option(openid, config.openid_button_text.clone()),
        );

        let enabled_ssos: Vec<SsoProvider> = sso_options
            .iter()
            .filter(|(_, option)| option.enabled)
            .map(|(provider, _)| *provider)
            .collect();

        LoginOptions {
            number_ssos: enabled_ssos.len(),
            enabled_ssos,
            has_login_form,
            sso_hidden,
            sso_options,
        }
    }

    /// True when this platform hides SSO and the running version is listed.
    /// An empty or placeholder block-list never hides anything.
    pub fn should_hide_sso(&self, config: &ClientConfig) -> bool {
        let (hide, block) = match self.platform {
            Platform::Ios => (&config.ios_sso_hide, &config.ios_version_block),
            Platform::Android => (&config.android_sso_hide, &config.android_version_block),
        };

        if !flag(hide) {
            tracing::debug!("SSO hide is off - showing SSO");
            return false;
        }

        let Some(block) = block.as_ref().filter(|b| !b.is_empty()) else {
            tracing::debug!("Version block empty - showing SSO");
            return false;
        };

        let current = semver_from_server_version(&self.app_version)
            .unwrap_or_else(|| self.app_version.trim().to_string());
        let hidden = block.contains(&current);

        if hidden {
            tracing::debug!(version = %current, "Version matches block-list - hiding SSO");
        } else {
            tracing::debug!(version = %current, "Version not in block-list - showing SSO");
        }

        hidden
    }
}
