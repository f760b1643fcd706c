use anyhow::Context;
use client_core::observability::init_tracing;
use daakia_auth::config::Settings;
use daakia_auth::flow::{LoginFlow, LoginState, Navigator, SessionInstaller};
use daakia_auth::models::{OtpCode, OtpTarget};
use daakia_auth::services::{AuthClient, BackendTransport, OrganizationClient, ServerClient};
use daakia_auth::sso::version::is_supported_server;
use daakia_auth::sso::SsoResolver;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

/// Terminal stand-in for the mobile app shell.
#[derive(Default)]
struct ConsoleHost {
    closed: AtomicBool,
}

impl SessionInstaller for ConsoleHost {
    fn on_session_established(&self, auth_token: &str, csrf_token: &str) {
        println!(
            "Signed in. Session installed ({} byte auth token, {} byte CSRF token).",
            auth_token.len(),
            csrf_token.len()
        );
    }
}

impl Navigator for ConsoleHost {
    fn pop_screen(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        &settings.telemetry.service_name,
        &settings.telemetry.log_level,
        settings.telemetry.otlp_endpoint.as_deref(),
    )?;

    let transport = BackendTransport::new(&settings.backend);
    info!(
        base_url = transport.base_url(),
        platform = %transport.platform(),
        "Using identity backend"
    );

    let server = Arc::new(
        ServerClient::from_login_url(&settings.server.login_url)
            .context("Failed to set up messaging server client")?,
    );
    info!(origin = server.origin(), "Using messaging server");

    show_login_options(&server, &settings).await;

    let host = Arc::new(ConsoleHost::default());
    let flow = LoginFlow::new(
        Arc::new(AuthClient::new(transport.clone())),
        Arc::new(OrganizationClient::new(transport)),
        server,
        host.clone(),
        host.clone(),
    );

    println!("Commands: `restart`, `resend`, `cancel`.");
    render(&flow.state());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();

        let outcome = match input {
            "" => {
                render(&flow.state());
                continue;
            }
            "cancel" => {
                flow.cancel();
                break;
            }
            "restart" => Ok(flow.restart()),
            "resend" => flow.resend_otp().await,
            _ => match flow.state() {
                LoginState::Credentials { .. } => {
                    flow.submit_identifier(parse_identifier(input)).await
                }
                LoginState::OtpEntry { .. } => {
                    flow.submit_code(&OtpCode::sanitize_input(input)).await
                }
                LoginState::OrganizationSelect { organizations, .. } => {
                    let choice = input
                        .parse::<usize>()
                        .ok()
                        .and_then(|n| n.checked_sub(1))
                        .and_then(|n| organizations.get(n));
                    match choice {
                        Some(organization) => flow.select_organization(organization.id).await,
                        None => {
                            println!("Choose a number between 1 and {}.", organizations.len());
                            continue;
                        }
                    }
                }
                LoginState::Success | LoginState::Error { .. } => break,
            },
        };

        match outcome {
            Ok(state) => {
                render(&state);
                if state.is_terminal() {
                    break;
                }
            }
            Err(e) => println!("{}", e),
        }
    }

    if host.closed.load(Ordering::SeqCst) {
        info!("Login cancelled");
    }

    Ok(())
}

/// `+CC number` is a mobile target, anything else an email address.
fn parse_identifier(input: &str) -> OtpTarget {
    let mobile = input
        .strip_prefix('+')
        .and_then(|rest| rest.split_once(char::is_whitespace));
    match mobile {
        Some((country_code, number)) => OtpTarget::mobile(format!("+{}", country_code), number),
        None => OtpTarget::email(input),
    }
}

async fn show_login_options(server: &ServerClient, settings: &Settings) {
    let (config, license) = tokio::join!(
        server.fetch_client_config(),
        server.fetch_client_license()
    );
    let (config, license) = match (config, license) {
        (Ok(config), Ok(license)) => (config, license),
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not load server configuration, skipping SSO options");
            return;
        }
    };

    if !is_supported_server(config.version.as_deref()) {
        tracing::warn!(version = ?config.version, "Server version is older than the supported minimum");
    }

    let resolver = SsoResolver::new(
        settings.backend.platform,
        settings.client.app_version.as_str(),
    );
    let options = resolver.resolve(&config, &license);

    let providers: Vec<&str> = options.enabled_ssos.iter().map(|p| p.as_str()).collect();
    if providers.is_empty() {
        println!("Single sign-on: none");
    } else {
        println!("Single sign-on: {}", providers.join(", "));
    }
    if !options.has_login_form {
        println!("Password sign-in is disabled on this server.");
    }
    if let Some(provider) = options.redirect_target() {
        println!("This server signs in through {} only.", provider.as_str());
    }
}

fn render(state: &LoginState) {
    if let Some(notice) = state.notice() {
        println!("! {}", notice.message);
    }

    match state {
        LoginState::Credentials { .. } => println!("Email or `+CC mobile number`:"),
        LoginState::OtpEntry { request, .. } => {
            println!("Enter the 6-digit code sent by {}:", request.channel.as_str())
        }
        LoginState::OrganizationSelect { organizations, .. } => {
            println!("Choose your workspace:");
            for (n, organization) in organizations.iter().enumerate() {
                println!(
                    "  {}. [{}] {} ({})",
                    n + 1,
                    organization.initial(),
                    organization.display_name(),
                    organization.role_label()
                );
            }
        }
        LoginState::Success => println!("Login complete."),
        LoginState::Error { message, .. } => println!("Login failed: {}", message),
    }
}
