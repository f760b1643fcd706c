//! Shared fixtures: a mock identity backend and messaging server, plus a
//! recording host.
#![allow(dead_code)]

use daakia_auth::config::{BackendSettings, Platform};
use daakia_auth::flow::{LoginFlow, Navigator, SessionInstaller};
use daakia_auth::services::{AuthClient, BackendTransport, OrganizationClient, ServerClient};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const SEND_OTP: &str = "/v2.0/auth/send/otp";
pub const VERIFY_OTP: &str = "/v2.0/auth/verify/otp";
pub const LIST_ORGANIZATIONS: &str = "/v2.0/mobile-auth/list-organizations";
pub const GENERATE_SERVER_TOKEN: &str = "/v2.0/mobile-auth/generate-mattermost-token";
pub const MOBILE_LOGIN: &str = "/api/v4/daakia/mobile-login";

pub fn backend_settings(server: &MockServer) -> BackendSettings {
    BackendSettings {
        base_url: server.uri(),
        platform: Platform::Android,
    }
}

pub fn transport(server: &MockServer) -> BackendTransport {
    BackendTransport::new(&backend_settings(server))
}

pub fn server_client(server: &MockServer) -> ServerClient {
    ServerClient::from_login_url(&format!("{}/login", server.uri()))
        .expect("mock server URL is valid")
}

/// Mount a `POST` responder returning `body` with `status`.
pub async fn mount_json(server: &MockServer, route: &str, status: u16, body: Value) {
    Mock::given(method("POST"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

pub fn otp_sent(request_id: &str) -> Value {
    json!({
        "success": 1,
        "message": "OTP sent successfully",
        "data": { "request_id": request_id, "type": "email" }
    })
}

pub fn otp_verified(token: &str) -> Value {
    json!({ "success": 1, "data": { "token": token } })
}

pub fn organizations(list: Value) -> Value {
    json!({ "success": 1, "organizations": list })
}

pub fn acme() -> Value {
    json!([{ "id": 7, "organization_name": "Acme", "user_role": "admin", "is_active": true }])
}

pub fn server_token(token: &str) -> Value {
    json!({ "success": 1, "mattermost_auth_token": token })
}

pub fn session(auth: &str, csrf: &str) -> Value {
    json!({ "MMAUTHTOKEN": auth, "MMCSRF": csrf })
}

/// Records what the flow hands to the embedding app.
#[derive(Default)]
pub struct RecordingHost {
    sessions: Mutex<Vec<(String, String)>>,
    pops: AtomicUsize,
}

impl RecordingHost {
    pub fn sessions(&self) -> Vec<(String, String)> {
        self.sessions.lock().unwrap().clone()
    }

    pub fn pops(&self) -> usize {
        self.pops.load(Ordering::SeqCst)
    }
}

impl SessionInstaller for RecordingHost {
    fn on_session_established(&self, auth_token: &str, csrf_token: &str) {
        self.sessions
            .lock()
            .unwrap()
            .push((auth_token.to_string(), csrf_token.to_string()));
    }
}

impl Navigator for RecordingHost {
    fn pop_screen(&self) {
        self.pops.fetch_add(1, Ordering::SeqCst);
    }
}

/// A flow wired to real HTTP clients. The backend and the messaging server
/// share one mock server.
pub fn login_flow(server: &MockServer, host: &Arc<RecordingHost>) -> LoginFlow {
    let transport = transport(server);
    LoginFlow::new(
        Arc::new(AuthClient::new(transport.clone())),
        Arc::new(OrganizationClient::new(transport)),
        Arc::new(server_client(server)),
        host.clone(),
        host.clone(),
    )
}

/// A flow whose messaging-server login goes to `login_url` instead of the
/// mock backend.
pub fn login_flow_with_server(
    backend: &MockServer,
    login_url: &str,
    host: &Arc<RecordingHost>,
) -> LoginFlow {
    let transport = transport(backend);
    LoginFlow::new(
        Arc::new(AuthClient::new(transport.clone())),
        Arc::new(OrganizationClient::new(transport)),
        Arc::new(ServerClient::from_login_url(login_url).expect("login URL is valid")),
        host.clone(),
        host.clone(),
    )
}

/// Login URL on a local port with nothing listening.
pub fn unreachable_login_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local address").port();
    drop(listener);
    format!("http://127.0.0.1:{}/login", port)
}

/// Mount a `POST` responder with a body that is not JSON.
pub async fn mount_garbage(server: &MockServer, route: &str) {
    Mock::given(method("POST"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>upstream error</html>"))
        .mount(server)
        .await;
}

/// Number of requests the mock server has seen.
pub async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or(0)
}
