//! The OTP login flow: identifier, code, organization, session.
//!
//! [`LoginFlow`] owns the current [`LoginState`] and runs one step at a time.
//! Every step failure becomes state; the only error an action returns is
//! [`FlowError::Busy`].

mod host;
mod state;

pub use host::{Navigator, SessionInstaller};
pub use state::{next, Event, FailureKind, LoginState, Notice};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::instrument;

use crate::dtos::{Envelope, SendOtpData};
use crate::models::{
    IdentityToken, OtpCode, OtpRequest, OtpTarget, ServerToken, SessionCredentials,
};
use crate::services::{OrganizationApi, OtpApi, ServerLogin, ServerLoginError};
use crate::utils::messages::{DefaultCatalog, MessageCatalog, MessageId};
use crate::utils::validation::{validate_code, validate_target};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("Another login step is already in progress")]
    Busy,
}

struct Inner {
    state: LoginState,
    /// Bumped on restart so that late step outcomes are dropped.
    generation: u64,
}

/// Holds the busy flag for the duration of one step.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct LoginFlow {
    otp_api: Arc<dyn OtpApi>,
    organization_api: Arc<dyn OrganizationApi>,
    server: Arc<dyn ServerLogin>,
    installer: Arc<dyn SessionInstaller>,
    navigator: Arc<dyn Navigator>,
    messages: Arc<dyn MessageCatalog>,
    inner: Mutex<Inner>,
    busy: AtomicBool,
}

impl LoginFlow {
    pub fn new(
        otp_api: Arc<dyn OtpApi>,
        organization_api: Arc<dyn OrganizationApi>,
        server: Arc<dyn ServerLogin>,
        installer: Arc<dyn SessionInstaller>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            otp_api,
            organization_api,
            server,
            installer,
            navigator,
            messages: Arc::new(DefaultCatalog),
            inner: Mutex::new(Inner {
                state: LoginState::default(),
                generation: 0,
            }),
            busy: AtomicBool::new(false),
        }
    }

    /// Use a localized message catalog.
    pub fn with_messages(mut self, messages: Arc<dyn MessageCatalog>) -> Self {
        self.messages = messages;
        self
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> LoginState {
        self.lock().state.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Request a code for `target`. Starts over when called mid-flow.
    #[instrument(skip(self, target), fields(channel = target.channel().as_str()))]
    pub async fn submit_identifier(&self, target: OtpTarget) -> Result<LoginState, FlowError> {
        let _guard = self.acquire()?;

        let generation = {
            let mut inner = self.lock();
            if !matches!(inner.state, LoginState::Credentials { .. }) {
                Self::reset(&mut inner);
            }
            inner.generation
        };

        if let Err(id) = validate_target(&target) {
            return Ok(self.settle(generation, self.notice(FailureKind::Validation, id)));
        }

        let event = match self.send(&target).await {
            Ok(data) => Event::OtpSent(OtpRequest {
                request_id: data.request_id,
                channel: data.channel.unwrap_or_else(|| target.channel()),
                target,
            }),
            Err(event) => event,
        };

        Ok(self.settle(generation, event))
    }

    /// Ask for a fresh code for the held identifier.
    #[instrument(skip(self))]
    pub async fn resend_otp(&self) -> Result<LoginState, FlowError> {
        let _guard = self.acquire()?;

        let Some((generation, request)) = self.pending_request() else {
            return Ok(self.expire());
        };

        let event = match self.send(&request.target).await {
            Ok(data) => Event::OtpResent {
                request_id: data.request_id,
                channel: data.channel.unwrap_or(request.channel),
            },
            Err(event) => event,
        };

        Ok(self.settle(generation, event))
    }

    /// Verify the typed code, then load the identity's organizations.
    #[instrument(skip(self, code))]
    pub async fn submit_code(&self, code: &str) -> Result<LoginState, FlowError> {
        let _guard = self.acquire()?;

        let Some((generation, request)) = self.pending_request() else {
            return Ok(self.expire());
        };

        let code = match validate_code(code) {
            Ok(code) => code,
            Err(id) => {
                return Ok(self.settle(generation, self.notice(FailureKind::Validation, id)));
            }
        };

        let event = match self.verify(&request, &code).await {
            Ok(identity) => self.load_organizations(identity).await,
            Err(event) => event,
        };

        Ok(self.settle(generation, event))
    }

    /// Sign in to the messaging server as a member of `organization_id`.
    #[instrument(skip(self))]
    pub async fn select_organization(
        &self,
        organization_id: Option<i64>,
    ) -> Result<LoginState, FlowError> {
        let _guard = self.acquire()?;

        let selection = {
            let inner = self.lock();
            match &inner.state {
                LoginState::OrganizationSelect {
                    identity,
                    organizations,
                    ..
                } => Some((
                    inner.generation,
                    identity.clone(),
                    organizations.iter().any(|o| o.id == organization_id),
                )),
                _ => None,
            }
        };

        let Some((generation, identity, listed)) = selection else {
            return Ok(self.expire());
        };

        if !listed {
            return Ok(self.settle(
                generation,
                self.notice(FailureKind::Validation, MessageId::OrganizationNotFound),
            ));
        }

        let credentials = match self.exchange(&identity, organization_id).await {
            Ok(token) => self.sign_in(&token).await,
            Err(event) => Err(event),
        };

        let credentials = match credentials {
            Ok(credentials) => credentials,
            Err(event) => return Ok(self.settle(generation, event)),
        };

        match self.advance(generation, Event::SessionEstablished) {
            Some(state) => {
                tracing::info!("Session established");
                self.installer
                    .on_session_established(credentials.auth_token(), credentials.csrf_token());
                Ok(state)
            }
            None => Ok(self.state()),
        }
    }

    /// Back to identifier entry, dropping every held token and listing.
    pub fn restart(&self) -> LoginState {
        let mut inner = self.lock();
        Self::reset(&mut inner);
        tracing::debug!(generation = inner.generation, "Login flow restarted");
        inner.state.clone()
    }

    /// Leave the login screen. The flow state is kept.
    pub fn cancel(&self) {
        self.navigator.pop_screen();
    }

    async fn send(&self, target: &OtpTarget) -> Result<SendOtpData, Event> {
        match self.otp_api.request_otp(target).await {
            Ok(response) => {
                let accepted = response.is_success();
                let message = self.backend_message(&response, MessageId::SendOtpFailed);
                match response.data {
                    Some(data) if accepted && !data.request_id.is_empty() => Ok(data),
                    _ => Err(Event::Notice(Notice::new(FailureKind::Rejected, message))),
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "OTP request failed");
                Err(self.notice(FailureKind::Transport, MessageId::SendOtpFailed))
            }
        }
    }

    async fn verify(&self, request: &OtpRequest, code: &OtpCode) -> Result<IdentityToken, Event> {
        match self
            .otp_api
            .verify_otp(&request.request_id, code.expose(), request.channel)
            .await
        {
            Ok(response) => {
                let accepted = response.is_success();
                let message = self.backend_message(&response, MessageId::OtpInvalid);
                let token = response
                    .data
                    .and_then(|data| data.token)
                    .filter(|token| !token.expose_secret().is_empty());
                match token {
                    Some(token) if accepted => {
                        Ok(IdentityToken::new(token.expose_secret().as_str()))
                    }
                    _ => Err(Event::Notice(Notice::new(FailureKind::Rejected, message))),
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "OTP verification failed");
                Err(self.failed(FailureKind::Transport, MessageId::GenericError))
            }
        }
    }

    /// An empty or missing listing ends the flow: only corporate accounts
    /// can sign in.
    async fn load_organizations(&self, identity: IdentityToken) -> Event {
        match self.organization_api.list_organizations(&identity).await {
            Ok(response) => {
                let accepted = response.is_success();
                let message = self.backend_message(&response, MessageId::NoCorporateAccounts);
                match response.organizations {
                    Some(organizations) if accepted && !organizations.is_empty() => {
                        tracing::info!(count = organizations.len(), "Organizations loaded");
                        Event::Verified {
                            identity,
                            organizations,
                        }
                    }
                    _ => Event::Failed(Notice::new(FailureKind::Rejected, message)),
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Organization listing failed");
                self.failed(FailureKind::Transport, MessageId::GenericError)
            }
        }
    }

    async fn exchange(
        &self,
        identity: &IdentityToken,
        organization_id: Option<i64>,
    ) -> Result<ServerToken, Event> {
        match self
            .organization_api
            .exchange_for_session_token(identity, organization_id)
            .await
        {
            Ok(response) => {
                let accepted = response.is_success();
                let message = self.backend_message(&response, MessageId::TokenGenerationFailed);
                match response.mattermost_auth_token {
                    Some(token) if accepted && !token.expose_secret().is_empty() => {
                        Ok(ServerToken::new(token.expose_secret().as_str()))
                    }
                    _ => Err(Event::Failed(Notice::new(FailureKind::Rejected, message))),
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Server token exchange failed");
                Err(self.failed(FailureKind::Transport, MessageId::GenericError))
            }
        }
    }

    async fn sign_in(&self, token: &ServerToken) -> Result<SessionCredentials, Event> {
        self.server.mobile_login(token).await.map_err(|e| {
            tracing::warn!(error = %e, "Messaging server login failed");
            match e {
                ServerLoginError::Rejected { message, .. } => Event::Failed(Notice::new(
                    FailureKind::HostExchange,
                    message.unwrap_or_else(|| self.text(MessageId::ServerLoginFailed)),
                )),
                ServerLoginError::InvalidResponse => {
                    self.failed(FailureKind::HostExchange, MessageId::InvalidServerResponse)
                }
                ServerLoginError::Client(_) => {
                    self.failed(FailureKind::Transport, MessageId::GenericError)
                }
            }
        })
    }

    fn pending_request(&self) -> Option<(u64, OtpRequest)> {
        let inner = self.lock();
        match &inner.state {
            LoginState::OtpEntry { request, .. } => Some((inner.generation, request.clone())),
            _ => None,
        }
    }

    fn acquire(&self) -> Result<BusyGuard<'_>, FlowError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| {
                tracing::debug!("Login step rejected while another is in flight");
                FlowError::Busy
            })?;
        Ok(BusyGuard(&self.busy))
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn reset(inner: &mut Inner) {
        inner.generation += 1;
        inner.state = next(std::mem::take(&mut inner.state), Event::Restart);
    }

    /// Apply `event` if no restart happened since `generation` was read.
    fn advance(&self, generation: u64, event: Event) -> Option<LoginState> {
        let mut inner = self.lock();
        if inner.generation != generation {
            tracing::debug!("Dropping outcome of a restarted flow");
            return None;
        }
        let from = inner.state.name();
        inner.state = next(std::mem::take(&mut inner.state), event);
        tracing::debug!(from, to = inner.state.name(), "Login state changed");
        Some(inner.state.clone())
    }

    fn settle(&self, generation: u64, event: Event) -> LoginState {
        self.advance(generation, event)
            .unwrap_or_else(|| self.state())
    }

    fn expire(&self) -> LoginState {
        tracing::info!("Login step inputs are gone, asking for a new code");
        let mut inner = self.lock();
        inner.state = next(
            std::mem::take(&mut inner.state),
            Event::SessionExpired(self.text(MessageId::SessionExpired)),
        );
        inner.state.clone()
    }

    fn text(&self, id: MessageId) -> String {
        self.messages.message(id).into_owned()
    }

    fn notice(&self, kind: FailureKind, id: MessageId) -> Event {
        Event::Notice(Notice::new(kind, self.text(id)))
    }

    fn failed(&self, kind: FailureKind, id: MessageId) -> Event {
        Event::Failed(Notice::new(kind, self.text(id)))
    }

    /// The backend's own message, or the localized fallback.
    fn backend_message(&self, envelope: &impl Envelope, fallback: MessageId) -> String {
        envelope
            .message()
            .map(str::to_string)
            .unwrap_or_else(|| self.text(fallback))
    }
}
