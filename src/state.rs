use std::sync::Arc;

use chrono::Utc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;

use crate::config::AppConfig;
use crate::errors::{AppError, AppResult};
use crate::models::AccountUpsert;
use crate::services::api::ApiClient;
use crate::services::auth::{AuthProvider, FederatedCredential, ProfileUpdate};
use crate::services::payment::PaymentGateway;
use crate::services::session::{Session, SessionStore};
use crate::services::token::TokenStore;

pub struct AppState {
    pub config: AppConfig,
    pub api: ApiClient,
    pub session: SessionStore,
    pub auth: Box<dyn AuthProvider>,
    pub payments: Box<dyn PaymentGateway>,
}

impl AppState {
    /// Wires the REST client to `tokens` and restores any stored session.
    pub fn new(
        config: AppConfig,
        tokens: Arc<TokenStore>,
        auth: Box<dyn AuthProvider>,
        payments: Box<dyn PaymentGateway>,
    ) -> AppResult<Self> {
        let restored = tokens.get().and_then(|t| Session::from_id_token(&t));
        let api = ApiClient::new(&config, tokens)?;
        Ok(Self {
            config,
            api,
            session: SessionStore::new(restored),
            auth,
            payments,
        })
    }

    pub fn require_session(&self) -> AppResult<Session> {
        self.session.current().ok_or(AppError::NotSignedIn)
    }

    /// Stores the bearer token, then publishes the session. Requests made
    /// once this returns carry the new token.
    pub fn publish(&self, session: Session) -> AppResult<Session> {
        self.api.tokens().set(&session.id_token)?;
        self.api.cache().clear();
        self.session.set(Some(session.clone()));
        Ok(session)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<Session> {
        let session = self.auth.sign_in(email, password).await?;
        self.publish(session)
    }

    pub async fn register(&self, email: &str, password: &str) -> AppResult<Session> {
        let session = self.auth.create_account(email, password).await?;
        self.publish(session)
    }

    pub async fn sign_in_with_provider(&self, credential: &FederatedCredential) -> AppResult<Session> {
        let session = self.auth.sign_in_with_provider(credential).await?;
        self.publish(session)
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> AppResult<Session> {
        let current = self.require_session()?;
        let session = self.auth.update_profile(&current, update).await?;
        self.publish(session)
    }

    pub async fn sign_out(&self) -> AppResult<()> {
        if let Some(session) = self.session.current() {
            self.auth.sign_out(&session).await?;
        }
        self.api.tokens().clear()?;
        self.session.set(None);
        Ok(())
    }
}

/// A running application: the shared state plus the task that mirrors
/// session changes into the token store and the backend's user records.
pub struct App {
    state: Arc<AppState>,
    shutdown: Option<oneshot::Sender<()>>,
    listener: JoinHandle<()>,
}

impl App {
    pub fn start(state: AppState) -> Self {
        let state = Arc::new(state);
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
        let listener_state = Arc::clone(&state);
        // Snapshot before spawning so a sign-in racing the first poll is seen as a change.
        let mut changes = state.session.subscribe();
        let mut applied = state.session.current();

        let listener = tokio::spawn(async move {
            loop {
                tokio::select! {
                    change = changes.next() => {
                        let Some(session) = change else { break };
                        if session != applied {
                            apply_session(&listener_state, session.as_ref()).await;
                            applied = session;
                        }
                    }
                    _ = &mut shutdown_rx => {
                        // Catch up with a change the stream has not delivered yet.
                        let latest = listener_state.session.current();
                        if latest != applied {
                            apply_session(&listener_state, latest.as_ref()).await;
                        }
                        break;
                    }
                }
            }
        });

        tracing::debug!("session listener started");
        Self {
            state,
            shutdown: Some(shutdown_tx),
            listener,
        }
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.listener).await {
            tracing::error!(error = %e, "session listener ended abnormally");
        }
        tracing::debug!("session listener stopped");
    }
}

async fn apply_session(state: &AppState, session: Option<&Session>) {
    state.api.cache().clear();
    match session {
        Some(session) => {
            if let Err(e) = state.api.tokens().set(&session.id_token) {
                tracing::error!(error = %e, "failed to persist bearer token");
            }
            let account = AccountUpsert {
                email: session.email.clone(),
                name: session.display_name.clone().unwrap_or_default(),
                photo: session.photo_url.clone(),
                last_login: Utc::now(),
            };
            if let Err(e) = state.api.upsert_user(&account).await {
                tracing::error!(error = %e, email = %session.email, "failed to record sign-in");
            }
            tracing::info!(email = %session.email, "signed in");
        }
        None => {
            if let Err(e) = state.api.tokens().clear() {
                tracing::error!(error = %e, "failed to clear bearer token");
            }
            tracing::info!("session cleared");
        }
    }
}
