//! Login, registration, logout, and session restore.

use std::sync::Arc;

use crate::api::{ApiClient, AuthResponse, LoginRequest, RegisterRequest};
use crate::cache::run_blocking;
use crate::error::{ClientError, RepoResult};
use crate::session::{Session, SessionStore};
use crate::traits::{KeyValueStore, StoreError};

/// Store key of the persisted bearer token.
pub const TOKEN_KEY: &str = "token";

/// Store key of the persisted login e-mail.
pub const USER_LOGIN_KEY: &str = "userLogin";

/// What the store and the server say about a persisted session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistedSession {
    /// No token was persisted.
    Missing,
    /// The server answered 401 for the persisted token.
    Rejected,
    /// A usable session. Identity fields stay empty when the server was
    /// unreachable.
    Valid(Session),
}

pub struct AuthRepository {
    api: ApiClient,
    session: Arc<SessionStore>,
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for AuthRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthRepository")
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}

impl AuthRepository {
    pub fn new(api: ApiClient, session: Arc<SessionStore>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            api,
            session,
            store,
        }
    }

    /// Sign in and start a session.
    ///
    /// The session is only touched when the server accepts the credentials.
    pub async fn login(&self, email: &str, password: &str) -> RepoResult<Session> {
        let result = self.sign_in(email, password).await;
        if let RepoResult::Success(session) = &result {
            self.start_session(session.clone()).await;
        }
        result
    }

    /// Create an account and start a session for it.
    pub async fn register(&self, request: &RegisterRequest) -> RepoResult<Session> {
        let result = self.sign_up(request).await;
        if let RepoResult::Success(session) = &result {
            self.start_session(session.clone()).await;
        }
        result
    }

    /// Check credentials with the server without touching the session.
    pub async fn sign_in(&self, email: &str, password: &str) -> RepoResult<Session> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        match self.api.login(&request).await {
            Ok(response) => {
                let session = session_from(response, &request.email, None, None);
                tracing::info!(user_id = ?session.user_id, role = ?session.role, "logged in");
                RepoResult::Success(session)
            }
            Err(e) => {
                tracing::warn!(error = %e, "login failed");
                e.into()
            }
        }
    }

    /// Create an account without touching the session.
    pub async fn sign_up(&self, request: &RegisterRequest) -> RepoResult<Session> {
        match self.api.register(request).await {
            Ok(response) => {
                let session = session_from(
                    response,
                    request.email.trim(),
                    Some(&request.name),
                    Some(&request.surname),
                );
                tracing::info!(user_id = ?session.user_id, "registered");
                RepoResult::Success(session)
            }
            Err(e) => {
                tracing::warn!(error = %e, "registration failed");
                e.into()
            }
        }
    }

    /// End the session and forget the persisted credentials.
    pub async fn logout(&self) -> RepoResult<()> {
        self.session.clear();
        tracing::info!("logged out");
        super::storage_result(self.forget_credentials().await)
    }

    /// Resume the session persisted by an earlier login.
    ///
    /// Returns `None` when nothing was persisted or the server rejected the
    /// token (the persisted credentials are dropped in that case). When the
    /// server is unreachable the token-only session is kept.
    pub async fn restore_session(&self) -> RepoResult<Option<Session>> {
        match self.load_persisted_session().await {
            RepoResult::Success(persisted) => self.adopt_persisted_session(persisted).await,
            RepoResult::Error { message, code } => RepoResult::Error { message, code },
        }
    }

    /// Read the persisted token and check it against `GET /user/info`.
    ///
    /// Neither the session nor the store is changed.
    pub async fn load_persisted_session(&self) -> RepoResult<PersistedSession> {
        let persisted = run_blocking(&self.store, |store| {
            Ok((store.get(TOKEN_KEY)?, store.get(USER_LOGIN_KEY)?))
        })
        .await;
        let (token, login) = match persisted {
            Ok((Some(token), login)) if !token.is_empty() => (token, login),
            Ok(_) => return RepoResult::Success(PersistedSession::Missing),
            Err(e) => return ClientError::from(e).into(),
        };

        let mut session = Session {
            auth_token: Some(token.clone()),
            login,
            ..Default::default()
        };
        match self.api.get_user_info(Some(&token)).await {
            Ok(profile) => {
                session.user_id = Some(profile.user_id);
                session.role = Some(profile.role);
                session.user_name = Some(profile.name);
                session.user_surname = Some(profile.surname);
                if session.login.is_none() {
                    session.login = Some(profile.email);
                }
                RepoResult::Success(PersistedSession::Valid(session))
            }
            Err(e) if e.requires_reauth() => {
                tracing::info!("persisted token rejected");
                RepoResult::Success(PersistedSession::Rejected)
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not refresh restored session");
                RepoResult::Success(PersistedSession::Valid(session))
            }
        }
    }

    /// Apply the outcome of [`load_persisted_session`](Self::load_persisted_session).
    pub async fn adopt_persisted_session(
        &self,
        persisted: PersistedSession,
    ) -> RepoResult<Option<Session>> {
        match persisted {
            PersistedSession::Missing => RepoResult::Success(None),
            PersistedSession::Valid(session) => {
                tracing::info!(user_id = ?session.user_id, "session restored");
                self.session.set(session.clone());
                RepoResult::Success(Some(session))
            }
            PersistedSession::Rejected => {
                self.session.clear();
                match self.forget_credentials().await {
                    Ok(()) => RepoResult::Success(None),
                    Err(e) => ClientError::from(e).into(),
                }
            }
        }
    }

    /// Publish the session in one step and persist the token and login.
    ///
    /// A persistence failure leaves the in-memory session usable.
    pub async fn start_session(&self, session: Session) {
        let token = session.auth_token.clone().unwrap_or_default();
        let login = session.login.clone().unwrap_or_default();
        self.session.set(session);

        let persisted = run_blocking(&self.store, move |store| {
            store.put(TOKEN_KEY, &token)?;
            store.put(USER_LOGIN_KEY, &login)
        })
        .await;
        if let Err(e) = persisted {
            tracing::warn!(error = %e, "failed to persist credentials");
        }
    }

    async fn forget_credentials(&self) -> Result<(), StoreError> {
        run_blocking(&self.store, |store| {
            store.remove(TOKEN_KEY)?;
            store.remove(USER_LOGIN_KEY)
        })
        .await
    }
}

fn session_from(
    response: AuthResponse,
    login: &str,
    name: Option<&str>,
    surname: Option<&str>,
) -> Session {
    Session {
        auth_token: Some(response.token),
        user_id: Some(response.user_id),
        role: Some(response.role),
        user_name: response.name.or_else(|| name.map(str::to_string)),
        user_surname: response.surname.or_else(|| surname.map(str::to_string)),
        login: Some(login.to_string()),
    }
}
