//! Sign-in state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;

use super::holder::{Lane, StateHolder};
use super::validation;
use crate::api::RegisterRequest;
use crate::error::RepoResult;
use crate::repository::{AuthRepository, PersistedSession};
use crate::session::{Session, SessionStore};

/// Orders the session changes of auth intents.
///
/// Network calls run concurrently; applying their result to the session
/// store happens under `committed`. A sign-in or restore applies only while
/// it is still the newest intent. A logout applies unless a newer intent has
/// already applied.
#[derive(Debug, Default)]
struct CommitGate {
    issued: AtomicU64,
    /// Id of the last intent that changed the session
    committed: tokio::sync::Mutex<u64>,
}

impl CommitGate {
    fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_newest(&self, id: u64) -> bool {
        self.issued.load(Ordering::SeqCst) == id
    }
}

/// Holds the current [`Session`] for login and registration screens.
///
/// Every auth intent shares one lane, so the newest of login, register,
/// logout, and restore decides both the published state and the session
/// store. `data` also follows every change of the [`SessionStore`], so
/// profile refreshes made elsewhere show up here.
#[derive(Debug)]
pub struct AuthHolder {
    core: StateHolder<Session>,
    repo: Arc<AuthRepository>,
    gate: Arc<CommitGate>,
    follower: JoinHandle<()>,
}

impl std::ops::Deref for AuthHolder {
    type Target = StateHolder<Session>;

    fn deref(&self) -> &Self::Target {
        &self.core
    }
}

impl Drop for AuthHolder {
    fn drop(&mut self) {
        self.follower.abort();
    }
}

impl AuthHolder {
    /// Must be called from within a Tokio runtime.
    pub fn new(repo: Arc<AuthRepository>, session: &SessionStore) -> Self {
        let rx = session.subscribe();
        let core = StateHolder::new(rx.borrow().clone());
        let follower = core.follow(rx, |state, session| state.data = session);
        Self {
            core,
            repo,
            gate: Arc::new(CommitGate::default()),
            follower,
        }
    }

    pub fn login(&self, email: &str, password: &str) {
        if let Err(e) = validation::not_blank("E-mail", email)
            .and_then(|_| validation::not_blank("Password", password))
        {
            self.core.reject(e.to_string());
            return;
        }
        let repo = Arc::clone(&self.repo);
        let gate = Arc::clone(&self.gate);
        let id = gate.issue();
        let (email, password) = (email.to_string(), password.to_string());
        self.core.run(
            Lane::Write,
            async move {
                let result = repo.sign_in(&email, &password).await;
                if let RepoResult::Success(session) = &result {
                    start_if_newest(&repo, &gate, id, session).await;
                }
                result
            },
            publish_session,
        );
    }

    pub fn register(&self, request: RegisterRequest) {
        if let Err(e) = validation::not_blank("E-mail", &request.email)
            .and_then(|_| validation::not_blank("Password", &request.password))
            .and_then(|_| validation::not_blank("Name", &request.name))
        {
            self.core.reject(e.to_string());
            return;
        }
        let repo = Arc::clone(&self.repo);
        let gate = Arc::clone(&self.gate);
        let id = gate.issue();
        self.core.run(
            Lane::Write,
            async move {
                let result = repo.sign_up(&request).await;
                if let RepoResult::Success(session) = &result {
                    start_if_newest(&repo, &gate, id, session).await;
                }
                result
            },
            publish_session,
        );
    }

    pub fn logout(&self) {
        let repo = Arc::clone(&self.repo);
        let gate = Arc::clone(&self.gate);
        let id = gate.issue();
        self.core.run(
            Lane::Write,
            async move {
                let mut committed = gate.committed.lock().await;
                if *committed > id {
                    tracing::debug!(id, "logout overtaken by a newer sign-in");
                    return RepoResult::Success(());
                }
                *committed = id;
                repo.logout().await
            },
            |state, result| {
                // The in-memory session is gone even if the store failed.
                state.data = Session::default();
                if let RepoResult::Error { message, .. } = result {
                    state.error = Some(message);
                }
            },
        );
    }

    /// Resume a persisted session, if any.
    pub fn restore_session(&self) {
        let repo = Arc::clone(&self.repo);
        let gate = Arc::clone(&self.gate);
        let id = gate.issue();
        self.core.run(
            Lane::Write,
            async move {
                let persisted = match repo.load_persisted_session().await {
                    RepoResult::Success(persisted) => persisted,
                    RepoResult::Error { message, code } => {
                        return RepoResult::Error { message, code }
                    }
                };
                let mut committed = gate.committed.lock().await;
                if !gate.is_newest(id) {
                    tracing::debug!(id, "superseded restore not applied");
                    return RepoResult::Success(match persisted {
                        PersistedSession::Valid(session) => Some(session),
                        _ => None,
                    });
                }
                *committed = id;
                repo.adopt_persisted_session(persisted).await
            },
            |state, result| match result {
                RepoResult::Success(session) => {
                    state.error = None;
                    state.data = session.unwrap_or_default();
                }
                RepoResult::Error { message, .. } => state.error = Some(message),
            },
        );
    }

    pub fn is_authenticated(&self) -> bool {
        self.core.state().data.is_authenticated()
    }
}

/// Start `session` unless a newer auth intent was issued meanwhile.
async fn start_if_newest(repo: &AuthRepository, gate: &CommitGate, id: u64, session: &Session) {
    let mut committed = gate.committed.lock().await;
    if !gate.is_newest(id) {
        tracing::debug!(id, "superseded sign-in not applied");
        return;
    }
    *committed = id;
    repo.start_session(session.clone()).await;
}

fn publish_session(state: &mut super::ViewState<Session>, result: RepoResult<Session>) {
    match result {
        RepoResult::Success(session) => {
            state.error = None;
            let greeting = match session.display_name() {
                Some(name) => format!("Signed in as {}", name),
                None => "Signed in".to_string(),
            };
            state.data = session;
            state.operation_result = Some(super::OperationResult::Success(greeting));
        }
        RepoResult::Error { message, .. } => {
            state.error = Some(message.clone());
            state.operation_result = Some(super::OperationResult::Failure(message));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::MockResponse;
    use crate::repository::test_support::Fixture;
    use crate::repository::TOKEN_KEY;
    use crate::session::Role;
    use crate::traits::KeyValueStore;
    use crate::view_state::OperationResult;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn test_login_publishes_session() {
        let fx = Fixture::new();
        fx.http.set_response(
            &Fixture::url("/login"),
            MockResponse::json(json!({
                "token": "T1", "userId": "U1", "role": "admin",
                "name": "Mikhail", "surname": "Znakin"
            })),
        );
        let holder = AuthHolder::new(Arc::clone(&fx.repos.auth), &fx.session);

        holder.login("m.znakin@mail.ru", "validpass");
        assert!(holder.state().is_loading);
        holder.settle().await;

        let state = holder.state();
        assert!(!state.is_loading);
        assert_eq!(state.data.role, Some(Role::Admin));
        assert!(holder.is_authenticated());
        assert_eq!(
            holder.take_operation_result(),
            Some(OperationResult::Success(
                "Signed in as Mikhail Znakin".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_blank_password_never_reaches_server() {
        let fx = Fixture::new();
        let holder = AuthHolder::new(Arc::clone(&fx.repos.auth), &fx.session);

        holder.login("m.znakin@mail.ru", "");
        holder.settle().await;

        assert_eq!(
            holder.state().error.as_deref(),
            Some("Password must not be empty")
        );
        assert_eq!(fx.http.request_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_during_slow_login_stays_signed_out() {
        let fx = Fixture::new();
        fx.http.set_response(
            &Fixture::url("/login"),
            MockResponse::json(json!({"token": "T1", "userId": "U1", "role": "admin"}))
                .after(Duration::from_millis(200)),
        );
        let holder = AuthHolder::new(Arc::clone(&fx.repos.auth), &fx.session);

        holder.login("m.znakin@mail.ru", "validpass");
        holder.logout();
        holder.settle().await;

        assert!(!holder.is_authenticated());
        assert!(!fx.session.is_authenticated());
        assert_eq!(fx.store.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(fx.repos.auth.restore_session().await, RepoResult::Success(None));
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_after_logout_signs_in() {
        let fx = Fixture::signed_in(Role::Student);
        fx.http.set_response(
            &Fixture::url("/login"),
            MockResponse::json(json!({"token": "T9", "userId": "U9", "role": "teacher"}))
                .after(Duration::from_millis(200)),
        );
        let holder = AuthHolder::new(Arc::clone(&fx.repos.auth), &fx.session);

        holder.logout();
        holder.login("anna.petrova@mail.ru", "validpass");
        holder.settle().await;

        assert_eq!(fx.session.token().as_deref(), Some("T9"));
        assert_eq!(holder.state().data, fx.session.snapshot());
        assert_eq!(fx.store.get(TOKEN_KEY).unwrap(), Some("T9".to_string()));
    }

    #[tokio::test]
    async fn test_follows_session_store_changes() {
        let fx = Fixture::signed_in(Role::Teacher);
        let holder = AuthHolder::new(Arc::clone(&fx.repos.auth), &fx.session);
        let mut rx = holder.subscribe();
        assert!(holder.is_authenticated());

        fx.session.update(|s| s.user_name = Some("Misha".to_string()));
        rx.changed().await.unwrap();
        assert_eq!(holder.state().data.user_name.as_deref(), Some("Misha"));

        fx.session.clear();
        rx.changed().await.unwrap();
        assert!(!holder.is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_resets_published_session() {
        let fx = Fixture::signed_in(Role::Student);
        let holder = AuthHolder::new(Arc::clone(&fx.repos.auth), &fx.session);
        assert!(holder.is_authenticated());

        holder.logout();
        holder.settle().await;

        assert_eq!(holder.state().data, Session::default());
        assert!(!fx.session.is_authenticated());
    }
}
