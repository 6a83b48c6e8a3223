//! Authenticated session state.
//!
//! The session is an explicit object shared through `Arc` and handed to
//! repositories and view state holders at construction. Only [`SessionStore::set`]
//! and [`SessionStore::clear`] mutate it; observers subscribe to a watch
//! channel.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Role of the signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
            Role::Admin => "admin",
        }
    }

    /// Teachers and admins may record grades and edit schedules.
    pub fn can_edit(&self) -> bool {
        matches!(self, Role::Teacher | Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "teacher" => Ok(Role::Teacher),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Credentials and identity of the current user.
///
/// Every field is absent until a login, registration, or session restore
/// fills it in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub auth_token: Option<String>,
    pub user_id: Option<String>,
    pub role: Option<Role>,
    pub user_name: Option<String>,
    pub user_surname: Option<String>,
    /// E-mail the user signed in with.
    pub login: Option<String>,
}

impl Session {
    /// Check if the session carries a token.
    pub fn is_authenticated(&self) -> bool {
        self.auth_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// "Name Surname", or whichever part is known.
    pub fn display_name(&self) -> Option<String> {
        match (self.user_name.as_deref(), self.user_surname.as_deref()) {
            (Some(name), Some(surname)) => Some(format!("{} {}", name, surname)),
            (Some(name), None) => Some(name.to_string()),
            (None, Some(surname)) => Some(surname.to_string()),
            (None, None) => None,
        }
    }
}

/// Single owner of the [`Session`].
#[derive(Debug)]
pub struct SessionStore {
    tx: watch::Sender<Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Session::default());
        Self { tx }
    }

    /// Create a store that starts with `session`.
    pub fn with_session(session: Session) -> Self {
        let (tx, _rx) = watch::channel(session);
        Self { tx }
    }

    /// Replace the whole session in one step.
    pub fn set(&self, session: Session) {
        self.tx.send_replace(session);
    }

    /// Update fields in place, notifying observers once.
    pub fn update(&self, f: impl FnOnce(&mut Session)) {
        self.tx.send_modify(f);
    }

    /// Forget everything.
    pub fn clear(&self) {
        self.tx.send_replace(Session::default());
    }

    /// Copy of the current session.
    pub fn snapshot(&self) -> Session {
        self.tx.borrow().clone()
    }

    /// The bearer token, if signed in.
    pub fn token(&self) -> Option<String> {
        self.tx
            .borrow()
            .auth_token
            .clone()
            .filter(|token| !token.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.tx.borrow().is_authenticated()
    }

    /// Receive a notification on every change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
